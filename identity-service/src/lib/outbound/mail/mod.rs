pub mod http;

pub use http::HttpMailer;
