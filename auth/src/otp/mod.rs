pub mod generator;

pub use generator::OneTimeCodeGenerator;
