pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

// Re-export commonly used types
pub use domain::identity;
pub use domain::identity::service::SessionService;
pub use outbound::repositories;
