pub mod macros;
pub mod pull_request;
pub mod team;
pub mod user;

// Re-export all models for easy importing
pub use pull_request::*;
pub use team::*;
pub use user::*;
