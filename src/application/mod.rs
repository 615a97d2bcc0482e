//! Application layer orchestrating domain services.

/// Application services.
pub mod services;

pub use services::Gallery;
