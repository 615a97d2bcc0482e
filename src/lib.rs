//! Oxiview - a lightweight lazy-loading image viewer for the terminal.
//!
//! This crate loads images on first display rather than up front: handles
//! are cheap to create, decode work happens once per handle, and decoded
//! pixels are shared through an LRU cache. Store, cache, loader and
//! display are ports with swappable adapters.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer orchestrating domain services.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "oxiview";
