//! Backing store adapters.

pub mod disk_store;

pub use disk_store::DiskImageStore;
