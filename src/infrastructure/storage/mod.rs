//! Host store implementations.

pub mod memory;
pub mod web;

pub use memory::MemoryStore;
pub use web::WebStorage;
