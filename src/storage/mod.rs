//! Storage backends implementing the core store traits.

pub mod in_memory;

pub use in_memory::InMemoryStore;
