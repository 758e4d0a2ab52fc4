// # Backend Implementations
//
// This module provides the Backend implementations bundled with the core,
// and the entry bookkeeping other backend crates can build on.

pub mod memory;
pub mod store;

pub use memory::{MemoryBackend, MemoryBackendFactory};
pub use store::EntrySet;
