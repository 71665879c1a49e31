//! In-memory file store.

mod store;

pub use store::MemStore;
