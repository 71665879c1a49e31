//! sandtree: virtual file tree and file operations over a code sandbox's flat file map.

pub mod backends;
pub mod cli;
pub mod config;
pub mod error;
pub mod explorer;
pub mod logging;
pub mod ops;
pub mod path;
pub mod store;
pub mod tree;
pub mod types;

// Re-export
pub use backends::MemStore;
pub use config::ExplorerConfig;
pub use error::{ExplorerError, ExplorerResult};
pub use explorer::Explorer;
pub use path::normalize;
pub use store::FileStore;
pub use tree::{PathConflict, Tree, TreeNode, build_tree};
pub use types::*;
