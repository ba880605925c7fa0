//! FileSystem abstraction the handles are built on

mod memory;
mod real;
mod r#trait;

pub use memory::MemoryFileSystem;
pub use r#trait::{DirEntry, EntryKind, FileSystem, Metadata};
pub use real::RealFileSystem;
