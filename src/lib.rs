//! handlefs - typed file and folder handles over a hierarchical filesystem
//!
//! Files and folders are represented as lightweight handles identified by
//! their resolved path. Handles know how to rename and move themselves,
//! copy themselves with collision-aware naming, read and write structured
//! content, and walk the tree below them.
//!
//! # Core Concepts
//!
//! - **Gateway**: [`FileManager`] performs kind-checked lookups and
//!   create-if-absent factories. Lookups return `None` for missing entries
//!   instead of failing.
//! - **Handles**: [`File`], [`Folder`] and the [`Handle`] union share the
//!   [`Entry`] operations (rename, reparent, clone, destroy). A handle's
//!   cached path follows its own mutations; out-of-band changes are not
//!   tracked.
//! - **Backends**: everything goes through the [`FileSystem`] trait, with
//!   [`RealFileSystem`] for the host disk and [`MemoryFileSystem`] for tests.
//!
//! # Example Usage
//!
//! ```no_run
//! use handlefs::{Entry, FileManager};
//!
//! # async fn example() -> handlefs::Result<()> {
//! let manager = FileManager::default();
//!
//! let project = manager.create_folder("/tmp/project").await?;
//! let notes = manager.create_file("/tmp/project/notes.txt", "draft").await?;
//!
//! // Clone in place: notes copy1.txt
//! let copy = notes.clone_to(None, false).await?;
//! println!("copied to {}", copy.path().display());
//!
//! for child in project.children(None).await? {
//!     println!("{}", child.name());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Collision handling differs between copy and move: cloning
//! numbers the copy (`a copy1.txt`, `a copy2.txt`) while reparenting keeps
//! appending (`a copy.txt`, `a copy copy.txt`).

pub mod codec;
pub mod config;
pub mod error;
pub mod fs;
pub mod handle;
pub mod manager;
pub mod path;
pub mod traversal;
pub mod util;

pub use codec::Codec;
pub use config::{ConfigError, HandlefsConfig};
pub use error::{HandleError, Result};
pub use fs::{DirEntry, EntryKind, FileSystem, MemoryFileSystem, Metadata, RealFileSystem};
pub use handle::{Entry, File, Folder, Handle, Location, ParentRef};
pub use manager::FileManager;
pub use traversal::list_nested;
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
