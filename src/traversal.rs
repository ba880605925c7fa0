//! Best-effort recursive directory walk

use crate::fs::FileSystem;
use crate::path::ends_with_suffix;
use futures_util::future::{BoxFuture, FutureExt};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Lists every path below `directory`, depth-first in pre-order.
///
/// Directories are always included and recursed into. Files are included
/// when `suffix` is `None` or the full path ends with it. A directory that
/// cannot be listed is logged and contributes nothing; the walk itself
/// never fails.
pub async fn list_nested(
    fs: &dyn FileSystem,
    directory: &Path,
    suffix: Option<&str>,
) -> Vec<PathBuf> {
    let mut found = Vec::new();
    walk(fs, directory, suffix, &mut found).await;
    found
}

fn walk<'a>(
    fs: &'a dyn FileSystem,
    directory: &'a Path,
    suffix: Option<&'a str>,
    found: &'a mut Vec<PathBuf>,
) -> BoxFuture<'a, ()> {
    async move {
        let entries = match fs.read_dir(directory).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %directory.display(), error = %e, "Skipping unreadable directory");
                return;
            }
        };

        for entry in entries {
            let meta = match fs.metadata(entry.path()).await {
                Ok(meta) => meta,
                Err(e) => {
                    debug!(path = %entry.path().display(), error = %e, "Entry vanished during walk");
                    continue;
                }
            };

            if meta.is_dir() {
                found.push(entry.path.clone());
                walk(fs, entry.path(), suffix, found).await;
            } else if meta.is_file() {
                let keep = match suffix {
                    Some(suffix) => ends_with_suffix(entry.path(), suffix),
                    None => true,
                };
                if keep {
                    found.push(entry.path);
                }
            }
        }
    }
    .boxed()
}
