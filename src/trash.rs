use std::fs;
use std::io::{Error, ErrorKind, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// Moves files out of the way instead of deleting them outright.
pub trait Trash {
    fn trash(&self, path: &Path) -> Result<()>;
}

/// A trash directory on the local disk.
///
/// Every trashed file is stored as `{uuid}-{file name}`, so repeated names never overwrite each other.
#[derive(Debug, Clone)]
pub struct TrashDir {
    pub root: PathBuf,
}

impl TrashDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        TrashDir { root: root.into() }
    }

    /// Resolves the per-user trash under `{local data dir}/quire/trash`.
    ///
    /// Falls back to the system temp directory when the platform has no local data directory.
    pub fn default_location() -> Self {
        let base = dirs::data_local_dir().unwrap_or_else(std::env::temp_dir);
        TrashDir::new(base.join("quire").join("trash"))
    }
}

impl Default for TrashDir {
    fn default() -> Self {
        TrashDir::default_location()
    }
}

impl Trash for TrashDir {
    fn trash(&self, path: &Path) -> Result<()> {
        let name = path
            .file_name()
            .ok_or_else(|| Error::new(ErrorKind::InvalidInput, "path has no file name"))?;

        fs::create_dir_all(&self.root)?;
        let target = self
            .root
            .join(format!("{}-{}", Uuid::new_v4(), name.to_string_lossy()));

        // rename fails across devices
        if fs::rename(path, &target).is_err() {
            fs::copy(path, &target)?;
            fs::remove_file(path)?;
        }

        debug!(from = %path.display(), to = %target.display(), "moved file to trash");
        Ok(())
    }
}
