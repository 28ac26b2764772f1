//! Path-derived identity for file models.
//!
//! A file's identity is a 32-bit hash of its absolute path. It ignores content, so it stays stable while the
//! file is edited and changes only when the path does (rename or move).

use crate::file::FileError;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Deterministic hash of an absolute path.
///
/// Computed as the classic `h = h * 31 + unit` string hash over the UTF-16 code units of the path, with
/// wrapping 32-bit arithmetic. The value is identical across processes and platforms for the same path string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct IdentityHash(pub i32);

impl IdentityHash {
    pub fn of(path: &Path) -> Self {
        let hash = path
            .to_string_lossy()
            .encode_utf16()
            .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)));
        IdentityHash(hash)
    }
}

impl fmt::Display for IdentityHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A lookup key that identifies a single file model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    ByPath(PathBuf),
    ByHash(IdentityHash),
}

/// Loosely-typed identity lookup, as received from callers that may carry either field.
///
/// Converting into [`Identity`] prefers `path` over `hash` and fails with
/// [`FileError::InvalidQuery`] when both are missing.
#[derive(Debug, Clone, Default)]
pub struct IdentityQuery {
    pub path: Option<PathBuf>,
    pub hash: Option<IdentityHash>,
}

impl TryFrom<IdentityQuery> for Identity {
    type Error = FileError;

    fn try_from(query: IdentityQuery) -> Result<Self, Self::Error> {
        match (query.path, query.hash) {
            (Some(path), _) => Ok(Identity::ByPath(path)),
            (None, Some(hash)) => Ok(Identity::ByHash(hash)),
            (None, None) => Err(FileError::InvalidQuery),
        }
    }
}

impl From<IdentityHash> for Identity {
    fn from(hash: IdentityHash) -> Self {
        Identity::ByHash(hash)
    }
}

impl From<PathBuf> for Identity {
    fn from(path: PathBuf) -> Self {
        Identity::ByPath(path)
    }
}

impl From<&Path> for Identity {
    fn from(path: &Path) -> Self {
        Identity::ByPath(path.to_path_buf())
    }
}
