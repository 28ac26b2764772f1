use crate::watcher::EventKind;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Counted suppression entries, one counter per `(kind, path)` pair.
///
/// An entry only ever swallows an event with the same kind and the same path, so a suppressed
/// `unlink` can never hide a genuine `change` on that file.
#[derive(Debug, Default)]
pub struct IgnoreList {
    entries: HashMap<(EventKind, PathBuf), usize>,
}

impl IgnoreList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one event to drop.
    pub fn ignore_next(&mut self, kind: EventKind, path: &Path) {
        *self.entries.entry((kind, path.to_path_buf())).or_insert(0) += 1;
    }

    /// Withdraws one entry registered by [`ignore_next`](Self::ignore_next).
    ///
    /// Returns `false` if there was nothing to withdraw.
    pub fn unignore(&mut self, kind: EventKind, path: &Path) -> bool {
        self.take(kind, path)
    }

    /// Consumes one entry for `(kind, path)`. Returns `true` if the event must be dropped.
    pub fn take(&mut self, kind: EventKind, path: &Path) -> bool {
        let key = (kind, path.to_path_buf());
        match self.entries.get_mut(&key) {
            Some(count) if *count > 1 => {
                *count -= 1;
                true
            }
            Some(_) => {
                self.entries.remove(&key);
                true
            }
            None => false,
        }
    }

    /// Number of events still waiting to be dropped.
    pub fn pending(&self) -> usize {
        self.entries.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
