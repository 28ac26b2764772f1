//! Filesystem watching and self-event suppression.
//!
//! File models never subscribe to events themselves. The application pulls events from a watch service
//! and hands each one to the model it [scopes](crate::file::FileModel::is_scope). Models that change the disk
//! themselves (for example a rename) first tell the service to drop the events that change will cause, through
//! [`WatchService::ignore_next`].

pub mod ignore;
pub mod service;

pub use ignore::IgnoreList;
pub use service::NotifyWatchService;

use serde::Serialize;
use std::fmt;
use std::path::Path;

/// The kinds of filesystem events a file model reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// A file appeared at the path.
    Add,
    /// The file's content changed.
    Change,
    /// The file disappeared from the path.
    Unlink,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Add => "add",
            EventKind::Change => "change",
            EventKind::Unlink => "unlink",
        };
        f.write_str(name)
    }
}

/// What a file model needs from a watch service.
pub trait WatchService {
    /// Starts reporting `change` and `unlink` events for `path`.
    fn add_path(&self, path: &Path);

    /// Drops exactly one upcoming event of `kind` for `path`.
    fn ignore_next(&self, kind: EventKind, path: &Path);

    /// Withdraws one entry installed by [`ignore_next`](Self::ignore_next), when the operation that would
    /// have caused the event did not happen.
    fn unignore(&self, kind: EventKind, path: &Path);
}
