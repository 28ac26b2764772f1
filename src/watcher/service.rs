use crate::error::QuireResult;
use crate::watcher::{EventKind, IgnoreList, WatchService};
use notify::event::{ModifyKind, RenameMode};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// A [`WatchService`] backed by the platform's native watcher.
///
/// The notify callback thread only classifies events and forwards them over a channel. Suppression happens
/// on the consuming side in [`next_event`](Self::next_event), so it runs on the application's thread,
/// next to the models that installed it.
pub struct NotifyWatchService {
    watcher: RefCell<RecommendedWatcher>,
    events: Receiver<(EventKind, PathBuf)>,
    ignored: RefCell<IgnoreList>,
}

impl NotifyWatchService {
    pub fn create() -> QuireResult<Self> {
        let (tx, rx) = channel();
        let watcher = setup_file_watcher(tx)?;

        Ok(NotifyWatchService {
            watcher: RefCell::new(watcher),
            events: rx,
            ignored: RefCell::new(IgnoreList::new()),
        })
    }

    /// Watches a whole directory tree, for directory models that own many files.
    pub fn watch_tree(&self, root: &Path) -> QuireResult<()> {
        self.watcher
            .borrow_mut()
            .watch(root, RecursiveMode::Recursive)?;
        Ok(())
    }

    pub fn unwatch(&self, path: &Path) -> QuireResult<()> {
        self.watcher.borrow_mut().unwatch(path)?;
        Ok(())
    }

    /// Waits up to `timeout` for the next event that is not suppressed.
    pub fn next_event(&self, timeout: Duration) -> Option<(PathBuf, EventKind)> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.events.recv_timeout(remaining) {
                Ok((kind, path)) => {
                    if let Some(event) = self.admit(kind, path) {
                        return Some(event);
                    }
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => return None,
            }
        }
    }

    /// Drains everything already queued, without blocking.
    pub fn pending_events(&self) -> Vec<(PathBuf, EventKind)> {
        self.events
            .try_iter()
            .filter_map(|(kind, path)| self.admit(kind, path))
            .collect()
    }

    /// Number of self-caused events still waiting to be dropped.
    pub fn pending_suppressions(&self) -> usize {
        self.ignored.borrow().pending()
    }

    fn admit(&self, kind: EventKind, path: PathBuf) -> Option<(PathBuf, EventKind)> {
        if self.ignored.borrow_mut().take(kind, &path) {
            debug!(%kind, path = %path.display(), "dropped self-caused event");
            return None;
        }
        Some((path, kind))
    }
}

impl WatchService for NotifyWatchService {
    fn add_path(&self, path: &Path) {
        if let Err(e) = self
            .watcher
            .borrow_mut()
            .watch(path, RecursiveMode::NonRecursive)
        {
            warn!(path = %path.display(), error = %e, "failed to watch path");
        }
    }

    fn ignore_next(&self, kind: EventKind, path: &Path) {
        self.ignored.borrow_mut().ignore_next(kind, path);
    }

    fn unignore(&self, kind: EventKind, path: &Path) {
        self.ignored.borrow_mut().unignore(kind, path);
    }
}

fn setup_file_watcher(
    raw_event_tx: Sender<(EventKind, PathBuf)>,
) -> Result<RecommendedWatcher, notify::Error> {
    let mut classifier = Classifier::new();
    let event_handler = move |res: Result<Event, notify::Error>| match res {
        Ok(event) => {
            for classified in classifier.classify(&event) {
                let _ = raw_event_tx.send(classified);
            }
        }
        Err(e) => warn!(error = %e, "watcher reported an error"),
    };

    RecommendedWatcher::new(event_handler, Config::default())
}

/// How many rename halves are remembered while waiting for a combined rename event.
const RENAME_MEMORY: usize = 64;

/// Maps native events onto the event kinds file models understand.
///
/// Renames become an `unlink` of the source and an `add` of the target. Some backends (inotify) report a
/// rename three times: once per side and once more with both paths. The classifier remembers the sides it has
/// already emitted, so every rename yields exactly one `unlink` and one `add`. Access events and metadata
/// changes other than the write time are dropped.
#[derive(Debug, Default)]
pub struct Classifier {
    renamed: VecDeque<(EventKind, PathBuf)>,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classify(&mut self, event: &Event) -> Vec<(EventKind, PathBuf)> {
        use notify::EventKind as Native;
        use notify::event::MetadataKind;

        let every = |kind: EventKind| -> Vec<(EventKind, PathBuf)> {
            event.paths.iter().map(|p| (kind, p.clone())).collect()
        };

        match event.kind {
            Native::Create(_) => every(EventKind::Add),
            Native::Remove(_) => every(EventKind::Unlink),
            Native::Modify(ModifyKind::Name(RenameMode::From)) => {
                self.remember(every(EventKind::Unlink))
            }
            Native::Modify(ModifyKind::Name(RenameMode::To)) => self.remember(every(EventKind::Add)),
            Native::Modify(ModifyKind::Name(RenameMode::Both)) => match event.paths.as_slice() {
                [from, to] => [(EventKind::Unlink, from), (EventKind::Add, to)]
                    .into_iter()
                    .filter(|(kind, path)| !self.forget(*kind, path))
                    .map(|(kind, path)| (kind, path.clone()))
                    .collect(),
                _ => Vec::new(),
            },
            // the backend could not tell which side of the rename this is
            Native::Modify(ModifyKind::Name(_)) => event
                .paths
                .iter()
                .map(|p| {
                    let kind = if p.exists() {
                        EventKind::Add
                    } else {
                        EventKind::Unlink
                    };
                    (kind, p.clone())
                })
                .collect(),
            Native::Modify(ModifyKind::Metadata(MetadataKind::WriteTime)) => {
                every(EventKind::Change)
            }
            Native::Modify(ModifyKind::Metadata(_)) => Vec::new(),
            Native::Modify(_) => every(EventKind::Change),
            Native::Access(_) | Native::Any | Native::Other => Vec::new(),
        }
    }

    fn remember(&mut self, sides: Vec<(EventKind, PathBuf)>) -> Vec<(EventKind, PathBuf)> {
        for side in &sides {
            if self.renamed.len() == RENAME_MEMORY {
                self.renamed.pop_front();
            }
            self.renamed.push_back(side.clone());
        }
        sides
    }

    /// Drops a remembered rename side. Returns `true` if it had already been emitted.
    fn forget(&mut self, kind: EventKind, path: &Path) -> bool {
        match self
            .renamed
            .iter()
            .position(|(k, p)| *k == kind && p == path)
        {
            Some(index) => {
                self.renamed.remove(index);
                true
            }
            None => false,
        }
    }
}
