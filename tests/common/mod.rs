#![allow(dead_code)]

use quire_core::directory::DirectoryModel;
use quire_core::file::{FileError, FileModel};
use quire_core::identity::IdentityHash;
use quire_core::options::FileOptions;
use quire_core::trash::TrashDir;
use quire_core::watcher::{EventKind, WatchService};
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Remove(PathBuf),
    Sort,
    Notify(String),
}

/// A directory double that records every call a file makes into it.
pub struct RecordingDirectory {
    pub directory: bool,
    pub label: String,
    pub watch: Option<Rc<RecordingWatch>>,
    pub calls: RefCell<Vec<Call>>,
}

impl RecordingDirectory {
    /// A real directory: its files are not roots.
    pub fn directory() -> Rc<Self> {
        Rc::new(Self {
            directory: true,
            label: "notes".to_string(),
            watch: Some(Rc::new(RecordingWatch::default())),
            calls: RefCell::new(Vec::new()),
        })
    }

    /// A pseudo-root grouping loose files: its files register with the watcher.
    pub fn pseudo_root() -> Rc<Self> {
        Rc::new(Self {
            directory: false,
            label: "loose files".to_string(),
            watch: Some(Rc::new(RecordingWatch::default())),
            calls: RefCell::new(Vec::new()),
        })
    }

    /// A real directory with a custom display label.
    pub fn labelled(label: &str) -> Rc<Self> {
        Rc::new(Self {
            directory: true,
            label: label.to_string(),
            watch: Some(Rc::new(RecordingWatch::default())),
            calls: RefCell::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn watch(&self) -> Rc<RecordingWatch> {
        self.watch.clone().expect("directory has a watch service")
    }
}

impl DirectoryModel for RecordingDirectory {
    fn remove(&self, file: &FileModel) -> bool {
        self.calls
            .borrow_mut()
            .push(Call::Remove(file.path().to_path_buf()));
        true
    }

    fn sort(&self) {
        self.calls.borrow_mut().push(Call::Sort);
    }

    fn notify_change(&self, message: &str) {
        self.calls.borrow_mut().push(Call::Notify(message.to_string()));
    }

    fn is_directory(&self) -> bool {
        self.directory
    }

    fn watch_service(&self) -> Option<Rc<dyn WatchService>> {
        self.watch.clone().map(|w| w as Rc<dyn WatchService>)
    }

    fn name(&self) -> String {
        self.label.clone()
    }
}

#[derive(Default)]
pub struct RecordingWatch {
    pub added: RefCell<Vec<PathBuf>>,
    pub ignored: RefCell<Vec<(EventKind, PathBuf)>>,
}

impl WatchService for RecordingWatch {
    fn add_path(&self, path: &Path) {
        self.added.borrow_mut().push(path.to_path_buf());
    }

    fn ignore_next(&self, kind: EventKind, path: &Path) {
        self.ignored.borrow_mut().push((kind, path.to_path_buf()));
    }

    fn unignore(&self, kind: EventKind, path: &Path) {
        let mut ignored = self.ignored.borrow_mut();
        if let Some(index) = ignored.iter().position(|(k, p)| *k == kind && p == path) {
            ignored.remove(index);
        }
    }
}

/// A directory that owns its files and dispatches events to them while holding its child list.
///
/// Removals and re-sorts requested from inside a dispatch are queued and applied afterwards.
#[derive(Default)]
pub struct OwningDirectory {
    pub files: RefCell<Vec<FileModel>>,
    pub messages: RefCell<Vec<String>>,
    doomed: RefCell<Vec<IdentityHash>>,
    unsorted: Cell<bool>,
}

impl OwningDirectory {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn adopt(&self, file: FileModel) {
        self.files.borrow_mut().push(file);
    }

    pub fn dispatch(&self, path: &Path, kind: EventKind) -> Result<(), FileError> {
        for file in self.files.borrow_mut().iter_mut() {
            file.handle_event(path, kind)?;
        }
        self.settle();
        Ok(())
    }

    pub fn rename_child(&self, index: usize, new_name: &str) -> Result<(), FileError> {
        self.files.borrow_mut()[index].rename(new_name, None)?;
        self.settle();
        Ok(())
    }

    pub fn names(&self) -> Vec<String> {
        self.files
            .borrow()
            .iter()
            .map(|f| f.name().to_string())
            .collect()
    }

    fn settle(&self) {
        let doomed = self.doomed.take();
        self.files
            .borrow_mut()
            .retain(|f| !doomed.contains(&f.identity_hash()));
        if self.unsorted.take() {
            self.files
                .borrow_mut()
                .sort_by(|a, b| a.name().cmp(b.name()));
        }
    }
}

impl DirectoryModel for OwningDirectory {
    fn remove(&self, file: &FileModel) -> bool {
        self.doomed.borrow_mut().push(file.identity_hash());
        true
    }

    fn sort(&self) {
        self.unsorted.set(true);
    }

    fn notify_change(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }

    fn is_directory(&self) -> bool {
        true
    }

    fn watch_service(&self) -> Option<Rc<dyn WatchService>> {
        None
    }

    fn name(&self) -> String {
        "owned".to_string()
    }
}

pub fn as_owner(dir: &Rc<OwningDirectory>) -> Rc<dyn DirectoryModel> {
    dir.clone()
}

pub fn as_parent(dir: &Rc<RecordingDirectory>) -> Rc<dyn DirectoryModel> {
    dir.clone()
}

/// Options whose trash lives inside the test's temp dir.
pub fn options_in(root: &Path) -> FileOptions {
    FileOptions::default().with_trash(Rc::new(TrashDir::new(root.join(".trash"))))
}
