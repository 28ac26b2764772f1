use crate::file::FileModel;
use crate::watcher::WatchService;
use std::rc::Rc;

/// The container a [`FileModel`] belongs to.
///
/// A directory owns its files. Files only keep a `Weak` back-reference and call into the directory through
/// this trait, so every method takes `&self`. Implementors use interior mutability for their child list.
///
/// # Re-entrancy
///
/// [`remove`](Self::remove) and [`sort`](Self::sort) are called *from inside* file operations such as
/// [`FileModel::handle_event`], [`FileModel::rename`] and [`FileModel::detach`]. A directory that keeps its
/// files in a `RefCell<Vec<FileModel>>` and dispatches events while holding that borrow must not touch the
/// list in these callbacks. Record the request instead and apply it once the dispatch has released the borrow:
///
/// ```rust
/// use quire_core::IdentityHash;
/// use quire_core::directory::DirectoryModel;
/// use quire_core::file::FileModel;
/// use quire_core::watcher::{EventKind, WatchService};
/// use std::cell::{Cell, RefCell};
/// use std::path::Path;
/// use std::rc::Rc;
///
/// #[derive(Default)]
/// struct Folder {
///     files: RefCell<Vec<FileModel>>,
///     doomed: RefCell<Vec<IdentityHash>>,
///     unsorted: Cell<bool>,
/// }
///
/// impl Folder {
///     fn dispatch(&self, path: &Path, kind: EventKind) -> Result<(), quire_core::FileError> {
///         for file in self.files.borrow_mut().iter_mut() {
///             file.handle_event(path, kind)?;
///         }
///         // the borrow is released, apply what the files asked for
///         let doomed = self.doomed.take();
///         self.files
///             .borrow_mut()
///             .retain(|f| !doomed.contains(&f.identity_hash()));
///         if self.unsorted.take() {
///             self.files.borrow_mut().sort_by(|a, b| a.name().cmp(b.name()));
///         }
///         Ok(())
///     }
/// }
///
/// impl DirectoryModel for Folder {
///     fn remove(&self, file: &FileModel) -> bool {
///         self.doomed.borrow_mut().push(file.identity_hash());
///         true
///     }
///     fn sort(&self) {
///         self.unsorted.set(true);
///     }
///     fn notify_change(&self, _message: &str) {}
///     fn is_directory(&self) -> bool {
///         true
///     }
///     fn watch_service(&self) -> Option<Rc<dyn WatchService>> {
///         None
///     }
///     fn name(&self) -> String {
///         "notes".to_string()
///     }
/// }
/// ```
pub trait DirectoryModel {
    /// Drops `file` from the child list. Returns `true` if it was a child.
    ///
    /// Implementations should match the file by [`FileModel::identity_hash`] or [`FileModel::path`].
    /// The model is usually borrowed by its caller while this runs, see the re-entrancy notes above.
    fn remove(&self, file: &FileModel) -> bool;

    /// Re-sorts the children, e.g. after one of them was renamed. Subject to the same re-entrancy rules as
    /// [`remove`](Self::remove).
    fn sort(&self);

    /// Forwards a human-readable change message to whoever presents the tree.
    fn notify_change(&self, message: &str);

    /// `false` for pseudo-roots that only group top-level files.
    fn is_directory(&self) -> bool;

    /// The watch service that top-level files register with, if one is running.
    fn watch_service(&self) -> Option<Rc<dyn WatchService>>;

    /// Display name of the directory, shown as the file's [`FileModel::directory_name`].
    fn name(&self) -> String;
}
