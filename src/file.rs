use crate::directory::DirectoryModel;
use crate::identity::{Identity, IdentityHash};
use crate::options::FileOptions;
use crate::sanitize::{has_no_recognized_extension, sanitize};
use crate::search::{self, SearchTerm};
use crate::watcher::{EventKind, WatchService};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum FileError {
    #[error("identity query carries neither a path nor a hash")]
    InvalidQuery,
    #[error("invalid file name: {0:?}")]
    InvalidName(String),
    #[error("invalid path: {}", .0.display())]
    InvalidPath(PathBuf),
    #[error("target already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A text file on disk, as seen by the directory tree that contains it.
///
/// The model keeps only what a tree view needs: path-derived fields, the last modification time and a
/// short snippet. The full content is read from disk on demand and is never cached. The one exception is
/// an edit in progress, which lives in the buffer until [`save`](Self::save) writes it out.
///
/// Invariants:
/// - `identity_hash` is always `IdentityHash::of(path)`.
/// - A non-empty buffer implies `is_modified()`.
/// - After `save` or `read`, the buffer is empty and `is_modified()` is `false`.
#[derive(Debug)]
pub struct FileModel {
    parent: Option<Weak<dyn DirectoryModel>>,
    path: PathBuf,
    name: String,
    directory_name: String,
    identity_hash: IdentityHash,
    extension: String,
    modified_time: i64,
    snippet: String,
    buffer: String,
    modified: bool,
    options: FileOptions,
}

/// A one-shot copy of a [`FileModel`] with its disk content loaded.
///
/// Built by value, so serializing or otherwise consuming it never touches the live model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSnapshot {
    pub path: PathBuf,
    pub name: String,
    pub directory_name: String,
    pub identity_hash: IdentityHash,
    pub extension: String,
    pub modified_time: i64,
    pub snippet: String,
    pub modified: bool,
    pub content: String,
}

impl FileModel {
    /// Opens the file at `path` as a child of `parent`, with default options.
    ///
    /// See [`open_with`](Self::open_with).
    pub fn open(parent: &Rc<dyn DirectoryModel>, path: impl AsRef<Path>) -> Result<Self, FileError> {
        Self::open_with(parent, path, FileOptions::default())
    }

    /// Opens the file at `path` as a child of `parent`.
    ///
    /// - Creates an empty file first if nothing exists at `path`.
    /// - Reads the file once to fill in the modification time and snippet.
    /// - Registers the path with the parent's watch service when the parent is not a real directory, since no
    ///   directory watch covers the file in that case.
    ///
    /// Returns [`FileError::InvalidPath`] if `path` has no file name, or [`FileError::Io`] if the file cannot
    /// be created or read.
    pub fn open_with(
        parent: &Rc<dyn DirectoryModel>,
        path: impl AsRef<Path>,
        options: FileOptions,
    ) -> Result<Self, FileError> {
        let path = std::path::absolute(path.as_ref())?;
        if path.file_name().is_none() {
            return Err(FileError::InvalidPath(path));
        }

        if !path.exists() {
            fs::write(&path, "")?;
            debug!(path = %path.display(), "created empty file");
        }

        let mut file = FileModel {
            parent: Some(Rc::downgrade(parent)),
            identity_hash: IdentityHash::of(&path),
            path,
            name: String::new(),
            directory_name: String::new(),
            extension: String::new(),
            modified_time: 0,
            snippet: String::new(),
            buffer: String::new(),
            modified: false,
            options,
        };
        file.sync_with_path();
        file.label_from_parent();
        file.read()?;

        if file.is_root() {
            if let Some(watch) = parent.watch_service() {
                watch.add_path(&file.path);
            }
        }

        Ok(file)
    }

    /// `true` when no directory model sits above this file.
    pub fn is_root(&self) -> bool {
        self.parent().is_none_or(|parent| !parent.is_directory())
    }

    pub fn parent(&self) -> Option<Rc<dyn DirectoryModel>> {
        self.parent.as_ref()?.upgrade()
    }

    /// Hooks a detached model into a (new) parent.
    pub fn attach(&mut self, parent: &Rc<dyn DirectoryModel>) -> &mut Self {
        self.parent = Some(Rc::downgrade(parent));
        self.label_from_parent();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Label of the containing directory, as reported by the parent directory model.
    ///
    /// Falls back to the name of the directory on disk when the parent is a pseudo-root or the model is
    /// detached.
    pub fn directory_name(&self) -> &str {
        &self.directory_name
    }

    pub fn identity_hash(&self) -> IdentityHash {
        self.identity_hash
    }

    /// Extension without the leading dot, empty if there is none.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Modification time of the file on disk as of the last read, in milliseconds since the Unix epoch.
    pub fn modified_time(&self) -> i64 {
        self.modified_time
    }

    pub fn snippet(&self) -> &str {
        &self.snippet
    }

    /// Unsaved content, empty when there is none.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn options(&self) -> &FileOptions {
        &self.options
    }

    /// Reads the whole file and returns its content.
    ///
    /// Disk state becomes authoritative: the modification time and snippet are refreshed, and any unsaved
    /// buffer is dropped. The content itself is not kept.
    pub fn read(&mut self) -> Result<String, FileError> {
        let content = fs::read_to_string(&self.path)?;
        let metadata = fs::metadata(&self.path)?;

        self.modified_time = epoch_millis(metadata.modified()?);
        self.snippet = make_snippet(&content, self.options.snippet_length);
        self.buffer.clear();
        self.modified = false;

        debug!(path = %self.path.display(), bytes = content.len(), "read file");
        Ok(content)
    }

    /// Re-reads the file from disk, discarding the content.
    pub fn update(&mut self) -> Result<&mut Self, FileError> {
        self.read()?;
        Ok(self)
    }

    /// Replaces the unsaved content. Nothing is written until [`save`](Self::save).
    pub fn set_content(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.snippet = make_snippet(&self.buffer, self.options.snippet_length);
        self.modified = true;
    }

    /// Returns the current disk content if `hash` is this file's identity.
    ///
    /// Reads straight from disk and leaves the model untouched, so unsaved edits survive.
    pub fn get_by_identity(&self, hash: IdentityHash) -> Result<Option<String>, FileError> {
        if hash != self.identity_hash {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&self.path)?))
    }

    /// Copies the model's fields together with its disk content.
    pub fn with_content_snapshot(&self) -> Result<FileSnapshot, FileError> {
        let content = fs::read_to_string(&self.path)?;

        Ok(FileSnapshot {
            path: self.path.clone(),
            name: self.name.clone(),
            directory_name: self.directory_name.clone(),
            identity_hash: self.identity_hash,
            extension: self.extension.clone(),
            modified_time: self.modified_time,
            snippet: self.snippet.clone(),
            modified: self.modified,
            content,
        })
    }

    /// Writes the buffer to disk (even when empty) and re-reads the file.
    ///
    /// Afterwards the buffer is empty, `is_modified()` is `false`, and the snippet and modification time
    /// describe what was just written.
    pub fn save(&mut self) -> Result<(), FileError> {
        fs::write(&self.path, self.buffer.as_bytes())?;
        debug!(path = %self.path.display(), bytes = self.buffer.len(), "saved file");

        self.buffer.clear();
        self.modified = false;
        self.read()?;
        Ok(())
    }

    /// Returns `self` if `query` identifies this file.
    pub fn find_by_identity(&self, query: &Identity) -> Option<&Self> {
        let hit = match query {
            Identity::ByPath(path) => *path == self.path,
            Identity::ByHash(hash) => *hash == self.identity_hash,
        };
        hit.then_some(self)
    }

    /// Renames the file within its directory.
    ///
    /// - The name is sanitized first; [`FileError::InvalidName`] is returned if nothing usable is left.
    /// - A name without a recognized document extension gets the default one appended.
    /// - With a watch handle, the `unlink` of the old path and the `add` of the new one are suppressed before
    ///   the rename happens, and withdrawn again if it fails.
    /// - The parent is asked to re-sort afterwards.
    ///
    /// Returns [`FileError::AlreadyExists`] if another entry occupies the target. On any error, the model and
    /// the disk are left as they were.
    pub fn rename(
        &mut self,
        new_name: &str,
        watch: Option<&dyn WatchService>,
    ) -> Result<&mut Self, FileError> {
        let mut name =
            sanitize(new_name).ok_or_else(|| FileError::InvalidName(new_name.to_string()))?;
        if has_no_recognized_extension(&name, &self.options.extensions) {
            name = format!("{name}.{}", self.options.default_extension);
        }

        let dir = self
            .path
            .parent()
            .ok_or_else(|| FileError::InvalidPath(self.path.clone()))?;
        let new_path = dir.join(&name);

        if new_path == self.path {
            return Ok(self);
        }
        if new_path.exists() {
            return Err(FileError::AlreadyExists(new_path));
        }

        if let Some(watch) = watch {
            watch.ignore_next(EventKind::Unlink, &self.path);
            watch.ignore_next(EventKind::Add, &new_path);
        }

        if let Err(e) = fs::rename(&self.path, &new_path) {
            if let Some(watch) = watch {
                watch.unignore(EventKind::Unlink, &self.path);
                watch.unignore(EventKind::Add, &new_path);
            }
            return Err(e.into());
        }
        let old_path = std::mem::replace(&mut self.path, new_path);
        self.sync_with_path();
        self.label_from_parent();

        info!(
            from = %old_path.display(),
            to = %self.path.display(),
            hash = %self.identity_hash,
            "renamed file"
        );

        if let Some(parent) = self.parent() {
            parent.sort();
        }

        Ok(self)
    }

    /// Moves the file into `new_directory`, keeping its name.
    ///
    /// The model detaches from its parent first and is not attached anywhere afterwards; whoever owns the
    /// target directory adopts it via [`attach`](Self::attach).
    pub fn move_to(&mut self, new_directory: impl AsRef<Path>) -> Result<&mut Self, FileError> {
        self.detach();

        let new_path = new_directory.as_ref().join(&self.name);
        fs::rename(&self.path, &new_path)?;
        let old_path = std::mem::replace(&mut self.path, new_path);
        self.sync_with_path();

        info!(
            from = %old_path.display(),
            to = %self.path.display(),
            hash = %self.identity_hash,
            "moved file"
        );

        Ok(self)
    }

    /// Reacts to a filesystem event reported by the watch service.
    ///
    /// Events for other paths are ignored. A `change` re-reads the file and tells the parent. An `unlink`
    /// tells the parent and then removes the model.
    pub fn handle_event(&mut self, path: &Path, kind: EventKind) -> Result<(), FileError> {
        if self.is_scope(path).is_none() {
            return Ok(());
        }

        match kind {
            EventKind::Change => {
                self.update()?;
                info!(path = %self.path.display(), "file changed remotely");
                if let Some(parent) = self.parent() {
                    parent.notify_change(&format!("File {} has been changed remotely.", self.name));
                }
            }
            EventKind::Unlink => {
                info!(path = %self.path.display(), "file removed remotely");
                if let Some(parent) = self.parent() {
                    parent.notify_change(&format!("File {} has been removed.", self.name));
                }
                self.remove();
            }
            EventKind::Add => {}
        }

        Ok(())
    }

    /// Returns `self` if `path` is this file's path.
    pub fn is_scope(&self, path: &Path) -> Option<&Self> {
        (path == self.path).then_some(self)
    }

    /// Moves the file to the trash and drops it from its parent.
    ///
    /// Trashing is best-effort: a file that is already gone is skipped, and a failure is logged but does not
    /// stop the model from leaving the tree. Returns what the parent's removal returned, or `false` if the
    /// model was already detached.
    pub fn remove(&mut self) -> bool {
        if self.path.exists() {
            if let Err(e) = self.options.trash.trash(&self.path) {
                warn!(path = %self.path.display(), error = %e, "failed to move file to trash");
            }
        }

        let removed = match self.parent() {
            Some(parent) => parent.remove(self),
            None => false,
        };
        self.parent = None;

        removed
    }

    /// Drops the model from its parent without touching the disk.
    pub fn detach(&mut self) -> &mut Self {
        if let Some(parent) = self.parent() {
            parent.remove(self);
        }
        self.parent = None;
        self
    }

    /// Runs a two-phase search (name, then lower-cased content). See [`crate::search`].
    pub fn search(&self, terms: &[SearchTerm]) -> Result<bool, FileError> {
        Ok(search::evaluate(&self.name, terms, || {
            fs::read_to_string(&self.path)
        })?)
    }

    pub fn is_directory(&self) -> bool {
        false
    }

    pub fn is_file(&self) -> bool {
        true
    }

    /// A file contains nothing.
    pub fn contains(&self, _path: &Path) -> bool {
        false
    }

    /// A file holds no directories.
    pub fn find_directory(&self, _query: &Identity) -> Option<Rc<dyn DirectoryModel>> {
        None
    }

    fn sync_with_path(&mut self) {
        self.name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.extension = self
            .path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.directory_name = self
            .path
            .parent()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.identity_hash = IdentityHash::of(&self.path);
    }

    /// A real parent directory supplies the display label; pseudo-roots and detached models keep the name of
    /// the directory on disk.
    fn label_from_parent(&mut self) {
        if let Some(parent) = self.parent().filter(|parent| parent.is_directory()) {
            self.directory_name = parent.name();
        }
    }
}

fn make_snippet(content: &str, length: usize) -> String {
    match content.char_indices().nth(length) {
        Some((cut, _)) => format!("{}…", &content[..cut]),
        None => content.to_string(),
    }
}

fn epoch_millis(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(since) => i64::try_from(since.as_millis()).unwrap_or(i64::MAX),
        Err(e) => -i64::try_from(e.duration().as_millis()).unwrap_or(i64::MAX),
    }
}
