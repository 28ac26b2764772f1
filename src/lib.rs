//! # quire_core
//!
//! File models for a tree of plain-text notes: lazy disk reads, in-memory edits, path-derived identity, and
//! coordination with a filesystem watcher.
//!
//! ## Features
//!
//! - **Lean file models**: a model keeps path-derived fields, a modification time and a 50-character
//!   snippet. Full content is read from disk on demand and never cached.
//! - **Edit buffer**: unsaved edits live in a buffer with a dirty flag until they are saved.
//! - **Stable identity**: every file is keyed by a deterministic hash of its absolute path.
//! - **Rename and move**: sanitized names, a default `.md` extension, and suppression of self-caused
//!   watcher events.
//! - **Remote changes**: external edits and deletions reach the model as events and flow into the tree.
//! - **Search**: multi-term AND/OR search over file name and content.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quire_core::directory::DirectoryModel;
//! use quire_core::file::FileModel;
//! use quire_core::search::parse_query;
//! use std::rc::Rc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # fn parent() -> Rc<dyn DirectoryModel> { unimplemented!() }
//! let parent: Rc<dyn DirectoryModel> = parent();
//!
//! // Creates the file if it does not exist yet
//! let mut note = FileModel::open(&parent, "/path/to/notes/ideas.md")?;
//! println!("{} ({})", note.name(), note.snippet());
//!
//! // Edit, then save
//! note.set_content("# Ideas\n\nWrite a parser.");
//! assert!(note.is_modified());
//! note.save()?;
//!
//! // Rename within the same directory; "plans" becomes "plans.md"
//! note.rename("plans", None)?;
//!
//! // Search name and content
//! let found = note.search(&parse_query("parser | lexer"))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **[`file`]**: [`FileModel`](file::FileModel), the core of the crate
//! - **[`directory`]**: the [`DirectoryModel`](directory::DirectoryModel) contract a parent fulfils
//! - **[`watcher`]**: the watch-service contract, self-event suppression and a `notify`-backed service
//! - **[`identity`]**: path hashes and identity lookups
//! - **[`search`]**: search terms, the two-phase matcher and the query parser
//! - **[`sanitize`]**: file name cleaning for renames
//! - **[`trash`]**: where removed files go
//! - **[`options`]**: per-model configuration
//! - **[`error`]**: the crate-wide error type
//!
//! ## Watching
//!
//! Models never own a watcher. The application pulls events from a
//! [`NotifyWatchService`](watcher::NotifyWatchService) and dispatches each one to the model whose
//! [`is_scope`](file::FileModel::is_scope) matches:
//!
//! ```rust,no_run
//! use quire_core::QuireResult;
//! use quire_core::file::FileModel;
//! use quire_core::watcher::NotifyWatchService;
//! use std::time::Duration;
//!
//! fn pump(service: &NotifyWatchService, files: &mut [FileModel]) -> QuireResult<()> {
//!     while let Some((path, kind)) = service.next_event(Duration::from_millis(100)) {
//!         if let Some(file) = files.iter_mut().find(|f| f.is_scope(&path).is_some()) {
//!             file.handle_event(&path, kind)?;
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Model operations return [`FileError`](file::FileError). Everything converts into [`QuireError`], so `?`
//! works across module boundaries.

pub mod directory;
pub mod error;
pub mod file;
pub mod identity;
pub mod options;
pub mod sanitize;
pub mod search;
pub mod trash;
pub mod watcher;

/// Re-exports the most commonly used types for convenience.
pub use error::{QuireError, QuireResult};
pub use file::{FileError, FileModel, FileSnapshot};
pub use identity::{Identity, IdentityHash, IdentityQuery};
