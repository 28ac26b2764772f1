use crate::trash::{Trash, TrashDir};
use std::fmt;
use std::rc::Rc;

/// Configuration shared by file models.
///
/// Every model keeps its own copy; the trash handle is reference-counted, so cloning is cheap.
#[derive(Clone)]
pub struct FileOptions {
    /// Number of characters kept in a model's preview snippet.
    ///
    /// Longer content is cut and suffixed with `…`. Defaults to `50`.
    pub snippet_length: usize,

    /// Extension appended on rename when the new name has no recognized one, without the dot.
    ///
    /// Defaults to `"md"`.
    pub default_extension: String,

    /// Document extensions that a rename keeps as they are.
    pub extensions: Vec<String>,

    /// Where removed files go.
    ///
    /// Defaults to [`TrashDir::default_location`].
    pub trash: Rc<dyn Trash>,
}

impl Default for FileOptions {
    fn default() -> Self {
        Self {
            snippet_length: 50,
            default_extension: "md".to_string(),
            extensions: ["md", "markdown", "txt", "rmd", "qmd"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            trash: Rc::new(TrashDir::default_location()),
        }
    }
}

impl FileOptions {
    pub fn with_trash(mut self, trash: Rc<dyn Trash>) -> Self {
        self.trash = trash;
        self
    }
}

impl fmt::Debug for FileOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileOptions")
            .field("snippet_length", &self.snippet_length)
            .field("default_extension", &self.default_extension)
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}
