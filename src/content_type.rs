//! Extension → MIME type table for served files.

use std::collections::HashMap;
use std::path::Path;

/// Maps a file extension, leading dot included (`".html"`), to the value
/// sent in the `content-type` header.
///
/// Filled at construction time and moved into the server; there is no way
/// to change it while requests are in flight.
#[derive(Clone, Debug)]
pub struct ContentTypeTable {
    types: HashMap<String, String>,
}

impl ContentTypeTable {
    /// A table with no entries at all. Mostly useful for tests.
    pub fn empty() -> Self {
        Self { types: HashMap::new() }
    }

    /// Add (or replace) one mapping. Returns `self` for chaining.
    ///
    /// ```rust
    /// use lightserve::ContentTypeTable;
    ///
    /// let table = ContentTypeTable::default()
    ///     .with(".png", "image/png")
    ///     .with(".svg", "image/svg+xml");
    /// assert_eq!(table.lookup(".png"), Some("image/png"));
    /// ```
    pub fn with(mut self, extension: impl Into<String>, mime: impl Into<String>) -> Self {
        self.types.insert(extension.into(), mime.into());
        self
    }

    /// Exact, case-sensitive lookup by extension.
    pub fn lookup(&self, extension: &str) -> Option<&str> {
        self.types.get(extension).map(String::as_str)
    }

    /// Lookup by the extension of `path`.
    pub fn lookup_path(&self, path: &Path) -> Option<&str> {
        self.lookup(&extension_of(path))
    }

    /// The type used for plain-text diagnostics (the `.txt` entry).
    pub fn plain_text(&self) -> &str {
        self.lookup(".txt").unwrap_or("text/plain")
    }
}

impl Default for ContentTypeTable {
    fn default() -> Self {
        Self::empty()
            .with(".html", "text/html")
            .with(".css", "text/css")
            .with(".js", "application/javascript")
            .with(".json", "application/json")
            .with(".txt", "text/plain")
    }
}

/// Extension of `path` with its leading dot, or `""` when there is none.
pub(crate) fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_covers_web_basics() {
        let table = ContentTypeTable::default();
        assert_eq!(table.lookup(".html"), Some("text/html"));
        assert_eq!(table.lookup(".css"), Some("text/css"));
        assert_eq!(table.lookup(".js"), Some("application/javascript"));
        assert_eq!(table.lookup(".json"), Some("application/json"));
        assert_eq!(table.lookup(".txt"), Some("text/plain"));
        assert_eq!(table.lookup(".png"), None);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let table = ContentTypeTable::default();
        assert_eq!(table.lookup_path(Path::new("INDEX.HTML")), None);
        assert_eq!(table.lookup_path(Path::new("index.html")), Some("text/html"));
    }

    #[test]
    fn files_without_extension_have_none() {
        let table = ContentTypeTable::default();
        assert_eq!(extension_of(Path::new("Makefile")), "");
        assert_eq!(table.lookup_path(Path::new("public/Makefile")), None);
    }

    #[test]
    fn plain_text_falls_back_when_txt_is_missing() {
        assert_eq!(ContentTypeTable::default().plain_text(), "text/plain");
        assert_eq!(ContentTypeTable::empty().plain_text(), "text/plain");
        let custom = ContentTypeTable::empty().with(".txt", "text/plain; charset=utf-8");
        assert_eq!(custom.plain_text(), "text/plain; charset=utf-8");
    }
}
