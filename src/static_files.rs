//! Static file resolution and serving.
//!
//! A request path that no route claims is joined onto the static root and
//! looked up on disk in two asynchronous steps, an existence check and then a
//! whole-file read, so a slow disk never stalls the accept loop.
//!
//! | Outcome | Status | Body |
//! |---|---|---|
//! | file (or directory index) read, extension known | 200 | file bytes, verbatim |
//! | nothing at the path, or no `index.html` in the root for a directory | 400 | "`<path>` does not exist" |
//! | read failed | 500 | the I/O error text |
//! | extension not in the content-type table | 500 | "unknown file extension: `<ext>`" |
//!
//! Any directory, the root or below it, answers with the root's `index.html`.
//!
//! The path is joined and `.`/`..` segments are collapsed lexically, without
//! touching the disk. Nothing stops `..` from climbing above the root, so a
//! request can name files outside the static root.

use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf};

use http::StatusCode;
use tracing::{debug, warn};

use crate::content_type::{extension_of, ContentTypeTable};
use crate::response::Response;

/// File under the static root served when a request resolves to a directory.
pub const INDEX_FILE: &str = "index.html";

/// What a request path turned out to be on disk.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResolvedFile {
    /// A regular file. `content_type` is `None` when its extension is not in
    /// the table; that is only reported after the read succeeds.
    RegularFile { path: PathBuf, content_type: Option<String> },
    /// The path was a directory; the root's index file answers for it.
    DirectoryFallback { index_path: PathBuf, content_type: Option<String> },
    /// Nothing to serve. `attempted` is the last path checked.
    NotFound { attempted: PathBuf },
}

/// Why a static request did not produce a 200.
#[derive(Debug)]
pub enum ServeError {
    NotFound(PathBuf),
    Read(io::Error),
    UnknownContentType(String),
}

impl ServeError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::BAD_REQUEST,
            Self::Read(_) | Self::UnknownContentType(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Plain-text diagnostic response, labelled with `plain_text`.
    pub fn into_response_with(self, plain_text: &str) -> Response {
        Response::builder()
            .status(self.status())
            .bytes(plain_text, self.to_string())
    }
}

impl fmt::Display for ServeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(path)          => write!(f, "{} does not exist", path.display()),
            Self::Read(e)                 => write!(f, "{e}"),
            Self::UnknownContentType(ext) => write!(f, "unknown file extension: {ext}"),
        }
    }
}

impl std::error::Error for ServeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read(e) => Some(e),
            _ => None,
        }
    }
}

/// Serves files from one directory.
#[derive(Clone, Debug)]
pub struct StaticFiles {
    root: PathBuf,
    content_types: ContentTypeTable,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>, content_types: ContentTypeTable) -> Self {
        Self { root: root.into(), content_types }
    }

    pub fn root(&self) -> &Path { &self.root }
    pub fn content_types(&self) -> &ContentTypeTable { &self.content_types }

    /// The on-disk name for a request path: the path appended to the root,
    /// with `.` and `..` collapsed.
    pub fn file_name_for(&self, url_path: &str) -> PathBuf {
        // A leading `/` would make `join` discard the root entirely.
        normalize(&self.root.join(url_path.trim_start_matches('/')))
    }

    /// Decides which file, if any, answers for `file_name`.
    pub async fn resolve(&self, file_name: &Path) -> ResolvedFile {
        let meta = match tokio::fs::metadata(file_name).await {
            Ok(meta) => meta,
            Err(_) => return ResolvedFile::NotFound { attempted: file_name.to_owned() },
        };

        if !meta.is_dir() {
            return ResolvedFile::RegularFile {
                path: file_name.to_owned(),
                content_type: self.content_type_of(file_name),
            };
        }

        let index_path = self.root.join(INDEX_FILE);
        if tokio::fs::metadata(&index_path).await.is_ok() {
            let content_type = self.content_type_of(&index_path);
            ResolvedFile::DirectoryFallback { index_path, content_type }
        } else {
            ResolvedFile::NotFound { attempted: index_path }
        }
    }

    /// Reads a resolved file and builds its 200 response.
    pub async fn load(&self, resolved: ResolvedFile) -> Result<Response, ServeError> {
        let (path, content_type) = match resolved {
            ResolvedFile::RegularFile { path, content_type } => (path, content_type),
            ResolvedFile::DirectoryFallback { index_path, content_type } => (index_path, content_type),
            ResolvedFile::NotFound { attempted } => return Err(ServeError::NotFound(attempted)),
        };

        let data = tokio::fs::read(&path).await.map_err(ServeError::Read)?;
        let content_type = content_type
            .ok_or_else(|| ServeError::UnknownContentType(extension_of(&path)))?;

        debug!(path = %path.display(), bytes = data.len(), "serving file");
        Ok(Response::bytes(&content_type, data))
    }

    /// Resolves, reads and answers one request path.
    pub async fn serve(&self, url_path: &str) -> Response {
        let file_name = self.file_name_for(url_path);
        let resolved = self.resolve(&file_name).await;
        match self.load(resolved).await {
            Ok(response) => response,
            Err(err) => {
                match &err {
                    ServeError::NotFound(path) => {
                        debug!(path = %path.display(), "requested file does not exist");
                    }
                    ServeError::Read(e) => {
                        warn!(file = %file_name.display(), error = %e, "failed to read file");
                    }
                    ServeError::UnknownContentType(ext) => {
                        warn!(file = %file_name.display(), extension = %ext, "no content type for extension");
                    }
                }
                err.into_response_with(self.content_types.plain_text())
            }
        }
    }

    fn content_type_of(&self, path: &Path) -> Option<String> {
        self.content_types.lookup_path(path).map(str::to_owned)
    }
}

/// Collapses `.` and `..` segments without consulting the filesystem.
/// `..` at an absolute root stays at the root; leading `..` of a relative
/// path are kept.
fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            _ => parts.push(component),
        }
    }
    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> (tempfile::TempDir, StaticFiles) {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("index.html"), "<h1>home</h1>").expect("write");
        std::fs::write(dir.path().join("style.css"), "body{}").expect("write");
        std::fs::write(dir.path().join("data.unknownext"), "??").expect("write");
        std::fs::create_dir(dir.path().join("docs")).expect("mkdir");
        std::fs::write(dir.path().join("docs/index.html"), "<h1>docs</h1>").expect("write");
        std::fs::create_dir(dir.path().join("empty")).expect("mkdir");
        let files = StaticFiles::new(dir.path(), ContentTypeTable::default());
        (dir, files)
    }

    #[test]
    fn file_name_is_root_plus_path() {
        let files = StaticFiles::new("/srv/www", ContentTypeTable::default());
        assert_eq!(files.file_name_for("/css/site.css"), Path::new("/srv/www/css/site.css"));
        assert_eq!(files.file_name_for("/"), Path::new("/srv/www"));
        assert_eq!(files.file_name_for("/../etc/passwd"), Path::new("/srv/etc/passwd"));
        assert_eq!(files.file_name_for("/a/./b/../c.txt"), Path::new("/srv/www/a/c.txt"));
    }

    #[test]
    fn normalize_is_lexical() {
        assert_eq!(normalize(Path::new("/../../x")), Path::new("/x"));
        assert_eq!(normalize(Path::new("public/../x")), Path::new("x"));
        assert_eq!(normalize(Path::new("../up/./y")), Path::new("../up/y"));
        assert_eq!(normalize(Path::new("a/..")), Path::new("."));
    }

    #[tokio::test]
    async fn parent_segments_through_missing_directories_still_resolve() {
        let (_dir, files) = site();
        let res = files.serve("/nope/../index.html").await;
        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.body(), b"<h1>home</h1>");
    }

    #[tokio::test]
    async fn regular_file_carries_its_content_type() {
        let (_dir, files) = site();
        let name = files.file_name_for("/style.css");
        assert_eq!(
            files.resolve(&name).await,
            ResolvedFile::RegularFile { path: name.clone(), content_type: Some("text/css".into()) },
        );
    }

    #[tokio::test]
    async fn directory_falls_back_to_the_root_index() {
        let (dir, files) = site();
        let name = files.file_name_for("/docs");
        assert_eq!(
            files.resolve(&name).await,
            ResolvedFile::DirectoryFallback {
                index_path: dir.path().join(INDEX_FILE),
                content_type: Some("text/html".into()),
            },
        );
    }

    #[tokio::test]
    async fn subdirectory_without_index_serves_the_root_index() {
        let (_dir, files) = site();
        let res = files.serve("/empty").await;
        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.content_type(), Some("text/html"));
        assert_eq!(res.body(), b"<h1>home</h1>");
    }

    #[tokio::test]
    async fn directory_is_not_found_when_the_root_has_no_index() {
        let (dir, files) = site();
        std::fs::remove_file(dir.path().join(INDEX_FILE)).expect("remove");
        let name = files.file_name_for("/docs");
        assert_eq!(
            files.resolve(&name).await,
            ResolvedFile::NotFound { attempted: dir.path().join(INDEX_FILE) },
        );
        let res = files.serve("/docs").await;
        assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
        assert!(String::from_utf8_lossy(res.body()).contains("index.html"));
    }

    #[tokio::test]
    async fn missing_file_is_400_naming_the_path() {
        let (_dir, files) = site();
        let res = files.serve("/does-not-exist.xyz").await;
        assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(res.content_type(), Some("text/plain"));
        let body = String::from_utf8_lossy(res.body());
        assert!(body.contains("does-not-exist.xyz"), "{body}");
    }

    #[tokio::test]
    async fn unknown_extension_is_500() {
        let (_dir, files) = site();
        let res = files.serve("/data.unknownext").await;
        assert_eq!(res.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(res.body(), b"unknown file extension: .unknownext");
        assert_eq!(res.content_type(), Some("text/plain"));
    }

    #[tokio::test]
    async fn root_serves_index_html() {
        let (_dir, files) = site();
        let res = files.serve("/").await;
        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.content_type(), Some("text/html"));
        assert_eq!(res.body(), b"<h1>home</h1>");
    }

    #[tokio::test]
    async fn index_that_is_a_directory_is_a_read_error() {
        let (dir, files) = site();
        std::fs::remove_file(dir.path().join(INDEX_FILE)).expect("remove");
        std::fs::create_dir(dir.path().join(INDEX_FILE)).expect("mkdir");
        let res = files.serve("/docs").await;
        assert_eq!(res.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!res.body().is_empty());
    }

    #[test]
    fn error_statuses() {
        assert_eq!(ServeError::NotFound("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ServeError::Read(io::Error::other("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR,
        );
        let res = ServeError::Read(io::Error::other("boom")).into_response_with("text/plain");
        assert_eq!(res.body(), b"boom");
    }
}
