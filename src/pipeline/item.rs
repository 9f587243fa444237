//! Content items flowing through the pipeline.

use super::RouteData;
use std::borrow::Cow;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Body of an item.
pub enum Contents {
    /// Nothing was read (e.g. a directory entry).
    Null,
    /// Fully materialized bytes.
    Buffer(Vec<u8>),
    /// A live byte stream. The pipeline refuses these.
    Stream(Box<dyn Read + Send>),
}

impl fmt::Debug for Contents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Buffer(bytes) => write!(f, "Buffer({} bytes)", bytes.len()),
            Self::Stream(_) => f.write_str("Stream"),
        }
    }
}

/// How an item is rendered, decided by the first matching pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Markdown,
    Template,
    Html,
}

#[derive(Debug)]
pub struct ContentItem {
    /// Source base directory.
    pub base: PathBuf,
    /// Path relative to `base`. Source-relative on input, output-relative
    /// once the item is emitted.
    pub relative: PathBuf,
    pub contents: Contents,
    /// Data layer. Upstream stages may pre-fill it, e.g. `relative_path`.
    pub data: RouteData,
    /// Set once classified.
    pub kind: Option<ContentKind>,
}

impl ContentItem {
    pub fn new(base: impl Into<PathBuf>, relative: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        Self::with_contents(base, relative, Contents::Buffer(bytes))
    }

    pub fn with_contents(
        base: impl Into<PathBuf>,
        relative: impl Into<PathBuf>,
        contents: Contents,
    ) -> Self {
        Self {
            base: base.into(),
            relative: relative.into(),
            contents,
            data: RouteData::default(),
            kind: None,
        }
    }

    pub fn with_data(mut self, data: RouteData) -> Self {
        self.data = data;
        self
    }

    /// Absolute path: `base` joined with `relative`.
    pub fn path(&self) -> PathBuf {
        self.base.join(&self.relative)
    }

    pub fn relative_str(&self) -> Cow<'_, str> {
        path_str(&self.relative)
    }

    /// Buffered bytes, `None` for null or streamed contents.
    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.contents {
            Contents::Buffer(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Buffered contents as text, invalid UTF-8 replaced.
    pub fn text(&self) -> Option<Cow<'_, str>> {
        self.bytes().map(String::from_utf8_lossy)
    }
}

/// Path as a `/`-separated string.
pub(crate) fn path_str(path: &Path) -> Cow<'_, str> {
    let text = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        text
    } else {
        Cow::Owned(text.replace(std::path::MAIN_SEPARATOR, "/"))
    }
}
