//! Pipeline error types.

use crate::config::ConfigError;
use crate::frontmatter::FrontMatterError;
use crate::render::RenderError;
use std::error::Error as _;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a pipeline run.
///
/// Duplicate output paths are not errors; they surface as
/// [`DropReason::Duplicate`](crate::pipeline::DropReason::Duplicate).
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("streaming not supported: `{}`", .0.display())]
    StreamingUnsupported(PathBuf),

    #[error("failed to render `{}`", path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: RenderError,
    },

    #[error("could not read layout: '{}'", path.display())]
    LayoutNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid front matter in `{}`", path.display())]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },

    #[error("failed to set up template engine")]
    Engine(#[source] RenderError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Message followed by every source in the chain, `: `-separated.
    pub fn report(&self) -> String {
        let mut message = self.to_string();
        let mut source = self.source();
        while let Some(err) = source {
            message.push_str(": ");
            message.push_str(&err.to_string());
            source = err.source();
        }
        message
    }
}
