//! Rendering engines.
//!
//! The pipeline talks to three narrow contracts, each swappable:
//!
//! | Trait | Default | Role |
//! |-------|---------|------|
//! | [`CodeHighlighter`] | [`SyntectHighlighter`] | fenced code → highlighted html |
//! | [`MarkdownRenderer`] | [`PulldownMarkdown`] | markdown → html, code via the highlighter |
//! | [`TemplateEngine`] | [`TeraEngine`] | template source + data → html, `markdown` filter |
//!
//! Engines are wired together when the [`Renderer`] is built and never touch
//! process-wide state, so two pipelines can run with different engines.

mod highlight;
mod markdown;
mod template;

pub use highlight::SyntectHighlighter;
pub use markdown::PulldownMarkdown;
pub use template::TeraEngine;

use crate::pipeline::RouteData;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template error")]
    Template(#[from] tera::Error),

    #[error("syntax highlighting failed")]
    Highlight(#[from] syntect::Error),

    #[error("{0}")]
    Other(String),
}

/// Turns a block of source code into an html fragment.
pub trait CodeHighlighter: Send + Sync {
    /// `lang` is the fence info of the block, if any.
    fn render_code(&self, code: &str, lang: Option<&str>) -> Result<String, RenderError>;
}

pub trait MarkdownRenderer: Send + Sync {
    fn render_markdown(&self, text: &str) -> Result<String, RenderError>;
}

pub trait TemplateEngine {
    /// Render `source` against `data`.
    ///
    /// `origin` names the file the source came from, for diagnostics and
    /// relative lookups.
    fn render_template(
        &mut self,
        source: &str,
        data: &RouteData,
        origin: &Path,
    ) -> Result<String, RenderError>;
}

/// The engines one pipeline renders with.
pub struct Renderer {
    highlighter: Arc<dyn CodeHighlighter>,
    markdown: Arc<dyn MarkdownRenderer>,
    templates: Box<dyn TemplateEngine>,
}

impl Renderer {
    pub fn new(
        highlighter: Arc<dyn CodeHighlighter>,
        markdown: Arc<dyn MarkdownRenderer>,
        templates: Box<dyn TemplateEngine>,
    ) -> Self {
        Self {
            highlighter,
            markdown,
            templates,
        }
    }

    /// Default engines: syntect → pulldown-cmark → tera.
    pub fn with_defaults(template_dir: Option<&Path>) -> Result<Self, RenderError> {
        let highlighter: Arc<dyn CodeHighlighter> = Arc::new(SyntectHighlighter::new());
        let markdown: Arc<dyn MarkdownRenderer> =
            Arc::new(PulldownMarkdown::new(Arc::clone(&highlighter)));
        let templates = TeraEngine::new(template_dir, Arc::clone(&markdown))?;
        Ok(Self::new(highlighter, markdown, Box::new(templates)))
    }

    pub fn render_code(&self, code: &str, lang: Option<&str>) -> Result<String, RenderError> {
        self.highlighter.render_code(code, lang)
    }

    pub fn render_markdown(&self, text: &str) -> Result<String, RenderError> {
        self.markdown.render_markdown(text)
    }

    pub fn render_template(
        &mut self,
        source: &str,
        data: &RouteData,
        origin: &Path,
    ) -> Result<String, RenderError> {
        self.templates.render_template(source, data, origin)
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer").finish_non_exhaustive()
    }
}
