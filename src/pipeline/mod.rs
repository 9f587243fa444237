//! Per-item transformation pipeline.
//!
//! # Flow
//!
//! ```text
//! item ──► classify ──► merge route data ──► draft? ──► duplicate? ──► render ──► layout ──► emit
//!             │                                 │            │
//!             ▼                                 ▼            ▼
//!      pass through / drop                    drop         drop (logged)
//! ```
//!
//! Items are processed strictly one at a time. The compiled-template cache,
//! the layout cache and the emitted-path index belong to one [`Pipeline`] and
//! are discarded with it.
//!
//! # Example
//!
//! ```ignore
//! let mut pipeline = Pipeline::new(PipelineConfig::default())?;
//! let item = ContentItem::new("src/site", "hello.md", b"hello world".to_vec());
//! if let Outcome::Emitted(page) = pipeline.process(item)? {
//!     assert_eq!(page.relative, Path::new("hello/index.html"));
//! }
//! ```

mod classify;
mod data;
mod guard;
mod item;
mod layout;

pub use classify::Matchers;
pub use data::RouteData;
pub use guard::EmittedPaths;
pub use item::{ContentItem, ContentKind, Contents};
pub use layout::{Layout, LayoutCache};

use crate::config::{PipelineConfig, ResolvedConfig};
use crate::error::PipelineError;
use crate::log;
use crate::render::{
    CodeHighlighter, MarkdownRenderer, PulldownMarkdown, Renderer, SyntectHighlighter,
    TemplateEngine, TeraEngine,
};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

// ============================================================================
// Environment
// ============================================================================

/// Execution environment; only development builds include drafts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    /// Variable read by [`from_env`](Self::from_env).
    pub const VAR: &'static str = "SITEGEN_ENV";

    /// `development` (any case) selects development, anything else production.
    pub fn from_env() -> Self {
        std::env::var(Self::VAR)
            .map(|value| Self::parse(&value))
            .unwrap_or_default()
    }

    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("development") {
            Self::Development
        } else {
            Self::Production
        }
    }

    pub const fn includes_drafts(self) -> bool {
        matches!(self, Self::Development)
    }
}

// ============================================================================
// Outcome
// ============================================================================

/// What happened to one item.
#[derive(Debug)]
pub enum Outcome {
    /// Rendered and claimed its output path.
    Emitted(ContentItem),
    /// Matched no pattern, forwarded untouched.
    PassedThrough(ContentItem),
    Dropped(DropReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// No contents were read.
    Empty,
    /// Matched no pattern and pass-through is off.
    Unclassified,
    Draft,
    /// Another item already claimed the output path.
    Duplicate { source: PathBuf, original: PathBuf },
    /// Rendering failed and `fail_fast` is off.
    Failed,
}

impl Outcome {
    /// The item to forward downstream, if any.
    pub fn into_item(self) -> Option<ContentItem> {
        match self {
            Self::Emitted(item) | Self::PassedThrough(item) => Some(item),
            Self::Dropped(_) => None,
        }
    }
}

// ============================================================================
// Pipeline
// ============================================================================

pub struct Pipeline {
    config: ResolvedConfig,
    environment: Environment,
    renderer: Renderer,
    layouts: LayoutCache,
    emitted: EmittedPaths,
}

impl Pipeline {
    /// Pipeline with the default engines and the environment from
    /// [`Environment::from_env`].
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        Self::builder(config).build()
    }

    pub fn builder(config: PipelineConfig) -> PipelineBuilder {
        PipelineBuilder::new(config)
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn renderer(&mut self) -> &mut Renderer {
        &mut self.renderer
    }

    pub fn emitted(&self) -> &EmittedPaths {
        &self.emitted
    }

    /// Process one item.
    ///
    /// `Err` is fatal to the run; drops, including duplicates, are `Ok`.
    pub fn process(&mut self, mut item: ContentItem) -> Result<Outcome, PipelineError> {
        match item.contents {
            Contents::Null => return Ok(Outcome::Dropped(DropReason::Empty)),
            Contents::Stream(_) => return Err(PipelineError::StreamingUnsupported(item.path())),
            Contents::Buffer(_) => {}
        }

        let kind = self.config.matchers.classify(&item.relative_str());
        let Some(kind) = kind else {
            return Ok(if self.config.pass_through {
                Outcome::PassedThrough(item)
            } else {
                Outcome::Dropped(DropReason::Unclassified)
            });
        };
        item.kind = Some(kind);

        let source = item.relative.clone();
        let source_path = item.path();
        data::merge_route_data(&mut item, &self.config)?;

        if item.data.is_draft() && !self.environment.includes_drafts() {
            return Ok(Outcome::Dropped(DropReason::Draft));
        }

        if let Some(original) = self.emitted.claimant(&item.relative) {
            log!(
                "ssg";
                "{}{} outputs to same url as {}. {}",
                "WARNING: ".red(),
                source.display().to_string().yellow(),
                original.display().to_string().yellow(),
                "Skipping...".red()
            );
            return Ok(Outcome::Dropped(DropReason::Duplicate {
                source,
                original: original.to_path_buf(),
            }));
        }

        match self.render(&mut item, &source_path) {
            Ok(()) => {}
            Err(err) if !self.config.fail_fast => {
                log!("error"; "{}", err.report());
                return Ok(Outcome::Dropped(DropReason::Failed));
            }
            Err(err) => return Err(err),
        }

        self.emitted.claim(item.relative.clone(), source);
        Ok(Outcome::Emitted(item))
    }

    /// Process items in order, returning everything forwarded downstream.
    ///
    /// Stops at the first error; nothing is returned for a failed run.
    pub fn run<I>(&mut self, items: I) -> Result<Vec<ContentItem>, PipelineError>
    where
        I: IntoIterator<Item = ContentItem>,
    {
        let mut forwarded = Vec::new();
        for item in items {
            if let Some(item) = self.process(item)?.into_item() {
                forwarded.push(item);
            }
        }
        Ok(forwarded)
    }

    /// Render the body by kind, then wrap it in its layout.
    fn render(&mut self, item: &mut ContentItem, source_path: &Path) -> Result<(), PipelineError> {
        let body = item.text().unwrap_or_default().into_owned();
        let rendered = match item.kind {
            Some(ContentKind::Markdown) => self.renderer.render_markdown(&body),
            Some(ContentKind::Template) => {
                self.renderer.render_template(&body, &item.data, source_path)
            }
            Some(ContentKind::Html) | None => Ok(body),
        }
        .map_err(|source| PipelineError::Render {
            path: source_path.to_path_buf(),
            source,
        })?;

        let output = match item.data.layout().map(str::to_owned) {
            Some(name) => layout::apply_layout(
                &name,
                rendered,
                &mut item.data,
                &mut self.layouts,
                &mut self.renderer,
            )?,
            None => rendered,
        };
        item.contents = Contents::Buffer(output.into_bytes());
        Ok(())
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("environment", &self.environment)
            .field("layouts", &self.layouts.len())
            .field("emitted", &self.emitted.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Swaps engines or the environment before the pipeline is built.
///
/// Engines left unset are the defaults; a default markdown renderer uses
/// whichever highlighter is configured, and a default template engine gets a
/// `markdown` filter bound to whichever markdown renderer is configured.
pub struct PipelineBuilder {
    config: PipelineConfig,
    environment: Option<Environment>,
    highlighter: Option<Arc<dyn CodeHighlighter>>,
    markdown: Option<Arc<dyn MarkdownRenderer>>,
    templates: Option<Box<dyn TemplateEngine>>,
}

impl PipelineBuilder {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            environment: None,
            highlighter: None,
            markdown: None,
            templates: None,
        }
    }

    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    pub fn highlighter(mut self, highlighter: impl CodeHighlighter + 'static) -> Self {
        self.highlighter = Some(Arc::new(highlighter));
        self
    }

    pub fn markdown(mut self, markdown: impl MarkdownRenderer + 'static) -> Self {
        self.markdown = Some(Arc::new(markdown));
        self
    }

    pub fn templates(mut self, templates: impl TemplateEngine + 'static) -> Self {
        self.templates = Some(Box::new(templates));
        self
    }

    pub fn build(self) -> Result<Pipeline, PipelineError> {
        let config = self.config.resolve()?;

        let highlighter = self
            .highlighter
            .unwrap_or_else(|| Arc::new(SyntectHighlighter::new()));
        let markdown = self
            .markdown
            .unwrap_or_else(|| Arc::new(PulldownMarkdown::new(Arc::clone(&highlighter))));
        let templates: Box<dyn TemplateEngine> = match self.templates {
            Some(templates) => templates,
            None => Box::new(
                TeraEngine::new(config.template_dir.as_deref(), Arc::clone(&markdown))
                    .map_err(PipelineError::Engine)?,
            ),
        };

        Ok(Pipeline {
            layouts: LayoutCache::new(config.layout_dir.clone()),
            renderer: Renderer::new(highlighter, markdown, templates),
            environment: self.environment.unwrap_or_else(Environment::from_env),
            emitted: EmittedPaths::new(),
            config,
        })
    }
}
