//! Sitegen - the page-rendering stage of a static site build.
//!
//! Takes already-discovered source items (markdown, tera templates, html and
//! anything else) and turns them into html pages:
//!
//! - front matter is parsed and layered over global and computed route data
//! - output paths are derived from source paths, slugified and folded into
//!   pretty urls (`about.md` → `about/index.html`)
//! - markdown and templates are rendered, then wrapped in a layout
//! - drafts are skipped outside development, and the first item to claim an
//!   output path wins
//!
//! See [`pipeline::Pipeline`] for the entry point.

pub mod logger;

pub mod config;
pub mod error;
pub mod frontmatter;
pub mod pipeline;
pub mod render;
pub mod utils;

pub use config::{PipelineConfig, SiteConfig};
pub use error::PipelineError;
pub use pipeline::{ContentItem, DropReason, Environment, Outcome, Pipeline, RouteData};
