//! Site configuration management for `sitegen.toml`.
//!
//! # Sections
//!
//! | Section       | Purpose                                          |
//! |---------------|--------------------------------------------------|
//! | `[build]`     | Source and output directories for the CLI        |
//! | `[pipeline]`  | Url policy, layouts, patterns, slug, global data |
//!
//! # Example
//!
//! ```toml
//! [build]
//! source = "src/site"
//! output = "dest"
//!
//! [pipeline]
//! default_layout = "base.tera"
//! layout_path = "src/layouts"
//!
//! [pipeline.data]
//! site_name = "My Blog"
//! ```

mod build;
pub mod defaults;
mod error;
mod pipeline;

pub use build::BuildConfig;
pub use error::ConfigError;
pub use pipeline::{PipelineConfig, ResolvedConfig, SlugConfig, SlugMode};

use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing sitegen.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Per-item pipeline settings
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: SiteConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let mut config = Self::from_str(&content)?;
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    /// Re-anchor every relative directory at `root`.
    pub fn set_root(&mut self, root: &Path) {
        for dir in [&mut self.build.source, &mut self.build.output, &mut self.pipeline.layout_path] {
            if dir.is_relative() {
                *dir = root.join(&*dir);
            }
        }
        if let Some(dir) = self.pipeline.template_dir.as_mut()
            && dir.is_relative()
        {
            *dir = root.join(&*dir);
        }
    }

    /// Check cross-field constraints that serde can't express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.build.source == self.build.output {
            return Err(ConfigError::Validation(format!(
                "[build] source and output are the same directory: {}",
                self.build.source.display()
            )));
        }
        if self.build.output.starts_with(&self.build.source) {
            return Err(ConfigError::Validation(format!(
                "[build] output `{}` is inside source `{}`",
                self.build.output.display(),
                self.build.source.display()
            )));
        }
        Ok(())
    }
}
