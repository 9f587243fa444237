//! `[pipeline]` section configuration.
//!
//! Everything the per-item transformation needs: url policy, classification
//! patterns, slug rules, layouts and the global data layer.

use super::defaults;
use super::error::ConfigError;
use crate::pipeline::Matchers;
use crate::utils::slug::SlugRules;
use educe::Educe;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

// ============================================================================
// Enums
// ============================================================================

/// Character set kept by the slugifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlugMode {
    /// Unreserved URI characters only, lowercased (default).
    #[default]
    Rfc3986,
    /// Keeps punctuation that reads well in urls and preserves case.
    Pretty,
}

// ============================================================================
// Slug
// ============================================================================

/// `[pipeline.slug]` - how path segments are turned into url slugs.
///
/// # Example
/// ```toml
/// [pipeline.slug]
/// mode = "rfc3986"
/// replacement = "_"
/// remove = "(?i)[ao]"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct SlugConfig {
    #[serde(default = "defaults::pipeline::slug::mode")]
    #[educe(Default = defaults::pipeline::slug::mode())]
    pub mode: SlugMode,

    /// Replaces runs of whitespace.
    #[serde(default = "defaults::pipeline::slug::replacement")]
    #[educe(Default = defaults::pipeline::slug::replacement())]
    pub replacement: String,

    /// Pattern stripped from each segment before transliteration.
    #[serde(default = "defaults::pipeline::slug::remove")]
    #[educe(Default = defaults::pipeline::slug::remove())]
    pub remove: Option<String>,

    /// Overrides the mode's lowercasing behaviour.
    #[serde(default)]
    pub lower: Option<bool>,
}

// ============================================================================
// PipelineConfig
// ============================================================================

/// `[pipeline]` section in sitegen.toml.
///
/// # Example
/// ```toml
/// [pipeline]
/// base_path = "/blog"
/// default_layout = "base.tera"
/// layout_path = "src/layouts"
/// pretty_urls = true
///
/// [pipeline.data]
/// site_name = "My Blog"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Prefix of every computed `path`.
    #[serde(default = "defaults::pipeline::base_path")]
    #[educe(Default = defaults::pipeline::base_path())]
    pub base_path: String,

    /// Global data layer, lowest precedence.
    #[serde(default)]
    pub data: Map<String, Value>,

    /// Layout used when an item doesn't name one.
    #[serde(default)]
    pub default_layout: Option<String>,

    /// Layout directory, absolute or relative to the working directory.
    #[serde(default = "defaults::pipeline::layout_path")]
    #[educe(Default = defaults::pipeline::layout_path())]
    pub layout_path: PathBuf,

    /// Templates available to `include`/`extends`, loaded up front.
    #[serde(default)]
    pub template_dir: Option<PathBuf>,

    /// Forward unclassified items unchanged instead of dropping them.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub pass_through: bool,

    /// `name` → `name/index.html` instead of `name.html`.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub pretty_urls: bool,

    #[serde(default = "defaults::pipeline::regexp_markdown")]
    #[educe(Default = defaults::pipeline::regexp_markdown())]
    pub regexp_markdown: String,

    #[serde(default = "defaults::pipeline::regexp_template")]
    #[educe(Default = defaults::pipeline::regexp_template())]
    pub regexp_template: String,

    #[serde(default = "defaults::pipeline::regexp_html")]
    #[educe(Default = defaults::pipeline::regexp_html())]
    pub regexp_html: String,

    /// Slugify output path segments.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub slugify: bool,

    #[serde(default)]
    pub slug: SlugConfig,

    /// Abort the run on the first render or layout failure.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub fail_fast: bool,
}

/// Fully resolved, immutable pipeline configuration.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_path: String,
    pub data: Map<String, Value>,
    pub default_layout: Option<String>,
    /// Absolute layout directory.
    pub layout_dir: PathBuf,
    pub template_dir: Option<PathBuf>,
    pub pass_through: bool,
    pub pretty_urls: bool,
    pub matchers: Matchers,
    /// `None` when slugification is disabled.
    pub slug: Option<SlugRules>,
    pub fail_fast: bool,
}

impl PipelineConfig {
    /// Compile patterns and anchor relative directories at the working directory.
    pub fn resolve(&self) -> Result<ResolvedConfig, ConfigError> {
        let cwd = std::env::current_dir().map_err(|err| ConfigError::Io(".".into(), err))?;
        self.resolve_in(&cwd)
    }

    /// Same as [`resolve`](Self::resolve) with an explicit base directory.
    pub fn resolve_in(&self, cwd: &Path) -> Result<ResolvedConfig, ConfigError> {
        if self.base_path.is_empty() {
            return Err(ConfigError::Validation("`base_path` must not be empty".into()));
        }

        let matchers = Matchers {
            markdown: compile("regexp_markdown", &self.regexp_markdown)?,
            template: compile("regexp_template", &self.regexp_template)?,
            html: compile("regexp_html", &self.regexp_html)?,
        };

        let slug = if self.slugify {
            let remove = self
                .slug
                .remove
                .as_deref()
                .map(|pattern| compile("slug.remove", pattern))
                .transpose()?;
            Some(SlugRules {
                mode: self.slug.mode,
                replacement: self.slug.replacement.clone(),
                remove,
                lower: self
                    .slug
                    .lower
                    .unwrap_or(self.slug.mode == SlugMode::Rfc3986),
            })
        } else {
            None
        };

        Ok(ResolvedConfig {
            base_path: self.base_path.clone(),
            data: self.data.clone(),
            default_layout: self.default_layout.clone().filter(|name| !name.is_empty()),
            layout_dir: anchor(cwd, &self.layout_path),
            template_dir: self.template_dir.as_deref().map(|dir| anchor(cwd, dir)),
            pass_through: self.pass_through,
            pretty_urls: self.pretty_urls,
            matchers,
            slug,
            fail_fast: self.fail_fast,
        })
    }
}

fn compile(field: &'static str, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::Regex {
        field,
        pattern: pattern.to_owned(),
        source,
    })
}

fn anchor(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_config_defaults() {
        let config: PipelineConfig = toml::from_str("").unwrap();

        assert_eq!(config.base_path, "/");
        assert!(config.data.is_empty());
        assert_eq!(config.default_layout, None);
        assert_eq!(config.layout_path, PathBuf::from("layouts"));
        assert!(config.pass_through);
        assert!(config.pretty_urls);
        assert!(config.slugify);
        assert!(config.fail_fast);
        assert_eq!(config.slug.mode, SlugMode::Rfc3986);
        assert_eq!(config.slug.replacement, "-");
        assert_eq!(config.slug.remove.as_deref(), Some(r"^\."));
    }

    #[test]
    fn test_default_impl_matches_serde_defaults() {
        let parsed: PipelineConfig = toml::from_str("").unwrap();
        let built = PipelineConfig::default();

        assert_eq!(parsed.base_path, built.base_path);
        assert_eq!(parsed.regexp_markdown, built.regexp_markdown);
        assert_eq!(parsed.regexp_template, built.regexp_template);
        assert_eq!(parsed.regexp_html, built.regexp_html);
        assert_eq!(parsed.pass_through, built.pass_through);
        assert_eq!(parsed.slug.remove, built.slug.remove);
    }

    #[test]
    fn test_user_values_override_defaults() {
        let config: PipelineConfig = toml::from_str(
            r#"
            base_path = "/blog"
            pretty_urls = false
            default_layout = "base.tera"

            [data]
            title = "Site"
            tags = ["a", "b"]

            [slug]
            mode = "pretty"
            remove = "(?i)[ao]"
            "#,
        )
        .unwrap();

        assert_eq!(config.base_path, "/blog");
        assert!(!config.pretty_urls);
        assert_eq!(config.default_layout.as_deref(), Some("base.tera"));
        assert_eq!(config.data["title"], Value::from("Site"));
        assert_eq!(config.data["tags"], serde_json::json!(["a", "b"]));
        assert_eq!(config.slug.mode, SlugMode::Pretty);
        // Untouched nested fields keep their defaults
        assert_eq!(config.slug.replacement, "-");
        assert!(config.pass_through);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<PipelineConfig, _> = toml::from_str("pretty_url = true");
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_anchors_relative_layout_path() {
        let config = PipelineConfig {
            layout_path: "site/layouts".into(),
            ..Default::default()
        };
        let resolved = config.resolve_in(Path::new("/work")).unwrap();
        assert_eq!(resolved.layout_dir, PathBuf::from("/work/site/layouts"));
    }

    #[test]
    fn test_resolve_keeps_absolute_layout_path() {
        let config = PipelineConfig {
            layout_path: "/srv/layouts".into(),
            ..Default::default()
        };
        let resolved = config.resolve_in(Path::new("/work")).unwrap();
        assert_eq!(resolved.layout_dir, PathBuf::from("/srv/layouts"));
    }

    #[test]
    fn test_resolve_rejects_bad_pattern() {
        let config = PipelineConfig {
            regexp_template: "(".into(),
            ..Default::default()
        };
        let err = config.resolve_in(Path::new("/")).unwrap_err();
        assert!(matches!(err, ConfigError::Regex { field: "regexp_template", .. }));
    }

    #[test]
    fn test_resolve_disabled_slugify() {
        let config = PipelineConfig {
            slugify: false,
            ..Default::default()
        };
        assert!(config.resolve_in(Path::new("/")).unwrap().slug.is_none());
    }

    #[test]
    fn test_resolve_lowercase_follows_mode() {
        let mut config = PipelineConfig::default();
        config.slug.mode = SlugMode::Pretty;
        let rules = config.resolve_in(Path::new("/")).unwrap().slug.unwrap();
        assert!(!rules.lower);

        config.slug.lower = Some(true);
        let rules = config.resolve_in(Path::new("/")).unwrap().slug.unwrap();
        assert!(rules.lower);
    }

    #[test]
    fn test_empty_default_layout_means_none() {
        let config = PipelineConfig {
            default_layout: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(config.resolve_in(Path::new("/")).unwrap().default_layout, None);
    }
}
