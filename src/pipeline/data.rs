//! Route data: the per-item data layer templates and layouts see.
//!
//! Built by layering, later layers winning key-for-key and nested maps
//! merging recursively:
//!
//! ```text
//! [pipeline.data]  <  computed route fields  <  upstream item data  <  front matter
//! ```
//!
//! # Computed fields
//!
//! | Key | Example |
//! |-----|---------|
//! | `base_path` | `/` |
//! | `relative_path` | `posts/hello/index.html` |
//! | `path` | `/posts/hello/index.html` |
//! | `url_path` | `/posts/hello/` (pretty) or `/posts/hello.html` |
//! | `src_base_path` | `/site/src` |
//! | `src_relative_path` | `posts/hello.md` |
//! | `src_path` | `/site/src/posts/hello.md` |
//! | `contents` | `""`, the rendered body once a layout runs |
//! | `draft` | `false` |
//! | `layout` | default layout name or `false` |

use super::item::{ContentItem, Contents, path_str};
use crate::config::ResolvedConfig;
use crate::error::PipelineError;
use crate::frontmatter;
use crate::utils::slug::{directory_url, join_url, output_relative_path};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteData(Map<String, Value>);

impl RouteData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
    }

    /// Output-relative path, possibly set upstream before the pipeline runs.
    pub fn relative_path(&self) -> Option<&str> {
        self.str_field("relative_path")
    }

    pub fn src_relative_path(&self) -> Option<&str> {
        self.str_field("src_relative_path")
    }

    pub fn url_path(&self) -> Option<&str> {
        self.str_field("url_path")
    }

    /// Layout name; `false`, `null` and `""` mean no layout.
    pub fn layout(&self) -> Option<&str> {
        self.str_field("layout")
    }

    pub fn is_draft(&self) -> bool {
        self.get("draft").is_some_and(is_truthy)
    }

    pub fn set_contents(&mut self, contents: String) {
        self.0.insert("contents".into(), Value::String(contents));
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merge `layer` over `self`.
    pub fn merge(&mut self, layer: Map<String, Value>) {
        merge_maps(&mut self.0, layer);
    }
}

impl From<Map<String, Value>> for RouteData {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Loose truthiness: `false`, `null`, `0`, `""` are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Recursive merge: maps merge per key, anything else is replaced.
fn merge_maps(target: &mut Map<String, Value>, layer: Map<String, Value>) {
    for (key, value) in layer {
        match value {
            Value::Object(incoming) => match target.get_mut(&key) {
                Some(Value::Object(existing)) => merge_maps(existing, incoming),
                _ => {
                    target.insert(key, Value::Object(incoming));
                }
            },
            value => {
                target.insert(key, value);
            }
        }
    }
}

/// Parse front matter, compute route fields and merge all data layers.
///
/// Replaces the item's contents with the stripped body and its relative path
/// with the output-relative path.
pub(crate) fn merge_route_data(
    item: &mut ContentItem,
    config: &ResolvedConfig,
) -> Result<(), PipelineError> {
    let source_path = item.path();
    let matter = {
        let text = item.text().unwrap_or_default();
        frontmatter::split(&text).map_err(|source| PipelineError::FrontMatter {
            path: source_path.clone(),
            source,
        })?
    };

    let existing = std::mem::take(&mut item.data);
    let relative = match existing.relative_path() {
        Some(relative) => relative.to_owned(),
        None => output_relative_path(&item.relative, config.slug.as_ref(), config.pretty_urls),
    };
    let path = join_url(&config.base_path, &relative);
    let url_path = if config.pretty_urls {
        directory_url(&path)
    } else {
        path.clone()
    };
    let layout = config
        .default_layout
        .as_deref()
        .map_or(Value::Bool(false), Value::from);

    let computed = json!({
        "base_path": config.base_path,
        "relative_path": relative,
        "path": path,
        "url_path": url_path,
        "src_base_path": path_str(&item.base),
        "src_relative_path": item.relative_str(),
        "src_path": path_str(&source_path),
        "contents": "",
        "draft": false,
        "layout": layout,
    });

    let mut data = RouteData::from(config.data.clone());
    if let Value::Object(computed) = computed {
        data.merge(computed);
    }
    data.merge(existing.into_map());
    data.merge(matter.data);

    item.data = data;
    item.contents = Contents::Buffer(matter.body.into_bytes());
    item.relative = PathBuf::from(relative.trim_start_matches('/'));
    Ok(())
}
