//! Front matter splitting.
//!
//! A content item may start with a metadata block fenced by `---` (YAML) or
//! `+++` (TOML). The block is parsed into a JSON map and removed from the body.
//!
//! ```text
//! ---
//! title: Foo
//! tags: [a, b]
//! ---
//! body starts here
//! ```

use serde_json::{Map, Value};
use thiserror::Error;

const YAML_FENCE: &str = "---";
/// YAML documents may also be closed with the end-of-document marker
const YAML_END: &str = "...";
const TOML_FENCE: &str = "+++";

#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("invalid YAML front matter")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid TOML front matter")]
    Toml(#[from] toml::de::Error),

    #[error("front matter must be a mapping of keys to values")]
    NotAMap,
}

/// Parsed metadata plus the remaining body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    pub data: Map<String, Value>,
    pub body: String,
}

#[derive(Clone, Copy)]
enum Format {
    Yaml,
    Toml,
}

/// Split `text` into front matter and body.
///
/// Text without an opening fence, or whose fence is never closed, is returned
/// whole as the body with empty data.
pub fn split(text: &str) -> Result<FrontMatter, FrontMatterError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut lines = text.split_inclusive('\n');
    let format = match lines.next().map(|line| line.trim_end()) {
        Some(YAML_FENCE) => Format::Yaml,
        Some(TOML_FENCE) => Format::Toml,
        _ => return Ok(unfenced(text)),
    };

    let block_start = text.find('\n').map_or(text.len(), |idx| idx + 1);
    let mut offset = block_start;
    for line in lines {
        let marker = line.trim_end();
        let closes = match format {
            Format::Yaml => marker == YAML_FENCE || marker == YAML_END,
            Format::Toml => marker == TOML_FENCE,
        };
        if closes {
            let block = &text[block_start..offset];
            let body = &text[offset + line.len()..];
            return Ok(FrontMatter {
                data: parse(block, format)?,
                body: body.to_owned(),
            });
        }
        offset += line.len();
    }

    Ok(unfenced(text))
}

fn unfenced(text: &str) -> FrontMatter {
    FrontMatter {
        data: Map::new(),
        body: text.to_owned(),
    }
}

fn parse(block: &str, format: Format) -> Result<Map<String, Value>, FrontMatterError> {
    if block.trim().is_empty() {
        return Ok(Map::new());
    }
    let value: Value = match format {
        Format::Yaml => serde_yaml::from_str(block)?,
        Format::Toml => toml::from_str(block)?,
    };
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        _ => Err(FrontMatterError::NotAMap),
    }
}
