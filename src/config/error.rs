//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid pattern for `{field}`: `{pattern}`")]
    Regex {
        field: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_config_error_display() {
        let io_err = ConfigError::Io(
            PathBuf::from("sitegen.toml"),
            Error::new(ErrorKind::NotFound, "file not found"),
        );
        let display = format!("{io_err}");
        assert!(display.contains("IO error"));
        assert!(display.contains("sitegen.toml"));

        let validation_err = ConfigError::Validation("Test validation error".to_string());
        let display = format!("{validation_err}");
        assert!(display.contains("Test validation error"));
    }

    #[test]
    fn test_regex_error_names_field_and_pattern() {
        let source = regex::Regex::new("(unclosed").unwrap_err();
        let err = ConfigError::Regex {
            field: "regexp_markdown",
            pattern: "(unclosed".into(),
            source,
        };
        let display = format!("{err}");
        assert!(display.contains("regexp_markdown"));
        assert!(display.contains("(unclosed"));
    }
}
