//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn source() -> PathBuf {
        "src/site".into()
    }

    pub fn output() -> PathBuf {
        "dest".into()
    }
}

// ============================================================================
// [pipeline] Section Defaults
// ============================================================================

pub mod pipeline {
    use std::path::PathBuf;

    pub fn base_path() -> String {
        "/".into()
    }

    pub fn layout_path() -> PathBuf {
        "layouts".into()
    }

    pub fn regexp_markdown() -> String {
        r"(?i)\.(md|markdown)$".into()
    }

    pub fn regexp_template() -> String {
        r"(?i)\.tera$".into()
    }

    pub fn regexp_html() -> String {
        r"(?i)\.html$".into()
    }

    pub mod slug {
        use crate::config::SlugMode;

        pub fn mode() -> SlugMode {
            SlugMode::default()
        }

        pub fn replacement() -> String {
            "-".into()
        }

        /// Leading dots are stripped so `.hidden` doesn't become a dotfile url.
        pub fn remove() -> Option<String> {
            Some(r"^\.".into())
        }
    }
}
