//! Content classification by path pattern.

use super::ContentKind;
use regex::Regex;

/// Classification patterns, tested markdown → template → html.
#[derive(Debug, Clone)]
pub struct Matchers {
    pub markdown: Regex,
    pub template: Regex,
    pub html: Regex,
}

impl Matchers {
    /// First matching kind, `None` when no pattern matches.
    pub fn classify(&self, relative: &str) -> Option<ContentKind> {
        if self.markdown.is_match(relative) {
            Some(ContentKind::Markdown)
        } else if self.template.is_match(relative) {
            Some(ContentKind::Template)
        } else if self.html.is_match(relative) {
            Some(ContentKind::Html)
        } else {
            None
        }
    }
}
