//! URL slugification and path utilities.
//!
//! Converts source paths to output-relative page paths.

use crate::config::SlugMode;
use regex::Regex;
use std::borrow::Cow;
use std::path::{Component, Path};

/// Punctuation kept by [`SlugMode::Rfc3986`] besides ASCII alphanumerics
const RFC3986_CHARS: &[char] = &['-', '.', '_', '~'];

/// Punctuation kept by [`SlugMode::Pretty`] besides ASCII alphanumerics
const PRETTY_CHARS: &[char] = &[
    '-', '.', '_', '~', '$', '*', '+', '(', ')', '\'', '"', '!', ':', '@',
];

/// Symbols spelled out as words when the mode doesn't keep them
const SYMBOL_NAMES: &[(char, &str)] = &[
    ('$', "dollar"),
    ('%', "percent"),
    ('&', "and"),
    ('<', "less"),
    ('>', "greater"),
    ('|', "or"),
];

fn symbol_name(c: char) -> Option<&'static str> {
    SYMBOL_NAMES
        .iter()
        .find_map(|&(symbol, name)| (symbol == c).then_some(name))
}

// ============================================================================
// Slugification
// ============================================================================

/// Resolved slug settings.
#[derive(Debug, Clone)]
pub struct SlugRules {
    pub mode: SlugMode,
    pub replacement: String,
    pub remove: Option<Regex>,
    pub lower: bool,
}

impl SlugMode {
    fn keeps(self, c: char) -> bool {
        c.is_ascii_alphanumeric()
            || match self {
                SlugMode::Rfc3986 => RFC3986_CHARS.contains(&c),
                SlugMode::Pretty => PRETTY_CHARS.contains(&c),
            }
    }
}

impl SlugRules {
    /// Slugify a single path segment.
    ///
    /// `remove` runs on the raw text, then the text is transliterated to
    /// ASCII. Whitespace runs collapse to `replacement`, symbols outside the
    /// mode's set become words (`&` → `and`) and other characters outside it
    /// are dropped.
    pub fn slugify(&self, text: &str) -> String {
        let text = match &self.remove {
            Some(re) => re.replace_all(text, ""),
            None => Cow::Borrowed(text),
        };
        let ascii = deunicode::deunicode(&text);

        let mut slug = String::with_capacity(ascii.len());
        let mut gap = false;
        for c in ascii.chars() {
            if c.is_whitespace() {
                gap = !slug.is_empty();
                continue;
            }
            let name = if self.mode.keeps(c) {
                None
            } else {
                match symbol_name(c) {
                    Some(name) => Some(name),
                    None => continue,
                }
            };
            // a spelled-out symbol is a word of its own
            if name.is_some() && !slug.is_empty() {
                gap = true;
            }
            if gap {
                slug.push_str(&self.replacement);
                gap = false;
            }
            match name {
                Some(name) => {
                    slug.push_str(name);
                    gap = true;
                }
                None => slug.push(c),
            }
        }

        if self.lower {
            slug.make_ascii_lowercase();
        }
        slug
    }
}

// ============================================================================
// Content Path Utilities
// ============================================================================

/// Compute the output-relative path of a source item.
///
/// | Source | pretty | relative |
/// |--------|--------|----------|
/// | `posts/hello.md` | yes | `posts/hello/index.html` |
/// | `posts/hello.md` | no | `posts/hello.html` |
/// | `posts/index.md` | yes | `posts/index.html` |
/// | `äöü.md` | yes (slug) | `aou/index.html` |
pub fn output_relative_path(source: &Path, slug: Option<&SlugRules>, pretty_urls: bool) -> String {
    let stem = source.with_extension("");
    let segments: Vec<Cow<'_, str>> = stem
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            Component::ParentDir => Some(Cow::Borrowed("..")),
            _ => None,
        })
        .map(|part| match slug {
            Some(rules) if part != ".." => Cow::Owned(rules.slugify(&part)),
            _ => part,
        })
        .collect();
    let mut url = segments.join("/");

    let is_index = url
        .rsplit('/')
        .next()
        .is_some_and(|last| last.eq_ignore_ascii_case("index"));
    if !pretty_urls || is_index {
        url.push_str(".html");
    } else {
        url.push_str("/index.html");
    }
    url
}

/// Join url paths, collapsing `.`, `..` and repeated slashes.
pub fn join_url(base: &str, relative: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in base.split('/').chain(relative.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    let mut url = segments.join("/");
    if base.starts_with('/') {
        url.insert(0, '/');
    }
    let trailing = relative.ends_with('/') || (relative.is_empty() && base.ends_with('/'));
    if trailing && !url.ends_with('/') {
        url.push('/');
    }
    if url.is_empty() {
        url.push('.');
    }
    url
}

/// Directory part of a url path with a trailing slash.
///
/// `/posts/hello/index.html` → `/posts/hello/`, `/index.html` → `/`
pub fn directory_url(path: &str) -> String {
    match path.rfind('/') {
        Some(0) => "/".into(),
        Some(idx) => format!("{}/", &path[..idx]),
        None => "./".into(),
    }
}
