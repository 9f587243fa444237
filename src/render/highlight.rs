//! Code highlighting with syntect.
//!
//! Output uses css classes rather than inline styles, so a site picks its own
//! theme:
//!
//! ```html
//! <pre><code class="hljs rust"><span class="hljs-source hljs-rust">…</span></code></pre>
//! ```

use super::{CodeHighlighter, RenderError};
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

/// Base class on every `<code>` element, also prefixes token classes.
const BASE_CLASS: &str = "hljs";
const TOKEN_CLASS_PREFIX: &str = "hljs-";

pub struct SyntectHighlighter {
    syntaxes: SyntaxSet,
}

impl SyntectHighlighter {
    pub fn new() -> Self {
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
        }
    }

    /// Guess the grammar from the first line (shebangs, modelines, `<?xml`).
    fn detect(&self, code: &str) -> &SyntaxReference {
        code.lines()
            .next()
            .and_then(|line| self.syntaxes.find_syntax_by_first_line(line))
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text())
    }
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeHighlighter for SyntectHighlighter {
    fn render_code(&self, code: &str, lang: Option<&str>) -> Result<String, RenderError> {
        let known = lang
            .filter(|lang| !lang.is_empty())
            .and_then(|lang| self.syntaxes.find_syntax_by_token(lang).map(|syntax| (lang, syntax)));
        let syntax = known.map_or_else(|| self.detect(code), |(_, syntax)| syntax);

        let mut generator = ClassedHTMLGenerator::new_with_class_style(
            syntax,
            &self.syntaxes,
            ClassStyle::SpacedPrefixed {
                prefix: TOKEN_CLASS_PREFIX,
            },
        );
        for line in LinesWithEndings::from(code) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }
        let html = generator.finalize();

        Ok(match known {
            Some((lang, _)) => format!(r#"<pre><code class="{BASE_CLASS} {lang}">{html}</code></pre>"#),
            None => format!(r#"<pre><code class="{BASE_CLASS}">{html}</code></pre>"#),
        })
    }
}
