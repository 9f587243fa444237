//! Markdown rendering with pulldown-cmark.

use super::{CodeHighlighter, MarkdownRenderer, RenderError};
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html};
use std::sync::Arc;

/// Renders CommonMark plus GFM tables, strikethrough, footnotes and task
/// lists. Code blocks go through the highlighter.
pub struct PulldownMarkdown {
    highlighter: Arc<dyn CodeHighlighter>,
    options: Options,
}

/// A code block being collected between its start and end events
struct OpenBlock {
    lang: Option<String>,
    code: String,
}

impl PulldownMarkdown {
    pub fn new(highlighter: Arc<dyn CodeHighlighter>) -> Self {
        Self {
            highlighter,
            options: Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_FOOTNOTES
                | Options::ENABLE_TASKLISTS,
        }
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }
}

impl MarkdownRenderer for PulldownMarkdown {
    fn render_markdown(&self, text: &str) -> Result<String, RenderError> {
        let mut events = Vec::new();
        let mut block: Option<OpenBlock> = None;

        for event in Parser::new_ext(text, self.options) {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    block = Some(OpenBlock {
                        lang: fence_lang(&kind),
                        code: String::new(),
                    });
                }
                Event::Text(code) if block.is_some() => {
                    if let Some(open) = block.as_mut() {
                        open.code.push_str(&code);
                    }
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(open) = block.take() {
                        let html = self
                            .highlighter
                            .render_code(&open.code, open.lang.as_deref())?;
                        events.push(Event::Html(CowStr::from(html)));
                    }
                }
                other => events.push(other),
            }
        }

        let mut out = String::with_capacity(text.len() + text.len() / 2);
        html::push_html(&mut out, events.into_iter());
        Ok(out.trim().to_owned())
    }
}

/// First word of a fence's info string: "rust ignore" → "rust"
fn fence_lang(kind: &CodeBlockKind<'_>) -> Option<String> {
    match kind {
        CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(str::to_owned),
        CodeBlockKind::Indented => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records what it was asked to highlight.
    struct Echo;

    impl CodeHighlighter for Echo {
        fn render_code(&self, code: &str, lang: Option<&str>) -> Result<String, RenderError> {
            Ok(format!("<code data-lang=\"{}\">{}</code>", lang.unwrap_or("-"), code.trim()))
        }
    }

    fn render(text: &str) -> String {
        PulldownMarkdown::new(Arc::new(Echo))
            .render_markdown(text)
            .unwrap()
    }

    #[test]
    fn test_paragraph_is_trimmed() {
        assert_eq!(render("hello world\n"), "<p>hello world</p>");
    }

    #[test]
    fn test_fenced_code_goes_through_highlighter() {
        let html = render("```js ignore\nalert('!');\n```\n");
        assert_eq!(html, "<code data-lang=\"js\">alert('!');</code>");
    }

    #[test]
    fn test_fence_without_lang() {
        assert_eq!(render("```\ntext\n```\n"), "<code data-lang=\"-\">text</code>");
    }

    #[test]
    fn test_indented_code() {
        assert_eq!(render("    let x = 1;\n"), "<code data-lang=\"-\">let x = 1;</code>");
    }

    #[test]
    fn test_gfm_extensions_enabled() {
        let html = render("| a |\n|---|\n| b |\n\n~~gone~~\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>gone</del>"));
    }

    #[test]
    fn test_highlighter_error_propagates() {
        struct Broken;
        impl CodeHighlighter for Broken {
            fn render_code(&self, _: &str, _: Option<&str>) -> Result<String, RenderError> {
                Err(RenderError::Other("boom".into()))
            }
        }
        let result = PulldownMarkdown::new(Arc::new(Broken)).render_markdown("```\nx\n```\n");
        assert!(matches!(result, Err(RenderError::Other(msg)) if msg == "boom"));
    }
}
