//! Template rendering with tera.
//!
//! Compiled templates are cached by their raw source text, not by path: two
//! files with byte-identical template text share one compiled entry.

use super::{MarkdownRenderer, RenderError, TemplateEngine};
use crate::pipeline::RouteData;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tera::{Context, Tera, Value};

pub struct TeraEngine {
    tera: Tera,
    /// source text → registered template name
    compiled: HashMap<String, String>,
}

impl TeraEngine {
    /// Create an engine, loading every template under `template_dir` so
    /// rendered sources can `include` or `extends` them by relative name.
    pub fn new(
        template_dir: Option<&Path>,
        markdown: Arc<dyn MarkdownRenderer>,
    ) -> Result<Self, RenderError> {
        let mut tera = match template_dir {
            Some(dir) => Tera::new(&format!("{}/**/*", dir.display()))?,
            None => Tera::default(),
        };
        // bodies and layout contents are already html
        tera.autoescape_on(vec![]);
        tera.register_filter("markdown", MarkdownFilter(markdown));

        Ok(Self {
            tera,
            compiled: HashMap::new(),
        })
    }

    /// Number of distinct sources compiled so far.
    pub fn compiled_len(&self) -> usize {
        self.compiled.len()
    }

    fn compile(&mut self, source: &str, origin: &Path) -> Result<String, RenderError> {
        if let Some(name) = self.compiled.get(source) {
            return Ok(name.clone());
        }
        let name = format!("{}#{}", origin.display(), self.compiled.len());
        if let Err(err) = self.tera.add_raw_template(&name, source) {
            // tera registers the template before resolving `extends`/`import`
            self.tera.templates.remove(&name);
            return Err(err.into());
        }
        self.compiled.insert(source.to_owned(), name.clone());
        Ok(name)
    }
}

impl TemplateEngine for TeraEngine {
    fn render_template(
        &mut self,
        source: &str,
        data: &RouteData,
        origin: &Path,
    ) -> Result<String, RenderError> {
        let name = self.compile(source, origin)?;
        let context = Context::from_serialize(data)?;
        Ok(self.tera.render(&name, &context)?)
    }
}

/// `{{ text | markdown }}` bound to the engine's markdown renderer.
struct MarkdownFilter(Arc<dyn MarkdownRenderer>);

impl tera::Filter for MarkdownFilter {
    fn filter(&self, value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
        let text = value
            .as_str()
            .ok_or_else(|| tera::Error::msg("the `markdown` filter expects a string"))?;
        self.0
            .render_markdown(text)
            .map(Value::String)
            .map_err(|err| tera::Error::msg(err.to_string()))
    }

    fn is_safe(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    struct Upper;

    impl MarkdownRenderer for Upper {
        fn render_markdown(&self, text: &str) -> Result<String, RenderError> {
            Ok(format!("<p>{}</p>", text.to_uppercase()))
        }
    }

    fn engine() -> TeraEngine {
        TeraEngine::new(None, Arc::new(Upper)).unwrap()
    }

    fn data(value: serde_json::Value) -> RouteData {
        match value {
            Value::Object(map) => RouteData::from(map),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_renders_against_data() {
        let html = engine()
            .render_template("<p>{{ title }}</p>", &data(json!({"title": "Foo"})), Path::new("a.tera"))
            .unwrap();
        assert_eq!(html, "<p>Foo</p>");
    }

    #[test]
    fn test_html_is_not_escaped() {
        let html = engine()
            .render_template("{{ contents }}", &data(json!({"contents": "<b>x</b>"})), Path::new("l.tera"))
            .unwrap();
        assert_eq!(html, "<b>x</b>");
    }

    #[test]
    fn test_cache_keyed_by_source_text() {
        let mut engine = engine();
        let empty = RouteData::default();

        engine.render_template("same", &empty, Path::new("a.tera")).unwrap();
        engine.render_template("same", &empty, Path::new("b.tera")).unwrap();
        assert_eq!(engine.compiled_len(), 1);

        engine.render_template("other", &empty, Path::new("a.tera")).unwrap();
        assert_eq!(engine.compiled_len(), 2);
    }

    #[test]
    fn test_markdown_filter_uses_injected_renderer() {
        let html = engine()
            .render_template("{{ body | markdown }}", &data(json!({"body": "hi"})), Path::new("a.tera"))
            .unwrap();
        assert_eq!(html, "<p>HI</p>");
    }

    #[test]
    fn test_markdown_filter_rejects_non_strings() {
        let result = engine().render_template(
            "{{ n | markdown }}",
            &data(json!({"n": 1})),
            Path::new("a.tera"),
        );
        assert!(matches!(result, Err(RenderError::Template(_))));
    }

    #[test]
    fn test_syntax_error_is_template_error() {
        let result = engine().render_template("{% if %}", &RouteData::default(), Path::new("a.tera"));
        assert!(matches!(result, Err(RenderError::Template(_))));
    }

    #[test]
    fn test_unresolved_parent_does_not_poison_engine() {
        let mut engine = engine();
        let empty = RouteData::default();

        let result = engine.render_template(r#"{% extends "missing.html" %}"#, &empty, Path::new("bad.tera"));
        assert!(matches!(result, Err(RenderError::Template(_))));
        assert_eq!(engine.compiled_len(), 0);

        let html = engine
            .render_template("<p>{{ 1 + 1 }}</p>", &empty, Path::new("good.tera"))
            .unwrap();
        assert_eq!(html, "<p>2</p>");
    }

    #[test]
    fn test_template_dir_enables_includes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("nav.html"), "<nav>{{ title }}</nav>").unwrap();

        let mut engine = TeraEngine::new(Some(dir.path()), Arc::new(Upper)).unwrap();
        let html = engine
            .render_template(
                r#"{% include "nav.html" %}<main></main>"#,
                &data(json!({"title": "Home"})),
                &PathBuf::from("page.tera"),
            )
            .unwrap();
        assert_eq!(html, "<nav>Home</nav><main></main>");
    }
}
