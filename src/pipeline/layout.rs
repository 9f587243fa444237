//! Layout loading and application.

use super::RouteData;
use crate::error::PipelineError;
use crate::render::Renderer;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs;
use std::path::PathBuf;

/// A layout file's template source.
#[derive(Debug, Clone)]
pub struct Layout {
    pub contents: String,
    pub path: PathBuf,
}

/// Layouts by name, read once per pipeline.
///
/// Only successful reads are cached; a missing layout fails every time it
/// is asked for.
#[derive(Debug)]
pub struct LayoutCache {
    dir: PathBuf,
    layouts: HashMap<String, Layout>,
}

impl LayoutCache {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            layouts: HashMap::new(),
        }
    }

    pub fn get(&mut self, name: &str) -> Result<&Layout, PipelineError> {
        match self.layouts.entry(name.to_owned()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let path = self.dir.join(name);
                let contents = fs::read_to_string(&path).map_err(|source| {
                    PipelineError::LayoutNotFound {
                        path: path.clone(),
                        source,
                    }
                })?;
                Ok(entry.insert(Layout { contents, path }))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

/// Wrap `body` in the named layout.
///
/// The body becomes `contents` in the route data, then the layout renders as
/// a template against the whole data layer. The result isn't wrapped again.
pub(crate) fn apply_layout(
    name: &str,
    body: String,
    data: &mut RouteData,
    layouts: &mut LayoutCache,
    renderer: &mut Renderer,
) -> Result<String, PipelineError> {
    data.set_contents(body);
    let layout = layouts.get(name)?;
    renderer
        .render_template(&layout.contents, data, &layout.path)
        .map_err(|source| PipelineError::Render {
            path: layout.path.clone(),
            source,
        })
}
