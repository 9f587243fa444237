//! Site building orchestration.
//!
//! Walks the source directory and feeds every file through one pipeline.
//!
//! ```text
//! build_site()
//!     │
//!     ├── collect_all_files(source)   sorted, so duplicate resolution is stable
//!     │
//!     ├── Pipeline::process(item)     one item at a time
//!     │
//!     └── write_item()                emitted and passed-through items
//! ```

use anyhow::{Context, Result};
use sitegen::{
    ContentItem, Environment, Outcome, Pipeline, SiteConfig, log, pipeline::DropReason,
};
use std::{
    fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Files to ignore during directory traversal
const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Tally of what happened to the walked files
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub written: usize,
    pub drafts: usize,
    pub duplicates: usize,
    pub skipped: usize,
}

/// Build the site described by `config`.
pub fn build_site(config: &SiteConfig, environment: Environment) -> Result<BuildSummary> {
    let source = &config.build.source;
    let output = &config.build.output;

    if config.build.clean && output.exists() {
        fs::remove_dir_all(output)
            .with_context(|| format!("Failed to clear output directory: {}", output.display()))?;
    }

    let mut pipeline = Pipeline::builder(config.pipeline.clone())
        .environment(environment)
        .build()
        .context("Failed to set up pipeline")?;

    let files = collect_all_files(source);
    log!("build"; "processing {} files from {}", files.len(), source.display());

    let mut summary = BuildSummary::default();
    for path in files {
        let relative = path.strip_prefix(source)?.to_path_buf();
        let bytes = fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        let item = ContentItem::new(source, relative, bytes);

        let outcome = pipeline
            .process(item)
            .map_err(|err| anyhow::anyhow!(err.report()))
            .with_context(|| format!("Failed to build {}", path.display()))?;
        match outcome {
            Outcome::Emitted(item) | Outcome::PassedThrough(item) => {
                write_item(output, &item)?;
                summary.written += 1;
            }
            Outcome::Dropped(DropReason::Draft) => summary.drafts += 1,
            Outcome::Dropped(DropReason::Duplicate { .. }) => summary.duplicates += 1,
            Outcome::Dropped(_) => summary.skipped += 1,
        }
    }

    log_build_result(output, &summary);
    Ok(summary)
}

/// Collect all files from a directory recursively, in path order.
fn collect_all_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Write an item's contents to `output/<relative>`.
fn write_item(output: &Path, item: &ContentItem) -> Result<()> {
    let dest = output.join(&item.relative);
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(&dest, item.bytes().unwrap_or_default())
        .with_context(|| format!("Failed to write {}", dest.display()))?;
    Ok(())
}

fn log_build_result(output: &Path, summary: &BuildSummary) {
    if summary.written == 0 {
        log!("warn"; "output is empty, check the source directory and patterns");
        return;
    }
    log!(
        "build";
        "wrote {} files to {} ({} drafts, {} duplicates, {} skipped)",
        summary.written,
        output.display(),
        summary.drafts,
        summary.duplicates,
        summary.skipped
    );
}
