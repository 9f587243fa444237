//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use sitegen::Environment;
use std::path::PathBuf;

/// Sitegen static site generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root; relative paths in the config resolve against it
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name (default: sitegen.toml)
    #[arg(short = 'C', long, default_value = "sitegen.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Build arguments overriding `sitegen.toml`
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Source directory path (relative to project root)
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Output directory path (relative to project root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Clean output directory completely before building
    #[arg(long)]
    pub clean: bool,

    /// Development build: drafts are rendered.
    ///
    /// Without this flag the `SITEGEN_ENV` variable decides.
    #[arg(long)]
    pub dev: bool,

    /// Fold `name` into `name/index.html`
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub pretty_urls: Option<bool>,

    /// Slugify output paths
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub slugify: Option<bool>,

    /// Override the url prefix of every page, e.g. "/blog"
    #[arg(long = "base-path")]
    pub base_path: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Render every file under the source directory into the output directory
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },
}

impl BuildArgs {
    pub fn environment(&self) -> Environment {
        if self.dev {
            Environment::Development
        } else {
            Environment::from_env()
        }
    }
}
