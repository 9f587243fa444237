//! Sitegen - render a directory of markdown, templates and html into a site.

mod build;
mod cli;

use anyhow::Result;
use build::build_site;
use clap::Parser;
use cli::{BuildArgs, Cli, Commands};
use sitegen::SiteConfig;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Build { build_args } => {
            build_site(&config, build_args.environment()).map(|_| ())
        }
    }
}

/// Load the config file if present, then apply command-line overrides.
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);

    let mut config = if config_path.exists() {
        SiteConfig::from_path(&config_path)?
    } else {
        SiteConfig::default()
    };

    match &cli.command {
        Commands::Build { build_args } => apply_build_args(&mut config, build_args),
    }
    config.set_root(root);
    config.validate()?;

    Ok(config)
}

fn apply_build_args(config: &mut SiteConfig, args: &BuildArgs) {
    if let Some(source) = &args.source {
        config.build.source = source.clone();
    }
    if let Some(output) = &args.output {
        config.build.output = output.clone();
    }
    config.build.clean |= args.clean;

    if let Some(pretty_urls) = args.pretty_urls {
        config.pipeline.pretty_urls = pretty_urls;
    }
    if let Some(slugify) = args.slugify {
        config.pipeline.slugify = slugify;
    }
    if let Some(base_path) = &args.base_path {
        config.pipeline.base_path = base_path.clone();
    }
}
