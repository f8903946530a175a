use anyhow::{Context, Result};
use renderer::{Renderer, RendererConfig};
use tracing_subscriber::EnvFilter;

use crate::cli::{parse_surface_size, Cli};

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub fn run(cli: Cli) -> Result<()> {
    let surface_size = parse_surface_size(&cli.size).context("invalid --size")?;
    let config = RendererConfig {
        surface_size,
        shader_dir: cli.shader_dir,
        antialiasing: cli.antialias,
        initial_chain_len: cli.chain_len,
        ..RendererConfig::default()
    };

    tracing::info!(
        width = surface_size.0,
        height = surface_size.1,
        shaders = %config.shader_dir.display(),
        chain_len = config.initial_chain_len,
        "starting snakeline"
    );

    Renderer::new(config).run()
}
