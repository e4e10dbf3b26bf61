use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use clockscene::{app::ViewerApp, config::ViewerConfig};

/// Interactive viewer for a scene of textured, lit clocks
#[derive(Parser, Debug)]
#[command(name = "clockscene", version, about)]
struct Args {
    /// TOML configuration file; built-in defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the scene textures, overrides the configuration
    #[arg(short, long)]
    texture_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = ViewerConfig::load_or_default(args.config.as_deref())
        .context("failed to load configuration")?;
    if let Some(texture_dir) = args.texture_dir {
        config.assets.texture_dir = texture_dir;
    }

    ViewerApp::new(config)?.run()
}
