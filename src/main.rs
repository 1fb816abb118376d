use anyhow::bail;
use bevy::prelude::*;
use clap::Parser;

use hero_backdrop::{BackdropConfig, BackdropPlugin, ConfigLoadReport};

/// Decorative animated 3D backdrop: a pointer-reactive sphere and two
/// particle galaxy clusters.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Extra RON config layer applied after the shipped defaults.
    #[arg(long)]
    config: Option<std::path::PathBuf>,
    /// Override the particle seed from the config layers.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Layered configuration: shipped defaults, then an optional local
    // override, then an explicit --config layer. Missing files are skipped.
    let mut layers = vec![
        "assets/config/backdrop.ron".to_string(),
        "assets/config/backdrop.local.ron".to_string(),
    ];
    if let Some(path) = &cli.config {
        if !path.exists() {
            bail!("config layer {} does not exist", path.display());
        }
        layers.push(path.to_string_lossy().to_string());
    }
    let (mut cfg, layers_used, errors) = BackdropConfig::load_layered(&layers);
    if let Some(seed) = cli.seed {
        cfg.field.seed = seed;
    }

    App::new()
        .insert_resource(ConfigLoadReport {
            layers_used,
            errors,
        })
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: cfg.window.title.clone(),
                resolution: (cfg.window.width, cfg.window.height).into(),
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(cfg)
        .add_plugins(BackdropPlugin)
        .run();
    Ok(())
}
