use bevy::prelude::*;

use crate::auto_close::AutoClosePlugin;
use crate::camera::CameraPlugin;
use crate::config::{BackdropConfig, ConfigLoadReport};
use crate::field::ParticleFieldPlugin;
use crate::pointer::PointerPlugin;
use crate::sphere::HeroSpherePlugin;
use crate::system_order::{PointerSampleSet, SceneAnimateSet};

/// Top-level composition: camera + pointer sampling + the two scenes.
/// The scenes are independent; either can be disabled from config without
/// affecting the other.
pub struct BackdropPlugin;

impl Plugin for BackdropPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (PointerSampleSet, SceneAnimateSet.after(PointerSampleSet)),
        )
        .add_plugins((
            CameraPlugin,
            PointerPlugin,
            HeroSpherePlugin,
            ParticleFieldPlugin,
            AutoClosePlugin,
        ))
        .add_systems(Startup, report_config);
        #[cfg(feature = "debug")]
        app.add_systems(Update, debug_frame_stats.after(SceneAnimateSet));
    }
}

/// Log what the layered config load produced, plus validation warnings.
/// Warnings are advisory; the app always starts.
fn report_config(report: Option<Res<ConfigLoadReport>>, cfg: Res<BackdropConfig>) {
    if let Some(report) = report {
        for layer in &report.layers_used {
            info!("config layer: {layer}");
        }
        for err in &report.errors {
            warn!("config: {err}");
        }
    }
    for w in cfg.validate() {
        warn!("config: {w}");
    }
}

#[cfg(feature = "debug")]
fn debug_frame_stats(
    time: Res<Time>,
    mut accum: Local<f32>,
    hover: Res<crate::sphere::SphereHover>,
    pointer: Res<crate::pointer::PointerState>,
    seeds: Option<Res<crate::field::ParticleSeeds>>,
) {
    *accum += time.delta_secs();
    if *accum < 1.0 {
        return;
    }
    *accum = 0.0;
    info!(
        "BACKDROP t={:.2}s ft_ms={:.1} particles={} hover={} pointer=({:+.2},{:+.2})",
        time.elapsed_secs(),
        time.delta_secs() * 1000.0,
        seeds.map(|s| s.anchors.len()).unwrap_or(0),
        hover.0,
        pointer.ndc.x,
        pointer.ndc.y,
    );
}
