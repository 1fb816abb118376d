//! Ambient particle field: two seeded "galaxy" clusters of points breathing
//! around fixed anchors, with a local pointer interaction. The anchors and
//! phase offsets are the only state carried across frames; every position is
//! recomputed from scratch, so particles can never drift away.

use bevy::prelude::*;
use bevy::render::{
    mesh::VertexAttributeValues, render_asset::RenderAssetUsages,
    render_resource::PrimitiveTopology,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

use crate::config::{BackdropConfig, FieldConfig, GradedConfig, InteractionMode, RepulseConfig};
use crate::motion;
use crate::palette;
use crate::pointer::PointerState;
use crate::system_order::SceneAnimateSet;

/// Immutable per-particle spawn data (anchor + phase offset).
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ParticleSeeds {
    pub anchors: Vec<Vec3>,
    pub offsets: Vec<f32>,
}

/// RNG feeding the graded-mode jitter. A separate stream from the spawn RNG
/// so anchor generation stays reproducible for a given seed.
#[derive(Resource)]
pub struct JitterRng(pub SmallRng);

/// Marker for the entity owning the point-cloud mesh.
#[derive(Component)]
pub struct ParticleField;

pub struct ParticleFieldPlugin;

impl Plugin for ParticleFieldPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_field)
            .add_systems(Update, animate_field.in_set(SceneAnimateSet));
    }
}

/// Generate anchors and phase offsets for `cfg.count` particles.
///
/// Cluster assignment alternates by parity (even -> left, odd -> right).
/// Within a cluster the anchor is placed with the surface parameterization
/// `theta ~ U[0,2pi)`, `phi = acos(2u-1)` at radius `r ~ U[min,max)`. That
/// distribution is not uniform in volume; it is kept because the layered
/// shell look is the intended visual.
pub fn generate_particles(cfg: &FieldConfig) -> ParticleSeeds {
    let mut rng = SmallRng::seed_from_u64(cfg.seed);
    let mut anchors = Vec::with_capacity(cfg.count);
    let mut offsets = Vec::with_capacity(cfg.count);
    for i in 0..cfg.count {
        let center_x = if i % 2 == 0 {
            -cfg.cluster_offset
        } else {
            cfg.cluster_offset
        };
        let r = if cfg.radius_range.max > cfg.radius_range.min {
            rng.gen_range(cfg.radius_range.min..cfg.radius_range.max)
        } else {
            cfg.radius_range.min
        };
        let theta = rng.gen_range(0.0..TAU);
        let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
        anchors.push(Vec3::new(
            center_x + r * phi.sin() * theta.cos(),
            r * phi.sin() * theta.sin(),
            r * phi.cos(),
        ));
        offsets.push(rng.gen::<f32>() * cfg.phase_range);
    }
    ParticleSeeds { anchors, offsets }
}

/// Position of one particle under the simple repulsion interaction.
/// `pointer` is the fixed-scale screen-space pointer position.
pub fn repulse_position(
    anchor: Vec3,
    phase: f32,
    t: f32,
    pointer: Vec2,
    amplitude: f32,
    cfg: &RepulseConfig,
) -> Vec3 {
    let mut p = anchor + motion::breathing_offset(t, phase, 1.0, amplitude);
    // Push is measured against the oscillated position, not the anchor.
    let to_pointer = pointer - p.truncate();
    let push = motion::repulse_push(to_pointer.length_squared(), cfg.threshold_sq, cfg.strength);
    if push > 0.0 {
        p.x -= to_pointer.x * push;
        p.y -= to_pointer.y * push;
    }
    p
}

/// Position of one particle under the graded interaction. `pointer` is the
/// pointer's world-space position on the particle plane.
pub fn graded_position(
    anchor: Vec3,
    phase: f32,
    t: f32,
    pointer: Vec2,
    amplitude: f32,
    cfg: &GradedConfig,
    rng: &mut SmallRng,
) -> Vec3 {
    let to_pointer = pointer - anchor.truncate();
    let dist_sq = to_pointer.length_squared();
    let intensity = motion::interaction_intensity(dist_sq, cfg.threshold_sq);
    let frequency = 1.0 + cfg.frequency_gain * intensity;
    let amp = amplitude + cfg.amplitude_gain * intensity;
    let mut p = anchor + motion::breathing_offset(t, phase, frequency, amp);
    if intensity > 0.0 {
        let away = if dist_sq > 1e-8 {
            -to_pointer / dist_sq.sqrt()
        } else {
            Vec2::X
        };
        p.x += away.x * cfg.push_strength * intensity;
        p.y += away.y * cfg.push_strength * intensity;
        // Pop toward the camera, plus a touch of per-axis shimmer.
        p.z += cfg.lift_strength * intensity;
        p += Vec3::new(
            rng.gen::<f32>() - 0.5,
            rng.gen::<f32>() - 0.5,
            rng.gen::<f32>() - 0.5,
        ) * (cfg.jitter_scale * intensity);
    }
    p
}

fn setup_field(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cfg: Res<BackdropConfig>,
) {
    if !cfg.field.enabled {
        return;
    }
    let seeds = generate_particles(&cfg.field);

    let mut mesh = Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::default());
    let positions: Vec<[f32; 3]> = seeds.anchors.iter().map(|a| a.to_array()).collect();
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    let mesh_handle = meshes.add(mesh);

    let material = materials.add(StandardMaterial {
        base_color: palette::PARTICLE_WHITE.with_alpha(palette::PARTICLE_ALPHA),
        unlit: true,
        alpha_mode: AlphaMode::Add,
        ..default()
    });

    commands.spawn((
        Mesh3d(mesh_handle),
        MeshMaterial3d(material),
        Transform::default(),
        ParticleField,
    ));

    // One core light per galaxy cluster.
    for (x, color) in [
        (-cfg.field.cluster_offset, palette::LIGHT_PURPLE),
        (cfg.field.cluster_offset, palette::LIGHT_PINK),
    ] {
        commands.spawn((
            PointLight {
                color,
                intensity: 2_000_000.0,
                range: 25.0,
                shadows_enabled: false,
                ..default()
            },
            Transform::from_xyz(x, 0.0, 5.0),
        ));
    }

    info!(
        "Particle field spawned: {} particles in two clusters at x = +-{}",
        cfg.field.count, cfg.field.cluster_offset
    );
    commands.insert_resource(seeds);
    commands.insert_resource(JitterRng(SmallRng::seed_from_u64(
        cfg.field.seed ^ 0x9E37_79B9_7F4A_7C15,
    )));
}

/// Rewrite the whole position attribute every frame from anchors + inputs.
/// Skips the frame while the mesh asset is not ready yet.
pub fn animate_field(
    time: Res<Time>,
    cfg: Res<BackdropConfig>,
    pointer: Res<PointerState>,
    seeds: Option<Res<ParticleSeeds>>,
    mut jitter: Option<ResMut<JitterRng>>,
    q_field: Query<&Mesh3d, With<ParticleField>>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    let Some(seeds) = seeds else {
        return;
    };
    let Ok(mesh_handle) = q_field.single() else {
        return;
    };
    let Some(mesh) = meshes.get_mut(&mesh_handle.0) else {
        return;
    };
    let Some(VertexAttributeValues::Float32x3(positions)) =
        mesh.attribute_mut(Mesh::ATTRIBUTE_POSITION)
    else {
        return;
    };

    let t = time.elapsed_secs();
    let f = &cfg.field;
    let per_particle = positions
        .iter_mut()
        .zip(seeds.anchors.iter().zip(seeds.offsets.iter()));

    match f.interaction_mode() {
        InteractionMode::Repulse => {
            let m = Vec2::new(
                pointer.ndc.x * f.repulse.pointer_scale_x,
                pointer.ndc.y * f.repulse.pointer_scale_y,
            );
            for (out, (&anchor, &phase)) in per_particle {
                *out = repulse_position(anchor, phase, t, m, f.amplitude, &f.repulse).to_array();
            }
        }
        InteractionMode::Graded => {
            let Some(jitter) = jitter.as_mut() else {
                return;
            };
            for (out, (&anchor, &phase)) in per_particle {
                *out = graded_position(
                    anchor,
                    phase,
                    t,
                    pointer.world,
                    f.amplitude,
                    &f.graded,
                    &mut jitter.0,
                )
                .to_array();
            }
        }
    }
}
