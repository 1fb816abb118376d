//! Pointer-reactive hero sphere: a metallic distorted sphere that spins with
//! time, tilts and drifts toward the pointer, and reacts to hover by turning
//! magenta and doubling its distortion speed.

use bevy::prelude::*;
use bevy::render::mesh::VertexAttributeValues;

use crate::config::BackdropConfig;
use crate::motion;
use crate::palette;
use crate::pointer::PointerState;
use crate::system_order::SceneAnimateSet;

/// Parent rig that gently bobs the whole sphere scene up and down.
#[derive(Component)]
pub struct FloatRig;

/// The sphere mesh itself. Carries the accumulated pointer tilt; the base
/// spin is derived from elapsed time, so only the tilt is stateful.
#[derive(Component, Default)]
pub struct HeroSphere {
    pub tilt: Vec2,
}

/// Rest-pose vertex positions captured at spawn; the distortion pass scales
/// these radially and never reads back the displaced mesh.
#[derive(Component)]
pub struct DistortBase(pub Vec<Vec3>);

/// Whether the pointer ray currently hits the sphere.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SphereHover(pub bool);

pub struct HeroSpherePlugin;

impl Plugin for HeroSpherePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SphereHover>()
            .add_systems(Startup, setup_sphere)
            .add_systems(
                Update,
                (
                    update_hover,
                    apply_hover_material.after(update_hover),
                    animate_sphere,
                    float_rig,
                    distort_sphere.after(update_hover),
                )
                    .in_set(SceneAnimateSet),
            );
    }
}

fn setup_sphere(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cfg: Res<BackdropConfig>,
) {
    if !cfg.sphere.enabled {
        return;
    }
    let s = &cfg.sphere;
    let mesh = Sphere::new(s.radius)
        .mesh()
        .uv(s.segments, s.segments);
    let base: Vec<Vec3> = match mesh.attribute(Mesh::ATTRIBUTE_POSITION) {
        Some(VertexAttributeValues::Float32x3(v)) => v.iter().map(|p| Vec3::from(*p)).collect(),
        _ => {
            warn!("sphere mesh has no position attribute; scene disabled");
            return;
        }
    };
    let mesh_handle = meshes.add(mesh);

    let material = materials.add(StandardMaterial {
        base_color: palette::SPHERE_BASE,
        metallic: 0.9,
        perceptual_roughness: 0.2,
        clearcoat: 1.0,
        clearcoat_perceptual_roughness: 0.1,
        ..default()
    });

    // The rig bobs; the child sphere spins, tilts and follows the pointer.
    // Parked 5 units in front of the camera (which sits at z = 22).
    commands
        .spawn((Transform::from_xyz(0.0, 0.0, 17.0), Visibility::default(), FloatRig))
        .with_children(|parent| {
            parent.spawn((
                Mesh3d(mesh_handle),
                MeshMaterial3d(material),
                Transform::from_scale(Vec3::splat(s.scale)),
                HeroSphere::default(),
                DistortBase(base),
            ));
        });

    // Scene lights from the hero composition: soft ambient, purple key,
    // pink fill from behind.
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
        ..default()
    });
    commands.spawn((
        DirectionalLight {
            color: palette::LIGHT_PURPLE,
            illuminance: 10_000.0,
            ..default()
        },
        Transform::from_xyz(10.0, 10.0, 5.0).looking_at(Vec3::new(0.0, 0.0, 17.0), Vec3::Y),
    ));
    commands.spawn((
        PointLight {
            color: palette::LIGHT_PINK,
            intensity: 1_500_000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(-10.0, -10.0, -10.0),
    ));
    info!("Hero sphere spawned ({} segments)", s.segments);
}

/// Cast the pointer ray against the sphere's bounding sphere each frame.
fn update_hover(
    cfg: Res<BackdropConfig>,
    pointer: Res<PointerState>,
    camera_q: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    q_sphere: Query<&GlobalTransform, With<HeroSphere>>,
    mut hover: ResMut<SphereHover>,
) {
    let Ok((camera, cam_tf)) = camera_q.single() else {
        return;
    };
    let Ok(sphere_tf) = q_sphere.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(cam_tf, pointer.screen) else {
        return;
    };
    let center = sphere_tf.translation();
    let to_center = center - ray.origin;
    let along = to_center.dot(*ray.direction);
    let closest_sq = to_center.length_squared() - along * along;
    let radius = cfg.sphere.radius * cfg.sphere.scale;
    let hit = along > 0.0 && closest_sq <= radius * radius;
    hover.set_if_neq(SphereHover(hit));
}

/// Swap the material color when the hover state flips. Change detection keeps
/// this from touching the asset every frame.
fn apply_hover_material(
    hover: Res<SphereHover>,
    q: Query<&MeshMaterial3d<StandardMaterial>, With<HeroSphere>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !hover.is_changed() {
        return;
    }
    let Ok(handle) = q.single() else {
        return;
    };
    if let Some(mat) = materials.get_mut(&handle.0) {
        mat.base_color = palette::sphere_color(hover.0);
    }
}

/// Base spin + accumulated pointer tilt + pointer-follow drift.
pub fn animate_sphere(
    time: Res<Time>,
    cfg: Res<BackdropConfig>,
    pointer: Res<PointerState>,
    mut q: Query<(&mut Transform, &mut HeroSphere)>,
) {
    // Mesh not spawned yet (or scene disabled): no-op this frame.
    let Ok((mut tf, mut sphere)) = q.single_mut() else {
        return;
    };
    let s = &cfg.sphere;
    let t = time.elapsed_secs();

    // The tilt is an increment, not an assignment; holding the pointer off
    // center keeps winding the sphere up.
    sphere.tilt.x += -pointer.ndc.y * s.tilt_gain;
    sphere.tilt.y += pointer.ndc.x * s.tilt_gain;
    tf.rotation = Quat::from_euler(
        EulerRot::XYZ,
        s.spin_rate_x * t + sphere.tilt.x,
        s.spin_rate_y * t + sphere.tilt.y,
        0.0,
    );

    // Magnetic follow: fixed per-frame lerp factor. Deliberately not
    // dt-normalized; see DESIGN.md.
    let target = pointer.ndc * s.follow_gain;
    tf.translation.x = motion::lerp(tf.translation.x, target.x, s.follow_factor);
    tf.translation.y = motion::lerp(tf.translation.y, target.y, s.follow_factor);
}

fn float_rig(
    time: Res<Time>,
    cfg: Res<BackdropConfig>,
    mut q: Query<&mut Transform, With<FloatRig>>,
) {
    let Ok(mut tf) = q.single_mut() else {
        return;
    };
    let s = &cfg.sphere;
    tf.translation.y = (time.elapsed_secs() * s.float_speed).sin() * s.float_amplitude;
}

/// Radial displacement factor for one rest-pose vertex.
#[inline]
fn distort_scale(p: Vec3, t: f32, speed: f32, distort: f32) -> f32 {
    // Per-vertex phase keeps the lobes traveling around the surface instead
    // of the whole sphere pulsing in unison.
    let phase = p.x * 3.0 + p.y * 2.0 + p.z * 4.0;
    1.0 + distort * 0.3 * (speed * t + phase).sin()
}

/// CPU vertex distortion; hover doubles the animation speed.
/// Skips the frame while the mesh asset is not ready yet.
fn distort_sphere(
    time: Res<Time>,
    cfg: Res<BackdropConfig>,
    hover: Res<SphereHover>,
    q: Query<(&Mesh3d, &DistortBase), With<HeroSphere>>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    let Ok((handle, base)) = q.single() else {
        return;
    };
    let Some(mesh) = meshes.get_mut(&handle.0) else {
        return;
    };
    let Some(VertexAttributeValues::Float32x3(positions)) =
        mesh.attribute_mut(Mesh::ATTRIBUTE_POSITION)
    else {
        return;
    };
    let s = &cfg.sphere;
    let speed = if hover.0 { s.hover_speed } else { s.base_speed };
    let t = time.elapsed_secs();
    for (out, p) in positions.iter_mut().zip(base.0.iter()) {
        *out = (*p * distort_scale(*p, t, speed, s.distort)).to_array();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::app::TaskPoolPlugin;
    use bevy::asset::AssetPlugin;
    use bevy::render::{render_asset::RenderAssetUsages, render_resource::PrimitiveTopology};
    use std::time::Duration;

    fn make_app(ndc: Vec2) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(BackdropConfig::default());
        app.insert_resource(PointerState {
            ndc,
            ..default()
        });
        app.add_systems(Update, animate_sphere);
        app.world_mut()
            .spawn((Transform::default(), HeroSphere::default()));
        app
    }

    #[test]
    fn zero_pointer_spin_tracks_elapsed_time() {
        let mut app = make_app(Vec2::ZERO);
        for _ in 0..3 {
            app.update();
        }
        let t = app.world().resource::<Time>().elapsed_secs();
        let mut q = app.world_mut().query::<(&Transform, &HeroSphere)>();
        let (tf, sphere) = q.single(app.world()).expect("sphere exists");
        assert_eq!(sphere.tilt, Vec2::ZERO, "no pointer input, no tilt");
        let (rx, ry, _) = tf.rotation.to_euler(EulerRot::XYZ);
        assert!((rx - 0.2 * t).abs() < 1e-4, "x spin should be 0.2t, got {rx}");
        assert!((ry - 0.3 * t).abs() < 1e-4, "y spin should be 0.3t, got {ry}");
    }

    #[test]
    fn pointer_tilt_accumulates_per_frame() {
        let mut app = make_app(Vec2::new(0.0, 1.0));
        for _ in 0..4 {
            app.update();
        }
        let mut q = app.world_mut().query::<&HeroSphere>();
        let sphere = q.single(app.world()).expect("sphere exists");
        // tilt.x += -py * 0.2 each frame
        assert!((sphere.tilt.x - (-0.8)).abs() < 1e-5, "got {:?}", sphere.tilt);
        assert_eq!(sphere.tilt.y, 0.0);
    }

    #[test]
    fn follow_lerp_converges_on_target() {
        let mut app = make_app(Vec2::new(1.0, 0.0));
        app.update();
        {
            let mut q = app.world_mut().query::<&Transform>();
            let tf = q.single(app.world()).unwrap();
            // First step moves 10% of the way toward x = 2
            assert!((tf.translation.x - 0.2).abs() < 1e-5);
        }
        for _ in 0..200 {
            app.update();
        }
        let mut q = app.world_mut().query::<&Transform>();
        let tf = q.single(app.world()).unwrap();
        assert!((tf.translation.x - 2.0).abs() < 1e-2, "should settle at follow_gain * ndc.x");
        assert_eq!(tf.translation.z, 0.0, "follow never moves z");
    }

    #[test]
    fn missing_sphere_is_a_noop() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(BackdropConfig::default());
        app.insert_resource(PointerState::default());
        app.add_systems(Update, animate_sphere);
        // No sphere entity spawned; the system must skip without panicking.
        app.update();
    }

    /// App with real asset storage but a hand-parked clock: no TimePlugin,
    /// so `elapsed_secs()` stays exactly where we set it across updates.
    fn hover_app(t: f32, base: &[Vec3]) -> App {
        let mut app = App::new();
        app.add_plugins((TaskPoolPlugin::default(), AssetPlugin::default()));
        app.init_asset::<Mesh>();
        app.init_asset::<StandardMaterial>();

        let mut time = Time::<()>::default();
        time.advance_by(Duration::from_secs_f32(t));
        app.insert_resource(time);

        app.insert_resource(BackdropConfig::default());
        app.init_resource::<SphereHover>();

        let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
        let positions: Vec<[f32; 3]> = base.iter().map(|p| p.to_array()).collect();
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        let mesh_handle = app.world_mut().resource_mut::<Assets<Mesh>>().add(mesh);
        let material = app
            .world_mut()
            .resource_mut::<Assets<StandardMaterial>>()
            .add(StandardMaterial {
                base_color: palette::SPHERE_BASE,
                ..default()
            });
        app.world_mut().spawn((
            Mesh3d(mesh_handle),
            MeshMaterial3d(material),
            HeroSphere::default(),
            DistortBase(base.to_vec()),
        ));
        app.add_systems(Update, (apply_hover_material, distort_sphere));
        app
    }

    fn sphere_material_color(app: &mut App) -> Color {
        let mut q = app
            .world_mut()
            .query_filtered::<&MeshMaterial3d<StandardMaterial>, With<HeroSphere>>();
        let handle = q.single(app.world()).expect("sphere entity").0.clone();
        app.world()
            .resource::<Assets<StandardMaterial>>()
            .get(&handle)
            .expect("sphere material")
            .base_color
    }

    fn distorted_positions(app: &mut App) -> Vec<Vec3> {
        let mut q = app.world_mut().query_filtered::<&Mesh3d, With<HeroSphere>>();
        let handle = q.single(app.world()).expect("sphere entity").0.clone();
        let mesh = app
            .world()
            .resource::<Assets<Mesh>>()
            .get(&handle)
            .expect("sphere mesh");
        match mesh.attribute(Mesh::ATTRIBUTE_POSITION) {
            Some(VertexAttributeValues::Float32x3(v)) => {
                v.iter().map(|p| Vec3::from(*p)).collect()
            }
            other => panic!("unexpected position attribute: {other:?}"),
        }
    }

    #[test]
    fn hover_swaps_material_color() {
        let base = [Vec3::X, Vec3::Y, Vec3::Z];
        let mut app = hover_app(1.0, &base);
        app.update();
        assert_eq!(sphere_material_color(&mut app), palette::SPHERE_BASE);

        app.world_mut().resource_mut::<SphereHover>().0 = true;
        app.update();
        assert_eq!(sphere_material_color(&mut app), palette::SPHERE_HOVER);

        app.world_mut().resource_mut::<SphereHover>().0 = false;
        app.update();
        assert_eq!(sphere_material_color(&mut app), palette::SPHERE_BASE);
    }

    #[test]
    fn hover_doubles_distortion_speed() {
        let base = [Vec3::X, Vec3::Y, Vec3::new(0.3, -0.5, 0.8)];
        let t = 1.3;
        let mut app = hover_app(t, &base);
        let s = BackdropConfig::default().sphere;

        app.update();
        let idle = distorted_positions(&mut app);
        for (out, p) in idle.iter().zip(base.iter()) {
            let expect = *p * distort_scale(*p, t, s.base_speed, s.distort);
            assert!(
                (*out - expect).length() < 1e-5,
                "idle vertex should follow base_speed: {out:?} vs {expect:?}"
            );
        }

        app.world_mut().resource_mut::<SphereHover>().0 = true;
        app.update();
        let hovered = distorted_positions(&mut app);
        for ((out, p), idle_p) in hovered.iter().zip(base.iter()).zip(idle.iter()) {
            let expect = *p * distort_scale(*p, t, s.hover_speed, s.distort);
            assert!(
                (*out - expect).length() < 1e-5,
                "hovered vertex should follow hover_speed: {out:?} vs {expect:?}"
            );
            // Same clock, different speed: the displacement must actually move
            assert!((*out - *idle_p).length() > 1e-3);
        }
    }

    #[test]
    fn distortion_factor_stays_in_band() {
        let cfg = BackdropConfig::default();
        let d = cfg.sphere.distort;
        for i in 0..500 {
            let t = i as f32 * 0.07;
            let p = Vec3::new((i as f32 * 0.1).sin(), 0.4, -0.3).normalize();
            let k = distort_scale(p, t, 2.0, d);
            assert!(k >= 1.0 - d * 0.3 - 1e-6 && k <= 1.0 + d * 0.3 + 1e-6);
        }
    }
}
