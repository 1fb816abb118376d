use bevy::prelude::*;

use crate::system_order::PointerSampleSet;

/// One pointer sample per frame, shared read-only by both scenes.
/// All fields retain their last value while the cursor is outside the window
/// (matching how a hero backdrop should keep drifting toward the exit point
/// rather than snapping back to center).
#[derive(Resource, Debug, Clone, Copy)]
pub struct PointerState {
    /// Normalized device coordinates in [-1, 1], x right / y up.
    pub ndc: Vec2,
    /// Pointer projected onto the z = 0 plane (particle plane).
    pub world: Vec2,
    /// Viewport world-space half extents at the z = 0 plane.
    pub half_extents: Vec2,
    /// Raw window cursor position (logical pixels, top-left origin) of the
    /// last sample; used for hover ray casts.
    pub screen: Vec2,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            ndc: Vec2::ZERO,
            world: Vec2::ZERO,
            half_extents: Vec2::ONE,
            screen: Vec2::ZERO,
        }
    }
}

/// Map a window cursor position (top-left origin, y down) to ndc (y up).
#[inline]
pub fn ndc_from_cursor(cursor: Vec2, width: f32, height: f32) -> Vec2 {
    Vec2::new(
        cursor.x / width * 2.0 - 1.0,
        1.0 - cursor.y / height * 2.0,
    )
}

pub struct PointerPlugin;

impl Plugin for PointerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerState>()
            .add_systems(Update, sample_pointer.in_set(PointerSampleSet));
    }
}

/// Unified pointer (mouse or first touch) sampling plus viewport extents.
fn sample_pointer(
    windows: Query<&Window>,
    touches: Res<Touches>,
    camera_q: Query<(&Projection, &GlobalTransform), With<Camera3d>>,
    mut pointer: ResMut<PointerState>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    // Prefer an active touch (first one); touch positions share the cursor's
    // coordinate space.
    let sample = touches
        .iter()
        .next()
        .map(|t| t.position())
        .or_else(|| window.cursor_position());
    if let Some(pos) = sample {
        if window.width() > 0.0 && window.height() > 0.0 {
            pointer.screen = pos;
            pointer.ndc = ndc_from_cursor(pos, window.width(), window.height());
        }
    }

    // World extents of the viewport at the particle plane (z = 0), derived
    // from the perspective frustum. Skip until the camera exists.
    let Ok((projection, cam_tf)) = camera_q.single() else {
        return;
    };
    if let Projection::Perspective(p) = projection {
        let dist = cam_tf.translation().z;
        if dist > 0.0 {
            let half_h = (p.fov * 0.5).tan() * dist;
            pointer.half_extents = Vec2::new(half_h * p.aspect_ratio, half_h);
        }
    }
    pointer.world = pointer.ndc * pointer.half_extents;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_center_maps_to_origin() {
        let ndc = ndc_from_cursor(Vec2::new(640.0, 360.0), 1280.0, 720.0);
        assert!(ndc.length() < 1e-6);
    }

    #[test]
    fn cursor_corners_map_to_unit_square() {
        // Top-left of the window is (-1, +1) in ndc (y flips)
        let tl = ndc_from_cursor(Vec2::ZERO, 1280.0, 720.0);
        assert_eq!(tl, Vec2::new(-1.0, 1.0));
        let br = ndc_from_cursor(Vec2::new(1280.0, 720.0), 1280.0, 720.0);
        assert_eq!(br, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn default_state_is_centered() {
        let p = PointerState::default();
        assert_eq!(p.ndc, Vec2::ZERO);
        assert_eq!(p.world, Vec2::ZERO);
    }
}
