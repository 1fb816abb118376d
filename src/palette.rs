//! Centralized backdrop color palette & helpers.
//! Single source of truth for sphere material, light and particle colors.

use bevy::prelude::*;

/// Sphere material when idle (#ffffff).
pub const SPHERE_BASE: Color = Color::srgb(1.0, 1.0, 1.0);
/// Sphere material while hovered (#e879f9).
pub const SPHERE_HOVER: Color = Color::srgb(0.910, 0.475, 0.976);
/// Key light / left galaxy light (#a855f7).
pub const LIGHT_PURPLE: Color = Color::srgb(0.659, 0.333, 0.969);
/// Fill light / right galaxy light (#ec4899).
pub const LIGHT_PINK: Color = Color::srgb(0.925, 0.282, 0.600);
/// Particle point color; rendered additively at [`PARTICLE_ALPHA`].
pub const PARTICLE_WHITE: Color = Color::srgb(1.0, 1.0, 1.0);
pub const PARTICLE_ALPHA: f32 = 0.9;

/// Sphere material color for the given hover state.
#[inline]
pub fn sphere_color(hovered: bool) -> Color {
    if hovered {
        SPHERE_HOVER
    } else {
        SPHERE_BASE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_swaps_color() {
        assert_eq!(sphere_color(false), SPHERE_BASE);
        assert_eq!(sphere_color(true), SPHERE_HOVER);
        assert!(SPHERE_BASE != SPHERE_HOVER);
    }

    #[test]
    fn lights_distinct() {
        // Protect against accidental duplicates when tweaking the palette
        assert!(LIGHT_PURPLE != LIGHT_PINK);
    }
}
