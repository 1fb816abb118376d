//! Pure per-frame animation math shared by both scenes.
//! Everything here is a function of (anchor, phase offset, time, pointer) so
//! positions can never drift: nothing feeds back into the next frame.

use bevy::prelude::*;

/// Scalar exponential smoothing step (fixed factor per frame).
#[inline]
pub fn lerp(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}

/// Breathing offset around an anchor. The three axes run at deliberately
/// different rates (1.0 / 0.8 / 1.2) so the motion never looks synchronized.
#[inline]
pub fn breathing_offset(t: f32, phase: f32, frequency: f32, amplitude: f32) -> Vec3 {
    Vec3::new(
        (t * frequency + phase).sin(),
        (t * 0.8 * frequency + phase).cos(),
        (t * 1.2 * frequency + phase).sin(),
    ) * amplitude
}

/// Eased pointer-proximity falloff: 1 at the pointer, 0 at the threshold
/// boundary and beyond, monotone decreasing in between.
#[inline]
pub fn interaction_intensity(dist_sq: f32, threshold_sq: f32) -> f32 {
    if dist_sq >= threshold_sq || threshold_sq <= 0.0 {
        return 0.0;
    }
    let x = 1.0 - dist_sq / threshold_sq;
    x * x
}

/// Quadratic repulsion push used by the simple interaction mode.
/// Returns the per-unit displacement factor (0 outside the threshold).
#[inline]
pub fn repulse_push(dist_sq: f32, threshold_sq: f32, strength: f32) -> f32 {
    if dist_sq >= threshold_sq {
        0.0
    } else {
        (threshold_sq - dist_sq) * strength
    }
}

/// Worst-case displacement from the anchor the graded interaction can produce,
/// given base amplitude and the graded gains. Used by the drift-bound tests.
pub fn max_graded_displacement(
    amplitude: f32,
    amplitude_gain: f32,
    push_strength: f32,
    lift_strength: f32,
    jitter_scale: f32,
) -> f32 {
    // All three oscillation axes can peak at once in the worst case.
    let osc = (amplitude + amplitude_gain) * 3f32.sqrt();
    // Push is planar, lift is +z, jitter is +-jitter/2 per axis.
    osc + push_strength + lift_strength + jitter_scale * 0.5 * 3f32.sqrt()
}
