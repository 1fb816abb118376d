use anyhow::Context;
use bevy::prelude::*;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    /// Automatically close the app after this many seconds. 0.0 (or omitted) = run indefinitely.
    #[serde(rename = "autoClose")]
    pub auto_close: f32,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            title: "Hero Backdrop".into(),
            auto_close: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SpawnRange<T> {
    pub min: T,
    pub max: T,
}
impl<T: Default> Default for SpawnRange<T> {
    fn default() -> Self {
        Self {
            min: Default::default(),
            max: Default::default(),
        }
    }
}

/// Tuning for the pointer-reactive sphere scene.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SphereConfig {
    pub enabled: bool,
    /// Unit sphere radius before `scale` is applied.
    pub radius: f32,
    pub scale: f32,
    /// UV sphere tessellation (longitudes == latitudes).
    pub segments: u32,
    /// Continuous self-rotation rates (radians per elapsed second) on x / y.
    pub spin_rate_x: f32,
    pub spin_rate_y: f32,
    /// Per-frame pointer tilt increment gain, applied as (-py, px) * gain.
    pub tilt_gain: f32,
    /// Pointer follow target is ndc * follow_gain; follow_factor is the
    /// per-frame lerp factor (frame-rate dependent on purpose).
    pub follow_gain: f32,
    pub follow_factor: f32,
    /// Float rig bobbing (the whole scene gently rises and falls).
    pub float_speed: f32,
    pub float_amplitude: f32,
    /// Radial vertex distortion strength and its animation speeds.
    pub distort: f32,
    pub base_speed: f32,
    pub hover_speed: f32,
}
impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            radius: 1.0,
            scale: 2.2,
            segments: 64,
            spin_rate_x: 0.2,
            spin_rate_y: 0.3,
            tilt_gain: 0.2,
            follow_gain: 2.0,
            follow_factor: 0.1,
            float_speed: 4.0,
            float_amplitude: 0.2,
            distort: 0.6,
            base_speed: 2.0,
            hover_speed: 4.0,
        }
    }
}

/// Which pointer interaction the particle field runs. Stored as a plain
/// string in [`FieldConfig`] (the layered RON merge cannot carry enum
/// variants); resolve it with [`FieldConfig::interaction_mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Plain screen-space repulsion with quadratic falloff.
    Repulse,
    /// Proximity-graded oscillation boost with outward push, z-pop and jitter.
    #[default]
    Graded,
}

/// Parameters for [`InteractionMode::Repulse`].
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RepulseConfig {
    /// Squared x/y distance below which particles are pushed.
    pub threshold_sq: f32,
    /// Push per unit of (threshold_sq - dist_sq).
    pub strength: f32,
    /// Fixed ndc -> world scale used to place the pointer.
    pub pointer_scale_x: f32,
    pub pointer_scale_y: f32,
}
impl Default for RepulseConfig {
    fn default() -> Self {
        Self {
            threshold_sq: 16.0,
            strength: 0.02,
            pointer_scale_x: 20.0,
            pointer_scale_y: 10.0,
        }
    }
}

/// Parameters for [`InteractionMode::Graded`].
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GradedConfig {
    /// Squared anchor->pointer distance at which intensity reaches zero.
    pub threshold_sq: f32,
    /// Oscillation frequency multiplier is 1 + frequency_gain * intensity.
    pub frequency_gain: f32,
    /// Oscillation amplitude becomes amplitude + amplitude_gain * intensity.
    pub amplitude_gain: f32,
    /// Outward push along the pointer->anchor direction, scaled by intensity.
    pub push_strength: f32,
    /// Camera-ward +z offset, scaled by intensity.
    pub lift_strength: f32,
    /// Per-axis jitter half-range, scaled by intensity.
    pub jitter_scale: f32,
}
impl Default for GradedConfig {
    fn default() -> Self {
        Self {
            threshold_sq: 40.0,
            frequency_gain: 10.0,
            amplitude_gain: 1.5,
            push_strength: 4.0,
            lift_strength: 8.0,
            jitter_scale: 0.3,
        }
    }
}

/// Tuning for the ambient particle field scene.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FieldConfig {
    pub enabled: bool,
    pub count: usize,
    /// Cluster centers sit at x = -cluster_offset / +cluster_offset.
    pub cluster_offset: f32,
    /// Anchor distance from its cluster center; sampled uniformly in [min, max).
    pub radius_range: SpawnRange<f32>,
    /// Phase offsets are sampled uniformly in [0, phase_range).
    pub phase_range: f32,
    /// Base oscillation amplitude around the anchor.
    pub amplitude: f32,
    /// Seed for anchor/offset generation (the jitter stream derives from it).
    pub seed: u64,
    /// "Repulse" or "Graded" (case-insensitive); unknown values fall back to
    /// Graded with a validation warning.
    pub mode: String,
    pub repulse: RepulseConfig,
    pub graded: GradedConfig,
}

impl FieldConfig {
    pub fn interaction_mode(&self) -> InteractionMode {
        match self.mode.to_ascii_lowercase().as_str() {
            "repulse" => InteractionMode::Repulse,
            _ => InteractionMode::Graded,
        }
    }
}
impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            count: 10_000,
            cluster_offset: 12.0,
            radius_range: SpawnRange { min: 2.0, max: 8.0 },
            phase_range: 100.0,
            amplitude: 0.5,
            seed: 0xBAC4_0D17,
            mode: "Graded".into(),
            repulse: RepulseConfig::default(),
            graded: GradedConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq, Default)]
#[serde(default)]
pub struct BackdropConfig {
    pub window: WindowConfig,
    pub sphere: SphereConfig,
    pub field: FieldConfig,
}

/// What the startup config load produced; logged once the app is running.
#[derive(Resource, Debug, Default, Clone)]
pub struct ConfigLoadReport {
    pub layers_used: Vec<String>,
    pub errors: Vec<String>,
}

impl BackdropConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data =
            fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
        ron::from_str(&data).with_context(|| format!("parse RON {}", path.display()))
    }

    /// Load multiple config layers, later files overriding earlier ones (shallow & deep merge).
    /// Missing files are skipped; returns (config, list_of_layer_paths_used, list_of_errors).
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();

        fn merge_value(base: &mut ron::value::Value, overlay: ron::value::Value) {
            use ron::value::Value;
            match (base, overlay) {
                (Value::Map(bm), Value::Map(om)) => {
                    for (k, v) in om.into_iter() {
                        let mut incoming = Some(v);
                        let mut replaced = false;
                        for (ek, ev) in bm.iter_mut() {
                            if *ek == k {
                                let val = incoming.take().unwrap();
                                merge_value(ev, val);
                                replaced = true;
                                break;
                            }
                        }
                        if !replaced {
                            bm.insert(k, incoming.unwrap());
                        }
                    }
                }
                (b, o) => *b = o,
            }
        }

        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        if let Some(cur) = &mut merged {
                            merge_value(cur, val);
                        } else {
                            merged = Some(val);
                        }
                        used.push(path_ref.as_os_str().to_string_lossy().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }

        if let Some(val) = merged {
            match val.clone().into_rust::<BackdropConfig>() {
                Ok(cfg) => (cfg, used, errors),
                Err(e) => (BackdropConfig::default(), used, {
                    let mut evec = errors;
                    evec.push(format!(
                        "failed to deserialize merged config; using defaults: {e}"
                    ));
                    evec
                }),
            }
        } else {
            (BackdropConfig::default(), used, errors)
        }
    }

    /// Validate the configuration returning a list of human-readable warning strings.
    /// These represent suspicious / potentially unintended values but are not hard errors.
    /// Call at startup and log each warning with `warn!`.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if self.window.auto_close < 0.0 {
            w.push(format!(
                "window.autoClose {} negative -> treated as disabled (should be >= 0)",
                self.window.auto_close
            ));
        } else if self.window.auto_close > 0.0 && self.window.auto_close < 0.01 {
            w.push(format!(
                "window.autoClose {} very small; closes almost immediately",
                self.window.auto_close
            ));
        }

        let s = &self.sphere;
        if s.enabled {
            if s.radius <= 0.0 {
                w.push("sphere.radius must be > 0".into());
            }
            if s.scale <= 0.0 {
                w.push("sphere.scale must be > 0".into());
            }
            if s.segments < 3 {
                w.push(format!(
                    "sphere.segments {} too low to form a sphere",
                    s.segments
                ));
            } else if s.segments > 512 {
                w.push(format!(
                    "sphere.segments {} very high; CPU distortion cost grows quadratically",
                    s.segments
                ));
            }
            if !(0.0..=1.0).contains(&s.follow_factor) {
                w.push(format!(
                    "sphere.follow_factor {} outside 0..1 (per-frame lerp factor)",
                    s.follow_factor
                ));
            }
            if s.distort < 0.0 {
                w.push("sphere.distort negative -> inverted displacement".into());
            }
            if s.base_speed <= 0.0 || s.hover_speed <= 0.0 {
                w.push("sphere distortion speeds must be > 0".into());
            }
            if s.hover_speed < s.base_speed {
                w.push(format!(
                    "sphere.hover_speed {} below base_speed {}; hover will slow the distortion",
                    s.hover_speed, s.base_speed
                ));
            }
        }

        let f = &self.field;
        if f.enabled {
            if f.count == 0 {
                w.push("field.count is 0; nothing will spawn".into());
            }
            if f.count > 200_000 {
                w.push(format!(
                    "field.count {} very high; per-frame CPU update may not hold frame rate",
                    f.count
                ));
            }
            if f.radius_range.min > f.radius_range.max {
                w.push(format!(
                    "field.radius_range min ({}) greater than max ({})",
                    f.radius_range.min, f.radius_range.max
                ));
            }
            if f.radius_range.min < 0.0 {
                w.push("field.radius_range.min must be >= 0".into());
            }
            if (f.radius_range.max - f.radius_range.min).abs() < f32::EPSILON {
                w.push(format!(
                    "field.radius_range min == max ({}) -> zero variation",
                    f.radius_range.min
                ));
            }
            if f.phase_range <= 0.0 {
                w.push("field.phase_range must be > 0 (all particles oscillate in lockstep)".into());
            }
            if f.amplitude < 0.0 {
                w.push("field.amplitude negative".into());
            }
            if !matches!(
                f.mode.to_ascii_lowercase().as_str(),
                "repulse" | "graded"
            ) {
                w.push(format!(
                    "field.mode \"{}\" unknown; falling back to Graded",
                    f.mode
                ));
            }
            match f.interaction_mode() {
                InteractionMode::Repulse => {
                    if f.repulse.threshold_sq <= 0.0 {
                        w.push("field.repulse.threshold_sq must be > 0".into());
                    }
                    if f.repulse.strength < 0.0 {
                        w.push(
                            "field.repulse.strength negative -> attraction instead of repulsion"
                                .into(),
                        );
                    }
                }
                InteractionMode::Graded => {
                    let g = &f.graded;
                    if g.threshold_sq <= 0.0 {
                        w.push("field.graded.threshold_sq must be > 0".into());
                    }
                    if g.frequency_gain < 0.0 || g.amplitude_gain < 0.0 {
                        w.push("field.graded gains must be >= 0".into());
                    }
                    if g.push_strength < 0.0 {
                        w.push(
                            "field.graded.push_strength negative -> pulls particles into the pointer"
                                .into(),
                        );
                    }
                    if g.jitter_scale < 0.0 {
                        w.push("field.graded.jitter_scale negative".into());
                    }
                }
            }
        }
        if !self.sphere.enabled && !self.field.enabled {
            w.push("both scenes disabled; the backdrop will render nothing".into());
        }
        w
    }
}
