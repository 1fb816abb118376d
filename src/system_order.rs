//! Central system ordering labels to make update sequence explicit.
//! Stages (high-level):
//! 1. PointerSample (read cursor/touches, derive the world-space pointer)
//! 2. SceneAnimate (per-frame sphere + particle-field updates)
//! 3. Rendering (implicit)
use bevy::prelude::*;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct PointerSampleSet; // pointer sampled once, read by every scene

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct SceneAnimateSet; // frame updates that write transforms / meshes
