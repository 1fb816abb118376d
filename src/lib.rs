pub mod auto_close;
pub mod camera;
pub mod config;
pub mod field;
pub mod motion;
pub mod palette;
pub mod pointer;
pub mod scene;
pub mod sphere;
pub mod system_order;

// Curated re-exports
pub use config::{
    BackdropConfig, ConfigLoadReport, FieldConfig, InteractionMode, SphereConfig, WindowConfig,
};
pub use pointer::PointerState;
pub use scene::BackdropPlugin;
