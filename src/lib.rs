//! A minimal two-pass real-time renderer.
//!
//! The crate draws a lit model and a textured ground quad into an
//! offscreen target, then gamma-corrects that image into the backbuffer.
//! The math-heavy pieces (camera, materials, shading, geometry) are kept
//! free of GPU handles so they remain testable in headless tools.

pub mod camera;
pub mod config;
pub mod geometry;
pub mod material;
pub mod obj;
pub mod render;
pub mod scene;
pub mod shading;

pub use camera::Camera;
pub use config::{ConfigError, RenderConfig};
pub use geometry::{Drawable, MeshData, Vertex};
pub use material::{Material, MaterialParams, ShadingMode};
pub use obj::{load_obj_from_path, load_obj_from_str};
pub use render::Renderer;
pub use scene::{DirectionalLight, Scene};
