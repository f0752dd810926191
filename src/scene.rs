use std::path::PathBuf;

use glam::{Mat4, Vec3};

use crate::config::ConfigError;
use crate::geometry::{ground_quad, Drawable, MeshData};
use crate::material::{Material, ShadingMode};

/// Single fixed directional light shared by the whole scene pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Direction the light travels, not necessarily normalized.
    pub direction: Vec3,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vec3::new(-1.0, -1.0, -1.0),
        }
    }
}

/// The renderable scene: a fixed, ordered list of drawables plus the
/// light and the scene-pass clear color.
///
/// Draw order is fixed for determinism; with opaque depth-tested
/// geometry it does not affect the final image.
#[derive(Debug, Clone)]
pub struct Scene {
    pub drawables: Vec<Drawable>,
    pub light: DirectionalLight,
    pub clear_color: Vec3,
}

/// Deep sky blue, the fixed scene-pass clear color.
pub const SKY_COLOR: Vec3 = Vec3::new(0.0, 0.749, 1.0);

/// World transform of the model drawable: a non-uniform scale, which is
/// what makes the world-inverse-transpose matter for normals.
pub const MODEL_SCALE: Vec3 = Vec3::new(10.0, 6.5, 2.5);

/// Uniform scale applied to the 2-by-2 ground quad.
pub const GROUND_SCALE: f32 = 50.0;

impl Scene {
    /// Builds the stock two-drawable scene: the model first, then the
    /// ground quad.
    ///
    /// `mode` selects the shading variant for the model material; the
    /// ground quad always uses standard shading so its texture stays
    /// visible.
    pub fn stock(
        model_mesh: MeshData,
        ground_texture: Option<PathBuf>,
        mode: ShadingMode,
    ) -> Result<Self, ConfigError> {
        let model = Drawable::new(
            "model",
            model_mesh,
            Mat4::from_scale(MODEL_SCALE),
            Material::stock_model(mode),
        )?;
        let ground = Drawable::new(
            "ground quad",
            ground_quad(),
            Mat4::from_scale(Vec3::splat(GROUND_SCALE)),
            Material::stock_ground(ground_texture),
        )?;
        Ok(Self {
            drawables: vec![model, ground],
            light: DirectionalLight::default(),
            clear_color: SKY_COLOR,
        })
    }

    /// One-line-per-drawable summary used by the headless describe mode.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for drawable in &self.drawables {
            let texture = match &drawable.material.diffuse_texture {
                Some(path) => format!("textured ({})", path.display()),
                None => "untextured".to_string(),
            };
            out.push_str(&format!(
                " - {}: {} vertices, {} triangles, {} shading, {}\n",
                drawable.name,
                drawable.mesh.vertices.len(),
                drawable.mesh.triangle_count(),
                drawable.material.mode.label(),
                texture,
            ));
        }
        out
    }
}
