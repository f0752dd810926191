use std::path::PathBuf;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::config::ConfigError;

/// How the diffuse term of a surface is produced.
///
/// A single enumeration instead of two independent booleans, so the
/// ambiguous "both enabled" state cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadingMode {
    /// Texture sample when one is bound, flat diffuse color otherwise.
    #[default]
    Standard,
    /// Surface normals scaled and biased into displayable colors; lighting
    /// terms are skipped entirely.
    NormalVisualization,
    /// Diffuse term replaced by a procedural checker keyed on world
    /// position; ambient and specular still apply.
    Procedural,
}

impl ShadingMode {
    /// Maps the two legacy toggle flags onto the enumeration.
    pub fn from_flags(normal_coloring: bool, procedural_coloring: bool) -> Result<Self, ConfigError> {
        match (normal_coloring, procedural_coloring) {
            (false, false) => Ok(Self::Standard),
            (true, false) => Ok(Self::NormalVisualization),
            (false, true) => Ok(Self::Procedural),
            (true, true) => Err(ConfigError::ConflictingShadingModes),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::NormalVisualization => "normal-coloring",
            Self::Procedural => "procedural",
        }
    }
}

/// Shading parameters for one drawable surface.
///
/// One instance per drawable, built at load time and immutable during a
/// frame. `params` turns it into the typed uniform block pushed to the
/// shader right before the drawable's draw call.
#[derive(Debug, Clone)]
pub struct Material {
    pub ambient_color: Vec3,
    pub ambient_intensity: f32,
    pub diffuse_color: Vec3,
    pub specular_color: Vec3,
    pub specular_intensity: f32,
    pub specular_power: f32,
    /// Absent texture means untextured shading with the flat diffuse color.
    pub diffuse_texture: Option<PathBuf>,
    pub mode: ShadingMode,
}

impl Material {
    /// Model material from the stock scene: red, lightly ambient, with a
    /// sharp white highlight and no texture.
    pub fn stock_model(mode: ShadingMode) -> Self {
        Self {
            ambient_color: Vec3::new(1.0, 0.0, 0.0),
            ambient_intensity: 0.2,
            diffuse_color: Vec3::new(1.0, 0.0, 0.0),
            specular_color: Vec3::ONE,
            specular_intensity: 2.0,
            specular_power: 25.0,
            diffuse_texture: None,
            mode,
        }
    }

    /// Ground material from the stock scene: the diffuse texture carries
    /// the whole appearance, ambient and specular contribute nothing.
    pub fn stock_ground(diffuse_texture: Option<PathBuf>) -> Self {
        Self {
            ambient_color: Vec3::ONE,
            ambient_intensity: 0.0,
            diffuse_color: Vec3::ONE,
            specular_color: Vec3::ONE,
            specular_intensity: 0.0,
            specular_power: 0.0,
            diffuse_texture,
            mode: ShadingMode::Standard,
        }
    }

    /// Rejects values that the shading model cannot give a meaning to.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("ambient intensity", self.ambient_intensity),
            ("specular intensity", self.specular_intensity),
            ("specular power", self.specular_power),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::NegativeMaterialValue { name, value });
            }
        }
        Ok(())
    }

    /// Produces the uniform block for this material.
    ///
    /// `has_texture` reports whether a diffuse texture is actually resident
    /// on the GPU; a material that references a texture which failed to
    /// load degrades to flat-color shading by passing `false` here.
    pub fn params(&self, has_texture: bool) -> MaterialParams {
        let ambient = self.ambient_color * self.ambient_intensity;
        MaterialParams {
            ambient: [ambient.x, ambient.y, ambient.z, 0.0],
            diffuse: [
                self.diffuse_color.x,
                self.diffuse_color.y,
                self.diffuse_color.z,
                1.0,
            ],
            specular: [
                self.specular_color.x,
                self.specular_color.y,
                self.specular_color.z,
                self.specular_intensity,
            ],
            extra: [
                self.specular_power,
                flag(self.mode == ShadingMode::NormalVisualization),
                flag(self.mode == ShadingMode::Procedural),
                flag(has_texture),
            ],
        }
    }
}

fn flag(value: bool) -> f32 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Typed shader parameter block for one material.
///
/// Layout mirrors the `MaterialParams` struct in the scene shader:
/// premultiplied ambient, flat diffuse color, specular color with the
/// intensity in `w`, then specular power and the three mode flags.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MaterialParams {
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub extra: [f32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_diffuse_color_passes_through_verbatim() {
        let color = Vec3::new(0.25, 0.5, 0.75);
        let material = Material {
            diffuse_color: color,
            ..Material::stock_model(ShadingMode::Standard)
        };
        let params = material.params(false);
        assert_eq!(params.diffuse, [0.25, 0.5, 0.75, 1.0]);
        // No texture bound and no override flag set.
        assert_eq!(params.extra[1], 0.0);
        assert_eq!(params.extra[2], 0.0);
        assert_eq!(params.extra[3], 0.0);
    }

    #[test]
    fn applying_twice_yields_identical_parameters() {
        let material = Material::stock_model(ShadingMode::Procedural);
        assert_eq!(material.params(false), material.params(false));
        let ground = Material::stock_ground(Some(PathBuf::from("cobblestones.png")));
        assert_eq!(ground.params(true), ground.params(true));
    }

    #[test]
    fn ambient_color_is_premultiplied_by_intensity() {
        let material = Material::stock_model(ShadingMode::Standard);
        let params = material.params(false);
        assert_eq!(params.ambient, [0.2, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn negative_intensity_fails_validation() {
        let material = Material {
            specular_intensity: -1.0,
            ..Material::stock_model(ShadingMode::Standard)
        };
        assert!(matches!(
            material.validate(),
            Err(ConfigError::NegativeMaterialValue {
                name: "specular intensity",
                ..
            })
        ));
    }

    #[test]
    fn conflicting_flags_are_rejected() {
        assert_eq!(
            ShadingMode::from_flags(true, true),
            Err(ConfigError::ConflictingShadingModes)
        );
        assert_eq!(ShadingMode::from_flags(false, false), Ok(ShadingMode::Standard));
        assert_eq!(
            ShadingMode::from_flags(true, false),
            Ok(ShadingMode::NormalVisualization)
        );
        assert_eq!(
            ShadingMode::from_flags(false, true),
            Ok(ShadingMode::Procedural)
        );
    }

    #[test]
    fn mode_flags_are_mutually_exclusive_in_params() {
        let normal = Material::stock_model(ShadingMode::NormalVisualization).params(false);
        assert_eq!((normal.extra[1], normal.extra[2]), (1.0, 0.0));
        let procedural = Material::stock_model(ShadingMode::Procedural).params(false);
        assert_eq!((procedural.extra[1], procedural.extra[2]), (0.0, 1.0));
    }
}
