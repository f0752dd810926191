//! CPU reference of the fixed shading model and the post-process curve.
//!
//! The WGSL shaders implement exactly these formulas; keeping a plain Rust
//! copy makes the shading contract testable without a GPU.

use glam::Vec3;

use crate::material::{Material, ShadingMode};

/// Evaluates `ambient + diffuse_term * NdotL + specular_term * RdotV^power`
/// for one surface point.
///
/// `texel` is the diffuse texture sample when one is bound; `light_dir` is
/// the direction the light travels (pointing away from the source), and
/// `view_dir` points from the surface towards the eye.
pub fn evaluate(
    material: &Material,
    texel: Option<Vec3>,
    world_pos: Vec3,
    normal: Vec3,
    light_dir: Vec3,
    view_dir: Vec3,
) -> Vec3 {
    let normal = normal.normalize();
    if material.mode == ShadingMode::NormalVisualization {
        return normal * 0.5 + Vec3::splat(0.5);
    }

    let diffuse_term = match material.mode {
        ShadingMode::Procedural => procedural_color(world_pos),
        _ => texel.unwrap_or(material.diffuse_color),
    };

    let light_dir = light_dir.normalize();
    let n_dot_l = normal.dot(-light_dir).max(0.0);

    let reflected = light_dir - 2.0 * normal.dot(light_dir) * normal;
    let r_dot_v = reflected.dot(view_dir.normalize()).max(0.0);
    let specular =
        material.specular_color * material.specular_intensity * r_dot_v.powf(material.specular_power);

    material.ambient_color * material.ambient_intensity + diffuse_term * n_dot_l + specular
}

/// Checker pattern keyed on world position, used by the procedural mode.
pub fn procedural_color(world_pos: Vec3) -> Vec3 {
    let cell = world_pos.x.floor() + world_pos.y.floor() + world_pos.z.floor();
    let parity = cell - 2.0 * (cell * 0.5).floor();
    Vec3::splat(0.1).lerp(Vec3::splat(0.9), parity)
}

/// The pinned post-process correction curve: `value^(1/gamma)`.
///
/// Gamma 1.0 is the identity; gamma above 1.0 brightens mid-tones.
pub fn gamma_curve(value: f32, gamma: f32) -> f32 {
    value.max(0.0).powf(1.0 / gamma)
}

/// Applies the correction curve per channel.
pub fn correct(color: Vec3, gamma: f32) -> Vec3 {
    Vec3::new(
        gamma_curve(color.x, gamma),
        gamma_curve(color.y, gamma),
        gamma_curve(color.z, gamma),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const LIGHT: Vec3 = Vec3::new(-1.0, -1.0, -1.0);

    #[test]
    fn gamma_one_is_identity() {
        let color = Vec3::new(0.1, 0.5, 0.9);
        let corrected = correct(color, 1.0);
        assert!((corrected - color).length() < 1e-6);
    }

    #[test]
    fn gamma_one_and_a_half_brightens_mid_gray() {
        let corrected = correct(Vec3::splat(0.5), 1.5);
        let expected = 0.5f32.powf(1.0 / 1.5);
        for channel in [corrected.x, corrected.y, corrected.z] {
            assert!((channel - expected).abs() < 1e-6);
        }
        assert!(expected > 0.5, "the pinned curve brightens, not darkens");
    }

    #[test]
    fn dark_side_of_untextured_zero_intensity_ground_is_black() {
        let material = Material::stock_ground(None);
        // Normal faces away from the light: no diffuse contribution, and
        // ambient/specular intensities are both zero.
        let normal = Vec3::new(0.0, -1.0, 0.0);
        let color = evaluate(&material, None, Vec3::ZERO, normal, LIGHT, Vec3::Z);
        assert_eq!(color, Vec3::ZERO);
    }

    #[test]
    fn textured_zero_intensity_ground_shows_the_raw_sample() {
        let material = Material::stock_ground(Some(PathBuf::from("cobblestones.png")));
        let texel = Vec3::new(0.3, 0.6, 0.2);
        // Normal aligned with the light direction so NdotL is exactly 1.
        let normal = -LIGHT.normalize();
        let color = evaluate(&material, Some(texel), Vec3::ZERO, normal, LIGHT, Vec3::Z);
        assert!((color - texel).length() < 1e-6);
    }

    #[test]
    fn normal_visualization_ignores_lighting() {
        let material = Material::stock_model(ShadingMode::NormalVisualization);
        let color = evaluate(&material, None, Vec3::ZERO, Vec3::Y, LIGHT, Vec3::Z);
        assert!((color - Vec3::new(0.5, 1.0, 0.5)).length() < 1e-6);
    }

    #[test]
    fn procedural_mode_replaces_only_the_diffuse_term() {
        let mut material = Material::stock_model(ShadingMode::Procedural);
        material.ambient_intensity = 0.0;
        material.specular_intensity = 0.0;
        let normal = -LIGHT.normalize();
        let inside_light_cell = Vec3::new(0.5, 0.5, 0.5);
        let color = evaluate(&material, None, inside_light_cell, normal, LIGHT, Vec3::Z);
        let expected = procedural_color(inside_light_cell);
        assert!((color - expected).length() < 1e-6);
    }

    #[test]
    fn checker_alternates_between_adjacent_cells() {
        let a = procedural_color(Vec3::new(0.5, 0.5, 0.5));
        let b = procedural_color(Vec3::new(1.5, 0.5, 0.5));
        assert_ne!(a, b);
        assert_eq!(a, procedural_color(Vec3::new(2.5, 0.5, 0.5)));
    }
}
