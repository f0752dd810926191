use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};

use crate::config::ConfigError;
use crate::material::Material;

/// Interleaved vertex format used by every mesh in the scene pass.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            uv: uv.to_array(),
        }
    }

    const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3, // normal
        2 => Float32x2  // uv
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// CPU-side geometry: interleaved vertices plus a triangle-list index
/// buffer, ready for upload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// The 2-by-2 ground quad around the origin: four vertices, two
/// triangles, normals pointing up, texture coordinates covering the
/// quad once.
pub fn ground_quad() -> MeshData {
    let normal = Vec3::Y;
    let vertices = vec![
        Vertex::new(Vec3::new(-1.0, 0.0, -1.0), normal, Vec2::new(0.0, 0.0)),
        Vertex::new(Vec3::new(1.0, 0.0, -1.0), normal, Vec2::new(1.0, 0.0)),
        Vertex::new(Vec3::new(-1.0, 0.0, 1.0), normal, Vec2::new(0.0, 1.0)),
        Vertex::new(Vec3::new(1.0, 0.0, 1.0), normal, Vec2::new(1.0, 1.0)),
    ];
    let indices = vec![0, 1, 2, 1, 2, 3];
    MeshData { vertices, indices }
}

/// Axis-aligned unit cube, the fallback model when no OBJ file is given.
pub fn unit_cube() -> MeshData {
    // One face per entry: outward normal plus the two in-plane axes.
    const FACES: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    ];

    let mut mesh = MeshData::default();
    for (normal, u_axis, v_axis) in FACES {
        let base = mesh.vertices.len() as u32;
        for (u, v) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
            let position = normal * 0.5 + u_axis * u + v_axis * v;
            let uv = Vec2::new(u + 0.5, 0.5 - v);
            mesh.vertices.push(Vertex::new(position, normal, uv));
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

/// Matrix that transforms normals correctly under non-uniform scaling.
pub fn normal_matrix(world: Mat4) -> Mat4 {
    world.inverse().transpose()
}

/// Geometry paired with a world transform and a material: the unit
/// submitted to a single draw call.
#[derive(Debug, Clone)]
pub struct Drawable {
    pub name: &'static str,
    pub mesh: MeshData,
    pub world: Mat4,
    /// Recomputed whenever `world` changes; transforms here are static,
    /// so once at construction.
    pub world_inverse_transpose: Mat4,
    pub material: Material,
}

impl Drawable {
    pub fn new(
        name: &'static str,
        mesh: MeshData,
        world: Mat4,
        material: Material,
    ) -> Result<Self, ConfigError> {
        material.validate()?;
        Ok(Self {
            name,
            mesh,
            world,
            world_inverse_transpose: normal_matrix(world),
            material,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::ShadingMode;

    #[test]
    fn ground_quad_matches_the_fixed_layout() {
        let quad = ground_quad();
        assert_eq!(quad.vertices.len(), 4);
        assert_eq!(quad.indices, vec![0, 1, 2, 1, 2, 3]);
        assert_eq!(quad.triangle_count(), 2);
        for vertex in &quad.vertices {
            assert_eq!(vertex.normal, [0.0, 1.0, 0.0]);
        }
        let uvs: Vec<[f32; 2]> = quad.vertices.iter().map(|v| v.uv).collect();
        assert_eq!(uvs, vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]);
    }

    #[test]
    fn unit_cube_has_six_quads() {
        let cube = unit_cube();
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.triangle_count(), 12);
        for vertex in &cube.vertices {
            // Every vertex sits on the surface of the unit cube.
            let p = Vec3::from_array(vertex.position);
            assert!((p.abs().max_element() - 0.5).abs() < 1e-6);
            let n = Vec3::from_array(vertex.normal);
            assert!((n.length() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn non_uniform_scale_needs_a_distinct_normal_matrix() {
        let world = Mat4::from_scale(Vec3::new(10.0, 6.5, 2.5));
        let normal = normal_matrix(world);
        assert_ne!(normal.to_cols_array(), world.to_cols_array());
        // Inverse-transpose of a pure scale divides instead of multiplies.
        let cols = normal.to_cols_array_2d();
        assert!((cols[0][0] - 0.1).abs() < 1e-6);
        assert!((cols[1][1] - 1.0 / 6.5).abs() < 1e-6);
        assert!((cols[2][2] - 0.4).abs() < 1e-6);
    }

    #[test]
    fn uniform_scale_keeps_normal_directions() {
        let world = Mat4::from_scale(Vec3::splat(50.0));
        let normal_m = normal_matrix(world);
        let n = normal_m.transform_vector3(Vec3::Y).normalize();
        assert!((n - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn drawable_precomputes_the_inverse_transpose() {
        let world = Mat4::from_scale(Vec3::new(10.0, 6.5, 2.5));
        let drawable = Drawable::new(
            "model",
            unit_cube(),
            world,
            Material::stock_model(ShadingMode::Standard),
        )
        .unwrap();
        assert_eq!(
            drawable.world_inverse_transpose.to_cols_array(),
            normal_matrix(world).to_cols_array()
        );
    }

    #[test]
    fn drawable_rejects_invalid_materials() {
        let material = Material {
            ambient_intensity: -0.5,
            ..Material::stock_model(ShadingMode::Standard)
        };
        assert!(Drawable::new("model", unit_cube(), Mat4::IDENTITY, material).is_err());
    }
}
