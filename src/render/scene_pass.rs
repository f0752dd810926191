use anyhow::Result;
use bytemuck::{bytes_of, Pod, Zeroable};
use glam::Vec3;
use log::error;
use wgpu::util::DeviceExt;

use crate::camera::Camera;
use crate::geometry::{Drawable, Vertex};
use crate::material::MaterialParams;
use crate::render::target::OffscreenTarget;
use crate::render::texture::{repeat_sampler, DiffuseTexture};
use crate::scene::{DirectionalLight, Scene};

/// Camera and light state shared by every draw call of the scene pass.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GlobalUniform {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub eye_pos: [f32; 4],
    pub light_dir: [f32; 4],
}

impl GlobalUniform {
    pub fn new(camera: &Camera, light: &DirectionalLight) -> Self {
        Self {
            view: camera.view().to_cols_array_2d(),
            proj: camera.projection().to_cols_array_2d(),
            eye_pos: camera.eye().extend(1.0).to_array(),
            light_dir: light.direction.extend(0.0).to_array(),
        }
    }
}

/// Per-drawable state: transforms plus the material parameter block.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ObjectUniform {
    pub world: [[f32; 4]; 4],
    pub world_inverse_transpose: [[f32; 4]; 4],
    pub material: MaterialParams,
}

impl ObjectUniform {
    pub fn new(drawable: &Drawable, has_texture: bool) -> Self {
        Self {
            world: drawable.world.to_cols_array_2d(),
            world_inverse_transpose: drawable.world_inverse_transpose.to_cols_array_2d(),
            material: drawable.material.params(has_texture),
        }
    }
}

/// GPU resources for one drawable, uploaded once at load time.
pub struct GpuDrawable {
    vertex: wgpu::Buffer,
    index: wgpu::Buffer,
    index_count: u32,
    object_bind_group: wgpu::BindGroup,
    texture_bind_group: wgpu::BindGroup,
    _texture: Option<DiffuseTexture>,
}

/// Draws the lit geometry into the offscreen target.
pub struct ScenePass {
    pipeline: wgpu::RenderPipeline,
    global_buffer: wgpu::Buffer,
    global_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    white: DiffuseTexture,
}

impl ScenePass {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene-shader"),
            source: wgpu::ShaderSource::Wgsl(super::shaders::SCENE_SHADER.into()),
        });

        let global_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("global-bind-layout"),
            entries: &[uniform_entry::<GlobalUniform>(0)],
        });
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object-bind-layout"),
            entries: &[uniform_entry::<ObjectUniform>(0)],
        });
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture-bind-layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene-pipeline-layout"),
            bind_group_layouts: &[&global_layout, &object_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let global_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("global-uniform"),
            size: std::mem::size_of::<GlobalUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let global_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("global-bind-group"),
            layout: &global_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: global_buffer.as_entire_binding(),
            }],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scene-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                // The stock scene relies on CullMode.None.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: OffscreenTarget::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            multiview: None,
            cache: None,
        });

        let sampler = repeat_sampler(device);
        let white = DiffuseTexture::white(device, queue);

        Self {
            pipeline,
            global_buffer,
            global_bind_group,
            object_layout,
            texture_layout,
            sampler,
            white,
        }
    }

    /// Writes the shared camera/light block before rendering.
    pub fn write_globals(&self, queue: &wgpu::Queue, globals: &GlobalUniform) {
        queue.write_buffer(&self.global_buffer, 0, bytes_of(globals));
    }

    /// Uploads every drawable of the scene, preserving draw order.
    ///
    /// A diffuse texture that fails to load degrades the drawable to
    /// flat-color shading instead of aborting.
    pub fn upload_scene(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        scene: &Scene,
    ) -> Result<Vec<GpuDrawable>> {
        scene
            .drawables
            .iter()
            .map(|drawable| self.upload_drawable(device, queue, drawable))
            .collect()
    }

    fn upload_drawable(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        drawable: &Drawable,
    ) -> Result<GpuDrawable> {
        let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{}-vertices", drawable.name)),
            contents: bytemuck::cast_slice(&drawable.mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{}-indices", drawable.name)),
            contents: bytemuck::cast_slice(&drawable.mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let texture = match &drawable.material.diffuse_texture {
            Some(path) => match DiffuseTexture::from_path(device, queue, path) {
                Ok(texture) => Some(texture),
                Err(err) => {
                    error!(
                        "failed to load texture for {}: {err:?}; using flat diffuse color",
                        drawable.name
                    );
                    None
                }
            },
            None => None,
        };
        let has_texture = texture.is_some();

        let constants = ObjectUniform::new(drawable, has_texture);
        let object_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{}-uniform", drawable.name)),
            contents: bytes_of(&constants),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let object_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{}-bind-group", drawable.name)),
            layout: &self.object_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: object_buffer.as_entire_binding(),
            }],
        });

        let view = texture
            .as_ref()
            .map(|t| &t.view)
            .unwrap_or(&self.white.view);
        let texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{}-texture-bind-group", drawable.name)),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        Ok(GpuDrawable {
            vertex,
            index,
            index_count: drawable.mesh.indices.len() as u32,
            object_bind_group,
            texture_bind_group,
            _texture: texture,
        })
    }

    /// Records the scene pass: clears color and depth, then draws every
    /// drawable in the fixed order.
    pub fn record(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &OffscreenTarget,
        clear_color: Vec3,
        drawables: &[GpuDrawable],
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scene-pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &target.color_view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: clear_color.x as f64,
                        g: clear_color.y as f64,
                        b: clear_color.z as f64,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &target.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.global_bind_group, &[]);

        for drawable in drawables {
            pass.set_bind_group(1, &drawable.object_bind_group, &[]);
            pass.set_bind_group(2, &drawable.texture_bind_group, &[]);
            pass.set_vertex_buffer(0, drawable.vertex.slice(..));
            pass.set_index_buffer(drawable.index.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..drawable.index_count, 0, 0..1);
        }
    }
}

fn uniform_entry<T>(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: std::num::NonZeroU64::new(std::mem::size_of::<T>() as u64),
        },
        count: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::ShadingMode;
    use glam::{Mat4, Vec3};

    fn stock_camera() -> Camera {
        Camera::new(Vec3::new(0.0, 50.0, 100.0), Vec3::ZERO, Vec3::Y, 4.0 / 3.0).unwrap()
    }

    #[test]
    fn global_uniform_carries_eye_and_light() {
        let camera = stock_camera();
        let light = DirectionalLight::default();
        let globals = GlobalUniform::new(&camera, &light);
        assert_eq!(globals.eye_pos, [0.0, 50.0, 100.0, 1.0]);
        assert_eq!(globals.light_dir, [-1.0, -1.0, -1.0, 0.0]);
        assert_eq!(globals.view, camera.view().to_cols_array_2d());
        assert_eq!(globals.proj, camera.projection().to_cols_array_2d());
    }

    #[test]
    fn object_uniform_keeps_world_and_normal_matrix_distinct() {
        let drawable = Drawable::new(
            "model",
            crate::geometry::unit_cube(),
            Mat4::from_scale(Vec3::new(10.0, 6.5, 2.5)),
            crate::material::Material::stock_model(ShadingMode::Standard),
        )
        .unwrap();
        let uniform = ObjectUniform::new(&drawable, false);
        assert_ne!(uniform.world, uniform.world_inverse_transpose);
    }

    #[test]
    fn object_uniform_is_idempotent() {
        let drawable = Drawable::new(
            "ground quad",
            crate::geometry::ground_quad(),
            Mat4::from_scale(Vec3::splat(50.0)),
            crate::material::Material::stock_ground(None),
        )
        .unwrap();
        assert_eq!(
            ObjectUniform::new(&drawable, false),
            ObjectUniform::new(&drawable, false)
        );
    }
}
