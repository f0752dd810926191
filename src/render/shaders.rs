//! WGSL sources for the two pipeline stages.
//!
//! The lighting math and the correction curve mirror the CPU reference in
//! `crate::shading`; keep the two in sync when changing either.

pub(crate) const SCENE_SHADER: &str = r#"
struct GlobalUniform {
    view: mat4x4<f32>,
    proj: mat4x4<f32>,
    eye_pos: vec4<f32>,
    light_dir: vec4<f32>,
}

struct MaterialParams {
    // rgb premultiplied by the ambient intensity
    ambient: vec4<f32>,
    diffuse: vec4<f32>,
    // rgb color, w intensity
    specular: vec4<f32>,
    // x specular power, y normal coloring, z procedural coloring, w textured
    extra: vec4<f32>,
}

struct ObjectUniform {
    world: mat4x4<f32>,
    world_inverse_transpose: mat4x4<f32>,
    material: MaterialParams,
}

@group(0) @binding(0)
var<uniform> globals: GlobalUniform;

@group(1) @binding(0)
var<uniform> object: ObjectUniform;

@group(2) @binding(0)
var diffuse_texture: texture_2d<f32>;
@group(2) @binding(1)
var diffuse_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world_pos = object.world * vec4<f32>(input.position, 1.0);
    out.clip_position = globals.proj * globals.view * world_pos;
    out.world_pos = world_pos.xyz;
    out.normal = (object.world_inverse_transpose * vec4<f32>(input.normal, 0.0)).xyz;
    out.uv = input.uv;
    return out;
}

fn checker(p: vec3<f32>) -> vec3<f32> {
    let cell = floor(p.x) + floor(p.y) + floor(p.z);
    let parity = cell - 2.0 * floor(cell * 0.5);
    return mix(vec3<f32>(0.1), vec3<f32>(0.9), vec3<f32>(parity));
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let mat = object.material;
    let normal = normalize(input.normal);
    let texel = textureSample(diffuse_texture, diffuse_sampler, input.uv).rgb;

    var diffuse_term = mat.diffuse.rgb;
    if (mat.extra.w > 0.5) {
        diffuse_term = texel;
    }
    if (mat.extra.z > 0.5) {
        diffuse_term = checker(input.world_pos);
    }

    let light_dir = normalize(globals.light_dir.xyz);
    let n_dot_l = max(dot(normal, -light_dir), 0.0);

    let view_dir = normalize(globals.eye_pos.xyz - input.world_pos);
    let reflected = light_dir - 2.0 * dot(normal, light_dir) * normal;
    let r_dot_v = max(dot(reflected, view_dir), 0.0);
    let specular = mat.specular.rgb * mat.specular.w * pow(r_dot_v, mat.extra.x);

    var color = mat.ambient.rgb + diffuse_term * n_dot_l + specular;
    if (mat.extra.y > 0.5) {
        color = normal * 0.5 + vec3<f32>(0.5);
    }
    return vec4<f32>(color, 1.0);
}
"#;

pub(crate) const POST_SHADER: &str = r#"
struct PostParams {
    // x holds gamma, the rest is padding
    gamma: vec4<f32>,
}

@group(0) @binding(0)
var scene_texture: texture_2d<f32>;
@group(0) @binding(1)
var scene_sampler: sampler;
@group(0) @binding(2)
var<uniform> params: PostParams;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

// Single triangle covering the whole viewport.
@vertex
fn vs_main(@builtin(vertex_index) index: u32) -> VertexOutput {
    var out: VertexOutput;
    let corner = vec2<f32>(f32((index << 1u) & 2u), f32(index & 2u));
    out.clip_position = vec4<f32>(corner * 2.0 - 1.0, 0.0, 1.0);
    out.uv = vec2<f32>(corner.x, 1.0 - corner.y);
    return out;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let color = textureSample(scene_texture, scene_sampler, input.uv);
    let gamma = max(params.gamma.x, 0.0001);
    let corrected = pow(max(color.rgb, vec3<f32>(0.0)), vec3<f32>(1.0 / gamma));
    return vec4<f32>(corrected, 1.0);
}
"#;
