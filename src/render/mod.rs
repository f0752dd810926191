pub mod context;
pub mod frame;
pub mod post_pass;
pub mod scene_pass;
pub mod shaders;
pub mod target;
pub mod texture;

pub use context::GpuContext;
pub use frame::{FrameError, FrameSequencer, RenderError, Renderer};
pub use post_pass::{PostParams, PostPass};
pub use scene_pass::{GlobalUniform, ObjectUniform, ScenePass};
pub use target::OffscreenTarget;
