use std::sync::Arc;

use anyhow::Result;
use glam::Vec3;
use thiserror::Error;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::camera::Camera;
use crate::render::context::GpuContext;
use crate::render::post_pass::PostPass;
use crate::render::scene_pass::{GlobalUniform, GpuDrawable, ScenePass};
use crate::render::target::OffscreenTarget;
use crate::scene::Scene;

/// Pass-ordering violations within one frame.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("present requested before the scene pass was rendered")]
    PresentBeforeScene,
    #[error("scene pass rendered twice without an intervening present")]
    SceneRenderedTwice,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Surface(#[from] wgpu::SurfaceError),
    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// Enforces the scene-then-present ordering of the two passes.
///
/// The offscreen color texture holds nothing meaningful until the scene
/// pass has written it, so presenting first is rejected rather than
/// showing stale pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameSequencer {
    scene_rendered: bool,
}

impl FrameSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scene_rendered(&mut self) -> Result<(), FrameError> {
        if self.scene_rendered {
            return Err(FrameError::SceneRenderedTwice);
        }
        self.scene_rendered = true;
        Ok(())
    }

    pub fn present(&mut self) -> Result<(), FrameError> {
        if !self.scene_rendered {
            return Err(FrameError::PresentBeforeScene);
        }
        self.scene_rendered = false;
        Ok(())
    }
}

/// Owns the GPU context and both passes, and drives one frame at a time.
pub struct Renderer {
    gpu: GpuContext,
    target: OffscreenTarget,
    scene_pass: ScenePass,
    post_pass: PostPass,
    drawables: Vec<GpuDrawable>,
    clear_color: Vec3,
    sequencer: FrameSequencer,
}

impl Renderer {
    pub async fn new(
        window: Arc<Window>,
        config: &crate::config::RenderConfig,
        scene: &Scene,
        camera: &Camera,
    ) -> Result<Self> {
        let gpu = GpuContext::new(window, config).await?;
        let size = gpu.size();
        let format = gpu.surface_format();

        let target = OffscreenTarget::new(&gpu.device, size.width, size.height, format);
        let scene_pass = ScenePass::new(&gpu.device, &gpu.queue, format);
        let post_pass = PostPass::new(&gpu.device, format, &target, config.gamma);

        let drawables = scene_pass.upload_scene(&gpu.device, &gpu.queue, scene)?;
        scene_pass.write_globals(&gpu.queue, &GlobalUniform::new(camera, &scene.light));

        Ok(Self {
            gpu,
            target,
            scene_pass,
            post_pass,
            drawables,
            clear_color: scene.clear_color,
            sequencer: FrameSequencer::new(),
        })
    }

    pub fn window(&self) -> &Window {
        self.gpu.window()
    }

    pub fn window_id(&self) -> winit::window::WindowId {
        self.gpu.window_id()
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.gpu.size()
    }

    /// Recreates the surface, the offscreen target, and the post-pass
    /// binding at the new resolution.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.gpu.resize(new_size);
        self.target = OffscreenTarget::new(
            &self.gpu.device,
            new_size.width,
            new_size.height,
            self.gpu.surface_format(),
        );
        self.post_pass.bind(&self.gpu.device, &self.target);
    }

    pub fn update_camera(&mut self, camera: &Camera, scene: &Scene) {
        self.scene_pass
            .write_globals(&self.gpu.queue, &GlobalUniform::new(camera, &scene.light));
    }

    pub fn set_gamma(&self, gamma: f32) {
        self.post_pass.set_gamma(&self.gpu.queue, gamma);
    }

    /// Renders one frame: scene pass into the offscreen target, then the
    /// gamma pass into the backbuffer, one submit, then present.
    pub fn render_frame(&mut self) -> Result<(), RenderError> {
        let frame = self.gpu.acquire()?;
        let surface_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        self.scene_pass
            .record(&mut encoder, &self.target, self.clear_color, &self.drawables);
        self.sequencer.scene_rendered()?;

        self.post_pass.record(&mut encoder, &surface_view);
        self.sequencer.present()?;

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_before_scene_is_rejected() {
        let mut sequencer = FrameSequencer::new();
        assert_eq!(sequencer.present(), Err(FrameError::PresentBeforeScene));
    }

    #[test]
    fn scene_then_present_completes_a_frame() {
        let mut sequencer = FrameSequencer::new();
        sequencer.scene_rendered().unwrap();
        sequencer.present().unwrap();
        // The next frame starts from scratch.
        assert_eq!(sequencer.present(), Err(FrameError::PresentBeforeScene));
    }

    #[test]
    fn double_scene_render_is_rejected() {
        let mut sequencer = FrameSequencer::new();
        sequencer.scene_rendered().unwrap();
        assert_eq!(
            sequencer.scene_rendered(),
            Err(FrameError::SceneRenderedTwice)
        );
    }
}
