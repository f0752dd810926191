use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use glam::Vec3;
use log::info;
use pollster::block_on;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

use glaze_renderer::render::RenderError;
use glaze_renderer::{load_obj_from_path, Camera, RenderConfig, Renderer, Scene, ShadingMode};

const CAMERA_EYE: Vec3 = Vec3::new(0.0, 50.0, 100.0);
const CAMERA_TARGET: Vec3 = Vec3::ZERO;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = CliOptions::parse()?;

    let config = RenderConfig {
        width: options.width,
        height: options.height,
        vsync: options.vsync,
        gamma: options.gamma,
    };
    config.validate()?;
    let mode = ShadingMode::from_flags(options.normal_coloring, options.procedural_coloring)?;

    let mesh = match &options.model {
        Some(path) => load_obj_from_path(path)
            .with_context(|| format!("failed to load model {}", path.display()))?,
        None => glaze_renderer::geometry::unit_cube(),
    };
    let scene = Scene::stock(mesh, options.texture.clone(), mode)?;
    let camera = Camera::new(CAMERA_EYE, CAMERA_TARGET, Vec3::Y, config.aspect_ratio())?;

    if options.describe {
        describe(&config, &camera, &scene);
        return Ok(());
    }

    run_interactive(config, scene, camera)
}

/// Prints the resolved configuration and scene without touching the GPU.
fn describe(config: &RenderConfig, camera: &Camera, scene: &Scene) {
    println!(
        "Window: {}x{} (vsync {})",
        config.width,
        config.height,
        if config.vsync { "on" } else { "off" }
    );
    let eye = camera.eye();
    let target = camera.target();
    println!(
        "Camera: eye ({:.1}, {:.1}, {:.1}) looking at ({:.1}, {:.1}, {:.1})",
        eye.x, eye.y, eye.z, target.x, target.y, target.z
    );
    println!("Gamma: {:.2}", config.gamma);
    println!("Scene:");
    print!("{}", scene.describe());
    println!("Pipeline: scene pass -> offscreen target -> gamma pass -> backbuffer");
}

fn run_interactive(config: RenderConfig, scene: Scene, camera: Camera) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App {
        config,
        scene,
        camera,
        renderer: None,
        last_error: None,
    };
    event_loop.run_app(&mut app)?;

    if let Some(err) = app.last_error {
        return Err(err);
    }
    Ok(())
}

struct App {
    config: RenderConfig,
    scene: Scene,
    camera: Camera,
    renderer: Option<Renderer>,
    last_error: Option<anyhow::Error>,
}

impl App {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        self.last_error = Some(err);
        event_loop.exit();
    }

    fn handle_resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) -> Result<()> {
        let Some(renderer) = self.renderer.as_mut() else {
            return Ok(());
        };
        renderer.resize(new_size);
        if new_size.height > 0 {
            self.camera = Camera::new(
                CAMERA_EYE,
                CAMERA_TARGET,
                Vec3::Y,
                new_size.width as f32 / new_size.height as f32,
            )?;
            renderer.update_camera(&self.camera, &self.scene);
        }
        Ok(())
    }

    fn redraw(&mut self) -> Result<()> {
        let Some(renderer) = self.renderer.as_mut() else {
            return Ok(());
        };
        match renderer.render_frame() {
            Ok(()) => Ok(()),
            Err(RenderError::Surface(
                wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated,
            )) => {
                let size = renderer.window().inner_size();
                renderer.resize(size);
                Ok(())
            }
            Err(RenderError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                Err(anyhow!("GPU is out of memory"))
            }
            Err(RenderError::Surface(err)) => {
                info!("Surface error ({err}); retrying next frame");
                Ok(())
            }
            Err(err @ RenderError::Frame(_)) => Err(err.into()),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }
        let attributes = Window::default_attributes()
            .with_title("Glaze Renderer")
            .with_inner_size(LogicalSize::new(
                self.config.width as f64,
                self.config.height as f64,
            ));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                self.fail(event_loop, anyhow!(err).context("failed to create window"));
                return;
            }
        };
        match block_on(Renderer::new(window, &self.config, &self.scene, &self.camera)) {
            Ok(renderer) => self.renderer = Some(renderer),
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(renderer) = self.renderer.as_ref() else {
            return;
        };
        if window_id != renderer.window_id() {
            return;
        }
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Err(err) = self.handle_resize(size) {
                    self.fail(event_loop, err);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw() {
                    self.fail(event_loop, err);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(renderer) = self.renderer.as_ref() {
            renderer.window().request_redraw();
        }
    }
}

struct CliOptions {
    model: Option<PathBuf>,
    texture: Option<PathBuf>,
    gamma: f32,
    width: u32,
    height: u32,
    vsync: bool,
    normal_coloring: bool,
    procedural_coloring: bool,
    describe: bool,
}

impl CliOptions {
    fn parse() -> Result<Self> {
        let defaults = RenderConfig::default();
        let mut options = Self {
            model: None,
            texture: None,
            gamma: defaults.gamma,
            width: defaults.width,
            height: defaults.height,
            vsync: defaults.vsync,
            normal_coloring: false,
            procedural_coloring: false,
            describe: false,
        };

        let mut args = env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--texture" => options.texture = Some(PathBuf::from(value(&mut args, &arg)?)),
                "--gamma" => options.gamma = parse_value(&mut args, &arg)?,
                "--width" => options.width = parse_value(&mut args, &arg)?,
                "--height" => options.height = parse_value(&mut args, &arg)?,
                "--vsync" => options.vsync = true,
                "--normal-coloring" => options.normal_coloring = true,
                "--procedural-coloring" => options.procedural_coloring = true,
                "--describe" => options.describe = true,
                other if !other.starts_with('-') && options.model.is_none() => {
                    options.model = Some(PathBuf::from(other));
                }
                other => {
                    return Err(anyhow!(
                        "Unknown argument: {other}. Usage: glaze-renderer [MODEL.obj] \
                         [--texture PATH] [--gamma VALUE] [--width N] [--height N] [--vsync] \
                         [--normal-coloring] [--procedural-coloring] [--describe]"
                    ));
                }
            }
        }
        Ok(options)
    }
}

fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next()
        .ok_or_else(|| anyhow!("{flag} requires a value"))
}

fn parse_value<T>(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = value(args, flag)?;
    raw.parse()
        .map_err(|err| anyhow!("invalid value for {flag}: {raw} ({err})"))
}
