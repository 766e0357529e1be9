use anyhow::{Context, Result, anyhow};
use clap::Parser;
use quadcam_camera::{CameraConfig, CameraSystem};
use quadcam_common::{DEFAULT_HEIGHT, DEFAULT_TITLE, DEFAULT_WIDTH, WindowConfig};
use quadcam_input::{InputHandler, Key, KeyAction};
use quadcam_render_wgpu::{QuadRenderer, RendererOptions, Shape};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, DeviceId, ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

/// Pixel scroll deltas (touchpads) per line of wheel scroll.
const PIXELS_PER_SCROLL_LINE: f64 = 20.0;

#[derive(Parser)]
#[command(name = "quadcam-desktop", about = "Render a quad while an FPS camera tracks input")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Window width in pixels
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: u32,

    /// Window height in pixels
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: u32,

    /// Window title
    #[arg(long, default_value = DEFAULT_TITLE)]
    title: String,

    /// Shape to draw: quad or triangle
    #[arg(long, default_value = "quad")]
    shape: Shape,

    /// Draw edges only
    #[arg(long)]
    wireframe: bool,

    /// JSON file with camera speed, sensitivity and zoom limits
    #[arg(long)]
    camera_config: Option<PathBuf>,
}

/// Translate a physical key into a tracked camera key.
fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::KeyW => Some(Key::W),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyS => Some(Key::S),
        KeyCode::KeyD => Some(Key::D),
        KeyCode::Space => Some(Key::Space),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        _ => None,
    }
}

fn key_action(state: ElementState, repeat: bool) -> KeyAction {
    match (state, repeat) {
        (ElementState::Pressed, true) => KeyAction::Repeat,
        (ElementState::Pressed, false) => KeyAction::Pressed,
        (ElementState::Released, _) => KeyAction::Released,
    }
}

fn scroll_lines(delta: MouseScrollDelta) -> f64 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y as f64,
        MouseScrollDelta::PixelDelta(pos) => pos.y / PIXELS_PER_SCROLL_LINE,
    }
}

/// Cursor position rebuilt from raw mouse motion.
///
/// A grabbed cursor stops producing `CursorMoved` at the window edge (or at
/// all, when locked), so mouse-look integrates `MouseMotion` deltas instead
/// and hands the camera an unbounded absolute position.
#[derive(Debug, Clone, Copy, PartialEq)]
struct VirtualCursor {
    x: f64,
    y: f64,
}

impl VirtualCursor {
    fn new(window: &WindowConfig) -> Self {
        let center = window.center();
        Self {
            x: center.x as f64,
            y: center.y as f64,
        }
    }

    /// Apply a motion delta and return the new position.
    fn advance(&mut self, (dx, dy): (f64, f64)) -> (f64, f64) {
        let (x, y) = (self.x + dx, self.y + dy);
        if x.is_finite() && y.is_finite() {
            self.x = x;
            self.y = y;
        }
        (self.x, self.y)
    }
}

/// GPU resources created once the window exists.
struct Gpu {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: QuadRenderer,
}

impl Gpu {
    fn new(window: Arc<Window>, options: RendererOptions) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| anyhow!("no suitable GPU adapter"))?;

        let mut required_features = wgpu::Features::empty();
        if options.wireframe && adapter.features().contains(wgpu::Features::POLYGON_MODE_LINE) {
            required_features |= wgpu::Features::POLYGON_MODE_LINE;
        }

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("quadcam_device"),
                required_features,
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow!("surface reports no texture formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = QuadRenderer::new(&device, surface_format, options);
        if !renderer.diagnostics().is_empty() {
            tracing::warn!(
                "continuing with {} shader error(s); output may be blank",
                renderer.diagnostics().len()
            );
        }

        tracing::info!(
            shape = %renderer.shape(),
            wireframe = renderer.wireframe(),
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            renderer,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
    }

    fn draw(&mut self) {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.renderer.render(&self.device, &self.queue, &view);
        output.present();
    }
}

/// Window, GPU and camera owned by the event loop.
///
/// Input events reach the camera through this struct, which is the explicit
/// context the event loop hands to every callback.
struct App {
    window_config: WindowConfig,
    options: RendererOptions,
    camera: CameraSystem,
    cursor: VirtualCursor,
    focused: bool,
    start: Instant,
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
}

impl App {
    fn new(window_config: WindowConfig, options: RendererOptions, camera: CameraSystem) -> Self {
        Self {
            cursor: VirtualCursor::new(&window_config),
            window_config,
            options,
            camera,
            focused: true,
            start: Instant::now(),
            window: None,
            gpu: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        tracing::info!("starting window and GPU context");

        let attrs = Window::default_attributes()
            .with_title(self.window_config.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.window_config.width,
                self.window_config.height,
            ))
            .with_resizable(false);
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        capture_cursor(&window);

        self.gpu = Some(Gpu::new(window.clone(), self.options)?);
        self.window = Some(window);
        Ok(())
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, code: KeyCode, action: KeyAction) {
        let Some(key) = map_key(code) else {
            return;
        };
        if key == Key::Escape && action == KeyAction::Pressed {
            tracing::info!("escape pressed, closing");
            event_loop.exit();
            return;
        }
        self.camera.on_key(key, action);
    }

    fn redraw(&mut self) {
        let now = self.start.elapsed().as_secs_f32();
        self.camera.frame(now);

        let state = self.camera.state();
        let projection = self
            .camera
            .projection_matrix(self.window_config.aspect());
        tracing::trace!(
            position = ?state.position,
            front = ?state.front,
            fov = state.fov,
            dt = self.camera.timing().delta_time,
            view = ?self.camera.view_matrix_cols(),
            projection = ?projection.to_cols_array(),
            "frame"
        );

        if let Some(gpu) = &mut self.gpu {
            gpu.draw();
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Hide and lock the cursor for mouse-look, confining it where locking is
/// unsupported. Failure leaves the cursor free.
fn capture_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
    if let Err(e) = grabbed {
        tracing::warn!("cursor grab unavailable: {e}");
    }
    window.set_cursor_visible(false);
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            tracing::error!("initialization failed: {e:#}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size);
                }
            }
            WindowEvent::Focused(focused) => {
                self.focused = focused;
                if focused {
                    self.camera.reactivate_mouse();
                    if let Some(window) = &self.window {
                        capture_cursor(window);
                    }
                } else {
                    self.camera.release_keys();
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => {
                self.handle_key(event_loop, code, key_action(state, repeat));
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.camera.on_scroll(scroll_lines(delta));
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if !self.focused || self.window.is_none() {
            return;
        }
        if let DeviceEvent::MouseMotion { delta } = event {
            let (x, y) = self.cursor.advance(delta);
            self.camera.on_cursor_moved(x, y);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("quadcam-desktop starting");

    let camera_config = match &cli.camera_config {
        Some(path) => CameraConfig::load(path)
            .with_context(|| format!("load camera config {}", path.display()))?,
        None => CameraConfig::default(),
    };
    let window_config = WindowConfig::new(cli.width, cli.height, cli.title);
    let camera = CameraSystem::new(camera_config, &window_config);
    let options = RendererOptions {
        shape: cli.shape,
        wireframe: cli.wireframe,
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(window_config, options, camera);
    event_loop.run_app(&mut app)?;

    tracing::info!("quadcam-desktop exiting");
    Ok(())
}
