//! Double-Slit Experiment Simulation
//!
//! Young's double-slit interference across the visible spectrum (ROYGBIV),
//! with live slit separation and wavelength controls.

mod clock;
mod error;
mod gui;
mod input;

use clock::FixedTimestep;
use error::AppError;
use gui::{Gui, UiState};
use input::{key_action, HeldKeys, KeyAction};
use slit_physics::{SCENE_HEIGHT, SCENE_WIDTH, TICK_RATE};
use slit_renderer::{build_scene, SceneView, SlitRenderer};
use slit_simulation::Simulation;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

/// Catch-up ticks allowed per frame after a stall
const MAX_STEPS_PER_FRAME: u32 = 8;

struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    simulation: Simulation,
    renderer: SlitRenderer,
    view: SceneView,
    timestep: FixedTimestep,

    gui: Gui,
    ui_state: UiState,

    frame_times: VecDeque<f32>,
    last_frame_time: Instant,
}

impl GpuState {
    async fn new(window: Arc<Window>) -> Result<Self, AppError> {
        let size = window.inner_size();

        // Create wgpu instance
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        // Request adapter
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("✓ Using GPU: {}", adapter.get_info().name);

        // Create device and queue
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        // Configure surface
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(AppError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // Create simulation
        let simulation = Simulation::default();
        log::info!("✓ Simulation initialized");

        // Create renderer
        let renderer = SlitRenderer::new(&device, config.format);
        let view = SceneView::new(SCENE_WIDTH, SCENE_HEIGHT, config.width, config.height);
        log::info!("✓ Renderer initialized");

        // Create GUI
        let gui = Gui::new(&device, config.format, &window);
        let mut ui_state = UiState::default();
        ui_state.sync(&simulation);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            simulation,
            renderer,
            view,
            timestep: FixedTimestep::new(TICK_RATE, MAX_STEPS_PER_FRAME),
            gui,
            ui_state,
            frame_times: VecDeque::with_capacity(100),
            last_frame_time: Instant::now(),
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.view.resize(new_size.width, new_size.height);
        }
    }

    /// Run whatever fixed ticks are due, sampling held keys once per tick
    fn update(&mut self, held: &HeldKeys, elapsed: f32) {
        // Commands issued by the overlay last frame
        for command in self.ui_state.commands.drain(..) {
            self.simulation.apply(command);
        }

        for _ in 0..self.timestep.advance(elapsed) {
            for command in held.commands() {
                self.simulation.apply(command);
            }
            self.simulation.step();
        }
    }

    fn render(
        &mut self,
        window: &Window,
        held: &HeldKeys,
    ) -> Result<(f32, f32), wgpu::SurfaceError> {
        // Track frame time
        let now = Instant::now();
        let frame_time = (now - self.last_frame_time).as_secs_f32() * 1000.0;
        self.last_frame_time = now;

        self.frame_times.push_back(frame_time);
        if self.frame_times.len() > 100 {
            self.frame_times.pop_front();
        }

        let avg_frame_time = self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
        let fps = 1000.0 / avg_frame_time;

        self.update(held, frame_time * 0.001);

        self.ui_state.fps = fps;
        self.ui_state.frame_time = avg_frame_time;
        self.ui_state.sync(&self.simulation);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let shapes = build_scene(&self.simulation);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer.render(
            &self.device,
            &self.queue,
            &mut encoder,
            &view,
            &self.view,
            &shapes,
        );

        self.gui.render(
            &self.device,
            &self.queue,
            &mut encoder,
            window,
            &view,
            &mut self.ui_state,
        );

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok((fps, avg_frame_time))
    }
}

#[derive(Default)]
struct App {
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    held_keys: HeldKeys,
    error: Option<AppError>,
}

impl App {
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window_attributes = Window::default_attributes()
            .with_title("Double-Slit Experiment Simulation - ROYGBIV Spectrum")
            .with_inner_size(winit::dpi::LogicalSize::new(SCENE_WIDTH, SCENE_HEIGHT));

        let window = Arc::new(event_loop.create_window(window_attributes)?);
        self.gpu_state = Some(pollster::block_on(GpuState::new(window.clone()))?);
        self.window = Some(window);
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(err) = self.init(event_loop) {
                self.error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Handle GUI events; key events still pass through for releases
        let mut captured = false;
        if let (Some(gpu_state), Some(window)) = (&mut self.gpu_state, &self.window) {
            captured =
                gpu_state.gui.handle_event(window, &event) && gpu_state.gui.wants_keyboard();
        }
        if captured && !matches!(event, WindowEvent::KeyboardInput { .. }) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Focused(false) => self.held_keys.release_all(),

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
                let Some(action) = key_action(code) else {
                    return;
                };
                let pressed = state == ElementState::Pressed;

                match self.held_keys.route(action, pressed, repeat, captured) {
                    Some(KeyAction::Quit) => event_loop.exit(),
                    Some(KeyAction::Command(command)) => {
                        if let Some(gpu_state) = &mut self.gpu_state {
                            gpu_state.simulation.apply(command);
                        }
                    }
                    _ => {}
                }
            }

            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }

            WindowEvent::RedrawRequested => {
                if let (Some(window), Some(gpu_state)) = (&self.window, &mut self.gpu_state) {
                    match gpu_state.render(window, &self.held_keys) {
                        Ok((fps, frame_time)) => {
                            log::trace!("{:.0} FPS ({:.2}ms)", fps, frame_time);
                        }
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            gpu_state.resize(window.inner_size())
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("Out of GPU memory, exiting");
                            event_loop.exit();
                        }
                        Err(e) => log::warn!("Render error: {:?}", e),
                    }
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn run() -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::default();
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn main() {
    // Initialize logger (RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting double-slit interference simulation...");

    if let Err(err) = run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
