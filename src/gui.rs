use egui::{Color32, Context};
use egui_wgpu::{Renderer, RendererOptions};
use egui_winit::State;
use slit_physics::{
    INITIAL_SLIT_SEPARATION, LINE_COUNT, MAX_SLIT_SEPARATION, MIN_SLIT_SEPARATION,
    SLIT_SEPARATION_STEP, SPECTRAL_LINES,
};
use slit_simulation::{Command, DisplayMetrics, EmissionMode, Simulation};
use std::sync::Arc;
use wgpu::{Device, TextureFormat};
use winit::{event::WindowEvent, window::Window};

/// System fonts tried in order before falling back to egui's built-in font
const FONT_CANDIDATES: &[&str] = &[
    // Arial
    "C:\\Windows\\Fonts\\arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/usr/share/fonts/truetype/msttcorefonts/Arial.ttf",
    // Times New Roman
    "C:\\Windows\\Fonts\\times.ttf",
    "/System/Library/Fonts/Supplemental/Times New Roman.ttf",
    "/usr/share/fonts/truetype/msttcorefonts/Times_New_Roman.ttf",
    // Courier New
    "C:\\Windows\\Fonts\\cour.ttf",
    "/System/Library/Fonts/Supplemental/Courier New.ttf",
    "/usr/share/fonts/truetype/msttcorefonts/Courier_New.ttf",
];

const INSTRUCTIONS: &[&str] = &[
    "Left/Right Arrows: Adjust slit separation",
    "1-7: Select monochromatic light (ROYGBIV)",
    "A: Toggle all colors (polychromatic)",
    "Space: Pause/Resume",
    "C: Clear screen",
    "ESC: Quit",
];

/// Snapshot of the simulation for the overlay, plus commands the overlay issued
pub struct UiState {
    pub fps: f32,
    pub frame_time: f32,
    pub particle_count: usize,
    pub arrivals: u64,
    pub tick: u64,
    pub is_paused: bool,
    pub separation: u32,
    pub single_line: Option<usize>,
    pub active: [bool; LINE_COUNT],
    pub per_line_emission: bool,
    pub metrics: Option<DisplayMetrics>,
    pub commands: Vec<Command>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            fps: 0.0,
            frame_time: 0.0,
            particle_count: 0,
            arrivals: 0,
            tick: 0,
            is_paused: false,
            separation: INITIAL_SLIT_SEPARATION,
            single_line: None,
            active: [true; LINE_COUNT],
            per_line_emission: false,
            metrics: None,
            commands: Vec::new(),
        }
    }
}

impl UiState {
    pub fn sync(&mut self, simulation: &Simulation) {
        let params = simulation.params();
        self.particle_count = simulation.particles().len();
        self.arrivals = simulation.arrivals();
        self.tick = simulation.tick();
        self.is_paused = simulation.is_paused();
        self.separation = params.separation();
        self.single_line = params.single_line();
        for (i, active) in self.active.iter_mut().enumerate() {
            *active = params.is_active(i);
        }
        self.per_line_emission = simulation.config().emission_mode == EmissionMode::PerLine;
        self.metrics = Some(simulation.metrics());
    }
}

pub struct Gui {
    context: Context,
    state: State,
    renderer: Renderer,
}

impl Gui {
    pub fn new(device: &Device, output_color_format: TextureFormat, window: &Window) -> Self {
        let context = Context::default();
        install_fonts(&context);
        let id = context.viewport_id();

        let state = State::new(
            context.clone(),
            id,
            window,
            Some(window.scale_factor() as f32),
            None,
            Some(device.limits().max_texture_dimension_2d as usize),
        );

        let renderer = Renderer::new(
            device,
            output_color_format,
            RendererOptions {
                msaa_samples: 1,
                depth_stencil_format: None,
                ..Default::default()
            },
        );

        Self {
            context,
            state,
            renderer,
        }
    }

    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        let response = self.state.on_window_event(window, event);
        response.consumed
    }

    /// True while a text field or similar widget holds keyboard focus
    pub fn wants_keyboard(&self) -> bool {
        self.context.wants_keyboard_input()
    }

    pub fn render(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        window: &Window,
        view: &wgpu::TextureView,
        ui_state: &mut UiState,
    ) {
        let raw_input = self.state.take_egui_input(window);

        let full_output = self.context.run(raw_input, |ctx| {
            Self::ui(ctx, ui_state);
        });

        self.state
            .handle_platform_output(window, full_output.platform_output);

        let clipped_primitives = self
            .context
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let size = window.inner_size();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [size.width, size.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.renderer.update_buffers(
            device,
            queue,
            encoder,
            &clipped_primitives,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Egui Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();

            self.renderer
                .render(&mut render_pass, &clipped_primitives, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }

    fn ui(ctx: &Context, state: &mut UiState) {
        // Experiment readout (Top Left)
        egui::Window::new("Experiment")
            .anchor(egui::Align2::LEFT_TOP, [10.0, 10.0])
            .resizable(false)
            .collapsible(true)
            .show(ctx, |ui| {
                let Some(metrics) = &state.metrics else {
                    return;
                };
                ui.label(format!(
                    "Slit Separation: {} px ({:.3} mm)",
                    metrics.separation_px, metrics.separation_mm
                ));
                ui.label(format!(
                    "Screen Distance: {} px ({:.1} mm)",
                    metrics.distance_px, metrics.distance_mm
                ));
                ui.label(format!("Mode: {}", metrics.mode));
                ui.label(format!("Wavelength: {}", metrics.wavelength));

                ui.separator();
                ui.heading("Fringe Spacing");
                for fringe in &metrics.fringes {
                    ui.label(format!(
                        "{}: {:.1} px ({:.3} mm)",
                        SPECTRAL_LINES[fringe.line].name, fringe.spacing_px, fringe.spacing_mm
                    ));
                }
            });

        // Spectrum legend (Top Right)
        egui::Window::new("ROYGBIV Spectrum")
            .anchor(egui::Align2::RIGHT_TOP, [-10.0, 10.0])
            .resizable(false)
            .collapsible(true)
            .show(ctx, |ui| {
                for (i, line) in SPECTRAL_LINES.iter().enumerate() {
                    ui.horizontal(|ui| {
                        let (rect, _) =
                            ui.allocate_exact_size(egui::vec2(20.0, 20.0), egui::Sense::hover());
                        let [r, g, b] = line.rgb;
                        ui.painter()
                            .rect_filled(rect, 2.0, Color32::from_rgb(r, g, b));

                        let text = format!("{}: {} nm  [{}]", line.name, line.wavelength_nm, i + 1);
                        let selected = state.single_line == Some(i)
                            || (state.single_line.is_none() && state.active[i]);
                        if ui.selectable_label(selected, text).clicked() {
                            state.commands.push(Command::SelectLine(i));
                        }
                    });
                }

                ui.separator();
                if ui.button("All colors [A]").clicked() {
                    state.commands.push(Command::ToggleAll);
                }
            });

        // Controls (Bottom Left)
        egui::Window::new("Controls")
            .anchor(egui::Align2::LEFT_BOTTOM, [10.0, -10.0])
            .resizable(false)
            .collapsible(true)
            .show(ctx, |ui| {
                let mut separation = state.separation;
                let slider = egui::Slider::new(
                    &mut separation,
                    MIN_SLIT_SEPARATION..=MAX_SLIT_SEPARATION,
                )
                .step_by(SLIT_SEPARATION_STEP as f64)
                .text("Slit separation (px)");
                if ui.add(slider).changed() {
                    state.commands.push(Command::SetSeparation(separation));
                }

                ui.horizontal(|ui| {
                    let label = if state.is_paused { "Resume" } else { "Pause" };
                    if ui.button(label).clicked() {
                        state.commands.push(Command::TogglePause);
                    }
                    if ui.button("Clear").clicked() {
                        state.commands.push(Command::Clear);
                    }
                });

                let mut per_line = state.per_line_emission;
                if ui
                    .checkbox(&mut per_line, "Per-line wave particles")
                    .changed()
                {
                    let mode = if per_line {
                        EmissionMode::PerLine
                    } else {
                        EmissionMode::Neutral
                    };
                    state.commands.push(Command::SetEmissionMode(mode));
                }

                ui.separator();
                for instruction in INSTRUCTIONS {
                    ui.small(*instruction);
                }
            });

        // Diagnostics (Bottom Right)
        egui::Window::new("Diagnostics")
            .anchor(egui::Align2::RIGHT_BOTTOM, [-10.0, -10.0])
            .resizable(false)
            .collapsible(true)
            .show(ctx, |ui| {
                ui.label(format!("FPS: {:.1}", state.fps));
                ui.label(format!("Frame Time: {:.2} ms", state.frame_time));
                ui.label(format!("Wave particles: {}", state.particle_count));
                ui.label(format!("Arrivals: {}", state.arrivals));
                ui.label(format!("Tick: {}", state.tick));
            });
    }
}

/// Install the first readable system font, or keep egui's built-in one
fn install_fonts(context: &Context) {
    for path in FONT_CANDIDATES {
        match std::fs::read(path) {
            Ok(bytes) => {
                let mut fonts = egui::FontDefinitions::default();
                fonts.font_data.insert(
                    "system".to_owned(),
                    Arc::new(egui::FontData::from_owned(bytes)),
                );
                fonts
                    .families
                    .entry(egui::FontFamily::Proportional)
                    .or_default()
                    .insert(0, "system".to_owned());
                context.set_fonts(fonts);
                log::info!("✓ Using font {}", path);
                return;
            }
            Err(err) => log::debug!("Font {} unavailable: {}", path, err),
        }
    }

    log::warn!("No system font found, falling back to egui's built-in font");
}
