// SPDX-License-Identifier: MIT OR Apache-2.0
//! Host window setup and event loop.

use cueline_timeline::{format_number, ConfigError, TimelineConfig, TimelinePanel};
use egui_wgpu::wgpu;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// Host application errors
#[derive(Debug, Error)]
pub enum AppError {
    /// Window creation failed
    #[error("Failed to create window: {0}")]
    WindowCreation(#[from] winit::error::OsError),

    /// Renderer initialization failed
    #[error("Failed to initialize renderer: {0}")]
    RendererInit(String),

    /// Event loop error
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// Timeline settings are unusable
    #[error("Invalid timeline settings: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for host operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Graphics state for wgpu rendering
struct GraphicsState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    egui_renderer: egui_wgpu::Renderer,
}

impl GraphicsState {
    fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| AppError::RendererInit(e.to_string()))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| AppError::RendererInit("no suitable GPU adapter".to_string()))?;

        tracing::info!("Using GPU: {}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Cueline Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            },
            None,
        ))
        .map_err(|e| AppError::RendererInit(e.to_string()))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| AppError::RendererInit("surface has no formats".to_string()))?;
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

        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            egui_renderer,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn render(
        &mut self,
        egui_ctx: &egui::Context,
        full_output: egui::FullOutput,
        window: &Window,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Cueline Encoder"),
        });

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer.update_texture(&self.device, &self.queue, *id, image_delta);
        }

        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        {
            // egui-wgpu wants a 'static render pass
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Cueline Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color {
                                r: 0.1,
                                g: 0.1,
                                b: 0.1,
                                a: 1.0,
                            }),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();

            self.egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        Ok(())
    }
}

/// Running state of the host
struct AppRunning {
    window: Arc<Window>,
    graphics: GraphicsState,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    timeline: TimelinePanel,
    panel_height: f32,
    next_repaint: Option<Instant>,
}

impl AppRunning {
    fn update(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("timeline")
            .exact_height(self.panel_height)
            .resizable(false)
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.timeline.ui(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            let store = self.timeline.store();
            ui.heading("Cueline");
            ui.separator();
            ui.monospace(format!(
                "{} / {} ms",
                format_number(store.current_time()),
                format_number(store.duration_time())
            ));
            if self.timeline.is_scrubbing() {
                ui.label("Scrubbing");
            }
        });
    }
}

/// Host application
pub struct CueApp {
    config: TimelineConfig,
    running: Option<AppRunning>,
    error: Option<AppError>,
}

impl CueApp {
    /// Create a host for the given timeline settings
    pub fn new(config: TimelineConfig) -> Self {
        Self {
            config,
            running: None,
            error: None,
        }
    }

    /// Run the event loop until the window closes
    pub fn run(config: TimelineConfig) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = CueApp::new(config);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn start(&self, event_loop: &ActiveEventLoop) -> Result<AppRunning> {
        tracing::info!("Creating window...");

        let window_attrs = Window::default_attributes()
            .with_title("Cueline")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720))
            .with_min_inner_size(winit::dpi::LogicalSize::new(640, 400));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        tracing::info!("Initializing graphics...");
        let graphics = GraphicsState::new(window.clone())?;

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &window,
            Some(window.scale_factor() as f32),
            None,
            Some(2 * 1024),
        );

        let timeline = TimelinePanel::from_config(&self.config)?;

        tracing::info!("Window size: {:?}", window.inner_size());

        Ok(AppRunning {
            window,
            graphics,
            egui_ctx,
            egui_state,
            timeline,
            panel_height: self.config.layout.panel_height,
            next_repaint: None,
        })
    }
}

impl ApplicationHandler for CueApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }

        match self.start(event_loop) {
            Ok(running) => self.running = Some(running),
            Err(e) => {
                tracing::error!("Startup failed: {e}");
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(running) = &mut self.running else {
            return;
        };

        let response = running.egui_state.on_window_event(&running.window, &event);
        if response.repaint {
            running.window.request_redraw();
        }
        if response.consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested, exiting...");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                tracing::debug!("Window resized to {:?}", new_size);
                running.graphics.resize(new_size);
                running.window.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                let raw_input = running.egui_state.take_egui_input(&running.window);
                let egui_ctx = running.egui_ctx.clone();
                let full_output = egui_ctx.run(raw_input, |ctx| running.update(ctx));

                running
                    .egui_state
                    .handle_platform_output(&running.window, full_output.platform_output.clone());

                let repaint_delay = full_output
                    .viewport_output
                    .get(&egui::ViewportId::ROOT)
                    .map(|viewport| viewport.repaint_delay);

                match running.graphics.render(&running.egui_ctx, full_output, &running.window) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = running.window.inner_size();
                        running.graphics.resize(size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        tracing::error!("Out of GPU memory!");
                        event_loop.exit();
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        tracing::warn!("Surface timeout");
                    }
                }

                // Scrubbing and scroll mirroring ask for timed repaints
                running.next_repaint = repaint_delay.and_then(|delay| Instant::now().checked_add(delay));
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(running) = &mut self.running else {
            return;
        };

        match running.next_repaint {
            Some(at) if at <= Instant::now() => {
                running.next_repaint = None;
                running.window.request_redraw();
                event_loop.set_control_flow(ControlFlow::Wait);
            }
            Some(at) => event_loop.set_control_flow(ControlFlow::WaitUntil(at)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }
}
