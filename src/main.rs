use anyhow::{anyhow, Context, Result};
use glutin::{
    config::ConfigTemplateBuilder,
    context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version},
    display::{GetGlDisplay, GlDisplay},
    prelude::*,
    surface::{Surface, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::{error, info, warn};
use raw_window_handle::HasRawWindowHandle;
use simple_logger::SimpleLogger;
use std::{ffi::CString, num::NonZeroU32, sync::Arc, time::Instant};
use winit::{
    dpi::{LogicalSize, PhysicalSize},
    event::{Event, WindowEvent},
    event_loop::{EventLoop, EventLoopBuilder},
    window::{Window, WindowBuilder},
};

use shaderlens::{
    config::{load_or_create_config, AppConfig},
    render::GlBackend,
    ui::ShaderOverlay,
    viewer::ShaderViewer,
};

// GL resources are released in field order, so the context and window go last.
struct App {
    viewer: ShaderViewer<GlBackend>,
    overlay: ShaderOverlay,
    painter: egui_glow::Painter,
    egui_ctx: egui::Context,
    egui_winit: egui_winit::State,
    gl_surface: Surface<WindowSurface>,
    gl_context: PossiblyCurrentContext,
    window: Window,
    last_frame: Instant,
}

impl App {
    fn new(config: &AppConfig) -> Result<(Self, EventLoop<()>)> {
        let event_loop = EventLoopBuilder::new().build().context("Failed to create event loop")?;
        let window_builder = WindowBuilder::new()
            .with_title(&config.window.title)
            .with_inner_size(LogicalSize::new(config.window.width, config.window.height));

        let template = ConfigTemplateBuilder::new()
            .with_alpha_size(8)
            .with_depth_size(24)
            .with_stencil_size(8);

        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

        let (window, gl_config) = display_builder
            .build(&event_loop, template, |configs| {
                // glutin only calls the picker with at least one config.
                configs
                    .reduce(|accum, config| {
                        if config.num_samples() > accum.num_samples() {
                            config
                        } else {
                            accum
                        }
                    })
                    .expect("no GL config matched the template")
            })
            .map_err(|e| anyhow!("Failed to create window: {e}"))?;

        let window = window.ok_or_else(|| anyhow!("Display builder returned no window"))?;
        let raw_window_handle = window.raw_window_handle();

        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_window_handle));

        let gl_display = gl_config.display();

        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .context("Failed to create OpenGL context")?;

        let attrs = window.build_surface_attributes(<_>::default());
        let gl_surface = unsafe { gl_display.create_window_surface(&gl_config, &attrs) }
            .context("Failed to create GL surface")?;

        let gl_context = gl_context
            .make_current(&gl_surface)
            .context("Failed to make context current")?;

        if config.window.vsync {
            if let Err(e) = gl_surface.set_swap_interval(&gl_context, SwapInterval::Wait(NonZeroU32::MIN)) {
                warn!("Failed to enable vsync: {}", e);
            }
        }

        // Load OpenGL functions
        gl::load_with(|symbol| match CString::new(symbol) {
            Ok(symbol) => gl_display.get_proc_address(symbol.as_c_str()) as *const _,
            Err(_) => std::ptr::null(),
        });

        let glow_context = Arc::new(unsafe {
            glow::Context::from_loader_function(|symbol| match CString::new(symbol) {
                Ok(symbol) => gl_display.get_proc_address(symbol.as_c_str()) as *const _,
                Err(_) => std::ptr::null(),
            })
        });

        let egui_ctx = egui::Context::default();
        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &event_loop,
            Some(window.scale_factor() as f32),
            None,
        );

        let painter = egui_glow::Painter::new(glow_context, "", None)
            .map_err(|e| anyhow!("Failed to create overlay painter: {e}"))?;

        let mut viewer = ShaderViewer::new(GlBackend::new(), config);
        let size = window.inner_size();
        viewer.resize(size.width, size.height);

        info!("OpenGL context ready ({}x{})", size.width, size.height);

        Ok((
            Self {
                viewer,
                overlay: ShaderOverlay::new(&config.overlay),
                painter,
                egui_ctx,
                egui_winit,
                gl_surface,
                gl_context,
                window,
                last_frame: Instant::now(),
            },
            event_loop,
        ))
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        let (Some(width), Some(height)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) else {
            return;
        };
        self.gl_surface.resize(&self.gl_context, width, height);
        self.viewer.resize(size.width, size.height);
    }

    fn redraw(&mut self) -> Result<()> {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.viewer.frame(dt);

        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let viewer = &mut self.viewer;
        let overlay = &mut self.overlay;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            let text = viewer.overlay_text();
            if let Some(code) = overlay.show(ctx, &text, viewer.mode()) {
                viewer.select(code);
            }
        });

        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let clipped_primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let size = self.window.inner_size();
        self.painter.paint_and_update_textures(
            [size.width, size.height],
            full_output.pixels_per_point,
            &clipped_primitives,
            &full_output.textures_delta,
        );

        self.gl_surface
            .swap_buffers(&self.gl_context)
            .context("Failed to swap buffers")
    }
}

fn main() -> Result<()> {
    let (config, config_error) = match load_or_create_config() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    SimpleLogger::new().with_level(config.level_filter()).init()?;
    if let Some(e) = config_error {
        warn!("Using default config: {:#}", e);
    }
    info!("Initializing application...");

    let (mut app, event_loop) = App::new(&config)?;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => {
            let response = app.egui_winit.on_window_event(&app.window, &event);
            match event {
                WindowEvent::CloseRequested => elwt.exit(),
                WindowEvent::Resized(size) => app.resize(size),
                WindowEvent::RedrawRequested => {
                    if let Err(e) = app.redraw() {
                        error!("Frame failed: {:#}", e);
                        elwt.exit();
                    }
                }
                _ if response.repaint => app.window.request_redraw(),
                _ => (),
            }
        }
        Event::AboutToWait => app.window.request_redraw(),
        Event::LoopExiting => app.painter.destroy(),
        _ => (),
    })?;

    Ok(())
}
