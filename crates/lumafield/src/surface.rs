//! Window and GL-context establishment (the surface side of the runtime's
//! contract).
//!
//! The runtime never polls the window: this module creates the drawable,
//! hands a current `glow` context over, and exposes `resize` for the event
//! loop to call when winit reports a size change. Every failure on the
//! establishment path is a [`RuntimeError::ContextUnavailable`] — fatal for
//! the session, surfaced to the user as "rendering unsupported here".

use std::ffi::CString;
use std::num::NonZeroU32;

use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{ContextApi, ContextAttributesBuilder, PossiblyCurrentContext, Version};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use glutin_winit::DisplayBuilder;
use raw_window_handle::HasRawWindowHandle;
use renderer::RuntimeError;
use winit::dpi::PhysicalSize;
use winit::event_loop::EventLoop;
use winit::window::{Window, WindowBuilder};

/// The window plus the live GL plumbing the event loop needs each frame.
pub struct WindowSession {
    pub window: Window,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
}

impl WindowSession {
    /// Presents the frame just drawn.
    pub fn swap_buffers(&self) {
        if let Err(err) = self.surface.swap_buffers(&self.context) {
            tracing::warn!(%err, "failed to present frame");
        }
    }

    /// Resizes the GL surface to the window's new pixel dimensions.
    pub fn resize(&self, size: PhysicalSize<u32>) {
        self.surface.resize(
            &self.context,
            NonZeroU32::new(size.width).unwrap_or(NonZeroU32::MIN),
            NonZeroU32::new(size.height).unwrap_or(NonZeroU32::MIN),
        );
    }
}

fn unavailable(message: impl std::fmt::Display) -> RuntimeError {
    RuntimeError::ContextUnavailable(message.to_string())
}

/// Builds the window, picks an alpha-capable GL config, makes a 3.3-core
/// context current and wraps it for `glow`.
pub fn create(
    event_loop: &EventLoop<()>,
    width: u32,
    height: u32,
    title: &str,
) -> Result<(WindowSession, glow::Context), RuntimeError> {
    let window_builder = WindowBuilder::new()
        .with_title(title)
        .with_inner_size(PhysicalSize::new(width, height))
        .with_transparent(true);

    let template = ConfigTemplateBuilder::new()
        .with_alpha_size(8)
        .with_depth_size(0);
    let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

    let (window, gl_config) = display_builder
        .build(event_loop, template, pick_config)
        .map_err(unavailable)?;
    let window = window.ok_or_else(|| unavailable("display builder returned no window"))?;

    let raw_window_handle = window.raw_window_handle();
    let gl_display = gl_config.display();

    let context_attributes = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
        .build(Some(raw_window_handle));
    let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
        .map_err(unavailable)?;

    let size = window.inner_size();
    let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
        raw_window_handle,
        NonZeroU32::new(size.width).unwrap_or(NonZeroU32::MIN),
        NonZeroU32::new(size.height).unwrap_or(NonZeroU32::MIN),
    );
    let surface =
        unsafe { gl_display.create_window_surface(&gl_config, &attrs) }.map_err(unavailable)?;

    let context = not_current.make_current(&surface).map_err(unavailable)?;

    if let Err(err) = surface.set_swap_interval(&context, SwapInterval::Wait(NonZeroU32::MIN)) {
        tracing::warn!(%err, "vsync unavailable, rendering unthrottled");
    }

    let gl = unsafe {
        glow::Context::from_loader_function(|symbol| {
            let symbol = CString::new(symbol).expect("GL symbol names never contain NUL");
            gl_display.get_proc_address(&symbol).cast()
        })
    };

    tracing::info!(
        width = size.width,
        height = size.height,
        "GL context established"
    );
    Ok((
        WindowSession {
            window,
            surface,
            context,
        },
        gl,
    ))
}

/// Prefers the config with the deepest alpha channel so source-over
/// blending composes against whatever is behind the window.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .reduce(|best, candidate| {
            if candidate.alpha_size() > best.alpha_size() {
                candidate
            } else {
                best
            }
        })
        .expect("platform offered no GL configs")
}
