//! Shader program runtime for Lumafield.
//!
//! The crate owns the lifecycle of exactly one GPU program session: it
//! compiles a fixed full-screen-quad vertex stage once, accepts fragment
//! sources at any time, tracks named uniform state, and drives a cooperative
//! per-frame loop. The overall flow is:
//!
//! ```text
//!   window glue (lumafield)
//!          │ GraphicsContext (glow-backed)
//!          ▼
//!   ShaderRuntime::new ──▶ set_shader() ──▶ start() ──▶ frame(t) ─┐
//!          ▲                                     ▲                │
//!          │          set_uniform() at any time  └── reschedule ──┘
//!          └─ destroy() (idempotent, also on Drop)
//! ```
//!
//! All GPU calls are funnelled through the [`GraphicsContext`] trait so the
//! lifecycle rules (no leaked programs across swaps, inert-after-destroy,
//! silently-ignored unknown uniforms) can be exercised against a counting
//! test double without a display server.

mod color;
mod context;
mod runtime;
mod uniform;

pub use color::{color_to_vec4, ColorError};
pub use context::{GlowContext, GraphicsContext, ShaderStage};
pub use runtime::{FrameOutcome, RuntimeError, ShaderRuntime};
pub use uniform::{uniforms, UniformValue};
