use std::collections::HashMap;
use std::time::Duration;

use crate::context::{GraphicsContext, ShaderStage};
use crate::uniform::{uniforms, UniformValue};

/// Fixed vertex stage shared by every fragment program swap: a passthrough
/// that positions the full-screen quad's corners.
const VERTEX_STAGE_SOURCE: &str = r"#version 330 core
in vec2 position;
void main() {
    gl_Position = vec4(position, 0.0, 1.0);
}
";

/// Two triangles as a strip covering clip space.
const QUAD_VERTICES: [f32; 8] = [-1.0, -1.0, 1.0, -1.0, -1.0, 1.0, 1.0, 1.0];

/// Errors surfaced by the runtime and its surface glue.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The platform could not provide a GL context for the surface. Fatal
    /// for the session; retrying without a different surface is pointless.
    #[error("graphics context unavailable: {0}")]
    ContextUnavailable(String),
    /// Fragment compilation failed; the message is the driver's diagnostic.
    /// The previously active program (if any) is still current.
    #[error("fragment shader failed to compile: {0}")]
    ShaderCompile(String),
    /// Linking against the vertex stage failed; the previous program (if
    /// any) is still current.
    #[error("shader program failed to link: {0}")]
    ProgramLink(String),
    /// A buffer or other GPU object could not be allocated.
    #[error("failed to allocate GPU resource: {0}")]
    ResourceAllocation(String),
}

/// What the host scheduler must do after a lifecycle call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Schedule exactly one more frame callback.
    Continue,
    /// The loop is stopped; do not reschedule.
    Halted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LoopState {
    Stopped,
    /// `origin` is the timestamp of the first frame after the loop
    /// (re)started; `u_time` counts seconds from there.
    Running { origin: Option<Duration> },
}

/// Owns one GPU program session over a borrowed drawable surface.
///
/// Call order is `new` → `set_shader` → `start` → `frame` per callback →
/// `destroy`. Parameter producers may call [`set_uniform`] at any point in
/// between; the value written last before a `frame` is what that draw
/// observes. After [`destroy`] (or `Drop`) the instance is inert: every
/// entry point becomes a no-op, so frame callbacks racing teardown are
/// harmless.
///
/// [`set_uniform`]: ShaderRuntime::set_uniform
/// [`destroy`]: ShaderRuntime::destroy
pub struct ShaderRuntime<C: GraphicsContext> {
    gl: C,
    quad: Option<C::Buffer>,
    vertex_stage: Option<C::Shader>,
    program: Option<C::Program>,
    /// Locations resolved lazily per program; `None` records a name the
    /// current program does not declare so repeated writes stay cheap.
    locations: HashMap<String, Option<C::Uniform>>,
    width: u32,
    height: u32,
    loop_state: LoopState,
    destroyed: bool,
}

impl<C: GraphicsContext> ShaderRuntime<C> {
    /// Binds the runtime to a context, enabling source-over blending,
    /// sizing the viewport, uploading the shared quad and compiling the
    /// fixed vertex stage.
    ///
    /// # Panics
    ///
    /// Panics if the vertex stage fails to compile. Its source ships with
    /// this crate, so a failure is a bug here (or a broken driver), not a
    /// condition callers can recover from.
    pub fn new(gl: C, width: u32, height: u32) -> Result<Self, RuntimeError> {
        gl.enable_source_over_blending();
        gl.set_viewport(width as i32, height as i32);

        let quad = gl
            .create_quad_buffer(&QUAD_VERTICES)
            .map_err(RuntimeError::ResourceAllocation)?;
        let vertex_stage = match gl.compile_shader(ShaderStage::Vertex, VERTEX_STAGE_SOURCE) {
            Ok(shader) => shader,
            Err(log) => panic!("built-in vertex stage failed to compile: {log}"),
        };

        tracing::debug!(width, height, "shader runtime initialised");
        Ok(Self {
            gl,
            quad: Some(quad),
            vertex_stage: Some(vertex_stage),
            program: None,
            locations: HashMap::new(),
            width,
            height,
            loop_state: LoopState::Stopped,
            destroyed: false,
        })
    }

    /// Compiles `source` and links it into the active fragment program.
    ///
    /// On success the previous program is deleted and the uniform-location
    /// cache is cleared (locations are not portable across programs). On
    /// either failure the previous program stays current and usable, and
    /// the transient fragment shader object is released — a failed swap
    /// never leaks and never degrades a working session.
    pub fn set_shader(&mut self, source: &str) -> Result<(), RuntimeError> {
        if self.destroyed {
            tracing::warn!("set_shader called on destroyed runtime");
            return Ok(());
        }
        let (vertex_stage, quad) = match (self.vertex_stage, self.quad) {
            (Some(vertex_stage), Some(quad)) => (vertex_stage, quad),
            _ => return Ok(()),
        };

        let fragment = self
            .gl
            .compile_shader(ShaderStage::Fragment, source)
            .map_err(|log| {
                tracing::debug!(%log, "fragment compilation failed");
                RuntimeError::ShaderCompile(log)
            })?;

        let linked = self.gl.link_program(vertex_stage, fragment);
        // The fragment stage is transient either way: the program keeps the
        // linked binary, not the shader object.
        self.gl.delete_shader(fragment);
        let program = linked.map_err(|log| {
            tracing::debug!(%log, "program link failed");
            RuntimeError::ProgramLink(log)
        })?;

        if let Some(previous) = self.program.replace(program) {
            self.gl.delete_program(previous);
        }
        self.locations.clear();
        self.gl.use_program(program);
        self.gl.bind_position_attribute(program, quad, "position");
        tracing::debug!("fragment program swapped in");
        Ok(())
    }

    /// Writes a scalar or vector uniform by name.
    ///
    /// Never raises: with no program current (or after destroy) the call is
    /// dropped, and names the current shader does not declare are resolved
    /// once, cached as absent, and silently skipped thereafter. Producers
    /// push the full control panel regardless of which effect is active.
    pub fn set_uniform(&mut self, name: &str, value: impl Into<UniformValue>) {
        let Some(program) = self.program else {
            return;
        };
        if self.destroyed {
            return;
        }

        let location = match self.locations.get(name) {
            Some(cached) => cached.clone(),
            None => {
                let resolved = self.gl.uniform_location(program, name);
                self.locations.insert(name.to_string(), resolved.clone());
                resolved
            }
        };
        let Some(location) = location else {
            return;
        };

        match value.into() {
            UniformValue::Float(v) => self.gl.write_f32(&location, v),
            UniformValue::Vec2(v) => self.gl.write_vec2(&location, v),
            UniformValue::Vec3(v) => self.gl.write_vec3(&location, v),
            UniformValue::Vec4(v) => self.gl.write_vec4(&location, v),
        }
    }

    /// Enters the render loop. Returns [`FrameOutcome::Continue`] when the
    /// host must schedule the first frame callback; starting an
    /// already-running loop (or a destroyed runtime) requests nothing, so
    /// at most one callback is ever outstanding.
    pub fn start(&mut self) -> FrameOutcome {
        if self.destroyed || matches!(self.loop_state, LoopState::Running { .. }) {
            return FrameOutcome::Halted;
        }
        self.loop_state = LoopState::Running { origin: None };
        tracing::debug!("render loop started");
        FrameOutcome::Continue
    }

    /// Renders one frame at the host-supplied monotonic timestamp: writes
    /// the elapsed-time and resolution uniforms, issues the single
    /// triangle-strip draw, and asks for exactly one continuation.
    ///
    /// A callback that fires after [`destroy`](Self::destroy) (or before
    /// [`start`](Self::start)) lands here as a no-op and halts the loop
    /// instead of touching released resources.
    pub fn frame(&mut self, timestamp: Duration) -> FrameOutcome {
        if self.destroyed {
            return FrameOutcome::Halted;
        }
        let LoopState::Running { origin } = self.loop_state else {
            return FrameOutcome::Halted;
        };

        let origin = match origin {
            Some(origin) => origin,
            None => {
                self.loop_state = LoopState::Running {
                    origin: Some(timestamp),
                };
                timestamp
            }
        };
        let elapsed = timestamp.saturating_sub(origin).as_secs_f32();

        self.set_uniform(uniforms::TIME, elapsed);
        self.set_uniform(
            uniforms::RESOLUTION,
            [self.width as f32, self.height as f32],
        );
        if self.program.is_some() {
            self.gl.draw_quad();
        }
        FrameOutcome::Continue
    }

    /// Re-reads the surface dimensions pushed by the embedding window and
    /// updates the viewport. No recompilation, no cache invalidation.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.destroyed {
            return;
        }
        self.width = width;
        self.height = height;
        self.gl.set_viewport(width as i32, height as i32);
        tracing::debug!(width, height, "viewport resized");
    }

    /// Stops the loop and releases every GPU object. Idempotent: a second
    /// call (including the one from `Drop`) does nothing.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.loop_state = LoopState::Stopped;
        if let Some(program) = self.program.take() {
            self.gl.delete_program(program);
        }
        if let Some(vertex_stage) = self.vertex_stage.take() {
            self.gl.delete_shader(vertex_stage);
        }
        if let Some(quad) = self.quad.take() {
            self.gl.delete_buffer(quad);
        }
        self.locations.clear();
        self.destroyed = true;
        tracing::debug!("shader runtime destroyed");
    }

    pub fn is_running(&self) -> bool {
        matches!(self.loop_state, LoopState::Running { .. })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl<C: GraphicsContext> Drop for ShaderRuntime<C> {
    fn drop(&mut self) {
        self.destroy();
    }
}
