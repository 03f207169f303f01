use std::fmt;

use glow::HasContext;

/// The two program stages the runtime ever compiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// Narrow seam between [`crate::ShaderRuntime`] and the GPU.
///
/// The trait covers exactly the operations the runtime performs, nothing
/// more: blend/viewport setup, the shared quad buffer, compile/link with
/// driver diagnostics, per-name uniform lookups and writes, and one
/// triangle-strip draw. Production code uses [`GlowContext`]; the runtime's
/// unit tests substitute a recording double that counts live objects.
///
/// Compile and link failures are reported as `Err(diagnostic)`; the
/// implementation must not leave a dangling shader or program object behind
/// on the failure path.
pub trait GraphicsContext {
    type Shader: Copy + PartialEq + fmt::Debug;
    type Program: Copy + PartialEq + fmt::Debug;
    type Buffer: Copy + fmt::Debug;
    type Uniform: Clone + fmt::Debug;

    /// Enables source-over alpha blending (src-alpha, one-minus-src-alpha).
    fn enable_source_over_blending(&self);

    fn set_viewport(&self, width: i32, height: i32);

    /// Creates and uploads the static vertex buffer for the full-screen
    /// quad, leaving it bound.
    fn create_quad_buffer(&self, vertices: &[f32]) -> Result<Self::Buffer, String>;

    fn delete_buffer(&self, buffer: Self::Buffer);

    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<Self::Shader, String>;

    fn delete_shader(&self, shader: Self::Shader);

    fn link_program(
        &self,
        vertex: Self::Shader,
        fragment: Self::Shader,
    ) -> Result<Self::Program, String>;

    fn delete_program(&self, program: Self::Program);

    fn use_program(&self, program: Self::Program);

    /// Binds and enables the vertex-position input of `program` against the
    /// quad buffer. A missing attribute is logged and skipped; the vertex
    /// stage is runtime-authored so this only fires if a driver optimises
    /// the input away.
    fn bind_position_attribute(&self, program: Self::Program, buffer: Self::Buffer, name: &str);

    /// Resolves a uniform name. `None` means the current program does not
    /// declare the name (or the linker discarded it) — never an error.
    fn uniform_location(&self, program: Self::Program, name: &str) -> Option<Self::Uniform>;

    fn write_f32(&self, location: &Self::Uniform, value: f32);
    fn write_vec2(&self, location: &Self::Uniform, value: [f32; 2]);
    fn write_vec3(&self, location: &Self::Uniform, value: [f32; 3]);
    fn write_vec4(&self, location: &Self::Uniform, value: [f32; 4]);

    /// Issues the one draw call the system ever makes: four vertices,
    /// triangle-strip topology.
    fn draw_quad(&self);
}

/// OpenGL 3.3 core implementation backed by [`glow`].
///
/// The quad buffer handle carries its vertex-array object alongside the
/// buffer because core profiles refuse to source attributes without a VAO
/// bound.
pub struct GlowContext {
    gl: glow::Context,
}

impl GlowContext {
    /// Wraps an already-current GL context. The caller (the window glue)
    /// keeps the context current for the lifetime of the runtime; all
    /// renderer calls happen on that one thread.
    pub fn new(gl: glow::Context) -> Self {
        Self { gl }
    }
}

impl GraphicsContext for GlowContext {
    type Shader = glow::NativeShader;
    type Program = glow::NativeProgram;
    type Buffer = (glow::NativeVertexArray, glow::NativeBuffer);
    type Uniform = glow::NativeUniformLocation;

    fn enable_source_over_blending(&self) {
        unsafe {
            self.gl.enable(glow::BLEND);
            self.gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
        }
    }

    fn set_viewport(&self, width: i32, height: i32) {
        unsafe {
            self.gl.viewport(0, 0, width.max(1), height.max(1));
        }
    }

    fn create_quad_buffer(&self, vertices: &[f32]) -> Result<Self::Buffer, String> {
        unsafe {
            let vao = self.gl.create_vertex_array()?;
            let buffer = match self.gl.create_buffer() {
                Ok(buffer) => buffer,
                Err(err) => {
                    self.gl.delete_vertex_array(vao);
                    return Err(err);
                }
            };
            self.gl.bind_vertex_array(Some(vao));
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(vertices),
                glow::STATIC_DRAW,
            );
            Ok((vao, buffer))
        }
    }

    fn delete_buffer(&self, (vao, buffer): Self::Buffer) {
        unsafe {
            self.gl.delete_buffer(buffer);
            self.gl.delete_vertex_array(vao);
        }
    }

    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<Self::Shader, String> {
        let kind = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        unsafe {
            let shader = self.gl.create_shader(kind)?;
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            if !self.gl.get_shader_compile_status(shader) {
                let log = self.gl.get_shader_info_log(shader);
                self.gl.delete_shader(shader);
                return Err(log);
            }
            Ok(shader)
        }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe {
            self.gl.delete_shader(shader);
        }
    }

    fn link_program(
        &self,
        vertex: Self::Shader,
        fragment: Self::Shader,
    ) -> Result<Self::Program, String> {
        unsafe {
            let program = self.gl.create_program()?;
            self.gl.attach_shader(program, vertex);
            self.gl.attach_shader(program, fragment);
            self.gl.link_program(program);
            // The vertex stage outlives this program; detach so deleting the
            // program later cannot pin it.
            self.gl.detach_shader(program, vertex);
            self.gl.detach_shader(program, fragment);
            if !self.gl.get_program_link_status(program) {
                let log = self.gl.get_program_info_log(program);
                self.gl.delete_program(program);
                return Err(log);
            }
            Ok(program)
        }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe {
            self.gl.delete_program(program);
        }
    }

    fn use_program(&self, program: Self::Program) {
        unsafe {
            self.gl.use_program(Some(program));
        }
    }

    fn bind_position_attribute(&self, program: Self::Program, buffer: Self::Buffer, name: &str) {
        let (vao, vbo) = buffer;
        unsafe {
            let Some(index) = self.gl.get_attrib_location(program, name) else {
                tracing::warn!(name, "vertex attribute not found in linked program");
                return;
            };
            self.gl.bind_vertex_array(Some(vao));
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            self.gl.enable_vertex_attrib_array(index);
            self.gl
                .vertex_attrib_pointer_f32(index, 2, glow::FLOAT, false, 0, 0);
        }
    }

    fn uniform_location(&self, program: Self::Program, name: &str) -> Option<Self::Uniform> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn write_f32(&self, location: &Self::Uniform, value: f32) {
        unsafe {
            self.gl.uniform_1_f32(Some(location), value);
        }
    }

    fn write_vec2(&self, location: &Self::Uniform, value: [f32; 2]) {
        unsafe {
            self.gl.uniform_2_f32(Some(location), value[0], value[1]);
        }
    }

    fn write_vec3(&self, location: &Self::Uniform, value: [f32; 3]) {
        unsafe {
            self.gl
                .uniform_3_f32(Some(location), value[0], value[1], value[2]);
        }
    }

    fn write_vec4(&self, location: &Self::Uniform, value: [f32; 4]) {
        unsafe {
            self.gl
                .uniform_4_f32(Some(location), value[0], value[1], value[2], value[3]);
        }
    }

    fn draw_quad(&self) {
        unsafe {
            self.gl.draw_arrays(glow::TRIANGLE_STRIP, 0, 4);
        }
    }
}
