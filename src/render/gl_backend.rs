// gl_backend.rs - OpenGL 3.3 implementation of the GPU backend

use crate::render::backend::*;
use crate::render::mesh::{MeshData, Vertex};
use crate::render::shaders::{ShaderError, ShaderProgram};
use gl::types::*;
use std::collections::HashMap;
use std::mem::{offset_of, size_of};

struct GpuMesh {
    vao: GLuint,
    vbo: GLuint,
    ebo: GLuint,
    index_count: GLsizei,
}

impl Drop for GpuMesh {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteVertexArrays(1, &self.vao);
            gl::DeleteBuffers(1, &self.vbo);
            gl::DeleteBuffers(1, &self.ebo);
        }
    }
}

/// Backend over the current GL context. Function pointers must be loaded
/// (`gl::load_with`) before construction.
#[derive(Default)]
pub struct GlBackend {
    programs: HashMap<ProgramHandle, ShaderProgram>,
    meshes: HashMap<MeshHandle, GpuMesh>,
}

impl GlBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GpuBackend for GlBackend {
    fn compile_program(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<CompiledProgram, ShaderError> {
        let program = ShaderProgram::from_sources(vertex_source, fragment_source)?;
        let compiled = CompiledProgram {
            program: ProgramHandle(program.id()),
            vertex_shader: Some(ShaderHandle(program.vertex_shader())),
            fragment_shader: Some(ShaderHandle(program.fragment_shader())),
        };
        self.programs.insert(compiled.program, program);
        Ok(compiled)
    }

    fn shader_source(&self, shader: ShaderHandle) -> Option<String> {
        ShaderProgram::read_source(shader.0)
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        // Dropping the program releases the GL objects.
        self.programs.remove(&program);
    }

    fn upload_mesh(&mut self, mesh: &MeshData) -> Result<MeshHandle, RenderError> {
        if mesh.indices.is_empty() {
            return Err(RenderError::MeshUpload("mesh has no indices".into()));
        }

        let vertices = mesh.interleaved();
        let vertex_bytes: &[u8] = bytemuck::cast_slice(&vertices);
        let index_bytes: &[u8] = bytemuck::cast_slice(&mesh.indices);
        let stride = size_of::<Vertex>() as GLsizei;

        let mut gpu = GpuMesh {
            vao: 0,
            vbo: 0,
            ebo: 0,
            index_count: mesh.indices.len() as GLsizei,
        };

        unsafe {
            gl::GenVertexArrays(1, &mut gpu.vao);
            gl::GenBuffers(1, &mut gpu.vbo);
            gl::GenBuffers(1, &mut gpu.ebo);

            gl::BindVertexArray(gpu.vao);

            gl::BindBuffer(gl::ARRAY_BUFFER, gpu.vbo);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                vertex_bytes.len() as GLsizeiptr,
                vertex_bytes.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );

            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, gpu.ebo);
            gl::BufferData(
                gl::ELEMENT_ARRAY_BUFFER,
                index_bytes.len() as GLsizeiptr,
                index_bytes.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );

            // Position attribute
            gl::VertexAttribPointer(0, 3, gl::FLOAT, gl::FALSE, stride, offset_of!(Vertex, position) as *const _);
            gl::EnableVertexAttribArray(0);

            // Normal attribute
            gl::VertexAttribPointer(1, 3, gl::FLOAT, gl::FALSE, stride, offset_of!(Vertex, normal) as *const _);
            gl::EnableVertexAttribArray(1);

            // Texture coordinate attribute
            gl::VertexAttribPointer(2, 2, gl::FLOAT, gl::FALSE, stride, offset_of!(Vertex, uv) as *const _);
            gl::EnableVertexAttribArray(2);

            gl::BindVertexArray(0);
        }

        let handle = MeshHandle(gpu.vao);
        self.meshes.insert(handle, gpu);
        Ok(handle)
    }

    fn begin_frame(&mut self, clear_color: [f32; 4], viewport: (u32, u32)) {
        let [r, g, b, a] = clear_color;
        unsafe {
            gl::Viewport(0, 0, viewport.0 as GLint, viewport.1 as GLint);
            // The overlay painter leaves its own state behind every frame.
            gl::Enable(gl::DEPTH_TEST);
            gl::DepthMask(gl::TRUE);
            gl::Enable(gl::CULL_FACE);
            gl::CullFace(gl::BACK);
            gl::FrontFace(gl::CCW);
            gl::Disable(gl::BLEND);
            gl::Disable(gl::SCISSOR_TEST);
            gl::ClearColor(r, g, b, a);
            gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
        }
    }

    fn draw(
        &mut self,
        program: ProgramHandle,
        mesh: MeshHandle,
        uniforms: &DrawUniforms,
    ) -> Result<(), RenderError> {
        let shader = self
            .programs
            .get_mut(&program)
            .ok_or(RenderError::UnknownProgram(program))?;
        let gpu = self.meshes.get(&mesh).ok_or(RenderError::UnknownMesh(mesh))?;

        let model_view = uniforms.view * uniforms.model;
        let light = uniforms.point_light;

        shader.set_used();
        shader.set_uniform_mat4("modelMatrix", &uniforms.model.to_cols_array());
        shader.set_uniform_mat4("viewMatrix", &uniforms.view.to_cols_array());
        shader.set_uniform_mat4("modelViewMatrix", &model_view.to_cols_array());
        shader.set_uniform_mat4("projectionMatrix", &uniforms.projection.to_cols_array());
        shader.set_uniform_mat3("normalMatrix", &uniforms.normal_matrix.to_cols_array());
        shader.set_uniform_vec3("cameraPosition", &uniforms.camera_position.to_array());
        shader.set_uniform_vec3("diffuse", &uniforms.diffuse.to_array());
        shader.set_uniform_1f("roughness", uniforms.roughness);
        shader.set_uniform_1f("metalness", uniforms.metalness);
        shader.set_uniform_1f("opacity", uniforms.opacity);
        shader.set_uniform_vec3("ambientLightColor", &uniforms.ambient_light.to_array());
        shader.set_uniform_vec3("pointLight.position", &light.position.to_array());
        shader.set_uniform_vec3("pointLight.color", &light.color.to_array());
        shader.set_uniform_1f("pointLight.distance", light.distance);
        shader.set_uniform_1f("pointLight.decay", light.decay);

        unsafe {
            gl::BindVertexArray(gpu.vao);
            gl::DrawElements(gl::TRIANGLES, gpu.index_count, gl::UNSIGNED_INT, std::ptr::null());
            gl::BindVertexArray(0);
            gl::UseProgram(0);
        }

        Ok(())
    }
}
