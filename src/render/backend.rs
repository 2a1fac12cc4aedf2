// backend.rs - GPU backend trait and per-draw data

use crate::render::mesh::MeshData;
use crate::render::shaders::ShaderError;
use glam::{Mat3, Mat4, Vec3};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle(pub u32);

/// Result of a successful program build. Shader handles are optional
/// because a context may not expose its shader objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompiledProgram {
    pub program: ProgramHandle,
    pub vertex_shader: Option<ShaderHandle>,
    pub fragment_shader: Option<ShaderHandle>,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Shader error: {0}")]
    Shader(#[from] ShaderError),
    #[error("Mesh upload failed: {0}")]
    MeshUpload(String),
    #[error("Unknown program {0:?}")]
    UnknownProgram(ProgramHandle),
    #[error("Unknown mesh {0:?}")]
    UnknownMesh(MeshHandle),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLightUniform {
    /// View-space position.
    pub position: Vec3,
    pub color: Vec3,
    pub distance: f32,
    pub decay: f32,
}

/// Per-draw uniform values for the physical material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawUniforms {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub normal_matrix: Mat3,
    pub camera_position: Vec3,
    pub diffuse: Vec3,
    pub roughness: f32,
    pub metalness: f32,
    pub opacity: f32,
    pub ambient_light: Vec3,
    pub point_light: PointLightUniform,
}

pub trait GpuBackend {
    fn compile_program(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<CompiledProgram, ShaderError>;

    /// Source text the context holds for a shader object.
    fn shader_source(&self, shader: ShaderHandle) -> Option<String>;

    fn delete_program(&mut self, program: ProgramHandle);

    fn upload_mesh(&mut self, mesh: &MeshData) -> Result<MeshHandle, RenderError>;

    fn begin_frame(&mut self, clear_color: [f32; 4], viewport: (u32, u32));

    fn draw(
        &mut self,
        program: ProgramHandle,
        mesh: MeshHandle,
        uniforms: &DrawUniforms,
    ) -> Result<(), RenderError>;
}
