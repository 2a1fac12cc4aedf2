// mock.rs - recording backend for tests

use crate::render::backend::*;
use crate::render::mesh::MeshData;
use crate::render::shaders::ShaderError;
use std::collections::HashMap;

/// Record of a backend call for test inspection
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    CompileProgram(ProgramHandle),
    DeleteProgram(ProgramHandle),
    UploadMesh(MeshHandle),
    BeginFrame { clear_color: [f32; 4], viewport: (u32, u32) },
    Draw { program: ProgramHandle, mesh: MeshHandle },
}

#[derive(Debug, Default)]
pub struct MockBackend {
    /// All calls made to this backend
    pub calls: Vec<BackendCall>,
    /// Fail every compile with this log when set
    pub fail_compile: Option<String>,
    /// Hide shader handles, like a context without shader introspection
    pub hide_shader_handles: bool,
    sources: HashMap<ShaderHandle, String>,
    programs: HashMap<ProgramHandle, (ShaderHandle, ShaderHandle)>,
    next_id: u32,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    pub fn compile_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, BackendCall::CompileProgram(_)))
            .count()
    }

    pub fn draw_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, BackendCall::Draw { .. }))
            .count()
    }

    pub fn live_programs(&self) -> usize {
        self.programs.len()
    }
}

impl GpuBackend for MockBackend {
    fn compile_program(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<CompiledProgram, ShaderError> {
        if let Some(log) = &self.fail_compile {
            return Err(ShaderError::Compilation(log.clone()));
        }

        let vertex = ShaderHandle(self.next());
        let fragment = ShaderHandle(self.next());
        let program = ProgramHandle(self.next());

        self.sources.insert(vertex, vertex_source.to_string());
        self.sources.insert(fragment, fragment_source.to_string());
        self.programs.insert(program, (vertex, fragment));
        self.calls.push(BackendCall::CompileProgram(program));

        let (vertex_shader, fragment_shader) = if self.hide_shader_handles {
            (None, None)
        } else {
            (Some(vertex), Some(fragment))
        };

        Ok(CompiledProgram {
            program,
            vertex_shader,
            fragment_shader,
        })
    }

    fn shader_source(&self, shader: ShaderHandle) -> Option<String> {
        self.sources.get(&shader).cloned()
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        if let Some((vertex, fragment)) = self.programs.remove(&program) {
            self.sources.remove(&vertex);
            self.sources.remove(&fragment);
        }
        self.calls.push(BackendCall::DeleteProgram(program));
    }

    fn upload_mesh(&mut self, mesh: &MeshData) -> Result<MeshHandle, RenderError> {
        if mesh.indices.is_empty() {
            return Err(RenderError::MeshUpload("mesh has no indices".into()));
        }
        let handle = MeshHandle(self.next());
        self.calls.push(BackendCall::UploadMesh(handle));
        Ok(handle)
    }

    fn begin_frame(&mut self, clear_color: [f32; 4], viewport: (u32, u32)) {
        self.calls.push(BackendCall::BeginFrame {
            clear_color,
            viewport,
        });
    }

    fn draw(
        &mut self,
        program: ProgramHandle,
        mesh: MeshHandle,
        _uniforms: &DrawUniforms,
    ) -> Result<(), RenderError> {
        if !self.programs.contains_key(&program) {
            return Err(RenderError::UnknownProgram(program));
        }
        self.calls.push(BackendCall::Draw { program, mesh });
        Ok(())
    }
}
