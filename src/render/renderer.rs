use crate::render::backend::*;
use crate::render::camera::Camera;
use crate::render::material::{MaterialKind, ProgramKey};
use crate::render::preprocess::{build_stage_source, ShaderStage};
use crate::render::scene::{Scene, SceneMesh};
use glam::Mat3;
use log::{debug, error, info, warn};
use std::collections::HashSet;

/// One entry of the compiled program registry.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramInfo {
    pub id: usize,
    pub key: ProgramKey,
    pub name: String,
    pub program: ProgramHandle,
    pub vertex_shader: Option<ShaderHandle>,
    pub fragment_shader: Option<ShaderHandle>,
    pub used_times: u64,
}

#[derive(Debug, Clone, Default)]
pub struct RenderInfo {
    /// Live programs in creation order.
    pub programs: Vec<ProgramInfo>,
    pub frame: u64,
    pub draw_calls: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct RendererOptions {
    /// Drop block comments from the final stage sources before compiling.
    pub strip_comments: bool,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            strip_comments: true,
        }
    }
}

pub struct Renderer<B: GpuBackend> {
    backend: B,
    options: RendererOptions,
    info: RenderInfo,
    failed: HashSet<ProgramKey>,
    next_program_id: usize,
    viewport: (u32, u32),
}

impl<B: GpuBackend> Renderer<B> {
    pub fn new(backend: B, options: RendererOptions) -> Self {
        Self {
            backend,
            options,
            info: RenderInfo::default(),
            failed: HashSet::new(),
            next_program_id: 0,
            viewport: (1, 1),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn info(&self) -> &RenderInfo {
        &self.info
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.viewport = (width.max(1), height.max(1));
    }

    /// Reads back the source the graphics context holds for a shader.
    pub fn shader_source(&self, shader: ShaderHandle) -> Option<String> {
        self.backend.shader_source(shader)
    }

    /// Makes sure every mesh in the scene has its geometry uploaded and a
    /// program for its current material version. Returns how many programs
    /// were built by this call.
    ///
    /// Pre-compile hooks run here, and only when a program is actually built.
    pub fn compile(&mut self, scene: &mut Scene, _camera: &Camera) -> usize {
        let mut built = 0;

        for mesh in scene.meshes.iter_mut() {
            if mesh.gpu.is_none() {
                match self.backend.upload_mesh(&mesh.geometry) {
                    Ok(handle) => mesh.gpu = Some(handle),
                    Err(e) => {
                        error!("Failed to upload mesh '{}': {}", mesh.name, e);
                        continue;
                    }
                }
            }

            let key = mesh.material.program_key();
            if self.program_index(key).is_some() || self.failed.contains(&key) {
                continue;
            }

            self.release_stale_programs(key);
            if self.build_program(mesh, key) {
                built += 1;
            }
        }

        built
    }

    /// Compiles what is missing, then draws every mesh that has a program.
    pub fn render(&mut self, scene: &mut Scene, camera: &Camera) {
        self.compile(scene, camera);

        self.backend.begin_frame(scene.clear_color, self.viewport);
        self.info.frame += 1;
        self.info.draw_calls = 0;

        let view = camera.view_matrix();
        let projection = camera.projection_matrix();
        let ambient = scene.ambient_light.color * scene.ambient_light.intensity;
        let light = scene.point_light;
        let point_light = PointLightUniform {
            position: view.transform_point3(light.position),
            color: light.color * light.intensity,
            distance: light.distance,
            decay: light.decay,
        };

        for mesh in &scene.meshes {
            let Some(gpu) = mesh.gpu else { continue };
            let Some(index) = self.program_index(mesh.material.program_key()) else {
                continue;
            };

            let model = mesh.model_matrix();
            let MaterialKind::Physical {
                color,
                roughness,
                metalness,
            } = mesh.material.kind;

            let uniforms = DrawUniforms {
                model,
                view,
                projection,
                normal_matrix: Mat3::from_mat4(view * model).inverse().transpose(),
                camera_position: camera.position,
                diffuse: color,
                roughness,
                metalness,
                opacity: mesh.material.opacity,
                ambient_light: ambient,
                point_light,
            };

            let program = self.info.programs[index].program;
            match self.backend.draw(program, gpu, &uniforms) {
                Ok(()) => {
                    self.info.programs[index].used_times += 1;
                    self.info.draw_calls += 1;
                }
                Err(e) => warn!("Draw of '{}' skipped: {}", mesh.name, e),
            }
        }
    }

    fn program_index(&self, key: ProgramKey) -> Option<usize> {
        self.info.programs.iter().position(|p| p.key == key)
    }

    /// Drops programs built for older versions of the same material.
    fn release_stale_programs(&mut self, key: ProgramKey) {
        let backend = &mut self.backend;
        self.info.programs.retain(|p| {
            let stale = p.key.material == key.material && p.key.version != key.version;
            if stale {
                debug!("Releasing program {} ({:?})", p.id, p.key);
                backend.delete_program(p.program);
            }
            !stale
        });
    }

    fn build_program(&mut self, mesh: &mut SceneMesh, key: ProgramKey) -> bool {
        let mut descriptor = mesh.material.descriptor();
        mesh.material.run_before_compile(&mut descriptor);

        let strip = self.options.strip_comments;
        let sources = build_stage_source(ShaderStage::Vertex, &descriptor.name, &descriptor.vertex_shader, strip)
            .and_then(|vertex| {
                build_stage_source(ShaderStage::Fragment, &descriptor.name, &descriptor.fragment_shader, strip)
                    .map(|fragment| (vertex, fragment))
            });

        let compiled = sources.and_then(|(vertex, fragment)| self.backend.compile_program(&vertex, &fragment));

        match compiled {
            Ok(compiled) => {
                let id = self.next_program_id;
                self.next_program_id += 1;
                info!(
                    "Built program {} for '{}' ({}, material {:?} v{})",
                    id, mesh.name, descriptor.name, key.material, key.version
                );
                self.info.programs.push(ProgramInfo {
                    id,
                    key,
                    name: descriptor.name,
                    program: compiled.program,
                    vertex_shader: compiled.vertex_shader,
                    fragment_shader: compiled.fragment_shader,
                    used_times: 0,
                });
                true
            }
            Err(e) => {
                error!("Failed to build program for '{}': {}", mesh.name, e);
                self.failed.insert(key);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::material::Material;
    use crate::render::mesh::MeshData;
    use crate::render::mock::{BackendCall, MockBackend};
    use glam::Vec3;
    use std::cell::Cell;
    use std::rc::Rc;

    fn cube_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add(SceneMesh::new(
            "cube",
            MeshData::cuboid(1.0, 1.0, 1.0),
            Material::physical(Vec3::new(1.0, 0.0, 0.0)),
        ));
        scene
    }

    #[test]
    fn test_compile_builds_once_per_material_version() {
        let mut renderer = Renderer::new(MockBackend::new(), RendererOptions::default());
        let mut scene = cube_scene();
        let camera = Camera::default();

        assert_eq!(renderer.compile(&mut scene, &camera), 1);
        assert_eq!(renderer.compile(&mut scene, &camera), 0);
        assert_eq!(renderer.info().programs.len(), 1);

        scene.meshes[0].material.needs_update();
        assert_eq!(renderer.compile(&mut scene, &camera), 1);
        assert_eq!(renderer.info().programs.len(), 1);
        assert_eq!(renderer.backend().live_programs(), 1);
        assert!(renderer
            .backend()
            .calls
            .iter()
            .any(|c| matches!(c, BackendCall::DeleteProgram(_))));
    }

    #[test]
    fn test_hook_runs_only_when_program_is_built() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();

        let mut scene = cube_scene();
        scene.meshes[0]
            .material
            .set_on_before_compile(move |_| counter.set(counter.get() + 1));

        let mut renderer = Renderer::new(MockBackend::new(), RendererOptions::default());
        let camera = Camera::default();
        for _ in 0..5 {
            renderer.render(&mut scene, &camera);
        }

        assert_eq!(calls.get(), 1);
        assert_eq!(renderer.backend().draw_count(), 5);
        assert_eq!(renderer.info().programs[0].used_times, 5);
        assert_eq!(renderer.info().frame, 5);
    }

    #[test]
    fn test_compiled_source_is_resolved() {
        let mut renderer = Renderer::new(MockBackend::new(), RendererOptions::default());
        let mut scene = cube_scene();
        renderer.compile(&mut scene, &Camera::default());

        let program = &renderer.info().programs[0];
        let fragment = renderer.shader_source(program.fragment_shader.unwrap()).unwrap();
        let vertex = renderer.shader_source(program.vertex_shader.unwrap()).unwrap();

        assert!(fragment.starts_with("#version 330 core"));
        assert!(!fragment.contains("#include"));
        assert!(fragment.contains("BRDF_Lambert"));
        assert!(vertex.contains("gl_Position = projectionMatrix * mvPosition;"));
    }

    #[test]
    fn test_failed_build_is_not_retried_every_frame() {
        let mut backend = MockBackend::new();
        backend.fail_compile = Some("0:1: syntax error".into());
        let mut renderer = Renderer::new(backend, RendererOptions::default());
        let mut scene = cube_scene();
        let camera = Camera::default();

        renderer.render(&mut scene, &camera);
        renderer.render(&mut scene, &camera);

        assert!(renderer.info().programs.is_empty());
        assert_eq!(renderer.backend().draw_count(), 0);

        renderer.backend_mut().fail_compile = None;
        scene.meshes[0].material.needs_update();
        renderer.render(&mut scene, &camera);
        assert_eq!(renderer.backend().draw_count(), 1);
    }

    #[test]
    fn test_unknown_chunk_from_hook_is_logged_not_fatal() {
        let mut scene = cube_scene();
        scene.meshes[0]
            .material
            .set_on_before_compile(|d| d.fragment_shader.push_str("\n#include <missing>\n"));

        let mut renderer = Renderer::new(MockBackend::new(), RendererOptions::default());
        assert_eq!(renderer.compile(&mut scene, &Camera::default()), 0);
        assert!(renderer.info().programs.is_empty());
        assert_eq!(renderer.backend().compile_count(), 0);
    }
}
