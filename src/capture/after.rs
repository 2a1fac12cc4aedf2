use crate::capture::ShaderPair;
use crate::render::backend::GpuBackend;
use crate::render::camera::Camera;
use crate::render::renderer::Renderer;
use crate::render::scene::Scene;

/// Forces a compile pass over `scene` and reads back the shader sources of
/// the compiled programs.
///
/// Programs are visited in registry order and every present handle
/// overwrites the matching field, so with several programs the last one
/// wins. No annotation is applied. An empty registry gives an empty pair.
pub fn capture_after_compile<B: GpuBackend>(
    renderer: &mut Renderer<B>,
    scene: &mut Scene,
    camera: &Camera,
) -> ShaderPair {
    renderer.compile(scene, camera);

    let mut pair = ShaderPair::default();
    for program in &renderer.info().programs {
        if let Some(handle) = program.fragment_shader {
            pair.fragment_shader = renderer.shader_source(handle);
        }
        if let Some(handle) = program.vertex_shader {
            pair.vertex_shader = renderer.shader_source(handle);
        }
    }
    pair
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::material::Material;
    use crate::render::mesh::MeshData;
    use crate::render::mock::MockBackend;
    use crate::render::renderer::RendererOptions;
    use crate::render::scene::SceneMesh;
    use glam::Vec3;

    #[test]
    fn test_empty_scene_gives_empty_pair() {
        let mut renderer = Renderer::new(MockBackend::new(), RendererOptions::default());
        let pair = capture_after_compile(&mut renderer, &mut Scene::new(), &Camera::default());
        assert!(pair.is_empty());
    }

    #[test]
    fn test_capture_forces_compile_and_reads_back() {
        let mut renderer = Renderer::new(MockBackend::new(), RendererOptions::default());
        let mut scene = Scene::new();
        scene.add(SceneMesh::new("cube", MeshData::cuboid(1.0, 1.0, 1.0), Material::physical(Vec3::X)));

        let pair = capture_after_compile(&mut renderer, &mut scene, &Camera::default());
        assert_eq!(renderer.info().programs.len(), 1);
        assert!(pair.stage(true).unwrap().contains("fragColor"));
        assert!(pair.stage(false).unwrap().contains("gl_Position"));
    }

    #[test]
    fn test_last_program_wins() {
        let mut renderer = Renderer::new(MockBackend::new(), RendererOptions::default());
        let mut scene = Scene::new();
        scene.add(SceneMesh::new("first", MeshData::cuboid(1.0, 1.0, 1.0), Material::physical(Vec3::X)));

        let mut second = Material::physical(Vec3::Y);
        second.set_on_before_compile(|d| d.fragment_shader.push_str("\n// second material\n"));
        scene.add(SceneMesh::new("second", MeshData::cuboid(1.0, 1.0, 1.0), second));

        let pair = capture_after_compile(&mut renderer, &mut scene, &Camera::default());
        assert_eq!(renderer.info().programs.len(), 2);
        assert!(pair.stage(true).unwrap().contains("// second material"));
    }

    #[test]
    fn test_hidden_handles_leave_fields_empty() {
        let mut backend = MockBackend::new();
        backend.hide_shader_handles = true;
        let mut renderer = Renderer::new(backend, RendererOptions::default());
        let mut scene = Scene::new();
        scene.add(SceneMesh::new("cube", MeshData::cuboid(1.0, 1.0, 1.0), Material::physical(Vec3::X)));

        let pair = capture_after_compile(&mut renderer, &mut scene, &Camera::default());
        assert_eq!(renderer.info().programs.len(), 1);
        assert!(pair.is_empty());
    }
}
