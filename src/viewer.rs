use crate::capture::{capture_after_compile, BeforeCompileCapture};
use crate::config::AppConfig;
use crate::render::backend::GpuBackend;
use crate::render::camera::Camera;
use crate::render::material::{Material, MaterialKind};
use crate::render::mesh::MeshData;
use crate::render::renderer::{RenderInfo, Renderer, RendererOptions};
use crate::render::scene::{Scene, SceneMesh};
use crate::ui::display::{DisplayController, DisplayMode};
use glam::{Quat, Vec3};
use log::info;

/// The demo: one physically-shaded cube, the shader capture, and the view
/// selection that decides which captured source is shown.
pub struct ShaderViewer<B: GpuBackend> {
    scene: Scene,
    camera: Camera,
    renderer: Renderer<B>,
    capture: BeforeCompileCapture,
    controller: DisplayController,
    cube: usize,
    rotation_speed: f32,
}

impl<B: GpuBackend> ShaderViewer<B> {
    pub fn new(backend: B, config: &AppConfig) -> Self {
        let render = &config.rendering;

        let mut scene = Scene::new();
        scene.clear_color = render.clear_color;
        scene.ambient_light.intensity = render.ambient_intensity;
        scene.point_light.position = Vec3::from(render.point_light_position);
        scene.point_light.intensity = render.point_light_intensity;

        let mut material = Material::new(
            "cube",
            MaterialKind::Physical {
                color: Vec3::from(render.cube_color),
                roughness: render.roughness,
                metalness: render.metalness,
            },
        );
        let capture = BeforeCompileCapture::new();
        capture.install(&mut material);

        let size = render.cube_size;
        let cube = scene.add(SceneMesh::new("cube", MeshData::cuboid(size, size, size), material));

        let cam = &config.camera;
        let mut camera = Camera::new(cam.fov, 1.0, cam.near, cam.far);
        camera.look_at(Vec3::from(cam.position), Vec3::from(cam.target));
        camera.set_viewport(config.window.width, config.window.height);

        let mut renderer = Renderer::new(
            backend,
            RendererOptions {
                strip_comments: render.strip_comments,
            },
        );
        renderer.set_size(config.window.width, config.window.height);

        let mut controller = DisplayController::new();
        controller.select(&config.overlay.initial_view);

        info!("Viewer ready, showing {}", controller.mode().label());

        Self {
            scene,
            camera,
            renderer,
            capture,
            controller,
            cube,
            rotation_speed: render.rotation_speed,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_viewport(width, height);
        self.renderer.set_size(width, height);
    }

    /// Advances the animation by `dt` seconds and renders the scene.
    pub fn frame(&mut self, dt: f32) {
        if self.rotation_speed != 0.0 {
            if let Some(cube) = self.scene.mesh_mut(self.cube) {
                cube.rotation = (Quat::from_rotation_y(self.rotation_speed * dt) * cube.rotation).normalize();
            }
        }
        self.renderer.render(&mut self.scene, &self.camera);
    }

    /// Text for the overlay in the current mode. Commits any pending
    /// pre-compile capture first; post-compile modes capture fresh.
    pub fn overlay_text(&mut self) -> String {
        self.capture.commit();

        let Self {
            scene,
            camera,
            renderer,
            capture,
            controller,
            ..
        } = self;
        controller.text(capture.current(), || capture_after_compile(renderer, scene, camera))
    }

    /// Applies a selection code. Returns whether the mode changed.
    pub fn select(&mut self, code: &str) -> bool {
        self.controller.select(code)
    }

    pub fn mode(&self) -> DisplayMode {
        self.controller.mode()
    }

    pub fn render_info(&self) -> &RenderInfo {
        self.renderer.info()
    }

    pub fn capture(&self) -> &BeforeCompileCapture {
        &self.capture
    }

    pub fn renderer(&self) -> &Renderer<B> {
        &self.renderer
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }
}
