use crate::render::backend::MeshHandle;
use crate::render::material::Material;
use crate::render::mesh::MeshData;
use glam::{Mat4, Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Vec3,
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            intensity: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    /// 0.0 means no range cutoff.
    pub distance: f32,
    pub decay: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec3::new(2.0, 3.0, 4.0),
            color: Vec3::ONE,
            intensity: 1.0,
            distance: 0.0,
            decay: 2.0,
        }
    }
}

#[derive(Debug)]
pub struct SceneMesh {
    pub name: String,
    pub geometry: MeshData,
    pub material: Material,
    pub position: Vec3,
    pub rotation: Quat,
    pub(crate) gpu: Option<MeshHandle>,
}

impl SceneMesh {
    pub fn new(name: impl Into<String>, geometry: MeshData, material: Material) -> Self {
        Self {
            name: name.into(),
            geometry,
            material,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            gpu: None,
        }
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }

    pub fn is_uploaded(&self) -> bool {
        self.gpu.is_some()
    }
}

#[derive(Debug)]
pub struct Scene {
    pub meshes: Vec<SceneMesh>,
    pub ambient_light: AmbientLight,
    pub point_light: PointLight,
    pub clear_color: [f32; 4],
}

impl Scene {
    pub fn new() -> Self {
        Self {
            meshes: Vec::new(),
            ambient_light: AmbientLight::default(),
            point_light: PointLight::default(),
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }

    /// Adds a mesh and returns its index.
    pub fn add(&mut self, mesh: SceneMesh) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    pub fn mesh_mut(&mut self, index: usize) -> Option<&mut SceneMesh> {
        self.meshes.get_mut(index)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_point_light_sits_outside_unit_cube() {
        let light = PointLight::default();
        assert!(light.position.abs().max_element() > 0.5);
        assert_eq!(light.decay, 2.0);
        assert_eq!(light.distance, 0.0);
    }

    #[test]
    fn test_add_returns_index() {
        let mut scene = Scene::new();
        let mesh = SceneMesh::new("cube", MeshData::cuboid(1.0, 1.0, 1.0), Material::physical(Vec3::X));
        assert_eq!(scene.add(mesh), 0);
        assert!(scene.mesh_mut(0).is_some());
        assert!(!scene.meshes[0].is_uploaded());
    }
}
