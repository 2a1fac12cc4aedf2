use glam::{Mat4, Quat, Vec3};

pub struct Camera {
    pub position: Vec3,
    pub rotation: Quat,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(fov: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov,
            aspect_ratio,
            near,
            far,
        }
    }

    /// Places the camera at `position` facing `target` with +Y up.
    pub fn look_at(&mut self, position: Vec3, target: Vec3) {
        self.position = position;
        let world = Mat4::look_at_rh(position, target, Vec3::Y).inverse();
        self.rotation = Quat::from_mat4(&world).normalize();
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect_ratio = width as f32 / height as f32;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov.to_radians(),
            self.aspect_ratio,
            self.near,
            self.far,
        )
    }
}

impl Default for Camera {
    fn default() -> Self {
        let mut camera = Self::new(75.0, 1.0, 0.1, 1000.0);
        camera.look_at(Vec3::ONE, Vec3::ZERO);
        camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_look_at_puts_target_in_front() {
        let camera = Camera::default();
        let target_in_view = camera.view_matrix().transform_point3(Vec3::ZERO);

        assert!(target_in_view.z < 0.0);
        assert!(target_in_view.x.abs() < 1e-5);
        assert!(target_in_view.y.abs() < 1e-5);
        assert!((target_in_view.length() - 3f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn test_set_viewport_ignores_zero_size() {
        let mut camera = Camera::default();
        camera.set_viewport(800, 400);
        assert_eq!(camera.aspect_ratio, 2.0);
        camera.set_viewport(0, 400);
        assert_eq!(camera.aspect_ratio, 2.0);
    }
}
