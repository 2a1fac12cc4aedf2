use serde::{Deserialize, Serialize};

/// Scene and renderer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub clear_color: [f32; 4],
    pub cube_size: f32,
    pub cube_color: [f32; 3],
    pub roughness: f32,
    pub metalness: f32,
    /// Radians per second around the Y axis. The cube is static at 0.
    pub rotation_speed: f32,
    /// Drop block comments from the final stage sources before compiling.
    pub strip_comments: bool,
    pub ambient_intensity: f32,
    pub point_light_position: [f32; 3],
    pub point_light_intensity: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0, 1.0],
            cube_size: 1.0,
            cube_color: [1.0, 0.0, 0.0],
            roughness: 1.0,
            metalness: 0.0,
            rotation_speed: 0.0,
            strip_comments: true,
            ambient_intensity: 1.0,
            point_light_position: [2.0, 3.0, 4.0],
            point_light_intensity: 1.0,
        }
    }
}
