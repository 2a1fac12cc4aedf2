use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// Interleaved vertex layout uploaded to the GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tex_coords: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Axis-aligned box centred on the origin, four vertices per face so each
    /// face gets a flat normal.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let half = Vec3::new(width, height, depth) * 0.5;
        // (normal, right, up) with right x up == normal, so faces wind CCW
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];
        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

        let mut mesh = Self::new();
        for (normal, right, up) in faces {
            let base = mesh.vertices.len() as u32;
            for (s, t) in corners {
                mesh.vertices.push((normal + right * s + up * t) * half);
                mesh.normals.push(normal);
                mesh.tex_coords.push(Vec2::new((s + 1.0) * 0.5, (t + 1.0) * 0.5));
            }
            mesh.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        mesh
    }

    pub fn interleaved(&self) -> Vec<Vertex> {
        self.vertices
            .iter()
            .zip(&self.normals)
            .zip(&self.tex_coords)
            .map(|((p, n), uv)| Vertex {
                position: p.to_array(),
                normal: n.to_array(),
                uv: uv.to_array(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_counts() {
        let mesh = MeshData::cuboid(1.0, 1.0, 1.0);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.normals.len(), 24);
        assert_eq!(mesh.tex_coords.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert!(mesh.indices.iter().all(|i| (*i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn test_cuboid_extent_and_winding() {
        let mesh = MeshData::cuboid(2.0, 4.0, 6.0);
        for v in &mesh.vertices {
            assert!((v.x.abs() - 1.0).abs() < 1e-6);
            assert!((v.y.abs() - 2.0).abs() < 1e-6);
            assert!((v.z.abs() - 3.0).abs() < 1e-6);
        }

        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|i| mesh.vertices[tri[i] as usize]);
            let face_normal = (b - a).cross(c - a).normalize();
            let expected = mesh.normals[tri[0] as usize];
            assert!(face_normal.dot(expected) > 0.99);
        }
    }

    #[test]
    fn test_interleaved_matches_attributes() {
        let mesh = MeshData::cuboid(1.0, 1.0, 1.0);
        let vertices = mesh.interleaved();
        assert_eq!(vertices.len(), 24);
        assert_eq!(vertices[0].normal, [1.0, 0.0, 0.0]);
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
    }
}
