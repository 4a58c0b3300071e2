//! Flat, corner-duplicated triangle mesh produced by the OBJ loader.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use static_assertions::const_assert_eq;

/// GPU vertex: position, normal, uv, tightly packed.
///
/// | Location | Offset | Format    |
/// |----------|--------|-----------|
/// | 0        | 0      | Float32x3 |
/// | 1        | 12     | Float32x3 |
/// | 2        | 24     | Float32x2 |
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

const_assert_eq!(std::mem::size_of::<MeshVertex>(), 32);

/// Triangle soup with one entry per rendered corner.
///
/// `positions`, `uvs` and `normals` always have the same length, a multiple
/// of three. Nothing is welded or indexed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub normals: Vec<Vec3>,
}

impl Mesh {
    /// Number of corners (rendered vertices).
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Interleave the three attribute streams into GPU vertices.
    #[must_use]
    pub fn interleaved(&self) -> Vec<MeshVertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .zip(&self.uvs)
            .map(|((p, n), uv)| MeshVertex {
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

    fn triangle() -> Mesh {
        Mesh {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            uvs: vec![Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(0.0, -1.0)],
            normals: vec![Vec3::Z; 3],
        }
    }

    #[test]
    fn test_default_mesh_is_empty() {
        let mesh = Mesh::default();
        assert!(mesh.is_empty());
        assert_eq!(mesh.triangle_count(), 0);
        assert!(mesh.interleaved().is_empty());
    }

    #[test]
    fn test_counts() {
        let mesh = triangle();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert!(!mesh.is_empty());
    }

    #[test]
    fn test_interleaved_preserves_corner_order() {
        let verts = triangle().interleaved();
        assert_eq!(verts.len(), 3);
        assert_eq!(verts[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(verts[2].uv, [0.0, -1.0]);
        assert_eq!(verts[0].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_interleaved_bytes() {
        let verts = triangle().interleaved();
        let bytes: &[u8] = bytemuck::cast_slice(&verts);
        assert_eq!(bytes.len(), 3 * 32);
    }
}
