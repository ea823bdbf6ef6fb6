//! Procedural meshes for fixtures and quick collider setups.

use glam::DVec3;

use crate::EdgeMesh;

/// Axis-aligned cube centered on the origin, with outward-wound quads.
///
/// Vertex order is the low-z ring then the high-z ring, each counterclockwise
/// seen from +z, starting at (-h, -h).
pub fn cube(size: f64) -> EdgeMesh {
    let h = size * 0.5;
    let positions = vec![
        DVec3::new(-h, -h, -h),
        DVec3::new(h, -h, -h),
        DVec3::new(h, h, -h),
        DVec3::new(-h, h, -h),
        DVec3::new(-h, -h, h),
        DVec3::new(h, -h, h),
        DVec3::new(h, h, h),
        DVec3::new(-h, h, h),
    ];
    let faces = vec![
        vec![0, 3, 2, 1],
        vec![4, 5, 6, 7],
        vec![0, 1, 5, 4],
        vec![2, 3, 7, 6],
        vec![1, 2, 6, 5],
        vec![0, 4, 7, 3],
    ];
    EdgeMesh::from_valid_polygons(positions, faces)
}

/// Flat quad grid in the XZ plane at `height`, facing +Y.
///
/// `divisions` is clamped to at least 1 per side.
pub fn grid(size: f64, divisions: u32, height: f64) -> EdgeMesh {
    let divisions = divisions.max(1);
    let row = divisions + 1;
    let step = size / divisions as f64;
    let start = -size * 0.5;

    let mut positions = Vec::with_capacity((row * row) as usize);
    for iz in 0..row {
        for ix in 0..row {
            positions.push(DVec3::new(
                start + ix as f64 * step,
                height,
                start + iz as f64 * step,
            ));
        }
    }

    let mut faces = Vec::with_capacity((divisions * divisions) as usize);
    for iz in 0..divisions {
        for ix in 0..divisions {
            let a = iz * row + ix;
            faces.push(vec![a, a + row, a + row + 1, a + 1]);
        }
    }
    EdgeMesh::from_valid_polygons(positions, faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_counts() {
        let mesh = grid(2.0, 2, 0.0);
        assert_eq!(mesh.vertex_count(), 9);
        assert_eq!(mesh.face_count(), 4);
        assert_eq!(mesh.edge_count(), 12);
    }

    #[test]
    fn test_grid_faces_up() {
        let mesh = grid(1.0, 3, -0.25);
        for vertex in mesh.vertices() {
            assert!((vertex.normal - DVec3::Y).length() < 1e-12);
            assert_eq!(vertex.position.y, -0.25);
        }
    }

    #[test]
    fn test_grid_zero_divisions_clamped() {
        let mesh = grid(1.0, 0, 0.0);
        assert_eq!(mesh.face_count(), 1);
    }
}
