//! In-place modification of EdgeMesh geometry.
//!
//! Topology (faces, edges, incidence) is fixed at construction; only vertex
//! positions and normals change here.

use glam::DVec3;
use tracing::trace;

use super::construction::polygon_area_vector;
use super::types::{GeometryError, VertexId};
use super::EdgeMesh;

impl EdgeMesh {
    /// Copy of this mesh for a deformer to write its output into.
    ///
    /// The copy shares topology and edge enumeration with `self`.
    pub fn clone_for_output(&self) -> Self {
        self.clone()
    }

    /// Set a vertex position. Normals are left untouched.
    pub fn set_position(&mut self, id: VertexId, position: DVec3) {
        self.positions[id.index()] = position;
    }

    /// Translate every vertex by the same offset.
    pub fn translate_all(&mut self, offset: DVec3) {
        for p in &mut self.positions {
            *p += offset;
        }
    }

    /// Recompute face normals and area-weighted vertex normals.
    ///
    /// Vertices with no faces, or only degenerate ones, get a zero normal.
    pub fn recompute_normals(&mut self) {
        let mut accum = vec![DVec3::ZERO; self.positions.len()];

        for face in &mut self.faces {
            let area = polygon_area_vector(&self.positions, &face.vertices);
            face.normal = area.normalize_or_zero();
            for &v in &face.vertices {
                accum[v.index()] += area;
            }
        }

        for (normal, sum) in self.normals.iter_mut().zip(accum) {
            *normal = sum.normalize_or_zero();
        }
    }

    /// Flat `[x0, y0, z0, x1, ...]` view of the vertex positions.
    ///
    /// This is the layout hosts use for point arrays.
    pub fn point_buffer(&self) -> &[f64] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Overwrite all vertex positions from a flat xyz buffer.
    pub fn set_points_from_buffer(&mut self, buffer: &[f64]) -> Result<(), GeometryError> {
        let expected = self.positions.len() * 3;
        if buffer.len() != expected {
            return Err(GeometryError::PointBufferLength {
                expected,
                actual: buffer.len(),
            });
        }
        let points: &[DVec3] =
            bytemuck::try_cast_slice(buffer).map_err(GeometryError::PointBufferCast)?;
        self.positions.copy_from_slice(points);
        trace!("set_points_from_buffer: {} points", points.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_meshes::{cube, triangle};
    use super::*;

    #[test]
    fn test_clone_for_output_is_independent() {
        let original = triangle();
        let mut output = original.clone_for_output();
        output.set_position(VertexId(0), DVec3::new(5.0, 5.0, 5.0));
        assert_eq!(original.position(VertexId(0)), DVec3::ZERO);
        assert_eq!(output.edge_list(), original.edge_list());
    }

    #[test]
    fn test_translate_all() {
        let mut mesh = cube(1.0);
        let before = mesh.positions().to_vec();
        mesh.translate_all(DVec3::new(1.0, 2.0, 3.0));
        for (a, b) in before.iter().zip(mesh.positions()) {
            assert_eq!(*b - *a, DVec3::new(1.0, 2.0, 3.0));
        }
    }

    #[test]
    fn test_recompute_normals_after_move() {
        let mut mesh = triangle();
        assert!((mesh.normal(VertexId(0)) - DVec3::Z).length() < 1e-12);
        mesh.set_position(VertexId(2), DVec3::new(0.0, 0.0, 1.0));
        mesh.recompute_normals();
        assert!((mesh.normal(VertexId(0)) - DVec3::NEG_Y).length() < 1e-12);
    }

    #[test]
    fn test_isolated_vertex_has_zero_normal() {
        let mesh = EdgeMesh::from_triangles(
            vec![
                DVec3::ZERO,
                DVec3::X,
                DVec3::Y,
                DVec3::new(9.0, 9.0, 9.0),
            ],
            &[0, 1, 2],
        )
        .unwrap();
        assert_eq!(mesh.normal(VertexId(3)), DVec3::ZERO);
        assert!(mesh.connected_edges(VertexId(3)).is_empty());
    }

    #[test]
    fn test_point_buffer_layout() {
        let mesh = triangle();
        assert_eq!(
            mesh.point_buffer(),
            &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
        );
    }

    #[test]
    fn test_set_points_from_buffer() {
        let mut mesh = triangle();
        let buffer = [1.0, 1.0, 1.0, 2.0, 1.0, 1.0, 1.0, 2.0, 1.0];
        mesh.set_points_from_buffer(&buffer).unwrap();
        assert_eq!(mesh.position(VertexId(1)), DVec3::new(2.0, 1.0, 1.0));
    }

    #[test]
    fn test_set_points_rejects_wrong_length() {
        let mut mesh = triangle();
        let result = mesh.set_points_from_buffer(&[0.0; 4]);
        assert!(matches!(
            result,
            Err(GeometryError::PointBufferLength {
                expected: 9,
                actual: 4
            })
        ));
    }
}
