//! Polygon mesh with explicit edge enumeration.
//!
//! Deformers compare the same edge across two meshes with identical topology,
//! so the edge list is enumerated deterministically: faces are walked in
//! order and each undirected edge gets the next id the first time it is seen.
//! Two meshes built from the same face lists therefore share edge ids.

mod construction;
mod modification;
mod topology;
mod types;

use std::collections::HashMap;

use glam::DVec3;

pub use types::{Edge, EdgeId, Face, FaceId, GeometryError, VertexId, VertexView};

/// Polygon mesh with per-edge lengths and per-vertex edge incidence.
///
/// Input meshes are treated as immutable snapshots; deformers clone them with
/// [`EdgeMesh::clone_for_output`] and write into the copy.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeMesh {
    pub(crate) positions: Vec<DVec3>,
    pub(crate) normals: Vec<DVec3>,
    pub(crate) faces: Vec<Face>,
    pub(crate) edges: Vec<Edge>,
    /// Edges incident to each vertex, in edge enumeration order
    pub(crate) vertex_edges: Vec<Vec<EdgeId>>,
    /// Map from canonical (low, high) vertex pair to edge
    pub(crate) edge_map: HashMap<(VertexId, VertexId), EdgeId>,
}

#[cfg(test)]
pub(crate) mod test_meshes {
    use super::*;

    pub use crate::primitives::cube;

    pub fn triangle() -> EdgeMesh {
        EdgeMesh::from_triangles(
            vec![
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(1.0, 0.0, 0.0),
                DVec3::new(0.0, 1.0, 0.0),
            ],
            &[0, 1, 2],
        )
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_meshes::*;
    use super::*;

    #[test]
    fn test_cube_counts() {
        let mesh = cube(1.0);
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.edge_count(), 12);
        assert_eq!(mesh.face_count(), 6);
    }

    #[test]
    fn test_cube_edge_lengths() {
        let mesh = cube(1.0);
        for (_, length) in mesh.edges() {
            assert!((length - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_cube_vertex_valence() {
        let mesh = cube(1.0);
        for vertex in mesh.vertices() {
            assert_eq!(vertex.connected_edges.len(), 3);
        }
    }

    #[test]
    fn test_cube_normals_point_outward() {
        let mesh = cube(2.0);
        for vertex in mesh.vertices() {
            let expected = vertex.position.normalize();
            assert!((vertex.normal - expected).length() < 1e-9);
        }
    }

    #[test]
    fn test_same_faces_same_edge_ids() {
        let a = cube(1.0);
        let b = cube(3.0);
        for (ea, eb) in a.edge_list().iter().zip(b.edge_list()) {
            assert_eq!(ea.vertices, eb.vertices);
        }
    }
}
