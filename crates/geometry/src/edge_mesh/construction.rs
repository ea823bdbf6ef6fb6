//! Construction methods for EdgeMesh.

use glam::DVec3;
use std::collections::HashMap;

use super::types::{Edge, EdgeId, Face, FaceId, GeometryError, VertexId};
use super::EdgeMesh;

impl EdgeMesh {
    /// Build an edge mesh from positions and polygon vertex loops.
    ///
    /// Vertex normals are computed from the faces (area weighted).
    pub fn from_polygons(
        positions: Vec<DVec3>,
        faces: Vec<Vec<u32>>,
    ) -> Result<Self, GeometryError> {
        let mut mesh = Self::build(positions, faces)?;
        mesh.recompute_normals();
        Ok(mesh)
    }

    /// Build an edge mesh from a triangle index list (3 indices per triangle).
    pub fn from_triangles(positions: Vec<DVec3>, indices: &[u32]) -> Result<Self, GeometryError> {
        if indices.len() % 3 != 0 {
            return Err(GeometryError::InvalidTopology(
                "Index count not divisible by 3".to_string(),
            ));
        }
        let faces = indices.chunks(3).map(|tri| tri.to_vec()).collect();
        Self::from_polygons(positions, faces)
    }

    /// Build an edge mesh with host-supplied vertex normals.
    ///
    /// Normals are used as given; they are not renormalized.
    pub fn with_normals(
        positions: Vec<DVec3>,
        faces: Vec<Vec<u32>>,
        normals: Vec<DVec3>,
    ) -> Result<Self, GeometryError> {
        if normals.len() != positions.len() {
            return Err(GeometryError::NormalCountMismatch {
                expected: positions.len(),
                actual: normals.len(),
            });
        }
        let mut mesh = Self::build(positions, faces)?;
        mesh.normals = normals;
        Ok(mesh)
    }

    fn build(positions: Vec<DVec3>, faces: Vec<Vec<u32>>) -> Result<Self, GeometryError> {
        validate_faces(positions.len(), &faces)?;
        Ok(Self::assemble(positions, faces))
    }

    /// Build from faces already known to be valid, computing normals.
    pub(crate) fn from_valid_polygons(positions: Vec<DVec3>, faces: Vec<Vec<u32>>) -> Self {
        let mut mesh = Self::assemble(positions, faces);
        mesh.recompute_normals();
        mesh
    }

    /// Enumerate edges and incidence. Faces must have passed `validate_faces`.
    fn assemble(positions: Vec<DVec3>, faces: Vec<Vec<u32>>) -> Self {
        let vertex_count = positions.len();
        let mut edges: Vec<Edge> = Vec::new();
        let mut vertex_edges: Vec<Vec<EdgeId>> = vec![Vec::new(); vertex_count];
        let mut edge_map: HashMap<(VertexId, VertexId), EdgeId> = HashMap::new();
        let mut built_faces: Vec<Face> = Vec::with_capacity(faces.len());

        for (face_index, loop_indices) in faces.into_iter().enumerate() {
            let n = loop_indices.len();
            for i in 0..n {
                let a = VertexId(loop_indices[i]);
                let b = VertexId(loop_indices[(i + 1) % n]);
                let key = if a < b { (a, b) } else { (b, a) };

                if edge_map.contains_key(&key) {
                    continue;
                }

                let id = EdgeId(edges.len() as u32);
                edges.push(Edge {
                    id,
                    vertices: [key.0, key.1],
                });
                edge_map.insert(key, id);
                vertex_edges[key.0.index()].push(id);
                vertex_edges[key.1.index()].push(id);
            }

            built_faces.push(Face {
                id: FaceId(face_index as u32),
                vertices: loop_indices.into_iter().map(VertexId).collect(),
                normal: DVec3::ZERO,
            });
        }

        tracing::trace!(
            "EdgeMesh::assemble: {} vertices, {} edges, {} faces",
            vertex_count,
            edges.len(),
            built_faces.len()
        );

        Self {
            normals: vec![DVec3::ZERO; vertex_count],
            positions,
            faces: built_faces,
            edges,
            vertex_edges,
            edge_map,
        }
    }
}

fn validate_faces(vertex_count: usize, faces: &[Vec<u32>]) -> Result<(), GeometryError> {
    if vertex_count > u32::MAX as usize {
        return Err(GeometryError::InvalidTopology(format!(
            "{vertex_count} vertices exceed the u32 index range"
        )));
    }

    for (face_index, loop_indices) in faces.iter().enumerate() {
        if loop_indices.len() < 3 {
            return Err(GeometryError::InvalidTopology(format!(
                "Face {face_index} has {} vertices, need at least 3",
                loop_indices.len()
            )));
        }

        for (i, &vertex) in loop_indices.iter().enumerate() {
            if vertex as usize >= vertex_count {
                return Err(GeometryError::VertexOutOfRange {
                    face: face_index,
                    vertex,
                    vertex_count,
                });
            }
            if loop_indices[..i].contains(&vertex) {
                return Err(GeometryError::InvalidTopology(format!(
                    "Face {face_index} repeats vertex {vertex}"
                )));
            }
        }
    }
    Ok(())
}

/// Newell's method: sum of cross products around the loop.
///
/// The result is twice the polygon's vector area, so its length weights the
/// face by area when accumulated into vertex normals.
pub(crate) fn polygon_area_vector(positions: &[DVec3], face: &[VertexId]) -> DVec3 {
    let n = face.len();
    let mut sum = DVec3::ZERO;
    for i in 0..n {
        let current = positions[face[i].index()];
        let next = positions[face[(i + 1) % n].index()];
        sum += current.cross(next);
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_positions() -> Vec<DVec3> {
        vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_quad_edges_in_walk_order() {
        let mesh = EdgeMesh::from_polygons(quad_positions(), vec![vec![0, 1, 2, 3]]).unwrap();
        assert_eq!(mesh.edge_count(), 4);
        assert_eq!(mesh.edge(EdgeId(0)).vertices, [VertexId(0), VertexId(1)]);
        assert_eq!(mesh.edge(EdgeId(3)).vertices, [VertexId(0), VertexId(3)]);
    }

    #[test]
    fn test_shared_edge_enumerated_once() {
        let mesh = EdgeMesh::from_triangles(quad_positions(), &[0, 1, 2, 0, 2, 3]).unwrap();
        assert_eq!(mesh.edge_count(), 5);
        assert_eq!(mesh.connected_edges(VertexId(0)).len(), 3);
        assert_eq!(mesh.connected_edges(VertexId(1)).len(), 2);
    }

    #[test]
    fn test_rejects_out_of_range_index() {
        let result = EdgeMesh::from_triangles(quad_positions(), &[0, 1, 7]);
        assert!(matches!(
            result,
            Err(GeometryError::VertexOutOfRange { vertex: 7, .. })
        ));
    }

    #[test]
    fn test_rejects_short_face() {
        let result = EdgeMesh::from_polygons(quad_positions(), vec![vec![0, 1]]);
        assert!(matches!(result, Err(GeometryError::InvalidTopology(_))));
    }

    #[test]
    fn test_rejects_repeated_vertex() {
        let result = EdgeMesh::from_polygons(quad_positions(), vec![vec![0, 1, 1]]);
        assert!(matches!(result, Err(GeometryError::InvalidTopology(_))));
    }

    #[test]
    fn test_rejects_partial_triangle_list() {
        let result = EdgeMesh::from_triangles(quad_positions(), &[0, 1, 2, 3]);
        assert!(matches!(result, Err(GeometryError::InvalidTopology(_))));
    }

    #[test]
    fn test_with_normals_checks_count() {
        let result =
            EdgeMesh::with_normals(quad_positions(), vec![vec![0, 1, 2, 3]], vec![DVec3::Z]);
        assert!(matches!(
            result,
            Err(GeometryError::NormalCountMismatch {
                expected: 4,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_polygon_area_vector() {
        let positions = quad_positions();
        let face: Vec<VertexId> = (0..4).map(VertexId).collect();
        let area = polygon_area_vector(&positions, &face);
        assert!((area - DVec3::new(0.0, 0.0, 2.0)).length() < 1e-12);
    }
}
