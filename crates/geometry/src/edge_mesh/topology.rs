//! Topology and measurement queries for EdgeMesh.

use glam::DVec3;

use super::types::{Edge, EdgeId, Face, FaceId, VertexId, VertexView};
use super::EdgeMesh;
use crate::bounds::Aabb;

impl EdgeMesh {
    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Position of a vertex.
    ///
    /// Panics if `id` is out of range, like slice indexing.
    pub fn position(&self, id: VertexId) -> DVec3 {
        self.positions[id.index()]
    }

    /// Normal of a vertex.
    pub fn normal(&self, id: VertexId) -> DVec3 {
        self.normals[id.index()]
    }

    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[DVec3] {
        &self.normals
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    pub fn edge_list(&self) -> &[Edge] {
        &self.edges
    }

    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(id.index())
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Edges incident to a vertex
    pub fn connected_edges(&self, id: VertexId) -> &[EdgeId] {
        &self.vertex_edges[id.index()]
    }

    /// Look up the edge joining two vertices, in either direction.
    pub fn find_edge(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        let key = if a < b { (a, b) } else { (b, a) };
        self.edge_map.get(&key).copied()
    }

    // ========================================================================
    // Measurements
    // ========================================================================

    /// Current length of an edge.
    pub fn edge_length(&self, id: EdgeId) -> f64 {
        let [a, b] = self.edges[id.index()].vertices;
        self.positions[a.index()].distance(self.positions[b.index()])
    }

    /// Lengths of every edge, indexed by edge id.
    pub fn edge_lengths(&self) -> Vec<f64> {
        let mut lengths = Vec::with_capacity(self.edges.len());
        self.write_edge_lengths(&mut lengths);
        lengths
    }

    /// Refill `out` with the lengths of every edge, reusing its allocation.
    pub fn write_edge_lengths(&self, out: &mut Vec<f64>) {
        out.clear();
        out.extend(self.edges.iter().map(|edge| self.edge_length(edge.id)));
    }

    /// Axis-aligned bounds of all vertex positions.
    pub fn bounds(&self) -> Aabb {
        let mut bounds = Aabb::empty();
        for &p in &self.positions {
            bounds.include_point(p);
        }
        bounds
    }

    // ========================================================================
    // Iteration
    // ========================================================================

    /// Iterate vertices in index order with position, normal and incident edges.
    pub fn vertices(&self) -> impl ExactSizeIterator<Item = VertexView<'_>> + '_ {
        self.positions.iter().enumerate().map(move |(i, &position)| VertexView {
            id: VertexId(i as u32),
            position,
            normal: self.normals[i],
            connected_edges: &self.vertex_edges[i],
        })
    }

    /// Iterate edges in id order with their current length.
    pub fn edges(&self) -> impl ExactSizeIterator<Item = (EdgeId, f64)> + '_ {
        self.edges.iter().map(move |edge| (edge.id, self.edge_length(edge.id)))
    }

    /// Fan-triangulate every face, yielding vertex index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [VertexId; 3]> + '_ {
        self.faces.iter().flat_map(|face| {
            let first = face.vertices[0];
            face.vertices
                .windows(2)
                .skip(1)
                .map(move |pair| [first, pair[0], pair[1]])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_meshes::{cube, triangle};
    use super::*;

    #[test]
    fn test_find_edge_either_direction() {
        let mesh = triangle();
        let forward = mesh.find_edge(VertexId(0), VertexId(1));
        let backward = mesh.find_edge(VertexId(1), VertexId(0));
        assert!(forward.is_some());
        assert_eq!(forward, backward);
        assert_eq!(mesh.find_edge(VertexId(0), VertexId(0)), None);
    }

    #[test]
    fn test_edge_lengths_indexed_by_id() {
        let mesh = triangle();
        let lengths = mesh.edge_lengths();
        assert_eq!(lengths.len(), 3);
        for (id, length) in mesh.edges() {
            assert_eq!(lengths[id.index()], length);
        }
        let diagonal = mesh.find_edge(VertexId(1), VertexId(2)).unwrap();
        assert!((mesh.edge_length(diagonal) - 2.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_write_edge_lengths_reuses_buffer() {
        let mesh = cube(2.0);
        let mut buffer = vec![99.0; 40];
        mesh.write_edge_lengths(&mut buffer);
        assert_eq!(buffer.len(), 12);
        assert!(buffer.iter().all(|&l| (l - 2.0).abs() < 1e-12));
    }

    #[test]
    fn test_cube_fan_triangulation() {
        let mesh = cube(1.0);
        assert_eq!(mesh.triangles().count(), 12);
    }

    #[test]
    fn test_bounds() {
        let bounds = cube(2.0).bounds();
        assert_eq!(bounds.min, DVec3::splat(-1.0));
        assert_eq!(bounds.max, DVec3::splat(1.0));
    }
}
