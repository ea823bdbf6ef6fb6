//! Type definitions for the edge mesh.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Type-safe vertex identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(pub u32);

/// Type-safe edge identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub u32);

/// Type-safe face identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FaceId(pub u32);

impl VertexId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl EdgeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl FaceId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An undirected edge between two vertices.
///
/// Endpoints are stored canonically with `vertices[0] < vertices[1]`, so an
/// edge shared by two faces is enumerated exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub vertices: [VertexId; 2],
}

/// A polygon face with its vertex loop in winding order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    pub id: FaceId,
    pub vertices: Vec<VertexId>,
    /// Cached face normal (unit length, zero for degenerate faces)
    pub normal: DVec3,
}

/// One row of a vertex iteration: everything a deformer reads per vertex.
#[derive(Debug, Clone, Copy)]
pub struct VertexView<'a> {
    pub id: VertexId,
    pub position: DVec3,
    pub normal: DVec3,
    pub connected_edges: &'a [EdgeId],
}

/// Errors that can occur while building or updating an edge mesh
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    #[error("Invalid mesh topology: {0}")]
    InvalidTopology(String),
    #[error("Face {face} references vertex {vertex} but the mesh has {vertex_count} vertices")]
    VertexOutOfRange {
        face: usize,
        vertex: u32,
        vertex_count: usize,
    },
    #[error("Expected {expected} normals, got {actual}")]
    NormalCountMismatch { expected: usize, actual: usize },
    #[error("Point buffer holds {actual} values, expected {expected}")]
    PointBufferLength { expected: usize, actual: usize },
    #[error("Point buffer cast failed: {0}")]
    PointBufferCast(bytemuck::PodCastError),
    #[cfg(feature = "bevy")]
    #[error("Mesh has no position attribute")]
    NoPositions,
    #[cfg(feature = "bevy")]
    #[error("Mesh has no indices")]
    NoIndices,
}
