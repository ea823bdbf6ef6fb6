//! Geometry access layer for deformkit.
//!
//! This crate provides the mesh data the deformers read and write:
//! - [`EdgeMesh`] - polygon mesh with deterministic edge ids, per-vertex
//!   incident edges, edge lengths and vertex normals
//! - [`bounds`] - axis-aligned boxes used for culling
//! - [`closest_point`] - closest-point-on-surface queries for collision
//! - [`primitives`] - procedural cube and grid meshes
//!
//! With the `bevy` feature, meshes can be imported from Bevy render meshes.

pub mod bounds;
pub mod closest_point;
pub mod edge_mesh;
pub mod primitives;

#[cfg(feature = "bevy")]
mod bevy_mesh;

pub use bounds::Aabb;
pub use closest_point::{SurfacePoint, SurfaceQuery};
pub use edge_mesh::{Edge, EdgeId, EdgeMesh, Face, FaceId, GeometryError, VertexId, VertexView};
