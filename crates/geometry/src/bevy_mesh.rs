//! Import from Bevy render meshes.

use bevy::mesh::{Indices, Mesh};
use glam::DVec3;

use crate::edge_mesh::{EdgeMesh, GeometryError};

fn to_dvec3(v: [f32; 3]) -> DVec3 {
    DVec3::new(v[0] as f64, v[1] as f64, v[2] as f64)
}

impl EdgeMesh {
    /// Build an edge mesh from a Bevy triangle-list mesh.
    ///
    /// Index topology is kept exactly as authored: vertices duplicated at UV
    /// seams stay separate, so edge ids line up with any other mesh built
    /// from the same index buffer. Normals are taken from the mesh when
    /// present and computed otherwise.
    pub fn from_bevy_mesh(mesh: &Mesh) -> Result<Self, GeometryError> {
        let positions: Vec<DVec3> = mesh
            .attribute(Mesh::ATTRIBUTE_POSITION)
            .and_then(|attr| attr.as_float3())
            .ok_or(GeometryError::NoPositions)?
            .iter()
            .map(|p| to_dvec3(*p))
            .collect();

        let normals: Option<Vec<DVec3>> = mesh
            .attribute(Mesh::ATTRIBUTE_NORMAL)
            .and_then(|attr| attr.as_float3())
            .map(|n| n.iter().map(|v| to_dvec3(*v)).collect());

        let indices: Vec<u32> = match mesh.indices() {
            Some(Indices::U16(idx)) => idx.iter().map(|&i| i as u32).collect(),
            Some(Indices::U32(idx)) => idx.to_vec(),
            None => return Err(GeometryError::NoIndices),
        };

        if indices.len() % 3 != 0 {
            return Err(GeometryError::InvalidTopology(
                "Index count not divisible by 3".to_string(),
            ));
        }
        let faces: Vec<Vec<u32>> = indices.chunks(3).map(|tri| tri.to_vec()).collect();

        tracing::debug!(
            "from_bevy_mesh: {} vertices, {} triangles, normals {}",
            positions.len(),
            faces.len(),
            if normals.is_some() { "supplied" } else { "computed" }
        );

        match normals {
            Some(normals) => Self::with_normals(positions, faces, normals),
            None => Self::from_polygons(positions, faces),
        }
    }
}
