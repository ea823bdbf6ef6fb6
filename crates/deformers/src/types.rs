//! Persistent per-node state.
//!
//! Hosts store these values in hidden node attributes between evaluations,
//! so both types serialize, and [`RestState`] also casts to a flat array of
//! doubles for hosts that persist raw attribute blocks.

use geometry::EdgeMesh;
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Lagging anchor of the secondary-motion follower.
///
/// Both vectors start at zero and are only changed by the follower update.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, bytemuck::Pod, bytemuck::Zeroable,
)]
#[repr(C)]
pub struct RestState {
    /// Smoothed position that trails the driver
    pub position_rest: DVec3,
    /// Smoothed per-step velocity
    pub velocity_rest: DVec3,
}

impl RestState {
    /// Zero both vectors.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// `[px, py, pz, vx, vy, vz]`, the layout of the host's hidden attributes.
    pub fn to_array(self) -> [f64; 6] {
        bytemuck::cast(self)
    }

    pub fn from_array(values: [f64; 6]) -> Self {
        bytemuck::cast(values)
    }
}

/// Rest-mesh edge lengths, indexed by edge id.
///
/// The cache is refilled from the rest mesh on every evaluation, reusing its
/// allocation, so output never depends on stale lengths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeLengthCache {
    lengths: Vec<f64>,
}

impl EdgeLengthCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached lengths with the current edge lengths of `mesh`.
    pub fn refresh(&mut self, mesh: &EdgeMesh) {
        mesh.write_edge_lengths(&mut self.lengths);
    }

    /// Whether the cache has one entry per edge of `mesh`.
    pub fn matches(&self, mesh: &EdgeMesh) -> bool {
        self.lengths.len() == mesh.edge_count()
    }

    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.lengths
    }

    pub fn clear(&mut self) {
        self.lengths.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_state_starts_at_zero() {
        let state = RestState::default();
        assert_eq!(state.position_rest, DVec3::ZERO);
        assert_eq!(state.velocity_rest, DVec3::ZERO);
    }

    #[test]
    fn test_rest_state_array_layout() {
        let state = RestState {
            position_rest: DVec3::new(1.0, 2.0, 3.0),
            velocity_rest: DVec3::new(4.0, 5.0, 6.0),
        };
        assert_eq!(state.to_array(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(RestState::from_array(state.to_array()), state);
    }

    #[test]
    fn test_edge_cache_refresh() {
        let mesh = EdgeMesh::from_triangles(
            vec![DVec3::ZERO, DVec3::new(3.0, 0.0, 0.0), DVec3::new(0.0, 4.0, 0.0)],
            &[0, 1, 2],
        )
        .unwrap();
        let mut cache = EdgeLengthCache::new();
        assert!(cache.is_empty());
        assert!(!cache.matches(&mesh));

        cache.refresh(&mesh);
        assert_eq!(cache.len(), 3);
        assert!(cache.matches(&mesh));
        assert_eq!(cache.as_slice(), &[3.0, 5.0, 4.0]);
    }
}
