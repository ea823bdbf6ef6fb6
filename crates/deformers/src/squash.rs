//! Edge-ratio squash and stretch.
//!
//! Each vertex compares the summed length of its incident edges in the rest
//! mesh against the same edges in the deformed target mesh:
//!
//! ```text
//! ratio = 1 - target_sum / rest_sum
//! ```
//!
//! Compressed neighbourhoods (ratio > 0) push the vertex out along its normal,
//! stretched ones (ratio < 0) pull it in. The ramp variant further scales
//! stretched vertices by a curve sampled from the vertex's rest height.

use geometry::{EdgeMesh, VertexId};
use tracing::{debug, trace};

use crate::ramp::CurveSampler;
use crate::types::EdgeLengthCache;

/// What happened during a squash/stretch evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SquashOutcome {
    /// Vertices were offset along their normals.
    Deformed {
        /// Vertices whose ratio could not be fully computed. Those with zero
        /// rest edge length are left in place; ramp vertices with a
        /// non-finite height still move by the unmodulated ratio.
        degenerate_vertices: usize,
        /// Vertices whose neighbourhood shrank
        compressed: usize,
        /// Vertices whose neighbourhood grew
        stretched: usize,
    },
    /// Rest and target topology differ; the target was passed through.
    TopologyMismatch {
        original_edges: usize,
        target_edges: usize,
        original_vertices: usize,
        target_vertices: usize,
    },
}

/// Output mesh plus evaluation outcome.
#[derive(Debug, Clone)]
pub struct SquashResult {
    pub mesh: EdgeMesh,
    pub outcome: SquashOutcome,
}

impl SquashResult {
    pub fn is_passthrough(&self) -> bool {
        matches!(self.outcome, SquashOutcome::TopologyMismatch { .. })
    }
}

/// Per-vertex edge ratio from rest and target edge lengths.
///
/// Returns `None` when the rest neighbourhood has zero total length (an
/// isolated vertex or collapsed edges), where the ratio is undefined.
///
/// # Panics
///
/// Panics if `rest_lengths` or `target_lengths` is shorter than the edge
/// count of `target`.
pub fn vertex_edge_ratio(
    target: &EdgeMesh,
    vertex: VertexId,
    rest_lengths: &[f64],
    target_lengths: &[f64],
) -> Option<f64> {
    let mut rest_sum = 0.0;
    let mut target_sum = 0.0;
    for &edge in target.connected_edges(vertex) {
        rest_sum += rest_lengths[edge.index()];
        target_sum += target_lengths[edge.index()];
    }

    let ratio = 1.0 - target_sum / rest_sum;
    ratio.is_finite().then_some(ratio)
}

/// Push target vertices along their normals by the edge ratio.
///
/// `cache` is refilled with the rest-mesh edge lengths. When edge counts
/// differ the result is an unmodified copy of `target`.
pub fn squash_stretch(
    original: &EdgeMesh,
    target: &EdgeMesh,
    cache: &mut EdgeLengthCache,
) -> SquashResult {
    deform_by_edge_ratio(original, target, cache, false, |_, ratio| Some(ratio))
}

/// Ramp-modulated squash and stretch.
///
/// Identical to [`squash_stretch`], except that stretched vertices
/// (ratio < 0) have their ratio multiplied by
/// `curve.sample(scale - |rest.y| / scale)`. Vertex counts must also match
/// since the rest height is read per target vertex.
pub fn squash_stretch_ramp<C>(
    original: &EdgeMesh,
    target: &EdgeMesh,
    cache: &mut EdgeLengthCache,
    scale: f64,
    curve: &C,
) -> SquashResult
where
    C: CurveSampler + ?Sized,
{
    deform_by_edge_ratio(original, target, cache, true, |vertex, ratio| {
        if ratio >= 0.0 {
            return Some(ratio);
        }
        let height = scale - original.position(vertex).y.abs() / scale;
        if !height.is_finite() {
            return None;
        }
        Some(ratio * curve.sample(height))
    })
}

/// Shared edge-ratio loop.
///
/// `modulate` receives each vertex's base ratio and returns the ratio to
/// apply, or `None` if it cannot be computed (the base ratio is then used
/// and the vertex counted as degenerate).
fn deform_by_edge_ratio<M>(
    original: &EdgeMesh,
    target: &EdgeMesh,
    cache: &mut EdgeLengthCache,
    require_vertex_match: bool,
    mut modulate: M,
) -> SquashResult
where
    M: FnMut(VertexId, f64) -> Option<f64>,
{
    let mut output = target.clone_for_output();

    cache.refresh(original);
    let vertices_differ =
        require_vertex_match && original.vertex_count() != target.vertex_count();
    if !cache.matches(target) || vertices_differ {
        debug!(
            "squash_stretch: topology mismatch (rest {} edges / {} vertices, target {} edges / {} vertices), passing target through",
            original.edge_count(),
            original.vertex_count(),
            target.edge_count(),
            target.vertex_count()
        );
        return SquashResult {
            mesh: output,
            outcome: SquashOutcome::TopologyMismatch {
                original_edges: original.edge_count(),
                target_edges: target.edge_count(),
                original_vertices: original.vertex_count(),
                target_vertices: target.vertex_count(),
            },
        };
    }

    let rest_lengths = cache.as_slice();
    let target_lengths = target.edge_lengths();

    let mut degenerate_vertices = 0;
    let mut compressed = 0;
    let mut stretched = 0;

    for vertex in target.vertices() {
        let Some(ratio) = vertex_edge_ratio(target, vertex.id, rest_lengths, &target_lengths)
        else {
            trace!("squash_stretch: vertex {} has no rest edge length", vertex.id.0);
            degenerate_vertices += 1;
            continue;
        };

        if ratio > 0.0 {
            compressed += 1;
        } else if ratio < 0.0 {
            stretched += 1;
        }

        let ratio = match modulate(vertex.id, ratio) {
            Some(modulated) => modulated,
            None => {
                trace!("squash_stretch: vertex {} modulation undefined", vertex.id.0);
                degenerate_vertices += 1;
                ratio
            }
        };

        output.set_position(vertex.id, vertex.position + vertex.normal * ratio);
    }

    debug!(
        "squash_stretch: {} vertices, {} compressed, {} stretched, {} degenerate",
        target.vertex_count(),
        compressed,
        stretched,
        degenerate_vertices
    );

    SquashResult {
        mesh: output,
        outcome: SquashOutcome::Deformed {
            degenerate_vertices,
            compressed,
            stretched,
        },
    }
}
