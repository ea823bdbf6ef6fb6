//! Collision deformer.
//!
//! Every vertex of the rest mesh, shifted by a constant offset, is tested
//! against the closest point of a collision surface. Vertices behind the
//! surface (the surface normal faces toward them) are snapped onto it.
//! Vertices in front but within `swell_length` bulge outward along their rest
//! normal, shaped by a ramp sampled at `distance / swell_length`.

use deformkit_config::{CollideConfig, SWELL_FACTOR};
use geometry::{EdgeMesh, SurfaceQuery};
use glam::DVec3;
use rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};
use tracing::{debug, trace};

use crate::ramp::CurveSampler;

/// Meshes with at least this many vertices are resolved in parallel
pub const PARALLEL_THRESHOLD: usize = 1000;

/// Parameters for one collision evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollideParams {
    /// Translation applied to every rest vertex before testing
    pub offset: DVec3,
    /// Distance within which vertices swell; `<= 0` disables swelling
    pub swell_length: f64,
    pub swell_value: f64,
    /// Search radius of the closest-point query
    pub max_distance: f64,
}

impl CollideParams {
    pub fn new(offset: DVec3, config: &CollideConfig) -> Self {
        Self {
            offset,
            swell_length: config.swell_length,
            swell_value: config.swell_value,
            max_distance: config.max_distance,
        }
    }
}

impl Default for CollideParams {
    fn default() -> Self {
        Self::new(DVec3::ZERO, &CollideConfig::default())
    }
}

/// How a single vertex related to the collider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Behind the surface, snapped onto it
    Inside,
    /// In front, within swell range
    Swelled,
    /// In front, out of swell range
    Clear,
    /// No surface within `max_distance`
    Missed,
}

/// Output mesh plus per-contact vertex counts.
#[derive(Debug, Clone)]
pub struct CollideResult {
    pub mesh: EdgeMesh,
    pub collided: usize,
    pub swelled: usize,
    pub missed: usize,
}

/// Resolve one shifted vertex against the collider.
pub fn resolve_vertex<C>(
    point: DVec3,
    rest_normal: DVec3,
    query: &SurfaceQuery,
    params: &CollideParams,
    curve: &C,
) -> (DVec3, Contact)
where
    C: CurveSampler + ?Sized,
{
    let Some(hit) = query.closest_point(point, params.max_distance) else {
        return (point, Contact::Missed);
    };

    let toward_surface = (hit.point - point).normalize_or_zero();
    if hit.normal.dot(toward_surface) > 0.0 {
        return (hit.point, Contact::Inside);
    }

    let distance = point.distance(hit.point);
    if params.swell_length > 0.0 && distance < params.swell_length {
        let strength = curve.sample(distance / params.swell_length);
        let swollen = point + rest_normal * (strength * params.swell_value * SWELL_FACTOR);
        return (swollen, Contact::Swelled);
    }

    (point, Contact::Clear)
}

/// Deform a copy of `original` against the collision surface.
///
/// Output normals are the rest normals; hosts recompute them if needed.
pub fn collide<C>(
    original: &EdgeMesh,
    query: &SurfaceQuery,
    params: &CollideParams,
    curve: &C,
) -> CollideResult
where
    C: CurveSampler + Sync + ?Sized,
{
    let resolve = |(position, normal): (&DVec3, &DVec3)| {
        resolve_vertex(*position + params.offset, *normal, query, params, curve)
    };

    let resolved: Vec<(DVec3, Contact)> = if original.vertex_count() >= PARALLEL_THRESHOLD {
        original
            .positions()
            .par_iter()
            .zip(original.normals().par_iter())
            .map(resolve)
            .collect()
    } else {
        original
            .positions()
            .iter()
            .zip(original.normals())
            .map(resolve)
            .collect()
    };

    let mut output = original.clone_for_output();
    let mut collided = 0;
    let mut swelled = 0;
    let mut missed = 0;

    for (vertex, (position, contact)) in original.vertices().zip(resolved) {
        match contact {
            Contact::Inside => collided += 1,
            Contact::Swelled => swelled += 1,
            Contact::Missed => {
                trace!("collide: vertex {} found no surface", vertex.id.0);
                missed += 1;
            }
            Contact::Clear => {}
        }
        output.set_position(vertex.id, position);
    }

    debug!(
        "collide: {} vertices against {} triangles, {} collided, {} swelled, {} missed",
        original.vertex_count(),
        query.triangle_count(),
        collided,
        swelled,
        missed
    );

    CollideResult {
        mesh: output,
        collided,
        swelled,
        missed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ramp::RampCurve;
    use geometry::primitives::grid;

    const EPSILON: f64 = 1e-9;

    fn floor() -> SurfaceQuery {
        SurfaceQuery::new(&grid(10.0, 1, 0.0))
    }

    #[test]
    fn test_vertices_below_floor_snap_up() {
        let original = grid(1.0, 1, -0.2);
        let result = collide(&original, &floor(), &CollideParams::default(), &RampCurve::swell());

        assert_eq!(result.collided, 4);
        for (before, after) in original.positions().iter().zip(result.mesh.positions()) {
            assert!(after.y.abs() < EPSILON);
            assert!((after.x - before.x).abs() < EPSILON);
            assert!((after.z - before.z).abs() < EPSILON);
        }
    }

    #[test]
    fn test_vertices_near_floor_swell() {
        // distance 0.15 over swell length 0.5 samples the ramp peak at 0.3
        let original = grid(1.0, 1, 0.15);
        let result = collide(&original, &floor(), &CollideParams::default(), &RampCurve::swell());

        assert_eq!(result.swelled, 4);
        assert_eq!(result.collided, 0);
        for position in result.mesh.positions() {
            assert!((position.y - 0.25).abs() < EPSILON);
        }
    }

    #[test]
    fn test_swell_uses_custom_curve() {
        let original = grid(1.0, 1, 0.25);
        let params = CollideParams {
            swell_value: 2.0,
            ..CollideParams::default()
        };
        let result = collide(&original, &floor(), &params, &|_t: f64| 0.5);
        for position in result.mesh.positions() {
            assert!((position.y - (0.25 + 0.5 * 2.0 * SWELL_FACTOR)).abs() < EPSILON);
        }
    }

    #[test]
    fn test_zero_swell_length_disables_swelling() {
        let original = grid(1.0, 1, 0.15);
        let params = CollideParams {
            swell_length: 0.0,
            ..CollideParams::default()
        };
        let result = collide(&original, &floor(), &params, &RampCurve::swell());
        assert_eq!(result.swelled, 0);
        assert_eq!(result.mesh.positions(), original.positions());
    }

    #[test]
    fn test_offset_moves_out_of_range() {
        let original = grid(1.0, 1, 0.0);
        let params = CollideParams::new(DVec3::new(0.0, 2.0, 0.0), &CollideConfig::default());
        let result = collide(&original, &floor(), &params, &RampCurve::swell());

        assert_eq!(result.collided + result.swelled + result.missed, 0);
        for position in result.mesh.positions() {
            assert!((position.y - 2.0).abs() < EPSILON);
        }
    }

    #[test]
    fn test_miss_beyond_max_distance() {
        let original = grid(1.0, 1, 3.0);
        let params = CollideParams {
            max_distance: 1.0,
            ..CollideParams::default()
        };
        let result = collide(&original, &floor(), &params, &RampCurve::swell());
        assert_eq!(result.missed, 4);
        assert_eq!(result.mesh.positions(), original.positions());
    }

    #[test]
    fn test_large_mesh_resolved_in_parallel() {
        let original = grid(2.0, 40, -0.1);
        assert!(original.vertex_count() >= PARALLEL_THRESHOLD);

        let result = collide(&original, &floor(), &CollideParams::default(), &RampCurve::swell());
        assert_eq!(result.collided, original.vertex_count());
        assert!(result.mesh.positions().iter().all(|p| p.y.abs() < EPSILON));
    }

    #[test]
    fn test_rest_normals_kept() {
        let original = grid(1.0, 1, 0.15);
        let result = collide(&original, &floor(), &CollideParams::default(), &RampCurve::swell());
        assert_eq!(result.mesh.normals(), original.normals());
    }
}
