//! Closest-point queries against a triangulated mesh.
//!
//! Point-triangle distance follows the Voronoi-region walk from Ericson's
//! "Real-Time Collision Detection", with barycentric interpolation of vertex
//! normals at the hit point.

use glam::DVec3;

use crate::bounds::Aabb;
use crate::edge_mesh::{EdgeMesh, FaceId};

/// Triangles with twice-area below this are skipped
const DEGENERATE_AREA: f64 = 1e-18;

/// Closest point on a single triangle.
#[derive(Debug, Clone, Copy)]
pub struct TriangleClosest {
    pub point: DVec3,
    /// Barycentric weight for vertex 1
    pub u: f64,
    /// Barycentric weight for vertex 2
    pub v: f64,
}

/// Closest point on triangle `(a, b, c)` to `p`.
pub fn closest_point_on_triangle(p: DVec3, a: DVec3, b: DVec3, c: DVec3) -> TriangleClosest {
    let ab = b - a;
    let ac = c - a;

    // Vertex region A
    let ap = p - a;
    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return TriangleClosest { point: a, u: 0.0, v: 0.0 };
    }

    // Vertex region B
    let bp = p - b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return TriangleClosest { point: b, u: 1.0, v: 0.0 };
    }

    // Edge region AB
    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let t = d1 / (d1 - d3);
        return TriangleClosest { point: a + ab * t, u: t, v: 0.0 };
    }

    // Vertex region C
    let cp = p - c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return TriangleClosest { point: c, u: 0.0, v: 1.0 };
    }

    // Edge region AC
    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let t = d2 / (d2 - d6);
        return TriangleClosest { point: a + ac * t, u: 0.0, v: t };
    }

    // Edge region BC
    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let t = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return TriangleClosest {
            point: b + (c - b) * t,
            u: 1.0 - t,
            v: t,
        };
    }

    // Face interior
    let denom = 1.0 / (va + vb + vc);
    let u = vb * denom;
    let v = vc * denom;
    TriangleClosest {
        point: a + ab * u + ac * v,
        u,
        v,
    }
}

/// Interpolate a DVec3 attribute using barycentric coordinates.
pub fn interpolate_dvec3(v0: DVec3, v1: DVec3, v2: DVec3, u: f64, v: f64) -> DVec3 {
    let w = 1.0 - u - v;
    v0 * w + v1 * u + v2 * v
}

/// Result of a closest-point query.
#[derive(Debug, Clone, Copy)]
pub struct SurfacePoint {
    /// Closest point on the surface
    pub point: DVec3,
    /// Interpolated vertex normal at the point (falls back to the face normal)
    pub normal: DVec3,
    /// Face the point lies on
    pub face_id: FaceId,
    /// Distance from the query point
    pub distance: f64,
}

#[derive(Debug, Clone, Copy)]
struct QueryTriangle {
    corners: [DVec3; 3],
    normals: [DVec3; 3],
    face_normal: DVec3,
    face_id: FaceId,
    bounds: Aabb,
    centroid: DVec3,
}

/// Leaves holding at most this many triangles are not split further
const MAX_TRIANGLES_PER_LEAF: usize = 8;

/// Depth limit of the triangle octree
const MAX_OCTREE_DEPTH: u32 = 8;

/// Triangle octree node.
///
/// Triangles are assigned to the octant holding their centroid, so a node's
/// `bounds` is the union of its triangles' boxes rather than its octant cell.
#[derive(Debug, Clone)]
enum OctreeNode {
    Leaf { bounds: Aabb, triangles: Vec<u32> },
    Internal { bounds: Aabb, children: Vec<OctreeNode> },
}

impl OctreeNode {
    fn bounds(&self) -> &Aabb {
        match self {
            OctreeNode::Leaf { bounds, .. } | OctreeNode::Internal { bounds, .. } => bounds,
        }
    }

    fn build(triangles: &[QueryTriangle], indices: Vec<u32>, cell: Aabb, depth: u32) -> Self {
        let mut bounds = Aabb::empty();
        for &index in &indices {
            bounds.include_aabb(&triangles[index as usize].bounds);
        }

        if indices.len() <= MAX_TRIANGLES_PER_LEAF || depth >= MAX_OCTREE_DEPTH {
            return OctreeNode::Leaf {
                bounds,
                triangles: indices,
            };
        }

        let mut octants: [Vec<u32>; 8] = Default::default();
        for index in indices {
            let octant = cell.octant_for_point(triangles[index as usize].centroid);
            octants[octant].push(index);
        }

        let children = octants
            .into_iter()
            .enumerate()
            .filter(|(_, members)| !members.is_empty())
            .map(|(octant, members)| {
                Self::build(triangles, members, cell.octant_bounds(octant), depth + 1)
            })
            .collect();

        OctreeNode::Internal { bounds, children }
    }
}

/// Closest-point index over the triangles of an [`EdgeMesh`].
///
/// Triangles live in an octree; whole subtrees whose bounds lie farther than
/// the best hit so far are skipped, and nearer children are visited first.
#[derive(Debug, Clone)]
pub struct SurfaceQuery {
    triangles: Vec<QueryTriangle>,
    root: OctreeNode,
}

impl SurfaceQuery {
    pub fn new(mesh: &EdgeMesh) -> Self {
        let mut triangles = Vec::new();

        for face in mesh.faces() {
            let first = face.vertices[0];
            for pair in face.vertices.windows(2).skip(1) {
                let ids = [first, pair[0], pair[1]];
                let corners = ids.map(|id| mesh.position(id));
                let area = (corners[1] - corners[0]).cross(corners[2] - corners[0]);
                if area.length_squared() < DEGENERATE_AREA {
                    continue;
                }
                triangles.push(QueryTriangle {
                    corners,
                    normals: ids.map(|id| mesh.normal(id)),
                    face_normal: area.normalize(),
                    face_id: face.id,
                    bounds: Aabb::from_points(&corners),
                    centroid: (corners[0] + corners[1] + corners[2]) / 3.0,
                });
            }
        }

        let indices = (0..triangles.len() as u32).collect();
        let root = OctreeNode::build(&triangles, indices, mesh.bounds(), 0);

        tracing::trace!("SurfaceQuery::new: {} triangles", triangles.len());

        Self { triangles, root }
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Closest surface point to `point` no farther than `max_distance`.
    pub fn closest_point(&self, point: DVec3, max_distance: f64) -> Option<SurfacePoint> {
        if self.triangles.is_empty() {
            return None;
        }

        let mut best_distance_sq = max_distance * max_distance;
        let mut best: Option<(TriangleClosest, u32)> = None;
        self.search_node(&self.root, point, &mut best_distance_sq, &mut best);

        best.map(|(hit, index)| {
            let triangle = &self.triangles[index as usize];
            let [n0, n1, n2] = triangle.normals;
            let normal = interpolate_dvec3(n0, n1, n2, hit.u, hit.v).normalize_or_zero();
            SurfacePoint {
                point: hit.point,
                normal: if normal == DVec3::ZERO {
                    triangle.face_normal
                } else {
                    normal
                },
                face_id: triangle.face_id,
                distance: best_distance_sq.sqrt(),
            }
        })
    }

    fn search_node(
        &self,
        node: &OctreeNode,
        point: DVec3,
        best_distance_sq: &mut f64,
        best: &mut Option<(TriangleClosest, u32)>,
    ) {
        if node.bounds().distance_squared_to(point) > *best_distance_sq {
            return;
        }

        match node {
            OctreeNode::Leaf { triangles, .. } => {
                for &index in triangles {
                    let triangle = &self.triangles[index as usize];
                    if triangle.bounds.distance_squared_to(point) > *best_distance_sq {
                        continue;
                    }
                    let [a, b, c] = triangle.corners;
                    let hit = closest_point_on_triangle(point, a, b, c);
                    let distance_sq = hit.point.distance_squared(point);
                    if distance_sq <= *best_distance_sq {
                        *best_distance_sq = distance_sq;
                        *best = Some((hit, index));
                    }
                }
            }
            OctreeNode::Internal { children, .. } => {
                let mut order: Vec<(f64, &OctreeNode)> = children
                    .iter()
                    .map(|child| (child.bounds().distance_squared_to(point), child))
                    .collect();
                order.sort_by(|a, b| a.0.total_cmp(&b.0));
                for (_, child) in order {
                    self.search_node(child, point, best_distance_sq, best);
                }
            }
        }
    }
}
