//! Axis-aligned bounding boxes for spatial culling.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// An inverted box that any included point will replace.
    pub fn empty() -> Self {
        Self {
            min: DVec3::splat(f64::MAX),
            max: DVec3::splat(f64::MIN),
        }
    }

    pub fn from_points(points: &[DVec3]) -> Self {
        let mut bounds = Self::empty();
        for &p in points {
            bounds.include_point(p);
        }
        bounds
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn include_point(&mut self, point: DVec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    pub fn contains_point(&self, point: DVec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Squared distance from a point to the box (zero inside).
    pub fn distance_squared_to(&self, point: DVec3) -> f64 {
        let closest = point.clamp(self.min, self.max);
        closest.distance_squared(point)
    }

    pub fn intersects_sphere(&self, center: DVec3, radius: f64) -> bool {
        self.distance_squared_to(center) <= radius * radius
    }

    /// Grow to cover `other`. Empty boxes leave `self` unchanged.
    pub fn include_aabb(&mut self, other: &Aabb) {
        if other.is_empty() {
            return;
        }
        self.include_point(other.min);
        self.include_point(other.max);
    }

    /// Octant index (0..8) of `point` around the box center.
    pub fn octant_for_point(&self, point: DVec3) -> usize {
        let center = self.center();
        let mut index = 0;
        if point.x >= center.x {
            index |= 1;
        }
        if point.y >= center.y {
            index |= 2;
        }
        if point.z >= center.z {
            index |= 4;
        }
        index
    }

    /// Bounds of one octant of this box.
    pub fn octant_bounds(&self, octant: usize) -> Aabb {
        let center = self.center();
        let pick = |bit: usize, low: f64, mid: f64| if octant & bit != 0 { mid } else { low };
        let min = DVec3::new(
            pick(1, self.min.x, center.x),
            pick(2, self.min.y, center.y),
            pick(4, self.min.z, center.z),
        );
        let pick_max = |bit: usize, mid: f64, high: f64| if octant & bit != 0 { high } else { mid };
        let max = DVec3::new(
            pick_max(1, center.x, self.max.x),
            pick_max(2, center.y, self.max.y),
            pick_max(4, center.z, self.max.z),
        );
        Aabb::new(min, max)
    }
}
