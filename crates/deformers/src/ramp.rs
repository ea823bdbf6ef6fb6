//! Ramp curves for modulating deformation strength.
//!
//! Deformers only need `sample(t) -> value`, expressed by [`CurveSampler`].
//! [`RampCurve`] is the stock implementation: a sorted list of keys, each
//! carrying the interpolation used up to the next key, matching the behaviour
//! of curve ramp attributes in animation hosts. Hosts that evaluate their own
//! curves can pass a closure instead.

use serde::{Deserialize, Serialize};

/// Anything that maps a ramp position to a value.
pub trait CurveSampler {
    fn sample(&self, position: f64) -> f64;
}

impl<F> CurveSampler for F
where
    F: Fn(f64) -> f64,
{
    fn sample(&self, position: f64) -> f64 {
        self(position)
    }
}

/// How a key blends toward the next key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Interpolation {
    /// Hold the key's value until the next key
    None = 0,
    /// Straight line to the next key
    #[default]
    Linear = 1,
    /// Hermite smoothstep to the next key
    Smooth = 2,
    /// Catmull-Rom spline through neighbouring keys
    Spline = 3,
}

/// A single control point of a ramp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    pub position: f64,
    pub value: f64,
    pub interpolation: Interpolation,
}

impl CurveKey {
    pub fn new(position: f64, value: f64, interpolation: Interpolation) -> Self {
        Self {
            position,
            value,
            interpolation,
        }
    }
}

/// Piecewise curve over sorted keys.
///
/// Positions before the first key or after the last clamp to the end values.
/// A curve with no keys samples to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RampCurve {
    keys: Vec<CurveKey>,
}

impl Default for RampCurve {
    /// Linear ramp from (0, 0) to (1, 1).
    fn default() -> Self {
        Self::new(vec![
            CurveKey::new(0.0, 0.0, Interpolation::Linear),
            CurveKey::new(1.0, 1.0, Interpolation::Linear),
        ])
    }
}

impl RampCurve {
    /// Build a curve; keys are sorted by position.
    pub fn new(mut keys: Vec<CurveKey>) -> Self {
        keys.retain(|k| k.position.is_finite() && k.value.is_finite());
        keys.sort_by(|a, b| a.position.total_cmp(&b.position));
        Self { keys }
    }

    /// Bump shaped ramp used for collision swelling: 0 at contact, peaking
    /// at 0.3, back to 0 at the swell limit.
    pub fn swell() -> Self {
        Self::new(vec![
            CurveKey::new(0.0, 0.0, Interpolation::Smooth),
            CurveKey::new(0.3, 1.0, Interpolation::Smooth),
            CurveKey::new(1.0, 0.0, Interpolation::Smooth),
        ])
    }

    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    /// Insert a key, keeping keys sorted. Non-finite keys are ignored.
    pub fn insert(&mut self, key: CurveKey) {
        if !(key.position.is_finite() && key.value.is_finite()) {
            return;
        }
        let index = self
            .keys
            .partition_point(|k| k.position <= key.position);
        self.keys.insert(index, key);
    }

    /// Evaluate the curve at `position`.
    pub fn evaluate(&self, position: f64) -> f64 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return 0.0;
        };
        if position.is_nan() {
            return first.value;
        }
        if position <= first.position {
            return first.value;
        }
        if position >= last.position {
            return last.value;
        }

        // First key strictly after `position`; guaranteed in 1..len here
        let upper = self.keys.partition_point(|k| k.position <= position);
        let lower = upper - 1;
        let k0 = self.keys[lower];
        let k1 = self.keys[upper];

        let span = k1.position - k0.position;
        if span <= 0.0 {
            return k1.value;
        }
        let t = (position - k0.position) / span;

        match k0.interpolation {
            Interpolation::None => k0.value,
            Interpolation::Linear => lerp(k0.value, k1.value, t),
            Interpolation::Smooth => lerp(k0.value, k1.value, t * t * (3.0 - 2.0 * t)),
            Interpolation::Spline => {
                let before = if lower > 0 {
                    self.keys[lower - 1].value
                } else {
                    k0.value
                };
                let after = self
                    .keys
                    .get(upper + 1)
                    .map_or(k1.value, |k| k.value);
                catmull_rom(before, k0.value, k1.value, after, t)
            }
        }
    }
}

impl CurveSampler for RampCurve {
    fn sample(&self, position: f64) -> f64 {
        self.evaluate(position)
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn catmull_rom(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * (2.0 * p1
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_default_curve_is_identity_on_unit_range() {
        let curve = RampCurve::default();
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            assert!((curve.evaluate(t) - t).abs() < EPSILON);
        }
    }

    #[test]
    fn test_clamps_outside_keys() {
        let curve = RampCurve::default();
        assert_eq!(curve.evaluate(-3.0), 0.0);
        assert_eq!(curve.evaluate(7.5), 1.0);
    }

    #[test]
    fn test_empty_curve_samples_zero() {
        let curve = RampCurve::new(Vec::new());
        assert_eq!(curve.evaluate(0.5), 0.0);
    }

    #[test]
    fn test_keys_sorted_on_construction() {
        let curve = RampCurve::new(vec![
            CurveKey::new(1.0, 2.0, Interpolation::Linear),
            CurveKey::new(0.0, 0.0, Interpolation::Linear),
        ]);
        assert_eq!(curve.keys()[0].position, 0.0);
        assert!((curve.evaluate(0.25) - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_step_interpolation_holds() {
        let curve = RampCurve::new(vec![
            CurveKey::new(0.0, 0.2, Interpolation::None),
            CurveKey::new(1.0, 0.9, Interpolation::None),
        ]);
        assert_eq!(curve.evaluate(0.99), 0.2);
        assert_eq!(curve.evaluate(1.0), 0.9);
    }

    #[test]
    fn test_smooth_interpolation() {
        let curve = RampCurve::new(vec![
            CurveKey::new(0.0, 0.0, Interpolation::Smooth),
            CurveKey::new(1.0, 1.0, Interpolation::Smooth),
        ]);
        assert!((curve.evaluate(0.5) - 0.5).abs() < EPSILON);
        // Eases in: below the straight line early on
        assert!(curve.evaluate(0.25) < 0.25);
    }

    #[test]
    fn test_spline_passes_through_keys() {
        let curve = RampCurve::new(vec![
            CurveKey::new(0.0, 0.0, Interpolation::Spline),
            CurveKey::new(0.5, 1.0, Interpolation::Spline),
            CurveKey::new(1.0, 0.0, Interpolation::Spline),
        ]);
        assert!((curve.evaluate(0.5) - 1.0).abs() < EPSILON);
        assert!(curve.evaluate(0.25) > 0.0);
    }

    #[test]
    fn test_swell_curve_peak() {
        let curve = RampCurve::swell();
        assert_eq!(curve.evaluate(0.0), 0.0);
        assert!((curve.evaluate(0.3) - 1.0).abs() < EPSILON);
        assert_eq!(curve.evaluate(1.0), 0.0);
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut curve = RampCurve::default();
        curve.insert(CurveKey::new(0.5, 0.0, Interpolation::Linear));
        let positions: Vec<f64> = curve.keys().iter().map(|k| k.position).collect();
        assert_eq!(positions, vec![0.0, 0.5, 1.0]);
        assert!((curve.evaluate(0.75) - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_insert_drops_non_finite_keys() {
        let mut curve = RampCurve::default();
        curve.insert(CurveKey::new(f64::NAN, 0.5, Interpolation::Linear));
        curve.insert(CurveKey::new(0.5, f64::INFINITY, Interpolation::Linear));
        assert_eq!(curve.keys(), RampCurve::default().keys());
    }

    #[test]
    fn test_closure_sampler() {
        let half = |t: f64| t * 0.5;
        assert_eq!(half.sample(4.0), 2.0);
    }
}
