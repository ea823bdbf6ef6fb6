//! Secondary-motion follower.
//!
//! A rest anchor trails a driver position through two exponential smoothing
//! stages: the anchor closes `follow` of the gap each step, and the velocity
//! approaches that catch-up delta at rate `restore`. The resulting anchor is
//! applied to the whole mesh as a uniform translation.

use deformkit_config::FollowerConfig;
use geometry::EdgeMesh;
use glam::DVec3;
use tracing::{debug, trace};

use crate::types::RestState;

/// Inputs for one follower step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowerStep {
    /// Point being followed
    pub driver_position: DVec3,
    /// Fraction of the driver gap closed per step
    pub follow: f64,
    /// Velocity smoothing gain
    pub restore: f64,
    /// Current time; equal to `reset_time` zeroes the state first
    pub time: f64,
    pub reset_time: f64,
}

impl FollowerStep {
    pub fn new(driver_position: DVec3, time: f64, config: &FollowerConfig) -> Self {
        Self {
            driver_position,
            follow: config.follow,
            restore: config.restore,
            time,
            reset_time: config.reset_time,
        }
    }

    pub fn is_reset(&self) -> bool {
        self.time == self.reset_time
    }
}

/// Advance the follower by one step.
///
/// Returns the next state and the offset to apply to the mesh. The offset is
/// the pre-step anchor plus the new velocity, and becomes the next anchor.
pub fn update(state: RestState, step: &FollowerStep) -> (RestState, DVec3) {
    let state = if step.is_reset() {
        RestState::default()
    } else {
        state
    };

    let delta = (step.driver_position - state.position_rest) * step.follow;
    let velocity = state.velocity_rest + (delta - state.velocity_rest) * step.restore;
    let offset = state.position_rest + velocity;

    let next = RestState {
        position_rest: offset,
        velocity_rest: velocity,
    };
    (next, offset)
}

impl RestState {
    /// Advance in place; see [`update`].
    pub fn advance(&mut self, step: &FollowerStep) -> DVec3 {
        if step.is_reset() {
            debug!("follower reset at time {}", step.time);
        }
        let (next, offset) = update(*self, step);
        trace!(
            "follower step: driver={:?} offset={:?} velocity={:?}",
            step.driver_position,
            offset,
            next.velocity_rest
        );
        *self = next;
        offset
    }
}

/// Copy of `original` with every vertex translated by `offset`.
pub fn follow_mesh(original: &EdgeMesh, offset: DVec3) -> EdgeMesh {
    let mut output = original.clone_for_output();
    output.translate_all(offset);
    output
}
