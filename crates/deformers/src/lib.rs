//! deformkit deformers - mesh deformation nodes
//!
//! This crate provides the deformers and the state they persist between
//! evaluations:
//! - [`follower`] - secondary-motion follower (lagging rest anchor)
//! - [`squash`] - edge-ratio squash/stretch and its ramp-modulated variant
//! - [`collide`] - collision snapping with ramp-shaped swelling
//! - [`ramp`] - ramp curves and the [`CurveSampler`] seam
//! - [`types`] - [`RestState`] and [`EdgeLengthCache`]
//! - [`node`] - host-facing node wrappers with dirty/clean bookkeeping
//!
//! Meshes come from the `geometry` crate and parameter defaults from
//! `deformkit-config`.

pub mod collide;
pub mod error;
pub mod follower;
pub mod node;
pub mod ramp;
pub mod squash;
pub mod types;

pub use collide::{collide, CollideParams, CollideResult, Contact};
pub use error::DeformError;
pub use follower::{follow_mesh, update, FollowerStep};
pub use node::{
    CollideInputs, CollideNode, DeformerNode, NodeStatus, SquashAndStretchNode,
    SquashAndStretchRampNode, SquashInputs, VerletInputs, VerletNode,
};
pub use ramp::{CurveKey, CurveSampler, Interpolation, RampCurve};
pub use squash::{squash_stretch, squash_stretch_ramp, SquashOutcome, SquashResult};
pub use types::{EdgeLengthCache, RestState};

pub use deformkit_config as config;
pub use geometry;
