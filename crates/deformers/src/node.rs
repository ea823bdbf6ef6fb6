//! Host-facing node wrappers.
//!
//! Each node owns the persistent state of one deformer instance and turns
//! host inputs into an output mesh. Evaluation is pull based: the host calls
//! [`DeformerNode::compute`] when it considers the output dirty, and the node
//! reports itself clean once the output is written. `compute` takes
//! `&mut self`, so a single instance is never evaluated concurrently.

use deformkit_config::{CollideConfig, DeformerConfig, FollowerConfig, SquashConfig};
use geometry::{EdgeMesh, SurfaceQuery};
use glam::DVec3;
use tracing::{debug, warn};

use crate::collide::{collide, CollideParams};
use crate::error::{ensure_finite, DeformError};
use crate::follower::{follow_mesh, FollowerStep};
use crate::ramp::{CurveSampler, RampCurve};
use crate::squash::{squash_stretch, squash_stretch_ramp, SquashOutcome, SquashResult};
use crate::types::{EdgeLengthCache, RestState};

/// Dirty/clean bookkeeping shared by all nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeStatus {
    evaluations: u64,
    clean: bool,
}

impl NodeStatus {
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    pub fn is_clean(&self) -> bool {
        self.clean
    }

    fn mark_dirty(&mut self) {
        self.clean = false;
    }

    fn mark_clean(&mut self) {
        self.evaluations += 1;
        self.clean = true;
    }
}

/// A deformer instance driven by a host.
pub trait DeformerNode {
    /// Everything the host supplies for one evaluation
    type Inputs<'a>;

    /// Host-facing node type name.
    fn name(&self) -> &'static str;

    /// Evaluate the node and produce the output mesh.
    ///
    /// On error the node's persistent state is unchanged and it stays dirty.
    fn compute(&mut self, inputs: Self::Inputs<'_>) -> Result<EdgeMesh, DeformError>;

    fn status(&self) -> &NodeStatus;

    fn status_mut(&mut self) -> &mut NodeStatus;

    fn is_clean(&self) -> bool {
        self.status().is_clean()
    }

    /// Number of successful evaluations.
    fn evaluations(&self) -> u64 {
        self.status().evaluations()
    }

    /// Called by the host when an input changed.
    fn mark_dirty(&mut self) {
        self.status_mut().mark_dirty();
    }
}

fn ensure_finite_vec(name: &'static str, value: DVec3) -> Result<(), DeformError> {
    for component in value.to_array() {
        ensure_finite(name, component)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Verlet follower
// ---------------------------------------------------------------------------

/// Inputs of [`VerletNode`].
#[derive(Debug, Clone, Copy)]
pub struct VerletInputs<'a> {
    pub original: &'a EdgeMesh,
    pub driver_position: DVec3,
    pub time: f64,
}

/// Secondary-motion follower node.
#[derive(Debug, Clone, Default)]
pub struct VerletNode {
    state: RestState,
    config: FollowerConfig,
    status: NodeStatus,
}

impl VerletNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &DeformerConfig) -> Result<Self, DeformError> {
        config.validate()?;
        Ok(Self {
            config: config.follower,
            ..Self::default()
        })
    }

    pub fn state(&self) -> RestState {
        self.state
    }

    /// Restore state persisted by the host.
    pub fn set_state(&mut self, state: RestState) {
        self.state = state;
        self.status.mark_dirty();
    }

    pub fn config(&self) -> &FollowerConfig {
        &self.config
    }

    pub fn set_gains(&mut self, follow: f64, restore: f64) -> Result<(), DeformError> {
        ensure_finite("follow", follow)?;
        ensure_finite("restore", restore)?;
        self.config.follow = follow;
        self.config.restore = restore;
        self.status.mark_dirty();
        Ok(())
    }
}

impl DeformerNode for VerletNode {
    type Inputs<'a> = VerletInputs<'a>;

    fn name(&self) -> &'static str {
        "Verlet"
    }

    fn compute(&mut self, inputs: VerletInputs<'_>) -> Result<EdgeMesh, DeformError> {
        ensure_finite_vec("driver_position", inputs.driver_position)?;
        ensure_finite("time", inputs.time)?;

        let step = FollowerStep::new(inputs.driver_position, inputs.time, &self.config);
        let offset = self.state.advance(&step);
        let output = follow_mesh(inputs.original, offset);

        self.status.mark_clean();
        Ok(output)
    }

    fn status(&self) -> &NodeStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut NodeStatus {
        &mut self.status
    }
}

// ---------------------------------------------------------------------------
// Squash and stretch
// ---------------------------------------------------------------------------

/// Inputs of the squash/stretch nodes.
#[derive(Debug, Clone, Copy)]
pub struct SquashInputs<'a> {
    /// Rest mesh
    pub original: &'a EdgeMesh,
    /// Deformed mesh with the same topology
    pub target: &'a EdgeMesh,
}

fn finish_squash(
    status: &mut NodeStatus,
    name: &str,
    result: SquashResult,
) -> (EdgeMesh, SquashOutcome) {
    if result.is_passthrough() {
        warn!("{name}: topology differs from rest mesh, output is the unmodified target");
    }
    status.mark_clean();
    (result.mesh, result.outcome)
}

/// Edge-ratio squash/stretch node.
#[derive(Debug, Clone, Default)]
pub struct SquashAndStretchNode {
    cache: EdgeLengthCache,
    last_outcome: Option<SquashOutcome>,
    status: NodeStatus,
}

impl SquashAndStretchNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache(&self) -> &EdgeLengthCache {
        &self.cache
    }

    /// Outcome of the most recent successful evaluation.
    pub fn last_outcome(&self) -> Option<SquashOutcome> {
        self.last_outcome
    }
}

impl DeformerNode for SquashAndStretchNode {
    type Inputs<'a> = SquashInputs<'a>;

    fn name(&self) -> &'static str {
        "SquashAndStretch"
    }

    fn compute(&mut self, inputs: SquashInputs<'_>) -> Result<EdgeMesh, DeformError> {
        let result = squash_stretch(inputs.original, inputs.target, &mut self.cache);
        let (mesh, outcome) = finish_squash(&mut self.status, "SquashAndStretch", result);
        self.last_outcome = Some(outcome);
        Ok(mesh)
    }

    fn status(&self) -> &NodeStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut NodeStatus {
        &mut self.status
    }
}

/// Ramp-modulated squash/stretch node.
///
/// Generic over the curve so hosts can plug in their own ramp evaluation;
/// defaults to [`RampCurve`] initialised to the linear (0,0)-(1,1) ramp.
#[derive(Debug, Clone, Default)]
pub struct SquashAndStretchRampNode<C = RampCurve> {
    cache: EdgeLengthCache,
    config: SquashConfig,
    curve: C,
    last_outcome: Option<SquashOutcome>,
    status: NodeStatus,
}

impl SquashAndStretchRampNode<RampCurve> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &DeformerConfig) -> Result<Self, DeformError> {
        config.validate()?;
        Ok(Self {
            config: config.squash,
            ..Self::default()
        })
    }
}

impl<C: CurveSampler> SquashAndStretchRampNode<C> {
    pub fn with_curve(curve: C) -> Self {
        Self {
            cache: EdgeLengthCache::new(),
            config: SquashConfig::default(),
            curve,
            last_outcome: None,
            status: NodeStatus::default(),
        }
    }

    pub fn curve(&self) -> &C {
        &self.curve
    }

    pub fn curve_mut(&mut self) -> &mut C {
        self.status.mark_dirty();
        &mut self.curve
    }

    pub fn scale(&self) -> f64 {
        self.config.scale
    }

    /// Set the height scale. Zero is accepted and leaves stretched vertices
    /// unmodulated.
    pub fn set_scale(&mut self, scale: f64) -> Result<(), DeformError> {
        ensure_finite("scale", scale)?;
        self.config.scale = scale;
        self.status.mark_dirty();
        Ok(())
    }

    pub fn last_outcome(&self) -> Option<SquashOutcome> {
        self.last_outcome
    }
}

impl<C: CurveSampler> DeformerNode for SquashAndStretchRampNode<C> {
    type Inputs<'a> = SquashInputs<'a>;

    fn name(&self) -> &'static str {
        "SquashAndStretchRamp"
    }

    fn compute(&mut self, inputs: SquashInputs<'_>) -> Result<EdgeMesh, DeformError> {
        let result = squash_stretch_ramp(
            inputs.original,
            inputs.target,
            &mut self.cache,
            self.config.scale,
            &self.curve,
        );
        let (mesh, outcome) = finish_squash(&mut self.status, "SquashAndStretchRamp", result);
        self.last_outcome = Some(outcome);
        Ok(mesh)
    }

    fn status(&self) -> &NodeStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut NodeStatus {
        &mut self.status
    }
}

// ---------------------------------------------------------------------------
// Collision
// ---------------------------------------------------------------------------

/// Inputs of [`CollideNode`]. Either mesh may be unconnected.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollideInputs<'a> {
    pub original: Option<&'a EdgeMesh>,
    pub collider: Option<&'a EdgeMesh>,
    pub offset: DVec3,
}

/// Collision node with swelling.
#[derive(Debug, Clone)]
pub struct CollideNode {
    config: CollideConfig,
    curve: RampCurve,
    status: NodeStatus,
}

impl Default for CollideNode {
    fn default() -> Self {
        Self {
            config: CollideConfig::default(),
            curve: RampCurve::swell(),
            status: NodeStatus::default(),
        }
    }
}

impl CollideNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &DeformerConfig) -> Result<Self, DeformError> {
        config.validate()?;
        Ok(Self {
            config: config.collide,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &CollideConfig {
        &self.config
    }

    pub fn set_swell(&mut self, length: f64, value: f64) -> Result<(), DeformError> {
        ensure_finite("swell_length", length)?;
        ensure_finite("swell_value", value)?;
        self.config.swell_length = length;
        self.config.swell_value = value;
        self.status.mark_dirty();
        Ok(())
    }

    pub fn curve(&self) -> &RampCurve {
        &self.curve
    }

    pub fn curve_mut(&mut self) -> &mut RampCurve {
        self.status.mark_dirty();
        &mut self.curve
    }
}

impl DeformerNode for CollideNode {
    type Inputs<'a> = CollideInputs<'a>;

    fn name(&self) -> &'static str {
        "CollideDeform"
    }

    fn compute(&mut self, inputs: CollideInputs<'_>) -> Result<EdgeMesh, DeformError> {
        let original = inputs.original.ok_or(DeformError::MissingInput("original"))?;
        let collider = inputs.collider.ok_or(DeformError::MissingInput("collider"))?;
        ensure_finite_vec("offset", inputs.offset)?;

        let query = SurfaceQuery::new(collider);
        let params = CollideParams::new(inputs.offset, &self.config);
        let result = collide(original, &query, &params, &self.curve);
        debug!(
            "{}: evaluation {} done",
            self.name(),
            self.status.evaluations() + 1
        );

        self.status.mark_clean();
        Ok(result.mesh)
    }

    fn status(&self) -> &NodeStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut NodeStatus {
        &mut self.status
    }
}
