//! Error types for deformer evaluation.

use deformkit_config::ConfigError;

/// Errors that abort a node evaluation.
///
/// A failed evaluation leaves node state untouched; the host keeps showing
/// the previous output until the next successful `compute`. Topology
/// mismatches and degenerate vertices are not errors, they are reported as
/// outcomes of a successful evaluation.
#[derive(Debug, thiserror::Error)]
pub enum DeformError {
    #[error("Parameter {name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("Missing input mesh: {0}")]
    MissingInput(&'static str),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Reject NaN and infinite parameters before they reach persistent state.
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> Result<(), DeformError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(DeformError::NonFinite { name, value })
    }
}
