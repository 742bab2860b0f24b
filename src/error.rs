use thiserror::Error;

/// Top-level error type for the line-segment pipeline.
///
/// The triangulators are the only fallible public operations: geometric
/// degeneracy is a rejection, not an exception. Everything else in the
/// pipeline is a pure total function.
#[derive(Debug, Error)]
pub enum LineError {
    #[error("left line is near-vertical: |x12 - x11| = {0:.3e}")]
    NearVertical(f64),

    #[error("left line is near-horizontal (within ~5 degrees of the epipolar line)")]
    NearHorizontal,

    #[error("right-projected line is near-vertical: |x22_left - x21_left| = {0:.3e}")]
    ProjectedNearVertical(f64),

    #[error("stereo disparity {disparity:.3} outside valid range [{min:.3}, {max:.3}]")]
    DisparityOutOfRange { disparity: f64, min: f64, max: f64 },

    #[error("planes too parallel: |cos(angle)| = {0:.4} exceeds 0.9848 (~10 degrees)")]
    PlanesTooParallel(f64),

    #[error("endpoints too close together: distance = {0:.3e}")]
    ZeroLengthEndpoints(f64),

    #[error("anchor direction is degenerate along the dominant axis")]
    ZeroLengthAnchor,

    #[error("plane normal is degenerate: |n| = {0:.3e}")]
    DegenerateNormal(f64),

    #[error("invalid detector configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience type alias for results using [`LineError`].
pub type Result<T> = std::result::Result<T, LineError>;
