use thiserror::Error;

/// Errors raised by the clustering and eigen pipelines.
///
/// Structural problems (shapes, cluster counts) stop an operation immediately.
/// Numerical non-convergence is reported through [`crate::Outcome`] instead and
/// only becomes an error through [`crate::Outcome::into_result`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("cannot compute the centroid of an empty group")]
    EmptyGroup,

    #[error("invalid cluster count {requested}: need 2 <= k <= {n_points}")]
    InvalidClusterCount { requested: usize, n_points: usize },

    #[error("no convergence after {iterations} iterations")]
    ConvergenceFailed { iterations: usize },

    #[error("input matrix has no points or no dimensions")]
    EmptyInput,
}

pub type Result<T> = std::result::Result<T, Error>;
