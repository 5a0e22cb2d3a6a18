use thiserror::Error;

/// Unified error type for `enclose` operations.
#[derive(Debug, Clone, Error)]
pub enum SolverError {
    /// Raised when the function does not change sign over the supplied interval.
    #[error("no sign change over [{a}, {b}]: f(a) = {fa}, f(b) = {fb}")]
    NotABracket {
        /// Left endpoint after normalization.
        a: f64,
        /// Right endpoint after normalization.
        b: f64,
        /// Function value at `a`.
        fa: f64,
        /// Function value at `b`.
        fb: f64,
    },

    /// Raised when an endpoint is still non-finite after the one-step inward
    /// adjustment of infinite bounds.
    #[error("bracket endpoints must be finite numbers, got [{a}, {b}]")]
    UnboundedBracket { a: f64, b: f64 },

    /// Raised when a tolerance option is negative.
    #[error("tolerance `{name}` must be non-negative, got {value}")]
    BadTolerance { name: &'static str, value: f64 },

    /// Raised when the iteration or function-evaluation cap is hit before the
    /// bracket is tight enough. The best estimate seen so far is retained.
    #[error(
        "no convergence after {steps} steps and {fnevals} function evaluations; \
         best estimate {best} with bracket width {width}"
    )]
    MaxIterations {
        /// Iterations performed before giving up.
        steps: usize,
        /// Function evaluations performed before giving up.
        fnevals: usize,
        /// Endpoint of the final bracket with the smaller |f|.
        best: f64,
        /// Width of the final bracket.
        width: f64,
    },
}

impl SolverError {
    /// Helper to raise a negative-tolerance error from option validation.
    pub fn bad_tolerance(name: &'static str, value: f64) -> Self {
        Self::BadTolerance { name, value }
    }
}

/// Type alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, SolverError>;
