//! Numeric options shared by the bracketing solvers.

use crate::error::{Result, SolverError};
use crate::float::{as_f64, Bracketable};

/// Tolerances, iteration caps, and tracing for a single solver call.
///
/// The zero defaults for the bracket-width tolerances mean "tightest
/// representable": bisection then runs until the bracket is adjacent at the
/// bit level, and the other solvers stop on the epsilon-scaled threshold of
/// the current bracket.
#[derive(Clone, Copy, Debug)]
pub struct SolverOptions<T> {
    /// Absolute bracket-width tolerance. Zero requests the tightest
    /// representable bracket.
    pub xtol: T,
    /// Relative bracket-width tolerance, applied against the magnitude of
    /// the current estimate.
    pub xreltol: T,
    /// Absolute residual tolerance on `|f(x)|`. Zero accepts only an exact
    /// zero (or a non-finite value) of `f`.
    pub ftol: T,
    /// Iteration cap.
    pub maxevals: usize,
    /// Optional cap on function evaluations, for expensive functions.
    pub maxfnevals: Option<usize>,
    /// Emit one `log::trace!` line per iteration.
    pub verbose: bool,
}

impl<T: Bracketable> Default for SolverOptions<T> {
    fn default() -> Self {
        Self {
            xtol: T::zero(),
            xreltol: T::zero(),
            ftol: T::zero(),
            maxevals: 100,
            maxfnevals: None,
            verbose: false,
        }
    }
}

impl<T: Bracketable> SolverOptions<T> {
    /// Override the absolute bracket-width tolerance.
    pub fn with_xtol(mut self, xtol: T) -> Self {
        self.xtol = xtol;
        self
    }

    /// Override the relative bracket-width tolerance.
    pub fn with_xreltol(mut self, xreltol: T) -> Self {
        self.xreltol = xreltol;
        self
    }

    /// Override the absolute residual tolerance.
    pub fn with_ftol(mut self, ftol: T) -> Self {
        self.ftol = ftol;
        self
    }

    /// Override the iteration cap.
    pub fn with_maxevals(mut self, maxevals: usize) -> Self {
        self.maxevals = maxevals.max(1);
        self
    }

    /// Cap the number of function evaluations.
    pub fn with_maxfnevals(mut self, maxfnevals: usize) -> Self {
        self.maxfnevals = Some(maxfnevals);
        self
    }

    /// Enable or disable per-iteration tracing.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Rejects negative tolerances before a solver starts iterating.
    pub fn validate(&self) -> Result<()> {
        let zero = T::zero();
        if self.xtol < zero {
            return Err(SolverError::bad_tolerance("xtol", as_f64(self.xtol)));
        }
        if self.xreltol < zero {
            return Err(SolverError::bad_tolerance("xreltol", as_f64(self.xreltol)));
        }
        if self.ftol < zero {
            return Err(SolverError::bad_tolerance("ftol", as_f64(self.ftol)));
        }
        Ok(())
    }
}
