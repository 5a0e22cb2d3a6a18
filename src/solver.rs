//! Method selection for bracketed root finding.

use crate::bisection::bisection;
use crate::error::Result;
use crate::false_position::{false_position, Reduction};
use crate::float::Bracketable;
use crate::options::SolverOptions;
use crate::toms748::toms748;

/// A bracketing solver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    /// Bitwise bisection; robust, bounded by the bits of the representation.
    Bisection,
    /// Alefeld–Potra–Shi Algorithm 748; usually the fewest evaluations.
    Toms748,
    /// Regula falsi with the given endpoint reduction.
    FalsePosition(Reduction),
}

impl Default for Method {
    fn default() -> Self {
        Method::Toms748
    }
}

/// Finds a zero of `f` on the bracket `[a, b]` with the chosen method.
///
/// The interval may be given in either order; infinite endpoints are moved
/// one representable step inward. A function value of exactly zero, `±inf`,
/// or NaN anywhere the solver evaluates is reported as the root at that
/// point.
///
/// # Examples
///
/// ```
/// use enclose::{find_zero_bracket, Method, SolverOptions};
///
/// let root = find_zero_bracket(
///     |x: f64| x * x - 2.0,
///     0.0,
///     2.0,
///     Method::default(),
///     &SolverOptions::default(),
/// )
/// .unwrap();
/// assert!((root - std::f64::consts::SQRT_2).abs() < 1e-14);
/// ```
///
/// # Errors
/// * [`NotABracket`](crate::SolverError::NotABracket) if `f(a)` and `f(b)`
///   have the same (nonzero) sign
/// * [`UnboundedBracket`](crate::SolverError::UnboundedBracket) if an
///   endpoint is non-finite after the inward adjustment of `±inf`
/// * [`BadTolerance`](crate::SolverError::BadTolerance) for negative
///   tolerances
/// * [`MaxIterations`](crate::SolverError::MaxIterations) if a cap is hit
pub fn find_zero_bracket<T, F>(
    f: F,
    a: T,
    b: T,
    method: Method,
    options: &SolverOptions<T>,
) -> Result<T>
where
    T: Bracketable,
    F: FnMut(T) -> T,
{
    match method {
        Method::Bisection => bisection(f, a, b, options),
        Method::Toms748 => toms748(f, a, b, options),
        Method::FalsePosition(reduction) => false_position(f, a, b, reduction, options),
    }
}
