//! Bitwise bisection for binary floats.
//!
//! The midpoint of each step comes from [`Bracketable::middle`], which for
//! `f32`/`f64` averages the integer bit patterns of the endpoints. The
//! bracket therefore collapses to a bit-adjacent pair in at most about as
//! many steps as the representation has bits, independent of how wildly the
//! endpoint magnitudes differ.

use crate::bracket::{is_terminal, Normalized, SolverState};
use crate::error::Result;
use crate::float::{midpoint, Bracketable};
use crate::options::SolverOptions;
use crate::toms748::toms748;

/// Finds a zero of `f` on the bracket `[a, b]` by bitwise bisection.
///
/// Scalars without a fixed binary layout (`Bracketable::BITWISE == false`)
/// have no meaningful bit midpoint, so the call transparently delegates to
/// the Alefeld–Potra–Shi solver.
///
/// With zero width tolerances (the default) the loop runs until the bracket
/// is adjacent at the bit level; nonzero `xtol`/`xreltol` stop earlier at
/// `max(xtol, xreltol * |midpoint|)`.
///
/// # Errors
/// * [`NotABracket`](crate::SolverError::NotABracket) if `f(a)` and `f(b)`
///   have the same (nonzero) sign
/// * [`UnboundedBracket`](crate::SolverError::UnboundedBracket) if an
///   endpoint is non-finite after the inward adjustment of `±inf`
/// * [`BadTolerance`](crate::SolverError::BadTolerance) for negative
///   tolerances
/// * [`MaxIterations`](crate::SolverError::MaxIterations) if a cap is hit
pub fn bisection<T, F>(mut f: F, a: T, b: T, options: &SolverOptions<T>) -> Result<T>
where
    T: Bracketable,
    F: FnMut(T) -> T,
{
    if !T::BITWISE {
        return toms748(f, a, b, options);
    }
    options.validate()?;
    let mut state = match SolverState::initialize(&mut f, a, b)? {
        Normalized::Immediate(x) => return Ok(x),
        Normalized::Running(state) => state,
    };
    let zero = T::zero();

    loop {
        let m = state.a.middle(state.b);
        if !(state.a < m && m < state.b) {
            state.finish("bracket is adjacent at the bit level");
            return Ok(m);
        }
        let fm = state.eval(&mut f, m);
        if is_terminal(fm) {
            state.finish("function value classifies the midpoint as a zero");
            return Ok(m);
        }
        if state.fa.signum() * fm.signum() < zero {
            state.b = m;
            state.fb = fm;
        } else {
            state.a = m;
            state.fa = fm;
        }
        state.steps += 1;
        state.trace("bisection", options);

        if options.xtol > zero || options.xreltol > zero {
            let estimate = midpoint(state.a, state.b);
            if state.b - state.a <= options.xtol.max(options.xreltol * estimate.abs()) {
                state.finish("bracket width within the requested tolerance");
                return Ok(estimate);
            }
        }
        if state.steps >= options.maxevals || state.over_budget(options) {
            return Err(state.max_iterations());
        }
    }
}
