//! Regula falsi with a pluggable reduction of the retained endpoint.
//!
//! Plain false position stalls when the function is convex over the
//! bracket: one endpoint freezes and convergence degrades to one-sided
//! linear. The classical fix deflates the cached function value of the
//! frozen endpoint whenever the new iterate lands on its opposite side.
//! Galdino catalogued twelve such reductions; the well-known Pegasus,
//! Illinois, and Anderson–Björck schemes are members 1, 8, and 12.

use crate::bracket::{bracket_tight, is_terminal, Normalized, SolverState};
use crate::error::Result;
use crate::float::Bracketable;
use crate::options::SolverOptions;

/// Reduction applied to the cached value of the retained endpoint.
///
/// The twelve numbered factors follow Galdino's survey; the named schemes
/// are exposed as associated constants forwarding to their numbers.
/// [`Reduction::ANDERSON_BJORCK`] is the default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reduction {
    Galdino1,
    Galdino2,
    Galdino3,
    Galdino4,
    Galdino5,
    Galdino6,
    Galdino7,
    Galdino8,
    Galdino9,
    Galdino10,
    Galdino11,
    Galdino12,
}

impl Reduction {
    /// Pegasus scheme (factor 1).
    pub const PEGASUS: Reduction = Reduction::Galdino1;
    /// Illinois scheme (factor 8).
    pub const ILLINOIS: Reduction = Reduction::Galdino8;
    /// Anderson–Björck scheme (factor 12).
    pub const ANDERSON_BJORCK: Reduction = Reduction::Galdino12;

    /// Replacement for `fa` after an iterate `(x, fx)` landed on the same
    /// side as `b`, given the cached pair `(fa, fb)`.
    fn apply<T: Bracketable>(self, fa: T, fb: T, fx: T) -> T {
        let one = T::one();
        let two = T::from(2.0).unwrap();
        let four = T::from(4.0).unwrap();
        let three_halves = T::from(1.5).unwrap();
        match self {
            Reduction::Galdino1 => fa * fb / (fb + fx),
            Reduction::Galdino2 => (fa - fb) / two,
            Reduction::Galdino3 => (fa - fx) / (two + fx / fb),
            Reduction::Galdino4 => (fa - fx) / (one + fx / fb).powi(2),
            Reduction::Galdino5 => (fa - fx) / (three_halves + fx / fb).powi(2),
            Reduction::Galdino6 => (fa - fx) / (two + fx / fb).powi(2),
            Reduction::Galdino7 => (fa + fx) / (two + fx / fb).powi(2),
            Reduction::Galdino8 => fa / two,
            Reduction::Galdino9 => fa / (one + fx / fb).powi(2),
            Reduction::Galdino10 => (fa - fx) / four,
            Reduction::Galdino11 => fx * fa / (fb + fx),
            Reduction::Galdino12 => {
                let m = one - fx / fb;
                if m > T::zero() {
                    fa * m
                } else {
                    fa / two
                }
            }
        }
    }
}

impl Default for Reduction {
    fn default() -> Self {
        Reduction::ANDERSON_BJORCK
    }
}

/// Finds a zero of `f` on the bracket `[a, b]` by regula falsi with the
/// chosen [`Reduction`].
///
/// An interpolation weight outside `(1e-10, 1 - 1e-10)` is replaced by
/// one half, so the iterate can never freeze against an endpoint.
///
/// # Errors
/// * [`NotABracket`](crate::SolverError::NotABracket) if `f(a)` and `f(b)`
///   have the same (nonzero) sign
/// * [`UnboundedBracket`](crate::SolverError::UnboundedBracket) if an
///   endpoint is non-finite after the inward adjustment of `±inf`
/// * [`BadTolerance`](crate::SolverError::BadTolerance) for negative
///   tolerances
/// * [`MaxIterations`](crate::SolverError::MaxIterations) if a cap is hit
pub fn false_position<T, F>(
    mut f: F,
    a: T,
    b: T,
    reduction: Reduction,
    options: &SolverOptions<T>,
) -> Result<T>
where
    T: Bracketable,
    F: FnMut(T) -> T,
{
    options.validate()?;
    let mut state = match SolverState::initialize(&mut f, a, b)? {
        Normalized::Immediate(x) => return Ok(x),
        Normalized::Running(state) => state,
    };
    let zero = T::zero();
    let one = T::one();
    let half = T::from(0.5).unwrap();
    let tau = T::from(1e-10).unwrap();

    // `b` holds the most recent iterate from here on; the pair is not kept
    // sorted.
    loop {
        let lambda = state.fb / (state.fb - state.fa);
        let lambda = if lambda.abs() > tau && lambda.abs() < one - tau {
            lambda
        } else {
            half
        };
        let x = state.b - lambda * (state.b - state.a);
        let fx = state.eval(&mut f, x);
        if is_terminal(fx) {
            state.finish("function value classifies the iterate as a zero");
            return Ok(x);
        }

        if fx.signum() * state.fb.signum() < zero {
            state.a = state.b;
            state.fa = state.fb;
        } else {
            state.fa = reduction.apply(state.fa, state.fb, fx);
        }
        state.b = x;
        state.fb = fx;
        state.steps += 1;
        state.trace("false_position", options);

        if options.ftol > zero && fx.abs() <= options.ftol {
            state.finish("residual within tolerance");
            return Ok(x);
        }
        if bracket_tight(state.a, state.b, state.fa, state.fb, options) {
            state.finish("bracket width within tolerance");
            return Ok(state.best_estimate());
        }
        if state.steps >= options.maxevals || state.over_budget(options) {
            return Err(state.max_iterations());
        }
    }
}
