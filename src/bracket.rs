//! Bracket normalization and the shared iteration state.
//!
//! Every solver starts from the same normalized picture: an ordered pair of
//! finite endpoints whose function values have opposite signs, with both
//! values cached. Endpoint values of exactly zero, `±inf`, or NaN are treated
//! as the answer at that endpoint rather than as errors, which is what lets
//! the solvers report poles of `1/g` bracketed by a sign change.

use crate::error::{Result, SolverError};
use crate::float::{as_f64, midpoint, Bracketable};
use crate::options::SolverOptions;

/// Iteration state shared by all bracketing solvers.
///
/// Between iterations the invariants hold: `fa` and `fb` are the cached
/// values of `f` at `a` and `b`, their signs oppose, and the counters only
/// grow.
#[derive(Clone, Debug)]
pub struct SolverState<T> {
    /// Left endpoint of the current bracket.
    pub a: T,
    /// Right endpoint of the current bracket.
    pub b: T,
    /// Cached function value at `a`.
    pub fa: T,
    /// Cached function value at `b`.
    pub fb: T,
    /// Iterations performed.
    pub steps: usize,
    /// Function evaluations performed.
    pub fnevals: usize,
    /// Whether the solver classified the bracket as converged.
    pub converged: bool,
    /// Whether the solver stopped without convergence.
    pub stopped: bool,
    /// Human-readable termination diagnostic.
    pub message: String,
}

/// Outcome of normalizing an input pair.
pub(crate) enum Normalized<T> {
    /// A valid bracket to iterate on.
    Running(SolverState<T>),
    /// An endpoint already classifies as a root.
    Immediate(T),
}

impl<T: Bracketable> SolverState<T> {
    /// Normalizes `(u, v)` into a validated bracket, evaluating `f` at the
    /// endpoints.
    ///
    /// Infinite endpoints are moved one representable step inward first. The
    /// function is evaluated at most twice; a same-sign pair fails with
    /// [`SolverError::NotABracket`] without further evaluations.
    pub(crate) fn initialize<F>(f: &mut F, u: T, v: T) -> Result<Normalized<T>>
    where
        F: FnMut(T) -> T,
    {
        let (mut a, mut b) = if u <= v { (u, v) } else { (v, u) };
        if a == T::neg_infinity() {
            a = a.next_float();
        }
        if b == T::infinity() {
            b = b.prev_float();
        }
        if !a.is_finite() || !b.is_finite() {
            return Err(SolverError::UnboundedBracket {
                a: as_f64(a),
                b: as_f64(b),
            });
        }

        let mut state = SolverState {
            a,
            b,
            fa: T::zero(),
            fb: T::zero(),
            steps: 0,
            fnevals: 0,
            converged: false,
            stopped: false,
            message: String::new(),
        };
        state.fa = state.eval(f, a);
        if is_terminal(state.fa) {
            return Ok(Normalized::Immediate(a));
        }
        state.fb = state.eval(f, b);
        if is_terminal(state.fb) {
            return Ok(Normalized::Immediate(b));
        }
        if state.fa.signum() * state.fb.signum() > T::zero() {
            return Err(SolverError::NotABracket {
                a: as_f64(a),
                b: as_f64(b),
                fa: as_f64(state.fa),
                fb: as_f64(state.fb),
            });
        }
        Ok(Normalized::Running(state))
    }

    /// Evaluates `f` at `x`, counting the evaluation.
    pub(crate) fn eval<F>(&mut self, f: &mut F, x: T) -> T
    where
        F: FnMut(T) -> T,
    {
        self.fnevals += 1;
        f(x)
    }

    /// The endpoint whose cached function value is smaller in magnitude.
    pub(crate) fn best_estimate(&self) -> T {
        if self.fa.abs() <= self.fb.abs() {
            self.a
        } else {
            self.b
        }
    }

    /// Records convergence with a diagnostic.
    pub(crate) fn finish(&mut self, message: &str) {
        self.converged = true;
        self.message = message.to_string();
    }

    /// True once the optional function-evaluation cap is spent.
    pub(crate) fn over_budget(&self, options: &SolverOptions<T>) -> bool {
        options.maxfnevals.is_some_and(|cap| self.fnevals >= cap)
    }

    /// Builds the cap-exceeded error, preserving the best estimate seen.
    pub(crate) fn max_iterations(&mut self) -> SolverError {
        self.stopped = true;
        self.message = "maximum number of iterations reached".to_string();
        SolverError::MaxIterations {
            steps: self.steps,
            fnevals: self.fnevals,
            best: as_f64(self.best_estimate()),
            width: as_f64((self.b - self.a).abs()),
        }
    }

    /// Emits one trace line for verbose consumers.
    pub(crate) fn trace(&self, method: &str, options: &SolverOptions<T>) {
        if options.verbose {
            log::trace!(
                "{method} step {}: bracket [{}, {}], f = ({}, {}), {} evaluations",
                self.steps,
                self.a,
                self.b,
                self.fa,
                self.fb,
                self.fnevals,
            );
        }
    }
}

/// A function value that ends the search at its argument: an exact zero, or
/// a pole/ill-defined point reported as `±inf`/NaN.
pub(crate) fn is_terminal<T: Bracketable>(fx: T) -> bool {
    fx == T::zero() || !fx.is_finite()
}

/// Scaled termination threshold for the bracket `(a, b)` with cached values
/// `(fa, fb)`: twice the magnitude of the better endpoint in units of
/// epsilon, plus the user's absolute tolerance.
pub(crate) fn scaled_tolerance<T: Bracketable>(a: T, b: T, fa: T, fb: T, tol: T) -> T {
    let two = T::from(2.0).unwrap();
    let u = if fa.abs() < fb.abs() { a.abs() } else { b.abs() };
    two * u * T::epsilon() + tol
}

/// Shared classification of a bracket as tight enough to stop.
///
/// Order-insensitive in `(a, b)` so the false-position solver can keep its
/// most-recent-iterate-last pair.
pub(crate) fn bracket_tight<T: Bracketable>(a: T, b: T, fa: T, fb: T, options: &SolverOptions<T>) -> bool {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let width = hi - lo;
    let zero = T::zero();
    if (options.xtol > zero || options.xreltol > zero)
        && width <= options.xtol.max(options.xreltol * midpoint(lo, hi).abs())
    {
        return true;
    }
    let two = T::from(2.0).unwrap();
    if width < two * scaled_tolerance(a, b, fa, fb, options.xtol) {
        return true;
    }
    lo.next_float() >= hi
}
