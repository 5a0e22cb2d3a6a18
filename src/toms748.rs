//! The Alefeld–Potra–Shi enclosing method (TOMS Algorithm 748).
//!
//! Each outer iteration refines the bracket three times: a speculative
//! inverse-cubic (or Newton-quadratic) step, a second interpolation on the
//! refined bracket, and a guarded double-length secant step. If the three
//! refinements together fail to halve the bracket, a plain midpoint
//! rebracket is forced, so the worst case degrades to bisection speed while
//! the best case converges superlinearly.
//!
//! Candidate selection never evaluates the function; every refinement pays
//! exactly one evaluation, inside the rebracketing step. Degenerate
//! interpolation
//! (coincident function values, NaN candidates, candidates leaving the
//! bracket) is repaired locally by stepping down the ladder
//! cubic → quadratic → secant → midpoint.
//!
//! Reference: G. E. Alefeld, F. A. Potra, and Y. Shi, "Algorithm 748:
//! enclosing zeros of continuous functions", ACM TOMS 21(3), 1995.

use crate::bracket::{is_terminal, scaled_tolerance, Normalized, SolverState};
use crate::error::Result;
use crate::float::{midpoint, Bracketable};
use crate::options::SolverOptions;

/// Outcome of one bracket refinement.
enum Step<T> {
    /// The bracket narrowed; `d` is the endpoint that fell outside.
    Continue { d: T, fd: T },
    /// The refinement point classifies as the answer.
    Converged(T),
}

/// Finds a zero of `f` on the bracket `[a, b]` with Algorithm 748.
///
/// Compared to bisection this usually needs far fewer evaluations of `f`
/// for the same accuracy, which matters when `f` is expensive.
///
/// # Errors
/// * [`NotABracket`](crate::SolverError::NotABracket) if `f(a)` and `f(b)`
///   have the same (nonzero) sign
/// * [`UnboundedBracket`](crate::SolverError::UnboundedBracket) if an
///   endpoint is non-finite after the inward adjustment of `±inf`
/// * [`BadTolerance`](crate::SolverError::BadTolerance) for negative
///   tolerances
/// * [`MaxIterations`](crate::SolverError::MaxIterations) if a cap is hit
pub fn toms748<T, F>(mut f: F, a: T, b: T, options: &SolverOptions<T>) -> Result<T>
where
    T: Bracketable,
    F: FnMut(T) -> T,
{
    options.validate()?;
    let mut state = match SolverState::initialize(&mut f, a, b)? {
        Normalized::Immediate(x) => return Ok(x),
        Normalized::Running(state) => state,
    };
    let xtol = options.xtol;
    let two = T::from(2.0).unwrap();
    let half = T::from(0.5).unwrap();

    if state.b - state.a < two * scaled_tolerance(state.a, state.b, state.fa, state.fb, xtol) {
        state.finish("bracket already within tolerance");
        return Ok(state.best_estimate());
    }

    // A secant step seeds the third interpolation point.
    let c = secant_candidate(state.a, state.fa, state.b, state.fb);
    let (mut d, mut fd) = match rebracket(&mut f, &mut state, xtol, c) {
        Step::Converged(x) => return Ok(x),
        Step::Continue { d, fd } => (d, fd),
    };
    let (mut e, mut fe) = (d, fd);

    for n in 2..=options.maxevals {
        if state.over_budget(options) {
            return Err(state.max_iterations());
        }
        let width0 = state.b - state.a;

        // Speculative high-order refinement.
        let c = if n > 2 && distinct(state.fa, state.fb, fd, fe) {
            inverse_cubic_candidate(state.a, state.fa, state.b, state.fb, d, fd, e, fe)
        } else {
            quadratic_candidate(state.a, state.fa, state.b, state.fb, d, fd, 2)
        };
        let (e1, fe1) = (d, fd);
        let (d1, fd1) = match rebracket(&mut f, &mut state, xtol, c) {
            Step::Converged(x) => return Ok(x),
            Step::Continue { d, fd } => (d, fd),
        };

        // Second refinement on the narrowed bracket.
        let c = if distinct(state.fa, state.fb, fd1, fe1) {
            inverse_cubic_candidate(state.a, state.fa, state.b, state.fb, d1, fd1, e1, fe1)
        } else {
            quadratic_candidate(state.a, state.fa, state.b, state.fb, d1, fd1, 3)
        };
        let (d2, fd2) = match rebracket(&mut f, &mut state, xtol, c) {
            Step::Converged(x) => return Ok(x),
            Step::Continue { d, fd } => (d, fd),
        };

        // Double-length secant from the endpoint with the smaller residual,
        // limited to half the bracket width.
        let (u, fu) = if state.fa.abs() < state.fb.abs() {
            (state.a, state.fa)
        } else {
            (state.b, state.fb)
        };
        let mut c = u - two * fu * (state.b - state.a) / (state.fb - state.fa);
        if (c - u).abs() > half * (state.b - state.a) {
            c = midpoint(state.a, state.b);
        }
        let secant_point = c;
        let (d3, fd3) = match rebracket(&mut f, &mut state, xtol, c) {
            Step::Converged(x) => return Ok(x),
            Step::Continue { d, fd } => (d, fd),
        };

        if state.b - state.a < half * width0 {
            d = d3;
            fd = fd3;
            e = d2;
            fe = fd2;
        } else {
            // The interpolation phases did not halve the bracket; force a
            // midpoint rebracket.
            e = d3;
            fe = fd3;
            let m = midpoint(state.a, state.b);
            match rebracket(&mut f, &mut state, xtol, m) {
                Step::Converged(x) => return Ok(x),
                Step::Continue { d: d4, fd: fd4 } => {
                    d = d4;
                    fd = fd4;
                }
            }
        }

        if secant_point.next_float() * secant_point.prev_float() <= T::zero() {
            state.finish("estimate straddles zero at the bit level");
            return Ok(secant_point);
        }
        if state.a.next_float() >= state.b {
            state.finish("bracket is adjacent at the bit level");
            return Ok(state.a);
        }

        state.steps += 1;
        state.trace("toms748", options);
    }
    Err(state.max_iterations())
}

/// Narrows the bracket around `c` and checks the tolerance.
///
/// `c` is first pushed away from the endpoints by a safety margin of
/// `0.7 * scaled_tolerance` (falling back to the plain midpoint when the
/// bracket is within four margins of collapse), then evaluated once. A
/// terminal function value converges at `c`; a bracket tighter than twice
/// the scaled tolerance converges at the endpoint with the smaller
/// residual. Otherwise the endpoint that fell outside the new bracket is
/// returned as the next interpolation point `d`.
fn rebracket<T, F>(f: &mut F, state: &mut SolverState<T>, xtol: T, c: T) -> Step<T>
where
    T: Bracketable,
    F: FnMut(T) -> T,
{
    let (a, b, fa, fb) = (state.a, state.b, state.fa, state.fb);
    debug_assert!(a <= c && c <= b);
    let two = T::from(2.0).unwrap();
    let four = T::from(4.0).unwrap();
    let delta = T::from(0.7).unwrap() * scaled_tolerance(a, b, fa, fb, xtol);

    let c = if b - a <= four * delta {
        midpoint(a, b)
    } else if c <= a + two * delta {
        a + two * delta
    } else if c >= b - two * delta {
        b - two * delta
    } else {
        c
    };
    let fc = state.eval(f, c);
    if is_terminal(fc) {
        state.finish("function value classifies the refinement point as a zero");
        return Step::Converged(c);
    }

    let (d, fd);
    if fa.signum() * fc.signum() < T::zero() {
        state.b = c;
        state.fb = fc;
        d = b;
        fd = fb;
    } else {
        state.a = c;
        state.fa = fc;
        d = a;
        fd = fa;
    }
    if state.b - state.a < two * scaled_tolerance(state.a, state.b, state.fa, state.fb, xtol) {
        state.finish("bracket width within tolerance");
        return Step::Converged(state.best_estimate());
    }
    Step::Continue { d, fd }
}

/// Secant step, replaced by the midpoint when it lands on (or within
/// `5 * epsilon` of) an endpoint or is not a number.
fn secant_candidate<T: Bracketable>(a: T, fa: T, b: T, fb: T) -> T {
    let c = a - fa * (b - a) / (fb - fa);
    let guard = T::from(5.0).unwrap() * T::epsilon();
    if c.is_nan() || (c - a).abs() < guard * a.abs() || (b - c).abs() < guard * b.abs() {
        midpoint(a, b)
    } else {
        c
    }
}

/// Root of the quadratic through `(a, fa)`, `(b, fb)`, `(d, fd)`, located by
/// `k` Newton iterations on the interpolating polynomial. Falls back to the
/// secant step when the quadratic term vanishes or the iterate leaves the
/// bracket.
fn quadratic_candidate<T: Bracketable>(a: T, fa: T, b: T, fb: T, d: T, fd: T, k: usize) -> T {
    let slope = (fb - fa) / (b - a);
    let curve = ((fd - fb) / (d - b) - slope) / (d - a);
    if curve == T::zero() || !curve.is_finite() {
        return secant_candidate(a, fa, b, fb);
    }
    let two = T::from(2.0).unwrap();
    let mut r = if curve * fa > T::zero() { a } else { b };
    for _ in 0..k {
        let p = fa + (slope + curve * (r - b)) * (r - a);
        let dp = slope + curve * (two * r - a - b);
        r = r - p / dp;
    }
    if r.is_nan() || !(a < r && r < b) {
        secant_candidate(a, fa, b, fb)
    } else {
        r
    }
}

/// Value at zero of the inverse cubic interpolant through the four points,
/// by divided differences. Falls back to the quadratic candidate when the
/// result leaves the open bracket.
#[allow(clippy::too_many_arguments)]
fn inverse_cubic_candidate<T: Bracketable>(
    a: T,
    fa: T,
    b: T,
    fb: T,
    d: T,
    fd: T,
    e: T,
    fe: T,
) -> T {
    let q11 = (d - e) * fd / (fe - fd);
    let q21 = (b - d) * fb / (fd - fb);
    let q31 = (a - b) * fa / (fb - fa);
    let d21 = (b - d) * fd / (fd - fb);
    let d31 = (a - b) * fb / (fb - fa);
    let q22 = (d21 - q11) * fb / (fe - fb);
    let q32 = (d31 - q21) * fa / (fd - fa);
    let d32 = (d31 - q21) * fd / (fd - fa);
    let q33 = (d32 - q22) * fa / (fe - fa);
    let c = a + (q31 + q32 + q33);
    if a < c && c < b {
        c
    } else {
        quadratic_candidate(a, fa, b, fb, d, fd, 3)
    }
}

/// True when the four cached function values are pairwise separated by more
/// than 32 times the smallest positive normal, which keeps the divided
/// differences of the cubic away from division by zero.
fn distinct<T: Bracketable>(fa: T, fb: T, fd: T, fe: T) -> bool {
    let gap = T::from(32.0).unwrap() * T::min_positive_value();
    (fa - fb).abs() > gap
        && (fa - fd).abs() > gap
        && (fa - fe).abs() > gap
        && (fb - fd).abs() > gap
        && (fb - fe).abs() > gap
        && (fd - fe).abs() > gap
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use approx::assert_relative_eq;

    use super::*;
    use crate::error::SolverError;

    #[test]
    fn finds_the_zero_shared_by_exp_and_cos() {
        let root = toms748(
            |x: f64| x.exp() - x.cos(),
            -1.0,
            1.0,
            &SolverOptions::default(),
        )
        .unwrap();
        assert!(root.abs() < 1e-12, "root = {root}");
    }

    #[test]
    fn finds_the_zero_of_sine_near_pi() {
        let root = toms748(f64::sin, 3.0, 4.0, &SolverOptions::default()).unwrap();
        assert_relative_eq!(root, std::f64::consts::PI, epsilon = 1e-14);
    }

    #[test]
    fn finds_the_classic_cubic_root() {
        let root = toms748(
            |x: f64| x.powi(3) - 2.0 * x - 5.0,
            2.0,
            3.0,
            &SolverOptions::default(),
        )
        .unwrap();
        assert_relative_eq!(root, 2.0945514815423265, epsilon = 1e-14);
    }

    #[test]
    fn uses_fewer_evaluations_than_bisection() {
        let evals = Cell::new(0usize);
        let f = |x: f64| {
            evals.set(evals.get() + 1);
            x.sin()
        };
        toms748(f, 3.0, 4.0, &SolverOptions::default()).unwrap();
        assert!(evals.get() <= 20, "used {} evaluations", evals.get());
    }

    #[test]
    fn reports_a_pole_bracketed_by_a_sign_change() {
        let root = toms748(
            |x: f64| 1.0 / (x - 0.5),
            0.0,
            1.0,
            &SolverOptions::default(),
        )
        .unwrap();
        assert_eq!(root, 0.5);
    }

    #[test]
    fn steep_quintic_converges() {
        let root = toms748(
            |x: f64| x.powi(5) - x - 1.0,
            -2.0,
            2.0,
            &SolverOptions::default(),
        )
        .unwrap();
        assert_relative_eq!(root, 1.1673039782614187, epsilon = 1e-13);
    }

    #[test]
    fn same_sign_interval_is_rejected() {
        let result = toms748(|x: f64| x * x + 1.0, -1.0, 1.0, &SolverOptions::default());
        assert!(matches!(result, Err(SolverError::NotABracket { .. })));
    }

    #[test]
    fn evaluation_cap_surfaces_with_diagnostics() {
        let options = SolverOptions::default().with_maxfnevals(3);
        let result = toms748(f64::sin, 3.0, 4.0, &options);
        assert!(matches!(result, Err(SolverError::MaxIterations { .. })));
    }

    #[test]
    fn single_precision_brackets_converge_too() {
        let root = toms748(
            |x: f32| x * x - 2.0,
            0.0f32,
            2.0f32,
            &SolverOptions::default(),
        )
        .unwrap();
        assert_relative_eq!(root, std::f32::consts::SQRT_2, epsilon = 1e-6);
    }

    #[test]
    fn quadratic_candidate_stays_inside_the_bracket() {
        let f = |x: f64| x * x - 2.0;
        let (a, b, d) = (1.0, 2.0, 0.0);
        let c = quadratic_candidate(a, f(a), b, f(b), d, f(d), 2);
        assert!(a < c && c < b);
        assert_relative_eq!(c, std::f64::consts::SQRT_2, epsilon = 1e-2);
    }

    #[test]
    fn degenerate_quadratic_falls_back_to_secant() {
        // Collinear samples have no quadratic term.
        let line = |x: f64| 2.0 * x - 1.0;
        let c = quadratic_candidate(0.0, line(0.0), 1.0, line(1.0), 2.0, line(2.0), 2);
        assert_relative_eq!(c, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn coincident_values_are_not_distinct() {
        assert!(!distinct(1.0f64, 1.0, 2.0, 3.0));
        assert!(distinct(1.0f64, 2.0, 3.0, 4.0));
    }
}
