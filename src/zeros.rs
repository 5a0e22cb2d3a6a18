//! Heuristic search for all zeros of a function on an interval.
//!
//! The interval is split at randomly placed sample points; each adjacent
//! pair that brackets a sign change is handed to bitwise bisection. The
//! randomization spreads the grid so it cannot resonate with periodic
//! zeros. Sub-intervals without a sign change may optionally be probed by a
//! caller-supplied open solver whose failures are swallowed. The search is
//! heuristic: zeros that never produce a sign change or a near-zero sample
//! can be missed.

use rand::distributions::{Distribution, Uniform};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::bisection::bisection;
use crate::error::{Result, SolverError};
use crate::float::{as_f64, midpoint, Bracketable};
use crate::options::SolverOptions;

/// Evaluation budget handed to the open fallback solver per sub-interval.
const FALLBACK_EVALS: usize = 40;

/// A non-bracketing root solver usable as a fallback on sub-intervals
/// without a sign change.
pub trait OpenSolver<T: Bracketable> {
    /// Attempts a root search from the starting point `x0`.
    fn solve(
        &self,
        f: &mut dyn FnMut(T) -> T,
        x0: T,
        maxevals: usize,
        abstol: T,
        reltol: T,
    ) -> Result<T>;
}

/// Configuration for [`find_zeros`].
#[derive(Clone, Copy, Debug)]
pub struct ZerosOptions<T> {
    /// Number of random interior sample points.
    pub no_pts: usize,
    /// Absolute threshold under which a sample value counts as zero.
    pub abstol: T,
    /// Relative threshold (scaled by the sample's magnitude) under which a
    /// sample value counts as zero.
    pub reltol: T,
    /// Cap on the 10x-denser retries taken when the interval looks
    /// oscillatory.
    pub max_refinements: usize,
    /// Seed for the sample grid, for reproducible searches.
    pub seed: u64,
}

impl<T: Bracketable> Default for ZerosOptions<T> {
    fn default() -> Self {
        let ten = T::from(10.0).unwrap();
        Self {
            no_pts: 100,
            abstol: ten * T::epsilon(),
            reltol: ten * T::epsilon(),
            max_refinements: 3,
            seed: 0x5eed_0f_2e05,
        }
    }
}

impl<T: Bracketable> ZerosOptions<T> {
    /// Override the number of interior sample points.
    pub fn with_no_pts(mut self, no_pts: usize) -> Self {
        self.no_pts = no_pts.max(1);
        self
    }

    /// Override the absolute near-zero threshold.
    pub fn with_abstol(mut self, abstol: T) -> Self {
        self.abstol = abstol;
        self
    }

    /// Override the relative near-zero threshold.
    pub fn with_reltol(mut self, reltol: T) -> Self {
        self.reltol = reltol;
        self
    }

    /// Override the retry cap of the oscillation heuristic.
    pub fn with_max_refinements(mut self, max_refinements: usize) -> Self {
        self.max_refinements = max_refinements;
        self
    }

    /// Override the sample-grid seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn near_zero(&self, x: T, fx: T) -> bool {
        fx.abs() <= self.abstol.max(self.reltol * x.abs())
    }
}

/// Finds zeros of `f` on `[a, b]`, returned sorted in increasing order.
///
/// Equivalent to [`find_zeros_with_fallback`] without an open solver:
/// sub-intervals that do not bracket a sign change contribute nothing.
///
/// # Errors
/// [`UnboundedBracket`](SolverError::UnboundedBracket) if an endpoint is
/// not finite. Failures of the per-interval searches are swallowed.
pub fn find_zeros<T, F>(f: F, a: T, b: T, options: &ZerosOptions<T>) -> Result<Vec<T>>
where
    T: Bracketable,
    F: FnMut(T) -> T,
{
    find_zeros_with_fallback(f, a, b, None, options)
}

/// Finds zeros of `f` on `[a, b]`, probing sign-preserving sub-intervals
/// with `fallback` started at their midpoint.
///
/// When more than a quarter of the sample points produce accepted roots the
/// pass is discarded as oscillatory and retried with ten times as many
/// points, up to [`ZerosOptions::max_refinements`] times.
pub fn find_zeros_with_fallback<T, F>(
    mut f: F,
    a: T,
    b: T,
    fallback: Option<&dyn OpenSolver<T>>,
    options: &ZerosOptions<T>,
) -> Result<Vec<T>>
where
    T: Bracketable,
    F: FnMut(T) -> T,
{
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    if !lo.is_finite() || !hi.is_finite() {
        return Err(SolverError::UnboundedBracket {
            a: as_f64(lo),
            b: as_f64(hi),
        });
    }

    let mut rng = SmallRng::seed_from_u64(options.seed);
    let mut no_pts = options.no_pts;
    for refinement in 0.. {
        let roots = scan(&mut f, lo, hi, no_pts, fallback, options, &mut rng);
        if roots.len() * 4 > no_pts && refinement < options.max_refinements {
            // Too dense to trust: the grid is probably aliasing an
            // oscillation.
            no_pts *= 10;
            continue;
        }
        return Ok(roots);
    }
    unreachable!("refinement loop always returns");
}

fn scan<T, F>(
    f: &mut F,
    lo: T,
    hi: T,
    no_pts: usize,
    fallback: Option<&dyn OpenSolver<T>>,
    options: &ZerosOptions<T>,
    rng: &mut SmallRng,
) -> Vec<T>
where
    T: Bracketable,
    F: FnMut(T) -> T,
{
    let unit = Uniform::new(0.0f64, 1.0);
    let mut offsets: Vec<f64> = (0..no_pts).map(|_| unit.sample(rng)).collect();
    offsets.sort_by(f64::total_cmp);

    let span = hi - lo;
    let mut grid = Vec::with_capacity(no_pts + 2);
    grid.push(lo);
    for offset in offsets {
        let x = lo + span * T::from(offset).unwrap();
        if lo < x && x < hi {
            grid.push(x);
        }
    }
    grid.push(hi);
    grid.dedup();

    let values: Vec<T> = grid.iter().map(|&x| f(x)).collect();
    let solver_options = SolverOptions::default();
    let mut roots = Vec::new();

    for i in 0..grid.len() - 1 {
        let (x0, f0) = (grid[i], values[i]);
        let (x1, f1) = (grid[i + 1], values[i + 1]);
        if options.near_zero(x0, f0) {
            roots.push(x0);
        } else if f0.signum() * f1.signum() < T::zero() {
            if let Ok(root) = bisection(&mut *f, x0, x1, &solver_options) {
                roots.push(root);
            }
        } else if let Some(solver) = fallback {
            let result = solver.solve(
                &mut *f,
                midpoint(x0, x1),
                FALLBACK_EVALS,
                options.abstol,
                options.reltol,
            );
            if let Ok(x) = result {
                if x0 < x && x < x1 {
                    roots.push(x);
                }
            }
        }
    }
    let (last_x, last_f) = (grid[grid.len() - 1], values[values.len() - 1]);
    if options.near_zero(last_x, last_f) {
        roots.push(last_x);
    }

    roots.sort_by(|x, y| x.partial_cmp(y).expect("roots are finite"));
    roots.dedup_by(|second, first| {
        (*second - *first).abs() <= options.abstol.max(options.reltol * second.abs())
    });
    roots
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn collects_the_multiples_of_pi_under_ten() {
        let roots = find_zeros(f64::sin, 0.0, 10.0, &ZerosOptions::default()).unwrap();
        let expected = [0.0, 1.0, 2.0, 3.0].map(|k| k * std::f64::consts::PI);
        assert_eq!(roots.len(), expected.len(), "roots = {roots:?}");
        for (root, reference) in roots.iter().zip(expected) {
            assert!(
                (root - reference).abs() <= 1e-12 * reference.max(1.0),
                "root {root} vs {reference}"
            );
        }
    }

    #[test]
    fn collects_polynomial_roots_in_order() {
        let roots = find_zeros(
            |x: f64| (x * x - 1.0) * (x - 3.0),
            -2.0,
            4.0,
            &ZerosOptions::default(),
        )
        .unwrap();
        assert_eq!(roots.len(), 3, "roots = {roots:?}");
        assert_relative_eq!(roots[0], -1.0, epsilon = 1e-12);
        assert_relative_eq!(roots[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(roots[2], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn accepts_a_root_sitting_on_the_right_endpoint() {
        let roots = find_zeros(|x: f64| x - 2.0, 0.0, 2.0, &ZerosOptions::default()).unwrap();
        assert_eq!(roots, vec![2.0]);
    }

    #[test]
    fn dense_oscillation_triggers_a_finer_grid() {
        let roots =
            find_zeros(|x: f64| (20.0 * x).sin(), 0.0, 10.0, &ZerosOptions::default()).unwrap();
        // 64 zeros of sin(20 x) lie in [0, 10]; the default 100-point grid
        // aliases them, so the driver must retry with a denser one to get
        // anywhere near the full count.
        assert!(roots.len() > 40, "found {} roots", roots.len());
    }

    #[test]
    fn interval_without_zeros_comes_back_empty() {
        let roots = find_zeros(|x: f64| x * x + 1.0, -5.0, 5.0, &ZerosOptions::default()).unwrap();
        assert!(roots.is_empty());
    }

    #[test]
    fn swapped_endpoints_are_normalized() {
        let roots = find_zeros(f64::sin, 4.0, 3.0, &ZerosOptions::default()).unwrap();
        assert_eq!(roots.len(), 1);
        assert_relative_eq!(roots[0], std::f64::consts::PI, epsilon = 1e-12);
    }

    #[test]
    fn non_finite_endpoint_is_rejected() {
        let result = find_zeros(f64::sin, 0.0, f64::INFINITY, &ZerosOptions::default());
        assert!(matches!(result, Err(SolverError::UnboundedBracket { .. })));
    }

    #[test]
    fn fallback_probes_sign_preserving_intervals() {
        // A parabola touching zero never changes sign, so only the open
        // fallback can report its root.
        struct MidpointNewton;
        impl OpenSolver<f64> for MidpointNewton {
            fn solve(
                &self,
                f: &mut dyn FnMut(f64) -> f64,
                x0: f64,
                maxevals: usize,
                abstol: f64,
                _reltol: f64,
            ) -> crate::error::Result<f64> {
                // Secant iteration, enough for the smooth test function.
                let mut x_prev = x0;
                let mut x = x0 + 1e-4;
                let mut f_prev = f(x_prev);
                for _ in 0..maxevals {
                    let fx = f(x);
                    if fx.abs() <= abstol {
                        return Ok(x);
                    }
                    let denom = fx - f_prev;
                    if denom == 0.0 {
                        break;
                    }
                    let next = x - fx * (x - x_prev) / denom;
                    x_prev = x;
                    f_prev = fx;
                    x = next;
                    if (x - x_prev).abs() <= 1e-14 * x.abs().max(1.0) {
                        return Ok(x);
                    }
                }
                Err(SolverError::MaxIterations {
                    steps: maxevals,
                    fnevals: maxevals,
                    best: x,
                    width: f64::NAN,
                })
            }
        }

        let options = ZerosOptions::default();
        let roots = find_zeros_with_fallback(
            |x: f64| (x - 0.5) * (x - 0.5),
            0.0,
            1.0,
            Some(&MidpointNewton),
            &options,
        )
        .unwrap();
        assert!(
            roots.iter().any(|r| (r - 0.5).abs() < 1e-6),
            "roots = {roots:?}"
        );
    }
}
