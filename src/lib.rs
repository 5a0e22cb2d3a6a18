//! Bracketing root finders for scalar real functions.
//!
//! Given a continuous function `f` and an interval `[a, b]` with
//! `f(a) * f(b) < 0`, this crate locates a point where `f` crosses zero, or
//! the tightest representable bracket around one. It offers
//!
//! - bitwise [`bisection`](bisection::bisection), which halves the number of
//!   representable values in the bracket per step and therefore converges
//!   within the bit width of the float type (`float` module),
//! - the Alefeld–Potra–Shi enclosing method
//!   [`toms748`](toms748::toms748), combining inverse-cubic and quadratic
//!   interpolation with a bisection safeguard,
//! - regula falsi ([`false_position`](false_position::false_position)) with
//!   the twelve Galdino endpoint reductions (`Reduction`), and
//! - a subdivision driver [`find_zeros`](zeros::find_zeros) that samples an
//!   interval at random points and dispatches each sign-changing
//!   sub-interval to bisection.
//!
//! A function value of exactly zero, `±inf`, or NaN is treated as the
//! answer at that point rather than as an error, so poles of `1/g` that are
//! bracketed by a sign change are reported like roots.
//!
//! # Quick start
//!
//! ```
//! use enclose::{find_zero_bracket, find_zeros, Method, SolverOptions, ZerosOptions};
//!
//! let root = find_zero_bracket(
//!     |x: f64| x * x - 2.0,
//!     0.0,
//!     2.0,
//!     Method::Toms748,
//!     &SolverOptions::default(),
//! )
//! .expect("bracketed root");
//! assert!((root - std::f64::consts::SQRT_2).abs() < 1e-14);
//!
//! let zeros = find_zeros(f64::sin, 0.0, 10.0, &ZerosOptions::default())
//!     .expect("finite interval");
//! assert_eq!(zeros.len(), 4); // 0, pi, 2 pi, 3 pi
//! ```
//!
//! Solvers are generic over [`Bracketable`], implemented for `f32` and
//! `f64`; scalars without a fixed binary layout can opt in with an
//! algebraic midpoint, in which case the bisection entry point delegates to
//! [`toms748`](toms748::toms748). All calls are synchronous and evaluate
//! `f` at most once per logical step; caps on iterations and evaluations
//! live in [`SolverOptions`].

pub mod bisection;
pub mod bracket;
pub mod error;
pub mod false_position;
pub mod float;
pub mod options;
pub mod solver;
pub mod toms748;
pub mod zeros;

pub use bracket::SolverState;
pub use error::{Result, SolverError};
pub use false_position::Reduction;
pub use float::{midpoint, Bracketable};
pub use options::SolverOptions;
pub use solver::{find_zero_bracket, Method};
pub use zeros::{find_zeros, find_zeros_with_fallback, OpenSolver, ZerosOptions};
