//! The classic escape-time iteration: square, add, and see whether
//! the orbit has left the circle of the divergence threshold.

use crate::complex::{add, multiply, squared_magnitude};
use num::Complex;

/// The outcome of iterating one point.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EscapeResult {
    /// The orbit stayed inside the threshold for every iteration; the
    /// point is drawn as "inside" the set.
    Bounded,
    /// The orbit crossed the threshold after this many completed
    /// iterations.  Zero means the very first iterate was outside.
    Diverged(usize),
}

impl EscapeResult {
    /// True for points treated as members of the set.
    pub fn is_bounded(self) -> bool {
        self == EscapeResult::Bounded
    }

    /// The single byte written to image files for this result.  The
    /// iteration count is truncated to its low eight bits, so the
    /// visible bands repeat every 256 iterations; bounded points are
    /// written as zero.
    pub fn as_byte(self) -> u8 {
        match self {
            EscapeResult::Bounded => 0,
            EscapeResult::Diverged(k) => k as u8,
        }
    }
}

/// Given a point, the maximum number of iterations, and the
/// divergence threshold, iterate `z = z*z + c` from zero.  The test is
/// `|z|^2 >= threshold^2`, so a point sitting exactly on the
/// threshold circle counts as escaped.  At most `iteration_cap + 1`
/// iterations are performed.
pub fn evaluate(c: Complex<f64>, iteration_cap: usize, divergence_threshold: f64) -> EscapeResult {
    let limit = divergence_threshold * divergence_threshold;
    let mut z = Complex::new(0.0_f64, 0.0_f64);
    for k in 0..=iteration_cap {
        z = add(multiply(z, z), c);
        if squared_magnitude(z) >= limit {
            return EscapeResult::Diverged(k);
        }
    }
    EscapeResult::Bounded
}

/// Anything that can turn a point of the complex plane into an
/// `EscapeResult` under a given cap and threshold.  The scheduler
/// shares one evaluator between all of its workers, hence `Sync`.
pub trait Evaluator: Sync {
    /// Evaluate a single point.
    fn evaluate(&self, c: Complex<f64>, params: EscapeParams) -> EscapeResult;
}

/// The plain escape-time evaluator.
#[derive(Copy, Clone, Debug, Default)]
pub struct EscapeTime;

impl Evaluator for EscapeTime {
    fn evaluate(&self, c: Complex<f64>, params: EscapeParams) -> EscapeResult {
        evaluate(c, params.iteration_cap, params.divergence_threshold)
    }
}

/// The two knobs of the escape loop.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EscapeParams {
    /// The highest iteration index tested.
    pub iteration_cap: usize,
    /// The modulus past which an orbit is considered to have escaped.
    pub divergence_threshold: f64,
}

impl EscapeParams {
    /// Low cap for the interactive preview; only membership is drawn.
    pub const PREVIEW: EscapeParams = EscapeParams {
        iteration_cap: 250,
        divergence_threshold: 3.0,
    };

    /// Higher cap for exported images, where the count becomes colour.
    pub const EXPORT: EscapeParams = EscapeParams {
        iteration_cap: 500,
        divergence_threshold: 3.0,
    };

    /// Constructor.
    pub fn new(iteration_cap: usize, divergence_threshold: f64) -> Self {
        EscapeParams {
            iteration_cap,
            divergence_threshold,
        }
    }
}
