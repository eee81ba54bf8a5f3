//! Evaluator wrapper keeping all y-values finite or NaN.

/// Finite stand-in for ±∞.  Large enough to be far outside any
/// reasonable view, small enough that sums of two such values stay
/// well within f32 range (so the flatness test never sees NaN from
/// ∞ − ∞).
pub(crate) const CLAMP: f32 = 10000.;

/// Coarsest step between committed points, in pixels.
pub(crate) const MAX_STEP_PX: f32 = 15.8976;

/// Finest step, in pixels.  Refinement stops below this span no
/// matter what the curvature test says; this is the only termination
/// safeguard near poles.
pub(crate) const MIN_STEP_PX: f32 = 0.1;

/// Flatness tolerance, in pixels: a segment whose midpoint deviates
/// from the chord by less than this is accepted as straight.
pub(crate) const FLAT_TOL_PX: f32 = 1.;

/// Magnitude above which a sign reversal between neighboring samples
/// is treated as a vertical asymptote rather than a steep slope.
pub(crate) const JUMP: f32 = 100.;

/// The user evaluator with its results narrowed to f32 and clamped
/// to \[-[`CLAMP`], [`CLAMP`]\].  NaN (domain error) passes through
/// unchanged.  No caching: every call may reach the user function,
/// which is why the sampler is careful about its call count.
pub(crate) struct ClampedEval<F> {
    f: F,
}

impl<F> ClampedEval<F>
where F: FnMut(f64) -> f64 {
    #[inline]
    pub fn new(f: F) -> Self { Self { f } }

    pub fn eval(&mut self, x: f32) -> f32 {
        // The f64 → f32 narrowing saturates overflow to ±∞, so
        // finite-but-huge f64 results are clamped as well.
        let y = (self.f)(x as f64) as f32;
        if y == f32::INFINITY { CLAMP }
        else if y == f32::NEG_INFINITY { -CLAMP }
        else { y }
    }
}
