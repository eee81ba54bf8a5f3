//! Adaptive sampling of function graphs.
//!
//! Given a scalar function and a view window, [`Sampling::graph`]
//! produces a sequence of points approximating `y = f(x)` to roughly
//! one-pixel accuracy, spending evaluations where the curve bends and
//! almost none where it is flat or off-screen.  Domain errors (NaN)
//! and vertical asymptotes become cuts in the path;
//! [`Sampling::polylines`] turns the result into disjoint polylines
//! ready to be stroked.
//!
//! # Example
//!
//! ```
//! use graph_sampling::Sampling;
//! let s = Sampling::graph(|x| x.tan(), -2., 2.)
//!     .view(-4., 4.)
//!     .pixel_width(480.)
//!     .build();
//! // The two poles of tan on [-2, 2] cut the graph into branches.
//! assert!(s.polylines().len() >= 2);
//! ```

use std::{fmt::{self, Display, Formatter},
          io::{self, Write}};
use log::debug;

mod buffer;
mod eval;

use buffer::PointBuffer;
use eval::{ClampedEval, FLAT_TOL_PX, JUMP, MAX_STEP_PX, MIN_STEP_PX};

/// A sampled point of the graph.  A NaN `y` marks a cut: either the
/// function is undefined there or the sampler decided the path must
/// not be stroked across this entry (asymptote).  The two cases are
/// indistinguishable downstream, on purpose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Return `true` if this entry carries an actual value (i.e. is
    /// not a cut).
    #[inline]
    pub fn is_defined(&self) -> bool { !self.y.is_nan() }
}

/// A sampling of a graph: committed points in non-decreasing x order,
/// with possible cuts because of domain errors or asymptotes.
#[derive(Debug, Clone, PartialEq)]
pub struct Sampling {
    path: Vec<Point>,
}

/// A maximal run of connected, defined points, in ascending x order.
/// Never empty.  Polylines are meant to be stroked independently; no
/// implicit connection exists between two of them.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    points: Vec<Point>,
}

impl Polyline {
    #[inline]
    pub fn points(&self) -> &[Point] { &self.points }

    #[inline]
    pub fn len(&self) -> usize { self.points.len() }
}

impl Sampling {
    /// Return `true` if the sampling holds no point at all.
    #[inline]
    pub fn is_empty(&self) -> bool { self.path.is_empty() }

    /// The committed points, cuts included.
    #[inline]
    pub fn points(&self) -> &[Point] { &self.path }

    /// Iterate on the points (and cuts) of the path.  More precisely,
    /// a path is made of continuous segments whose points are given
    /// by contiguous values `Some([x, y])` interspaced by `None`.
    /// Two `None` never follow each other and a leading cut is not
    /// reported.
    pub fn iter(&self) -> Iter<'_> {
        Iter { points: self.path.iter(), prev_is_cut: true }
    }

    /// Split the sampling into disjoint polylines.  A defined point
    /// extends the polyline in progress (opening one if needed); a
    /// cut closes it without adding a vertex.  Pure function of the
    /// sampling: calling it twice gives equal results.
    pub fn polylines(&self) -> Vec<Polyline> {
        let mut lines = Vec::new();
        let mut cur: Vec<Point> = Vec::new();
        for &p in &self.path {
            if p.is_defined() {
                cur.push(p)
            } else if !cur.is_empty() {
                lines.push(Polyline { points: std::mem::take(&mut cur) })
            }
        }
        if !cur.is_empty() {
            lines.push(Polyline { points: cur })
        }
        lines
    }

    /// Write the sampling to `f` in a tabular form: each point is
    /// written as "x y" on a single line (in scientific notation).
    /// If the path is interrupted, a blank line is printed.  This
    /// format is compatible with Gnuplot.
    pub fn write(&self, f: &mut impl Write) -> Result<(), io::Error> {
        for p in self.iter() {
            match p {
                Some([x, y]) => write!(f, "{:e} {:e}\n", x, y)?,
                None => write!(f, "\n")?,
            }
        }
        Ok(())
    }
}

impl Display for Sampling {
    /// Display the sampling in the same tabular form as
    /// [`Sampling::write`].
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        for p in self.iter() {
            match p {
                Some([x, y]) => write!(f, "{:e} {:e}\n", x, y)?,
                None => write!(f, "\n")?,
            }
        }
        Ok(())
    }
}

impl<T> From<T> for Sampling
where T: IntoIterator<Item = [f32; 2]> {
    /// Build a sampling from existing points.  Points with non-finite
    /// coordinates are interpreted as cuts.
    fn from(points: T) -> Self {
        let mut path = Vec::new();
        for [x, y] in points {
            if x.is_finite() && y.is_finite() {
                path.push(Point { x, y })
            } else {
                path.push(Point { x, y: f32::NAN })
            }
        }
        Sampling { path }
    }
}

/// Iterator on the points of a [`Sampling`].
/// See [`Sampling::iter`] for more information.
pub struct Iter<'a> {
    points: std::slice::Iter<'a, Point>,
    prev_is_cut: bool,
}

impl Iterator for Iter<'_> {
    type Item = Option<[f32; 2]>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&p) = self.points.next() {
            if p.is_defined() {
                self.prev_is_cut = false;
                return Some(Some([p.x, p.y]))
            } else if !self.prev_is_cut {
                self.prev_is_cut = true;
                return Some(None)
            }
        }
        None
    }
}

impl Sampling {
    /// Create a sampling of the graph of `f` on the interval
    /// \[`xmin`, `xmax`\].  The function is evaluated in f64 but the
    /// sampling works in f32; infinite values are clamped to large
    /// finite ones and NaN (domain error) cuts the path.
    ///
    /// Panics if `xmin` or `xmax` is not finite.
    ///
    /// # Example
    ///
    /// ```
    /// use graph_sampling::Sampling;
    /// let s = Sampling::graph(|x| x.sin(), 0., 4.).build();
    /// let mut out = Vec::new();
    /// s.write(&mut out).unwrap();
    /// assert!(!out.is_empty());
    /// ```
    #[must_use]
    pub fn graph<F>(f: F, xmin: f32, xmax: f32) -> Graph<F>
    where F: FnMut(f64) -> f64 {
        if !xmin.is_finite() {
            panic!("graph_sampling::graph: xmin = {} must be finite", xmin);
        }
        if !xmax.is_finite() {
            panic!("graph_sampling::graph: xmax = {} must be finite", xmax);
        }
        Graph { f: ClampedEval::new(f),
                xmin, xmax,
                ymin: f32::NEG_INFINITY,
                ymax: f32::INFINITY,
                pixel_width: 320. }
    }
}

/// Options for sampling the graph of a function ℝ → ℝ.
/// See [`Sampling::graph`].
pub struct Graph<F> {
    f: ClampedEval<F>,
    xmin: f32,
    xmax: f32,
    ymin: f32,
    ymax: f32,
    pixel_width: f32,
}

impl<F> Graph<F>
where F: FnMut(f64) -> f64 {
    /// Set the visible y-range.  Segments lying entirely below `ymin`
    /// or entirely above `ymax` are committed without refinement.
    /// Infinite bounds are allowed (the default is (-∞, +∞), which
    /// disables vertical culling).  Panics if a bound is NaN.
    pub fn view(mut self, ymin: f32, ymax: f32) -> Self {
        if ymin.is_nan() || ymax.is_nan() {
            panic!("graph_sampling::view: bounds must not be NaN");
        }
        self.ymin = ymin;
        self.ymax = ymax;
        self
    }

    /// Set the width in pixels of the region on which the graph will
    /// be drawn (default: 320).  Together with \[`xmin`, `xmax`\] it
    /// fixes the scale, hence the coarsest and finest sampling steps
    /// and the flatness tolerance.
    ///
    /// Panics if `w` is not finite and > 0.
    pub fn pixel_width(mut self, w: f32) -> Self {
        if !w.is_finite() || w <= 0. {
            panic!("graph_sampling::pixel_width: w = {} must be \
                    finite and > 0", w);
        }
        self.pixel_width = w;
        self
    }

    /// Return the sampling.
    ///
    /// The domain is walked left to right with a LIFO lookahead of
    /// pending candidates; the top of the lookahead is always the
    /// nearest pending point because refinement pushes midpoints.
    /// Per pair (left, right), in order: skip if both ends are NaN,
    /// accept as-is if the span reached the resolution floor or the
    /// segment is entirely off-screen, cut on a large-magnitude sign
    /// reversal (asymptote), otherwise bisect unless the midpoint
    /// deviates from the chord by less than the flatness tolerance.
    pub fn build(&mut self) -> Sampling {
        if self.xmin > self.xmax {
            return Sampling { path: Vec::new() }
        }
        if self.xmin == self.xmax {
            let y = self.f.eval(self.xmin);
            if y.is_nan() {
                return Sampling { path: Vec::new() }
            }
            return Sampling { path: vec![Point { x: self.xmin, y }] }
        }
        let scale = self.pixel_width / (self.xmax - self.xmin);
        let max_step = MAX_STEP_PX / scale;
        let min_step = MIN_STEP_PX / scale;
        let flat_tol = FLAT_TOL_PX / scale;
        debug!("step min {:e} max {:e}", min_step, max_step);
        let mut next = PointBuffer::new();
        let mut graph = PointBuffer::with_capacity(
            (self.pixel_width / MAX_STEP_PX) as usize + 2);
        graph.push(self.xmin, self.f.eval(self.xmin));
        let mut left = graph.top();
        let mut right = Point { x: 0., y: 0. };
        let mut advance = false;
        loop {
            if advance {
                left = right;
                next.pop(); // `right` is consumed.
            }
            advance = true;
            if next.is_empty() {
                let x = left.x + max_step;
                next.push(x, self.f.eval(x));
            }
            right = next.top();
            if left.x > self.xmax {
                break
            }
            if left.y.is_nan() && right.y.is_nan() {
                continue // unresolvable gap, move past it
            }
            let span = right.x - left.x;
            if span <= min_step
                || (left.y < self.ymin && right.y < self.ymin)
                || (left.y > self.ymax && right.y > self.ymax) {
                // Resolution floor reached or segment entirely
                // outside the visible range: accept as-is.
                graph.push(right.x, right.y);
                continue
            }
            if (left.y < -JUMP && right.y > JUMP)
                || (left.y > JUMP && right.y < -JUMP) {
                // Large sign reversal: almost surely an asymptote or
                // a branch jump.  Cut instead of stroking across.
                graph.push(right.x, f32::NAN);
                graph.push(right.x, right.y);
                continue
            }
            let mid_x = (left.x + right.x) / 2.;
            let mid_y = self.f.eval(mid_x);
            // Twice the deviation of the true midpoint from the
            // chord.  A NaN deviation fails the `<` and forces a
            // refinement attempt, bounded below by `min_step`.
            if (left.y + right.y - 2. * mid_y).abs() < flat_tol {
                graph.push(right.x, right.y);
            } else {
                next.push(mid_x, mid_y);
                advance = false;
            }
        }
        debug!("graph uses {} points", graph.len());
        Sampling { path: graph.into_vec() }
    }
}


////////////////////////////////////////////////////////////////////////
//
// Tests

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use crate::{Point, Sampling};

    fn xy_of_sampling(s: &Sampling) -> Vec<Option<(f32, f32)>> {
        s.iter().map(|p| p.map(|p| (p[0], p[1]))).collect()
    }

    #[test]
    fn flat_function_two_points() {
        // pixel_width = 10 on [0, 4] makes the max step wider than
        // the whole domain, so a constant graph needs two points.
        let n = Cell::new(0);
        let s = Sampling::graph(|_| { n.set(n.get() + 1); 1.5 }, 0., 4.)
            .pixel_width(10.)
            .build();
        let pts = s.points();
        assert_eq!(pts.len(), 2);
        assert_eq!(pts[0], Point { x: 0., y: 1.5 });
        assert!(pts[1].x >= 4.);
        assert_eq!(pts[1].y, 1.5);
        // xmin, one candidate, one midpoint, one unused candidate.
        assert_eq!(n.get(), 4);
    }

    #[test]
    fn flat_function_no_refinement() {
        let n = Cell::new(0);
        let s = Sampling::graph(|_| { n.set(n.get() + 1); 1.5 }, -4., 4.)
            .view(-2., 2.)
            .pixel_width(320.)
            .build();
        // Every pair passes the flatness test on the first try: one
        // candidate and one midpoint evaluation per committed point.
        assert_eq!(n.get(), 2 * s.points().len());
        assert!(s.points().iter().all(|p| p.y == 1.5));
        assert_eq!(s.polylines().len(), 1);
    }

    #[test]
    fn culling_outside_range() {
        let n = Cell::new(0);
        let s = Sampling::graph(|_| { n.set(n.get() + 1); 50. }, -4., 4.)
            .view(-1., 1.)
            .pixel_width(320.)
            .build();
        // Both endpoints of every pair are above ymax, so segments
        // are committed without any midpoint evaluation.
        assert_eq!(n.get(), s.points().len() + 1);
        assert!(s.points().iter().all(|p| p.y == 50.));
    }

    #[test]
    fn all_nan_terminates() {
        let n = Cell::new(0);
        let s = Sampling::graph(|_| { n.set(n.get() + 1); f64::NAN }, 0., 8.)
            .pixel_width(320.)
            .build();
        // One coarse step per iteration, nothing refined, nothing
        // committed beyond the initial point.
        assert!(n.get() < 30);
        assert_eq!(s.points().len(), 1);
        assert!(s.points()[0].y.is_nan());
        assert!(s.polylines().is_empty());
    }

    #[test]
    fn oscillation_terminates() {
        // A function with no spatial coherence at all: the flatness
        // test almost never passes, so refinement is driven all the
        // way down to the resolution floor.  The evaluation count
        // must stay O((xmax - xmin) / min_step).
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        let n = Cell::new(0);
        let s = Sampling::graph(
            |_| { n.set(n.get() + 1); rng.gen_range(-2.0..2.0) }, 0., 1.)
            .view(-1., 1.)
            .pixel_width(320.)
            .build();
        // min_step = 0.1 / 320 ⟹ at most 3200 committed spans.
        assert!(n.get() < 20_000);
        let pts = s.points();
        assert!(pts.len() > 100);
        for w in pts.windows(2) {
            assert!(w[0].x <= w[1].x);
        }
    }

    #[test]
    fn monotone_x() {
        let s = Sampling::graph(|x| x.sin(), -4., 4.)
            .view(-2., 2.)
            .pixel_width(320.)
            .build();
        for w in s.points().windows(2) {
            assert!(w[0].x <= w[1].x, "{:?} not ≤ {:?}", w[0], w[1]);
        }
    }

    #[test]
    fn endpoint_inclusion() {
        let s = Sampling::graph(|x| x.sin(), -4., 4.)
            .view(-2., 2.)
            .pixel_width(320.)
            .build();
        let pts = s.points();
        assert_eq!(pts[0].x, -4.);
        let max_step = 15.8976_f32 / (320. / 8.);
        let last = pts[pts.len() - 1];
        assert!(last.x >= 4. - max_step && last.x < 4. + max_step,
                "last x = {}", last.x);
    }

    #[test]
    fn asymptote_cuts_path() {
        let f = |x: f64| if x < 1. { 1000. } else { -1000. };
        let s = Sampling::graph(f, 0., 2.)
            .view(-1500., 1500.)
            .pixel_width(320.)
            .build();
        assert!(s.points().iter().any(|p| !p.is_defined()));
        let lines = s.polylines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].points().iter().all(|p| p.y == 1000.));
        assert!(lines[1].points().iter().all(|p| p.y == -1000.));
    }

    #[test]
    fn tan_splits_into_branches() {
        let s = Sampling::graph(|x| x.tan(), -2., 2.)
            .view(-4., 4.)
            .pixel_width(480.)
            .build();
        // Poles at ±π/2: three branches.
        assert_eq!(s.polylines().len(), 3);
    }

    #[test]
    fn sqrt_domain_gap() {
        let s = Sampling::graph(|x| x.sqrt(), -4., 4.)
            .view(-3., 3.)
            .pixel_width(320.)
            .build();
        let lines = s.polylines();
        assert_eq!(lines.len(), 1);
        let pts = lines[0].points();
        assert!(pts[0].x >= 0.);
        assert!(pts.iter().all(|p| p.y.is_finite()));
    }

    #[test]
    fn polylines_idempotent() {
        let s = Sampling::graph(|x| (1. / x).sin(), -0.4, 0.4)
            .view(-2., 2.)
            .pixel_width(320.)
            .build();
        assert_eq!(s.polylines(), s.polylines());
    }

    #[test]
    fn inverted_domain_is_empty() {
        let s = Sampling::graph(|x| x, 4., -4.).build();
        assert!(s.is_empty());
        assert!(s.polylines().is_empty());
    }

    #[test]
    fn degenerate_domain() {
        let s = Sampling::graph(|x| x, 2., 2.).build();
        assert_eq!(s.points(), &[Point { x: 2., y: 2. }]);
        let s = Sampling::graph(|x| (x - 3.).sqrt(), 2., 2.).build();
        assert!(s.is_empty());
    }

    #[test]
    #[should_panic]
    fn non_finite_bound_panics() {
        let _ = Sampling::graph(|x| x, f32::NAN, 1.);
    }

    #[test]
    fn from_points_and_iter() {
        let nan = f32::NAN;
        let s = Sampling::from([[nan, nan], [0., 1.], [nan, nan],
                                [nan, nan], [1., 2.], [nan, nan]]);
        // Leading cut suppressed, consecutive cuts collapsed.
        assert_eq!(xy_of_sampling(&s),
                   vec![Some((0., 1.)), None, Some((1., 2.)), None]);
        let lines = s.polylines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].points(), &[Point { x: 0., y: 1. }]);
        assert_eq!(lines[1].points(), &[Point { x: 1., y: 2. }]);
    }

    #[test]
    fn write_gnuplot_format() {
        let s = Sampling::from([[0., 1.], [1., f32::NAN], [2., 3.]]);
        let mut out = Vec::new();
        s.write(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(),
                   "0e0 1e0\n\n2e0 3e0\n");
        assert_eq!(s.to_string(), "0e0 1e0\n\n2e0 3e0\n");
    }
}
