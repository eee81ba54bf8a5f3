//! Growable stack of graph points.  Each sampling run owns two of
//! these: a LIFO lookahead of pending candidates (the top is always
//! the nearest pending point) and the append-only committed output.

use crate::Point;

pub(crate) struct PointBuffer {
    pts: Vec<Point>,
}

impl PointBuffer {
    #[inline]
    pub fn new() -> Self { Self { pts: Vec::new() } }

    #[inline]
    pub fn with_capacity(n: usize) -> Self {
        Self { pts: Vec::with_capacity(n) }
    }

    #[inline]
    pub fn is_empty(&self) -> bool { self.pts.is_empty() }

    #[inline]
    pub fn len(&self) -> usize { self.pts.len() }

    #[inline]
    pub fn push(&mut self, x: f32, y: f32) {
        self.pts.push(Point { x, y })
    }

    /// Remove the last point.  The buffer must not be empty.
    #[inline]
    pub fn pop(&mut self) {
        debug_assert!(!self.pts.is_empty());
        self.pts.pop();
    }

    /// Return the last point.  The buffer must not be empty.
    #[inline]
    pub fn top(&self) -> Point {
        debug_assert!(!self.pts.is_empty());
        self.pts[self.pts.len() - 1]
    }

    #[inline]
    pub fn into_vec(self) -> Vec<Point> { self.pts }
}
