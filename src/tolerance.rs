/// Elevation comparisons that absorb measurement noise.
///
/// For any two finite values exactly one of [`equal`](Tolerance::equal),
/// [`more_than`](Tolerance::more_than) and [`less_than`](Tolerance::less_than)
/// holds. NaN compares as none of them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    tol: f64,
}

impl Tolerance {
    pub fn new(tol: f64) -> Self {
        Self { tol }
    }

    pub fn value(&self) -> f64 {
        self.tol
    }

    /// `|a - b| <= tol`
    #[inline]
    pub fn equal(&self, a: f32, b: f32) -> bool {
        ((a - b) as f64).abs() <= self.tol
    }

    /// `a` is unambiguously higher than `b`.
    #[inline]
    pub fn more_than(&self, a: f32, b: f32) -> bool {
        (a - b) as f64 > self.tol
    }

    /// `a` is unambiguously lower than `b`.
    #[inline]
    pub fn less_than(&self, a: f32, b: f32) -> bool {
        (b - a) as f64 > self.tol
    }
}
