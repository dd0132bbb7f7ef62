//! Parametric sampling shared by all simulators.
//!
//! A [`Series`] is a finite, ordered list of `(x, y)` points regenerated on
//! every parameter change. Sampling grids are built from an integer index
//! (`start + i * step`) so end points are hit exactly and no float error
//! accumulates across the sweep.

use serde::{Deserialize, Serialize};
use tracing::trace;
use validator::Validate;

/// One chart sample.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Independent variable.
    pub x: f64,
    /// Dependent variable.
    pub y: f64,
}

impl SeriesPoint {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// True if both coordinates are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A named, ordered sample set for one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    /// Chart identifier (e.g. "height_vs_time").
    pub name: &'static str,
    /// Label of the independent axis, with unit.
    pub x_label: &'static str,
    /// Label of the dependent axis, with unit.
    pub y_label: &'static str,
    /// Samples, ascending in `x`.
    pub points: Vec<SeriesPoint>,
}

impl Series {
    /// Create an empty series.
    #[must_use]
    pub const fn new(name: &'static str, x_label: &'static str, y_label: &'static str) -> Self {
        Self {
            name,
            x_label,
            y_label,
            points: Vec::new(),
        }
    }

    /// Sample `f` at every `x` yielded by `xs`.
    ///
    /// `f` returns `None` for points outside its mathematical domain; those
    /// points are dropped, as are any non-finite results.
    #[must_use]
    pub fn sample<I, F>(
        name: &'static str,
        x_label: &'static str,
        y_label: &'static str,
        xs: I,
        mut f: F,
    ) -> Self
    where
        I: IntoIterator<Item = f64>,
        F: FnMut(f64) -> Option<f64>,
    {
        let mut series = Self::new(name, x_label, y_label);
        for x in xs {
            match f(x) {
                Some(y) if y.is_finite() && x.is_finite() => {
                    series.points.push(SeriesPoint::new(x, y));
                }
                _ => trace!(series = name, x, "sample dropped (outside domain)"),
            }
        }
        series
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if there are no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate over points.
    pub fn iter(&self) -> std::slice::Iter<'_, SeriesPoint> {
        self.points.iter()
    }

    /// First point, if any.
    #[must_use]
    pub fn first(&self) -> Option<&SeriesPoint> {
        self.points.first()
    }

    /// Last point, if any.
    #[must_use]
    pub fn last(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }

    /// `(min, max)` of the independent variable.
    #[must_use]
    pub fn x_range(&self) -> Option<(f64, f64)> {
        Self::range(self.points.iter().map(|p| p.x))
    }

    /// `(min, max)` of the dependent variable.
    #[must_use]
    pub fn y_range(&self) -> Option<(f64, f64)> {
        Self::range(self.points.iter().map(|p| p.y))
    }

    fn range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
        values.fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// True if `x` is strictly ascending across the series.
    #[must_use]
    pub fn is_x_ascending(&self) -> bool {
        self.points.windows(2).all(|w| w[0].x < w[1].x)
    }

    /// True if `y` is strictly decreasing across the series.
    #[must_use]
    pub fn is_y_strictly_decreasing(&self) -> bool {
        self.points.windows(2).all(|w| w[0].y > w[1].y)
    }

    /// True if every point is finite.
    #[must_use]
    pub fn all_finite(&self) -> bool {
        self.points.iter().all(SeriesPoint::is_finite)
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a SeriesPoint;
    type IntoIter = std::slice::Iter<'a, SeriesPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// A uniform sampling grid `start + i * step` for `i in 0..count`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct Grid {
    /// First sample.
    pub start: f64,
    /// Spacing between samples.
    #[validate(range(exclusive_min = 0.0))]
    pub step: f64,
    /// Number of samples.
    #[validate(range(min = 1, max = 100_000))]
    pub count: usize,
}

impl Grid {
    /// Grid with an explicit sample count.
    #[must_use]
    pub const fn new(start: f64, step: f64, count: usize) -> Self {
        Self { start, step, count }
    }

    /// `count` samples covering `[start, start + span)`, i.e. `start + (i / count) * span`.
    #[must_use]
    pub fn fraction_of(start: f64, span: f64, count: usize) -> Self {
        let step = if count == 0 { 0.0 } else { span / count as f64 };
        Self { start, step, count }
    }

    /// Value of sample `i`.
    #[must_use]
    pub fn at(&self, i: usize) -> f64 {
        (i as f64).mul_add(self.step, self.start)
    }

    /// Last sample value.
    #[must_use]
    pub fn end(&self) -> f64 {
        self.at(self.count.saturating_sub(1))
    }

    /// Iterate over the sample values.
    pub fn values(self) -> impl Iterator<Item = f64> {
        (0..self.count).map(move |i| self.at(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn squares() -> Series {
        Series::sample("sq", "x", "y", Grid::new(0.0, 1.0, 5).values(), |x| {
            Some(x * x)
        })
    }

    #[test]
    fn test_sample_basic() {
        let s = squares();
        assert_eq!(s.len(), 5);
        assert_eq!(s.points[4], SeriesPoint::new(4.0, 16.0));
        assert!(s.is_x_ascending());
        assert!(s.all_finite());
    }

    #[test]
    fn test_sample_drops_none_and_non_finite() {
        let s = Series::sample("f", "x", "y", Grid::new(-2.0, 1.0, 5).values(), |x| {
            if x < 0.0 {
                None
            } else if x == 0.0 {
                Some(f64::NAN)
            } else {
                Some(1.0 / x)
            }
        });
        assert_eq!(s.len(), 2);
        assert_eq!(s.first().map(|p| p.x), Some(1.0));
        assert!(s.all_finite());
    }

    #[test]
    fn test_empty_series() {
        let s = Series::new("e", "x", "y");
        assert!(s.is_empty());
        assert!(s.x_range().is_none());
        assert!(s.is_x_ascending());
    }

    #[test]
    fn test_ranges() {
        let s = squares();
        assert_eq!(s.x_range(), Some((0.0, 4.0)));
        assert_eq!(s.y_range(), Some((0.0, 16.0)));
    }

    #[test]
    fn test_monotonic_checks() {
        let s = Series::sample("inv", "x", "y", Grid::new(1.0, 1.0, 4).values(), |x| {
            Some(1.0 / x)
        });
        assert!(s.is_y_strictly_decreasing());
        assert!(!squares().is_y_strictly_decreasing());
    }

    #[test]
    fn test_grid_fraction_of() {
        let g = Grid::fraction_of(0.5, 20.0, 50);
        assert_eq!(g.count, 50);
        assert_eq!(g.at(0), 0.5);
        assert!((g.end() - 20.1).abs() < 1e-12);
        assert!(g.values().all(|r| r > 0.0));

        let empty = Grid::fraction_of(0.0, 1.0, 0);
        assert_eq!(empty.values().count(), 0);
    }

    #[test]
    fn test_series_serialization() {
        let s = squares();
        let json = serde_json::to_string(&s).expect("serialize");
        assert!(json.contains("\"name\":\"sq\""));
        assert!(json.contains("\"points\""));
    }

    #[test]
    fn test_into_iterator() {
        let s = squares();
        let total: f64 = (&s).into_iter().map(|p| p.y).sum();
        assert_eq!(total, 30.0);
    }
}
