use crate::ReactorsIVP::reactor_error::ReactorError;
use serde::{Deserialize, Serialize};

/// Evenly spaced, strictly increasing time points between `start` and `end`
/// (both included). Constructed through [`TimeGrid::new`], which rejects grids
/// with fewer than two points or with `start >= end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TimeGridSpec", into = "TimeGridSpec")]
pub struct TimeGrid {
    start: f64,
    end: f64,
    n_points: usize,
}

/// serialized form of a time grid, validated on deserialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeGridSpec {
    pub start: f64,
    pub end: f64,
    pub n_points: usize,
}

impl TryFrom<TimeGridSpec> for TimeGrid {
    type Error = ReactorError;
    fn try_from(spec: TimeGridSpec) -> Result<Self, Self::Error> {
        TimeGrid::new(spec.start, spec.end, spec.n_points)
    }
}

impl From<TimeGrid> for TimeGridSpec {
    fn from(grid: TimeGrid) -> Self {
        TimeGridSpec {
            start: grid.start,
            end: grid.end,
            n_points: grid.n_points,
        }
    }
}

impl TimeGrid {
    pub fn new(start: f64, end: f64, n_points: usize) -> Result<Self, ReactorError> {
        if !start.is_finite() || !end.is_finite() {
            return Err(ReactorError::InvalidGrid {
                reason: format!("bounds must be finite, got [{}, {}]", start, end),
            });
        }
        if n_points < 2 {
            return Err(ReactorError::InvalidGrid {
                reason: format!("at least 2 points required, got {}", n_points),
            });
        }
        if start >= end {
            return Err(ReactorError::InvalidGrid {
                reason: format!("start ({}) must be less than end ({})", start, end),
            });
        }
        let grid = Self {
            start,
            end,
            n_points,
        };
        // spacing can underflow for huge point counts on a tiny span
        if grid.step() <= 0.0 || start + grid.step() <= start {
            return Err(ReactorError::InvalidGrid {
                reason: format!(
                    "{} points on [{}, {}] are not strictly increasing",
                    n_points, start, end
                ),
            });
        }
        Ok(grid)
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn n_points(&self) -> usize {
        self.n_points
    }

    pub fn step(&self) -> f64 {
        (self.end - self.start) / (self.n_points - 1) as f64
    }

    /// i-th grid point; the last point is exactly `end`
    pub fn point(&self, i: usize) -> f64 {
        if i + 1 == self.n_points {
            self.end
        } else {
            self.start + i as f64 * self.step()
        }
    }

    pub fn points(&self) -> Vec<f64> {
        (0..self.n_points).map(|i| self.point(i)).collect()
    }
}
