//! Grade axis and shape checks for estimator arrays.
//!
//! Item- and level-wise boundary parameters are indexed by the grades
//! `2..=n_grades`: a response scale with `n_grades` categories has
//! `n_grades - 1` thresholds between consecutive categories, and threshold
//! `g` separates category `g - 1` from category `g`.
use ndarray::{ArrayBase, Data, Dimension};

use crate::grm::errors::{ShapeError, ShapeResult};

/// First grade on the threshold axis.
pub const FIRST_GRADE: usize = 2;

/// The ordered grades `2..=n_grades`.
///
/// Invariant: `n_grades >= 1`; with `n_grades == 1` the axis is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeAxis {
    n_grades: usize,
}

impl GradeAxis {
    pub fn new(n_grades: usize) -> GradeAxis {
        GradeAxis { n_grades }
    }

    pub fn n_grades(&self) -> usize {
        self.n_grades
    }

    /// Number of thresholds, `n_grades - 1`.
    pub fn len(&self) -> usize {
        self.n_grades.saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grades in ascending order.
    pub fn grades(&self) -> std::ops::RangeInclusive<usize> {
        FIRST_GRADE..=self.n_grades
    }
}

/// Require `array` to have exactly `expected` as its shape.
///
/// The check compares the full shape, so an array of the wrong rank fails
/// even when its element count matches.
pub fn check_shape<S, D>(
    name: &'static str, array: &ArrayBase<S, D>, expected: &[usize],
) -> ShapeResult<()>
where
    S: Data,
    D: Dimension,
{
    if array.shape() == expected {
        Ok(())
    } else {
        Err(ShapeError { array: name, expected: expected.to_vec(), actual: array.shape().to_vec() })
    }
}
