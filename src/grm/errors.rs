//! grm::errors — error types for graded-response data conversion.
//!
//! Purpose
//! -------
//! Provide the error enums and result aliases used by the converter and its
//! validation helpers, together with a conversion layer to Python exceptions
//! for the PyO3 bindings. Two failure families exist:
//!
//! - [`ValidationError`]: malformed input tables detected while building a
//!   [`GRMConverter`](crate::grm::converter::GRMConverter).
//! - [`ShapeError`]: an estimator array handed back for re-labeling does not
//!   have the exact dimensions the converter expects.
//!
//! [`ConvertError`] wraps both for callers that want a single error type
//! across construction and reconstruction.
//!
//! Conventions
//! -----------
//! - Row indices in payloads are **0-based** and refer to the input table.
//! - Messages are phrased in terms of the violated constraint ("response
//!   must be >= 1") and embed the offending value.
//! - At the Python boundary every variant becomes a `ValueError` carrying
//!   the `Display` message verbatim.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for construction-time validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result alias for reconstruction calls that check array shapes.
pub type ShapeResult<T> = Result<T, ShapeError>;

/// Result alias for code paths that may raise either error family.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// ValidationError — malformed or out-of-range input tables.
///
/// Variants
/// --------
/// - `MissingColumn`: a required column is absent from an input table.
/// - `ColumnLengthMismatch`: columns of one table have different lengths.
/// - `NonTextColumn`: a label column (item, person, level) is not text.
/// - `NonIntegerResponse`: the response column is not an integer column.
/// - `MissingLabel`: an item or person label is null in the observations.
/// - `EmptyObservations`: the observation table has no rows.
/// - `ResponseBelowMinimum`: a response is smaller than 1.
/// - `NGradesTooSmall`: an explicit `n_grades` cannot hold the observed
///   responses.
/// - `GradeTableTooLarge`: `n_grades` is so large that a label × grade
///   table could not be allocated.
/// - `ConflictingLevels`: the level table assigns two different levels to
///   one item and the duplicate policy is `Reject`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{table} table is missing required column '{column}'")]
    MissingColumn { table: &'static str, column: &'static str },

    #[error(
        "{table} table columns must have equal length: '{column}' has {actual} rows, expected {expected}"
    )]
    ColumnLengthMismatch { table: &'static str, column: &'static str, expected: usize, actual: usize },

    #[error("column '{column}' must hold text labels")]
    NonTextColumn { column: &'static str },

    #[error("response column must have an integer type; got {found}")]
    NonIntegerResponse { found: &'static str },

    #[error("column '{column}' has a missing label at row {row}")]
    MissingLabel { column: &'static str, row: usize },

    #[error("observation table is empty; at least one response is required")]
    EmptyObservations,

    #[error("response must be >= 1; row {row} has value {value}")]
    ResponseBelowMinimum { row: usize, value: i64 },

    #[error("n_grades ({n_grades}) must be at least the maximum observed response ({max_response})")]
    NGradesTooSmall { n_grades: usize, max_response: i64 },

    #[error(
        "n_grades ({n_grades}) is too large: {n_labels} labels x {n_thresholds} thresholds exceeds the addressable table size"
    )]
    GradeTableTooLarge { n_grades: usize, n_labels: usize, n_thresholds: usize },

    #[error("item '{item}' is assigned conflicting levels '{first}' and '{second}'")]
    ConflictingLevels { item: String, first: String, second: String },
}

/// ShapeError — estimator array does not match the required dimensions.
///
/// Fields
/// ------
/// - `array`: name of the offending argument (`"a"`, `"b"`, `"t"`, `"mean"`,
///   `"std"`).
/// - `expected`: exact shape required by the converter state.
/// - `actual`: shape that was supplied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("array '{array}' must have shape {expected:?}; got {actual:?}")]
pub struct ShapeError {
    pub array: &'static str,
    pub expected: Vec<usize>,
    pub actual: Vec<usize>,
}

/// Umbrella error over both failure families.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Shape(#[from] ShapeError),
}

#[cfg(feature = "python-bindings")]
impl From<ValidationError> for PyErr {
    fn from(err: ValidationError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(feature = "python-bindings")]
impl From<ShapeError> for PyErr {
    fn from(err: ShapeError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(feature = "python-bindings")]
impl From<ConvertError> for PyErr {
    fn from(err: ConvertError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
