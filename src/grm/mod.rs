//! grm — graded-response data conversion for IRT estimators.
//!
//! Purpose
//! -------
//! Translate long-form graded-response data (one row per item, person and
//! response, plus an item → level lookup) into the dense integer arrays an
//! IRT estimator trains on, and translate the estimator's raw parameter
//! arrays back into labeled tables.
//!
//! Key behaviors
//! -------------
//! - Validate input tables once, at construction, via [`ObservationTable`],
//!   [`LevelMap`] and the guards in [`validation`].
//! - Derive fixed [`Categories`] for items, persons and levels, ordered by
//!   [`LabelOrder`] and never re-derived afterwards.
//! - Emit estimator inputs through
//!   [`GRMConverter::make_response_array`] and
//!   [`GRMConverter::make_level_array`].
//! - Re-label estimator outputs through the `make_*_df` family, with exact
//!   shape checks reported as [`ShapeError`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Responses are integers `>= 1`; `n_grades` is explicit or the largest
//!   response, and is never smaller than the largest response.
//! - Every observed item has exactly one level, falling back to
//!   [`UNKNOWN_LEVEL`] (or the configured sentinel).
//! - A [`GRMConverter`] is immutable after construction and can be shared
//!   across threads for read-only use.
//!
//! Conventions
//! -----------
//! - Codes are 0-based. Threshold grades run `2..=n_grades`.
//! - 2-D parameter arrays are `(labels, grades)` and are flattened
//!   label-major, grade-minor.
//! - The estimator itself is out of scope; this module only prepares and
//!   interprets its arrays.
//!
//! Downstream usage
//! ----------------
//! ```rust
//! use ndarray::array;
//! use rust_irt::grm::prelude::*;
//!
//! let obs = ObservationTable::from_records(vec![
//!     Observation::new("A", "p1", 3),
//!     Observation::new("B", "p1", 2),
//! ])?;
//! let levels = LevelMap::from_records(vec![LevelAssignment::new("A", "L1")]);
//! let conv = GRMConverter::new(&obs, &levels, None)?;
//!
//! assert_eq!(conv.make_level_array(), array![0_i64, 1]);
//! let a = conv.make_a_df(&array![0.9, 1.1])?;
//! assert_eq!(a.item, vec!["A", "B"]);
//! # Ok::<(), ConvertError>(())
//! ```
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests for its own guards and layouts.
//! - `tests/integration_grm_pipeline.rs` exercises the columnar-table entry
//!   point and the full arrays → tables round trip.

pub mod categories;
pub mod converter;
pub mod data;
pub mod errors;
pub mod frames;
pub mod options;
pub mod shape;
pub mod table;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::categories::{Categories, LabelOrder};
pub use self::converter::GRMConverter;
pub use self::data::{LevelAssignment, LevelMap, Observation, ObservationTable};
pub use self::errors::{
    ConvertError, ConvertResult, ShapeError, ShapeResult, ValidationError, ValidationResult,
};
pub use self::frames::{
    AbilityRow, AbilityTable, DiscriminationRow, DiscriminationTable, LabelBase, LabelGradeBase,
    LevelParamRow, LevelParamTable, ThresholdRow, ThresholdTable,
};
pub use self::options::{ConverterOptions, DuplicateLevelPolicy, UNKNOWN_LEVEL};
pub use self::shape::GradeAxis;
pub use self::table::{Column, Table};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_irt::grm::prelude::*;
//
// to import the main conversion surface in a single line.

pub mod prelude {
    pub use super::{
        Column, ConvertError, ConvertResult, ConverterOptions, GRMConverter, LabelOrder,
        LevelAssignment, LevelMap, Observation, ObservationTable, ShapeError, Table,
        ValidationError,
    };
}
