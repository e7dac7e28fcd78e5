//! grm::options — configuration for building a converter.
//!
//! Purpose
//! -------
//! Collect the knobs that influence how a [`GRMConverter`] derives its
//! enumerations and grade axis, so call sites pass one explicit, reproducible
//! value instead of loose flags.
//!
//! Conventions
//! -----------
//! - [`ConverterOptions`] is a plain data carrier. It never validates its
//!   fields; cross-checks against the data (e.g. `n_grades` versus the
//!   largest response) happen in [`GRMConverter::new`].
//! - All fields round-trip through `serde`, so options can live in whatever
//!   configuration format the host application already uses.
//!
//! [`GRMConverter`]: crate::grm::converter::GRMConverter
//! [`GRMConverter::new`]: crate::grm::converter::GRMConverter::new

use serde::{Deserialize, Serialize};

use crate::grm::categories::LabelOrder;

/// Sentinel level assigned to items that have no level-table entry.
pub const UNKNOWN_LEVEL: &str = "_unknown";

/// How repeated level-table rows for one item are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateLevelPolicy {
    /// Keep the first row; conflicting later rows are logged and dropped.
    #[default]
    KeepFirst,
    /// Keep the first row, but fail if a later row names a different level.
    Reject,
}

/// ConverterOptions — construction-time configuration.
///
/// Fields
/// ------
/// - `n_grades`: `Option<usize>`
///   Number of response categories. `None` or `Some(0)` derives it as the
///   largest observed response.
/// - `label_order`: [`LabelOrder`]
///   Ordering applied to item, person and level enumerations.
/// - `unknown_level`: `String`
///   Level label given to items absent from the level table.
/// - `duplicate_levels`: [`DuplicateLevelPolicy`]
///   Treatment of repeated level-table rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterOptions {
    pub n_grades: Option<usize>,
    pub label_order: LabelOrder,
    pub unknown_level: String,
    pub duplicate_levels: DuplicateLevelPolicy,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        ConverterOptions {
            n_grades: None,
            label_order: LabelOrder::default(),
            unknown_level: UNKNOWN_LEVEL.to_owned(),
            duplicate_levels: DuplicateLevelPolicy::default(),
        }
    }
}

impl ConverterOptions {
    pub fn with_n_grades(mut self, n_grades: Option<usize>) -> Self {
        self.n_grades = n_grades;
        self
    }

    pub fn with_label_order(mut self, label_order: LabelOrder) -> Self {
        self.label_order = label_order;
        self
    }

    pub fn with_unknown_level(mut self, unknown_level: impl Into<String>) -> Self {
        self.unknown_level = unknown_level.into();
        self
    }

    pub fn with_duplicate_levels(mut self, policy: DuplicateLevelPolicy) -> Self {
        self.duplicate_levels = policy;
        self
    }
}
