//! grm::data — validated input containers for the converter.
//!
//! Purpose
//! -------
//! Provide the two inputs a [`GRMConverter`] is built from:
//!
//! - [`ObservationTable`]: long-form graded responses, one row per
//!   (item, person, response) triple.
//! - [`LevelMap`]: item → level lookup rows, possibly with repeats and
//!   missing levels.
//!
//! Both can be built from typed records or from a columnar [`Table`].
//! Construction runs the guards in [`crate::grm::validation`], so downstream
//! code may rely on the invariants below without re-checking.
//!
//! Invariants & assumptions
//! ------------------------
//! - `ObservationTable` is non-empty, its three columns have equal length,
//!   item/person labels are present, and every response is `>= 1`.
//! - `LevelMap` rows are stored exactly as supplied (row order and repeats
//!   preserved); de-duplication is applied by the converter according to
//!   its [`DuplicateLevelPolicy`](crate::grm::options::DuplicateLevelPolicy).
//! - Level-table rows whose item label is missing can never join to an
//!   observed item and are dropped when reading a [`Table`].
//!
//! Testing notes
//! -------------
//! - Unit tests cover the happy path for both entry points and each
//!   rejection path reachable from a [`Table`].
//!
//! [`GRMConverter`]: crate::grm::converter::GRMConverter

use serde::{Deserialize, Serialize};

use crate::grm::{
    errors::ValidationResult,
    table::Table,
    validation::{
        integer_responses, require_column, require_equal_lengths, required_labels, text_values,
        validate_responses,
    },
};

const OBSERVATION: &str = "observation";
const LEVEL: &str = "level";

/// One graded response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub item: String,
    pub person: String,
    pub response: i64,
}

impl Observation {
    pub fn new(item: impl Into<String>, person: impl Into<String>, response: i64) -> Observation {
        Observation { item: item.into(), person: person.into(), response }
    }
}

/// One row of the item → level lookup. `level = None` marks a missing
/// level, which is resolved to the unknown sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelAssignment {
    pub item: String,
    pub level: Option<String>,
}

impl LevelAssignment {
    pub fn new(item: impl Into<String>, level: impl Into<String>) -> LevelAssignment {
        LevelAssignment { item: item.into(), level: Some(level.into()) }
    }

    pub fn unassigned(item: impl Into<String>) -> LevelAssignment {
        LevelAssignment { item: item.into(), level: None }
    }
}

/// `ObservationTable` — validated long-form responses.
///
/// Fields
/// ------
/// - `items`, `persons`: labels per row.
/// - `responses`: graded responses per row, all `>= 1`.
/// - `max_response`: the largest response, cached at construction.
///
/// Invariants
/// ----------
/// - `items.len() == persons.len() == responses.len() > 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationTable {
    items: Vec<String>,
    persons: Vec<String>,
    responses: Vec<i64>,
    max_response: i64,
}

impl ObservationTable {
    /// Construct a validated table from parallel columns.
    ///
    /// Errors
    /// ------
    /// - `ValidationError::ColumnLengthMismatch` if the columns differ in
    ///   length.
    /// - `ValidationError::EmptyObservations` if there are no rows.
    /// - `ValidationError::ResponseBelowMinimum` for the first response `< 1`.
    pub fn new(
        items: Vec<String>, persons: Vec<String>, responses: Vec<i64>,
    ) -> ValidationResult<ObservationTable> {
        require_equal_lengths(
            OBSERVATION,
            &[("item", items.len()), ("person", persons.len()), ("response", responses.len())],
        )?;
        let max_response = validate_responses(&responses)?;
        Ok(ObservationTable { items, persons, responses, max_response })
    }

    /// Construct from typed records, preserving their order.
    pub fn from_records<I>(records: I) -> ValidationResult<ObservationTable>
    where
        I: IntoIterator<Item = Observation>,
    {
        let records = records.into_iter();
        let (lower, _) = records.size_hint();
        let mut items = Vec::with_capacity(lower);
        let mut persons = Vec::with_capacity(lower);
        let mut responses = Vec::with_capacity(lower);
        for Observation { item, person, response } in records {
            items.push(item);
            persons.push(person);
            responses.push(response);
        }
        ObservationTable::new(items, persons, responses)
    }

    /// Construct from a columnar table with `item`, `person` and `response`
    /// columns. Extra columns are ignored.
    ///
    /// Errors
    /// ------
    /// In addition to those of [`ObservationTable::new`]:
    /// - `MissingColumn` when a required column is absent.
    /// - `NonTextColumn` when `item` or `person` is not text.
    /// - `NonIntegerResponse` when `response` is not an integer column.
    /// - `MissingLabel` when an item or person label is null.
    pub fn from_table(table: &Table) -> ValidationResult<ObservationTable> {
        let item_col = require_column(table, OBSERVATION, "item")?;
        let person_col = require_column(table, OBSERVATION, "person")?;
        let response_col = require_column(table, OBSERVATION, "response")?;

        let items = required_labels("item", text_values("item", item_col)?)?;
        let persons = required_labels("person", text_values("person", person_col)?)?;
        let responses = integer_responses(response_col)?.to_vec();

        ObservationTable::new(items, persons, responses)
    }

    /// Number of observation rows (`n_responses`).
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn persons(&self) -> &[String] {
        &self.persons
    }

    pub fn responses(&self) -> &[i64] {
        &self.responses
    }

    pub fn max_response(&self) -> i64 {
        self.max_response
    }

    /// Iterate rows as `(item, person, response)`.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &str, i64)> {
        self.items
            .iter()
            .zip(&self.persons)
            .zip(&self.responses)
            .map(|((item, person), &response)| (item.as_str(), person.as_str(), response))
    }
}

/// `LevelMap` — raw item → level rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelMap {
    rows: Vec<LevelAssignment>,
}

impl LevelMap {
    pub fn new(rows: Vec<LevelAssignment>) -> LevelMap {
        LevelMap { rows }
    }

    pub fn from_records<I>(records: I) -> LevelMap
    where
        I: IntoIterator<Item = LevelAssignment>,
    {
        LevelMap { rows: records.into_iter().collect() }
    }

    /// Construct from a columnar table with `item` and `level` text columns.
    ///
    /// Errors
    /// ------
    /// - `MissingColumn`, `NonTextColumn` or `ColumnLengthMismatch` when the
    ///   table does not have two equal-length text columns `item`, `level`.
    pub fn from_table(table: &Table) -> ValidationResult<LevelMap> {
        let item_col = require_column(table, LEVEL, "item")?;
        let level_col = require_column(table, LEVEL, "level")?;
        let items = text_values("item", item_col)?;
        let levels = text_values("level", level_col)?;
        require_equal_lengths(LEVEL, &[("item", items.len()), ("level", levels.len())])?;

        let rows = items
            .iter()
            .zip(levels)
            .filter_map(|(item, level)| {
                item.as_ref().map(|item| LevelAssignment { item: item.clone(), level: level.clone() })
            })
            .collect();
        Ok(LevelMap { rows })
    }

    pub fn rows(&self) -> &[LevelAssignment] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<Vec<LevelAssignment>> for LevelMap {
    fn from(rows: Vec<LevelAssignment>) -> Self {
        LevelMap::new(rows)
    }
}
