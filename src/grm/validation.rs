//! grm::validation — shared input guards for converter construction.
//!
//! Purpose
//! -------
//! Centralize the checks applied to observation and level tables before any
//! enumeration is derived: required columns, column types and lengths,
//! response range, the grade count, and duplicate level assignments.
//!
//! Conventions
//! -----------
//! - Every guard returns [`ValidationResult`] and never panics on user input.
//! - Guards stop at the first violation and report the offending row or
//!   value in the error payload.
//! - Table names used in messages are `"observation"` and `"level"`.

use std::collections::HashMap;

use crate::grm::{
    data::LevelAssignment,
    errors::{ValidationError, ValidationResult},
    options::DuplicateLevelPolicy,
    table::{Column, Table},
};

/// Look up a required column or fail with `MissingColumn`.
pub fn require_column<'a>(
    table: &'a Table, table_name: &'static str, column: &'static str,
) -> ValidationResult<&'a Column> {
    table.column(column).ok_or(ValidationError::MissingColumn { table: table_name, column })
}

/// Check that all named columns share the length of the first one.
///
/// Returns the common length. An empty `columns` slice yields `0`.
pub fn require_equal_lengths(
    table_name: &'static str, columns: &[(&'static str, usize)],
) -> ValidationResult<usize> {
    let Some(&(_, expected)) = columns.first() else {
        return Ok(0);
    };
    for &(column, actual) in &columns[1..] {
        if actual != expected {
            return Err(ValidationError::ColumnLengthMismatch {
                table: table_name,
                column,
                expected,
                actual,
            });
        }
    }
    Ok(expected)
}

/// Borrow the values of a text column.
pub fn text_values<'a>(
    column_name: &'static str, column: &'a Column,
) -> ValidationResult<&'a [Option<String>]> {
    match column {
        Column::Text(values) => Ok(values),
        _ => Err(ValidationError::NonTextColumn { column: column_name }),
    }
}

/// Collect the labels of a text column, rejecting missing ones.
pub fn required_labels(
    column_name: &'static str, values: &[Option<String>],
) -> ValidationResult<Vec<String>> {
    values
        .iter()
        .enumerate()
        .map(|(row, value)| {
            value.clone().ok_or(ValidationError::MissingLabel { column: column_name, row })
        })
        .collect()
}

/// Borrow the response column, which must hold integers.
pub fn integer_responses(column: &Column) -> ValidationResult<&[i64]> {
    match column {
        Column::Integer(values) => Ok(values),
        other => Err(ValidationError::NonIntegerResponse { found: other.dtype() }),
    }
}

/// Validate graded responses and return the largest one.
///
/// Errors
/// ------
/// - `EmptyObservations` when `responses` is empty.
/// - `ResponseBelowMinimum { row, value }` for the first response `< 1`.
pub fn validate_responses(responses: &[i64]) -> ValidationResult<i64> {
    let mut max_response = match responses.first() {
        Some(&first) => first,
        None => return Err(ValidationError::EmptyObservations),
    };
    for (row, &value) in responses.iter().enumerate() {
        if value < 1 {
            return Err(ValidationError::ResponseBelowMinimum { row, value });
        }
        max_response = max_response.max(value);
    }
    Ok(max_response)
}

/// Resolve the grade count from an explicit value or the data.
///
/// `None` and `Some(0)` both derive the count from `max_response`. Any
/// other explicit `n_grades` must be able to represent every observed
/// response, i.e. `n_grades >= max_response`.
pub fn resolve_n_grades(explicit: Option<usize>, max_response: i64) -> ValidationResult<usize> {
    match explicit {
        None | Some(0) => Ok(usize::try_from(max_response).unwrap_or(usize::MAX)),
        Some(n_grades) => match i64::try_from(n_grades) {
            Ok(n) if n < max_response => {
                Err(ValidationError::NGradesTooSmall { n_grades, max_response })
            }
            // Covers values above i64::MAX, which exceed any response.
            _ => Ok(n_grades),
        },
    }
}

/// Largest number of rows a label × grade table may have.
///
/// Each row stores a `String` label, so the label column is the binding
/// allocation limit.
pub const MAX_GRADE_TABLE_ROWS: usize = isize::MAX as usize / std::mem::size_of::<String>();

/// Check that a `n_labels × (n_grades - 1)` cross-product table fits in
/// memory addressing limits.
///
/// Errors
/// ------
/// - `GradeTableTooLarge` when the row count overflows `usize` or exceeds
///   [`MAX_GRADE_TABLE_ROWS`].
pub fn check_grade_table_size(n_labels: usize, n_grades: usize) -> ValidationResult<usize> {
    let n_thresholds = n_grades.saturating_sub(1);
    match n_labels.checked_mul(n_thresholds) {
        Some(rows) if rows <= MAX_GRADE_TABLE_ROWS => Ok(rows),
        _ => Err(ValidationError::GradeTableTooLarge { n_grades, n_labels, n_thresholds }),
    }
}

/// Collapse level-table rows to one entry per item, keeping the first.
///
/// Returns a map from item label to its (possibly missing) level label.
/// Later rows that disagree with the kept one are either logged at `warn`
/// (`KeepFirst`) or rejected with `ConflictingLevels` (`Reject`).
pub fn collapse_level_rows(
    rows: &[LevelAssignment], policy: DuplicateLevelPolicy,
) -> ValidationResult<HashMap<&str, Option<&str>>> {
    let mut first: HashMap<&str, Option<&str>> = HashMap::with_capacity(rows.len());
    for row in rows {
        let level = row.level.as_deref();
        match first.get(row.item.as_str()) {
            None => {
                first.insert(row.item.as_str(), level);
            }
            Some(&kept) if kept == level => {}
            Some(&kept) => {
                let kept_label = kept.unwrap_or("<missing>");
                let dropped_label = level.unwrap_or("<missing>");
                if policy == DuplicateLevelPolicy::Reject {
                    return Err(ValidationError::ConflictingLevels {
                        item: row.item.clone(),
                        first: kept_label.to_owned(),
                        second: dropped_label.to_owned(),
                    });
                }
                tracing::warn!(
                    item = %row.item,
                    kept = kept_label,
                    dropped = dropped_label,
                    "conflicting level assignment; keeping the first"
                );
            }
        }
    }
    Ok(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover every error branch of the guards above plus their
    // success paths. Table-level wiring is exercised in `grm::data`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Ensure `validate_responses` returns the maximum for valid input.
    //
    // Given
    // -----
    // - Responses `[2, 5, 1, 3]`.
    //
    // Expect
    // ------
    // - `Ok(5)`.
    fn validate_responses_returns_max_for_valid_input() {
        let result = validate_responses(&[2, 5, 1, 3]);

        assert_eq!(result, Ok(5));
    }

    #[test]
    // Purpose
    // -------
    // Verify that the first response below 1 is reported with its row.
    //
    // Given
    // -----
    // - Responses `[2, 0, -1]`.
    //
    // Expect
    // ------
    // - `Err(ResponseBelowMinimum { row: 1, value: 0 })`.
    fn validate_responses_rejects_first_value_below_one() {
        let result = validate_responses(&[2, 0, -1]);

        assert_eq!(result, Err(ValidationError::ResponseBelowMinimum { row: 1, value: 0 }));
    }

    #[test]
    fn validate_responses_rejects_empty_input() {
        assert_eq!(validate_responses(&[]), Err(ValidationError::EmptyObservations));
    }

    #[test]
    // Purpose
    // -------
    // Cover the three branches of `resolve_n_grades`.
    //
    // Given
    // -----
    // - Max response 3 with `None`, `Some(0)`, `Some(5)`, `Some(2)` and
    //   `Some(usize::MAX)`.
    //
    // Expect
    // ------
    // - Derived 3 for `None` and `Some(0)`, explicit 5, `NGradesTooSmall`
    //   for 2, and `usize::MAX` accepted rather than wrapping negative.
    fn resolve_n_grades_derives_accepts_and_rejects() {
        assert_eq!(resolve_n_grades(None, 3), Ok(3));
        assert_eq!(resolve_n_grades(Some(0), 3), Ok(3));
        assert_eq!(resolve_n_grades(Some(5), 3), Ok(5));
        assert_eq!(
            resolve_n_grades(Some(2), 3),
            Err(ValidationError::NGradesTooSmall { n_grades: 2, max_response: 3 })
        );
        assert_eq!(resolve_n_grades(Some(usize::MAX), 3), Ok(usize::MAX));
    }

    #[test]
    // Purpose
    // -------
    // Verify the label × grade table size guard.
    //
    // Given
    // -----
    // - Small tables, a product that overflows `usize`, and one that fits
    //   in `usize` but exceeds `MAX_GRADE_TABLE_ROWS`.
    //
    // Expect
    // ------
    // - Row counts for the small cases; `GradeTableTooLarge` otherwise.
    fn check_grade_table_size_rejects_oversized_axes() {
        assert_eq!(check_grade_table_size(2, 4), Ok(6));
        assert_eq!(check_grade_table_size(3, 1), Ok(0));
        assert_eq!(
            check_grade_table_size(2, usize::MAX),
            Err(ValidationError::GradeTableTooLarge {
                n_grades: usize::MAX,
                n_labels: 2,
                n_thresholds: usize::MAX - 1,
            })
        );
        let n_grades = MAX_GRADE_TABLE_ROWS + 2;
        assert!(matches!(
            check_grade_table_size(1, n_grades),
            Err(ValidationError::GradeTableTooLarge { n_labels: 1, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Verify column lookup and type guards.
    //
    // Given
    // -----
    // - A table with a float `response` column and a text `item` column.
    //
    // Expect
    // ------
    // - Missing `person` → `MissingColumn`.
    // - Float responses → `NonIntegerResponse { found: "float" }`.
    // - Integer column used as labels → `NonTextColumn`.
    fn column_guards_report_missing_and_mistyped_columns() {
        let table = Table::new()
            .with_column("item", Column::text(["A"]))
            .with_column("response", Column::float([1.0]));

        let missing = require_column(&table, "observation", "person");
        let response = require_column(&table, "observation", "response").expect("present");
        let integer_column = Column::integer([1]);
        let not_text = text_values("person", &integer_column);

        assert_eq!(
            missing,
            Err(ValidationError::MissingColumn { table: "observation", column: "person" })
        );
        assert_eq!(
            integer_responses(response),
            Err(ValidationError::NonIntegerResponse { found: "float" })
        );
        assert_eq!(not_text, Err(ValidationError::NonTextColumn { column: "person" }));
    }

    #[test]
    fn require_equal_lengths_reports_first_mismatch() {
        let result = require_equal_lengths("observation", &[("item", 3), ("person", 3), ("response", 2)]);

        assert_eq!(
            result,
            Err(ValidationError::ColumnLengthMismatch {
                table: "observation",
                column: "response",
                expected: 3,
                actual: 2,
            })
        );
    }

    #[test]
    fn required_labels_rejects_missing_entries() {
        let values = vec![Some("p1".to_owned()), None];

        let result = required_labels("person", &values);

        assert_eq!(result, Err(ValidationError::MissingLabel { column: "person", row: 1 }));
    }

    #[test]
    // Purpose
    // -------
    // Verify keep-first collapsing and both duplicate policies.
    //
    // Given
    // -----
    // - Rows `(A, L1)`, `(A, L2)`, `(A, L1)`, `(B, None)`.
    //
    // Expect
    // ------
    // - `KeepFirst`: `A -> L1`, `B -> None`.
    // - `Reject`: `ConflictingLevels { item: A, first: L1, second: L2 }`.
    fn collapse_level_rows_keeps_first_or_rejects_conflicts() {
        let rows = vec![
            LevelAssignment::new("A", "L1"),
            LevelAssignment::new("A", "L2"),
            LevelAssignment::new("A", "L1"),
            LevelAssignment::unassigned("B"),
        ];

        let kept = collapse_level_rows(&rows, DuplicateLevelPolicy::KeepFirst).expect("keep-first");
        let rejected = collapse_level_rows(&rows, DuplicateLevelPolicy::Reject);

        assert_eq!(kept.len(), 2);
        assert_eq!(kept.get("A"), Some(&Some("L1")));
        assert_eq!(kept.get("B"), Some(&None));
        assert_eq!(
            rejected,
            Err(ValidationError::ConflictingLevels {
                item: "A".to_owned(),
                first: "L1".to_owned(),
                second: "L2".to_owned(),
            })
        );
    }

    #[test]
    fn collapse_level_rows_accepts_identical_duplicates_under_reject() {
        let rows = vec![LevelAssignment::new("A", "L1"), LevelAssignment::new("A", "L1")];

        let result = collapse_level_rows(&rows, DuplicateLevelPolicy::Reject);

        assert!(result.is_ok(), "identical duplicates are not a conflict: {result:?}");
    }
}
