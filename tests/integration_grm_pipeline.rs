//! Integration tests for the graded-response conversion pipeline.
//!
//! Purpose
//! -------
//! - Validate the end-to-end path a caller takes: columnar input tables,
//!   converter construction, estimator arrays, and re-labeled parameter
//!   tables built from arrays of the estimator's shape.
//! - Exercise realistic, unsorted inputs with repeated items and persons,
//!   missing levels and unobserved level rows, rather than toy cases only.
//!
//! Coverage
//! --------
//! - `grm::table` and `grm::data`:
//!   - `Table` → `ObservationTable` / `LevelMap`, including null levels and
//!     rejection of malformed columns.
//! - `grm::converter::GRMConverter`:
//!   - `from_tables` with default and non-default `ConverterOptions`.
//!   - `make_response_array` / `make_level_array` consistency with the
//!     enumerations.
//!   - The full `make_*_df` family on correctly shaped arrays, plus
//!     `ShapeError` on mismatched ones.
//! - `grm::frames`:
//!   - Row iteration and JSON serialization of reconstructed tables.
//!
//! Exclusions
//! ----------
//! - Fine-grained validation guards and enumeration edge cases: these are
//!   covered by unit tests.
//! - Python bindings: these are exercised from Python.
use ndarray::{Array1, Array2};
use rust_irt::grm::{
    categories::LabelOrder,
    converter::GRMConverter,
    errors::{ConvertError, ShapeError, ValidationError},
    options::{ConverterOptions, DuplicateLevelPolicy, UNKNOWN_LEVEL},
    table::{Column, Table},
};

/// Purpose
/// -------
/// Build a small but non-trivial observation table in columnar form.
///
/// Layout
/// ------
/// - Items `q10`, `q2`, `q1`, `q3`; persons `s2`, `s1`, `s3`.
/// - Rows are deliberately unsorted and repeat items and persons.
/// - Responses span `1..=4`; an extra `session` column is ignored.
fn response_table() -> Table {
    Table::new()
        .with_column("item", Column::text(["q10", "q2", "q1", "q2", "q3", "q1", "q10"]))
        .with_column("person", Column::text(["s2", "s1", "s1", "s3", "s2", "s3", "s1"]))
        .with_column("response", Column::integer([2, 4, 1, 3, 2, 4, 1]))
        .with_column("session", Column::integer([1, 1, 1, 2, 2, 2, 2]))
}

/// Purpose
/// -------
/// Build a level lookup that exercises every join path.
///
/// Layout
/// ------
/// - `q1`, `q2`: level `easy`; `q10`: level `hard`.
/// - `q3`: null level, resolved to the sentinel.
/// - `q99`: never observed, ignored.
/// - `q1` repeated with a different level, dropped under keep-first.
fn level_table() -> Table {
    Table::new()
        .with_column("item", Column::text(["q1", "q2", "q10", "q3", "q99", "q1"]))
        .with_column(
            "level",
            Column::nullable_text([
                Some("easy"),
                Some("easy"),
                Some("hard"),
                None,
                Some("other"),
                Some("hard"),
            ]),
        )
}

fn build(options: &ConverterOptions) -> GRMConverter {
    GRMConverter::from_tables(&response_table(), &level_table(), options)
        .expect("GRMConverter::from_tables should accept the fixture tables")
}

#[test]
// Purpose
// -------
// Verify enumerations, counts and estimator arrays built from columnar
// tables with default options.
//
// Given
// -----
// - `response_table()` and `level_table()`; lexical order; keep-first.
//
// Expect
// ------
// - Items sorted by byte order: q1, q10, q2, q3.
// - Levels: _unknown, easy, hard ('_' sorts before lowercase letters;
//   q3 has a null level).
// - Response array rows decode back to the input triples.
// - n_grades is the largest response, 4.
fn columnar_tables_produce_consistent_arrays() {
    // Arrange
    let conv = build(&ConverterOptions::default());

    // Act
    let responses = conv.make_response_array();
    let levels = conv.make_level_array();

    // Assert
    assert_eq!(conv.items().labels(), &["q1", "q10", "q2", "q3"]);
    assert_eq!(conv.persons().labels(), &["s1", "s2", "s3"]);
    assert_eq!(conv.levels().labels(), &[UNKNOWN_LEVEL, "easy", "hard"]);
    assert_eq!(conv.n_grades(), 4);
    assert_eq!(conv.n_responses(), 7);

    assert_eq!(responses.dim(), (7, 3));
    let items = ["q10", "q2", "q1", "q2", "q3", "q1", "q10"];
    let persons = ["s2", "s1", "s1", "s3", "s2", "s3", "s1"];
    for (r, row) in responses.rows().into_iter().enumerate() {
        assert_eq!(conv.items().label(row[0] as usize), Some(items[r]));
        assert_eq!(conv.persons().label(row[1] as usize), Some(persons[r]));
    }
    assert_eq!(responses.column(2).to_vec(), vec![2, 4, 1, 3, 2, 4, 1]);

    // q1 -> easy, q10 -> hard, q2 -> easy, q3 -> _unknown
    assert_eq!(levels.to_vec(), vec![1, 2, 1, 0]);
    assert_eq!(conv.unknown_level_code(), Some(0));
}

#[test]
// Purpose
// -------
// Run the full arrays → tables round trip on estimator-shaped arrays.
//
// Given
// -----
// - The default converter (4 items, 3 persons, 3 levels, n_grades = 4).
// - Arrays filled with distinct values `0, 1, 2, ...` in row-major order.
//
// Expect
// ------
// - Each table has the documented length and ordering, and values appear
//   in row-major order next to the right labels and grades.
fn parameter_arrays_round_trip_to_labeled_tables() {
    // Arrange
    let conv = build(&ConverterOptions::default());
    let n_thresholds = conv.grade_axis().len();
    let a = Array1::from_iter((0..conv.n_items()).map(|i| i as f64));
    let b = Array2::from_shape_fn((conv.n_items(), n_thresholds), |(i, k)| {
        (i * n_thresholds + k) as f64
    });
    let t = Array1::from_iter((0..conv.n_persons()).map(|p| -(p as f64)));
    let mean = Array2::from_shape_fn((conv.n_levels(), n_thresholds), |(l, k)| {
        (l * 10 + k) as f64
    });
    let std = mean.mapv(|v| v + 0.5);

    // Act
    let a_df = conv.make_a_df(&a).expect("a has shape (n_items,)");
    let b_df = conv.make_b_df(&b).expect("b has shape (n_items, n_grades - 1)");
    let t_df = conv.make_t_df(&t).expect("t has shape (n_persons,)");
    let level_df = conv.make_level_df(&mean, &std).expect("level arrays are well shaped");

    // Assert
    assert_eq!(a_df.item, vec!["q1", "q10", "q2", "q3"]);
    assert_eq!(a_df.a.to_vec(), vec![0.0, 1.0, 2.0, 3.0]);

    assert_eq!(b_df.len(), 4 * 3);
    assert_eq!(&b_df.item[..4], &["q1", "q1", "q1", "q10"]);
    assert_eq!(&b_df.grade[..4], &[2, 3, 4, 2]);
    let row = b_df.rows().nth(5).expect("row 5 exists");
    assert_eq!((row.item, row.grade, row.b), ("q10", 4, 5.0));

    assert_eq!(t_df.person, vec!["s1", "s2", "s3"]);
    assert_eq!(t_df.t.to_vec(), vec![0.0, -1.0, -2.0]);

    assert_eq!(level_df.len(), 3 * 3);
    let last = level_df.rows().last().expect("non-empty");
    assert_eq!((last.level, last.grade, last.mean, last.std), ("hard", 4, 22.0, 22.5));
}

#[test]
// Purpose
// -------
// Ensure every reconstruction call rejects arrays whose shape does not
// match the converter exactly.
//
// Given
// -----
// - The default converter and arrays off by one element or transposed.
//
// Expect
// ------
// - `ShapeError` naming the array, with expected and actual dimensions.
fn reconstruction_rejects_mismatched_shapes() {
    let conv = build(&ConverterOptions::default());

    let err = conv.make_a_df(&Array1::<f64>::zeros(5)).expect_err("one item too many");
    assert_eq!(err, ShapeError { array: "a", expected: vec![4], actual: vec![5] });

    let err = conv.make_b_df(&Array2::<f64>::zeros((3, 4))).expect_err("transposed");
    assert_eq!(err.expected, vec![4, 3]);
    assert_eq!(err.actual, vec![3, 4]);

    let err = conv.make_t_df(&Array1::<f64>::zeros(2)).expect_err("one person short");
    assert_eq!(err.array, "t");

    let mean = Array2::<f64>::zeros((3, 3));
    let err = conv.make_level_df(&mean, &Array1::<f64>::zeros(9)).expect_err("std is flat");
    assert_eq!(err.actual, vec![9]);
}

#[test]
// Purpose
// -------
// Verify that non-default options flow through `from_tables`.
//
// Given
// -----
// - First-seen order, explicit n_grades = 6 and sentinel "none".
//
// Expect
// ------
// - Items and levels keep first-appearance order; the sentinel is used
//   for q3; the threshold axis has 5 grades, 2..=6.
fn options_change_order_sentinel_and_grades() {
    // Arrange
    let options = ConverterOptions::default()
        .with_label_order(LabelOrder::FirstSeen)
        .with_n_grades(Some(6))
        .with_unknown_level("none");

    // Act
    let conv = build(&options);

    // Assert
    assert_eq!(conv.items().labels(), &["q10", "q2", "q1", "q3"]);
    assert_eq!(conv.levels().labels(), &["hard", "easy", "none"]);
    assert_eq!(conv.make_level_array().to_vec(), vec![0, 1, 1, 2]);
    assert_eq!(conv.grade_axis().grades().collect::<Vec<_>>(), vec![2, 3, 4, 5, 6]);
}

#[test]
// Purpose
// -------
// Check that construction failures surface the right validation errors.
//
// Given
// -----
// - Conflicting level rows under `Reject`.
// - n_grades below the largest response.
// - A response table missing its `person` column.
//
// Expect
// ------
// - `ConflictingLevels`, `NGradesTooSmall` and `MissingColumn`.
fn construction_reports_validation_errors() {
    let reject = ConverterOptions::default().with_duplicate_levels(DuplicateLevelPolicy::Reject);
    let err = GRMConverter::from_tables(&response_table(), &level_table(), &reject)
        .expect_err("q1 has two levels");
    assert!(matches!(err, ValidationError::ConflictingLevels { ref item, .. } if item == "q1"));

    let too_few = ConverterOptions::default().with_n_grades(Some(3));
    let err = GRMConverter::from_tables(&response_table(), &level_table(), &too_few)
        .expect_err("largest response is 4");
    assert_eq!(err, ValidationError::NGradesTooSmall { n_grades: 3, max_response: 4 });

    let no_person = Table::new()
        .with_column("item", Column::text(["q1"]))
        .with_column("response", Column::integer([1]));
    let err = GRMConverter::from_tables(&no_person, &level_table(), &ConverterOptions::default())
        .expect_err("person column is required");
    assert_eq!(err, ValidationError::MissingColumn { table: "observation", column: "person" });
}

#[test]
// Purpose
// -------
// Verify that both error families compose through `ConvertError` and that
// reconstructed rows serialize as flat records.
//
// Given
// -----
// - A helper returning `ConvertResult` that builds a converter and
//   re-labels a discrimination array.
//
// Expect
// ------
// - `?` lifts both error types; rows serialize to `{"item":..,"a":..}`.
fn convert_error_composes_and_rows_serialize() -> Result<(), ConvertError> {
    let conv = GRMConverter::from_tables(
        &response_table(),
        &level_table(),
        &ConverterOptions::default(),
    )?;
    let a_df = conv.make_a_df(&Array1::from(vec![1.0, 1.5, 0.5, 2.0]))?;

    let json = serde_json::to_string(&a_df.rows().collect::<Vec<_>>())
        .expect("rows serialize to JSON");
    assert!(json.starts_with(r#"[{"item":"q1","a":1.0}"#), "unexpected JSON: {json}");

    let err: ConvertError =
        conv.make_t_df(&Array1::<f64>::zeros(1)).expect_err("wrong length").into();
    assert!(matches!(err, ConvertError::Shape(_)));
    Ok(())
}
