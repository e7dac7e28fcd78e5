//! grm::converter — long-form responses ↔ estimator arrays.
//!
//! Purpose
//! -------
//! Own the canonical item, person and level enumerations derived from one
//! observation table and one level map, and use them to
//!
//! 1. emit the integer arrays a graded-response estimator trains on
//!    ([`GRMConverter::make_response_array`], [`GRMConverter::make_level_array`]),
//! 2. re-label the raw parameter arrays the estimator returns
//!    ([`GRMConverter::make_a_df`], [`GRMConverter::make_b_df`],
//!    [`GRMConverter::make_t_df`], [`GRMConverter::make_level_df`]).
//!
//! Key behaviors
//! -------------
//! - All enumerations and codes are computed once in the constructor; every
//!   later call is a pure function of that state.
//! - Items are left-joined against the de-duplicated level map; items with
//!   no entry (or a missing level) are assigned the unknown sentinel, and the
//!   level enumeration is derived from that joined result.
//! - Reconstruction checks the exact shape of each incoming array and
//!   flattens 2-D arrays in row-major order, i.e. label-major / grade-minor,
//!   to line up with the cross-product base tables.
//!
//! Invariants & assumptions
//! ------------------------
//! - `item_codes[r] < n_items` and `person_codes[r] < n_persons` for every
//!   observation row `r`.
//! - `item_levels.len() == n_items` and `item_levels[i] < n_levels`.
//! - `n_grades >= max(response) >= 1`.
//!
//! Conventions
//! -----------
//! - Array element types are `i64` for codes and responses, `f64` for
//!   estimator parameters.
//! - Grades on the threshold axis run `2..=n_grades`.
//!
//! Testing notes
//! -------------
//! - Unit tests below cover the worked example (two items, one unmatched),
//!   ordering options, each reconstruction shape check, and row layout of
//!   the cross-product tables. `tests/integration_grm_pipeline.rs` runs the
//!   full table → arrays → tables round trip.

use ndarray::{Array1, Array2, ArrayBase, Data, Dimension};

use crate::grm::{
    categories::Categories,
    data::{LevelMap, ObservationTable},
    errors::{ShapeResult, ValidationResult},
    frames::{
        AbilityTable, DiscriminationTable, LabelBase, LabelGradeBase, LevelParamTable,
        ThresholdTable,
    },
    options::ConverterOptions,
    shape::{GradeAxis, check_shape},
    table::Table,
    validation::{check_grade_table_size, collapse_level_rows, resolve_n_grades},
};

/// GRMConverter — fixed label ↔ code state for one dataset.
///
/// Fields
/// ------
/// - `items`, `persons`, `levels`: canonical enumerations.
/// - `item_codes`, `person_codes`, `responses`: per-observation columns, in
///   input row order.
/// - `item_levels`: level code of each item, indexed by item code.
/// - `grades`: threshold axis `2..=n_grades`.
/// - `unknown_level`: sentinel label used for unmatched items.
///
/// Performance
/// -----------
/// - Construction is O(R + I log I + P log P) for R observations, I items
///   and P persons. Array and table builders are linear in their output.
#[derive(Debug, Clone, PartialEq)]
pub struct GRMConverter {
    items: Categories,
    persons: Categories,
    levels: Categories,
    item_codes: Vec<usize>,
    person_codes: Vec<usize>,
    responses: Vec<i64>,
    item_levels: Vec<usize>,
    grades: GradeAxis,
    unknown_level: String,
}

impl GRMConverter {
    /// Build a converter with default options and an optional grade count.
    ///
    /// Parameters
    /// ----------
    /// - `observations`: validated long-form responses.
    /// - `levels`: item → level rows; may be empty.
    /// - `n_grades`: number of response categories; `None` uses the largest
    ///   observed response.
    ///
    /// Errors
    /// ------
    /// - `ValidationError::NGradesTooSmall` when `n_grades` is below the
    ///   largest observed response.
    pub fn new(
        observations: &ObservationTable, levels: &LevelMap, n_grades: Option<usize>,
    ) -> ValidationResult<GRMConverter> {
        let options = ConverterOptions::default().with_n_grades(n_grades);
        GRMConverter::with_options(observations, levels, &options)
    }

    /// Build a converter from columnar tables.
    ///
    /// Errors
    /// ------
    /// Any error from [`ObservationTable::from_table`], [`LevelMap::from_table`]
    /// or [`GRMConverter::with_options`].
    pub fn from_tables(
        observations: &Table, levels: &Table, options: &ConverterOptions,
    ) -> ValidationResult<GRMConverter> {
        let observations = ObservationTable::from_table(observations)?;
        let levels = LevelMap::from_table(levels)?;
        GRMConverter::with_options(&observations, &levels, options)
    }

    /// Build a converter with explicit options.
    ///
    /// Errors
    /// ------
    /// - `ValidationError::NGradesTooSmall` when `options.n_grades` is below
    ///   the largest observed response.
    /// - `ValidationError::GradeTableTooLarge` when `n_grades` would make
    ///   the item × grade or level × grade table unaddressable.
    /// - `ValidationError::ConflictingLevels` when the level map assigns two
    ///   levels to one item and `options.duplicate_levels` is `Reject`.
    pub fn with_options(
        observations: &ObservationTable, levels: &LevelMap, options: &ConverterOptions,
    ) -> ValidationResult<GRMConverter> {
        let n_grades = resolve_n_grades(options.n_grades, observations.max_response())?;
        let level_of = collapse_level_rows(levels.rows(), options.duplicate_levels)?;

        let (items, item_codes) = Categories::encode(observations.items(), options.label_order);
        let (persons, person_codes) =
            Categories::encode(observations.persons(), options.label_order);

        let mut n_unmatched = 0usize;
        let joined: Vec<&str> = items
            .iter()
            .map(|item| match level_of.get(item).copied().flatten() {
                Some(level) => level,
                None => {
                    n_unmatched += 1;
                    options.unknown_level.as_str()
                }
            })
            .collect();
        let (level_cats, item_levels) = Categories::encode(&joined, options.label_order);
        check_grade_table_size(items.len().max(level_cats.len()), n_grades)?;

        if n_unmatched > 0 {
            tracing::debug!(
                n_unmatched,
                sentinel = %options.unknown_level,
                "items without a level entry assigned the sentinel level"
            );
        }
        tracing::debug!(
            n_items = items.len(),
            n_persons = persons.len(),
            n_levels = level_cats.len(),
            n_responses = observations.len(),
            n_grades,
            label_order = ?options.label_order,
            "built graded-response converter"
        );

        Ok(GRMConverter {
            items,
            persons,
            levels: level_cats,
            item_codes,
            person_codes,
            responses: observations.responses().to_vec(),
            item_levels,
            grades: GradeAxis::new(n_grades),
            unknown_level: options.unknown_level.clone(),
        })
    }

    // ---- Counts and enumerations ------------------------------------------

    pub fn n_items(&self) -> usize {
        self.items.len()
    }

    pub fn n_persons(&self) -> usize {
        self.persons.len()
    }

    pub fn n_levels(&self) -> usize {
        self.levels.len()
    }

    /// Number of observation rows.
    pub fn n_responses(&self) -> usize {
        self.responses.len()
    }

    pub fn n_grades(&self) -> usize {
        self.grades.n_grades()
    }

    pub fn items(&self) -> &Categories {
        &self.items
    }

    pub fn persons(&self) -> &Categories {
        &self.persons
    }

    pub fn levels(&self) -> &Categories {
        &self.levels
    }

    pub fn grade_axis(&self) -> GradeAxis {
        self.grades
    }

    /// Code of the unknown sentinel, if any item was assigned it.
    pub fn unknown_level_code(&self) -> Option<usize> {
        self.levels.code(&self.unknown_level)
    }

    /// Level label of the item with code `item`.
    pub fn level_of_item(&self, item: usize) -> Option<&str> {
        self.item_levels.get(item).and_then(|&level| self.levels.label(level))
    }

    // ---- Estimator inputs --------------------------------------------------

    /// Coded observations, shape `(n_responses, 3)`.
    ///
    /// Columns are `[item_code, person_code, response]`; rows follow the
    /// input observation order.
    pub fn make_response_array(&self) -> Array2<i64> {
        Array2::from_shape_fn((self.n_responses(), 3), |(row, col)| match col {
            0 => self.item_codes[row] as i64,
            1 => self.person_codes[row] as i64,
            _ => self.responses[row],
        })
    }

    /// Level code of each item in canonical item order, shape `(n_items,)`.
    pub fn make_level_array(&self) -> Array1<i64> {
        self.item_levels.iter().map(|&level| level as i64).collect()
    }

    // ---- Base index tables -------------------------------------------------

    /// Item labels in code order.
    pub fn item_base(&self) -> LabelBase {
        LabelBase::new(self.items.labels().to_vec())
    }

    /// Person labels in code order.
    pub fn person_base(&self) -> LabelBase {
        LabelBase::new(self.persons.labels().to_vec())
    }

    /// Item × grade cross product, item-major.
    pub fn item_grade_base(&self) -> LabelGradeBase {
        LabelGradeBase::cross(self.items.labels(), self.grades)
    }

    /// Level × grade cross product, level-major.
    pub fn level_grade_base(&self) -> LabelGradeBase {
        LabelGradeBase::cross(self.levels.labels(), self.grades)
    }

    // ---- Reconstruction ----------------------------------------------------

    /// Attach item discriminations to the item base.
    ///
    /// Errors
    /// ------
    /// - `ShapeError` unless `a.shape() == [n_items]`.
    pub fn make_a_df<S, D>(&self, a: &ArrayBase<S, D>) -> ShapeResult<DiscriminationTable>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        check_shape("a", a, &[self.n_items()])?;
        tracing::trace!(n_rows = self.n_items(), "labeling discrimination parameters");
        Ok(DiscriminationTable::from_base(self.item_base(), flatten(a)))
    }

    /// Attach item thresholds to the item × grade base.
    ///
    /// Errors
    /// ------
    /// - `ShapeError` unless `b.shape() == [n_items, n_grades - 1]`.
    pub fn make_b_df<S, D>(&self, b: &ArrayBase<S, D>) -> ShapeResult<ThresholdTable>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        check_shape("b", b, &[self.n_items(), self.grades.len()])?;
        tracing::trace!(n_rows = b.len(), "labeling threshold parameters");
        Ok(ThresholdTable::from_base(self.item_grade_base(), flatten(b)))
    }

    /// Attach person abilities to the person base.
    ///
    /// Errors
    /// ------
    /// - `ShapeError` unless `t.shape() == [n_persons]`.
    pub fn make_t_df<S, D>(&self, t: &ArrayBase<S, D>) -> ShapeResult<AbilityTable>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        check_shape("t", t, &[self.n_persons()])?;
        tracing::trace!(n_rows = self.n_persons(), "labeling person abilities");
        Ok(AbilityTable::from_base(self.person_base(), flatten(t)))
    }

    /// Attach level-pooled threshold means and standard deviations to the
    /// level × grade base.
    ///
    /// Errors
    /// ------
    /// - `ShapeError` unless both arrays have shape `[n_levels, n_grades - 1]`;
    ///   `mean` is checked first.
    pub fn make_level_df<S1, D1, S2, D2>(
        &self, mean: &ArrayBase<S1, D1>, std: &ArrayBase<S2, D2>,
    ) -> ShapeResult<LevelParamTable>
    where
        S1: Data<Elem = f64>,
        D1: Dimension,
        S2: Data<Elem = f64>,
        D2: Dimension,
    {
        let expected = [self.n_levels(), self.grades.len()];
        check_shape("mean", mean, &expected)?;
        check_shape("std", std, &expected)?;
        tracing::trace!(n_rows = mean.len(), "labeling level parameters");
        Ok(LevelParamTable::from_base(self.level_grade_base(), flatten(mean), flatten(std)))
    }
}

/// Row-major flattening; for a `(labels, grades)` array this is label-major.
fn flatten<S, D>(array: &ArrayBase<S, D>) -> Array1<f64>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    array.iter().copied().collect()
}
