//! grm::frames — base index tables and labeled parameter tables.
//!
//! Purpose
//! -------
//! Anchor raw estimator arrays to the labels they belong to. A *base* table
//! lists the row labels in canonical code order; a *parameter* table is a
//! base table with one or more value columns attached row by row.
//!
//! Key behaviors
//! -------------
//! - [`LabelBase`] holds one label column (items or persons).
//! - [`LabelGradeBase`] holds the label × grade cross product in
//!   label-major, grade-minor order:
//!
//!   ```text
//!   label | grade
//!   foo   | 2
//!   foo   | 3
//!   bar   | 2
//!   bar   | 3
//!   ```
//!
//! - The four parameter tables ([`DiscriminationTable`], [`ThresholdTable`],
//!   [`AbilityTable`], [`LevelParamTable`]) keep their values as
//!   `ndarray::Array1<f64>` columns and expose serializable row views for
//!   reporting layers.
//!
//! Invariants
//! ----------
//! - Every column of a table has the same length.
//! - Row `i` of a parameter table pairs the `i`-th base label (and grade)
//!   with element `i` of each value column.

use ndarray::Array1;
use serde::Serialize;

use crate::grm::shape::GradeAxis;

/// LabelBase — labels in canonical code order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelBase {
    pub labels: Vec<String>,
}

impl LabelBase {
    pub fn new(labels: Vec<String>) -> LabelBase {
        LabelBase { labels }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// LabelGradeBase — label × grade cross product, label-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelGradeBase {
    pub labels: Vec<String>,
    pub grades: Vec<usize>,
}

impl LabelGradeBase {
    /// Build the cross product of `labels` (in the given order) with every
    /// grade of `axis`. The result has `labels.len() * axis.len()` rows.
    pub fn cross(labels: &[String], axis: GradeAxis) -> LabelGradeBase {
        let n_rows = labels.len().checked_mul(axis.len()).unwrap_or(0);
        let mut out_labels = Vec::with_capacity(n_rows);
        let mut grades = Vec::with_capacity(n_rows);
        for label in labels {
            for grade in axis.grades() {
                out_labels.push(label.clone());
                grades.push(grade);
            }
        }
        LabelGradeBase { labels: out_labels, grades }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Item discrimination parameters, columns `(item, a)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscriminationTable {
    pub item: Vec<String>,
    pub a: Array1<f64>,
}

/// Item threshold parameters, columns `(item, grade, b)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdTable {
    pub item: Vec<String>,
    pub grade: Vec<usize>,
    pub b: Array1<f64>,
}

/// Person ability estimates, columns `(person, t)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbilityTable {
    pub person: Vec<String>,
    pub t: Array1<f64>,
}

/// Level-pooled threshold moments, columns `(level, grade, mean, std)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelParamTable {
    pub level: Vec<String>,
    pub grade: Vec<usize>,
    pub mean: Array1<f64>,
    pub std: Array1<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiscriminationRow<'a> {
    pub item: &'a str,
    pub a: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdRow<'a> {
    pub item: &'a str,
    pub grade: usize,
    pub b: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AbilityRow<'a> {
    pub person: &'a str,
    pub t: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelParamRow<'a> {
    pub level: &'a str,
    pub grade: usize,
    pub mean: f64,
    pub std: f64,
}

impl DiscriminationTable {
    pub(crate) fn from_base(base: LabelBase, a: Array1<f64>) -> DiscriminationTable {
        DiscriminationTable { item: base.labels, a }
    }

    pub fn len(&self) -> usize {
        self.item.len()
    }

    pub fn is_empty(&self) -> bool {
        self.item.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = DiscriminationRow<'_>> {
        self.item.iter().zip(self.a.iter()).map(|(item, &a)| DiscriminationRow { item, a })
    }
}

impl ThresholdTable {
    pub(crate) fn from_base(base: LabelGradeBase, b: Array1<f64>) -> ThresholdTable {
        ThresholdTable { item: base.labels, grade: base.grades, b }
    }

    pub fn len(&self) -> usize {
        self.item.len()
    }

    pub fn is_empty(&self) -> bool {
        self.item.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = ThresholdRow<'_>> {
        self.item
            .iter()
            .zip(&self.grade)
            .zip(self.b.iter())
            .map(|((item, &grade), &b)| ThresholdRow { item, grade, b })
    }
}

impl AbilityTable {
    pub(crate) fn from_base(base: LabelBase, t: Array1<f64>) -> AbilityTable {
        AbilityTable { person: base.labels, t }
    }

    pub fn len(&self) -> usize {
        self.person.len()
    }

    pub fn is_empty(&self) -> bool {
        self.person.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = AbilityRow<'_>> {
        self.person.iter().zip(self.t.iter()).map(|(person, &t)| AbilityRow { person, t })
    }
}

impl LevelParamTable {
    pub(crate) fn from_base(
        base: LabelGradeBase, mean: Array1<f64>, std: Array1<f64>,
    ) -> LevelParamTable {
        LevelParamTable { level: base.labels, grade: base.grades, mean, std }
    }

    pub fn len(&self) -> usize {
        self.level.len()
    }

    pub fn is_empty(&self) -> bool {
        self.level.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = LevelParamRow<'_>> {
        self.level
            .iter()
            .zip(&self.grade)
            .zip(self.mean.iter().zip(self.std.iter()))
            .map(|((level, &grade), (&mean, &std))| LevelParamRow { level, grade, mean, std })
    }
}
