//! grm::table — minimal columnar input table.
//!
//! Purpose
//! -------
//! Model the "data frame" shape in which observation and level tables
//! usually arrive from a data-loading layer: a set of named columns, each
//! with a single element type. The converter only needs to know whether a
//! required column is present and whether it carries text, integers or
//! floats, so this type stays deliberately small.
//!
//! Conventions
//! -----------
//! - Column names are case-sensitive and unique; inserting a column under an
//!   existing name replaces it in place.
//! - Text columns allow missing values (`None`), mirroring nullable object
//!   columns. Numeric columns are dense.
//! - Row order is the insertion order of the column values and is preserved
//!   by every downstream conversion.

/// A single typed column.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Nullable text labels.
    Text(Vec<Option<String>>),
    /// Dense 64-bit integers.
    Integer(Vec<i64>),
    /// Dense 64-bit floats.
    Float(Vec<f64>),
}

impl Column {
    /// Build a text column with no missing values.
    pub fn text<I, S>(values: I) -> Column
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Column::Text(values.into_iter().map(|v| Some(v.into())).collect())
    }

    /// Build a text column where `None` marks a missing label.
    pub fn nullable_text<I, S>(values: I) -> Column
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Column::Text(values.into_iter().map(|v| v.map(Into::into)).collect())
    }

    pub fn integer<I: IntoIterator<Item = i64>>(values: I) -> Column {
        Column::Integer(values.into_iter().collect())
    }

    pub fn float<I: IntoIterator<Item = f64>>(values: I) -> Column {
        Column::Float(values.into_iter().collect())
    }

    /// Number of rows in the column.
    pub fn len(&self) -> usize {
        match self {
            Column::Text(v) => v.len(),
            Column::Integer(v) => v.len(),
            Column::Float(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short element-type name used in error messages.
    pub fn dtype(&self) -> &'static str {
        match self {
            Column::Text(_) => "text",
            Column::Integer(_) => "integer",
            Column::Float(_) => "float",
        }
    }
}

/// Table — ordered collection of named columns.
///
/// Invariants
/// ----------
/// - Column names are unique.
/// - Column lengths are **not** enforced here; equal-length checks belong to
///   the validators that know which columns are required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<(String, Column)>,
}

impl Table {
    pub fn new() -> Table {
        Table::default()
    }

    /// Insert a column, replacing any existing column of the same name.
    pub fn insert(&mut self, name: impl Into<String>, column: Column) {
        let name = name.into();
        match self.columns.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = column,
            None => self.columns.push((name, column)),
        }
    }

    /// Builder-style variant of [`Table::insert`].
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Table {
        self.insert(name, column);
        self
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|(existing, _)| existing == name).map(|(_, col)| col)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }
}
