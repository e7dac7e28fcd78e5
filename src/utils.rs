//! Python-boundary helpers for the PyO3 bindings.
//!
//! Converts pandas DataFrames (or any mapping of column name → sequence)
//! into [`Table`]s, and array-likes into `f64` NumPy views.

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::{PyKeyError, PyTypeError},
    prelude::*,
    types::{PyAny, PyDict, PyFloat},
};

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyReadonlyArrayDyn};

#[cfg(feature = "python-bindings")]
use crate::grm::{
    errors::ValidationError,
    frames::{AbilityTable, DiscriminationTable, LevelParamTable, ThresholdTable},
    table::{Column, Table},
};

/// Read an `f64` array of any rank from an ndarray, pandas object or
/// nested sequence.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_array_dyn<'py>(
    py: Python<'py>, raw: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArrayDyn<'py, f64>> {
    if let Ok(arr) = raw.extract::<PyReadonlyArrayDyn<f64>>() {
        return Ok(arr);
    }

    let coerced = py.import("numpy")?.call_method1("asarray", (raw, "float64")).map_err(|_| {
        PyTypeError::new_err("expected a numpy.ndarray, pandas object, or nested sequence of floats")
    })?;
    coerced.extract::<PyReadonlyArrayDyn<f64>>()
}

/// Build a [`Table`] holding the requested columns of a DataFrame-like
/// object.
///
/// `label_columns` are read as nullable text (values go through `str()`;
/// `None` and float NaN become missing). `integer_column`, when given, is
/// read as `i64` and falls back to a float column so that the validators
/// can report a non-integer response.
#[cfg(feature = "python-bindings")]
pub fn extract_table<'py>(
    raw: &Bound<'py, PyAny>, table_name: &'static str, label_columns: &[&'static str],
    integer_column: Option<&'static str>,
) -> PyResult<Table> {
    let mut table = Table::new();
    for &name in label_columns {
        let values = column_values(raw, table_name, name)?;
        table.insert(name, label_column(&values)?);
    }
    if let Some(name) = integer_column {
        let values = column_values(raw, table_name, name)?;
        table.insert(name, numeric_column(&values, name)?);
    }
    Ok(table)
}

#[cfg(feature = "python-bindings")]
fn column_values<'py>(
    raw: &Bound<'py, PyAny>, table_name: &'static str, column: &'static str,
) -> PyResult<Bound<'py, PyAny>> {
    let values = raw.get_item(column).map_err(|err| {
        if err.is_instance_of::<PyKeyError>(raw.py()) {
            ValidationError::MissingColumn { table: table_name, column }.into()
        } else {
            err
        }
    })?;
    // pandas.Series / numpy.ndarray → plain Python list
    if values.hasattr("tolist")? { values.call_method0("tolist") } else { Ok(values) }
}

#[cfg(feature = "python-bindings")]
fn label_column(values: &Bound<'_, PyAny>) -> PyResult<Column> {
    let mut labels = Vec::new();
    for value in values.try_iter()? {
        let value = value?;
        let missing = value.is_none()
            || value.downcast::<PyFloat>().map(|f| f.value().is_nan()).unwrap_or(false);
        labels.push(if missing { None } else { Some(value.str()?.to_string()) });
    }
    Ok(Column::Text(labels))
}

#[cfg(feature = "python-bindings")]
fn numeric_column(values: &Bound<'_, PyAny>, name: &'static str) -> PyResult<Column> {
    if let Ok(ints) = values.extract::<Vec<i64>>() {
        return Ok(Column::Integer(ints));
    }
    values.extract::<Vec<f64>>().map(Column::Float).map_err(|_| {
        PyTypeError::new_err(format!("column '{name}' must be a sequence of numbers"))
    })
}

#[cfg(feature = "python-bindings")]
pub fn discrimination_dict<'py>(
    py: Python<'py>, table: DiscriminationTable,
) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("item", table.item)?;
    dict.set_item("a", table.a.into_pyarray(py))?;
    Ok(dict)
}

#[cfg(feature = "python-bindings")]
pub fn threshold_dict<'py>(py: Python<'py>, table: ThresholdTable) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("item", table.item)?;
    dict.set_item("grade", table.grade)?;
    dict.set_item("b", table.b.into_pyarray(py))?;
    Ok(dict)
}

#[cfg(feature = "python-bindings")]
pub fn ability_dict<'py>(py: Python<'py>, table: AbilityTable) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("person", table.person)?;
    dict.set_item("t", table.t.into_pyarray(py))?;
    Ok(dict)
}

#[cfg(feature = "python-bindings")]
pub fn level_param_dict<'py>(
    py: Python<'py>, table: LevelParamTable,
) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("level", table.level)?;
    dict.set_item("grade", table.grade)?;
    dict.set_item("mean", table.mean.into_pyarray(py))?;
    dict.set_item("std", table.std.into_pyarray(py))?;
    Ok(dict)
}
