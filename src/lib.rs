//! rust_irt — graded-response data conversion for IRT estimators, with
//! Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the converter to Python via the `_rust_irt` extension module.
//! When the `python-bindings` feature is enabled, this module defines the
//! Python-facing class and submodule used by the `rust_irt` package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core [`grm`] module as the public crate surface.
//! - Define the `GRMDataConverter` `#[pyclass]`, which accepts pandas
//!   DataFrames (or dicts of columns), returns NumPy arrays for the
//!   estimator, and returns dicts of columns for the labeled tables.
//! - Register the `rust_irt.grm` submodule so dotted imports work.
//!
//! Invariants & assumptions
//! ------------------------
//! - All conversion logic lives in [`grm`]; this file only performs FFI
//!   glue and error mapping.
//! - Every Rust-side error surfaces in Python as `ValueError` with the
//!   Rust `Display` message preserved.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code depends on [`grm`] directly and can ignore the items
//!   guarded by the `python-bindings` feature.
//! - Python code typically wraps the returned dicts with
//!   `pandas.DataFrame(...)`.
//!
//! Testing notes
//! -------------
//! - Core behavior is covered by unit tests in [`grm`] and by the Rust
//!   integration tests under `tests/`.
//! - The PyO3 layer is exercised from Python; it is not linked into the Rust
//!   test binaries.

pub mod grm;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1, PyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::{PyAny, PyDict}};

#[cfg(feature = "python-bindings")]
use crate::{
    grm::{
        categories::LabelOrder,
        converter::GRMConverter,
        options::{ConverterOptions, DuplicateLevelPolicy},
    },
    utils::{
        ability_dict, discrimination_dict, extract_f64_array_dyn, extract_table,
        level_param_dict, threshold_dict,
    },
};

/// GRMDataConverter — Python-facing wrapper around [`GRMConverter`].
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `GRMDataConverter(response_df, level_df, n_grades=None, label_order="lexical",
/// unknown_level="_unknown", duplicate_levels="keep_first")`:
/// - `response_df`: mapping with `item`, `person`, `response` columns.
/// - `level_df`: mapping with `item`, `level` columns.
/// - `n_grades`: optional number of response categories; `None` or `0`
///   derives it from the largest response.
/// - `label_order`: `"lexical"` or `"first_seen"`.
/// - `unknown_level`: sentinel level for items without a level entry.
/// - `duplicate_levels`: `"keep_first"` or `"reject"`.
///
/// Notes
/// -----
/// - Item and person identifiers are converted with `str()` and ordered as
///   text, so integer ids `2` and `10` get codes in the order `"10"`, `"2"`.
///   Codes are not guaranteed to match pandas' numeric category order.
/// - The wrapped converter is immutable, so the class is `frozen` and can be
///   shared freely between Python threads.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_irt.grm", name = "GRMDataConverter", frozen)]
pub struct PyGRMDataConverter {
    inner: GRMConverter,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyGRMDataConverter {
    #[new]
    #[pyo3(
        signature = (
            response_df,
            level_df,
            n_grades = None,
            label_order = None,
            unknown_level = None,
            duplicate_levels = None,
        ),
        text_signature = "(response_df, level_df, /, n_grades=None, label_order='lexical', \
                          unknown_level='_unknown', duplicate_levels='keep_first')"
    )]
    pub fn new<'py>(
        response_df: &Bound<'py, PyAny>, level_df: &Bound<'py, PyAny>, n_grades: Option<usize>,
        label_order: Option<&str>, unknown_level: Option<String>, duplicate_levels: Option<&str>,
    ) -> PyResult<Self> {
        let options = extract_options(n_grades, label_order, unknown_level, duplicate_levels)?;

        let responses =
            extract_table(response_df, "observation", &["item", "person"], Some("response"))?;
        let levels = extract_table(level_df, "level", &["item", "level"], None)?;

        let inner = GRMConverter::from_tables(&responses, &levels, &options)?;
        Ok(PyGRMDataConverter { inner })
    }

    #[getter]
    pub fn n_items(&self) -> usize {
        self.inner.n_items()
    }

    #[getter]
    pub fn n_persons(&self) -> usize {
        self.inner.n_persons()
    }

    #[getter]
    pub fn n_levels(&self) -> usize {
        self.inner.n_levels()
    }

    #[getter]
    pub fn n_responses(&self) -> usize {
        self.inner.n_responses()
    }

    #[getter]
    pub fn n_grades(&self) -> usize {
        self.inner.n_grades()
    }

    #[getter]
    pub fn items(&self) -> Vec<String> {
        self.inner.items().labels().to_vec()
    }

    #[getter]
    pub fn persons(&self) -> Vec<String> {
        self.inner.persons().labels().to_vec()
    }

    #[getter]
    pub fn levels(&self) -> Vec<String> {
        self.inner.levels().labels().to_vec()
    }

    /// Coded observations, shape `(n_responses, 3)`.
    pub fn make_response_array<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<i64>> {
        self.inner.make_response_array().into_pyarray(py)
    }

    /// Level code per item, shape `(n_items,)`.
    pub fn make_level_array<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<i64>> {
        self.inner.make_level_array().into_pyarray(py)
    }

    #[pyo3(text_signature = "(self, a_array, /)")]
    pub fn make_a_df<'py>(
        &self, py: Python<'py>, a_array: &Bound<'py, PyAny>,
    ) -> PyResult<Bound<'py, PyDict>> {
        let a = extract_f64_array_dyn(py, a_array)?;
        let table = self.inner.make_a_df(&a.as_array())?;
        discrimination_dict(py, table)
    }

    #[pyo3(text_signature = "(self, b_array, /)")]
    pub fn make_b_df<'py>(
        &self, py: Python<'py>, b_array: &Bound<'py, PyAny>,
    ) -> PyResult<Bound<'py, PyDict>> {
        let b = extract_f64_array_dyn(py, b_array)?;
        let table = self.inner.make_b_df(&b.as_array())?;
        threshold_dict(py, table)
    }

    #[pyo3(text_signature = "(self, t_array, /)")]
    pub fn make_t_df<'py>(
        &self, py: Python<'py>, t_array: &Bound<'py, PyAny>,
    ) -> PyResult<Bound<'py, PyDict>> {
        let t = extract_f64_array_dyn(py, t_array)?;
        let table = self.inner.make_t_df(&t.as_array())?;
        ability_dict(py, table)
    }

    #[pyo3(text_signature = "(self, level_mean_array, level_std_array, /)")]
    pub fn make_level_df<'py>(
        &self, py: Python<'py>, level_mean_array: &Bound<'py, PyAny>,
        level_std_array: &Bound<'py, PyAny>,
    ) -> PyResult<Bound<'py, PyDict>> {
        let mean = extract_f64_array_dyn(py, level_mean_array)?;
        let std = extract_f64_array_dyn(py, level_std_array)?;
        let table = self.inner.make_level_df(&mean.as_array(), &std.as_array())?;
        level_param_dict(py, table)
    }
}

#[cfg(feature = "python-bindings")]
fn extract_options(
    n_grades: Option<usize>, label_order: Option<&str>, unknown_level: Option<String>,
    duplicate_levels: Option<&str>,
) -> PyResult<ConverterOptions> {
    let order = match label_order.unwrap_or("lexical").to_lowercase().as_str() {
        "lexical" | "sorted" => LabelOrder::Lexical,
        "first_seen" | "firstseen" => LabelOrder::FirstSeen,
        other => {
            return Err(PyValueError::new_err(format!(
                "invalid label_order {:?} (expected 'lexical' or 'first_seen')",
                other
            )));
        }
    };
    let policy = match duplicate_levels.unwrap_or("keep_first").to_lowercase().as_str() {
        "keep_first" | "first" => DuplicateLevelPolicy::KeepFirst,
        "reject" => DuplicateLevelPolicy::Reject,
        other => {
            return Err(PyValueError::new_err(format!(
                "invalid duplicate_levels {:?} (expected 'keep_first' or 'reject')",
                other
            )));
        }
    };

    let mut options = ConverterOptions::default()
        .with_n_grades(n_grades)
        .with_label_order(order)
        .with_duplicate_levels(policy);
    if let Some(sentinel) = unknown_level {
        options = options.with_unknown_level(sentinel);
    }
    Ok(options)
}

/// _rust_irt — PyO3 module initializer for the Python extension.
///
/// Creates the `grm` submodule, attaches it to `_rust_irt`, and registers
/// it in `sys.modules` as `rust_irt.grm` so dotted imports resolve.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_irt<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let grm_mod = PyModule::new(_py, "grm")?;
    grm_mod.add_class::<PyGRMDataConverter>()?;
    m.add_submodule(&grm_mod)?;

    // Manually add the submodule into sys.modules to allow for dot notation.
    _py.import("sys")?.getattr("modules")?.set_item("rust_irt.grm", grm_mod)?;
    Ok(())
}
