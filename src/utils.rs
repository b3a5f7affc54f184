//! Python input conversion helpers for the PyO3 layer.
//!
//! Accept NumPy arrays, objects with a `to_numpy` method (pandas), or nested
//! sequences of floats, and hand back owned `ndarray` values. Shape and
//! finiteness checks stay in [`crate::dmd::validation`]; only conversion
//! failures are reported here, as `TypeError`/`ValueError`.
#[cfg(feature = "python-bindings")]
use ndarray::{Array1, Array2};

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::{PyTypeError, PyValueError},
    prelude::*,
    types::PyAny,
};

#[cfg(feature = "python-bindings")]
use numpy::{PyReadonlyArray1, PyReadonlyArray2};

/// Extract a one-dimensional `float64` vector.
///
/// Tries, in order: a 1-D `numpy.ndarray`, an object exposing `to_numpy()`
/// (e.g. `pandas.Series`), and a plain sequence of floats.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_vector<'py>(raw: &Bound<'py, PyAny>, what: &str) -> PyResult<Array1<f64>> {
    if let Ok(arr_ro) = raw.extract::<PyReadonlyArray1<f64>>() {
        return Ok(arr_ro.as_array().to_owned());
    }

    if let Ok(obj) = raw.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            return Ok(series_ro.as_array().to_owned());
        }
    }

    let vec: Vec<f64> = raw.extract().map_err(|_| {
        PyTypeError::new_err(format!(
            "{what}: expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64"
        ))
    })?;
    Ok(Array1::from(vec))
}

/// Extract a two-dimensional `float64` matrix (`n × q`, one snapshot per column).
///
/// Tries a 2-D `numpy.ndarray`, then `to_numpy()`, then a list of equal-length
/// rows.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_matrix<'py>(raw: &Bound<'py, PyAny>, what: &str) -> PyResult<Array2<f64>> {
    if let Ok(arr_ro) = raw.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr_ro.as_array().to_owned());
    }

    if let Ok(obj) = raw.call_method("to_numpy", (false,), None) {
        if let Ok(frame_ro) = obj.extract::<PyReadonlyArray2<f64>>() {
            return Ok(frame_ro.as_array().to_owned());
        }
    }

    let rows: Vec<Vec<f64>> = raw.extract().map_err(|_| {
        PyTypeError::new_err(format!(
            "{what}: expected a 2-D numpy.ndarray, pandas.DataFrame, or nested sequence of float64"
        ))
    })?;
    rows_to_array(rows).map_err(|found| {
        PyValueError::new_err(format!("{what}: ragged rows (row {found} differs in length)"))
    })
}

/// Stack equal-length rows into a matrix; `Err(i)` names the first ragged row.
#[cfg(feature = "python-bindings")]
fn rows_to_array(rows: Vec<Vec<f64>>) -> Result<Array2<f64>, usize> {
    let nrows = rows.len();
    let ncols = rows.first().map_or(0, Vec::len);
    if let Some(i) = rows.iter().position(|r| r.len() != ncols) {
        return Err(i);
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((nrows, ncols), flat).map_err(|_| 0)
}

/// Copy a matrix into row-major nested vectors for return to Python.
#[cfg(feature = "python-bindings")]
pub fn matrix_to_rows(m: &Array2<f64>) -> Vec<Vec<f64>> {
    m.rows().into_iter().map(|row| row.to_vec()).collect()
}
