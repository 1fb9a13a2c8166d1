use geo::Point;
use poiroute_core::prelude::*;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyFloat, PyList};
use serde::Serialize;

/// Candidate dicts go through Python's `json` module so that every extra key
/// of a record survives the round trip into Rust and back.
///
/// Records are converted one at a time. NaN cells (missing values of a
/// dataframe export) become `null`; a record that still cannot be encoded
/// is passed on as `null` so the engine rejects and counts it.
pub(crate) fn records_from_py(candidates: &Bound<'_, PyList>) -> PyResult<Vec<serde_json::Value>> {
    let py = candidates.py();
    let json = py.import("json")?;
    let kwargs = PyDict::new(py);
    kwargs.set_item("allow_nan", false)?;
    kwargs.set_item("default", py.import("builtins")?.getattr("str")?)?;

    let mut records = Vec::with_capacity(candidates.len());
    for (position, item) in candidates.iter().enumerate() {
        let cleaned = match item.cast::<PyDict>() {
            Ok(dict) => Some(without_nan(dict)?),
            Err(_) => None,
        };
        let item = cleaned.map_or(item, Bound::into_any);
        let record = json
            .call_method("dumps", (item,), Some(&kwargs))
            .and_then(|text| text.extract::<String>().map_err(Into::into))
            .map_err(|e| e.to_string())
            .and_then(|text| serde_json::from_str(&text).map_err(|e| e.to_string()));
        match record {
            Ok(record) => records.push(record),
            Err(reason) => {
                log::warn!("Candidate {position} cannot be encoded: {reason}");
                records.push(serde_json::Value::Null);
            }
        }
    }
    Ok(records)
}

fn without_nan<'py>(record: &Bound<'py, PyDict>) -> PyResult<Bound<'py, PyDict>> {
    let cleaned = PyDict::new(record.py());
    for (key, value) in record.iter() {
        let is_nan = value
            .cast::<PyFloat>()
            .is_ok_and(|float| float.value().is_nan());
        if is_nan {
            cleaned.set_item(key, record.py().None())?;
        } else {
            cleaned.set_item(key, value)?;
        }
    }
    Ok(cleaned)
}

pub(crate) fn to_py<'py, T: Serialize + ?Sized>(
    py: Python<'py>,
    value: &T,
) -> PyResult<Bound<'py, PyAny>> {
    let text = serde_json::to_string(value)
        .map_err(|e| PyRuntimeError::new_err(format!("Failed to serialize result: {e}")))?;
    py.import("json")?.call_method1("loads", (text,))
}

pub(crate) fn to_py_err(error: Error) -> PyErr {
    match error {
        Error::InvalidInput(_) | Error::InvalidConfig(_) | Error::Config(_) => {
            PyValueError::new_err(error.to_string())
        }
        other => PyRuntimeError::new_err(other.to_string()),
    }
}

/// Great-circle distance in meters between two WGS84 coordinates
#[pyfunction]
#[pyo3(signature = (lat1, lon1, lat2, lon2))]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    poiroute_core::algo::haversine_distance(Point::new(lon1, lat1), Point::new(lon2, lat2))
}

/// Cheap geometric filter applied before any routing
///
/// Parameters
/// ----------
/// candidates : list[dict]
///     Records with at least ``latitude``, ``longitude`` and ``subcategory``
/// user_lat, user_lon : float
///     User location
/// radius_m : float
///     Search radius in meters
/// buffer_factor : float, default=1.5
///     Multiplier of the radius used by the great-circle pass
/// haversine_threshold : int, default=50
///     Candidate count above which the great-circle pass runs
/// subcategories : list[str], optional
///     Keep only records whose subcategory contains one of these
///
/// Returns
/// -------
/// list[dict]
///     Surviving records, in input order
#[pyfunction(name = "prefilter")]
#[allow(clippy::too_many_arguments)]
#[pyo3(signature = (
    candidates,
    user_lat,
    user_lon,
    radius_m,
    buffer_factor = 1.5,
    haversine_threshold = 50,
    subcategories = None
))]
pub fn py_prefilter<'py>(
    py: Python<'py>,
    candidates: &Bound<'py, PyList>,
    user_lat: f64,
    user_lon: f64,
    radius_m: f64,
    buffer_factor: f64,
    haversine_threshold: usize,
    subcategories: Option<Vec<String>>,
) -> PyResult<Bound<'py, PyAny>> {
    let (pois, rejected) = decode_records(records_from_py(candidates)?);
    for record in &rejected {
        log::warn!("Skipping candidate: {record}");
    }
    let options = PrefilterOptions {
        buffer_factor,
        haversine_threshold,
        subcategories: subcategories.unwrap_or_default(),
    };
    let kept = py.detach(|| prefilter(&pois, user_lat, user_lon, radius_m, &options));
    to_py(py, &kept)
}
