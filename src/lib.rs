//! POI candidate ranking by street network distance.
//!
//! Re-exports [`poiroute_core`]; the `python` feature adds the extension
//! module consumed by the Python service layer.

pub use poiroute_core::*;

#[cfg(feature = "python")]
mod engine;
#[cfg(feature = "python")]
mod functions;

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// A Python module implemented in Rust.
#[cfg(feature = "python")]
#[pymodule]
fn poiroute(m: &Bound<'_, PyModule>) -> PyResult<()> {
    pyo3_log::init();

    m.add_class::<engine::PyRankingEngine>()?;
    m.add_function(wrap_pyfunction!(functions::haversine_distance, m)?)?;
    m.add_function(wrap_pyfunction!(functions::py_prefilter, m)?)?;
    Ok(())
}
