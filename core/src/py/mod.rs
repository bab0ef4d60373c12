// Python bindings. Every function takes and returns JSON strings so the
// Python side never has to mirror the Rust types.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use crate::analysis::{self, parse_samples_json};
use crate::live::LiveWindow;
use crate::types::Reading;

fn value_err(e: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(e.to_string())
}

#[pyfunction]
fn compute_area_json(samples_json: &str) -> PyResult<f64> {
    let build = parse_samples_json(samples_json).map_err(value_err)?;
    build.series.area().map_err(value_err)
}

#[pyfunction]
fn compute_weighted_average_json(samples_json: &str) -> PyResult<f64> {
    let build = parse_samples_json(samples_json).map_err(value_err)?;
    build.series.weighted_average().map_err(value_err)
}

/// Indices refer to the series after sorting by timestamp.
#[pyfunction]
fn compute_area_between_json(samples_json: &str, index_a: usize, index_b: usize) -> PyResult<f64> {
    let build = parse_samples_json(samples_json).map_err(value_err)?;
    build
        .series
        .area_between(index_a, index_b)
        .map_err(value_err)
}

#[pyfunction]
#[pyo3(signature = (readings_json, thresholds_json = None))]
fn analyze_readings_json(readings_json: &str, thresholds_json: Option<&str>) -> PyResult<String> {
    analysis::analyze_readings_json(readings_json, thresholds_json).map_err(value_err)
}

/// Pushes one reading into the caller's window and hands the new window back.
#[pyfunction]
#[pyo3(signature = (reading_json, window_json = None))]
fn live_push_json(reading_json: &str, window_json: Option<&str>) -> PyResult<String> {
    let window: LiveWindow = match window_json {
        Some(w) => serde_json::from_str(w).map_err(value_err)?,
        None => LiveWindow::default(),
    };
    let reading: Reading = serde_json::from_str(reading_json).map_err(value_err)?;
    serde_json::to_string(&window.push(reading)).map_err(value_err)
}

#[pyfunction]
fn metrics_text() -> PyResult<String> {
    crate::metrics::render().map_err(value_err)
}

#[pymodule]
fn vitaltrack_core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(compute_area_json, m)?)?;
    m.add_function(wrap_pyfunction!(compute_weighted_average_json, m)?)?;
    m.add_function(wrap_pyfunction!(compute_area_between_json, m)?)?;
    m.add_function(wrap_pyfunction!(analyze_readings_json, m)?)?;
    m.add_function(wrap_pyfunction!(live_push_json, m)?)?;
    m.add_function(wrap_pyfunction!(metrics_text, m)?)?;
    Ok(())
}
