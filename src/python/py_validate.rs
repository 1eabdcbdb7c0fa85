//! Validation bindings for Python.

use pyo3::exceptions::{PyKeyError, PyValueError};
use pyo3::prelude::*;

use crate::deck::{DeckEntry, FormatId};
use crate::format::{FormatDefinition, FormatError, FormatSource, InMemoryFormats};
use crate::stats::aggregate;
use crate::validate::assemble;

fn parse_entries(entries_json: &str) -> PyResult<Vec<DeckEntry>> {
    serde_json::from_str(entries_json)
        .map_err(|e| PyValueError::new_err(format!("invalid deck entries: {e}")))
}

fn to_json<T: serde::Serialize>(value: &T) -> PyResult<String> {
    serde_json::to_string(value).map_err(|e| PyValueError::new_err(e.to_string()))
}

fn format_err(err: FormatError) -> PyErr {
    match err {
        FormatError::NotFound(_) => PyKeyError::new_err(err.to_string()),
        other => PyValueError::new_err(other.to_string()),
    }
}

/// Validate a deck against a stored format definition.
///
/// Both arguments and the return value are JSON text.
#[pyfunction]
pub fn validate_deck(format_json: &str, entries_json: &str) -> PyResult<String> {
    let definition: FormatDefinition = serde_json::from_str(format_json)
        .map_err(|e| PyValueError::new_err(format!("invalid format definition: {e}")))?;
    let config = definition.to_config().map_err(format_err)?;
    let entries = parse_entries(entries_json)?;

    to_json(&assemble(&config, &entries))
}

/// Compute deck statistics only.
#[pyfunction]
pub fn aggregate_stats(entries_json: &str) -> PyResult<String> {
    let entries = parse_entries(entries_json)?;
    to_json(&aggregate(&entries))
}

/// Python wrapper for an in-memory format store.
#[pyclass(name = "FormatRegistry")]
#[derive(Clone, Debug, Default)]
pub struct PyFormatRegistry(pub InMemoryFormats);

#[pymethods]
impl PyFormatRegistry {
    #[new]
    fn new() -> Self {
        Self::default()
    }

    /// Store a format definition given as JSON. Replaces any previous one.
    fn insert(&mut self, definition_json: &str) -> PyResult<()> {
        let definition: FormatDefinition = serde_json::from_str(definition_json)
            .map_err(|e| PyValueError::new_err(format!("invalid format definition: {e}")))?;
        self.0.insert(definition);
        Ok(())
    }

    fn __contains__(&self, format_id: &str) -> bool {
        self.0.contains(&FormatId::new(format_id))
    }

    fn __len__(&self) -> usize {
        self.0.len()
    }

    /// Resolve a format and validate a deck. Raises `KeyError` for an
    /// unknown format.
    fn validate(&self, format_id: &str, entries_json: &str) -> PyResult<String> {
        let config = self.0.resolve(&FormatId::new(format_id)).map_err(format_err)?;
        let entries = parse_entries(entries_json)?;
        to_json(&assemble(&config, &entries))
    }

    fn __repr__(&self) -> String {
        format!("FormatRegistry(formats={})", self.0.len())
    }
}
