//! Python bindings for the deck validation engine.
//!
//! Everything crosses the boundary as JSON text, in the same shapes the
//! Rust types serialize to.
//!
//! # Quick Start
//!
//! ```python
//! import json
//! import ccg_deckcheck as dc
//!
//! formats = dc.FormatRegistry()
//! formats.insert('{"id": "classic", "params": {"deck_size": 50}}')
//!
//! result = json.loads(formats.validate("classic", entries_json))
//! if not result["is_valid"]:
//!     for message in result["messages"]:
//!         print(message["severity"], message["message"])
//! ```

use pyo3::prelude::*;

mod py_validate;

pub use py_validate::*;

/// ccg_deckcheck: format-aware deck validation.
#[pymodule]
fn ccg_deckcheck(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyFormatRegistry>()?;

    m.add_function(wrap_pyfunction!(validate_deck, m)?)?;
    m.add_function(wrap_pyfunction!(aggregate_stats, m)?)?;

    Ok(())
}
