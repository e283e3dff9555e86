//! Embedded-interpreter plumbing.
//!
//! The Python half of the backend lives in `python/rdkit_bridge.py` and is
//! compiled into the interpreter exactly once. Initialization failure (no
//! Python, no RDKit) is reported as `EngineUnavailable`; the facade calls
//! [`ensure_ready`] before every entry point, so a missing engine surfaces
//! there and not deep in a computation.

use std::ffi::CString;
use std::sync::OnceLock;

use pyo3::ffi::c_str;
use pyo3::prelude::*;
use pyo3::types::PyModule;

use molbridge_core::BridgeError;

static BRIDGE_MODULE: OnceLock<Py<PyModule>> = OnceLock::new();

pub fn ensure_ready() -> Result<(), BridgeError> {
    if BRIDGE_MODULE.get().is_some() {
        return Ok(());
    }
    // PYTHONHOME / RDBASE style settings may live in a .env file.
    dotenvy::dotenv().ok();
    Python::attach(|py| {
        let code = CString::new(include_str!("../python/rdkit_bridge.py"))
            .map_err(|e| BridgeError::EngineUnavailable(e.to_string()))?;
        let module = PyModule::from_code(
            py,
            code.as_c_str(),
            c_str!("rdkit_bridge.py"),
            c_str!("rdkit_bridge"),
        )
        .map_err(|e| BridgeError::EngineUnavailable(e.to_string()))?;
        BRIDGE_MODULE.set(module.unbind()).ok();
        Ok(())
    })
}

/// Run `f` with the loaded bridge module under the interpreter lock.
pub(crate) fn with_module<R>(
    f: impl FnOnce(Python<'_>, &Bound<'_, PyModule>) -> Result<R, BridgeError>,
) -> Result<R, BridgeError> {
    let module = BRIDGE_MODULE
        .get()
        .ok_or_else(|| BridgeError::EngineUnavailable("RDKit bridge is not loaded".into()))?;
    Python::attach(|py| f(py, module.bind(py)))
}

/// A Python `ValueError` marks bad input; anything else is an engine fault.
pub(crate) fn input_error(py: Python<'_>, format: &str, err: PyErr) -> BridgeError {
    if err.is_instance_of::<pyo3::exceptions::PyValueError>(py) {
        BridgeError::MalformedInput { format: format.to_string(), detail: err.to_string() }
    } else {
        BridgeError::Engine(err.to_string())
    }
}

pub(crate) fn engine_error(err: PyErr) -> BridgeError {
    BridgeError::Engine(err.to_string())
}
