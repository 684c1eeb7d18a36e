//! PyO3 bindings for Python integration

use pyo3::prelude::*;

mod convolution_bindings;

/// Python module definition
#[pymodule]
fn overlap_convolution(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<convolution_bindings::PyRealConvolution>()?;
    m.add_class::<convolution_bindings::PyTaperKind>()?;

    Ok(())
}
