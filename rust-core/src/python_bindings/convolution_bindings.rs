//! Python bindings for streaming real convolution

use pyo3::prelude::*;
use numpy::{PyArray1, PyReadonlyArray1};
use crate::convolution::{ConvolutionError, RealConvolution};
use crate::filters::TaperKind;

fn to_py_err(err: ConvolutionError) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyValueError, _>(err.to_string())
}

/// Taper kind enum exposed to Python
#[pyclass(name = "TaperKind")]
#[derive(Clone)]
pub enum PyTaperKind {
    Rectangular,
    Hann,
    Hamming,
    Blackman,
}

impl From<PyTaperKind> for TaperKind {
    fn from(py_kind: PyTaperKind) -> Self {
        match py_kind {
            PyTaperKind::Rectangular => TaperKind::Rectangular,
            PyTaperKind::Hann => TaperKind::Hann,
            PyTaperKind::Hamming => TaperKind::Hamming,
            PyTaperKind::Blackman => TaperKind::Blackman,
        }
    }
}

/// Real-valued overlap-add convolution exposed to Python
#[pyclass(name = "RealConvolution")]
pub struct PyRealConvolution {
    convolution: RealConvolution,
}

#[pymethods]
impl PyRealConvolution {
    /// Create a convolution consuming 2 * block_size samples per call
    ///
    /// Args:
    ///     block_size: Samples per block (N); kernels hold up to N + 1 taps
    #[new]
    fn new(block_size: usize) -> PyResult<Self> {
        let convolution = RealConvolution::with_block_size(block_size).map_err(to_py_err)?;
        Ok(Self { convolution })
    }

    /// Replace the taper applied to designed kernels
    fn set_default_taper(&mut self, kind: PyTaperKind) -> PyResult<()> {
        self.convolution
            .set_default_taper_kind(kind.into())
            .map_err(to_py_err)
    }

    /// Use a tapered low-pass kernel
    ///
    /// Args:
    ///     cutoff: Normalized cutoff (units of π rad/sample), 0 < cutoff < 1
    fn set_low_pass(&mut self, cutoff: f64) -> PyResult<()> {
        let engine = self.convolution.engine();
        let mut kernel = engine.create_filter_kernel();
        kernel.design_low_pass(engine, cutoff).map_err(to_py_err)?;
        self.convolution.set_filter_kernel(&kernel).map_err(to_py_err)
    }

    /// Use an untapered impulse response of at most block_size + 1 taps
    fn set_custom_response(&mut self, response: PyReadonlyArray1<f64>) -> PyResult<()> {
        let response = response.as_slice()?;
        let mut kernel = self.convolution.engine().create_filter_kernel();
        kernel.set_custom_response(response).map_err(to_py_err)?;
        self.convolution.set_filter_kernel(&kernel).map_err(to_py_err)
    }

    /// Convolve the next 2 * block_size samples
    ///
    /// Returns:
    ///     Convolved samples as numpy array
    fn process<'py>(
        &mut self,
        py: Python<'py>,
        input_signal: PyReadonlyArray1<f64>,
    ) -> PyResult<&'py PyArray1<f64>> {
        let input = input_signal.as_slice()?;
        let mut output = vec![0.0; input.len()];
        self.convolution
            .process(input, &mut output)
            .map_err(to_py_err)?;

        Ok(PyArray1::from_vec(py, output))
    }

    /// Clear the carried overlap
    fn reset(&mut self) {
        self.convolution.reset();
    }

    /// Samples per call (2 * block_size)
    fn frame_size(&self) -> usize {
        self.convolution.frame_size()
    }
}
