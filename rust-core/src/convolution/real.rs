//! Overlap-add streaming over real samples
//!
//! Each call takes 2N real samples and packs them into one complex block:
//! the first half in the real part, the second half in the imaginary part.
//! With a real kernel the two halves come back separated, so one transform
//! pair serves 2N samples.

use super::complex::check_len;
use super::engine::ConvolutionEngine;
use super::error::ConvolutionError;
use super::kernel::{FilterKernel, FrequencyResponse};
use super::observer::ConvolveObserver;
use crate::filters::windows::TaperKind;
use crate::spectrum::SpectralBuffer;

/// Continuous real-valued convolution built on one engine
pub struct RealConvolution {
    engine: ConvolutionEngine,
    input_block: SpectralBuffer,
    output_block: SpectralBuffer,

    /// Contribution of the previous call to the next N samples
    overlap: Vec<f64>,
}

impl RealConvolution {
    /// Wrap an engine whose active frequency response is real-valued
    ///
    /// Fails if the engine already carries a complex kernel.
    pub fn new(engine: ConvolutionEngine) -> Result<Self, ConvolutionError> {
        check_real(engine.frequency_response())?;

        let transform_size = engine.transform_size();
        let block_size = engine.block_size();

        Ok(Self {
            engine,
            input_block: SpectralBuffer::new(transform_size),
            output_block: SpectralBuffer::new(transform_size),
            overlap: vec![0.0; block_size],
        })
    }

    pub fn with_block_size(block_size: usize) -> Result<Self, ConvolutionError> {
        Self::new(ConvolutionEngine::new(block_size)?)
    }

    /// Set a real-valued kernel
    ///
    /// Fails if the kernel's time buffer carries imaginary energy, or if
    /// its adopted frequency response is not conjugate-symmetric. Either
    /// would mix the two packed halves.
    pub fn set_filter_kernel(&mut self, kernel: &FilterKernel) -> Result<(), ConvolutionError> {
        match kernel.adopted_response() {
            Some(response) => check_real(response)?,
            None => {
                let imaginary = kernel
                    .impulse_response()
                    .as_slice()
                    .iter()
                    .any(|c| c.im != 0.0);
                if imaginary {
                    return Err(complex_kernel());
                }
            }
        }

        self.engine.set_filter_kernel(kernel)
    }

    /// New zeroed kernel bound to the inner engine
    pub fn create_filter_kernel(&self) -> FilterKernel {
        self.engine.create_filter_kernel()
    }

    /// Snapshot of the active filter
    pub fn filter_kernel(&self) -> FilterKernel {
        self.engine.filter_kernel()
    }

    /// Install or clear the engine's observer
    pub fn set_observer(
        &mut self,
        observer: Option<Box<dyn ConvolveObserver>>,
    ) -> Option<Box<dyn ConvolveObserver>> {
        self.engine.set_observer(observer)
    }

    pub fn set_default_taper_kind(&mut self, kind: TaperKind) -> Result<(), ConvolutionError> {
        self.engine.set_default_taper_kind(kind)
    }

    /// Samples consumed and produced per call (2N)
    pub fn frame_size(&self) -> usize {
        self.engine.transform_size()
    }

    /// Convolve the next `frame_size()` samples
    ///
    /// # Arguments
    /// * `input` - Exactly `frame_size()` samples
    /// * `output` - Exactly `frame_size()` samples, overwritten
    pub fn process(&mut self, input: &[f64], output: &mut [f64]) -> Result<(), ConvolutionError> {
        let n = self.engine.block_size();
        check_len("input", 2 * n, input.len())?;
        check_len("output", 2 * n, output.len())?;

        for i in 0..n {
            self.input_block.set_re(i, input[i]);
            self.input_block.set_im(i, input[n + i]);
        }

        self.engine
            .convolve_block(&self.input_block, &mut self.output_block);

        // re: first half convolved, starts at 0
        // im: second half convolved, starts at N
        let result = &self.output_block;
        for i in 0..n {
            output[i] = result.re(i) + self.overlap[i];
            output[n + i] = result.re(n + i) + result.im(i);
            self.overlap[i] = result.im(n + i);
        }

        Ok(())
    }

    /// Clear the carried tail
    pub fn reset(&mut self) {
        self.overlap.fill(0.0);
    }

    pub fn engine(&self) -> &ConvolutionEngine {
        &self.engine
    }
}

fn complex_kernel() -> ConvolutionError {
    ConvolutionError::invalid(
        "kernel",
        "real convolution needs a kernel with zero imaginary part",
    )
}

fn check_real(response: &FrequencyResponse) -> Result<(), ConvolutionError> {
    if response.is_conjugate_symmetric() {
        Ok(())
    } else {
        Err(complex_kernel())
    }
}
