//! Overlap-add streaming over complex samples
//!
//! N complex samples in, N out per call. With a real kernel the real and
//! imaginary channels are convolved independently, e.g. left/right audio.

use super::engine::ConvolutionEngine;
use super::error::ConvolutionError;
use super::kernel::FilterKernel;
use crate::spectrum::SpectralBuffer;
use num_complex::Complex64;

/// Continuous complex-valued convolution built on one engine
pub struct ComplexConvolution {
    engine: ConvolutionEngine,

    /// Live samples in the first half, zeros in the second
    input_block: SpectralBuffer,
    output_block: SpectralBuffer,

    /// Second half of the previous block's result
    overlap: Vec<Complex64>,
}

impl ComplexConvolution {
    pub fn new(engine: ConvolutionEngine) -> Self {
        let transform_size = engine.transform_size();
        let block_size = engine.block_size();

        Self {
            engine,
            input_block: SpectralBuffer::new(transform_size),
            output_block: SpectralBuffer::new(transform_size),
            overlap: vec![Complex64::new(0.0, 0.0); block_size],
        }
    }

    /// Create with a fresh engine of `block_size` samples
    pub fn with_block_size(block_size: usize) -> Result<Self, ConvolutionError> {
        Ok(Self::new(ConvolutionEngine::new(block_size)?))
    }

    pub fn set_filter_kernel(&mut self, kernel: &FilterKernel) -> Result<(), ConvolutionError> {
        self.engine.set_filter_kernel(kernel)
    }

    /// Convolve the next `block_size()` samples
    ///
    /// # Arguments
    /// * `input` - Exactly `block_size()` samples
    /// * `output` - Exactly `block_size()` samples, overwritten
    pub fn process(
        &mut self,
        input: &[Complex64],
        output: &mut [Complex64],
    ) -> Result<(), ConvolutionError> {
        let n = self.engine.block_size();
        check_len("input", n, input.len())?;
        check_len("output", n, output.len())?;

        // Padding half is never written, so it stays zero
        self.input_block.as_mut_slice()[..n].copy_from_slice(input);

        self.engine
            .convolve_block(&self.input_block, &mut self.output_block);

        let result = self.output_block.as_slice();
        for i in 0..n {
            output[i] = result[i] + self.overlap[i];
            self.overlap[i] = result[n + i];
        }

        Ok(())
    }

    /// Clear the carried tail
    pub fn reset(&mut self) {
        self.overlap.fill(Complex64::new(0.0, 0.0));
    }

    pub fn block_size(&self) -> usize {
        self.engine.block_size()
    }

    pub fn engine(&self) -> &ConvolutionEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut ConvolutionEngine {
        &mut self.engine
    }
}

pub(crate) fn check_len(
    arg: &'static str,
    expected: usize,
    got: usize,
) -> Result<(), ConvolutionError> {
    if expected == got {
        Ok(())
    } else {
        Err(ConvolutionError::LengthMismatch { arg, expected, got })
    }
}
