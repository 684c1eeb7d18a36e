//! Filter kernels and their retained frequency responses
//!
//! A [`FilterKernel`] is the editable time-domain side, a
//! [`FrequencyResponse`] is what the engine actually multiplies against.
//! Both carry the id of the engine that created them.

use super::engine::{ConvolutionEngine, EngineId};
use super::error::ConvolutionError;
use crate::filters::design::{design_response, BandShape};
use crate::spectrum::{SpectralBuffer, SpectralTransform};

/// Transformed impulse response bound to one engine
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyResponse {
    engine: EngineId,
    spectrum: SpectralBuffer,
}

impl FrequencyResponse {
    /// All-zero response (every block convolves to silence)
    pub(crate) fn empty(engine: EngineId, transform_size: usize) -> Self {
        Self {
            engine,
            spectrum: SpectralBuffer::new(transform_size),
        }
    }

    /// Forward-transform a kernel's time buffer
    pub(crate) fn from_kernel(
        kernel: &FilterKernel,
        transform: &mut SpectralTransform,
    ) -> Self {
        let mut spectrum = SpectralBuffer::new(transform.size());
        transform.transform(&kernel.impulse_response, &mut spectrum, false);

        Self {
            engine: kernel.engine,
            spectrum,
        }
    }

    pub(crate) fn engine_id(&self) -> EngineId {
        self.engine
    }

    /// Frequency bins, `transform_size` long
    pub fn spectrum(&self) -> &SpectralBuffer {
        &self.spectrum
    }

    /// Whether H[k] = conj(H[-k]) for every bin (the impulse response is real)
    pub fn is_conjugate_symmetric(&self) -> bool {
        let bins = self.spectrum.as_slice();
        let size = bins.len();
        let peak = bins.iter().map(|c| c.norm()).fold(0.0, f64::max);
        let tolerance = 1e-9 * peak.max(1.0);

        (0..size).all(|k| {
            let mirror = bins[(size - k) % size].conj();
            (bins[k] - mirror).norm() <= tolerance
        })
    }

    /// Magnitude |H[k]| per bin
    pub fn magnitude(&self) -> Vec<f64> {
        self.spectrum.as_slice().iter().map(|c| c.norm()).collect()
    }

    /// Magnitude in dB: 20*log10(|H[k]|), floored at -200 dB
    pub fn magnitude_db(&self) -> Vec<f64> {
        self.magnitude()
            .iter()
            .map(|&mag| 20.0 * mag.max(1e-10).log10())
            .collect()
    }
}

/// Time-domain impulse response bound to one engine
///
/// The buffer is `transform_size` long; only the first `kernel_capacity`
/// samples may be non-zero; anything beyond wraps around into the output.
#[derive(Debug, Clone)]
pub struct FilterKernel {
    engine: EngineId,
    kernel_capacity: usize,
    impulse_response: SpectralBuffer,

    /// Set by `set_frequency_response`; the time buffer is stale while present
    adopted: Option<FrequencyResponse>,
}

impl FilterKernel {
    pub(crate) fn new(engine: EngineId, transform_size: usize, kernel_capacity: usize) -> Self {
        Self {
            engine,
            kernel_capacity,
            impulse_response: SpectralBuffer::new(transform_size),
            adopted: None,
        }
    }

    pub(crate) fn engine_id(&self) -> EngineId {
        self.engine
    }

    pub(crate) fn adopted_response(&self) -> Option<&FrequencyResponse> {
        self.adopted.as_ref()
    }

    /// Usable length of the impulse response
    pub fn kernel_capacity(&self) -> usize {
        self.kernel_capacity
    }

    /// Whole time buffer, zero-padding region included
    pub fn impulse_response(&self) -> &SpectralBuffer {
        &self.impulse_response
    }

    /// Mutable time buffer
    ///
    /// Drops any adopted frequency response so the written samples are used.
    pub fn impulse_response_mut(&mut self) -> &mut SpectralBuffer {
        self.adopted = None;
        &mut self.impulse_response
    }

    /// Mutable view of the first `kernel_capacity` samples
    pub fn usable_region_mut(&mut self) -> &mut [num_complex::Complex64] {
        let capacity = self.kernel_capacity;
        &mut self.impulse_response_mut().as_mut_slice()[..capacity]
    }

    /// Whether this kernel carries an adopted frequency response
    pub fn has_frequency_response(&self) -> bool {
        self.adopted.is_some()
    }

    /// Replace the impulse response with real samples
    ///
    /// Imaginary parts and the padding region are zeroed.
    /// Fails if `response` is longer than `kernel_capacity`.
    pub fn set_custom_response(&mut self, response: &[f64]) -> Result<(), ConvolutionError> {
        if response.len() > self.kernel_capacity {
            return Err(ConvolutionError::LengthMismatch {
                arg: "response",
                expected: self.kernel_capacity,
                got: response.len(),
            });
        }

        let buffer = self.impulse_response_mut();
        buffer.clear();
        for (n, &h) in response.iter().enumerate() {
            buffer.set_re(n, h);
        }

        Ok(())
    }

    /// Multiply the usable region by the engine's default taper
    ///
    /// Real and imaginary parts are tapered alike.
    pub fn apply_default_taper(
        &mut self,
        engine: &ConvolutionEngine,
    ) -> Result<(), ConvolutionError> {
        engine.check_binding(self.engine, "kernel")?;
        engine.default_taper().apply(self.usable_region_mut());
        Ok(())
    }

    /// Adopt a structural copy of `response`
    ///
    /// The time buffer is left as is and no longer describes the filter.
    pub fn set_frequency_response(
        &mut self,
        response: &FrequencyResponse,
    ) -> Result<(), ConvolutionError> {
        if response.engine_id() != self.engine {
            return Err(ConvolutionError::invalid(
                "response",
                "frequency response belongs to another engine instance",
            ));
        }

        self.adopt(response.clone());
        Ok(())
    }

    pub(crate) fn adopt(&mut self, response: FrequencyResponse) {
        self.adopted = Some(response);
    }

    /// Fill with a tapered windowed-sinc design of length `kernel_capacity`
    pub fn design(
        &mut self,
        engine: &ConvolutionEngine,
        shape: BandShape,
    ) -> Result<(), ConvolutionError> {
        engine.check_binding(self.engine, "kernel")?;

        let response = design_response(shape, self.kernel_capacity)?;
        self.set_custom_response(&response)?;
        self.apply_default_taper(engine)
    }

    /// Low-pass with `cutoff` in units of π rad/sample
    pub fn design_low_pass(
        &mut self,
        engine: &ConvolutionEngine,
        cutoff: f64,
    ) -> Result<(), ConvolutionError> {
        self.design(engine, BandShape::LowPass { cutoff })
    }

    pub fn design_high_pass(
        &mut self,
        engine: &ConvolutionEngine,
        cutoff: f64,
    ) -> Result<(), ConvolutionError> {
        self.design(engine, BandShape::HighPass { cutoff })
    }

    pub fn design_band_pass(
        &mut self,
        engine: &ConvolutionEngine,
        low: f64,
        high: f64,
    ) -> Result<(), ConvolutionError> {
        self.design(engine, BandShape::BandPass { low, high })
    }

    pub fn design_band_stop(
        &mut self,
        engine: &ConvolutionEngine,
        low: f64,
        high: f64,
    ) -> Result<(), ConvolutionError> {
        self.design(engine, BandShape::BandStop { low, high })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::windows::TaperKind;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_custom_response_layout() {
        let engine = ConvolutionEngine::new(8).unwrap();
        let mut kernel = engine.create_filter_kernel();

        kernel.set_custom_response(&[1.0, 0.5, 0.25]).unwrap();

        let buffer = kernel.impulse_response();
        assert_eq!(buffer.len(), 16);
        assert_eq!(buffer.re(1), 0.5);
        assert!(buffer.as_slice()[3..].iter().all(|c| c.re == 0.0 && c.im == 0.0));
    }

    #[test]
    fn test_custom_response_too_long() {
        let engine = ConvolutionEngine::new(4).unwrap();
        let mut kernel = engine.create_filter_kernel();

        // Capacity is N + 1 = 5
        assert!(kernel.set_custom_response(&[0.0; 5]).is_ok());
        assert_eq!(
            kernel.set_custom_response(&[0.0; 6]),
            Err(ConvolutionError::LengthMismatch {
                arg: "response",
                expected: 5,
                got: 6
            })
        );
    }

    #[test]
    fn test_default_taper_shapes_usable_region() {
        let mut engine = ConvolutionEngine::new(8).unwrap();
        engine.set_default_taper_kind(TaperKind::Hann).unwrap();

        let mut kernel = engine.create_filter_kernel();
        kernel.set_custom_response(&[1.0; 9]).unwrap();
        kernel.apply_default_taper(&engine).unwrap();

        let buffer = kernel.impulse_response();
        assert_abs_diff_eq!(buffer.re(0), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(buffer.re(4), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(buffer.re(8), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_taper_with_foreign_engine_fails() {
        let a = ConvolutionEngine::new(8).unwrap();
        let b = ConvolutionEngine::new(8).unwrap();
        let mut kernel = a.create_filter_kernel();

        assert!(matches!(
            kernel.apply_default_taper(&b),
            Err(ConvolutionError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_mutable_access_drops_adopted_response() {
        let engine = ConvolutionEngine::new(8).unwrap();
        let mut kernel = engine.filter_kernel();
        assert!(kernel.has_frequency_response());

        kernel.impulse_response_mut().set_re(0, 1.0);
        assert!(!kernel.has_frequency_response());
    }

    #[test]
    fn test_adopting_foreign_response_fails() {
        let a = ConvolutionEngine::new(8).unwrap();
        let b = ConvolutionEngine::new(8).unwrap();
        let mut kernel = a.create_filter_kernel();

        assert!(kernel.set_frequency_response(b.frequency_response()).is_err());
        assert!(kernel.set_frequency_response(a.frequency_response()).is_ok());
    }

    #[test]
    fn test_designed_low_pass_response() {
        let mut engine = ConvolutionEngine::new(64).unwrap();
        let mut kernel = engine.create_filter_kernel();
        kernel.design_low_pass(&engine, 0.25).unwrap();
        engine.set_filter_kernel(&kernel).unwrap();

        let magnitude = engine.frequency_response().magnitude();
        // 128 bins; bin k is normalized frequency 2k/128
        assert!((magnitude[0] - 1.0).abs() < 0.05, "DC {}", magnitude[0]);
        assert!(magnitude[48] < 0.01, "stopband {}", magnitude[48]);
        assert!(engine.frequency_response().magnitude_db()[48] < -40.0);
    }
}
