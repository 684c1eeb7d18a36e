//! Fixed-size complex FFT built on rustfft
//!
//! Forward and inverse transforms between spectral buffers with
//! pre-allocated scratch space, so repeated calls never allocate

use super::buffer::SpectralBuffer;
use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Normalisation applied by a [`SpectralTransform`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformScale {
    /// No scaling: forward then inverse multiplies by N
    None,

    /// Forward output scaled by 1/N
    Forward,

    /// Inverse output scaled by 1/N (forward then inverse is identity)
    Inverse,

    /// Both directions scaled by 1/sqrt(N)
    Symmetric,
}

/// Fixed-size forward/inverse FFT
pub struct SpectralTransform {
    /// Transform size (number of complex samples)
    size: usize,

    scale: TransformScale,

    /// Forward FFT plan
    fft: Arc<dyn Fft<f64>>,

    /// Inverse FFT plan
    ifft: Arc<dyn Fft<f64>>,

    /// Reusable scratch, sized for the larger of the two plans
    scratch: Vec<Complex64>,
}

impl SpectralTransform {
    /// Create a transform
    ///
    /// # Arguments
    /// * `size` - Transform size; every buffer passed in must have this length
    /// * `scale` - Normalisation convention
    pub fn new(size: usize, scale: TransformScale) -> Self {
        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(size);
        let ifft = planner.plan_fft_inverse(size);

        let scratch_len = fft
            .get_inplace_scratch_len()
            .max(ifft.get_inplace_scratch_len());

        Self {
            size,
            scale,
            fft,
            ifft,
            scratch: vec![Complex64::new(0.0, 0.0); scratch_len],
        }
    }

    /// Transform `input` into `output`
    ///
    /// `input` is left untouched. Both buffers must be `size()` long.
    ///
    /// # Arguments
    /// * `input` - Source buffer (time domain when `inverse` is false)
    /// * `output` - Destination buffer, fully overwritten
    /// * `inverse` - Direction of the transform
    pub fn transform(
        &mut self,
        input: &SpectralBuffer,
        output: &mut SpectralBuffer,
        inverse: bool,
    ) {
        debug_assert_eq!(input.len(), self.size);
        debug_assert_eq!(output.len(), self.size);

        output.copy_from(input);

        let plan = if inverse { &self.ifft } else { &self.fft };
        plan.process_with_scratch(output.as_mut_slice(), &mut self.scratch);

        let factor = self.factor(inverse);
        if factor != 1.0 {
            output.scale(factor);
        }
    }

    /// Scaling factor applied in the given direction
    fn factor(&self, inverse: bool) -> f64 {
        let n = self.size as f64;
        match (self.scale, inverse) {
            (TransformScale::Forward, false) | (TransformScale::Inverse, true) => 1.0 / n,
            (TransformScale::Symmetric, _) => 1.0 / n.sqrt(),
            _ => 1.0,
        }
    }

    /// Get transform size
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn scale(&self) -> TransformScale {
        self.scale
    }
}

impl std::fmt::Debug for SpectralTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpectralTransform")
            .field("size", &self.size)
            .field("scale", &self.scale)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_dc_signal() {
        let mut transform = SpectralTransform::new(64, TransformScale::Inverse);
        let signal = SpectralBuffer::from_real(&[1.0; 64]);
        let mut spectrum = SpectralBuffer::new(64);

        transform.transform(&signal, &mut spectrum, false);

        // All energy lands in the DC bin
        assert_abs_diff_eq!(spectrum.re(0), 64.0, epsilon = 1e-9);
        for k in 1..64 {
            assert!(spectrum[k].norm() < 1e-9, "Leakage at bin {}", k);
        }
    }

    #[test]
    fn test_inverse_scaling_round_trip() {
        let mut transform = SpectralTransform::new(128, TransformScale::Inverse);
        let samples: Vec<f64> = (0..128).map(|n| (0.1 * PI * n as f64).sin()).collect();
        let signal = SpectralBuffer::from_real(&samples);
        let mut spectrum = SpectralBuffer::new(128);
        let mut restored = SpectralBuffer::new(128);

        transform.transform(&signal, &mut spectrum, false);
        transform.transform(&spectrum, &mut restored, true);

        for n in 0..128 {
            assert_abs_diff_eq!(restored.re(n), samples[n], epsilon = 1e-12);
            assert_abs_diff_eq!(restored.im(n), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_unscaled_round_trip_gains_n() {
        let mut transform = SpectralTransform::new(16, TransformScale::None);
        let mut signal = SpectralBuffer::new(16);
        signal.set_re(3, 1.0);
        let mut spectrum = SpectralBuffer::new(16);
        let mut restored = SpectralBuffer::new(16);

        transform.transform(&signal, &mut spectrum, false);
        transform.transform(&spectrum, &mut restored, true);

        assert_abs_diff_eq!(restored.re(3), 16.0, epsilon = 1e-12);
    }

    #[test]
    fn test_symmetric_scaling_preserves_energy() {
        let mut transform = SpectralTransform::new(32, TransformScale::Symmetric);
        let samples: Vec<f64> = (0..32).map(|n| (n as f64 * 0.3).cos()).collect();
        let signal = SpectralBuffer::from_real(&samples);
        let mut spectrum = SpectralBuffer::new(32);

        transform.transform(&signal, &mut spectrum, false);

        let time_energy: f64 = samples.iter().map(|x| x * x).sum();
        let freq_energy: f64 = spectrum.as_slice().iter().map(|c| c.norm_sqr()).sum();
        assert_abs_diff_eq!(time_energy, freq_energy, epsilon = 1e-9);
    }
}
