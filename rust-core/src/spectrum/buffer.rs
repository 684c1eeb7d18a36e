//! Fixed-length complex sample buffer
//!
//! Shared container for time-domain blocks and frequency-domain spectra

use num_complex::Complex64;
use std::ops::{Index, IndexMut};

/// Fixed-length buffer of complex samples
///
/// Used both for zero-padded time-domain blocks and for spectra.
/// The length never changes after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralBuffer {
    data: Vec<Complex64>,
}

impl SpectralBuffer {
    /// Create a zeroed buffer
    ///
    /// # Arguments
    /// * `len` - Number of complex samples
    pub fn new(len: usize) -> Self {
        Self {
            data: vec![Complex64::new(0.0, 0.0); len],
        }
    }

    /// Create a buffer from real samples (imaginary parts zero)
    pub fn from_real(samples: &[f64]) -> Self {
        Self {
            data: samples.iter().map(|&re| Complex64::new(re, 0.0)).collect(),
        }
    }

    /// Number of complex samples
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Real component at `index`
    #[inline]
    pub fn re(&self, index: usize) -> f64 {
        self.data[index].re
    }

    /// Imaginary component at `index`
    #[inline]
    pub fn im(&self, index: usize) -> f64 {
        self.data[index].im
    }

    #[inline]
    pub fn set_re(&mut self, index: usize, value: f64) {
        self.data[index].re = value;
    }

    #[inline]
    pub fn set_im(&mut self, index: usize, value: f64) {
        self.data[index].im = value;
    }

    pub fn as_slice(&self) -> &[Complex64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [Complex64] {
        &mut self.data
    }

    /// Zero every sample
    pub fn clear(&mut self) {
        self.data.fill(Complex64::new(0.0, 0.0));
    }

    /// Zero the imaginary part of every sample
    pub fn zero_imaginary(&mut self) {
        for sample in self.data.iter_mut() {
            sample.im = 0.0;
        }
    }

    /// Overwrite this buffer with the contents of `other`
    ///
    /// # Panics
    /// If the lengths differ
    pub fn copy_from(&mut self, other: &SpectralBuffer) {
        self.data.copy_from_slice(&other.data);
    }

    /// Multiply every sample by a real factor
    pub fn scale(&mut self, factor: f64) {
        for sample in self.data.iter_mut() {
            *sample *= factor;
        }
    }

    /// Elementwise complex multiplication: self[k] = a[k] * b[k]
    ///
    /// # Panics
    /// If the three lengths differ
    #[inline]
    pub fn cross(&mut self, a: &SpectralBuffer, b: &SpectralBuffer) {
        assert_eq!(self.data.len(), a.data.len());
        assert_eq!(self.data.len(), b.data.len());

        for ((out, &x), &y) in self.data.iter_mut().zip(a.data.iter()).zip(b.data.iter()) {
            *out = x * y;
        }
    }
}

impl Index<usize> for SpectralBuffer {
    type Output = Complex64;

    fn index(&self, index: usize) -> &Complex64 {
        &self.data[index]
    }
}

impl IndexMut<usize> for SpectralBuffer {
    fn index_mut(&mut self, index: usize) -> &mut Complex64 {
        &mut self.data[index]
    }
}
