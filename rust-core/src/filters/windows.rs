//! Window functions used to taper impulse responses
//!
//! A taper limits spectral leakage of a truncated impulse response
//! before it is transformed into a frequency response

use crate::convolution::error::ConvolutionError;
use std::f64::consts::PI;
use std::ops::MulAssign;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaperKind {
    /// Rectangular window (no tapering)
    Rectangular,

    /// Hann window: w[n] = 0.5 - 0.5*cos(2πn/(M-1))
    /// Sidelobe attenuation: ~44 dB
    Hann,

    /// Hamming window: w[n] = 0.54 - 0.46*cos(2πn/(M-1))
    /// Sidelobe attenuation: ~53 dB
    Hamming,

    /// Blackman window: w[n] = 0.42 - 0.5*cos(2πn/(M-1)) + 0.08*cos(4πn/(M-1))
    /// Sidelobe attenuation: ~74 dB
    Blackman,
}

impl TaperKind {
    /// Get approximate stopband attenuation in dB
    pub fn stopband_attenuation_db(&self) -> f64 {
        match self {
            TaperKind::Hann => -44.0,
            TaperKind::Hamming => -53.0,
            TaperKind::Blackman => -74.0,
            TaperKind::Rectangular => -21.0,
        }
    }

    /// Shortest envelope this kind can produce
    pub fn min_length(&self) -> usize {
        match self {
            TaperKind::Rectangular => 1,
            // Cosine families divide by (M - 1)
            _ => 2,
        }
    }
}

/// Generate window coefficients
///
/// # Arguments
/// * `kind` - Type of window function
/// * `length` - Number of samples (M), at least `kind.min_length()`
///
/// # Returns
/// Vector of window coefficients w[n] for n = 0..M-1
pub(crate) fn generate_window(kind: TaperKind, length: usize) -> Vec<f64> {
    let m = length as f64;
    let mut window = Vec::with_capacity(length);

    match kind {
        TaperKind::Hann => {
            for n in 0..length {
                let angle = 2.0 * PI * n as f64 / (m - 1.0);
                window.push(0.5 - 0.5 * angle.cos());
            }
        }

        TaperKind::Hamming => {
            for n in 0..length {
                let angle = 2.0 * PI * n as f64 / (m - 1.0);
                window.push(0.54 - 0.46 * angle.cos());
            }
        }

        TaperKind::Blackman => {
            for n in 0..length {
                let angle1 = 2.0 * PI * n as f64 / (m - 1.0);
                let angle2 = 4.0 * PI * n as f64 / (m - 1.0);
                window.push(0.42 - 0.5 * angle1.cos() + 0.08 * angle2.cos());
            }
        }

        TaperKind::Rectangular => {
            window.resize(length, 1.0);
        }
    }

    window
}

/// Envelope of a fixed length, applied to an impulse response
#[derive(Debug, Clone, PartialEq)]
pub struct Taper {
    /// `None` for custom envelopes
    kind: Option<TaperKind>,

    coefficients: Vec<f64>,
}

impl Taper {
    /// Build a standard window of the given length
    ///
    /// Fails when `length` is shorter than `kind.min_length()`
    pub fn new(kind: TaperKind, length: usize) -> Result<Self, ConvolutionError> {
        if length < kind.min_length() {
            return Err(ConvolutionError::TaperConstruction {
                kind: Some(kind),
                length,
                reason: format!(
                    "{:?} needs at least {} samples",
                    kind,
                    kind.min_length()
                ),
            });
        }

        Ok(Self {
            kind: Some(kind),
            coefficients: generate_window(kind, length),
        })
    }

    /// Wrap caller-supplied coefficients
    ///
    /// Fails on an empty envelope or non-finite values
    pub fn from_coefficients(coefficients: Vec<f64>) -> Result<Self, ConvolutionError> {
        if coefficients.is_empty() {
            return Err(ConvolutionError::TaperConstruction {
                kind: None,
                length: 0,
                reason: "envelope is empty".to_string(),
            });
        }
        if let Some(n) = coefficients.iter().position(|c| !c.is_finite()) {
            return Err(ConvolutionError::TaperConstruction {
                kind: None,
                length: coefficients.len(),
                reason: format!("coefficient {} is not finite", n),
            });
        }

        Ok(Self {
            kind: None,
            coefficients,
        })
    }

    /// Multiply `samples` by the envelope
    ///
    /// Only the overlapping prefix is touched when lengths differ.
    /// Complex samples have both parts scaled.
    pub fn apply<T: MulAssign<f64>>(&self, samples: &mut [T]) {
        for (s, &w) in samples.iter_mut().zip(self.coefficients.iter()) {
            *s *= w;
        }
    }

    pub fn kind(&self) -> Option<TaperKind> {
        self.kind
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use num_complex::Complex64;

    #[test]
    fn test_window_generation() {
        let length = 161;

        let hann = generate_window(TaperKind::Hann, length);
        let hamming = generate_window(TaperKind::Hamming, length);
        let blackman = generate_window(TaperKind::Blackman, length);

        assert_eq!(hann.len(), length);
        assert_eq!(hamming.len(), length);
        assert_eq!(blackman.len(), length);

        // Symmetric
        assert_abs_diff_eq!(hann[0], hann[length - 1], epsilon = 1e-10);
        assert_abs_diff_eq!(hamming[0], hamming[length - 1], epsilon = 1e-10);
        assert_abs_diff_eq!(blackman[0], blackman[length - 1], epsilon = 1e-10);

        // Peak of 1.0 at the centre
        let center = length / 2;
        assert_abs_diff_eq!(hann[center], 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(hamming[center], 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(blackman[center], 1.0, epsilon = 1e-10);

        // Hamming keeps non-zero endpoints (0.08)
        assert!(hamming[0] > 0.07 && hamming[0] < 0.09);
    }

    #[test]
    fn test_rectangular_window() {
        let window = generate_window(TaperKind::Rectangular, 100);
        assert_eq!(window.len(), 100);
        assert!(window.iter().all(|&w| w == 1.0));
    }

    #[test]
    fn test_taper_rejects_short_lengths() {
        assert!(Taper::new(TaperKind::Rectangular, 1).is_ok());
        assert_eq!(
            Taper::new(TaperKind::Hann, 1),
            Err(ConvolutionError::TaperConstruction {
                kind: Some(TaperKind::Hann),
                length: 1,
                reason: "Hann needs at least 2 samples".to_string(),
            })
        );
        assert!(Taper::new(TaperKind::Blackman, 0).is_err());
    }

    #[test]
    fn test_custom_taper_validation() {
        assert!(matches!(
            Taper::from_coefficients(vec![]),
            Err(ConvolutionError::TaperConstruction { kind: None, length: 0, .. })
        ));
        assert!(Taper::from_coefficients(vec![1.0, f64::NAN]).is_err());

        let taper = Taper::from_coefficients(vec![0.5, 2.0]).unwrap();
        assert_eq!(taper.kind(), None);

        let mut samples = [4.0, 4.0, 4.0];
        taper.apply(&mut samples[..]);
        assert_eq!(samples, [2.0, 8.0, 4.0]);
    }

    #[test]
    fn test_apply_scales_complex_samples() {
        let taper = Taper::new(TaperKind::Hann, 3).unwrap();
        let mut samples = vec![Complex64::new(2.0, -2.0); 3];
        taper.apply(&mut samples[..]);

        assert_abs_diff_eq!(samples[0].norm(), 0.0, epsilon = 1e-12);
        assert_eq!(samples[1], Complex64::new(2.0, -2.0));
        assert_abs_diff_eq!(samples[2].norm(), 0.0, epsilon = 1e-12);
    }
}
