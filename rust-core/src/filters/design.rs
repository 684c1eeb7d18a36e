//! Windowed-sinc impulse responses
//!
//! Ideal responses truncated to a fixed length and centred in it.
//! Tapering is left to the caller (see `FilterKernel::apply_default_taper`).
//! Cutoffs are normalized frequencies in units of π rad/sample, 0 < f < 1.

use crate::convolution::error::ConvolutionError;
use num_complex::Complex64;
use std::f64::consts::PI;

/// Band shape of a designed response
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BandShape {
    LowPass { cutoff: f64 },
    HighPass { cutoff: f64 },
    BandPass { low: f64, high: f64 },
    BandStop { low: f64, high: f64 },
}

fn check_cutoff(arg: &'static str, cutoff: f64) -> Result<(), ConvolutionError> {
    if cutoff.is_finite() && cutoff > 0.0 && cutoff < 1.0 {
        Ok(())
    } else {
        Err(ConvolutionError::invalid(
            arg,
            format!("cutoff {} outside (0, 1)", cutoff),
        ))
    }
}

impl BandShape {
    /// Check cutoffs and length parity
    ///
    /// High-pass and band-stop need an odd length so the centre falls on a sample.
    pub fn validate(&self, length: usize) -> Result<(), ConvolutionError> {
        if length == 0 {
            return Err(ConvolutionError::invalid("length", "response is empty"));
        }

        match *self {
            BandShape::LowPass { cutoff } => check_cutoff("cutoff", cutoff),
            BandShape::HighPass { cutoff } => {
                check_cutoff("cutoff", cutoff)?;
                require_odd(length)
            }
            BandShape::BandPass { low, high } | BandShape::BandStop { low, high } => {
                check_cutoff("low", low)?;
                check_cutoff("high", high)?;
                if low >= high {
                    return Err(ConvolutionError::invalid(
                        "high",
                        format!("upper edge {} not above lower edge {}", high, low),
                    ));
                }
                if matches!(self, BandShape::BandStop { .. }) {
                    require_odd(length)?;
                }
                Ok(())
            }
        }
    }

    /// Ideal response at offset `n` from the centre
    fn ideal(&self, n: f64) -> f64 {
        let at_center = n.abs() < 1e-10;
        match *self {
            BandShape::LowPass { cutoff } => sinc_lowpass(cutoff, n),
            BandShape::HighPass { cutoff } => {
                let delta = if at_center { 1.0 } else { 0.0 };
                delta - sinc_lowpass(cutoff, n)
            }
            BandShape::BandPass { low, high } => sinc_lowpass(high, n) - sinc_lowpass(low, n),
            BandShape::BandStop { low, high } => {
                let delta = if at_center { 1.0 } else { 0.0 };
                delta - (sinc_lowpass(high, n) - sinc_lowpass(low, n))
            }
        }
    }
}

fn require_odd(length: usize) -> Result<(), ConvolutionError> {
    if length % 2 == 1 {
        Ok(())
    } else {
        Err(ConvolutionError::invalid(
            "length",
            format!("{} is even; this band shape needs an odd length", length),
        ))
    }
}

/// h[n] = sin(wc*n) / (π*n), with the n = 0 limit wc/π
fn sinc_lowpass(cutoff: f64, n: f64) -> f64 {
    let wc_rad = cutoff * PI;
    if n.abs() < 1e-10 {
        wc_rad / PI
    } else {
        (wc_rad * n).sin() / (PI * n)
    }
}

/// Design an untapered windowed-sinc response
///
/// # Arguments
/// * `shape` - Band shape and cutoffs
/// * `length` - Number of taps (M), centred at (M-1)/2
///
/// # Returns
/// Coefficients h[n] for n = 0..M-1
pub fn design_response(shape: BandShape, length: usize) -> Result<Vec<f64>, ConvolutionError> {
    shape.validate(length)?;

    let center = (length - 1) as f64 / 2.0;
    Ok((0..length)
        .map(|n| shape.ideal(n as f64 - center))
        .collect())
}

/// Evaluate the DTFT of `h` at the given frequencies
///
/// # Arguments
/// * `h` - Filter coefficients
/// * `frequencies` - Normalized frequencies (units of π rad/sample)
pub fn frequency_response(h: &[f64], frequencies: &[f64]) -> Vec<Complex64> {
    let mut response = Vec::with_capacity(frequencies.len());

    for &omega in frequencies {
        let omega_rad = omega * PI;
        let mut sum = Complex64::new(0.0, 0.0);

        for (n, &h_n) in h.iter().enumerate() {
            let phase = -(omega_rad * n as f64);
            sum += h_n * Complex64::new(phase.cos(), phase.sin());
        }

        response.push(sum);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_lowpass_design() {
        let h = design_response(BandShape::LowPass { cutoff: 0.5 }, 129).unwrap();

        assert_eq!(h.len(), 129);
        for i in 0..h.len() / 2 {
            assert_abs_diff_eq!(h[i], h[h.len() - 1 - i], epsilon = 1e-12);
        }

        // Untapered sinc: DC gain close to 1
        let sum: f64 = h.iter().sum();
        assert!((sum - 1.0).abs() < 0.05, "DC gain {}", sum);
    }

    #[test]
    fn test_highpass_blocks_dc() {
        let h = design_response(BandShape::HighPass { cutoff: 0.3 }, 65).unwrap();
        let dc = frequency_response(&h, &[0.0])[0];
        let nyquist = frequency_response(&h, &[1.0])[0];

        assert!(dc.norm() < 0.1, "DC leak {}", dc.norm());
        assert!((nyquist.norm() - 1.0).abs() < 0.1);
    }

    #[test]
    fn test_bandpass_and_bandstop_are_complementary() {
        let pass = design_response(BandShape::BandPass { low: 0.3, high: 0.6 }, 33).unwrap();
        let stop = design_response(BandShape::BandStop { low: 0.3, high: 0.6 }, 33).unwrap();

        // pass + stop is a unit impulse at the centre
        for n in 0..33 {
            let expected = if n == 16 { 1.0 } else { 0.0 };
            assert_abs_diff_eq!(pass[n] + stop[n], expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_invalid_designs() {
        assert!(design_response(BandShape::LowPass { cutoff: 1.0 }, 9).is_err());
        assert!(design_response(BandShape::LowPass { cutoff: 0.0 }, 9).is_err());
        assert!(design_response(BandShape::HighPass { cutoff: 0.5 }, 8).is_err());
        assert!(design_response(BandShape::BandPass { low: 0.6, high: 0.3 }, 9).is_err());
        assert!(design_response(BandShape::LowPass { cutoff: 0.5 }, 0).is_err());
    }
}
