//! Direct-form FIR filter
//!
//! O(N*M) time-domain convolution with a ring-buffer delay line.
//! Numeric reference for the frequency-domain paths.

/// Streaming FIR filter
pub struct FirFilter {
    /// Filter coefficients h[n]
    coefficients: Vec<f64>,

    /// Delay line holding the last M inputs
    delay_line: Vec<f64>,

    /// Current write position in the delay line
    cursor: usize,
}

impl FirFilter {
    /// Create a filter from coefficients h[n], n = 0..M-1
    ///
    /// # Panics
    /// If `coefficients` is empty
    pub fn new(coefficients: Vec<f64>) -> Self {
        assert!(!coefficients.is_empty(), "FIR filter needs at least one tap");
        let length = coefficients.len();

        Self {
            coefficients,
            delay_line: vec![0.0; length],
            cursor: 0,
        }
    }

    /// Process one sample: y[n] = Σ h[k] * x[n-k]
    #[inline]
    pub fn process_sample(&mut self, input: f64) -> f64 {
        let length = self.delay_line.len();
        self.delay_line[self.cursor] = input;

        let mut output = 0.0;
        for (k, &coeff) in self.coefficients.iter().enumerate() {
            let idx = (self.cursor + length - k) % length;
            output += coeff * self.delay_line[idx];
        }

        self.cursor = (self.cursor + 1) % length;
        output
    }

    pub fn process_block(&mut self, input: &[f64]) -> Vec<f64> {
        input.iter().map(|&x| self.process_sample(x)).collect()
    }

    /// Clear the delay line
    pub fn reset(&mut self) {
        self.delay_line.fill(0.0);
        self.cursor = 0;
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn length(&self) -> usize {
        self.coefficients.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_moving_average() {
        let mut filter = FirFilter::new(vec![1.0 / 3.0; 3]);

        assert_abs_diff_eq!(filter.process_sample(3.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(filter.process_sample(0.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(filter.process_sample(0.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(filter.process_sample(0.0), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_delay_line_wraparound() {
        // Taps on the first and fourth samples
        let mut filter = FirFilter::new(vec![1.0, 0.0, 0.0, 1.0]);
        let output = filter.process_block(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(output, vec![1.0, 2.0, 3.0, 5.0, 7.0]);
    }

    #[test]
    fn test_reset() {
        let mut filter = FirFilter::new(vec![1.0, 1.0]);
        filter.process_sample(1.0);
        filter.process_sample(2.0);

        filter.reset();
        assert_abs_diff_eq!(filter.process_sample(1.0), 1.0, epsilon = 1e-12);
        assert_eq!(filter.length(), 2);
    }
}
