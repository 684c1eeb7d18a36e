//! Spectral buffers and the fixed-size FFT

pub mod buffer;
pub mod fft;

pub use buffer::SpectralBuffer;
pub use fft::{SpectralTransform, TransformScale};
