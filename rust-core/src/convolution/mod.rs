//! Overlap-add fast convolution
//!
//! `ConvolutionEngine` does the per-block spectral multiply;
//! `RealConvolution` and `ComplexConvolution` stitch blocks into a stream.

pub mod error;
pub mod engine;
pub mod kernel;
pub mod observer;
pub mod complex;
pub mod real;

pub use error::ConvolutionError;
pub use engine::{ConvolutionEngine, EngineConfig, EngineId};
pub use kernel::{FilterKernel, FrequencyResponse};
pub use observer::{ConvolveObserver, ObserverFns};
pub use complex::ComplexConvolution;
pub use real::RealConvolution;
