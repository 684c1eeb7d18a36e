//! Overlap Convolution - Block-Based Fast Convolution Core
//!
//! Frequency-domain convolution of streamed signals against a fixed
//! impulse response, with optional Python bindings.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![cfg_attr(feature = "python", allow(non_local_definitions))]

pub mod convolution;
pub mod filters;
pub mod spectrum;
#[cfg(feature = "python")]
pub mod python_bindings;

pub use convolution::{
    ComplexConvolution, ConvolutionEngine, ConvolutionError, ConvolveObserver, EngineConfig,
    FilterKernel, FrequencyResponse, RealConvolution,
};
pub use filters::{Taper, TaperKind};
pub use spectrum::{SpectralBuffer, SpectralTransform, TransformScale};
