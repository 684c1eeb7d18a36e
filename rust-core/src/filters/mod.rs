//! Tapers, impulse-response design and the direct FIR reference

pub mod windows;
pub mod design;
pub mod fir;

pub use windows::{TaperKind, Taper};
pub use design::{BandShape, design_response, frequency_response};
pub use fir::FirFilter;
