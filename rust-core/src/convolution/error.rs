//! Error type for engine, kernel and taper operations

use crate::filters::windows::TaperKind;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvolutionError {
    #[error("Invalid argument `{arg}`: {reason}")]
    InvalidArgument { arg: &'static str, reason: String },

    #[error("Failed to construct taper of length {length}: {reason}")]
    TaperConstruction {
        /// `None` for factory-built or custom envelopes
        kind: Option<TaperKind>,
        length: usize,
        reason: String,
    },

    #[error("Length mismatch on `{arg}`: expected {expected}, got {got}")]
    LengthMismatch {
        arg: &'static str,
        expected: usize,
        got: usize,
    },
}

impl ConvolutionError {
    pub(crate) fn invalid(arg: &'static str, reason: impl Into<String>) -> Self {
        ConvolutionError::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }
}
