//! Block convolution in the frequency domain
//!
//! Each call takes one zero-padded block of 2N samples (N live samples
//! followed by N zeros), multiplies its spectrum by the current frequency
//! response and transforms back. With a kernel of at most N + 1 taps the
//! linear convolution (length 2N) fits the transform without wrapping.
//! Stitching consecutive blocks is left to `RealConvolution` and
//! `ComplexConvolution`.

use super::error::ConvolutionError;
use super::kernel::{FilterKernel, FrequencyResponse};
use super::observer::ConvolveObserver;
use crate::filters::windows::{Taper, TaperKind};
use crate::spectrum::{SpectralBuffer, SpectralTransform, TransformScale};
use log::{debug, trace, warn};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ENGINE_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique identity of an engine instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngineId(u64);

impl EngineId {
    fn next() -> Self {
        EngineId(NEXT_ENGINE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Engine construction parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Live samples per block (N)
    pub block_size: usize,

    /// Taper used by `FilterKernel::apply_default_taper`
    pub default_taper: TaperKind,
}

impl EngineConfig {
    /// Blackman taper by default
    pub fn new(block_size: usize) -> Self {
        Self {
            block_size,
            default_taper: TaperKind::Blackman,
        }
    }

    pub fn with_taper(mut self, kind: TaperKind) -> Self {
        self.default_taper = kind;
        self
    }
}

/// Frequency-domain block convolver
///
/// Not internally synchronised: one `convolve_block` at a time per engine.
pub struct ConvolutionEngine {
    id: EngineId,

    /// Samples per block (N)
    block_size: usize,

    /// Transform length, 2N
    transform_size: usize,

    /// Maximum impulse response length, N + 1
    kernel_capacity: usize,

    transform: SpectralTransform,
    default_taper: Taper,
    frequency_response: FrequencyResponse,
    observer: Option<Box<dyn ConvolveObserver>>,

    /// Input spectrum before the multiply
    pre_multiply: SpectralBuffer,

    /// Spectrum after the multiply
    post_multiply: SpectralBuffer,
}

impl ConvolutionEngine {
    /// Create an engine with the default configuration
    ///
    /// # Arguments
    /// * `block_size` - Live samples per block (N > 0)
    pub fn new(block_size: usize) -> Result<Self, ConvolutionError> {
        Self::with_config(EngineConfig::new(block_size))
    }

    pub fn with_config(config: EngineConfig) -> Result<Self, ConvolutionError> {
        let block_size = config.block_size;
        if block_size == 0 {
            return Err(ConvolutionError::invalid("block_size", "must be greater than zero"));
        }

        let transform_size = block_size * 2;
        // Linear convolution of N samples with N + 1 taps is 2N long
        let kernel_capacity = block_size + 1;

        let id = EngineId::next();
        let transform = SpectralTransform::new(transform_size, TransformScale::Inverse);
        let default_taper = Taper::new(config.default_taper, kernel_capacity)?;

        debug!(
            "Convolution engine {:?}: block {}, transform {}, kernel capacity {}, taper {:?}",
            id, block_size, transform_size, kernel_capacity, config.default_taper
        );

        Ok(Self {
            id,
            block_size,
            transform_size,
            kernel_capacity,
            transform,
            default_taper,
            frequency_response: FrequencyResponse::empty(id, transform_size),
            observer: None,
            pre_multiply: SpectralBuffer::new(transform_size),
            post_multiply: SpectralBuffer::new(transform_size),
        })
    }

    pub(crate) fn check_binding(
        &self,
        owner: EngineId,
        arg: &'static str,
    ) -> Result<(), ConvolutionError> {
        if owner == self.id {
            Ok(())
        } else {
            Err(ConvolutionError::invalid(
                arg,
                "filter kernel was created for another engine instance",
            ))
        }
    }

    /// New zeroed kernel bound to this engine
    pub fn create_filter_kernel(&self) -> FilterKernel {
        FilterKernel::new(self.id, self.transform_size, self.kernel_capacity)
    }

    /// Replace the active frequency response with one derived from `kernel`
    ///
    /// A kernel carrying an adopted frequency response contributes that
    /// response; otherwise its time buffer is forward-transformed.
    /// Fails if the kernel belongs to another engine; the active response
    /// is then left unchanged.
    pub fn set_filter_kernel(&mut self, kernel: &FilterKernel) -> Result<(), ConvolutionError> {
        self.check_binding(kernel.engine_id(), "kernel")?;

        let response = match kernel.adopted_response() {
            Some(adopted) => adopted.clone(),
            None => FrequencyResponse::from_kernel(kernel, &mut self.transform),
        };
        self.frequency_response = response;

        debug!("Convolution engine {:?}: frequency response replaced", self.id);
        Ok(())
    }

    /// Snapshot of the active filter as a new kernel
    ///
    /// The kernel carries a copy of the stored frequency response; its time
    /// buffer is left zeroed and does not describe the filter.
    pub fn filter_kernel(&self) -> FilterKernel {
        let mut kernel = self.create_filter_kernel();
        kernel.adopt(self.frequency_response.clone());
        kernel
    }

    /// Install or clear the observer, returning the previous one
    pub fn set_observer(
        &mut self,
        observer: Option<Box<dyn ConvolveObserver>>,
    ) -> Option<Box<dyn ConvolveObserver>> {
        trace!(
            "Convolution engine {:?}: observer {}",
            self.id,
            if observer.is_some() { "installed" } else { "cleared" }
        );
        std::mem::replace(&mut self.observer, observer)
    }

    pub fn has_observer(&self) -> bool {
        self.observer.is_some()
    }

    /// Replace the default taper with one built by `factory`
    ///
    /// `factory` is called with `kernel_capacity`. On failure, or when it
    /// returns a taper of another length, the previous default stays.
    pub fn set_default_taper<F>(&mut self, factory: F) -> Result<(), ConvolutionError>
    where
        F: FnOnce(usize) -> Result<Taper, ConvolutionError>,
    {
        let taper = factory(self.kernel_capacity)
            .and_then(|taper| {
                if taper.len() == self.kernel_capacity {
                    Ok(taper)
                } else {
                    Err(ConvolutionError::LengthMismatch {
                        arg: "taper",
                        expected: self.kernel_capacity,
                        got: taper.len(),
                    })
                }
            })
            .map_err(|err| {
                warn!(
                    "Convolution engine {:?}: keeping previous default taper: {}",
                    self.id, err
                );
                err
            })?;

        self.default_taper = taper;
        Ok(())
    }

    /// Replace the default taper with a standard window
    pub fn set_default_taper_kind(&mut self, kind: TaperKind) -> Result<(), ConvolutionError> {
        self.set_default_taper(|length| Taper::new(kind, length))
    }

    /// Convolve one zero-padded block
    ///
    /// Both buffers must be `transform_size()` long and `input` must hold
    /// `block_size()` samples followed by `block_size()` zeros. Neither is
    /// checked in release builds; a violated layout aliases silently.
    ///
    /// # Arguments
    /// * `input` - Zero-padded time-domain block
    /// * `output` - Receives the 2N-sample linear convolution
    pub fn convolve_block(&mut self, input: &SpectralBuffer, output: &mut SpectralBuffer) {
        debug_assert_eq!(input.len(), self.transform_size);
        debug_assert_eq!(output.len(), self.transform_size);

        // 1. Forward FFT of the padded block
        self.transform.transform(input, &mut self.pre_multiply, false);

        if let Some(observer) = self.observer.as_mut() {
            observer.on_pre_multiply(input, &mut self.pre_multiply);
        }

        // 2. Multiply in frequency domain (convolution in time domain)
        self.post_multiply
            .cross(&self.pre_multiply, self.frequency_response.spectrum());

        // 3. Inverse FFT, scaled by 1/2N
        self.transform.transform(&self.post_multiply, output, true);

        if let Some(observer) = self.observer.as_mut() {
            observer.on_post_multiply(output, &mut self.post_multiply);
        }
    }

    /// Get block size (N)
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Get transform size (2N)
    pub fn transform_size(&self) -> usize {
        self.transform_size
    }

    /// Get usable impulse response length (N + 1)
    pub fn kernel_capacity(&self) -> usize {
        self.kernel_capacity
    }

    pub fn default_taper(&self) -> &Taper {
        &self.default_taper
    }

    /// Active frequency response
    pub fn frequency_response(&self) -> &FrequencyResponse {
        &self.frequency_response
    }

    pub fn id(&self) -> EngineId {
        self.id
    }
}

impl std::fmt::Debug for ConvolutionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConvolutionEngine")
            .field("id", &self.id)
            .field("block_size", &self.block_size)
            .field("transform_size", &self.transform_size)
            .field("kernel_capacity", &self.kernel_capacity)
            .field("has_observer", &self.observer.is_some())
            .finish()
    }
}
