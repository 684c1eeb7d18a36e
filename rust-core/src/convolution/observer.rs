//! Hooks into the spectral stage of `convolve_block`

use crate::spectrum::SpectralBuffer;

/// Synchronous callbacks around the spectral multiply
///
/// Each hook runs once per `convolve_block` call. Writes to the spectrum
/// handed in change the result of that call.
pub trait ConvolveObserver: Send {
    /// Called after the forward transform
    ///
    /// # Arguments
    /// * `input` - Zero-padded time-domain block supplied by the caller
    /// * `spectrum` - Its spectrum, about to be multiplied
    fn on_pre_multiply(&mut self, input: &SpectralBuffer, spectrum: &mut SpectralBuffer);

    /// Called after the inverse transform
    ///
    /// # Arguments
    /// * `output` - Convolved time-domain block
    /// * `spectrum` - Spectrum after the multiply
    fn on_post_multiply(&mut self, output: &mut SpectralBuffer, spectrum: &mut SpectralBuffer);
}

/// Observer built from two closures
pub struct ObserverFns<Pre, Post> {
    pre: Pre,
    post: Post,
}

impl<Pre, Post> ObserverFns<Pre, Post>
where
    Pre: FnMut(&SpectralBuffer, &mut SpectralBuffer) + Send,
    Post: FnMut(&mut SpectralBuffer, &mut SpectralBuffer) + Send,
{
    pub fn new(pre: Pre, post: Post) -> Self {
        Self { pre, post }
    }
}

impl<Pre, Post> ConvolveObserver for ObserverFns<Pre, Post>
where
    Pre: FnMut(&SpectralBuffer, &mut SpectralBuffer) + Send,
    Post: FnMut(&mut SpectralBuffer, &mut SpectralBuffer) + Send,
{
    fn on_pre_multiply(&mut self, input: &SpectralBuffer, spectrum: &mut SpectralBuffer) {
        (self.pre)(input, spectrum)
    }

    fn on_post_multiply(&mut self, output: &mut SpectralBuffer, spectrum: &mut SpectralBuffer) {
        (self.post)(output, spectrum)
    }
}
