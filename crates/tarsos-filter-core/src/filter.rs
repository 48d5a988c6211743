//! The common filter interface and per-channel runtime state.
//!
//! Both realizations ([`DirectFormFilter`] and [`CascadeFilter`]) are
//! immutable once built. Everything that changes from sample to sample lives
//! in a [`FilterState`], so one designed filter can drive any number of
//! independent channels, each with its own state.

use alloc::vec;
use alloc::vec::Vec;

use crate::cascade::CascadeFilter;
use crate::complex::Complex;
use crate::direct::DirectFormFilter;
use crate::error::CoreError;
use crate::ring::RingBuffer;

/// Object-safe interface shared by all filter realizations.
pub trait Filter {
    /// Filters `input` into `output`, continuing from `state`.
    ///
    /// Processes `min(input.len(), output.len())` samples. A state built for
    /// a different filter shape is replaced by a zeroed one first.
    fn process(&self, input: &[f64], output: &mut [f64], state: &mut FilterState);

    /// Evaluates the transfer function `H(z)`.
    ///
    /// Fails with [`CoreError::Domain`] when `z` is zero or sits exactly on a pole.
    fn eval_transfer(&self, z: Complex) -> Result<Complex, CoreError>;

    /// Filter length: coefficient count for direct form, stage count for cascades.
    fn length(&self) -> usize;

    /// Fresh zeroed state sized for this filter.
    fn create_state(&self) -> FilterState;

    /// Whether block FFT convolution beats per-sample evaluation for this filter.
    fn uses_convolution(&self) -> bool {
        false
    }

    /// Sample offset at which an impulse should be injected when extracting
    /// the impulse response.
    fn impulse_offset(&self) -> usize {
        0
    }

    /// Sample offset at which a step should start when extracting the step response.
    fn step_offset(&self) -> usize {
        0
    }

    /// Dense impulse response for feedforward-only filters, `None` otherwise.
    fn fir_kernel(&self) -> Option<Vec<f64>> {
        None
    }
}

/// Per-channel history that lets a filter continue across block boundaries.
///
/// Direct-form filters use the two rings (input and output history); cascades
/// use `3 * stage_count` values of section history. The unused half stays
/// minimal.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    input: RingBuffer,
    output: RingBuffer,
    stages: Vec<f64>,
}

impl FilterState {
    /// State for a direct-form filter that looks back at most `max_tap` samples.
    pub fn for_direct(max_tap: usize) -> Self {
        Self {
            input: RingBuffer::with_history(max_tap),
            output: RingBuffer::with_history(max_tap),
            stages: Vec::new(),
        }
    }

    /// State for a cascade of `stage_count` second-order sections.
    pub fn for_cascade(stage_count: usize) -> Self {
        Self {
            input: RingBuffer::with_history(0),
            output: RingBuffer::with_history(0),
            stages: vec![0.0; stage_count * 3],
        }
    }

    /// Zeroes all history, keeping allocations.
    pub fn reset(&mut self) {
        self.input.clear();
        self.output.clear();
        self.stages.fill(0.0);
    }

    /// Capacity of the direct-form history rings.
    pub fn history_len(&self) -> usize {
        self.input.len()
    }

    /// Section history `[w0, w1, w2]` per cascade stage.
    pub fn stage_history(&self) -> &[f64] {
        &self.stages
    }

    /// Rings able to look back `max_tap` samples, rebuilt if too small.
    pub(crate) fn direct_mut(&mut self, max_tap: usize) -> (&mut RingBuffer, &mut RingBuffer) {
        if self.input.len() <= max_tap {
            *self = Self::for_direct(max_tap);
        }
        (&mut self.input, &mut self.output)
    }

    /// Section history for exactly `stage_count` stages, rebuilt on mismatch.
    pub(crate) fn cascade_mut(&mut self, stage_count: usize) -> &mut [f64] {
        if self.stages.len() != stage_count * 3 {
            *self = Self::for_cascade(stage_count);
        }
        &mut self.stages
    }
}

/// A realized filter of either shape.
#[derive(Debug, Clone, PartialEq)]
pub enum DigitalFilter {
    /// Sparse direct form (FIR or IIR).
    Direct(DirectFormFilter),
    /// Cascade of biquad sections.
    Cascade(CascadeFilter),
}

impl DigitalFilter {
    /// Short label of the realization.
    pub fn kind(&self) -> &'static str {
        match self {
            DigitalFilter::Direct(_) => "direct",
            DigitalFilter::Cascade(_) => "cascade",
        }
    }

    fn as_filter(&self) -> &dyn Filter {
        match self {
            DigitalFilter::Direct(f) => f,
            DigitalFilter::Cascade(f) => f,
        }
    }
}

impl Filter for DigitalFilter {
    fn process(&self, input: &[f64], output: &mut [f64], state: &mut FilterState) {
        self.as_filter().process(input, output, state);
    }

    fn eval_transfer(&self, z: Complex) -> Result<Complex, CoreError> {
        self.as_filter().eval_transfer(z)
    }

    fn length(&self) -> usize {
        self.as_filter().length()
    }

    fn create_state(&self) -> FilterState {
        self.as_filter().create_state()
    }

    fn uses_convolution(&self) -> bool {
        self.as_filter().uses_convolution()
    }

    fn impulse_offset(&self) -> usize {
        self.as_filter().impulse_offset()
    }

    fn step_offset(&self) -> usize {
        self.as_filter().step_offset()
    }

    fn fir_kernel(&self) -> Option<Vec<f64>> {
        self.as_filter().fir_kernel()
    }
}

impl From<DirectFormFilter> for DigitalFilter {
    fn from(f: DirectFormFilter) -> Self {
        DigitalFilter::Direct(f)
    }
}

impl From<CascadeFilter> for DigitalFilter {
    fn from(f: CascadeFilter) -> Self {
        DigitalFilter::Cascade(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_state_grows_on_demand() {
        let mut state = FilterState::for_direct(3);
        assert_eq!(state.history_len(), 4);
        let (input, _) = state.direct_mut(9);
        assert_eq!(input.len(), 16);
    }

    #[test]
    fn cascade_state_resizes_on_mismatch() {
        let mut state = FilterState::for_cascade(2);
        assert_eq!(state.stage_history().len(), 6);
        assert_eq!(state.cascade_mut(3).len(), 9);
    }

    #[test]
    fn digital_filter_delegates() {
        let fir = DirectFormFilter::fir(vec![0.5, 0.5]).unwrap();
        let filter = DigitalFilter::from(fir);
        assert_eq!(filter.kind(), "direct");
        assert_eq!(filter.length(), 2);
        let h = filter.eval_transfer(Complex::ONE).unwrap();
        assert!((h.re - 1.0).abs() < 1e-12);
    }
}
