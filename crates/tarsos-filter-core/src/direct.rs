//! Sparse direct-form filter.
//!
//! Implements
//!
//! ```text
//! y[n] = Σ a[k]·x[n - d[k]]  -  Σ_{k≥1} b[k]·y[n - d[k]]
//! ```
//!
//! where `d` is a strictly increasing list of integer delays starting at 0.
//! Plain FIR filters have no feedback list; sparse IIR designs such as comb
//! filters carry taps only at the delays they need (e.g. `[0, N]`).

use alloc::vec;
use alloc::vec::Vec;

use crate::complex::Complex;
use crate::error::CoreError;
use crate::filter::{Filter, FilterState};

/// Feedforward-only filters longer than this are better served by FFT convolution.
pub const CONVOLUTION_MIN_TAPS: usize = 25;

/// Direct-form filter with coefficients at explicit delay taps.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectFormFilter {
    feedforward: Vec<f64>,
    taps: Vec<usize>,
    feedback: Option<Vec<f64>>,
}

impl DirectFormFilter {
    /// Builds a filter from coefficients and delays.
    ///
    /// `feedback[0]` is ignored (the output coefficient is implicitly 1).
    ///
    /// # Errors
    ///
    /// [`CoreError::Config`] when the lists are empty, their lengths differ,
    /// the first tap is not 0, the taps are not strictly increasing, or any
    /// coefficient is non-finite.
    pub fn new(
        feedforward: Vec<f64>,
        taps: Vec<usize>,
        feedback: Option<Vec<f64>>,
    ) -> Result<Self, CoreError> {
        if feedforward.is_empty() {
            return Err(CoreError::config("feedforward coefficients are empty"));
        }
        if feedforward.len() != taps.len() {
            return Err(CoreError::config(alloc::format!(
                "{} feedforward coefficients but {} delay taps",
                feedforward.len(),
                taps.len()
            )));
        }
        if let Some(b) = &feedback
            && b.len() != feedforward.len()
        {
            return Err(CoreError::config(alloc::format!(
                "{} feedback coefficients but {} feedforward coefficients",
                b.len(),
                feedforward.len()
            )));
        }
        if taps[0] != 0 {
            return Err(CoreError::config("first delay tap must be 0"));
        }
        if taps.windows(2).any(|w| w[1] <= w[0]) {
            return Err(CoreError::config("delay taps must be strictly increasing"));
        }
        let all_finite = feedforward.iter().all(|c| c.is_finite())
            && feedback
                .as_ref()
                .is_none_or(|b| b.iter().skip(1).all(|c| c.is_finite()));
        if !all_finite {
            return Err(CoreError::config("coefficients must be finite"));
        }

        Ok(Self {
            feedforward,
            taps,
            feedback,
        })
    }

    /// Dense FIR filter: coefficient `i` applies at delay `i`.
    pub fn fir(coefficients: Vec<f64>) -> Result<Self, CoreError> {
        let taps = (0..coefficients.len()).collect();
        Self::new(coefficients, taps, None)
    }

    /// Identity filter `y[n] = x[n]`.
    pub fn identity() -> Self {
        Self {
            feedforward: vec![1.0],
            taps: vec![0],
            feedback: None,
        }
    }

    /// Feedforward coefficients.
    pub fn feedforward(&self) -> &[f64] {
        &self.feedforward
    }

    /// Delay taps in samples.
    pub fn taps(&self) -> &[usize] {
        &self.taps
    }

    /// Feedback coefficients, if recursive.
    pub fn feedback(&self) -> Option<&[f64]> {
        self.feedback.as_deref()
    }

    /// Longest delay in samples.
    pub fn max_tap(&self) -> usize {
        self.taps.last().copied().unwrap_or(0)
    }

    /// True for a feedforward-only filter with dense taps `0..len`.
    ///
    /// Its impulse response is the coefficient list itself.
    pub fn is_simple_fir(&self) -> bool {
        self.feedback.is_none() && self.max_tap() == self.taps.len() - 1
    }

    /// Expands a feedforward-only filter into its dense impulse response.
    pub fn dense_kernel(&self) -> Option<Vec<f64>> {
        if self.feedback.is_some() {
            return None;
        }
        let mut kernel = vec![0.0; self.max_tap() + 1];
        for (&a, &d) in self.feedforward.iter().zip(&self.taps) {
            kernel[d] = a;
        }
        Some(kernel)
    }

    /// Returns a copy with every feedforward coefficient multiplied by `gain`.
    pub fn scaled(&self, gain: f64) -> Self {
        Self {
            feedforward: self.feedforward.iter().map(|a| a * gain).collect(),
            taps: self.taps.clone(),
            feedback: self.feedback.clone(),
        }
    }
}

impl Filter for DirectFormFilter {
    fn process(&self, input: &[f64], output: &mut [f64], state: &mut FilterState) {
        let (x_hist, y_hist) = state.direct_mut(self.max_tap());
        let a = &self.feedforward;
        let d = &self.taps;

        for (&x, y) in input.iter().zip(output.iter_mut()) {
            x_hist.write(x);
            let mut q = a[0] * x;
            match &self.feedback {
                None => {
                    for k in 1..a.len() {
                        q += a[k] * x_hist.read(d[k]);
                    }
                }
                Some(b) => {
                    // y_hist has not seen this sample yet, so y[n - d] is d - 1 writes back
                    for k in 1..a.len() {
                        q += a[k] * x_hist.read(d[k]) - b[k] * y_hist.read(d[k] - 1);
                    }
                }
            }
            y_hist.write(q);
            *y = q;
        }
    }

    fn eval_transfer(&self, z: Complex) -> Result<Complex, CoreError> {
        let zinv = z.reciprocal()?;
        let mut zn = Complex::ONE;
        let mut n = 0usize;
        let mut top = Complex::ZERO;
        let mut bottom = Complex::ZERO;

        for (k, (&a, &tap)) in self.feedforward.iter().zip(&self.taps).enumerate() {
            // Step by repeated multiplication for short gaps, jump with pow for long ones
            while n < tap {
                if tap - n > 3 {
                    zn = zinv.pow(tap as f64);
                    n = tap;
                } else {
                    zn = zn * zinv;
                    n += 1;
                }
            }
            top = top + zn * a;
            if let Some(b) = &self.feedback {
                let bk = if k == 0 { 1.0 } else { b[k] };
                bottom = bottom + zn * bk;
            }
        }

        if self.feedback.is_some() {
            top.div(bottom)
        } else {
            Ok(top)
        }
    }

    fn length(&self) -> usize {
        self.feedforward.len()
    }

    fn create_state(&self) -> FilterState {
        FilterState::for_direct(self.max_tap())
    }

    fn uses_convolution(&self) -> bool {
        self.feedback.is_none() && self.feedforward.len() > CONVOLUTION_MIN_TAPS
    }

    fn impulse_offset(&self) -> usize {
        if self.is_simple_fir() {
            0
        } else {
            self.step_offset()
        }
    }

    fn step_offset(&self) -> usize {
        self.max_tap()
    }

    fn fir_kernel(&self) -> Option<Vec<f64>> {
        self.dense_kernel()
    }
}
