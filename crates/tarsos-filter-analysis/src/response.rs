//! Frequency, impulse and step responses of realized filters.
//!
//! [`frequency_response`] samples `H(e^{jω})` on `N` evenly spaced points of
//! `[0, π)`. Feedforward-only filters are evaluated by zero-padding their
//! kernel into a `2N`-point FFT; everything else is evaluated pointwise
//! through [`Filter::eval_transfer`]. The table is normalized so its largest
//! magnitude is 1, and the raw peak is kept for callers that need it.
//!
//! Time-domain responses run the filter over a zeroed state with a buffer of
//! at least [`MIN_RESPONSE_LEN`] samples, then measure how long the response
//! takes to settle (see [`settled_length`]).

use std::f64::consts::PI;

use tarsos_filter_core::{Complex, Filter};

use crate::error::{AnalysisError, Result};
use crate::fft::Fft;

/// Minimum buffer length used when extracting time-domain responses.
pub const MIN_RESPONSE_LEN: usize = 1000;

/// Fraction of the running peak a sample-to-sample change must exceed to
/// count as "still moving".
pub const SETTLE_THRESHOLD: f64 = 0.003;

/// Normalized frequency response sampled on `[0, π)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyResponseTable {
    /// Interleaved `(re, im)` per frequency point, normalized to unit peak
    data: Vec<f64>,
    /// Peak magnitude before normalization
    peak: f64,
}

impl FrequencyResponseTable {
    /// Number of frequency points.
    pub fn len(&self) -> usize {
        self.data.len() / 2
    }

    /// True when the table has no points.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Peak magnitude before normalization.
    pub fn peak(&self) -> f64 {
        self.peak
    }

    /// Interleaved normalized values.
    pub fn as_interleaved(&self) -> &[f64] {
        &self.data
    }

    /// Angular frequency of point `i`, in radians/sample.
    pub fn frequency(&self, i: usize) -> f64 {
        PI * i as f64 / self.len() as f64
    }

    /// Normalized complex response at point `i`.
    pub fn value(&self, i: usize) -> Complex {
        Complex::new(self.data[2 * i], self.data[2 * i + 1])
    }

    /// Normalized magnitude at point `i`.
    pub fn magnitude(&self, i: usize) -> f64 {
        self.value(i).magnitude()
    }

    /// Normalized magnitude in dB at point `i` (floored at -200 dB).
    pub fn magnitude_db(&self, i: usize) -> f64 {
        20.0 * self.magnitude(i).max(1e-10).log10()
    }

    /// Phase at point `i` in `(-π, π]`.
    pub fn phase(&self, i: usize) -> f64 {
        self.value(i).phase()
    }

    /// All normalized magnitudes.
    pub fn magnitudes(&self) -> Vec<f64> {
        (0..self.len()).map(|i| self.magnitude(i)).collect()
    }

    /// All phases, wrapped.
    pub fn phases(&self) -> Vec<f64> {
        (0..self.len()).map(|i| self.phase(i)).collect()
    }

    /// Normalized magnitude at an arbitrary `omega` in `[0, π)`, linearly interpolated.
    pub fn magnitude_at(&self, omega: f64) -> f64 {
        let freqs: Vec<f64> = (0..self.len()).map(|i| self.frequency(i)).collect();
        interpolate(&freqs, &self.magnitudes(), omega)
    }

    /// First frequency where the response falls 3 dB below its peak.
    ///
    /// Returns `None` if the response never drops that far.
    pub fn cutoff_frequency(&self) -> Option<f64> {
        let target = -3.0103;
        let db: Vec<f64> = (0..self.len()).map(|i| self.magnitude_db(i)).collect();

        for i in 1..db.len() {
            if db[i] < target && db[i - 1] >= target {
                let t = (target - db[i - 1]) / (db[i] - db[i - 1]);
                return Some(self.frequency(i - 1) + t * (self.frequency(i) - self.frequency(i - 1)));
            }
        }
        None
    }

    /// Group delay in samples at each point.
    ///
    /// Negative derivative of the unwrapped phase, using central differences
    /// inside the table and one-sided differences at the ends.
    pub fn group_delay(&self) -> Vec<f64> {
        let n = self.len();
        if n < 2 {
            return vec![0.0; n];
        }
        let unwrapped = unwrap_phase(&self.phases());
        let step = PI / n as f64;

        let mut delay = Vec::with_capacity(n);
        delay.push(-(unwrapped[1] - unwrapped[0]) / step);
        for i in 1..n - 1 {
            delay.push(-(unwrapped[i + 1] - unwrapped[i - 1]) / (2.0 * step));
        }
        delay.push(-(unwrapped[n - 1] - unwrapped[n - 2]) / step);
        delay
    }
}

/// Samples the frequency response of `filter` at `points` frequencies.
///
/// # Errors
///
/// [`AnalysisError::InvalidSize`](crate::AnalysisError::InvalidSize) if
/// `points` is not a power of two, or
/// [`AnalysisError::Core`](crate::AnalysisError::Core) when a sample point
/// lands exactly on a pole.
pub fn frequency_response(filter: &dyn Filter, points: usize) -> Result<FrequencyResponseTable> {
    if !points.is_power_of_two() {
        return Err(AnalysisError::InvalidSize(points));
    }
    let mut data = match filter.fir_kernel() {
        Some(kernel) if kernel.len() <= 2 * points => {
            let fft = Fft::new(2 * points)?;
            let mut spectrum = fft.forward_real(&kernel);
            spectrum.truncate(2 * points);
            spectrum
        }
        _ => {
            let mut data = Vec::with_capacity(2 * points);
            for i in 0..points {
                let omega = PI * i as f64 / points as f64;
                let h = filter.eval_transfer(Complex::unit(omega))?;
                data.push(h.re);
                data.push(h.im);
            }
            data
        }
    };

    let peak = data
        .chunks_exact(2)
        .map(|c| c[0].hypot(c[1]))
        .filter(|m| m.is_finite())
        .fold(0.0, f64::max);
    if peak > 0.0 {
        for v in &mut data {
            *v /= peak;
        }
    }

    Ok(FrequencyResponseTable { data, peak })
}

/// Time-domain response together with its settling metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseCurve {
    samples: Vec<f64>,
    offset: usize,
    settled: usize,
}

impl ResponseCurve {
    /// Full buffer, including the lead-in before `offset`.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Index where the excitation starts.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Response from the excitation onward.
    pub fn response(&self) -> &[f64] {
        &self.samples[self.offset..]
    }

    /// Number of samples after which the response has settled.
    pub fn settled_length(&self) -> usize {
        self.settled
    }
}

/// Runs a unit impulse through `filter` with a zeroed state.
///
/// The buffer holds at least `max(points, MIN_RESPONSE_LEN)` samples after
/// the impulse. For dense feedforward filters the settled length is simply
/// the coefficient count.
pub fn impulse_curve(filter: &dyn Filter, points: usize) -> ResponseCurve {
    let offset = filter.impulse_offset();
    let len = offset + points.max(MIN_RESPONSE_LEN);
    let mut input = vec![0.0; len];
    input[offset] = 1.0;
    let samples = run(filter, &input);

    let settled = match filter.fir_kernel() {
        Some(kernel) if offset == 0 => kernel.len(),
        _ => settled_length(&samples, offset),
    };

    ResponseCurve {
        samples,
        offset,
        settled,
    }
}

/// Runs a unit step (starting at the filter's step offset) through `filter`.
pub fn step_curve(filter: &dyn Filter, points: usize) -> ResponseCurve {
    let offset = filter.step_offset();
    let len = offset + points.max(MIN_RESPONSE_LEN);
    let mut input = vec![0.0; len];
    input[offset..].fill(1.0);
    let samples = run(filter, &input);
    let settled = settled_length(&samples, offset);

    ResponseCurve {
        samples,
        offset,
        settled,
    }
}

/// First `length` samples of the impulse response.
pub fn impulse_response(filter: &dyn Filter, length: usize) -> Vec<f64> {
    impulse_curve(filter, length).response()[..length].to_vec()
}

/// First `length` samples of the step response.
pub fn step_response(filter: &dyn Filter, length: usize) -> Vec<f64> {
    step_curve(filter, length).response()[..length].to_vec()
}

/// Number of samples (counted from `offset`) until the response stops moving.
///
/// Tracks the running peak of `|buf[i]|` and records the last index whose
/// change from the previous sample exceeds [`SETTLE_THRESHOLD`] of that peak.
/// The result is `last - offset + 1`, or 0 if nothing ever moved.
pub fn settled_length(buf: &[f64], offset: usize) -> usize {
    let mut peak: f64 = 0.0;
    let mut previous = 123.0;
    let mut last_moving = None;

    for (i, &x) in buf.iter().enumerate().skip(offset) {
        let magnitude = x.abs();
        peak = peak.max(magnitude);
        if (magnitude - previous).abs() > peak * SETTLE_THRESHOLD {
            last_moving = Some(i);
        }
        previous = magnitude;
    }

    last_moving.map_or(0, |last| last - offset + 1)
}

/// Unwrap phase to remove discontinuities
///
/// Phase values are adjusted to be continuous by adding/subtracting
/// multiples of 2*pi when jumps exceed pi.
pub fn unwrap_phase(phase: &[f64]) -> Vec<f64> {
    if phase.is_empty() {
        return Vec::new();
    }

    let mut unwrapped = Vec::with_capacity(phase.len());
    unwrapped.push(phase[0]);

    let two_pi = 2.0 * PI;
    let mut correction = 0.0;

    for i in 1..phase.len() {
        let diff = phase[i] - phase[i - 1];

        if diff > PI {
            correction -= two_pi;
        } else if diff < -PI {
            correction += two_pi;
        }

        unwrapped.push(phase[i] + correction);
    }

    unwrapped
}

fn run(filter: &dyn Filter, input: &[f64]) -> Vec<f64> {
    let mut state = filter.create_state();
    let mut output = vec![0.0; input.len()];
    filter.process(input, &mut output, &mut state);
    output
}

/// Linear interpolation helper
fn interpolate(x: &[f64], y: &[f64], target_x: f64) -> f64 {
    let (Some(&first), Some(&last)) = (y.first(), y.last()) else {
        return 0.0;
    };

    if target_x <= x[0] {
        return first;
    }

    for i in 1..x.len() {
        if target_x <= x[i] {
            let t = (target_x - x[i - 1]) / (x[i] - x[i - 1]);
            return y[i - 1] + t * (y[i] - y[i - 1]);
        }
    }

    last
}
