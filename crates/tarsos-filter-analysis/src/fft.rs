//! Radix-2 FFT engine with windowing functions
//!
//! The transform works in place on interleaved `(re, im)` pairs: a transform
//! of `n` points takes a slice of `2n` values. `n` must be a power of two;
//! anything else is rejected with [`AnalysisError::InvalidSize`] before any
//! computation.
//!
//! No normalization is applied in either direction, so a round trip scales
//! every element by `n`:
//!
//! ```text
//! transform(transform(x, false), true) ≈ n · x
//! ```
//!
//! Callers that need an exact round trip divide by `n` after the inverse.

use std::f64::consts::PI;

use crate::error::{AnalysisError, Result};

/// Radix-2 decimation-in-time FFT with precomputed tables.
#[derive(Debug, Clone)]
pub struct Fft {
    size: usize,
    /// `cos(π·k/n)` for `k in 0..n`
    cos_table: Vec<f64>,
    /// `sin(π·k/n)` for `k in 0..n`
    sin_table: Vec<f64>,
    /// Bit-reversed index of each position
    bit_reverse: Vec<usize>,
}

impl Fft {
    /// Create an engine for `size` complex points.
    ///
    /// Returns [`AnalysisError::InvalidSize`] unless `size` is a non-zero power of two.
    pub fn new(size: usize) -> Result<Self> {
        if !size.is_power_of_two() {
            return Err(AnalysisError::InvalidSize(size));
        }

        let cos_table = (0..size).map(|k| (PI * k as f64 / size as f64).cos()).collect();
        let sin_table = (0..size).map(|k| (PI * k as f64 / size as f64).sin()).collect();

        let bits = size.trailing_zeros();
        let bit_reverse = (0..size)
            .map(|i| {
                if bits == 0 {
                    0
                } else {
                    i.reverse_bits() >> (usize::BITS - bits)
                }
            })
            .collect();

        Ok(Self {
            size,
            cos_table,
            sin_table,
            bit_reverse,
        })
    }

    /// Number of complex points.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Transform interleaved data in place.
    ///
    /// `data.len()` must be exactly `2 * size()`. The forward transform uses
    /// `e^{-jθ}` twiddles, the inverse their conjugates. Neither direction
    /// normalizes.
    pub fn transform(&self, data: &mut [f64], inverse: bool) -> Result<()> {
        if data.len() != 2 * self.size {
            return Err(AnalysisError::LengthMismatch {
                expected: 2 * self.size,
                actual: data.len(),
            });
        }

        let n = self.size;
        for (i, &j) in self.bit_reverse.iter().enumerate() {
            if j > i {
                data.swap(2 * i, 2 * j);
                data.swap(2 * i + 1, 2 * j + 1);
            }
        }

        let sign = if inverse { 1.0 } else { -1.0 };
        let mut half = 1;
        while half < n {
            let stride = n / half;
            for start in (0..n).step_by(2 * half) {
                for j in 0..half {
                    let wr = self.cos_table[j * stride];
                    let wi = sign * self.sin_table[j * stride];

                    let a = 2 * (start + j);
                    let b = 2 * (start + j + half);
                    let tr = data[b] * wr - data[b + 1] * wi;
                    let ti = data[b] * wi + data[b + 1] * wr;

                    data[b] = data[a] - tr;
                    data[b + 1] = data[a + 1] - ti;
                    data[a] += tr;
                    data[a + 1] += ti;
                }
            }
            half *= 2;
        }

        Ok(())
    }

    /// Forward transform of real input, zero-padded or truncated to `size()`.
    ///
    /// Returns the full interleaved spectrum (`2 * size()` values).
    pub fn forward_real(&self, input: &[f64]) -> Vec<f64> {
        let mut data = vec![0.0; 2 * self.size];
        for (i, &x) in input.iter().take(self.size).enumerate() {
            data[2 * i] = x;
        }
        // Length is correct by construction
        let _ = self.transform(&mut data, false);
        data
    }
}

/// Transform interleaved data in place, sizing the engine from the slice.
///
/// `data.len()` must be `2n` with `n` a power of two.
pub fn transform(data: &mut [f64], inverse: bool) -> Result<()> {
    if data.len() % 2 != 0 {
        return Err(AnalysisError::InvalidSize(data.len()));
    }
    Fft::new(data.len() / 2)?.transform(data, inverse)
}

/// Magnitude of each interleaved pair.
pub fn magnitudes(data: &[f64]) -> Vec<f64> {
    data.chunks_exact(2).map(|c| c[0].hypot(c[1])).collect()
}

/// Magnitude in dB of each interleaved pair (floored at -200 dB).
pub fn magnitude_db(data: &[f64]) -> Vec<f64> {
    magnitudes(data)
        .into_iter()
        .map(|m| 20.0 * m.max(1e-10).log10())
        .collect()
}

/// Window function types for FIR design and spectral analysis
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Window {
    /// Rectangular (no windowing)
    Rectangular,
    /// Hamming window
    Hamming,
    /// Hann window (raised cosine)
    Hann,
    /// Blackman window
    Blackman,
    /// Kaiser window with shape parameter `beta`
    Kaiser {
        /// Shape parameter; larger values trade main-lobe width for sidelobe suppression
        beta: f64,
    },
    /// Bartlett (triangular) window
    Bartlett,
    /// Welch (parabolic) window
    Welch,
}

impl Window {
    /// Symmetric window value at position `i` of `len`.
    pub fn value(&self, i: usize, len: usize) -> f64 {
        if len <= 1 {
            return 1.0;
        }
        let span = (len - 1) as f64;
        let x = 2.0 * PI * i as f64 / span;
        // Position mapped onto [-1, 1]
        let q = 2.0 * i as f64 / span - 1.0;
        match self {
            Window::Rectangular => 1.0,
            Window::Hamming => 0.54 - 0.46 * x.cos(),
            Window::Hann => 0.5 - 0.5 * x.cos(),
            Window::Blackman => 0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos(),
            Window::Kaiser { beta } => {
                bessel_i0(beta * (1.0 - q * q).max(0.0).sqrt()) / bessel_i0(*beta)
            }
            Window::Bartlett => 1.0 - q.abs(),
            Window::Welch => 1.0 - q * q,
        }
    }

    /// Apply window to a buffer
    pub fn apply(&self, buffer: &mut [f64]) {
        let n = buffer.len();
        for (i, sample) in buffer.iter_mut().enumerate() {
            *sample *= self.value(i, n);
        }
    }

    /// Get window coefficients
    pub fn coefficients(&self, size: usize) -> Vec<f64> {
        (0..size).map(|i| self.value(i, size)).collect()
    }

    /// Lower-case name used in presets and summaries.
    pub fn name(&self) -> &'static str {
        match self {
            Window::Rectangular => "rectangular",
            Window::Hamming => "hamming",
            Window::Hann => "hann",
            Window::Blackman => "blackman",
            Window::Kaiser { .. } => "kaiser",
            Window::Bartlett => "bartlett",
            Window::Welch => "welch",
        }
    }
}

/// Series terms [`bessel_i0`] sums at most.
const BESSEL_MAX_TERMS: usize = 1000;

/// Zeroth-order modified Bessel function of the first kind.
///
/// Power series `Σ ((x/2)^k / k!)²`, summed until a term drops below
/// `1e-21` of the running total. Non-finite input passes through as
/// `|x|`, and arguments past roughly 1400 overflow to infinity.
pub fn bessel_i0(x: f64) -> f64 {
    if !x.is_finite() {
        return x.abs();
    }
    let half = x * 0.5;
    let mut sum = 1.0;
    let mut term = 1.0;
    for k in 1..=BESSEL_MAX_TERMS {
        term *= half / k as f64;
        let sq = term * term;
        sum += sq;
        if sq < sum * 1e-21 || !sum.is_finite() {
            break;
        }
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bessel_i0_terminates_on_extreme_arguments() {
        assert!(bessel_i0(f64::NAN).is_nan());
        assert_eq!(bessel_i0(f64::INFINITY), f64::INFINITY);
        assert_eq!(bessel_i0(f64::NEG_INFINITY), f64::INFINITY);
        assert_eq!(bessel_i0(2000.0), f64::INFINITY);
        assert!(bessel_i0(700.0).is_finite());
    }

    #[test]
    fn rejects_non_power_of_two() {
        assert!(matches!(Fft::new(12), Err(AnalysisError::InvalidSize(12))));
        assert!(matches!(Fft::new(0), Err(AnalysisError::InvalidSize(0))));
        let mut data = vec![0.0; 24];
        assert!(matches!(
            transform(&mut data, false),
            Err(AnalysisError::InvalidSize(12))
        ));
    }

    #[test]
    fn rejects_wrong_slice_length() {
        let fft = Fft::new(8).unwrap();
        let mut data = vec![0.0; 10];
        assert!(matches!(
            fft.transform(&mut data, false),
            Err(AnalysisError::LengthMismatch { expected: 16, actual: 10 })
        ));
    }

    #[test]
    fn impulse_has_flat_spectrum() {
        let fft = Fft::new(16).unwrap();
        let spectrum = fft.forward_real(&[1.0]);
        for m in magnitudes(&spectrum) {
            assert!((m - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn round_trip_scales_by_n() {
        let n = 64;
        let fft = Fft::new(n).unwrap();
        let original: Vec<f64> = (0..2 * n).map(|i| ((i * 37) % 17) as f64 - 8.0).collect();
        let mut data = original.clone();
        fft.transform(&mut data, false).unwrap();
        fft.transform(&mut data, true).unwrap();
        for (a, b) in data.iter().zip(original.iter()) {
            assert!((a / n as f64 - b).abs() < 1e-9);
        }
    }

    #[test]
    fn single_point_is_identity() {
        let fft = Fft::new(1).unwrap();
        let mut data = vec![3.0, -2.0];
        fft.transform(&mut data, false).unwrap();
        assert_eq!(data, vec![3.0, -2.0]);
    }

    #[test]
    fn cosine_lands_in_its_bin() {
        let n = 128;
        let fft = Fft::new(n).unwrap();
        let signal: Vec<f64> = (0..n)
            .map(|i| (2.0 * PI * 10.0 * i as f64 / n as f64).cos())
            .collect();
        let mags = magnitudes(&fft.forward_real(&signal));
        assert!((mags[10] - n as f64 / 2.0).abs() < 1e-9);
        assert!((mags[n - 10] - n as f64 / 2.0).abs() < 1e-9);
        assert!(mags[11] < 1e-9);
    }

    #[test]
    fn test_window_hann() {
        let mut buffer = vec![1.0; 101];
        Window::Hann.apply(&mut buffer);

        // Hann window should be 0 at edges, 1 at center
        assert!(buffer[0] < 0.01);
        assert!(buffer[100] < 0.01);
        assert!((buffer[50] - 1.0).abs() < 0.01);
    }

    #[test]
    fn windows_are_symmetric() {
        let windows = [
            Window::Rectangular,
            Window::Hamming,
            Window::Hann,
            Window::Blackman,
            Window::Kaiser { beta: 6.0 },
            Window::Bartlett,
            Window::Welch,
        ];
        for w in windows {
            let c = w.coefficients(31);
            for i in 0..31 {
                assert!((c[i] - c[30 - i]).abs() < 1e-12, "{} not symmetric", w.name());
            }
            assert!((c[15] - 1.0).abs() < 1e-9, "{} center is {}", w.name(), c[15]);
        }
    }

    #[test]
    fn bessel_i0_reference_values() {
        assert_eq!(bessel_i0(0.0), 1.0);
        assert!((bessel_i0(1.0) - 1.2660658777520082).abs() < 1e-12);
        assert!((bessel_i0(5.0) - 27.239871823604442).abs() < 1e-9);
    }
}
