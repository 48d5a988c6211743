//! Feedforward-only designs: windowed sinc, smoothing kernels, random taps.
//!
//! Every kernel here is scaled so the peak of its magnitude response is 1.

use std::f64::consts::PI;

use tarsos_filter_analysis::{Window, frequency_response};
use tarsos_filter_core::DirectFormFilter;

use crate::band::Band;
use crate::error::{DesignError, Result};
use crate::transform::NORMALIZE_POINTS;

/// Longest kernel any FIR design produces.
pub const MAX_TAPS: usize = 8191;

/// Largest Kaiser `beta` a design accepts.
pub const MAX_KAISER_BETA: f64 = 30.0;

/// Rejects a Kaiser window whose `beta` lies outside `[0, MAX_KAISER_BETA]`.
pub fn check_window(window: Window) -> Result<Window> {
    match window {
        Window::Kaiser { beta } if !(0.0..=MAX_KAISER_BETA).contains(&beta) => {
            Err(DesignError::invalid(
                "kaiser_beta",
                format!("must be within [0, {MAX_KAISER_BETA}], got {beta}"),
            ))
        }
        _ => Ok(window),
    }
}

/// Clamps a tap count into `1..=MAX_TAPS`.
pub fn clamp_taps(taps: usize) -> usize {
    taps.clamp(1, MAX_TAPS)
}

/// Ideal low-pass impulse response centred at `(len - 1)/2`.
fn sinc_lowpass(cutoff: f64, len: usize) -> Vec<f64> {
    let centre = (len - 1) as f64 / 2.0;
    (0..len)
        .map(|i| {
            let x = i as f64 - centre;
            if x.abs() < 1e-12 {
                cutoff / PI
            } else {
                (cutoff * x).sin() / (PI * x)
            }
        })
        .collect()
}

/// Unit impulse at the centre of an odd-length kernel, minus `kernel`.
fn spectral_invert(kernel: &mut [f64]) {
    for h in kernel.iter_mut() {
        *h = -*h;
    }
    let centre = kernel.len() / 2;
    kernel[centre] += 1.0;
}

/// Windowed-sinc kernel for `band`.
///
/// High-pass and band-stop kernels are built by spectral inversion, which
/// needs a centre tap, so even lengths are bumped to the next odd length.
pub fn windowed_sinc(band: Band, taps: usize, window: Window) -> Vec<f64> {
    let mut len = clamp_taps(taps);
    if matches!(band, Band::HighPass { .. } | Band::BandStop { .. }) && len % 2 == 0 {
        len += 1;
    }

    let mut kernel = match band {
        Band::LowPass { cutoff } => sinc_lowpass(cutoff, len),
        Band::HighPass { cutoff } => {
            let mut k = sinc_lowpass(cutoff, len);
            spectral_invert(&mut k);
            k
        }
        Band::BandPass { low, high } | Band::BandStop { low, high } => {
            let upper = sinc_lowpass(high, len);
            let lower = sinc_lowpass(low, len);
            let mut k: Vec<f64> = upper.iter().zip(&lower).map(|(u, l)| u - l).collect();
            if matches!(band, Band::BandStop { .. }) {
                spectral_invert(&mut k);
            }
            k
        }
    };

    window.apply(&mut kernel);
    kernel
}

/// Equal weights over `length` taps.
pub fn moving_average(length: usize) -> Vec<f64> {
    let len = clamp_taps(length);
    vec![1.0 / len as f64; len]
}

/// Triangular weights rising to the centre.
pub fn triangle(length: usize) -> Vec<f64> {
    let len = clamp_taps(length);
    let raw: Vec<f64> = (0..len).map(|i| (i + 1).min(len - i) as f64).collect();
    let sum: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / sum).collect()
}

/// Sampled Gaussian with standard deviation `sigma` samples, unit DC gain.
pub fn gaussian(length: usize, sigma: f64) -> Vec<f64> {
    let len = clamp_taps(length);
    let sigma = if sigma.is_finite() && sigma > 0.0 {
        sigma
    } else {
        len as f64 / 6.0
    };
    let centre = (len - 1) as f64 / 2.0;
    let raw: Vec<f64> = (0..len)
        .map(|i| {
            let x = (i as f64 - centre) / sigma;
            (-0.5 * x * x).exp()
        })
        .collect();
    let sum: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / sum).collect()
}

/// Xorshift32 generator.
///
/// Deterministic for a given seed; a zero seed is replaced since zero is a
/// fixed point of the recurrence.
#[derive(Debug, Clone)]
pub struct Xorshift32 {
    state: u32,
}

impl Xorshift32 {
    /// Creates a generator from `seed`.
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0x2545_F491 } else { seed },
        }
    }

    /// Next raw value.
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Next value uniformly in `[-1, 1)`.
    pub fn next_bipolar(&mut self) -> f64 {
        f64::from(self.next_u32()) / 2_147_483_648.0 - 1.0
    }
}

/// Random taps from a seeded generator.
pub fn random(taps: usize, seed: u32) -> Vec<f64> {
    let mut rng = Xorshift32::new(seed);
    (0..clamp_taps(taps)).map(|_| rng.next_bipolar()).collect()
}

/// Feedforward comb `x[n] ± g·x[n - delay]` as a sparse filter.
pub fn inverse_comb(delay: usize, gain: f64, subtract: bool) -> Result<DirectFormFilter> {
    let delay = delay.clamp(1, MAX_TAPS);
    let g = if subtract { -gain } else { gain };
    Ok(DirectFormFilter::new(vec![1.0, g], vec![0, delay], None)?)
}

/// Scales a kernel so the peak of its magnitude response is 1.
pub fn normalize_kernel(kernel: Vec<f64>) -> Result<DirectFormFilter> {
    let fir = DirectFormFilter::fir(kernel)?;
    normalize_direct(fir)
}

/// Scales a direct-form filter's feedforward path so its response peak is 1.
pub fn normalize_direct(filter: DirectFormFilter) -> Result<DirectFormFilter> {
    let points = NORMALIZE_POINTS.max((filter.max_tap() + 1).next_power_of_two());
    let table = frequency_response(&filter, points)?;
    if table.peak() > 0.0 && table.peak().is_finite() {
        Ok(filter.scaled(1.0 / table.peak()))
    } else {
        Ok(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tarsos_filter_core::{Complex, Filter};

    fn gain(filter: &DirectFormFilter, omega: f64) -> f64 {
        filter.eval_transfer(Complex::unit(omega)).unwrap().magnitude()
    }

    #[test]
    fn lowpass_sinc_passes_dc_and_blocks_nyquist() {
        let kernel = windowed_sinc(Band::LowPass { cutoff: 0.25 * PI }, 101, Window::Blackman);
        let fir = normalize_kernel(kernel).unwrap();
        assert!((gain(&fir, 0.0) - 1.0).abs() < 1e-3);
        assert!(gain(&fir, 0.6 * PI) < 1e-3);
        assert!((gain(&fir, 0.25 * PI) - 0.5).abs() < 0.05);
    }

    #[test]
    fn highpass_forces_odd_length() {
        let kernel = windowed_sinc(Band::HighPass { cutoff: 0.5 * PI }, 64, Window::Hamming);
        assert_eq!(kernel.len(), 65);
        let fir = normalize_kernel(kernel).unwrap();
        assert!(gain(&fir, 0.0) < 1e-2);
        assert!(gain(&fir, 0.95 * PI) > 0.98);
    }

    #[test]
    fn bandpass_and_bandstop_are_complementary() {
        let (low, high) = (0.3 * PI, 0.5 * PI);
        let bp = windowed_sinc(Band::BandPass { low, high }, 129, Window::Rectangular);
        let bs = windowed_sinc(Band::BandStop { low, high }, 129, Window::Rectangular);
        assert_eq!(bp.len(), bs.len());
        // bp + bs is a pure centre impulse
        for (i, (p, s)) in bp.iter().zip(&bs).enumerate() {
            let expected = if i == 64 { 1.0 } else { 0.0 };
            assert!((p + s - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn kernels_sum_to_one() {
        for kernel in [moving_average(7), triangle(9), gaussian(15, 2.0)] {
            let sum: f64 = kernel.iter().sum();
            assert!((sum - 1.0).abs() < 1e-12);
        }
        assert_eq!(triangle(5), vec![1.0 / 9.0, 2.0 / 9.0, 3.0 / 9.0, 2.0 / 9.0, 1.0 / 9.0]);
    }

    #[test]
    fn gaussian_is_symmetric_and_peaked() {
        let g = gaussian(21, 3.0);
        for i in 0..21 {
            assert!((g[i] - g[20 - i]).abs() < 1e-15);
        }
        assert!(g[10] > g[9] && g[9] > g[0]);
    }

    #[test]
    fn random_is_seeded() {
        assert_eq!(random(32, 7), random(32, 7));
        assert_ne!(random(32, 7), random(32, 8));
        assert!(random(100, 1).iter().all(|x| (-1.0..1.0).contains(x)));
    }

    #[test]
    fn xorshift_known_sequence() {
        let mut rng = Xorshift32::new(1);
        assert_eq!(rng.next_u32(), 270_369);
        assert_eq!(rng.next_u32(), 67_634_689);
    }

    #[test]
    fn inverse_comb_notches() {
        let comb = normalize_direct(inverse_comb(4, 1.0, false).unwrap()).unwrap();
        // 1 + z^-4 vanishes at w = π/4
        assert!(gain(&comb, PI / 4.0) < 1e-9);
        assert!((gain(&comb, 0.0) - 1.0).abs() < 1e-9);
    }
}
