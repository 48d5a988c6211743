//! Ad-hoc recursive designs placed directly in the z-plane.
//!
//! Notch, allpass and resonator designs are pole/zero models; comb and
//! plucked-string designs are sparse direct-form filters with feedback taps
//! at the delay line length.

use tarsos_filter_core::{Complex, DirectFormFilter, PoleZeroModel};

use crate::error::Result;
use crate::fir::MAX_TAPS;

/// Recursive comb with peaks every `2π/delay`.
///
/// `y[n] = (1 - g)·x[n] ± g·y[n - delay]`. With `negative` set the sign of
/// the feedback flips and the peaks move to odd multiples of `π/delay`.
/// The `1 - g` input scale puts the peaks at unit gain.
pub fn comb(delay: usize, gain: f64, negative: bool) -> Result<DirectFormFilter> {
    let delay = delay.clamp(1, MAX_TAPS);
    let feedback = if negative { gain } else { -gain };
    Ok(DirectFormFilter::new(
        vec![1.0 - gain, 0.0],
        vec![0, delay],
        Some(vec![1.0, feedback]),
    )?)
}

/// Karplus-Strong string loop.
///
/// `y[n] = x[n] + g/2·(y[n - delay] + y[n - delay - 1])`; the two-tap average
/// in the loop damps high harmonics faster than low ones.
pub fn plucked_string(delay: usize, gain: f64) -> Result<DirectFormFilter> {
    let delay = delay.clamp(1, MAX_TAPS);
    Ok(DirectFormFilter::new(
        vec![1.0, 0.0, 0.0],
        vec![0, delay, delay + 1],
        Some(vec![1.0, -gain / 2.0, -gain / 2.0]),
    )?)
}

/// Second-order notch at `frequency`.
///
/// Zeros sit on the unit circle at `±frequency`; poles at the same angle
/// with radius `1 - bandwidth/2` set the notch width.
pub fn notch(frequency: f64, bandwidth: f64) -> PoleZeroModel {
    let radius = (1.0 - bandwidth / 2.0).clamp(0.0, 0.9999);
    let mut model = PoleZeroModel::new();
    model.push_zero_pair(Complex::unit(frequency));
    model.push_pole_pair(Complex::from_polar(radius, frequency));
    model
}

/// Second-order allpass centred on `frequency`.
///
/// Each pole `p` is paired with a zero at `1/p*`, which keeps the magnitude
/// flat while the phase turns through `2π` around `frequency`.
pub fn allpass(frequency: f64, radius: f64) -> PoleZeroModel {
    let radius = radius.clamp(1e-3, 0.9999);
    let mut model = PoleZeroModel::new();
    model.push_pole_pair(Complex::from_polar(radius, frequency));
    model.push_zero_pair(Complex::from_polar(1.0 / radius, frequency));
    model
}

/// Two-pole resonator at `frequency`.
///
/// With `zeros_at_ends` the response is pinned to zero at DC and Nyquist,
/// which keeps the peak narrow at low frequencies.
pub fn resonator(frequency: f64, radius: f64, zeros_at_ends: bool) -> PoleZeroModel {
    let radius = radius.clamp(0.0, 0.9999);
    let mut model = PoleZeroModel::new();
    model.push_pole_pair(Complex::from_polar(radius, frequency));
    if zeros_at_ends {
        model.push_zero(Complex::ONE);
        model.push_zero(Complex::real(-1.0));
    }
    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    use tarsos_filter_core::{Filter, realize};

    fn impulse(filter: &DirectFormFilter, len: usize) -> Vec<f64> {
        let mut input = vec![0.0; len];
        input[0] = 1.0;
        let mut out = vec![0.0; len];
        filter.process(&input, &mut out, &mut filter.create_state());
        out
    }

    #[test]
    fn comb_peaks_have_unit_gain() {
        let c = comb(8, 0.9, false).unwrap();
        for k in 0..4 {
            let omega = 2.0 * PI * k as f64 / 8.0;
            let h = c.eval_transfer(Complex::unit(omega)).unwrap();
            assert!((h.magnitude() - 1.0).abs() < 1e-9);
        }
        let h = c.eval_transfer(Complex::unit(PI / 8.0)).unwrap();
        assert!(h.magnitude() < 0.1);
    }

    #[test]
    fn negative_comb_moves_peaks() {
        let c = comb(8, 0.9, true).unwrap();
        let at_dc = c.eval_transfer(Complex::ONE).unwrap().magnitude();
        let at_odd = c.eval_transfer(Complex::unit(PI / 8.0)).unwrap().magnitude();
        assert!(at_dc < 0.1);
        assert!((at_odd - 1.0).abs() < 1e-9);
    }

    #[test]
    fn plucked_string_echoes_and_decays() {
        let s = plucked_string(10, 0.99).unwrap();
        let out = impulse(&s, 40);
        assert_eq!(out[0], 1.0);
        assert!((out[10] - 0.495).abs() < 1e-12);
        assert!((out[11] - 0.495).abs() < 1e-12);
        assert!(out[1..10].iter().all(|&y| y == 0.0));
        let first: f64 = out[10..12].iter().sum();
        let second: f64 = out[20..23].iter().sum();
        assert!(second < first);
    }

    #[test]
    fn notch_kills_its_frequency() {
        let model = notch(0.3 * PI, 0.05);
        let filter = realize(&model);
        let h = filter.eval_transfer(Complex::unit(0.3 * PI)).unwrap();
        assert!(h.magnitude() < 1e-9);
        let far = filter.eval_transfer(Complex::ONE).unwrap();
        assert!(far.magnitude() > 0.9);
    }

    #[test]
    fn allpass_is_flat() {
        let model = allpass(1.0, 0.8);
        let reference = model.eval(Complex::ONE).unwrap().magnitude();
        for k in 1..20 {
            let m = model.eval(Complex::unit(k as f64 * 0.15)).unwrap().magnitude();
            assert!((m - reference).abs() < 1e-9);
        }
    }

    #[test]
    fn resonator_zero_option() {
        assert_eq!(resonator(1.0, 0.9, false).zeros().len(), 0);
        let with = resonator(1.0, 0.9, true);
        assert_eq!(with.zeros().len(), 2);
        assert!(with.eval(Complex::ONE).unwrap().magnitude() < 1e-12);
    }
}
