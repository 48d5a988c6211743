//! Analog low-pass prototypes with a unit edge frequency.
//!
//! Each prototype lists its s-plane poles (all in the left half-plane) and
//! its finite zeros. Zeros at infinity are implicit: an order-`n` prototype
//! with `m` finite zeros has `n - m` of them, which the band transforms map
//! to the appropriate points on the unit circle.
//!
//! The edge at `Ω = 1` is the -3 dB point for Butterworth and inverse
//! Chebyshev, and the passband ripple edge for Chebyshev I and elliptic.

use std::f64::consts::PI;

use tarsos_filter_core::Complex;

use crate::elliptic::{asne, cde, complement, ellipdeg, sne};
use crate::error::{DesignError, Result};

/// Unit-edge analog prototype.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalogPrototype {
    /// Poles in the left half-plane, conjugates included
    pub poles: Vec<Complex>,
    /// Finite zeros, conjugates included
    pub zeros: Vec<Complex>,
}

impl AnalogPrototype {
    /// Filter order (pole count).
    pub fn order(&self) -> usize {
        self.poles.len()
    }

    /// Number of zeros at infinity.
    pub fn zeros_at_infinity(&self) -> usize {
        self.poles.len().saturating_sub(self.zeros.len())
    }
}

/// Angle of the `k`th Butterworth pole: `π/2 + (2k+1)π/(2n)`.
fn pole_angle(k: usize, n: usize) -> f64 {
    PI / 2.0 + (2 * k + 1) as f64 * PI / (2 * n) as f64
}

/// Butterworth: `n` poles evenly spaced on the left half of the unit circle.
pub fn butterworth(n: usize) -> AnalogPrototype {
    let poles = (0..n).map(|k| Complex::unit(pole_angle(k, n))).collect();
    AnalogPrototype {
        poles,
        zeros: Vec::new(),
    }
}

/// Chebyshev I poles for ripple factor `epsilon`, on an ellipse.
fn chebyshev_poles(n: usize, epsilon: f64) -> Vec<Complex> {
    let alpha = 1.0 / epsilon + (1.0 + 1.0 / (epsilon * epsilon)).sqrt();
    let root = alpha.powf(1.0 / n as f64);
    let a = 0.5 * (root - 1.0 / root);
    let b = 0.5 * (root + 1.0 / root);
    (0..n)
        .map(|k| {
            let theta = pole_angle(k, n);
            Complex::new(a * theta.cos(), b * theta.sin())
        })
        .collect()
}

/// Chebyshev type I with `ripple_db` of passband ripple.
pub fn chebyshev1(n: usize, ripple_db: f64) -> AnalogPrototype {
    let epsilon = (10f64.powf(ripple_db / 10.0) - 1.0).sqrt();
    AnalogPrototype {
        poles: chebyshev_poles(n, epsilon),
        zeros: Vec::new(),
    }
}

/// Inverse Chebyshev (type II) with `attenuation_db` of stopband rejection.
///
/// Scaled so the -3 dB point sits at `Ω = 1`. For odd orders the centre
/// zero lies at infinity and is left implicit.
pub fn inverse_chebyshev(n: usize, attenuation_db: f64) -> Result<AnalogPrototype> {
    let epsilon = 1.0 / (10f64.powf(attenuation_db / 10.0) - 1.0).sqrt();
    let scale = ((1.0 / epsilon).acosh() / n as f64).cosh();

    let mut poles = Vec::with_capacity(n);
    for c in chebyshev_poles(n, epsilon) {
        poles.push(c.reciprocal()?.scale(scale));
    }

    let zeros = (0..n)
        .filter_map(|k| {
            let c = ((2 * k + 1) as f64 * PI / (2 * n) as f64).cos();
            // cos((2k+1)π/2n) vanishes only at the centre of an odd order
            (c.abs() > 1e-12).then(|| Complex::new(0.0, scale / c))
        })
        .collect();

    Ok(AnalogPrototype { poles, zeros })
}

/// Elliptic (Cauer) with passband ripple `ripple_db` and stopband rejection `attenuation_db`.
///
/// # Errors
///
/// [`DesignError::InvalidParameter`] when the attenuation does not exceed
/// the ripple or the degree equation has no usable solution.
pub fn elliptic(n: usize, ripple_db: f64, attenuation_db: f64) -> Result<AnalogPrototype> {
    if attenuation_db <= ripple_db {
        return Err(DesignError::invalid(
            "attenuation_db",
            format!("must exceed the passband ripple ({ripple_db} dB), got {attenuation_db}"),
        ));
    }

    let ep = (10f64.powf(ripple_db / 10.0) - 1.0).sqrt();
    let es = (10f64.powf(attenuation_db / 10.0) - 1.0).sqrt();
    let k1 = ep / es;
    let k = ellipdeg(n, k1);
    if !(k > 0.0 && k < 1.0) || complement(k1) >= 1.0 {
        return Err(DesignError::invalid(
            "attenuation_db",
            format!("{attenuation_db} dB against {ripple_db} dB ripple is out of range"),
        ));
    }

    // v0 is real: asn of a purely imaginary argument is purely imaginary
    let v0 = (asne(Complex::new(0.0, 1.0 / ep), k1) * Complex::new(0.0, -1.0)).re / n as f64;

    let mut poles = Vec::with_capacity(n);
    let mut zeros = Vec::with_capacity(n);
    for i in 1..=n / 2 {
        let u = (2 * i - 1) as f64 / n as f64;
        let cd = cde(Complex::real(u), k);
        let zero = Complex::I.div(cd * k)?;
        zeros.push(zero);
        zeros.push(zero.conj());

        let pole = Complex::I * cde(Complex::new(u, -v0), k);
        poles.push(pole);
        poles.push(pole.conj());
    }
    if n % 2 == 1 {
        let pole = Complex::I * sne(Complex::new(0.0, v0), k);
        poles.push(Complex::real(pole.re));
    }

    if poles.iter().chain(&zeros).any(|c| !c.is_finite()) {
        return Err(DesignError::invalid(
            "order",
            format!("elliptic order {n} did not converge"),
        ));
    }

    tracing::debug!(n, k, k1, v0, "elliptic prototype");
    Ok(AnalogPrototype { poles, zeros })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// |H(jΩ)| of a prototype with unit DC-normalized gain.
    fn magnitude(proto: &AnalogPrototype, omega: f64) -> f64 {
        let s = Complex::new(0.0, omega);
        let eval = |s: Complex| {
            let top = proto.zeros.iter().fold(Complex::ONE, |acc, &q| acc * (s - q));
            let bottom = proto.poles.iter().fold(Complex::ONE, |acc, &p| acc * (s - p));
            top.div(bottom).unwrap().magnitude()
        };
        eval(s) / eval(Complex::ZERO)
    }

    #[test]
    fn butterworth_half_power_at_unit_edge() {
        for n in 1..8 {
            let proto = butterworth(n);
            assert_eq!(proto.order(), n);
            assert!(proto.poles.iter().all(|p| p.re < 0.0));
            let m = magnitude(&proto, 1.0);
            assert!((m - 0.5f64.sqrt()).abs() < 1e-9, "n = {n}: {m}");
        }
    }

    #[test]
    fn chebyshev_ripple_edge() {
        let proto = chebyshev1(5, 1.0);
        // Odd order: DC is a peak, the edge sits exactly at -ripple
        let m = magnitude(&proto, 1.0);
        let expected = 10f64.powf(-1.0 / 20.0);
        assert!((m - expected).abs() < 1e-9, "{m}");
    }

    #[test]
    fn inverse_chebyshev_zero_count() {
        assert_eq!(inverse_chebyshev(4, 40.0).unwrap().zeros.len(), 4);
        let odd = inverse_chebyshev(5, 40.0).unwrap();
        assert_eq!(odd.zeros.len(), 4);
        assert_eq!(odd.zeros_at_infinity(), 1);
        assert!(odd.zeros.iter().all(|z| z.re == 0.0 && z.im.abs() > 1.0));
    }

    #[test]
    fn inverse_chebyshev_half_power_at_edge() {
        let proto = inverse_chebyshev(4, 50.0).unwrap();
        let m = magnitude(&proto, 1.0);
        assert!((m - 0.5f64.sqrt()).abs() < 1e-6, "{m}");
    }

    #[test]
    fn elliptic_meets_ripple_and_attenuation() {
        let proto = elliptic(4, 1.0, 40.0).unwrap();
        assert_eq!(proto.order(), 4);
        assert_eq!(proto.zeros.len(), 4);
        assert!(proto.poles.iter().all(|p| p.re < 0.0), "{:?}", proto.poles);

        // Even order: DC sits at the bottom of the ripple, peak 1 in the passband
        let dc = 10f64.powf(-1.0 / 20.0);
        let peak = (0..=100)
            .map(|i| magnitude(&proto, i as f64 / 100.0) * dc)
            .fold(0.0, f64::max);
        assert!((peak - 1.0).abs() < 1e-3, "peak {peak}");

        // Deep stopband beyond the transition
        let stop = (0..200)
            .map(|i| magnitude(&proto, 3.0 + i as f64 * 0.5) * dc)
            .fold(0.0, f64::max);
        assert!(stop < 10f64.powf(-40.0 / 20.0) * 1.001, "stop {stop}");
    }

    #[test]
    fn odd_elliptic_has_real_pole() {
        let proto = elliptic(3, 0.5, 30.0).unwrap();
        assert_eq!(proto.poles.len(), 3);
        assert_eq!(proto.zeros_at_infinity(), 1);
        let real = proto.poles.iter().filter(|p| p.im == 0.0).count();
        assert_eq!(real, 1);
        assert!(proto.poles.iter().all(|p| p.re < 0.0));
    }

    #[test]
    fn elliptic_rejects_inverted_spec() {
        assert!(elliptic(4, 3.0, 2.0).is_err());
    }
}
