//! Analog-to-digital mapping and peak normalization.
//!
//! Low-pass and high-pass designs pre-warp the edge with `tan(ω/2)` and apply
//! the bilinear transform `z = (1 + s)/(1 - s)`; high-pass designs are the
//! low-pass at `π - ω` with every root negated. Band-pass and band-stop
//! designs map each prototype root `p` through a second-order substitution,
//! so every analog root becomes two digital roots.

use tarsos_filter_analysis::frequency_response;
use tarsos_filter_core::{Complex, PoleZeroModel, realize};

use crate::band::Band;
use crate::error::Result;
use crate::prototype::AnalogPrototype;

/// Response table size used to find a design's peak gain.
pub const NORMALIZE_POINTS: usize = 2048;

/// Maps a unit-edge analog prototype onto the digital `band`.
///
/// The band must already be clamped. The returned model has unit gain; see
/// [`normalize_peak`].
pub fn to_digital(proto: &AnalogPrototype, band: Band) -> Result<PoleZeroModel> {
    let mut model = PoleZeroModel::new();
    let infinite = proto.zeros_at_infinity();

    match band {
        Band::LowPass { cutoff } | Band::HighPass { cutoff } => {
            let high = matches!(band, Band::HighPass { .. });
            let edge = if high {
                std::f64::consts::PI - cutoff
            } else {
                cutoff
            };
            let warp = (edge / 2.0).tan();
            let flip = |z: Complex| if high { -z } else { z };

            for &p in &proto.poles {
                model.push_pole(flip(bilinear(p.scale(warp))?));
            }
            for &q in &proto.zeros {
                model.push_zero(flip(bilinear(q.scale(warp))?));
            }
            for _ in 0..infinite {
                model.push_zero(flip(Complex::real(-1.0)));
            }
        }
        Band::BandPass { low, high } => {
            let a = ((low + high) / 2.0).cos() / ((high - low) / 2.0).cos();
            let b = 1.0 / ((high - low) / 2.0).tan();

            for &p in &proto.poles {
                let (z1, z2) = band_pass_roots(p, a, b)?;
                model.push_pole(z1);
                model.push_pole(z2);
            }
            for &q in &proto.zeros {
                let (z1, z2) = band_pass_roots(q, a, b)?;
                model.push_zero(z1);
                model.push_zero(z2);
            }
            for _ in 0..infinite {
                model.push_zero(Complex::ONE);
                model.push_zero(Complex::real(-1.0));
            }
        }
        Band::BandStop { low, high } => {
            let a = ((low + high) / 2.0).cos() / ((high - low) / 2.0).cos();
            let b = ((high - low) / 2.0).tan();

            for &p in &proto.poles {
                let (z1, z2) = band_stop_roots(p, a, b)?;
                model.push_pole(z1);
                model.push_pole(z2);
            }
            for &q in &proto.zeros {
                let (z1, z2) = band_stop_roots(q, a, b)?;
                model.push_zero(z1);
                model.push_zero(z2);
            }
            // Roots of z² - 2az + 1, on the unit circle at the band centre
            let centre = Complex::new(a, (1.0 - a * a).max(0.0).sqrt());
            for _ in 0..infinite {
                model.push_zero(centre);
                model.push_zero(centre.conj());
            }
        }
    }

    Ok(model)
}

/// Bilinear transform `z = (1 + s)/(1 - s)`.
pub fn bilinear(s: Complex) -> Result<Complex> {
    Ok((Complex::ONE + s).div(Complex::ONE - s)?)
}

/// Roots of `(b - p)z² - 2ab·z + (b + p) = 0`.
fn band_pass_roots(p: Complex, a: f64, b: f64) -> Result<(Complex, Complex)> {
    let root = (Complex::real(a * a * b * b - b * b) + p * p).sqrt();
    let denom = Complex::real(b) - p;
    let ab = Complex::real(a * b);
    Ok(((ab + root).div(denom)?, (ab - root).div(denom)?))
}

/// Roots of `(b - p)z² + 2ap·z - (b + p) = 0`.
fn band_stop_roots(p: Complex, a: f64, b: f64) -> Result<(Complex, Complex)> {
    let root = (p * p * (a * a) + Complex::real(b * b) - p * p).sqrt();
    let denom = Complex::real(b) - p;
    let ap = p * a;
    Ok(((-ap + root).div(denom)?, (-ap - root).div(denom)?))
}

/// Sets the model gain so the peak of its response table is exactly 1.
pub fn normalize_peak(mut model: PoleZeroModel) -> Result<PoleZeroModel> {
    model.set_gain(1.0);
    let table = frequency_response(&realize(&model), NORMALIZE_POINTS)?;
    if table.peak() > 0.0 && table.peak().is_finite() {
        model.set_gain(1.0 / table.peak());
    }
    Ok(model)
}
