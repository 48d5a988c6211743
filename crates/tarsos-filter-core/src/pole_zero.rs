//! Pole/zero description of a filter design.
//!
//! A [`PoleZeroModel`] is what every IIR design family produces before it is
//! realized as a [`CascadeFilter`](crate::CascadeFilter). For a real-valued
//! filter each non-real pole or zero must appear together with its
//! conjugate; [`PoleZeroModel::push_pole_pair`] and
//! [`PoleZeroModel::push_zero_pair`] keep that invariant for callers.

use alloc::vec::Vec;

use crate::complex::Complex;
use crate::error::CoreError;

/// Imaginary parts smaller than this are treated as lying on the real axis.
pub const REAL_AXIS_EPSILON: f64 = 1e-6;

/// Ordered poles and zeros in the z-plane plus an overall gain.
#[derive(Debug, Clone, PartialEq)]
pub struct PoleZeroModel {
    poles: Vec<Complex>,
    zeros: Vec<Complex>,
    gain: f64,
}

impl PoleZeroModel {
    /// Creates an empty model with unit gain.
    pub fn new() -> Self {
        Self {
            poles: Vec::new(),
            zeros: Vec::new(),
            gain: 1.0,
        }
    }

    /// Creates a model from explicit pole and zero lists.
    pub fn from_parts(poles: Vec<Complex>, zeros: Vec<Complex>) -> Self {
        Self {
            poles,
            zeros,
            gain: 1.0,
        }
    }

    /// Sets the overall gain.
    pub fn with_gain(mut self, gain: f64) -> Self {
        self.gain = gain;
        self
    }

    /// Appends a single pole.
    pub fn push_pole(&mut self, pole: Complex) {
        self.poles.push(pole);
    }

    /// Appends a single zero.
    pub fn push_zero(&mut self, zero: Complex) {
        self.zeros.push(zero);
    }

    /// Appends a pole and, when it is off the real axis, its conjugate.
    pub fn push_pole_pair(&mut self, pole: Complex) {
        push_with_conjugate(&mut self.poles, pole);
    }

    /// Appends a zero and, when it is off the real axis, its conjugate.
    pub fn push_zero_pair(&mut self, zero: Complex) {
        push_with_conjugate(&mut self.zeros, zero);
    }

    /// Poles in insertion order.
    pub fn poles(&self) -> &[Complex] {
        &self.poles
    }

    /// Zeros in insertion order.
    pub fn zeros(&self) -> &[Complex] {
        &self.zeros
    }

    /// Overall gain applied to the numerator.
    pub fn gain(&self) -> f64 {
        self.gain
    }

    /// Replaces the overall gain.
    pub fn set_gain(&mut self, gain: f64) {
        self.gain = gain;
    }

    /// Number of poles.
    pub fn order(&self) -> usize {
        self.poles.len()
    }

    /// True when every pole lies strictly inside the unit circle.
    pub fn is_stable(&self) -> bool {
        self.poles.iter().all(|p| p.magnitude() < 1.0)
    }

    /// True when every off-axis pole and zero has a matching conjugate.
    pub fn has_conjugate_symmetry(&self) -> bool {
        is_conjugate_closed(&self.poles) && is_conjugate_closed(&self.zeros)
    }

    /// Evaluates `H(z) = gain · Π(1 - q·z⁻¹) / Π(1 - p·z⁻¹)`.
    pub fn eval(&self, z: Complex) -> Result<Complex, CoreError> {
        let zinv = z.reciprocal()?;
        let top = self
            .zeros
            .iter()
            .fold(Complex::real(self.gain), |acc, &q| {
                acc * (Complex::ONE - q * zinv)
            });
        let bottom = self
            .poles
            .iter()
            .fold(Complex::ONE, |acc, &p| acc * (Complex::ONE - p * zinv));
        top.div(bottom)
    }
}

impl Default for PoleZeroModel {
    fn default() -> Self {
        Self::new()
    }
}

fn push_with_conjugate(list: &mut Vec<Complex>, c: Complex) {
    list.push(c);
    if c.im.abs() >= REAL_AXIS_EPSILON {
        list.push(c.conj());
    }
}

fn is_conjugate_closed(list: &[Complex]) -> bool {
    list.iter().all(|c| {
        c.im.abs() < REAL_AXIS_EPSILON
            || list
                .iter()
                .any(|d| (d.re - c.re).abs() < 1e-9 && (d.im + c.im).abs() < 1e-9)
    })
}
