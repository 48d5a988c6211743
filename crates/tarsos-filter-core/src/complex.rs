//! Complex arithmetic for pole/zero and frequency-response math.
//!
//! [`Complex`] is a plain `Copy` value: every operation returns a new value
//! and magnitude/phase are derived on demand, so they can never drift out of
//! sync with the rectangular parts.
//!
//! Division is the one partial operation. [`Complex::div`] and
//! [`Complex::reciprocal`] return [`CoreError::Domain`] for a zero-magnitude
//! divisor instead of silently producing NaN.

use core::f64::consts::PI;
use core::ops::{Add, Div, Mul, Neg, Sub};

use crate::error::CoreError;
use libm::{atan2, cos, cosh, exp, hypot, log, pow, sin, sinh, sqrt};

/// A complex number `re + j·im`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex {
    /// Real part.
    pub re: f64,
    /// Imaginary part.
    pub im: f64,
}

impl Complex {
    /// `0 + 0j`
    pub const ZERO: Complex = Complex::new(0.0, 0.0);
    /// `1 + 0j`
    pub const ONE: Complex = Complex::new(1.0, 0.0);
    /// `0 + 1j`
    pub const I: Complex = Complex::new(0.0, 1.0);

    /// Creates a complex number from rectangular parts.
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Creates a purely real complex number.
    pub const fn real(re: f64) -> Self {
        Self { re, im: 0.0 }
    }

    /// Creates a complex number from magnitude and phase (radians).
    pub fn from_polar(magnitude: f64, phase: f64) -> Self {
        Self::new(magnitude * cos(phase), magnitude * sin(phase))
    }

    /// Point on the unit circle at angle `omega`: `e^{jω}`.
    pub fn unit(omega: f64) -> Self {
        Self::from_polar(1.0, omega)
    }

    /// `sqrt(re² + im²)`
    #[inline]
    pub fn magnitude(self) -> f64 {
        hypot(self.re, self.im)
    }

    /// `re² + im²`
    #[inline]
    pub fn norm_sqr(self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    /// Argument in `(-π, π]`.
    ///
    /// `atan2` reports `-π` for a negative real with a negative-zero imaginary
    /// part; that case is folded onto `π`.
    pub fn phase(self) -> f64 {
        let p = atan2(self.im, self.re);
        if p <= -PI { PI } else { p }
    }

    /// Complex conjugate.
    #[inline]
    pub fn conj(self) -> Self {
        Self::new(self.re, -self.im)
    }

    /// Multiply by a real scalar.
    #[inline]
    pub fn scale(self, k: f64) -> Self {
        Self::new(self.re * k, self.im * k)
    }

    /// Checked division: `self · conj(other) / |other|²`.
    pub fn div(self, other: Complex) -> Result<Complex, CoreError> {
        let denom = other.norm_sqr();
        if denom == 0.0 {
            return Err(CoreError::Domain("division by zero-magnitude complex number"));
        }
        let num = self * other.conj();
        Ok(Complex::new(num.re / denom, num.im / denom))
    }

    /// Checked reciprocal `1 / self`.
    pub fn reciprocal(self) -> Result<Complex, CoreError> {
        Complex::ONE.div(self)
    }

    /// Principal square root: `sqrt(|z|)` at half the phase.
    pub fn sqrt(self) -> Complex {
        Complex::from_polar(sqrt(self.magnitude()), self.phase() * 0.5)
    }

    /// Real power: `|z|^p` at `phase · p`.
    pub fn pow(self, p: f64) -> Complex {
        let mag = self.magnitude();
        if mag == 0.0 {
            return if p == 0.0 { Complex::ONE } else { Complex::ZERO };
        }
        Complex::from_polar(pow(mag, p), self.phase() * p)
    }

    /// Integer power by repeated multiplication (exact for small exponents).
    ///
    /// Negative exponents go through [`Complex::reciprocal`].
    pub fn powi(self, n: i32) -> Result<Complex, CoreError> {
        let base = if n < 0 { self.reciprocal()? } else { self };
        let mut result = Complex::ONE;
        for _ in 0..n.unsigned_abs() {
            result = result * base;
        }
        Ok(result)
    }

    /// `e^z`
    pub fn exp(self) -> Complex {
        Complex::from_polar(exp(self.re), self.im)
    }

    /// Principal natural logarithm.
    pub fn ln(self) -> Complex {
        Complex::new(log(self.magnitude()), self.phase())
    }

    /// Complex sine.
    pub fn sin(self) -> Complex {
        Complex::new(sin(self.re) * cosh(self.im), cos(self.re) * sinh(self.im))
    }

    /// Complex cosine.
    pub fn cos(self) -> Complex {
        Complex::new(cos(self.re) * cosh(self.im), -sin(self.re) * sinh(self.im))
    }

    /// Principal inverse cosine: `-j · ln(z + j·sqrt(1 - z²))`.
    pub fn acos(self) -> Complex {
        let root = (Complex::ONE - self * self).sqrt();
        let inner = (self + Complex::I * root).ln();
        Complex::new(inner.im, -inner.re)
    }

    /// True when both parts are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }
}

impl From<f64> for Complex {
    fn from(re: f64) -> Self {
        Complex::real(re)
    }
}

impl Add for Complex {
    type Output = Complex;
    #[inline]
    fn add(self, rhs: Complex) -> Complex {
        Complex::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Add<f64> for Complex {
    type Output = Complex;
    #[inline]
    fn add(self, rhs: f64) -> Complex {
        Complex::new(self.re + rhs, self.im)
    }
}

impl Sub for Complex {
    type Output = Complex;
    #[inline]
    fn sub(self, rhs: Complex) -> Complex {
        self + (-rhs)
    }
}

impl Sub<f64> for Complex {
    type Output = Complex;
    #[inline]
    fn sub(self, rhs: f64) -> Complex {
        Complex::new(self.re - rhs, self.im)
    }
}

impl Mul for Complex {
    type Output = Complex;
    #[inline]
    fn mul(self, rhs: Complex) -> Complex {
        Complex::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl Mul<f64> for Complex {
    type Output = Complex;
    #[inline]
    fn mul(self, rhs: f64) -> Complex {
        self.scale(rhs)
    }
}

impl Div<f64> for Complex {
    type Output = Complex;
    #[inline]
    fn div(self, rhs: f64) -> Complex {
        Complex::new(self.re / rhs, self.im / rhs)
    }
}

impl Neg for Complex {
    type Output = Complex;
    #[inline]
    fn neg(self) -> Complex {
        Complex::new(-self.re, -self.im)
    }
}
