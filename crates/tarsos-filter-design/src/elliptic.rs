//! Jacobi elliptic functions via descending Landen transformations.
//!
//! Everything here works with normalized arguments: `u` is measured in
//! units of the quarter period `K`, so `cd(0) = 1`, `sn(1) = 1`. The
//! functions follow the closed-form elliptic filter design of S. J.
//! Orfanidis ("Lecture notes on elliptic filter design", 2006), which solves
//! the degree equation directly instead of searching for it numerically.

use std::f64::consts::PI;

use tarsos_filter_core::Complex;

/// Landen iteration stops once the modulus falls below this.
const LANDEN_TOLERANCE: f64 = 1e-15;

/// Upper bound on Landen steps (convergence is quadratic; 6 suffice for k < 1 - 1e-12).
const LANDEN_MAX_STEPS: usize = 16;

/// Descending Landen sequence `v_n` of moduli starting from `k`.
pub fn landen(k: f64) -> Vec<f64> {
    let mut v = Vec::new();
    let mut k = k;
    while k > LANDEN_TOLERANCE && v.len() < LANDEN_MAX_STEPS {
        let kp = (1.0 - k * k).max(0.0).sqrt();
        k = (k / (1.0 + kp)).powi(2);
        v.push(k);
    }
    v
}

/// Complete elliptic integral of the first kind `K(k)`.
///
/// Returns infinity at `k = 1`.
pub fn ellipk(k: f64) -> f64 {
    if k >= 1.0 {
        return f64::INFINITY;
    }
    landen(k).iter().map(|v| 1.0 + v).product::<f64>() * PI / 2.0
}

/// Complementary modulus `k' = sqrt(1 - k²)`.
pub fn complement(k: f64) -> f64 {
    (1.0 - k * k).max(0.0).sqrt()
}

/// Jacobi `cd(uK, k)` for complex `u`.
pub fn cde(u: Complex, k: f64) -> Complex {
    ascend((u * (PI / 2.0)).cos(), k)
}

/// Jacobi `sn(uK, k)` for complex `u`.
pub fn sne(u: Complex, k: f64) -> Complex {
    ascend((u * (PI / 2.0)).sin(), k)
}

/// Real-argument convenience for [`sne`].
pub fn sne_real(u: f64, k: f64) -> f64 {
    sne(Complex::real(u), k).re
}

/// Inverse of [`cde`]: returns `u` with `cd(uK, k) = w`.
///
/// The real part is reduced modulo 4 and the imaginary part modulo
/// `2K'/K`, both symmetrically about zero.
pub fn acde(w: Complex, k: f64) -> Complex {
    let v = landen(k);
    let mut w = w;
    let mut previous = k;
    for &vn in &v {
        let root = (Complex::ONE - w * w * (previous * previous)).sqrt();
        w = safe_div(w, Complex::ONE + root) * (2.0 / (1.0 + vn));
        previous = vn;
    }

    let u = w.acos() * (2.0 / PI);
    if k > 0.0 {
        let r = ellipk(complement(k)) / ellipk(k);
        Complex::new(srem(u.re, 4.0), srem(u.im, 2.0 * r))
    } else {
        u
    }
}

/// Inverse of [`sne`]: `asn(w) = 1 - acd(w)`.
pub fn asne(w: Complex, k: f64) -> Complex {
    Complex::ONE - acde(w, k)
}

/// Solves the degree equation for the selectivity modulus `k`.
///
/// Given the filter order `n` and the discrimination modulus
/// `k1 = ε_p / ε_s`, returns the `k` for which an order-`n` elliptic
/// design meets the ripple and attenuation targets exactly.
pub fn ellipdeg(n: usize, k1: f64) -> f64 {
    let k1p = complement(k1);
    let half = n / 2;
    let product: f64 = (1..=half)
        .map(|i| sne_real((2 * i - 1) as f64 / n as f64, k1p).powi(4))
        .product();
    let kp = k1p.powi(n as i32) * product;
    complement(kp)
}

/// Ascending Landen recursion from a modulus-zero value.
fn ascend(w: Complex, k: f64) -> Complex {
    landen(k).iter().rev().fold(w, |w, &vn| {
        safe_div(w * (1.0 + vn), Complex::ONE + w * w * vn)
    })
}

/// Division that saturates to a large finite value instead of failing.
///
/// The recursions only hit a zero denominator at isolated points
/// (`w = ±j/sqrt(v)`), which real designs never land on exactly.
fn safe_div(a: Complex, b: Complex) -> Complex {
    a.div(b).unwrap_or(Complex::new(f64::MAX, 0.0))
}

/// Symmetric remainder of `x` modulo `y`, in `[-y/2, y/2]`.
fn srem(x: f64, y: f64) -> f64 {
    if !y.is_finite() || y == 0.0 {
        return x;
    }
    x - y * (x / y).round()
}
