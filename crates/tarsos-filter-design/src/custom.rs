//! User-edited designs.
//!
//! [`CustomFirEditorState`] holds a drawn magnitude curve over `[0, π]` and
//! turns it into a linear-phase FIR kernel through an inverse FFT.
//! [`CustomIirEditorState`] holds hand-placed poles and zeros; only the upper
//! half-plane member of each conjugate pair is stored, and the mirror is
//! added when the model is built.

use std::f64::consts::PI;

use tarsos_filter_analysis::{Fft, Window};
use tarsos_filter_core::{Complex, PoleZeroModel};

use crate::error::{DesignError, Result};
use crate::fir::{check_window, clamp_taps};

/// Poles and zeros may not be dragged further than this from the origin.
pub const MAX_EDIT_RADIUS: f64 = 1.1;

/// Default number of points in a drawn magnitude curve.
pub const DEFAULT_CURVE_POINTS: usize = 256;

/// Drawn magnitude response and kernel settings for a custom FIR.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomFirEditorState {
    /// Magnitude at `π·i/len` for each point, `len` a power of two
    magnitudes: Vec<f64>,
    taps: usize,
    window: Window,
}

impl CustomFirEditorState {
    /// Flat (all-pass) curve of `points` values.
    ///
    /// # Errors
    ///
    /// [`DesignError::InvalidParameter`] unless `points` is a power of two of at least 2,
    /// or for a Kaiser `beta` outside the accepted range.
    pub fn new(points: usize, taps: usize, window: Window) -> Result<Self> {
        let window = check_window(window)?;
        if points < 2 || !points.is_power_of_two() {
            return Err(DesignError::invalid(
                "points",
                format!("must be a power of two ≥ 2, got {points}"),
            ));
        }
        Ok(Self {
            magnitudes: vec![1.0; points],
            taps: clamp_taps(taps).min(2 * points - 1),
            window,
        })
    }

    /// Builds an editor from an existing curve.
    pub fn from_curve(magnitudes: Vec<f64>, taps: usize, window: Window) -> Result<Self> {
        let mut state = Self::new(magnitudes.len(), taps, window)?;
        for (i, m) in magnitudes.into_iter().enumerate() {
            state.set_point(i, m);
        }
        Ok(state)
    }

    /// Drawn magnitudes.
    pub fn magnitudes(&self) -> &[f64] {
        &self.magnitudes
    }

    /// Kernel length.
    pub fn taps(&self) -> usize {
        self.taps
    }

    /// Window applied to the kernel.
    pub fn window(&self) -> Window {
        self.window
    }

    /// Sets one point, clamped to be non-negative. Out-of-range indices are ignored.
    pub fn set_point(&mut self, index: usize, magnitude: f64) {
        if let Some(m) = self.magnitudes.get_mut(index) {
            *m = if magnitude.is_finite() { magnitude.max(0.0) } else { 0.0 };
        }
    }

    /// Sets every point whose frequency lies in `[from, to]` (radians).
    pub fn draw(&mut self, from: f64, to: f64, magnitude: f64) {
        let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
        let n = self.magnitudes.len();
        for i in 0..n {
            let omega = PI * i as f64 / n as f64;
            if omega >= lo && omega <= hi {
                self.set_point(i, magnitude);
            }
        }
    }

    /// Linear-phase kernel realizing the curve.
    ///
    /// The curve is mirrored into a real, even spectrum of `2·points` bins,
    /// inverse transformed, rotated so time zero lands in the middle of the
    /// kernel, and windowed.
    pub fn kernel(&self) -> Result<Vec<f64>> {
        let points = self.magnitudes.len();
        let size = 2 * points;
        let fft = Fft::new(size)?;

        let mut spectrum = vec![0.0; 2 * size];
        for (i, &m) in self.magnitudes.iter().enumerate() {
            spectrum[2 * i] = m;
            if i > 0 {
                spectrum[2 * (size - i)] = m;
            }
        }
        spectrum[2 * points] = self.magnitudes[points - 1];
        fft.transform(&mut spectrum, true)?;

        let half = (self.taps / 2) as isize;
        let mut kernel: Vec<f64> = (0..self.taps)
            .map(|i| {
                let n = (i as isize - half).rem_euclid(size as isize) as usize;
                spectrum[2 * n] / size as f64
            })
            .collect();
        self.window.apply(&mut kernel);
        Ok(kernel)
    }
}

impl Default for CustomFirEditorState {
    fn default() -> Self {
        Self {
            magnitudes: vec![1.0; DEFAULT_CURVE_POINTS],
            taps: 255,
            window: Window::Hamming,
        }
    }
}

/// Which list an editor point belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointKind {
    /// Denominator root
    Pole,
    /// Numerator root
    Zero,
}

/// Reference to one editable point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditPoint {
    /// Pole or zero
    pub kind: PointKind,
    /// Index into that list
    pub index: usize,
}

/// Hand-placed poles and zeros.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomIirEditorState {
    poles: Vec<Complex>,
    zeros: Vec<Complex>,
}

impl CustomIirEditorState {
    /// Empty editor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored poles (upper half-plane or real).
    pub fn poles(&self) -> &[Complex] {
        &self.poles
    }

    /// Stored zeros (upper half-plane or real).
    pub fn zeros(&self) -> &[Complex] {
        &self.zeros
    }

    /// Adds a pole (and implicitly its conjugate).
    pub fn add_pole(&mut self, position: Complex) -> EditPoint {
        self.poles.push(constrain(position));
        EditPoint {
            kind: PointKind::Pole,
            index: self.poles.len() - 1,
        }
    }

    /// Adds a zero (and implicitly its conjugate).
    pub fn add_zero(&mut self, position: Complex) -> EditPoint {
        self.zeros.push(constrain(position));
        EditPoint {
            kind: PointKind::Zero,
            index: self.zeros.len() - 1,
        }
    }

    /// Moves a point. Returns false if the reference is stale.
    pub fn move_point(&mut self, point: EditPoint, position: Complex) -> bool {
        match self.list_mut(point.kind).get_mut(point.index) {
            Some(slot) => {
                *slot = constrain(position);
                true
            }
            None => false,
        }
    }

    /// Removes a point. Returns false if the reference is stale.
    pub fn remove_point(&mut self, point: EditPoint) -> bool {
        let list = self.list_mut(point.kind);
        if point.index < list.len() {
            list.remove(point.index);
            true
        } else {
            false
        }
    }

    /// Nearest stored point to `position`, if any lies within `radius`.
    pub fn hit_test(&self, position: Complex, radius: f64) -> Option<EditPoint> {
        let position = constrain(position);
        let candidates = self
            .poles
            .iter()
            .enumerate()
            .map(|(i, p)| (PointKind::Pole, i, *p))
            .chain(self.zeros.iter().enumerate().map(|(i, q)| (PointKind::Zero, i, *q)));

        candidates
            .map(|(kind, index, c)| (EditPoint { kind, index }, (c - position).magnitude()))
            .filter(|(_, d)| *d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(point, _)| point)
    }

    /// Full model with conjugates mirrored in, unit gain.
    pub fn model(&self) -> PoleZeroModel {
        let mut model = PoleZeroModel::new();
        for &p in &self.poles {
            model.push_pole_pair(p);
        }
        for &q in &self.zeros {
            model.push_zero_pair(q);
        }
        model
    }

    fn list_mut(&mut self, kind: PointKind) -> &mut Vec<Complex> {
        match kind {
            PointKind::Pole => &mut self.poles,
            PointKind::Zero => &mut self.zeros,
        }
    }
}

/// Folds into the upper half-plane and pulls inside `MAX_EDIT_RADIUS`.
fn constrain(position: Complex) -> Complex {
    let c = if position.is_finite() {
        position
    } else {
        Complex::ZERO
    };
    let c = if c.im < 0.0 { c.conj() } else { c };
    let limit = MAX_EDIT_RADIUS * (1.0 - 1e-9);
    let r = c.magnitude();
    if r > limit { c.scale(limit / r) } else { c }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_curve_gives_centred_impulse() {
        let editor = CustomFirEditorState::new(64, 31, Window::Rectangular).unwrap();
        let kernel = editor.kernel().unwrap();
        assert_eq!(kernel.len(), 31);
        for (i, h) in kernel.iter().enumerate() {
            let expected = if i == 15 { 1.0 } else { 0.0 };
            assert!((h - expected).abs() < 1e-12, "tap {i}: {h}");
        }
    }

    #[test]
    fn drawn_lowpass_kernel_is_symmetric() {
        let mut editor = CustomFirEditorState::new(128, 63, Window::Hann).unwrap();
        editor.draw(0.5 * PI, PI, 0.0);
        assert_eq!(editor.magnitudes()[63], 1.0);
        assert_eq!(editor.magnitudes()[64], 0.0);
        let kernel = editor.kernel().unwrap();
        for i in 0..63 {
            assert!((kernel[i] - kernel[62 - i]).abs() < 1e-12);
        }
        let dc: f64 = kernel.iter().sum();
        assert!((dc - 1.0).abs() < 0.05, "dc {dc}");
    }

    #[test]
    fn rejects_odd_curve_length() {
        assert!(CustomFirEditorState::new(100, 31, Window::Hann).is_err());
        assert!(CustomFirEditorState::new(1, 1, Window::Hann).is_err());
    }

    #[test]
    fn rejects_kaiser_beta_out_of_range() {
        for beta in [f64::NAN, f64::INFINITY, -1.0, 1e4] {
            assert!(CustomFirEditorState::new(64, 31, Window::Kaiser { beta }).is_err());
        }
        assert!(CustomFirEditorState::new(64, 31, Window::Kaiser { beta: 8.0 }).is_ok());
    }

    #[test]
    fn negative_magnitudes_clamp_to_zero() {
        let mut editor = CustomFirEditorState::default();
        editor.set_point(3, -2.0);
        editor.set_point(10_000, 5.0);
        assert_eq!(editor.magnitudes()[3], 0.0);
    }

    #[test]
    fn points_are_constrained() {
        let mut editor = CustomIirEditorState::new();
        let p = editor.add_pole(Complex::new(3.0, -4.0));
        let stored = editor.poles()[p.index];
        assert!(stored.magnitude() < MAX_EDIT_RADIUS);
        assert!(stored.im >= 0.0);

        assert!(editor.move_point(p, Complex::new(0.5, 0.2)));
        assert_eq!(editor.poles()[0], Complex::new(0.5, 0.2));
        assert!(!editor.move_point(EditPoint { kind: PointKind::Zero, index: 0 }, Complex::ZERO));
    }

    #[test]
    fn model_mirrors_conjugates() {
        let mut editor = CustomIirEditorState::new();
        editor.add_pole(Complex::new(0.5, 0.5));
        editor.add_pole(Complex::real(0.2));
        editor.add_zero(Complex::new(-0.3, 0.9));
        let model = editor.model();
        assert_eq!(model.poles().len(), 3);
        assert_eq!(model.zeros().len(), 2);
        assert!(model.has_conjugate_symmetry());
    }

    #[test]
    fn hit_test_and_remove() {
        let mut editor = CustomIirEditorState::new();
        editor.add_pole(Complex::new(0.5, 0.5));
        let z = editor.add_zero(Complex::new(0.52, 0.5));
        let hit = editor.hit_test(Complex::new(0.53, -0.5), 0.05).unwrap();
        assert_eq!(hit, z);
        assert!(editor.remove_point(hit));
        assert!(editor.zeros().is_empty());
        assert!(!editor.remove_point(hit));
        assert!(editor.hit_test(Complex::new(-0.9, 0.0), 0.05).is_none());
    }
}
