//! Cascade of second-order sections.
//!
//! Each stage runs the canonical (Direct Form II) biquad:
//!
//! ```text
//! w[n] = x[n] + a1*w[n-1] + a2*w[n-2]
//! y[n] = b0*w[n] + b1*w[n-1] + b2*w[n-2]
//! ```
//!
//! Note the sign convention: `a1`/`a2` are stored already negated, so a
//! single real pole `p` is the stage `a1 = p, a2 = 0` and a conjugate pair
//! `p, p*` is `a1 = 2·Re(p), a2 = -|p|²`.
//!
//! [`realize`] turns a [`PoleZeroModel`] into stages by pairing each
//! conjugate pair (or two real roots) into one section.

use alloc::vec;
use alloc::vec::Vec;

use crate::complex::Complex;
use crate::error::CoreError;
use crate::filter::{Filter, FilterState};
use crate::pole_zero::{PoleZeroModel, REAL_AXIS_EPSILON};

/// Coefficients of one second-order section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadStage {
    /// Negated first feedback coefficient
    pub a1: f64,
    /// Negated second feedback coefficient
    pub a2: f64,
    /// Feedforward coefficients
    pub b0: f64,
    /// Feedforward `z⁻¹` coefficient
    pub b1: f64,
    /// Feedforward `z⁻²` coefficient
    pub b2: f64,
}

impl BiquadStage {
    /// Passthrough stage (`b0 = 1`, everything else zero).
    pub const fn passthrough() -> Self {
        Self {
            a1: 0.0,
            a2: 0.0,
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
        }
    }

    /// `(b0 + b1 z⁻¹ + b2 z⁻²) / (1 - a1 z⁻¹ - a2 z⁻²)` at a given `z⁻¹`.
    pub fn eval(&self, zinv: Complex) -> Result<Complex, CoreError> {
        let zinv2 = zinv * zinv;
        let top = Complex::real(self.b0) + zinv * self.b1 + zinv2 * self.b2;
        let bottom = Complex::ONE - zinv * self.a1 - zinv2 * self.a2;
        top.div(bottom)
    }
}

impl Default for BiquadStage {
    fn default() -> Self {
        Self::passthrough()
    }
}

/// Ordered chain of [`BiquadStage`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeFilter {
    stages: Vec<BiquadStage>,
}

impl CascadeFilter {
    /// Creates `stage_count` passthrough stages (at least one).
    pub fn new(stage_count: usize) -> Self {
        Self {
            stages: vec![BiquadStage::passthrough(); stage_count.max(1)],
        }
    }

    /// Creates a cascade from explicit stages.
    pub fn from_stages(stages: Vec<BiquadStage>) -> Self {
        if stages.is_empty() {
            return Self::new(1);
        }
        Self { stages }
    }

    /// Stages in processing order.
    pub fn stages(&self) -> &[BiquadStage] {
        &self.stages
    }

    /// Places a denominator factor in the first stage that can absorb it.
    ///
    /// An empty stage takes the factor as is. A stage holding a single real
    /// pole merges with another single real pole:
    /// `(1 - p z⁻¹)(1 - q z⁻¹)` becomes `a1 = p + q, a2 = -p·q`.
    /// Returns false when no stage has room.
    pub fn set_a_stage(&mut self, x1: f64, x2: f64) -> bool {
        for stage in &mut self.stages {
            if stage.a1 == 0.0 && stage.a2 == 0.0 {
                stage.a1 = x1;
                stage.a2 = x2;
                return true;
            }
            if stage.a2 == 0.0 && x2 == 0.0 {
                stage.a2 = -stage.a1 * x1;
                stage.a1 += x1;
                return true;
            }
        }
        false
    }

    /// Places a numerator factor `x0 + x1 z⁻¹ + x2 z⁻²` in the first stage that can absorb it.
    ///
    /// First-order factors merge pairwise:
    /// `(b0 + b1 z⁻¹)(x0 + x1 z⁻¹) = b0·x0 + (b1·x0 + b0·x1) z⁻¹ + b1·x1 z⁻²`.
    pub fn set_b_stage(&mut self, x0: f64, x1: f64, x2: f64) -> bool {
        for stage in &mut self.stages {
            if stage.b1 == 0.0 && stage.b2 == 0.0 {
                let g = stage.b0;
                stage.b0 = g * x0;
                stage.b1 = g * x1;
                stage.b2 = g * x2;
                return true;
            }
            if stage.b2 == 0.0 && x2 == 0.0 {
                stage.b2 = stage.b1 * x1;
                stage.b1 = stage.b1 * x0 + stage.b0 * x1;
                stage.b0 *= x0;
                return true;
            }
        }
        false
    }

    /// Multiplies the overall gain into the first stage's numerator.
    pub fn scale_gain(&mut self, gain: f64) {
        if let Some(first) = self.stages.first_mut() {
            first.b0 *= gain;
            first.b1 *= gain;
            first.b2 *= gain;
        }
    }

    /// Filter order (twice the stage count).
    pub fn order(&self) -> usize {
        self.stages.len() * 2
    }
}

impl Filter for CascadeFilter {
    fn process(&self, input: &[f64], output: &mut [f64], state: &mut FilterState) {
        let history = state.cascade_mut(self.stages.len());

        for (&x, y) in input.iter().zip(output.iter_mut()) {
            let mut sample = x;
            for (stage, w) in self.stages.iter().zip(history.chunks_exact_mut(3)) {
                let d2 = w[1];
                let d1 = w[0];
                let d0 = sample + d1 * stage.a1 + d2 * stage.a2;
                w[2] = d2;
                w[1] = d1;
                w[0] = d0;
                sample = stage.b0 * d0 + stage.b1 * d1 + stage.b2 * d2;
            }
            *y = sample;
        }
    }

    fn eval_transfer(&self, z: Complex) -> Result<Complex, CoreError> {
        let zinv = z.reciprocal()?;
        self.stages
            .iter()
            .try_fold(Complex::ONE, |acc, stage| Ok(acc * stage.eval(zinv)?))
    }

    fn length(&self) -> usize {
        self.stages.len()
    }

    fn create_state(&self) -> FilterState {
        FilterState::for_cascade(self.stages.len())
    }
}

/// Converts a pole/zero model into a biquad cascade.
///
/// Poles and zeros with `|im| < 1e-6` are snapped onto the real axis. Roots
/// below the real axis are skipped because their conjugate partner already
/// produced the stage. The model gain lands in the first stage.
pub fn realize(model: &PoleZeroModel) -> CascadeFilter {
    let roots = model.poles().len().max(model.zeros().len());
    let mut filter = CascadeFilter::new(roots.div_ceil(2));

    for &p in model.poles() {
        let p = snap_to_axis(p);
        if p.im < 0.0 {
            continue;
        }
        let placed = if p.im == 0.0 {
            filter.set_a_stage(p.re, 0.0)
        } else {
            filter.set_a_stage(2.0 * p.re, -p.norm_sqr())
        };
        debug_assert!(placed, "no free stage for pole {p:?}");
    }

    for &q in model.zeros() {
        let q = snap_to_axis(q);
        if q.im < 0.0 {
            continue;
        }
        let placed = if q.im == 0.0 {
            filter.set_b_stage(1.0, -q.re, 0.0)
        } else {
            filter.set_b_stage(1.0, -2.0 * q.re, q.norm_sqr())
        };
        debug_assert!(placed, "no free stage for zero {q:?}");
    }

    filter.scale_gain(model.gain());

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "realize: {} poles, {} zeros -> {} stages",
        model.poles().len(),
        model.zeros().len(),
        filter.stages.len()
    );

    filter
}

fn snap_to_axis(c: Complex) -> Complex {
    if c.im.abs() < REAL_AXIS_EPSILON {
        Complex::real(c.re)
    } else {
        c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impulse(filter: &CascadeFilter, len: usize) -> Vec<f64> {
        let mut input = vec![0.0; len];
        input[0] = 1.0;
        let mut output = vec![0.0; len];
        let mut state = filter.create_state();
        filter.process(&input, &mut output, &mut state);
        output
    }

    #[test]
    fn passthrough_by_default() {
        let filter = CascadeFilter::new(2);
        let out = impulse(&filter, 4);
        assert_eq!(out, vec![1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn single_real_pole_decays_geometrically() {
        let mut model = PoleZeroModel::new();
        model.push_pole(Complex::real(0.5));
        let filter = realize(&model);
        let out = impulse(&filter, 5);
        for (n, y) in out.iter().enumerate() {
            assert!((y - 0.5f64.powi(n as i32)).abs() < 1e-12);
        }
    }

    #[test]
    fn two_real_poles_share_a_stage() {
        let mut model = PoleZeroModel::new();
        model.push_pole(Complex::real(0.5));
        model.push_pole(Complex::real(-0.25));
        let filter = realize(&model);
        assert_eq!(filter.stages().len(), 1);
        let s = filter.stages()[0];
        assert!((s.a1 - 0.25).abs() < 1e-12);
        assert!((s.a2 - 0.125).abs() < 1e-12);
    }

    #[test]
    fn conjugate_pair_fills_one_stage() {
        let mut model = PoleZeroModel::new();
        let p = Complex::from_polar(0.9, 0.5);
        model.push_pole_pair(p);
        model.push_zero_pair(Complex::unit(2.0));
        let filter = realize(&model);
        assert_eq!(filter.stages().len(), 1);
        let s = filter.stages()[0];
        assert!((s.a1 - 2.0 * p.re).abs() < 1e-12);
        assert!((s.a2 + 0.81).abs() < 1e-12);
        assert!((s.b2 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn real_zeros_merge_pairwise() {
        let mut model = PoleZeroModel::new();
        model.push_zero(Complex::real(-1.0));
        model.push_zero(Complex::real(-1.0));
        let filter = realize(&model);
        let s = filter.stages()[0];
        // (1 + z^-1)^2
        assert_eq!((s.b0, s.b1, s.b2), (1.0, 2.0, 1.0));
    }

    #[test]
    fn transfer_matches_model() {
        let mut model = PoleZeroModel::new().with_gain(0.3);
        model.push_pole_pair(Complex::from_polar(0.8, 1.1));
        model.push_pole(Complex::real(0.4));
        model.push_zero(Complex::real(-1.0));
        model.push_zero(Complex::real(-1.0));
        model.push_zero(Complex::real(-1.0));
        let filter = realize(&model);

        for k in 1..16 {
            let z = Complex::unit(k as f64 * 0.19);
            let a = filter.eval_transfer(z).unwrap();
            let b = model.eval(z).unwrap();
            assert!((a - b).magnitude() < 1e-9, "mismatch at k={k}");
        }
    }

    #[test]
    fn process_matches_transfer_at_dc() {
        let mut model = PoleZeroModel::new();
        model.push_pole_pair(Complex::from_polar(0.7, 0.3));
        let filter = realize(&model);
        let dc_gain = filter.eval_transfer(Complex::ONE).unwrap().re;

        let input = vec![1.0; 400];
        let mut output = vec![0.0; 400];
        let mut state = filter.create_state();
        filter.process(&input, &mut output, &mut state);
        assert!((output[399] - dc_gain).abs() < 1e-9);
    }
}
