//! Integration tests for tarsos-filter-core realizations.
//!
//! Exercises the public API across modules: pole/zero models realized as
//! cascades, sparse direct-form filters, state continuity across blocks, and
//! zero-state linearity.

use tarsos_filter_core::{
    CascadeFilter, Complex, DigitalFilter, DirectFormFilter, Filter, PoleZeroModel, realize,
};

const TAU: f64 = core::f64::consts::TAU;

/// Run a whole signal through a filter with fresh state.
fn run(filter: &dyn Filter, input: &[f64]) -> Vec<f64> {
    let mut state = filter.create_state();
    let mut output = vec![0.0; input.len()];
    filter.process(input, &mut output, &mut state);
    output
}

/// Measure steady-state amplitude of a sine at `omega` (radians/sample).
fn sine_gain(filter: &dyn Filter, omega: f64) -> f64 {
    let n = 4096;
    let input: Vec<f64> = (0..n).map(|i| (omega * i as f64).sin()).collect();
    let output = run(filter, &input);
    let tail = &output[n / 2..];
    let rms_out = (tail.iter().map(|y| y * y).sum::<f64>() / tail.len() as f64).sqrt();
    rms_out * core::f64::consts::SQRT_2
}

fn resonator(radius: f64, omega: f64) -> PoleZeroModel {
    let mut model = PoleZeroModel::new();
    model.push_pole_pair(Complex::from_polar(radius, omega));
    model.push_zero(Complex::real(1.0));
    model.push_zero(Complex::real(-1.0));
    model
}

// ============================================================================
// 1. Concrete scenarios
// ============================================================================

#[test]
fn moving_average_of_five_spreads_impulse() {
    let avg = DirectFormFilter::fir(vec![0.2, 0.2, 0.2, 0.2, 0.2]).unwrap();
    let output = run(&avg, &[1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    let expected = [0.2, 0.2, 0.2, 0.2, 0.2, 0.0, 0.0, 0.0];
    for (i, (got, want)) in output.iter().zip(expected.iter()).enumerate() {
        assert!((got - want).abs() < 1e-12, "sample {i}: {got} vs {want}");
    }
}

#[test]
fn zero_input_gives_zero_output() {
    let filters: Vec<DigitalFilter> = vec![
        DirectFormFilter::fir(vec![0.3, -0.2, 0.9]).unwrap().into(),
        DirectFormFilter::new(vec![1.0, 0.0], vec![0, 7], Some(vec![1.0, -0.9]))
            .unwrap()
            .into(),
        realize(&resonator(0.95, 0.6)).into(),
    ];
    for filter in &filters {
        let output = run(filter, &[0.0; 256]);
        assert!(
            output.iter().all(|&y| y == 0.0),
            "{} filter produced non-zero output from silence",
            filter.kind()
        );
    }
}

// ============================================================================
// 2. Frequency-domain agreement
// ============================================================================

#[test]
fn resonator_peaks_at_pole_angle() {
    let omega = 0.25 * TAU / 2.0;
    let filter = realize(&resonator(0.98, omega));

    let at_peak = sine_gain(&filter, omega);
    let below = sine_gain(&filter, omega * 0.5);
    let above = sine_gain(&filter, omega * 1.8);
    assert!(at_peak > 5.0 * below, "peak {at_peak} vs below {below}");
    assert!(at_peak > 5.0 * above, "peak {at_peak} vs above {above}");
}

#[test]
fn measured_gain_matches_transfer_function() {
    let filter = realize(&resonator(0.9, 1.0));
    for &omega in &[0.3, 0.9, 1.4, 2.5] {
        let measured = sine_gain(&filter, omega);
        let predicted = filter.eval_transfer(Complex::unit(omega)).unwrap().magnitude();
        assert!(
            (measured - predicted).abs() < 0.02 * predicted.max(1e-3),
            "omega={omega}: measured {measured}, predicted {predicted}"
        );
    }
}

#[test]
fn direct_form_and_cascade_agree_for_same_biquad() {
    // H(z) = (1 + z^-1) / (1 - 0.5 z^-1)
    let direct =
        DirectFormFilter::new(vec![1.0, 1.0], vec![0, 1], Some(vec![1.0, -0.5])).unwrap();
    let mut model = PoleZeroModel::new();
    model.push_pole(Complex::real(0.5));
    model.push_zero(Complex::real(-1.0));
    let cascade = realize(&model);

    let input: Vec<f64> = (0..64).map(|i| ((i * 7) % 11) as f64 - 5.0).collect();
    let a = run(&direct, &input);
    let b = run(&cascade, &input);
    for (x, y) in a.iter().zip(b.iter()) {
        assert!((x - y).abs() < 1e-9);
    }
}

// ============================================================================
// 3. Stability
// ============================================================================

#[test]
fn stable_cascade_stays_bounded_on_constant_input() {
    let mut model = PoleZeroModel::new();
    for k in 0..4 {
        model.push_pole_pair(Complex::from_polar(0.97, 0.2 + 0.5 * k as f64));
    }
    assert!(model.is_stable());
    let filter = realize(&model);
    let output = run(&filter, &vec![1.0; 10_000]);
    assert!(output.iter().all(|y| y.is_finite()));
}

#[test]
fn unstable_pole_grows_without_bound() {
    let mut model = PoleZeroModel::new();
    model.push_pole(Complex::real(1.05));
    let filter = realize(&model);
    let output = run(&filter, &vec![1.0; 20_000]);
    assert!(output.iter().any(|y| !y.is_finite()), "expected overflow");
}

#[test]
fn empty_cascade_is_passthrough() {
    let filter = CascadeFilter::new(0);
    let input = [0.5, -1.0, 0.25];
    assert_eq!(run(&filter, &input), input.to_vec());
}
