//! Integration tests for tarsos-filter-analysis.
//!
//! Runs realized filters from tarsos-filter-core through the response and
//! convolution tools end to end.

use std::f64::consts::PI;

use tarsos_filter_analysis::{
    AnalysisError, BlockConvolver, Fft, FrequencyResponseTable, Window, frequency_response,
    impulse_curve, step_curve, transform,
};
use tarsos_filter_core::{Complex, DirectFormFilter, Filter, PoleZeroModel, realize};

fn resonator(r: f64, theta: f64) -> PoleZeroModel {
    let mut model = PoleZeroModel::new();
    model.push_pole_pair(Complex::from_polar(r, theta));
    model.push_zero(Complex::real(1.0));
    model.push_zero(Complex::real(-1.0));
    model
}

fn peak_index(table: &FrequencyResponseTable) -> usize {
    let mags = table.magnitudes();
    mags.iter()
        .enumerate()
        .fold(0, |best, (i, &m)| if m > mags[best] { i } else { best })
}

#[test]
fn non_power_of_two_is_rejected_before_work() {
    let mut data = vec![1.0; 2 * 100];
    let before = data.clone();
    assert!(matches!(transform(&mut data, false), Err(AnalysisError::InvalidSize(100))));
    assert_eq!(data, before);
}

#[test]
fn resonator_peak_sits_at_pole_angle() {
    let theta = 0.4 * PI;
    let filter = realize(&resonator(0.97, theta));
    let table = frequency_response(&filter, 512).unwrap();
    let peak = table.frequency(peak_index(&table));
    assert!((peak - theta).abs() < 0.02, "peak at {peak}");
    // Zeros at DC and Nyquist
    assert!(table.magnitude(0) < 1e-9);
}

#[test]
fn windowed_kernel_response_via_fft() {
    let mut kernel = vec![1.0; 33];
    Window::Blackman.apply(&mut kernel);
    let fir = DirectFormFilter::fir(kernel).unwrap();
    let table = frequency_response(&fir, 1024).unwrap();
    assert!((table.magnitude(0) - 1.0).abs() < 1e-12);
    // Blackman sidelobes stay below -50 dB
    let stop = (0.5 * table.len() as f64) as usize;
    for i in stop..table.len() {
        assert!(table.magnitude_db(i) < -50.0, "point {i}: {}", table.magnitude_db(i));
    }
}

#[test]
fn step_settles_for_stable_cascade() {
    let filter = realize(&resonator(0.9, 1.0));
    let curve = step_curve(&filter, 2000);
    assert!(curve.settled_length() > 0);
    assert!(curve.settled_length() < 200);
    // Zero at DC: the step decays to nothing
    assert!(curve.response()[1999].abs() < 1e-9);
}

#[test]
fn long_fir_convolution_equals_direct_form() {
    let kernel: Vec<f64> = (0..101)
        .map(|i| Window::Hann.value(i, 101) * ((i as f64 - 50.0) * 0.3).cos() / 50.0)
        .collect();
    let fir = DirectFormFilter::fir(kernel.clone()).unwrap();
    assert!(fir.uses_convolution());

    let input: Vec<f64> = (0..5000).map(|i| ((i * 31 % 97) as f64 / 48.5) - 1.0).collect();
    let mut state = fir.create_state();
    let mut direct = vec![0.0; input.len()];
    fir.process(&input, &mut direct, &mut state);

    let mut conv = BlockConvolver::new(&kernel).unwrap();
    let mut fast = vec![0.0; input.len()];
    for (src, dst) in input.chunks(512).zip(fast.chunks_mut(512)) {
        conv.process(src, dst);
    }

    for (a, b) in direct.iter().zip(fast.iter()) {
        assert!((a - b).abs() < 1e-6);
    }
}

#[test]
fn impulse_of_long_fir_is_its_kernel() {
    let kernel: Vec<f64> = (0..64).map(|i| 1.0 / (1.0 + i as f64)).collect();
    let fir = DirectFormFilter::fir(kernel.clone()).unwrap();
    let curve = impulse_curve(&fir, 100);
    assert_eq!(curve.settled_length(), 64);
    assert_eq!(&curve.response()[..64], kernel.as_slice());
}

#[test]
fn spectrum_of_real_signal_is_conjugate_symmetric() {
    let n = 64;
    let fft = Fft::new(n).unwrap();
    let signal: Vec<f64> = (0..n).map(|i| (i as f64 * 0.37).sin() + 0.2).collect();
    let spectrum = fft.forward_real(&signal);
    for k in 1..n {
        let (re, im) = (spectrum[2 * k], spectrum[2 * k + 1]);
        let (re2, im2) = (spectrum[2 * (n - k)], spectrum[2 * (n - k) + 1]);
        assert!((re - re2).abs() < 1e-9 && (im + im2).abs() < 1e-9);
    }
}
