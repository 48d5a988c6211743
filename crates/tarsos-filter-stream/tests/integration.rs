//! Integration tests for tarsos-filter-stream.
//!
//! Drives designed filters through the streaming driver and compares the
//! output against direct evaluation.

use std::f64::consts::PI;

use tarsos_filter_core::{Complex, DigitalFilter, Filter};
use tarsos_filter_design::{
    Band, CustomIirEditorState, FilterFamily, Window, all_families, design_filter,
};
use tarsos_filter_stream::{
    DriverConfig, DriverError, DriverState, GainConfig, MultiChannelDriver, ProcessingMode,
    StreamingDriver,
};

fn realized(family: &FilterFamily) -> DigitalFilter {
    design_filter(family).unwrap().into_filter()
}

fn raw_config() -> DriverConfig {
    DriverConfig {
        gain: GainConfig::disabled(),
        ..DriverConfig::default()
    }
}

fn reference(filter: &DigitalFilter, input: &[f64]) -> Vec<f64> {
    let mut state = filter.create_state();
    let mut output = vec![0.0; input.len()];
    filter.process(input, &mut output, &mut state);
    output
}

fn noise(len: usize) -> Vec<f64> {
    // Deterministic broadband test signal
    (0..len)
        .map(|i| {
            let t = i as f64;
            0.5 * (0.37 * t).sin() + 0.3 * (1.91 * t).cos() + 0.2 * (2.83 * t + 0.4).sin()
        })
        .collect()
}

#[test]
fn zero_block_gives_zero_output_for_every_family() {
    for family in all_families() {
        let mut driver = StreamingDriver::default();
        driver.set_filter(realized(&family));
        for _ in 0..3 {
            let out = driver.feed(&[0.0; 700]).unwrap();
            assert!(out.iter().all(|&y| y == 0.0), "{}", family.name());
        }
    }
}

#[test]
fn convolution_matches_direct_form() {
    let filter = realized(&FilterFamily::WindowedSinc {
        band: Band::LowPass { cutoff: 0.2 * PI },
        taps: 101,
        window: Window::Hamming,
    });
    assert!(filter.uses_convolution());

    let input = noise(6000);
    let expected = reference(&filter, &input);

    let mut driver = StreamingDriver::new(raw_config());
    driver.set_filter(filter);
    let mut got = Vec::new();
    let mut pos = 0;
    for block in [1, 64, 511, 3000, 17, 900].iter().cycle() {
        if pos >= input.len() {
            break;
        }
        let end = (pos + block).min(input.len());
        got.extend(driver.feed(&input[pos..end]).unwrap());
        pos = end;
    }
    assert_eq!(driver.mode(), Some(ProcessingMode::Convolution));

    for (i, (g, e)) in got.iter().zip(&expected).enumerate() {
        assert!((g - e).abs() < 1e-6, "sample {i}: {g} vs {e}");
    }
}

#[test]
fn butterworth_stream_separates_tones() {
    let filter = realized(&FilterFamily::Butterworth {
        band: Band::LowPass { cutoff: 0.3 * PI },
        order: 4,
    });
    let mut driver = StreamingDriver::default();
    driver.set_filter(filter);

    let low: Vec<f64> = (0..4096).map(|i| (0.05 * PI * i as f64).sin()).collect();
    let high: Vec<f64> = (0..4096).map(|i| (0.9 * PI * i as f64).sin()).collect();

    let out = driver.process_signal(&low, 256).unwrap();
    let peak = out[2048..].iter().fold(0.0f64, |m, y| m.max(y.abs()));
    assert!((peak - 1.0).abs() < 0.02, "passband peak {peak}");

    driver.reset();
    let out = driver.process_signal(&high, 256).unwrap();
    let peak = out[2048..].iter().fold(0.0f64, |m, y| m.max(y.abs()));
    assert!(peak < 0.01, "stopband peak {peak}");
}

#[test]
fn filter_sent_from_another_thread() {
    let mut driver = StreamingDriver::default();
    let remote = driver.handoff();
    let family = FilterFamily::MovingAverage { length: 5 };

    std::thread::spawn(move || remote.send(realized(&family)))
        .join()
        .unwrap();

    assert_eq!(driver.state(), DriverState::Idle);
    let out = driver.feed(&[1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
    for (g, e) in out.iter().zip([0.2, 0.2, 0.2, 0.2, 0.2, 0.0, 0.0, 0.0]) {
        assert!((g - e).abs() < 1e-12);
    }
    assert_eq!(driver.state(), DriverState::Filtering);
}

#[test]
fn unstable_custom_iir_stops_the_stream() {
    let mut editor = CustomIirEditorState::new();
    editor.add_pole(Complex::from_polar(1.05, 0.4));
    let mut driver = StreamingDriver::default();
    driver.set_filter(realized(&FilterFamily::CustomIir(editor)));

    let mut input = vec![0.0; 20_000];
    input[0] = 1000.0;
    let err = driver.process_signal(&input, 256).unwrap_err();
    assert!(matches!(err, DriverError::Unstable { .. }));
    assert_eq!(driver.state(), DriverState::Unstable);
    assert!(matches!(
        driver.feed(&[0.0; 16]),
        Err(DriverError::Unstable { .. })
    ));
}

#[test]
fn loud_input_is_kept_inside_full_scale() {
    let mut driver = StreamingDriver::default();
    driver.set_filter(realized(&FilterFamily::Resonator {
        frequency: 0.25 * PI,
        radius: 0.99,
        zeros_at_ends: true,
    }));

    let input: Vec<f64> = (0..8192).map(|i| 30_000.0 * (0.25 * PI * i as f64).sin()).collect();
    let out = driver.process_signal(&input, 512).unwrap();
    let peak = out.iter().fold(0.0f64, |m, y| m.max(y.abs()));
    assert!(peak <= 32_767.0, "peak {peak}");
    assert!(driver.gain() <= 1.0);
}

#[test]
fn plucked_string_runs_in_direct_mode() {
    let mut driver = StreamingDriver::new(raw_config());
    driver.set_filter(realized(&FilterFamily::PluckedString {
        delay: 100,
        gain: 0.99,
    }));
    let mut input = vec![0.0; 10_000];
    input[0] = 1.0;
    let out = driver.process_signal(&input, 512).unwrap();
    assert_eq!(driver.mode(), Some(ProcessingMode::Direct));
    let early = out[..1000].iter().fold(0.0f64, |m, y| m.max(y.abs()));
    let late = out[9000..].iter().fold(0.0f64, |m, y| m.max(y.abs()));
    assert!(late < early);
}

#[test]
fn planar_matches_independent_drivers() {
    let filter = realized(&FilterFamily::ChebyshevI {
        band: Band::HighPass { cutoff: 0.4 * PI },
        order: 5,
        ripple_db: 1.0,
    });
    let left = noise(1024);
    let right: Vec<f64> = left.iter().rev().copied().collect();

    let mut planar = MultiChannelDriver::new(2, raw_config());
    planar.set_filter(filter.clone());
    let out = planar.process_planar(&[&left, &right]).unwrap();

    for (input, got) in [(&left, &out[0]), (&right, &out[1])] {
        let mut single = StreamingDriver::new(raw_config());
        single.set_filter(filter.clone());
        assert_eq!(&single.feed(input).unwrap(), got);
    }
}
