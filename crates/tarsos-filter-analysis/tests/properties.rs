//! Property-based tests for tarsos-filter-analysis.
//!
//! Round trip and linearity of the radix-2 FFT, agreement with rustfft as a
//! reference implementation, and equivalence of block convolution with the
//! per-sample direct form.

use proptest::prelude::*;
use rustfft::FftPlanner;
use rustfft::num_complex::Complex as RefComplex;
use tarsos_filter_analysis::{BlockConvolver, Fft};
use tarsos_filter_core::{DirectFormFilter, Filter};

fn interleaved(n: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1.0f64..1.0, 2 * n)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Inverse of forward equals n times the input.
    #[test]
    fn round_trip_scales_by_n(
        (n, data) in (0u32..10).prop_flat_map(|bits| {
            let n = 1usize << bits;
            (Just(n), interleaved(n))
        })
    ) {
        let fft = Fft::new(n).unwrap();
        let mut work = data.clone();
        fft.transform(&mut work, false).unwrap();
        fft.transform(&mut work, true).unwrap();
        for (a, b) in work.iter().zip(data.iter()) {
            prop_assert!((a / n as f64 - b).abs() < 1e-9);
        }
    }

    /// FFT(a·x + b·y) == a·FFT(x) + b·FFT(y).
    #[test]
    fn transform_is_linear(
        x in interleaved(64),
        y in interleaved(64),
        a in -3.0f64..3.0,
        b in -3.0f64..3.0,
    ) {
        let fft = Fft::new(64).unwrap();
        let mut combined: Vec<f64> = x.iter().zip(&y).map(|(p, q)| a * p + b * q).collect();
        let mut fx = x.clone();
        let mut fy = y.clone();
        fft.transform(&mut combined, false).unwrap();
        fft.transform(&mut fx, false).unwrap();
        fft.transform(&mut fy, false).unwrap();
        for i in 0..combined.len() {
            prop_assert!((combined[i] - (a * fx[i] + b * fy[i])).abs() < 1e-9);
        }
    }

    /// Forward and inverse agree with rustfft (which also leaves results unnormalized).
    #[test]
    fn matches_reference_fft(data in interleaved(256), inverse in any::<bool>()) {
        let mut ours = data.clone();
        Fft::new(256).unwrap().transform(&mut ours, inverse).unwrap();

        let mut planner = FftPlanner::<f64>::new();
        let plan = if inverse {
            planner.plan_fft_inverse(256)
        } else {
            planner.plan_fft_forward(256)
        };
        let mut reference: Vec<RefComplex<f64>> = data
            .chunks_exact(2)
            .map(|c| RefComplex::new(c[0], c[1]))
            .collect();
        plan.process(&mut reference);

        for (i, r) in reference.iter().enumerate() {
            prop_assert!((ours[2 * i] - r.re).abs() < 1e-9);
            prop_assert!((ours[2 * i + 1] - r.im).abs() < 1e-9);
        }
    }

    /// Overlap-add output matches direct-form FIR processing within 1e-6.
    #[test]
    fn convolution_matches_direct_form(
        kernel in prop::collection::vec(-0.5f64..0.5, 26..120),
        input in prop::collection::vec(-1.0f64..1.0, 1..2500),
        split in 1usize..700,
    ) {
        let fir = DirectFormFilter::fir(kernel.clone()).unwrap();
        prop_assume!(fir.uses_convolution());

        let mut state = fir.create_state();
        let mut expected = vec![0.0; input.len()];
        fir.process(&input, &mut expected, &mut state);

        let mut conv = BlockConvolver::new(&kernel).unwrap();
        let mut output = vec![0.0; input.len()];
        for (src, dst) in input.chunks(split).zip(output.chunks_mut(split)) {
            conv.process(src, dst);
        }

        for (a, b) in output.iter().zip(expected.iter()) {
            prop_assert!((a - b).abs() < 1e-6);
        }
    }
}
