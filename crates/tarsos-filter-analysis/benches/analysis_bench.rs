//! Criterion benchmarks for the FFT engine and block convolver
//!
//! Run with: cargo bench -p tarsos-filter-analysis
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tarsos_filter_analysis::{BlockConvolver, Fft, Window, frequency_response};
use tarsos_filter_core::{DirectFormFilter, Filter};

const FFT_SIZES: &[usize] = &[256, 1024, 4096];

fn generate_test_signal(size: usize) -> Vec<f64> {
    (0..size).map(|i| (0.05 * i as f64).sin() * 0.5).collect()
}

fn bench_fft(c: &mut Criterion) {
    let mut group = c.benchmark_group("FFT");

    for &size in FFT_SIZES {
        let fft = Fft::new(size).unwrap();
        let mut data = generate_test_signal(2 * size);
        group.bench_with_input(BenchmarkId::new("forward", size), &size, |b, _| {
            b.iter(|| fft.transform(black_box(&mut data), false));
        });
    }

    group.finish();
}

fn bench_convolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("Convolution");
    let kernel = Window::Hamming.coefficients(255);
    let fir = DirectFormFilter::fir(kernel.clone()).unwrap();
    let input = generate_test_signal(4096);
    let mut output = vec![0.0; 4096];

    group.bench_function("overlap_add", |b| {
        let mut conv = BlockConvolver::new(&kernel).unwrap();
        b.iter(|| conv.process(black_box(&input), &mut output));
    });
    group.bench_function("direct_form", |b| {
        let mut state = fir.create_state();
        b.iter(|| fir.process(black_box(&input), &mut output, &mut state));
    });

    group.bench_function("response_table", |b| {
        b.iter(|| frequency_response(black_box(&fir), 2048));
    });

    group.finish();
}

criterion_group!(benches, bench_fft, bench_convolution);
criterion_main!(benches);
