//! Response demo: frequency table, impulse/step settling and windowed spectra.
//!
//! Run with: cargo run -p tarsos-filter-analysis --example response_demo

use std::f64::consts::PI;

use tarsos_filter_analysis::{Fft, Window, fft, frequency_response, impulse_curve, step_curve};
use tarsos_filter_core::{Complex, PoleZeroModel, realize};

fn main() {
    println!("=== Resonator at 0.25π, r = 0.95 ===\n");

    let mut model = PoleZeroModel::new();
    model.push_pole_pair(Complex::from_polar(0.95, 0.25 * PI));
    model.push_zero(Complex::real(1.0));
    model.push_zero(Complex::real(-1.0));
    let filter = realize(&model);

    let table = match frequency_response(&filter, 512) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("response failed: {e}");
            return;
        }
    };

    println!("Raw peak gain: {:.3}", table.peak());
    println!("{:>10} {:>10} {:>10}", "ω/π", "dB", "delay");
    println!("{:->10} {:->10} {:->10}", "", "", "");
    let delay = table.group_delay();
    for i in (0..table.len()).step_by(32) {
        println!(
            "{:>10.3} {:>10.2} {:>10.2}",
            table.frequency(i) / PI,
            table.magnitude_db(i),
            delay[i]
        );
    }

    let impulse = impulse_curve(&filter, 1000);
    let step = step_curve(&filter, 1000);
    println!("\nImpulse settles after {} samples", impulse.settled_length());
    println!("Step settles after {} samples", step.settled_length());

    println!("\n=== Window sidelobes (64 taps, 1024-point FFT) ===\n");
    let fft = match Fft::new(1024) {
        Ok(fft) => fft,
        Err(e) => {
            eprintln!("fft failed: {e}");
            return;
        }
    };
    for window in [
        Window::Rectangular,
        Window::Hann,
        Window::Hamming,
        Window::Blackman,
        Window::Kaiser { beta: 8.0 },
    ] {
        let coeffs = window.coefficients(64);
        let db = fft::magnitude_db(&fft.forward_real(&coeffs));
        let dc = db[0];
        // Skip the main lobe, then take the loudest remaining bin
        let sidelobe = db[64..512].iter().copied().fold(f64::MIN, f64::max) - dc;
        println!("{:>12}: {:>7.1} dB", window.name(), sidelobe);
    }
}
