//! Streaming demo: filters a tone pair block by block, swapping filters from
//! another thread and finally driving an unstable design into the ground.
//!
//! Run with: cargo run -p tarsos-filter-stream --example stream_demo
//! Set `RUST_LOG=debug` to watch the gain normalization.

use std::f64::consts::PI;
use std::thread;

use tarsos_filter_core::Complex;
use tarsos_filter_design::{Band, CustomIirEditorState, FilterFamily, design_filter};
use tarsos_filter_stream::{DriverConfig, StreamingDriver};
use tracing_subscriber::EnvFilter;

const BLOCK: usize = 512;

fn tone_pair(start: usize, len: usize) -> Vec<f64> {
    (start..start + len)
        .map(|i| {
            let t = i as f64;
            12_000.0 * (0.05 * PI * t).sin() + 12_000.0 * (0.7 * PI * t).sin()
        })
        .collect()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let plan = [
        FilterFamily::Butterworth {
            band: Band::LowPass { cutoff: 0.2 * PI },
            order: 6,
        },
        FilterFamily::Elliptic {
            band: Band::HighPass { cutoff: 0.5 * PI },
            order: 5,
            ripple_db: 0.5,
            attenuation_db: 60.0,
        },
        FilterFamily::Resonator {
            frequency: 0.05 * PI,
            radius: 0.995,
            zeros_at_ends: true,
        },
    ];

    let mut driver = StreamingDriver::new(DriverConfig::default());
    let mut position = 0;

    println!("{:>6} {:>12} {:>10} {:>12}", "block", "state", "gain", "peak");
    println!("{:->6} {:->12} {:->10} {:->12}", "", "", "", "");

    for family in plan {
        let remote = driver.handoff();
        let name = family.name();
        let sender = thread::spawn(move || match design_filter(&family) {
            Ok(designed) => remote.send(designed.into_filter()),
            Err(e) => eprintln!("{name}: design failed: {e}"),
        });
        if sender.join().is_err() {
            eprintln!("{name}: sender thread panicked");
            continue;
        }

        println!("--- {name} ---");
        for _ in 0..6 {
            let input = tone_pair(position, BLOCK);
            position += BLOCK;
            match driver.feed(&input) {
                Ok(out) => {
                    let peak = out.iter().fold(0.0f64, |m, y| m.max(y.abs()));
                    println!(
                        "{:>6} {:>12} {:>10.4} {:>12.1}",
                        position / BLOCK,
                        driver.state().name(),
                        driver.gain(),
                        peak
                    );
                }
                Err(e) => {
                    println!("{:>6} error: {e}", position / BLOCK);
                    break;
                }
            }
        }
    }

    println!("--- Unstable custom IIR ---");
    let mut editor = CustomIirEditorState::new();
    editor.add_pole(Complex::from_polar(1.02, 0.3));
    match design_filter(&FilterFamily::CustomIir(editor)) {
        Ok(designed) => driver.set_filter(designed.into_filter()),
        Err(e) => eprintln!("custom IIR: design failed: {e}"),
    }
    for _ in 0..20 {
        let input = tone_pair(position, BLOCK);
        position += BLOCK;
        if let Err(e) = driver.feed(&input) {
            println!("{:>6} error: {e}", position / BLOCK);
            break;
        }
    }
    println!("Final state: {}", driver.state().name());

    driver.stop();
    if let Err(e) = driver.feed(&[0.0; BLOCK]) {
        println!("After stop: {e}");
    }
}
