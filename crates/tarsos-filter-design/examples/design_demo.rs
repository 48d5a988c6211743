//! Design demo: builds a handful of families and prints their summaries and responses.
//!
//! Run with: cargo run -p tarsos-filter-design --example design_demo
//! Set `RUST_LOG=debug` to see the design trace.

use std::f64::consts::PI;

use tarsos_filter_analysis::{frequency_response, impulse_curve};
use tarsos_filter_core::Filter;
use tarsos_filter_design::{Band, FilterFamily, Window, design_filter};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let families = [
        FilterFamily::Butterworth {
            band: Band::LowPass { cutoff: 0.3 * PI },
            order: 4,
        },
        FilterFamily::Elliptic {
            band: Band::BandPass {
                low: 0.3 * PI,
                high: 0.5 * PI,
            },
            order: 4,
            ripple_db: 1.0,
            attenuation_db: 50.0,
        },
        FilterFamily::WindowedSinc {
            band: Band::HighPass { cutoff: 0.6 * PI },
            taps: 101,
            window: Window::Blackman,
        },
        FilterFamily::Notch {
            frequency: 0.25 * PI,
            bandwidth: 0.05,
        },
    ];

    for family in &families {
        println!("=== {} ===", family.name());
        for line in family.info() {
            println!("  {line}");
        }

        let filter = match design_filter(family) {
            Ok(designed) => designed.into_filter(),
            Err(e) => {
                eprintln!("design failed: {e}");
                continue;
            }
        };
        let table = match frequency_response(&filter, 1024) {
            Ok(table) => table,
            Err(e) => {
                eprintln!("response failed: {e}");
                continue;
            }
        };

        println!("  Kind: {}, length {}", filter.kind(), filter.length());
        if let Some(cutoff) = table.cutoff_frequency() {
            println!("  -3 dB point: {:.4} × Nyquist", cutoff / PI);
        }
        println!("  {:>8} {:>10}", "ω/π", "dB");
        for i in (0..table.len()).step_by(128) {
            println!("  {:>8.3} {:>10.2}", table.frequency(i) / PI, table.magnitude_db(i));
        }

        let impulse = impulse_curve(&filter, 1000);
        println!("  Settles after {} samples\n", impulse.settled_length());
    }
}
