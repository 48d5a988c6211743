//! Lists the factory presets, designs each one and writes a custom preset.
//!
//! Run with: cargo run -p tarsos-filter-config --example preset_demo

use std::f64::consts::PI;

use tarsos_filter_config::{FilterPreset, factory_presets, param_specs};
use tarsos_filter_design::{Band, FilterFamily};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("{:<20} {:<18} {:>8}", "Preset", "Family", "Length");
    for preset in factory_presets() {
        let filter = preset.design()?;
        println!(
            "{:<20} {:<18} {:>8}",
            preset.name,
            preset.family,
            tarsos_filter_core::Filter::length(&filter)
        );
    }

    println!();
    println!("Elliptic band-pass parameters:");
    for spec in param_specs("elliptic", Some("bandpass"))? {
        println!("  {:<16} {}", spec.name, spec.description);
    }

    let family = FilterFamily::InverseChebyshev {
        band: Band::HighPass { cutoff: 0.05 * PI },
        order: 5,
        attenuation_db: 70.0,
    };
    let preset = FilterPreset::from_family("Rumble Cut", &family)
        .with_description("Removes everything below about 1 kHz");

    let dir = std::env::temp_dir().join("tarsos-filter-presets");
    let path = dir.join("rumble_cut.toml");
    preset.save(&path)?;
    println!();
    println!("Saved {}:", path.display());
    print!("{}", preset.to_toml()?);

    let reloaded = FilterPreset::load(&path)?;
    println!("Reloaded family: {}", reloaded.to_family()?.name());
    Ok(())
}
