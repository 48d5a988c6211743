//! Filter presets for tarsos-filter.
//!
//! A preset names one filter family, its parameters and the settings the
//! streaming driver should use, stored as TOML.
//!
//! # Features
//!
//! - **Presets**: Load and save [`FilterPreset`]s, convert them to and from
//!   [`FilterFamily`](tarsos_filter_design::FilterFamily) values
//! - **Validation**: Per-family parameter tables with ranges and defaults
//! - **Factory Presets**: One built-in preset per family
//!
//! # Example
//!
//! ```rust
//! use tarsos_filter_config::{FilterPreset, get_factory_preset};
//! use tarsos_filter_stream::StreamingDriver;
//!
//! let preset = get_factory_preset("gentle_lowpass").unwrap();
//! let mut driver = StreamingDriver::new(preset.driver_config());
//! driver.set_filter(preset.design().unwrap());
//!
//! let out = driver.feed(&[1000.0; 64]).unwrap();
//! assert_eq!(out.len(), 64);
//!
//! let custom = FilterPreset::new("Mine", "notch")
//!     .with_param("frequency", 0.1)
//!     .with_param("bandwidth", 0.01);
//! assert!(custom.to_toml().unwrap().contains("family = \"notch\""));
//! ```

mod driver_settings;
mod error;
mod param_value;
mod preset;

/// Parameter tables and preset validation.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use driver_settings::{DriverSettings, GainSettings};
pub use error::ConfigError;
pub use factory_presets::{
    FACTORY_PRESET_NAMES, factory_preset_names, factory_presets, get_factory_preset,
    is_factory_preset,
};
pub use param_value::ParamValue;
pub use preset::FilterPreset;
pub use validation::{
    ParamKind, ParamSpec, ValidationError, ValidationResult, param_specs, validate_preset,
};
