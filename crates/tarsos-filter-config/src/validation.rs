//! Preset validation against per-family parameter tables.
//!
//! Every family has a fixed parameter list ([`param_specs`]). Parameters a
//! preset leaves out take their defaults; parameters it names must exist for
//! that family and hold a value of the right shape inside the allowed range.
//! Frequencies are fractions of Nyquist in `[0, 1]`.
//!
//! # Example
//!
//! ```rust
//! use tarsos_filter_config::{FilterPreset, validate_preset};
//!
//! let preset = FilterPreset::new("Low", "butterworth")
//!     .with_band("lowpass")
//!     .with_param("cutoff", 0.3)
//!     .with_param("order", 4i64);
//! assert!(validate_preset(&preset).is_ok());
//!
//! let broken = preset.clone().with_param("order", 400i64);
//! assert!(validate_preset(&broken).is_err());
//! ```

use thiserror::Error;

use tarsos_filter_design::{MAX_EDIT_RADIUS, MAX_KAISER_BETA, MAX_ORDER, MAX_TAPS};

use crate::driver_settings::DriverSettings;
use crate::param_value::ParamValue;
use crate::preset::FilterPreset;

/// Every family identifier a preset may name.
pub const FAMILY_IDS: &[&str] = &[
    "butterworth",
    "chebyshev",
    "inverse_chebyshev",
    "elliptic",
    "windowed_sinc",
    "comb",
    "inverse_comb",
    "notch",
    "allpass",
    "resonator",
    "moving_average",
    "triangle",
    "gaussian",
    "random",
    "plucked_string",
    "custom_fir",
    "custom_iir",
];

/// Band names accepted by the analog-prototype and windowed-sinc families.
pub const BAND_IDS: &[&str] = &["lowpass", "highpass", "bandpass", "bandstop"];

/// Window names accepted by the FIR families.
pub const WINDOW_NAMES: &[&str] = &[
    "rectangular",
    "hamming",
    "hann",
    "blackman",
    "kaiser",
    "bartlett",
    "welch",
];

/// Largest block size a preset may request.
pub const MAX_BLOCK_SIZE: usize = 1 << 20;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Unknown family identifier.
    #[error("unknown filter family: {0}")]
    UnknownFamily(String),

    /// Unknown band name.
    #[error("unknown band '{0}' (expected lowpass, highpass, bandpass or bandstop)")]
    UnknownBand(String),

    /// A band was given to a family that has none.
    #[error("family '{0}' does not take a band")]
    UnexpectedBand(String),

    /// Unknown parameter name.
    #[error("unknown parameter '{param}' for family '{family}'")]
    UnknownParameter {
        /// Family identifier.
        family: String,
        /// Name of the unrecognized parameter.
        param: String,
    },

    /// Parameter value out of range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the parameter.
        param: String,
        /// The value that was out of range.
        value: f64,
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
    },

    /// Invalid parameter format.
    #[error("invalid format for parameter '{param}': {reason}")]
    InvalidFormat {
        /// Name of the parameter.
        param: String,
        /// Description of the format error.
        reason: String,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Shape, range and default of one parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamKind {
    /// Real number in `[min, max]`
    Number {
        /// Minimum value
        min: f64,
        /// Maximum value
        max: f64,
        /// Value used when the preset omits the parameter
        default: f64,
    },
    /// Whole number in `[min, max]`
    Integer {
        /// Minimum value
        min: i64,
        /// Maximum value
        max: i64,
        /// Value used when the preset omits the parameter
        default: i64,
    },
    /// Boolean switch
    Flag {
        /// Value used when the preset omits the parameter
        default: bool,
    },
    /// One of a fixed set of names
    Choice {
        /// Accepted names
        options: &'static [&'static str],
        /// Value used when the preset omits the parameter
        default: &'static str,
    },
    /// Non-negative magnitudes, a power-of-two count of at least 2
    Curve,
    /// `[radius, angle]` pairs, radius in `[0, 1.1)`, angle as a fraction of π in `[-1, 1]`
    Points,
}

/// Metadata for one preset parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    /// Key in the `[params]` table
    pub name: &'static str,
    /// One-line description
    pub description: &'static str,
    /// Shape, range and default
    pub kind: ParamKind,
}

impl ParamSpec {
    /// Real-valued parameter.
    pub const fn number(
        name: &'static str,
        description: &'static str,
        min: f64,
        max: f64,
        default: f64,
    ) -> Self {
        Self {
            name,
            description,
            kind: ParamKind::Number { min, max, default },
        }
    }

    /// Integer parameter.
    pub const fn integer(
        name: &'static str,
        description: &'static str,
        min: i64,
        max: i64,
        default: i64,
    ) -> Self {
        Self {
            name,
            description,
            kind: ParamKind::Integer { min, max, default },
        }
    }

    /// Boolean parameter.
    pub const fn flag(name: &'static str, description: &'static str, default: bool) -> Self {
        Self {
            name,
            description,
            kind: ParamKind::Flag { default },
        }
    }

    /// Named-choice parameter.
    pub const fn choice(
        name: &'static str,
        description: &'static str,
        options: &'static [&'static str],
        default: &'static str,
    ) -> Self {
        Self {
            name,
            description,
            kind: ParamKind::Choice { options, default },
        }
    }

    /// Frequency as a fraction of Nyquist.
    pub const fn frequency(name: &'static str, description: &'static str, default: f64) -> Self {
        Self::number(name, description, 0.0, 1.0, default)
    }

    /// Default value in preset form, if the kind has one.
    pub fn default_value(&self) -> Option<ParamValue> {
        match &self.kind {
            ParamKind::Number { default, .. } => Some(ParamValue::Number(*default)),
            ParamKind::Integer { default, .. } => Some(ParamValue::Integer(*default)),
            ParamKind::Flag { default } => Some(ParamValue::Flag(*default)),
            ParamKind::Choice { default, .. } => Some(ParamValue::from(*default)),
            ParamKind::Curve | ParamKind::Points => None,
        }
    }

    /// Checks shape and range of `value`.
    pub fn check(&self, value: &ParamValue) -> ValidationResult<()> {
        let name = self.name;
        let malformed = |reason: String| ValidationError::InvalidFormat {
            param: name.to_string(),
            reason,
        };
        let range = |value: f64, min: f64, max: f64| {
            if value.is_finite() && value >= min && value <= max {
                Ok(())
            } else {
                Err(ValidationError::OutOfRange {
                    param: name.to_string(),
                    value,
                    min,
                    max,
                })
            }
        };

        match &self.kind {
            ParamKind::Number { min, max, .. } => {
                let x = value
                    .as_f64()
                    .ok_or_else(|| malformed(format!("expected a number, got a {}", value.kind_name())))?;
                range(x, *min, *max)
            }
            ParamKind::Integer { min, max, .. } => {
                let i = value.as_i64().ok_or_else(|| {
                    malformed(format!("expected an integer, got a {}", value.kind_name()))
                })?;
                range(i as f64, *min as f64, *max as f64)
            }
            ParamKind::Flag { .. } => value
                .as_bool()
                .map(|_| ())
                .ok_or_else(|| malformed(format!("expected true or false, got a {}", value.kind_name()))),
            ParamKind::Choice { options, .. } => {
                let s = value
                    .as_str()
                    .ok_or_else(|| malformed(format!("expected a name, got a {}", value.kind_name())))?;
                if options.contains(&s) {
                    Ok(())
                } else {
                    Err(malformed(format!("'{s}' is not one of {}", options.join(", "))))
                }
            }
            ParamKind::Curve => {
                let curve = value
                    .as_list()
                    .ok_or_else(|| malformed(format!("expected a list, got a {}", value.kind_name())))?;
                if curve.len() < 2 || !curve.len().is_power_of_two() {
                    return Err(malformed(format!(
                        "curve length must be a power of two ≥ 2, got {}",
                        curve.len()
                    )));
                }
                curve.iter().try_for_each(|&m| range(m, 0.0, f64::MAX))
            }
            ParamKind::Points => {
                let points = value.as_points().ok_or_else(|| {
                    malformed(format!("expected [radius, angle] pairs, got a {}", value.kind_name()))
                })?;
                for &[radius, angle] in points {
                    if !(0.0..MAX_EDIT_RADIUS).contains(&radius) {
                        return Err(ValidationError::OutOfRange {
                            param: name.to_string(),
                            value: radius,
                            min: 0.0,
                            max: MAX_EDIT_RADIUS,
                        });
                    }
                    range(angle, -1.0, 1.0)?;
                }
                Ok(())
            }
        }
    }
}

const ORDER: ParamSpec = ParamSpec::integer("order", "Prototype order", 1, MAX_ORDER as i64, 4);
const RIPPLE: ParamSpec = ParamSpec::number("ripple_db", "Passband ripple (dB)", 0.001, 40.0, 1.0);
const ATTENUATION: ParamSpec =
    ParamSpec::number("attenuation_db", "Stopband attenuation (dB)", 1.0, 200.0, 40.0);
const WINDOW: ParamSpec = ParamSpec::choice("window", "Window function", WINDOW_NAMES, "hamming");
const KAISER_BETA: ParamSpec =
    ParamSpec::number("kaiser_beta", "Kaiser window shape", 0.0, MAX_KAISER_BETA, 8.0);
const DELAY: ParamSpec = ParamSpec::integer("delay", "Delay (samples)", 1, MAX_TAPS as i64, 32);
const RADIUS: ParamSpec = ParamSpec::number("radius", "Pole radius", 0.0, 0.9999, 0.9);
const FREQUENCY: ParamSpec = ParamSpec::frequency("frequency", "Centre frequency", 0.25);

fn taps(default: i64) -> ParamSpec {
    ParamSpec::integer("taps", "Kernel length", 1, MAX_TAPS as i64, default)
}

fn length(default: i64) -> ParamSpec {
    ParamSpec::integer("length", "Kernel length", 1, MAX_TAPS as i64, default)
}

fn band_specs(band: &str) -> ValidationResult<Vec<ParamSpec>> {
    match band {
        "lowpass" | "highpass" => Ok(vec![ParamSpec::frequency("cutoff", "Cutoff", 0.25)]),
        "bandpass" | "bandstop" => Ok(vec![
            ParamSpec::frequency("low", "Lower band edge", 0.2),
            ParamSpec::frequency("high", "Upper band edge", 0.4),
        ]),
        other => Err(ValidationError::UnknownBand(other.to_string())),
    }
}

/// Whether `family` uses a band.
pub fn takes_band(family: &str) -> bool {
    matches!(
        family,
        "butterworth" | "chebyshev" | "inverse_chebyshev" | "elliptic" | "windowed_sinc"
    )
}

/// Parameters `family` accepts with `band` (`None` means low-pass for band
/// families).
pub fn param_specs(family: &str, band: Option<&str>) -> ValidationResult<Vec<ParamSpec>> {
    if !FAMILY_IDS.contains(&family) {
        return Err(ValidationError::UnknownFamily(family.to_string()));
    }

    let mut specs = if takes_band(family) {
        band_specs(band.unwrap_or("lowpass"))?
    } else if band.is_some() {
        return Err(ValidationError::UnexpectedBand(family.to_string()));
    } else {
        Vec::new()
    };

    match family {
        "butterworth" => specs.push(ORDER),
        "chebyshev" => specs.extend([ORDER, RIPPLE]),
        "inverse_chebyshev" => specs.extend([ORDER, ATTENUATION]),
        "elliptic" => specs.extend([ORDER, RIPPLE, ATTENUATION]),
        "windowed_sinc" => specs.extend([taps(63), WINDOW, KAISER_BETA]),
        "comb" => specs.extend([
            DELAY,
            ParamSpec::number("gain", "Feedback gain", 0.0, 0.9999, 0.9),
            ParamSpec::flag("negative", "Negative feedback", false),
        ]),
        "inverse_comb" => specs.extend([
            DELAY,
            ParamSpec::number("gain", "Delayed copy gain", 0.0, 1.0, 1.0),
            ParamSpec::flag("negative", "Subtract the delayed copy", false),
        ]),
        "notch" => specs.extend([
            FREQUENCY,
            ParamSpec::frequency("bandwidth", "Notch width", 0.02),
        ]),
        "allpass" => specs.extend([FREQUENCY, RADIUS]),
        "resonator" => specs.extend([
            FREQUENCY,
            ParamSpec::number("radius", "Pole radius", 0.0, 0.9999, 0.98),
            ParamSpec::flag("zeros_at_ends", "Zeros at DC and Nyquist", true),
        ]),
        "moving_average" => specs.push(length(5)),
        "triangle" => specs.push(length(9)),
        "gaussian" => specs.extend([
            length(31),
            ParamSpec::number("sigma", "Standard deviation (samples)", 0.01, 4096.0, 5.0),
        ]),
        "random" => specs.extend([
            taps(32),
            ParamSpec::integer("seed", "Generator seed", 0, i64::from(u32::MAX), 1),
        ]),
        "plucked_string" => specs.extend([
            ParamSpec::integer("delay", "Loop delay (samples)", 1, MAX_TAPS as i64, 100),
            ParamSpec::number("gain", "Loop gain", 0.0, 0.9999, 0.99),
        ]),
        "custom_fir" => specs.extend([
            ParamSpec {
                name: "magnitudes",
                description: "Drawn magnitude curve over [0, π]",
                kind: ParamKind::Curve,
            },
            taps(255),
            WINDOW,
            KAISER_BETA,
        ]),
        "custom_iir" => specs.extend([
            ParamSpec {
                name: "poles",
                description: "Upper half-plane poles",
                kind: ParamKind::Points,
            },
            ParamSpec {
                name: "zeros",
                description: "Upper half-plane zeros",
                kind: ParamKind::Points,
            },
        ]),
        _ => {}
    }
    Ok(specs)
}

/// Validates family, band, every parameter and the driver section.
///
/// All problems are collected; more than one is reported as
/// [`ValidationError::Multiple`].
pub fn validate_preset(preset: &FilterPreset) -> ValidationResult<()> {
    let specs = param_specs(&preset.family, preset.band.as_deref())?;

    let mut errors = Vec::new();
    for (name, value) in &preset.params {
        match specs.iter().find(|s| s.name == name) {
            Some(spec) => {
                if let Err(e) = spec.check(value) {
                    errors.push(e);
                }
            }
            None => errors.push(ValidationError::UnknownParameter {
                family: preset.family.clone(),
                param: name.clone(),
            }),
        }
    }
    validate_driver(&preset.driver, &mut errors);

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

fn validate_driver(driver: &DriverSettings, errors: &mut Vec<ValidationError>) {
    let out_of_range = |param: &str, value: f64, min: f64, max: f64| ValidationError::OutOfRange {
        param: param.to_string(),
        value,
        min,
        max,
    };

    if driver.block_size == 0 || driver.block_size > MAX_BLOCK_SIZE {
        errors.push(out_of_range(
            "driver.block_size",
            driver.block_size as f64,
            1.0,
            MAX_BLOCK_SIZE as f64,
        ));
    }

    let gain = &driver.gain;
    if !(gain.full_scale.is_finite() && gain.full_scale > 0.0) {
        errors.push(out_of_range("driver.gain.full_scale", gain.full_scale, f64::MIN_POSITIVE, f64::MAX));
        return;
    }
    if !(gain.target.is_finite() && gain.target > 0.0 && gain.target <= gain.full_scale) {
        errors.push(out_of_range("driver.gain.target", gain.target, 0.0, gain.full_scale));
    }
    if !(gain.rise_threshold.is_finite()
        && gain.rise_threshold >= 0.0
        && gain.rise_threshold <= gain.full_scale)
    {
        errors.push(out_of_range(
            "driver.gain.rise_threshold",
            gain.rise_threshold,
            0.0,
            gain.full_scale,
        ));
    }
    if !(gain.max_gain.is_finite() && gain.max_gain > 0.0) {
        errors.push(out_of_range("driver.gain.max_gain", gain.max_gain, f64::MIN_POSITIVE, f64::MAX));
    }
}
