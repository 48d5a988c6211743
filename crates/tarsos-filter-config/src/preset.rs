//! Preset file format and conversion to filter designs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::path::Path;

use tarsos_filter_core::{Complex, DigitalFilter};
use tarsos_filter_design::{
    Band, CustomFirEditorState, CustomIirEditorState, FilterFamily, Window, design_filter,
};
use tarsos_filter_stream::DriverConfig;

use crate::driver_settings::DriverSettings;
use crate::error::ConfigError;
use crate::param_value::ParamValue;
use crate::validation::{FAMILY_IDS, ParamSpec, ValidationError, param_specs, validate_preset};

/// One filter design plus the settings to stream it with.
///
/// Frequencies are fractions of Nyquist (`1.0` is half the sample rate).
/// Custom IIR points are `[radius, angle]` pairs with the angle also a
/// fraction of π. Parameters left out take the defaults listed by
/// [`param_specs`].
///
/// # TOML Format
///
/// ```toml
/// name = "Telephone"
/// description = "300 Hz to 3.4 kHz at 44.1 kHz"
/// family = "elliptic"
/// band = "bandpass"
///
/// [params]
/// low = 0.0136
/// high = 0.154
/// order = 4
/// ripple_db = 0.5
/// attenuation_db = 50.0
///
/// [driver]
/// block_size = 1024
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterPreset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Family identifier, e.g. `"butterworth"`.
    pub family: String,

    /// Band for the analog-prototype and windowed-sinc families.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub band: Option<String>,

    /// Family parameters.
    #[serde(default)]
    pub params: BTreeMap<String, ParamValue>,

    /// Streaming settings.
    #[serde(default)]
    pub driver: DriverSettings,
}

impl FilterPreset {
    /// Create a preset for `family` with every parameter at its default.
    pub fn new(name: impl Into<String>, family: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            family: family.into(),
            band: None,
            params: BTreeMap::new(),
            driver: DriverSettings::default(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the band.
    pub fn with_band(mut self, band: impl Into<String>) -> Self {
        self.band = Some(band.into());
        self
    }

    /// Set one parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Set the streaming settings.
    pub fn with_driver(mut self, driver: DriverSettings) -> Self {
        self.driver = driver;
        self
    }

    /// Get a parameter as written in the preset.
    pub fn get_param(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validates the preset and builds the design parameters it describes.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownFamily`] for an unrecognized family,
    /// [`ConfigError::Validation`] when any parameter is malformed or out of
    /// range, and [`ConfigError::InvalidParameter`] for a curve the custom
    /// FIR editor refuses.
    pub fn to_family(&self) -> Result<FilterFamily, ConfigError> {
        if !FAMILY_IDS.contains(&self.family.as_str()) {
            return Err(ConfigError::UnknownFamily(self.family.clone()));
        }
        validate_preset(self)?;

        let p = Params {
            preset: self,
            specs: param_specs(&self.family, self.band.as_deref())?,
        };

        let family = match self.family.as_str() {
            "butterworth" => FilterFamily::Butterworth {
                band: p.band()?,
                order: p.count("order")?,
            },
            "chebyshev" => FilterFamily::ChebyshevI {
                band: p.band()?,
                order: p.count("order")?,
                ripple_db: p.number("ripple_db")?,
            },
            "inverse_chebyshev" => FilterFamily::InverseChebyshev {
                band: p.band()?,
                order: p.count("order")?,
                attenuation_db: p.number("attenuation_db")?,
            },
            "elliptic" => FilterFamily::Elliptic {
                band: p.band()?,
                order: p.count("order")?,
                ripple_db: p.number("ripple_db")?,
                attenuation_db: p.number("attenuation_db")?,
            },
            "windowed_sinc" => FilterFamily::WindowedSinc {
                band: p.band()?,
                taps: p.count("taps")?,
                window: p.window()?,
            },
            "comb" => FilterFamily::Comb {
                delay: p.count("delay")?,
                gain: p.number("gain")?,
                negative: p.flag("negative")?,
            },
            "inverse_comb" => FilterFamily::InverseComb {
                delay: p.count("delay")?,
                gain: p.number("gain")?,
                negative: p.flag("negative")?,
            },
            "notch" => FilterFamily::Notch {
                frequency: p.frequency("frequency")?,
                bandwidth: p.frequency("bandwidth")?,
            },
            "allpass" => FilterFamily::Allpass {
                frequency: p.frequency("frequency")?,
                radius: p.number("radius")?,
            },
            "resonator" => FilterFamily::Resonator {
                frequency: p.frequency("frequency")?,
                radius: p.number("radius")?,
                zeros_at_ends: p.flag("zeros_at_ends")?,
            },
            "moving_average" => FilterFamily::MovingAverage {
                length: p.count("length")?,
            },
            "triangle" => FilterFamily::Triangle {
                length: p.count("length")?,
            },
            "gaussian" => FilterFamily::Gaussian {
                length: p.count("length")?,
                sigma: p.number("sigma")?,
            },
            "random" => FilterFamily::Random {
                taps: p.count("taps")?,
                seed: u32::try_from(p.integer("seed")?)
                    .map_err(|e| p.invalid("seed", e.to_string()))?,
            },
            "plucked_string" => FilterFamily::PluckedString {
                delay: p.count("delay")?,
                gain: p.number("gain")?,
            },
            "custom_fir" => {
                let taps = p.count("taps")?;
                let window = p.window()?;
                let editor = match self.get_param("magnitudes").and_then(ParamValue::as_list) {
                    Some(curve) => CustomFirEditorState::from_curve(curve.to_vec(), taps, window),
                    None => CustomFirEditorState::new(
                        tarsos_filter_design::custom::DEFAULT_CURVE_POINTS,
                        taps,
                        window,
                    ),
                }
                .map_err(|e| p.invalid("magnitudes", e.to_string()))?;
                FilterFamily::CustomFir(editor)
            }
            "custom_iir" => {
                let mut editor = CustomIirEditorState::new();
                for &[radius, angle] in p.points("poles") {
                    editor.add_pole(Complex::from_polar(radius, angle * PI));
                }
                for &[radius, angle] in p.points("zeros") {
                    editor.add_zero(Complex::from_polar(radius, angle * PI));
                }
                FilterFamily::CustomIir(editor)
            }
            other => return Err(ConfigError::UnknownFamily(other.to_string())),
        };
        Ok(family)
    }

    /// Captures a design as a preset with every parameter written out.
    ///
    /// Values are stored as given; out-of-range ones are reported when the
    /// preset is converted back.
    pub fn from_family(name: impl Into<String>, family: &FilterFamily) -> Self {
        let mut preset = Self::new(name, family.id());

        if let Some(band) = family.band() {
            preset.band = Some(band.id().to_string());
            match band {
                Band::LowPass { cutoff } | Band::HighPass { cutoff } => {
                    preset.params.insert("cutoff".into(), (cutoff / PI).into());
                }
                Band::BandPass { low, high } | Band::BandStop { low, high } => {
                    preset.params.insert("low".into(), (low / PI).into());
                    preset.params.insert("high".into(), (high / PI).into());
                }
            }
        }

        let mut set = |name: &str, value: ParamValue| {
            preset.params.insert(name.to_string(), value);
        };
        match family {
            FilterFamily::Butterworth { order, .. } => set("order", (*order).into()),
            FilterFamily::ChebyshevI {
                order, ripple_db, ..
            } => {
                set("order", (*order).into());
                set("ripple_db", (*ripple_db).into());
            }
            FilterFamily::InverseChebyshev {
                order,
                attenuation_db,
                ..
            } => {
                set("order", (*order).into());
                set("attenuation_db", (*attenuation_db).into());
            }
            FilterFamily::Elliptic {
                order,
                ripple_db,
                attenuation_db,
                ..
            } => {
                set("order", (*order).into());
                set("ripple_db", (*ripple_db).into());
                set("attenuation_db", (*attenuation_db).into());
            }
            FilterFamily::WindowedSinc { taps, window, .. } => {
                set("taps", (*taps).into());
                window_params(*window, &mut set);
            }
            FilterFamily::Comb {
                delay,
                gain,
                negative,
            }
            | FilterFamily::InverseComb {
                delay,
                gain,
                negative,
            } => {
                set("delay", (*delay).into());
                set("gain", (*gain).into());
                set("negative", (*negative).into());
            }
            FilterFamily::Notch {
                frequency,
                bandwidth,
            } => {
                set("frequency", (frequency / PI).into());
                set("bandwidth", (bandwidth / PI).into());
            }
            FilterFamily::Allpass { frequency, radius } => {
                set("frequency", (frequency / PI).into());
                set("radius", (*radius).into());
            }
            FilterFamily::Resonator {
                frequency,
                radius,
                zeros_at_ends,
            } => {
                set("frequency", (frequency / PI).into());
                set("radius", (*radius).into());
                set("zeros_at_ends", (*zeros_at_ends).into());
            }
            FilterFamily::MovingAverage { length } | FilterFamily::Triangle { length } => {
                set("length", (*length).into());
            }
            FilterFamily::Gaussian { length, sigma } => {
                set("length", (*length).into());
                set("sigma", (*sigma).into());
            }
            FilterFamily::Random { taps, seed } => {
                set("taps", (*taps).into());
                set("seed", (*seed).into());
            }
            FilterFamily::PluckedString { delay, gain } => {
                set("delay", (*delay).into());
                set("gain", (*gain).into());
            }
            FilterFamily::CustomFir(editor) => {
                set("magnitudes", editor.magnitudes().to_vec().into());
                set("taps", editor.taps().into());
                window_params(editor.window(), &mut set);
            }
            FilterFamily::CustomIir(editor) => {
                set("poles", polar_points(editor.poles()).into());
                set("zeros", polar_points(editor.zeros()).into());
            }
        }
        preset
    }

    /// Designs and realizes the preset's filter.
    pub fn design(&self) -> Result<DigitalFilter, ConfigError> {
        let family = self.to_family()?;
        Ok(design_filter(&family)?.into_filter())
    }

    /// Streaming driver configuration.
    pub fn driver_config(&self) -> DriverConfig {
        self.driver.into()
    }
}

fn window_params(window: Window, set: &mut impl FnMut(&str, ParamValue)) {
    set("window", window.name().into());
    if let Window::Kaiser { beta } = window {
        set("kaiser_beta", beta.into());
    }
}

fn polar_points(points: &[Complex]) -> Vec<[f64; 2]> {
    points.iter().map(|c| [c.magnitude(), c.phase() / PI]).collect()
}

/// Validated parameter lookup with defaults filled in.
struct Params<'a> {
    preset: &'a FilterPreset,
    specs: Vec<ParamSpec>,
}

impl Params<'_> {
    fn invalid(&self, param: &str, reason: impl Into<String>) -> ConfigError {
        ConfigError::InvalidParameter {
            family: self.preset.family.clone(),
            param: param.to_string(),
            reason: reason.into(),
        }
    }

    fn value(&self, name: &str) -> Result<ParamValue, ConfigError> {
        if let Some(value) = self.preset.params.get(name) {
            return Ok(value.clone());
        }
        self.specs
            .iter()
            .find(|s| s.name == name)
            .and_then(ParamSpec::default_value)
            .ok_or_else(|| self.invalid(name, "missing"))
    }

    fn number(&self, name: &str) -> Result<f64, ConfigError> {
        self.value(name)?
            .as_f64()
            .ok_or_else(|| self.invalid(name, "expected a number"))
    }

    /// Fraction of Nyquist to radians.
    fn frequency(&self, name: &str) -> Result<f64, ConfigError> {
        Ok(self.number(name)? * PI)
    }

    fn integer(&self, name: &str) -> Result<i64, ConfigError> {
        self.value(name)?
            .as_i64()
            .ok_or_else(|| self.invalid(name, "expected an integer"))
    }

    fn count(&self, name: &str) -> Result<usize, ConfigError> {
        let i = self.integer(name)?;
        usize::try_from(i).map_err(|_| self.invalid(name, format!("{i} is negative")))
    }

    fn flag(&self, name: &str) -> Result<bool, ConfigError> {
        self.value(name)?
            .as_bool()
            .ok_or_else(|| self.invalid(name, "expected true or false"))
    }

    fn points(&self, name: &str) -> &[[f64; 2]] {
        self.preset
            .params
            .get(name)
            .and_then(ParamValue::as_points)
            .unwrap_or(&[])
    }

    fn window(&self) -> Result<Window, ConfigError> {
        let name = self.value("window")?;
        Ok(match name.as_str().unwrap_or_default() {
            "rectangular" => Window::Rectangular,
            "hamming" => Window::Hamming,
            "hann" => Window::Hann,
            "blackman" => Window::Blackman,
            "kaiser" => Window::Kaiser {
                beta: self.number("kaiser_beta")?,
            },
            "bartlett" => Window::Bartlett,
            "welch" => Window::Welch,
            other => return Err(self.invalid("window", format!("unknown window '{other}'"))),
        })
    }

    fn band(&self) -> Result<Band, ConfigError> {
        Ok(match self.preset.band.as_deref().unwrap_or("lowpass") {
            "lowpass" => Band::LowPass {
                cutoff: self.frequency("cutoff")?,
            },
            "highpass" => Band::HighPass {
                cutoff: self.frequency("cutoff")?,
            },
            "bandpass" => Band::BandPass {
                low: self.frequency("low")?,
                high: self.frequency("high")?,
            },
            "bandstop" => Band::BandStop {
                low: self.frequency("low")?,
                high: self.frequency("high")?,
            },
            other => return Err(ValidationError::UnknownBand(other.to_string()).into()),
        })
    }
}
