//! Factory presets bundled with the library.
//!
//! One preset per filter family, embedded at compile time. Frequencies
//! assume a 44.1 kHz stream where the description names a pitch or band.

use crate::FilterPreset;

/// Array of factory preset names for external access.
pub static FACTORY_PRESET_NAMES: &[&str] = &[
    "gentle_lowpass",
    "ripple_highpass",
    "quiet_stopband",
    "telephone",
    "sinc_bandstop",
    "flanger_comb",
    "hollow",
    "hum_notch",
    "phase_twist",
    "ring",
    "box_smoother",
    "triangle_smoother",
    "gaussian_blur",
    "noise_taps",
    "string_a4",
    "drawn_lowpass",
    "hand_placed",
];

static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("gentle_lowpass", GENTLE_LOWPASS),
    ("ripple_highpass", RIPPLE_HIGHPASS),
    ("quiet_stopband", QUIET_STOPBAND),
    ("telephone", TELEPHONE),
    ("sinc_bandstop", SINC_BANDSTOP),
    ("flanger_comb", FLANGER_COMB),
    ("hollow", HOLLOW),
    ("hum_notch", HUM_NOTCH),
    ("phase_twist", PHASE_TWIST),
    ("ring", RING),
    ("box_smoother", BOX_SMOOTHER),
    ("triangle_smoother", TRIANGLE_SMOOTHER),
    ("gaussian_blur", GAUSSIAN_BLUR),
    ("noise_taps", NOISE_TAPS),
    ("string_a4", STRING_A4),
    ("drawn_lowpass", DRAWN_LOWPASS),
    ("hand_placed", HAND_PLACED),
];

const GENTLE_LOWPASS: &str = r#"
name = "Gentle Lowpass"
description = "Fourth-order Butterworth, flat passband up to a quarter of Nyquist"
family = "butterworth"
band = "lowpass"

[params]
cutoff = 0.25
order = 4
"#;

const RIPPLE_HIGHPASS: &str = r#"
name = "Ripple Highpass"
description = "Sixth-order Chebyshev high-pass with half a decibel of ripple"
family = "chebyshev"
band = "highpass"

[params]
cutoff = 0.1
order = 6
ripple_db = 0.5
"#;

const QUIET_STOPBAND: &str = r#"
name = "Quiet Stopband"
description = "Inverse Chebyshev low-pass holding 60 dB down past the edge"
family = "inverse_chebyshev"
band = "lowpass"

[params]
cutoff = 0.4
order = 8
attenuation_db = 60.0
"#;

const TELEPHONE: &str = r#"
name = "Telephone"
description = "Elliptic band-pass from 300 Hz to 3.4 kHz"
family = "elliptic"
band = "bandpass"

[params]
low = 0.0136
high = 0.154
order = 4
ripple_db = 0.5
attenuation_db = 50.0

[driver]
block_size = 1024
"#;

const SINC_BANDSTOP: &str = r#"
name = "Sinc Bandstop"
description = "Linear-phase band-stop, Blackman windowed"
family = "windowed_sinc"
band = "bandstop"

[params]
low = 0.3
high = 0.5
taps = 255
window = "blackman"
"#;

const FLANGER_COMB: &str = r#"
name = "Flanger Comb"
description = "Recursive comb with peaks every 1.4 kHz"
family = "comb"

[params]
delay = 32
gain = 0.85
negative = false
"#;

const HOLLOW: &str = r#"
name = "Hollow"
description = "Feedforward comb cancelling odd harmonics of 1 kHz"
family = "inverse_comb"

[params]
delay = 22
gain = 1.0
negative = true
"#;

const HUM_NOTCH: &str = r#"
name = "Hum Notch"
description = "Narrow notch at 60 Hz mains hum"
family = "notch"

[params]
frequency = 0.00272
bandwidth = 0.002
"#;

const PHASE_TWIST: &str = r#"
name = "Phase Twist"
description = "Second-order allpass turning the phase around 2 kHz"
family = "allpass"

[params]
frequency = 0.0907
radius = 0.95
"#;

const RING: &str = r#"
name = "Ring"
description = "Sharp resonance at 880 Hz"
family = "resonator"

[params]
frequency = 0.0399
radius = 0.995
zeros_at_ends = true
"#;

const BOX_SMOOTHER: &str = r#"
name = "Box Smoother"
description = "Five-point moving average"
family = "moving_average"

[params]
length = 5
"#;

const TRIANGLE_SMOOTHER: &str = r#"
name = "Triangle Smoother"
description = "Nine-point triangular average"
family = "triangle"

[params]
length = 9
"#;

const GAUSSIAN_BLUR: &str = r#"
name = "Gaussian Blur"
description = "Gaussian kernel, sigma of five samples"
family = "gaussian"

[params]
length = 31
sigma = 5.0
"#;

const NOISE_TAPS: &str = r#"
name = "Noise Taps"
description = "Thirty-two random taps, a quick coloured-noise shaper"
family = "random"

[params]
taps = 32
seed = 1
"#;

const STRING_A4: &str = r#"
name = "String A4"
description = "Plucked string tuned near 440 Hz"
family = "plucked_string"

[params]
delay = 100
gain = 0.99

[driver.gain]
enabled = false
"#;

const DRAWN_LOWPASS: &str = r#"
name = "Drawn Lowpass"
description = "Hand-drawn low-pass curve with a soft shoulder"
family = "custom_fir"

[params]
magnitudes = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.7, 0.3, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
taps = 31
window = "hann"
"#;

const HAND_PLACED: &str = r#"
name = "Hand Placed"
description = "Two resonant pole pairs over a pair of zeros high in the band"
family = "custom_iir"

[params]
poles = [[0.95, 0.1], [0.9, 0.3]]
zeros = [[1.0, 0.75]]
"#;

/// Get all factory presets.
pub fn factory_presets() -> Vec<FilterPreset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| FilterPreset::from_toml(toml).ok())
        .collect()
}

/// Get a factory preset by name.
///
/// Matches the internal name or the display name, case-insensitively.
///
/// # Example
///
/// ```rust
/// use tarsos_filter_config::get_factory_preset;
///
/// let preset = get_factory_preset("telephone").unwrap();
/// assert_eq!(preset.family, "elliptic");
/// assert!(get_factory_preset("String A4").is_some());
/// ```
pub fn get_factory_preset(name: &str) -> Option<FilterPreset> {
    let name_lower = name.to_lowercase();

    if let Some((_, toml)) = FACTORY_PRESETS_TOML
        .iter()
        .find(|(preset_name, _)| preset_name.to_lowercase() == name_lower)
    {
        return FilterPreset::from_toml(toml).ok();
    }

    factory_presets()
        .into_iter()
        .find(|preset| preset.name.to_lowercase() == name_lower)
}

/// Get the internal names of all factory presets.
pub fn factory_preset_names() -> Vec<&'static str> {
    FACTORY_PRESETS_TOML.iter().map(|(name, _)| *name).collect()
}

/// Check if a preset name is a factory preset (case-insensitive).
pub fn is_factory_preset(name: &str) -> bool {
    get_factory_preset(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FAMILY_IDS;

    #[test]
    fn test_factory_presets_load() {
        let presets = factory_presets();
        assert_eq!(presets.len(), FACTORY_PRESETS_TOML.len());
        for (name, toml) in FACTORY_PRESETS_TOML {
            let result = FilterPreset::from_toml(toml);
            assert!(result.is_ok(), "factory preset '{name}' should parse: {result:?}");
            let preset = result.unwrap();
            assert!(preset.description.is_some(), "'{name}' should have a description");
        }
    }

    #[test]
    fn test_names_match_table() {
        assert_eq!(factory_preset_names(), FACTORY_PRESET_NAMES);
    }

    #[test]
    fn test_one_preset_per_family() {
        let presets = factory_presets();
        for family in FAMILY_IDS {
            let count = presets.iter().filter(|p| p.family == *family).count();
            assert_eq!(count, 1, "{family}");
        }
    }

    #[test]
    fn test_get_factory_preset() {
        let preset = get_factory_preset("hum_notch").expect("hum_notch should exist");
        assert_eq!(preset.name, "Hum Notch");

        let preset = get_factory_preset("Gaussian Blur").expect("display name should match");
        assert_eq!(preset.family, "gaussian");

        assert!(get_factory_preset("TELEPHONE").is_some());
        assert!(get_factory_preset("nonexistent").is_none());
    }

    #[test]
    fn test_is_factory_preset() {
        assert!(is_factory_preset("ring"));
        assert!(is_factory_preset("Drawn Lowpass"));
        assert!(!is_factory_preset("my_filter"));
    }

    #[test]
    fn test_string_preset_disables_gain() {
        let preset = get_factory_preset("string_a4").unwrap();
        assert!(!preset.driver_config().gain.enabled);
        assert_eq!(preset.driver.block_size, 512);
    }
}
