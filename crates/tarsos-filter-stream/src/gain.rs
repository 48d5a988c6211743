//! Automatic output gain normalization.
//!
//! Filtered blocks are scaled by a running output gain before they leave the
//! driver. When a block would exceed full scale the gain shrinks by
//! `target / peak` and the block is scaled again; while the stream is young
//! (inside the rise window) a quiet block grows the gain by the same ratio,
//! never past `max_gain`.
//!
//! # Usage
//!
//! ```rust
//! use tarsos_filter_stream::{GainConfig, GainControl};
//!
//! let mut gain = GainControl::new(GainConfig::default());
//! let raw = [40_000.0, -10.0];
//! let mut out = [0.0; 2];
//! gain.apply(&raw, &mut out).unwrap();
//! assert!((out[0] - 30_000.0).abs() < 1e-9);
//! ```

/// Full scale of 16-bit PCM.
pub const PCM_FULL_SCALE: f64 = 32767.0;

/// Gain below this is treated as a collapsed (unstable) stream.
pub const MIN_GAIN: f64 = 1e-8;

/// Thresholds for output gain normalization.
///
/// The defaults assume samples on the 16-bit PCM scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainConfig {
    /// Apply normalization at all; when false the gain stays at 1
    pub enabled: bool,
    /// Peak above which a block is scaled down
    pub full_scale: f64,
    /// Peak below which a young stream grows its gain
    pub rise_threshold: f64,
    /// Peak a corrected block is scaled to
    pub target: f64,
    /// Samples after a filter change during which the gain may grow
    pub rise_window: usize,
    /// Upper bound for the gain
    pub max_gain: f64,
}

impl Default for GainConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            full_scale: PCM_FULL_SCALE,
            rise_threshold: 24_000.0,
            target: 30_000.0,
            rise_window: 44_100,
            max_gain: 1.0,
        }
    }
}

impl GainConfig {
    /// Same thresholds relative to a different full scale (e.g. `1.0` for
    /// normalized float audio).
    pub fn for_full_scale(full_scale: f64) -> Self {
        let ratio = full_scale / PCM_FULL_SCALE;
        let base = Self::default();
        Self {
            full_scale,
            rise_threshold: base.rise_threshold * ratio,
            target: base.target * ratio,
            ..base
        }
    }

    /// Disabled normalization: output is the raw filter output.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

/// Running output gain for one channel.
#[derive(Debug, Clone)]
pub struct GainControl {
    config: GainConfig,
    gain: f64,
    /// Samples emitted since the last reset
    elapsed: usize,
}

impl GainControl {
    /// Starts at `max_gain` (or 1 when disabled).
    pub fn new(config: GainConfig) -> Self {
        let mut control = Self {
            config,
            gain: 1.0,
            elapsed: 0,
        };
        control.reset();
        control
    }

    /// Thresholds in use.
    pub fn config(&self) -> &GainConfig {
        &self.config
    }

    /// Current gain.
    pub fn gain(&self) -> f64 {
        self.gain
    }

    /// Whether quiet blocks may still raise the gain.
    pub fn is_rising(&self) -> bool {
        self.config.enabled && self.elapsed < self.config.rise_window
    }

    /// Restarts the rise phase at the initial gain.
    pub fn reset(&mut self) {
        self.gain = if self.config.enabled {
            self.config.max_gain
        } else {
            1.0
        };
        self.elapsed = 0;
    }

    /// Scales `raw` into `out`, adjusting the gain first.
    ///
    /// Processes `min(raw.len(), out.len())` samples. Returns the reason
    /// when the gain underflows or stops being finite.
    pub fn apply(&mut self, raw: &[f64], out: &mut [f64]) -> Result<(), String> {
        let n = raw.len().min(out.len());
        let raw = &raw[..n];
        let raw_peak = raw.iter().fold(0.0f64, |m, y| m.max(y.abs()));

        if self.config.enabled {
            self.adjust(raw_peak)?;
        }

        for (y, &x) in out[..n].iter_mut().zip(raw) {
            *y = x * self.gain;
        }
        self.elapsed = self.elapsed.saturating_add(n);
        Ok(())
    }

    fn adjust(&mut self, raw_peak: f64) -> Result<(), String> {
        let before = self.gain;
        let mut peak = raw_peak * self.gain;

        // One correction lands on `target`; rounding may need a second
        let mut attempts = 0;
        while peak > self.config.full_scale && attempts < 4 {
            self.gain *= self.config.target / peak;
            self.check()?;
            peak = raw_peak * self.gain;
            attempts += 1;
        }

        if self.is_rising() && peak > 0.0 && peak < self.config.rise_threshold {
            self.gain = (self.gain * self.config.target / peak).min(self.config.max_gain);
            self.check()?;
        }

        if self.gain != before {
            tracing::debug!(from = before, to = self.gain, peak = raw_peak, "output gain adjusted");
        }
        Ok(())
    }

    fn check(&self) -> Result<(), String> {
        if !self.gain.is_finite() {
            Err(format!("output gain became {}", self.gain))
        } else if self.gain < MIN_GAIN {
            Err(format!("output gain underflowed to {:e}", self.gain))
        } else {
            Ok(())
        }
    }
}
