//! Frequency bands and parameter clamping.
//!
//! All frequencies are normalized angular frequencies in radians/sample,
//! `0` at DC and `π` at Nyquist.

use std::f64::consts::PI;

use crate::error::{DesignError, Result};

/// Smallest distance any cutoff keeps from DC, Nyquist and the other band edge.
pub const MIN_FREQUENCY: f64 = 1e-8;

/// Highest order an analog-prototype design accepts.
pub const MAX_ORDER: usize = 40;

/// Frequency region an IIR or windowed-sinc design passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Band {
    /// Passes below `cutoff`
    LowPass {
        /// Edge frequency in radians/sample
        cutoff: f64,
    },
    /// Passes above `cutoff`
    HighPass {
        /// Edge frequency in radians/sample
        cutoff: f64,
    },
    /// Passes between `low` and `high`
    BandPass {
        /// Lower edge in radians/sample
        low: f64,
        /// Upper edge in radians/sample
        high: f64,
    },
    /// Rejects between `low` and `high`
    BandStop {
        /// Lower edge in radians/sample
        low: f64,
        /// Upper edge in radians/sample
        high: f64,
    },
}

impl Band {
    /// Lower-case identifier.
    pub const fn id(&self) -> &'static str {
        match self {
            Band::LowPass { .. } => "lowpass",
            Band::HighPass { .. } => "highpass",
            Band::BandPass { .. } => "bandpass",
            Band::BandStop { .. } => "bandstop",
        }
    }

    /// Human-readable name.
    pub const fn name(&self) -> &'static str {
        match self {
            Band::LowPass { .. } => "low-pass",
            Band::HighPass { .. } => "high-pass",
            Band::BandPass { .. } => "band-pass",
            Band::BandStop { .. } => "band-stop",
        }
    }

    /// Copy with every edge clamped into `[MIN_FREQUENCY, π - MIN_FREQUENCY]`.
    ///
    /// Band edges are also ordered and kept at least [`MIN_FREQUENCY`] apart.
    ///
    /// # Errors
    ///
    /// [`DesignError::InvalidParameter`] if an edge is not finite.
    pub fn clamped(&self) -> Result<Band> {
        Ok(match *self {
            Band::LowPass { cutoff } => Band::LowPass {
                cutoff: clamp_frequency("cutoff", cutoff)?,
            },
            Band::HighPass { cutoff } => Band::HighPass {
                cutoff: clamp_frequency("cutoff", cutoff)?,
            },
            Band::BandPass { low, high } => {
                let (low, high) = clamp_edges(low, high)?;
                Band::BandPass { low, high }
            }
            Band::BandStop { low, high } => {
                let (low, high) = clamp_edges(low, high)?;
                Band::BandStop { low, high }
            }
        })
    }

    /// True for the two-edge bands, which double the realized order.
    pub const fn is_two_edge(&self) -> bool {
        matches!(self, Band::BandPass { .. } | Band::BandStop { .. })
    }

    /// One summary line with edges as fractions of Nyquist.
    pub fn describe(&self) -> String {
        match *self {
            Band::LowPass { cutoff } | Band::HighPass { cutoff } => {
                format!("Cutoff: {:.4} × Nyquist", cutoff / PI)
            }
            Band::BandPass { low, high } | Band::BandStop { low, high } => {
                format!("Band: {:.4}–{:.4} × Nyquist", low / PI, high / PI)
            }
        }
    }
}

/// Clamps a frequency into `[MIN_FREQUENCY, π - MIN_FREQUENCY]`.
pub fn clamp_frequency(name: &'static str, omega: f64) -> Result<f64> {
    if !omega.is_finite() {
        return Err(DesignError::invalid(name, format!("must be finite, got {omega}")));
    }
    Ok(omega.clamp(MIN_FREQUENCY, PI - MIN_FREQUENCY))
}

fn clamp_edges(low: f64, high: f64) -> Result<(f64, f64)> {
    let a = clamp_frequency("low", low)?;
    let b = clamp_frequency("high", high)?;
    let (mut low, mut high) = if a <= b { (a, b) } else { (b, a) };
    if high - low < MIN_FREQUENCY {
        if high + MIN_FREQUENCY <= PI - MIN_FREQUENCY {
            high = low + MIN_FREQUENCY;
        } else {
            low = high - MIN_FREQUENCY;
        }
    }
    Ok((low, high))
}

/// Clamps an order into `1..=MAX_ORDER`.
pub fn clamp_order(order: usize) -> usize {
    order.clamp(1, MAX_ORDER)
}

/// Requires a positive finite decibel value.
pub fn positive_db(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(DesignError::invalid(name, format!("must be positive and finite, got {value}")))
    }
}

/// Clamps a pole radius or feedback gain into `[0, 0.9999]`.
pub fn clamp_unit(name: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(DesignError::invalid(name, format!("must be finite, got {value}")));
    }
    Ok(value.clamp(0.0, 0.9999))
}
