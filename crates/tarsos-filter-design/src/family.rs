//! Filter families and the single design entry point.

use std::f64::consts::PI;

use tarsos_filter_analysis::Window;
use tarsos_filter_core::{DigitalFilter, DirectFormFilter, PoleZeroModel, realize};

use crate::band::{Band, clamp_frequency, clamp_order, clamp_unit, positive_db};
use crate::custom::{CustomFirEditorState, CustomIirEditorState};
use crate::error::Result;
use crate::fir::{self, clamp_taps};
use crate::iir;
use crate::prototype::{self, AnalogPrototype};
use crate::transform::{normalize_peak, to_digital};

/// Every design the crate knows how to build, with its parameters.
///
/// Frequencies are radians/sample in `[0, π]`. Out-of-range values are
/// clamped rather than rejected, except where no sensible clamp exists
/// (non-finite values, non-positive decibel figures).
#[derive(Debug, Clone, PartialEq)]
pub enum FilterFamily {
    /// Maximally flat passband
    Butterworth {
        /// Passband shape and edges
        band: Band,
        /// Prototype order (doubled for two-edge bands)
        order: usize,
    },
    /// Equiripple passband, monotonic stopband
    ChebyshevI {
        /// Passband shape and edges
        band: Band,
        /// Prototype order
        order: usize,
        /// Peak-to-peak passband ripple in dB
        ripple_db: f64,
    },
    /// Monotonic passband, equiripple stopband
    InverseChebyshev {
        /// Passband shape and edges
        band: Band,
        /// Prototype order
        order: usize,
        /// Minimum stopband attenuation in dB
        attenuation_db: f64,
    },
    /// Equiripple in both bands, steepest transition for a given order
    Elliptic {
        /// Passband shape and edges
        band: Band,
        /// Prototype order
        order: usize,
        /// Passband ripple in dB
        ripple_db: f64,
        /// Minimum stopband attenuation in dB
        attenuation_db: f64,
    },
    /// Windowed ideal response
    WindowedSinc {
        /// Passband shape and edges
        band: Band,
        /// Kernel length
        taps: usize,
        /// Window applied to the ideal response
        window: Window,
    },
    /// Recursive comb, peaks every `2π/delay`
    Comb {
        /// Loop delay in samples
        delay: usize,
        /// Feedback gain in `[0, 1)`
        gain: f64,
        /// Flip the feedback sign (peaks at odd multiples of `π/delay`)
        negative: bool,
    },
    /// Feedforward comb, notches every `2π/delay`
    InverseComb {
        /// Delay in samples
        delay: usize,
        /// Gain of the delayed copy in `[0, 1]`
        gain: f64,
        /// Subtract the delayed copy instead of adding it
        negative: bool,
    },
    /// Narrow rejection at one frequency
    Notch {
        /// Rejected frequency
        frequency: f64,
        /// Approximate notch width in radians
        bandwidth: f64,
    },
    /// Flat magnitude, phase turning around `frequency`
    Allpass {
        /// Centre frequency
        frequency: f64,
        /// Pole radius in `[0, 1)`
        radius: f64,
    },
    /// Two-pole resonance
    Resonator {
        /// Resonant frequency
        frequency: f64,
        /// Pole radius in `[0, 1)`
        radius: f64,
        /// Put zeros at DC and Nyquist
        zeros_at_ends: bool,
    },
    /// Boxcar average
    MovingAverage {
        /// Number of taps
        length: usize,
    },
    /// Triangular average
    Triangle {
        /// Number of taps
        length: usize,
    },
    /// Gaussian smoothing
    Gaussian {
        /// Number of taps
        length: usize,
        /// Standard deviation in samples
        sigma: f64,
    },
    /// Seeded random taps
    Random {
        /// Number of taps
        taps: usize,
        /// Xorshift32 seed
        seed: u32,
    },
    /// Karplus-Strong string
    PluckedString {
        /// Loop delay in samples (sets the pitch)
        delay: usize,
        /// Loop gain in `[0, 1)`
        gain: f64,
    },
    /// FIR from a drawn magnitude curve
    CustomFir(CustomFirEditorState),
    /// IIR from hand-placed poles and zeros
    CustomIir(CustomIirEditorState),
}

impl FilterFamily {
    /// Lower-case identifier, as used in presets.
    pub const fn id(&self) -> &'static str {
        match self {
            FilterFamily::Butterworth { .. } => "butterworth",
            FilterFamily::ChebyshevI { .. } => "chebyshev",
            FilterFamily::InverseChebyshev { .. } => "inverse_chebyshev",
            FilterFamily::Elliptic { .. } => "elliptic",
            FilterFamily::WindowedSinc { .. } => "windowed_sinc",
            FilterFamily::Comb { .. } => "comb",
            FilterFamily::InverseComb { .. } => "inverse_comb",
            FilterFamily::Notch { .. } => "notch",
            FilterFamily::Allpass { .. } => "allpass",
            FilterFamily::Resonator { .. } => "resonator",
            FilterFamily::MovingAverage { .. } => "moving_average",
            FilterFamily::Triangle { .. } => "triangle",
            FilterFamily::Gaussian { .. } => "gaussian",
            FilterFamily::Random { .. } => "random",
            FilterFamily::PluckedString { .. } => "plucked_string",
            FilterFamily::CustomFir(_) => "custom_fir",
            FilterFamily::CustomIir(_) => "custom_iir",
        }
    }

    /// Human-readable family name.
    pub const fn name(&self) -> &'static str {
        match self {
            FilterFamily::Butterworth { .. } => "Butterworth",
            FilterFamily::ChebyshevI { .. } => "Chebyshev",
            FilterFamily::InverseChebyshev { .. } => "Inverse Chebyshev",
            FilterFamily::Elliptic { .. } => "Elliptic",
            FilterFamily::WindowedSinc { .. } => "Windowed Sinc",
            FilterFamily::Comb { .. } => "Comb",
            FilterFamily::InverseComb { .. } => "Inverse Comb",
            FilterFamily::Notch { .. } => "Notch",
            FilterFamily::Allpass { .. } => "Allpass",
            FilterFamily::Resonator { .. } => "Resonator",
            FilterFamily::MovingAverage { .. } => "Moving Average",
            FilterFamily::Triangle { .. } => "Triangle",
            FilterFamily::Gaussian { .. } => "Gaussian",
            FilterFamily::Random { .. } => "Random",
            FilterFamily::PluckedString { .. } => "Plucked String",
            FilterFamily::CustomFir(_) => "Custom FIR",
            FilterFamily::CustomIir(_) => "Custom IIR",
        }
    }

    /// Band of the analog-prototype and windowed-sinc families.
    pub fn band(&self) -> Option<Band> {
        match self {
            FilterFamily::Butterworth { band, .. }
            | FilterFamily::ChebyshevI { band, .. }
            | FilterFamily::InverseChebyshev { band, .. }
            | FilterFamily::Elliptic { band, .. }
            | FilterFamily::WindowedSinc { band, .. } => Some(*band),
            _ => None,
        }
    }

    /// Human-readable summary, one fact per line.
    pub fn info(&self) -> Vec<String> {
        let mut lines = Vec::new();
        match self.band() {
            Some(band) => {
                lines.push(format!("{} ({})", self.name(), band.name()));
                lines.push(band.describe());
            }
            None => lines.push(self.name().to_string()),
        }

        match self {
            FilterFamily::Butterworth { band, order } => {
                lines.push(order_line(*band, *order));
            }
            FilterFamily::ChebyshevI {
                band,
                order,
                ripple_db,
            } => {
                lines.push(order_line(*band, *order));
                lines.push(format!("Ripple: {ripple_db:.2} dB"));
            }
            FilterFamily::InverseChebyshev {
                band,
                order,
                attenuation_db,
            } => {
                lines.push(order_line(*band, *order));
                lines.push(format!("Stopband attenuation: {attenuation_db:.1} dB"));
            }
            FilterFamily::Elliptic {
                band,
                order,
                ripple_db,
                attenuation_db,
            } => {
                lines.push(order_line(*band, *order));
                lines.push(format!("Ripple: {ripple_db:.2} dB"));
                lines.push(format!("Stopband attenuation: {attenuation_db:.1} dB"));
            }
            FilterFamily::WindowedSinc { taps, window, .. } => {
                lines.push(format!("Length: {}", clamp_taps(*taps)));
                lines.push(format!("Window: {}", window.name()));
            }
            FilterFamily::Comb { delay, gain, negative }
            | FilterFamily::InverseComb { delay, gain, negative } => {
                lines.push(format!("Delay: {delay} samples"));
                lines.push(format!("Gain: {}{gain:.3}", if *negative { "-" } else { "+" }));
            }
            FilterFamily::Notch {
                frequency,
                bandwidth,
            } => {
                lines.push(frequency_line(*frequency));
                lines.push(format!("Bandwidth: {:.4} × Nyquist", bandwidth / PI));
            }
            FilterFamily::Allpass { frequency, radius }
            | FilterFamily::Resonator {
                frequency, radius, ..
            } => {
                lines.push(frequency_line(*frequency));
                lines.push(format!("Pole radius: {radius:.4}"));
            }
            FilterFamily::MovingAverage { length } | FilterFamily::Triangle { length } => {
                lines.push(format!("Length: {}", clamp_taps(*length)));
            }
            FilterFamily::Gaussian { length, sigma } => {
                lines.push(format!("Length: {}", clamp_taps(*length)));
                lines.push(format!("Sigma: {sigma:.2} samples"));
            }
            FilterFamily::Random { taps, seed } => {
                lines.push(format!("Length: {}", clamp_taps(*taps)));
                lines.push(format!("Seed: {seed}"));
            }
            FilterFamily::PluckedString { delay, gain } => {
                lines.push(format!("Fundamental: {:.4} × Nyquist", 2.0 / (*delay as f64 + 0.5)));
                lines.push(format!("Loop gain: {gain:.4}"));
            }
            FilterFamily::CustomFir(editor) => {
                lines.push(format!("Length: {}", editor.taps()));
                lines.push(format!("Window: {}", editor.window().name()));
            }
            FilterFamily::CustomIir(editor) => {
                lines.push(format!("Poles: {}", editor.model().poles().len()));
                lines.push(format!("Zeros: {}", editor.model().zeros().len()));
            }
        }
        lines
    }
}

fn order_line(band: Band, order: usize) -> String {
    let order = clamp_order(order);
    if band.is_two_edge() {
        format!("Order: {} ({} poles)", order, 2 * order)
    } else {
        format!("Order: {order}")
    }
}

fn frequency_line(frequency: f64) -> String {
    format!("Frequency: {:.4} × Nyquist", frequency / PI)
}

/// Output of [`design_filter`], before realization.
#[derive(Debug, Clone, PartialEq)]
pub enum DesignedFilter {
    /// Poles and zeros, realized as a biquad cascade
    PoleZero(PoleZeroModel),
    /// Coefficients at explicit delay taps
    Direct(DirectFormFilter),
}

impl DesignedFilter {
    /// Realizes the design as a runnable filter.
    pub fn into_filter(self) -> DigitalFilter {
        match self {
            DesignedFilter::PoleZero(model) => DigitalFilter::Cascade(realize(&model)),
            DesignedFilter::Direct(filter) => DigitalFilter::Direct(filter),
        }
    }

    /// The pole/zero model, for pole/zero designs.
    pub fn pole_zero(&self) -> Option<&PoleZeroModel> {
        match self {
            DesignedFilter::PoleZero(model) => Some(model),
            DesignedFilter::Direct(_) => None,
        }
    }
}

/// Designs `family`, normalized so its response peaks at unit gain.
///
/// # Errors
///
/// [`DesignError::InvalidParameter`](crate::DesignError::InvalidParameter)
/// for parameters that cannot be clamped into range.
pub fn design_filter(family: &FilterFamily) -> Result<DesignedFilter> {
    let designed = match family {
        FilterFamily::Butterworth { band, order } => {
            let proto = prototype::butterworth(clamp_order(*order));
            from_prototype(&proto, *band)?
        }
        FilterFamily::ChebyshevI {
            band,
            order,
            ripple_db,
        } => {
            let ripple = positive_db("ripple_db", *ripple_db)?;
            let proto = prototype::chebyshev1(clamp_order(*order), ripple);
            from_prototype(&proto, *band)?
        }
        FilterFamily::InverseChebyshev {
            band,
            order,
            attenuation_db,
        } => {
            let attenuation = positive_db("attenuation_db", *attenuation_db)?;
            let proto = prototype::inverse_chebyshev(clamp_order(*order), attenuation)?;
            from_prototype(&proto, *band)?
        }
        FilterFamily::Elliptic {
            band,
            order,
            ripple_db,
            attenuation_db,
        } => {
            let ripple = positive_db("ripple_db", *ripple_db)?;
            let attenuation = positive_db("attenuation_db", *attenuation_db)?;
            let proto = prototype::elliptic(clamp_order(*order), ripple, attenuation)?;
            from_prototype(&proto, *band)?
        }
        FilterFamily::WindowedSinc { band, taps, window } => {
            let kernel = fir::windowed_sinc(band.clamped()?, *taps, fir::check_window(*window)?);
            DesignedFilter::Direct(fir::normalize_kernel(kernel)?)
        }
        FilterFamily::Comb {
            delay,
            gain,
            negative,
        } => DesignedFilter::Direct(fir::normalize_direct(iir::comb(
            *delay,
            clamp_unit("gain", *gain)?,
            *negative,
        )?)?),
        FilterFamily::InverseComb {
            delay,
            gain,
            negative,
        } => {
            let gain = clamp_unit("gain", *gain)?;
            DesignedFilter::Direct(fir::normalize_direct(fir::inverse_comb(
                *delay, gain, *negative,
            )?)?)
        }
        FilterFamily::Notch {
            frequency,
            bandwidth,
        } => {
            let frequency = clamp_frequency("frequency", *frequency)?;
            let bandwidth = clamp_frequency("bandwidth", *bandwidth)?;
            DesignedFilter::PoleZero(normalize_peak(iir::notch(frequency, bandwidth))?)
        }
        FilterFamily::Allpass { frequency, radius } => {
            let frequency = clamp_frequency("frequency", *frequency)?;
            let radius = clamp_unit("radius", *radius)?;
            DesignedFilter::PoleZero(normalize_peak(iir::allpass(frequency, radius))?)
        }
        FilterFamily::Resonator {
            frequency,
            radius,
            zeros_at_ends,
        } => {
            let frequency = clamp_frequency("frequency", *frequency)?;
            let radius = clamp_unit("radius", *radius)?;
            DesignedFilter::PoleZero(normalize_peak(iir::resonator(
                frequency,
                radius,
                *zeros_at_ends,
            ))?)
        }
        FilterFamily::MovingAverage { length } => {
            DesignedFilter::Direct(fir::normalize_kernel(fir::moving_average(*length))?)
        }
        FilterFamily::Triangle { length } => {
            DesignedFilter::Direct(fir::normalize_kernel(fir::triangle(*length))?)
        }
        FilterFamily::Gaussian { length, sigma } => {
            DesignedFilter::Direct(fir::normalize_kernel(fir::gaussian(*length, *sigma))?)
        }
        FilterFamily::Random { taps, seed } => {
            DesignedFilter::Direct(fir::normalize_kernel(fir::random(*taps, *seed))?)
        }
        FilterFamily::PluckedString { delay, gain } => DesignedFilter::Direct(
            fir::normalize_direct(iir::plucked_string(*delay, clamp_unit("gain", *gain)?)?)?,
        ),
        FilterFamily::CustomFir(editor) => {
            DesignedFilter::Direct(fir::normalize_kernel(editor.kernel()?)?)
        }
        FilterFamily::CustomIir(editor) => {
            DesignedFilter::PoleZero(normalize_peak(editor.model())?)
        }
    };

    let kind = match &designed {
        DesignedFilter::PoleZero(_) => "pole_zero",
        DesignedFilter::Direct(_) => "direct",
    };
    tracing::debug!(family = family.id(), kind, "designed filter");
    Ok(designed)
}

fn from_prototype(proto: &AnalogPrototype, band: Band) -> Result<DesignedFilter> {
    let model = to_digital(proto, band.clamped()?)?;
    Ok(DesignedFilter::PoleZero(normalize_peak(model)?))
}
