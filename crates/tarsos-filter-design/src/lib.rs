//! Tarsos Filter Design - synthesis of IIR and FIR filters
//!
//! Turns a [`FilterFamily`] (family plus parameters) into either a
//! [`PoleZeroModel`](tarsos_filter_core::PoleZeroModel), realized as a biquad
//! cascade, or a sparse [`DirectFormFilter`](tarsos_filter_core::DirectFormFilter).
//!
//! ## Families
//!
//! - **Analog prototypes**: Butterworth, Chebyshev I, inverse Chebyshev and
//!   elliptic, mapped through the bilinear transform onto low-pass,
//!   high-pass, band-pass or band-stop [`Band`]s
//! - **FIR**: windowed sinc, moving average, triangle, Gaussian, random,
//!   inverse comb, and a user-drawn magnitude curve
//! - **Ad-hoc IIR**: comb, notch, allpass, resonator, plucked string, and
//!   hand-placed poles/zeros
//!
//! Every design is scaled so the peak of its magnitude response is 1.
//!
//! ## Example
//!
//! ```rust
//! use std::f64::consts::PI;
//! use tarsos_filter_core::{Complex, Filter};
//! use tarsos_filter_design::{Band, FilterFamily, design_filter};
//!
//! let family = FilterFamily::Butterworth {
//!     band: Band::LowPass { cutoff: 0.3 * PI },
//!     order: 4,
//! };
//! let filter = design_filter(&family).unwrap().into_filter();
//!
//! let dc = filter.eval_transfer(Complex::ONE).unwrap().magnitude();
//! assert!((dc - 1.0).abs() < 1e-6);
//! ```

pub mod band;
pub mod custom;
pub mod elliptic;
pub mod error;
pub mod family;
pub mod fir;
pub mod iir;
pub mod prototype;
pub mod transform;

use std::f64::consts::PI;

pub use band::{Band, MAX_ORDER, MIN_FREQUENCY};
pub use custom::{
    CustomFirEditorState, CustomIirEditorState, EditPoint, MAX_EDIT_RADIUS, PointKind,
};
pub use error::{DesignError, Result};
pub use family::{DesignedFilter, FilterFamily, design_filter};
pub use fir::{MAX_KAISER_BETA, MAX_TAPS, Xorshift32};
pub use prototype::AnalogPrototype;
pub use tarsos_filter_analysis::Window;

/// One representative instance of every family, with typical parameters.
pub fn all_families() -> Vec<FilterFamily> {
    let low = Band::LowPass { cutoff: 0.25 * PI };
    let mut custom_iir = CustomIirEditorState::new();
    custom_iir.add_pole(tarsos_filter_core::Complex::from_polar(0.9, 0.5));
    custom_iir.add_zero(tarsos_filter_core::Complex::real(-1.0));

    vec![
        FilterFamily::Butterworth { band: low, order: 4 },
        FilterFamily::ChebyshevI {
            band: low,
            order: 4,
            ripple_db: 1.0,
        },
        FilterFamily::InverseChebyshev {
            band: low,
            order: 4,
            attenuation_db: 40.0,
        },
        FilterFamily::Elliptic {
            band: low,
            order: 4,
            ripple_db: 1.0,
            attenuation_db: 40.0,
        },
        FilterFamily::WindowedSinc {
            band: low,
            taps: 63,
            window: Window::Hamming,
        },
        FilterFamily::Comb {
            delay: 32,
            gain: 0.9,
            negative: false,
        },
        FilterFamily::InverseComb {
            delay: 32,
            gain: 1.0,
            negative: false,
        },
        FilterFamily::Notch {
            frequency: 0.25 * PI,
            bandwidth: 0.05,
        },
        FilterFamily::Allpass {
            frequency: 0.25 * PI,
            radius: 0.9,
        },
        FilterFamily::Resonator {
            frequency: 0.25 * PI,
            radius: 0.98,
            zeros_at_ends: true,
        },
        FilterFamily::MovingAverage { length: 5 },
        FilterFamily::Triangle { length: 9 },
        FilterFamily::Gaussian {
            length: 31,
            sigma: 5.0,
        },
        FilterFamily::Random { taps: 32, seed: 1 },
        FilterFamily::PluckedString {
            delay: 100,
            gain: 0.99,
        },
        FilterFamily::CustomFir(CustomFirEditorState::default()),
        FilterFamily::CustomIir(custom_iir),
    ]
}
