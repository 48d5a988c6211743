//! Tarsos Filter Analysis - spectral tools for designed filters
//!
//! - [`fft`] - Radix-2 FFT on interleaved data, plus window functions
//! - [`response`] - Frequency response tables, impulse/step responses, group delay
//! - [`convolve`] - Overlap-add block convolution for long FIR kernels
//!
//! ## Example
//!
//! ```rust
//! use tarsos_filter_analysis::{frequency_response, impulse_response};
//! use tarsos_filter_core::DirectFormFilter;
//!
//! let average = DirectFormFilter::fir(vec![0.2; 5]).unwrap();
//! let table = frequency_response(&average, 256).unwrap();
//! assert!((table.magnitude(0) - 1.0).abs() < 1e-12);
//!
//! let h = impulse_response(&average, 6);
//! assert_eq!(h[5], 0.0);
//! ```

pub mod convolve;
pub mod error;
pub mod fft;
pub mod response;

pub use convolve::{BlockConvolver, CONVOLVE_BASE, convolution_size};
pub use error::{AnalysisError, Result};
pub use fft::{Fft, Window, bessel_i0, transform};
pub use response::{
    FrequencyResponseTable, MIN_RESPONSE_LEN, ResponseCurve, frequency_response, impulse_curve,
    impulse_response, settled_length, step_curve, step_response, unwrap_phase,
};
