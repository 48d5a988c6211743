//! Tarsos Filter Stream - block-by-block filtering of live audio
//!
//! A [`StreamingDriver`] owns the runtime state of one audio channel and
//! filters successive blocks with whatever [`DigitalFilter`] is selected.
//! Long feedforward kernels are convolved with an FFT overlap-add engine,
//! everything else runs the filter's own recursion. Output is normalized
//! so it stays inside full scale, and a filter that blows up stops the
//! stream instead of emitting garbage.
//!
//! # Threading
//!
//! The driver itself is single-threaded. Other threads change the filter
//! through a [`FilterHandoff`], which is one atomic pointer swap picked up at
//! the next block boundary; no lock is ever held while filtering.
//!
//! # Example
//!
//! ```rust
//! use tarsos_filter_core::DirectFormFilter;
//! use tarsos_filter_stream::{DriverConfig, StreamingDriver};
//!
//! let mut driver = StreamingDriver::new(DriverConfig::default());
//! let remote = driver.handoff();
//!
//! // e.g. from a UI thread
//! remote.send(DirectFormFilter::fir(vec![0.2; 5]).unwrap().into());
//!
//! let out = driver.feed(&[1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
//! assert_eq!(out, vec![0.2, 0.2, 0.2, 0.2, 0.2, 0.0, 0.0, 0.0]);
//! ```
//!
//! [`DigitalFilter`]: tarsos_filter_core::DigitalFilter

pub mod driver;
pub mod error;
pub mod gain;
pub mod handoff;
pub mod multichannel;

pub use driver::{DEFAULT_BLOCK_SIZE, DriverConfig, DriverState, ProcessingMode, StreamingDriver};
pub use error::{DriverError, Result};
pub use gain::{GainConfig, GainControl, MIN_GAIN, PCM_FULL_SCALE};
pub use handoff::FilterHandoff;
pub use multichannel::MultiChannelDriver;
