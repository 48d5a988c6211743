//! Tarsos Filter Core - realization primitives for designed digital filters
//!
//! This crate holds the pieces every other tarsos-filter crate builds on:
//! complex arithmetic for pole/zero math, the two filter realizations, and
//! the per-channel runtime state that lets a filter continue across block
//! boundaries.
//!
//! # Core Abstractions
//!
//! ## Complex Numbers
//!
//! - [`Complex`] - Immutable `Copy` value type with checked division
//!
//! ## Filter Models
//!
//! - [`PoleZeroModel`] - Ordered poles and zeros plus overall gain
//! - [`DirectFormFilter`] - Feedforward/feedback coefficients at sparse integer delays
//! - [`CascadeFilter`] - Chain of second-order sections built by [`realize`]
//! - [`DigitalFilter`] - Closed enum over both realizations
//!
//! ## Runtime State
//!
//! - [`RingBuffer`] - Power-of-two circular history addressed by bitmask
//! - [`FilterState`] - Per-channel history, created by [`Filter::create_state`]
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! tarsos-filter-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use tarsos_filter_core::{DirectFormFilter, Filter};
//!
//! let average = DirectFormFilter::fir(vec![0.2; 5]).unwrap();
//! let mut state = average.create_state();
//!
//! let input = [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
//! let mut output = [0.0; 8];
//! average.process(&input, &mut output, &mut state);
//! assert!((output[4] - 0.2).abs() < 1e-12);
//! assert_eq!(output[5], 0.0);
//! ```
//!
//! # Design Principles
//!
//! - **Explicit state**: filters are immutable; history lives in [`FilterState`]
//! - **Checked invariants**: malformed coefficients and ring sizes fail at construction
//! - **No hidden scratch**: every complex operation returns a new value

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

pub mod cascade;
pub mod complex;
pub mod direct;
pub mod error;
pub mod filter;
pub mod pole_zero;
pub mod ring;

// Re-export main types at crate root
pub use cascade::{BiquadStage, CascadeFilter, realize};
pub use complex::Complex;
pub use direct::DirectFormFilter;
pub use error::CoreError;
pub use filter::{DigitalFilter, Filter, FilterState};
pub use pole_zero::{PoleZeroModel, REAL_AXIS_EPSILON};
pub use ring::RingBuffer;

/// Convenience result type for core operations.
pub type Result<T> = core::result::Result<T, CoreError>;
