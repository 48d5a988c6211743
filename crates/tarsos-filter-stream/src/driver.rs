//! Block-by-block filtering of one audio stream.
//!
//! ```text
//!           set_filter          non-finite output / gain collapse
//!   Idle ───────────────▶ Filtering ─────────────────────────────▶ Unstable
//!     │                    │                                        │
//!     │ stop               │ stop                              stop │
//!     ▼                    ▼                                        │
//!   Finished ◀─────────────┴────────────────────────────────────────┘
//! ```
//!
//! Pending filters and stop requests are picked up only at the start of a
//! block. `Unstable` ends the stream: later filters are ignored. Long feedforward filters run through an FFT overlap-add convolver,
//! everything else through the filter's own sample recursion.

use std::sync::Arc;

use tarsos_filter_analysis::BlockConvolver;
use tarsos_filter_core::{DigitalFilter, Filter, FilterState};

use crate::error::{DriverError, Result};
use crate::gain::{GainConfig, GainControl};
use crate::handoff::FilterHandoff;

/// Default block size in samples.
pub const DEFAULT_BLOCK_SIZE: usize = 512;

/// Lifecycle of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// No filter selected; input passes through unchanged
    Idle,
    /// A filter is running
    Filtering,
    /// The running filter blew up; waits for a new filter
    Unstable,
    /// Stopped; every further block is refused
    Finished,
}

impl DriverState {
    /// Lower-case label.
    pub const fn name(self) -> &'static str {
        match self {
            DriverState::Idle => "idle",
            DriverState::Filtering => "filtering",
            DriverState::Unstable => "unstable",
            DriverState::Finished => "finished",
        }
    }
}

/// How the current filter is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingMode {
    /// Per-sample recursion through [`Filter::process`]
    Direct,
    /// FFT overlap-add block convolution
    Convolution,
}

impl ProcessingMode {
    /// Lower-case label.
    pub const fn name(self) -> &'static str {
        match self {
            ProcessingMode::Direct => "direct",
            ProcessingMode::Convolution => "convolution",
        }
    }
}

/// Driver settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverConfig {
    /// Block size used by [`StreamingDriver::process_signal`] callers that
    /// have no preference of their own
    pub block_size: usize,
    /// Output gain normalization
    pub gain: GainConfig,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            gain: GainConfig::default(),
        }
    }
}

#[derive(Debug)]
enum Engine {
    Direct {
        filter: Arc<DigitalFilter>,
        state: FilterState,
    },
    Convolution(BlockConvolver),
}

impl Engine {
    fn mode(&self) -> ProcessingMode {
        match self {
            Engine::Direct { .. } => ProcessingMode::Direct,
            Engine::Convolution(_) => ProcessingMode::Convolution,
        }
    }

    fn render(&mut self, input: &[f64], output: &mut [f64]) {
        match self {
            Engine::Direct { filter, state } => filter.process(input, output, state),
            Engine::Convolution(conv) => conv.process(input, output),
        }
    }
}

/// Filters one channel of audio block by block.
///
/// # Example
///
/// ```rust
/// use tarsos_filter_core::DirectFormFilter;
/// use tarsos_filter_stream::{DriverConfig, DriverState, StreamingDriver};
///
/// let mut driver = StreamingDriver::new(DriverConfig::default());
/// driver.set_filter(DirectFormFilter::fir(vec![0.5, 0.5]).unwrap().into());
///
/// let out = driver.feed(&[1.0, 0.0, 0.0]).unwrap();
/// assert_eq!(out, vec![0.5, 0.5, 0.0]);
/// assert_eq!(driver.state(), DriverState::Filtering);
/// ```
#[derive(Debug)]
pub struct StreamingDriver {
    config: DriverConfig,
    state: DriverState,
    handoff: FilterHandoff,
    filter: Option<Arc<DigitalFilter>>,
    engine: Option<Engine>,
    gain: GainControl,
    /// Raw filter output before gain
    scratch: Vec<f64>,
    unstable_reason: Option<String>,
}

impl StreamingDriver {
    /// Idle driver with no filter.
    pub fn new(config: DriverConfig) -> Self {
        Self {
            config,
            state: DriverState::Idle,
            handoff: FilterHandoff::new(),
            filter: None,
            engine: None,
            gain: GainControl::new(config.gain),
            scratch: Vec::with_capacity(config.block_size),
            unstable_reason: None,
        }
    }

    /// Settings in use.
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// The filter currently running, if any.
    pub fn filter(&self) -> Option<&DigitalFilter> {
        self.filter.as_deref()
    }

    /// Evaluation mode of the running filter.
    pub fn mode(&self) -> Option<ProcessingMode> {
        self.engine.as_ref().map(Engine::mode)
    }

    /// Current output gain.
    pub fn gain(&self) -> f64 {
        self.gain.gain()
    }

    /// Why the stream went unstable, while it is.
    pub fn unstable_reason(&self) -> Option<&str> {
        self.unstable_reason.as_deref()
    }

    /// Sender for filter changes from other threads.
    pub fn handoff(&self) -> FilterHandoff {
        self.handoff.clone()
    }

    /// Stages `filter`; it replaces the running one at the next block.
    pub fn set_filter(&mut self, filter: DigitalFilter) {
        self.handoff.send(filter);
    }

    /// Stops the stream. Every later block is refused.
    pub fn stop(&mut self) {
        self.handoff.request_stop();
        self.finish();
    }

    /// Clears filter history, the convolution tail and the gain ramp.
    pub fn reset(&mut self) {
        match &mut self.engine {
            Some(Engine::Direct { state, .. }) => state.reset(),
            Some(Engine::Convolution(conv)) => conv.reset(),
            None => {}
        }
        self.gain.reset();
    }

    /// Filters one block and returns the output.
    pub fn feed(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        let mut output = vec![0.0; input.len()];
        self.feed_into(input, &mut output)?;
        Ok(output)
    }

    /// Filters one block into `output`.
    ///
    /// Processes `min(input.len(), output.len())` samples. When the filter
    /// turns out unstable the block is zeroed, the driver moves to
    /// [`DriverState::Unstable`] and the error is returned; every later block
    /// fails the same way, whatever filter is staged.
    pub fn feed_into(&mut self, input: &[f64], output: &mut [f64]) -> Result<()> {
        let n = input.len().min(output.len());
        let (input, output) = (&input[..n], &mut output[..n]);

        self.begin_block()?;

        match self.state {
            DriverState::Finished => Err(DriverError::Finished),
            DriverState::Unstable => {
                output.fill(0.0);
                Err(DriverError::Unstable {
                    reason: self.unstable_reason.clone().unwrap_or_default(),
                })
            }
            DriverState::Idle => {
                output.copy_from_slice(input);
                Ok(())
            }
            DriverState::Filtering => self.render(input, output),
        }
    }

    /// Feeds a whole signal in blocks of `block_size` samples.
    pub fn process_signal(&mut self, input: &[f64], block_size: usize) -> Result<Vec<f64>> {
        let block_size = block_size.max(1);
        let mut output = vec![0.0; input.len()];
        for (in_chunk, out_chunk) in input.chunks(block_size).zip(output.chunks_mut(block_size)) {
            self.feed_into(in_chunk, out_chunk)?;
        }
        Ok(output)
    }

    /// Applies stop requests and pending filters.
    fn begin_block(&mut self) -> Result<()> {
        if self.handoff.stop_requested() {
            self.finish();
        }
        if matches!(self.state, DriverState::Finished | DriverState::Unstable) {
            return Ok(());
        }
        if let Some(filter) = self.handoff.take() {
            self.install(filter)?;
        }
        Ok(())
    }

    fn install(&mut self, filter: Arc<DigitalFilter>) -> Result<()> {
        let kernel = if filter.uses_convolution() {
            filter.fir_kernel()
        } else {
            None
        };
        let engine = match kernel {
            Some(kernel) => Engine::Convolution(BlockConvolver::new(&kernel)?),
            None => {
                // Same-length swaps keep their history so parameter sweeps stay smooth
                let reuse = match (self.engine.take(), &self.filter) {
                    (Some(Engine::Direct { state, .. }), Some(old))
                        if old.kind() == filter.kind() && old.length() == filter.length() =>
                    {
                        Some(state)
                    }
                    _ => None,
                };
                Engine::Direct {
                    state: reuse.unwrap_or_else(|| filter.create_state()),
                    filter: Arc::clone(&filter),
                }
            }
        };

        tracing::info!(
            kind = filter.kind(),
            length = filter.length(),
            mode = engine.mode().name(),
            "filter installed"
        );

        self.engine = Some(engine);
        self.filter = Some(filter);
        self.gain.reset();
        self.unstable_reason = None;
        self.state = DriverState::Filtering;
        Ok(())
    }

    fn render(&mut self, input: &[f64], output: &mut [f64]) -> Result<()> {
        let n = input.len();
        self.scratch.clear();
        self.scratch.resize(n, 0.0);

        if let Some(engine) = &mut self.engine {
            engine.render(input, &mut self.scratch);
        }

        if let Some(i) = self.scratch.iter().position(|y| !y.is_finite()) {
            let reason = format!("non-finite output at sample {i} of the block");
            output.fill(0.0);
            return Err(self.fail(reason));
        }

        if let Err(reason) = self.gain.apply(&self.scratch, output) {
            output.fill(0.0);
            return Err(self.fail(reason));
        }
        Ok(())
    }

    fn fail(&mut self, reason: String) -> DriverError {
        tracing::warn!(reason = %reason, "stream unstable");
        self.state = DriverState::Unstable;
        self.unstable_reason = Some(reason.clone());
        DriverError::Unstable { reason }
    }

    fn finish(&mut self) {
        if self.state != DriverState::Finished {
            tracing::info!(from = self.state.name(), "stream finished");
            self.state = DriverState::Finished;
            self.engine = None;
        }
    }
}

impl Default for StreamingDriver {
    fn default() -> Self {
        Self::new(DriverConfig::default())
    }
}
