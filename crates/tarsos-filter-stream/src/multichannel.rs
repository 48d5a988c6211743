//! Several channels driven by one filter selection.

use tarsos_filter_core::DigitalFilter;

use crate::driver::{DriverConfig, DriverState, StreamingDriver};
use crate::error::{DriverError, Result};
use crate::handoff::FilterHandoff;

/// One [`StreamingDriver`] per channel behind a shared handoff.
///
/// A filter sent through [`handoff`](Self::handoff) is shared (not copied)
/// by every channel and lands on all of them at the same block boundary.
/// Each channel keeps its own history, convolution tail and output gain.
#[derive(Debug)]
pub struct MultiChannelDriver {
    channels: Vec<StreamingDriver>,
    handoff: FilterHandoff,
}

impl MultiChannelDriver {
    /// `channels` idle drivers (at least one).
    pub fn new(channels: usize, config: DriverConfig) -> Self {
        Self {
            channels: (0..channels.max(1))
                .map(|_| StreamingDriver::new(config))
                .collect(),
            handoff: FilterHandoff::new(),
        }
    }

    /// Number of channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// One channel's driver.
    pub fn channel(&self, index: usize) -> Option<&StreamingDriver> {
        self.channels.get(index)
    }

    /// Sender for filter changes from other threads.
    pub fn handoff(&self) -> FilterHandoff {
        self.handoff.clone()
    }

    /// Stages `filter` for every channel.
    pub fn set_filter(&mut self, filter: DigitalFilter) {
        self.handoff.send(filter);
    }

    /// Stops every channel.
    pub fn stop(&mut self) {
        self.handoff.request_stop();
        for channel in &mut self.channels {
            channel.stop();
        }
    }

    /// Combined state: finished or unstable if any channel is.
    pub fn state(&self) -> DriverState {
        let states = self.channels.iter().map(StreamingDriver::state);
        let mut combined = DriverState::Idle;
        for state in states {
            combined = match (combined, state) {
                (DriverState::Finished, _) | (_, DriverState::Finished) => DriverState::Finished,
                (DriverState::Unstable, _) | (_, DriverState::Unstable) => DriverState::Unstable,
                (DriverState::Filtering, _) | (_, DriverState::Filtering) => {
                    DriverState::Filtering
                }
                _ => DriverState::Idle,
            };
        }
        combined
    }

    /// Filters one block per channel.
    ///
    /// `inputs` must hold exactly one buffer per channel. All channels are
    /// processed even if one fails; the first error is returned.
    pub fn process_planar(&mut self, inputs: &[&[f64]]) -> Result<Vec<Vec<f64>>> {
        if inputs.len() != self.channels.len() {
            return Err(DriverError::ChannelMismatch {
                expected: self.channels.len(),
                actual: inputs.len(),
            });
        }

        if self.handoff.stop_requested() {
            for channel in &mut self.channels {
                channel.stop();
            }
        }
        if let Some(filter) = self.handoff.take() {
            for channel in &self.channels {
                channel.handoff().send_shared(filter.clone());
            }
        }

        let mut outputs = Vec::with_capacity(inputs.len());
        let mut first_error = None;
        for (channel, input) in self.channels.iter_mut().zip(inputs) {
            let mut output = vec![0.0; input.len()];
            if let Err(e) = channel.feed_into(input, &mut output) {
                first_error.get_or_insert(e);
            }
            outputs.push(output);
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(outputs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tarsos_filter_core::DirectFormFilter;

    fn fir(kernel: Vec<f64>) -> DigitalFilter {
        DirectFormFilter::fir(kernel).unwrap().into()
    }

    #[test]
    fn channels_share_filter_but_not_history() {
        let mut driver = MultiChannelDriver::new(2, DriverConfig::default());
        driver.set_filter(fir(vec![0.5, 0.5]));
        let out = driver.process_planar(&[&[1.0, 0.0], &[0.0, 2.0]]).unwrap();
        assert_eq!(out[0], vec![0.5, 0.5]);
        assert_eq!(out[1], vec![0.0, 1.0]);
        assert_eq!(driver.state(), DriverState::Filtering);
    }

    #[test]
    fn rejects_wrong_channel_count() {
        let mut driver = MultiChannelDriver::new(2, DriverConfig::default());
        let err = driver.process_planar(&[&[1.0]]).unwrap_err();
        assert!(matches!(
            err,
            DriverError::ChannelMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn stop_finishes_all_channels() {
        let mut driver = MultiChannelDriver::new(3, DriverConfig::default());
        driver.handoff().request_stop();
        assert!(driver.process_planar(&[&[0.0], &[0.0], &[0.0]]).is_err());
        assert_eq!(driver.state(), DriverState::Finished);
        for i in 0..3 {
            assert_eq!(driver.channel(i).unwrap().state(), DriverState::Finished);
        }
    }

    #[test]
    fn idle_channels_pass_through() {
        let mut driver = MultiChannelDriver::new(2, DriverConfig::default());
        let out = driver.process_planar(&[&[1.0], &[-1.0]]).unwrap();
        assert_eq!(out, vec![vec![1.0], vec![-1.0]]);
        assert_eq!(driver.state(), DriverState::Idle);
    }
}
