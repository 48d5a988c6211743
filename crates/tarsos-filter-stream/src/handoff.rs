//! Cross-thread filter selection.
//!
//! A [`FilterHandoff`] is the only channel through which another thread
//! (a UI, a parameter watcher) reaches a running driver. Selecting a filter
//! is a single atomic pointer swap; the driver takes whatever is pending once
//! per block, so a change never lands in the middle of a block and no lock is
//! held while filtering.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arc_swap::ArcSwapOption;
use tarsos_filter_core::DigitalFilter;

#[derive(Debug)]
struct HandoffSlot {
    pending: ArcSwapOption<DigitalFilter>,
    stop: AtomicBool,
}

/// Cloneable sender of filter changes and stop requests.
///
/// Clones share one slot. Only the latest filter sent before a block
/// boundary is applied; earlier ones are dropped.
#[derive(Debug, Clone)]
pub struct FilterHandoff {
    slot: Arc<HandoffSlot>,
}

impl FilterHandoff {
    /// Empty handoff.
    pub fn new() -> Self {
        Self {
            slot: Arc::new(HandoffSlot {
                pending: ArcSwapOption::empty(),
                stop: AtomicBool::new(false),
            }),
        }
    }

    /// Stages `filter` for the next block boundary.
    pub fn send(&self, filter: DigitalFilter) {
        self.send_shared(Arc::new(filter));
    }

    /// Stages an already shared filter.
    pub fn send_shared(&self, filter: Arc<DigitalFilter>) {
        self.slot.pending.store(Some(filter));
    }

    /// Asks the driver to finish at the next block boundary.
    pub fn request_stop(&self) {
        self.slot.stop.store(true, Ordering::Release);
    }

    /// Whether a filter is waiting to be taken.
    pub fn has_pending(&self) -> bool {
        self.slot.pending.load().is_some()
    }

    /// Whether a stop has been requested.
    pub fn stop_requested(&self) -> bool {
        self.slot.stop.load(Ordering::Acquire)
    }

    /// Removes and returns the pending filter.
    pub(crate) fn take(&self) -> Option<Arc<DigitalFilter>> {
        self.slot.pending.swap(None)
    }
}

impl Default for FilterHandoff {
    fn default() -> Self {
        Self::new()
    }
}
