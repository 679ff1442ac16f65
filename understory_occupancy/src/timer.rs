// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host timer seam for the collision resolver.
//!
//! The grid never runs ticks by itself. When the collision queue becomes
//! non-empty it asks the host [`Timer`] for a repeating, low-priority callback
//! at [`GridConfig::refresh_interval`](crate::GridConfig::refresh_interval).
//! Whenever that callback fires, the host calls
//! [`Grid::resolve_tick`](crate::Grid::resolve_tick) and keeps the timer
//! running while the returned [`Resolution::keep_running`](crate::Resolution::keep_running)
//! is true.
//!
//! The grid holds at most one handle at a time. It calls [`Timer::cancel`] only
//! when the queue empties outside of a tick (for example because the last
//! queued child was removed); a tick that drains the queue reports
//! [`TickStatus::Finished`](crate::TickStatus::Finished) instead and the host
//! drops its callback.

use core::fmt::Debug;
use core::time::Duration;

/// Repeating-timer facility provided by the host event loop.
pub trait Timer {
    /// Handle identifying a scheduled repeating callback.
    type Handle: Copy + Debug + PartialEq;

    /// Start invoking the resolver every `interval` until cancelled or finished.
    fn schedule(&mut self, interval: Duration) -> Self::Handle;

    /// Stop a previously scheduled callback.
    fn cancel(&mut self, handle: Self::Handle);
}

/// A [`Timer`] that only records requests.
///
/// Suits hosts that poll [`Grid::is_resolving`](crate::Grid::is_resolving) from
/// their own loop, and tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ManualTimer {
    next: u64,
    active: Option<u64>,
    scheduled: u32,
    cancelled: u32,
    last_interval: Option<Duration>,
}

impl ManualTimer {
    /// Create an idle timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently scheduled handle, unless it was cancelled.
    pub fn active(&self) -> Option<u64> {
        self.active
    }

    /// How many times a callback was scheduled.
    pub fn scheduled(&self) -> u32 {
        self.scheduled
    }

    /// How many times a callback was cancelled.
    pub fn cancelled(&self) -> u32 {
        self.cancelled
    }

    /// Interval requested by the last [`schedule`](Timer::schedule) call.
    pub fn last_interval(&self) -> Option<Duration> {
        self.last_interval
    }
}

impl Timer for ManualTimer {
    type Handle = u64;

    fn schedule(&mut self, interval: Duration) -> u64 {
        self.next += 1;
        self.scheduled += 1;
        self.active = Some(self.next);
        self.last_interval = Some(interval);
        self.next
    }

    fn cancel(&mut self, handle: u64) {
        self.cancelled += 1;
        if self.active == Some(handle) {
            self.active = None;
        }
    }
}
