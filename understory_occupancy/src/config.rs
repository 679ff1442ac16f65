// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tuning knobs for placement and collision resolution.

use core::time::Duration;

/// Grid tuning parameters.
///
/// ```
/// use core::time::Duration;
/// use understory_occupancy::GridConfig;
///
/// let config = GridConfig::builder()
///     .place_trials(8)
///     .refresh_interval(Duration::from_millis(50))
///     .build();
/// assert_eq!(config.place_trials, 8);
/// assert_eq!(config.max_collisions_per_refresh, GridConfig::DEFAULT_MAX_COLLISIONS_PER_REFRESH);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridConfig {
    /// Maximum number of random trials when searching for a free spot.
    pub place_trials: u32,
    /// Maximum number of queued children processed per resolution tick.
    pub max_collisions_per_refresh: u32,
    /// Interval between resolution ticks requested from the host timer.
    pub refresh_interval: Duration,
}

impl GridConfig {
    /// Default number of placement trials.
    pub const DEFAULT_PLACE_TRIALS: u32 = 20;
    /// Default per-tick batch size.
    pub const DEFAULT_MAX_COLLISIONS_PER_REFRESH: u32 = 20;
    /// Default tick interval.
    pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(200);

    /// Start building a configuration from the defaults.
    pub fn builder() -> GridConfigBuilder {
        GridConfigBuilder::default()
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            place_trials: Self::DEFAULT_PLACE_TRIALS,
            max_collisions_per_refresh: Self::DEFAULT_MAX_COLLISIONS_PER_REFRESH,
            refresh_interval: Self::DEFAULT_REFRESH_INTERVAL,
        }
    }
}

/// Builder for [`GridConfig`].
///
/// Counts are clamped to at least one when built.
#[derive(Clone, Debug, Default)]
pub struct GridConfigBuilder {
    config: GridConfig,
}

impl GridConfigBuilder {
    /// Set the number of placement trials.
    pub fn place_trials(mut self, trials: u32) -> Self {
        self.config.place_trials = trials;
        self
    }

    /// Set the per-tick batch size.
    pub fn max_collisions_per_refresh(mut self, max: u32) -> Self {
        self.config.max_collisions_per_refresh = max;
        self
    }

    /// Set the tick interval.
    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.config.refresh_interval = interval;
        self
    }

    /// Finish the configuration.
    pub fn build(self) -> GridConfig {
        GridConfig {
            place_trials: self.config.place_trials.max(1),
            max_collisions_per_refresh: self.config.max_collisions_per_refresh.max(1),
            ..self.config
        }
    }
}
