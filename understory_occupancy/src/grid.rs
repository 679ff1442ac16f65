// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`Grid`]: child placement, collision detection, and the batched resolver.
//!
//! ## Lifecycle
//!
//! - [`Grid::add`] places a child, either exactly or by randomized search.
//! - [`Grid::move_to`] repositions a child and updates its lock.
//! - [`Grid::remove`] forgets a child and purges it from the collision queue.
//!
//! Any of these may leave a child overlapping others. Overlaps are detected
//! immediately, the participants are queued, and the host [`Timer`] is asked for
//! a repeating callback. Each callback runs [`Grid::resolve_tick`], which shifts
//! at most [`GridConfig::max_collisions_per_refresh`] queued children and
//! reports every relocation back to the host.
//!
//! ## Locking
//!
//! Locked children still weigh on the occupancy map, but they are never queued
//! and never moved by the resolver. A child that overlaps *only* locked children
//! is not queued either; it keeps its overlap until something else moves.

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::fmt::Debug;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::GridConfig;
use crate::error::Error;
use crate::occupancy::Occupancy;
use crate::search;
use crate::timer::Timer;
use crate::types::{CellRect, ChildFlags, Placement};

/// Seed for the random source of grids built without an explicit one.
pub const DEFAULT_SEED: u64 = 0x5eed_0f9a_1dca_fe42;

#[derive(Clone, Debug)]
struct Child<K> {
    key: K,
    rect: CellRect,
    flags: ChildFlags,
}

/// A relocation performed by the resolver.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChildMoved<K> {
    /// The relocated child.
    pub child: K,
    /// Rectangle before the move.
    pub from: CellRect,
    /// Rectangle after the move.
    pub to: CellRect,
}

/// Whether the host should keep invoking the resolver.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickStatus {
    /// The queue is not empty; call [`Grid::resolve_tick`] again after the interval.
    Continue,
    /// The queue drained; the grid released its timer handle.
    Finished,
}

/// Outcome of one [`Grid::resolve_tick`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution<K> {
    /// Children relocated during the tick, in processing order.
    pub moved: Vec<ChildMoved<K>>,
    /// Whether more ticks are needed.
    pub status: TickStatus,
}

impl<K> Resolution<K> {
    /// Return true if the host timer should fire again.
    pub fn keep_running(&self) -> bool {
        self.status == TickStatus::Continue
    }
}

/// Fixed-size cell grid that places children and resolves their overlaps.
///
/// `K` is the caller's child identity, `T` the host timer, and `R` the random
/// source used by the placement and shift searches.
pub struct Grid<K, T: Timer, R = SmallRng> {
    occupancy: Occupancy,
    children: Vec<Child<K>>,
    queue: VecDeque<K>,
    timer: T,
    handle: Option<T::Handle>,
    config: GridConfig,
    rng: R,
}

impl<K, T: Timer, R> Debug for Grid<K, T, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let locked = self
            .children
            .iter()
            .filter(|c| c.flags.contains(ChildFlags::LOCKED))
            .count();
        f.debug_struct("Grid")
            .field("occupancy", &self.occupancy)
            .field("children", &self.children.len())
            .field("locked", &locked)
            .field("queued", &self.queue.len())
            .field("handle", &self.handle)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<K, T> Grid<K, T, SmallRng>
where
    K: Copy + Eq + Debug,
    T: Timer,
{
    /// Create an empty `width × height` grid with default tuning.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new(width: u32, height: u32, timer: T) -> Self {
        Self::with_config(width, height, GridConfig::default(), timer)
    }

    /// Create an empty grid with explicit tuning.
    ///
    /// The random source is a [`SmallRng`] seeded with [`DEFAULT_SEED`].
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_config(width: u32, height: u32, config: GridConfig, timer: T) -> Self {
        Self::with_rng(
            width,
            height,
            config,
            timer,
            SmallRng::seed_from_u64(DEFAULT_SEED),
        )
    }
}

impl<K, T, R> Grid<K, T, R>
where
    K: Copy + Eq + Debug,
    T: Timer,
    R: Rng,
{
    /// Create an empty grid with explicit tuning and random source.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_rng(width: u32, height: u32, config: GridConfig, timer: T, rng: R) -> Self {
        Self {
            occupancy: Occupancy::new(width, height),
            children: Vec::new(),
            queue: VecDeque::new(),
            timer,
            handle: None,
            config,
            rng,
        }
    }

    /// Width in cells.
    pub fn width(&self) -> u32 {
        self.occupancy.width()
    }

    /// Height in cells.
    pub fn height(&self) -> u32 {
        self.occupancy.height()
    }

    /// Tuning in effect.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// The occupancy counters.
    pub fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }

    /// The host timer.
    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Mutable access to the host timer.
    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    /// Number of placed children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Return true if nothing is placed.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Return true if `child` is placed on this grid.
    pub fn contains(&self, child: K) -> bool {
        self.position(child).is_some()
    }

    /// Placed children and their rectangles, in insertion order.
    pub fn children(&self) -> impl Iterator<Item = (K, CellRect)> + '_ {
        self.children.iter().map(|c| (c.key, c.rect))
    }

    /// Current rectangle of `child`.
    pub fn rect(&self, child: K) -> Result<CellRect, Error> {
        Ok(self.children[self.index_of(child)?].rect)
    }

    /// Return true if `child` is placed and locked.
    pub fn is_locked(&self, child: K) -> bool {
        self.flags(child).contains(ChildFlags::LOCKED)
    }

    /// Return true if `child` is waiting in the collision queue.
    pub fn is_queued(&self, child: K) -> bool {
        self.flags(child).contains(ChildFlags::QUEUED)
    }

    /// Number of children waiting in the collision queue.
    pub fn pending_collisions(&self) -> usize {
        self.queue.len()
    }

    /// Queued children, front first.
    pub fn queued(&self) -> impl Iterator<Item = K> + '_ {
        self.queue.iter().copied()
    }

    /// Return true while the grid holds a timer handle.
    pub fn is_resolving(&self) -> bool {
        self.handle.is_some()
    }

    /// Occupancy count of a single cell.
    ///
    /// # Panics
    ///
    /// Panics if the cell lies outside the grid.
    pub fn cell_weight(&self, row: u32, col: u32) -> u16 {
        assert!(
            row < self.height() && col < self.width(),
            "cell ({row}, {col}) outside {}×{} grid",
            self.width(),
            self.height()
        );
        self.occupancy.get(row, col)
    }

    /// Sum of occupancy counts over `rect`.
    pub fn weight(&self, rect: &CellRect) -> Result<u32, Error> {
        self.check_bounds(rect)?;
        Ok(self.occupancy.weight(rect))
    }

    /// Place a new `width × height` child.
    ///
    /// [`Placement::At`] puts it exactly at the given origin;
    /// [`Placement::Random`] runs the best-of-N search. The chosen rectangle is
    /// committed even if it overlaps others, in which case collision detection
    /// runs immediately. A `locked` child is never moved by the resolver.
    ///
    /// Returns the committed rectangle.
    pub fn add(
        &mut self,
        child: K,
        width: u32,
        height: u32,
        placement: Placement,
        locked: bool,
    ) -> Result<CellRect, Error> {
        if self.contains(child) {
            return Err(Error::DuplicateChild);
        }
        if width == 0 || height == 0 {
            return Err(Error::EmptySize { width, height });
        }
        let (rect, weight) = match placement {
            Placement::At { x, y } => {
                let rect = CellRect::new(x, y, width, height);
                self.check_bounds(&rect)?;
                (rect, self.occupancy.weight(&rect))
            }
            Placement::Random => {
                self.check_bounds(&CellRect::new(0, 0, width, height))?;
                search::place_randomly(
                    &self.occupancy,
                    width,
                    height,
                    self.config.place_trials,
                    &mut self.rng,
                )
            }
        };

        let mut flags = ChildFlags::empty();
        flags.set(ChildFlags::LOCKED, locked);
        self.children.push(Child {
            key: child,
            rect,
            flags,
        });
        self.occupancy.add(&rect);

        if weight > 0 {
            self.detect_collisions(self.children.len() - 1);
        }
        Ok(rect)
    }

    /// Remove `child`, returning its last rectangle.
    ///
    /// A queued child is purged from the collision queue; if that empties the
    /// queue the timer handle is cancelled.
    pub fn remove(&mut self, child: K) -> Result<CellRect, Error> {
        let idx = self.index_of(child)?;
        let removed = self.children.remove(idx);
        self.occupancy.remove(&removed.rect);
        if removed.flags.contains(ChildFlags::QUEUED) {
            self.queue.retain(|&k| k != child);
            if self.queue.is_empty() {
                self.cancel_timer();
            }
        }
        Ok(removed.rect)
    }

    /// Move `child` so its origin is `(x, y)`; its size is unchanged.
    ///
    /// The lock is replaced by `locked`: moving without a lock clears any
    /// earlier one. Returns the new rectangle.
    pub fn move_to(&mut self, child: K, x: u32, y: u32, locked: bool) -> Result<CellRect, Error> {
        let idx = self.index_of(child)?;
        let old = self.children[idx].rect;
        let rect = old.with_origin(x, y);
        self.check_bounds(&rect)?;

        self.occupancy.remove(&old);
        let weight = self.occupancy.weight(&rect);
        self.occupancy.add(&rect);

        let entry = &mut self.children[idx];
        entry.rect = rect;
        entry.flags.set(ChildFlags::LOCKED, locked);

        if weight > 0 {
            self.detect_collisions(idx);
        }
        Ok(rect)
    }

    /// Lock or unlock `child` without moving it.
    ///
    /// Locking a queued child does not dequeue it, but the resolver will drop
    /// it without moving it.
    pub fn set_locked(&mut self, child: K, locked: bool) -> Result<(), Error> {
        let idx = self.index_of(child)?;
        self.children[idx].flags.set(ChildFlags::LOCKED, locked);
        Ok(())
    }

    /// Run one batch of collision resolution.
    ///
    /// Pops up to [`GridConfig::max_collisions_per_refresh`] children from the
    /// queue. Each is shifted towards a strictly lighter position; a child that
    /// moved is re-checked for collisions and re-queued while it still overlaps
    /// something. A child that cannot improve is dropped for this tick.
    ///
    /// When the queue drains the grid forgets its timer handle and the result
    /// reports [`TickStatus::Finished`].
    pub fn resolve_tick(&mut self) -> Resolution<K> {
        let mut moved = Vec::new();
        let budget = self.config.max_collisions_per_refresh;
        for _ in 0..budget {
            let Some(key) = self.queue.pop_front() else {
                break;
            };
            let Some(idx) = self.position(key) else {
                continue;
            };
            self.children[idx].flags.remove(ChildFlags::QUEUED);
            if let Some(change) = self.shift_child(idx) {
                moved.push(change);
            }
            if self.queue.is_empty() {
                break;
            }
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(
            moved = moved.len(),
            pending = self.queue.len(),
            "collision tick"
        );

        let status = if self.queue.is_empty() {
            self.handle = None;
            TickStatus::Finished
        } else {
            TickStatus::Continue
        };
        Resolution { moved, status }
    }

    /// Run ticks back to back until the queue drains or `max_ticks` ran.
    ///
    /// Returns every relocation in order. Does nothing unless the grid is
    /// resolving.
    pub fn resolve_all(&mut self, max_ticks: usize) -> Vec<ChildMoved<K>> {
        let mut moved = Vec::new();
        for _ in 0..max_ticks {
            if !self.is_resolving() {
                break;
            }
            let tick = self.resolve_tick();
            let keep_running = tick.keep_running();
            moved.extend(tick.moved);
            if !keep_running {
                break;
            }
        }
        moved
    }

    fn shift_child(&mut self, idx: usize) -> Option<ChildMoved<K>> {
        let Child { key, rect, flags } = self.children[idx].clone();
        if flags.contains(ChildFlags::LOCKED) {
            return None;
        }
        self.occupancy.remove(&rect);
        let weight = self.occupancy.weight(&rect);
        let (to, weight) = search::shift(&self.occupancy, rect, weight, &mut self.rng);
        self.occupancy.add(&to);
        if to == rect {
            return None;
        }

        self.children[idx].rect = to;
        self.detect_collisions(idx);
        if weight > 0 {
            self.enqueue(idx);
        }
        Some(ChildMoved {
            child: key,
            from: rect,
            to,
        })
    }

    fn detect_collisions(&mut self, subject: usize) {
        let rect = self.children[subject].rect;
        let mut found = false;
        for i in 0..self.children.len() {
            if i == subject {
                continue;
            }
            let other = &self.children[i];
            // Only the intersection width is tested.
            if rect.intersect(&other.rect).width > 0
                && !other
                    .flags
                    .intersects(ChildFlags::LOCKED | ChildFlags::QUEUED)
            {
                found = true;
                self.enqueue(i);
            }
        }
        if found {
            self.enqueue(subject);
        }
        if !self.queue.is_empty() && self.handle.is_none() {
            let handle = self.timer.schedule(self.config.refresh_interval);
            #[cfg(feature = "tracing")]
            tracing::debug!(?handle, pending = self.queue.len(), "scheduled collision resolver");
            self.handle = Some(handle);
        }
    }

    fn enqueue(&mut self, idx: usize) {
        let child = &mut self.children[idx];
        if child
            .flags
            .intersects(ChildFlags::LOCKED | ChildFlags::QUEUED)
        {
            return;
        }
        child.flags.insert(ChildFlags::QUEUED);
        #[cfg(feature = "tracing")]
        tracing::debug!(child = ?child.key, rect = ?child.rect, "queued colliding child");
        self.queue.push_back(child.key);
    }

    fn cancel_timer(&mut self) {
        if let Some(handle) = self.handle.take() {
            #[cfg(feature = "tracing")]
            tracing::debug!(?handle, "cancelled collision resolver");
            self.timer.cancel(handle);
        }
    }

    fn check_bounds(&self, rect: &CellRect) -> Result<(), Error> {
        if rect.fits_within(self.width(), self.height()) {
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                rect: *rect,
                grid_width: self.width(),
                grid_height: self.height(),
            })
        }
    }

    fn position(&self, child: K) -> Option<usize> {
        self.children.iter().position(|c| c.key == child)
    }

    fn index_of(&self, child: K) -> Result<usize, Error> {
        self.position(child).ok_or(Error::UnknownChild)
    }

    fn flags(&self, child: K) -> ChildFlags {
        self.position(child)
            .map(|i| self.children[i].flags)
            .unwrap_or_default()
    }
}
