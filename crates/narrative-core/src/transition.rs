#![forbid(unsafe_code)]

//! Slide transitions and the single-slot completion tracker.
//!
//! Moving the slider is split across two points in time: the offset is
//! applied immediately, and the follow-up work (moving focus) waits for the
//! transition to finish. [`TransitionSlot`] holds at most one pending
//! [`SlideTransition`]. Beginning a new one supersedes the old, so only the
//! latest transition ever reports completion.
//!
//! Completion can come from two sources:
//!
//! - [`TransitionSlot::tick`]: the slot drives its own eased animation.
//! - [`TransitionSlot::complete`] / [`TransitionSlot::complete_current`]: the
//!   host reports that its own transition ended.
//!
//! # Invariants
//!
//! 1. At most one transition is pending.
//! 2. A [`TransitionId`] completes at most once; stale ids are ignored.
//! 3. Ids are strictly increasing per slot.

use std::time::Duration;

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f64) -> f64;

/// Identity easing (constant velocity).
#[inline]
pub fn linear(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-out (slow end).
#[inline]
pub fn ease_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Default slide duration.
pub const DEFAULT_SLIDE_DURATION: Duration = Duration::from_millis(300);

/// Identifier of one issued transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransitionId(u64);

impl TransitionId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Interpolates the slider offset (percent) between two positions.
#[derive(Debug, Clone, Copy)]
pub struct SlideTransition {
    id: TransitionId,
    from: f64,
    to: f64,
    elapsed: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl SlideTransition {
    fn new(id: TransitionId, from: f64, to: f64, duration: Duration) -> Self {
        Self {
            id,
            from,
            to,
            elapsed: Duration::ZERO,
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
            easing: ease_out,
        }
    }

    #[must_use]
    pub const fn id(&self) -> TransitionId {
        self.id
    }

    #[must_use]
    pub const fn target(&self) -> f64 {
        self.to
    }

    /// Advance by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Eased progress in [0.0, 1.0].
    #[must_use]
    pub fn progress(&self) -> f64 {
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (self.easing)(t)
    }

    /// Current interpolated offset.
    #[must_use]
    pub fn position(&self) -> f64 {
        self.from + (self.to - self.from) * self.progress()
    }
}

/// Holds the single pending slide transition.
#[derive(Debug, Clone)]
pub struct TransitionSlot {
    next_id: u64,
    duration: Duration,
    pending: Option<SlideTransition>,
}

impl Default for TransitionSlot {
    fn default() -> Self {
        Self::new(DEFAULT_SLIDE_DURATION)
    }
}

impl TransitionSlot {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            next_id: 0,
            duration,
            pending: None,
        }
    }

    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Issue a transition from `from` to `to`, superseding any pending one.
    pub fn begin(&mut self, from: f64, to: f64) -> TransitionId {
        self.next_id += 1;
        let id = TransitionId(self.next_id);
        if let Some(previous) = self.pending.replace(SlideTransition::new(id, from, to, self.duration)) {
            tracing::trace!(superseded = previous.id.get(), by = id.get(), "transition superseded");
        }
        id
    }

    /// Advance the pending transition. Returns its id if it finished.
    pub fn tick(&mut self, dt: Duration) -> Option<TransitionId> {
        let slide = self.pending.as_mut()?;
        slide.tick(dt);
        if slide.is_complete() {
            return self.pending.take().map(|slide| slide.id);
        }
        None
    }

    /// Report that transition `id` finished. Returns `false` for stale ids.
    pub fn complete(&mut self, id: TransitionId) -> bool {
        match self.pending {
            Some(slide) if slide.id == id => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Report that whatever is pending finished.
    pub fn complete_current(&mut self) -> Option<TransitionId> {
        self.pending.take().map(|slide| slide.id)
    }

    /// Drop the pending transition without completing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    #[must_use]
    pub fn pending(&self) -> Option<&SlideTransition> {
        self.pending.as_ref()
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending.is_none()
    }
}
