#![forbid(unsafe_code)]

//! Completion bookkeeping.
//!
//! [`CompletionLatch`] turns a level ("all items visited") into a single
//! edge so downstream listeners see one `AllItemsCompleted` per completion.
//! [`InviewTracker`] implements the in-view criterion: the component counts
//! as seen once both its top and bottom have been visible, in any order.

use crate::input::InviewPart;

/// Fires once per false-to-true transition of the completion predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionLatch {
    fired: bool,
}

impl CompletionLatch {
    /// Feed the current predicate value. Returns `true` exactly when the
    /// latch fires.
    pub fn observe(&mut self, complete: bool) -> bool {
        if complete && !self.fired {
            self.fired = true;
            return true;
        }
        if !complete {
            self.fired = false;
        }
        false
    }

    #[must_use]
    pub const fn has_fired(&self) -> bool {
        self.fired
    }
}

/// Tracks top/bottom visibility for the in-view completion criterion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InviewTracker {
    attached: bool,
    top: bool,
    bottom: bool,
}

impl InviewTracker {
    /// Start listening.
    pub fn attach(&mut self) {
        self.attached = true;
    }

    /// Stop listening; further observations are ignored.
    pub fn detach(&mut self) {
        self.attached = false;
    }

    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.attached
    }

    /// Record a visibility report. Returns `true` when the component has now
    /// been fully seen; the tracker detaches itself at that point.
    pub fn observe(&mut self, visible: bool, part: InviewPart) -> bool {
        if !self.attached || !visible {
            return false;
        }
        match part {
            InviewPart::Top => self.top = true,
            InviewPart::Bottom => self.bottom = true,
            InviewPart::Both => {
                self.top = true;
                self.bottom = true;
            }
        }
        if self.top && self.bottom {
            self.detach();
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_fires_once_per_edge() {
        let mut latch = CompletionLatch::default();
        assert!(!latch.observe(false));
        assert!(latch.observe(true));
        assert!(!latch.observe(true));
        assert!(latch.has_fired());
        assert!(!latch.observe(false));
        assert!(latch.observe(true));
    }

    #[test]
    fn inview_needs_top_and_bottom() {
        let mut tracker = InviewTracker::default();
        tracker.attach();
        assert!(!tracker.observe(true, InviewPart::Top));
        assert!(!tracker.observe(false, InviewPart::Bottom));
        assert!(tracker.observe(true, InviewPart::Bottom));
        assert!(!tracker.is_attached());
        assert!(!tracker.observe(true, InviewPart::Both));
    }

    #[test]
    fn inview_ignored_until_attached() {
        let mut tracker = InviewTracker::default();
        assert!(!tracker.observe(true, InviewPart::Both));
        tracker.attach();
        assert!(tracker.observe(true, InviewPart::Both));
    }
}
