#![forbid(unsafe_code)]

//! Navigation model: the ordered item collection and its transitions.
//!
//! [`NavigationModel`] owns the single-active-item slot, the per-item visited
//! flags, the derived layout metrics, and the completion predicate. It never
//! renders; observers learn about transitions by draining [`ModelEvent`]s.
//!
//! # Invariants
//!
//! 1. Once an item has been activated, exactly one item is active.
//!    All activation goes through [`NavigationModel::set_active_item`] or
//!    [`NavigationModel::step_active`]; out-of-range requests are ignored.
//! 2. `VISITED` is monotonic per item. [`NavigationModel::toggle_visited`]
//!    refuses `false`; only [`NavigationModel::reset_all_active_and_visited`]
//!    clears it.
//! 3. `item_width * count == 100` and `total_width == 100 * count` after every
//!    call to [`NavigationModel::recompute_layout_metrics`] (run on build).
//!
//! # Events
//!
//! Transitions queue events rather than invoking closures, mirroring the
//! drained-event pattern used for animation milestones. Deactivation is
//! queued before activation so observers that react only to
//! `active == true` see the new item last.

use tracing::{debug, trace, warn};

use crate::item::{Item, ItemContent, ItemFlags};
use crate::viewport::ScreenSize;

/// A transition observed on the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelEvent {
    /// An item's active flag changed (or was re-broadcast on re-entry).
    ActiveChanged { index: usize, active: bool },
    /// An item's visited flag changed.
    VisitedChanged { index: usize, visited: bool },
}

/// Slide geometry in percentage units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMetrics {
    /// Width of one item as a percentage of the slider track.
    pub item_width: f64,
    /// Width of the slider track as a percentage of the viewport.
    pub total_width: f64,
}

impl LayoutMetrics {
    /// Metrics for `count` items. An empty collection has zero-width track.
    #[must_use]
    pub fn for_count(count: usize) -> Self {
        if count == 0 {
            return Self {
                item_width: 0.0,
                total_width: 0.0,
            };
        }
        let count = count as f64;
        Self {
            item_width: 100.0 / count,
            total_width: 100.0 * count,
        }
    }
}

/// Component-level text, kept alongside the items so the alternate
/// presentation can restore what the sliding presentation overrode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentText {
    pub body: String,
    pub instruction: String,
    pub mobile_instruction: Option<String>,
    pub original_body: Option<String>,
    pub original_instruction: Option<String>,
}

/// Aggregate over the narrative items.
#[derive(Debug, Clone)]
pub struct NavigationModel {
    items: Vec<Item>,
    text: ComponentText,
    metrics: LayoutMetrics,
    desktop: bool,
    overlay_open: bool,
    was_alternate: bool,
    reset_on_revisit: bool,
    events: Vec<ModelEvent>,
}

impl NavigationModel {
    /// Build a model from authored item content, in display order.
    #[must_use]
    pub fn new(contents: impl IntoIterator<Item = ItemContent>) -> Self {
        let items: Vec<Item> = contents
            .into_iter()
            .enumerate()
            .map(|(index, content)| Item::new(index, content))
            .collect();
        let mut model = Self {
            items,
            text: ComponentText::default(),
            metrics: LayoutMetrics::for_count(0),
            desktop: false,
            overlay_open: false,
            was_alternate: false,
            reset_on_revisit: false,
            events: Vec::new(),
        };
        model.recompute_layout_metrics();
        model
    }

    /// Set whether the widget was authored as the alternate presentation.
    #[must_use]
    pub fn with_alternate_origin(mut self, was_alternate: bool) -> Self {
        self.was_alternate = was_alternate;
        self
    }

    /// Set whether re-entering the widget clears all progress.
    #[must_use]
    pub fn with_reset_on_revisit(mut self, reset: bool) -> Self {
        self.reset_on_revisit = reset;
        self
    }

    /// Attach component-level text.
    #[must_use]
    pub fn with_text(mut self, text: ComponentText) -> Self {
        self.text = text;
        self
    }

    // -- Queries ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn item(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    /// The active item, or `None` before initialization or when empty.
    #[must_use]
    pub fn active_item(&self) -> Option<&Item> {
        self.items.iter().find(|item| item.is_active())
    }

    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        self.active_item().map(Item::index)
    }

    #[must_use]
    pub fn last_index(&self) -> Option<usize> {
        self.items.len().checked_sub(1)
    }

    #[must_use]
    pub const fn metrics(&self) -> LayoutMetrics {
        self.metrics
    }

    #[must_use]
    pub fn text(&self) -> &ComponentText {
        &self.text
    }

    #[must_use]
    pub const fn is_desktop(&self) -> bool {
        self.desktop
    }

    #[must_use]
    pub const fn is_overlay_open(&self) -> bool {
        self.overlay_open
    }

    #[must_use]
    pub const fn was_alternate_presentation(&self) -> bool {
        self.was_alternate
    }

    #[must_use]
    pub const fn reset_on_revisit(&self) -> bool {
        self.reset_on_revisit
    }

    /// Completion predicate: every item visited.
    ///
    /// Vacuously `true` for an empty collection.
    #[must_use]
    pub fn are_all_items_completed(&self) -> bool {
        self.items.iter().all(Item::is_visited)
    }

    /// Number of visited items.
    #[must_use]
    pub fn visited_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_visited()).count()
    }

    // -- Transitions ------------------------------------------------------

    /// Make `index` the single active item.
    ///
    /// Indices outside `0..len` are ignored and leave the current active item
    /// untouched. Returns the new active index when the transition applied.
    /// Visited flags are not modified.
    pub fn set_active_item(&mut self, index: usize) -> Option<usize> {
        if index >= self.items.len() {
            debug!(index, count = self.items.len(), "activation out of range ignored");
            return None;
        }

        if let Some(previous) = self.active_index() {
            self.items[previous].set_flag(ItemFlags::ACTIVE, false);
            self.events.push(ModelEvent::ActiveChanged {
                index: previous,
                active: false,
            });
        }
        self.items[index].set_flag(ItemFlags::ACTIVE, true);
        self.events.push(ModelEvent::ActiveChanged {
            index,
            active: true,
        });
        trace!(index, "item activated");
        Some(index)
    }

    /// Move the active item by `delta` positions.
    ///
    /// Results below zero or past the last item are ignored, the same as an
    /// out-of-range [`set_active_item`](Self::set_active_item). Without an
    /// active item there is nothing to step from.
    pub fn step_active(&mut self, delta: isize) -> Option<usize> {
        let Some(current) = self.active_index() else {
            debug!(delta, "step without active item ignored");
            return None;
        };
        match current.checked_add_signed(delta) {
            Some(target) => self.set_active_item(target),
            None => {
                debug!(current, delta, "activation before first item ignored");
                None
            }
        }
    }

    /// Set an item's visited flag.
    ///
    /// Visited is monotonic: `value == false` is refused (use
    /// [`reset_all_active_and_visited`](Self::reset_all_active_and_visited)).
    /// Returns whether the flag changed.
    pub fn toggle_visited(&mut self, index: usize, value: bool) -> bool {
        if !value {
            warn!(index, "refusing to clear visited flag outside a full reset");
            return false;
        }
        let Some(item) = self.items.get_mut(index) else {
            debug!(index, "visited toggle out of range ignored");
            return false;
        };
        let changed = item.set_flag(ItemFlags::VISITED, true);
        if changed {
            self.events.push(ModelEvent::VisitedChanged {
                index,
                visited: true,
            });
        }
        changed
    }

    /// Clear every active and visited flag.
    pub fn reset_all_active_and_visited(&mut self) {
        for item in &mut self.items {
            if item.is_visited() {
                self.events.push(ModelEvent::VisitedChanged {
                    index: item.index(),
                    visited: false,
                });
            }
            item.clear_flags();
        }
        debug!(count = self.items.len(), "active and visited flags reset");
    }

    /// Apply the reset-on-revisit policy for a widget (re)entry.
    ///
    /// Returns whether a reset happened.
    pub fn reset_for_revisit(&mut self) -> bool {
        if !self.reset_on_revisit {
            return false;
        }
        self.reset_all_active_and_visited();
        true
    }

    /// Recalculate slide geometry from the current item count.
    pub fn recompute_layout_metrics(&mut self) {
        self.metrics = LayoutMetrics::for_count(self.items.len());
    }

    /// Record the latest viewport classification. Returns whether the
    /// desktop flag changed.
    pub fn apply_screen_size(&mut self, size: ScreenSize) -> bool {
        let desktop = size.is_large();
        let changed = desktop != self.desktop;
        self.desktop = desktop;
        changed
    }

    /// Mirror the overlay service state.
    pub fn set_overlay_open(&mut self, open: bool) {
        self.overlay_open = open;
    }

    /// Queue an `ActiveChanged { active: true }` for the current active item.
    ///
    /// Re-entry does not produce a transition by itself, so the controller
    /// asks for one to replay the stage. Returns the re-broadcast index.
    pub fn rebroadcast_active(&mut self) -> Option<usize> {
        let index = self.active_index()?;
        self.events.push(ModelEvent::ActiveChanged {
            index,
            active: true,
        });
        Some(index)
    }

    /// Drain all queued events. Events are not replayed.
    pub fn drain_events(&mut self) -> Vec<ModelEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn pending_event_count(&self) -> usize {
        self.events.len()
    }

    /// Content of every item in display order.
    #[must_use]
    pub fn contents(&self) -> Vec<ItemContent> {
        self.items.iter().map(|item| item.content().clone()).collect()
    }
}
