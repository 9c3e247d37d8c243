#![forbid(unsafe_code)]

//! Pinned-hotspot panel used on large viewports for narratives authored as
//! hotgraphics.
//!
//! Every item is a pin over a single graphic. Selecting a pin activates the
//! item, marks it visited and opens its detail overlay; the overlay's own
//! previous/next controls step through items the same way. Completion is
//! re-evaluated when the overlay closes.

use narrative_core::config::CompletionCriterion;
use narrative_core::model::NavigationModel;
use tracing::{debug, info};

use crate::completion::{CompletionLatch, InviewTracker};
use crate::input::{EnvironmentSignal, NarrativeInput};
use crate::presentation::{AlternatePresentation, HOTGRAPHIC};
use crate::services::{Services, Signal};

#[derive(Debug)]
pub struct HotgraphicPanel {
    model: NavigationModel,
    criterion: CompletionCriterion,
    services: Services,
    latch: CompletionLatch,
    inview: InviewTracker,
    complete: bool,
}

impl HotgraphicPanel {
    #[must_use]
    pub fn new(model: NavigationModel, criterion: CompletionCriterion, services: Services) -> Self {
        let mut inview = InviewTracker::default();
        if criterion == CompletionCriterion::Inview {
            inview.attach();
        }
        Self {
            model,
            criterion,
            services,
            latch: CompletionLatch::default(),
            inview,
            complete: false,
        }
    }

    fn open_item(&mut self, index: usize) {
        if self.model.set_active_item(index).is_none() {
            return;
        }
        self.model.toggle_visited(index, true);
        self.model.drain_events();

        let Some(item) = self.model.item(index) else {
            return;
        };
        let (title, body) = (item.title().to_owned(), item.body().to_owned());
        self.model.set_overlay_open(true);
        self.services.overlay.open(&title, &body);
    }

    fn step(&mut self, delta: isize) {
        let target = self
            .model
            .active_index()
            .and_then(|index| index.checked_add_signed(delta));
        match target {
            Some(index) => self.open_item(index),
            None => debug!(delta, "hotgraphic step ignored"),
        }
    }

    fn on_overlay_closed(&mut self) {
        self.model.set_overlay_open(false);
        if self.latch.observe(self.model.are_all_items_completed()) {
            info!(count = self.model.len(), "all hotgraphic items completed");
            self.services.signals.emit(Signal::AllItemsCompleted);
            if self.criterion == CompletionCriterion::AllItems {
                self.mark_complete();
            }
        }
    }

    fn mark_complete(&mut self) {
        if !self.complete {
            self.complete = true;
            self.services.signals.emit(Signal::ComponentCompleted);
        }
    }
}

impl AlternatePresentation for HotgraphicPanel {
    fn name(&self) -> &'static str {
        HOTGRAPHIC
    }

    fn model(&self) -> &NavigationModel {
        &self.model
    }

    fn handle_signal(&mut self, signal: EnvironmentSignal) {
        match signal {
            EnvironmentSignal::OverlayClosed => self.on_overlay_closed(),
            EnvironmentSignal::DeviceChanged | EnvironmentSignal::Resized => {
                self.model
                    .apply_screen_size(self.services.viewport.screen_size());
            }
            EnvironmentSignal::Inview { visible, part } => {
                if self.inview.observe(visible, part) {
                    self.mark_complete();
                }
            }
            EnvironmentSignal::TransitionEnd | EnvironmentSignal::AssetsReady => {}
        }
    }

    fn handle_input(&mut self, input: NarrativeInput) {
        match input {
            NarrativeInput::ProgressClicked(index) => self.open_item(index),
            NarrativeInput::NextClicked => self.step(1),
            NarrativeInput::PreviousClicked => self.step(-1),
            NarrativeInput::StraplineTitleClicked => {}
        }
    }

    fn is_complete(&self) -> bool {
        self.complete
    }
}

/// [`PresentationFactory`](crate::presentation::PresentationFactory) for the
/// hotgraphic panel.
pub fn hotgraphic_factory(
    model: NavigationModel,
    criterion: CompletionCriterion,
    services: Services,
) -> Box<dyn AlternatePresentation> {
    Box::new(HotgraphicPanel::new(model, criterion, services))
}
