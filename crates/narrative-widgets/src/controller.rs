#![forbid(unsafe_code)]

//! Presentation controller for the sliding narrative.
//!
//! [`NarrativeController`] translates user input and environment signals into
//! [`NavigationModel`] transitions, then replays every queued
//! [`ModelEvent`] into the [`StageView`]. It also owns the viewport
//! classification and the one-way upgrade to the alternate presentation.
//!
//! # Lifecycle
//!
//! ```text
//! new()  ── reset-on-revisit, classify, metrics, default instruction
//!   │
//! initialize() ── activate item 0 (or replay the active item), attach
//!   │             in-view tracking
//!   │
//! handle_input / on_viewport_changed / on_overlay_closed / tick ...
//!   │
//! on_device_family_changed() ──(authored as hotgraphic, now large)──► upgrade
//!   │                                                   (detached for good)
//! into_model() ── hand the model back for the next entry
//! ```
//!
//! # Invariants
//!
//! 1. The controller never writes item flags directly; it calls model
//!    transitions and reacts to the events they queue.
//! 2. Stage application runs fully (markers, panels, controls, completion)
//!    before the slide transition is issued.
//! 3. Focus moves only when the pending transition completes, and never
//!    for the stage applied during initialization. Re-applying a stage whose
//!    offset is already reached issues no transition.
//! 4. Once detached, every entry point is a no-op.

use std::time::Duration;

use narrative_core::config::{CompletionCriterion, NarrativeConfig};
use narrative_core::model::{ModelEvent, NavigationModel};
use narrative_core::transition::{TransitionId, TransitionSlot};
use narrative_core::{NarrativeError, Result};
use tracing::{debug, debug_span, error, info, trace};

use crate::completion::{CompletionLatch, InviewTracker};
use crate::input::{EnvironmentSignal, InviewPart, NarrativeInput};
use crate::presentation::{AlternatePresentation, HOTGRAPHIC};
use crate::services::{FocusTarget, Services, Signal};
use crate::stage::StageView;

/// Drives the sliding presentation of one narrative instance.
#[derive(Debug)]
pub struct NarrativeController {
    model: NavigationModel,
    services: Services,
    criterion: CompletionCriterion,
    stage: StageView,
    transitions: TransitionSlot,
    latch: CompletionLatch,
    inview: InviewTracker,
    initial: bool,
    initialized: bool,
    detached: bool,
    ready: bool,
}

impl NarrativeController {
    /// Prepare a controller for `model`.
    ///
    /// Applies the reset-on-revisit policy, classifies the viewport and
    /// computes layout metrics. Nothing is activated until
    /// [`initialize`](Self::initialize).
    #[must_use]
    pub fn new(mut model: NavigationModel, criterion: CompletionCriterion, services: Services) -> Self {
        model.apply_screen_size(services.viewport.screen_size());
        if model.reset_for_revisit() {
            debug!(count = model.len(), "progress reset on revisit");
        }
        model.recompute_layout_metrics();
        model.drain_events();

        let mut stage = StageView::new(model.len());
        for item in model.items() {
            stage.set_marker_visited(item.index(), item.is_visited());
        }
        stage.set_animation_disabled(services.config.animation_disabled());

        let mut controller = Self {
            transitions: TransitionSlot::new(services.config.slide_duration()),
            model,
            services,
            criterion,
            stage,
            latch: CompletionLatch::default(),
            inview: InviewTracker::default(),
            initial: true,
            initialized: false,
            detached: false,
            ready: false,
        };
        controller.replace_instructions();
        controller
    }

    /// Build the model from authored configuration and prepare a controller.
    #[must_use]
    pub fn from_config(config: &NarrativeConfig, services: Services) -> Self {
        Self::new(config.build_model(), config.completion, services)
    }

    /// Establish the first stage.
    ///
    /// Activates item 0 when nothing is active; otherwise replays the active
    /// item, since re-entry produces no transition of its own. Empty
    /// collections stay inert.
    pub fn initialize(&mut self) {
        if self.detached {
            return;
        }
        self.model
            .apply_screen_size(self.services.viewport.screen_size());
        if self.model.is_empty() {
            debug!("empty narrative, nothing to initialize");
            return;
        }

        if self.model.active_item().is_none() {
            self.model.set_active_item(0);
        } else {
            self.model.rebroadcast_active();
        }
        self.process_events();

        self.model.recompute_layout_metrics();
        if self.criterion == CompletionCriterion::Inview {
            self.inview.attach();
        }

        self.initial = false;
        self.initialized = true;
        info!(
            count = self.model.len(),
            desktop = self.model.is_desktop(),
            active = ?self.model.active_index(),
            "narrative initialized"
        );
    }

    // -- Environment ------------------------------------------------------

    /// Route an environment signal.
    ///
    /// Returns the replacement presentation when a device change triggered
    /// the upgrade.
    pub fn handle_signal(
        &mut self,
        signal: EnvironmentSignal,
    ) -> Result<Option<Box<dyn AlternatePresentation>>> {
        match signal {
            EnvironmentSignal::DeviceChanged => return self.on_device_family_changed(),
            EnvironmentSignal::Resized => self.on_viewport_changed(),
            EnvironmentSignal::OverlayClosed => self.on_overlay_closed(),
            EnvironmentSignal::TransitionEnd => self.on_transition_end(),
            EnvironmentSignal::AssetsReady => self.on_assets_ready(),
            EnvironmentSignal::Inview { visible, part } => self.on_inview(visible, part),
        }
        Ok(None)
    }

    /// Reclassify the viewport and re-apply the current stage. Idempotent.
    pub fn on_viewport_changed(&mut self) {
        if self.detached {
            return;
        }
        let size = self.services.viewport.screen_size();
        if self.model.apply_screen_size(size) {
            debug!(screen = %size, "viewport class changed");
            self.replace_instructions();
        }
        self.evaluate_navigation();
        if let Some(index) = self.model.active_index() {
            self.apply_stage(index);
            self.process_events();
        }
    }

    /// Handle a discrete device-class change.
    ///
    /// Performs the one-way upgrade when the widget was authored as the
    /// hotgraphic presentation and the viewport is now large; otherwise this
    /// behaves as [`on_viewport_changed`](Self::on_viewport_changed).
    ///
    /// # Errors
    ///
    /// [`NarrativeError::MissingComponent`] when the upgrade is required but
    /// no hotgraphic factory is registered. The controller is left untouched.
    pub fn on_device_family_changed(&mut self) -> Result<Option<Box<dyn AlternatePresentation>>> {
        if self.detached {
            return Ok(None);
        }
        if self.model.was_alternate_presentation()
            && self.services.viewport.screen_size().is_large()
        {
            return self.upgrade().map(Some);
        }
        self.on_viewport_changed();
        Ok(None)
    }

    /// Re-evaluate completion once the overlay is dismissed.
    pub fn on_overlay_closed(&mut self) {
        if self.detached {
            return;
        }
        self.model.set_overlay_open(false);
        self.evaluate_completion();
    }

    /// The host's slide transition finished.
    pub fn on_transition_end(&mut self) {
        if self.detached {
            return;
        }
        if self.transitions.complete_current().is_some() {
            self.move_focus();
        }
    }

    /// Complete a specific transition. Stale ids are ignored.
    pub fn complete_transition(&mut self, id: TransitionId) {
        if self.detached {
            return;
        }
        if self.transitions.complete(id) {
            self.move_focus();
        }
    }

    /// Drive the built-in slide animation.
    pub fn tick(&mut self, dt: Duration) {
        if self.detached {
            return;
        }
        if self.transitions.tick(dt).is_some() {
            self.move_focus();
        }
    }

    /// Slide graphics finished loading.
    pub fn on_assets_ready(&mut self) {
        if self.detached || self.ready {
            return;
        }
        self.ready = true;
        self.services.signals.emit(Signal::Ready);
    }

    /// Visibility report for the in-view completion criterion.
    pub fn on_inview(&mut self, visible: bool, part: InviewPart) {
        if self.detached {
            return;
        }
        if self.inview.observe(visible, part) {
            debug!("component fully in view");
            self.services.signals.emit(Signal::ComponentCompleted);
        }
    }

    // -- User input -------------------------------------------------------

    /// Apply one user interaction. Navigation requests funnel through the
    /// model's bounds-checked setters, so clicks past either end are ignored.
    pub fn handle_input(&mut self, input: NarrativeInput) {
        if self.detached {
            return;
        }
        trace!(?input, "narrative input");
        match input {
            NarrativeInput::NextClicked => {
                self.model.step_active(1);
            }
            NarrativeInput::PreviousClicked => {
                self.model.step_active(-1);
            }
            NarrativeInput::ProgressClicked(index) => {
                self.model.set_active_item(index);
            }
            NarrativeInput::StraplineTitleClicked => self.open_overlay(),
        }
        self.process_events();
    }

    /// Open the detail overlay for the active item, marking it visited.
    pub fn open_overlay(&mut self) {
        if self.detached {
            return;
        }
        let Some(item) = self.model.active_item() else {
            debug!("overlay requested without active item");
            return;
        };
        let index = item.index();
        let title = item.title().to_owned();
        let body = item.body().to_owned();

        self.model.toggle_visited(index, true);
        self.model.set_overlay_open(true);
        self.process_events();
        self.services.overlay.open(&title, &body);
    }

    // -- Stage ------------------------------------------------------------

    /// Apply every visual effect for `index` becoming active. Anything but
    /// the model's active item is ignored.
    fn apply_stage(&mut self, index: usize) {
        if self.detached || self.model.active_index() != Some(index) {
            trace!(index, active = ?self.model.active_index(), "stage for inactive item ignored");
            return;
        }
        let span = debug_span!("narrative_stage", index);
        let _guard = span.enter();

        if self.model.is_desktop() && self.model.toggle_visited(index, true) {
            self.stage.set_marker_visited(index, true);
        }

        self.stage.select_marker(index);
        self.stage.enable_controls_for(index);
        self.stage.show_panel(index);
        self.stage.enable_title_for(index);
        self.replace_instructions();

        self.evaluate_navigation();
        self.evaluate_completion();
        self.move_slider_to(index);
    }

    fn process_events(&mut self) {
        loop {
            let events = self.model.drain_events();
            if events.is_empty() {
                break;
            }
            for event in events {
                match event {
                    ModelEvent::ActiveChanged {
                        index,
                        active: true,
                    } => self.apply_stage(index),
                    ModelEvent::ActiveChanged { active: false, .. } => {}
                    ModelEvent::VisitedChanged { index, visited } => {
                        self.stage.set_marker_visited(index, visited);
                    }
                }
            }
        }
    }

    fn evaluate_navigation(&mut self) {
        let (Some(active), Some(last)) = (self.model.active_index(), self.model.last_index())
        else {
            return;
        };
        self.stage.set_navigation_hidden(active == 0, active == last);
    }

    fn evaluate_completion(&mut self) {
        if self.latch.observe(self.model.are_all_items_completed()) {
            info!(count = self.model.len(), "all narrative items completed");
            self.services.signals.emit(Signal::AllItemsCompleted);
            if self.criterion == CompletionCriterion::AllItems {
                self.services.signals.emit(Signal::ComponentCompleted);
            }
        }
    }

    fn move_slider_to(&mut self, index: usize) {
        let direction = self.services.config.reading_direction();
        let offset = self.model.metrics().item_width * index as f64 * direction.offset_sign();
        let from = self.slider_position();
        self.stage.set_offset(offset);

        if self.initial {
            self.transitions.cancel();
            return;
        }
        let settled = match self.transitions.pending() {
            Some(slide) => slide.target() == offset,
            None => from == offset,
        };
        if settled {
            trace!(to = offset, "slider already at target");
            return;
        }
        if self.services.config.animation_disabled() {
            self.transitions.cancel();
            self.move_focus();
            return;
        }
        let id = self.transitions.begin(from, offset);
        trace!(transition = id.get(), from, to = offset, "slide issued");
    }

    fn move_focus(&mut self) {
        if self.initial {
            return;
        }
        let Some(index) = self.model.active_index() else {
            return;
        };
        let target = if self.model.is_desktop() {
            FocusTarget::Panel(index)
        } else {
            FocusTarget::StraplineTitle
        };
        self.stage.set_focus(target);
        self.services.signals.emit(Signal::FocusMoved(target));
    }

    fn replace_instructions(&mut self) {
        let instruction = self.current_instruction();
        self.stage.set_instruction(instruction);
    }

    /// `instruction` by default. Narrow viewports prefer the active item's
    /// mobile override, then the component's, unless authored as hotgraphic.
    fn current_instruction(&self) -> Option<String> {
        let text = self.model.text();
        if !self.model.is_desktop() && !self.model.was_alternate_presentation() {
            let mobile = self
                .model
                .active_item()
                .and_then(|item| item.content().mobile_instruction.clone())
                .or_else(|| text.mobile_instruction.clone());
            if mobile.is_some() {
                return mobile;
            }
        }
        (!text.instruction.is_empty()).then(|| text.instruction.clone())
    }

    // -- Upgrade ----------------------------------------------------------

    fn upgrade(&mut self) -> Result<Box<dyn AlternatePresentation>> {
        let Some(factory) = self.services.components.get(HOTGRAPHIC) else {
            error!(component = HOTGRAPHIC, "alternate presentation missing from build");
            return Err(NarrativeError::MissingComponent {
                name: HOTGRAPHIC.to_owned(),
            });
        };

        let model = self.prepare_alternate_model();
        let presentation = factory(model, self.criterion, self.services.clone());
        self.detach();

        self.services
            .signals
            .emit(Signal::AccessibilityRefreshRequested);
        self.services.signals.emit(Signal::ViewportRefreshRequested);
        info!(component = HOTGRAPHIC, "narrative upgraded to alternate presentation");
        Ok(presentation)
    }

    /// The model handed to the alternate presentation: same items, progress
    /// cleared, overlay closed, and authored text restored.
    fn prepare_alternate_model(&self) -> NavigationModel {
        let mut text = self.model.text().clone();
        if let Some(body) = text.original_body.clone() {
            text.body = body;
        }
        if let Some(instruction) = text.original_instruction.clone() {
            text.instruction = instruction;
        }

        let mut model = self.model.clone().with_text(text);
        model.reset_all_active_and_visited();
        model.set_overlay_open(false);
        model.drain_events();
        model
    }

    /// Stop responding to every signal and input.
    pub fn detach(&mut self) {
        if self.detached {
            return;
        }
        self.detached = true;
        self.inview.detach();
        self.transitions.cancel();
        debug!("narrative detached");
    }

    // -- Accessors --------------------------------------------------------

    #[must_use]
    pub fn model(&self) -> &NavigationModel {
        &self.model
    }

    #[must_use]
    pub fn stage(&self) -> &StageView {
        &self.stage
    }

    #[must_use]
    pub const fn criterion(&self) -> CompletionCriterion {
        self.criterion
    }

    #[must_use]
    pub const fn is_detached(&self) -> bool {
        self.detached
    }

    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether a slide transition is waiting for completion.
    #[must_use]
    pub fn has_pending_transition(&self) -> bool {
        !self.transitions.is_idle()
    }

    /// Current slider position, interpolated while a transition runs.
    #[must_use]
    pub fn slider_position(&self) -> f64 {
        self.transitions
            .pending()
            .map_or(self.stage.offset(), |slide| slide.position())
    }

    /// Hand the model back, e.g. to mount a fresh controller on re-entry.
    #[must_use]
    pub fn into_model(mut self) -> NavigationModel {
        self.model.drain_events();
        self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{TestServices, contents};
    use narrative_core::config::ReadingDirection;
    use narrative_core::viewport::ScreenSize;

    fn controller(count: usize, size: ScreenSize) -> (NarrativeController, TestServices) {
        let env = TestServices::new(size);
        let model = NavigationModel::new(contents(count));
        let controller = NarrativeController::new(model, CompletionCriterion::AllItems, env.services());
        (controller, env)
    }

    #[test]
    fn initialize_activates_first_item_without_focus() {
        let (mut c, env) = controller(4, ScreenSize::Large);
        c.initialize();
        assert_eq!(c.model().active_index(), Some(0));
        assert_eq!(c.stage().selected_marker(), Some(0));
        assert!(c.stage().left_control_hidden());
        assert!(!c.stage().right_control_hidden());
        assert!(c.stage().focus().is_none());
        assert!(!c.has_pending_transition());
        assert!(env.signals().is_empty());
    }

    #[test]
    fn initialize_empty_is_inert() {
        let (mut c, env) = controller(0, ScreenSize::Large);
        c.initialize();
        assert!(c.model().active_item().is_none());
        assert!(!c.is_initialized());
        assert!(env.signals().is_empty());
    }

    #[test]
    fn desktop_activation_marks_visited() {
        let (mut c, _env) = controller(3, ScreenSize::Large);
        c.initialize();
        c.handle_input(NarrativeInput::NextClicked);
        assert!(c.model().item(1).unwrap().is_visited());
        assert!(c.stage().is_marker_visited(1));
    }

    #[test]
    fn mobile_activation_does_not_mark_visited() {
        let (mut c, _env) = controller(3, ScreenSize::Small);
        c.initialize();
        c.handle_input(NarrativeInput::NextClicked);
        assert_eq!(c.model().visited_count(), 0);
    }

    #[test]
    fn previous_at_start_is_ignored() {
        let (mut c, _env) = controller(3, ScreenSize::Large);
        c.initialize();
        c.handle_input(NarrativeInput::PreviousClicked);
        assert_eq!(c.model().active_index(), Some(0));
    }

    #[test]
    fn focus_waits_for_transition_end() {
        let (mut c, env) = controller(3, ScreenSize::Large);
        c.initialize();
        c.handle_input(NarrativeInput::NextClicked);
        assert!(c.has_pending_transition());
        assert!(c.stage().focus().is_none());
        c.on_transition_end();
        assert_eq!(c.stage().focus(), Some(FocusTarget::Panel(1)));
        assert_eq!(env.signals(), vec![Signal::FocusMoved(FocusTarget::Panel(1))]);
    }

    #[test]
    fn tick_completes_transition() {
        let (mut c, _env) = controller(3, ScreenSize::Small);
        c.initialize();
        c.handle_input(NarrativeInput::ProgressClicked(2));
        c.tick(Duration::from_millis(100));
        assert!(c.has_pending_transition());
        c.tick(Duration::from_millis(500));
        assert!(!c.has_pending_transition());
        assert_eq!(c.stage().focus(), Some(FocusTarget::StraplineTitle));
    }

    #[test]
    fn rtl_offset_is_positive() {
        let env = TestServices::new(ScreenSize::Large).with_direction(ReadingDirection::Rtl);
        let mut c = NarrativeController::new(
            NavigationModel::new(contents(4)),
            CompletionCriterion::AllItems,
            env.services(),
        );
        c.initialize();
        c.handle_input(NarrativeInput::ProgressClicked(2));
        assert_eq!(c.stage().offset(), 50.0);
    }

    #[test]
    fn instructions_follow_viewport_class() {
        let env = TestServices::new(ScreenSize::Small);
        let config = NarrativeConfig::from_json_str(
            r#"{"instruction":"Use arrows","mobileInstruction":"Tap title",
                "_items":[{"title":"a"},{"title":"b"}]}"#,
        )
        .unwrap();
        let mut c = NarrativeController::from_config(&config, env.services());
        c.initialize();
        assert_eq!(c.stage().instruction(), Some("Tap title"));

        env.set_screen_size(ScreenSize::Large);
        c.on_viewport_changed();
        assert_eq!(c.stage().instruction(), Some("Use arrows"));
    }

    #[test]
    fn desktop_mount_installs_default_instruction() {
        let env = TestServices::new(ScreenSize::Large);
        let config = NarrativeConfig::from_json_str(
            r#"{"instruction":"Use arrows","mobileInstruction":"Tap title",
                "_items":[{"title":"a"},{"title":"b"}]}"#,
        )
        .unwrap();
        let mut c = NarrativeController::from_config(&config, env.services());
        assert_eq!(c.stage().instruction(), Some("Use arrows"));
        c.initialize();
        assert_eq!(c.stage().instruction(), Some("Use arrows"));
    }

    #[test]
    fn narrow_viewport_without_override_keeps_default_instruction() {
        let env = TestServices::new(ScreenSize::Medium);
        let config = NarrativeConfig::from_json_str(
            r#"{"instruction":"Use arrows","_items":[{"title":"a"}]}"#,
        )
        .unwrap();
        let mut c = NarrativeController::from_config(&config, env.services());
        c.initialize();
        assert_eq!(c.stage().instruction(), Some("Use arrows"));
    }

    #[test]
    fn item_mobile_instruction_follows_active_item() {
        let env = TestServices::new(ScreenSize::Small);
        let config = NarrativeConfig::from_json_str(
            r#"{"instruction":"Use arrows","mobileInstruction":"Tap title",
                "_items":[{"title":"a"},{"title":"b","mobileInstruction":"Tap for b"}]}"#,
        )
        .unwrap();
        let mut c = NarrativeController::from_config(&config, env.services());
        c.initialize();
        assert_eq!(c.stage().instruction(), Some("Tap title"));

        c.handle_input(NarrativeInput::NextClicked);
        assert_eq!(c.stage().instruction(), Some("Tap for b"));

        env.set_screen_size(ScreenSize::Large);
        c.on_viewport_changed();
        assert_eq!(c.stage().instruction(), Some("Use arrows"));
    }

    #[test]
    fn hotgraphic_origin_skips_mobile_instruction() {
        let env = TestServices::new(ScreenSize::Small);
        let config = NarrativeConfig::from_json_str(
            r#"{"_wasHotgraphic":true,"instruction":"Select a pin","mobileInstruction":"Tap title",
                "_items":[{"title":"a","mobileInstruction":"Tap a"}]}"#,
        )
        .unwrap();
        let mut c = NarrativeController::from_config(&config, env.services());
        c.initialize();
        assert_eq!(c.stage().instruction(), Some("Select a pin"));
    }

    #[test]
    fn stage_for_inactive_item_is_ignored() {
        let (mut c, env) = controller(3, ScreenSize::Large);
        c.initialize();
        c.apply_stage(2);
        assert_eq!(c.model().active_index(), Some(0));
        assert_eq!(c.stage().selected_marker(), Some(0));
        assert_eq!(c.stage().visible_panel(), Some(0));
        assert!(!c.model().item(2).unwrap().is_visited());
        assert!(!c.stage().is_marker_visited(2));
        assert!(!c.has_pending_transition());
        assert!(env.signals().is_empty());
    }

    #[test]
    fn restaging_at_current_offset_keeps_focus() {
        let (mut c, env) = controller(3, ScreenSize::Large);
        c.initialize();
        c.on_viewport_changed();
        c.on_viewport_changed();
        assert!(!c.has_pending_transition());
        c.tick(Duration::from_secs(1));
        c.on_transition_end();
        assert!(c.stage().focus().is_none());
        assert!(env.signals().is_empty());
    }

    #[test]
    fn assets_ready_emits_once() {
        let (mut c, env) = controller(2, ScreenSize::Large);
        c.on_assets_ready();
        c.on_assets_ready();
        assert_eq!(env.signals(), vec![Signal::Ready]);
    }

    #[test]
    fn inview_criterion_completes_component() {
        let env = TestServices::new(ScreenSize::Large);
        let mut c = NarrativeController::new(
            NavigationModel::new(contents(2)),
            CompletionCriterion::Inview,
            env.services(),
        );
        c.initialize();
        c.on_inview(true, InviewPart::Top);
        assert!(env.signals().is_empty());
        c.on_inview(true, InviewPart::Bottom);
        assert_eq!(env.signals(), vec![Signal::ComponentCompleted]);
    }

    #[test]
    fn upgrade_without_component_is_fatal_and_leaves_controller_attached() {
        let env = TestServices::new(ScreenSize::Small).without_components();
        let model = NavigationModel::new(contents(2)).with_alternate_origin(true);
        let mut c = NarrativeController::new(model, CompletionCriterion::AllItems, env.services());
        c.initialize();
        env.set_screen_size(ScreenSize::Large);
        let err = c.on_device_family_changed().unwrap_err();
        assert!(err.is_fatal());
        assert!(!c.is_detached());
    }
}
