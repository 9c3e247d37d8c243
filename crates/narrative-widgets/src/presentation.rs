#![forbid(unsafe_code)]

//! Presentation variants and the host that swaps between them.
//!
//! A narrative instance is shown either by the sliding
//! [`NarrativeController`] or by an [`AlternatePresentation`] built from the
//! [`ComponentStore`]. The switch is one-way: once the sliding controller
//! hands over, it is detached and dropped.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use narrative_core::Result;
use narrative_core::config::{CompletionCriterion, NarrativeConfig};
use narrative_core::model::NavigationModel;
use tracing::debug;

use crate::controller::NarrativeController;
use crate::input::{EnvironmentSignal, NarrativeInput};
use crate::services::Services;

/// Registry name of the pinned-hotspot alternate presentation.
pub const HOTGRAPHIC: &str = "hotgraphic";

/// A presentation that can take over from the sliding controller.
pub trait AlternatePresentation: fmt::Debug {
    /// Registry name.
    fn name(&self) -> &'static str;

    fn model(&self) -> &NavigationModel;

    fn handle_signal(&mut self, signal: EnvironmentSignal);

    fn handle_input(&mut self, input: NarrativeInput);

    /// Whether the completion criterion has been met.
    fn is_complete(&self) -> bool;
}

/// Builds an alternate presentation from the prepared model.
pub type PresentationFactory =
    fn(NavigationModel, CompletionCriterion, Services) -> Box<dyn AlternatePresentation>;

/// Alternate presentations available in this build, by name.
#[derive(Debug, Default, Clone)]
pub struct ComponentStore {
    factories: HashMap<String, PresentationFactory>,
}

impl ComponentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with the built-in hotgraphic panel registered.
    #[must_use]
    pub fn with_hotgraphic() -> Self {
        let mut store = Self::new();
        store.register(HOTGRAPHIC, crate::hotgraphic::hotgraphic_factory);
        store
    }

    /// Register `factory` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, factory: PresentationFactory) {
        self.factories.insert(name.into(), factory);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<PresentationFactory> {
        self.factories.get(name).copied()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}

/// What is currently on screen.
#[derive(Debug)]
pub enum Presentation {
    Sliding(NarrativeController),
    AlternatePanel(Box<dyn AlternatePresentation>),
}

impl Presentation {
    #[must_use]
    pub fn model(&self) -> &NavigationModel {
        match self {
            Self::Sliding(controller) => controller.model(),
            Self::AlternatePanel(panel) => panel.model(),
        }
    }
}

/// Owns the active presentation and performs the upgrade hand-off.
#[derive(Debug)]
pub struct NarrativeHost {
    presentation: Presentation,
}

impl NarrativeHost {
    /// Build and initialize the sliding presentation for `config`.
    #[must_use]
    pub fn mount(config: &NarrativeConfig, services: Services) -> Self {
        let mut controller = NarrativeController::from_config(config, services);
        controller.initialize();
        Self {
            presentation: Presentation::Sliding(controller),
        }
    }

    /// Route an environment signal to the active presentation.
    ///
    /// # Errors
    ///
    /// Propagates [`NarrativeError::MissingComponent`](narrative_core::NarrativeError::MissingComponent)
    /// when an upgrade is required but unavailable. The sliding presentation
    /// stays mounted in that case.
    pub fn handle(&mut self, signal: EnvironmentSignal) -> Result<()> {
        match &mut self.presentation {
            Presentation::Sliding(controller) => {
                if let Some(panel) = controller.handle_signal(signal)? {
                    debug!(component = panel.name(), "presentation replaced");
                    self.presentation = Presentation::AlternatePanel(panel);
                }
            }
            Presentation::AlternatePanel(panel) => panel.handle_signal(signal),
        }
        Ok(())
    }

    pub fn input(&mut self, input: NarrativeInput) {
        match &mut self.presentation {
            Presentation::Sliding(controller) => controller.handle_input(input),
            Presentation::AlternatePanel(panel) => panel.handle_input(input),
        }
    }

    /// Advance the slide animation. The alternate panel has none.
    pub fn tick(&mut self, dt: Duration) {
        if let Presentation::Sliding(controller) = &mut self.presentation {
            controller.tick(dt);
        }
    }

    #[must_use]
    pub fn is_upgraded(&self) -> bool {
        matches!(self.presentation, Presentation::AlternatePanel(_))
    }

    #[must_use]
    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    #[must_use]
    pub fn model(&self) -> &NavigationModel {
        self.presentation.model()
    }

    /// The sliding controller, unless the host has upgraded.
    #[must_use]
    pub fn controller(&self) -> Option<&NarrativeController> {
        match &self.presentation {
            Presentation::Sliding(controller) => Some(controller),
            Presentation::AlternatePanel(_) => None,
        }
    }
}
