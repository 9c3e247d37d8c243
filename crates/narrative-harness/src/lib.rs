#![forbid(unsafe_code)]

//! Deterministic host environment for exercising the narrative widget.
//!
//! - [`TestEnv`] builds a [`Services`] bundle out of recording doubles so
//!   tests can drive the controller and inspect every outbound call.
//! - [`capture`] installs a `tracing` layer that records events and spans.
//!
//! # Quick Start
//!
//! ```
//! use narrative_core::viewport::ScreenSize;
//! use narrative_harness::TestEnv;
//! use narrative_widgets::NarrativeController;
//!
//! let env = TestEnv::new(ScreenSize::Large);
//! let mut controller = NarrativeController::new(
//!     TestEnv::model(4),
//!     Default::default(),
//!     env.services(),
//! );
//! controller.initialize();
//! assert_eq!(controller.stage().summary(), "_[*...]>");
//! ```

pub mod capture;
pub mod doubles;

use std::rc::Rc;
use std::time::Duration;

use narrative_core::config::ReadingDirection;
use narrative_core::item::ItemContent;
use narrative_core::model::NavigationModel;
use narrative_core::viewport::ScreenSize;
use narrative_widgets::presentation::ComponentStore;
use narrative_widgets::services::{Services, Signal};

pub use doubles::{FixedViewport, OverlayRequest, RecordingOverlay, RecordingSignals, StaticConfig};

/// A recording host environment.
#[derive(Debug, Clone)]
pub struct TestEnv {
    pub viewport: Rc<FixedViewport>,
    pub config: Rc<StaticConfig>,
    pub overlay: Rc<RecordingOverlay>,
    pub signals: Rc<RecordingSignals>,
    pub components: Rc<ComponentStore>,
}

impl TestEnv {
    /// Environment reporting `size`, with animation on, left-to-right
    /// reading, and the hotgraphic panel registered.
    #[must_use]
    pub fn new(size: ScreenSize) -> Self {
        Self {
            viewport: Rc::new(FixedViewport::new(size)),
            config: Rc::new(StaticConfig::default()),
            overlay: Rc::new(RecordingOverlay::default()),
            signals: Rc::new(RecordingSignals::default()),
            components: Rc::new(ComponentStore::with_hotgraphic()),
        }
    }

    #[must_use]
    pub fn with_animation_disabled(mut self) -> Self {
        self.config = Rc::new(StaticConfig {
            animation_disabled: true,
            ..*self.config
        });
        self
    }

    #[must_use]
    pub fn with_direction(mut self, direction: ReadingDirection) -> Self {
        self.config = Rc::new(StaticConfig {
            direction,
            ..*self.config
        });
        self
    }

    #[must_use]
    pub fn with_slide_duration(mut self, slide: Duration) -> Self {
        self.config = Rc::new(StaticConfig {
            slide,
            ..*self.config
        });
        self
    }

    /// Drop every registered alternate presentation.
    #[must_use]
    pub fn without_components(mut self) -> Self {
        self.components = Rc::new(ComponentStore::new());
        self
    }

    /// The capability bundle. Every call shares the same doubles.
    #[must_use]
    pub fn services(&self) -> Services {
        Services {
            viewport: self.viewport.clone(),
            config: self.config.clone(),
            overlay: self.overlay.clone(),
            signals: self.signals.clone(),
            components: self.components.clone(),
        }
    }

    /// Change what the viewport reports on the next classification.
    pub fn resize(&self, size: ScreenSize) {
        self.viewport.set(size);
    }

    #[must_use]
    pub fn signals(&self) -> Vec<Signal> {
        self.signals.all()
    }

    #[must_use]
    pub fn overlays(&self) -> Vec<OverlayRequest> {
        self.overlay.requests()
    }

    /// `count` items titled `Item {i}` with body `Body {i}`.
    #[must_use]
    pub fn contents(count: usize) -> Vec<ItemContent> {
        (0..count)
            .map(|i| ItemContent::new(format!("Item {i}"), format!("Body {i}")))
            .collect()
    }

    #[must_use]
    pub fn model(count: usize) -> NavigationModel {
        NavigationModel::new(Self::contents(count))
    }
}
