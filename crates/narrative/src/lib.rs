#![forbid(unsafe_code)]

//! Paginated narrative widget.
//!
//! This crate re-exports the navigation model, the presentation controller
//! and the host capability traits, and offers a prelude for embedding the
//! widget.

use std::path::Path;

// --- Core re-exports -------------------------------------------------------

pub use narrative_core::config::{
    CompletionCriterion, CourseConfig, NarrativeConfig, ReadingDirection,
};
pub use narrative_core::item::{Graphic, Item, ItemContent};
pub use narrative_core::model::{LayoutMetrics, ModelEvent, NavigationModel};
pub use narrative_core::transition::TransitionId;
pub use narrative_core::viewport::{ScreenBreakpoints, ScreenSize};
pub use narrative_core::{NarrativeError, Result};

// --- Widget re-exports -----------------------------------------------------

pub use narrative_widgets::controller::NarrativeController;
pub use narrative_widgets::hotgraphic::HotgraphicPanel;
pub use narrative_widgets::input::{EnvironmentSignal, InviewPart, NarrativeInput};
pub use narrative_widgets::presentation::{
    AlternatePresentation, ComponentStore, HOTGRAPHIC, NarrativeHost, Presentation,
};
pub use narrative_widgets::services::{
    ConfigProvider, FocusTarget, OverlayService, Services, Signal, SignalSink,
    ViewportClassifier, WidthViewport,
};
pub use narrative_widgets::stage::StageView;

// --- Mounting --------------------------------------------------------------

/// Parse a component document and mount it.
pub fn mount_json(json: &str, services: Services) -> Result<NarrativeHost> {
    let config = NarrativeConfig::from_json_str(json)?;
    Ok(NarrativeHost::mount(&config, services))
}

/// Read a component document from disk and mount it.
pub fn mount_path(path: impl AsRef<Path>, services: Services) -> Result<NarrativeHost> {
    let config = NarrativeConfig::from_path(path)?;
    Ok(NarrativeHost::mount(&config, services))
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        CompletionCriterion, CourseConfig, EnvironmentSignal, NarrativeConfig,
        NarrativeController, NarrativeError, NarrativeHost, NarrativeInput, NavigationModel,
        Result, ScreenSize, Services, Signal,
    };
    pub use crate::{core, widgets};
}

pub use narrative_core as core;
pub use narrative_widgets as widgets;
