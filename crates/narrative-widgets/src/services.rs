#![forbid(unsafe_code)]

//! Capabilities the presentation consumes from its host.
//!
//! Everything the widget needs from the outside world arrives through these
//! narrow traits, bundled into [`Services`] at construction. There is no
//! global event bus: the host calls the controller for inbound signals and
//! the controller calls [`SignalSink::emit`] for outbound ones.
//!
//! All methods take `&self`. The runtime is single-threaded, so
//! implementations that record state use `Cell`/`RefCell`.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use narrative_core::config::{CourseConfig, ReadingDirection};
use narrative_core::viewport::{ScreenBreakpoints, ScreenSize};

use crate::presentation::ComponentStore;

/// Reports the current viewport size class.
pub trait ViewportClassifier {
    fn screen_size(&self) -> ScreenSize;
}

/// Course-wide presentation settings.
pub trait ConfigProvider {
    fn animation_disabled(&self) -> bool;

    fn reading_direction(&self) -> ReadingDirection;

    fn slide_duration(&self) -> Duration {
        narrative_core::transition::DEFAULT_SLIDE_DURATION
    }
}

/// Displays a dismissible modal. The host later reports
/// [`EnvironmentSignal::OverlayClosed`](crate::input::EnvironmentSignal::OverlayClosed).
pub trait OverlayService {
    fn open(&self, title: &str, body: &str);
}

/// Receives outbound signals.
pub trait SignalSink {
    fn emit(&self, signal: Signal);
}

/// Where accessibility focus goes once a slide finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// Content panel at this index (desktop).
    Panel(usize),
    /// The strapline title (narrow viewports).
    StraplineTitle,
}

/// Signals emitted to the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Every item has been visited.
    AllItemsCompleted,
    /// The configured completion criterion was met.
    ComponentCompleted,
    /// Slide assets finished loading.
    Ready,
    /// Accessibility focus moved.
    FocusMoved(FocusTarget),
    /// The host should re-run viewport classification (after an upgrade).
    ViewportRefreshRequested,
    /// The host should refresh its accessibility tree (after an upgrade).
    AccessibilityRefreshRequested,
}

impl ConfigProvider for CourseConfig {
    fn animation_disabled(&self) -> bool {
        self.disable_animation
    }

    fn reading_direction(&self) -> ReadingDirection {
        self.direction
    }

    fn slide_duration(&self) -> Duration {
        CourseConfig::slide_duration(self)
    }
}

/// Classifies a host-reported viewport width against breakpoints.
#[derive(Debug)]
pub struct WidthViewport {
    width: Cell<u32>,
    breakpoints: ScreenBreakpoints,
}

impl WidthViewport {
    #[must_use]
    pub fn new(width: u32, breakpoints: ScreenBreakpoints) -> Self {
        Self {
            width: Cell::new(width),
            breakpoints,
        }
    }

    /// Record a resize. Returns whether the size class changed.
    pub fn resize(&self, width: u32) -> bool {
        let before = self.screen_size();
        self.width.set(width);
        before != self.screen_size()
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width.get()
    }
}

impl ViewportClassifier for WidthViewport {
    fn screen_size(&self) -> ScreenSize {
        self.breakpoints.classify_width(self.width.get())
    }
}

/// The capability bundle handed to a presentation.
///
/// Cloning is cheap and shares every capability, which is how an upgraded
/// presentation inherits its predecessor's environment.
#[derive(Clone)]
pub struct Services {
    pub viewport: Rc<dyn ViewportClassifier>,
    pub config: Rc<dyn ConfigProvider>,
    pub overlay: Rc<dyn OverlayService>,
    pub signals: Rc<dyn SignalSink>,
    pub components: Rc<ComponentStore>,
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("screen_size", &self.viewport.screen_size())
            .field("components", &self.components)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_viewport_reports_class_changes() {
        let viewport = WidthViewport::new(400, ScreenBreakpoints::DEFAULT);
        assert_eq!(viewport.screen_size(), ScreenSize::Small);
        assert!(!viewport.resize(450));
        assert!(viewport.resize(1200));
        assert_eq!(viewport.screen_size(), ScreenSize::Large);
        assert_eq!(viewport.width(), 1200);
    }

    #[test]
    fn course_config_provides_settings() {
        let course = CourseConfig {
            disable_animation: true,
            direction: ReadingDirection::Rtl,
            slide_ms: 120,
            ..CourseConfig::default()
        };
        let provider: &dyn ConfigProvider = &course;
        assert!(provider.animation_disabled());
        assert_eq!(provider.reading_direction(), ReadingDirection::Rtl);
        assert_eq!(provider.slide_duration(), Duration::from_millis(120));
    }
}
