#![forbid(unsafe_code)]

//! Recording implementations of the host capabilities.

use std::cell::{Cell, RefCell};
use std::time::Duration;

use narrative_core::config::ReadingDirection;
use narrative_core::transition::DEFAULT_SLIDE_DURATION;
use narrative_core::viewport::ScreenSize;
use narrative_widgets::services::{
    ConfigProvider, OverlayService, Signal, SignalSink, ViewportClassifier,
};

/// Viewport whose class is set directly by the test.
#[derive(Debug, Default)]
pub struct FixedViewport {
    size: Cell<ScreenSize>,
}

impl FixedViewport {
    #[must_use]
    pub fn new(size: ScreenSize) -> Self {
        Self {
            size: Cell::new(size),
        }
    }

    pub fn set(&self, size: ScreenSize) {
        self.size.set(size);
    }
}

impl ViewportClassifier for FixedViewport {
    fn screen_size(&self) -> ScreenSize {
        self.size.get()
    }
}

/// Fixed course settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticConfig {
    pub animation_disabled: bool,
    pub direction: ReadingDirection,
    pub slide: Duration,
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            animation_disabled: false,
            direction: ReadingDirection::Ltr,
            slide: DEFAULT_SLIDE_DURATION,
        }
    }
}

impl ConfigProvider for StaticConfig {
    fn animation_disabled(&self) -> bool {
        self.animation_disabled
    }

    fn reading_direction(&self) -> ReadingDirection {
        self.direction
    }

    fn slide_duration(&self) -> Duration {
        self.slide
    }
}

/// One modal the widget asked the host to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayRequest {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Default)]
pub struct RecordingOverlay {
    requests: RefCell<Vec<OverlayRequest>>,
}

impl RecordingOverlay {
    #[must_use]
    pub fn requests(&self) -> Vec<OverlayRequest> {
        self.requests.borrow().clone()
    }

    #[must_use]
    pub fn last(&self) -> Option<OverlayRequest> {
        self.requests.borrow().last().cloned()
    }
}

impl OverlayService for RecordingOverlay {
    fn open(&self, title: &str, body: &str) {
        self.requests.borrow_mut().push(OverlayRequest {
            title: title.to_owned(),
            body: body.to_owned(),
        });
    }
}

#[derive(Debug, Default)]
pub struct RecordingSignals {
    signals: RefCell<Vec<Signal>>,
}

impl RecordingSignals {
    #[must_use]
    pub fn all(&self) -> Vec<Signal> {
        self.signals.borrow().clone()
    }

    /// Number of times `signal` was emitted.
    #[must_use]
    pub fn count(&self, signal: Signal) -> usize {
        self.signals.borrow().iter().filter(|s| **s == signal).count()
    }

    /// Drain and return everything recorded so far.
    pub fn take(&self) -> Vec<Signal> {
        std::mem::take(&mut *self.signals.borrow_mut())
    }
}

impl SignalSink for RecordingSignals {
    fn emit(&self, signal: Signal) {
        self.signals.borrow_mut().push(signal);
    }
}
