#![forbid(unsafe_code)]

//! In-crate test doubles. The `narrative-harness` crate carries the public
//! equivalents for integration tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use narrative_core::config::ReadingDirection;
use narrative_core::item::ItemContent;
use narrative_core::viewport::ScreenSize;

use crate::presentation::ComponentStore;
use crate::services::{ConfigProvider, OverlayService, Services, Signal, SignalSink, ViewportClassifier};

pub(crate) fn contents(count: usize) -> Vec<ItemContent> {
    (0..count)
        .map(|i| ItemContent::new(format!("Item {i}"), format!("Body {i}")))
        .collect()
}

#[derive(Debug, Default)]
struct Recorder {
    size: Cell<ScreenSize>,
    direction: Cell<ReadingDirection>,
    overlays: RefCell<Vec<(String, String)>>,
    signals: RefCell<Vec<Signal>>,
}

impl ViewportClassifier for Recorder {
    fn screen_size(&self) -> ScreenSize {
        self.size.get()
    }
}

impl ConfigProvider for Recorder {
    fn animation_disabled(&self) -> bool {
        false
    }

    fn reading_direction(&self) -> ReadingDirection {
        self.direction.get()
    }
}

impl OverlayService for Recorder {
    fn open(&self, title: &str, body: &str) {
        self.overlays
            .borrow_mut()
            .push((title.to_owned(), body.to_owned()));
    }
}

impl SignalSink for Recorder {
    fn emit(&self, signal: Signal) {
        self.signals.borrow_mut().push(signal);
    }
}

pub(crate) struct TestServices {
    recorder: Rc<Recorder>,
    components: Rc<ComponentStore>,
}

impl TestServices {
    pub(crate) fn new(size: ScreenSize) -> Self {
        let recorder = Rc::new(Recorder::default());
        recorder.size.set(size);
        Self {
            recorder,
            components: Rc::new(ComponentStore::with_hotgraphic()),
        }
    }

    pub(crate) fn with_direction(self, direction: ReadingDirection) -> Self {
        self.recorder.direction.set(direction);
        self
    }

    pub(crate) fn without_components(mut self) -> Self {
        self.components = Rc::new(ComponentStore::new());
        self
    }

    pub(crate) fn set_screen_size(&self, size: ScreenSize) {
        self.recorder.size.set(size);
    }

    pub(crate) fn services(&self) -> Services {
        Services {
            viewport: self.recorder.clone(),
            config: self.recorder.clone(),
            overlay: self.recorder.clone(),
            signals: self.recorder.clone(),
            components: self.components.clone(),
        }
    }

    pub(crate) fn signals(&self) -> Vec<Signal> {
        self.recorder.signals.borrow().clone()
    }

    pub(crate) fn overlays(&self) -> Vec<(String, String)> {
        self.recorder.overlays.borrow().clone()
    }
}
