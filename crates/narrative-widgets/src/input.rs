#![forbid(unsafe_code)]

//! Inbound user input and environment signals.

/// A user interaction with the rendered widget. Every variant that refers to
/// an item carries the index bound on the clicked element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrativeInput {
    /// Right-hand navigation control.
    NextClicked,
    /// Left-hand navigation control.
    PreviousClicked,
    /// Progress marker (or hotspot pin in the alternate panel).
    ProgressClicked(usize),
    /// Strapline title of the active item.
    StraplineTitleClicked,
}

/// Which part of the component the host saw enter the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviewPart {
    Top,
    Bottom,
    Both,
}

/// A discrete notification from the host environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentSignal {
    /// The device class changed.
    DeviceChanged,
    /// The viewport was resized.
    Resized,
    /// The detail overlay was dismissed.
    OverlayClosed,
    /// The slider's transition finished.
    TransitionEnd,
    /// Slide graphics finished loading.
    AssetsReady,
    /// Part of the component scrolled into (or out of) view.
    Inview { visible: bool, part: InviewPart },
}
