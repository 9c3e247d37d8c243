#![forbid(unsafe_code)]

//! Presentation layer for the narrative widget.
//!
//! - [`controller::NarrativeController`] drives the sliding presentation.
//! - [`hotgraphic::HotgraphicPanel`] is the pinned-hotspot alternate used on
//!   large viewports for narratives authored as hotgraphics.
//! - [`presentation::NarrativeHost`] owns whichever is mounted and performs
//!   the one-way hand-off between them.
//! - [`services`] lists every capability the host must provide.

pub mod completion;
pub mod controller;
pub mod hotgraphic;
pub mod input;
pub mod presentation;
pub mod services;
pub mod stage;

#[cfg(test)]
mod test_support;

pub use controller::NarrativeController;
pub use presentation::{ComponentStore, NarrativeHost, Presentation};
pub use services::{Services, Signal};
