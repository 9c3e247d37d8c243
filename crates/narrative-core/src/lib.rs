#![forbid(unsafe_code)]

//! Core: item collection, navigation state machine, viewport classes,
//! slide transitions, and configuration for the narrative widget.
//!
//! Nothing in this crate renders. The presentation layer lives in
//! `narrative-widgets` and consumes [`model::NavigationModel`] through the
//! events it queues.

pub mod config;
pub mod error;
pub mod item;
pub mod model;
pub mod transition;
pub mod viewport;

pub use error::{NarrativeError, Result};
