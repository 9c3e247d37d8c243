#![forbid(unsafe_code)]

//! A single narrative panel and its mutable flags.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Mutable per-item state.
    ///
    /// Only [`NavigationModel`](crate::model::NavigationModel) writes these;
    /// everything else reads them through [`Item::is_active`] and
    /// [`Item::is_visited`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ItemFlags: u8 {
        /// The item is the one currently on stage.
        const ACTIVE  = 0b0000_0001;
        /// The item has been viewed in full.
        const VISITED = 0b0000_0010;
    }
}

/// Graphic shown on a panel's slide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graphic {
    /// Image source.
    #[serde(default)]
    pub src: String,
    /// Alternative text.
    #[serde(default)]
    pub alt: String,
}

/// Immutable display content for one item, as authored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemContent {
    /// Panel heading; also the overlay title.
    #[serde(default)]
    pub title: String,
    /// Panel body; also the overlay body.
    #[serde(default)]
    pub body: String,
    /// Short title shown in the strapline on narrow viewports.
    #[serde(default)]
    pub strapline: String,
    /// Per-item instruction override used on narrow viewports.
    #[serde(default, rename = "mobileInstruction")]
    pub mobile_instruction: Option<String>,
    /// Slide graphic.
    #[serde(default, rename = "_graphic")]
    pub graphic: Option<Graphic>,
}

impl ItemContent {
    /// Convenience constructor for content with just a title and body.
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            ..Self::default()
        }
    }
}

/// One panel of the narrative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    index: usize,
    flags: ItemFlags,
    content: ItemContent,
}

impl Item {
    pub(crate) fn new(index: usize, content: ItemContent) -> Self {
        Self {
            index,
            flags: ItemFlags::empty(),
            content,
        }
    }

    /// Zero-based position in the collection; stable for the item's lifetime.
    #[inline]
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.flags.contains(ItemFlags::ACTIVE)
    }

    #[inline]
    #[must_use]
    pub fn is_visited(&self) -> bool {
        self.flags.contains(ItemFlags::VISITED)
    }

    #[inline]
    #[must_use]
    pub const fn flags(&self) -> ItemFlags {
        self.flags
    }

    #[must_use]
    pub fn content(&self) -> &ItemContent {
        &self.content
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.content.title
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.content.body
    }

    pub(crate) fn set_flag(&mut self, flag: ItemFlags, value: bool) -> bool {
        let was = self.flags.contains(flag);
        self.flags.set(flag, value);
        was != value
    }

    pub(crate) fn clear_flags(&mut self) {
        self.flags = ItemFlags::empty();
    }
}
