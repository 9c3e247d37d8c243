#![forbid(unsafe_code)]

//! Authored configuration for a narrative instance and the course it lives in.
//!
//! Both documents are JSON in the authoring format (leading-underscore keys
//! for behavior flags). Missing keys take defaults; unknown keys are ignored.
//!
//! ```
//! use narrative_core::config::NarrativeConfig;
//!
//! let config = NarrativeConfig::from_json_str(
//!     r#"{ "_items": [ { "title": "One", "body": "First" } ] }"#,
//! ).unwrap();
//! let model = config.build_model();
//! assert_eq!(model.len(), 1);
//! ```

use std::io::Read;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{NarrativeError, Result};
use crate::item::ItemContent;
use crate::model::{ComponentText, NavigationModel};
use crate::transition::DEFAULT_SLIDE_DURATION;
use crate::viewport::ScreenBreakpoints;

/// What marks the component complete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionCriterion {
    /// Every item visited.
    #[default]
    #[serde(rename = "allItems")]
    AllItems,
    /// Top and bottom of the component scrolled into view.
    #[serde(rename = "inview")]
    Inview,
}

/// Reading direction of the course.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingDirection {
    #[default]
    Ltr,
    Rtl,
}

impl ReadingDirection {
    /// Sign applied to slide offsets so that increasing index moves content
    /// in the reading direction.
    #[must_use]
    pub const fn offset_sign(self) -> f64 {
        match self {
            Self::Ltr => -1.0,
            Self::Rtl => 1.0,
        }
    }
}

/// One narrative component as authored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeConfig {
    #[serde(default, rename = "_id")]
    pub id: String,
    #[serde(default, rename = "_parentId")]
    pub parent_id: String,
    #[serde(default, rename = "_items")]
    pub items: Vec<ItemContent>,
    #[serde(default, rename = "_isResetOnRevisit")]
    pub reset_on_revisit: bool,
    #[serde(default, rename = "_wasHotgraphic")]
    pub was_hotgraphic: bool,
    #[serde(default, rename = "_setCompletionOn")]
    pub completion: CompletionCriterion,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub instruction: String,
    #[serde(default, rename = "mobileInstruction")]
    pub mobile_instruction: Option<String>,
    #[serde(default, rename = "originalBody")]
    pub original_body: Option<String>,
    #[serde(default, rename = "originalInstruction")]
    pub original_instruction: Option<String>,
}

impl NarrativeConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Component-level text carried by the model.
    #[must_use]
    pub fn text(&self) -> ComponentText {
        ComponentText {
            body: self.body.clone(),
            instruction: self.instruction.clone(),
            mobile_instruction: self.mobile_instruction.clone(),
            original_body: self.original_body.clone(),
            original_instruction: self.original_instruction.clone(),
        }
    }

    /// Build the navigation model for this component.
    #[must_use]
    pub fn build_model(&self) -> NavigationModel {
        NavigationModel::new(self.items.iter().cloned())
            .with_alternate_origin(self.was_hotgraphic)
            .with_reset_on_revisit(self.reset_on_revisit)
            .with_text(self.text())
    }
}

/// Course-wide settings consulted by the presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseConfig {
    #[serde(default, rename = "_disableAnimation")]
    pub disable_animation: bool,
    #[serde(default, rename = "_defaultDirection")]
    pub direction: ReadingDirection,
    #[serde(default, rename = "screenSize")]
    pub breakpoints: ScreenBreakpoints,
    /// Slide duration in milliseconds.
    #[serde(default = "default_slide_ms", rename = "_slideDuration")]
    pub slide_ms: u64,
}

fn default_slide_ms() -> u64 {
    DEFAULT_SLIDE_DURATION.as_millis() as u64
}

impl Default for CourseConfig {
    fn default() -> Self {
        Self {
            disable_animation: false,
            direction: ReadingDirection::default(),
            breakpoints: ScreenBreakpoints::default(),
            slide_ms: default_slide_ms(),
        }
    }
}

impl CourseConfig {
    /// Parse and validate.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(std::io::BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.breakpoints.is_monotonic() {
            return Err(NarrativeError::InvalidConfig(format!(
                "screenSize.medium ({}) exceeds screenSize.large ({})",
                self.breakpoints.medium, self.breakpoints.large
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn slide_duration(&self) -> Duration {
        Duration::from_millis(self.slide_ms)
    }
}
