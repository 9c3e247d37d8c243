#![forbid(unsafe_code)]

//! Viewport size classes.
//!
//! The widget only distinguishes "large" from everything else, but the host
//! reports one of three classes so the same classification can be shared with
//! other components.
//!
//! | Class    | Default Min Width | Presentation                |
//! |----------|-------------------|-----------------------------|
//! | `Small`  | < 520 px          | Strapline + popup           |
//! | `Medium` | 520–899 px        | Strapline + popup           |
//! | `Large`  | 900+ px           | Desktop slider, no popup    |

use serde::{Deserialize, Serialize};

/// Viewport size class reported by the host.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ScreenSize {
    #[default]
    Small,
    Medium,
    Large,
}

impl ScreenSize {
    /// All classes in ascending order.
    pub const ALL: [ScreenSize; 3] = [ScreenSize::Small, ScreenSize::Medium, ScreenSize::Large];

    /// Whether this class gets the desktop presentation.
    #[inline]
    #[must_use]
    pub const fn is_large(self) -> bool {
        matches!(self, ScreenSize::Large)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ScreenSize::Small => "small",
            ScreenSize::Medium => "medium",
            ScreenSize::Large => "large",
        }
    }
}

impl std::fmt::Display for ScreenSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Minimum widths (in CSS pixels) for each class above `Small`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenBreakpoints {
    /// Minimum width for `Medium`.
    pub medium: u32,
    /// Minimum width for `Large`.
    pub large: u32,
}

impl Default for ScreenBreakpoints {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl ScreenBreakpoints {
    /// Default breakpoints: 520 / 900 px.
    pub const DEFAULT: Self = Self {
        medium: 520,
        large: 900,
    };

    /// Create breakpoints, sanitized to be non-decreasing.
    #[must_use]
    pub const fn new(medium: u32, large: u32) -> Self {
        let large = if large < medium { medium } else { large };
        Self { medium, large }
    }

    /// Whether the thresholds are already non-decreasing.
    #[must_use]
    pub const fn is_monotonic(self) -> bool {
        self.medium <= self.large
    }

    /// Classify a viewport width.
    #[inline]
    #[must_use]
    pub const fn classify_width(self, width: u32) -> ScreenSize {
        if width >= self.large {
            ScreenSize::Large
        } else if width >= self.medium {
            ScreenSize::Medium
        } else {
            ScreenSize::Small
        }
    }

    /// Minimum width for a class.
    #[must_use]
    pub const fn threshold(self, size: ScreenSize) -> u32 {
        match size {
            ScreenSize::Small => 0,
            ScreenSize::Medium => self.medium,
            ScreenSize::Large => self.large,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_classification() {
        let bp = ScreenBreakpoints::DEFAULT;
        assert_eq!(bp.classify_width(0), ScreenSize::Small);
        assert_eq!(bp.classify_width(519), ScreenSize::Small);
        assert_eq!(bp.classify_width(520), ScreenSize::Medium);
        assert_eq!(bp.classify_width(899), ScreenSize::Medium);
        assert_eq!(bp.classify_width(900), ScreenSize::Large);
        assert_eq!(bp.classify_width(4000), ScreenSize::Large);
    }

    #[test]
    fn new_sanitizes_order() {
        let bp = ScreenBreakpoints::new(800, 600);
        assert_eq!(bp.large, 800);
        assert!(bp.is_monotonic());
        assert_eq!(bp.classify_width(799), ScreenSize::Small);
        assert_eq!(bp.classify_width(800), ScreenSize::Large);
    }

    #[test]
    fn thresholds_round_trip_through_classify() {
        let bp = ScreenBreakpoints::DEFAULT;
        for size in ScreenSize::ALL {
            assert_eq!(bp.classify_width(bp.threshold(size)), size);
        }
    }

    #[test]
    fn only_large_is_desktop() {
        assert!(!ScreenSize::Small.is_large());
        assert!(!ScreenSize::Medium.is_large());
        assert!(ScreenSize::Large.is_large());
        assert_eq!(ScreenSize::Medium.to_string(), "medium");
    }
}
