#![forbid(unsafe_code)]

//! Rendered visual state of the sliding presentation.
//!
//! [`StageView`] is what the rendering layer binds to: which progress marker
//! is selected, which panel is shown and exposed to assistive technology,
//! which per-item controls are reachable, whether each navigation control is
//! hidden, the slider offset, and the installed instruction text. Marker and
//! panel `i` always refer to item `i`.

use bitflags::bitflags;

use crate::services::FocusTarget;

bitflags! {
    /// State of one progress marker.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MarkerFlags: u8 {
        const SELECTED = 0b01;
        const VISITED  = 0b10;
    }
}

bitflags! {
    /// State of one content panel and its strapline title.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PanelFlags: u8 {
        /// Panel is displayed.
        const VISIBLE          = 0b0001;
        /// Panel is exposed to assistive technology.
        const EXPOSED          = 0b0010;
        /// Embedded controls on the slide graphic are reachable.
        const CONTROLS_ENABLED = 0b0100;
        /// The strapline title for this item is reachable.
        const TITLE_ENABLED    = 0b1000;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StageView {
    markers: Vec<MarkerFlags>,
    panels: Vec<PanelFlags>,
    left_hidden: bool,
    right_hidden: bool,
    offset: f64,
    instruction: Option<String>,
    animation_disabled: bool,
    focus: Option<FocusTarget>,
}

impl StageView {
    /// Stage for `count` items with nothing selected or shown.
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self {
            markers: vec![MarkerFlags::empty(); count],
            panels: vec![PanelFlags::empty(); count],
            left_hidden: false,
            right_hidden: false,
            offset: 0.0,
            instruction: None,
            animation_disabled: false,
            focus: None,
        }
    }

    // -- Updates ----------------------------------------------------------

    /// Highlight the marker at `index` and clear every other highlight.
    pub fn select_marker(&mut self, index: usize) {
        for (i, marker) in self.markers.iter_mut().enumerate() {
            marker.set(MarkerFlags::SELECTED, i == index);
        }
    }

    pub fn set_marker_visited(&mut self, index: usize, visited: bool) {
        if let Some(marker) = self.markers.get_mut(index) {
            marker.set(MarkerFlags::VISITED, visited);
        }
    }

    /// Disable every slide control, then enable those on `index`.
    pub fn enable_controls_for(&mut self, index: usize) {
        self.set_only(index, PanelFlags::CONTROLS_ENABLED);
    }

    /// Hide every panel, then show and expose `index`.
    pub fn show_panel(&mut self, index: usize) {
        self.set_only(index, PanelFlags::VISIBLE | PanelFlags::EXPOSED);
    }

    /// Make only the strapline title for `index` reachable.
    pub fn enable_title_for(&mut self, index: usize) {
        self.set_only(index, PanelFlags::TITLE_ENABLED);
    }

    fn set_only(&mut self, index: usize, flags: PanelFlags) {
        for (i, panel) in self.panels.iter_mut().enumerate() {
            panel.set(flags, i == index);
        }
    }

    pub fn set_navigation_hidden(&mut self, left: bool, right: bool) {
        self.left_hidden = left;
        self.right_hidden = right;
    }

    pub fn set_offset(&mut self, offset: f64) {
        self.offset = offset;
    }

    pub fn set_instruction(&mut self, text: Option<String>) {
        self.instruction = text;
    }

    pub fn set_animation_disabled(&mut self, disabled: bool) {
        self.animation_disabled = disabled;
    }

    pub fn set_focus(&mut self, target: FocusTarget) {
        self.focus = Some(target);
    }

    // -- Queries ----------------------------------------------------------

    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    #[must_use]
    pub fn marker(&self, index: usize) -> Option<MarkerFlags> {
        self.markers.get(index).copied()
    }

    #[must_use]
    pub fn panel(&self, index: usize) -> Option<PanelFlags> {
        self.panels.get(index).copied()
    }

    /// Index of the highlighted marker, if any.
    #[must_use]
    pub fn selected_marker(&self) -> Option<usize> {
        self.markers
            .iter()
            .position(|marker| marker.contains(MarkerFlags::SELECTED))
    }

    /// Index of the displayed panel, if any.
    #[must_use]
    pub fn visible_panel(&self) -> Option<usize> {
        self.panels
            .iter()
            .position(|panel| panel.contains(PanelFlags::VISIBLE))
    }

    #[must_use]
    pub fn is_marker_visited(&self, index: usize) -> bool {
        self.marker(index)
            .is_some_and(|marker| marker.contains(MarkerFlags::VISITED))
    }

    #[must_use]
    pub const fn left_control_hidden(&self) -> bool {
        self.left_hidden
    }

    #[must_use]
    pub const fn right_control_hidden(&self) -> bool {
        self.right_hidden
    }

    /// Slider offset in percent of the track.
    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.offset
    }

    #[must_use]
    pub fn instruction(&self) -> Option<&str> {
        self.instruction.as_deref()
    }

    #[must_use]
    pub const fn animation_disabled(&self) -> bool {
        self.animation_disabled
    }

    #[must_use]
    pub const fn focus(&self) -> Option<FocusTarget> {
        self.focus
    }

    /// Compact one-line rendering used in logs and test diagnostics.
    ///
    /// `<` / `>` are the controls (`_` when hidden); markers are `*` for the
    /// selected item, `v` for visited and `.` otherwise.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = String::with_capacity(self.markers.len() + 4);
        out.push(if self.left_hidden { '_' } else { '<' });
        out.push('[');
        for marker in &self.markers {
            out.push(if marker.contains(MarkerFlags::SELECTED) {
                '*'
            } else if marker.contains(MarkerFlags::VISITED) {
                'v'
            } else {
                '.'
            });
        }
        out.push(']');
        out.push(if self.right_hidden { '_' } else { '>' });
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_marker_is_exclusive() {
        let mut stage = StageView::new(4);
        stage.select_marker(1);
        stage.select_marker(3);
        assert_eq!(stage.selected_marker(), Some(3));
        assert!(!stage.marker(1).unwrap().contains(MarkerFlags::SELECTED));
    }

    #[test]
    fn show_panel_hides_others() {
        let mut stage = StageView::new(3);
        stage.show_panel(0);
        stage.show_panel(2);
        assert_eq!(stage.visible_panel(), Some(2));
        assert_eq!(stage.panel(0), Some(PanelFlags::empty()));
        assert!(stage.panel(2).unwrap().contains(PanelFlags::EXPOSED));
    }

    #[test]
    fn panel_flag_groups_are_independent() {
        let mut stage = StageView::new(2);
        stage.show_panel(1);
        stage.enable_controls_for(1);
        stage.enable_title_for(0);
        assert_eq!(
            stage.panel(1),
            Some(PanelFlags::VISIBLE | PanelFlags::EXPOSED | PanelFlags::CONTROLS_ENABLED)
        );
        assert_eq!(stage.panel(0), Some(PanelFlags::TITLE_ENABLED));
    }

    #[test]
    fn visited_marker_out_of_range_is_ignored() {
        let mut stage = StageView::new(1);
        stage.set_marker_visited(5, true);
        assert!(!stage.is_marker_visited(5));
    }

    #[test]
    fn summary_renders_controls_and_markers() {
        let mut stage = StageView::new(4);
        stage.set_marker_visited(0, true);
        stage.select_marker(1);
        stage.set_navigation_hidden(false, false);
        assert_eq!(stage.summary(), "<[v*..]>");
        stage.set_navigation_hidden(true, false);
        assert_eq!(stage.summary(), "_[v*..]>");
    }
}
