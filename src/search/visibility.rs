//! Visibility detection for the last rendered card.

use std::ops::Range;

/// Fraction of the card that must be inside the viewport.
pub const VISIBILITY_THRESHOLD: f32 = 0.5;
/// Rows added around the viewport before measuring.
pub const ROOT_MARGIN: usize = 0;

/// Watches one card and reports when it scrolls into view.
///
/// A report fires once per transition from hidden to visible; staying visible
/// or moving between visible ratios does not fire again.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityWatcher {
    threshold: f32,
    target: Option<usize>,
    intersecting: bool,
    connected: bool,
}

impl Default for VisibilityWatcher {
    fn default() -> Self {
        Self::new(VISIBILITY_THRESHOLD)
    }
}

impl VisibilityWatcher {
    pub const fn new(threshold: f32) -> Self {
        Self {
            threshold,
            target: None,
            intersecting: false,
            connected: true,
        }
    }

    /// Card currently observed, if any.
    pub const fn target(&self) -> Option<usize> {
        self.target
    }

    pub const fn is_connected(&self) -> bool {
        self.connected
    }

    /// Watch `card`, dropping any previous target.
    ///
    /// Ignored after [`disconnect_all`](Self::disconnect_all) until the next
    /// [`reset`](Self::reset).
    pub const fn observe(&mut self, card: usize) {
        if !self.connected {
            return;
        }
        self.target = Some(card);
        self.intersecting = false;
    }

    /// Stop watching for the rest of the current search.
    pub const fn disconnect_all(&mut self) {
        self.target = None;
        self.intersecting = false;
        self.connected = false;
    }

    /// Forget everything and accept targets again (new search).
    pub const fn reset(&mut self) {
        self.target = None;
        self.intersecting = false;
        self.connected = true;
    }

    /// Treat the target as hidden, so a card that is still in view reports
    /// again on the next visible update.
    pub const fn rearm(&mut self) {
        self.intersecting = false;
    }

    /// Feed the visible fraction of the target card.
    ///
    /// Returns true exactly when the card enters the visible state.
    pub fn update(&mut self, ratio: f32) -> bool {
        if self.target.is_none() {
            return false;
        }
        let visible = ratio > 0.0 && ratio >= self.threshold;
        let entered = visible && !self.intersecting;
        self.intersecting = visible;
        entered
    }
}

/// Fraction of `element` rows inside `viewport` rows, widened by `margin`.
#[allow(clippy::cast_precision_loss)]
pub fn intersection_ratio(element: Range<usize>, viewport: Range<usize>, margin: usize) -> f32 {
    let height = element.end.saturating_sub(element.start);
    if height == 0 {
        return 0.0;
    }
    let top = viewport.start.saturating_sub(margin);
    let bottom = viewport.end.saturating_add(margin);
    let overlap_start = element.start.max(top);
    let overlap_end = element.end.min(bottom);
    let overlap = overlap_end.saturating_sub(overlap_start);
    overlap as f32 / height as f32
}
