//! Trace visibility: a bitmask plus an exclusive "solo" mode.

use serde::Serialize;

/// Maximum number of traces addressable by the mask.
pub const MAX_TRACES: usize = u64::BITS as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityMode {
    Normal,
    /// One trace is soloed; `previous` is the mask to restore on exit.
    Exclusive { previous: u64 },
}

/// How a trace is listed next to its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TraceStatus {
    Shown,
    Hidden,
    Solo,
}

impl TraceStatus {
    /// Short marker appended to trace names in value tables.
    pub fn marker(self) -> &'static str {
        match self {
            TraceStatus::Shown => "",
            TraceStatus::Hidden => " (H)",
            TraceStatus::Solo => " (E)",
        }
    }
}

/// Which traces are drawn.
///
/// Transitions happen only through `set_all`, `toggle` and `solo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceVisibility {
    mask: u64,
    num_traces: usize,
    mode: VisibilityMode,
}

impl TraceVisibility {
    /// All `num_traces` traces visible. Counts above 64 are capped.
    pub fn new(num_traces: usize) -> Self {
        let num_traces = num_traces.min(MAX_TRACES);
        Self {
            mask: full_mask(num_traces),
            num_traces,
            mode: VisibilityMode::Normal,
        }
    }

    pub fn bits(&self) -> u64 {
        self.mask
    }

    pub fn mode(&self) -> VisibilityMode {
        self.mode
    }

    pub fn is_exclusive(&self) -> bool {
        matches!(self.mode, VisibilityMode::Exclusive { .. })
    }

    pub fn is_visible(&self, trace: usize) -> bool {
        trace < self.num_traces && self.mask & (1u64 << trace) != 0
    }

    pub fn visible_count(&self) -> usize {
        self.mask.count_ones() as usize
    }

    /// Visible trace indices in ascending order.
    pub fn visible(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.num_traces).filter(move |&t| self.is_visible(t))
    }

    pub fn status(&self, trace: usize) -> TraceStatus {
        match (self.is_exclusive(), self.is_visible(trace)) {
            (true, true) => TraceStatus::Solo,
            (false, false) => TraceStatus::Hidden,
            _ => TraceStatus::Shown,
        }
    }

    /// Show or hide every trace and leave solo mode.
    pub fn set_all(&mut self, visible: bool) {
        self.mask = if visible { full_mask(self.num_traces) } else { 0 };
        self.mode = VisibilityMode::Normal;
    }

    /// Flip one trace. Ignored while a trace is soloed or for unknown indices.
    pub fn toggle(&mut self, trace: usize) {
        if trace >= self.num_traces || self.is_exclusive() {
            return;
        }
        self.mask ^= 1u64 << trace;
    }

    /// Solo a trace, or leave solo mode when the soloed trace is chosen again.
    ///
    /// Soloing a different trace while exclusive moves the solo target and
    /// keeps the mask saved on entry.
    pub fn solo(&mut self, trace: usize) {
        if trace >= self.num_traces {
            return;
        }
        match self.mode {
            VisibilityMode::Normal => {
                self.mode = VisibilityMode::Exclusive { previous: self.mask };
                self.mask = 1u64 << trace;
            }
            VisibilityMode::Exclusive { previous } => {
                if self.is_visible(trace) {
                    self.mask = previous;
                    self.mode = VisibilityMode::Normal;
                } else {
                    self.mask = 1u64 << trace;
                }
            }
        }
    }
}

fn full_mask(num_traces: usize) -> u64 {
    if num_traces >= MAX_TRACES {
        u64::MAX
    } else {
        (1u64 << num_traces) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_shows_all() {
        let vis = TraceVisibility::new(3);
        assert_eq!(vis.bits(), 0b111);
        assert_eq!(vis.visible_count(), 3);
        assert!(!vis.is_visible(3));
        assert_eq!(TraceVisibility::new(64).bits(), u64::MAX);
        assert_eq!(TraceVisibility::new(100).visible_count(), 64);
    }

    #[test]
    fn test_toggle_flips_one_trace() {
        let mut vis = TraceVisibility::new(4);
        vis.toggle(2);
        assert_eq!(vis.bits(), 0b1011);
        assert_eq!(vis.status(2), TraceStatus::Hidden);
        vis.toggle(2);
        assert_eq!(vis.bits(), 0b1111);
        vis.toggle(9);
        assert_eq!(vis.bits(), 0b1111);
    }

    #[test]
    fn test_solo_and_restore() {
        let mut vis = TraceVisibility::new(4);
        vis.toggle(3);
        vis.solo(1);
        assert!(vis.is_exclusive());
        assert_eq!(vis.bits(), 0b0010);
        assert_eq!(vis.status(1), TraceStatus::Solo);
        assert_eq!(vis.status(0), TraceStatus::Shown);

        vis.solo(1);
        assert_eq!(vis.mode(), VisibilityMode::Normal);
        assert_eq!(vis.bits(), 0b0111);
    }

    #[test]
    fn test_solo_other_trace_replaces_target() {
        let mut vis = TraceVisibility::new(4);
        vis.solo(0);
        vis.solo(2);
        assert_eq!(vis.bits(), 0b0100);
        assert!(vis.is_exclusive());

        // Leaving solo from the new target restores the original mask
        vis.solo(2);
        assert_eq!(vis.bits(), 0b1111);
        assert!(!vis.is_exclusive());
    }

    #[test]
    fn test_status_markers() {
        let mut vis = TraceVisibility::new(3);
        vis.toggle(2);
        assert_eq!(vis.status(0).marker(), "");
        assert_eq!(vis.status(2).marker(), " (H)");
        vis.solo(1);
        assert_eq!(vis.status(1).marker(), " (E)");
    }

    #[test]
    fn test_toggle_ignored_while_exclusive() {
        let mut vis = TraceVisibility::new(4);
        vis.solo(0);
        vis.toggle(3);
        assert_eq!(vis.bits(), 0b0001);
    }

    #[test]
    fn test_show_all_leaves_exclusive_mode() {
        let mut vis = TraceVisibility::new(4);
        vis.solo(0);
        vis.set_all(true);
        assert!(!vis.is_exclusive());
        assert_eq!(vis.bits(), 0b1111);
        vis.set_all(false);
        assert_eq!(vis.visible().count(), 0);
    }

    #[test]
    fn test_visible_iterates_in_order() {
        let mut vis = TraceVisibility::new(5);
        vis.toggle(1);
        vis.toggle(3);
        assert_eq!(vis.visible().collect::<Vec<_>>(), vec![0, 2, 4]);
    }
}
