//! Day-grid layout: abstract minutes → normalized percentages.
//!
//! Layout is screen-independent: an occurrence maps to a vertical
//! `(top%, height%)` box relative to the [`DisplayWindow`], and the renderer
//! multiplies by whatever pixel height it has. Fully-clipped meetings never
//! reach this module — the projector already excludes them, so every
//! [`Occurrence`] here has positive height. (Ordering decision: clipping
//! happens *before* conflict detection and layout, making results
//! deterministic regardless of the window chosen elsewhere.)

use serde::Serialize;

use crate::project::{DisplayWindow, Occurrence};

/// A normalized vertical box on a day column, both fields in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutBox {
    pub top_pct: f64,
    pub height_pct: f64,
}

/// Position an occurrence within the display window.
///
/// `top = (start - window.start) / window.total * 100`,
/// `height = (end - start) / window.total * 100`. Total function: the window
/// is validated at construction (nonzero span) and the occurrence is already
/// clipped inside it with positive width, so `top + height <= 100`.
pub fn layout(occ: &Occurrence, window: &DisplayWindow) -> LayoutBox {
    let total = f64::from(window.total_min());
    LayoutBox {
        top_pct: f64::from(occ.start_min - window.start_min()) / total * 100.0,
        height_pct: f64::from(occ.end_min - occ.start_min) / total * 100.0,
    }
}

/// Express the overlap between an occurrence and each conflicting interval
/// as a sub-range of the occurrence's *own* height (0–100% of its block),
/// for highlighting just the contested portion inside the visual block.
///
/// Zero-width intersections are dropped.
pub fn conflict_slice(occ: &Occurrence, conflicting: &[(u16, u16)]) -> Vec<LayoutBox> {
    let duration = f64::from(occ.end_min - occ.start_min);
    conflicting
        .iter()
        .filter_map(|&(start, end)| occ.intersect(start, end))
        .map(|(lo, hi)| LayoutBox {
            top_pct: f64::from(lo - occ.start_min) / duration * 100.0,
            height_pct: f64::from(hi - lo) / duration * 100.0,
        })
        .collect()
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ClockTime;
    use crate::meeting::{parse_weekdays, Meeting, MeetingType};
    use crate::project::project;
    use chrono::Weekday;

    fn occ(start: u16, end: u16, window: &DisplayWindow) -> Occurrence {
        let m = Meeting::new(
            MeetingType::new("LEC").unwrap(),
            "01",
            parse_weekdays("M"),
            ClockTime::from_minutes(start),
            ClockTime::from_minutes(end),
        )
        .unwrap();
        project("C1", &m, Weekday::Mon, window).unwrap()
    }

    #[test]
    fn test_layout_basic() {
        // 9:00–10:00 in an 8:00–20:00 window: 60/720 in, 60/720 tall.
        let window = DisplayWindow::new(8, 20).unwrap();
        let result = layout(&occ(540, 600, &window), &window);
        assert!((result.top_pct - 8.333).abs() < 0.01);
        assert!((result.height_pct - 8.333).abs() < 0.01);
    }

    #[test]
    fn test_layout_invariant_inside_window() {
        let window = DisplayWindow::new(8, 20).unwrap();
        for &(start, end) in &[(480, 1200), (480, 481), (1199, 1200), (700, 900)] {
            let result = layout(&occ(start, end, &window), &window);
            assert!(result.top_pct >= 0.0 && result.top_pct <= 100.0);
            assert!(result.height_pct > 0.0 && result.height_pct <= 100.0);
            assert!(result.top_pct + result.height_pct <= 100.0 + 1e-9);
        }
    }

    #[test]
    fn test_layout_clipped_start() {
        // 7:00–9:00 clips to 8:00–9:00: top 0, height 60/720.
        let window = DisplayWindow::new(8, 20).unwrap();
        let result = layout(&occ(420, 540, &window), &window);
        assert_eq!(result.top_pct, 0.0);
        assert!((result.height_pct - 8.333).abs() < 0.01);
    }

    #[test]
    fn test_conflict_slice_partial_overlap() {
        // Occurrence 9:30–10:15 vs a 9:00–10:00 partner: the contested part
        // is 9:30–10:00, the first two-thirds of the occurrence's own block.
        let window = DisplayWindow::new(8, 20).unwrap();
        let slices = conflict_slice(&occ(570, 615, &window), &[(540, 600)]);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].top_pct, 0.0);
        assert!((slices[0].height_pct - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_conflict_slice_interior() {
        let window = DisplayWindow::new(8, 20).unwrap();
        let slices = conflict_slice(&occ(540, 640, &window), &[(565, 590)]);
        assert_eq!(slices.len(), 1);
        assert!((slices[0].top_pct - 25.0).abs() < 1e-9);
        assert!((slices[0].height_pct - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_conflict_slice_drops_empty_intersections() {
        let window = DisplayWindow::new(8, 20).unwrap();
        // Touching interval and a disjoint one: nothing to highlight.
        let slices = conflict_slice(&occ(540, 600, &window), &[(600, 660), (700, 800)]);
        assert!(slices.is_empty());
    }

    #[test]
    fn test_conflict_slice_full_cover() {
        let window = DisplayWindow::new(8, 20).unwrap();
        let slices = conflict_slice(&occ(540, 600, &window), &[(500, 700)]);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].top_pct, 0.0);
        assert_eq!(slices[0].height_pct, 100.0);
    }
}
