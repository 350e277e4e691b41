//! Per-weekday occurrence projection.
//!
//! A [`Meeting`] is abstract — "MWF 9–10". An [`Occurrence`] is that meeting
//! landed on one concrete weekday, clipped to the visible
//! [`DisplayWindow`], as a half-open minute interval `[start, end)`.
//! Occurrences are ephemeral: recomputed on demand, never persisted.
//!
//! Clipping here is strictly a rendering policy. The preview query that
//! compares *unclipped* meeting intervals lives in [`crate::conflict`] and
//! never goes through projection.

use chrono::Weekday;
use serde::Serialize;

use crate::error::{Result, ScheduleError};
use crate::meeting::{Meeting, OwnerKey};

// ── DisplayWindow ───────────────────────────────────────────────────────────

/// The visible clock range of the day grid, in whole hours.
///
/// Invariant: `0 <= start_hour < end_hour <= 24`, enforced at construction —
/// an empty window is a configuration error, failed fast rather than left to
/// divide by zero in layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayWindow {
    start_hour: u16,
    end_hour: u16,
}

impl DisplayWindow {
    pub fn new(start_hour: u16, end_hour: u16) -> Result<Self> {
        if start_hour >= end_hour || end_hour > 24 {
            return Err(ScheduleError::InvalidWindow(format!(
                "{start_hour}..{end_hour} (need 0 <= start < end <= 24)"
            )));
        }
        Ok(DisplayWindow {
            start_hour,
            end_hour,
        })
    }

    pub fn start_min(&self) -> u16 {
        self.start_hour * 60
    }

    pub fn end_min(&self) -> u16 {
        self.end_hour * 60
    }

    pub fn total_min(&self) -> u16 {
        (self.end_hour - self.start_hour) * 60
    }
}

// ── Occurrence ──────────────────────────────────────────────────────────────

/// One weekday-specific projection of a meeting: a half-open minute interval
/// `[start_min, end_min)` already clipped to the display window, with
/// `start_min < end_min`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    pub owner: OwnerKey,
    pub weekday: Weekday,
    pub start_min: u16,
    pub end_min: u16,
}

impl Occurrence {
    /// Intersection with another half-open interval, if nonempty.
    pub fn intersect(&self, start_min: u16, end_min: u16) -> Option<(u16, u16)> {
        let lo = self.start_min.max(start_min);
        let hi = self.end_min.min(end_min);
        (lo < hi).then_some((lo, hi))
    }
}

// ── Projection ──────────────────────────────────────────────────────────────

/// Project a meeting onto one weekday, clipped to the window.
///
/// Returns `None` when the meeting does not recur on `weekday`, or when the
/// clipped interval is empty (the meeting lies entirely outside the window).
/// Such a meeting contributes no visible occurrence and does not participate
/// in conflict detection for this rendering pass.
pub fn project(
    course_id: &str,
    meeting: &Meeting,
    weekday: Weekday,
    window: &DisplayWindow,
) -> Option<Occurrence> {
    if !meeting.recurs_on(weekday) {
        return None;
    }

    let start_min = meeting
        .start()
        .minutes()
        .clamp(window.start_min(), window.end_min());
    let end_min = meeting
        .end()
        .minutes()
        .clamp(window.start_min(), window.end_min());
    if end_min <= start_min {
        return None;
    }

    Some(Occurrence {
        owner: OwnerKey::new(course_id, meeting),
        weekday,
        start_min,
        end_min,
    })
}

/// Project every `(meeting, weekday)` pair of a selection into occurrences.
///
/// Input is `(course_id, meeting)` pairs; output order follows input order,
/// then each meeting's weekday order.
pub fn project_week<'a, I>(selected: I, window: &DisplayWindow) -> Vec<Occurrence>
where
    I: IntoIterator<Item = (&'a str, &'a Meeting)>,
{
    let mut occurrences = Vec::new();
    for (course_id, meeting) in selected {
        for &weekday in meeting.weekdays() {
            if let Some(occ) = project(course_id, meeting, weekday, window) {
                occurrences.push(occ);
            }
        }
    }
    occurrences
}

// ── Tests ───────────────────────────────────────────────────────────────────
