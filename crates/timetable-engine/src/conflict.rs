//! Overlap detection for weekly occurrences.
//!
//! Two entry points, deliberately separate:
//!
//! - [`conflicts_for_day`] / [`conflicts_by_weekday`] — the rendering path.
//!   A sweep over clipped, projected [`Occurrence`]s marks every occurrence
//!   involved in at least one overlap on its weekday. Occurrences on
//!   different weekdays never conflict, so each weekday is swept
//!   independently.
//! - [`meetings_overlap`] / [`would_conflict`] — the preview path. A pairwise
//!   test on *unclipped* meeting intervals, used to answer "would this
//!   alternative conflict if chosen" without mutating anything and without
//!   depending on the display window.
//!
//! All intervals are half-open `[start, end)`: a meeting ending at minute 600
//! does not conflict with one starting at minute 600.

use std::collections::{HashMap, HashSet};

use chrono::Weekday;

use crate::meeting::{Meeting, OwnerKey};
use crate::project::Occurrence;

/// Boundary event kinds, ordered so that at an identical instant the `-1`
/// (close) event sorts before the `+1` (open) event. That ordering is what
/// makes the intervals half-open: back-to-back occurrences are never
/// simultaneously active.
const EV_CLOSE: u8 = 0;
const EV_OPEN: u8 = 1;

/// Find every occurrence involved in at least one overlap on a single
/// weekday.
///
/// Sweep line over boundary events: each occurrence contributes an open event
/// at `start_min` and a close event at `end_min`. When an occurrence opens
/// while others are already open, it and every open occurrence are marked;
/// once marked, an occurrence stays marked. Event sort is `O(n log n)`.
///
/// The caller provides occurrences for one weekday (the projector guarantees
/// this for the rendering pipeline; see [`conflicts_by_weekday`] for the
/// multi-day entry point).
pub fn conflicts_for_day(occurrences: &[&Occurrence]) -> HashSet<OwnerKey> {
    debug_assert!(
        occurrences
            .windows(2)
            .all(|pair| pair[0].weekday == pair[1].weekday),
        "conflicts_for_day expects occurrences of a single weekday"
    );

    let mut events: Vec<(u16, u8, usize)> = Vec::with_capacity(occurrences.len() * 2);
    for (i, occ) in occurrences.iter().enumerate() {
        events.push((occ.start_min, EV_OPEN, i));
        events.push((occ.end_min, EV_CLOSE, i));
    }
    events.sort_unstable();

    let mut open: Vec<usize> = Vec::new();
    let mut conflicted: HashSet<OwnerKey> = HashSet::new();

    for (_, kind, idx) in events {
        match kind {
            EV_OPEN => {
                if !open.is_empty() {
                    conflicted.insert(occurrences[idx].owner.clone());
                    for &other in &open {
                        conflicted.insert(occurrences[other].owner.clone());
                    }
                }
                open.push(idx);
            }
            _ => {
                if let Some(pos) = open.iter().position(|&i| i == idx) {
                    open.swap_remove(pos);
                }
            }
        }
    }

    conflicted
}

/// Run the sweep independently per weekday over a full week of occurrences.
///
/// The returned map holds, per weekday, the owners conflicted *on that day* —
/// a meeting recurring on Mon and Wed can be conflicted on Wed while its Mon
/// projection stays clean.
pub fn conflicts_by_weekday(occurrences: &[Occurrence]) -> HashMap<Weekday, HashSet<OwnerKey>> {
    let mut by_day: HashMap<Weekday, Vec<&Occurrence>> = HashMap::new();
    for occ in occurrences {
        by_day.entry(occ.weekday).or_default().push(occ);
    }

    by_day
        .into_iter()
        .map(|(weekday, day_occs)| (weekday, conflicts_for_day(&day_occs)))
        .collect()
}

/// Pairwise overlap test on unclipped meeting intervals.
///
/// True when the meetings share at least one weekday and their clock
/// intervals intersect under half-open semantics.
pub fn meetings_overlap(a: &Meeting, b: &Meeting) -> bool {
    let share_day = a.weekdays().iter().any(|&day| b.recurs_on(day));
    share_day && a.start() < b.end() && b.start() < a.end()
}

/// Would `candidate` conflict with any meeting in `others` if chosen?
///
/// Side-effect-free preview; compares unclipped intervals.
pub fn would_conflict<'a, I>(candidate: &Meeting, others: I) -> bool
where
    I: IntoIterator<Item = &'a Meeting>,
{
    others
        .into_iter()
        .any(|other| meetings_overlap(candidate, other))
}

// ── Tests ───────────────────────────────────────────────────────────────────
