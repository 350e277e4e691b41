//! The schedule session: owned selection state plus the recompute pipeline.
//!
//! A [`ScheduleSession`] is an explicitly passed, owned object — there is no
//! process-wide "current schedule". It holds the display window and the
//! courses the user is working with; per course, the full catalog plus at
//! most one selected meeting per [`MeetingType`] (choosing a Lab replaces the
//! previous Lab in one map insert, so no transient state ever has both or
//! neither).
//!
//! Reads recompute from scratch over the current selection: projection,
//! per-weekday conflict sweep, layout. With tens to low hundreds of
//! occurrences that is cheap, and it guarantees every read reflects exactly
//! one consistent snapshot — no incremental patching, no dirty reads.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::Weekday;
use serde::Serialize;

use crate::clock::format_12h;
use crate::conflict::{conflicts_by_weekday, would_conflict};
use crate::error::{Result, ScheduleError};
use crate::layout::{layout, LayoutBox};
use crate::meeting::{Course, Meeting, MeetingType, OwnerKey};
use crate::project::{project, DisplayWindow, Occurrence};

/// One course inside a session: its catalog plus the current selection.
#[derive(Debug, Clone)]
struct SessionCourse {
    course: Course,
    /// At most one selected meeting per type; insert is the atomic
    /// replacement step.
    selected: BTreeMap<MeetingType, Meeting>,
}

/// A laid-out, conflict-annotated occurrence, ready for a renderer.
#[derive(Debug, Clone, Serialize)]
pub struct PlacedOccurrence {
    pub owner: OwnerKey,
    pub weekday: Weekday,
    pub start_min: u16,
    pub end_min: u16,
    pub title: String,
    /// `"9AM–10AM"` style label from the meeting's unclipped times.
    pub time_label: String,
    pub location: Option<String>,
    #[serde(flatten)]
    pub layout: LayoutBox,
    pub conflicted: bool,
}

/// Owned schedule state for one browsing session.
#[derive(Debug, Clone)]
pub struct ScheduleSession {
    window: DisplayWindow,
    courses: Vec<SessionCourse>,
}

impl ScheduleSession {
    pub fn new(window: DisplayWindow) -> Self {
        ScheduleSession {
            window,
            courses: Vec::new(),
        }
    }

    pub fn window(&self) -> DisplayWindow {
        self.window
    }

    // ── Course set ──────────────────────────────────────────────────────

    /// Add a course with an empty selection. Adding an id already present is
    /// a no-op.
    pub fn add_course(&mut self, course: Course) {
        if self.contains(&course.id) {
            return;
        }
        self.courses.push(SessionCourse {
            course,
            selected: BTreeMap::new(),
        });
    }

    /// Remove a course and its selections. Returns whether it was present.
    pub fn remove_course(&mut self, course_id: &str) -> bool {
        let before = self.courses.len();
        self.courses.retain(|sc| sc.course.id != course_id);
        self.courses.len() != before
    }

    pub fn clear(&mut self) {
        self.courses.clear();
    }

    pub fn contains(&self, course_id: &str) -> bool {
        self.courses.iter().any(|sc| sc.course.id == course_id)
    }

    pub fn courses(&self) -> impl Iterator<Item = &Course> {
        self.courses.iter().map(|sc| &sc.course)
    }

    // ── Selection ───────────────────────────────────────────────────────

    /// Select a catalog section, replacing any previously selected meeting of
    /// the same type for that course. The replacement is a single map insert:
    /// no observable intermediate state.
    pub fn choose(
        &mut self,
        course_id: &str,
        meeting_type: &MeetingType,
        section_id: &str,
    ) -> Result<()> {
        let sc = self.course_mut(course_id)?;
        let meeting = sc
            .course
            .find_section(meeting_type, section_id)
            .ok_or_else(|| {
                ScheduleError::UnknownSection(format!("{course_id}/{meeting_type}-{section_id}"))
            })?
            .clone();
        sc.selected.insert(meeting_type.clone(), meeting);
        Ok(())
    }

    /// Drop the selected meeting of one type, if any. Returns whether a
    /// selection was removed.
    pub fn unselect(&mut self, course_id: &str, meeting_type: &MeetingType) -> Result<bool> {
        let sc = self.course_mut(course_id)?;
        Ok(sc.selected.remove(meeting_type).is_some())
    }

    /// The selected meetings of one course, ordered by meeting type.
    pub fn selected(&self, course_id: &str) -> Result<impl Iterator<Item = &Meeting>> {
        let sc = self
            .courses
            .iter()
            .find(|sc| sc.course.id == course_id)
            .ok_or_else(|| ScheduleError::UnknownCourse(course_id.to_string()))?;
        Ok(sc.selected.values())
    }

    fn course_mut(&mut self, course_id: &str) -> Result<&mut SessionCourse> {
        self.courses
            .iter_mut()
            .find(|sc| sc.course.id == course_id)
            .ok_or_else(|| ScheduleError::UnknownCourse(course_id.to_string()))
    }

    // ── Queries (full recomputation per call) ───────────────────────────

    /// The week's renderable set: every selected meeting projected onto its
    /// weekdays, clipped, conflict-annotated, and laid out.
    ///
    /// Conflicts are detected on the clipped occurrences, after projection —
    /// a meeting invisible in the window does not participate.
    pub fn placed_week(&self) -> Vec<PlacedOccurrence> {
        let mut occurrences: Vec<Occurrence> = Vec::new();
        let mut meta: HashMap<OwnerKey, (&Course, &Meeting)> = HashMap::new();

        for sc in &self.courses {
            for meeting in sc.selected.values() {
                meta.insert(
                    OwnerKey::new(&sc.course.id, meeting),
                    (&sc.course, meeting),
                );
                for &weekday in meeting.weekdays() {
                    if let Some(occ) = project(&sc.course.id, meeting, weekday, &self.window) {
                        occurrences.push(occ);
                    }
                }
            }
        }

        let conflicts = conflicts_by_weekday(&occurrences);

        occurrences
            .into_iter()
            .map(|occ| {
                let (course, meeting) = meta[&occ.owner];
                let conflicted = conflicts
                    .get(&occ.weekday)
                    .is_some_and(|day| day.contains(&occ.owner));
                let placed = layout(&occ, &self.window);
                PlacedOccurrence {
                    title: course.title.clone(),
                    time_label: format!(
                        "{}–{}",
                        format_12h(meeting.start()),
                        format_12h(meeting.end())
                    ),
                    location: meeting.location().map(str::to_string),
                    layout: placed,
                    conflicted,
                    weekday: occ.weekday,
                    start_min: occ.start_min,
                    end_min: occ.end_min,
                    owner: occ.owner,
                }
            })
            .collect()
    }

    /// Owners conflicted on at least one weekday, for list-style summaries.
    pub fn conflicted_owners(&self) -> BTreeSet<OwnerKey> {
        self.placed_week()
            .into_iter()
            .filter(|p| p.conflicted)
            .map(|p| p.owner)
            .collect()
    }

    /// Would `candidate` conflict if chosen for `course_id`?
    ///
    /// The comparison set is every other course's selected meetings plus the
    /// same course's selected meetings of *other* types (the candidate would
    /// replace its own type's selection, so that one is excluded). Pure
    /// query on unclipped intervals; nothing is mutated.
    pub fn would_conflict_if_chosen(&self, course_id: &str, candidate: &Meeting) -> bool {
        let others = self.courses.iter().flat_map(|sc| {
            sc.selected.values().filter(move |m| {
                sc.course.id != course_id || m.meeting_type() != candidate.meeting_type()
            })
        });
        would_conflict(candidate, others)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{parse_clock, ClockTime};
    use crate::meeting::parse_weekdays;

    fn mt(label: &str) -> MeetingType {
        MeetingType::new(label).unwrap()
    }

    fn meeting(type_label: &str, section: &str, days: &str, start: u16, end: u16) -> Meeting {
        Meeting::new(
            mt(type_label),
            section,
            parse_weekdays(days),
            ClockTime::from_minutes(start),
            ClockTime::from_minutes(end),
        )
        .unwrap()
    }

    fn session() -> ScheduleSession {
        ScheduleSession::new(DisplayWindow::new(8, 20).unwrap())
    }

    #[test]
    fn test_add_course_is_idempotent() {
        let mut s = session();
        s.add_course(Course::new("C1", "One"));
        s.add_course(Course::new("C1", "One again"));
        assert_eq!(s.courses().count(), 1);
        assert!(s.contains("C1"));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut s = session();
        s.add_course(Course::new("C1", "One"));
        s.add_course(Course::new("C2", "Two"));
        assert!(s.remove_course("C1"));
        assert!(!s.remove_course("C1"));
        s.clear();
        assert_eq!(s.courses().count(), 0);
    }

    #[test]
    fn test_choose_unknown_course_or_section() {
        let mut s = session();
        s.add_course(Course::new("C1", "One").with_meeting(meeting("LEC", "01", "M", 540, 600)));
        assert!(matches!(
            s.choose("C9", &mt("LEC"), "01"),
            Err(ScheduleError::UnknownCourse(_))
        ));
        assert!(matches!(
            s.choose("C1", &mt("LEC"), "99"),
            Err(ScheduleError::UnknownSection(_))
        ));
    }

    #[test]
    fn test_selection_replacement_is_atomic() {
        // Choosing a new Lab leaves exactly one Lab selected, never zero or two.
        let mut s = session();
        s.add_course(
            Course::new("C1", "One")
                .with_meeting(meeting("LAB", "L1", "T", 540, 660))
                .with_meeting(meeting("LAB", "L2", "R", 540, 660)),
        );
        s.choose("C1", &mt("LAB"), "L1").unwrap();
        s.choose("C1", &mt("LAB"), "L2").unwrap();

        let labs: Vec<&Meeting> = s.selected("C1").unwrap().collect();
        assert_eq!(labs.len(), 1);
        assert_eq!(labs[0].section_id(), "L2");
    }

    #[test]
    fn test_one_selection_per_type_across_types() {
        let mut s = session();
        s.add_course(
            Course::new("C1", "One")
                .with_meeting(meeting("LEC", "01", "MWF", 540, 600))
                .with_meeting(meeting("LAB", "L1", "T", 600, 720)),
        );
        s.choose("C1", &mt("LEC"), "01").unwrap();
        s.choose("C1", &mt("LAB"), "L1").unwrap();
        assert_eq!(s.selected("C1").unwrap().count(), 2);

        assert!(s.unselect("C1", &mt("LAB")).unwrap());
        assert!(!s.unselect("C1", &mt("LAB")).unwrap());
        assert_eq!(s.selected("C1").unwrap().count(), 1);
    }

    #[test]
    fn test_placed_week_end_to_end() {
        // Window 8:00–20:00 (720 min). A = MWF 9:00–10:00, B = W 9:30–10:45.
        let mut s = session();
        s.add_course(Course::new("A", "Course A").with_meeting(meeting(
            "LEC",
            "01",
            "MWF",
            parse_clock("9:00AM").time.minutes(),
            parse_clock("10:00AM").time.minutes(),
        )));
        s.add_course(Course::new("B", "Course B").with_meeting(meeting(
            "LEC",
            "01",
            "W",
            parse_clock("9:30AM").time.minutes(),
            parse_clock("10:45AM").time.minutes(),
        )));
        s.choose("A", &mt("LEC"), "01").unwrap();
        s.choose("B", &mt("LEC"), "01").unwrap();

        let placed = s.placed_week();
        assert_eq!(placed.len(), 4); // A on Mon/Wed/Fri + B on Wed

        let find = |course: &str, day: Weekday| {
            placed
                .iter()
                .find(|p| p.owner.course_id == course && p.weekday == day)
                .unwrap()
        };

        assert!(!find("A", Weekday::Mon).conflicted);
        assert!(!find("A", Weekday::Fri).conflicted);
        assert!(find("A", Weekday::Wed).conflicted);
        assert!(find("B", Weekday::Wed).conflicted);

        let a_wed = find("A", Weekday::Wed);
        assert!((a_wed.layout.top_pct - 8.33).abs() < 0.01);
        assert!((a_wed.layout.height_pct - 8.33).abs() < 0.01);

        let b_wed = find("B", Weekday::Wed);
        assert!((b_wed.layout.top_pct - 12.5).abs() < 0.01);
        assert!((b_wed.layout.height_pct - 10.42).abs() < 0.01);

        assert_eq!(a_wed.time_label, "9AM–10AM");
        assert_eq!(b_wed.time_label, "9:30AM–10:45AM");
    }

    #[test]
    fn test_placed_week_height_for_45_minute_meeting() {
        // 9:30–10:15 in a 720-minute window: 45/720 = 6.25% tall.
        let mut s = session();
        s.add_course(Course::new("B", "Course B").with_meeting(meeting(
            "LEC",
            "01",
            "W",
            parse_clock("9:30AM").time.minutes(),
            parse_clock("10:15AM").time.minutes(),
        )));
        s.choose("B", &mt("LEC"), "01").unwrap();

        let placed = s.placed_week();
        assert_eq!(placed.len(), 1);
        assert!((placed[0].layout.top_pct - 12.5).abs() < 0.01);
        assert!((placed[0].layout.height_pct - 6.25).abs() < 0.01);
    }

    #[test]
    fn test_placed_week_excludes_fully_clipped() {
        // 6:00–7:00 is entirely before the 8:00 window start.
        let mut s = session();
        s.add_course(Course::new("C1", "One").with_meeting(meeting("LEC", "01", "M", 360, 420)));
        s.choose("C1", &mt("LEC"), "01").unwrap();
        assert!(s.placed_week().is_empty());
    }

    #[test]
    fn test_placed_week_reflects_latest_selection() {
        let mut s = session();
        s.add_course(
            Course::new("C1", "One")
                .with_meeting(meeting("LEC", "01", "M", 540, 600))
                .with_meeting(meeting("LEC", "02", "T", 540, 600)),
        );
        s.choose("C1", &mt("LEC"), "01").unwrap();
        assert_eq!(s.placed_week()[0].weekday, Weekday::Mon);

        s.choose("C1", &mt("LEC"), "02").unwrap();
        let placed = s.placed_week();
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].weekday, Weekday::Tue);
    }

    #[test]
    fn test_conflicted_owners_summary() {
        let mut s = session();
        s.add_course(Course::new("A", "A").with_meeting(meeting("LEC", "01", "W", 540, 600)));
        s.add_course(Course::new("B", "B").with_meeting(meeting("LEC", "01", "W", 570, 630)));
        s.add_course(Course::new("C", "C").with_meeting(meeting("LEC", "01", "F", 540, 600)));
        for id in ["A", "B", "C"] {
            s.choose(id, &mt("LEC"), "01").unwrap();
        }
        let owners = s.conflicted_owners();
        assert_eq!(owners.len(), 2);
        assert!(owners.iter().all(|k| k.course_id != "C"));
    }

    #[test]
    fn test_would_conflict_preview_does_not_mutate() {
        let mut s = session();
        s.add_course(Course::new("A", "A").with_meeting(meeting("LEC", "01", "MWF", 540, 600)));
        s.add_course(
            Course::new("B", "B")
                .with_meeting(meeting("LEC", "01", "W", 570, 630))
                .with_meeting(meeting("LEC", "02", "T", 570, 630)),
        );
        s.choose("A", &mt("LEC"), "01").unwrap();

        let clashing = meeting("LEC", "01", "W", 570, 630);
        let clear = meeting("LEC", "02", "T", 570, 630);
        assert!(s.would_conflict_if_chosen("B", &clashing));
        assert!(!s.would_conflict_if_chosen("B", &clear));

        // Pure query: B still has no selection.
        assert_eq!(s.selected("B").unwrap().count(), 0);
    }

    #[test]
    fn test_would_conflict_sees_same_course_other_types() {
        // A selected LAB in the same course blocks an overlapping LEC candidate.
        let mut s = session();
        s.add_course(
            Course::new("C1", "One")
                .with_meeting(meeting("LAB", "L1", "T", 540, 660))
                .with_meeting(meeting("LEC", "01", "T", 600, 650)),
        );
        s.choose("C1", &mt("LAB"), "L1").unwrap();

        let lec_candidate = meeting("LEC", "01", "T", 600, 650);
        assert!(s.would_conflict_if_chosen("C1", &lec_candidate));

        // But an alternative of the candidate's own type is not compared.
        let mut s2 = session();
        s2.add_course(
            Course::new("C1", "One")
                .with_meeting(meeting("LEC", "01", "T", 540, 600))
                .with_meeting(meeting("LEC", "02", "T", 540, 600)),
        );
        s2.choose("C1", &mt("LEC"), "01").unwrap();
        let alternative = meeting("LEC", "02", "T", 540, 600);
        assert!(!s2.would_conflict_if_chosen("C1", &alternative));
    }

    #[test]
    fn test_placed_occurrence_serializes() {
        let mut s = session();
        s.add_course(Course::new("C1", "One").with_meeting(
            meeting("LEC", "01", "M", 540, 600).with_location("DCC 308"),
        ));
        s.choose("C1", &mt("LEC"), "01").unwrap();

        let json = serde_json::to_string(&s.placed_week()).unwrap();
        assert!(json.contains("\"top_pct\""), "got: {json}");
        assert!(json.contains("\"conflicted\":false"), "got: {json}");
        assert!(json.contains("DCC 308"), "got: {json}");
    }
}
