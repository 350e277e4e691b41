//! The normalized meeting model.
//!
//! A [`Meeting`] is one recurring weekly occurrence owned by a [`Course`]: a
//! set of weekdays plus a clock interval, immutable once constructed. A
//! changed selection is represented by choosing a different `Meeting`, never
//! by mutating one.
//!
//! Weekdays use [`chrono::Weekday`] (Monday-first). Catalog data encodes
//! recurrence as compact single-letter strings (`"MWF"`, `"TR"`) with the
//! Thu=R / Sat=S / Sun=U convention; see [`parse_weekdays`].

use chrono::Weekday;
use serde::Serialize;

use crate::clock::ClockTime;
use crate::error::{Result, ScheduleError};

// ── MeetingType ─────────────────────────────────────────────────────────────

/// Validated section-group label (`LEC`, `LAB`, `REC`, ...).
///
/// Normalized (trimmed, uppercased) at the ingestion boundary so the
/// algorithmic core never groups by raw strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MeetingType(String);

impl MeetingType {
    pub fn new(label: &str) -> Result<Self> {
        let normalized = label.trim().to_ascii_uppercase();
        if normalized.is_empty() {
            return Err(ScheduleError::InvalidMeetingType(
                "empty meeting type label".to_string(),
            ));
        }
        Ok(MeetingType(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MeetingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Weekday parsing ─────────────────────────────────────────────────────────

/// Parse a compact weekday string (`"MWF"`, `"TR"`, `"R"`) into weekdays.
///
/// Alphabet: M/T/W/R/F/S/U with Thu=R, Sat=S, Sun=U. Unknown symbols are
/// dropped with a warning — the meeting simply does not recur on a day the
/// catalog cannot express — and duplicates are removed, preserving first-seen
/// order.
pub fn parse_weekdays(compact: &str) -> Vec<Weekday> {
    let mut days = Vec::new();
    for symbol in compact.trim().chars() {
        let day = match symbol.to_ascii_uppercase() {
            'M' => Weekday::Mon,
            'T' => Weekday::Tue,
            'W' => Weekday::Wed,
            'R' => Weekday::Thu,
            'F' => Weekday::Fri,
            'S' => Weekday::Sat,
            'U' => Weekday::Sun,
            other => {
                log::warn!("unknown weekday symbol {other:?} in {compact:?}, dropped");
                continue;
            }
        };
        if !days.contains(&day) {
            days.push(day);
        }
    }
    days
}

// ── Meeting ─────────────────────────────────────────────────────────────────

/// One recurring weekly occurrence: a weekday set plus a clock interval.
///
/// The constructor enforces `start < end`; zero- or negative-duration
/// meetings are rejected at the boundary, so the computation paths never see
/// one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Meeting {
    meeting_type: MeetingType,
    section_id: String,
    weekdays: Vec<Weekday>,
    start: ClockTime,
    end: ClockTime,
    location: Option<String>,
    instructor: Option<String>,
}

impl Meeting {
    pub fn new(
        meeting_type: MeetingType,
        section_id: impl Into<String>,
        weekdays: Vec<Weekday>,
        start: ClockTime,
        end: ClockTime,
    ) -> Result<Self> {
        let section_id = section_id.into();
        if start >= end {
            return Err(ScheduleError::InvalidMeeting(format!(
                "{meeting_type} {section_id}: start {start} is not before end {end}"
            )));
        }
        Ok(Meeting {
            meeting_type,
            section_id,
            weekdays,
            start,
            end,
            location: None,
            instructor: None,
        })
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_instructor(mut self, instructor: impl Into<String>) -> Self {
        self.instructor = Some(instructor.into());
        self
    }

    pub fn meeting_type(&self) -> &MeetingType {
        &self.meeting_type
    }

    pub fn section_id(&self) -> &str {
        &self.section_id
    }

    pub fn weekdays(&self) -> &[Weekday] {
        &self.weekdays
    }

    pub fn recurs_on(&self, weekday: Weekday) -> bool {
        self.weekdays.contains(&weekday)
    }

    pub fn start(&self) -> ClockTime {
        self.start
    }

    pub fn end(&self) -> ClockTime {
        self.end
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn instructor(&self) -> Option<&str> {
        self.instructor.as_deref()
    }
}

// ── Course ──────────────────────────────────────────────────────────────────

/// A course: identifier, title, and its catalog of meetings in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    meetings: Vec<Meeting>,
}

impl Course {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Course {
            id: id.into(),
            title: title.into(),
            meetings: Vec::new(),
        }
    }

    pub fn with_meeting(mut self, meeting: Meeting) -> Self {
        self.meetings.push(meeting);
        self
    }

    pub fn add_meeting(&mut self, meeting: Meeting) {
        self.meetings.push(meeting);
    }

    /// The full catalog of meetings, in source order.
    pub fn meetings(&self) -> &[Meeting] {
        &self.meetings
    }

    /// All catalog meetings of one type (the alternatives a user picks among).
    pub fn sections_of<'a>(
        &'a self,
        meeting_type: &'a MeetingType,
    ) -> impl Iterator<Item = &'a Meeting> {
        self.meetings
            .iter()
            .filter(move |m| m.meeting_type() == meeting_type)
    }

    pub fn find_section(&self, meeting_type: &MeetingType, section_id: &str) -> Option<&Meeting> {
        self.meetings
            .iter()
            .find(|m| m.meeting_type() == meeting_type && m.section_id() == section_id)
    }
}

// ── OwnerKey ────────────────────────────────────────────────────────────────

/// Uniquely identifies the meeting an occurrence was projected from.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct OwnerKey {
    pub course_id: String,
    pub meeting_type: MeetingType,
    pub section_id: String,
}

impl OwnerKey {
    pub fn new(course_id: &str, meeting: &Meeting) -> Self {
        OwnerKey {
            course_id: course_id.to_string(),
            meeting_type: meeting.meeting_type().clone(),
            section_id: meeting.section_id().to_string(),
        }
    }
}

impl std::fmt::Display for OwnerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}-{}",
            self.course_id, self.meeting_type, self.section_id
        )
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
