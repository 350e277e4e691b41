//! # timetable-engine
//!
//! Deterministic weekly timetable computation for course-schedule UIs.
//!
//! Given courses whose meetings recur on weekday subsets with clock-time
//! intervals, the engine parses ambiguous time strings, projects meetings
//! into per-weekday half-open intervals clipped to a display window, detects
//! every overlap via a per-day sweep line, and derives screen-independent
//! layout percentages — all as pure functions over an explicitly owned
//! session, recomputed from scratch on every query.
//!
//! ## Modules
//!
//! - [`clock`] — clock-time strings ↔ minutes since midnight
//! - [`meeting`] — the normalized Meeting/Course model and owner keys
//! - [`project`] — per-weekday occurrence projection against a display window
//! - [`conflict`] — sweep-line overlap detection and the unclipped preview check
//! - [`layout`] — normalized (top%, height%) grid layout and overlap slices
//! - [`session`] — owned selection state and the recompute pipeline
//! - [`error`] — error types

pub mod clock;
pub mod conflict;
pub mod error;
pub mod layout;
pub mod meeting;
pub mod project;
pub mod session;

pub use clock::{format_12h, parse_clock, ClockTime, ParsedClock};
pub use conflict::{conflicts_by_weekday, conflicts_for_day, meetings_overlap, would_conflict};
pub use error::{Result, ScheduleError};
pub use layout::{conflict_slice, layout, LayoutBox};
pub use meeting::{parse_weekdays, Course, Meeting, MeetingType, OwnerKey};
pub use project::{project, project_week, DisplayWindow, Occurrence};
pub use session::{PlacedOccurrence, ScheduleSession};
