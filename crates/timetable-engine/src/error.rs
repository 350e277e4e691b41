//! Error types for timetable-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid display window: {0}")]
    InvalidWindow(String),

    #[error("Invalid meeting: {0}")]
    InvalidMeeting(String),

    #[error("Invalid meeting type: {0}")]
    InvalidMeetingType(String),

    #[error("Unknown course: {0}")]
    UnknownCourse(String),

    #[error("Unknown section: {0}")]
    UnknownSection(String),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
