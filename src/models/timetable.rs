use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::models::ModificationType;

/// One effective entry in a viewer's weekly timetable: a regular slot merged
/// with its currently-active modification, already bucketed into the day the
/// class will actually meet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimetableEntry {
    pub class_id: String,
    pub course_name: String,
    pub course_code: String,
    pub batch: String,
    pub faculty_name: String,
    pub room_number: Option<String>,
    pub building: Option<String>,
    /// Effective ISO weekday (1 = Monday .. 7 = Sunday). Postponements
    /// bucket under the weekday of `new_date`; cancellations keep their
    /// original bucket so the grid can strike them through.
    pub day_of_week: u32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub modification_type: Option<ModificationType>,
    pub new_date: Option<NaiveDate>,
}
