use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A recurring weekly class occurrence. Append-only; edits to the weekly
/// template are out of scope, overrides go through `modified_classes`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RegularSlot {
    pub id: String,
    pub course_id: String,
    pub batch: String,
    /// ISO weekday, 1 = Monday .. 7 = Sunday.
    pub day_of_week: i64,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub classroom_id: String,
}

/// Row shape for `GET /timetable/class/{id}`: the slot joined with its
/// course name and room number.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ClassDetail {
    pub id: String,
    pub course_id: String,
    pub batch: String,
    pub day_of_week: i64,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub classroom_id: String,
    pub course_name: String,
    pub room_number: String,
}
