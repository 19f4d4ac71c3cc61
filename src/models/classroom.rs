use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Classroom {
    pub id: String,
    pub room_number: String,
    pub building: String,
    pub capacity: i64,
}

/// Body of `POST /timetable/available-rooms`. Fields arrive as strings from
/// the weekly-grid UI and are parsed at the handler boundary so a malformed
/// request surfaces as a 400 with an `{"error": ...}` body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableRoomsRequest {
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}
