use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ModificationType {
    Cancelled,
    Postponed,
}

/// A time-bounded override of one regular slot. Rows are never updated in
/// place; a newer override replaces the active one inside the same
/// transaction, and expiry is purely a query-time filter on `valid_until`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Modification {
    pub id: String,
    pub regular_class_id: String,
    pub modification_type: ModificationType,
    pub new_date: Option<NaiveDate>,
    pub new_start_time: Option<NaiveTime>,
    pub new_end_time: Option<NaiveTime>,
    pub new_classroom_id: Option<String>,
    pub valid_until: NaiveDate,
}

/// Insert shape for `modified_classes`; the id is generated at insert time.
#[derive(Debug, Clone)]
pub struct NewModification<'a> {
    pub regular_class_id: &'a str,
    pub modification_type: ModificationType,
    pub new_date: Option<NaiveDate>,
    pub new_start_time: Option<NaiveTime>,
    pub new_end_time: Option<NaiveTime>,
    pub new_classroom_id: Option<&'a str>,
    pub valid_until: NaiveDate,
}

/// Body of `POST /timetable/postpone-class`. All fields are required; the
/// engine validates and parses them rather than letting the extractor
/// reject with a bodyless 422.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostponeRequest {
    pub class_id: Option<String>,
    pub new_date: Option<String>,
    pub new_start_time: Option<String>,
    pub new_end_time: Option<String>,
    pub new_classroom_id: Option<String>,
    pub valid_until: Option<String>,
}

/// Body of `POST /timetable/cancel-class`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest {
    pub class_id: Option<String>,
}
