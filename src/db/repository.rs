//! Parameterized queries against the entity store.
//!
//! Every function takes `&mut SqliteConnection` so the same query runs
//! identically on a pooled connection or inside an open transaction; the
//! conflict engine relies on that to re-check availability under its write
//! lock. Role-dependent reads are separate functions rather than one
//! string-assembled query.

use chrono::{NaiveDate, NaiveTime};
use sqlx::{FromRow, SqliteConnection};
use uuid::Uuid;

use crate::models::{
    Classroom, ClassDetail, Course, Modification, ModificationType, NewModification, RegularSlot,
};

/// A booked time window attributed to the slot that owns it. Conflict ids
/// are regular-slot ids for both occupancy sources, so a postponement can
/// recognize (and ignore) its own slot.
#[derive(Debug, Clone, FromRow)]
pub struct Occupancy {
    pub id: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// A booked time window attributed to the room holding it; feeds the
/// available-rooms computation across all rooms at once.
#[derive(Debug, Clone, FromRow)]
pub struct RoomOccupancy {
    pub classroom_id: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Joined row the projector flattens into a `TimetableEntry`.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectionRow {
    pub id: String,
    pub batch: String,
    pub day_of_week: i64,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub course_name: String,
    pub course_code: String,
    pub faculty_name: String,
    pub room_number: Option<String>,
    pub building: Option<String>,
    pub modification_type: Option<ModificationType>,
    pub new_date: Option<NaiveDate>,
    pub new_start_time: Option<NaiveTime>,
    pub new_end_time: Option<NaiveTime>,
    pub new_room_number: Option<String>,
    pub new_building: Option<String>,
}

pub async fn find_slot(
    conn: &mut SqliteConnection,
    id: &str,
) -> Result<Option<RegularSlot>, sqlx::Error> {
    sqlx::query_as::<_, RegularSlot>(
        "SELECT id, course_id, batch, day_of_week, start_time, end_time, classroom_id
         FROM regular_timetable WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
}

pub async fn find_course(
    conn: &mut SqliteConnection,
    id: &str,
) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        "SELECT id, course_name, course_code, professor_id FROM courses WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
}

pub async fn find_classroom(
    conn: &mut SqliteConnection,
    id: &str,
) -> Result<Option<Classroom>, sqlx::Error> {
    sqlx::query_as::<_, Classroom>(
        "SELECT id, room_number, building, capacity FROM classrooms WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
}

pub async fn fetch_classrooms(
    conn: &mut SqliteConnection,
) -> Result<Vec<Classroom>, sqlx::Error> {
    sqlx::query_as::<_, Classroom>(
        "SELECT id, room_number, building, capacity FROM classrooms
         ORDER BY building, room_number",
    )
    .fetch_all(&mut *conn)
    .await
}

pub async fn class_detail(
    conn: &mut SqliteConnection,
    id: &str,
) -> Result<Vec<ClassDetail>, sqlx::Error> {
    sqlx::query_as::<_, ClassDetail>(
        "SELECT rt.id, rt.course_id, rt.batch, rt.day_of_week, rt.start_time, rt.end_time,
                rt.classroom_id, c.course_name, cl.room_number
         FROM regular_timetable rt
         JOIN courses c ON c.id = rt.course_id
         JOIN classrooms cl ON cl.id = rt.classroom_id
         WHERE rt.id = ?",
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await
}

// Occupancy queries below narrow by weekday/date and scope; the interval
// overlap itself is decided in `schedule::overlaps` by the caller.
//
// A regular slot stops occupying its weekly window while it carries any
// active modification: a cancellation frees the room outright and a
// postponement's occupancy is represented by its modification row instead.

pub async fn regular_occupancies_for_room(
    conn: &mut SqliteConnection,
    classroom_id: &str,
    weekday: i64,
    active_on: NaiveDate,
) -> Result<Vec<Occupancy>, sqlx::Error> {
    sqlx::query_as::<_, Occupancy>(
        "SELECT rt.id, rt.start_time, rt.end_time
         FROM regular_timetable rt
         WHERE rt.classroom_id = ?
           AND rt.day_of_week = ?
           AND NOT EXISTS (
               SELECT 1 FROM modified_classes mc
               WHERE mc.regular_class_id = rt.id AND mc.valid_until >= ?
           )",
    )
    .bind(classroom_id)
    .bind(weekday)
    .bind(active_on)
    .fetch_all(&mut *conn)
    .await
}

pub async fn regular_occupancies_for_professor(
    conn: &mut SqliteConnection,
    professor_id: &str,
    weekday: i64,
    active_on: NaiveDate,
) -> Result<Vec<Occupancy>, sqlx::Error> {
    sqlx::query_as::<_, Occupancy>(
        "SELECT rt.id, rt.start_time, rt.end_time
         FROM regular_timetable rt
         JOIN courses c ON c.id = rt.course_id
         WHERE c.professor_id = ?
           AND rt.day_of_week = ?
           AND NOT EXISTS (
               SELECT 1 FROM modified_classes mc
               WHERE mc.regular_class_id = rt.id AND mc.valid_until >= ?
           )",
    )
    .bind(professor_id)
    .bind(weekday)
    .bind(active_on)
    .fetch_all(&mut *conn)
    .await
}

pub async fn postponed_occupancies_for_room(
    conn: &mut SqliteConnection,
    classroom_id: &str,
    date: NaiveDate,
) -> Result<Vec<Occupancy>, sqlx::Error> {
    sqlx::query_as::<_, Occupancy>(
        "SELECT mc.regular_class_id AS id,
                mc.new_start_time AS start_time,
                mc.new_end_time AS end_time
         FROM modified_classes mc
         WHERE mc.new_classroom_id = ?
           AND mc.new_date = ?
           AND mc.modification_type = 'postponed'
           AND mc.valid_until >= ?",
    )
    .bind(classroom_id)
    .bind(date)
    .bind(date)
    .fetch_all(&mut *conn)
    .await
}

pub async fn postponed_occupancies_for_professor(
    conn: &mut SqliteConnection,
    professor_id: &str,
    date: NaiveDate,
) -> Result<Vec<Occupancy>, sqlx::Error> {
    sqlx::query_as::<_, Occupancy>(
        "SELECT mc.regular_class_id AS id,
                mc.new_start_time AS start_time,
                mc.new_end_time AS end_time
         FROM modified_classes mc
         JOIN regular_timetable rt ON rt.id = mc.regular_class_id
         JOIN courses c ON c.id = rt.course_id
         WHERE c.professor_id = ?
           AND mc.new_date = ?
           AND mc.modification_type = 'postponed'
           AND mc.valid_until >= ?",
    )
    .bind(professor_id)
    .bind(date)
    .bind(date)
    .fetch_all(&mut *conn)
    .await
}

pub async fn room_regular_occupancies(
    conn: &mut SqliteConnection,
    weekday: i64,
    active_on: NaiveDate,
) -> Result<Vec<RoomOccupancy>, sqlx::Error> {
    sqlx::query_as::<_, RoomOccupancy>(
        "SELECT rt.classroom_id, rt.start_time, rt.end_time
         FROM regular_timetable rt
         WHERE rt.day_of_week = ?
           AND NOT EXISTS (
               SELECT 1 FROM modified_classes mc
               WHERE mc.regular_class_id = rt.id AND mc.valid_until >= ?
           )",
    )
    .bind(weekday)
    .bind(active_on)
    .fetch_all(&mut *conn)
    .await
}

pub async fn room_postponed_occupancies(
    conn: &mut SqliteConnection,
    date: NaiveDate,
) -> Result<Vec<RoomOccupancy>, sqlx::Error> {
    sqlx::query_as::<_, RoomOccupancy>(
        "SELECT mc.new_classroom_id AS classroom_id,
                mc.new_start_time AS start_time,
                mc.new_end_time AS end_time
         FROM modified_classes mc
         WHERE mc.new_date = ?
           AND mc.modification_type = 'postponed'
           AND mc.new_classroom_id IS NOT NULL
           AND mc.valid_until >= ?",
    )
    .bind(date)
    .bind(date)
    .fetch_all(&mut *conn)
    .await
}

pub async fn active_modification(
    conn: &mut SqliteConnection,
    regular_class_id: &str,
    today: NaiveDate,
) -> Result<Option<Modification>, sqlx::Error> {
    sqlx::query_as::<_, Modification>(
        "SELECT id, regular_class_id, modification_type, new_date, new_start_time,
                new_end_time, new_classroom_id, valid_until
         FROM modified_classes
         WHERE regular_class_id = ? AND valid_until >= ?",
    )
    .bind(regular_class_id)
    .bind(today)
    .fetch_optional(&mut *conn)
    .await
}

/// Removes any still-active override for the slot so the row about to be
/// inserted is the only active one. Must run inside the caller's
/// transaction.
pub async fn supersede_active_modifications(
    conn: &mut SqliteConnection,
    regular_class_id: &str,
    today: NaiveDate,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "DELETE FROM modified_classes WHERE regular_class_id = ? AND valid_until >= ?",
    )
    .bind(regular_class_id)
    .bind(today)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}

pub async fn insert_modification(
    conn: &mut SqliteConnection,
    new: NewModification<'_>,
) -> Result<String, sqlx::Error> {
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        "INSERT INTO modified_classes
            (id, regular_class_id, modification_type, new_date, new_start_time,
             new_end_time, new_classroom_id, valid_until)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(new.regular_class_id)
    .bind(new.modification_type)
    .bind(new.new_date)
    .bind(new.new_start_time)
    .bind(new.new_end_time)
    .bind(new.new_classroom_id)
    .bind(new.valid_until)
    .execute(&mut *conn)
    .await?;

    Ok(id)
}

const PROJECTION_COLUMNS: &str = "rt.id, rt.batch, rt.day_of_week, rt.start_time, rt.end_time,
       c.course_name, c.course_code, u.username AS faculty_name,
       cl.room_number, cl.building,
       mc.modification_type, mc.new_date, mc.new_start_time, mc.new_end_time,
       ncl.room_number AS new_room_number, ncl.building AS new_building";

pub async fn slots_for_batch(
    conn: &mut SqliteConnection,
    batch: &str,
    today: NaiveDate,
) -> Result<Vec<ProjectionRow>, sqlx::Error> {
    let sql = format!(
        "SELECT {PROJECTION_COLUMNS}
         FROM regular_timetable rt
         JOIN courses c ON c.id = rt.course_id
         JOIN users u ON u.id = c.professor_id
         LEFT JOIN classrooms cl ON cl.id = rt.classroom_id
         LEFT JOIN modified_classes mc
                ON mc.regular_class_id = rt.id AND mc.valid_until >= ?
         LEFT JOIN classrooms ncl ON ncl.id = mc.new_classroom_id
         WHERE rt.batch = ?"
    );

    sqlx::query_as::<_, ProjectionRow>(&sql)
        .bind(today)
        .bind(batch)
        .fetch_all(&mut *conn)
        .await
}

pub async fn slots_for_professor(
    conn: &mut SqliteConnection,
    professor_id: &str,
    today: NaiveDate,
) -> Result<Vec<ProjectionRow>, sqlx::Error> {
    let sql = format!(
        "SELECT {PROJECTION_COLUMNS}
         FROM regular_timetable rt
         JOIN courses c ON c.id = rt.course_id
         JOIN users u ON u.id = c.professor_id
         LEFT JOIN classrooms cl ON cl.id = rt.classroom_id
         LEFT JOIN modified_classes mc
                ON mc.regular_class_id = rt.id AND mc.valid_until >= ?
         LEFT JOIN classrooms ncl ON ncl.id = mc.new_classroom_id
         WHERE c.professor_id = ?"
    );

    sqlx::query_as::<_, ProjectionRow>(&sql)
        .bind(today)
        .bind(professor_id)
        .fetch_all(&mut *conn)
        .await
}
