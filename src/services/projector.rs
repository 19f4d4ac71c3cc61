//! Timetable projector: the effective weekly view for one viewer.
//!
//! Regular slots are left-joined with their active modification and
//! flattened into entries bucketed by the day the class actually meets.
//! Always a fresh snapshot of the store; nothing is cached. Modification
//! expiry is judged against the current UTC date (see [`project_on`] to
//! supply a different one).

use chrono::{NaiveDate, Utc};
use sqlx::SqliteConnection;

use crate::auth::{Role, Viewer};
use crate::db::repository::{self, ProjectionRow};
use crate::models::{ModificationType, TimetableEntry};
use crate::schedule;

pub async fn project(
    conn: &mut SqliteConnection,
    viewer: &Viewer,
) -> Result<Vec<TimetableEntry>, sqlx::Error> {
    let today = Utc::now().date_naive();
    project_on(conn, viewer, today).await
}

/// Same as [`project`] with an explicit "today", which is what decides
/// whether a modification is still active.
pub async fn project_on(
    conn: &mut SqliteConnection,
    viewer: &Viewer,
    today: NaiveDate,
) -> Result<Vec<TimetableEntry>, sqlx::Error> {
    let rows = match viewer.role {
        Role::Student => {
            let batch = viewer.batch.as_deref().unwrap_or_default();
            repository::slots_for_batch(conn, batch, today).await?
        }
        Role::Professor => repository::slots_for_professor(conn, &viewer.id, today).await?,
    };

    let mut entries: Vec<TimetableEntry> = rows.into_iter().map(flatten).collect();
    entries.sort_by(|a, b| {
        (a.day_of_week, a.start_time, a.class_id.as_str()).cmp(&(
            b.day_of_week,
            b.start_time,
            b.class_id.as_str(),
        ))
    });
    Ok(entries)
}

fn flatten(row: ProjectionRow) -> TimetableEntry {
    // A postponement moves the entry to its new day/time/room; a
    // cancellation stays in place so the grid can strike it through.
    let (day_of_week, start_time, end_time, room_number, building) =
        match (row.modification_type, row.new_date) {
            (Some(ModificationType::Postponed), Some(new_date)) => (
                schedule::iso_weekday(new_date),
                row.new_start_time.unwrap_or(row.start_time),
                row.new_end_time.unwrap_or(row.end_time),
                row.new_room_number,
                row.new_building,
            ),
            _ => (
                row.day_of_week as u32,
                row.start_time,
                row.end_time,
                row.room_number,
                row.building,
            ),
        };

    TimetableEntry {
        class_id: row.id,
        course_name: row.course_name,
        course_code: row.course_code,
        batch: row.batch,
        faculty_name: row.faculty_name,
        room_number,
        building,
        day_of_week,
        start_time,
        end_time,
        modification_type: row.modification_type,
        new_date: row.new_date,
    }
}
