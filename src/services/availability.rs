//! Availability resolver: which slots occupy a room or a professor in a
//! given date + time window.
//!
//! Two occupancy sources are unioned: regular weekly slots matching the
//! date's weekday, and active postponements landing on the exact date. The
//! store narrows by weekday/date and scope; the interval comparison itself
//! runs here through `schedule::overlaps` with inclusive boundaries.
//!
//! Read-only. Callers needing race-free answers run these functions on a
//! connection that already holds the write lock (see the modification
//! engine).

use chrono::{NaiveDate, NaiveTime};
use sqlx::SqliteConnection;

use crate::db::repository;
use crate::models::Classroom;
use crate::schedule;

/// Which resource the conflict question is about.
#[derive(Debug, Clone, Copy)]
pub enum ConflictScope<'a> {
    Room(&'a str),
    Professor(&'a str),
}

/// Ids of regular slots whose booking (regular or postponed-to) overlaps
/// `[start, end]` on `date` within the scope.
pub async fn find_conflicts(
    conn: &mut SqliteConnection,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    scope: ConflictScope<'_>,
) -> Result<Vec<String>, sqlx::Error> {
    let weekday = schedule::iso_weekday(date) as i64;

    let (regular, moved) = match scope {
        ConflictScope::Room(room_id) => (
            repository::regular_occupancies_for_room(conn, room_id, weekday, date).await?,
            repository::postponed_occupancies_for_room(conn, room_id, date).await?,
        ),
        ConflictScope::Professor(professor_id) => (
            repository::regular_occupancies_for_professor(conn, professor_id, weekday, date)
                .await?,
            repository::postponed_occupancies_for_professor(conn, professor_id, date).await?,
        ),
    };

    Ok(regular
        .into_iter()
        .chain(moved)
        .filter(|occ| schedule::overlaps(occ.start_time, occ.end_time, start, end))
        .map(|occ| occ.id)
        .collect())
}

/// All classrooms with no booking overlapping `[start, end]` on `date`.
pub async fn available_rooms(
    conn: &mut SqliteConnection,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
) -> Result<Vec<Classroom>, sqlx::Error> {
    let weekday = schedule::iso_weekday(date) as i64;

    let regular = repository::room_regular_occupancies(conn, weekday, date).await?;
    let moved = repository::room_postponed_occupancies(conn, date).await?;

    let busy: std::collections::HashSet<String> = regular
        .into_iter()
        .chain(moved)
        .filter(|occ| schedule::overlaps(occ.start_time, occ.end_time, start, end))
        .map(|occ| occ.classroom_id)
        .collect();

    let rooms = repository::fetch_classrooms(conn).await?;
    Ok(rooms
        .into_iter()
        .filter(|room| !busy.contains(&room.id))
        .collect())
}
