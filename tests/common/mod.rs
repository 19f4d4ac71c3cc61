#![allow(dead_code)]

use std::str::FromStr;
use std::time::Duration;

use chrono::{Datelike, Days, NaiveDate, NaiveTime, Utc, Weekday};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use uuid::Uuid;

/// Single-connection in-memory database with the real migrations applied.
pub async fn memory_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid sqlite url");
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("failed to open in-memory database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations failed");
    pool
}

/// File-backed database for tests that need several connections to see the
/// same data (lock contention between concurrent transactions).
pub async fn shared_pool() -> SqlitePool {
    let path = std::env::temp_dir().join(format!("timetable-test-{}.db", Uuid::new_v4()));
    let options = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5));
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .expect("failed to open test database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations failed");
    pool
}

pub fn t(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M").expect("valid time literal")
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// The next occurrence of `weekday` strictly after today, so seeded
/// modifications are always still active on their target date.
pub fn upcoming(weekday: Weekday) -> NaiveDate {
    let start = today();
    (1..=7)
        .map(|offset| start + Days::new(offset))
        .find(|d| d.weekday() == weekday)
        .expect("weekday within the next seven days")
}

pub async fn seed_user(pool: &SqlitePool, id: &str, username: &str, role: &str, batch: Option<&str>) {
    sqlx::query("INSERT INTO users (id, username, role, batch) VALUES (?, ?, ?, ?)")
        .bind(id)
        .bind(username)
        .bind(role)
        .bind(batch)
        .execute(pool)
        .await
        .expect("failed to seed user");
}

pub async fn seed_course(pool: &SqlitePool, id: &str, name: &str, code: &str, professor_id: &str) {
    sqlx::query(
        "INSERT INTO courses (id, course_name, course_code, professor_id) VALUES (?, ?, ?, ?)",
    )
    .bind(id)
    .bind(name)
    .bind(code)
    .bind(professor_id)
    .execute(pool)
    .await
    .expect("failed to seed course");
}

pub async fn seed_classroom(pool: &SqlitePool, id: &str, room_number: &str, building: &str) {
    sqlx::query(
        "INSERT INTO classrooms (id, room_number, building, capacity) VALUES (?, ?, ?, 60)",
    )
    .bind(id)
    .bind(room_number)
    .bind(building)
    .execute(pool)
    .await
    .expect("failed to seed classroom");
}

#[allow(clippy::too_many_arguments)]
pub async fn seed_slot(
    pool: &SqlitePool,
    id: &str,
    course_id: &str,
    batch: &str,
    day_of_week: i64,
    start: NaiveTime,
    end: NaiveTime,
    classroom_id: &str,
) {
    sqlx::query(
        "INSERT INTO regular_timetable
            (id, course_id, batch, day_of_week, start_time, end_time, classroom_id)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(course_id)
    .bind(batch)
    .bind(day_of_week)
    .bind(start)
    .bind(end)
    .bind(classroom_id)
    .execute(pool)
    .await
    .expect("failed to seed regular slot");
}

/// Inserts a modification row directly, bypassing the engine; used to set
/// up pre-existing or expired overrides.
#[allow(clippy::too_many_arguments)]
pub async fn seed_modification(
    pool: &SqlitePool,
    regular_class_id: &str,
    modification_type: &str,
    new_date: Option<NaiveDate>,
    new_start: Option<NaiveTime>,
    new_end: Option<NaiveTime>,
    new_classroom_id: Option<&str>,
    valid_until: NaiveDate,
) {
    sqlx::query(
        "INSERT INTO modified_classes
            (id, regular_class_id, modification_type, new_date, new_start_time,
             new_end_time, new_classroom_id, valid_until)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(regular_class_id)
    .bind(modification_type)
    .bind(new_date)
    .bind(new_start)
    .bind(new_end)
    .bind(new_classroom_id)
    .bind(valid_until)
    .execute(pool)
    .await
    .expect("failed to seed modification");
}

pub async fn modification_rows(pool: &SqlitePool, regular_class_id: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM modified_classes WHERE regular_class_id = ?")
        .bind(regular_class_id)
        .fetch_one(pool)
        .await
        .expect("count query failed")
}

/// One professor, one course, one Tuesday 10:00-11:00 slot in room 101,
/// with rooms 205 and 301 free. The base fixture most tests extend.
pub async fn seed_campus(pool: &SqlitePool) {
    seed_user(pool, "prof-1", "ada", "professor", None).await;
    seed_course(pool, "course-1", "Algorithms", "CS301", "prof-1").await;
    seed_classroom(pool, "room-101", "101", "Main").await;
    seed_classroom(pool, "room-205", "205", "Main").await;
    seed_classroom(pool, "room-301", "301", "Annex").await;
    seed_slot(
        pool,
        "slot-1",
        "course-1",
        "CS-2023",
        2,
        t("10:00"),
        t("11:00"),
        "room-101",
    )
    .await;
}
