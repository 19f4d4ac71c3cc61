//! Modification engine: postpone and cancel as atomic transactions.
//!
//! Postponement is a read-then-write sequence (conflict checks, then
//! insert), so it takes the SQLite write lock up front with
//! `BEGIN IMMEDIATE`. Two postpones racing for the same room or professor
//! serialize on that lock; the second re-runs its checks against the
//! winner's committed row and fails with a conflict instead of
//! double-booking. No retries: an abort rolls back and surfaces directly.
//!
//! "Today", which drives end-of-week and active-override expiry, is the
//! current UTC date. Institutions far from UTC that care about the
//! midnight boundary should front this service with their local date.

use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use crate::db::repository;
use crate::error::AppError;
use crate::models::{CancelRequest, ModificationType, NewModification, PostponeRequest};
use crate::schedule;
use crate::services::availability::{self, ConflictScope};

pub const PROFESSOR_CONFLICT: &str = "Professor has a scheduling conflict during this time";
pub const ROOM_CONFLICT: &str = "Selected room is not available for the chosen time slot";
const MISSING_FIELDS: &str = "Missing required fields";

/// Validated postpone input with all fields parsed.
#[derive(Debug, Clone)]
struct PostponeInput {
    class_id: String,
    new_date: NaiveDate,
    new_start_time: NaiveTime,
    new_end_time: NaiveTime,
    new_classroom_id: String,
    valid_until: NaiveDate,
}

impl PostponeInput {
    fn parse(req: PostponeRequest) -> Result<Self, AppError> {
        let class_id = require(req.class_id)?;
        let new_classroom_id = require(req.new_classroom_id)?;
        let new_date = schedule::parse_date(&require(req.new_date)?)
            .ok_or_else(|| AppError::Validation("Invalid newDate".to_string()))?;
        let new_start_time = schedule::parse_time(&require(req.new_start_time)?)
            .ok_or_else(|| AppError::Validation("Invalid newStartTime".to_string()))?;
        let new_end_time = schedule::parse_time(&require(req.new_end_time)?)
            .ok_or_else(|| AppError::Validation("Invalid newEndTime".to_string()))?;
        let valid_until = schedule::parse_date(&require(req.valid_until)?)
            .ok_or_else(|| AppError::Validation("Invalid validUntil".to_string()))?;

        if new_start_time >= new_end_time {
            return Err(AppError::Validation(
                "newStartTime must be before newEndTime".to_string(),
            ));
        }
        // An override expiring before its own destination date would free
        // the weekly slot without ever booking the new one.
        if valid_until < new_date {
            return Err(AppError::Validation(
                "validUntil must not be before newDate".to_string(),
            ));
        }

        Ok(Self {
            class_id,
            new_date,
            new_start_time,
            new_end_time,
            new_classroom_id,
            valid_until,
        })
    }
}

fn require(field: Option<String>) -> Result<String, AppError> {
    field
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(MISSING_FIELDS.to_string()))
}

pub struct ModificationEngine {
    db: SqlitePool,
}

impl ModificationEngine {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn postpone(&self, req: PostponeRequest) -> Result<(), AppError> {
        let input = PostponeInput::parse(req)?;

        let mut conn = self.db.acquire().await?;
        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;

        match Self::postpone_in_tx(&mut conn, &input).await {
            Ok(()) => {
                sqlx::query("COMMIT").execute(&mut *conn).await?;
                info!(
                    "class {} postponed to {} {}-{} in room {}",
                    input.class_id,
                    input.new_date,
                    input.new_start_time,
                    input.new_end_time,
                    input.new_classroom_id
                );
                Ok(())
            }
            Err(err) => {
                let _ = sqlx::query("ROLLBACK").execute(&mut *conn).await;
                Err(err)
            }
        }
    }

    async fn postpone_in_tx(
        conn: &mut SqliteConnection,
        input: &PostponeInput,
    ) -> Result<(), AppError> {
        let slot = repository::find_slot(conn, &input.class_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Original class not found".to_string()))?;
        let course = repository::find_course(conn, &slot.course_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found for this class".to_string()))?;
        repository::find_classroom(conn, &input.new_classroom_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Classroom not found".to_string()))?;

        // The slot's own booking (regular or an override being replaced)
        // never blocks its own postponement.
        let professor_conflicts = availability::find_conflicts(
            conn,
            input.new_date,
            input.new_start_time,
            input.new_end_time,
            ConflictScope::Professor(&course.professor_id),
        )
        .await?;
        if professor_conflicts.iter().any(|id| *id != input.class_id) {
            return Err(AppError::Conflict(PROFESSOR_CONFLICT.to_string()));
        }

        let room_conflicts = availability::find_conflicts(
            conn,
            input.new_date,
            input.new_start_time,
            input.new_end_time,
            ConflictScope::Room(&input.new_classroom_id),
        )
        .await?;
        if room_conflicts.iter().any(|id| *id != input.class_id) {
            return Err(AppError::Conflict(ROOM_CONFLICT.to_string()));
        }

        let today = Utc::now().date_naive();
        repository::supersede_active_modifications(conn, &input.class_id, today).await?;
        repository::insert_modification(
            conn,
            NewModification {
                regular_class_id: &input.class_id,
                modification_type: ModificationType::Postponed,
                new_date: Some(input.new_date),
                new_start_time: Some(input.new_start_time),
                new_end_time: Some(input.new_end_time),
                new_classroom_id: Some(&input.new_classroom_id),
                valid_until: input.valid_until,
            },
        )
        .await?;

        Ok(())
    }

    /// Cancels the slot's occurrences through the upcoming end of week.
    /// Replaces any still-active override, so re-cancelling is a no-op in
    /// effect rather than a duplicate row.
    pub async fn cancel(&self, req: CancelRequest) -> Result<(), AppError> {
        let class_id = req
            .class_id
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::Validation(MISSING_FIELDS.to_string()))?;

        let today = Utc::now().date_naive();
        let valid_until = schedule::end_of_week(today);

        let mut conn = self.db.acquire().await?;
        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;

        let outcome = async {
            repository::find_slot(&mut conn, &class_id)
                .await?
                .ok_or_else(|| AppError::Validation("Invalid class".to_string()))?;

            repository::supersede_active_modifications(&mut conn, &class_id, today).await?;
            repository::insert_modification(
                &mut conn,
                NewModification {
                    regular_class_id: &class_id,
                    modification_type: ModificationType::Cancelled,
                    new_date: None,
                    new_start_time: None,
                    new_end_time: None,
                    new_classroom_id: None,
                    valid_until,
                },
            )
            .await?;
            Ok::<(), AppError>(())
        }
        .await;

        match outcome {
            Ok(()) => {
                sqlx::query("COMMIT").execute(&mut *conn).await?;
                info!("class {} cancelled until {}", class_id, valid_until);
                Ok(())
            }
            Err(err) => {
                let _ = sqlx::query("ROLLBACK").execute(&mut *conn).await;
                Err(err)
            }
        }
    }
}
