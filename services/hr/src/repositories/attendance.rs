//! Attendance repository

use chrono::{NaiveDate, NaiveTime};
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::attendance::{CheckOutcome, DayState, check};
use crate::error::HrResult;
use crate::models::{Absence, AttendanceRecord, NewAbsence};
use crate::policy::Scope;

use super::map_write_err;

/// What a check-in call did
#[derive(Debug, Clone)]
pub struct CheckInResult {
    pub record: AttendanceRecord,
    pub outcome: CheckOutcome,
}

/// Attendance repository
#[derive(Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    /// Create a new attendance repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List attendance records visible in `scope`
    pub async fn list(&self, scope: Scope) -> HrResult<Vec<AttendanceRecord>> {
        let base = r#"
            SELECT a.id, a.employee_id, a.day, a.arrived_at, a.departed_at
            FROM attendance_records a
        "#;

        let rows = match scope {
            Scope::Nothing => return Ok(vec![]),
            Scope::All => {
                let query = format!("{base} ORDER BY a.day DESC");
                sqlx::query_as::<_, AttendanceRecord>(&query)
                    .fetch_all(&self.pool)
                    .await?
            }
            Scope::Department(dept) => {
                let query = format!(
                    "{base} JOIN employees e ON e.id = a.employee_id \
                     JOIN positions p ON p.id = e.position_id \
                     WHERE p.department_id = $1 ORDER BY a.day DESC"
                );
                sqlx::query_as::<_, AttendanceRecord>(&query)
                    .bind(dept)
                    .fetch_all(&self.pool)
                    .await?
            }
            Scope::Own(employee_id) | Scope::OwnAndDepartment { employee_id, .. } => {
                let query = format!("{base} WHERE a.employee_id = $1 ORDER BY a.day DESC");
                sqlx::query_as::<_, AttendanceRecord>(&query)
                    .bind(employee_id)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows)
    }

    /// Apply a check-in call for (employee, day) at time `at`
    ///
    /// The first call of the day records the arrival, the second the
    /// departure, and any further call is returned as `AlreadyDeparted`
    /// without touching the record.
    pub async fn check_in(
        &self,
        employee_id: Uuid,
        day: NaiveDate,
        at: NaiveTime,
    ) -> HrResult<CheckInResult> {
        let existing = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT id, employee_id, day, arrived_at, departed_at
            FROM attendance_records
            WHERE employee_id = $1 AND day = $2
            "#,
        )
        .bind(employee_id)
        .bind(day)
        .fetch_optional(&self.pool)
        .await?;

        let state = DayState::from_record(
            existing.as_ref().map(|r| (r.arrived_at, r.departed_at)),
        );

        match check(state) {
            CheckOutcome::RecordArrival => {
                let id: Uuid = sqlx::query(
                    r#"
                    INSERT INTO attendance_records (employee_id, day, arrived_at)
                    VALUES ($1, $2, $3)
                    RETURNING id
                    "#,
                )
                .bind(employee_id)
                .bind(day)
                .bind(at)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| map_write_err(e, "attendance record"))?
                .get("id");

                info!("Employee {} checked in on {}", employee_id, day);
                Ok(CheckInResult {
                    record: AttendanceRecord {
                        id,
                        employee_id,
                        day,
                        arrived_at: at,
                        departed_at: None,
                    },
                    outcome: CheckOutcome::RecordArrival,
                })
            }
            CheckOutcome::RecordDeparture => {
                let mut record = existing.expect("arrived state implies a record");
                sqlx::query("UPDATE attendance_records SET departed_at = $2 WHERE id = $1")
                    .bind(record.id)
                    .bind(at)
                    .execute(&self.pool)
                    .await?;

                info!("Employee {} checked out on {}", employee_id, day);
                record.departed_at = Some(at);
                Ok(CheckInResult {
                    record,
                    outcome: CheckOutcome::RecordDeparture,
                })
            }
            CheckOutcome::AlreadyDeparted => Ok(CheckInResult {
                record: existing.expect("departed state implies a record"),
                outcome: CheckOutcome::AlreadyDeparted,
            }),
        }
    }

    /// Record an absence
    pub async fn record_absence(&self, new: &NewAbsence) -> HrResult<Absence> {
        let row = sqlx::query_as::<_, Absence>(
            r#"
            INSERT INTO absences (employee_id, day, reason, justified)
            VALUES ($1, $2, $3, $4)
            RETURNING id, employee_id, day, reason, justified
            "#,
        )
        .bind(new.employee_id)
        .bind(new.day)
        .bind(&new.reason)
        .bind(new.justified)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_err(e, "absence"))?;

        Ok(row)
    }

}
