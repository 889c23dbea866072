//! Attendance and absence models

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One attendance record per (employee, day)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub day: NaiveDate,
    pub arrived_at: NaiveTime,
    pub departed_at: Option<NaiveTime>,
}

/// Check-in payload; `employee_id` defaults to the calling actor
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckInRequest {
    pub employee_id: Option<Uuid>,
    pub day: Option<NaiveDate>,
    pub at: Option<NaiveTime>,
}

/// Absence entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Absence {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub day: NaiveDate,
    pub reason: String,
    pub justified: bool,
}

/// New absence payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewAbsence {
    pub employee_id: Uuid,
    pub day: NaiveDate,
    pub reason: String,
    #[serde(default)]
    pub justified: bool,
}
