//! Leave request model and payloads

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::leave::{LeaveStatus, LeaveType};

/// Leave request entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub employee_name: String,
    /// Designated approver, notified on submission
    pub approver_id: Option<Uuid>,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: LeaveStatus,
    pub reason: String,
    pub manager_comment: String,
}

/// Leave submission payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewLeaveRequest {
    pub approver_id: Option<Uuid>,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub reason: String,
}

/// Adjudication payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdjudicateRequest {
    #[serde(default)]
    pub comment: String,
}
