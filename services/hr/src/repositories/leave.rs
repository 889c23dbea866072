//! Leave request repository

use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::actor::Role;
use crate::error::{HrError, HrResult};
use crate::leave::{LeaveStatus, LeaveType};
use crate::models::{LeaveRequest, NewLeaveRequest};
use crate::policy::{Scope, scope_permits};

use super::map_write_err;

const SELECT_LEAVE: &str = r#"
    SELECT lr.id, lr.employee_id,
           e.first_name || ' ' || e.last_name AS employee_name,
           lr.approver_id, lr.leave_type, lr.start_date, lr.end_date,
           lr.status, lr.reason, lr.manager_comment,
           e.role AS employee_role, e.email AS employee_email,
           p.department_id
    FROM leave_requests lr
    JOIN employees e ON e.id = lr.employee_id
    LEFT JOIN positions p ON p.id = e.position_id
"#;

/// A leave request together with the requester details the adjudication
/// guards and notifications need
#[derive(Debug, Clone)]
pub struct LeaveRecord {
    pub request: LeaveRequest,
    pub requester_role: Role,
    pub requester_department: Option<Uuid>,
    pub requester_email: String,
}

/// Leave request repository
#[derive(Clone)]
pub struct LeaveRepository {
    pool: PgPool,
}

impl LeaveRepository {
    /// Create a new leave repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List leave requests visible in `scope`
    pub async fn list(&self, scope: Scope) -> HrResult<Vec<LeaveRequest>> {
        let rows = match scope {
            Scope::Nothing => return Ok(vec![]),
            Scope::All => {
                let query = format!("{SELECT_LEAVE} ORDER BY lr.start_date DESC");
                sqlx::query(&query).fetch_all(&self.pool).await?
            }
            Scope::Department(dept) => {
                let query =
                    format!("{SELECT_LEAVE} WHERE p.department_id = $1 ORDER BY lr.start_date DESC");
                sqlx::query(&query).bind(dept).fetch_all(&self.pool).await?
            }
            Scope::Own(employee_id) | Scope::OwnAndDepartment { employee_id, .. } => {
                let query =
                    format!("{SELECT_LEAVE} WHERE lr.employee_id = $1 ORDER BY lr.start_date DESC");
                sqlx::query(&query)
                    .bind(employee_id)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows.into_iter().map(|r| map_leave(r).request).collect())
    }

    /// Find a leave request by id within `scope`, with requester context
    pub async fn find(&self, scope: Scope, id: Uuid) -> HrResult<LeaveRecord> {
        let query = format!("{SELECT_LEAVE} WHERE lr.id = $1");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(HrError::NotFound("leave request"))?;

        let record = map_leave(row);
        if !scope_permits(
            scope,
            Some(record.request.employee_id),
            record.requester_department,
        ) {
            return Err(HrError::Authorization(
                "leave request is outside your scope".to_string(),
            ));
        }
        Ok(record)
    }

    /// Submit a leave request for `employee_id`
    pub async fn submit(
        &self,
        employee_id: Uuid,
        new: &NewLeaveRequest,
    ) -> HrResult<LeaveRecord> {
        if new.end_date < new.start_date {
            return Err(HrError::Validation(
                "leave end date precedes its start date".to_string(),
            ));
        }

        let id: Uuid = sqlx::query(
            r#"
            INSERT INTO leave_requests (employee_id, approver_id, leave_type,
                                        start_date, end_date, reason)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(employee_id)
        .bind(new.approver_id)
        .bind(new.leave_type.as_str())
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(&new.reason)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_err(e, "leave request"))?
        .get("id");

        info!("Employee {} submitted leave request {}", employee_id, id);
        self.find(Scope::All, id).await
    }

    /// Persist an adjudication outcome
    ///
    /// The `status = 'PENDING'` guard makes a racing second adjudicator
    /// observe zero affected rows instead of silently overwriting the first
    /// decision.
    pub async fn mark_resolved(
        &self,
        id: Uuid,
        status: LeaveStatus,
        comment: &str,
    ) -> HrResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE leave_requests
            SET status = $2, manager_comment = $3
            WHERE id = $1 AND status = 'PENDING'
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(comment)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(HrError::StateTransition(
                "leave request has already been resolved".to_string(),
            ));
        }

        info!("Leave request {} marked {}", id, status.as_str());
        Ok(())
    }

    /// Email address of an employee, for approver notifications
    pub async fn employee_email(&self, employee_id: Uuid) -> HrResult<Option<String>> {
        let row = sqlx::query("SELECT email FROM employees WHERE id = $1")
            .bind(employee_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.get("email")))
    }
}

fn map_leave(row: PgRow) -> LeaveRecord {
    let leave_type: String = row.get("leave_type");
    let status: String = row.get("status");
    let role: String = row.get("employee_role");
    LeaveRecord {
        request: LeaveRequest {
            id: row.get("id"),
            employee_id: row.get("employee_id"),
            employee_name: row.get("employee_name"),
            approver_id: row.get("approver_id"),
            leave_type: LeaveType::parse(&leave_type).unwrap_or(LeaveType::Other),
            start_date: row.get("start_date"),
            end_date: row.get("end_date"),
            status: LeaveStatus::parse(&status).unwrap_or(LeaveStatus::Pending),
            reason: row.get("reason"),
            manager_comment: row.get("manager_comment"),
        },
        requester_role: Role::parse(&role).unwrap_or(Role::Employee),
        requester_department: row.get("department_id"),
        requester_email: row.get("employee_email"),
    }
}
