//! Leave request workflow
//!
//! A request starts `Pending` and moves exactly once to `Approved` or
//! `Rejected`. Terminal states absorb every further decision, so a resolved
//! request can never be re-adjudicated or re-notified.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::actor::{Actor, Role};
use crate::error::{HrError, HrResult};

/// Lifecycle status of a leave request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "PENDING" => Some(LeaveStatus::Pending),
            "APPROVED" => Some(LeaveStatus::Approved),
            "REJECTED" => Some(LeaveStatus::Rejected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "PENDING",
            LeaveStatus::Approved => "APPROVED",
            LeaveStatus::Rejected => "REJECTED",
        }
    }
}

/// Category of a leave request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveType {
    Annual,
    Sick,
    Maternity,
    Unpaid,
    Other,
}

impl LeaveType {
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "ANNUAL" => Some(LeaveType::Annual),
            "SICK" => Some(LeaveType::Sick),
            "MATERNITY" => Some(LeaveType::Maternity),
            "UNPAID" => Some(LeaveType::Unpaid),
            "OTHER" => Some(LeaveType::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveType::Annual => "ANNUAL",
            LeaveType::Sick => "SICK",
            LeaveType::Maternity => "MATERNITY",
            LeaveType::Unpaid => "UNPAID",
            LeaveType::Other => "OTHER",
        }
    }
}

/// An adjudication decision on a pending request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

/// Apply `decision` to a request currently in `current`.
///
/// Returns the new status, or `StateTransition` if the request has already
/// been resolved.
pub fn resolve(current: LeaveStatus, decision: Decision) -> HrResult<LeaveStatus> {
    match current {
        LeaveStatus::Pending => Ok(match decision {
            Decision::Approve => LeaveStatus::Approved,
            Decision::Reject => LeaveStatus::Rejected,
        }),
        resolved => Err(HrError::StateTransition(format!(
            "leave request is already {}",
            resolved.as_str()
        ))),
    }
}

/// Check that `actor` may adjudicate a request submitted by an employee
/// with `requester_role` in `requester_department`.
///
/// Department managers decide for their own department's staff only; a
/// request coming from another manager is escalated to HR or the super
/// admin, so a manager can never wave through a peer.
pub fn authorize_adjudication(
    actor: &Actor,
    requester_role: Role,
    requester_department: Option<Uuid>,
) -> HrResult<()> {
    if !actor.role.is_manager_class() {
        return Err(HrError::Authorization(
            "manager privileges are required to adjudicate leave requests".to_string(),
        ));
    }

    if actor.role.is_hr_class() {
        return Ok(());
    }

    if requester_role.is_manager_class() {
        return Err(HrError::Authorization(
            "manager-level requests are adjudicated by HR".to_string(),
        ));
    }

    if requester_department.is_none() || requester_department != actor.home_department() {
        return Err(HrError::Authorization(
            "request belongs to another department".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role, department_id: Option<Uuid>) -> Actor {
        Actor {
            account_id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            role,
            department_id,
            led_department_id: None,
        }
    }

    #[test]
    fn test_pending_resolves_once() {
        assert_eq!(
            resolve(LeaveStatus::Pending, Decision::Approve).unwrap(),
            LeaveStatus::Approved
        );
        assert_eq!(
            resolve(LeaveStatus::Pending, Decision::Reject).unwrap(),
            LeaveStatus::Rejected
        );
    }

    #[test]
    fn test_terminal_states_absorb() {
        for resolved in [LeaveStatus::Approved, LeaveStatus::Rejected] {
            for decision in [Decision::Approve, Decision::Reject] {
                assert!(matches!(
                    resolve(resolved, decision),
                    Err(HrError::StateTransition(_))
                ));
            }
        }
    }

    #[test]
    fn test_manager_adjudicates_own_department_staff() {
        let dept = Uuid::new_v4();
        let manager = actor(Role::Manager, Some(dept));
        assert!(authorize_adjudication(&manager, Role::Employee, Some(dept)).is_ok());
    }

    #[test]
    fn test_manager_cannot_adjudicate_foreign_department() {
        let manager = actor(Role::Manager, Some(Uuid::new_v4()));
        assert!(matches!(
            authorize_adjudication(&manager, Role::Employee, Some(Uuid::new_v4())),
            Err(HrError::Authorization(_))
        ));
    }

    #[test]
    fn test_manager_cannot_adjudicate_peer_manager() {
        let dept = Uuid::new_v4();
        let manager = actor(Role::Manager, Some(dept));
        assert!(matches!(
            authorize_adjudication(&manager, Role::Manager, Some(dept)),
            Err(HrError::Authorization(_))
        ));
        // HR adjudicates manager-level requests.
        assert!(authorize_adjudication(&actor(Role::Hr, None), Role::Manager, Some(dept)).is_ok());
    }

    #[test]
    fn test_plain_employee_cannot_adjudicate() {
        let dept = Uuid::new_v4();
        let employee = actor(Role::Employee, Some(dept));
        assert!(matches!(
            authorize_adjudication(&employee, Role::Employee, Some(dept)),
            Err(HrError::Authorization(_))
        ));
    }

    #[test]
    fn test_status_codes_round_trip() {
        for status in [LeaveStatus::Pending, LeaveStatus::Approved, LeaveStatus::Rejected] {
            assert_eq!(LeaveStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(LeaveStatus::parse("CANCELLED"), None);
    }
}
