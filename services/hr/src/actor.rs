//! Actor identity and the ordered role model
//!
//! Roles form a strict privilege ladder. Permission checks compare roles
//! with `>=` instead of chaining per-role booleans, so a rule written once
//! holds for every tier above it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of an employee, ordered by privilege (lowest first)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Employee,
    Manager,
    Hr,
    SuperAdmin,
}

impl Role {
    /// Parse the role code stored in the database
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "EMPLOYEE" => Some(Role::Employee),
            "MANAGER" => Some(Role::Manager),
            "HR" => Some(Role::Hr),
            "ADMIN" => Some(Role::SuperAdmin),
            _ => None,
        }
    }

    /// Role code as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "EMPLOYEE",
            Role::Manager => "MANAGER",
            Role::Hr => "HR",
            Role::SuperAdmin => "ADMIN",
        }
    }

    /// HR-class actors administer every department
    pub fn is_hr_class(&self) -> bool {
        *self >= Role::Hr
    }

    /// Manager-class actors administer at least one department
    pub fn is_manager_class(&self) -> bool {
        *self >= Role::Manager
    }
}

/// The authenticated party performing an operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Account the request authenticated as
    pub account_id: Uuid,
    /// Employee record linked to the account
    pub employee_id: Uuid,
    pub role: Role,
    /// Department reached through the actor's position, if any
    pub department_id: Option<Uuid>,
    /// Department the actor leads, if any
    pub led_department_id: Option<Uuid>,
}

impl Actor {
    /// The department this actor administers: their own position's
    /// department, falling back to the one they lead.
    pub fn home_department(&self) -> Option<Uuid> {
        self.department_id.or(self.led_department_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_privilege_ordering() {
        assert!(Role::Employee < Role::Manager);
        assert!(Role::Manager < Role::Hr);
        assert!(Role::Hr < Role::SuperAdmin);
    }

    #[test]
    fn test_role_classes() {
        assert!(!Role::Employee.is_manager_class());
        assert!(Role::Manager.is_manager_class());
        assert!(!Role::Manager.is_hr_class());
        assert!(Role::Hr.is_manager_class());
        assert!(Role::Hr.is_hr_class());
        assert!(Role::SuperAdmin.is_hr_class());
    }

    #[test]
    fn test_role_codes_round_trip() {
        for role in [Role::Employee, Role::Manager, Role::Hr, Role::SuperAdmin] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("INTERN"), None);
    }

    #[test]
    fn test_home_department_prefers_position() {
        let position_dept = Uuid::new_v4();
        let led_dept = Uuid::new_v4();
        let actor = Actor {
            account_id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            role: Role::Manager,
            department_id: Some(position_dept),
            led_department_id: Some(led_dept),
        };
        assert_eq!(actor.home_department(), Some(position_dept));

        let lead_only = Actor {
            department_id: None,
            ..actor
        };
        assert_eq!(lead_only.home_department(), Some(led_dept));
    }
}
