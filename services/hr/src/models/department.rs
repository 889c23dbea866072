//! Department and position models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Department entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    /// Employee heading this department, from the leads relation
    pub lead_employee_id: Option<Uuid>,
    pub employee_count: i64,
}

/// New department creation payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewDepartment {
    pub name: String,
    pub code: String,
}

/// Department update payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDepartment {
    pub name: Option<String>,
    pub code: Option<String>,
}

/// Position entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub id: Uuid,
    pub title: String,
    pub department_id: Uuid,
    pub department_name: String,
    pub responsibilities: String,
    pub missions: String,
}

/// New position creation payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewPosition {
    pub title: String,
    pub department_id: Uuid,
    #[serde(default)]
    pub responsibilities: String,
    #[serde(default)]
    pub missions: String,
}
