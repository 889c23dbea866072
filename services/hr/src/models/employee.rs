//! Employee model and related payloads

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::actor::Role;

/// Employee entity, joined with its position and department for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,
    pub account_id: Option<Uuid>,
    pub role: Role,
    pub employee_number: Option<String>,
    pub last_name: String,
    pub first_name: String,
    pub birth_date: Option<NaiveDate>,
    pub email: String,
    pub phone: Option<String>,
    pub address: String,
    pub position_id: Option<Uuid>,
    pub position_title: Option<String>,
    pub department_id: Option<Uuid>,
    pub department_name: Option<String>,
    pub hire_date: NaiveDate,
    pub salary: Decimal,
}

/// New employee creation payload
///
/// `password` is optional; when absent the account is provisioned with a
/// role-dependent default.
#[derive(Debug, Clone, Deserialize)]
pub struct NewEmployee {
    pub role: Role,
    pub employee_number: Option<String>,
    pub last_name: String,
    pub first_name: String,
    pub birth_date: Option<NaiveDate>,
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub address: String,
    pub position_id: Option<Uuid>,
    pub hire_date: NaiveDate,
    pub salary: Decimal,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Employee update payload
///
/// `lead_department_id` names the department this employee should head when
/// the role is set to manager. For the nullable columns an explicit JSON
/// `null` clears the stored value while an absent field keeps it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEmployee {
    pub role: Option<Role>,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "clearable")]
    pub birth_date: Option<Option<NaiveDate>>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "clearable")]
    pub phone: Option<Option<String>>,
    pub address: Option<String>,
    #[serde(default, deserialize_with = "clearable")]
    pub position_id: Option<Option<Uuid>>,
    pub hire_date: Option<NaiveDate>,
    pub salary: Option<Decimal>,
    pub lead_department_id: Option<Uuid>,
}

/// Deserialize a field where `null` means "clear" and absence means "keep"
fn clearable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// One row of the employee CSV export
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeExportRow {
    pub employee_number: String,
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    pub position_title: String,
    pub department_name: String,
    pub hire_date: NaiveDate,
    pub salary: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_payload_distinguishes_null_from_absent() {
        let update: UpdateEmployee = serde_json::from_str(r#"{"phone": null}"#).unwrap();
        assert_eq!(update.phone, Some(None));
        assert_eq!(update.position_id, None);
        assert_eq!(update.birth_date, None);

        let update: UpdateEmployee =
            serde_json::from_str(r#"{"phone": "+33 1 99 00 12 34"}"#).unwrap();
        assert_eq!(update.phone, Some(Some("+33 1 99 00 12 34".to_string())));
    }
}
