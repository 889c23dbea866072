//! CSV export of the employee directory

use crate::error::{HrError, HrResult};
use crate::models::EmployeeExportRow;

const HEADER: [&str; 8] = [
    "Number",
    "Last Name",
    "First Name",
    "Email",
    "Position",
    "Department",
    "Hire Date",
    "Salary",
];

/// Render employee rows as a CSV document
pub fn employees_csv(rows: &[EmployeeExportRow]) -> HrResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(HEADER).map_err(csv_err)?;
    for row in rows {
        writer
            .write_record([
                row.employee_number.as_str(),
                row.last_name.as_str(),
                row.first_name.as_str(),
                row.email.as_str(),
                row.position_title.as_str(),
                row.department_name.as_str(),
                &row.hire_date.to_string(),
                &row.salary.to_string(),
            ])
            .map_err(csv_err)?;
    }

    writer.into_inner().map_err(|e| {
        tracing::error!("Failed to finish CSV export: {}", e);
        HrError::Internal
    })
}

fn csv_err(e: csv::Error) -> HrError {
    tracing::error!("Failed to write CSV row: {}", e);
    HrError::Internal
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[test]
    fn test_employees_csv_shape() {
        let rows = vec![EmployeeExportRow {
            employee_number: "EMP-007".to_string(),
            last_name: "Moreau".to_string(),
            first_name: "Claire".to_string(),
            email: "claire.moreau@example.com".to_string(),
            position_title: "Accountant".to_string(),
            department_name: "Finance".to_string(),
            hire_date: NaiveDate::from_ymd_opt(2021, 3, 15).unwrap(),
            salary: Decimal::new(320050, 2),
        }];

        let bytes = employees_csv(&rows).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Number,Last Name,First Name,Email,Position,Department,Hire Date,Salary"
        );
        assert_eq!(
            lines.next().unwrap(),
            "EMP-007,Moreau,Claire,claire.moreau@example.com,Accountant,Finance,2021-03-15,3200.50"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_empty_export_has_header_only() {
        let bytes = employees_csv(&[]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
