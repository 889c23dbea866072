//! Repositories for database operations
//!
//! Every read takes a [`Scope`](crate::policy::Scope) computed by the policy
//! engine and turns it into a SQL predicate. Lookups by id fetch first and
//! check scope second, so an out-of-scope record surfaces as forbidden
//! rather than absent.

use crate::error::HrError;

pub mod attendance;
pub mod department;
pub mod employee;
pub mod leave;
pub mod records;

pub use attendance::AttendanceRepository;
pub use department::DepartmentRepository;
pub use employee::EmployeeRepository;
pub use leave::LeaveRepository;
pub use records::RecordsRepository;

/// Map constraint violations on insert/update to validation errors
pub(crate) fn map_write_err(e: sqlx::Error, what: &str) -> HrError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return HrError::Validation(format!("{} already exists", what));
        }
        if db_err.is_foreign_key_violation() {
            return HrError::Validation(format!("{} references a missing record", what));
        }
    }
    HrError::Database(e)
}
