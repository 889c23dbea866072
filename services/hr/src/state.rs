//! Shared application state for the HR service

use sqlx::PgPool;

use crate::notifier::Notifier;
use crate::repositories::{
    AttendanceRepository, DepartmentRepository, EmployeeRepository, LeaveRepository,
    RecordsRepository,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub employee_repository: EmployeeRepository,
    pub department_repository: DepartmentRepository,
    pub leave_repository: LeaveRepository,
    pub attendance_repository: AttendanceRepository,
    pub records_repository: RecordsRepository,
    pub notifier: Notifier,
}
