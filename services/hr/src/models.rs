//! HR models for entities and request/response payloads

pub mod attendance;
pub mod department;
pub mod employee;
pub mod leave;
pub mod records;

pub use attendance::{Absence, AttendanceRecord, CheckInRequest, NewAbsence};
pub use department::{Department, NewDepartment, NewPosition, Position, UpdateDepartment};
pub use employee::{Employee, EmployeeExportRow, NewEmployee, UpdateEmployee};
pub use leave::{AdjudicateRequest, LeaveRequest, NewLeaveRequest};
pub use records::{
    Contract, ContractType, Evaluation, JobApplication, JobOffer, NewContract, NewContractType,
    NewEvaluation, NewJobApplication, NewJobOffer, NewPayslip, NewTraining, Payslip, Training,
    TrainingEnrollment,
};
