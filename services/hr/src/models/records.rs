//! Payroll, contract, evaluation, training and recruitment models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Contract type, the policy-level record behind contracts
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContractType {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

/// New contract type payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewContractType {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Contract entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Contract {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub contract_type_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub active: bool,
}

/// New contract payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewContract {
    pub employee_id: Uuid,
    pub contract_type_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

/// Payslip entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payslip {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub month: i32,
    pub year: i32,
    pub base_salary: Decimal,
    pub bonuses: Decimal,
    pub deductions: Decimal,
    pub net_pay: Decimal,
    pub issued_on: NaiveDate,
}

/// New payslip payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewPayslip {
    pub employee_id: Uuid,
    pub month: i32,
    pub year: i32,
    pub base_salary: Decimal,
    #[serde(default)]
    pub bonuses: Decimal,
    #[serde(default)]
    pub deductions: Decimal,
    pub net_pay: Decimal,
}

/// Evaluation entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Evaluation {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub evaluator_id: Option<Uuid>,
    pub day: NaiveDate,
    /// Score out of 100
    pub score: i32,
    pub comments: String,
}

/// New evaluation payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewEvaluation {
    pub employee_id: Uuid,
    pub day: NaiveDate,
    pub score: i32,
    #[serde(default)]
    pub comments: String,
}

/// Training entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Training {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: Decimal,
}

/// New training payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewTraining {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub budget: Decimal,
}

/// Training enrollment entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TrainingEnrollment {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub training_id: Uuid,
    pub status: String,
}

/// Job offer entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobOffer {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub department_id: Uuid,
    pub published_on: NaiveDate,
    pub closed: bool,
}

/// New job offer payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewJobOffer {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub department_id: Uuid,
}

/// Job application entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobApplication {
    pub id: Uuid,
    pub offer_id: Uuid,
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    pub cover_letter: String,
    pub status: String,
}

/// New job application payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewJobApplication {
    pub offer_id: Uuid,
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    #[serde(default)]
    pub cover_letter: String,
}
