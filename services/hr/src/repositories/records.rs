//! Payroll, contract, evaluation, training and recruitment repository

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::HrResult;
use crate::models::{
    Contract, ContractType, Evaluation, JobApplication, JobOffer, NewContract, NewContractType,
    NewEvaluation, NewJobApplication, NewJobOffer, NewPayslip, NewTraining, Payslip, Training,
    TrainingEnrollment,
};
use crate::policy::Scope;

use super::map_write_err;

/// Repository for the HR record books: payroll, contracts, evaluations,
/// trainings and recruitment
#[derive(Clone)]
pub struct RecordsRepository {
    pool: PgPool,
}

impl RecordsRepository {
    /// Create a new records repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List payslips visible in `scope`
    pub async fn list_payslips(&self, scope: Scope) -> HrResult<Vec<Payslip>> {
        let base = r#"
            SELECT ps.id, ps.employee_id, ps.month, ps.year, ps.base_salary,
                   ps.bonuses, ps.deductions, ps.net_pay, ps.issued_on
            FROM payslips ps
        "#;

        let rows = match scope {
            Scope::Nothing => return Ok(vec![]),
            Scope::All => {
                let query = format!("{base} ORDER BY ps.year DESC, ps.month DESC");
                sqlx::query_as::<_, Payslip>(&query).fetch_all(&self.pool).await?
            }
            Scope::Department(dept) => {
                let query = format!(
                    "{base} JOIN employees e ON e.id = ps.employee_id \
                     JOIN positions p ON p.id = e.position_id \
                     WHERE p.department_id = $1 ORDER BY ps.year DESC, ps.month DESC"
                );
                sqlx::query_as::<_, Payslip>(&query)
                    .bind(dept)
                    .fetch_all(&self.pool)
                    .await?
            }
            Scope::Own(employee_id) | Scope::OwnAndDepartment { employee_id, .. } => {
                let query =
                    format!("{base} WHERE ps.employee_id = $1 ORDER BY ps.year DESC, ps.month DESC");
                sqlx::query_as::<_, Payslip>(&query)
                    .bind(employee_id)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows)
    }

    /// Create a payslip
    pub async fn create_payslip(&self, new: &NewPayslip) -> HrResult<Payslip> {
        let row = sqlx::query_as::<_, Payslip>(
            r#"
            INSERT INTO payslips (employee_id, month, year, base_salary, bonuses, deductions, net_pay)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, employee_id, month, year, base_salary, bonuses, deductions, net_pay, issued_on
            "#,
        )
        .bind(new.employee_id)
        .bind(new.month)
        .bind(new.year)
        .bind(new.base_salary)
        .bind(new.bonuses)
        .bind(new.deductions)
        .bind(new.net_pay)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_err(e, "payslip"))?;

        info!("Issued payslip {}/{} for {}", new.month, new.year, new.employee_id);
        Ok(row)
    }

    /// List contract types
    pub async fn list_contract_types(&self) -> HrResult<Vec<ContractType>> {
        let rows = sqlx::query_as::<_, ContractType>(
            "SELECT id, name, description FROM contract_types ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Create a contract type
    pub async fn create_contract_type(&self, new: &NewContractType) -> HrResult<ContractType> {
        let row = sqlx::query_as::<_, ContractType>(
            r#"
            INSERT INTO contract_types (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description
            "#,
        )
        .bind(&new.name)
        .bind(&new.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_err(e, "contract type"))?;
        Ok(row)
    }

    /// List contracts visible in `scope`
    pub async fn list_contracts(&self, scope: Scope) -> HrResult<Vec<Contract>> {
        let base = r#"
            SELECT c.id, c.employee_id, c.contract_type_id, c.start_date, c.end_date, c.active
            FROM contracts c
        "#;

        let rows = match scope {
            Scope::Nothing => return Ok(vec![]),
            Scope::All => {
                let query = format!("{base} ORDER BY c.start_date DESC");
                sqlx::query_as::<_, Contract>(&query).fetch_all(&self.pool).await?
            }
            Scope::Department(dept) => {
                let query = format!(
                    "{base} JOIN employees e ON e.id = c.employee_id \
                     JOIN positions p ON p.id = e.position_id \
                     WHERE p.department_id = $1 ORDER BY c.start_date DESC"
                );
                sqlx::query_as::<_, Contract>(&query)
                    .bind(dept)
                    .fetch_all(&self.pool)
                    .await?
            }
            Scope::Own(employee_id) | Scope::OwnAndDepartment { employee_id, .. } => {
                let query = format!("{base} WHERE c.employee_id = $1 ORDER BY c.start_date DESC");
                sqlx::query_as::<_, Contract>(&query)
                    .bind(employee_id)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows)
    }

    /// Create a contract
    pub async fn create_contract(&self, new: &NewContract) -> HrResult<Contract> {
        let row = sqlx::query_as::<_, Contract>(
            r#"
            INSERT INTO contracts (employee_id, contract_type_id, start_date, end_date, active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, employee_id, contract_type_id, start_date, end_date, active
            "#,
        )
        .bind(new.employee_id)
        .bind(new.contract_type_id)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(new.active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_err(e, "contract"))?;
        Ok(row)
    }

    /// List evaluations visible in `scope`
    pub async fn list_evaluations(&self, scope: Scope) -> HrResult<Vec<Evaluation>> {
        let base = r#"
            SELECT ev.id, ev.employee_id, ev.evaluator_id, ev.day, ev.score, ev.comments
            FROM evaluations ev
        "#;

        let rows = match scope {
            Scope::Nothing => return Ok(vec![]),
            Scope::All => {
                let query = format!("{base} ORDER BY ev.day DESC");
                sqlx::query_as::<_, Evaluation>(&query).fetch_all(&self.pool).await?
            }
            Scope::Department(dept) => {
                let query = format!(
                    "{base} JOIN employees e ON e.id = ev.employee_id \
                     JOIN positions p ON p.id = e.position_id \
                     WHERE p.department_id = $1 ORDER BY ev.day DESC"
                );
                sqlx::query_as::<_, Evaluation>(&query)
                    .bind(dept)
                    .fetch_all(&self.pool)
                    .await?
            }
            Scope::Own(employee_id) | Scope::OwnAndDepartment { employee_id, .. } => {
                let query = format!("{base} WHERE ev.employee_id = $1 ORDER BY ev.day DESC");
                sqlx::query_as::<_, Evaluation>(&query)
                    .bind(employee_id)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows)
    }

    /// Record an evaluation given by `evaluator_id`
    pub async fn create_evaluation(
        &self,
        evaluator_id: Uuid,
        new: &NewEvaluation,
    ) -> HrResult<Evaluation> {
        if !(0..=100).contains(&new.score) {
            return Err(crate::error::HrError::Validation(
                "evaluation score must be between 0 and 100".to_string(),
            ));
        }

        let row = sqlx::query_as::<_, Evaluation>(
            r#"
            INSERT INTO evaluations (employee_id, evaluator_id, day, score, comments)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, employee_id, evaluator_id, day, score, comments
            "#,
        )
        .bind(new.employee_id)
        .bind(evaluator_id)
        .bind(new.day)
        .bind(new.score)
        .bind(&new.comments)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_err(e, "evaluation"))?;
        Ok(row)
    }

    /// List the training catalog
    pub async fn list_trainings(&self) -> HrResult<Vec<Training>> {
        let rows = sqlx::query_as::<_, Training>(
            r#"
            SELECT id, title, description, start_date, end_date, budget
            FROM trainings
            ORDER BY start_date DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Create a training
    pub async fn create_training(&self, new: &NewTraining) -> HrResult<Training> {
        let row = sqlx::query_as::<_, Training>(
            r#"
            INSERT INTO trainings (title, description, start_date, end_date, budget)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, start_date, end_date, budget
            "#,
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(new.budget)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_err(e, "training"))?;
        Ok(row)
    }

    /// Enroll an employee in a training
    pub async fn enroll(&self, employee_id: Uuid, training_id: Uuid) -> HrResult<TrainingEnrollment> {
        let row = sqlx::query_as::<_, TrainingEnrollment>(
            r#"
            INSERT INTO training_enrollments (employee_id, training_id)
            VALUES ($1, $2)
            RETURNING id, employee_id, training_id, status
            "#,
        )
        .bind(employee_id)
        .bind(training_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_err(e, "enrollment"))?;

        info!("Employee {} enrolled in training {}", employee_id, training_id);
        Ok(row)
    }

    /// List job offers visible in `scope`
    pub async fn list_job_offers(&self, scope: Scope) -> HrResult<Vec<JobOffer>> {
        let base = r#"
            SELECT o.id, o.title, o.description, o.department_id, o.published_on, o.closed
            FROM job_offers o
        "#;

        let rows = match scope {
            Scope::Nothing => return Ok(vec![]),
            Scope::Department(dept) => {
                let query =
                    format!("{base} WHERE o.department_id = $1 ORDER BY o.published_on DESC");
                sqlx::query_as::<_, JobOffer>(&query)
                    .bind(dept)
                    .fetch_all(&self.pool)
                    .await?
            }
            _ => {
                let query = format!("{base} ORDER BY o.published_on DESC");
                sqlx::query_as::<_, JobOffer>(&query).fetch_all(&self.pool).await?
            }
        };

        Ok(rows)
    }

    /// Publish a job offer
    pub async fn create_job_offer(&self, new: &NewJobOffer) -> HrResult<JobOffer> {
        let row = sqlx::query_as::<_, JobOffer>(
            r#"
            INSERT INTO job_offers (title, description, department_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, description, department_id, published_on, closed
            "#,
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.department_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_err(e, "job offer"))?;

        info!("Published job offer {}", new.title);
        Ok(row)
    }

    /// Record an application for a job offer
    pub async fn create_application(&self, new: &NewJobApplication) -> HrResult<JobApplication> {
        let row = sqlx::query_as::<_, JobApplication>(
            r#"
            INSERT INTO job_applications (offer_id, last_name, first_name, email, cover_letter)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, offer_id, last_name, first_name, email, cover_letter, status
            "#,
        )
        .bind(new.offer_id)
        .bind(&new.last_name)
        .bind(&new.first_name)
        .bind(&new.email)
        .bind(&new.cover_letter)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_err(e, "job application"))?;
        Ok(row)
    }
}
