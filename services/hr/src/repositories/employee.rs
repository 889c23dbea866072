//! Employee repository for database operations
//!
//! Holds the actor resolution used by the middleware, the scoped directory
//! queries, account provisioning on hire, and the department-leader
//! rewiring that keeps the leads relation consistent in one place.

use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::{info, warn};
use uuid::Uuid;

use crate::actor::{Actor, Role};
use crate::error::{HrError, HrResult};
use crate::models::{Employee, EmployeeExportRow, NewEmployee, UpdateEmployee};
use crate::policy::{Scope, scope_permits};

use super::map_write_err;

/// What the department-leads relation needs after an employee save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadRewire {
    /// Remove any department this employee leads
    Clear,
    /// Make the employee the sole leader of this department, clearing both
    /// the department's previous leader and any department the employee
    /// led before
    Assign(Uuid),
    /// Leave the relation untouched
    Keep,
}

/// Decide the leads rewiring implied by the saved role and target department
pub fn plan_lead_rewire(role: Role, lead_department_id: Option<Uuid>) -> LeadRewire {
    if !role.is_manager_class() {
        LeadRewire::Clear
    } else if let Some(dept) = lead_department_id {
        LeadRewire::Assign(dept)
    } else {
        LeadRewire::Keep
    }
}

const SELECT_EMPLOYEE: &str = r#"
    SELECT e.id, e.account_id, e.role, e.employee_number, e.last_name,
           e.first_name, e.birth_date, e.email, e.phone, e.address,
           e.position_id, p.title AS position_title,
           p.department_id, d.name AS department_name,
           e.hire_date, e.salary
    FROM employees e
    LEFT JOIN positions p ON p.id = e.position_id
    LEFT JOIN departments d ON d.id = p.department_id
"#;

/// Employee repository
#[derive(Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    /// Create a new employee repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve the actor behind an authenticated account
    ///
    /// Joins the employee's position department and any department the
    /// employee leads. Returns `None` when the account has no employee
    /// profile.
    pub async fn resolve_actor(&self, account_id: Uuid) -> HrResult<Option<Actor>> {
        let row = sqlx::query(
            r#"
            SELECT e.id, e.role, p.department_id, l.department_id AS led_department_id
            FROM employees e
            LEFT JOIN positions p ON p.id = e.position_id
            LEFT JOIN department_leads l ON l.employee_id = e.id
            WHERE e.account_id = $1
            "#,
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let role: String = row.get("role");
                Ok(Some(Actor {
                    account_id,
                    employee_id: row.get("id"),
                    role: Role::parse(&role).unwrap_or(Role::Employee),
                    department_id: row.get("department_id"),
                    led_department_id: row.get("led_department_id"),
                }))
            }
            None => Ok(None),
        }
    }

    /// List employees visible in `scope`, optionally filtered by a search
    /// term on name, number or position title
    pub async fn list(&self, scope: Scope, search: Option<&str>) -> HrResult<Vec<Employee>> {
        let pattern = search.map(|q| format!("%{}%", q));

        let rows = match scope {
            Scope::Nothing => return Ok(vec![]),
            Scope::All => {
                let query = format!(
                    "{SELECT_EMPLOYEE} WHERE ($1::text IS NULL OR e.last_name ILIKE $1 \
                     OR e.first_name ILIKE $1 OR e.employee_number ILIKE $1 OR p.title ILIKE $1) \
                     ORDER BY e.last_name, e.first_name"
                );
                sqlx::query(&query)
                    .bind(pattern)
                    .fetch_all(&self.pool)
                    .await?
            }
            Scope::Department(dept) => {
                let query = format!(
                    "{SELECT_EMPLOYEE} WHERE p.department_id = $1 \
                     AND ($2::text IS NULL OR e.last_name ILIKE $2 OR e.first_name ILIKE $2 \
                     OR e.employee_number ILIKE $2 OR p.title ILIKE $2) \
                     ORDER BY e.last_name, e.first_name"
                );
                sqlx::query(&query)
                    .bind(dept)
                    .bind(pattern)
                    .fetch_all(&self.pool)
                    .await?
            }
            Scope::OwnAndDepartment {
                employee_id,
                department_id,
            } => {
                let query = format!(
                    "{SELECT_EMPLOYEE} WHERE (e.id = $1 OR p.department_id = $2) \
                     AND ($3::text IS NULL OR e.last_name ILIKE $3 OR e.first_name ILIKE $3 \
                     OR e.employee_number ILIKE $3 OR p.title ILIKE $3) \
                     ORDER BY e.last_name, e.first_name"
                );
                sqlx::query(&query)
                    .bind(employee_id)
                    .bind(department_id)
                    .bind(pattern)
                    .fetch_all(&self.pool)
                    .await?
            }
            Scope::Own(employee_id) => {
                let query = format!("{SELECT_EMPLOYEE} WHERE e.id = $1");
                sqlx::query(&query)
                    .bind(employee_id)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows.into_iter().map(map_employee).collect())
    }

    /// Find an employee by id within `scope`
    ///
    /// A missing row is `NotFound`; a row outside the scope is an
    /// authorization failure.
    pub async fn find(&self, scope: Scope, id: Uuid) -> HrResult<Employee> {
        let query = format!("{SELECT_EMPLOYEE} WHERE e.id = $1");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(HrError::NotFound("employee"))?;

        let employee = map_employee(row);
        if !scope_permits(scope, Some(employee.id), employee.department_id) {
            return Err(HrError::Authorization(
                "employee record is outside your scope".to_string(),
            ));
        }
        Ok(employee)
    }

    /// Create an employee and provision its login account
    ///
    /// When no password is supplied the account gets a role-dependent
    /// default. That default is predictable; the warning below exists so
    /// deployments notice the weakness.
    pub async fn create(&self, new: &NewEmployee) -> HrResult<Employee> {
        info!("Creating employee {} {}", new.first_name, new.last_name);

        let password = match &new.password {
            Some(password) => password.clone(),
            None => {
                let default = if new.role == Role::Manager {
                    "manager123"
                } else {
                    "password123"
                };
                warn!(
                    "no password supplied for {}; provisioning with the default credential",
                    new.email
                );
                default.to_string()
            }
        };
        let password_hash = hash_password(&password)?;

        let username = new
            .username
            .clone()
            .or_else(|| new.employee_number.clone())
            .unwrap_or_else(|| new.email.split('@').next().unwrap_or("").to_string());

        let mut tx = self.pool.begin().await?;

        let account_id: Uuid = sqlx::query(
            r#"
            INSERT INTO accounts (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&username)
        .bind(&new.email)
        .bind(&password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_err(e, "account"))?
        .get("id");

        let employee_id: Uuid = sqlx::query(
            r#"
            INSERT INTO employees (account_id, role, employee_number, last_name, first_name,
                                   birth_date, email, phone, address, position_id, hire_date, salary)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id
            "#,
        )
        .bind(account_id)
        .bind(new.role.as_str())
        .bind(&new.employee_number)
        .bind(&new.last_name)
        .bind(&new.first_name)
        .bind(new.birth_date)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.address)
        .bind(new.position_id)
        .bind(new.hire_date)
        .bind(new.salary)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_err(e, "employee"))?
        .get("id");

        tx.commit().await?;

        self.find(Scope::All, employee_id).await
    }

    /// Update an employee, keeping the department-leads relation consistent
    ///
    /// The leads rewiring runs in the same transaction as the row update:
    /// promoting to manager with a target department clears that
    /// department's previous leader and any department this employee led
    /// before; demoting clears any led department.
    pub async fn update(&self, id: Uuid, update: &UpdateEmployee) -> HrResult<Employee> {
        let current = self.find(Scope::All, id).await?;

        let role = update.role.unwrap_or(current.role);
        let last_name = update.last_name.clone().unwrap_or(current.last_name);
        let first_name = update.first_name.clone().unwrap_or(current.first_name);
        // Clearable columns: an explicit null in the payload overwrites with
        // NULL, absence keeps the stored value.
        let birth_date = update.birth_date.unwrap_or(current.birth_date);
        let email = update.email.clone().unwrap_or(current.email);
        let phone = update.phone.clone().unwrap_or(current.phone);
        let address = update.address.clone().unwrap_or(current.address);
        let position_id = update.position_id.unwrap_or(current.position_id);
        let hire_date = update.hire_date.unwrap_or(current.hire_date);
        let salary = update.salary.unwrap_or(current.salary);

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE employees
            SET role = $2, last_name = $3, first_name = $4, birth_date = $5,
                email = $6, phone = $7, address = $8, position_id = $9,
                hire_date = $10, salary = $11
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(role.as_str())
        .bind(&last_name)
        .bind(&first_name)
        .bind(birth_date)
        .bind(&email)
        .bind(&phone)
        .bind(&address)
        .bind(position_id)
        .bind(hire_date)
        .bind(salary)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_write_err(e, "employee"))?;

        match plan_lead_rewire(role, update.lead_department_id) {
            LeadRewire::Keep => {}
            LeadRewire::Clear => {
                sqlx::query("DELETE FROM department_leads WHERE employee_id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
            }
            LeadRewire::Assign(dept) => {
                sqlx::query(
                    "DELETE FROM department_leads WHERE employee_id = $1 OR department_id = $2",
                )
                .bind(id)
                .bind(dept)
                .execute(&mut *tx)
                .await?;
                sqlx::query(
                    "INSERT INTO department_leads (department_id, employee_id) VALUES ($1, $2)",
                )
                .bind(dept)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_write_err(e, "department lead"))?;
                info!("Employee {} now leads department {}", id, dept);
            }
        }

        tx.commit().await?;

        self.find(Scope::All, id).await
    }

    /// Delete an employee
    pub async fn delete(&self, id: Uuid) -> HrResult<()> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(HrError::NotFound("employee"));
        }
        info!("Deleted employee {}", id);
        Ok(())
    }

    /// Department an employee belongs to through their position
    ///
    /// Errors with `NotFound` when the employee does not exist; an
    /// employee without a position yields `None`.
    pub async fn department_of(&self, employee_id: Uuid) -> HrResult<Option<Uuid>> {
        let row = sqlx::query(
            r#"
            SELECT p.department_id
            FROM employees e
            LEFT JOIN positions p ON p.id = e.position_id
            WHERE e.id = $1
            "#,
        )
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(HrError::NotFound("employee"))?;

        Ok(row.get("department_id"))
    }

    /// Rows for the CSV export, restricted to `scope`
    pub async fn export_rows(&self, scope: Scope) -> HrResult<Vec<EmployeeExportRow>> {
        let employees = self.list(scope, None).await?;
        Ok(employees
            .into_iter()
            .map(|e| EmployeeExportRow {
                employee_number: e.employee_number.unwrap_or_default(),
                last_name: e.last_name,
                first_name: e.first_name,
                email: e.email,
                position_title: e.position_title.unwrap_or_default(),
                department_name: e.department_name.unwrap_or_default(),
                hire_date: e.hire_date,
                salary: e.salary,
            })
            .collect())
    }
}

fn map_employee(row: PgRow) -> Employee {
    let role: String = row.get("role");
    Employee {
        id: row.get("id"),
        account_id: row.get("account_id"),
        role: Role::parse(&role).unwrap_or(Role::Employee),
        employee_number: row.get("employee_number"),
        last_name: row.get("last_name"),
        first_name: row.get("first_name"),
        birth_date: row.get("birth_date"),
        email: row.get("email"),
        phone: row.get("phone"),
        address: row.get("address"),
        position_id: row.get("position_id"),
        position_title: row.get("position_title"),
        department_id: row.get("department_id"),
        department_name: row.get("department_name"),
        hire_date: row.get("hire_date"),
        salary: row.get("salary"),
    }
}

fn hash_password(password: &str) -> HrResult<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| {
            tracing::error!("Failed to hash password: {}", e);
            HrError::Internal
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demotion_clears_led_department() {
        assert_eq!(
            plan_lead_rewire(Role::Employee, Some(Uuid::new_v4())),
            LeadRewire::Clear
        );
        assert_eq!(plan_lead_rewire(Role::Employee, None), LeadRewire::Clear);
    }

    #[test]
    fn test_promotion_with_target_reassigns_leadership() {
        let dept = Uuid::new_v4();
        assert_eq!(
            plan_lead_rewire(Role::Manager, Some(dept)),
            LeadRewire::Assign(dept)
        );
    }

    #[test]
    fn test_manager_save_without_target_keeps_relation() {
        assert_eq!(plan_lead_rewire(Role::Manager, None), LeadRewire::Keep);
        assert_eq!(plan_lead_rewire(Role::Hr, None), LeadRewire::Keep);
    }
}
