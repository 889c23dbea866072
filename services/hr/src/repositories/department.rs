//! Department and position repository

use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::error::{HrError, HrResult};
use crate::models::{Department, NewDepartment, NewPosition, Position, UpdateDepartment};
use crate::policy::{Scope, scope_permits};

use super::map_write_err;

const SELECT_DEPARTMENT: &str = r#"
    SELECT d.id, d.name, d.code, l.employee_id AS lead_employee_id,
           (SELECT COUNT(*) FROM employees e
            JOIN positions p ON p.id = e.position_id
            WHERE p.department_id = d.id) AS employee_count
    FROM departments d
    LEFT JOIN department_leads l ON l.department_id = d.id
"#;

/// Department repository
#[derive(Clone)]
pub struct DepartmentRepository {
    pool: PgPool,
}

impl DepartmentRepository {
    /// Create a new department repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List departments visible in `scope`
    pub async fn list(&self, scope: Scope) -> HrResult<Vec<Department>> {
        let rows = match scope {
            Scope::Nothing => return Ok(vec![]),
            Scope::Department(dept) => {
                let query = format!("{SELECT_DEPARTMENT} WHERE d.id = $1");
                sqlx::query(&query).bind(dept).fetch_all(&self.pool).await?
            }
            _ => {
                let query = format!("{SELECT_DEPARTMENT} ORDER BY d.name");
                sqlx::query(&query).fetch_all(&self.pool).await?
            }
        };

        Ok(rows.into_iter().map(map_department).collect())
    }

    /// Find a department by id within `scope`
    pub async fn find(&self, scope: Scope, id: Uuid) -> HrResult<Department> {
        let query = format!("{SELECT_DEPARTMENT} WHERE d.id = $1");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(HrError::NotFound("department"))?;

        let department = map_department(row);
        if !scope_permits(scope, None, Some(department.id)) {
            return Err(HrError::Authorization(
                "department is outside your scope".to_string(),
            ));
        }
        Ok(department)
    }

    /// Create a department
    pub async fn create(&self, new: &NewDepartment) -> HrResult<Department> {
        if new.name.trim().is_empty() || new.code.trim().is_empty() {
            return Err(HrError::Validation(
                "department name and code are required".to_string(),
            ));
        }

        let id: Uuid = sqlx::query(
            "INSERT INTO departments (name, code) VALUES ($1, $2) RETURNING id",
        )
        .bind(&new.name)
        .bind(&new.code)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_err(e, "department code"))?
        .get("id");

        info!("Created department {} ({})", new.name, new.code);
        self.find(Scope::All, id).await
    }

    /// Update a department's name or code
    pub async fn update(&self, id: Uuid, update: &UpdateDepartment) -> HrResult<Department> {
        let current = self.find(Scope::All, id).await?;
        let name = update.name.clone().unwrap_or(current.name);
        let code = update.code.clone().unwrap_or(current.code);

        sqlx::query("UPDATE departments SET name = $2, code = $3 WHERE id = $1")
            .bind(id)
            .bind(&name)
            .bind(&code)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_err(e, "department code"))?;

        self.find(Scope::All, id).await
    }

    /// Delete a department
    pub async fn delete(&self, id: Uuid) -> HrResult<()> {
        let result = sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(HrError::NotFound("department"));
        }
        info!("Deleted department {}", id);
        Ok(())
    }

    /// List positions visible in `scope`
    pub async fn list_positions(&self, scope: Scope) -> HrResult<Vec<Position>> {
        let base = r#"
            SELECT p.id, p.title, p.department_id, d.name AS department_name,
                   p.responsibilities, p.missions
            FROM positions p
            JOIN departments d ON d.id = p.department_id
        "#;

        let rows = match scope {
            Scope::Nothing => return Ok(vec![]),
            Scope::Department(dept) => {
                let query = format!("{base} WHERE p.department_id = $1 ORDER BY p.title");
                sqlx::query(&query).bind(dept).fetch_all(&self.pool).await?
            }
            _ => {
                let query = format!("{base} ORDER BY p.title");
                sqlx::query(&query).fetch_all(&self.pool).await?
            }
        };

        Ok(rows.into_iter().map(map_position).collect())
    }

    /// Create a position in a department
    pub async fn create_position(&self, new: &NewPosition) -> HrResult<Position> {
        if new.title.trim().is_empty() {
            return Err(HrError::Validation("position title is required".to_string()));
        }

        let row = sqlx::query(
            r#"
            INSERT INTO positions (title, department_id, responsibilities, missions)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, department_id,
                      (SELECT name FROM departments WHERE id = $2) AS department_name,
                      responsibilities, missions
            "#,
        )
        .bind(&new.title)
        .bind(new.department_id)
        .bind(&new.responsibilities)
        .bind(&new.missions)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_err(e, "position"))?;

        info!("Created position {}", new.title);
        Ok(map_position(row))
    }
}

fn map_department(row: PgRow) -> Department {
    Department {
        id: row.get("id"),
        name: row.get("name"),
        code: row.get("code"),
        lead_employee_id: row.get("lead_employee_id"),
        employee_count: row.get("employee_count"),
    }
}

fn map_position(row: PgRow) -> Position {
    Position {
        id: row.get("id"),
        title: row.get("title"),
        department_id: row.get("department_id"),
        department_name: row.get("department_name"),
        responsibilities: row.get("responsibilities"),
        missions: row.get("missions"),
    }
}
