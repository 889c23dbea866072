//! HR service routes
//!
//! Every handler resolves the actor from the request extensions, asks the
//! policy engine for a verdict or a scope, and only then touches a
//! repository.

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    actor::Actor,
    attendance::CheckOutcome,
    error::HrError,
    export,
    leave::{self, Decision},
    middleware::auth_middleware,
    models::{
        AdjudicateRequest, CheckInRequest, NewAbsence, NewContract, NewContractType,
        NewDepartment, NewEmployee, NewEvaluation, NewJobApplication, NewJobOffer,
        NewLeaveRequest, NewPayslip, NewPosition, NewTraining, UpdateDepartment, UpdateEmployee,
    },
    notifier::Notification,
    policy::{Action, Resource, Target, authorize, visible_scope},
    state::AppState,
};

/// Create the router for the HR service
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route(
            "/employees/:id",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
        .route("/export/employees.csv", get(export_employees))
        .route("/departments", get(list_departments).post(create_department))
        .route(
            "/departments/:id",
            get(get_department).put(update_department).delete(delete_department),
        )
        .route("/positions", get(list_positions).post(create_position))
        .route(
            "/contract-types",
            get(list_contract_types).post(create_contract_type),
        )
        .route("/contracts", get(list_contracts).post(create_contract))
        .route("/leaves", get(list_leaves).post(submit_leave))
        .route("/leaves/:id/approve", post(approve_leave))
        .route("/leaves/:id/reject", post(reject_leave))
        .route("/attendance", get(list_attendance))
        .route("/attendance/check-in", post(check_in))
        .route("/absences", post(record_absence))
        .route("/payslips", get(list_payslips).post(create_payslip))
        .route("/evaluations", get(list_evaluations).post(create_evaluation))
        .route("/trainings", get(list_trainings).post(create_training))
        .route("/trainings/:id/enroll", post(enroll_training))
        .route("/job-offers", get(list_job_offers).post(create_job_offer))
        .route("/job-applications", post(create_job_application))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "hr-service"
    }))
}

// ---- Employees ----

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

pub async fn list_employees(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, HrError> {
    let scope = visible_scope(&actor, Resource::Employee);
    let employees = state
        .employee_repository
        .list(scope, query.q.as_deref())
        .await?;
    Ok(Json(employees))
}

pub async fn get_employee(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HrError> {
    let scope = visible_scope(&actor, Resource::Employee);
    let employee = state.employee_repository.find(scope, id).await?;
    Ok(Json(employee))
}

pub async fn create_employee(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<NewEmployee>,
) -> Result<impl IntoResponse, HrError> {
    let target = Target {
        employee_role: Some(payload.role),
        ..Default::default()
    };
    authorize(&actor, Action::Create, Resource::Employee, Some(&target))?;

    let employee = state.employee_repository.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

pub async fn update_employee(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEmployee>,
) -> Result<impl IntoResponse, HrError> {
    let current = state
        .employee_repository
        .find(crate::policy::Scope::All, id)
        .await?;
    let mut target = Target::employee(current.id, current.role, current.department_id);
    target.new_role = payload.role;
    target.lead_department_id = payload.lead_department_id;
    authorize(&actor, Action::Update, Resource::Employee, Some(&target))?;

    let employee = state.employee_repository.update(id, &payload).await?;
    Ok(Json(employee))
}

pub async fn delete_employee(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HrError> {
    let current = state
        .employee_repository
        .find(crate::policy::Scope::All, id)
        .await?;
    let target = Target::employee(current.id, current.role, current.department_id);
    authorize(&actor, Action::Delete, Resource::Employee, Some(&target))?;

    state.employee_repository.delete(id).await?;
    Ok(Json(json!({"message": "Employee deleted"})))
}

pub async fn export_employees(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<impl IntoResponse, HrError> {
    let scope = visible_scope(&actor, Resource::Employee);
    let rows = state.employee_repository.export_rows(scope).await?;
    let body = export::employees_csv(&rows)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"employees.csv\"",
            ),
        ],
        body,
    ))
}

// ---- Departments ----

pub async fn list_departments(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<impl IntoResponse, HrError> {
    let scope = visible_scope(&actor, Resource::Department);
    let departments = state.department_repository.list(scope).await?;
    Ok(Json(departments))
}

pub async fn get_department(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HrError> {
    let scope = visible_scope(&actor, Resource::Department);
    let department = state.department_repository.find(scope, id).await?;
    Ok(Json(department))
}

pub async fn create_department(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<NewDepartment>,
) -> Result<impl IntoResponse, HrError> {
    authorize(&actor, Action::Create, Resource::Department, None)?;
    let department = state.department_repository.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(department)))
}

pub async fn update_department(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDepartment>,
) -> Result<impl IntoResponse, HrError> {
    let target = Target::department(Some(id));
    authorize(&actor, Action::Update, Resource::Department, Some(&target))?;
    let department = state.department_repository.update(id, &payload).await?;
    Ok(Json(department))
}

pub async fn delete_department(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HrError> {
    authorize(&actor, Action::Delete, Resource::Department, None)?;
    state.department_repository.delete(id).await?;
    Ok(Json(json!({"message": "Department deleted"})))
}

// ---- Positions ----

pub async fn list_positions(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<impl IntoResponse, HrError> {
    let scope = visible_scope(&actor, Resource::Position);
    let positions = state.department_repository.list_positions(scope).await?;
    Ok(Json(positions))
}

pub async fn create_position(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<NewPosition>,
) -> Result<impl IntoResponse, HrError> {
    authorize(&actor, Action::Create, Resource::Position, None)?;
    let position = state.department_repository.create_position(&payload).await?;
    Ok((StatusCode::CREATED, Json(position)))
}

// ---- Contract types and contracts ----

pub async fn list_contract_types(
    State(state): State<AppState>,
    Extension(_actor): Extension<Actor>,
) -> Result<impl IntoResponse, HrError> {
    let types = state.records_repository.list_contract_types().await?;
    Ok(Json(types))
}

pub async fn create_contract_type(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<NewContractType>,
) -> Result<impl IntoResponse, HrError> {
    authorize(&actor, Action::Create, Resource::ContractType, None)?;
    let contract_type = state.records_repository.create_contract_type(&payload).await?;
    Ok((StatusCode::CREATED, Json(contract_type)))
}

pub async fn list_contracts(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<impl IntoResponse, HrError> {
    let scope = visible_scope(&actor, Resource::Contract);
    let contracts = state.records_repository.list_contracts(scope).await?;
    Ok(Json(contracts))
}

pub async fn create_contract(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<NewContract>,
) -> Result<impl IntoResponse, HrError> {
    authorize(&actor, Action::Create, Resource::Contract, None)?;
    let contract = state.records_repository.create_contract(&payload).await?;
    Ok((StatusCode::CREATED, Json(contract)))
}

// ---- Leave ----

pub async fn list_leaves(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<impl IntoResponse, HrError> {
    let scope = visible_scope(&actor, Resource::Leave);
    let leaves = state.leave_repository.list(scope).await?;
    Ok(Json(leaves))
}

pub async fn submit_leave(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<NewLeaveRequest>,
) -> Result<impl IntoResponse, HrError> {
    let record = state
        .leave_repository
        .submit(actor.employee_id, &payload)
        .await?;

    // Tell the designated approver there is something to decide.
    if let Some(approver_id) = record.request.approver_id {
        if let Some(email) = state.leave_repository.employee_email(approver_id).await? {
            state.notifier.send_detached(Notification {
                recipient: email,
                subject: format!("New leave request from {}", record.request.employee_name),
                body: format!(
                    "A new leave request has been submitted by {}.\nFrom: {}\nTo: {}\nReason: {}\n\nPlease log in to approve or reject it.",
                    record.request.employee_name,
                    record.request.start_date,
                    record.request.end_date,
                    record.request.reason,
                ),
            });
        }
    }

    Ok((StatusCode::CREATED, Json(record.request)))
}

pub async fn approve_leave(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdjudicateRequest>,
) -> Result<impl IntoResponse, HrError> {
    adjudicate_leave(state, actor, id, Decision::Approve, payload).await
}

pub async fn reject_leave(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdjudicateRequest>,
) -> Result<impl IntoResponse, HrError> {
    adjudicate_leave(state, actor, id, Decision::Reject, payload).await
}

async fn adjudicate_leave(
    state: AppState,
    actor: Actor,
    id: Uuid,
    decision: Decision,
    payload: AdjudicateRequest,
) -> Result<axum::response::Response, HrError> {
    let scope = visible_scope(&actor, Resource::Leave);
    let record = state.leave_repository.find(scope, id).await?;

    leave::authorize_adjudication(&actor, record.requester_role, record.requester_department)?;
    let next = leave::resolve(record.request.status, decision)?;

    // The repository re-checks the pending status so a racing second
    // adjudicator cannot resolve (or notify) twice.
    state
        .leave_repository
        .mark_resolved(id, next, &payload.comment)
        .await?;

    let (subject, verdict) = match decision {
        Decision::Approve => ("Your leave request has been APPROVED", "approved"),
        Decision::Reject => ("Your leave request has been REJECTED", "rejected"),
    };
    state.notifier.send_detached(Notification {
        recipient: record.requester_email,
        subject: subject.to_string(),
        body: format!(
            "Your leave request from {} to {} has been {}.",
            record.request.start_date, record.request.end_date, verdict,
        ),
    });

    let mut request = record.request;
    request.status = next;
    request.manager_comment = payload.comment;
    Ok(Json(request).into_response())
}

// ---- Attendance ----

pub async fn list_attendance(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<impl IntoResponse, HrError> {
    let scope = visible_scope(&actor, Resource::Attendance);
    let records = state.attendance_repository.list(scope).await?;
    Ok(Json(records))
}

pub async fn check_in(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<CheckInRequest>,
) -> Result<impl IntoResponse, HrError> {
    let employee_id = payload.employee_id.unwrap_or(actor.employee_id);
    let department_id = state.employee_repository.department_of(employee_id).await?;
    let target = Target::employee(employee_id, crate::actor::Role::Employee, department_id);
    authorize(&actor, Action::Create, Resource::Attendance, Some(&target))?;

    let now = Local::now();
    let day = payload.day.unwrap_or_else(|| now.date_naive());
    let at = payload.at.unwrap_or_else(|| now.time());

    let result = state.attendance_repository.check_in(employee_id, day, at).await?;
    let response = match result.outcome {
        CheckOutcome::RecordArrival => (
            StatusCode::CREATED,
            Json(json!({"record": result.record})),
        ),
        CheckOutcome::RecordDeparture => (StatusCode::OK, Json(json!({"record": result.record}))),
        CheckOutcome::AlreadyDeparted => (
            StatusCode::OK,
            Json(json!({
                "record": result.record,
                "warning": "attendance for this day is already complete",
            })),
        ),
    };
    Ok(response)
}

pub async fn record_absence(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<NewAbsence>,
) -> Result<impl IntoResponse, HrError> {
    let department_id = state
        .employee_repository
        .department_of(payload.employee_id)
        .await?;
    let target = Target::department(department_id);
    authorize(&actor, Action::Create, Resource::Attendance, Some(&target))?;

    let absence = state.attendance_repository.record_absence(&payload).await?;
    Ok((StatusCode::CREATED, Json(absence)))
}

// ---- Payroll ----

pub async fn list_payslips(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<impl IntoResponse, HrError> {
    let scope = visible_scope(&actor, Resource::Payslip);
    let payslips = state.records_repository.list_payslips(scope).await?;
    Ok(Json(payslips))
}

pub async fn create_payslip(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<NewPayslip>,
) -> Result<impl IntoResponse, HrError> {
    authorize(&actor, Action::Create, Resource::Payslip, None)?;
    let payslip = state.records_repository.create_payslip(&payload).await?;
    Ok((StatusCode::CREATED, Json(payslip)))
}

// ---- Evaluations ----

pub async fn list_evaluations(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<impl IntoResponse, HrError> {
    let scope = visible_scope(&actor, Resource::Evaluation);
    let evaluations = state.records_repository.list_evaluations(scope).await?;
    Ok(Json(evaluations))
}

pub async fn create_evaluation(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<NewEvaluation>,
) -> Result<impl IntoResponse, HrError> {
    let department_id = state
        .employee_repository
        .department_of(payload.employee_id)
        .await?;
    let target = Target::department(department_id);
    authorize(&actor, Action::Create, Resource::Evaluation, Some(&target))?;

    let evaluation = state
        .records_repository
        .create_evaluation(actor.employee_id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(evaluation)))
}

// ---- Trainings ----

pub async fn list_trainings(
    State(state): State<AppState>,
    Extension(_actor): Extension<Actor>,
) -> Result<impl IntoResponse, HrError> {
    let trainings = state.records_repository.list_trainings().await?;
    Ok(Json(trainings))
}

pub async fn create_training(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<NewTraining>,
) -> Result<impl IntoResponse, HrError> {
    authorize(&actor, Action::Create, Resource::Training, None)?;
    let training = state.records_repository.create_training(&payload).await?;
    Ok((StatusCode::CREATED, Json(training)))
}

#[derive(Deserialize, Default)]
pub struct EnrollRequest {
    pub employee_id: Option<Uuid>,
}

pub async fn enroll_training(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EnrollRequest>,
) -> Result<impl IntoResponse, HrError> {
    let employee_id = payload.employee_id.unwrap_or(actor.employee_id);
    let target = Target {
        employee_id: Some(employee_id),
        ..Default::default()
    };
    authorize(&actor, Action::Create, Resource::Enrollment, Some(&target))?;

    let enrollment = state.records_repository.enroll(employee_id, id).await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

// ---- Recruitment ----

pub async fn list_job_offers(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<impl IntoResponse, HrError> {
    let scope = visible_scope(&actor, Resource::JobOffer);
    let offers = state.records_repository.list_job_offers(scope).await?;
    Ok(Json(offers))
}

pub async fn create_job_offer(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<NewJobOffer>,
) -> Result<impl IntoResponse, HrError> {
    authorize(&actor, Action::Create, Resource::JobOffer, None)?;
    let offer = state.records_repository.create_job_offer(&payload).await?;
    Ok((StatusCode::CREATED, Json(offer)))
}

pub async fn create_job_application(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<NewJobApplication>,
) -> Result<impl IntoResponse, HrError> {
    authorize(&actor, Action::Create, Resource::JobOffer, None)?;
    let application = state.records_repository.create_application(&payload).await?;
    Ok((StatusCode::CREATED, Json(application)))
}
