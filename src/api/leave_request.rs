use crate::auth::auth::AuthUser;
use crate::leave::approval::{self, ApprovalError, ReviewOutcome, ReviewSubject};
use crate::leave::report::{self, DateRange};
use crate::leave::validate::{
    self, ADMIN_EDIT_REASON_MIN, LeaveDraft, REASON_MIN, ValidationContext,
};
use crate::model::leave_request::{
    ApprovalAction, ApprovalRecord, LeaveKind, LeaveRow, LeaveStatus, LeaveType,
};
use crate::notify;
use crate::utils::db_utils::{build_update_sql, execute_update};
use crate::utils::schedule_cache;
use actix_web::{HttpResponse, Responder, web};
use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    /// Target employee; admins may submit on behalf of anyone.
    /// Defaults to the caller's own employee profile.
    #[schema(example = 1000)]
    pub employee_id: Option<u64>,
    #[schema(example = "2026-03-05", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-03-07", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub reason: String,
    pub attachment: Option<String>,
    #[serde(flatten)]
    pub kind: LeaveKind,
}

#[derive(Deserialize, ToSchema)]
pub struct ReviewPayload {
    #[schema(example = "Approved per policy")]
    pub reason: String,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveFilter {
    #[schema(example = 123)]
    /// Filter by employee ID
    pub employee_id: Option<u64>,
    /// Filter by leave status
    pub status: Option<LeaveStatus>,
    #[schema(example = 7)]
    /// Filter by team: leaves of employees reporting to this team leader
    pub team_leader_id: Option<u64>,
    #[schema(example = 1)]
    /// Pagination page number (start with 1)
    pub page: Option<u64>, // 1-based
    #[schema(example = 10)]
    /// Pagination per page number
    pub per_page: Option<u64>, // items per page
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveRow>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

/// A leave with its full approval trail. `approved_by` / `rejected_by`
/// are partitions of the append-only history.
#[derive(Serialize, ToSchema)]
pub struct LeaveDetailResponse {
    pub leave: LeaveRow,
    pub approved_by: Vec<ApprovalRecord>,
    pub rejected_by: Vec<ApprovalRecord>,
    pub approval_history: Vec<ApprovalRecord>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct ReportQuery {
    pub employee_id: Option<u64>,
    #[schema(example = 2026)]
    pub year: Option<i32>,
    #[schema(example = 3)]
    pub month: Option<u32>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct EligibilityQuery {
    #[schema(example = "2026-03-10", format = "date", value_type = String)]
    pub start_date: NaiveDate,
}

#[derive(Serialize, ToSchema)]
pub struct EligibilityResponse {
    pub eligible: bool,
    /// Advisory shown when submission would be blocked.
    pub message: Option<String>,
}

async fn fetch_leave(pool: &MySqlPool, leave_id: u64) -> Result<Option<LeaveRow>, sqlx::Error> {
    sqlx::query_as::<_, LeaveRow>(
        r#"
        SELECT id, employee_id, leave_type, start_date, end_date,
               reason, attachment, senior_id, status, created_at
        FROM leaves
        WHERE id = ?
        "#,
    )
    .bind(leave_id)
    .fetch_optional(pool)
    .await
}

async fn fetch_approvals(
    pool: &MySqlPool,
    leave_id: u64,
) -> Result<Vec<ApprovalRecord>, sqlx::Error> {
    sqlx::query_as::<_, ApprovalRecord>(
        r#"
        SELECT id, leave_id, approver_id, approver_name, profile_picture,
               action, reason, created_at
        FROM leave_approvals
        WHERE leave_id = ?
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(leave_id)
    .fetch_all(pool)
    .await
}

async fn employee_full_name(
    pool: &MySqlPool,
    employee_id: u64,
) -> Result<Option<String>, sqlx::Error> {
    let row = sqlx::query_as::<_, (String, String)>(
        "SELECT first_name, last_name FROM employees WHERE id = ?",
    )
    .bind(employee_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|(first, last)| format!("{} {}", first, last)))
}

/// Casual leaves the employee already has in the month containing `today`.
/// The rows are fetched for the month window; the tally itself is the
/// report fold, so the quota gate and the report screen always agree.
async fn casual_taken_this_month(
    pool: &MySqlPool,
    employee_id: u64,
    today: NaiveDate,
) -> Result<u32, sqlx::Error> {
    let range = match DateRange::month(today.year(), today.month()) {
        Some(r) => r,
        None => return Ok(0),
    };

    let rows = sqlx::query_as::<_, LeaveRow>(
        r#"
        SELECT id, employee_id, leave_type, start_date, end_date,
               reason, attachment, senior_id, status, created_at
        FROM leaves
        WHERE employee_id = ?
        AND start_date <= ?
        AND end_date >= ?
        "#,
    )
    .bind(employee_id)
    .bind(range.to)
    .bind(range.from)
    .fetch_all(pool)
    .await?;

    Ok(report::aggregate_in_range(&rows, &range).count_for(LeaveType::CasualLeave))
}

fn approval_error_response(err: ApprovalError) -> HttpResponse {
    match err {
        ApprovalError::SelfApproval | ApprovalError::AlreadyActed | ApprovalError::NotAuthorized => {
            HttpResponse::Forbidden().json(json!({ "message": err.to_string() }))
        }
        ApprovalError::AlreadyFinal(_) | ApprovalError::EmptyReason => {
            HttpResponse::BadRequest().json(json!({ "message": err.to_string() }))
        }
    }
}

/* =========================
Create leave request
========================= */
/// Swagger doc for create_leave endpoint
#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body(
        content = CreateLeave,
        description = "Leave request payload; conditional fields depend on leave_type",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Leave request submitted successfully",
         body = Object,
         example = json!({
            "message": "Leave request submitted",
            "status": "pending",
            "leave_id": 1,
            "employee_name": "John Doe",
            "leave_type": "casual_leave"
         })
        ),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLeave>,
) -> actix_web::Result<impl Responder> {
    // 1️⃣ resolve the target employee; on-behalf needs admin
    let employee_id = match payload.employee_id {
        Some(id) => {
            if auth.employee_id != Some(id) {
                auth.require_admin()?;
            }
            id
        }
        None => auth.require_employee_id()?,
    };

    let employee_name = match employee_full_name(pool.get_ref(), employee_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to fetch employee");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })? {
        Some(name) => name,
        None => {
            return Ok(HttpResponse::NotFound().json(json!({
                "message": "Employee not found"
            })));
        }
    };

    // 2️⃣ validate against company policy
    let schedule = schedule_cache::get(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to load company schedule");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let today = Utc::now().date_naive();
    let casual_taken = if payload.kind.leave_type() == LeaveType::CasualLeave {
        casual_taken_this_month(pool.get_ref(), employee_id, today)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, employee_id, "Failed to count casual leaves");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?
    } else {
        0
    };

    let draft = LeaveDraft {
        kind: payload.kind.clone(),
        start_date: payload.start_date,
        end_date: payload.end_date,
        reason: payload.reason.clone(),
        attachment: payload.attachment.clone(),
    };
    let ctx = ValidationContext {
        today,
        schedule: &schedule,
        casual_taken_this_month: casual_taken,
        reason_min: REASON_MIN,
    };

    if let Err(e) = validate::validate(&draft, &ctx) {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": e.to_string()
        })));
    }

    // 3️⃣ insert request
    let leave_type = payload.kind.leave_type();
    let folded_reason = validate::fold_reason(&payload.kind, &payload.reason);

    let result = sqlx::query(
        r#"
        INSERT INTO leaves
            (employee_id, leave_type, start_date, end_date, reason, attachment, senior_id)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(leave_type)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(&folded_reason)
    .bind(&payload.attachment)
    .bind(payload.kind.senior_id())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to create leave request");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let leave_id = result.last_insert_id();

    // 4️⃣ tell the people who can act on it (best-effort)
    let admins = notify::admin_user_ids(pool.get_ref()).await.unwrap_or_default();
    let team_leader = notify::team_leader_user_id(pool.get_ref(), employee_id)
        .await
        .unwrap_or(None);
    let mut recipients = notify::approver_recipients(
        schedule.leave_approval_by,
        &admins,
        team_leader,
        auth.user_id,
    );
    if let Some(senior_id) = payload.kind.senior_id() {
        if let Ok(Some(senior_user)) = notify::user_id_for_employee(pool.get_ref(), senior_id).await
        {
            if senior_user != auth.user_id && !recipients.contains(&senior_user) {
                recipients.push(senior_user);
            }
        }
    }

    notify::dispatch_all(
        pool.get_ref(),
        &recipients,
        "New leave request",
        &format!("{} applied for {}", employee_name, leave_type),
        "leave_requested",
        json!({ "leave_id": leave_id, "leave_type": leave_type }),
        Some(format!("/leave/{}", leave_id)),
    )
    .await;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Leave request submitted",
        "status": "pending",
        "leave_id": leave_id,
        "employee_name": employee_name,
        "leave_type": leave_type
    })))
}

/* =========================
Approve / Reject leave
========================= */
async fn act_on_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    leave_id: u64,
    action: ApprovalAction,
    reason: &str,
) -> actix_web::Result<HttpResponse> {
    let leave = match fetch_leave(pool.get_ref(), leave_id).await.map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to fetch leave request");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })? {
        Some(l) => l,
        None => {
            return Ok(HttpResponse::NotFound().json(json!({
                "message": "Leave request not found"
            })));
        }
    };

    let approvals = fetch_approvals(pool.get_ref(), leave_id).await.map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to fetch approval history");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let schedule = schedule_cache::get(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to load company schedule");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // 1️⃣ run the state machine
    let prior: Vec<(u64, ApprovalAction)> =
        approvals.iter().map(|a| (a.approver_id, a.action)).collect();
    let subject = ReviewSubject {
        status: leave.status,
        owner_employee_id: leave.employee_id,
        prior: &prior,
    };

    let outcome = match approval::review(
        &subject,
        &auth.actor(),
        action,
        reason,
        schedule.leave_approval_by,
    ) {
        Ok(o) => o,
        Err(e) => return Ok(approval_error_response(e)),
    };

    // 2️⃣ persist the action; the status flip is guarded so a lost race
    // with another approver surfaces instead of double-finalizing
    let approver_name = match auth.employee_id {
        Some(emp_id) => employee_full_name(pool.get_ref(), emp_id)
            .await
            .ok()
            .flatten()
            .unwrap_or_else(|| auth.username.clone()),
        None => auth.username.clone(),
    };

    let mut tx = pool.get_ref().begin().await.map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to open transaction");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    sqlx::query(
        r#"
        INSERT INTO leave_approvals
            (leave_id, approver_id, approver_name, action, reason)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(leave_id)
    .bind(auth.user_id)
    .bind(&approver_name)
    .bind(action)
    .bind(reason.trim())
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to record approval action");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if let ReviewOutcome::Finalized(status) = outcome {
        let result = sqlx::query(
            r#"
            UPDATE leaves
            SET status = ?
            WHERE id = ?
            AND status = 'pending'
            "#,
        )
        .bind(status)
        .bind(leave_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, leave_id, "Failed to finalize leave");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

        if result.rows_affected() == 0 {
            let _ = tx.rollback().await;
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "Leave request not found or already processed"
            })));
        }
    }

    tx.commit().await.map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to commit approval");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // 3️⃣ respond; clients re-fetch rather than patching local state
    match outcome {
        ReviewOutcome::Recorded { approvals } => Ok(HttpResponse::Ok().json(json!({
            "message": "Leave approval recorded",
            "status": LeaveStatus::Pending,
            "approvals": approvals,
            "required": approval::REQUIRED_APPROVALS
        }))),
        ReviewOutcome::Finalized(status) => {
            if let Ok(Some(owner_user)) =
                notify::user_id_for_employee(pool.get_ref(), leave.employee_id).await
            {
                let verb = match status {
                    LeaveStatus::Approved => "approved",
                    _ => "rejected",
                };
                notify::dispatch(
                    pool.get_ref(),
                    &notify::Notification {
                        target_user_id: owner_user,
                        title: format!("Leave {}", verb),
                        message: format!("Your {} request was {}", leave.leave_type, verb),
                        key: format!("leave_{}", verb),
                        metadata: json!({ "leave_id": leave_id }),
                        redirect_url: Some(format!("/leave/{}", leave_id)),
                    },
                )
                .await;
            }

            Ok(HttpResponse::Ok().json(json!({
                "message": format!("Leave {}", match status {
                    LeaveStatus::Approved => "approved",
                    _ => "rejected",
                }),
                "status": status
            })))
        }
    }
}

/// Swagger doc for approve_leave endpoint
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/approve",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to approve")
    ),
    request_body = ReviewPayload,
    responses(
        (status = 200, description = "Approval recorded or leave approved", body = Object, example = json!({
            "message": "Leave approved",
            "status": "approved"
        })),
        (status = 400, description = "Leave request not found or already processed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<ReviewPayload>,
) -> actix_web::Result<impl Responder> {
    act_on_leave(
        auth,
        pool,
        path.into_inner(),
        ApprovalAction::Approve,
        &payload.reason,
    )
    .await
}

/// Swagger doc for reject_leave endpoint
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/reject",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to reject")
    ),
    request_body = ReviewPayload,
    responses(
        (status = 200, description = "Leave rejected", body = Object, example = json!({
            "message": "Leave rejected",
            "status": "rejected"
        })),
        (status = 400, description = "Leave request not found or already processed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<ReviewPayload>,
) -> actix_web::Result<impl Responder> {
    act_on_leave(
        auth,
        pool,
        path.into_inner(),
        ApprovalAction::Reject,
        &payload.reason,
    )
    .await
}

/// for getting a leave application details endpoint
#[utoipa::path(
    get,
    path = "/api/v1/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to fetch")
    ),
    responses(
        (status = 200, description = "Leave request found", body = LeaveDetailResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found", body = Object, example = json!({
            "message": "Leave request not found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();

    let leave = match fetch_leave(pool.get_ref(), leave_id).await.map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to fetch leave request");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })? {
        Some(l) => l,
        None => {
            return Ok(HttpResponse::NotFound().json(json!({
                "message": "Leave request not found"
            })));
        }
    };

    // Employees may only read their own leaves.
    if auth.role == crate::model::role::Role::Employee && auth.employee_id != Some(leave.employee_id)
    {
        return Err(actix_web::error::ErrorForbidden("Not your leave request"));
    }

    let approval_history = fetch_approvals(pool.get_ref(), leave_id).await.map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to fetch approval history");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let (approved_by, rejected_by): (Vec<_>, Vec<_>) = approval_history
        .iter()
        .cloned()
        .partition(|a| a.action == ApprovalAction::Approve);

    Ok(HttpResponse::Ok().json(LeaveDetailResponse {
        leave,
        approved_by,
        rejected_by,
        approval_history,
    }))
}

/// for getting leave applications endpoint
#[utoipa::path(
    get,
    path = "/api/v1/leave",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Paginated leave list", body = LeaveListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<LeaveFilter>,
) -> actix_web::Result<impl Responder> {
    // Employees see only their own history; approvers see the company.
    let forced_employee_id = if auth.role == crate::model::role::Role::Employee {
        Some(auth.require_employee_id()?)
    } else {
        query.employee_id
    };

    // -------------------------
    // Pagination
    // -------------------------
    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    // -------------------------
    // WHERE clause
    // -------------------------
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(emp_id) = forced_employee_id {
        where_sql.push_str(" AND employee_id = ?");
        args.push(FilterValue::U64(emp_id));
    }

    let status_key = query.status.map(|s| s.to_string());
    if let Some(status) = status_key.as_deref() {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status));
    }

    if let Some(leader_id) = query.team_leader_id {
        where_sql
            .push_str(" AND employee_id IN (SELECT id FROM employees WHERE team_leader_id = ?)");
        args.push(FilterValue::U64(leader_id));
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!("SELECT COUNT(*) FROM leaves{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error=%e, "Failed to count leave requests");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // -------------------------
    // DATA query
    // -------------------------
    let data_sql = format!(
        r#"
        SELECT id, employee_id, leave_type, start_date, end_date,
               reason, attachment, senior_id, status, created_at
        FROM leaves
        {}
        ORDER BY created_at DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, LeaveRow>(&data_sql);
    for arg in &args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(*v),
            FilterValue::Str(s) => data_q.bind(*s),
        };
    }

    let leaves = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error=%e, "Failed to fetch leave list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    // -------------------------
    // Response
    // -------------------------
    let response = LeaveListResponse {
        data: leaves,
        page: page as u32,
        per_page: per_page as u32,
        total,
    };

    Ok(HttpResponse::Ok().json(response))
}

/* =========================
Admin edit of a pending leave
========================= */
/// Swagger doc for update_leave endpoint
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to edit")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "Leave updated successfully"),
        (status = 400, description = "Leave is not pending or payload invalid"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn update_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let leave_id = path.into_inner();

    let leave = match fetch_leave(pool.get_ref(), leave_id).await.map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to fetch leave request");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })? {
        Some(l) => l,
        None => {
            return Ok(HttpResponse::NotFound().json(json!({
                "message": "Leave request not found"
            })));
        }
    };

    if leave.status.is_terminal() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Only pending leaves can be edited"
        })));
    }

    // Admin edits carry the stricter reason minimum.
    if let Some(reason) = body.get("reason").and_then(|v| v.as_str()) {
        if let Err(e) = validate::check_reason(reason, ADMIN_EDIT_REASON_MIN) {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": e.to_string()
            })));
        }
    }

    if let Some(leave_type) = body.get("leave_type").and_then(|v| v.as_str()) {
        if leave_type.parse::<LeaveType>().is_err() {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "Invalid leave type"
            })));
        }
    }

    let update = build_update_sql(
        "leaves",
        &body,
        &["start_date", "end_date", "reason", "leave_type", "attachment"],
        "id",
        leave_id,
    )?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Leave request not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Leave updated successfully"
    })))
}

/// Swagger doc for delete_leave endpoint
#[utoipa::path(
    delete,
    path = "/api/v1/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to delete")
    ),
    responses(
        (status = 200, description = "Successfully deleted"),
        (status = 400, description = "Leave request not found or already processed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn delete_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let leave_id = path.into_inner();

    let result = sqlx::query("DELETE FROM leaves WHERE id = ? AND status = 'pending'")
        .bind(leave_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, leave_id, "Failed to delete leave request");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Leave request not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted"
    })))
}

/* =========================
Leave report
========================= */
/// Per-type and per-status leave counts for an employee and month
#[utoipa::path(
    get,
    path = "/api/v1/leave/report",
    params(ReportQuery),
    responses(
        (status = 200, description = "Leave report", body = crate::leave::report::LeaveReport),
        (status = 400, description = "Invalid month"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_report(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<ReportQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = if auth.role == crate::model::role::Role::Employee {
        auth.require_employee_id()?
    } else {
        match query.employee_id.or(auth.employee_id) {
            Some(id) => id,
            None => {
                return Ok(HttpResponse::BadRequest().json(json!({
                    "message": "employee_id is required"
                })));
            }
        }
    };

    let today = Utc::now().date_naive();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());

    let range = match DateRange::month(year, month) {
        Some(r) => r,
        None => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "Invalid year or month"
            })));
        }
    };

    let rows = sqlx::query_as::<_, LeaveRow>(
        r#"
        SELECT id, employee_id, leave_type, start_date, end_date,
               reason, attachment, senior_id, status, created_at
        FROM leaves
        WHERE employee_id = ?
        AND start_date <= ?
        AND end_date >= ?
        "#,
    )
    .bind(employee_id)
    .bind(range.to)
    .bind(range.from)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to fetch leaves for report");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(report::aggregate_in_range(&rows, &range)))
}

/* =========================
Casual leave eligibility probe
========================= */
/// The fail-closed submission gate, exposed so clients can disable the
/// submit action instead of letting a doomed request hit the server.
#[utoipa::path(
    get,
    path = "/api/v1/leave/eligibility",
    params(EligibilityQuery),
    responses(
        (status = 200, description = "Casual leave eligibility", body = EligibilityResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn casual_eligibility(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<EligibilityQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee_id()?;

    let schedule = schedule_cache::get(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to load company schedule");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let today = Utc::now().date_naive();
    let taken = casual_taken_this_month(pool.get_ref(), employee_id, today)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to count casual leaves");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let gate = validate::casual_gate(query.start_date, today, &schedule, taken);

    Ok(HttpResponse::Ok().json(EligibilityResponse {
        eligible: gate.is_none(),
        message: gate.map(|g| g.to_string()),
    }))
}
