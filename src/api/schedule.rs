use crate::auth::auth::AuthUser;
use crate::model::company_schedule::CompanySchedule;
use crate::utils::schedule_cache;
use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use sqlx::MySqlPool;

/// Company schedule settings
#[utoipa::path(
    get,
    path = "/api/v1/schedule",
    responses(
        (status = 200, description = "Company schedule settings", body = CompanySchedule),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Schedule"
)]
pub async fn get_schedule(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let schedule = schedule_cache::get(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to load company schedule");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(schedule))
}

/// Update company schedule settings (Admin)
#[utoipa::path(
    put,
    path = "/api/v1/schedule",
    request_body = CompanySchedule,
    responses(
        (status = 200, description = "Schedule updated", body = Object, example = json!({
            "message": "Schedule updated"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Schedule"
)]
pub async fn update_schedule(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CompanySchedule>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    sqlx::query(
        r#"
        UPDATE company_schedule
        SET casual_leaves_per_month = ?,
            casual_apply_before_leaves = ?,
            leave_approval_by = ?
        WHERE id = 1
        "#,
    )
    .bind(payload.casual_leaves_per_month)
    .bind(payload.casual_apply_before_leaves)
    .bind(payload.leave_approval_by)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to update company schedule");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // Next validation must see the fresh settings.
    schedule_cache::invalidate().await;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Schedule updated"
    })))
}
