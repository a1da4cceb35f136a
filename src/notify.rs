//! Notification fan-out. This module decides *who* gets told about a
//! leave event and records the message; delivery transports (push,
//! websocket, email) live outside this service.

use serde_json::Value;
use sqlx::MySqlPool;

use crate::model::company_schedule::LeaveApprovalBy;

#[derive(Debug, Clone)]
pub struct Notification {
    pub target_user_id: u64,
    pub title: String,
    pub message: String,
    pub key: String,
    pub metadata: Value,
    pub redirect_url: Option<String>,
}

/// Users to tell about a freshly submitted leave: admins and/or the
/// employee's team leader, depending on who approves for this company.
/// The submitting user never notifies themselves.
pub fn approver_recipients(
    by: LeaveApprovalBy,
    admins: &[u64],
    team_leader: Option<u64>,
    exclude: u64,
) -> Vec<u64> {
    let mut recipients: Vec<u64> = Vec::new();

    if matches!(by, LeaveApprovalBy::Admin | LeaveApprovalBy::Both) {
        recipients.extend_from_slice(admins);
    }
    if matches!(by, LeaveApprovalBy::TeamLeader | LeaveApprovalBy::Both) {
        if let Some(leader) = team_leader {
            recipients.push(leader);
        }
    }

    recipients.retain(|id| *id != exclude);
    recipients.sort_unstable();
    recipients.dedup();
    recipients
}

/// User ids of all admins.
pub async fn admin_user_ids(pool: &MySqlPool) -> Result<Vec<u64>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (u64,)>("SELECT id FROM users WHERE role_id = 1")
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// User id linked to the given employee, if that employee has a login.
pub async fn user_id_for_employee(
    pool: &MySqlPool,
    employee_id: u64,
) -> Result<Option<u64>, sqlx::Error> {
    let row = sqlx::query_as::<_, (u64,)>("SELECT id FROM users WHERE employee_id = ?")
        .bind(employee_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(id,)| id))
}

/// User id of the team leader assigned to the given employee.
pub async fn team_leader_user_id(
    pool: &MySqlPool,
    employee_id: u64,
) -> Result<Option<u64>, sqlx::Error> {
    let row = sqlx::query_as::<_, (u64,)>(
        r#"
        SELECT u.id
        FROM users u
        JOIN employees e ON u.employee_id = e.team_leader_id
        WHERE e.id = ?
        "#,
    )
    .bind(employee_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|(id,)| id))
}

/// Record one notification. Best-effort: a failed insert is logged and
/// swallowed so the triggering request still succeeds.
pub async fn dispatch(pool: &MySqlPool, notification: &Notification) {
    let result = sqlx::query(
        r#"
        INSERT INTO notifications
            (target_user_id, title, message, notice_key, metadata, redirect_url)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(notification.target_user_id)
    .bind(&notification.title)
    .bind(&notification.message)
    .bind(&notification.key)
    .bind(&notification.metadata)
    .bind(&notification.redirect_url)
    .execute(pool)
    .await;

    if let Err(e) = result {
        tracing::warn!(
            error = %e,
            target_user_id = notification.target_user_id,
            key = %notification.key,
            "Failed to record notification"
        );
        // intentionally not failing the caller
    }
}

/// Fan a message out to a recipient list, all inserts in flight at once.
pub async fn dispatch_all(
    pool: &MySqlPool,
    recipients: &[u64],
    title: &str,
    message: &str,
    key: &str,
    metadata: Value,
    redirect_url: Option<String>,
) {
    let futures: Vec<_> = recipients
        .iter()
        .map(|target| {
            let notification = Notification {
                target_user_id: *target,
                title: title.to_string(),
                message: message.to_string(),
                key: key.to_string(),
                metadata: metadata.clone(),
                redirect_url: redirect_url.clone(),
            };
            async move { dispatch(pool, &notification).await }
        })
        .collect();

    futures::future::join_all(futures).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_mode_targets_admins_only() {
        let recipients = approver_recipients(LeaveApprovalBy::Admin, &[1, 2], Some(7), 99);
        assert_eq!(recipients, vec![1, 2]);
    }

    #[test]
    fn team_leader_mode_targets_the_leader_only() {
        let recipients = approver_recipients(LeaveApprovalBy::TeamLeader, &[1, 2], Some(7), 99);
        assert_eq!(recipients, vec![7]);
    }

    #[test]
    fn both_mode_merges_and_dedups() {
        // Team leader 2 is also an admin; they get one notification.
        let recipients = approver_recipients(LeaveApprovalBy::Both, &[1, 2], Some(2), 99);
        assert_eq!(recipients, vec![1, 2]);
    }

    #[test]
    fn submitter_is_never_notified() {
        let recipients = approver_recipients(LeaveApprovalBy::Both, &[1, 2], Some(7), 2);
        assert_eq!(recipients, vec![1, 7]);
    }

    #[test]
    fn missing_team_leader_yields_admins_or_nobody() {
        let recipients = approver_recipients(LeaveApprovalBy::TeamLeader, &[1], None, 99);
        assert!(recipients.is_empty());
    }
}
