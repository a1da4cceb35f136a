use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// Who is allowed to act on pending leaves for this company.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    sqlx::Type,
    Display,
    EnumString,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LeaveApprovalBy {
    Admin,
    TeamLeader,
    Both,
}

/// Company-level leave policy settings. Single row, admin-edited,
/// read on every leave submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct CompanySchedule {
    /// Monthly casual-leave quota per employee.
    #[schema(example = 4)]
    pub casual_leaves_per_month: u32,
    /// Minimum days of advance notice for casual leave.
    #[schema(example = 3)]
    pub casual_apply_before_leaves: u32,
    pub leave_approval_by: LeaveApprovalBy,
}

impl Default for CompanySchedule {
    fn default() -> Self {
        Self {
            casual_leaves_per_month: 4,
            casual_apply_before_leaves: 3,
            leave_approval_by: LeaveApprovalBy::Both,
        }
    }
}
