use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

/// All leave classifications the company recognizes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    sqlx::Type,
    Display,
    EnumString,
    EnumIter,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LeaveType {
    HalfDay,
    WorkFromHome,
    CasualLeave,
    SickLeave,
    UnpaidLeave,
    EmergencyLeave,
    PersonalLeave,
    ShortLeave,
    DirectContact,
}

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
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LeaveStatus::Approved | LeaveStatus::Rejected)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Shift {
    Morning,
    Evening,
}

/// A leave classification together with its type-specific payload.
///
/// Only three types carry extra data: half-day leaves need a shift,
/// short leaves need a time window, direct-contact leaves need the
/// senior employee they escalate to. Everything else is a plain tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "leave_type", rename_all = "snake_case")]
pub enum LeaveKind {
    HalfDay {
        shift: Shift,
    },
    WorkFromHome,
    CasualLeave,
    SickLeave,
    UnpaidLeave,
    EmergencyLeave,
    PersonalLeave,
    ShortLeave {
        #[schema(example = "09:00:00")]
        start_time: NaiveTime,
        #[schema(example = "12:00:00")]
        end_time: NaiveTime,
    },
    DirectContact {
        #[schema(example = 17)]
        senior_id: u64,
    },
}

impl LeaveKind {
    pub fn leave_type(&self) -> LeaveType {
        match self {
            LeaveKind::HalfDay { .. } => LeaveType::HalfDay,
            LeaveKind::WorkFromHome => LeaveType::WorkFromHome,
            LeaveKind::CasualLeave => LeaveType::CasualLeave,
            LeaveKind::SickLeave => LeaveType::SickLeave,
            LeaveKind::UnpaidLeave => LeaveType::UnpaidLeave,
            LeaveKind::EmergencyLeave => LeaveType::EmergencyLeave,
            LeaveKind::PersonalLeave => LeaveType::PersonalLeave,
            LeaveKind::ShortLeave { .. } => LeaveType::ShortLeave,
            LeaveKind::DirectContact { .. } => LeaveType::DirectContact,
        }
    }

    /// Senior reference, present only for direct-contact leaves.
    pub fn senior_id(&self) -> Option<u64> {
        match self {
            LeaveKind::DirectContact { senior_id } => Some(*senior_id),
            _ => None,
        }
    }
}

/// A persisted leave request. The database row is the source of record;
/// clients re-fetch it after every mutation.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct LeaveRow {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1000)]
    pub employee_id: u64,
    pub leave_type: LeaveType,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-07", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub reason: String,
    pub attachment: Option<String>,
    pub senior_id: Option<u64>,
    pub status: LeaveStatus,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Display, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ApprovalAction {
    Approve,
    Reject,
}

/// One approver action on a leave. Append-only: rows are never updated
/// or removed, and the approved/rejected views are partitions of this log.
/// Name and picture are captured at action time.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct ApprovalRecord {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1)]
    pub leave_id: u64,
    #[schema(example = 7)]
    pub approver_id: u64,
    #[schema(example = "Jane Smith")]
    pub approver_name: String,
    pub profile_picture: Option<String>,
    pub action: ApprovalAction,
    #[schema(example = "Approved per policy")]
    pub reason: String,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leave_kind_round_trips_with_tag() {
        let kind = LeaveKind::HalfDay { shift: Shift::Morning };
        let json = serde_json::to_string(&kind).unwrap();
        assert!(json.contains("\"leave_type\":\"half_day\""));
        assert!(json.contains("\"shift\":\"morning\""));

        let back: LeaveKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, kind);
    }

    #[test]
    fn leave_kind_rejects_missing_conditional_fields() {
        // A half-day request without a shift must not deserialize.
        let err = serde_json::from_str::<LeaveKind>(r#"{"leave_type":"half_day"}"#);
        assert!(err.is_err());

        let err = serde_json::from_str::<LeaveKind>(
            r#"{"leave_type":"short_leave","start_time":"09:00:00"}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn plain_kinds_deserialize_from_tag_alone() {
        let kind: LeaveKind = serde_json::from_str(r#"{"leave_type":"sick_leave"}"#).unwrap();
        assert_eq!(kind, LeaveKind::SickLeave);
        assert_eq!(kind.leave_type(), LeaveType::SickLeave);
        assert_eq!(kind.senior_id(), None);
    }

    #[test]
    fn leave_type_string_forms_are_stable() {
        assert_eq!(LeaveType::CasualLeave.to_string(), "casual_leave");
        assert_eq!(
            "direct_contact".parse::<LeaveType>().unwrap(),
            LeaveType::DirectContact
        );
    }
}
