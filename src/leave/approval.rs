use thiserror::Error;

use crate::model::company_schedule::LeaveApprovalBy;
use crate::model::leave_request::{ApprovalAction, LeaveStatus};
use crate::model::role::Role;

/// Distinct approvals needed to move a pending leave to approved.
/// Company-wide constant, independent of schedule configuration.
pub const REQUIRED_APPROVALS: usize = 2;

/// The user attempting an approve/reject, with their employee linkage.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: u64,
    pub employee_id: Option<u64>,
    pub role: Role,
}

#[derive(Debug, Error, PartialEq)]
pub enum ApprovalError {
    #[error("leave request is already {0}")]
    AlreadyFinal(LeaveStatus),

    #[error("you cannot act on your own leave request")]
    SelfApproval,

    #[error("you have already acted on this leave request")]
    AlreadyActed,

    #[error("you are not authorized to approve or reject leaves")]
    NotAuthorized,

    #[error("a reason is required to approve or reject")]
    EmptyReason,
}

/// What the review decided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReviewOutcome {
    /// Action accepted; the leave stays pending with `approvals` of
    /// [`REQUIRED_APPROVALS`] collected so far.
    Recorded { approvals: usize },
    /// Action accepted and the leave reaches a terminal status.
    Finalized(LeaveStatus),
}

/// The slice of a leave the state machine needs.
#[derive(Debug, Clone)]
pub struct ReviewSubject<'a> {
    pub status: LeaveStatus,
    pub owner_employee_id: u64,
    /// Prior actions on this leave: (approver user id, action).
    pub prior: &'a [(u64, ApprovalAction)],
}

/// Whether `role` may act on leaves under the given company setting.
pub fn eligible(role: Role, by: LeaveApprovalBy) -> bool {
    match by {
        LeaveApprovalBy::Admin => role == Role::Admin,
        LeaveApprovalBy::TeamLeader => role == Role::TeamLeader,
        LeaveApprovalBy::Both => matches!(role, Role::Admin | Role::TeamLeader),
    }
}

/// Decide one approver action against a leave.
///
/// Pending → Approved once the second distinct approval lands;
/// Pending → Rejected on any single rejection; terminal states are
/// immutable. Each approver gets exactly one action, never on their
/// own leave, and always with a reason.
pub fn review(
    subject: &ReviewSubject<'_>,
    actor: &Actor,
    action: ApprovalAction,
    reason: &str,
    by: LeaveApprovalBy,
) -> Result<ReviewOutcome, ApprovalError> {
    if subject.status.is_terminal() {
        return Err(ApprovalError::AlreadyFinal(subject.status));
    }
    if actor.employee_id == Some(subject.owner_employee_id) {
        return Err(ApprovalError::SelfApproval);
    }
    if subject.prior.iter().any(|(id, _)| *id == actor.user_id) {
        return Err(ApprovalError::AlreadyActed);
    }
    if !eligible(actor.role, by) {
        return Err(ApprovalError::NotAuthorized);
    }
    if reason.trim().is_empty() {
        return Err(ApprovalError::EmptyReason);
    }

    match action {
        ApprovalAction::Reject => Ok(ReviewOutcome::Finalized(LeaveStatus::Rejected)),
        ApprovalAction::Approve => {
            let approvals = subject
                .prior
                .iter()
                .filter(|(_, a)| *a == ApprovalAction::Approve)
                .count()
                + 1;

            if approvals >= REQUIRED_APPROVALS {
                Ok(ReviewOutcome::Finalized(LeaveStatus::Approved))
            } else {
                Ok(ReviewOutcome::Recorded { approvals })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin(user_id: u64) -> Actor {
        Actor { user_id, employee_id: None, role: Role::Admin }
    }

    fn team_leader(user_id: u64, employee_id: u64) -> Actor {
        Actor { user_id, employee_id: Some(employee_id), role: Role::TeamLeader }
    }

    fn pending<'a>(prior: &'a [(u64, ApprovalAction)]) -> ReviewSubject<'a> {
        ReviewSubject { status: LeaveStatus::Pending, owner_employee_id: 1000, prior }
    }

    const REASON: &str = "Approved per policy";

    #[test]
    fn first_approval_keeps_the_leave_pending() {
        let subject = pending(&[]);
        let outcome = review(
            &subject,
            &admin(1),
            ApprovalAction::Approve,
            REASON,
            LeaveApprovalBy::Both,
        )
        .unwrap();
        assert_eq!(outcome, ReviewOutcome::Recorded { approvals: 1 });
    }

    #[test]
    fn second_distinct_approval_finalizes() {
        let prior = [(1u64, ApprovalAction::Approve)];
        let subject = pending(&prior);
        let outcome = review(
            &subject,
            &team_leader(2, 500),
            ApprovalAction::Approve,
            REASON,
            LeaveApprovalBy::Both,
        )
        .unwrap();
        assert_eq!(outcome, ReviewOutcome::Finalized(LeaveStatus::Approved));
    }

    #[test]
    fn single_reject_finalizes_even_after_an_approval() {
        let prior = [(1u64, ApprovalAction::Approve)];
        let subject = pending(&prior);
        let outcome = review(
            &subject,
            &admin(3),
            ApprovalAction::Reject,
            "Coverage gap that week",
            LeaveApprovalBy::Both,
        )
        .unwrap();
        assert_eq!(outcome, ReviewOutcome::Finalized(LeaveStatus::Rejected));
    }

    #[test]
    fn terminal_states_accept_no_further_actions() {
        for status in [LeaveStatus::Approved, LeaveStatus::Rejected] {
            let subject = ReviewSubject { status, owner_employee_id: 1000, prior: &[] };
            let err = review(
                &subject,
                &admin(1),
                ApprovalAction::Approve,
                REASON,
                LeaveApprovalBy::Both,
            )
            .unwrap_err();
            assert_eq!(err, ApprovalError::AlreadyFinal(status));
        }
    }

    #[test]
    fn owners_cannot_act_on_their_own_leave() {
        let subject = pending(&[]);
        let owner = team_leader(9, 1000);
        let err = review(
            &subject,
            &owner,
            ApprovalAction::Approve,
            REASON,
            LeaveApprovalBy::Both,
        )
        .unwrap_err();
        assert_eq!(err, ApprovalError::SelfApproval);
    }

    #[test]
    fn one_action_per_approver() {
        let prior = [(1u64, ApprovalAction::Approve)];
        let subject = pending(&prior);
        for action in [ApprovalAction::Approve, ApprovalAction::Reject] {
            let err = review(&subject, &admin(1), action, REASON, LeaveApprovalBy::Both)
                .unwrap_err();
            assert_eq!(err, ApprovalError::AlreadyActed);
        }
    }

    #[test]
    fn authorization_follows_company_setting() {
        let subject = pending(&[]);
        let tl = team_leader(2, 500);

        // Admin-only mode shuts out team leaders.
        let err = review(
            &subject,
            &tl,
            ApprovalAction::Approve,
            REASON,
            LeaveApprovalBy::Admin,
        )
        .unwrap_err();
        assert_eq!(err, ApprovalError::NotAuthorized);

        // Team-leader-only mode shuts out admins.
        let err = review(
            &subject,
            &admin(1),
            ApprovalAction::Approve,
            REASON,
            LeaveApprovalBy::TeamLeader,
        )
        .unwrap_err();
        assert_eq!(err, ApprovalError::NotAuthorized);

        // Plain employees never qualify.
        let employee = Actor { user_id: 4, employee_id: Some(600), role: Role::Employee };
        let err = review(
            &subject,
            &employee,
            ApprovalAction::Approve,
            REASON,
            LeaveApprovalBy::Both,
        )
        .unwrap_err();
        assert_eq!(err, ApprovalError::NotAuthorized);
    }

    #[test]
    fn a_reason_is_mandatory() {
        let subject = pending(&[]);
        let err = review(
            &subject,
            &admin(1),
            ApprovalAction::Reject,
            "   ",
            LeaveApprovalBy::Both,
        )
        .unwrap_err();
        assert_eq!(err, ApprovalError::EmptyReason);
    }
}
