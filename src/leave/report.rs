use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use strum::IntoEnumIterator;
use utoipa::ToSchema;

use crate::model::leave_request::{LeaveRow, LeaveStatus, LeaveType};

/// Inclusive date range a report is scoped to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// The whole calendar month containing nothing but `year`/`month`.
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let from = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        Some(Self { from, to: next.pred_opt()? })
    }

    pub fn contains_any_of(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.to && end >= self.from
    }
}

/// Per-employee leave tallies for a date range.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LeaveReport {
    #[schema(example = 5)]
    pub total_count: u32,
    #[schema(example = 2)]
    pub approved_count: u32,
    #[schema(example = 1)]
    pub rejected_count: u32,
    #[schema(example = 2)]
    pub pending_count: u32,
    /// Count per leave type; every type is present, zero included.
    #[schema(value_type = Object, example = json!({"casual_leave": 2, "sick_leave": 1}))]
    pub individual_leave_counts: BTreeMap<LeaveType, u32>,
}

impl LeaveReport {
    pub fn count_for(&self, leave_type: LeaveType) -> u32 {
        self.individual_leave_counts
            .get(&leave_type)
            .copied()
            .unwrap_or(0)
    }
}

impl Default for LeaveReport {
    fn default() -> Self {
        Self {
            total_count: 0,
            approved_count: 0,
            rejected_count: 0,
            pending_count: 0,
            individual_leave_counts: LeaveType::iter().map(|t| (t, 0)).collect(),
        }
    }
}

/// Fold a set of leave rows into per-status and per-type counts.
/// Deterministic and side-effect free; empty input yields all zeros.
pub fn aggregate<'a, I>(leaves: I) -> LeaveReport
where
    I: IntoIterator<Item = &'a LeaveRow>,
{
    let mut report = LeaveReport::default();

    for leave in leaves {
        report.total_count += 1;
        match leave.status {
            LeaveStatus::Approved => report.approved_count += 1,
            LeaveStatus::Rejected => report.rejected_count += 1,
            LeaveStatus::Pending => report.pending_count += 1,
        }
        *report
            .individual_leave_counts
            .entry(leave.leave_type)
            .or_insert(0) += 1;
    }

    report
}

/// Same fold, restricted to leaves whose dates intersect `range`.
pub fn aggregate_in_range<'a, I>(leaves: I, range: &DateRange) -> LeaveReport
where
    I: IntoIterator<Item = &'a LeaveRow>,
{
    aggregate(
        leaves
            .into_iter()
            .filter(|l| range.contains_any_of(l.start_date, l.end_date)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: u64, leave_type: LeaveType, status: LeaveStatus, start: &str, end: &str) -> LeaveRow {
        LeaveRow {
            id,
            employee_id: 1000,
            leave_type,
            start_date: start.parse().unwrap(),
            end_date: end.parse().unwrap(),
            reason: String::new(),
            attachment: None,
            senior_id: None,
            status,
            created_at: None,
        }
    }

    #[test]
    fn empty_input_yields_all_zero_counts() {
        let report = aggregate([]);
        assert_eq!(report.total_count, 0);
        assert_eq!(report.approved_count, 0);
        assert_eq!(report.rejected_count, 0);
        assert_eq!(report.pending_count, 0);
        // Every type is present with a zero count.
        for (_, count) in &report.individual_leave_counts {
            assert_eq!(*count, 0);
        }
        assert_eq!(report.individual_leave_counts.len(), 9);
    }

    #[test]
    fn partitions_by_status_and_type() {
        let rows = vec![
            row(1, LeaveType::CasualLeave, LeaveStatus::Approved, "2026-03-02", "2026-03-03"),
            row(2, LeaveType::CasualLeave, LeaveStatus::Pending, "2026-03-10", "2026-03-10"),
            row(3, LeaveType::SickLeave, LeaveStatus::Rejected, "2026-03-12", "2026-03-14"),
            row(4, LeaveType::HalfDay, LeaveStatus::Pending, "2026-03-20", "2026-03-20"),
        ];

        let report = aggregate(&rows);
        assert_eq!(report.total_count, 4);
        assert_eq!(report.approved_count, 1);
        assert_eq!(report.rejected_count, 1);
        assert_eq!(report.pending_count, 2);
        assert_eq!(report.count_for(LeaveType::CasualLeave), 2);
        assert_eq!(report.count_for(LeaveType::SickLeave), 1);
        assert_eq!(report.count_for(LeaveType::HalfDay), 1);
        assert_eq!(report.count_for(LeaveType::UnpaidLeave), 0);
    }

    #[test]
    fn range_counts_leaves_that_intersect_the_month() {
        let rows = vec![
            // Fully inside March.
            row(1, LeaveType::CasualLeave, LeaveStatus::Pending, "2026-03-05", "2026-03-06"),
            // Straddles the February/March boundary: counts.
            row(2, LeaveType::CasualLeave, LeaveStatus::Pending, "2026-02-27", "2026-03-01"),
            // Entirely in February: does not count.
            row(3, LeaveType::CasualLeave, LeaveStatus::Pending, "2026-02-10", "2026-02-11"),
        ];

        let march = DateRange::month(2026, 3).unwrap();
        let report = aggregate_in_range(&rows, &march);
        assert_eq!(report.count_for(LeaveType::CasualLeave), 2);
        assert_eq!(report.total_count, 2);
    }

    #[test]
    fn month_range_covers_first_to_last_day() {
        let feb = DateRange::month(2026, 2).unwrap();
        assert_eq!(feb.from, "2026-02-01".parse().unwrap());
        assert_eq!(feb.to, "2026-02-28".parse().unwrap());

        let dec = DateRange::month(2025, 12).unwrap();
        assert_eq!(dec.to, "2025-12-31".parse().unwrap());
    }
}
