//! Leave lifecycle core: request validation, report aggregation and the
//! approval state machine. Everything here is pure and synchronous —
//! handlers pass in today's date, the company schedule and the acting
//! user explicitly, so the rules are testable without a database.

pub mod approval;
pub mod report;
pub mod validate;
