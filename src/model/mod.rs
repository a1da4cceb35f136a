pub mod company_schedule;
pub mod employee;
pub mod leave_request;
pub mod role;
