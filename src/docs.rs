use crate::api::employee::{CreateEmployee, EmployeeListResponse};
use crate::api::leave_request::{
    CreateLeave, EligibilityQuery, EligibilityResponse, LeaveDetailResponse, LeaveFilter,
    LeaveListResponse, ReportQuery, ReviewPayload,
};
use crate::leave::report::LeaveReport;
use crate::model::company_schedule::{CompanySchedule, LeaveApprovalBy};
use crate::model::employee::Employee;
use crate::model::leave_request::{
    ApprovalAction, ApprovalRecord, LeaveKind, LeaveRow, LeaveStatus, LeaveType, Shift,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Dyzo Leave Service API",
        version = "1.0.0",
        description = r#"
## Dyzo — Leave Management Service

This API powers the leave lifecycle of the **Dyzo** HR platform.

### 🔹 Key Features
- **Leave Requests**
  - Apply for leave (with type-specific fields), edit and delete pending requests
- **Approvals**
  - Two-approval workflow with single-reject veto and a full approval history
- **Reports**
  - Per-employee monthly counts by leave type and status
- **Company Schedule**
  - Casual leave quota, advance-notice window and approver configuration
- **Employee Management**
  - Create, update, list, and view employee profiles

### 🔐 Security
Most endpoints are protected using **JWT Bearer authentication**.
Approvals are restricted to **Admin** and/or **Team Leader** roles per
company configuration.

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::update_leave,
        crate::api::leave_request::delete_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,
        crate::api::leave_request::leave_report,
        crate::api::leave_request::casual_eligibility,

        crate::api::schedule::get_schedule,
        crate::api::schedule::update_schedule,

        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::list_employees,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee
    ),
    components(
        schemas(
            LeaveType,
            LeaveStatus,
            LeaveKind,
            Shift,
            LeaveRow,
            ApprovalAction,
            ApprovalRecord,
            CreateLeave,
            ReviewPayload,
            LeaveFilter,
            LeaveListResponse,
            LeaveDetailResponse,
            LeaveReport,
            ReportQuery,
            EligibilityQuery,
            EligibilityResponse,
            CompanySchedule,
            LeaveApprovalBy,
            CreateEmployee,
            Employee,
            EmployeeListResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Leave", description = "Leave request and approval APIs"),
        (name = "Schedule", description = "Company schedule settings APIs"),
        (name = "Employee", description = "Employee management APIs"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
