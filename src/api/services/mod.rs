//! Services module - contains the business logic of the forms core.

pub mod audit_service;
pub mod error;
pub mod export_service;
pub mod form_service;
pub mod jwt_service;
pub mod role_service;
pub mod schema_service;
pub mod submission_service;

// Re-export for convenience
pub use audit_service::AuditRecorder;
pub use error::CoreError;
pub use export_service::{ExportService, SubmissionTable, TableColumn};
pub use form_service::{
    FormService, FormSummary, FormWithRoles, PermissionGrant, PermissionPolicy,
    PermissionRemoval,
};
pub use jwt_service::{Claims, JwtService};
pub use role_service::{GrantOutcome, RoleService};
pub use schema_service::SchemaService;
pub use submission_service::SubmissionService;
