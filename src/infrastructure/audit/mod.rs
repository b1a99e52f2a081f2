pub mod sqlx_audit_log;
pub mod traits;
