//! Error types for the billing service.

use rust_decimal::Decimal;

use crate::domain::{FacturaId, ServicioId};

/// Domain-level errors (business logic violations).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Service cost must be greater than zero, got {0}")]
    InvalidCost(Decimal),

    #[error("Service name cannot be empty")]
    EmptyName,

    #[error("An invoice must include at least one service")]
    NoServicios,

    #[error("Invoice total exceeds the supported amount range")]
    TotalOverflow,

    #[error("No service exists with id: {0}")]
    ServicioNotFound(ServicioId),

    #[error("No invoice exists with id: {0}")]
    FacturaNotFound(FacturaId),

    #[error("Invoice {0} has already been paid")]
    AlreadyPaid(FacturaId),
}

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::ServicioNotFound(_) | DomainError::FacturaNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            DomainError::AlreadyPaid(_) => AppError::Conflict(err.to_string()),
            DomainError::InvalidCost(_)
            | DomainError::EmptyName
            | DomainError::NoServicios
            | DomainError::TotalOverflow => AppError::BadRequest(err.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Domain(e) => e.into(),
            RepoError::NotFound => AppError::NotFound("Resource not found".into()),
            RepoError::Conflict(e) => AppError::Conflict(e),
            RepoError::Database(e) => AppError::Internal(e),
            RepoError::Transaction(e) => AppError::Internal(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_app_errors() {
        let not_found: AppError = DomainError::FacturaNotFound(FacturaId::from("F1")).into();
        assert!(matches!(not_found, AppError::NotFound(msg) if msg.contains("F1")));

        let paid: AppError = DomainError::AlreadyPaid(FacturaId::from("F1")).into();
        assert!(matches!(paid, AppError::Conflict(_)));

        let invalid: AppError = DomainError::EmptyName.into();
        assert!(matches!(invalid, AppError::BadRequest(_)));
    }

    #[test]
    fn test_repo_errors_map_to_app_errors() {
        let db: AppError = RepoError::Database("disk full".into()).into();
        assert!(matches!(db, AppError::Internal(msg) if msg == "disk full"));

        let conflict: AppError = RepoError::Conflict("already paid".into()).into();
        assert!(matches!(conflict, AppError::Conflict(_)));

        let wrapped: AppError = RepoError::Domain(DomainError::NoServicios).into();
        assert!(matches!(wrapped, AppError::BadRequest(_)));
    }
}
