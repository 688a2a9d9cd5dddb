//! Servicio (billable service offering) domain model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::DomainError;

/// Unique identifier for a Servicio.
///
/// Opaque string: callers may choose their own, otherwise a v4 UUID is used.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ServicioId(String);

impl ServicioId {
    /// Creates a new random ServicioId.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for ServicioId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ServicioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ServicioId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ServicioId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A billable veterinary service (consultation, vaccination, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Servicio {
    /// Unique identifier
    pub id: ServicioId,
    /// Descriptive name
    pub nombre: String,
    /// Price of the service, always positive
    pub costo: Decimal,
}

impl Servicio {
    /// Creates a validated service.
    ///
    /// A missing or blank id is replaced by a fresh one.
    ///
    /// # Validation
    /// - Cost must be greater than zero
    /// - Name cannot be empty
    pub fn new(
        id: Option<ServicioId>,
        nombre: String,
        costo: Decimal,
    ) -> Result<Self, DomainError> {
        let id = id
            .filter(|id| !id.as_str().trim().is_empty())
            .unwrap_or_default();

        if costo <= Decimal::ZERO {
            return Err(DomainError::InvalidCost(costo));
        }

        if nombre.trim().is_empty() {
            return Err(DomainError::EmptyName);
        }

        Ok(Self { id, nombre, costo })
    }

    /// Creates a service with all fields specified (for database reconstruction).
    pub fn from_parts(id: ServicioId, nombre: String, costo: Decimal) -> Self {
        Self { id, nombre, costo }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_servicio_creation_generates_id() {
        let servicio = Servicio::new(None, "Consulta".to_string(), dec!(50000)).unwrap();
        assert!(!servicio.id.as_str().is_empty());
        assert_eq!(servicio.nombre, "Consulta");
        assert_eq!(servicio.costo, dec!(50000));
    }

    #[test]
    fn test_blank_id_is_replaced() {
        let servicio =
            Servicio::new(Some(ServicioId::from("  ")), "Vacuna".into(), dec!(10)).unwrap();
        assert_ne!(servicio.id.as_str().trim(), "");
    }

    #[test]
    fn test_given_id_is_kept() {
        let servicio =
            Servicio::new(Some(ServicioId::from("S1")), "Vacuna".into(), dec!(10)).unwrap();
        assert_eq!(servicio.id.as_str(), "S1");
    }

    #[test]
    fn test_non_positive_cost_fails() {
        let zero = Servicio::new(None, "Consulta".into(), Decimal::ZERO);
        assert!(matches!(zero, Err(DomainError::InvalidCost(_))));

        let negative = Servicio::new(None, "Consulta".into(), dec!(-1.5));
        assert!(matches!(negative, Err(DomainError::InvalidCost(_))));
    }

    #[test]
    fn test_empty_name_fails() {
        let result = Servicio::new(None, "".into(), dec!(100));
        assert!(matches!(result, Err(DomainError::EmptyName)));

        let blank = Servicio::new(None, "   ".into(), dec!(100));
        assert!(matches!(blank, Err(DomainError::EmptyName)));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(ServicioId::new(), ServicioId::new());
    }
}
