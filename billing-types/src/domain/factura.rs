//! Factura (invoice) domain model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::servicio::Servicio;
use crate::error::DomainError;

/// Unique identifier for a Factura. Always generated server-side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct FacturaId(String);

impl FacturaId {
    /// Creates a new random FacturaId.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for FacturaId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FacturaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for FacturaId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for FacturaId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An invoice aggregating one or more services.
///
/// `total` is derived from `servicios` and can only change through
/// [`Factura::set_servicios`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Factura {
    /// Unique identifier
    pub id: FacturaId,
    servicios: Vec<Servicio>,
    total: Decimal,
    /// Whether the invoice has been paid
    pub pagada: bool,
}

impl Factura {
    /// Creates a new unpaid invoice with a fresh id.
    ///
    /// # Validation
    /// - At least one service is required
    pub fn new(servicios: Vec<Servicio>) -> Result<Self, DomainError> {
        if servicios.is_empty() {
            return Err(DomainError::NoServicios);
        }

        let total = sum_costs(&servicios)?;
        Ok(Self {
            id: FacturaId::new(),
            servicios,
            total,
            pagada: false,
        })
    }

    /// Reconstructs an invoice from storage. The total is recomputed.
    pub fn from_parts(
        id: FacturaId,
        servicios: Vec<Servicio>,
        pagada: bool,
    ) -> Result<Self, DomainError> {
        let total = sum_costs(&servicios)?;
        Ok(Self {
            id,
            servicios,
            total,
            pagada,
        })
    }

    pub fn servicios(&self) -> &[Servicio] {
        &self.servicios
    }

    /// Sum of the costs of all services on the invoice.
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Replaces the service list and recomputes the total.
    ///
    /// The invoice is left untouched when the new total does not fit.
    pub fn set_servicios(&mut self, servicios: Vec<Servicio>) -> Result<(), DomainError> {
        self.total = sum_costs(&servicios)?;
        self.servicios = servicios;
        Ok(())
    }

    /// Marks the invoice as paid. Paying twice is rejected.
    pub fn pay(&mut self) -> Result<(), DomainError> {
        if self.pagada {
            return Err(DomainError::AlreadyPaid(self.id.clone()));
        }
        self.pagada = true;
        Ok(())
    }
}

fn sum_costs(servicios: &[Servicio]) -> Result<Decimal, DomainError> {
    servicios
        .iter()
        .try_fold(Decimal::ZERO, |acc, s| acc.checked_add(s.costo))
        .ok_or(DomainError::TotalOverflow)
}
