//! Repository port trait.
//!
//! This is the primary port in our hexagonal architecture.
//! Adapters (Postgres, SQLite) implement this trait.

use crate::domain::{Factura, FacturaId, Servicio, ServicioId};
use crate::error::RepoError;

/// The repository port for services and invoices.
///
/// Writes spanning more than one row MUST be atomic.
#[async_trait::async_trait]
pub trait BillingRepository: Send + Sync + 'static {
    // ─────────────────────────────────────────────────────────────────────────────
    // Servicio Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Inserts a service, overwriting any existing service with the same id.
    async fn save_servicio(&self, servicio: Servicio) -> Result<Servicio, RepoError>;

    /// Gets a service by ID.
    async fn find_servicio(&self, id: &ServicioId) -> Result<Option<Servicio>, RepoError>;

    /// Lists all services in insertion order.
    async fn list_servicios(&self) -> Result<Vec<Servicio>, RepoError>;

    // ─────────────────────────────────────────────────────────────────────────────
    // Factura Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Stores a new invoice together with its service lines.
    async fn insert_factura(&self, factura: Factura) -> Result<Factura, RepoError>;

    /// Gets an invoice by ID, services included.
    async fn find_factura(&self, id: &FacturaId) -> Result<Option<Factura>, RepoError>;

    /// Lists all invoices in insertion order.
    async fn list_facturas(&self) -> Result<Vec<Factura>, RepoError>;

    /// Flips an unpaid invoice to paid.
    ///
    /// Returns `RepoError::NotFound` if the invoice does not exist and
    /// `RepoError::Conflict` if it was already paid.
    async fn mark_factura_paid(&self, id: &FacturaId) -> Result<Factura, RepoError>;

    /// Deletes an invoice and its service lines. Returns `false` if absent.
    async fn delete_factura(&self, id: &FacturaId) -> Result<bool, RepoError>;
}
