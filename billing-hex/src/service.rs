//! Billing Application Service
//!
//! Orchestrates domain operations through the repository port.
//! Contains NO infrastructure logic - pure business orchestration.

use billing_types::{
    AppError, BillingRepository, CreateFacturaRequest, DomainError, Factura, FacturaId,
    RegisterServicioRequest, RepoError, Servicio, ServicioId,
};

/// Application service for service registration and invoicing.
///
/// Generic over `R: BillingRepository` - the adapter is injected at compile time.
/// This enables:
/// - Swapping repositories without code changes
/// - Testing with in-memory repo
/// - Compile-time checks for port implementation
pub struct BillingService<R: BillingRepository> {
    repo: R,
}

impl<R: BillingRepository> BillingService<R> {
    /// Creates a new billing service with the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Servicio Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Registers a service, generating an id when none is given.
    ///
    /// An existing service with the same id is overwritten.
    pub async fn register_servicio(
        &self,
        req: RegisterServicioRequest,
    ) -> Result<Servicio, AppError> {
        let servicio = Servicio::new(req.id.map(ServicioId::from), req.nombre, req.costo)
            .inspect_err(|e| tracing::warn!(error = %e, "Rejected service registration"))?;

        let saved = self.repo.save_servicio(servicio).await?;
        tracing::info!(servicio_id = %saved.id, costo = %saved.costo, "Service registered");
        Ok(saved)
    }

    /// Gets a service by ID.
    pub async fn get_servicio(&self, id: &ServicioId) -> Result<Servicio, AppError> {
        self.repo
            .find_servicio(id)
            .await?
            .ok_or_else(|| DomainError::ServicioNotFound(id.clone()).into())
    }

    /// Lists all services.
    pub async fn list_servicios(&self) -> Result<Vec<Servicio>, AppError> {
        self.repo.list_servicios().await.map_err(Into::into)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Factura Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Creates an unpaid invoice from existing service ids.
    ///
    /// Every id must resolve; an unknown id is reported as a bad request and
    /// nothing is stored.
    pub async fn create_factura(&self, req: CreateFacturaRequest) -> Result<Factura, AppError> {
        let ids = req.servicios_ids.unwrap_or_default();
        if ids.is_empty() {
            return Err(DomainError::NoServicios.into());
        }

        let mut servicios = Vec::with_capacity(ids.len());
        for id in ids {
            let id = ServicioId::from(id);
            match self.repo.find_servicio(&id).await? {
                Some(servicio) => servicios.push(servicio),
                None => {
                    tracing::warn!(servicio_id = %id, "Invoice references unknown service");
                    return Err(AppError::BadRequest(
                        DomainError::ServicioNotFound(id).to_string(),
                    ));
                }
            }
        }

        let factura = Factura::new(servicios)
            .inspect_err(|e| tracing::warn!(error = %e, "Rejected invoice"))?;
        let created = self.repo.insert_factura(factura).await?;
        tracing::info!(
            factura_id = %created.id,
            total = %created.total(),
            lines = created.servicios().len(),
            "Invoice created"
        );
        Ok(created)
    }

    /// Gets an invoice by ID.
    pub async fn get_factura(&self, id: &FacturaId) -> Result<Factura, AppError> {
        self.repo
            .find_factura(id)
            .await?
            .ok_or_else(|| DomainError::FacturaNotFound(id.clone()).into())
    }

    /// Marks an invoice as paid. Paying an already paid invoice is a conflict.
    pub async fn pay_factura(&self, id: &FacturaId) -> Result<Factura, AppError> {
        let mut factura = self.get_factura(id).await?;
        factura
            .pay()
            .inspect_err(|e| tracing::warn!(error = %e, "Rejected payment"))?;

        // The store re-checks the flag, so a concurrent payer loses here.
        let paid = self
            .repo
            .mark_factura_paid(id)
            .await
            .map_err(|e| match e {
                RepoError::NotFound => DomainError::FacturaNotFound(id.clone()).into(),
                RepoError::Conflict(_) => DomainError::AlreadyPaid(id.clone()).into(),
                other => AppError::from(other),
            })?;

        tracing::info!(factura_id = %paid.id, total = %paid.total(), "Invoice paid");
        Ok(paid)
    }

    /// Lists all invoices.
    pub async fn list_facturas(&self) -> Result<Vec<Factura>, AppError> {
        self.repo.list_facturas().await.map_err(Into::into)
    }

    /// Permanently deletes an invoice. Referenced services are untouched.
    pub async fn delete_factura(&self, id: &FacturaId) -> Result<(), AppError> {
        if !self.repo.delete_factura(id).await? {
            return Err(DomainError::FacturaNotFound(id.clone()).into());
        }

        tracing::info!(factura_id = %id, "Invoice deleted");
        Ok(())
    }
}
