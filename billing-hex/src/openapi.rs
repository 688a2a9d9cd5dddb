//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use billing_types::domain::{FacturaId, ServicioId};
use billing_types::dto::{
    CreateFacturaRequest, DeleteFacturaResponse, FacturaLinks, FacturaResponse, Link,
    RegisterServicioRequest, ServicioLinks, ServicioResponse,
};
use utoipa::OpenApi;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Register a service
#[utoipa::path(
    post,
    path = "/api/servicio",
    tag = "servicios",
    request_body = RegisterServicioRequest,
    responses(
        (status = 201, description = "Service registered", body = ServicioResponse),
        (status = 400, description = "Empty name or non-positive cost"),
        (status = 500, description = "Unexpected error")
    )
)]
async fn register_servicio() {}

/// List all services
#[utoipa::path(
    get,
    path = "/api/servicio",
    tag = "servicios",
    responses(
        (status = 200, description = "List of services", body = Vec<ServicioResponse>)
    )
)]
async fn list_servicios() {}

/// Get a service by ID
#[utoipa::path(
    get,
    path = "/api/servicio/{id}",
    tag = "servicios",
    params(
        ("id" = String, Path, description = "Service ID")
    ),
    responses(
        (status = 200, description = "Service found", body = ServicioResponse),
        (status = 404, description = "Service not found")
    )
)]
async fn get_servicio() {}

/// Create an invoice from existing services
#[utoipa::path(
    post,
    path = "/api/factura",
    tag = "facturas",
    request_body = CreateFacturaRequest,
    responses(
        (status = 201, description = "Invoice created", body = FacturaResponse),
        (status = 400, description = "Empty service list or unknown service id")
    )
)]
async fn create_factura() {}

/// List all invoices
#[utoipa::path(
    get,
    path = "/api/factura",
    tag = "facturas",
    responses(
        (status = 200, description = "List of invoices", body = Vec<FacturaResponse>)
    )
)]
async fn list_facturas() {}

/// Get an invoice by ID
#[utoipa::path(
    get,
    path = "/api/factura/{id}",
    tag = "facturas",
    params(
        ("id" = String, Path, description = "Invoice ID")
    ),
    responses(
        (status = 200, description = "Invoice found", body = FacturaResponse),
        (status = 404, description = "Invoice not found")
    )
)]
async fn get_factura() {}

/// Mark an invoice as paid
#[utoipa::path(
    put,
    path = "/api/factura/{id}/pagar",
    tag = "facturas",
    params(
        ("id" = String, Path, description = "Invoice ID")
    ),
    responses(
        (status = 200, description = "Invoice paid", body = FacturaResponse),
        (status = 400, description = "Invoice already paid"),
        (status = 404, description = "Invoice not found")
    )
)]
async fn pay_factura() {}

/// Delete an invoice
#[utoipa::path(
    delete,
    path = "/api/factura/{id}",
    tag = "facturas",
    params(
        ("id" = String, Path, description = "Invoice ID")
    ),
    responses(
        (status = 200, description = "Invoice deleted", body = DeleteFacturaResponse),
        (status = 404, description = "Invoice not found")
    )
)]
async fn delete_factura() {}

/// OpenAPI documentation for the Billing API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Veterinary Billing API",
        version = "1.0.0",
        description = "Register veterinary services, bundle them into invoices and mark invoices as paid.",
        license(name = "MIT"),
    ),
    paths(
        health,
        register_servicio,
        list_servicios,
        get_servicio,
        create_factura,
        list_facturas,
        get_factura,
        pay_factura,
        delete_factura,
    ),
    components(
        schemas(
            RegisterServicioRequest,
            ServicioResponse,
            ServicioLinks,
            CreateFacturaRequest,
            FacturaResponse,
            FacturaLinks,
            DeleteFacturaResponse,
            Link,
            ServicioId,
            FacturaId,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "servicios", description = "Billable service registry"),
        (name = "facturas", description = "Invoice creation, payment and removal"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_all_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/api/servicio",
            "/api/servicio/{id}",
            "/api/factura",
            "/api/factura/{id}",
            "/api/factura/{id}/pagar",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing path {expected}"
            );
        }
    }
}
