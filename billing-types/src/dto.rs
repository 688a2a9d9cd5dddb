//! Data Transfer Objects (DTOs) for requests and responses.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Factura, FacturaId, Servicio, ServicioId};

const SERVICIO_PATH: &str = "/api/servicio";
const FACTURA_PATH: &str = "/api/factura";

// ─────────────────────────────────────────────────────────────────────────────
// Servicio DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to register a service.
///
/// Missing fields fall back to empty values so they are rejected by
/// validation instead of by the JSON extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct RegisterServicioRequest {
    /// Optional caller-chosen id; generated when absent or blank
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    #[schema(example = "Consulta")]
    pub nombre: String,
    #[serde(default)]
    #[schema(value_type = f64, example = 50000)]
    pub costo: Decimal,
}

/// Service as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ServicioResponse {
    pub id: ServicioId,
    #[schema(example = "Consulta")]
    pub nombre: String,
    #[schema(value_type = f64, example = 50000)]
    pub costo: Decimal,
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<ServicioLinks>,
}

impl From<Servicio> for ServicioResponse {
    fn from(s: Servicio) -> Self {
        let links = ServicioLinks::for_id(&s.id);
        Self {
            id: s.id,
            nombre: s.nombre,
            costo: s.costo,
            links: Some(links),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Factura DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to create an invoice from existing services.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFacturaRequest {
    /// Ids of the services to bill, in order. Repeats are billed again.
    #[serde(default)]
    #[schema(example = json!(["3f1c9a52-6c1e-4d5b-9a0e-2f8b7c1d4e6a"]))]
    pub servicios_ids: Option<Vec<String>>,
}

/// Invoice as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FacturaResponse {
    pub id: FacturaId,
    pub servicios: Vec<ServicioResponse>,
    /// Sum of the service costs
    #[schema(value_type = f64, example = 50000)]
    pub total: Decimal,
    pub pagada: bool,
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<FacturaLinks>,
}

impl From<Factura> for FacturaResponse {
    fn from(f: Factura) -> Self {
        let links = FacturaLinks::for_factura(&f);
        Self {
            total: f.total(),
            pagada: f.pagada,
            servicios: f
                .servicios()
                .iter()
                .cloned()
                .map(ServicioResponse::from)
                .collect(),
            id: f.id,
            links: Some(links),
        }
    }
}

/// Confirmation returned after deleting an invoice.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteFacturaResponse {
    #[schema(example = "Invoice deleted")]
    pub message: String,
    pub id: FacturaId,
}

// ─────────────────────────────────────────────────────────────────────────────
// Navigation links (HAL style)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Link {
    pub href: String,
}

impl Link {
    fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ServicioLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
    pub servicios: Link,
}

impl ServicioLinks {
    pub fn for_id(id: &ServicioId) -> Self {
        Self {
            self_link: Link::new(format!("{SERVICIO_PATH}/{id}")),
            servicios: Link::new(SERVICIO_PATH),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FacturaLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
    pub facturas: Link,
    /// Present only while the invoice is unpaid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagar: Option<Link>,
}

impl FacturaLinks {
    pub fn for_factura(factura: &Factura) -> Self {
        let self_href = format!("{FACTURA_PATH}/{}", factura.id);
        Self {
            pagar: (!factura.pagada).then(|| Link::new(format!("{self_href}/pagar"))),
            self_link: Link::new(self_href),
            facturas: Link::new(FACTURA_PATH),
        }
    }
}
