//! Domain models for the billing service.

pub mod factura;
pub mod servicio;

pub use factura::{Factura, FacturaId};
pub use servicio::{Servicio, ServicioId};
