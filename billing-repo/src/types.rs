//! Shared database row types.
//!
//! Ids are opaque text in both backends and costs travel as canonical
//! decimal text, so the same row structs decode from SQLite and PostgreSQL.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::FromRow;

use billing_types::{Factura, FacturaId, RepoError, Servicio, ServicioId};

// ─────────────────────────────────────────────────────────────────────────────
// Database row structs (derive FromRow for automatic mapping)
// ─────────────────────────────────────────────────────────────────────────────

/// Servicio row from database.
#[derive(FromRow)]
pub struct DbServicio {
    pub id: String,
    pub nombre: String,
    pub costo: String,
}

/// Factura row from database (service lines are loaded separately).
#[derive(FromRow)]
pub struct DbFactura {
    pub id: String,
    pub pagada: bool,
}

/// One service line of an invoice, with the name and cost billed at creation.
#[derive(FromRow)]
pub struct DbFacturaLine {
    pub factura_id: String,
    pub id: String,
    pub nombre: String,
    pub costo: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversions to domain types
// ─────────────────────────────────────────────────────────────────────────────

fn parse_costo(raw: &str) -> Result<Decimal, RepoError> {
    Decimal::from_str(raw).map_err(|e| RepoError::Database(format!("Invalid cost '{raw}': {e}")))
}

impl DbServicio {
    pub fn into_domain(self) -> Result<Servicio, RepoError> {
        let costo = parse_costo(&self.costo)?;
        Ok(Servicio::from_parts(
            ServicioId::from(self.id),
            self.nombre,
            costo,
        ))
    }
}

impl DbFacturaLine {
    fn into_servicio(self) -> Result<Servicio, RepoError> {
        let costo = parse_costo(&self.costo)?;
        Ok(Servicio::from_parts(
            ServicioId::from(self.id),
            self.nombre,
            costo,
        ))
    }
}

/// Joins invoice rows with their lines.
///
/// `lines` must already be ordered by position within each invoice; the
/// order of `facturas` is kept.
pub fn assemble_facturas(
    facturas: Vec<DbFactura>,
    lines: Vec<DbFacturaLine>,
) -> Result<Vec<Factura>, RepoError> {
    let mut by_factura: HashMap<String, Vec<Servicio>> = HashMap::new();
    for line in lines {
        let factura_id = line.factura_id.clone();
        by_factura
            .entry(factura_id)
            .or_default()
            .push(line.into_servicio()?);
    }

    facturas
        .into_iter()
        .map(|row| {
            let servicios = by_factura.remove(&row.id).unwrap_or_default();
            Factura::from_parts(FacturaId::from(row.id), servicios, row.pagada)
                .map_err(RepoError::from)
        })
        .collect()
}

/// Converts a sqlx error into a repository error.
pub fn db_err(e: sqlx::Error) -> RepoError {
    RepoError::Database(e.to_string())
}

/// Converts a sqlx error raised while managing a transaction.
pub fn tx_err(e: sqlx::Error) -> RepoError {
    RepoError::Transaction(e.to_string())
}
