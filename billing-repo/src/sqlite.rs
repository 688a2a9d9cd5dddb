//! SQLite repository adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

use billing_types::{BillingRepository, Factura, FacturaId, RepoError, Servicio, ServicioId};

use crate::types::{DbFactura, DbFacturaLine, DbServicio, assemble_facturas, db_err, tx_err};

const MIGRATION: &str = include_str!("../migrations/0001_create_tables.sql");

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let in_memory = database_url.contains(":memory:");

        // Ensure on-disk SQLite target directory exists.
        if !in_memory {
            if let Some(path) = database_url.strip_prefix("sqlite://") {
                let path = path.split('?').next().unwrap_or(path);
                if let Some(parent) = std::path::Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to an in-memory database is a separate database.
        let max_connections = if in_memory { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let repo = Self { pool };
        repo.create_schema().await?;
        tracing::debug!("SQLite schema ready");

        Ok(repo)
    }

    /// Creates the database schema (idempotent).
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        sqlx::raw_sql(MIGRATION)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn fetch_lines(&self, factura_id: Option<&str>) -> Result<Vec<DbFacturaLine>, RepoError> {
        const SELECT_LINES: &str = r#"SELECT fs.factura_id, fs.servicio_id AS id,
                      fs.nombre, fs.costo
               FROM factura_servicios fs"#;

        let rows: Result<Vec<DbFacturaLine>, sqlx::Error> = match factura_id {
            Some(id) => {
                let sql = format!("{SELECT_LINES} WHERE fs.factura_id = ? ORDER BY fs.position");
                sqlx::query_as(&sql).bind(id).fetch_all(&self.pool).await
            }
            None => {
                let sql = format!("{SELECT_LINES} ORDER BY fs.factura_id, fs.position");
                sqlx::query_as(&sql).fetch_all(&self.pool).await
            }
        };

        rows.map_err(db_err)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl BillingRepository for SqliteRepo {
    async fn save_servicio(&self, servicio: Servicio) -> Result<Servicio, RepoError> {
        sqlx::query(
            r#"INSERT INTO servicios (id, nombre, costo) VALUES (?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET nombre = excluded.nombre, costo = excluded.costo"#,
        )
        .bind(servicio.id.as_str())
        .bind(&servicio.nombre)
        .bind(servicio.costo.to_string())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(servicio)
    }

    async fn find_servicio(&self, id: &ServicioId) -> Result<Option<Servicio>, RepoError> {
        let row: Option<DbServicio> =
            sqlx::query_as(r#"SELECT id, nombre, costo FROM servicios WHERE id = ?"#)
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;

        row.map(DbServicio::into_domain).transpose()
    }

    async fn list_servicios(&self) -> Result<Vec<Servicio>, RepoError> {
        let rows: Vec<DbServicio> =
            sqlx::query_as(r#"SELECT id, nombre, costo FROM servicios ORDER BY rowid"#)
                .fetch_all(&self.pool)
                .await
                .map_err(db_err)?;

        rows.into_iter().map(DbServicio::into_domain).collect()
    }

    async fn insert_factura(&self, factura: Factura) -> Result<Factura, RepoError> {
        let mut db_tx = self.pool.begin().await.map_err(tx_err)?;

        sqlx::query(r#"INSERT INTO facturas (id, pagada) VALUES (?, ?)"#)
            .bind(factura.id.as_str())
            .bind(factura.pagada)
            .execute(&mut *db_tx)
            .await
            .map_err(db_err)?;

        for (position, servicio) in factura.servicios().iter().enumerate() {
            sqlx::query(
                r#"INSERT INTO factura_servicios (factura_id, position, servicio_id, nombre, costo)
                   VALUES (?, ?, ?, ?, ?)"#,
            )
            .bind(factura.id.as_str())
            .bind(position as i64)
            .bind(servicio.id.as_str())
            .bind(&servicio.nombre)
            .bind(servicio.costo.to_string())
            .execute(&mut *db_tx)
            .await
            .map_err(db_err)?;
        }

        db_tx.commit().await.map_err(tx_err)?;

        Ok(factura)
    }

    async fn find_factura(&self, id: &FacturaId) -> Result<Option<Factura>, RepoError> {
        let row: Option<DbFactura> =
            sqlx::query_as(r#"SELECT id, pagada FROM facturas WHERE id = ?"#)
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let lines = self.fetch_lines(Some(id.as_str())).await?;
        Ok(assemble_facturas(vec![row], lines)?.pop())
    }

    async fn list_facturas(&self) -> Result<Vec<Factura>, RepoError> {
        let rows: Vec<DbFactura> =
            sqlx::query_as(r#"SELECT id, pagada FROM facturas ORDER BY rowid"#)
                .fetch_all(&self.pool)
                .await
                .map_err(db_err)?;

        let lines = self.fetch_lines(None).await?;
        assemble_facturas(rows, lines)
    }

    async fn mark_factura_paid(&self, id: &FacturaId) -> Result<Factura, RepoError> {
        // Conditional flip: of two concurrent payers only one matches the row.
        let result = sqlx::query(r#"UPDATE facturas SET pagada = 1 WHERE id = ? AND pagada = 0"#)
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        let factura = self.find_factura(id).await?.ok_or(RepoError::NotFound)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::Conflict(format!(
                "Invoice {} has already been paid",
                id
            )));
        }

        Ok(factura)
    }

    async fn delete_factura(&self, id: &FacturaId) -> Result<bool, RepoError> {
        let mut db_tx = self.pool.begin().await.map_err(tx_err)?;

        sqlx::query(r#"DELETE FROM factura_servicios WHERE factura_id = ?"#)
            .bind(id.as_str())
            .execute(&mut *db_tx)
            .await
            .map_err(db_err)?;

        let result = sqlx::query(r#"DELETE FROM facturas WHERE id = ?"#)
            .bind(id.as_str())
            .execute(&mut *db_tx)
            .await
            .map_err(db_err)?;

        db_tx.commit().await.map_err(tx_err)?;

        Ok(result.rows_affected() > 0)
    }
}
