//! PostgreSQL repository adapter.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use billing_types::{BillingRepository, Factura, FacturaId, RepoError, Servicio, ServicioId};

use crate::types::{DbFactura, DbFacturaLine, DbServicio, assemble_facturas, db_err, tx_err};

const SELECT_LINES: &str = r#"SELECT fs.factura_id, fs.servicio_id AS id,
           fs.nombre, fs.costo::TEXT AS costo
    FROM factura_servicios fs"#;

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Repository
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL repository. Costs are stored as `NUMERIC`.
pub struct PostgresRepo {
    pool: PgPool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), anyhow::Error> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
        }
    }
    Ok(())
}

impl PostgresRepo {
    /// Connects and runs migrations.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        execute_migration(
            &pool,
            include_str!("../migrations/0001_create_tables_pg.sql"),
            "0001",
        )
        .await?;
        tracing::debug!("PostgreSQL schema ready");

        Ok(Self { pool })
    }

}

#[async_trait]
impl BillingRepository for PostgresRepo {
    async fn save_servicio(&self, servicio: Servicio) -> Result<Servicio, RepoError> {
        sqlx::query(
            r#"INSERT INTO servicios (id, nombre, costo) VALUES ($1, $2, $3::NUMERIC)
               ON CONFLICT (id) DO UPDATE SET nombre = EXCLUDED.nombre, costo = EXCLUDED.costo"#,
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
        let row: Option<DbServicio> = sqlx::query_as(
            r#"SELECT id, nombre, costo::TEXT AS costo FROM servicios WHERE id = $1"#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(DbServicio::into_domain).transpose()
    }

    async fn list_servicios(&self) -> Result<Vec<Servicio>, RepoError> {
        let rows: Vec<DbServicio> = sqlx::query_as(
            r#"SELECT id, nombre, costo::TEXT AS costo FROM servicios ORDER BY seq"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(DbServicio::into_domain).collect()
    }

    async fn insert_factura(&self, factura: Factura) -> Result<Factura, RepoError> {
        let mut db_tx = self.pool.begin().await.map_err(tx_err)?;

        sqlx::query(r#"INSERT INTO facturas (id, pagada) VALUES ($1, $2)"#)
            .bind(factura.id.as_str())
            .bind(factura.pagada)
            .execute(&mut *db_tx)
            .await
            .map_err(db_err)?;

        for (position, servicio) in factura.servicios().iter().enumerate() {
            sqlx::query(
                r#"INSERT INTO factura_servicios (factura_id, position, servicio_id, nombre, costo)
                   VALUES ($1, $2, $3, $4, $5::NUMERIC)"#,
            )
            .bind(factura.id.as_str())
            .bind(position as i32)
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
            sqlx::query_as(r#"SELECT id, pagada FROM facturas WHERE id = $1"#)
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let sql = format!("{SELECT_LINES} WHERE fs.factura_id = $1 ORDER BY fs.position");
        let lines: Vec<DbFacturaLine> = sqlx::query_as(&sql)
            .bind(id.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(assemble_facturas(vec![row], lines)?.pop())
    }

    async fn list_facturas(&self) -> Result<Vec<Factura>, RepoError> {
        let rows: Vec<DbFactura> =
            sqlx::query_as(r#"SELECT id, pagada FROM facturas ORDER BY seq"#)
                .fetch_all(&self.pool)
                .await
                .map_err(db_err)?;

        let sql = format!("{SELECT_LINES} ORDER BY fs.factura_id, fs.position");
        let lines: Vec<DbFacturaLine> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        assemble_facturas(rows, lines)
    }

    async fn mark_factura_paid(&self, id: &FacturaId) -> Result<Factura, RepoError> {
        // Conditional flip: of two concurrent payers only one matches the row.
        let result =
            sqlx::query(r#"UPDATE facturas SET pagada = TRUE WHERE id = $1 AND pagada = FALSE"#)
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

        sqlx::query(r#"DELETE FROM factura_servicios WHERE factura_id = $1"#)
            .bind(id.as_str())
            .execute(&mut *db_tx)
            .await
            .map_err(db_err)?;

        let result = sqlx::query(r#"DELETE FROM facturas WHERE id = $1"#)
            .bind(id.as_str())
            .execute(&mut *db_tx)
            .await
            .map_err(db_err)?;

        db_tx.commit().await.map_err(tx_err)?;

        Ok(result.rows_affected() > 0)
    }
}
