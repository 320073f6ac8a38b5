//! SQLite-backed product repository

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::{cancellable, ProductRepository};
use crate::domain::{MappingError, Product, ProductDto};
use crate::error::RepositoryError;

const PRODUCT_COLUMNS: &str = "id, title";

/// Products table in a SQLite database, accessed through a sqlx pool.
#[derive(Debug, Clone)]
pub struct SqliteProductRepository {
    pool: SqlitePool,
}

impl SqliteProductRepository {
    /// Open or create the database file at `path`.
    pub async fn open(path: &Path, pool_size: u32) -> Result<Self, RepositoryError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let repository = Self::connect(options, pool_size).await?;
        info!(path = %path.display(), "SQLite product store opened");
        Ok(repository)
    }

    /// Private in-memory database (useful for tests). Uses a single
    /// connection, since every SQLite memory connection is its own database.
    pub async fn open_in_memory() -> Result<Self, RepositoryError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        Self::connect(options, 1).await
    }

    /// Closes every pooled connection. Later calls fail with a database error.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("SQLite product store closed");
    }

    async fn connect(options: SqliteConnectOptions, pool_size: u32) -> Result<Self, RepositoryError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size.max(1))
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await?;
        create_schema(&pool).await?;
        Ok(Self { pool })
    }
}

async fn create_schema(pool: &SqlitePool) -> Result<(), RepositoryError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY AUTOINCREMENT
                CHECK (id BETWEEN -2147483648 AND 2147483647),
            title TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// SQLite row ids are 64-bit; product ids are not.
fn narrow_id(raw: i64) -> Result<i32, MappingError> {
    i32::try_from(raw).map_err(|_| MappingError::IdOutOfRange(raw))
}

fn row_to_product(row: &SqliteRow) -> Result<Product, RepositoryError> {
    let id = narrow_id(row.try_get::<i64, _>("id")?)?;
    Ok(Product::new(id, row.try_get::<String, _>("title")?))
}

fn row_to_dto(row: Option<SqliteRow>) -> Result<Option<ProductDto>, RepositoryError> {
    row.as_ref()
        .map(row_to_product)
        .transpose()
        .map(|product| product.map(ProductDto::from))
}

#[async_trait]
impl ProductRepository for SqliteProductRepository {
    #[instrument(skip(self, cancel))]
    async fn add(
        &self,
        item: ProductDto,
        cancel: &CancellationToken,
    ) -> Result<Option<ProductDto>, RepositoryError> {
        let product = Product::try_from(item)?;
        let id = (product.id != 0).then_some(product.id);

        let sql = format!(
            "INSERT INTO products (id, title) VALUES (?, ?) ON CONFLICT(id) DO NOTHING RETURNING {}",
            PRODUCT_COLUMNS
        );
        let row = cancellable(
            cancel,
            sqlx::query(&sql)
                .bind(id)
                .bind(&product.title)
                .fetch_optional(&self.pool),
        )
        .await?;

        let stored = row_to_dto(row)?;
        match &stored {
            Some(dto) => debug!(id = ?dto.id, "Product inserted"),
            None => debug!("Insert skipped, id taken"),
        }
        Ok(stored)
    }

    #[instrument(skip(self, cancel))]
    async fn get_by_id(
        &self,
        id: i32,
        cancel: &CancellationToken,
    ) -> Result<Option<ProductDto>, RepositoryError> {
        let sql = format!("SELECT {} FROM products WHERE id = ?", PRODUCT_COLUMNS);
        let row = cancellable(
            cancel,
            sqlx::query(&sql).bind(id).fetch_optional(&self.pool),
        )
        .await?;
        row_to_dto(row)
    }

    #[instrument(skip(self, cancel))]
    async fn get_all(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Option<Vec<Option<ProductDto>>>, RepositoryError> {
        let sql = format!("SELECT {} FROM products ORDER BY id", PRODUCT_COLUMNS);
        let rows = cancellable(cancel, sqlx::query(&sql).fetch_all(&self.pool)).await?;

        let products = rows
            .iter()
            .map(|row| match row_to_product(row) {
                Ok(product) => Some(ProductDto::from(product)),
                Err(e) => {
                    warn!(error = %e, "Unreadable product row kept as placeholder");
                    None
                }
            })
            .collect();
        Ok(Some(products))
    }

    #[instrument(skip(self, cancel))]
    async fn update(
        &self,
        item: ProductDto,
        cancel: &CancellationToken,
    ) -> Result<Option<ProductDto>, RepositoryError> {
        let product = Product::try_from(item)?;
        let sql = format!(
            "UPDATE products SET title = ? WHERE id = ? RETURNING {}",
            PRODUCT_COLUMNS
        );
        let row = cancellable(
            cancel,
            sqlx::query(&sql)
                .bind(&product.title)
                .bind(product.id)
                .fetch_optional(&self.pool),
        )
        .await?;
        row_to_dto(row)
    }

    #[instrument(skip(self, cancel))]
    async fn delete(
        &self,
        id: i32,
        cancel: &CancellationToken,
    ) -> Result<Option<ProductDto>, RepositoryError> {
        let sql = format!("DELETE FROM products WHERE id = ? RETURNING {}", PRODUCT_COLUMNS);
        let row = cancellable(
            cancel,
            sqlx::query(&sql).bind(id).fetch_optional(&self.pool),
        )
        .await?;
        row_to_dto(row)
    }
}
