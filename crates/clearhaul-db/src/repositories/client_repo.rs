//! Client repository implementation
//!
//! Provides PostgreSQL-backed storage for client records with phone number
//! lookups and back-office search. The `phone_digits` column holds the
//! normalized phone and carries a unique index, so duplicate detection works
//! regardless of how the number was formatted on entry.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clearhaul_core::{
    models::Client,
    traits::{ClientRepository, Repository},
    AppError, AppResult,
};
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of ClientRepository
pub struct PgClientRepository {
    pool: PgPool,
}

impl PgClientRepository {
    /// Create a new client repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Client, i32> for PgClientRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Client>> {
        debug!("Finding client by id: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, ClientRow>(
            r#"
            SELECT
                id, name, phone, email, address, notes,
                created_at, updated_at
            FROM clients
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding client {}: {}", id, e);
            AppError::Database(format!("Failed to find client: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<Client>> {
        debug!("Finding all clients with limit {} offset {}", limit, offset);

        let rows = sqlx::query_as::<sqlx::Postgres, ClientRow>(
            r#"
            SELECT
                id, name, phone, email, address, notes,
                created_at, updated_at
            FROM clients
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding clients: {}", e);
            AppError::Database(format!("Failed to fetch clients: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM clients")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting clients: {}", e);
                AppError::Database(format!("Failed to count clients: {}", e))
            })?;

        Ok(result.0)
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &Client) -> AppResult<Client> {
        debug!("Creating client: {}", entity.name);

        let row = sqlx::query_as::<sqlx::Postgres, ClientRow>(
            r#"
            INSERT INTO clients (name, phone, phone_digits, email, address, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING
                id, name, phone, email, address, notes,
                created_at, updated_at
            "#,
        )
        .bind(&entity.name)
        .bind(&entity.phone)
        .bind(Client::normalize_phone(&entity.phone))
        .bind(&entity.email)
        .bind(&entity.address)
        .bind(&entity.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating client: {}", e);
            if e.to_string().contains("unique constraint") {
                AppError::AlreadyExists(format!(
                    "Client with phone {} already exists",
                    entity.phone
                ))
            } else {
                AppError::Database(format!("Failed to create client: {}", e))
            }
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &Client) -> AppResult<Client> {
        debug!("Updating client: {}", entity.id);

        let row = sqlx::query_as::<sqlx::Postgres, ClientRow>(
            r#"
            UPDATE clients
            SET name = $2,
                phone = $3,
                phone_digits = $4,
                email = $5,
                address = $6,
                notes = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, name, phone, email, address, notes,
                created_at, updated_at
            "#,
        )
        .bind(entity.id)
        .bind(&entity.name)
        .bind(&entity.phone)
        .bind(Client::normalize_phone(&entity.phone))
        .bind(&entity.email)
        .bind(&entity.address)
        .bind(&entity.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error updating client {}: {}", entity.id, e);
            if e.to_string().contains("unique constraint") {
                AppError::AlreadyExists(format!(
                    "Client with phone {} already exists",
                    entity.phone
                ))
            } else {
                AppError::Database(format!("Failed to update client: {}", e))
            }
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i32) -> AppResult<bool> {
        debug!("Deleting client: {}", id);

        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error deleting client {}: {}", id, e);
                AppError::Database(format!("Failed to delete client: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ClientRepository for PgClientRepository {
    #[instrument(skip(self))]
    async fn find_by_phone(&self, phone: &str) -> AppResult<Option<Client>> {
        debug!("Finding client by phone: {}", phone);

        let normalized = Client::normalize_phone(phone);

        let result = sqlx::query_as::<sqlx::Postgres, ClientRow>(
            r#"
            SELECT
                id, name, phone, email, address, notes,
                created_at, updated_at
            FROM clients
            WHERE phone_digits = $1
            "#,
        )
        .bind(&normalized)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding client by phone: {}", e);
            AppError::Database(format!("Failed to find client: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn search(
        &self,
        term: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Client>, i64)> {
        debug!(
            "Searching clients with term={:?}, limit={}, offset={}",
            term, limit, offset
        );

        // Build raw SQL with escaped values for the search term
        let where_clause = match term {
            Some(t) if !t.is_empty() => {
                let escaped = t.replace('\'', "''");
                format!(
                    "WHERE name ILIKE '%{}%' OR phone ILIKE '%{}%'",
                    escaped, escaped
                )
            }
            _ => String::new(),
        };

        let count_sql = format!("SELECT COUNT(*) FROM clients {}", where_clause);
        let data_sql = format!(
            r#"
            SELECT
                id, name, phone, email, address, notes,
                created_at, updated_at
            FROM clients
            {}
            ORDER BY name
            LIMIT {} OFFSET {}
            "#,
            where_clause, limit, offset
        );

        let total: (i64,) = sqlx::query_as(&count_sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting searched clients: {}", e);
                AppError::Database(format!("Failed to count clients: {}", e))
            })?;

        let rows = sqlx::query_as::<sqlx::Postgres, ClientRow>(&data_sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error searching clients: {}", e);
                AppError::Database(format!("Failed to fetch clients: {}", e))
            })?;

        Ok((rows.into_iter().map(Into::into).collect(), total.0))
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct ClientRow {
    id: i32,
    name: String,
    phone: String,
    email: Option<String>,
    address: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ClientRow> for Client {
    fn from(row: ClientRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            phone: row.phone,
            email: row.email,
            address: row.address,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
