use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use sqlx::Postgres;
use sqlx::QueryBuilder;

use crate::domain::store::errors::StoreError;
use crate::domain::store::models::Collection;
use crate::domain::store::models::Condition;
use crate::domain::store::models::Document;
use crate::domain::store::models::Filter;
use crate::domain::store::ports::DocumentStore;

/// Document store backed by PostgreSQL JSONB columns.
///
/// Each collection is a table `(id BIGSERIAL, doc JSONB)`. Field names are
/// always bound as parameters, never interpolated into SQL. Equality
/// conditions are containment tests so they can use the `jsonb_path_ops`
/// GIN index on `doc`.
#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a pool to `url`.
    ///
    /// # Errors
    /// * `Connection` - Database unreachable or URL invalid
    pub async fn open(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close every pooled connection, waiting for in-flight queries.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Single-field document that `doc @>` matches exactly when the field equals
/// `value`, for the scalar values filters carry.
fn containment(field: &str, value: &serde_json::Value) -> Document {
    let mut document = Document::new();
    document.insert(field.to_string(), value.clone());
    document
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &Filter) {
    builder.push(" WHERE TRUE");

    for condition in filter.conditions() {
        match condition {
            Condition::Eq { field, value } => {
                builder
                    .push(" AND doc @> ")
                    .push_bind(Json(containment(field, value)));
            }
            Condition::Gt { field, value } => {
                builder
                    .push(" AND (doc ->> ")
                    .push_bind(field.clone())
                    .push(")::timestamptz > ")
                    .push_bind(*value);
            }
            Condition::Lt { field, value } => {
                builder
                    .push(" AND (doc ->> ")
                    .push_bind(field.clone())
                    .push(")::timestamptz < ")
                    .push_bind(*value);
            }
        }
    }
}

fn map_sqlx_error(collection: Collection, e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StoreError::DuplicateKey {
            collection,
            detail: db_err
                .constraint()
                .unwrap_or("unique constraint")
                .to_string(),
        },
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed => StoreError::Connection(e.to_string()),
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            StoreError::Serialization(e.to_string())
        }
        _ => StoreError::Query(e.to_string()),
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError> {
        let mut builder =
            QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", collection.name()));
        push_filter(&mut builder, filter);

        let count = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(collection, e))?;

        Ok(count as u64)
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        let mut builder = QueryBuilder::new(format!("SELECT doc FROM {}", collection.name()));
        push_filter(&mut builder, filter);
        builder.push(" LIMIT 1");

        let row = builder
            .build_query_scalar::<Json<Document>>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(collection, e))?;

        Ok(row.map(|Json(document)| document))
    }

    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<(), StoreError> {
        let mut builder =
            QueryBuilder::new(format!("INSERT INTO {} (doc) VALUES (", collection.name()));
        builder.push_bind(Json(document)).push(")");

        builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(collection, e))?;

        Ok(())
    }

    async fn delete_one(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError> {
        let table = collection.name();
        let mut builder = QueryBuilder::new(format!(
            "DELETE FROM {table} WHERE id IN (SELECT id FROM {table}"
        ));
        push_filter(&mut builder, filter);
        builder.push(" LIMIT 1)");

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(collection, e))?;

        Ok(result.rows_affected())
    }

    async fn delete_many(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<u64, StoreError> {
        let mut builder = QueryBuilder::new(format!("DELETE FROM {}", collection.name()));
        push_filter(&mut builder, filter);

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(collection, e))?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_filter_binds_field_names() {
        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT doc FROM sessions");
        push_filter(
            &mut builder,
            &Filter::new()
                .eq("username", "alice_wonder")
                .gt("expires_at", Utc::now()),
        );

        assert_eq!(
            builder.sql(),
            "SELECT doc FROM sessions WHERE TRUE AND doc @> $1 AND (doc ->> $2)::timestamptz > $3"
        );
    }

    #[test]
    fn test_equality_is_single_field_containment() {
        let document = containment("session_token", &serde_json::json!("abc"));

        assert_eq!(
            serde_json::Value::Object(document),
            serde_json::json!({ "session_token": "abc" })
        );
    }
}
