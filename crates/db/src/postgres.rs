//! PostgreSQL-backed [`DocumentStore`].
//!
//! Every document is one row of the `documents` table with its fields in a
//! JSONB `body`. Partial updates are compiled into a single `UPDATE`
//! statement, so status changes and comment appends commit together and
//! concurrent appends serialize on the row lock.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::document::{Document, DocumentPatch, Fields};
use crate::error::{StoreError, StoreResult};
use crate::store::{DocumentStore, SnapshotHub, Subscription};
use crate::DbPool;

pub struct PgDocumentStore {
    pool: DbPool,
    hub: SnapshotHub,
    /// Serializes snapshot reloads so a stale reload never overwrites a
    /// newer one.
    refresh: Mutex<()>,
}

impl PgDocumentStore {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            hub: SnapshotHub::default(),
            refresh: Mutex::new(()),
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Reload and publish the snapshot of a watched collection.
    ///
    /// The write has already committed at this point; a failed reload is
    /// logged and leaves subscribers on the previous snapshot until the next
    /// write.
    async fn refresh(&self, collection: &str) {
        let _guard = self.refresh.lock().await;
        if !self.hub.is_watched(collection) {
            return;
        }
        match self.list(collection).await {
            Ok(docs) => self.hub.publish(collection, docs),
            Err(e) => {
                tracing::error!(collection, error = %e, "Failed to refresh collection snapshot");
            }
        }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn add(&self, collection: &str, fields: Fields) -> StoreResult<String> {
        let id = Uuid::now_v7().to_string();
        sqlx::query("INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(&id)
            .bind(Json(fields))
            .execute(&self.pool)
            .await?;
        self.refresh(collection).await;
        Ok(id)
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let row: Option<(Json<Fields>,)> =
            sqlx::query_as("SELECT body FROM documents WHERE collection = $1 AND id = $2")
                .bind(collection)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(Json(fields),)| Document::new(id, fields)))
    }

    async fn set(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3) \
             ON CONFLICT (collection, id) DO UPDATE \
             SET body = EXCLUDED.body, updated_at = NOW()",
        )
        .bind(collection)
        .bind(id)
        .bind(Json(fields))
        .execute(&self.pool)
        .await?;
        self.refresh(collection).await;
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, patch: DocumentPatch) -> StoreResult<()> {
        let statement = UpdateStatement::build(&patch);
        let mut query = sqlx::query(&statement.sql)
            .bind(collection)
            .bind(id)
            .bind(Json(Value::Object(statement.set)));
        for (field, values) in statement.appends {
            query = query.bind(field).bind(Json(Value::Array(values)));
        }

        let result = query.execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(collection, id));
        }
        self.refresh(collection).await;
        Ok(())
    }

    async fn list(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let rows: Vec<(String, Json<Fields>)> = sqlx::query_as(
            "SELECT id, body FROM documents WHERE collection = $1 ORDER BY created_at, id",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(id, Json(fields))| Document::new(id, fields))
            .collect())
    }

    async fn subscribe(&self, collection: &str) -> StoreResult<Subscription> {
        let _guard = self.refresh.lock().await;
        let docs = if self.hub.is_watched(collection) {
            Vec::new()
        } else {
            self.list(collection).await?
        };
        Ok(self.hub.subscribe(collection, move || docs))
    }

    async fn ping(&self) -> StoreResult<()> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Update statement
// ---------------------------------------------------------------------------

/// SQL for one [`DocumentPatch`] plus the values to bind after the fixed
/// `$1` collection, `$2` id and `$3` set-object parameters.
#[derive(Debug)]
struct UpdateStatement {
    sql: String,
    set: Fields,
    /// One entry per appended field, values in append order. Each binds as
    /// a field-name parameter followed by a JSONB array parameter.
    appends: Vec<(String, Vec<Value>)>,
}

impl UpdateStatement {
    fn build(patch: &DocumentPatch) -> Self {
        let mut appends: Vec<(String, Vec<Value>)> = Vec::new();
        for (field, value) in &patch.append {
            match appends.iter_mut().find(|(name, _)| name == field) {
                Some((_, values)) => values.push(value.clone()),
                None => appends.push((field.clone(), vec![value.clone()])),
            }
        }

        let mut expr = String::from("body || $3::jsonb");
        for (n, (field, _)) in appends.iter().enumerate() {
            let name = 4 + n * 2;
            let values = name + 1;
            // A field overwritten by the same patch appends onto its new value.
            let base = if patch.set.contains_key(field) {
                "$3::jsonb"
            } else {
                "body"
            };
            expr = format!(
                "jsonb_set({expr}, ARRAY[${name}::text], \
                 COALESCE(NULLIF({base} -> ${name}::text, 'null'::jsonb), '[]'::jsonb) \
                 || ${values}::jsonb)"
            );
        }

        let sql = format!(
            "UPDATE documents SET body = {expr}, updated_at = NOW() \
             WHERE collection = $1 AND id = $2"
        );

        Self {
            sql,
            set: patch.set.clone(),
            appends,
        }
    }
}
