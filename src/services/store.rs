use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    db::DbPool,
    error::AppError,
    models::record::{Collection, NewRecord, Record, RecordRow},
};

/// SQLite-backed storage for trips and templates.
///
/// Inserts hold a per-table lock so that concurrent writers to the same table
/// are applied one at a time.
#[derive(Clone)]
pub struct RecordStore {
    db: DbPool,
    write_locks: Arc<WriteLocks>,
}

#[derive(Default)]
struct WriteLocks {
    trips: Mutex<()>,
    templates: Mutex<()>,
}

impl RecordStore {
    pub fn new(db: DbPool) -> Self {
        Self {
            db,
            write_locks: Arc::new(WriteLocks::default()),
        }
    }

    fn write_lock(&self, collection: Collection) -> &Mutex<()> {
        match collection {
            Collection::Trips => &self.write_locks.trips,
            Collection::Templates => &self.write_locks.templates,
        }
    }

    /// All records of a collection, latest `savedAt` first. `savedAt` is
    /// compared as a plain string.
    pub async fn list(&self, collection: Collection) -> Result<Vec<Record>, AppError> {
        let sql = format!(
            "SELECT id, name, data, saved_at FROM {} ORDER BY saved_at DESC, id DESC",
            collection.table()
        );
        let rows: Vec<RecordRow> = sqlx::query_as(&sql).fetch_all(&self.db).await?;
        debug!("loaded {} rows from {collection}", rows.len());
        rows.into_iter().map(Record::try_from).collect()
    }

    pub async fn insert(&self, collection: Collection, record: &NewRecord) -> Result<i64, AppError> {
        let data = serde_json::to_string(&record.data).map_err(|err| AppError::Other(err.into()))?;
        let sql = format!(
            "INSERT INTO {} (name, data, saved_at) VALUES (?1, ?2, ?3)",
            collection.table()
        );

        let _guard = self.write_lock(collection).lock().await;
        let result = sqlx::query(&sql)
            .bind(&record.name)
            .bind(data)
            .bind(&record.saved_at)
            .execute(&self.db)
            .await?;
        Ok(result.last_insert_rowid())
    }
}
