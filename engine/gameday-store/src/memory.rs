use crate::error::{Result, StoreError};
use crate::records::{Record, RecordKind};
use crate::store::{ledger_team_code, Store};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct Tables {
    rows: HashMap<RecordKind, Vec<Record>>,
    unique_keys: HashMap<RecordKind, HashSet<Vec<String>>>,
    imported: HashMap<(RecordKind, String, String), DateTime<Utc>>,
}

/// In-memory store enforcing the same unique indexes as the Postgres tables
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently held for `kind`
    pub async fn row_count(&self, kind: RecordKind) -> usize {
        let tables = self.tables.lock().await;
        tables.rows.get(&kind).map_or(0, Vec::len)
    }

    /// Copy of the rows held for `kind`, in insertion order
    pub async fn rows(&self, kind: RecordKind) -> Vec<Record> {
        let tables = self.tables.lock().await;
        tables.rows.get(&kind).cloned().unwrap_or_default()
    }

    /// When the ledger last marked a game as imported
    pub async fn imported_at(
        &self,
        kind: RecordKind,
        game_id: &str,
        team_code: &str,
    ) -> Option<DateTime<Utc>> {
        let tables = self.tables.lock().await;
        let team = ledger_team_code(kind, team_code).to_string();
        tables.imported.get(&(kind, game_id.to_string(), team)).copied()
    }

    /// Drop the import ledger entry for a game, as if its import never finished
    pub async fn forget_import(&self, kind: RecordKind, game_id: &str, team_code: &str) {
        let mut tables = self.tables.lock().await;
        let team = ledger_team_code(kind, team_code).to_string();
        tables.imported.remove(&(kind, game_id.to_string(), team));
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn exists(&self, kind: RecordKind, game_id: &str, team_code: &str) -> Result<bool> {
        let tables = self.tables.lock().await;
        let team = ledger_team_code(kind, team_code).to_string();
        Ok(tables.imported.contains_key(&(kind, game_id.to_string(), team)))
    }

    async fn insert(&self, record: &Record) -> Result<()> {
        let kind = record.kind();
        let mut tables = self.tables.lock().await;

        if let Some(key) = record.unique_key() {
            let keys = tables.unique_keys.entry(kind).or_default();
            if keys.contains(&key) {
                return Err(StoreError::DuplicateKey {
                    table: kind.table_name(),
                    detail: format!("({}) already exists", key.join(", ")),
                });
            }
            keys.insert(key);
        }

        tables.rows.entry(kind).or_default().push(record.clone());
        Ok(())
    }

    async fn mark_imported(&self, kind: RecordKind, game_id: &str, team_code: &str) -> Result<()> {
        let mut tables = self.tables.lock().await;
        let team = ledger_team_code(kind, team_code).to_string();
        tables.imported.insert((kind, game_id.to_string(), team), Utc::now());
        Ok(())
    }
}
