use std::sync::Arc;

use time::{Date, OffsetDateTime, UtcOffset};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::food_log::dto::{FoodLogEntry, NewEntryRequest, SyncUpdateRequest};
use crate::storage::{keys, load_json, save_json, KeyValueStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum FoodLogError {
    #[error("log entry {0} not found")]
    NotFound(String),
    #[error("quantity must be a finite, non-negative number, got {0}")]
    InvalidQuantity(f64),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Food log persisted as one JSON array in the key-value store.
///
/// Every mutation rewrites the whole array, so writers hold `writes` across
/// load, modify and save. Share one instance per store.
pub struct FoodLog {
    store: Arc<dyn KeyValueStore>,
    writes: Mutex<()>,
}

impl FoodLog {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            writes: Mutex::new(()),
        }
    }

    pub async fn all(&self) -> Result<Vec<FoodLogEntry>, FoodLogError> {
        Ok(load_json(self.store.as_ref(), keys::FOOD_LOG).await?.unwrap_or_default())
    }

    async fn save(&self, entries: &[FoodLogEntry]) -> Result<(), FoodLogError> {
        save_json(self.store.as_ref(), keys::FOOD_LOG, entries).await?;
        Ok(())
    }

    /// Entries whose timestamp falls on `date` in UTC.
    pub async fn entries_on(&self, date: Date) -> Result<Vec<FoodLogEntry>, FoodLogError> {
        let entries = self.all().await?;
        Ok(entries
            .into_iter()
            .filter(|e| e.timestamp.to_offset(UtcOffset::UTC).date() == date)
            .collect())
    }

    pub async fn add(&self, req: NewEntryRequest) -> Result<FoodLogEntry, FoodLogError> {
        if !(req.quantity.is_finite() && req.quantity >= 0.0) {
            return Err(FoodLogError::InvalidQuantity(req.quantity));
        }

        let entry = FoodLogEntry {
            local_id: Uuid::new_v4().to_string(),
            server_id: None,
            timestamp: req.timestamp.unwrap_or_else(OffsetDateTime::now_utc),
            food: Some(req.food),
            quantity: req.quantity,
            sync_status: Default::default(),
            server_meal_id: None,
            server_food_entry_id: None,
            meal_type: req.meal_type,
        };

        let _write = self.writes.lock().await;
        let mut entries = self.all().await?;
        entries.push(entry.clone());
        self.save(&entries).await?;
        debug!(local_id = %entry.local_id, quantity = entry.quantity, "food logged");
        Ok(entry)
    }

    pub async fn remove(&self, local_id: &str) -> Result<(), FoodLogError> {
        let _write = self.writes.lock().await;
        let mut entries = self.all().await?;
        let before = entries.len();
        entries.retain(|e| e.local_id != local_id);
        if entries.len() == before {
            return Err(FoodLogError::NotFound(local_id.to_string()));
        }
        self.save(&entries).await
    }

    pub async fn clear(&self) -> Result<(), FoodLogError> {
        let _write = self.writes.lock().await;
        self.store.remove(keys::FOOD_LOG).await?;
        Ok(())
    }

    /// Applies a sync-status transition. Server ids are only overwritten when given.
    pub async fn mark_sync(
        &self,
        local_id: &str,
        update: SyncUpdateRequest,
    ) -> Result<FoodLogEntry, FoodLogError> {
        let _write = self.writes.lock().await;
        let mut entries = self.all().await?;
        let entry = entries
            .iter_mut()
            .find(|e| e.local_id == local_id)
            .ok_or_else(|| FoodLogError::NotFound(local_id.to_string()))?;

        entry.sync_status = update.sync_status;
        if update.server_id.is_some() {
            entry.server_id = update.server_id;
        }
        if update.server_meal_id.is_some() {
            entry.server_meal_id = update.server_meal_id;
        }
        if update.server_food_entry_id.is_some() {
            entry.server_food_entry_id = update.server_food_entry_id;
        }
        let updated = entry.clone();

        self.save(&entries).await?;
        Ok(updated)
    }
}
