//! Contact Repository Implementation
//!
//! Stores the whole contact list as one JSON array in a key-value slot.

use async_trait::async_trait;
use std::sync::Arc;

use super::contact_record::ContactRecord;
use super::traits::{KeyValueStore, Repository};
use crate::domain::{Contact, DomainError, DomainResult};

/// Slot the mobile app has always used
pub const CONTACTS_STORAGE_KEY: &str = "contacts_data";

pub struct ContactRepository {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl ContactRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, CONTACTS_STORAGE_KEY)
    }

    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl Repository<Contact> for ContactRepository {
    async fn load_all(&self) -> DomainResult<Vec<Contact>> {
        let Some(raw) = self.store.get_item(&self.key).await? else {
            return Ok(Vec::new());
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        let records: Vec<ContactRecord> = serde_json::from_str(&raw).map_err(|e| {
            log::error!("Contacts slot '{}' is unreadable: {}", self.key, e);
            DomainError::Deserialization(e.to_string())
        })?;
        Ok(records.into_iter().map(Contact::from).collect())
    }

    async fn save_all(&self, entities: &[Contact]) -> DomainResult<()> {
        let records: Vec<ContactRecord> = entities.iter().map(ContactRecord::from).collect();
        let raw = serde_json::to_string(&records)
            .map_err(|e| DomainError::Storage(format!("Failed to encode contacts: {}", e)))?;
        self.store.set_item(&self.key, &raw).await?;
        log::debug!("Saved {} contacts", entities.len());
        Ok(())
    }
}
