//! Persisted Contact Shape
//!
//! JSON layout of one element of the contacts slot. Field names follow the
//! mobile app that first wrote this data, including the inverted
//! `isFirstClick` flag older builds stored instead of `acknowledged`.

use serde::{Deserialize, Serialize};

use crate::domain::{Contact, PhoneKind, DEFAULT_AVATAR};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    pub id: String,
    pub name: String,
    pub phone_number: String,
    #[serde(default, alias = "avatarUri")]
    pub avatar: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acknowledged: Option<bool>,
    #[serde(default, skip_serializing)]
    pub is_first_click: Option<bool>,
    #[serde(default, rename = "phoneType", skip_serializing_if = "Option::is_none")]
    pub phone_kind: Option<PhoneKind>,
}

impl From<ContactRecord> for Contact {
    fn from(record: ContactRecord) -> Self {
        let acknowledged = record
            .acknowledged
            .or(record.is_first_click.map(|first| !first))
            .unwrap_or(false);
        let avatar_uri = if record.avatar.trim().is_empty() {
            DEFAULT_AVATAR.to_string()
        } else {
            record.avatar
        };

        Contact {
            id: record.id,
            name: record.name,
            phone_number: record.phone_number,
            avatar_uri,
            acknowledged,
            phone_kind: record.phone_kind,
        }
    }
}

impl From<&Contact> for ContactRecord {
    fn from(contact: &Contact) -> Self {
        Self {
            id: contact.id.clone(),
            name: contact.name.clone(),
            phone_number: contact.phone_number.clone(),
            avatar: contact.avatar_uri.clone(),
            acknowledged: Some(contact.acknowledged),
            is_first_click: None,
            phone_kind: contact.phone_kind,
        }
    }
}
