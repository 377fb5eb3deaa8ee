//! Contact Entity
//!
//! A named phone number with an avatar, shown as a card on the list screen.

use super::entity::{DomainResult, Entity, ValidationError};
use super::phone::{self, PhoneKind};

/// Avatar used when the user never picked an image
pub const DEFAULT_AVATAR: &str = "asset://images/icon.png";

/// A contact record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    /// Opaque unique identifier, stable for the contact's lifetime
    pub id: String,
    /// Display name
    pub name: String,
    /// Number as typed (whitespace stripped)
    pub phone_number: String,
    /// Image reference
    pub avatar_uri: String,
    /// Whether the first informational tap has completed
    pub acknowledged: bool,
    /// Classification recorded when the number was saved
    pub phone_kind: Option<PhoneKind>,
}

impl Contact {
    /// Create a new contact. Fields are taken as-is; see `ContactDraft` for validation.
    pub fn new(id: String, name: String, phone_number: String, avatar_uri: Option<String>) -> Self {
        let phone_kind = Some(phone::validate(&phone_number).kind);
        Self {
            id,
            name,
            phone_number,
            avatar_uri: avatar_or_default(avatar_uri),
            acknowledged: false,
            phone_kind,
        }
    }

    /// The "new" badge is shown until the first tap completes
    pub fn shows_new_badge(&self) -> bool {
        !self.acknowledged
    }
}

impl Entity for Contact {
    type Id = String;
    type Patch = ContactPatch;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn apply(&mut self, patch: ContactPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(phone_number) = patch.phone_number {
            self.phone_kind = Some(phone::validate(&phone_number).kind);
            self.phone_number = phone_number;
        }
        if let Some(avatar) = patch.avatar_uri {
            self.avatar_uri = avatar_or_default(Some(avatar));
        }
        if let Some(acknowledged) = patch.acknowledged {
            self.acknowledged = acknowledged;
        }
    }
}

/// Partial update; `None` leaves the field alone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub avatar_uri: Option<String>,
    pub acknowledged: Option<bool>,
}

impl ContactPatch {
    pub fn acknowledge() -> Self {
        Self {
            acknowledged: Some(true),
            ..Default::default()
        }
    }
}

/// Raw form input from the add/edit screens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub phone_number: String,
    pub avatar_uri: Option<String>,
}

/// Draft that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDraft {
    pub name: String,
    pub phone_number: String,
    pub avatar_uri: Option<String>,
    pub phone_kind: PhoneKind,
}

impl ContactDraft {
    /// Trim the name, strip whitespace from the number and check both.
    pub fn validate(&self) -> DomainResult<ValidDraft> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }

        let phone_number = phone::strip_whitespace(&self.phone_number);
        if phone_number.is_empty() {
            return Err(ValidationError::EmptyPhone.into());
        }

        let validation = phone::validate(&phone_number);
        if !validation.is_valid {
            return Err(ValidationError::InvalidPhone(phone_number).into());
        }

        Ok(ValidDraft {
            name: name.to_string(),
            phone_number,
            avatar_uri: self.avatar_uri.clone().filter(|a| !a.trim().is_empty()),
            phone_kind: validation.kind,
        })
    }
}

impl ValidDraft {
    pub fn into_contact(self, id: String) -> Contact {
        Contact {
            id,
            name: self.name,
            phone_number: self.phone_number,
            avatar_uri: avatar_or_default(self.avatar_uri),
            acknowledged: false,
            phone_kind: Some(self.phone_kind),
        }
    }

    pub fn into_patch(self) -> ContactPatch {
        ContactPatch {
            name: Some(self.name),
            phone_number: Some(self.phone_number),
            avatar_uri: Some(self.avatar_uri.unwrap_or_default()),
            acknowledged: None,
        }
    }
}

fn avatar_or_default(avatar: Option<String>) -> String {
    match avatar {
        Some(a) if !a.trim().is_empty() => a,
        _ => DEFAULT_AVATAR.to_string(),
    }
}

/// Time-derived id (milliseconds), bumped past any id already taken
pub fn next_contact_id<'a>(now_ms: i64, existing: impl IntoIterator<Item = &'a str>) -> String {
    let taken: std::collections::HashSet<&str> = existing.into_iter().collect();
    let mut candidate = now_ms;
    loop {
        let id = candidate.to_string();
        if !taken.contains(id.as_str()) {
            return id;
        }
        candidate += 1;
    }
}
