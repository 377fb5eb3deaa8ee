//! Contact CRUD Commands

use crate::domain::{next_contact_id, Contact, ContactDraft, DomainError, DomainResult};
use crate::repository::Repository;
use crate::AppState;

/// List all contacts in insertion order
pub async fn list_contacts(state: &AppState) -> DomainResult<Vec<Contact>> {
    state.repo.load_all().await
}

/// Get contact by ID
pub async fn get_contact(state: &AppState, id: &str) -> DomainResult<Contact> {
    state
        .repo
        .find_by_id(&id.to_string())
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("contact {}", id)))
}

/// Validate the draft and append it with a fresh id.
/// Nothing is written when validation fails.
pub async fn add_contact(state: &AppState, draft: &ContactDraft) -> DomainResult<Contact> {
    let valid = draft.validate()?;

    let existing = state.repo.load_all().await?;
    let id = next_contact_id(
        state.clock.now_ms() as i64,
        existing.iter().map(|c| c.id.as_str()),
    );
    let contact = valid.into_contact(id);
    state.repo.add(&contact).await?;

    log::info!("Added contact {} ({:?})", contact.id, contact.phone_kind);
    Ok(contact)
}

/// Validate the draft and replace name, number and avatar of `id`.
/// Returns `false` when no contact has that id.
pub async fn update_contact(
    state: &AppState,
    id: &str,
    draft: &ContactDraft,
) -> DomainResult<bool> {
    let valid = draft.validate()?;
    let updated = state.repo.update(&id.to_string(), valid.into_patch()).await?;
    if !updated {
        log::warn!("Update of unknown contact {} ignored", id);
    }
    Ok(updated)
}

/// Drop every contact
pub async fn reset_contacts(state: &AppState) -> DomainResult<()> {
    log::warn!("Resetting contact list");
    state.repo.reset().await
}
