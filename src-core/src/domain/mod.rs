//! Domain Layer
//!
//! Contains the contact entity, phone classification and core abstractions.
//! This layer has NO storage or device dependencies.

mod contact;
mod entity;
pub mod phone;

pub use contact::{next_contact_id, Contact, ContactDraft, ContactPatch, ValidDraft, DEFAULT_AVATAR};
pub use entity::{DomainError, DomainResult, Entity, ValidationError};
pub use phone::{PhoneKind, PhoneValidation};
