//! Screen Controllers
//!
//! State and event handlers behind the list, add and edit screens. Rendering
//! is left to the host; each controller exposes what to show and an optional
//! alert to pop up.

mod add_contact;
mod contact_list;
mod edit_contact;
mod form;

pub use add_contact::AddContactScreen;
pub use contact_list::{ContactCard, ContactListScreen};
pub use edit_contact::EditContactScreen;
pub use form::{ContactForm, PHONE_ERROR, PHONE_TIP};

use tap_dial_lib::domain::DomainError;

/// Modal message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Validation problems are prompts; everything else is an error with the
    /// screen's own wording.
    pub fn from_error(error: &DomainError, failure: &str) -> Self {
        match error {
            DomainError::Validation(v) => Alert::new("提示", v.to_string()),
            DomainError::Dialer(_) => Alert::new("错误", "无法拨打电话"),
            _ => Alert::new("错误", failure),
        }
    }
}
