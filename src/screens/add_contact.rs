//! Add Contact Screen

use std::sync::Arc;

use tap_dial_lib::commands;
use tap_dial_lib::domain::{Contact, DomainResult};
use tap_dial_lib::AppState;

use super::{Alert, ContactForm};
use crate::navigation::Navigator;

pub struct AddContactScreen {
    state: Arc<AppState>,
    navigator: Arc<dyn Navigator>,
    pub form: ContactForm,
    alert: Option<Alert>,
}

impl AddContactScreen {
    pub fn new(state: Arc<AppState>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            state,
            navigator,
            form: ContactForm::default(),
            alert: None,
        }
    }

    /// Validate and append. On success the screen closes; on failure it
    /// stays open with an alert and nothing is written.
    pub async fn save(&mut self) -> DomainResult<Contact> {
        match commands::add_contact(&self.state, &self.form.draft()).await {
            Ok(contact) => {
                self.alert = Some(Alert::new("成功", "联系人添加成功"));
                self.navigator.back();
                Ok(contact)
            }
            Err(e) => {
                self.alert = Some(Alert::from_error(&e, "保存联系人失败"));
                Err(e)
            }
        }
    }

    pub fn cancel(&self) {
        self.navigator.back();
    }

    pub fn take_alert(&mut self) -> Option<Alert> {
        self.alert.take()
    }
}
