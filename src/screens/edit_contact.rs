//! Edit Contact Screen
//!
//! Opened from a card with the contact's current values as route
//! parameters. Saving replaces name, number and avatar; the id stays.

use std::sync::Arc;

use tap_dial_lib::commands;
use tap_dial_lib::domain::{DomainError, DomainResult};
use tap_dial_lib::AppState;

use super::{Alert, ContactForm};
use crate::navigation::{EditParams, Navigator, Route};

pub struct EditContactScreen {
    state: Arc<AppState>,
    navigator: Arc<dyn Navigator>,
    id: String,
    pub form: ContactForm,
    alert: Option<Alert>,
}

impl EditContactScreen {
    pub fn new(state: Arc<AppState>, navigator: Arc<dyn Navigator>, params: EditParams) -> Self {
        let avatar = Some(params.avatar).filter(|a| !a.is_empty());
        Self {
            state,
            navigator,
            form: ContactForm::new(&params.name, &params.phone_number, avatar),
            id: params.id,
            alert: None,
        }
    }

    /// Build from the current route; only an edit route carries the params.
    pub fn from_route(
        state: Arc<AppState>,
        navigator: Arc<dyn Navigator>,
        route: &Route,
    ) -> DomainResult<Self> {
        match route {
            Route::Edit(params) => Ok(Self::new(state, navigator, params.clone())),
            other => Err(DomainError::NotFound(format!("edit parameters on {}", other.path()))),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns whether a stored contact was changed. An id that vanished
    /// meanwhile is not an error; the screen just closes.
    pub async fn save(&mut self) -> DomainResult<bool> {
        match commands::update_contact(&self.state, &self.id, &self.form.draft()).await {
            Ok(updated) => {
                if updated {
                    self.alert = Some(Alert::new("成功", "联系人更新成功"));
                }
                self.navigator.back();
                Ok(updated)
            }
            Err(e) => {
                self.alert = Some(Alert::from_error(&e, "更新联系人失败"));
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
