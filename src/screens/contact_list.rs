//! Contact List Screen
//!
//! Grid of contact cards. Tapping the avatar goes through the double-tap
//! gate; the call button dials straight away.

use std::sync::Arc;

use tap_dial_lib::commands;
use tap_dial_lib::dialing::TapOutcome;
use tap_dial_lib::domain::Contact;
use tap_dial_lib::AppState;

use super::Alert;
use crate::navigation::{EditParams, Navigator, Route};

/// What one card shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactCard {
    pub id: String,
    pub name: String,
    pub phone_number: String,
    pub avatar_uri: String,
    /// "未读" badge until the first tap completed
    pub new_badge: bool,
}

pub struct ContactListScreen {
    state: Arc<AppState>,
    navigator: Arc<dyn Navigator>,
    contacts: Vec<Contact>,
    alert: Option<Alert>,
}

impl ContactListScreen {
    pub fn new(state: Arc<AppState>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            state,
            navigator,
            contacts: Vec::new(),
            alert: None,
        }
    }

    /// Reload from storage whenever the screen becomes visible.
    /// Unreadable storage shows an empty list and an alert.
    pub async fn on_focus(&mut self) {
        match commands::list_contacts(&self.state).await {
            Ok(contacts) => self.contacts = contacts,
            Err(e) => {
                log::error!("加载联系人失败: {}", e);
                self.contacts.clear();
                self.alert = Some(Alert::from_error(&e, "加载联系人失败"));
            }
        }
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn cards(&self) -> Vec<ContactCard> {
        self.contacts
            .iter()
            .map(|c| ContactCard {
                id: c.id.clone(),
                name: c.name.clone(),
                phone_number: c.phone_number.clone(),
                avatar_uri: c.avatar_uri.clone(),
                new_badge: c.shows_new_badge(),
            })
            .collect()
    }

    pub async fn on_avatar_press(&mut self, id: &str) -> Option<TapOutcome> {
        match commands::tap_contact(&self.state, id).await {
            Ok(outcome) => {
                if outcome == TapOutcome::Armed {
                    if let Some(c) = self.contacts.iter_mut().find(|c| c.id == id) {
                        c.acknowledged = true;
                    }
                }
                Some(outcome)
            }
            Err(e) => {
                self.alert = Some(Alert::from_error(&e, "操作失败"));
                None
            }
        }
    }

    /// Returns the dial URL that was opened
    pub async fn on_call_press(&mut self, id: &str) -> Option<String> {
        match commands::call_contact(&self.state, id).await {
            Ok(url) => Some(url),
            Err(e) => {
                self.alert = Some(Alert::from_error(&e, "无法拨打电话"));
                None
            }
        }
    }

    pub fn open_add(&self) {
        self.navigator.push(Route::Add);
    }

    /// Open the edit screen with the card's current values
    pub fn open_edit(&self, id: &str) -> bool {
        match self.contacts.iter().find(|c| c.id == id) {
            Some(contact) => {
                self.navigator.push(Route::Edit(EditParams::from(contact)));
                true
            }
            None => false,
        }
    }

    pub fn take_alert(&mut self) -> Option<Alert> {
        self.alert.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::app;
    use tap_dial_lib::domain::ContactDraft;
    use tap_dial_lib::repository::{KeyValueStore, CONTACTS_STORAGE_KEY};

    async fn seed(state: &AppState, name: &str, phone: &str) -> Contact {
        let draft = ContactDraft {
            name: name.to_string(),
            phone_number: phone.to_string(),
            avatar_uri: None,
        };
        commands::add_contact(state, &draft).await.unwrap()
    }

    #[tokio::test]
    async fn test_focus_loads_cards_with_badges() {
        let t = app();
        seed(&t.state, "张三", "13800138000").await;
        let mut screen = ContactListScreen::new(t.state.clone(), t.nav.clone());

        screen.on_focus().await;
        let cards = screen.cards();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].name, "张三");
        assert!(cards[0].new_badge);
        assert!(screen.take_alert().is_none());
    }

    #[tokio::test]
    async fn test_corrupted_storage_shows_empty_list_and_alert() {
        let t = app();
        t.store.set_item(CONTACTS_STORAGE_KEY, "[{broken").await.unwrap();
        let mut screen = ContactListScreen::new(t.state.clone(), t.nav.clone());

        screen.on_focus().await;
        assert!(screen.contacts().is_empty());
        assert_eq!(screen.take_alert(), Some(Alert::new("错误", "加载联系人失败")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_avatar_double_tap_dials() {
        let t = app();
        let contact = seed(&t.state, "张三", "13800138000").await;
        let mut screen = ContactListScreen::new(t.state.clone(), t.nav.clone());
        screen.on_focus().await;

        t.device.clock.set(0);
        assert_eq!(screen.on_avatar_press(&contact.id).await, Some(TapOutcome::Armed));
        assert!(!screen.cards()[0].new_badge);

        t.device.clock.set(2000);
        assert_eq!(
            screen.on_avatar_press(&contact.id).await,
            Some(TapOutcome::Dialed { url: "tel:13800138000".to_string() })
        );
        assert_eq!(t.device.dialer.opened(), vec!["tel:13800138000"]);

        // The badge state was persisted, not just shown
        screen.on_focus().await;
        assert!(!screen.cards()[0].new_badge);
    }

    #[tokio::test]
    async fn test_call_button_and_unknown_contact() {
        let t = app();
        let contact = seed(&t.state, "李四", "010-12345678").await;
        let mut screen = ContactListScreen::new(t.state.clone(), t.nav.clone());
        screen.on_focus().await;

        assert_eq!(screen.on_call_press(&contact.id).await.as_deref(), Some("tel:010-12345678"));
        assert_eq!(screen.on_avatar_press("ghost").await, None);
        assert_eq!(screen.take_alert().map(|a| a.title), Some("错误".to_string()));
    }

    #[tokio::test]
    async fn test_navigation_to_add_and_edit() {
        let t = app();
        let contact = seed(&t.state, "张三", "13800138000").await;
        let mut screen = ContactListScreen::new(t.state.clone(), t.nav.clone());
        screen.on_focus().await;

        screen.open_add();
        assert_eq!(t.nav.current(), Route::Add);
        t.nav.back();

        assert!(screen.open_edit(&contact.id));
        match t.nav.current() {
            Route::Edit(params) => {
                assert_eq!(params.id, contact.id);
                assert_eq!(params.phone_number, "13800138000");
            }
            other => panic!("unexpected route {:?}", other),
        }
        assert!(!screen.open_edit("missing"));
    }
}
