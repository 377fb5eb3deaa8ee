//! Navigation
//!
//! Typed routes for the three screens. Routes travel as paths with a query
//! string (`/edit-contact?id=..&name=..`), so parameters are percent-encoded
//! on the way out and checked on the way in.

use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};
use std::collections::HashMap;
use std::sync::Mutex;

use tap_dial_lib::domain::{Contact, DomainResult, ValidationError};

/// Parameters the edit screen is opened with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditParams {
    pub id: String,
    pub name: String,
    pub phone_number: String,
    pub avatar: String,
}

impl From<&Contact> for EditParams {
    fn from(contact: &Contact) -> Self {
        Self {
            id: contact.id.clone(),
            name: contact.name.clone(),
            phone_number: contact.phone_number.clone(),
            avatar: contact.avatar_uri.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    List,
    Add,
    Edit(EditParams),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::List => "/contacts".to_string(),
            Route::Add => "/add-contact".to_string(),
            Route::Edit(p) => format!(
                "/edit-contact?id={}&name={}&phoneNumber={}&avatar={}",
                encode(&p.id),
                encode(&p.name),
                encode(&p.phone_number),
                encode(&p.avatar)
            ),
        }
    }

    /// Parse a route path. Unknown paths fall back to the list; an edit path
    /// without an id is rejected.
    pub fn parse(path: &str) -> DomainResult<Self> {
        let (base, query) = path.split_once('?').unwrap_or((path, ""));
        match base.trim_end_matches('/') {
            "/add-contact" => Ok(Route::Add),
            "/edit-contact" => {
                let params = parse_query(query);
                let id = params
                    .get("id")
                    .filter(|id| !id.is_empty())
                    .cloned()
                    .ok_or(ValidationError::MissingParam("id"))?;
                let field = |key: &str| params.get(key).cloned().unwrap_or_default();
                Ok(Route::Edit(EditParams {
                    id,
                    name: field("name"),
                    phone_number: field("phoneNumber"),
                    avatar: field("avatar"),
                }))
            }
            _ => Ok(Route::List),
        }
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = value.replace('+', " ");
            (
                percent_decode_str(key).decode_utf8_lossy().to_string(),
                percent_decode_str(&value).decode_utf8_lossy().to_string(),
            )
        })
        .collect()
}

/// Push/pop navigation service
pub trait Navigator: Send + Sync {
    fn push(&self, route: Route);

    /// Return to the previous screen
    fn back(&self);

    fn current(&self) -> Route;
}

/// Stack of routes, the list screen at the bottom
pub struct RouteStack {
    stack: Mutex<Vec<Route>>,
}

impl RouteStack {
    pub fn new() -> Self {
        Self {
            stack: Mutex::new(vec![Route::List]),
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl Default for RouteStack {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for RouteStack {
    fn push(&self, route: Route) {
        log::debug!("Navigate to {}", route.path());
        self.stack.lock().unwrap_or_else(|e| e.into_inner()).push(route);
    }

    fn back(&self) {
        let mut stack = self.stack.lock().unwrap_or_else(|e| e.into_inner());
        if stack.len() > 1 {
            stack.pop();
        }
    }

    fn current(&self) -> Route {
        self.stack
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
            .unwrap_or(Route::List)
    }
}
