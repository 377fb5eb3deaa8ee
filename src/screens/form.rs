//! Contact form fields shared by the add and edit screens

use tap_dial_lib::domain::phone::{self, PhoneKind};
use tap_dial_lib::domain::ContactDraft;

pub const PHONE_TIP: &str = "支持手机号（13812345678）或座机号（010-12345678）";
pub const PHONE_ERROR: &str = "请输入有效的手机号或座机号（如：13812345678 或 010-12345678）";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub phone_number: String,
    pub avatar: Option<String>,
    phone_error: Option<&'static str>,
}

impl ContactForm {
    pub fn new(name: &str, phone_number: &str, avatar: Option<String>) -> Self {
        let mut form = Self {
            name: name.to_string(),
            avatar,
            ..Default::default()
        };
        form.set_phone(phone_number);
        form
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Whitespace is dropped as the user types; an invalid non-empty number
    /// shows the error line under the field.
    pub fn set_phone(&mut self, text: &str) {
        self.phone_number = phone::strip_whitespace(text);
        let invalid = !phone::validate(&self.phone_number).is_valid;
        self.phone_error = if !self.phone_number.is_empty() && invalid {
            Some(PHONE_ERROR)
        } else {
            None
        };
    }

    pub fn set_avatar(&mut self, uri: &str) {
        self.avatar = Some(uri.to_string()).filter(|u| !u.trim().is_empty());
    }

    pub fn phone_error(&self) -> Option<&'static str> {
        self.phone_error
    }

    /// Line under the phone field
    pub fn phone_hint(&self) -> &'static str {
        self.phone_error.unwrap_or(PHONE_TIP)
    }

    pub fn phone_kind(&self) -> PhoneKind {
        phone::validate(&self.phone_number).kind
    }

    pub fn draft(&self) -> ContactDraft {
        ContactDraft {
            name: self.name.clone(),
            phone_number: self.phone_number.clone(),
            avatar_uri: self.avatar.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_input_is_cleaned_and_checked_live() {
        let mut form = ContactForm::default();
        assert_eq!(form.phone_hint(), PHONE_TIP);

        form.set_phone("138 0013");
        assert_eq!(form.phone_number, "1380013");
        assert_eq!(form.phone_error(), Some(PHONE_ERROR));

        form.set_phone("138 0013 8000");
        assert_eq!(form.phone_error(), None);
        assert_eq!(form.phone_kind(), PhoneKind::Mobile);

        form.set_phone("  ");
        assert_eq!(form.phone_error(), None);
    }

    #[test]
    fn test_blank_avatar_is_unset() {
        let mut form = ContactForm::default();
        form.set_avatar("file:///a.png");
        assert_eq!(form.avatar.as_deref(), Some("file:///a.png"));
        form.set_avatar(" ");
        assert_eq!(form.avatar, None);
    }
}
