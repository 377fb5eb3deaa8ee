//! Phone Number Classification
//!
//! Mobile numbers and landlines (with or without the area-code hyphen).
//! Input is expected to be whitespace-free already; see `strip_whitespace`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// 11 digits, `1` then `3`-`9`
const MOBILE_PATTERN: &str = r"^1[3-9][0-9]{9}$";
/// Area code of 3-4 digits led by `0`, optional hyphen, 7-8 digit subscriber number
const LANDLINE_PATTERN: &str = r"^0[0-9]{2,3}-?[0-9]{7,8}$";

/// Kind of phone number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhoneKind {
    #[serde(rename = "手机")]
    Mobile,
    #[serde(rename = "座机")]
    Landline,
    #[serde(rename = "无效")]
    Invalid,
}

impl PhoneKind {
    pub fn label(&self) -> &'static str {
        match self {
            PhoneKind::Mobile => "手机",
            PhoneKind::Landline => "座机",
            PhoneKind::Invalid => "无效",
        }
    }
}

/// Result of classifying a number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhoneValidation {
    pub is_valid: bool,
    pub kind: PhoneKind,
}

fn mobile_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(MOBILE_PATTERN).expect("mobile pattern is valid"))
}

fn landline_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(LANDLINE_PATTERN).expect("landline pattern is valid"))
}

/// Classify a phone number. Pure, no normalization.
pub fn validate(raw: &str) -> PhoneValidation {
    let kind = if mobile_regex().is_match(raw) {
        PhoneKind::Mobile
    } else if landline_regex().is_match(raw) {
        PhoneKind::Landline
    } else {
        PhoneKind::Invalid
    };

    PhoneValidation {
        is_valid: kind != PhoneKind::Invalid,
        kind,
    }
}

/// Remove every whitespace character, as the phone input does while typing
pub fn strip_whitespace(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}
