//! Contact form fields and local validation

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Field identifiers, used as keys for per-field errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormField {
    Name,
    Email,
    Phone,
    Reason,
    Message,
    Privacy,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Email => "email",
            FormField::Phone => "phone",
            FormField::Reason => "reason",
            FormField::Message => "message",
            FormField::Privacy => "privacy",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "name" => Some(FormField::Name),
            "email" => Some(FormField::Email),
            "phone" => Some(FormField::Phone),
            "reason" => Some(FormField::Reason),
            "message" => Some(FormField::Message),
            "privacy" => Some(FormField::Privacy),
            _ => None,
        }
    }
}

/// Per-field validation messages
pub type FieldErrors = BTreeMap<FormField, String>;

/// Values entered into the contact form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    /// Reason for contact, free text from a dropdown
    #[serde(default)]
    pub reason: String,
    pub message: String,
    /// Privacy policy consent checkbox
    #[serde(default)]
    pub privacy: bool,
}

impl ContactFields {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Basic `local@domain.tld` shape check
///
/// Not an RFC 5322 parser. Rejects whitespace, missing parts, and a
/// domain without a dot-separated suffix.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    // At least host.tld, and no empty label anywhere
    domain.contains('.') && domain.split('.').all(|label| !label.is_empty())
}

/// Validate required fields, returning an error per failing field
///
/// Phone and reason are optional and never produce errors.
pub fn validate(fields: &ContactFields) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if fields.name.trim().is_empty() {
        errors.insert(FormField::Name, "Please enter your name".to_string());
    }

    if fields.email.trim().is_empty() {
        errors.insert(FormField::Email, "Please enter your email".to_string());
    } else if !is_valid_email(&fields.email) {
        errors.insert(FormField::Email, "Please enter a valid email address".to_string());
    }

    if fields.message.trim().is_empty() {
        errors.insert(FormField::Message, "Please enter a message".to_string());
    }

    if !fields.privacy {
        errors.insert(FormField::Privacy, "You must agree to the privacy policy".to_string());
    }

    errors
}
