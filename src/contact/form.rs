//! Contact form state machine
//!
//! Synchronous half of the workflow. `begin_submit` validates and moves the
//! form into `Submitting`; the caller performs the delivery and reports back
//! through `complete_submission`.

use serde::{Deserialize, Serialize};

use super::transport::TransportError;
use super::validation::{validate, ContactFields, FieldErrors, FormField};

pub const SUCCESS_MESSAGE: &str =
    "Thank you for contacting us! We've received your message and will get back to you shortly.";

pub const RETRY_MESSAGE: &str =
    "Sorry, something went wrong sending your message. Please try again, or call the pharmacy directly.";

/// Lifecycle phase of a contact form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormPhase {
    #[default]
    Idle,
    Validating,
    Submitting,
    Success,
    Error,
}

impl FormPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormPhase::Idle => "idle",
            FormPhase::Validating => "validating",
            FormPhase::Submitting => "submitting",
            FormPhase::Success => "success",
            FormPhase::Error => "error",
        }
    }

    /// Whether a submit attempt in this phase does anything
    pub fn accepts_submit(&self) -> bool {
        matches!(self, FormPhase::Idle | FormPhase::Error)
    }
}

/// Outcome of a submit attempt before any network activity
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitStart {
    /// Already submitting or already sent; nothing happened
    Ignored(FormPhase),
    /// Validation failed; errors are on the form
    Invalid(FieldErrors),
    /// Validation passed; deliver these fields and report back
    Ready(ContactFields),
}

/// Serializable snapshot of a form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactFormState {
    pub phase: FormPhase,
    pub field_errors: FieldErrors,
    pub server_message: Option<String>,
    pub fields: ContactFields,
    pub can_submit: bool,
}

/// One contact form instance
#[derive(Debug, Clone)]
pub struct ContactForm {
    fields: ContactFields,
    phase: FormPhase,
    field_errors: FieldErrors,
    server_message: Option<String>,
    history: Vec<FormPhase>,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactForm {
    pub fn new() -> Self {
        Self {
            fields: ContactFields::default(),
            phase: FormPhase::Idle,
            field_errors: FieldErrors::new(),
            server_message: None,
            history: vec![FormPhase::Idle],
        }
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn fields(&self) -> &ContactFields {
        &self.fields
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn server_message(&self) -> Option<&str> {
        self.server_message.as_deref()
    }

    /// Every phase entered since creation (or the last reset), in order
    pub fn phase_history(&self) -> &[FormPhase] {
        &self.history
    }

    pub fn can_submit(&self) -> bool {
        self.phase.accepts_submit()
    }

    fn enter(&mut self, phase: FormPhase) {
        tracing::debug!(from = self.phase.as_str(), to = phase.as_str(), "Contact form transition");
        self.phase = phase;
        self.history.push(phase);
    }

    /// Set a text field, clearing its error. Ignored while submitting.
    ///
    /// Returns whether the edit was applied. `Privacy` is not a text field;
    /// use [`ContactForm::set_privacy`].
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) -> bool {
        if self.phase == FormPhase::Submitting {
            return false;
        }
        let value = value.into();
        let slot = match field {
            FormField::Name => &mut self.fields.name,
            FormField::Email => &mut self.fields.email,
            FormField::Phone => &mut self.fields.phone,
            FormField::Reason => &mut self.fields.reason,
            FormField::Message => &mut self.fields.message,
            FormField::Privacy => return false,
        };
        *slot = value;
        self.field_errors.remove(&field);
        true
    }

    pub fn set_privacy(&mut self, accepted: bool) -> bool {
        if self.phase == FormPhase::Submitting {
            return false;
        }
        self.fields.privacy = accepted;
        self.field_errors.remove(&FormField::Privacy);
        true
    }

    /// Replace all fields at once. Ignored while submitting.
    pub fn load(&mut self, fields: ContactFields) -> bool {
        if self.phase == FormPhase::Submitting {
            return false;
        }
        self.fields = fields;
        self.field_errors.clear();
        true
    }

    /// Start a submission: validate, and on success move to `Submitting`
    pub fn begin_submit(&mut self) -> SubmitStart {
        if !self.can_submit() {
            tracing::debug!(phase = self.phase.as_str(), "Submit ignored");
            return SubmitStart::Ignored(self.phase);
        }

        self.enter(FormPhase::Validating);
        self.server_message = None;

        let errors = validate(&self.fields);
        if !errors.is_empty() {
            tracing::info!(invalid_fields = errors.len(), "Contact form failed validation");
            self.field_errors = errors.clone();
            self.enter(FormPhase::Idle);
            return SubmitStart::Invalid(errors);
        }

        self.field_errors.clear();
        self.enter(FormPhase::Submitting);
        SubmitStart::Ready(self.fields.clone())
    }

    /// Record the delivery outcome of the in-flight submission
    ///
    /// Returns false (and changes nothing) if no submission is in flight.
    pub fn complete_submission(&mut self, outcome: Result<(), TransportError>) -> bool {
        if self.phase != FormPhase::Submitting {
            tracing::warn!(phase = self.phase.as_str(), "Delivery outcome with no submission in flight");
            return false;
        }

        match outcome {
            Ok(()) => {
                self.fields = ContactFields::default();
                self.server_message = Some(SUCCESS_MESSAGE.to_string());
                self.enter(FormPhase::Success);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Contact form delivery failed");
                // Keep the user's input for the retry
                self.server_message = Some(RETRY_MESSAGE.to_string());
                self.enter(FormPhase::Error);
            }
        }
        true
    }

    /// Back to a blank idle form
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn state(&self) -> ContactFormState {
        ContactFormState {
            phase: self.phase,
            field_errors: self.field_errors.clone(),
            server_message: self.server_message.clone(),
            fields: self.fields.clone(),
            can_submit: self.can_submit(),
        }
    }
}
