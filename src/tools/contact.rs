//! Contact Form MCP Tools
//!
//! Drive the shared contact form on behalf of a site visitor.

use serde::Serialize;

use crate::contact::{ContactFields, ContactFormController, ContactFormState, SubmitOutcome};

/// Response for submit_contact_form
#[derive(Debug, Serialize)]
pub struct SubmitContactResponse {
    #[serde(flatten)]
    pub outcome: SubmitOutcome,
    pub message: String,
    pub state: ContactFormState,
}

// ============================================================================
// Tool Functions
// ============================================================================

/// Load the visitor's fields into the form and submit it
///
/// Loading and validation happen under one lock, so the outcome always
/// describes the fields passed in. An in-flight or already-sent form is
/// left untouched.
pub async fn submit_contact_form(
    controller: &ContactFormController,
    fields: ContactFields,
) -> SubmitContactResponse {
    let outcome = controller.submit_with(fields).await;
    let state = controller.state().await;

    let message = match &outcome {
        SubmitOutcome::Ignored => match state.phase {
            crate::contact::FormPhase::Success => {
                "This message was already sent. Reset the form to send another.".to_string()
            }
            _ => "A submission is already in progress.".to_string(),
        },
        SubmitOutcome::Invalid { field_errors } => format!(
            "Please correct {} field(s): {}",
            field_errors.len(),
            field_errors.keys().map(|f| f.as_str()).collect::<Vec<_>>().join(", ")
        ),
        SubmitOutcome::Delivered | SubmitOutcome::Failed => {
            state.server_message.clone().unwrap_or_default()
        }
    };

    SubmitContactResponse {
        outcome,
        message,
        state,
    }
}

pub async fn get_contact_form_state(controller: &ContactFormController) -> ContactFormState {
    controller.state().await
}

pub async fn reset_contact_form(controller: &ContactFormController) -> ContactFormState {
    controller.reset().await;
    controller.state().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::{FormPhase, FormTransport, TransportError};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Outcome(bool);

    #[async_trait]
    impl FormTransport for Outcome {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn deliver(&self, _fields: &ContactFields) -> Result<(), TransportError> {
            if self.0 {
                Ok(())
            } else {
                Err(TransportError::Rejected { status: 503, message: None })
            }
        }
    }

    fn fields() -> ContactFields {
        ContactFields {
            name: "Dana Reyes".to_string(),
            email: "dana@example.com".to_string(),
            message: "Do you deliver?".to_string(),
            privacy: true,
            ..ContactFields::default()
        }
    }

    #[tokio::test]
    async fn test_submit_then_already_sent() {
        let controller = ContactFormController::new(Arc::new(Outcome(true)));

        let first = submit_contact_form(&controller, fields()).await;
        assert_eq!(first.outcome, SubmitOutcome::Delivered);
        assert_eq!(first.state.phase, FormPhase::Success);

        let second = submit_contact_form(&controller, fields()).await;
        assert_eq!(second.outcome, SubmitOutcome::Ignored);
        assert!(second.message.contains("already sent"));
        // Sticky success did not take the new input
        assert!(second.state.fields.is_empty());

        let state = reset_contact_form(&controller).await;
        assert_eq!(state.phase, FormPhase::Idle);
    }

    #[tokio::test]
    async fn test_invalid_lists_fields() {
        let controller = ContactFormController::new(Arc::new(Outcome(true)));
        let resp = submit_contact_form(&controller, ContactFields::default()).await;
        assert!(matches!(resp.outcome, SubmitOutcome::Invalid { .. }));
        assert!(resp.message.contains("name"));
        assert!(resp.message.contains("privacy"));
    }

    #[tokio::test]
    async fn test_rejected_keeps_fields() {
        let controller = ContactFormController::new(Arc::new(Outcome(false)));
        let resp = submit_contact_form(&controller, fields()).await;
        assert_eq!(resp.outcome, SubmitOutcome::Failed);
        assert_eq!(resp.state.fields, fields());
        assert_eq!(get_contact_form_state(&controller).await.phase, FormPhase::Error);

        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["outcome"], "failed");
    }
}
