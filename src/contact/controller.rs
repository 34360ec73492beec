//! Async driver for a contact form
//!
//! Owns one [`ContactForm`] and the transport used to deliver it. The form
//! lock is never held across an await, so a second submit arriving
//! mid-flight sees `Submitting` and is ignored.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;

use super::form::{ContactForm, ContactFormState, SubmitStart};
use super::transport::{FormTransport, TransportError};
use super::validation::{ContactFields, FieldErrors};

/// What a call to [`ContactFormController::submit`] did
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// No-op: a submission was in flight or the form was already sent
    Ignored,
    /// Validation failed, nothing was sent
    Invalid { field_errors: FieldErrors },
    /// Endpoint accepted the submission
    Delivered,
    /// Network or endpoint failure; the input is kept for a retry
    Failed,
}

/// Lock the form; a panic in another holder does not wedge it
fn lock(form: &Mutex<ContactForm>) -> MutexGuard<'_, ContactForm> {
    form.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Moves the form to `Error` if a submit future is dropped mid-delivery
struct InFlight<'a> {
    form: &'a Mutex<ContactForm>,
    armed: bool,
}

impl InFlight<'_> {
    fn finish(mut self, result: Result<(), TransportError>) {
        self.armed = false;
        lock(self.form).complete_submission(result);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!("Contact form submission dropped before delivery completed");
            lock(self.form).complete_submission(Err(TransportError::Cancelled));
        }
    }
}

pub struct ContactFormController {
    form: Mutex<ContactForm>,
    transport: Arc<dyn FormTransport>,
}

impl ContactFormController {
    pub fn new(transport: Arc<dyn FormTransport>) -> Self {
        Self {
            form: Mutex::new(ContactForm::new()),
            transport,
        }
    }

    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }

    pub async fn state(&self) -> ContactFormState {
        lock(&self.form).state()
    }

    /// Apply edits to the form under its lock
    pub async fn edit<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut ContactForm) -> T,
    {
        f(&mut lock(&self.form))
    }

    /// Replace all field values; ignored while a submission is in flight
    pub async fn load(&self, fields: ContactFields) -> bool {
        lock(&self.form).load(fields)
    }

    pub async fn reset(&self) {
        lock(&self.form).reset();
    }

    /// Validate and, if valid, deliver the form as it stands
    pub async fn submit(&self) -> SubmitOutcome {
        let start = lock(&self.form).begin_submit();
        self.deliver(start).await
    }

    /// Load `fields` and submit them in one step
    ///
    /// The fields are only taken when the form accepts a submit, and no
    /// other caller can change them between loading and validation.
    pub async fn submit_with(&self, fields: ContactFields) -> SubmitOutcome {
        let start = {
            let mut form = lock(&self.form);
            if !form.can_submit() {
                SubmitStart::Ignored(form.phase())
            } else {
                form.load(fields);
                form.begin_submit()
            }
        };
        self.deliver(start).await
    }

    async fn deliver(&self, start: SubmitStart) -> SubmitOutcome {
        let fields = match start {
            SubmitStart::Ignored(_) => return SubmitOutcome::Ignored,
            SubmitStart::Invalid(field_errors) => return SubmitOutcome::Invalid { field_errors },
            SubmitStart::Ready(fields) => fields,
        };

        let guard = InFlight {
            form: &self.form,
            armed: true,
        };

        tracing::info!(transport = self.transport.name(), "Submitting contact form");
        let result = self.transport.deliver(&fields).await;
        let delivered = result.is_ok();
        guard.finish(result);

        if delivered {
            SubmitOutcome::Delivered
        } else {
            SubmitOutcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::form::FormPhase;
    use crate::contact::validation::FormField;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    /// Transport double: counts calls, records what it was given, and
    /// answers with a fixed outcome, optionally parking until released
    struct MockTransport {
        calls: AtomicUsize,
        delivered: std::sync::Mutex<Vec<ContactFields>>,
        fail: bool,
        hang: bool,
        gate: Option<(Notify, Notify)>,
    }

    impl MockTransport {
        fn build(fail: bool, hang: bool, gated: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                delivered: std::sync::Mutex::new(Vec::new()),
                fail,
                hang,
                gate: gated.then(|| (Notify::new(), Notify::new())),
            })
        }

        fn accepting() -> Arc<Self> {
            Self::build(false, false, false)
        }

        fn failing() -> Arc<Self> {
            Self::build(true, false, false)
        }

        fn gated() -> Arc<Self> {
            Self::build(false, false, true)
        }

        /// Signals entry, then never answers
        fn hanging() -> Arc<Self> {
            Self::build(false, true, true)
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn delivered(&self) -> Vec<ContactFields> {
            self.delivered.lock().unwrap().clone()
        }

        async fn wait_until_in_flight(&self) {
            if let Some((entered, _)) = &self.gate {
                entered.notified().await;
            }
        }

        fn release(&self) {
            if let Some((_, release)) = &self.gate {
                release.notify_one();
            }
        }
    }

    #[async_trait]
    impl FormTransport for MockTransport {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn deliver(&self, fields: &ContactFields) -> Result<(), TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.delivered.lock().unwrap().push(fields.clone());
            if let Some((entered, release)) = &self.gate {
                entered.notify_one();
                if self.hang {
                    std::future::pending::<()>().await;
                }
                release.notified().await;
            }
            if self.fail {
                Err(TransportError::Network("connection refused".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn valid_fields() -> ContactFields {
        ContactFields {
            name: "Dana Reyes".to_string(),
            email: "dana@example.com".to_string(),
            phone: "555-0100".to_string(),
            reason: "Prescription question".to_string(),
            message: "Can I transfer my prescription?".to_string(),
            privacy: true,
        }
    }

    #[tokio::test]
    async fn test_invalid_form_makes_no_network_call() {
        let transport = MockTransport::accepting();
        let controller = ContactFormController::new(transport.clone());
        controller
            .load(ContactFields { name: String::new(), privacy: false, ..valid_fields() })
            .await;

        match controller.submit().await {
            SubmitOutcome::Invalid { field_errors } => {
                assert!(field_errors.contains_key(&FormField::Name));
                assert!(field_errors.contains_key(&FormField::Privacy));
            }
            other => panic!("expected invalid, got {:?}", other),
        }
        assert_eq!(transport.calls(), 0);
        assert_ne!(controller.state().await.phase, FormPhase::Submitting);
    }

    #[tokio::test]
    async fn test_second_submit_while_in_flight_is_ignored() {
        let transport = MockTransport::gated();
        let controller = Arc::new(ContactFormController::new(transport.clone()));
        controller.load(valid_fields()).await;

        let first = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit().await })
        };

        transport.wait_until_in_flight().await;
        assert_eq!(controller.state().await.phase, FormPhase::Submitting);
        assert_eq!(controller.submit().await, SubmitOutcome::Ignored);

        transport.release();
        assert_eq!(first.await.unwrap(), SubmitOutcome::Delivered);
        assert_eq!(transport.calls(), 1);

        let history = controller.edit(|form| form.phase_history().to_vec()).await;
        assert_eq!(
            history,
            vec![FormPhase::Idle, FormPhase::Validating, FormPhase::Submitting, FormPhase::Success]
        );
    }

    #[tokio::test]
    async fn test_success_is_sticky_until_reset() {
        let transport = MockTransport::accepting();
        let controller = ContactFormController::new(transport.clone());
        controller.load(valid_fields()).await;

        assert_eq!(controller.submit().await, SubmitOutcome::Delivered);
        let state = controller.state().await;
        assert_eq!(state.phase, FormPhase::Success);
        assert!(state.fields.is_empty());

        controller.load(valid_fields()).await;
        assert_eq!(controller.submit().await, SubmitOutcome::Ignored);
        assert_eq!(transport.calls(), 1);

        controller.reset().await;
        controller.load(valid_fields()).await;
        assert_eq!(controller.submit().await, SubmitOutcome::Delivered);
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_network_failure_keeps_input() {
        let transport = MockTransport::failing();
        let controller = ContactFormController::new(transport.clone());
        controller.load(valid_fields()).await;

        assert_eq!(controller.submit().await, SubmitOutcome::Failed);
        let state = controller.state().await;
        assert_eq!(state.phase, FormPhase::Error);
        assert_eq!(state.fields, valid_fields());
        assert!(state.server_message.is_some());
        assert!(state.can_submit);

        // Retrying re-enters validation and calls the transport again
        assert_eq!(controller.submit().await, SubmitOutcome::Failed);
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_edit_through_controller() {
        let controller = ContactFormController::new(MockTransport::accepting());
        let applied = controller
            .edit(|form| form.set_field(FormField::Message, "Hours on Sunday?"))
            .await;
        assert!(applied);
        assert_eq!(controller.state().await.fields.message, "Hours on Sunday?");
        assert_eq!(controller.transport_name(), "mock");
    }

    #[tokio::test]
    async fn test_dropped_submit_leaves_form_retryable() {
        let transport = MockTransport::hanging();
        let controller = Arc::new(ContactFormController::new(transport.clone()));
        controller.load(valid_fields()).await;

        let pending = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit().await })
        };
        transport.wait_until_in_flight().await;
        assert_eq!(controller.state().await.phase, FormPhase::Submitting);

        pending.abort();
        assert!(pending.await.unwrap_err().is_cancelled());

        let state = controller.state().await;
        assert_eq!(state.phase, FormPhase::Error);
        assert!(state.can_submit);
        assert_eq!(state.fields, valid_fields());

        // The next submit reaches the transport again instead of being ignored
        let retry = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit().await })
        };
        transport.wait_until_in_flight().await;
        assert_eq!(transport.calls(), 2);
        retry.abort();
    }

    #[tokio::test]
    async fn test_submit_with_sends_exactly_the_given_fields() {
        let transport = MockTransport::gated();
        let controller = Arc::new(ContactFormController::new(transport.clone()));

        let first = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit_with(valid_fields()).await })
        };
        transport.wait_until_in_flight().await;

        // A second caller mid-flight neither sends nor replaces the fields
        let other = ContactFields { name: "Sam Ortiz".to_string(), ..valid_fields() };
        assert_eq!(controller.submit_with(other).await, SubmitOutcome::Ignored);
        assert_eq!(controller.state().await.fields, valid_fields());

        transport.release();
        assert_eq!(first.await.unwrap(), SubmitOutcome::Delivered);
        assert_eq!(transport.delivered(), vec![valid_fields()]);
    }

    #[tokio::test]
    async fn test_submit_with_after_success_keeps_form_cleared() {
        let transport = MockTransport::accepting();
        let controller = ContactFormController::new(transport.clone());

        assert_eq!(controller.submit_with(valid_fields()).await, SubmitOutcome::Delivered);
        assert_eq!(controller.submit_with(valid_fields()).await, SubmitOutcome::Ignored);
        assert!(controller.state().await.fields.is_empty());
        assert_eq!(transport.calls(), 1);
    }

    #[test]
    fn test_outcome_serializes_with_tag() {
        let json = serde_json::to_value(SubmitOutcome::Delivered).unwrap();
        assert_eq!(json["outcome"], "delivered");
    }
}
