//! Contact form workflow
//!
//! Validation, the submission state machine, and delivery to the external
//! form endpoint.

pub mod controller;
pub mod form;
pub mod transport;
pub mod validation;

pub use controller::{ContactFormController, SubmitOutcome};
pub use form::{ContactForm, ContactFormState, FormPhase, SubmitStart, RETRY_MESSAGE, SUCCESS_MESSAGE};
pub use transport::{FormTransport, HttpFormTransport, TransportError};
pub use validation::{is_valid_email, validate, ContactFields, FieldErrors, FormField};
