//! Utility to send a test message through the contact form workflow
//!
//! Usage: send_test_contact <reply-to email> [message]
//! Reads the endpoint from RXHUB_FORM_ENDPOINT.

use std::sync::Arc;

use rxhub::config::{HubConfig, ENV_FORM_ENDPOINT};
use rxhub::contact::{ContactFields, ContactFormController, HttpFormTransport, SubmitOutcome};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("rxhub=debug"))
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let email = args.next().ok_or("usage: send_test_contact <reply-to email> [message]")?;
    let message = args
        .next()
        .unwrap_or_else(|| "Test submission from send_test_contact".to_string());

    let config = HubConfig::from_env()?;
    let form = config
        .form
        .ok_or_else(|| format!("{} is not set", ENV_FORM_ENDPOINT))?;
    println!("Endpoint: {}", form.endpoint);

    let transport = HttpFormTransport::new(&form)?;
    let controller = ContactFormController::new(Arc::new(transport));
    let outcome = controller
        .submit_with(ContactFields {
            name: "RxHub test".to_string(),
            email,
            reason: "test".to_string(),
            message,
            privacy: true,
            ..ContactFields::default()
        })
        .await;
    let state = controller.state().await;
    println!("Outcome: {:?}", outcome);
    println!("Phase:   {}", state.phase.as_str());
    if let Some(msg) = &state.server_message {
        println!("Message: {}", msg);
    }

    match outcome {
        SubmitOutcome::Delivered => Ok(()),
        SubmitOutcome::Invalid { field_errors } => {
            for (field, error) in &field_errors {
                eprintln!("  {}: {}", field.as_str(), error);
            }
            Err("submission failed validation".into())
        }
        _ => Err("submission was not delivered".into()),
    }
}
