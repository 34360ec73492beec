//! Delivery of contact form submissions
//!
//! The form-delivery service is an external HTTP endpoint: it accepts a
//! form-encoded POST and answers 2xx on success, or non-2xx with an optional
//! JSON `error` string.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::validation::ContactFields;
use crate::config::FormConfig;

/// Transport-level failure of a submission
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Submission rejected ({status}): {}", .message.as_deref().unwrap_or("no details"))]
    Rejected { status: u16, message: Option<String> },

    #[error("Submission abandoned before the endpoint answered")]
    Cancelled,
}

/// Sends a validated submission somewhere
#[async_trait]
pub trait FormTransport: Send + Sync {
    /// Short name for logging
    fn name(&self) -> &'static str;

    /// Deliver one submission; `Ok` means the endpoint accepted it
    async fn deliver(&self, fields: &ContactFields) -> Result<(), TransportError>;
}

/// Error body returned by the endpoint on failure
#[derive(Debug, Deserialize)]
struct EndpointReply {
    error: Option<String>,
}

/// Posts submissions to the form-delivery endpoint
pub struct HttpFormTransport {
    client: Client,
    endpoint: String,
    subject: String,
}

impl HttpFormTransport {
    pub fn new(config: &FormConfig) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            subject: config.subject.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Form-encoded body: the user's fields plus routing fields
    fn form_body<'a>(&'a self, fields: &'a ContactFields) -> Vec<(&'static str, &'a str)> {
        vec![
            ("name", fields.name.trim()),
            ("email", fields.email.trim()),
            ("phone", fields.phone.trim()),
            ("reason", fields.reason.trim()),
            ("message", fields.message.trim()),
            ("privacy", if fields.privacy { "true" } else { "false" }),
            ("_replyto", fields.email.trim()),
            ("_subject", self.subject.as_str()),
        ]
    }
}

/// Split connection-level failures from other client errors
fn classify(err: reqwest::Error) -> TransportError {
    if err.is_connect() || err.is_timeout() {
        TransportError::Network(err.to_string())
    } else {
        TransportError::Http(err)
    }
}

#[async_trait]
impl FormTransport for HttpFormTransport {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn deliver(&self, fields: &ContactFields) -> Result<(), TransportError> {
        tracing::debug!(endpoint = %self.endpoint, "Posting contact form submission");

        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .form(&self.form_body(fields))
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(status = %status, "Contact form submission accepted");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<EndpointReply>(&body)
            .ok()
            .and_then(|reply| reply.error);

        tracing::warn!(
            status = %status,
            error = message.as_deref().unwrap_or(""),
            "Contact form submission rejected"
        );

        Err(TransportError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
