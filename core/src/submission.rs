// Contact form submission endpoint
//
// Bridges an inbound contact form to the message store. Store failures are
// logged here and answered with a fixed, apologetic acknowledgment.

use crate::store::{MessageStore, NewContactMessage};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const ACCEPTED_MESSAGE: &str = "Message sent successfully. We'll get back to you soon!";
pub const FAILED_MESSAGE: &str = "Failed to send message. Please try again later.";
pub const INVALID_MESSAGE: &str = "Invalid contact form submission.";

/// Outcome of a submission as reported to the submitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgment {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Acknowledgment {
    pub fn accepted() -> Self {
        Self {
            success: true,
            message: Some(ACCEPTED_MESSAGE.to_string()),
            error: None,
        }
    }

    pub fn failed() -> Self {
        Self::rejected(FAILED_MESSAGE)
    }

    /// The payload never reached the store because it had the wrong shape.
    pub fn invalid() -> Self {
        Self::rejected(INVALID_MESSAGE)
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(reason.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Human-readable status line, whichever way the submission went.
    pub fn status_text(&self) -> &str {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Clone)]
pub struct ContactEndpoint {
    store: Arc<dyn MessageStore>,
}

impl ContactEndpoint {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn MessageStore> {
        &self.store
    }

    /// Record a contact form submission. Never retries.
    pub fn submit(&self, payload: NewContactMessage) -> Acknowledgment {
        match self.store.create(payload) {
            Ok(message) => {
                tracing::info!(id = %message.id, "Contact message received");
                Acknowledgment::accepted()
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to store contact message");
                Acknowledgment::failed()
            }
        }
    }
}
