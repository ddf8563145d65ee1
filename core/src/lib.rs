// Folio Core — contact message spine
//
// Everything the portfolio backend keeps lives here: the contact message
// store and the submission endpoint that feeds it. The HTTP layer in
// folio-cli only translates requests into calls on these types.

pub mod store;
pub mod submission;

use thiserror::Error;

pub use store::{ContactMessage, MemoryMessageStore, MessageId, MessageStore, NewContactMessage};
pub use submission::{Acknowledgment, ContactEndpoint};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Failures a message store can report.
///
/// None of these reach the submitter verbatim: the endpoint logs the
/// variant and answers with a generic failure acknowledgment.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Store capacity of {limit} messages exceeded")]
    CapacityExceeded { limit: usize },
}
