// Storage abstraction for contact messages
//
// The store assigns identity and timestamps itself; callers only ever hand
// over the three form fields and get clones back.

use crate::store::message::{ContactMessage, MessageId, NewContactMessage};
use crate::StoreError;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Record keeping for contact form submissions.
#[cfg_attr(test, mockall::automock)]
pub trait MessageStore: Send + Sync {
    /// Record a new message with a fresh id and the current time.
    fn create(&self, input: NewContactMessage) -> Result<ContactMessage, StoreError>;

    /// All messages, most recent first.
    fn list(&self) -> Result<Vec<ContactMessage>, StoreError>;

    /// The message with `id`, or `None` if no such message was ever created.
    fn get(&self, id: &MessageId) -> Result<Option<ContactMessage>, StoreError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Default)]
struct Messages {
    // Creation order. Never reordered or shrunk.
    entries: Vec<ContactMessage>,
    index: HashMap<MessageId, usize>,
}

/// Process-lifetime in-memory store.
///
/// Cloning yields another handle onto the same collection.
#[derive(Clone, Default)]
pub struct MemoryMessageStore {
    data: Arc<RwLock<Messages>>,
    capacity: Option<usize>,
}

impl MemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that refuses new messages once it holds `limit` of them.
    pub fn bounded(limit: usize) -> Self {
        Self {
            data: Arc::default(),
            capacity: Some(limit),
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }
}

impl MessageStore for MemoryMessageStore {
    fn create(&self, input: NewContactMessage) -> Result<ContactMessage, StoreError> {
        let mut data = self.data.write();

        if let Some(limit) = self.capacity {
            if data.entries.len() >= limit {
                return Err(StoreError::CapacityExceeded { limit });
            }
        }

        let id = loop {
            let candidate = MessageId::generate();
            if !data.index.contains_key(&candidate) {
                break candidate;
            }
        };

        // Stamped under the write lock so creation order and timestamps agree
        let message = ContactMessage::record(id, input, Utc::now());
        let position = data.entries.len();
        data.entries.push(message.clone());
        data.index.insert(id, position);

        Ok(message)
    }

    fn list(&self) -> Result<Vec<ContactMessage>, StoreError> {
        let mut messages: Vec<ContactMessage> =
            self.data.read().entries.iter().rev().cloned().collect();
        // Stable: equal timestamps stay newest-created first
        messages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(messages)
    }

    fn get(&self, id: &MessageId) -> Result<Option<ContactMessage>, StoreError> {
        let data = self.data.read();
        Ok(data
            .index
            .get(id)
            .and_then(|&position| data.entries.get(position))
            .cloned())
    }

    fn len(&self) -> usize {
        self.data.read().entries.len()
    }
}
