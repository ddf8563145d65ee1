// Store module — contact message identity and in-memory record keeping

pub mod backend;
pub mod message;

pub use backend::{MemoryMessageStore, MessageStore};
pub use message::{ContactMessage, MessageId, NewContactMessage};
