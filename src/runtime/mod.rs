// src/runtime/mod.rs

//! Synchronization primitives: the counting semaphore and the bounded mailbox built on it.

pub mod mailbox;
pub mod semaphore;

pub(crate) use mailbox::Mailbox;
pub use mailbox::MailboxSnapshot;

// Sync Primitives
pub use semaphore::Semaphore;
