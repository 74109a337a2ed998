// src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive] // Allows adding more variants later without breaking change
pub enum MailboxError {
  // --- Pool Errors ---
  #[error("Mailbox pool exhausted: all {pool_size} mailboxes are in use")]
  PoolExhausted { pool_size: usize },
  #[error("Mailbox slot {slot} was already released")]
  AlreadyReleased { slot: usize },
  #[error("Handle for mailbox slot {slot} is stale (the slot was released or re-acquired)")]
  StaleHandle { slot: usize },
  #[error("Mailbox handle does not belong to this pool")]
  ForeignHandle,

  // --- Configuration Errors ---
  #[error("Invalid pool configuration: {0}")]
  InvalidConfig(String),
  #[error("Global mailbox pool is already initialized with a different configuration")]
  AlreadyInitialized,

  // --- Channel Errors ---
  #[error("Operation timed out")]
  Timeout,
  #[error("Mailbox is full")]
  Full,
  #[error("Mailbox is empty")]
  Empty,
}

impl MailboxError {
  /// True for the errors a caller may reasonably retry after waiting
  /// (exhaustion, deadlines, non-blocking attempts).
  pub fn is_transient(&self) -> bool {
    matches!(
      self,
      MailboxError::PoolExhausted { .. } | MailboxError::Timeout | MailboxError::Full | MailboxError::Empty
    )
  }
}

/// Result alias used throughout the crate.
pub type Result<T, E = MailboxError> = std::result::Result<T, E>;
