// src/pool/config.rs

use crate::error::MailboxError;

/// Number of mailboxes in a pool when none is specified.
pub const DEFAULT_POOL_SIZE: usize = 30;

/// Ring capacity used by [`PoolConfig::default`]: one result triple per mailbox.
pub const DEFAULT_MAILBOX_CAPACITY: usize = 1;

/// Shape of a [`MailboxPool`](crate::MailboxPool).
///
/// Both values are fixed for the lifetime of the pool: neither the number of
/// mailboxes nor their ring capacity ever grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
  /// How many mailboxes the pool holds (`N`).
  pub pool_size: usize,
  /// How many unread messages each mailbox can buffer before `send` blocks (`C`).
  pub mailbox_capacity: usize,
}

impl PoolConfig {
  pub fn new(pool_size: usize, mailbox_capacity: usize) -> Self {
    Self {
      pool_size,
      mailbox_capacity,
    }
  }

  pub fn with_pool_size(mut self, pool_size: usize) -> Self {
    self.pool_size = pool_size;
    self
  }

  pub fn with_mailbox_capacity(mut self, mailbox_capacity: usize) -> Self {
    self.mailbox_capacity = mailbox_capacity;
    self
  }

  /// Rejects shapes that could never hold a message.
  pub fn validate(&self) -> Result<(), MailboxError> {
    if self.pool_size == 0 {
      return Err(MailboxError::InvalidConfig("pool_size must be at least 1".into()));
    }
    if self.mailbox_capacity == 0 {
      return Err(MailboxError::InvalidConfig(
        "mailbox_capacity must be at least 1".into(),
      ));
    }
    Ok(())
  }
}

impl Default for PoolConfig {
  fn default() -> Self {
    Self {
      pool_size: DEFAULT_POOL_SIZE,
      mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
    }
  }
}
