// src/pool/handle.rs

use crate::error::MailboxError;
use crate::message::Message;
use crate::pool::PoolInner;
use crate::runtime::{Mailbox, MailboxSnapshot};

use std::fmt;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

/// Shared access to one acquired mailbox.
///
/// Handles are cloneable so a coordinator can keep one copy and give another
/// to a worker; every clone talks to the same ring. Once the mailbox is
/// released, all clones become stale: their operations fail with
/// [`MailboxError::StaleHandle`] instead of touching a slot that may already
/// belong to a new holder.
///
/// A `send` or `receive` that is already blocked when the mailbox is released
/// is not interrupted; releasing a mailbox other holders still use is a
/// caller error.
#[derive(Clone)]
pub struct MailboxHandle {
  pub(crate) pool: Arc<PoolInner>,
  pub(crate) slot: usize,
  pub(crate) generation: u64,
}

impl MailboxHandle {
  pub(crate) fn new(pool: Arc<PoolInner>, slot: usize, generation: u64) -> Self {
    Self { pool, slot, generation }
  }

  /// Index of the pool slot this handle refers to.
  pub fn slot(&self) -> usize {
    self.slot
  }

  pub fn capacity(&self) -> usize {
    self.pool.slots[self.slot].mailbox.capacity()
  }

  /// `false` once the mailbox has been released through any clone.
  pub fn is_live(&self) -> bool {
    self.pool.slots[self.slot].generation.load(Ordering::Acquire) == self.generation
  }

  fn mailbox(&self) -> Result<&Mailbox, MailboxError> {
    if !self.is_live() {
      tracing::warn!(slot = self.slot, "Mailbox used through a stale handle");
      return Err(MailboxError::StaleHandle { slot: self.slot });
    }
    Ok(&self.pool.slots[self.slot].mailbox)
  }

  /// Enqueues a message, blocking while the mailbox is full.
  pub fn send(&self, msg: impl Into<Message>) -> Result<(), MailboxError> {
    let msg = msg.into();
    self.mailbox()?.send(msg);
    tracing::trace!(slot = self.slot, ?msg, "Mailbox send");
    Ok(())
  }

  /// Dequeues the oldest message, blocking while the mailbox is empty.
  pub fn receive(&self) -> Result<Message, MailboxError> {
    let msg = self.mailbox()?.receive();
    tracing::trace!(slot = self.slot, ?msg, "Mailbox receive");
    Ok(msg)
  }

  /// `send` with a deadline on waiting for space. On [`MailboxError::Timeout`]
  /// nothing was enqueued.
  pub fn send_timeout(&self, msg: impl Into<Message>, timeout: Duration) -> Result<(), MailboxError> {
    if self.mailbox()?.send_timeout(msg.into(), timeout) {
      Ok(())
    } else {
      Err(MailboxError::Timeout)
    }
  }

  /// `receive` with a deadline on waiting for a message.
  pub fn receive_timeout(&self, timeout: Duration) -> Result<Message, MailboxError> {
    self.mailbox()?.receive_timeout(timeout).ok_or(MailboxError::Timeout)
  }

  /// Enqueues only if there is room right now, else [`MailboxError::Full`].
  pub fn try_send(&self, msg: impl Into<Message>) -> Result<(), MailboxError> {
    if self.mailbox()?.try_send(msg.into()) {
      Ok(())
    } else {
      Err(MailboxError::Full)
    }
  }

  /// Dequeues only if a message is waiting, else [`MailboxError::Empty`].
  pub fn try_receive(&self) -> Result<Message, MailboxError> {
    self.mailbox()?.try_receive().ok_or(MailboxError::Empty)
  }

  /// Async `send`: suspends the task rather than the thread while full.
  ///
  /// Dropping the future while it waits for space enqueues nothing.
  pub async fn send_async(&self, msg: impl Into<Message>) -> Result<(), MailboxError> {
    let msg = msg.into();
    self.mailbox()?.send_async(msg).await;
    tracing::trace!(slot = self.slot, ?msg, "Mailbox send (async)");
    Ok(())
  }

  /// Async `receive`: suspends the task rather than the thread while empty.
  ///
  /// Dropping the future while it waits consumes nothing.
  pub async fn receive_async(&self) -> Result<Message, MailboxError> {
    let msg = self.mailbox()?.receive_async().await;
    tracing::trace!(slot = self.slot, ?msg, "Mailbox receive (async)");
    Ok(msg)
  }

  /// Counters and ring indices, for diagnostics and tests.
  pub fn snapshot(&self) -> Result<MailboxSnapshot, MailboxError> {
    Ok(self.mailbox()?.snapshot())
  }
}

impl PartialEq for MailboxHandle {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.pool, &other.pool) && self.slot == other.slot && self.generation == other.generation
  }
}

impl Eq for MailboxHandle {}

impl fmt::Debug for MailboxHandle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("MailboxHandle")
      .field("slot", &self.slot)
      .field("generation", &self.generation)
      .finish_non_exhaustive()
  }
}
