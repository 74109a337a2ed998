// src/pool/mod.rs

//! Fixed-size mailbox pool.
//!
//! All mailboxes are configured once when the pool is built and are never
//! torn down or reconfigured afterwards. Each slot carries an explicit state
//! tag and a generation counter; free slots are tracked by index on a LIFO
//! stack guarded by its own mutex, so concurrent `acquire`/`release` calls
//! can never hand the same slot out twice.

pub mod config;
pub mod handle;

pub use config::{PoolConfig, DEFAULT_MAILBOX_CAPACITY, DEFAULT_POOL_SIZE};
pub use handle::MailboxHandle;

use crate::error::MailboxError;
use crate::runtime::Mailbox;

use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Pool-visible lifecycle state of a mailbox slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
  /// On the free-list; buffer contents are meaningless to the pool.
  Free,
  /// Handed out by `acquire` and not yet released.
  InUse,
}

#[derive(Debug)]
pub(crate) struct Slot {
  pub(crate) mailbox: Mailbox,
  /// Even while free, odd while in use; bumped on every acquire and release.
  /// A handle is live only while its generation equals the slot's.
  pub(crate) generation: AtomicU64,
}

#[derive(Debug)]
struct FreeList {
  /// Top of the stack is the last element.
  stack: Vec<usize>,
  states: Vec<SlotState>,
}

#[derive(Debug)]
pub(crate) struct PoolInner {
  config: PoolConfig,
  pub(crate) slots: Box<[Slot]>,
  free: Mutex<FreeList>,
}

/// A fixed set of reusable bounded mailboxes.
///
/// `MailboxPool` is a cheap, cloneable handle (`Arc`-based) to shared pool
/// state; pass it to every thread that needs to acquire or release mailboxes.
#[derive(Clone)]
pub struct MailboxPool {
  inner: Arc<PoolInner>,
}

impl MailboxPool {
  /// Builds the pool and configures every mailbox exactly once.
  ///
  /// Slot `pool_size - 1` ends up on top of the free-list, then
  /// `pool_size - 2`, down to slot 0.
  pub fn new(config: PoolConfig) -> Result<Self, MailboxError> {
    config.validate()?;

    let slots: Box<[Slot]> = (0..config.pool_size)
      .map(|_| Slot {
        mailbox: Mailbox::new(config.mailbox_capacity),
        generation: AtomicU64::new(0),
      })
      .collect();

    let free = FreeList {
      stack: (0..config.pool_size).collect(),
      states: vec![SlotState::Free; config.pool_size],
    };

    debug!(
      pool_size = config.pool_size,
      mailbox_capacity = config.mailbox_capacity,
      "Mailbox pool initialized"
    );

    Ok(Self {
      inner: Arc::new(PoolInner {
        config,
        slots,
        free: Mutex::new(free),
      }),
    })
  }

  /// Takes the most recently released (or highest-numbered unused) mailbox.
  ///
  /// The mailbox is handed out as-is: `acquire` does not drain messages a
  /// previous holder left behind.
  pub fn acquire(&self) -> Result<MailboxHandle, MailboxError> {
    let mut free = self.inner.free.lock();
    let Some(slot) = free.stack.pop() else {
      drop(free);
      warn!(pool_size = self.inner.config.pool_size, "Mailbox pool exhausted");
      return Err(MailboxError::PoolExhausted {
        pool_size: self.inner.config.pool_size,
      });
    };

    free.states[slot] = SlotState::InUse;
    let generation = self.inner.slots[slot].generation.fetch_add(1, Ordering::AcqRel) + 1;
    let remaining = free.stack.len();
    drop(free);

    trace!(slot, generation, remaining, "Mailbox acquired");
    Ok(MailboxHandle::new(self.inner.clone(), slot, generation))
  }

  /// Returns a mailbox to the top of the free-list.
  ///
  /// Rejects a handle from another pool, a slot that is already free, and a
  /// handle whose slot has since been re-acquired by someone else. Clones of
  /// the released handle become stale and their `send`/`receive` calls fail.
  pub fn release(&self, handle: MailboxHandle) -> Result<(), MailboxError> {
    if !Arc::ptr_eq(&handle.pool, &self.inner) {
      warn!(slot = handle.slot, "Attempted to release a mailbox from a different pool");
      return Err(MailboxError::ForeignHandle);
    }

    let slot = handle.slot;
    let mut free = self.inner.free.lock();
    if free.states[slot] == SlotState::Free {
      drop(free);
      warn!(slot, "Attempted to release a mailbox that is already free");
      return Err(MailboxError::AlreadyReleased { slot });
    }

    let entry = &self.inner.slots[slot];
    if entry.generation.load(Ordering::Acquire) != handle.generation {
      drop(free);
      warn!(slot, "Attempted to release a mailbox through a stale handle");
      return Err(MailboxError::StaleHandle { slot });
    }

    let pending = entry.mailbox.pending();
    if pending > 0 {
      warn!(slot, pending, "Releasing mailbox that still holds unread messages");
    }

    entry.generation.fetch_add(1, Ordering::AcqRel);
    free.states[slot] = SlotState::Free;
    free.stack.push(slot);
    trace!(slot, available = free.stack.len(), "Mailbox released");
    Ok(())
  }

  /// Number of mailboxes currently on the free-list.
  pub fn available(&self) -> usize {
    self.inner.free.lock().stack.len()
  }

  pub fn in_use(&self) -> usize {
    self.inner.config.pool_size - self.available()
  }

  pub fn pool_size(&self) -> usize {
    self.inner.config.pool_size
  }

  pub fn mailbox_capacity(&self) -> usize {
    self.inner.config.mailbox_capacity
  }

  pub fn config(&self) -> &PoolConfig {
    &self.inner.config
  }

  /// State of `slot`, or `None` if it is out of range.
  pub fn slot_state(&self, slot: usize) -> Option<SlotState> {
    self.inner.free.lock().states.get(slot).copied()
  }

  /// Whether `handle` was issued by this pool.
  pub fn owns(&self, handle: &MailboxHandle) -> bool {
    Arc::ptr_eq(&handle.pool, &self.inner)
  }
}

impl fmt::Debug for MailboxPool {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("MailboxPool")
      .field("config", &self.inner.config)
      .field("available", &self.available())
      .finish()
  }
}
