// src/runtime/mailbox.rs

//! The bounded ring buffer at the heart of every pool slot.
//!
//! A `Mailbox` is a classic producer/consumer buffer guarded by three
//! semaphores:
//! - `space_available` counts free ring slots (starts at capacity),
//! - `items_available` counts unread messages (starts at zero),
//! - `mutex` is a binary semaphore serializing access to the ring indices.
//!
//! `send` takes a space permit, enters the critical section, writes at `in`,
//! leaves, then publishes an item permit. `receive` mirrors it. Any number of
//! senders and receivers may share one mailbox.

use crate::message::Message;
use crate::runtime::semaphore::Semaphore;

use std::cell::UnsafeCell;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::time::Duration;

/// Point-in-time view of a mailbox's counters and ring indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MailboxSnapshot {
  pub capacity: usize,
  pub items_available: usize,
  pub space_available: usize,
  pub in_index: usize,
  pub out_index: usize,
}

impl MailboxSnapshot {
  /// Number of unread messages according to the ring indices.
  pub fn occupancy(&self) -> usize {
    if self.items_available == self.capacity {
      self.capacity
    } else {
      (self.in_index + self.capacity - self.out_index) % self.capacity
    }
  }
}

struct Ring {
  buffer: Box<[Message]>,
  in_index: usize,
  out_index: usize,
}

impl Ring {
  fn push(&mut self, msg: Message) {
    self.buffer[self.in_index] = msg;
    self.in_index = (self.in_index + 1) % self.buffer.len();
  }

  fn pop(&mut self) -> Message {
    let msg = self.buffer[self.out_index];
    self.out_index = (self.out_index + 1) % self.buffer.len();
    msg
  }
}

pub(crate) struct Mailbox {
  capacity: usize,
  ring: UnsafeCell<Ring>,
  items_available: Semaphore,
  space_available: Semaphore,
  mutex: Semaphore,
}

// SAFETY: the ring is only reachable through `CriticalSection`, and a
// `CriticalSection` only exists while its holder owns the single permit of
// `mutex`. All other fields are `Sync` on their own.
unsafe impl Sync for Mailbox {}

/// Exclusive access to the ring, released (mutex signalled) on drop.
struct CriticalSection<'a> {
  mailbox: &'a Mailbox,
}

impl Deref for CriticalSection<'_> {
  type Target = Ring;

  fn deref(&self) -> &Ring {
    // SAFETY: we hold the mutex permit, see `unsafe impl Sync for Mailbox`.
    unsafe { &*self.mailbox.ring.get() }
  }
}

impl DerefMut for CriticalSection<'_> {
  fn deref_mut(&mut self) -> &mut Ring {
    // SAFETY: as above; the permit makes this the only live reference.
    unsafe { &mut *self.mailbox.ring.get() }
  }
}

impl Drop for CriticalSection<'_> {
  fn drop(&mut self) {
    self.mailbox.mutex.signal();
  }
}

impl Mailbox {
  /// Configures an empty mailbox: `in`/`out` at zero, semaphores at
  /// (items 0, space `capacity`, mutex 1).
  pub(crate) fn new(capacity: usize) -> Self {
    debug_assert!(capacity > 0, "mailbox capacity must be positive");
    Self {
      capacity,
      ring: UnsafeCell::new(Ring {
        buffer: vec![Message::default(); capacity].into_boxed_slice(),
        in_index: 0,
        out_index: 0,
      }),
      items_available: Semaphore::new(0),
      space_available: Semaphore::new(capacity),
      mutex: Semaphore::new(1),
    }
  }

  fn enter(&self) -> CriticalSection<'_> {
    self.mutex.wait();
    CriticalSection { mailbox: self }
  }

  pub(crate) fn capacity(&self) -> usize {
    self.capacity
  }

  /// Unread messages, read without entering the critical section.
  pub(crate) fn pending(&self) -> usize {
    self.items_available.available()
  }

  /// Enqueues `msg`, blocking while the ring is full.
  pub(crate) fn send(&self, msg: Message) {
    self.space_available.wait();
    self.commit_send(msg);
  }

  /// Dequeues the oldest message, blocking while the ring is empty.
  pub(crate) fn receive(&self) -> Message {
    self.items_available.wait();
    self.commit_receive()
  }

  /// Returns `false` if no space appeared within `timeout`; nothing is written then.
  pub(crate) fn send_timeout(&self, msg: Message, timeout: Duration) -> bool {
    if !self.space_available.wait_timeout(timeout) {
      return false;
    }
    self.commit_send(msg);
    true
  }

  pub(crate) fn receive_timeout(&self, timeout: Duration) -> Option<Message> {
    if !self.items_available.wait_timeout(timeout) {
      return None;
    }
    Some(self.commit_receive())
  }

  pub(crate) fn try_send(&self, msg: Message) -> bool {
    if !self.space_available.try_wait() {
      return false;
    }
    self.commit_send(msg);
    true
  }

  pub(crate) fn try_receive(&self) -> Option<Message> {
    if !self.items_available.try_wait() {
      return None;
    }
    Some(self.commit_receive())
  }

  /// Async `send`: only the wait for space suspends. Once space is taken the
  /// rest runs without an await point, so cancellation can never strand a permit.
  pub(crate) async fn send_async(&self, msg: Message) {
    self.space_available.wait_async().await;
    self.commit_send(msg);
  }

  pub(crate) async fn receive_async(&self) -> Message {
    self.items_available.wait_async().await;
    self.commit_receive()
  }

  fn commit_send(&self, msg: Message) {
    {
      let mut ring = self.enter();
      ring.push(msg);
    }
    self.items_available.signal();
  }

  fn commit_receive(&self) -> Message {
    let msg = {
      let mut ring = self.enter();
      ring.pop()
    };
    self.space_available.signal();
    msg
  }

  /// Reads indices inside the critical section; counters may lag by one
  /// in-flight operation if other callers are active.
  pub(crate) fn snapshot(&self) -> MailboxSnapshot {
    let ring = self.enter();
    MailboxSnapshot {
      capacity: self.capacity,
      items_available: self.items_available.available(),
      space_available: self.space_available.available(),
      in_index: ring.in_index,
      out_index: ring.out_index,
    }
  }
}

impl fmt::Debug for Mailbox {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Mailbox")
      .field("capacity", &self.capacity)
      .field("items_available", &self.items_available.available())
      .field("space_available", &self.space_available.available())
      .finish_non_exhaustive()
  }
}
