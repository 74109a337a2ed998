// src/runtime/semaphore.rs

use parking_lot::{Condvar, Mutex};
use std::pin::pin;
use std::time::{Duration, Instant};
use tokio::sync::Notify;

/// A counting semaphore usable from both OS threads and async tasks.
///
/// `wait` blocks the calling thread until the count is positive and then
/// decrements it; `signal` increments the count and wakes a waiter.
/// `wait_async` suspends a task instead of parking the thread, so a tokio
/// coordinator can share a mailbox with plain worker threads.
///
/// Waiters are not queued fairly: whoever observes a positive count first
/// takes the permit, and a woken waiter that lost the race waits again.
#[derive(Debug)]
pub struct Semaphore {
  count: Mutex<usize>,
  condvar: Condvar,
  notify: Notify,
}

impl Semaphore {
  /// Creates a semaphore holding `initial` permits.
  pub fn new(initial: usize) -> Self {
    Self {
      count: Mutex::new(initial),
      condvar: Condvar::new(),
      notify: Notify::new(),
    }
  }

  /// Blocks the current thread until a permit is available, then takes it.
  pub fn wait(&self) {
    let mut count = self.count.lock();
    while *count == 0 {
      self.condvar.wait(&mut count);
    }
    *count -= 1;
  }

  /// Like [`wait`](Self::wait) but gives up after `timeout`.
  ///
  /// Returns `true` if a permit was taken, `false` if the deadline passed
  /// first (in which case the count is untouched). A timeout too large to
  /// express as a deadline waits without one.
  pub fn wait_timeout(&self, timeout: Duration) -> bool {
    let Some(deadline) = Instant::now().checked_add(timeout) else {
      self.wait();
      return true;
    };
    let mut count = self.count.lock();
    while *count == 0 {
      if self.condvar.wait_until(&mut count, deadline).timed_out() {
        if *count == 0 {
          return false;
        }
        break;
      }
    }
    *count -= 1;
    true
  }

  /// Takes a permit if one is available right now.
  pub fn try_wait(&self) -> bool {
    let mut count = self.count.lock();
    if *count == 0 {
      return false;
    }
    *count -= 1;
    true
  }

  /// Suspends the current task until a permit is available, then takes it.
  ///
  /// Dropping the future before it completes takes nothing; a wake-up it
  /// had already received is passed on to the next async waiter.
  pub async fn wait_async(&self) {
    loop {
      // Register interest before checking the count so a signal issued in
      // between is not lost.
      let mut notified = pin!(self.notify.notified());
      notified.as_mut().enable();

      if self.try_wait() {
        return;
      }
      notified.await;
    }
  }

  /// Returns one permit and wakes one blocked thread and one suspended task.
  pub fn signal(&self) {
    {
      let mut count = self.count.lock();
      *count += 1;
    }
    self.condvar.notify_one();
    self.notify.notify_one();
  }

  /// Current number of permits. Only meaningful while the semaphore is quiescent.
  pub fn available(&self) -> usize {
    *self.count.lock()
  }
}
