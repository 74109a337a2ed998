// tests/common.rs
#![allow(dead_code)] // Not every test binary uses every helper

use rmbox::{MailboxHandle, MailboxPool, Message, PoolConfig};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use std::sync::Once;
use std::thread;
use std::time::Duration;

// Use std::sync::Once for one-time initialization
static TRACING_INIT: Once = Once::new();

/// How long a thread must stay blocked before we call it "blocked".
pub const BLOCK_CHECK: Duration = Duration::from_millis(100);

// Setup function to initialize tracing
pub fn setup_tracing() {
  TRACING_INIT.call_once(|| {
    // Can be overridden by RUST_LOG env variable
    let default_filter = "rmbox=debug,warn";
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = FmtSubscriber::builder()
      .with_max_level(tracing::Level::TRACE)
      .with_env_filter(env_filter)
      .with_target(true)
      .with_line_number(true)
      .with_test_writer() // Write to test output capture
      .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set global tracing subscriber");
  });
}

// Helper to create a pool with tracing enabled
pub fn test_pool(pool_size: usize, mailbox_capacity: usize) -> MailboxPool {
  setup_tracing();
  MailboxPool::new(PoolConfig::new(pool_size, mailbox_capacity)).expect("Failed to create test pool")
}

/// Message whose three fields are derived from one id, so tests can check
/// identity and integrity at once.
pub fn tagged(id: i32) -> Message {
  Message::new(id, id.wrapping_mul(7), id.wrapping_add(1000))
}

pub fn untag(msg: Message) -> i32 {
  assert_eq!(msg, tagged(msg.result), "message fields were torn: {:?}", msg);
  msg.result
}

/// Runs `op` on a new thread and asserts it is still blocked after [`BLOCK_CHECK`].
pub fn spawn_expect_blocked<T, F>(op: F) -> thread::JoinHandle<T>
where
  F: FnOnce() -> T + Send + 'static,
  T: Send + 'static,
{
  let handle = thread::spawn(op);
  thread::sleep(BLOCK_CHECK);
  assert!(!handle.is_finished(), "operation should still be blocked");
  handle
}

/// Asserts the occupancy invariants on a quiescent mailbox and returns its occupancy.
pub fn assert_quiescent_invariants(mbox: &MailboxHandle) -> usize {
  let snap = mbox.snapshot().expect("live handle");
  assert_eq!(snap.items_available + snap.space_available, snap.capacity);
  assert!(snap.in_index < snap.capacity);
  assert!(snap.out_index < snap.capacity);
  assert_eq!(snap.occupancy(), snap.items_available);
  snap.items_available
}
