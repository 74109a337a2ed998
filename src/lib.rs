// src/lib.rs

//! rmbox - a fixed-capacity pool of reusable bounded mailboxes.
//!
//! Parallel workers use these mailboxes to hand typed result triples
//! ([`Message`]) back to a coordinator. A [`MailboxPool`] owns a fixed number
//! of mailboxes, each a ring buffer of fixed capacity synchronized by three
//! semaphores. Callers `acquire` a [`MailboxHandle`], share clones of it with
//! workers, `send`/`receive` through it, and `release` it when done.
//!
//! ```
//! use rmbox::{MailboxPool, Message, PoolConfig};
//!
//! let pool = MailboxPool::new(PoolConfig::new(2, 4))?;
//! let mbox = pool.acquire()?;
//!
//! let worker_side = mbox.clone();
//! std::thread::spawn(move || worker_side.send((1, 2, 3))).join().unwrap()?;
//!
//! assert_eq!(mbox.receive()?, Message::new(1, 2, 3));
//! pool.release(mbox)?;
//! # Ok::<(), rmbox::MailboxError>(())
//! ```

/// The process-wide global pool and its free-function API.
pub mod context;
/// Defines the error type used throughout the library.
pub mod error;
/// The result triple carried by mailboxes.
pub mod message;
/// The mailbox pool allocator, its configuration, and mailbox handles.
pub mod pool;
/// Semaphore and bounded-buffer primitives.
pub mod runtime;

// Re-export core types for user convenience, making them accessible directly
// from the crate root (e.g., `rmbox::MailboxError`, `rmbox::MailboxPool`).
pub use context::{acquire, global, init_global, release};
pub use error::{MailboxError, Result};
pub use message::Message;
pub use pool::{MailboxHandle, MailboxPool, PoolConfig, SlotState, DEFAULT_MAILBOX_CAPACITY, DEFAULT_POOL_SIZE};
pub use runtime::{MailboxSnapshot, Semaphore};

/// Crate version as recorded in `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version string, e.g. `"0.1.0"`.
pub fn version() -> &'static str {
  VERSION
}
