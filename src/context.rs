// src/context.rs

//! The process-wide mailbox pool.
//!
//! Most programs build their own [`MailboxPool`] and pass it around. For code
//! that wants a single shared pool without threading a handle through, this
//! module keeps one global instance created on first use. Creation is guarded
//! by a `OnceCell`, so racing first callers agree on a single pool.

use crate::error::MailboxError;
use crate::pool::{MailboxHandle, MailboxPool, PoolConfig};

use once_cell::sync::OnceCell;
use tracing::{debug, warn};

// --- Global Static Cells ---
static GLOBAL_POOL: OnceCell<MailboxPool> = OnceCell::new();

/// Creates the global pool with `config` if it does not exist yet.
///
/// The first successful call wins. A later call with the same configuration
/// is a no-op; a later call with a different one fails with
/// [`MailboxError::AlreadyInitialized`] and leaves the existing pool alone.
pub fn init_global(config: PoolConfig) -> Result<&'static MailboxPool, MailboxError> {
  config.validate()?;
  let pool = GLOBAL_POOL.get_or_try_init(|| {
    debug!(?config, "Initializing global mailbox pool");
    MailboxPool::new(config)
  })?;

  if *pool.config() != config {
    warn!(
      existing = ?pool.config(),
      requested = ?config,
      "Global mailbox pool already initialized with a different configuration"
    );
    return Err(MailboxError::AlreadyInitialized);
  }
  Ok(pool)
}

/// Returns the global pool, creating it with [`PoolConfig::default`] if
/// [`init_global`] was never called.
pub fn global() -> Result<&'static MailboxPool, MailboxError> {
  GLOBAL_POOL.get_or_try_init(|| {
    debug!("Initializing global mailbox pool with default configuration");
    MailboxPool::new(PoolConfig::default())
  })
}

/// Acquires a mailbox from the global pool.
pub fn acquire() -> Result<MailboxHandle, MailboxError> {
  global()?.acquire()
}

/// Releases a mailbox back to the global pool.
pub fn release(handle: MailboxHandle) -> Result<(), MailboxError> {
  global()?.release(handle)
}
