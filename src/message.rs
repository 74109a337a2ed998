// src/message.rs

use std::fmt;

/// The result triple a worker hands back to its coordinator through a mailbox.
///
/// Plain `Copy` data: it is written into a ring slot by value and read out by
/// value, so there is no ownership to track across threads.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Message {
  /// Outcome of the unit of work (e.g. a search score).
  pub result: i32,
  /// Identifier of the move or work item the result belongs to.
  pub move_no: i32,
  /// Work counter reported alongside the result.
  pub positions_explored: i32,
}

impl Message {
  pub const fn new(result: i32, move_no: i32, positions_explored: i32) -> Self {
    Self {
      result,
      move_no,
      positions_explored,
    }
  }

  /// Splits the message back into its three fields.
  pub const fn into_parts(self) -> (i32, i32, i32) {
    (self.result, self.move_no, self.positions_explored)
  }
}

impl From<(i32, i32, i32)> for Message {
  fn from((result, move_no, positions_explored): (i32, i32, i32)) -> Self {
    Self::new(result, move_no, positions_explored)
  }
}

impl From<Message> for (i32, i32, i32) {
  fn from(msg: Message) -> Self {
    msg.into_parts()
  }
}

impl fmt::Debug for Message {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "Message(result={}, move_no={}, positions_explored={})",
      self.result, self.move_no, self.positions_explored
    )
  }
}
