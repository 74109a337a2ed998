// tests/mailbox_protocol.rs

use rmbox::Message;
use std::collections::HashSet;
use std::thread;
use std::time::Duration;

mod common;
use common::{tagged, untag};

#[test]
fn messages_arrive_in_send_order() {
  let pool = common::test_pool(1, 4);
  let mbox = pool.acquire().unwrap();

  mbox.send((1, 2, 3)).unwrap();
  mbox.send((4, 5, 6)).unwrap();

  assert_eq!(mbox.receive().unwrap(), Message::new(1, 2, 3));
  assert_eq!(mbox.receive().unwrap(), Message::new(4, 5, 6));
}

#[test]
fn invariants_hold_at_every_occupancy() {
  let pool = common::test_pool(1, 5);
  let mbox = pool.acquire().unwrap();

  // Walk occupancy up and down twice so the indices wrap.
  for round in 0..2 {
    for k in 0..5 {
      assert_eq!(common::assert_quiescent_invariants(&mbox), k);
      mbox.send(tagged(round * 10 + k as i32)).unwrap();
    }
    assert_eq!(common::assert_quiescent_invariants(&mbox), 5);
    for k in 0..5 {
      assert_eq!(untag(mbox.receive().unwrap()), round * 10 + k);
      assert_eq!(common::assert_quiescent_invariants(&mbox), 4 - k as usize);
    }
  }
}

#[test]
fn send_blocks_on_full_until_receive() {
  let pool = common::test_pool(1, 2);
  let mbox = pool.acquire().unwrap();
  mbox.send(tagged(1)).unwrap();
  mbox.send(tagged(2)).unwrap();

  let sender = {
    let mbox = mbox.clone();
    common::spawn_expect_blocked(move || mbox.send(tagged(3)))
  };

  assert_eq!(untag(mbox.receive().unwrap()), 1);
  sender.join().unwrap().unwrap();
  assert_eq!(untag(mbox.receive().unwrap()), 2);
  assert_eq!(untag(mbox.receive().unwrap()), 3);
  assert_eq!(common::assert_quiescent_invariants(&mbox), 0);
}

#[test]
fn receive_blocks_on_empty_until_send() {
  let pool = common::test_pool(1, 3);
  let mbox = pool.acquire().unwrap();

  let receiver = {
    let mbox = mbox.clone();
    common::spawn_expect_blocked(move || mbox.receive())
  };

  mbox.send(tagged(42)).unwrap();
  assert_eq!(untag(receiver.join().unwrap().unwrap()), 42);
  assert_eq!(common::assert_quiescent_invariants(&mbox), 0);
}

#[test]
fn many_senders_one_receiver_lose_and_duplicate_nothing() {
  const SENDERS: i32 = 4;
  const PER_SENDER: i32 = 250;

  let pool = common::test_pool(1, 3);
  let mbox = pool.acquire().unwrap();

  let senders: Vec<_> = (0..SENDERS)
    .map(|s| {
      let mbox = mbox.clone();
      thread::spawn(move || {
        for i in 0..PER_SENDER {
          mbox.send(tagged(s * PER_SENDER + i)).unwrap();
        }
      })
    })
    .collect();

  let mut seen = HashSet::new();
  let mut last_per_sender = vec![-1; SENDERS as usize];
  for _ in 0..SENDERS * PER_SENDER {
    let id = untag(mbox.receive().unwrap());
    assert!(seen.insert(id), "duplicate message {}", id);
    // Each sender's own messages stay in its send order.
    let sender = (id / PER_SENDER) as usize;
    assert!(id > last_per_sender[sender]);
    last_per_sender[sender] = id;
  }

  for s in senders {
    s.join().unwrap();
  }
  assert_eq!(seen.len(), (SENDERS * PER_SENDER) as usize);
  assert_eq!(mbox.try_receive().unwrap_err(), rmbox::MailboxError::Empty);
  assert_eq!(common::assert_quiescent_invariants(&mbox), 0);
}

#[test]
fn many_senders_many_receivers() {
  const SENDERS: i32 = 3;
  const RECEIVERS: usize = 3;
  const PER_SENDER: i32 = 300;
  const TOTAL: usize = (SENDERS * PER_SENDER) as usize;

  let pool = common::test_pool(1, 2);
  let mbox = pool.acquire().unwrap();

  let senders: Vec<_> = (0..SENDERS)
    .map(|s| {
      let mbox = mbox.clone();
      thread::spawn(move || {
        for i in 0..PER_SENDER {
          mbox.send(tagged(s * PER_SENDER + i)).unwrap();
        }
      })
    })
    .collect();

  let receivers: Vec<_> = (0..RECEIVERS)
    .map(|_| {
      let mbox = mbox.clone();
      thread::spawn(move || {
        (0..TOTAL / RECEIVERS)
          .map(|_| untag(mbox.receive().unwrap()))
          .collect::<Vec<_>>()
      })
    })
    .collect();

  for s in senders {
    s.join().unwrap();
  }
  let all: Vec<i32> = receivers.into_iter().flat_map(|r| r.join().unwrap()).collect();
  let unique: HashSet<_> = all.iter().copied().collect();
  assert_eq!(all.len(), TOTAL);
  assert_eq!(unique.len(), TOTAL);
  assert_eq!(common::assert_quiescent_invariants(&mbox), 0);
}

#[test]
fn timed_receive_picks_up_late_message() {
  let pool = common::test_pool(1, 1);
  let mbox = pool.acquire().unwrap();

  let late_sender = {
    let mbox = mbox.clone();
    thread::spawn(move || {
      thread::sleep(Duration::from_millis(30));
      mbox.send(tagged(5)).unwrap();
    })
  };

  let msg = mbox.receive_timeout(Duration::from_secs(5)).unwrap();
  assert_eq!(untag(msg), 5);
  late_sender.join().unwrap();
}

#[test]
fn independent_mailboxes_do_not_interfere() {
  let pool = common::test_pool(3, 2);
  let boxes: Vec<_> = (0..3).map(|_| pool.acquire().unwrap()).collect();

  for (i, mbox) in boxes.iter().enumerate() {
    mbox.send(tagged(i as i32)).unwrap();
  }
  for (i, mbox) in boxes.iter().enumerate().rev() {
    assert_eq!(untag(mbox.receive().unwrap()), i as i32);
  }
}
