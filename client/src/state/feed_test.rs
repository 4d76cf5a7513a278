use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

/// Counts how many handles are alive.
struct LiveHandle(Arc<AtomicUsize>);

impl LiveHandle {
    fn new(live: &Arc<AtomicUsize>) -> Self {
        live.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(live))
    }
}

impl Drop for LiveHandle {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[test]
fn activate_mints_distinct_tokens_per_parent() {
    let mut slot = FeedSlot::<()>::default();
    let a = Uuid::new_v4();
    let first = slot.activate(a);
    let second = slot.activate(a);
    assert_ne!(first, second);
    assert_eq!(second.parent(), a);
    assert!(!slot.is_current(first));
    assert!(slot.is_current(second));
}

#[test]
fn activate_releases_previous_handle_before_new_scope() {
    let live = Arc::new(AtomicUsize::new(0));
    let mut slot = FeedSlot::default();

    let a = slot.activate(Uuid::new_v4());
    assert!(slot.attach(a, LiveHandle::new(&live)));
    assert_eq!(live.load(Ordering::SeqCst), 1);

    let b = slot.activate(Uuid::new_v4());
    assert_eq!(live.load(Ordering::SeqCst), 0);
    assert!(slot.attach(b, LiveHandle::new(&live)));
    assert_eq!(live.load(Ordering::SeqCst), 1);
}

#[test]
fn attach_with_stale_token_drops_handle() {
    let live = Arc::new(AtomicUsize::new(0));
    let mut slot = FeedSlot::default();
    let stale = slot.activate(Uuid::new_v4());
    let _fresh = slot.activate(Uuid::new_v4());

    assert!(!slot.attach(stale, LiveHandle::new(&live)));
    assert_eq!(live.load(Ordering::SeqCst), 0);
    assert!(slot.handle_mut().is_none());
}

#[test]
fn deactivate_clears_scope_and_handle() {
    let live = Arc::new(AtomicUsize::new(0));
    let mut slot = FeedSlot::default();
    let token = slot.activate(Uuid::new_v4());
    slot.attach(token, LiveHandle::new(&live));

    slot.deactivate();
    assert_eq!(live.load(Ordering::SeqCst), 0);
    assert_eq!(slot.current(), None);
    assert!(!slot.is_current(token));
}

#[test]
fn reload_seq_refuses_results_older_than_the_last_applied() {
    let mut seq = ReloadSeq::default();
    let first = seq.issue();
    let second = seq.issue();
    assert!(second > first);

    assert!(seq.accept(second));
    assert!(!seq.accept(first));
    assert!(!seq.accept(second));

    let third = seq.issue();
    assert!(seq.accept(third));
}

#[test]
fn reload_seq_accepts_in_order_results() {
    let mut seq = ReloadSeq::default();
    let a = seq.issue();
    let b = seq.issue();
    assert!(seq.accept(a));
    assert!(seq.accept(b));
}
