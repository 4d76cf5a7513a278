use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::channel::mpsc;
use serde_json::json;

use super::*;

fn insert_event(table: Table, row: Value) -> ChangeEvent {
    ChangeEvent { table, kind: ChangeKind::Insert, new: row, old: Value::Null }
}

// =============================================================
// FeedFilter
// =============================================================

#[test]
fn filter_matches_table_kind_and_row() {
    let filter = FeedFilter::table(Table::Messages).only(ChangeKind::Insert).where_eq("channel_id", "c1");
    assert!(filter.matches(&insert_event(Table::Messages, json!({"channel_id": "c1"}))));
    assert!(!filter.matches(&insert_event(Table::Messages, json!({"channel_id": "c2"}))));
    assert!(!filter.matches(&insert_event(Table::Channels, json!({"channel_id": "c1"}))));

    let update = ChangeEvent {
        table: Table::Messages,
        kind: ChangeKind::Update,
        new: json!({"channel_id": "c1"}),
        old: Value::Null,
    };
    assert!(!filter.matches(&update));
}

#[test]
fn delete_events_match_on_old_row() {
    let filter = FeedFilter::table(Table::Channels).where_eq("server_id", "s1");
    let delete = ChangeEvent {
        table: Table::Channels,
        kind: ChangeKind::Delete,
        new: Value::Null,
        old: json!({"server_id": "s1"}),
    };
    assert!(filter.matches(&delete));
}

#[test]
fn row_param_renders_realtime_filter() {
    let filter = FeedFilter::table(Table::Messages).where_eq("channel_id", "abc");
    assert_eq!(filter.row_param().as_deref(), Some("channel_id=eq.abc"));
    assert_eq!(FeedFilter::table(Table::Servers).row_param(), None);
}

#[test]
fn change_kind_parses_wire_names() {
    assert_eq!(ChangeKind::parse("INSERT"), Some(ChangeKind::Insert));
    assert_eq!(ChangeKind::parse("DELETE"), Some(ChangeKind::Delete));
    assert_eq!(ChangeKind::parse("insert"), None);
    assert_eq!(EventFilter::All.as_str(), "*");
}

// =============================================================
// Subscription guard
// =============================================================

#[test]
fn dropping_subscription_runs_release_once() {
    let released = Arc::new(AtomicUsize::new(0));
    let counter = released.clone();
    let (_tx, rx) = mpsc::unbounded();
    let sub = Subscription::new(FeedFilter::table(Table::Servers), rx, move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    drop(sub);
    assert_eq!(released.load(Ordering::SeqCst), 1);
}

#[test]
fn try_next_event_returns_buffered_events_in_order() {
    let (tx, rx) = mpsc::unbounded();
    let mut sub = Subscription::new(FeedFilter::table(Table::Servers), rx, || {});
    tx.unbounded_send(insert_event(Table::Servers, json!({"id": 1}))).expect("send");
    tx.unbounded_send(insert_event(Table::Servers, json!({"id": 2}))).expect("send");

    assert_eq!(sub.try_next_event().map(|e| e.new["id"].clone()), Some(json!(1)));
    assert_eq!(sub.try_next_event().map(|e| e.new["id"].clone()), Some(json!(2)));
    assert!(sub.try_next_event().is_none());
}

#[tokio::test]
async fn next_event_ends_when_sender_closes() {
    let (tx, rx) = mpsc::unbounded::<ChangeEvent>();
    let mut sub = Subscription::new(FeedFilter::table(Table::Servers), rx, || {});
    drop(tx);
    assert!(sub.next_event().await.is_none());
}
