use std::cell::RefCell;

use store::{ChannelKind, MemoryStore, RemoteStore, Table};
use uuid::Uuid;

use super::*;
use crate::services::channels::{channel_feed, create_channel, load_server_and_channels};
use crate::state::channels::ChannelListState;
use crate::state::feed::FeedSlot;

#[tokio::test]
async fn pump_handles_events_until_stopped() {
    let store = MemoryStore::new();
    let server_id = Uuid::new_v4();
    let subscription = store.subscribe(channel_feed(server_id)).expect("subscribe");
    let (stop_tx, stop_rx) = oneshot::channel();
    let seen = RefCell::new(Vec::new());

    let producer = async {
        create_channel(&store, server_id, "one", ChannelKind::Text).await.expect("insert");
        create_channel(&store, server_id, "two", ChannelKind::Text).await.expect("insert");
        tokio::task::yield_now().await;
        drop(stop_tx);
    };
    let consumer = pump(subscription, stop_rx, |event| {
        seen.borrow_mut().push(event.new["name"].as_str().unwrap_or_default().to_owned());
        async {}
    });
    tokio::join!(producer, consumer);

    assert_eq!(seen.into_inner(), vec!["one", "two"]);
    assert_eq!(store.subscriber_count(), 0);
}

#[tokio::test]
async fn switching_servers_releases_previous_feed() {
    let store = MemoryStore::new();
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let mut slot = FeedSlot::default();
    let mut state = ChannelListState::default();

    let token_a = slot.activate(a);
    slot.attach(token_a, store.subscribe(channel_feed(a)).expect("subscribe a"));
    state.begin(token_a);
    assert_eq!(store.subscriber_count(), 1);

    let token_b = slot.activate(b);
    assert_eq!(store.subscriber_count(), 0);
    slot.attach(token_b, store.subscribe(channel_feed(b)).expect("subscribe b"));
    state.begin(token_b);
    assert_eq!(store.subscriber_count(), 1);

    // A change in A reaches no live feed, and A's late snapshot is refused.
    create_channel(&store, a, "a-news", ChannelKind::Text).await.expect("insert");
    assert!(slot.handle_mut().expect("b feed").try_next_event().is_none());
    assert!(!state.apply_snapshot(token_a, load_server_and_channels(&store, a).await));

    state.apply_snapshot(token_b, load_server_and_channels(&store, b).await);
    assert!(state.items.is_empty());
    assert_eq!(store.rows(Table::Channels).len(), 1);
}

#[tokio::test]
async fn pump_returns_when_feed_closes() {
    let (events_tx, events_rx) = futures::channel::mpsc::unbounded();
    let released = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
    let flag = released.clone();
    let subscription = store::Subscription::new(store::FeedFilter::table(Table::Messages), events_rx, move || {
        flag.store(true, std::sync::atomic::Ordering::SeqCst);
    });
    let (_stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut count = 0;

    events_tx
        .unbounded_send(store::ChangeEvent {
            table: Table::Messages,
            kind: store::ChangeKind::Insert,
            new: serde_json::json!({"content": "last"}),
            old: serde_json::Value::Null,
        })
        .expect("send");
    drop(events_tx);

    // The stop sender is still alive, so only the closed feed can end the loop.
    pump(subscription, stop_rx, |_event| {
        count += 1;
        async {}
    })
    .await;

    assert_eq!(count, 1);
    assert!(released.load(std::sync::atomic::Ordering::SeqCst));
}
