use serde_json::{Value, json};
use store::{ChangeKind, FeedFilter, Table};
use uuid::Uuid;

use super::*;

fn channel_feed(channel_id: Uuid) -> FeedFilter {
    FeedFilter::table(Table::Messages).only(ChangeKind::Insert).where_eq("channel_id", channel_id)
}

#[test]
fn topic_for_includes_row_filter_when_present() {
    let id = Uuid::nil();
    assert_eq!(
        topic_for(&channel_feed(id)),
        format!("realtime:messages:channel_id=eq.{id}")
    );
    assert_eq!(topic_for(&FeedFilter::table(Table::Servers)), "realtime:servers");
}

#[test]
fn join_message_carries_postgres_changes_binding() {
    let id = Uuid::new_v4();
    let filter = channel_feed(id);
    let raw = join_message("realtime:messages", &filter, "tok", 7);
    let frame: Value = serde_json::from_str(&raw).expect("valid json");

    assert_eq!(frame["event"], "phx_join");
    assert_eq!(frame["ref"], "7");
    assert_eq!(frame["join_ref"], "7");
    assert_eq!(frame["payload"]["access_token"], "tok");
    let binding = &frame["payload"]["config"]["postgres_changes"][0];
    assert_eq!(binding["event"], "INSERT");
    assert_eq!(binding["schema"], "public");
    assert_eq!(binding["table"], "messages");
    assert_eq!(binding["filter"], format!("channel_id=eq.{id}"));
}

#[test]
fn join_message_omits_filter_for_whole_table_feed() {
    let raw = join_message("realtime:servers", &FeedFilter::table(Table::Servers), "tok", 1);
    let frame: Value = serde_json::from_str(&raw).expect("valid json");
    let binding = &frame["payload"]["config"]["postgres_changes"][0];
    assert_eq!(binding["event"], "*");
    assert!(binding.get("filter").is_none());
}

#[test]
fn heartbeat_and_leave_use_expected_topics() {
    let beat: Value = serde_json::from_str(&heartbeat_message(3)).expect("json");
    assert_eq!(beat["topic"], "phoenix");
    assert_eq!(beat["event"], "heartbeat");
    assert_eq!(beat["ref"], "3");

    let leave: Value = serde_json::from_str(&leave_message("realtime:x", 4)).expect("json");
    assert_eq!(leave["topic"], "realtime:x");
    assert_eq!(leave["event"], "phx_leave");
}

#[test]
fn parse_change_decodes_insert_push() {
    let raw = json!({
        "topic": "realtime:messages",
        "event": "postgres_changes",
        "ref": null,
        "payload": {
            "ids": [1],
            "data": {
                "schema": "public",
                "table": "messages",
                "type": "INSERT",
                "commit_timestamp": "2024-05-01T10:00:00Z",
                "record": { "id": "abc", "content": "hi" },
                "old_record": null
            }
        }
    })
    .to_string();

    let event = parse_change(&raw).expect("change event");
    assert_eq!(event.table, Table::Messages);
    assert_eq!(event.kind, ChangeKind::Insert);
    assert_eq!(event.new["content"], "hi");
    assert!(event.old.is_null());
}

#[test]
fn parse_change_ignores_other_frames_and_unknown_tables() {
    assert!(parse_change(&heartbeat_message(1)).is_none());
    assert!(parse_change("not json").is_none());
    let unknown = json!({
        "event": "postgres_changes",
        "payload": { "data": { "table": "audit_log", "type": "INSERT", "record": {} } }
    })
    .to_string();
    assert!(parse_change(&unknown).is_none());
}

#[test]
fn channel_error_reports_rejected_join() {
    let reply = json!({
        "event": "phx_reply",
        "topic": "realtime:messages",
        "payload": { "status": "error", "response": { "reason": "unauthorized" } }
    })
    .to_string();
    assert_eq!(channel_error(&reply).as_deref(), Some("unauthorized"));

    let ok = json!({ "event": "phx_reply", "payload": { "status": "ok", "response": {} } }).to_string();
    assert!(channel_error(&ok).is_none());
}

#[tokio::test]
async fn merged_inputs_report_closed_after_last_frame() {
    use futures::{StreamExt, future, stream};

    let mut inputs = merge_inputs(stream::iter(["a", "b"]), stream::pending(), future::pending::<()>());
    assert_eq!(inputs.next().await, Some(Input::Frame("a")));
    assert_eq!(inputs.next().await, Some(Input::Frame("b")));
    assert_eq!(inputs.next().await, Some(Input::Closed));
}

#[tokio::test]
async fn merged_inputs_surface_heartbeats_and_stop() {
    use futures::channel::oneshot;
    use futures::{StreamExt, stream};

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut inputs = merge_inputs(stream::pending::<&str>(), stream::iter([()]), stop_rx);
    assert_eq!(inputs.next().await, Some(Input::Heartbeat));

    drop(stop_tx);
    assert_eq!(inputs.next().await, Some(Input::Stop));
}
