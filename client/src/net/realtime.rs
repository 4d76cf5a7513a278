//! Realtime change-feed channel over the hosted backend's websocket.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each [`store::Subscription`] handed out by the browser store owns one
//! websocket joined to one Phoenix topic carrying a single `postgres_changes`
//! binding. Dropping the subscription stops the socket task, which sends
//! `phx_leave` and closes the connection.
//!
//! Protocol helpers are plain functions over strings so they can be unit
//! tested natively; the socket task itself is gated behind
//! `#[cfg(feature = "hydrate")]`.
//!
//! ERROR HANDLING
//! ==============
//! Join rejections and transport failures end the task and close the event
//! channel. The owning view sees its feed end and keeps whatever snapshot it
//! already rendered.

#[cfg(test)]
#[path = "realtime_test.rs"]
mod realtime_test;

#[cfg(any(test, feature = "hydrate"))]
use serde_json::{Value, json};
#[cfg(any(test, feature = "hydrate"))]
use store::{ChangeEvent, ChangeKind, FeedFilter, Table};

/// Keep-alive interval expected by the realtime server.
#[cfg(feature = "hydrate")]
const HEARTBEAT_MS: u32 = 30_000;

/// Topic name for a feed filter, unique per table and row filter.
#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn topic_for(filter: &FeedFilter) -> String {
    match filter.row_param() {
        Some(row) => format!("realtime:{}:{row}", filter.table),
        None => format!("realtime:{}", filter.table),
    }
}

#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn join_message(topic: &str, filter: &FeedFilter, access_token: &str, reference: u64) -> String {
    let mut binding = json!({
        "event": filter.events.as_str(),
        "schema": "public",
        "table": filter.table.as_str(),
    });
    if let Some(row) = filter.row_param() {
        binding["filter"] = Value::String(row);
    }
    json!({
        "topic": topic,
        "event": "phx_join",
        "payload": {
            "config": {
                "broadcast": { "self": false },
                "presence": { "key": "" },
                "postgres_changes": [binding],
            },
            "access_token": access_token,
        },
        "ref": reference.to_string(),
        "join_ref": reference.to_string(),
    })
    .to_string()
}

#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn heartbeat_message(reference: u64) -> String {
    json!({
        "topic": "phoenix",
        "event": "heartbeat",
        "payload": {},
        "ref": reference.to_string(),
    })
    .to_string()
}

#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn leave_message(topic: &str, reference: u64) -> String {
    json!({
        "topic": topic,
        "event": "phx_leave",
        "payload": {},
        "ref": reference.to_string(),
    })
    .to_string()
}

/// Decode a `postgres_changes` push. Other frames yield `None`.
#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn parse_change(text: &str) -> Option<ChangeEvent> {
    let frame: Value = serde_json::from_str(text).ok()?;
    if frame.get("event").and_then(Value::as_str) != Some("postgres_changes") {
        return None;
    }
    let data = frame.get("payload")?.get("data")?;
    let table = Table::parse(data.get("table")?.as_str()?)?;
    let kind = ChangeKind::parse(data.get("type")?.as_str()?)?;
    Some(ChangeEvent {
        table,
        kind,
        new: data.get("record").cloned().unwrap_or(Value::Null),
        old: data.get("old_record").cloned().unwrap_or(Value::Null),
    })
}

/// Reason text when the server rejects a join or reports a channel error.
#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn channel_error(text: &str) -> Option<String> {
    let frame: Value = serde_json::from_str(text).ok()?;
    let event = frame.get("event").and_then(Value::as_str)?;
    let payload = frame.get("payload")?;
    let failed = match event {
        "phx_reply" => payload.get("status").and_then(Value::as_str) == Some("error"),
        "phx_error" => true,
        _ => false,
    };
    if !failed {
        return None;
    }
    let reason = payload
        .get("response")
        .and_then(|r| r.get("reason"))
        .and_then(Value::as_str)
        .unwrap_or("channel error");
    Some(reason.to_owned())
}

/// One wake-up of the socket task.
#[cfg(any(test, feature = "hydrate"))]
#[derive(Debug, PartialEq)]
pub(crate) enum Input<F> {
    Frame(F),
    /// The socket's read half ended.
    Closed,
    Heartbeat,
    Stop,
}

/// Merge socket frames, heartbeat ticks and the stop signal into one stream.
///
/// The frame stream is terminated by [`Input::Closed`] so a dropped
/// connection ends the task even while heartbeats keep ticking.
#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn merge_inputs<F, B, S>(frames: F, beats: B, stop: S) -> impl futures::Stream<Item = Input<F::Item>> + Unpin
where
    F: futures::Stream + Unpin,
    B: futures::Stream<Item = ()> + Unpin,
    S: Future + Unpin,
{
    use futures::{FutureExt, StreamExt, future, stream};

    let frames = frames.map(Input::Frame).chain(stream::once(future::ready(Input::Closed)));
    let beats = beats.map(|()| Input::Heartbeat);
    let stop = stop.into_stream().map(|_| Input::Stop);
    stream::select(frames, stream::select(beats, stop))
}

/// Open a websocket, join the filter's topic and stream matching changes.
///
/// # Errors
///
/// Returns [`store::StoreError::Request`] when the socket cannot be created.
#[cfg(feature = "hydrate")]
pub fn open(
    config: &crate::config::StoreConfig,
    access_token: String,
    filter: FeedFilter,
) -> Result<store::Subscription, store::StoreError> {
    use futures::channel::{mpsc, oneshot};
    use gloo_net::websocket::futures::WebSocket;

    let ws = WebSocket::open(&config.realtime_url()).map_err(|e| store::StoreError::Request(e.to_string()))?;
    let (events_tx, events_rx) = mpsc::unbounded();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    leptos::task::spawn_local(run_channel(ws, filter.clone(), access_token, events_tx, stop_rx));
    Ok(store::Subscription::new(filter, events_rx, move || drop(stop_tx)))
}

#[cfg(feature = "hydrate")]
async fn run_channel(
    ws: gloo_net::websocket::futures::WebSocket,
    filter: FeedFilter,
    access_token: String,
    events: futures::channel::mpsc::UnboundedSender<ChangeEvent>,
    stop: futures::channel::oneshot::Receiver<()>,
) {
    use futures::{SinkExt, StreamExt};
    use gloo_net::websocket::Message as WsMessage;

    let topic = topic_for(&filter);
    let (mut write, read) = ws.split();
    let mut reference: u64 = 1;

    if let Err(e) = write.send(WsMessage::Text(join_message(&topic, &filter, &access_token, reference))).await {
        leptos::logging::warn!("realtime join failed for {topic}: {e}");
        return;
    }

    let beats = gloo_timers::future::IntervalStream::new(HEARTBEAT_MS);
    let mut inputs = merge_inputs(read, beats, stop);

    while let Some(input) = inputs.next().await {
        match input {
            Input::Frame(Ok(WsMessage::Text(text))) => {
                if let Some(reason) = channel_error(&text) {
                    leptos::logging::warn!("realtime channel {topic} failed: {reason}");
                    break;
                }
                if let Some(event) = parse_change(&text) {
                    if filter.matches(&event) && events.unbounded_send(event).is_err() {
                        break;
                    }
                }
            }
            Input::Frame(Ok(WsMessage::Bytes(_))) => {}
            Input::Frame(Err(e)) => {
                leptos::logging::warn!("realtime recv error on {topic}: {e}");
                break;
            }
            Input::Closed => break,
            Input::Heartbeat => {
                reference += 1;
                if write.send(WsMessage::Text(heartbeat_message(reference))).await.is_err() {
                    break;
                }
            }
            Input::Stop => {
                reference += 1;
                let _ = write.send(WsMessage::Text(leave_message(&topic, reference))).await;
                break;
            }
        }
    }

    drop(inputs);
    let _ = write.close().await;
}
