//! Drives a change-feed subscription on the browser event loop.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components keep a [`FeedTask`] inside their [`crate::state::feed::FeedSlot`].
//! Dropping the task stops its loop, which drops the subscription and so
//! releases the backend feed. Events are handled one at a time in arrival
//! order; a handler that awaits (e.g. an author lookup) delays the next one.

#[cfg(test)]
#[path = "feed_test.rs"]
mod feed_test;

use std::future::Future;

use futures::channel::oneshot;
use futures::{FutureExt, StreamExt, future, stream};
use store::{ChangeEvent, Subscription};

/// Handle to a running feed loop. Dropping it stops the loop.
#[derive(Debug)]
pub struct FeedTask {
    _stop: oneshot::Sender<()>,
}

impl FeedTask {
    /// Spawn the loop for `subscription` on the local executor.
    pub fn spawn<F, Fut>(subscription: Subscription, on_event: F) -> Self
    where
        F: FnMut(ChangeEvent) -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        let (stop_tx, stop_rx) = oneshot::channel();
        leptos::task::spawn_local(pump(subscription, stop_rx, on_event));
        Self { _stop: stop_tx }
    }
}

/// Feed `on_event` until the feed closes or `stop` fires (or its sender drops).
pub(crate) async fn pump<F, Fut>(subscription: Subscription, stop: oneshot::Receiver<()>, mut on_event: F)
where
    F: FnMut(ChangeEvent) -> Fut,
    Fut: Future<Output = ()>,
{
    enum Step {
        Event(ChangeEvent),
        Closed,
        Stop,
    }

    let events = subscription.map(Step::Event).chain(stream::once(future::ready(Step::Closed)));
    let stop = stop.into_stream().map(|_| Step::Stop);
    let mut steps = stream::select(events, stop);

    while let Some(step) = steps.next().await {
        match step {
            Step::Event(event) => on_event(event).await,
            Step::Closed | Step::Stop => break,
        }
    }
}
