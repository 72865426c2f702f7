use crate::event::TerminalEvent;
use crate::subscription::{forward, Subscription, SubscriptionId, SubscriptionSource};
use crossterm::event::EventStream;
use futures::stream::BoxStream;
use futures::StreamExt;
use std::sync::{Arc, OnceLock};
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;

const HUB_CAPACITY: usize = 256;

static HUB: OnceLock<broadcast::Sender<TerminalEvent>> = OnceLock::new();

/// The process-wide terminal event hub.
///
/// crossterm keeps one global reader behind every `EventStream`; two live
/// streams would steal events from each other. The hub owns the only stream
/// and broadcasts each event, so the keyboard subscription and a
/// click-outside listener can both be active. The reader task is spawned on
/// first use and must therefore be first touched from inside a tokio runtime.
fn hub() -> broadcast::Sender<TerminalEvent> {
    HUB.get_or_init(|| {
        let (tx, _) = broadcast::channel(HUB_CAPACITY);
        let pump = tx.clone();
        tokio::spawn(async move {
            let mut events = EventStream::new();
            while let Some(result) = events.next().await {
                match result {
                    // No receivers is fine: nobody is listening right now.
                    Ok(event) => {
                        let _ = pump.send(TerminalEvent::from(event));
                    }
                    Err(err) => tracing::warn!(error = %err, "failed to read terminal event"),
                }
            }
            tracing::debug!("terminal event stream ended");
        });
        tx
    })
    .clone()
}

fn hub_stream() -> BoxStream<'static, TerminalEvent> {
    let stream = BroadcastStream::new(hub().subscribe()).filter_map(|result| async move {
        match result {
            Ok(event) => Some(event),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "terminal subscriber lagged, events dropped");
                None
            }
        }
    });
    Box::pin(stream)
}

/// Subscription source for every terminal event (keyboard, mouse, resize,
/// focus, paste).
pub struct TerminalEvents;

impl SubscriptionSource for TerminalEvents {
    type Output = TerminalEvent;

    fn id(&self) -> SubscriptionId {
        SubscriptionId::of::<Self>()
    }

    fn stream(self) -> BoxStream<'static, TerminalEvent> {
        hub_stream()
    }
}

/// Subscribe to the hub under `id`, mapping each event through `map`.
///
/// The hub receiver is created lazily inside the spawned task so that merely
/// declaring the subscription on every update cycle costs nothing.
pub fn listen<Msg: Send + 'static>(
    id: SubscriptionId,
    map: impl Fn(TerminalEvent) -> Option<Msg> + Send + Sync + 'static,
) -> Subscription<Msg> {
    let map = Arc::new(map);
    Subscription {
        id,
        spawn: Box::new(move |tx| {
            let stream = hub_stream().filter_map(move |event| {
                let map = map.clone();
                async move { map(event) }
            });
            forward(Box::pin(stream), tx)
        }),
    }
}

/// Create a terminal events subscription that maps each event through a
/// user-provided function.
///
/// The `map` closure returns `Some(Msg)` to forward an event or `None` to
/// discard it.
///
/// # Example
///
/// ```rust,ignore
/// fn subscriptions(&self) -> Vec<Subscription<Msg>> {
///     vec![terminal_events(|event| match event {
///         TerminalEvent::Key(key) => Some(Msg::Key(key)),
///         TerminalEvent::Paste(text) => Some(Msg::Paste(text)),
///         _ => None,
///     })]
/// }
/// ```
pub fn terminal_events<Msg: Send + 'static>(
    map: impl Fn(TerminalEvent) -> Option<Msg> + Send + Sync + 'static,
) -> Subscription<Msg> {
    listen(SubscriptionId::of::<TerminalEvents>(), map)
}

/// A subscription that only sees left-button presses, as `(column, row)`.
///
/// Pointer listeners are keyed by the caller's `id` so each mounted widget
/// owns its own listener: it is started when the widget starts declaring it
/// and aborted when the widget stops.
pub fn pointer_events<Msg: Send + 'static>(
    id: SubscriptionId,
    map: impl Fn(u16, u16) -> Option<Msg> + Send + Sync + 'static,
) -> Subscription<Msg> {
    listen(id, move |event| {
        let (column, row) = event.left_click()?;
        map(column, row)
    })
}
