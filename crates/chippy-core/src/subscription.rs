use futures::stream::BoxStream;
use futures::StreamExt;
use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// A long-lived event source managed by the runtime.
///
/// Subscriptions are declared in [`Model::subscriptions`](crate::Model::subscriptions)
/// and reconciled after every update: the runtime starts the ones whose
/// [`SubscriptionId`] is new and aborts the ones that disappeared. A
/// subscription is therefore a scoped resource: it lives exactly as long as
/// the model keeps declaring it, and it is released on shutdown no matter how
/// the program ends.
pub struct Subscription<Msg: Send + 'static> {
    pub(crate) id: SubscriptionId,
    pub(crate) spawn: Box<dyn FnOnce(mpsc::UnboundedSender<Msg>) -> AbortHandle + Send>,
}

/// Identity for diffing subscriptions between update cycles.
///
/// Composed of a Rust [`TypeId`] and a numeric discriminant. The type name is
/// kept for log output only and does not take part in equality.
#[derive(Clone)]
pub struct SubscriptionId {
    type_id: TypeId,
    type_name: &'static str,
    discriminant: u64,
}

impl SubscriptionId {
    /// Create an ID from a type and a numeric discriminant.
    pub fn new<T: 'static>(discriminant: u64) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            discriminant,
        }
    }

    /// Create an ID from a type alone (for singletons).
    pub fn of<T: 'static>() -> Self {
        Self::new::<T>(0)
    }

    /// Create an ID from a type and a string discriminant.
    pub fn with_str<T: 'static>(s: &str) -> Self {
        let mut hasher = std::hash::DefaultHasher::new();
        s.hash(&mut hasher);
        Self::new::<T>(hasher.finish())
    }
}

impl PartialEq for SubscriptionId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.discriminant == other.discriminant
    }
}

impl Eq for SubscriptionId {}

impl Hash for SubscriptionId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
        self.discriminant.hash(state);
    }
}

impl fmt::Debug for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.type_name, self.discriminant)
    }
}

/// Trait for types that produce a stream of values.
///
/// The runtime calls [`stream`](SubscriptionSource::stream) once when the
/// subscription is first started and drops the stream when it is removed.
pub trait SubscriptionSource: Send + 'static {
    /// The type of values this source emits.
    type Output: Send + 'static;

    /// Unique ID for this subscription instance.
    fn id(&self) -> SubscriptionId;

    /// Create the stream of values.
    fn stream(self) -> BoxStream<'static, Self::Output>;
}

/// Create a [`Subscription`] from a [`SubscriptionSource`].
pub fn subscribe<S>(source: S) -> Subscription<S::Output>
where
    S: SubscriptionSource,
{
    let id = source.id();
    Subscription {
        id,
        spawn: Box::new(move |tx| forward(source.stream(), tx)),
    }
}

/// Drive `stream` on a new task, forwarding every item until the receiver
/// goes away or the task is aborted.
pub(crate) fn forward<Msg: Send + 'static>(
    mut stream: BoxStream<'static, Msg>,
    tx: mpsc::UnboundedSender<Msg>,
) -> AbortHandle {
    tokio::spawn(async move {
        while let Some(msg) = stream.next().await {
            if tx.send(msg).is_err() {
                break;
            }
        }
    })
    .abort_handle()
}

impl<Msg: Send + 'static> Subscription<Msg> {
    /// Create from a raw stream and id.
    pub fn from_stream(id: SubscriptionId, stream: BoxStream<'static, Msg>) -> Self {
        Subscription {
            id,
            spawn: Box::new(move |tx| forward(stream, tx)),
        }
    }

    /// The identity the runtime diffs on.
    pub fn id(&self) -> &SubscriptionId {
        &self.id
    }

    /// Transform the message type (for component composition).
    pub fn map<NewMsg: Send + 'static>(
        self,
        f: impl Fn(Msg) -> NewMsg + Send + Sync + 'static,
    ) -> Subscription<NewMsg> {
        let f = std::sync::Arc::new(f);
        Subscription {
            id: self.id,
            spawn: Box::new(move |new_tx: mpsc::UnboundedSender<NewMsg>| {
                let (inner_tx, mut inner_rx) = mpsc::unbounded_channel::<Msg>();
                let abort = (self.spawn)(inner_tx);

                // Ends on its own once the source task is aborted and
                // `inner_tx` is dropped.
                tokio::spawn(async move {
                    while let Some(msg) = inner_rx.recv().await {
                        if new_tx.send(f(msg)).is_err() {
                            break;
                        }
                    }
                });

                abort
            }),
        }
    }
}

/// Ids present in `next` but not `active`, and ids in `active` missing from
/// `next`. Duplicates in `next` count once.
pub(crate) fn diff_ids<'a>(
    active: impl IntoIterator<Item = &'a SubscriptionId>,
    next: &[SubscriptionId],
) -> (Vec<SubscriptionId>, Vec<SubscriptionId>) {
    let active: HashSet<&SubscriptionId> = active.into_iter().collect();
    let next_set: HashSet<&SubscriptionId> = next.iter().collect();

    let mut seen = HashSet::new();
    let started = next
        .iter()
        .filter(|id| !active.contains(id) && seen.insert(*id))
        .cloned()
        .collect();
    let stopped = active
        .into_iter()
        .filter(|id| !next_set.contains(id))
        .cloned()
        .collect();
    (started, stopped)
}

/// Manages active subscriptions, performing diffing between cycles.
pub(crate) struct SubscriptionManager<Msg: Send + 'static> {
    active: HashMap<SubscriptionId, AbortHandle>,
    msg_tx: mpsc::UnboundedSender<Msg>,
}

impl<Msg: Send + 'static> SubscriptionManager<Msg> {
    pub fn new(msg_tx: mpsc::UnboundedSender<Msg>) -> Self {
        Self {
            active: HashMap::new(),
            msg_tx,
        }
    }

    /// Start new subscriptions, stop removed ones, keep unchanged ones.
    pub fn reconcile(&mut self, new_subs: Vec<Subscription<Msg>>) {
        let ids: Vec<SubscriptionId> = new_subs.iter().map(|sub| sub.id.clone()).collect();
        let (started, stopped) = diff_ids(self.active.keys(), &ids);

        for id in stopped {
            if let Some(handle) = self.active.remove(&id) {
                tracing::debug!(subscription = ?id, "subscription stopped");
                handle.abort();
            }
        }

        for sub in new_subs {
            if started.contains(&sub.id) && !self.active.contains_key(&sub.id) {
                tracing::debug!(subscription = ?sub.id, "subscription started");
                let handle = (sub.spawn)(self.msg_tx.clone());
                self.active.insert(sub.id, handle);
            }
        }
    }

    /// Abort all active subscriptions.
    pub fn shutdown(&mut self) {
        for (id, handle) in self.active.drain() {
            tracing::debug!(subscription = ?id, "subscription stopped on shutdown");
            handle.abort();
        }
    }

    /// Number of active subscriptions (for testing).
    #[cfg(test)]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}
