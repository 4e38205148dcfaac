//! Change notification bus.
//!
//! A device-scoped broadcast topic announcing that a collection was
//! rewritten. Each context (one per open app instance) connects with its own
//! [`ContextId`]; a context never receives the notices it published itself.
//! Notices carry only the entity kind, so subscribers re-fetch to learn what
//! changed.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use uuid::Uuid;

use common::BusConfig;

/// Collections that can change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityKind {
    Tasks,
    Users,
    Profiles,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Tasks => write!(f, "TASKS"),
            EntityKind::Users => write!(f, "USERS"),
            EntityKind::Profiles => write!(f, "PROFILES"),
        }
    }
}

/// Identity of one connected context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(Uuid);

impl ContextId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ContextId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy)]
struct BusMessage {
    origin: ContextId,
    kind: EntityKind,
}

/// What a subscriber observes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeNotice {
    /// Another context rewrote this collection
    Updated(EntityKind),
    /// The subscriber fell behind and this many notices were dropped;
    /// treat every collection as changed.
    Lagged(u64),
}

/// Owner of the broadcast topic.
///
/// Construct one per device (process) and hand out handles with
/// [`ChangeBus::connect`]. [`ChangeBus::dispose`] ends every subscription.
#[derive(Clone)]
pub struct ChangeBus {
    sender: broadcast::Sender<BusMessage>,
    shutdown: Arc<watch::Sender<bool>>,
}

impl ChangeBus {
    pub fn new(config: &BusConfig) -> Self {
        let (sender, _) = broadcast::channel(config.capacity.max(1));
        let (shutdown, _) = watch::channel(false);
        Self {
            sender,
            shutdown: Arc::new(shutdown),
        }
    }

    /// Connect a new context to the topic
    pub fn connect(&self) -> BusHandle {
        let handle = BusHandle {
            origin: ContextId::new(),
            sender: self.sender.clone(),
            shutdown: self.shutdown.clone(),
        };
        tracing::debug!(context = %handle.origin, "context connected to change bus");
        handle
    }

    /// Close the topic. Pending and future `recv` calls return `None` and
    /// publishes become no-ops.
    pub fn dispose(&self) {
        self.shutdown.send_replace(true);
        tracing::debug!("change bus disposed");
    }

    pub fn is_disposed(&self) -> bool {
        *self.shutdown.borrow()
    }
}

/// One context's connection to the bus
#[derive(Clone)]
pub struct BusHandle {
    origin: ContextId,
    sender: broadcast::Sender<BusMessage>,
    shutdown: Arc<watch::Sender<bool>>,
}

impl BusHandle {
    pub fn context_id(&self) -> ContextId {
        self.origin
    }

    /// Announce that `kind` was rewritten. Never fails; a notice with no
    /// listeners is simply dropped.
    pub fn publish(&self, kind: EntityKind) {
        if *self.shutdown.borrow() {
            tracing::debug!(%kind, "change bus disposed, notice dropped");
            return;
        }
        let receivers = self
            .sender
            .send(BusMessage {
                origin: self.origin,
                kind,
            })
            .unwrap_or(0);
        tracing::debug!(%kind, context = %self.origin, receivers, "published change");
    }

    /// Start receiving notices published by other contexts
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            origin: self.origin,
            receiver: self.sender.subscribe(),
            shutdown: self.shutdown.subscribe(),
        }
    }

    /// Run `handler` for every notice on a background task until the returned
    /// guard is dropped or unsubscribed.
    pub fn subscribe_with<F>(&self, handler: F) -> SubscriptionGuard
    where
        F: Fn(ChangeNotice) + Send + Sync + 'static,
    {
        let mut subscription = self.subscribe();
        let task = tokio::spawn(async move {
            while let Some(notice) = subscription.recv().await {
                handler(notice);
            }
        });
        SubscriptionGuard { task }
    }
}

/// Stream of notices from other contexts
pub struct Subscription {
    origin: ContextId,
    receiver: broadcast::Receiver<BusMessage>,
    shutdown: watch::Receiver<bool>,
}

impl Subscription {
    /// Wait for the next notice; `None` once the bus is disposed
    pub async fn recv(&mut self) -> Option<ChangeNotice> {
        loop {
            if *self.shutdown.borrow() {
                return None;
            }
            tokio::select! {
                message = self.receiver.recv() => match message {
                    Ok(m) if m.origin == self.origin => continue,
                    Ok(m) => return Some(ChangeNotice::Updated(m.kind)),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(dropped = n, "change subscriber lagged");
                        return Some(ChangeNotice::Lagged(n));
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                },
                changed = self.shutdown.changed() => {
                    if changed.is_err() {
                        return None;
                    }
                }
            }
        }
    }

    /// Take the next already-delivered notice without waiting
    pub fn try_recv(&mut self) -> Option<ChangeNotice> {
        if *self.shutdown.borrow() {
            return None;
        }
        loop {
            match self.receiver.try_recv() {
                Ok(m) if m.origin == self.origin => continue,
                Ok(m) => return Some(ChangeNotice::Updated(m.kind)),
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(ChangeNotice::Lagged(n))
                }
                Err(_) => return None,
            }
        }
    }

    /// Drain every pending notice; true if at least one arrived
    pub fn drain(&mut self) -> bool {
        let mut any = false;
        while self.try_recv().is_some() {
            any = true;
        }
        any
    }
}

/// Keeps a handler subscription alive; dropping it unsubscribes.
pub struct SubscriptionGuard {
    task: JoinHandle<()>,
}

impl SubscriptionGuard {
    pub fn unsubscribe(self) {
        // Drop does the work
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.task.abort();
    }
}
