//! Synchronous typed notification fan-out.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    sync::{Arc, Mutex, PoisonError},
};

use crate::{ActorId, Notification, NotificationKind};

/// Receiver of published notifications.
pub trait Subscriber {
    /// Observes a single notification. Called synchronously by the publisher.
    fn notify(&mut self, notification: &Notification);
}

impl<S> Subscriber for Arc<Mutex<S>>
where
    S: Subscriber,
{
    fn notify(&mut self, notification: &Notification) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .notify(notification);
    }
}

/// Handle returned when registering an external subscriber.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

struct Subscription {
    id: SubscriptionId,
    kinds: BTreeSet<NotificationKind>,
    subscriber: Box<dyn Subscriber + Send>,
}

/// Explicit subscriber registry with per-kind routing.
///
/// Two subscriber populations are tracked. External subscribers (UI,
/// objectives, recorders) are owned by the bus as boxed trait objects.
/// Actor subscribers are owned by the world; the bus only records which
/// kinds each actor listens to and hands matching deliveries back to the
/// publisher. External subscribers are served first in registration order,
/// then actors in ascending identifier order.
#[derive(Default)]
pub struct NotificationBus {
    next_id: u64,
    subscribers: Vec<Subscription>,
    actors: BTreeMap<ActorId, BTreeSet<NotificationKind>>,
}

impl NotificationBus {
    /// Creates a bus without subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an external subscriber for the listed kinds.
    pub fn subscribe<S>(&mut self, kinds: &[NotificationKind], subscriber: S) -> SubscriptionId
    where
        S: Subscriber + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.subscribers.push(Subscription {
            id,
            kinds: kinds.iter().copied().collect(),
            subscriber: Box::new(subscriber),
        });
        id
    }

    /// Removes an external subscriber. Returns `false` when it was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|subscription| subscription.id != id);
        self.subscribers.len() != before
    }

    /// Registers an actor owned by the publisher for the listed kinds.
    pub fn subscribe_actor(&mut self, actor: ActorId, kinds: &[NotificationKind]) {
        let _ = self.actors.insert(actor, kinds.iter().copied().collect());
    }

    /// Stops routing notifications to an actor.
    pub fn unsubscribe_actor(&mut self, actor: ActorId) -> bool {
        self.actors.remove(&actor).is_some()
    }

    /// Reports whether an actor is currently subscribed.
    #[must_use]
    pub fn is_actor_subscribed(&self, actor: ActorId) -> bool {
        self.actors.contains_key(&actor)
    }

    /// Number of external subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Number of actor subscribers.
    #[must_use]
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Delivers a notification to every interested subscriber before returning.
    ///
    /// `deliver` is invoked for each subscribed actor whose kinds include the
    /// notification's kind.
    pub fn publish<F>(&mut self, notification: &Notification, mut deliver: F)
    where
        F: FnMut(ActorId, &Notification),
    {
        let kind = notification.kind();
        for subscription in &mut self.subscribers {
            if subscription.kinds.contains(&kind) {
                subscription.subscriber.notify(notification);
            }
        }
        for (actor, kinds) in &self.actors {
            if kinds.contains(&kind) {
                deliver(*actor, notification);
            }
        }
    }
}

impl fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationBus")
            .field("subscribers", &self.subscribers.len())
            .field("actors", &self.actors.keys().collect::<Vec<_>>())
            .finish()
    }
}
