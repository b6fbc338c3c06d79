//! Typed publish/subscribe relay for entity and registry change events.
//!
//! # Responsibility
//! - Give each entity/registry kind its own typed event channel.
//! - Deliver events synchronously, depth-first, on the calling thread.
//!
//! # Invariants
//! - Publishers hold `Weak` subscriber handles; a publisher never keeps a
//!   subscriber alive and dropped subscribers are pruned on the next publish.
//! - Subscribers are notified in subscription order.
//! - No internal borrow is held while a subscriber runs, so subscribers may
//!   publish further events or subscribe new listeners re-entrantly.

use std::cell::RefCell;
use std::fmt::{Debug, Formatter};
use std::rc::{Rc, Weak};

/// Receiver side of one typed event channel.
pub trait Subscriber<E> {
    fn notify(&self, event: &E);
}

impl<E, F> Subscriber<E> for F
where
    F: Fn(&E),
{
    fn notify(&self, event: &E) {
        self(event)
    }
}

/// Sender side of one typed event channel.
pub struct Publisher<E> {
    subscribers: RefCell<Vec<Weak<dyn Subscriber<E>>>>,
}

impl<E> Publisher<E> {
    pub fn new() -> Self {
        Self {
            subscribers: RefCell::new(Vec::new()),
        }
    }

    /// Registers one subscriber. The caller keeps it alive.
    pub fn subscribe(&self, subscriber: Weak<dyn Subscriber<E>>) {
        self.subscribers.borrow_mut().push(subscriber);
    }

    /// Notifies every live subscriber, in subscription order.
    pub fn publish(&self, event: &E) {
        let live: Vec<Rc<dyn Subscriber<E>>> = {
            let mut subscribers = self.subscribers.borrow_mut();
            subscribers.retain(|subscriber| subscriber.strong_count() > 0);
            subscribers.iter().filter_map(Weak::upgrade).collect()
        };
        for subscriber in live {
            subscriber.notify(event);
        }
    }

    /// Number of subscribers still alive.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .borrow()
            .iter()
            .filter(|subscriber| subscriber.strong_count() > 0)
            .count()
    }

    /// Moves every subscriber of `other` onto the end of this publisher.
    pub(crate) fn adopt_subscribers(&self, other: &Publisher<E>) {
        let moved = std::mem::take(&mut *other.subscribers.borrow_mut());
        self.subscribers.borrow_mut().extend(moved);
    }
}

impl<E> Default for Publisher<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Debug for Publisher<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Activity mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEvent {
    pub activity_id: String,
}

/// Park mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub enum ParkEvent {
    /// Description changed.
    Updated { park_id: String },
    /// Most recent snowfall (positive) or melt (negative) was recorded.
    SnowDeltaChanged { park_id: String, delta: f64 },
}

impl ParkEvent {
    pub fn park_id(&self) -> &str {
        match self {
            Self::Updated { park_id } | Self::SnowDeltaChanged { park_id, .. } => park_id,
        }
    }
}

/// Trail mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailEvent {
    pub trail_id: String,
}

/// Registry family that published a contents-changed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryKind {
    Activities,
    Parks,
    Trails,
}

/// "Registry contents changed"; identifies the publishing registry only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEvent {
    pub kind: RegistryKind,
    /// `None` for the singleton registries, the owning park id for trails.
    pub park_id: Option<String>,
}

impl RegistryEvent {
    pub fn activities() -> Self {
        Self {
            kind: RegistryKind::Activities,
            park_id: None,
        }
    }

    pub fn parks() -> Self {
        Self {
            kind: RegistryKind::Parks,
            park_id: None,
        }
    }

    pub fn trails(park_id: impl Into<String>) -> Self {
        Self {
            kind: RegistryKind::Trails,
            park_id: Some(park_id.into()),
        }
    }
}

/// Events re-published upward by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelEvent {
    RegistryChanged(RegistryEvent),
    /// A load replaced the whole model.
    Reloaded,
}
