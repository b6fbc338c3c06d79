//! Composition root owning every registry.
//!
//! # Responsibility
//! - Own the activity registry, the park registry and one trail registry per
//!   park.
//! - Relay every registry change upward as a `ModelEvent` and track a dirty
//!   flag.
//! - Expose whole-file open/save.
//!
//! # Invariants
//! - Every park has exactly one trail registry, created synchronously while
//!   the park registry's change event is being delivered and before any
//!   other subscriber sees it.
//! - Each trail registry is subscribed to its own park's events.
//! - A failed load leaves the current model untouched.

use crate::codec::{self, LoadError, SaveError};
use crate::event::{ModelEvent, ParkEvent, Publisher, RegistryEvent, RegistryKind, Subscriber};
use crate::model::park::Park;
use crate::registry::activity_registry::ActivityRegistry;
use crate::registry::park_registry::ParkRegistry;
use crate::registry::trail_registry::TrailRegistry;
use log::debug;
use std::cell::{Cell, RefCell};
use std::fmt::{Debug, Formatter};
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};

/// Parks, trails and activities, wired for change propagation.
pub struct Coordinator {
    activities: Rc<ActivityRegistry>,
    parks: Rc<ParkRegistry>,
    relay: Rc<Relay>,
    file_name: RefCell<Option<PathBuf>>,
}

/// Subscriber side of the coordinator; kept separate so `Coordinator` itself
/// can be moved and swapped by value.
struct Relay {
    parks: Weak<ParkRegistry>,
    trail_registries: RefCell<Vec<Rc<TrailRegistry>>>,
    changed: Cell<bool>,
    events: Publisher<ModelEvent>,
    self_ref: Weak<Relay>,
}

impl Relay {
    /// Creates a trail registry for every park that lacks one.
    fn sync_trail_registries(&self) {
        let Some(parks) = self.parks.upgrade() else {
            return;
        };
        for park in parks.parks() {
            let exists = self
                .trail_registries
                .borrow()
                .iter()
                .any(|registry| registry.park_id() == park.id());
            if !exists {
                self.attach_trail_registry(park);
            }
        }
    }

    fn attach_trail_registry(&self, park: Rc<Park>) {
        let registry = TrailRegistry::new(Rc::clone(&park));
        let park_subscriber: Weak<dyn Subscriber<ParkEvent>> =
            Rc::<TrailRegistry>::downgrade(&registry);
        park.subscribe(park_subscriber);
        let relay_subscriber: Weak<dyn Subscriber<RegistryEvent>> = self.self_ref.clone();
        registry.subscribe(relay_subscriber);

        debug!(
            "event=trail_registry_create module=coordinator status=ok park_id={}",
            park.id()
        );
        self.trail_registries.borrow_mut().push(registry);
    }
}

impl Subscriber<RegistryEvent> for Relay {
    fn notify(&self, event: &RegistryEvent) {
        if event.kind == RegistryKind::Parks {
            self.sync_trail_registries();
        }
        self.changed.set(true);
        self.events.publish(&ModelEvent::RegistryChanged(event.clone()));
    }
}

impl Coordinator {
    /// Creates an empty, unchanged model.
    pub fn new() -> Self {
        let activities = ActivityRegistry::new();
        let parks = ParkRegistry::new();
        let relay = Rc::new_cyclic(|self_ref| Relay {
            parks: Rc::downgrade(&parks),
            trail_registries: RefCell::new(Vec::new()),
            changed: Cell::new(false),
            events: Publisher::new(),
            self_ref: self_ref.clone(),
        });

        // The relay must be the park registry's first subscriber.
        let subscriber: Weak<dyn Subscriber<RegistryEvent>> = Rc::<Relay>::downgrade(&relay);
        parks.subscribe(subscriber.clone());
        activities.subscribe(subscriber);

        Self {
            activities,
            parks,
            relay,
            file_name: RefCell::new(None),
        }
    }

    pub fn activities(&self) -> &Rc<ActivityRegistry> {
        &self.activities
    }

    pub fn parks(&self) -> &Rc<ParkRegistry> {
        &self.parks
    }

    pub fn trail_registry_count(&self) -> usize {
        self.relay.trail_registries.borrow().len()
    }

    /// Trail registries in park-creation order.
    pub fn trail_registry_at(&self, index: usize) -> Option<Rc<TrailRegistry>> {
        self.relay.trail_registries.borrow().get(index).cloned()
    }

    pub fn trail_registry_for_park(&self, park_name: &str) -> Option<Rc<TrailRegistry>> {
        self.relay
            .trail_registries
            .borrow()
            .iter()
            .find(|registry| registry.park_name() == park_name)
            .cloned()
    }

    /// Trail registries in park name order.
    pub fn trail_registries(&self) -> Vec<Rc<TrailRegistry>> {
        self.parks
            .parks()
            .iter()
            .filter_map(|park| self.trail_registry_for_park(park.name()))
            .collect()
    }

    /// Whether anything changed since the last successful load or save.
    pub fn is_changed(&self) -> bool {
        self.relay.changed.get()
    }

    /// Path of the last successful open or save.
    pub fn file_name(&self) -> Option<PathBuf> {
        self.file_name.borrow().clone()
    }

    pub fn subscribe(&self, subscriber: Weak<dyn Subscriber<ModelEvent>>) {
        self.relay.events.subscribe(subscriber);
    }

    /// Loads `path` into a fresh model and swaps it in only on success.
    ///
    /// Existing model subscribers carry over and receive `ModelEvent::Reloaded`.
    pub fn open_file(&mut self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let loaded = open(path)?;
        loaded.relay.events.adopt_subscribers(&self.relay.events);
        *self = loaded;
        self.relay.events.publish(&ModelEvent::Reloaded);
        Ok(())
    }

    /// Writes the model to `path`; the dirty flag clears only on success.
    pub fn save_file(&self, path: impl AsRef<Path>) -> Result<(), SaveError> {
        save(self, path)
    }

    pub(crate) fn mark_unchanged(&self) {
        self.relay.changed.set(false);
    }

    pub(crate) fn set_file_name(&self, path: &Path) {
        *self.file_name.borrow_mut() = Some(path.to_path_buf());
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Coordinator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("activities", &self.activities.len())
            .field("parks", &self.parks.len())
            .field("trail_registries", &self.trail_registry_count())
            .field("changed", &self.is_changed())
            .field("file_name", &self.file_name.borrow())
            .finish()
    }
}

/// Reads and decodes `path` into a new, unchanged model.
pub fn open(path: impl AsRef<Path>) -> Result<Coordinator, LoadError> {
    let path = path.as_ref();
    let coordinator = codec::load_file(path)?;
    coordinator.set_file_name(path);
    Ok(coordinator)
}

/// Encodes `coordinator` and writes it to `path`.
pub fn save(coordinator: &Coordinator, path: impl AsRef<Path>) -> Result<(), SaveError> {
    let path = path.as_ref();
    codec::save_file(coordinator, path)?;
    coordinator.mark_unchanged();
    coordinator.set_file_name(path);
    Ok(())
}
