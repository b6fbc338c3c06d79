//! Per-park trail registry.
//!
//! # Responsibility
//! - Own the trails of exactly one park, minting `<parkId>-<n>` ids.
//! - Apply the park's snowfall/melt events to every trail it owns.
//! - Answer open-trail queries in registry (name) order.
//!
//! # Invariants
//! - One park delta event mutates N trails and publishes exactly one
//!   registry event.
//! - Park events from any other park are ignored.

use crate::collections::{OrderedContainer, SortedArrayList};
use crate::event::{ParkEvent, Publisher, RegistryEvent, Subscriber, TrailEvent};
use crate::model::activity::Activity;
use crate::model::difficulty::Difficulty;
use crate::model::park::Park;
use crate::model::trail::{ActivitySet, Trail};
use crate::model::validation::ValidationError;
use crate::registry::table::TrailRow;
use log::{debug, info};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Name-ordered trails of one park.
#[derive(Debug)]
pub struct TrailRegistry {
    park: Rc<Park>,
    trails: RefCell<SortedArrayList<Rc<Trail>>>,
    next_id: Cell<u64>,
    events: Publisher<RegistryEvent>,
    self_ref: Weak<TrailRegistry>,
}

impl TrailRegistry {
    /// Creates an empty registry for `park`.
    ///
    /// The registry does not subscribe itself to the park; the coordinator
    /// wires that edge (see `Park::subscribe`).
    pub fn new(park: Rc<Park>) -> Rc<Self> {
        Rc::new_cyclic(|self_ref| Self {
            park,
            trails: RefCell::new(SortedArrayList::new()),
            next_id: Cell::new(0),
            events: Publisher::new(),
            self_ref: self_ref.clone(),
        })
    }

    pub fn park(&self) -> &Rc<Park> {
        &self.park
    }

    pub fn park_id(&self) -> &str {
        self.park.id()
    }

    pub fn park_name(&self) -> &str {
        self.park.name()
    }

    /// Validates, mints `<parkId>-<n>` and inserts in name order.
    ///
    /// Trail names only need to be unique within this park.
    pub fn add(
        &self,
        name: impl Into<String>,
        permitted: ActivitySet,
        closed_for_maintenance: bool,
        snow_depth: f64,
        distance: f64,
        difficulty: Difficulty,
    ) -> Result<bool, ValidationError> {
        let id = format!("{}-{}", self.park.id(), self.next_id.get());
        let trail = Rc::new(Trail::new(
            id.as_str(),
            name,
            permitted,
            closed_for_maintenance,
            snow_depth,
            distance,
            difficulty,
        )?);

        if self.trails.borrow_mut().add(Rc::clone(&trail)).is_err() {
            debug!(
                "event=trail_add module=registry status=rejected reason=duplicate park_id={}",
                self.park.id()
            );
            return Ok(false);
        }
        self.next_id.set(self.next_id.get() + 1);

        let subscriber: Weak<dyn Subscriber<TrailEvent>> = self.self_ref.clone();
        trail.subscribe(subscriber);
        debug!("event=trail_add module=registry status=ok id={id}");
        self.publish();
        Ok(true)
    }

    pub fn get_at(&self, index: usize) -> Option<Rc<Trail>> {
        self.trails.borrow().get(index).cloned()
    }

    pub fn index_of_id(&self, id: &str) -> Option<usize> {
        self.trails.borrow().iter().position(|trail| trail.id() == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<Rc<Trail>> {
        self.trails
            .borrow()
            .iter()
            .find(|trail| trail.name() == name)
            .cloned()
    }

    /// Removes the trail at `index`; `None` when out of range.
    pub fn remove_at(&self, index: usize) -> Option<Rc<Trail>> {
        let removed = self.trails.borrow_mut().remove(index).ok()?;
        debug!(
            "event=trail_remove module=registry status=ok id={}",
            removed.id()
        );
        self.publish();
        Some(removed)
    }

    pub fn remove_by_id(&self, id: &str) -> Option<Rc<Trail>> {
        let index = self.index_of_id(id)?;
        self.remove_at(index)
    }

    pub fn len(&self) -> usize {
        self.trails.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.trails.borrow().is_empty()
    }

    /// Snapshot in name order.
    pub fn trails(&self) -> Vec<Rc<Trail>> {
        self.trails.borrow().iter().cloned().collect()
    }

    pub fn to_table(&self) -> Vec<TrailRow> {
        self.rows_where(|_| true)
    }

    /// Trails currently open for `activity`.
    pub fn open_trails_for(&self, activity: &Activity) -> Vec<TrailRow> {
        self.rows_where(|trail| trail.is_open_for(activity))
    }

    /// Trails not closed for maintenance.
    pub fn open_trails_excluding_maintenance(&self) -> Vec<TrailRow> {
        self.rows_where(|trail| !trail.closed_for_maintenance())
    }

    /// Adds a signed snowfall/melt to every trail (clamped at 0), then
    /// publishes once.
    pub fn apply_snow_delta(&self, delta: f64) {
        let count = {
            let trails = self.trails.borrow();
            for trail in trails.iter() {
                trail.apply_snow_delta(delta);
            }
            trails.len()
        };
        info!(
            "event=snow_delta_applied module=registry status=ok park_id={} trails={}",
            self.park.id(),
            count
        );
        self.publish();
    }

    pub fn subscribe(&self, subscriber: Weak<dyn Subscriber<RegistryEvent>>) {
        self.events.subscribe(subscriber);
    }

    fn rows_where(&self, keep: impl Fn(&Trail) -> bool) -> Vec<TrailRow> {
        self.trails
            .borrow()
            .iter()
            .filter(|trail| keep(trail))
            .map(|trail| TrailRow::from(trail.as_ref()))
            .collect()
    }

    fn publish(&self) {
        self.events.publish(&RegistryEvent::trails(self.park.id()));
    }
}

impl Subscriber<TrailEvent> for TrailRegistry {
    fn notify(&self, event: &TrailEvent) {
        if self.index_of_id(&event.trail_id).is_some() {
            self.publish();
        }
    }
}

impl Subscriber<ParkEvent> for TrailRegistry {
    fn notify(&self, event: &ParkEvent) {
        match event {
            ParkEvent::SnowDeltaChanged { park_id, delta } if park_id == self.park.id() => {
                self.apply_snow_delta(*delta);
            }
            _ => {}
        }
    }
}
