//! Park registry.

use crate::collections::{OrderedContainer, SortedLinkedList};
use crate::event::{ParkEvent, Publisher, RegistryEvent, Subscriber};
use crate::model::park::Park;
use crate::model::validation::ValidationError;
use crate::registry::table::ParkRow;
use log::debug;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

const ID_PREFIX: &str = "park";

/// Name-ordered set of parks. Parks are never removed.
#[derive(Debug)]
pub struct ParkRegistry {
    parks: RefCell<SortedLinkedList<Rc<Park>>>,
    next_id: Cell<u64>,
    events: Publisher<RegistryEvent>,
    self_ref: Weak<ParkRegistry>,
}

impl ParkRegistry {
    pub fn new() -> Rc<Self> {
        Rc::new_cyclic(|self_ref| Self {
            parks: RefCell::new(SortedLinkedList::new()),
            next_id: Cell::new(0),
            events: Publisher::new(),
            self_ref: self_ref.clone(),
        })
    }

    /// Validates, mints `park-<n>` and inserts in name order.
    ///
    /// Subscribers are notified in subscription order; the coordinator
    /// subscribes first so each park's trail registry exists before anyone
    /// else observes the change.
    pub fn add(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        snow_delta: f64,
    ) -> Result<bool, ValidationError> {
        let id = format!("{ID_PREFIX}-{}", self.next_id.get());
        let park = Rc::new(Park::new(id.as_str(), name, description, snow_delta)?);

        if self.parks.borrow_mut().add(Rc::clone(&park)).is_err() {
            debug!("event=park_add module=registry status=rejected reason=duplicate");
            return Ok(false);
        }
        self.next_id.set(self.next_id.get() + 1);

        let subscriber: Weak<dyn Subscriber<ParkEvent>> = self.self_ref.clone();
        park.subscribe(subscriber);
        debug!("event=park_add module=registry status=ok id={id}");
        self.events.publish(&RegistryEvent::parks());
        Ok(true)
    }

    pub fn get_at(&self, index: usize) -> Option<Rc<Park>> {
        self.parks.borrow().get(index).cloned()
    }

    pub fn index_of_id(&self, id: &str) -> Option<usize> {
        self.parks.borrow().iter().position(|park| park.id() == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<Rc<Park>> {
        self.parks
            .borrow()
            .iter()
            .find(|park| park.name() == name)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.parks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.parks.borrow().is_empty()
    }

    /// Snapshot in name order.
    pub fn parks(&self) -> Vec<Rc<Park>> {
        self.parks.borrow().iter().cloned().collect()
    }

    pub fn to_table(&self) -> Vec<ParkRow> {
        self.parks
            .borrow()
            .iter()
            .map(|park| ParkRow::from(park.as_ref()))
            .collect()
    }

    pub fn subscribe(&self, subscriber: Weak<dyn Subscriber<RegistryEvent>>) {
        self.events.subscribe(subscriber);
    }
}

impl Subscriber<ParkEvent> for ParkRegistry {
    fn notify(&self, event: &ParkEvent) {
        if self.index_of_id(event.park_id()).is_some() {
            self.events.publish(&RegistryEvent::parks());
        }
    }
}
