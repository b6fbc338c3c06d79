//! Activity registry.

use crate::collections::{OrderedContainer, SortedArrayList};
use crate::event::{ActivityEvent, Publisher, RegistryEvent, Subscriber};
use crate::model::activity::Activity;
use crate::model::validation::ValidationError;
use crate::registry::table::ActivityRow;
use log::debug;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

const ID_PREFIX: &str = "act";

/// Global, name-ordered set of activities.
#[derive(Debug)]
pub struct ActivityRegistry {
    activities: RefCell<SortedArrayList<Rc<Activity>>>,
    next_id: Cell<u64>,
    events: Publisher<RegistryEvent>,
    self_ref: Weak<ActivityRegistry>,
}

impl ActivityRegistry {
    pub fn new() -> Rc<Self> {
        Rc::new_cyclic(|self_ref| Self {
            activities: RefCell::new(SortedArrayList::new()),
            next_id: Cell::new(0),
            events: Publisher::new(),
            self_ref: self_ref.clone(),
        })
    }

    /// Validates, mints `act-<n>` and inserts in name order.
    ///
    /// # Errors
    /// - Any `ValidationError` from `Activity::new`; the counter is untouched.
    pub fn add(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        needs_snow: bool,
        snow_boundary: i64,
    ) -> Result<bool, ValidationError> {
        let id = format!("{ID_PREFIX}-{}", self.next_id.get());
        let activity = Rc::new(Activity::new(
            id.as_str(),
            name,
            description,
            needs_snow,
            snow_boundary,
        )?);

        if self.activities.borrow_mut().add(Rc::clone(&activity)).is_err() {
            debug!("event=activity_add module=registry status=rejected reason=duplicate");
            return Ok(false);
        }
        self.next_id.set(self.next_id.get() + 1);

        let subscriber: Weak<dyn Subscriber<ActivityEvent>> = self.self_ref.clone();
        activity.subscribe(subscriber);
        debug!("event=activity_add module=registry status=ok id={id}");
        self.events.publish(&RegistryEvent::activities());
        Ok(true)
    }

    pub fn get_at(&self, index: usize) -> Option<Rc<Activity>> {
        self.activities.borrow().get(index).cloned()
    }

    pub fn index_of_id(&self, id: &str) -> Option<usize> {
        self.activities
            .borrow()
            .iter()
            .position(|activity| activity.id() == id)
    }

    /// Exact (case-sensitive) name lookup.
    pub fn find_by_name(&self, name: &str) -> Option<Rc<Activity>> {
        self.activities
            .borrow()
            .iter()
            .find(|activity| activity.name() == name)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.activities.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.borrow().is_empty()
    }

    /// Snapshot in name order.
    pub fn activities(&self) -> Vec<Rc<Activity>> {
        self.activities.borrow().iter().cloned().collect()
    }

    pub fn to_table(&self) -> Vec<ActivityRow> {
        self.activities
            .borrow()
            .iter()
            .map(|activity| ActivityRow::from(activity.as_ref()))
            .collect()
    }

    pub fn subscribe(&self, subscriber: Weak<dyn Subscriber<RegistryEvent>>) {
        self.events.subscribe(subscriber);
    }
}

impl Subscriber<ActivityEvent> for ActivityRegistry {
    fn notify(&self, event: &ActivityEvent) {
        if self.index_of_id(&event.activity_id).is_some() {
            self.events.publish(&RegistryEvent::activities());
        }
    }
}
