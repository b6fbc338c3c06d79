//! Activity domain model.
//!
//! # Responsibility
//! - Hold one outdoor pursuit and its snow-dependency rule.
//! - Publish an `ActivityEvent` whenever a mutable field changes.
//!
//! # Invariants
//! - `id` and `name` are trimmed, non-blank and immutable.
//! - Equality and ordering use `name` only.
//! - `snow_boundary` is never negative.

use crate::event::{ActivityEvent, Publisher, Subscriber};
use crate::model::validation::{require_text, ValidationError};
use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::rc::Weak;

/// Outdoor pursuit with a minimum-required or maximum-tolerated snow depth.
#[derive(Debug)]
pub struct Activity {
    id: String,
    name: String,
    description: RefCell<String>,
    needs_snow: Cell<bool>,
    snow_boundary: Cell<u32>,
    events: Publisher<ActivityEvent>,
}

impl Activity {
    /// Creates a validated activity.
    ///
    /// # Errors
    /// - `BlankField` for a blank `id`, `name` or `description`.
    /// - `NegativeSnowBoundary` when `snow_boundary < 0`.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        needs_snow: bool,
        snow_boundary: i64,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: require_text(id, "activity id")?,
            name: require_text(name, "activity name")?,
            description: RefCell::new(require_text(description, "activity description")?),
            needs_snow: Cell::new(needs_snow),
            snow_boundary: Cell::new(validate_boundary(snow_boundary)?),
            events: Publisher::new(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> String {
        self.description.borrow().clone()
    }

    /// `true`: requires depth >= boundary. `false`: requires depth <= boundary.
    pub fn needs_snow(&self) -> bool {
        self.needs_snow.get()
    }

    pub fn snow_boundary(&self) -> u32 {
        self.snow_boundary.get()
    }

    pub fn set_description(&self, description: impl Into<String>) -> Result<(), ValidationError> {
        let description = require_text(description, "activity description")?;
        *self.description.borrow_mut() = description;
        self.publish();
        Ok(())
    }

    pub fn set_needs_snow(&self, needs_snow: bool) {
        self.needs_snow.set(needs_snow);
        self.publish();
    }

    pub fn set_snow_boundary(&self, snow_boundary: i64) -> Result<(), ValidationError> {
        self.snow_boundary.set(validate_boundary(snow_boundary)?);
        self.publish();
        Ok(())
    }

    /// Whether a trail with `snow_depth` satisfies this activity's snow rule.
    pub fn allows_snow_depth(&self, snow_depth: f64) -> bool {
        let boundary = f64::from(self.snow_boundary());
        if self.needs_snow() {
            snow_depth >= boundary
        } else {
            snow_depth <= boundary
        }
    }

    pub fn subscribe(&self, subscriber: Weak<dyn Subscriber<ActivityEvent>>) {
        self.events.subscribe(subscriber);
    }

    fn publish(&self) {
        self.events.publish(&ActivityEvent {
            activity_id: self.id.clone(),
        });
    }
}

fn validate_boundary(snow_boundary: i64) -> Result<u32, ValidationError> {
    if snow_boundary < 0 {
        return Err(ValidationError::NegativeSnowBoundary(snow_boundary));
    }
    u32::try_from(snow_boundary).map_err(|_| ValidationError::SnowBoundaryOutOfRange(snow_boundary))
}

impl PartialEq for Activity {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Activity {}

impl PartialOrd for Activity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Activity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}
