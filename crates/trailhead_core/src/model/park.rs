//! Park domain model.
//!
//! # Invariants
//! - `id` and `name` are trimmed, non-blank and immutable.
//! - Equality and ordering use `name` only.
//! - Setting the snow delta is itself the snowfall/melt event: it always
//!   publishes `ParkEvent::SnowDeltaChanged`, even when the value repeats.

use crate::event::{ParkEvent, Publisher, Subscriber};
use crate::model::validation::{require_finite, require_text, ValidationError};
use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::rc::Weak;

/// Named outdoor area with its most recent snow change.
#[derive(Debug)]
pub struct Park {
    id: String,
    name: String,
    description: RefCell<String>,
    snow_delta: Cell<f64>,
    events: Publisher<ParkEvent>,
}

impl Park {
    /// Creates a validated park. Construction does not publish.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        snow_delta: f64,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: require_text(id, "park id")?,
            name: require_text(name, "park name")?,
            description: RefCell::new(require_text(description, "park description")?),
            snow_delta: Cell::new(require_finite(snow_delta, "snow delta")?),
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

    /// Most recent snowfall (positive) or melt (negative).
    pub fn snow_delta(&self) -> f64 {
        self.snow_delta.get()
    }

    pub fn set_description(&self, description: impl Into<String>) -> Result<(), ValidationError> {
        let description = require_text(description, "park description")?;
        *self.description.borrow_mut() = description;
        self.events.publish(&ParkEvent::Updated {
            park_id: self.id.clone(),
        });
        Ok(())
    }

    /// Records a snowfall or melt; subscribed trail registries apply it.
    pub fn set_snow_delta(&self, delta: f64) -> Result<(), ValidationError> {
        let delta = require_finite(delta, "snow delta")?;
        self.snow_delta.set(delta);
        self.events.publish(&ParkEvent::SnowDeltaChanged {
            park_id: self.id.clone(),
            delta,
        });
        Ok(())
    }

    pub fn subscribe(&self, subscriber: Weak<dyn Subscriber<ParkEvent>>) {
        self.events.subscribe(subscriber);
    }
}

impl PartialEq for Park {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Park {}

impl PartialOrd for Park {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Park {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}
