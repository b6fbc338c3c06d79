//! Trail domain model.
//!
//! # Responsibility
//! - Hold one trail's maintenance status, snow depth, distance, difficulty
//!   and permitted activities.
//! - Decide whether the trail is currently open for an activity.
//!
//! # Invariants
//! - Equality and ordering use `name` only: two trails with the same name
//!   are the "same" trail regardless of id.
//! - `snow_depth` never goes below zero; negative inputs clamp to 0.
//! - `distance` is never negative.
//! - Permitted activities are shared handles, not copies, so later changes to
//!   an activity's snow rule are seen by `is_open_for` immediately.

use crate::collections::{OrderedContainer, SortedArrayList};
use crate::event::{Publisher, Subscriber, TrailEvent};
use crate::model::activity::Activity;
use crate::model::difficulty::Difficulty;
use crate::model::validation::{require_finite, require_text, ValidationError};
use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::rc::{Rc, Weak};

/// Permitted-activity set held by a trail.
pub type ActivitySet = SortedArrayList<Rc<Activity>>;

/// Named path inside exactly one park.
#[derive(Debug)]
pub struct Trail {
    id: String,
    name: String,
    closed_for_maintenance: Cell<bool>,
    snow_depth: Cell<f64>,
    distance: Cell<f64>,
    difficulty: Cell<Difficulty>,
    permitted: RefCell<ActivitySet>,
    events: Publisher<TrailEvent>,
}

impl Trail {
    /// Creates a validated trail. A negative `snow_depth` is clamped to 0.
    ///
    /// # Errors
    /// - `BlankField` for a blank `id` or `name`.
    /// - `NegativeDistance` when `distance < 0`.
    /// - `NonFiniteNumber` for NaN/infinite snow depth or distance.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        permitted: ActivitySet,
        closed_for_maintenance: bool,
        snow_depth: f64,
        distance: f64,
        difficulty: Difficulty,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: require_text(id, "trail id")?,
            name: require_text(name, "trail name")?,
            closed_for_maintenance: Cell::new(closed_for_maintenance),
            snow_depth: Cell::new(clamp_depth(require_finite(snow_depth, "snow depth")?)),
            distance: Cell::new(validate_distance(distance)?),
            difficulty: Cell::new(difficulty),
            permitted: RefCell::new(permitted),
            events: Publisher::new(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn closed_for_maintenance(&self) -> bool {
        self.closed_for_maintenance.get()
    }

    pub fn snow_depth(&self) -> f64 {
        self.snow_depth.get()
    }

    pub fn distance(&self) -> f64 {
        self.distance.get()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty.get()
    }

    /// Permitted activities in name order.
    pub fn permitted_activities(&self) -> Vec<Rc<Activity>> {
        self.permitted.borrow().iter().cloned().collect()
    }

    pub fn permitted_activity_names(&self) -> Vec<String> {
        self.permitted
            .borrow()
            .iter()
            .map(|activity| activity.name().to_string())
            .collect()
    }

    /// Whether `activity` is in this trail's permitted set.
    pub fn allows(&self, activity: &Activity) -> bool {
        self.permitted.borrow().contains(activity)
    }

    /// Open when not under maintenance, the activity is permitted, and the
    /// current snow depth satisfies the activity's snow rule.
    pub fn is_open_for(&self, activity: &Activity) -> bool {
        !self.closed_for_maintenance()
            && self.allows(activity)
            && activity.allows_snow_depth(self.snow_depth())
    }

    pub fn set_closed_for_maintenance(&self, closed: bool) {
        self.closed_for_maintenance.set(closed);
        self.publish();
    }

    /// Sets the depth directly; negative values clamp to 0.
    pub fn set_snow_depth(&self, snow_depth: f64) -> Result<(), ValidationError> {
        let snow_depth = require_finite(snow_depth, "snow depth")?;
        self.snow_depth.set(clamp_depth(snow_depth));
        self.publish();
        Ok(())
    }

    /// Adds a signed snowfall/melt; the result clamps to 0.
    pub fn add_snow(&self, delta: f64) -> Result<(), ValidationError> {
        let delta = require_finite(delta, "snow delta")?;
        self.apply_snow_delta(delta);
        self.publish();
        Ok(())
    }

    pub fn set_distance(&self, distance: f64) -> Result<(), ValidationError> {
        self.distance.set(validate_distance(distance)?);
        self.publish();
        Ok(())
    }

    pub fn set_difficulty(&self, difficulty: Difficulty) {
        self.difficulty.set(difficulty);
        self.publish();
    }

    pub fn set_permitted_activities(&self, permitted: ActivitySet) {
        *self.permitted.borrow_mut() = permitted;
        self.publish();
    }

    pub fn subscribe(&self, subscriber: Weak<dyn Subscriber<TrailEvent>>) {
        self.events.subscribe(subscriber);
    }

    /// Applies a delta without publishing; the owning registry publishes once
    /// for the whole fan-out.
    pub(crate) fn apply_snow_delta(&self, delta: f64) {
        self.snow_depth.set(clamp_depth(self.snow_depth.get() + delta));
    }

    fn publish(&self) {
        self.events.publish(&TrailEvent {
            trail_id: self.id.clone(),
        });
    }
}

fn clamp_depth(snow_depth: f64) -> f64 {
    snow_depth.max(0.0)
}

fn validate_distance(distance: f64) -> Result<f64, ValidationError> {
    let distance = require_finite(distance, "distance")?;
    if distance < 0.0 {
        return Err(ValidationError::NegativeDistance(distance));
    }
    Ok(distance)
}

impl PartialEq for Trail {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Trail {}

impl PartialOrd for Trail {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Trail {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}
