//! Read-only row projections handed to view layers.

use crate::model::activity::Activity;
use crate::model::difficulty::Difficulty;
use crate::model::park::Park;
use crate::model::trail::Trail;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub needs_snow: bool,
    pub snow_boundary: u32,
}

impl From<&Activity> for ActivityRow {
    fn from(activity: &Activity) -> Self {
        Self {
            id: activity.id().to_string(),
            name: activity.name().to_string(),
            description: activity.description(),
            needs_snow: activity.needs_snow(),
            snow_boundary: activity.snow_boundary(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub snow_delta: f64,
}

impl From<&Park> for ParkRow {
    fn from(park: &Park) -> Self {
        Self {
            id: park.id().to_string(),
            name: park.name().to_string(),
            description: park.description(),
            snow_delta: park.snow_delta(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailRow {
    pub id: String,
    pub name: String,
    pub closed_for_maintenance: bool,
    pub snow_depth: f64,
    pub distance: f64,
    pub difficulty: Difficulty,
    /// Permitted activity names, in name order.
    pub activities: Vec<String>,
}

impl From<&Trail> for TrailRow {
    fn from(trail: &Trail) -> Self {
        Self {
            id: trail.id().to_string(),
            name: trail.name().to_string(),
            closed_for_maintenance: trail.closed_for_maintenance(),
            snow_depth: trail.snow_depth(),
            distance: trail.distance(),
            difficulty: trail.difficulty(),
            activities: trail.permitted_activity_names(),
        }
    }
}
