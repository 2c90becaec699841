//! Durable trip facts accumulated across conversation turns

use serde::{Deserialize, Serialize};

/// A place referenced during trip planning
///
/// The name and the coordinates are each optional: an extraction may resolve
/// a place by name before coordinates are known, or hand back bare
/// coordinates picked off a map. A place is usable for routing only once both
/// coordinates are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedPlace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
}

impl NamedPlace {
    /// Both coordinates, when the place has been fully geocoded
    pub fn coords(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    /// Display label: the name when known, otherwise the raw coordinates
    pub fn label(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        match self.coords() {
            Some((lat, lon)) => format!("{lat:.4}, {lon:.4}"),
            None => "unknown location".to_string(),
        }
    }
}

/// Trip-planning facts gathered so far in the session
///
/// Every field is optional; the session starts empty and fields fill in as
/// turns provide them. Timestamps are kept as the ISO 8601 strings the route
/// provider accepts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<NamedPlace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<NamedPlace>,
    /// Round trip: the journey ends where it started
    #[serde(rename = "endAtStart", skip_serializing_if = "Option::is_none")]
    pub end_at_start: Option<bool>,
    /// Intermediate stops, in visiting order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub waypoints: Vec<NamedPlace>,
    /// Free-text description of the user's time constraints
    #[serde(rename = "userTimeConstraintDescription", skip_serializing_if = "Option::is_none")]
    pub time_constraint: Option<String>,
    #[serde(rename = "maxDrivingHoursPerDay", skip_serializing_if = "Option::is_none")]
    pub max_driving_hours_per_day: Option<f64>,
    /// Minutes per day the user is willing to walk
    #[serde(rename = "maxWalkingTime", skip_serializing_if = "Option::is_none")]
    pub max_walking_time: Option<f64>,
    #[serde(rename = "departAt", skip_serializing_if = "Option::is_none")]
    pub depart_at: Option<String>,
    #[serde(rename = "reachBy", skip_serializing_if = "Option::is_none")]
    pub reach_by: Option<String>,
}

impl TripState {
    /// Merge a partial state into this one, field by field
    ///
    /// A field present in `partial` replaces the current value atomically; an
    /// absent field never erases one that was set by an earlier turn.
    /// Waypoints count as one field: a non-empty list replaces the current
    /// list wholesale, an empty list is treated as absent.
    pub fn merge(&mut self, partial: &TripState) {
        if partial.start.is_some() {
            self.start = partial.start.clone();
        }
        if partial.end.is_some() {
            self.end = partial.end.clone();
        }
        if partial.end_at_start.is_some() {
            self.end_at_start = partial.end_at_start;
        }
        if !partial.waypoints.is_empty() {
            self.waypoints = partial.waypoints.clone();
        }
        if partial.time_constraint.is_some() {
            self.time_constraint = partial.time_constraint.clone();
        }
        if partial.max_driving_hours_per_day.is_some() {
            self.max_driving_hours_per_day = partial.max_driving_hours_per_day;
        }
        if partial.max_walking_time.is_some() {
            self.max_walking_time = partial.max_walking_time;
        }
        if partial.depart_at.is_some() {
            self.depart_at = partial.depart_at.clone();
        }
        if partial.reach_by.is_some() {
            self.reach_by = partial.reach_by.clone();
        }
    }

    /// True when no fact has been recorded yet
    pub fn is_empty(&self) -> bool {
        *self == TripState::default()
    }
}
