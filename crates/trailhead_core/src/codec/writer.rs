//! Serializer producing the format read by the parser.

use super::{
    ACTIVITIES_SECTION, FIELD_DELIMITER, HEADER_MARKER, PARKS_SECTION, RECORD_MARKER,
    TRAILS_SECTION,
};
use crate::coordinator::Coordinator;
use std::fmt::Write as _;

pub(super) fn write(model: &Coordinator) -> String {
    let mut out = String::new();

    section(&mut out, ACTIVITIES_SECTION, true);
    for activity in model.activities().activities() {
        record(
            &mut out,
            [
                clean_text(activity.name()),
                clean_text(&activity.description()),
                activity.needs_snow().to_string(),
                activity.snow_boundary().to_string(),
            ],
        );
    }

    section(&mut out, PARKS_SECTION, false);
    for park in model.parks().parks() {
        record(
            &mut out,
            [
                clean_text(park.name()),
                clean_text(&park.description()),
                format_float(park.snow_delta()),
            ],
        );
    }

    section(&mut out, TRAILS_SECTION, false);
    for registry in model.trail_registries() {
        let park_name = clean_text(registry.park_name());
        for trail in registry.trails() {
            let fixed = [
                park_name.clone(),
                clean_text(trail.name()),
                trail.closed_for_maintenance().to_string(),
                format_float(trail.snow_depth()),
                format_float(trail.distance()),
                trail.difficulty().as_str().to_string(),
            ];
            let activities = trail
                .permitted_activity_names()
                .into_iter()
                .map(|name| clean_text(&name));
            record(&mut out, fixed.into_iter().chain(activities));
        }
    }

    out
}

fn section(out: &mut String, name: &str, first: bool) {
    if !first {
        out.push('\n');
    }
    let _ = writeln!(out, "{HEADER_MARKER} {name}");
    out.push('\n');
}

fn record(out: &mut String, fields: impl IntoIterator<Item = String>) {
    out.push_str(RECORD_MARKER);
    for field in fields {
        out.push(FIELD_DELIMITER);
        out.push_str(&field);
    }
    out.push('\n');
}

/// Collapses line breaks and tabs so a value stays one field on one line.
fn clean_text(value: &str) -> String {
    let mut cleaned = String::with_capacity(value.len());
    let mut in_break = false;
    for ch in value.chars() {
        if matches!(ch, '\r' | '\n' | FIELD_DELIMITER) {
            if !in_break {
                cleaned.push(' ');
            }
            in_break = true;
        } else {
            cleaned.push(ch);
            in_break = false;
        }
    }
    cleaned
}

/// Whole numbers keep one fractional digit (`10.0`).
fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}
