use std::cell::RefCell;
use std::rc::{Rc, Weak};
use trailhead_core::{
    Activity, ActivityEvent, ActivitySet, Difficulty, OrderedContainer, Park, ParkEvent,
    Subscriber, Trail, TrailEvent, UnknownDifficulty, ValidationError,
};

fn ski() -> Rc<Activity> {
    Rc::new(Activity::new("act-0", "Ski", "Skiing", true, 5).unwrap())
}

fn trail_with(permitted: &[&Rc<Activity>], closed: bool, snow_depth: f64) -> Trail {
    let mut set = ActivitySet::new();
    for activity in permitted {
        set.add(Rc::clone(activity)).unwrap();
    }
    Trail::new(
        "park-0-0",
        "Main",
        set,
        closed,
        snow_depth,
        2.0,
        Difficulty::Easy,
    )
    .unwrap()
}

#[test]
fn activity_fields_are_trimmed_and_validated() {
    let activity = Activity::new(" act-0 ", "  Ski ", " Skiing ", true, 5).unwrap();
    assert_eq!(activity.id(), "act-0");
    assert_eq!(activity.name(), "Ski");
    assert_eq!(activity.description(), "Skiing");

    assert!(matches!(
        Activity::new("act-1", "   ", "Skiing", true, 5),
        Err(ValidationError::BlankField(_))
    ));
    assert!(matches!(
        Activity::new("act-1", "Ski", "", true, 5),
        Err(ValidationError::BlankField(_))
    ));
    assert_eq!(
        Activity::new("act-1", "Ski", "Skiing", true, -3).unwrap_err(),
        ValidationError::NegativeSnowBoundary(-3)
    );
}

#[test]
fn snow_rule_direction_depends_on_needs_snow() {
    let ski = ski();
    assert!(ski.allows_snow_depth(5.0));
    assert!(!ski.allows_snow_depth(4.9));

    let hike = Activity::new("act-1", "Hike", "Walking", false, 2).unwrap();
    assert!(hike.allows_snow_depth(0.0));
    assert!(hike.allows_snow_depth(2.0));
    assert!(!hike.allows_snow_depth(2.5));
}

#[test]
fn park_rejects_blank_text_and_non_finite_delta() {
    assert!(matches!(
        Park::new("park-0", "", "City park", 0.0),
        Err(ValidationError::BlankField(_))
    ));
    assert!(matches!(
        Park::new("park-0", "Pullen", "City park", f64::NAN),
        Err(ValidationError::NonFiniteNumber(_))
    ));
    let park = Park::new("park-0", "Pullen", "City park", -2.5).unwrap();
    assert_eq!(park.snow_delta(), -2.5);
}

#[test]
fn closed_trail_is_never_open() {
    let ski = ski();
    let trail = trail_with(&[&ski], true, 50.0);
    assert!(trail.allows(&ski));
    assert!(!trail.is_open_for(&ski));

    trail.set_closed_for_maintenance(false);
    assert!(trail.is_open_for(&ski));
}

#[test]
fn activity_rule_changes_are_seen_by_trails() {
    let ski = ski();
    let trail = trail_with(&[&ski], false, 3.0);
    assert!(!trail.is_open_for(&ski));

    ski.set_snow_boundary(3).unwrap();
    assert!(trail.is_open_for(&ski));
}

#[test]
fn entities_compare_by_name_only() {
    let first = Activity::new("act-0", "Ski", "Skiing", true, 5).unwrap();
    let second = Activity::new("act-9", "Ski", "Other", false, 0).unwrap();
    assert_eq!(first, second);

    let alpha = Park::new("park-1", "Alpha", "A", 0.0).unwrap();
    let beta = Park::new("park-0", "Beta", "B", 0.0).unwrap();
    assert!(alpha < beta);
}

#[test]
fn setters_publish_entity_events() {
    let seen = Rc::new(RefCell::new(Vec::new()));

    let activity = ski();
    let activity_log = Rc::clone(&seen);
    let on_activity: Rc<dyn Subscriber<ActivityEvent>> =
        Rc::new(move |event: &ActivityEvent| {
            activity_log.borrow_mut().push(event.activity_id.clone())
        });
    activity.subscribe(Rc::downgrade(&on_activity));

    let park = Park::new("park-0", "Pullen", "City park", 0.0).unwrap();
    let park_log = Rc::clone(&seen);
    let on_park: Rc<dyn Subscriber<ParkEvent>> =
        Rc::new(move |event: &ParkEvent| park_log.borrow_mut().push(format!("{event:?}")));
    park.subscribe(Rc::downgrade(&on_park));

    let trail = trail_with(&[], false, 0.0);
    let trail_log = Rc::clone(&seen);
    let on_trail: Rc<dyn Subscriber<TrailEvent>> =
        Rc::new(move |event: &TrailEvent| trail_log.borrow_mut().push(event.trail_id.clone()));
    let weak: Weak<dyn Subscriber<TrailEvent>> = Rc::downgrade(&on_trail);
    trail.subscribe(weak);

    activity.set_needs_snow(false);
    park.set_snow_delta(-8.0).unwrap();
    trail.set_difficulty(Difficulty::Extreme);

    assert_eq!(
        *seen.borrow(),
        vec![
            "act-0".to_string(),
            "SnowDeltaChanged { park_id: \"park-0\", delta: -8.0 }".to_string(),
            "park-0-0".to_string(),
        ]
    );
}

#[test]
fn difficulty_tokens_match_exactly() {
    assert_eq!("VERY_DIFFICULT".parse::<Difficulty>(), Ok(Difficulty::VeryDifficult));
    assert_eq!(
        "easy".parse::<Difficulty>(),
        Err(UnknownDifficulty("easy".to_string()))
    );
    let tokens: Vec<&str> = Difficulty::ALL.iter().map(|level| level.as_str()).collect();
    assert_eq!(
        tokens,
        vec!["EASY", "MODERATE", "CHALLENGING", "DIFFICULT", "VERY_DIFFICULT", "EXTREME"]
    );
}
