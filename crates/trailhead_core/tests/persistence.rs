use std::cell::Cell;
use std::fs;
use std::rc::Rc;
use trailhead_core::{
    decode, encode, open, save, ActivityRow, Coordinator, Difficulty, LoadError, ModelEvent,
    ParkRow, ParseErrorKind, ParserState, SaveError, Subscriber, TrailRow, ValidationError,
};

const SAMPLE: &str = "# Activities\n\
\n\
*\tSki\tSkiing\ttrue\t5\n\
\n\
# Parks\n\
\n\
*\tPullen\tCity park\t0.0\n\
\n\
# Trails\n\
\n\
*\tPullen\tMain\tfalse\t10.0\t2.0\tEASY\tSki\n";

const RICH: &str = "# Activities\n\
\n\
*\tSnowshoe\tWalking on snow\ttrue\t3\n\
*\tHike\tWalking\tfalse\t1\n\
*\tSki\tSkiing\ttrue\t5\n\
\n\
# Parks\n\
\n\
*\tUmstead\tState park\t2.5\n\
*\tPullen\tCity park\t-8.0\n\
\n\
# Trails\n\
\n\
*\tUmstead\tRidge\ttrue\t12.5\t4.25\tVERY_DIFFICULT\tSki\tSnowshoe\n\
*\tPullen\tMain\tfalse\t10.0\t2.0\tEASY\tSki\tHike\n\
*\tPullen\tCreek\tfalse\t0.0\t1.5\tMODERATE\n";

// Ids are minted in load order, so reloaded rows are compared without them.
fn activity_fields(model: &Coordinator) -> Vec<ActivityRow> {
    model
        .activities()
        .to_table()
        .into_iter()
        .map(|row| ActivityRow { id: String::new(), ..row })
        .collect()
}

fn park_fields(model: &Coordinator) -> Vec<ParkRow> {
    model
        .parks()
        .to_table()
        .into_iter()
        .map(|row| ParkRow { id: String::new(), ..row })
        .collect()
}

fn trail_fields(model: &Coordinator, park_name: &str) -> Vec<TrailRow> {
    model
        .trail_registry_for_park(park_name)
        .unwrap()
        .to_table()
        .into_iter()
        .map(|row| TrailRow { id: String::new(), ..row })
        .collect()
}

fn write_sample(dir: &tempfile::TempDir, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn loaded_park_delta_applies_to_its_trails() {
    let dir = tempfile::tempdir().unwrap();
    let model = open(write_sample(&dir, "sample.txt", SAMPLE)).unwrap();
    assert!(!model.is_changed());

    let pullen = model.parks().find_by_name("Pullen").unwrap();
    pullen.set_snow_delta(-8.0).unwrap();

    let main = model
        .trail_registry_for_park("Pullen")
        .unwrap()
        .find_by_name("Main")
        .unwrap();
    let ski = model.activities().find_by_name("Ski").unwrap();
    assert_eq!(main.snow_depth(), 2.0);
    assert!(!main.is_open_for(&ski));
    assert!(model.is_changed());
}

#[test]
fn duplicate_activity_after_load_is_rejected() {
    let model = decode(SAMPLE).unwrap();
    assert_eq!(model.activities().add("Ski", "Again", false, 0), Ok(false));
    assert_eq!(model.activities().len(), 1);
}

#[test]
fn file_starting_with_parks_fails_and_keeps_prior_state() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_sample(&dir, "good.txt", SAMPLE);
    let bad = write_sample(
        &dir,
        "bad.txt",
        "# Parks\n\n*\tPullen\tCity park\t0.0\n",
    );

    let mut model = open(&good).unwrap();
    let err = model.open_file(&bad).unwrap_err();
    match err {
        LoadError::Parse(parse) => {
            assert_eq!(parse.line_number, 1);
            assert_eq!(parse.state, ParserState::Start);
            assert!(matches!(
                parse.kind,
                ParseErrorKind::UnexpectedHeader { expected: "Activities", .. }
            ));
        }
        other => panic!("expected parse error, got {other:?}"),
    }

    assert_eq!(model.activities().len(), 1);
    assert_eq!(model.parks().len(), 1);
    assert_eq!(model.file_name(), Some(good));

    let mut empty = Coordinator::new();
    assert!(empty.open_file(&bad).is_err());
    assert!(empty.parks().is_empty());
}

#[test]
fn malformed_records_abort_the_load() {
    let cases = [
        ("# Activities\n*\tSki\tSkiing\tyes\t5\n", 2, "bool"),
        ("# Activities\n*\tSki\tSkiing\ttrue\n", 2, "arity"),
        ("# Activities\n*\tSki\tSkiing\ttrue\tfive\n", 2, "int"),
        ("# Activities\n# Parks\n*\tPullen\tCity\tdeep\n", 3, "float"),
        (
            "# Activities\n# Parks\n*\tPullen\tCity\t0.0\n# Trails\n*\tPullen\tMain\tfalse\t1.0\t2.0\tHARD\n",
            5,
            "difficulty",
        ),
        (
            "# Activities\n# Parks\n*\tPullen\tCity\t0.0\n# Trails\n*\tPullen\tMain\tfalse\t1.0\t-2.0\tEASY\n",
            5,
            "validation",
        ),
        ("# Activities\nSki\tSkiing\ttrue\t5\n", 2, "marker"),
        ("# Activities\n# Trails\n", 2, "order"),
    ];

    for (text, line_number, label) in cases {
        let err = decode(text).expect_err(label);
        assert_eq!(err.line_number, line_number, "{label}");
        let expected = match label {
            "bool" => matches!(err.kind, ParseErrorKind::InvalidBool { .. }),
            "arity" => matches!(
                err.kind,
                ParseErrorKind::WrongFieldCount { expected: 4, found: 3 }
            ),
            "int" => matches!(err.kind, ParseErrorKind::InvalidInt { .. }),
            "float" => matches!(err.kind, ParseErrorKind::InvalidFloat { .. }),
            "difficulty" => matches!(err.kind, ParseErrorKind::UnknownDifficulty(_)),
            "validation" => matches!(err.kind, ParseErrorKind::Validation(_)),
            "marker" => matches!(err.kind, ParseErrorKind::MissingRecordMarker),
            _ => matches!(err.kind, ParseErrorKind::UnexpectedHeader { .. }),
        };
        assert!(expected, "{label}: {:?}", err.kind);
    }
}

#[test]
fn unknown_parks_and_activities_are_skipped() {
    let text = "# Activities\n\
*\tSki\tSkiing\ttrue\t5\n\
# Parks\n\
*\tPullen\tCity park\t0.0\n\
# Trails\n\
*\tNowhere\tGhost\tfalse\t1.0\t1.0\tEASY\tSki\n\
*\tPullen\tMain\tfalse\t1.0\t1.0\tEASY\tSki\tKayak\tSki\n";

    let model = decode(text).unwrap();
    let pullen = model.trail_registry_for_park("Pullen").unwrap();
    assert_eq!(pullen.len(), 1);
    assert_eq!(
        pullen.get_at(0).unwrap().permitted_activity_names(),
        vec!["Ski"]
    );
}

#[test]
fn round_trip_preserves_every_field() {
    let first = decode(RICH).unwrap();
    let encoded = encode(&first);
    let second = decode(&encoded).unwrap();

    assert_eq!(activity_fields(&second), activity_fields(&first));
    assert_eq!(park_fields(&second), park_fields(&first));
    assert_eq!(second.trail_registry_count(), first.trail_registry_count());
    for registry in first.trail_registries() {
        let park_name = registry.park_name();
        assert_eq!(trail_fields(&second, park_name), trail_fields(&first, park_name));
    }
    assert_eq!(encode(&second), encoded);

    let ridge = second
        .trail_registry_for_park("Umstead")
        .unwrap()
        .find_by_name("Ridge")
        .unwrap();
    assert_eq!(ridge.difficulty(), Difficulty::VeryDifficult);
    assert!(ridge.closed_for_maintenance());
    assert_eq!(ridge.distance(), 4.25);
}

#[test]
fn encode_writes_sorted_sections() {
    let text = encode(&decode(RICH).unwrap());
    let expected = "# Activities\n\n\
*\tHike\tWalking\tfalse\t1\n\
*\tSki\tSkiing\ttrue\t5\n\
*\tSnowshoe\tWalking on snow\ttrue\t3\n\
\n# Parks\n\n\
*\tPullen\tCity park\t-8.0\n\
*\tUmstead\tState park\t2.5\n\
\n# Trails\n\n\
*\tPullen\tCreek\tfalse\t0.0\t1.5\tMODERATE\n\
*\tPullen\tMain\tfalse\t10.0\t2.0\tEASY\tHike\tSki\n\
*\tUmstead\tRidge\ttrue\t12.5\t4.25\tVERY_DIFFICULT\tSki\tSnowshoe\n";
    assert_eq!(text, expected);
}

#[test]
fn embedded_newlines_are_flattened_on_save() {
    let model = Coordinator::new();
    model.parks().add("Pullen", "City park", 0.0).unwrap();
    model
        .parks()
        .find_by_name("Pullen")
        .unwrap()
        .set_description("Line one\nLine two")
        .unwrap();

    let reloaded = decode(&encode(&model)).unwrap();
    assert_eq!(
        reloaded.parks().get_at(0).unwrap().description(),
        "Line one Line two"
    );
}

#[test]
fn save_clears_dirty_flag_and_records_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("saved.txt");
    let model = decode(SAMPLE).unwrap();
    model.activities().add("Hike", "Walking", false, 1).unwrap();
    assert!(model.is_changed());

    save(&model, &path).unwrap();
    assert!(!model.is_changed());
    assert_eq!(model.file_name(), Some(path.clone()));
    assert_eq!(fs::read_to_string(&path).unwrap(), encode(&model));
}

#[test]
fn failed_save_keeps_dirty_flag() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("saved.txt");
    let model = decode(SAMPLE).unwrap();
    model.activities().add("Hike", "Walking", false, 1).unwrap();

    let err = model.save_file(&path).unwrap_err();
    assert!(matches!(err, SaveError::Io { .. }));
    assert!(model.is_changed());
    assert!(model.file_name().is_none());
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = open(dir.path().join("absent.txt")).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn non_utf8_file_is_a_parse_error_with_its_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("latin1.txt");
    fs::write(&path, b"# Activities\n\n*\tSki\tSk\xee\ttrue\t5\n").unwrap();

    let err = open(&path).unwrap_err();
    assert_eq!(err.code(), "file_parse_failed");
    match err {
        LoadError::Parse(parse) => {
            assert_eq!(parse.line_number, 3);
            assert_eq!(parse.state, ParserState::Activities);
            assert!(matches!(parse.kind, ParseErrorKind::InvalidEncoding { .. }));
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn byte_order_mark_before_the_first_header_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(&dir, "bom.txt", &format!("\u{feff}{SAMPLE}"));
    let model = open(&path).unwrap();
    assert_eq!(model.activities().len(), 1);
    assert_eq!(model.parks().len(), 1);
}

#[test]
fn oversized_snow_boundary_is_out_of_range() {
    let err = decode("# Activities\n*\tSki\tSkiing\ttrue\t4294967296\n").unwrap_err();
    assert_eq!(err.line_number, 2);
    assert_eq!(
        err.kind,
        ParseErrorKind::Validation(ValidationError::SnowBoundaryOutOfRange(4_294_967_296))
    );
}

#[test]
fn reload_keeps_model_subscribers() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(&dir, "sample.txt", SAMPLE);
    let mut model = Coordinator::new();

    let reloads = Rc::new(Cell::new(0));
    let count = Rc::clone(&reloads);
    let subscriber: Rc<dyn Subscriber<ModelEvent>> = Rc::new(move |event: &ModelEvent| {
        if *event == ModelEvent::Reloaded {
            count.set(count.get() + 1);
        }
    });
    model.subscribe(Rc::downgrade(&subscriber));

    model.open_file(&path).unwrap();
    assert_eq!(reloads.get(), 1);
    assert_eq!(model.file_name(), Some(path));

    let before = model.is_changed();
    model.activities().add("Hike", "Walking", false, 1).unwrap();
    assert!(!before);
    assert!(model.is_changed());
}
