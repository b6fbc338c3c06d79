//! Line-oriented, finite-state decoder.
//!
//! Each line is classified as blank, header or content. Content lines are
//! tokenized into a typed record for the current section and applied to the
//! model being built. The state only ever moves forward.

use super::{
    ACTIVITIES_SECTION, FIELD_DELIMITER, HEADER_MARKER, PARKS_SECTION, RECORD_MARKER,
    TRAILS_SECTION,
};
use crate::collections::OrderedContainer;
use crate::coordinator::Coordinator;
use crate::model::difficulty::{Difficulty, UnknownDifficulty};
use crate::model::trail::ActivitySet;
use crate::model::validation::ValidationError;
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

const ACTIVITY_FIELDS: usize = 4;
const PARK_FIELDS: usize = 3;
const TRAIL_FIXED_FIELDS: usize = 6;
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Section the decoder is currently reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    Start,
    Activities,
    Parks,
    Trails,
}

impl ParserState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Activities => "activities",
            Self::Parks => "parks",
            Self::Trails => "trails",
        }
    }
}

impl Display for ParserState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What went wrong on the offending line.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// Line bytes are not UTF-8; `offset` is the first bad byte in the line.
    InvalidEncoding { offset: usize },
    /// Content before any header.
    MissingActivitiesHeader,
    /// A header other than the next expected section.
    UnexpectedHeader {
        expected: &'static str,
        found: String,
    },
    HeaderAfterTrails(String),
    MissingRecordMarker,
    WrongFieldCount { expected: usize, found: usize },
    TooFewFields { minimum: usize, found: usize },
    InvalidBool { field: &'static str, token: String },
    InvalidInt { field: &'static str, token: String },
    InvalidFloat { field: &'static str, token: String },
    UnknownDifficulty(UnknownDifficulty),
    Validation(ValidationError),
}

impl Display for ParseErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEncoding { offset } => {
                write!(f, "line is not valid UTF-8 at byte {offset}")
            }
            Self::MissingActivitiesHeader => {
                write!(f, "file must start with activity information")
            }
            Self::UnexpectedHeader { expected, found } => {
                write!(f, "expected header `{expected}`, found `{found}`")
            }
            Self::HeaderAfterTrails(found) => {
                write!(f, "no headers permitted after Trails, found `{found}`")
            }
            Self::MissingRecordMarker => {
                write!(f, "record must start with `{RECORD_MARKER}`")
            }
            Self::WrongFieldCount { expected, found } => {
                write!(f, "expected {expected} fields, found {found}")
            }
            Self::TooFewFields { minimum, found } => {
                write!(f, "expected at least {minimum} fields, found {found}")
            }
            Self::InvalidBool { field, token } => {
                write!(f, "{field} must be true or false, found `{token}`")
            }
            Self::InvalidInt { field, token } => {
                write!(f, "{field} must be an integer, found `{token}`")
            }
            Self::InvalidFloat { field, token } => {
                write!(f, "{field} must be a number, found `{token}`")
            }
            Self::UnknownDifficulty(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

/// Malformed or out-of-sequence line; aborts the whole load.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// 1-based.
    pub line_number: usize,
    pub line: String,
    pub state: ParserState,
    pub kind: ParseErrorKind,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line {} ({} section): {}: `{}`",
            self.line_number, self.state, self.kind, self.line
        )
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            ParseErrorKind::UnknownDifficulty(err) => Some(err),
            ParseErrorKind::Validation(err) => Some(err),
            _ => None,
        }
    }
}

enum Line<'a> {
    Blank,
    Header(&'a str),
    Content(&'a str),
}

impl<'a> Line<'a> {
    fn classify(raw: &'a str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self::Blank
        } else if let Some(name) = trimmed.strip_prefix(HEADER_MARKER) {
            Self::Header(name.trim())
        } else {
            Self::Content(raw)
        }
    }
}

#[derive(Debug)]
enum Record<'a> {
    Activity {
        name: &'a str,
        description: &'a str,
        needs_snow: bool,
        snow_boundary: i64,
    },
    Park {
        name: &'a str,
        description: &'a str,
        snow_delta: f64,
    },
    Trail {
        park_name: &'a str,
        name: &'a str,
        closed_for_maintenance: bool,
        snow_depth: f64,
        distance: f64,
        difficulty: Difficulty,
        activity_names: Vec<&'a str>,
    },
}

struct Parser {
    state: ParserState,
    model: Coordinator,
}

pub(super) fn parse(input: &[u8]) -> Result<Coordinator, ParseError> {
    let mut parser = Parser {
        state: ParserState::Start,
        model: Coordinator::new(),
    };

    for (index, raw) in input.split(|byte| *byte == b'\n').enumerate() {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        let state = parser.state;
        let fail = |kind: ParseErrorKind| ParseError {
            line_number: index + 1,
            line: String::from_utf8_lossy(raw).into_owned(),
            state,
            kind,
        };

        let text = std::str::from_utf8(raw).map_err(|err| {
            fail(ParseErrorKind::InvalidEncoding {
                offset: err.valid_up_to(),
            })
        })?;
        let text = if index == 0 {
            text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text)
        } else {
            text
        };
        parser.step(text).map_err(fail)?;
    }

    parser.model.mark_unchanged();
    Ok(parser.model)
}

impl Parser {
    fn step(&mut self, raw: &str) -> Result<(), ParseErrorKind> {
        match Line::classify(raw) {
            Line::Blank => Ok(()),
            Line::Header(name) => self.on_header(name),
            Line::Content(content) => self.on_content(content),
        }
    }

    fn on_header(&mut self, name: &str) -> Result<(), ParseErrorKind> {
        let (expected, next) = match self.state {
            ParserState::Start => (ACTIVITIES_SECTION, ParserState::Activities),
            ParserState::Activities => (PARKS_SECTION, ParserState::Parks),
            ParserState::Parks => (TRAILS_SECTION, ParserState::Trails),
            ParserState::Trails => {
                return Err(ParseErrorKind::HeaderAfterTrails(name.to_string()));
            }
        };
        if !name.eq_ignore_ascii_case(expected) {
            return Err(ParseErrorKind::UnexpectedHeader {
                expected,
                found: name.to_string(),
            });
        }
        self.state = next;
        Ok(())
    }

    fn on_content(&mut self, content: &str) -> Result<(), ParseErrorKind> {
        let record = match self.state {
            ParserState::Start => return Err(ParseErrorKind::MissingActivitiesHeader),
            ParserState::Activities => activity_record(&fields(content)?)?,
            ParserState::Parks => park_record(&fields(content)?)?,
            ParserState::Trails => trail_record(&fields(content)?)?,
        };
        self.apply(record)
    }

    fn apply(&self, record: Record<'_>) -> Result<(), ParseErrorKind> {
        match record {
            Record::Activity {
                name,
                description,
                needs_snow,
                snow_boundary,
            } => {
                let inserted = self
                    .model
                    .activities()
                    .add(name, description, needs_snow, snow_boundary)
                    .map_err(ParseErrorKind::Validation)?;
                if !inserted {
                    warn!("event=file_load module=codec status=skipped reason=duplicate_activity");
                }
            }
            Record::Park {
                name,
                description,
                snow_delta,
            } => {
                let inserted = self
                    .model
                    .parks()
                    .add(name, description, snow_delta)
                    .map_err(ParseErrorKind::Validation)?;
                if !inserted {
                    warn!("event=file_load module=codec status=skipped reason=duplicate_park");
                }
            }
            Record::Trail {
                park_name,
                name,
                closed_for_maintenance,
                snow_depth,
                distance,
                difficulty,
                activity_names,
            } => {
                let Some(registry) = self.model.trail_registry_for_park(park_name) else {
                    debug!("event=file_load module=codec status=skipped reason=unknown_park");
                    return Ok(());
                };
                let permitted = self.resolve_activities(&activity_names);
                let inserted = registry
                    .add(
                        name,
                        permitted,
                        closed_for_maintenance,
                        snow_depth,
                        distance,
                        difficulty,
                    )
                    .map_err(ParseErrorKind::Validation)?;
                if !inserted {
                    warn!("event=file_load module=codec status=skipped reason=duplicate_trail");
                }
            }
        }
        Ok(())
    }

    /// Exact-name matches only; unknown names are dropped.
    fn resolve_activities(&self, names: &[&str]) -> ActivitySet {
        let mut permitted = ActivitySet::new();
        for name in names {
            match self.model.activities().find_by_name(name) {
                Some(activity) => {
                    // Repeated names in one record collapse to one entry.
                    let _ = permitted.add(Rc::clone(&activity));
                }
                None => {
                    debug!("event=file_load module=codec status=skipped reason=unknown_activity");
                }
            }
        }
        permitted
    }
}

/// Splits a content line and consumes the leading record marker.
fn fields(content: &str) -> Result<Vec<&str>, ParseErrorKind> {
    let mut tokens = content.split(FIELD_DELIMITER).map(str::trim);
    match tokens.next() {
        Some(RECORD_MARKER) => Ok(tokens.collect()),
        _ => Err(ParseErrorKind::MissingRecordMarker),
    }
}

fn activity_record<'a>(fields: &[&'a str]) -> Result<Record<'a>, ParseErrorKind> {
    expect_exact(fields, ACTIVITY_FIELDS)?;
    Ok(Record::Activity {
        name: fields[0],
        description: fields[1],
        needs_snow: parse_bool(fields[2], "needs snow")?,
        snow_boundary: parse_int(fields[3], "snow boundary")?,
    })
}

fn park_record<'a>(fields: &[&'a str]) -> Result<Record<'a>, ParseErrorKind> {
    expect_exact(fields, PARK_FIELDS)?;
    Ok(Record::Park {
        name: fields[0],
        description: fields[1],
        snow_delta: parse_float(fields[2], "snow delta")?,
    })
}

fn trail_record<'a>(fields: &[&'a str]) -> Result<Record<'a>, ParseErrorKind> {
    if fields.len() < TRAIL_FIXED_FIELDS {
        return Err(ParseErrorKind::TooFewFields {
            minimum: TRAIL_FIXED_FIELDS,
            found: fields.len(),
        });
    }
    let difficulty = fields[5]
        .parse::<Difficulty>()
        .map_err(ParseErrorKind::UnknownDifficulty)?;
    Ok(Record::Trail {
        park_name: fields[0],
        name: fields[1],
        closed_for_maintenance: parse_bool(fields[2], "closed for maintenance")?,
        snow_depth: parse_float(fields[3], "snow depth")?,
        distance: parse_float(fields[4], "distance")?,
        difficulty,
        activity_names: fields[TRAIL_FIXED_FIELDS..]
            .iter()
            .copied()
            .filter(|name| !name.is_empty())
            .collect(),
    })
}

fn expect_exact(fields: &[&str], expected: usize) -> Result<(), ParseErrorKind> {
    if fields.len() != expected {
        return Err(ParseErrorKind::WrongFieldCount {
            expected,
            found: fields.len(),
        });
    }
    Ok(())
}

fn parse_bool(token: &str, field: &'static str) -> Result<bool, ParseErrorKind> {
    if token.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if token.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ParseErrorKind::InvalidBool {
            field,
            token: token.to_string(),
        })
    }
}

fn parse_int(token: &str, field: &'static str) -> Result<i64, ParseErrorKind> {
    token.parse().map_err(|_| ParseErrorKind::InvalidInt {
        field,
        token: token.to_string(),
    })
}

fn parse_float(token: &str, field: &'static str) -> Result<f64, ParseErrorKind> {
    token.parse().map_err(|_| ParseErrorKind::InvalidFloat {
        field,
        token: token.to_string(),
    })
}
