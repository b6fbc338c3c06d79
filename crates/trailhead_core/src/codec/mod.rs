//! Flat-file persistence for the whole model.
//!
//! # Responsibility
//! - Decode the sectioned, tab-delimited text format into a fresh
//!   `Coordinator` and encode a `Coordinator` back into it.
//! - Wrap both halves with file I/O and load/save diagnostics.
//!
//! # Invariants
//! - Sections appear as `Activities`, `Parks`, `Trails`, in that order.
//! - Decoding is all-or-nothing: the first malformed line aborts the load.
//! - Encoding writes every registry in its natural (name) order, one record
//!   per line.
//! - Diagnostics carry metadata only (counts, line numbers, error codes),
//!   never record text.

mod parser;
mod writer;

pub use parser::{ParseError, ParseErrorKind, ParserState};

use crate::coordinator::Coordinator;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub const HEADER_MARKER: char = '#';
pub const RECORD_MARKER: &str = "*";
pub const FIELD_DELIMITER: char = '\t';

pub const ACTIVITIES_SECTION: &str = "Activities";
pub const PARKS_SECTION: &str = "Parks";
pub const TRAILS_SECTION: &str = "Trails";

/// Failure to read and decode a model file.
#[derive(Debug)]
pub enum LoadError {
    Io { path: PathBuf, source: io::Error },
    Parse(ParseError),
}

impl LoadError {
    /// Stable machine-readable code used in diagnostics.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "file_read_failed",
            Self::Parse(_) => "file_parse_failed",
        }
    }
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<ParseError> for LoadError {
    fn from(value: ParseError) -> Self {
        Self::Parse(value)
    }
}

/// Failure to write a model file.
#[derive(Debug)]
pub enum SaveError {
    Io { path: PathBuf, source: io::Error },
}

impl Display for SaveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot write `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for SaveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Decodes a whole file's text into a new, unchanged model.
///
/// # Errors
/// - The first `ParseError` encountered; nothing is returned on failure.
pub fn decode(input: &str) -> Result<Coordinator, ParseError> {
    parser::parse(input.as_bytes())
}

/// Decodes raw file bytes; a line that is not UTF-8 fails with
/// `ParseErrorKind::InvalidEncoding`.
pub fn decode_bytes(input: &[u8]) -> Result<Coordinator, ParseError> {
    parser::parse(input)
}

/// Encodes `coordinator` into the text format accepted by [`decode`].
pub fn encode(coordinator: &Coordinator) -> String {
    writer::write(coordinator)
}

pub(crate) fn load_file(path: &Path) -> Result<Coordinator, LoadError> {
    let started_at = Instant::now();
    info!("event=file_load module=codec status=start");

    let result = std::fs::read(path)
        .map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })
        .and_then(|bytes| decode_bytes(&bytes).map_err(LoadError::from));

    match result {
        Ok(coordinator) => {
            info!(
                "event=file_load module=codec status=ok duration_ms={} activities={} parks={} trail_registries={}",
                started_at.elapsed().as_millis(),
                coordinator.activities().len(),
                coordinator.parks().len(),
                coordinator.trail_registry_count()
            );
            Ok(coordinator)
        }
        Err(err) => {
            let line_number = match &err {
                LoadError::Parse(parse) => parse.line_number,
                LoadError::Io { .. } => 0,
            };
            error!(
                "event=file_load module=codec status=error duration_ms={} error_code={} line={}",
                started_at.elapsed().as_millis(),
                err.code(),
                line_number
            );
            Err(err)
        }
    }
}

pub(crate) fn save_file(coordinator: &Coordinator, path: &Path) -> Result<(), SaveError> {
    let started_at = Instant::now();
    info!("event=file_save module=codec status=start");

    let text = encode(coordinator);
    match std::fs::write(path, text.as_bytes()) {
        Ok(()) => {
            info!(
                "event=file_save module=codec status=ok duration_ms={} bytes={}",
                started_at.elapsed().as_millis(),
                text.len()
            );
            Ok(())
        }
        Err(source) => {
            error!(
                "event=file_save module=codec status=error duration_ms={} error_code=file_write_failed kind={:?}",
                started_at.elapsed().as_millis(),
                source.kind()
            );
            Err(SaveError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}
