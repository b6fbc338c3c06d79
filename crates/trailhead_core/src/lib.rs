//! Core domain logic for Trailhead: parks, their trails and the activities
//! each trail permits, with snow-driven open/closed decisions.
//! This crate is the single source of truth for business invariants.

pub mod codec;
pub mod collections;
pub mod coordinator;
pub mod event;
pub mod logging;
pub mod model;
pub mod registry;

pub use codec::{decode, decode_bytes, encode, LoadError, ParseError, ParseErrorKind, ParserState, SaveError};
pub use collections::{ContainerError, OrderedContainer, SortedArrayList, SortedLinkedList};
pub use coordinator::{open, save, Coordinator};
pub use event::{
    ActivityEvent, ModelEvent, ParkEvent, Publisher, RegistryEvent, RegistryKind, Subscriber,
    TrailEvent,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::activity::Activity;
pub use model::difficulty::{Difficulty, UnknownDifficulty};
pub use model::park::Park;
pub use model::trail::{ActivitySet, Trail};
pub use model::validation::ValidationError;
pub use registry::activity_registry::ActivityRegistry;
pub use registry::park_registry::ParkRegistry;
pub use registry::table::{ActivityRow, ParkRow, TrailRow};
pub use registry::trail_registry::TrailRegistry;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
