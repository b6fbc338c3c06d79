//! Domain model for parks, trails and activities.
//!
//! # Responsibility
//! - Define validated value-holders with stable identity fields.
//! - Publish typed change events when a mutable field changes.
//!
//! # Invariants
//! - Identity fields (`id`, `name`) never change after construction.
//! - Equality and ordering of every entity use its name only.

pub mod activity;
pub mod difficulty;
pub mod park;
pub mod trail;
pub mod validation;
