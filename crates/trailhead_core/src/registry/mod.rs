//! Owning registries for each entity kind.
//!
//! # Responsibility
//! - Mint identifiers, enforce name uniqueness and keep name order.
//! - Relay entity mutations as one "registry contents changed" event.
//!
//! # Invariants
//! - Ids are `<prefix>-<n>`; `n` comes from a per-registry counter that only
//!   advances on a successful insert and is never reused or decremented.
//! - `add` returns `Err` for invalid fields, `Ok(false)` for a valid duplicate
//!   (no mutation, no event) and `Ok(true)` after insert + publish.
//! - Events from entities no longer held by the registry are ignored.
//! - No internal borrow is held while an event is published.

pub mod activity_registry;
pub mod park_registry;
pub mod table;
pub mod trail_registry;
