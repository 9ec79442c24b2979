//! Data access adapters for the Placewell engine.
//!
//! Responsibilities:
//! - Provide network-backed implementations of the traits defined in
//!   `placewell-core`, starting with geocoding against Nominatim.
//! - Encapsulate wire formats of external services.
//!
//! Boundaries:
//! - Do not encode scoring or zoning rules (live in `placewell-scorer`).
//! - Keep blocking I/O off async executors; bridge async clients to the
//!   synchronous core traits explicitly.
//!
//! Invariants:
//! - Thread-safe by default where feasible.
//! - No global mutable state.

#![forbid(unsafe_code)]

pub mod geocoding;
