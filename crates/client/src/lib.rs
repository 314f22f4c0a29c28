//! Client for the Brix readings REST API.
//!
//! Covers readings CRUD, plant reference lookups, aggregate statistics and
//! the health probe. The base URL is passed explicitly; there is no global
//! client.

pub mod client;
pub mod types;

pub use client::{Client, Error};
pub use types::{
    BrixStats, HealthStatus, NewReading, PlantReference, Reading, ReadingPage, ReadingUpdate,
    ReadingsQuery,
};
