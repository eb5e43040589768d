//! Data Transfer Objects for API requests and responses.
//!
//! Query strings are deserialized with Serde; numeric parameters go through
//! `serde_with` so they can be parsed from their string form.

pub mod health;
pub mod movie;
pub mod search;
