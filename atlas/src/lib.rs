//! Authentication and session lifecycle core for the Atlas workspace backend.
//!
//! Transport and process bootstrap live in `server-http`; this crate only
//! receives validated inputs and returns typed results.

pub mod auth;
