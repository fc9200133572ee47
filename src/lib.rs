//! Core domain logic for recreational sports leagues.
//!
//! The crate is storage- and transport-agnostic: persistence, notification
//! delivery, and payment execution are supplied by the embedding service
//! through the traits in [`league::repository`]. Everything here is the
//! business logic itself — standings computation, the registration state
//! machine, roster moves, pairing, and capacity windows.

pub mod clock;
pub mod config;
pub mod league;
