//! Core types and trait definitions for the roster verification store.
//!
//! This crate is deliberately free of HTTP and runtime dependencies.
//! Backends implement [`store::RosterStore`]; the API layer depends only on
//! that trait.

pub mod error;
pub mod model;
pub mod period;
pub mod stats;
pub mod store;
pub mod view;

pub use error::{Entity, Error, Result};
