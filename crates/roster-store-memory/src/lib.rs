//! In-memory backend for the roster store.
//!
//! The whole District → School → Teacher → Course → Student tree lives behind
//! one [`tokio::sync::RwLock`], seeded from a JSON fixture at construction.
//! Nothing is persisted; dropping the store discards every mutation.

mod fixture;
mod index;
mod latency;
mod store;

pub mod error;

pub use error::FixtureError;
pub use fixture::{DEFAULT_FIXTURE, Fixture};
pub use latency::{LatencyProfile, MAX_DELAY, Op};
pub use store::MemoryStore;
