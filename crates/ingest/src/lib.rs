//! HTTP ingest surface for game-client snapshots.
//!
//! The game client POSTs one JSON snapshot per update interval. The
//! handler validates it and fans the publishable sections out to the
//! broker. Publish failures degrade service but never fail the request;
//! the client cannot act on them and the next snapshot arrives within
//! a second anyway.

mod api;

pub use api::{AppState, create_router};
