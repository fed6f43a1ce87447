//! Domain types for the live subway tracker.
//!
//! Core model types representing validated transit data. Identifiers and
//! line codes enforce their invariants at construction time; snapshot
//! types are immutable values replaced wholesale on each refresh.

mod ids;
mod line;
mod time;
mod trip;

pub use ids::{StopId, TripId};
pub use line::{InvalidLine, Line};
pub use time::Timestamp;
pub use trip::{Route, StationSnapshot, StopTime, TripSnapshot};
