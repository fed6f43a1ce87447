//! Transfer coordination: window classification, candidate discovery,
//! and re-selection after a miss.
//!
//! The split mirrors how the data flows: `window` classifies one
//! arrival/departure pair and tracks alert edges, `candidates` ranks
//! connecting departures from already-fetched snapshots, and
//! `discovery` does the async fan-out that produces those snapshots.

pub mod candidates;
pub mod discovery;
pub mod window;

pub use candidates::{CandidateQuery, MIN_TRANSFER_SECS, TransferCandidate, find_candidates, next_train_on_line};
pub use discovery::{StationSource, TransferNotice, discover_candidates, reselect_connection};
pub use window::{TransferAlert, TransferMonitor, TransferStatus, TransferWindow, evaluate};
