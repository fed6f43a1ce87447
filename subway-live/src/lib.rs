//! Real-time subway position and transfer coordination.
//!
//! Answers, from live feed data: "where is my train right now, and
//! which connection should I run for when it arrives?"

pub mod directory;
pub mod domain;
pub mod format;
pub mod poll;
pub mod position;
pub mod transfer;
pub mod transiter;
