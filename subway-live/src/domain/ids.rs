//! Opaque identifiers for stops and trips.

use std::fmt;

/// Directional platform suffixes used by the upstream feed.
///
/// A stop id like `"127N"` is the northbound platform of station `"127"`.
const DIRECTION_SUFFIXES: [char; 2] = ['N', 'S'];

/// A raw stop identifier as supplied by the provider.
///
/// Stop ids may carry a single trailing directional suffix (`N` or `S`)
/// naming one platform of a station. [`StopId::base`] strips it.
///
/// # Examples
///
/// ```
/// use subway_live::domain::StopId;
///
/// let northbound = StopId::new("127N");
/// assert_eq!(northbound.base().as_str(), "127");
///
/// let station = StopId::new("127");
/// assert_eq!(station.base(), station);
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopId(String);

impl StopId {
    /// Create a stop id from a raw provider string.
    pub fn new(id: impl Into<String>) -> Self {
        StopId(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the id ends in a directional platform suffix.
    pub fn has_direction_suffix(&self) -> bool {
        self.0
            .chars()
            .last()
            .is_some_and(|c| DIRECTION_SUFFIXES.contains(&c))
            && self.0.len() > 1
    }

    /// The id with a single trailing directional suffix removed.
    ///
    /// Ids without a suffix are returned unchanged. Only one suffix
    /// character is ever stripped.
    pub fn base(&self) -> StopId {
        if self.has_direction_suffix() {
            StopId(self.0[..self.0.len() - 1].to_string())
        } else {
            self.clone()
        }
    }
}

impl fmt::Debug for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopId({})", self.0)
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An opaque trip identifier.
///
/// Trip ids are ephemeral: they identify one scheduled run and are only
/// meaningful while the provider still reports that run.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TripId(String);

impl TripId {
    /// Create a trip id from a raw provider string.
    pub fn new(id: impl Into<String>) -> Self {
        TripId(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TripId({})", self.0)
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
