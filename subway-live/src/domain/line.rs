//! Subway line code types.

use std::cmp::Ordering;
use std::fmt;

/// Error returned when parsing an invalid line code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid line code: {reason}")]
pub struct InvalidLine {
    reason: &'static str,
}

/// A subway line code, e.g. `"1"`, `"A"`, `"6X"`, `"SIR"`.
///
/// Line codes are 1-4 ASCII alphanumeric characters, uppercased on parse.
/// Ordering puts purely numeric codes first (ascending by value), then
/// everything else lexicographically. This is the order riders expect on
/// a transfer board: `1`, `2`, `3`, ..., `A`, `C`, `E`.
///
/// # Examples
///
/// ```
/// use subway_live::domain::Line;
///
/// let seven = Line::parse("7").unwrap();
/// let a = Line::parse("a").unwrap();
/// assert_eq!(a.as_str(), "A");
/// assert!(seven < a);
///
/// assert!(Line::parse("").is_err());
/// assert!(Line::parse("TOOLONG").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Line(String);

impl Line {
    /// Parse a line code from a string.
    ///
    /// The input must be 1-4 ASCII alphanumeric characters. Lowercase
    /// input is accepted and uppercased.
    pub fn parse(s: &str) -> Result<Self, InvalidLine> {
        if s.is_empty() {
            return Err(InvalidLine {
                reason: "must not be empty",
            });
        }

        if s.len() > 4 {
            return Err(InvalidLine {
                reason: "must be at most 4 characters",
            });
        }

        if !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(InvalidLine {
                reason: "must be ASCII letters or digits",
            });
        }

        Ok(Line(s.to_ascii_uppercase()))
    }

    /// Returns the line code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric value of a purely numeric code, or `None`.
    ///
    /// `"6"` is numeric; `"6X"` is not.
    fn numeric_value(&self) -> Option<u32> {
        if self.0.bytes().all(|b| b.is_ascii_digit()) {
            self.0.parse().ok()
        } else {
            None
        }
    }

    /// Fallback display color (hex RGB, no `#`) for lines whose route
    /// metadata omits one. Covers the NYC subway trunk colors.
    pub fn default_color(&self) -> &'static str {
        match self.0.as_str() {
            "1" | "2" | "3" => "EE352E",
            "4" | "5" | "6" | "6X" => "00933C",
            "7" | "7X" => "B933AD",
            "A" | "C" | "E" | "SIR" => "0039A6",
            "B" | "D" | "F" | "FX" | "M" => "FF6319",
            "G" => "6CBE45",
            "J" | "Z" => "996633",
            "L" => "A7A9AC",
            "N" | "Q" | "R" | "W" => "FCCC0A",
            _ => "808183",
        }
    }
}

impl Ord for Line {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric_value(), other.numeric_value()) {
            // Equal numeric values fall through to the string comparison
            // so that Ord stays consistent with Eq.
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for Line {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line({})", self.0)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
