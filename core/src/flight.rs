use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical flight identity: the lower-cased callsign.
///
/// `"UAL45"` and `"ual45"` are the same flight. This is the only place
/// callsigns are normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FlightId(String);

impl FlightId {
    pub fn new(raw: &str) -> Self {
        Self(raw.to_lowercase())
    }

    /// Subject of a status line: everything before the first `:`.
    pub fn from_status_line(raw_line: &str) -> Self {
        let subject = raw_line.split(':').next().unwrap_or_default();
        Self::new(subject)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FlightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FlightId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}
