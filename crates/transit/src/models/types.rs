//! Core enums and errors shared across the crate.

use std::fmt;
use std::str::FromStr;

// ============================================================================
// Enums
// ============================================================================

/// GTFS route types, as exposed by the `type` attribute of a route record
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
#[repr(u8)]
pub enum RouteType {
    Tram = 0,
    Subway = 1,
    Rail = 2,
    Bus = 3,
    Ferry = 4,
    CableTram = 5,
    AerialLift = 6,
    Funicular = 7,
}

impl RouteType {
    pub fn from_gtfs(value: u16) -> Option<Self> {
        match value {
            0 => Some(Self::Tram),
            1 => Some(Self::Subway),
            2 => Some(Self::Rail),
            3 => Some(Self::Bus),
            4 => Some(Self::Ferry),
            5 => Some(Self::CableTram),
            6 => Some(Self::AerialLift),
            7 => Some(Self::Funicular),
            _ => None,
        }
    }

    pub fn as_gtfs(self) -> u16 {
        self as u16
    }
}

/// Trip direction (0 = outbound, 1 = inbound per GTFS)
///
/// Upstream filters take the numeric form; anything other than 0 or 1 is
/// rejected at parse time so a toggle can never land on a third value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DirectionId {
    Outbound = 0,
    Inbound = 1,
}

impl DirectionId {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// The opposite direction along the same route
    pub fn toggled(self) -> Self {
        match self {
            Self::Outbound => Self::Inbound,
            Self::Inbound => Self::Outbound,
        }
    }
}

impl TryFrom<u8> for DirectionId {
    type Error = TransitError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Outbound),
            1 => Ok(Self::Inbound),
            other => Err(TransitError::InvalidDirection(other.to_string())),
        }
    }
}

impl FromStr for DirectionId {
    type Err = TransitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "0" => Ok(Self::Outbound),
            "1" => Ok(Self::Inbound),
            other => Err(TransitError::InvalidDirection(other.to_owned())),
        }
    }
}

/// Serialized as `0` / `1`, the same form the upstream filter and the
/// schedule path segment accept
#[cfg(feature = "serialize")]
impl serde::Serialize for DirectionId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

impl fmt::Display for DirectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid direction: {0} (expected 0 or 1)")]
    InvalidDirection(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, TransitError>;
