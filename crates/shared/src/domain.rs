use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DomainError;

macro_rules! wire_enum {
    ($name:ident, $err:ident, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value.trim() {
                    $($wire => Ok($name::$variant),)+
                    other => Err(DomainError::$err(other.to_string())),
                }
            }
        }
    };
}

/// Which top-listening list the canvas is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopItemType {
    #[default]
    Tracks,
    Artists,
    Albums,
}

wire_enum!(TopItemType, InvalidItemType, {
    Tracks => "tracks",
    Artists => "artists",
    Albums => "albums",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    ShortTerm,
    #[default]
    MediumTerm,
    LongTerm,
}

wire_enum!(TimeRange, InvalidTimeRange, {
    ShortTerm => "short_term",
    MediumTerm => "medium_term",
    LongTerm => "long_term",
});

/// Number of items placed on the canvas, always within `MIN..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Limit(u8);

impl Limit {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 50;

    pub fn new(value: i64) -> Result<Self, DomainError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(DomainError::LimitOutOfRange {
                value,
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Limit {
    fn default() -> Self {
        Self(10)
    }
}

impl TryFrom<i64> for Limit {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Limit> for i64 {
    fn from(value: Limit) -> Self {
        i64::from(value.0)
    }
}

impl FromStr for Limit {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parsed = value
            .trim()
            .parse::<i64>()
            .map_err(|_| DomainError::LimitNotInteger(value.to_string()))?;
        Self::new(parsed)
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parameters collected from the generation form. Copied by value into every
/// request that needs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CanvasParams {
    #[serde(rename = "type")]
    pub item_type: TopItemType,
    pub time_range: TimeRange,
    pub limit: Limit,
}

impl CanvasParams {
    pub fn new(item_type: TopItemType, time_range: TimeRange, limit: Limit) -> Self {
        Self {
            item_type,
            time_range,
            limit,
        }
    }

    /// Builds params from raw form field values.
    pub fn from_form(item_type: &str, time_range: &str, limit: &str) -> Result<Self, DomainError> {
        Ok(Self {
            item_type: item_type.parse()?,
            time_range: time_range.parse()?,
            limit: limit.parse()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuthState {
    pub logged_in: bool,
}

/// A published canvas as listed by the public gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowcaseItem {
    pub image_filename: String,
    pub creator_name: String,
    #[serde(default)]
    pub creator_spotify_id: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl ShowcaseItem {
    /// Creator id usable for a profile link; blank ids count as absent.
    pub fn creator_profile_id(&self) -> Option<&str> {
        self.creator_spotify_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// Accepts RFC 3339 timestamps, or naive ISO-8601 date-times taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, DomainError> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| DomainError::InvalidTimestamp(raw.to_string()))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}
