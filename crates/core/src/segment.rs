//! User segment policy.
//!
//! Reads are exact-match only: a PRE_PAID request never sees POST_PAID
//! content and vice versa. The schema historically carried a third `ALL`
//! sentinel meaning "both segments"; every current write path coerces it
//! to PRE_PAID and no read path honors it. The coercion lives here, in
//! one place, as a backward-compatibility shim for inbound legacy
//! payloads -- internally the segment is a strict two-value set.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Closed two-value user segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, sqlx::Type)]
#[sqlx(type_name = "user_type")]
pub enum Segment {
    #[serde(rename = "PRE_PAID")]
    #[sqlx(rename = "PRE_PAID")]
    PrePaid,
    #[serde(rename = "POST_PAID")]
    #[sqlx(rename = "POST_PAID")]
    PostPaid,
}

impl Segment {
    /// Segment assumed when a request does not specify one.
    pub const DEFAULT: Segment = Segment::PrePaid;

    /// Parse a `?userType=` query value into the segment used for reads.
    ///
    /// Missing or blank input defaults to PRE_PAID. The legacy `ALL`
    /// value coerces to PRE_PAID. Anything else is rejected.
    pub fn from_query(raw: Option<&str>) -> Result<Segment, CoreError> {
        let Some(raw) = raw else {
            return Ok(Segment::DEFAULT);
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Segment::DEFAULT);
        }
        Segment::parse_lenient(trimmed).ok_or_else(|| CoreError::InvalidSegment(raw.to_string()))
    }

    /// Parse a `?userType=` query value into an optional list filter.
    ///
    /// Differs from [`Segment::from_query`]: here absence, blank, and the
    /// legacy `ALL` value all mean "no segment filter" (admin listings
    /// show both segments), while invalid values are still rejected.
    pub fn filter_from_query(raw: Option<&str>) -> Result<Option<Segment>, CoreError> {
        let Some(raw) = raw else {
            return Ok(None);
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("ALL") {
            return Ok(None);
        }
        Segment::parse_lenient(trimmed)
            .map(Some)
            .ok_or_else(|| CoreError::InvalidSegment(raw.to_string()))
    }

    /// Case-insensitive parse with the legacy `ALL` write shim.
    fn parse_lenient(value: &str) -> Option<Segment> {
        match value.to_ascii_uppercase().as_str() {
            "PRE_PAID" => Some(Segment::PrePaid),
            "POST_PAID" => Some(Segment::PostPaid),
            // Legacy "both segments" sentinel; coerced on write since
            // long before this reimplementation.
            "ALL" => Some(Segment::PrePaid),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::PrePaid => "PRE_PAID",
            Segment::PostPaid => "POST_PAID",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Segment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Segment::parse_lenient(raw.trim()).ok_or_else(|| {
            de::Error::custom(format!(
                "invalid user segment '{raw}': expected PRE_PAID or POST_PAID"
            ))
        })
    }
}
