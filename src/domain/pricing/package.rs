//! Package options: hotel tier, travel mode and journey dates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::PricingError;
use crate::domain::foundation::ValidationError;

/// Accommodation level for the trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HotelTier {
    Basic,
    Standard,
    Premium,
}

impl HotelTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            HotelTier::Basic => "basic",
            HotelTier::Standard => "standard",
            HotelTier::Premium => "premium",
        }
    }

    /// Returns all tiers.
    pub fn all() -> &'static [HotelTier] {
        &[HotelTier::Basic, HotelTier::Standard, HotelTier::Premium]
    }
}

impl fmt::Display for HotelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HotelTier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(HotelTier::Basic),
            "standard" => Ok(HotelTier::Standard),
            "premium" => Ok(HotelTier::Premium),
            other => Err(ValidationError::invalid_format(
                "hotel_tier",
                format!("unknown hotel tier '{}'", other),
            )),
        }
    }
}

/// How the traveler reaches the start point. Travel is paid separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[serde(rename = "self")]
    SelfArranged,
    Train,
    Flight,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::SelfArranged => "self",
            TravelMode::Train => "train",
            TravelMode::Flight => "flight",
        }
    }

    pub fn all() -> &'static [TravelMode] {
        &[TravelMode::SelfArranged, TravelMode::Train, TravelMode::Flight]
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "self" => Ok(TravelMode::SelfArranged),
            "train" => Ok(TravelMode::Train),
            "flight" => Ok(TravelMode::Flight),
            other => Err(ValidationError::invalid_format(
                "travel_mode",
                format!("unknown travel mode '{}'", other),
            )),
        }
    }
}

/// Inclusive journey date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyDates {
    start: NaiveDate,
    end: NaiveDate,
}

impl JourneyDates {
    /// Creates a date range, rejecting an end before the start.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PricingError> {
        if end < start {
            return Err(PricingError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days, counting both ends.
    pub fn num_days(&self) -> u32 {
        (self.end - self.start).num_days() as u32 + 1
    }
}
