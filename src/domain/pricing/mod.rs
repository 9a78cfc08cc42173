//! Pricing domain - package options and price computation.

mod calculator;
mod errors;
mod package;
mod rates;

pub use calculator::{
    AgeBracket, PricingCalculator, PricingRequest, Quote, CHILD_NOTE, INFANT_NOTE, MAX_AGE,
    MIN_AGE, YOUTH_NOTE,
};
pub use errors::PricingError;
pub use package::{HotelTier, JourneyDates, TravelMode};
pub use rates::PricingRates;
