//! Package price computation.
//!
//! Pricing is a pure function of the request and the rate table:
//!
//! - Youth membership codes buy a fixed package (basic hotel, train travel).
//! - Otherwise hotel and food are charged per day, with the age bracket
//!   deciding the share paid. Travel is always settled later and quoted at zero.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{HotelTier, JourneyDates, PricingError, PricingRates, TravelMode};
use crate::domain::foundation::Money;
use crate::domain::membership::is_youth_code;

pub const MIN_AGE: i32 = 0;
pub const MAX_AGE: i32 = 150;

pub const YOUTH_NOTE: &str = "Youth membership fixed package";
pub const INFANT_NOTE: &str = "Child (≤5 years): free hotel & food";
pub const CHILD_NOTE: &str = "Child (6-10 years): 50% off hotel & food";

/// Share of hotel and food a traveler pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeBracket {
    /// Age 0 to 5: free.
    Infant,
    /// Age 6 to 10: half price.
    Child,
    Adult,
}

impl AgeBracket {
    pub fn for_age(age: i32) -> Self {
        match age {
            a if a <= 5 => AgeBracket::Infant,
            6..=10 => AgeBracket::Child,
            _ => AgeBracket::Adult,
        }
    }

    /// Minors travel under a guardian and inherit their package.
    pub fn is_minor(&self) -> bool {
        !matches!(self, AgeBracket::Adult)
    }

    fn apply(&self, amount: Money) -> Money {
        match self {
            AgeBracket::Infant => Money::ZERO,
            AgeBracket::Child => amount.half(),
            AgeBracket::Adult => amount,
        }
    }

    fn note(&self) -> Option<&'static str> {
        match self {
            AgeBracket::Infant => Some(INFANT_NOTE),
            AgeBracket::Child => Some(CHILD_NOTE),
            AgeBracket::Adult => None,
        }
    }
}

/// Input to [`PricingCalculator::compute_price`].
#[derive(Debug, Clone, Copy)]
pub struct PricingRequest<'a> {
    pub age: i32,
    pub hotel_tier: HotelTier,
    pub travel_mode: TravelMode,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub membership_code: Option<&'a str>,
}

/// Computed price for one traveler.
///
/// `hotel_tier` and `travel_mode` are the effective values, which differ
/// from the request when a Youth package overrides them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub amount: Money,
    pub note: Option<String>,
    pub hotel_tier: HotelTier,
    pub travel_mode: TravelMode,
    pub num_days: u32,
    pub is_youth: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PricingCalculator {
    rates: PricingRates,
}

impl PricingCalculator {
    pub fn new(rates: PricingRates) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> &PricingRates {
        &self.rates
    }

    /// Computes the price for a single traveler.
    ///
    /// # Errors
    ///
    /// - `InvalidAge` if age is outside 0..=150
    /// - `InvalidDateRange` if the end date precedes the start date
    pub fn compute_price(&self, request: &PricingRequest<'_>) -> Result<Quote, PricingError> {
        if !(MIN_AGE..=MAX_AGE).contains(&request.age) {
            return Err(PricingError::InvalidAge { age: request.age });
        }
        let dates = JourneyDates::new(request.start_date, request.end_date)?;
        let num_days = dates.num_days();

        if request.membership_code.is_some_and(is_youth_code) {
            return Ok(Quote {
                amount: self.rates.youth_package,
                note: Some(YOUTH_NOTE.to_string()),
                hotel_tier: HotelTier::Basic,
                travel_mode: TravelMode::Train,
                num_days,
                is_youth: true,
            });
        }

        let base_hotel = self.rates.hotel(request.hotel_tier) * num_days;
        let base_food = self.rates.food * num_days;
        let bracket = AgeBracket::for_age(request.age);

        Ok(Quote {
            amount: bracket.apply(base_hotel) + bracket.apply(base_food),
            note: bracket.note().map(str::to_string),
            hotel_tier: request.hotel_tier,
            travel_mode: request.travel_mode,
            num_days,
            is_youth: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn request(age: i32, tier: HotelTier, days: u32, code: Option<&str>) -> PricingRequest<'_> {
        PricingRequest {
            age,
            hotel_tier: tier,
            travel_mode: TravelMode::Flight,
            start_date: date(1),
            end_date: date(days),
            membership_code: code,
        }
    }

    // ════════════════════════════════════════════════════════════════════
    // Age brackets
    // ════════════════════════════════════════════════════════════════════

    #[test]
    fn adult_premium_three_days() {
        let calc = PricingCalculator::default();
        let quote = calc.compute_price(&request(40, HotelTier::Premium, 3, None)).unwrap();

        assert_eq!(quote.amount, Money::from_rupees(39000));
        assert_eq!(quote.note, None);
        assert_eq!(quote.num_days, 3);
        assert_eq!(quote.travel_mode, TravelMode::Flight);
    }

    #[test]
    fn child_pays_half() {
        let calc = PricingCalculator::default();
        let quote = calc.compute_price(&request(8, HotelTier::Standard, 3, None)).unwrap();

        assert_eq!(quote.amount, Money::from_rupees(12000));
        assert_eq!(quote.note.as_deref(), Some(CHILD_NOTE));
    }

    #[test]
    fn infant_is_free() {
        let calc = PricingCalculator::default();
        let quote = calc.compute_price(&request(5, HotelTier::Premium, 4, None)).unwrap();

        assert_eq!(quote.amount, Money::ZERO);
        assert_eq!(quote.note.as_deref(), Some(INFANT_NOTE));
    }

    #[test]
    fn bracket_boundaries() {
        assert_eq!(AgeBracket::for_age(0), AgeBracket::Infant);
        assert_eq!(AgeBracket::for_age(5), AgeBracket::Infant);
        assert_eq!(AgeBracket::for_age(6), AgeBracket::Child);
        assert_eq!(AgeBracket::for_age(10), AgeBracket::Child);
        assert_eq!(AgeBracket::for_age(11), AgeBracket::Adult);
    }

    // ════════════════════════════════════════════════════════════════════
    // Youth package
    // ════════════════════════════════════════════════════════════════════

    #[test]
    fn youth_code_overrides_package() {
        let calc = PricingCalculator::default();
        let quote = calc
            .compute_price(&request(30, HotelTier::Premium, 6, Some("abcyouth12")))
            .unwrap();

        assert_eq!(quote.amount, Money::from_rupees(5000));
        assert_eq!(quote.hotel_tier, HotelTier::Basic);
        assert_eq!(quote.travel_mode, TravelMode::Train);
        assert_eq!(quote.note.as_deref(), Some(YOUTH_NOTE));
        assert!(quote.is_youth);
    }

    #[test]
    fn empty_code_is_not_youth() {
        let calc = PricingCalculator::default();
        let quote = calc.compute_price(&request(30, HotelTier::Basic, 1, Some(""))).unwrap();
        assert_eq!(quote.amount, Money::from_rupees(5000));
        assert!(!quote.is_youth);
        assert_eq!(quote.hotel_tier, HotelTier::Basic);
        assert_eq!(quote.travel_mode, TravelMode::Flight);
    }

    #[test]
    fn configured_rates_are_used() {
        let rates = PricingRates {
            food: Money::from_rupees(1000),
            ..PricingRates::default()
        };
        let calc = PricingCalculator::new(rates);
        let quote = calc.compute_price(&request(30, HotelTier::Basic, 2, None)).unwrap();
        assert_eq!(quote.amount, Money::from_rupees(6000));
    }

    // ════════════════════════════════════════════════════════════════════
    // Errors
    // ════════════════════════════════════════════════════════════════════

    #[test]
    fn age_out_of_range_rejected() {
        let calc = PricingCalculator::default();
        assert_eq!(
            calc.compute_price(&request(-1, HotelTier::Basic, 1, None)),
            Err(PricingError::InvalidAge { age: -1 })
        );
        assert_eq!(
            calc.compute_price(&request(151, HotelTier::Basic, 1, None)),
            Err(PricingError::InvalidAge { age: 151 })
        );
    }

    #[test]
    fn reversed_dates_rejected() {
        let calc = PricingCalculator::default();
        let mut req = request(30, HotelTier::Basic, 1, None);
        req.start_date = date(5);
        req.end_date = date(2);
        assert!(matches!(
            calc.compute_price(&req),
            Err(PricingError::InvalidDateRange { .. })
        ));
    }

    // ════════════════════════════════════════════════════════════════════
    // Properties
    // ════════════════════════════════════════════════════════════════════

    fn tier_strategy() -> impl Strategy<Value = HotelTier> {
        prop_oneof![
            Just(HotelTier::Basic),
            Just(HotelTier::Standard),
            Just(HotelTier::Premium),
        ]
    }

    proptest! {
        #[test]
        fn price_is_deterministic_and_bounded(
            age in 0i32..=150,
            tier in tier_strategy(),
            days in 1u32..=28,
        ) {
            let calc = PricingCalculator::default();
            let req = request(age, tier, days, None);
            let first = calc.compute_price(&req).unwrap();
            let second = calc.compute_price(&req).unwrap();

            prop_assert_eq!(&first, &second);
            prop_assert!(first.amount.paise() >= 0);

            let full = (calc.rates().hotel(tier) + calc.rates().food) * days;
            prop_assert!(first.amount <= full);
            prop_assert_eq!(first.num_days, days);
        }

        #[test]
        fn youth_code_always_fixed(
            age in 0i32..=150,
            tier in tier_strategy(),
            days in 1u32..=28,
            prefix in "[a-z0-9]{0,4}",
        ) {
            let calc = PricingCalculator::default();
            let code = format!("{}YoUtH", prefix);
            let quote = calc.compute_price(&request(age, tier, days, Some(code.as_str()))).unwrap();

            prop_assert_eq!(quote.amount, Money::from_rupees(5000));
            prop_assert_eq!(quote.hotel_tier, HotelTier::Basic);
            prop_assert_eq!(quote.travel_mode, TravelMode::Train);
        }
    }
}
