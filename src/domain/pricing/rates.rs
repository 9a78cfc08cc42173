//! Daily rate table.

use serde::{Deserialize, Serialize};

use super::HotelTier;
use crate::domain::foundation::Money;

/// Per-day rates applied by the calculator, plus the flat Youth package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRates {
    pub basic_hotel: Money,
    pub standard_hotel: Money,
    pub premium_hotel: Money,
    pub food: Money,
    pub youth_package: Money,
}

impl PricingRates {
    pub fn hotel(&self, tier: HotelTier) -> Money {
        match tier {
            HotelTier::Basic => self.basic_hotel,
            HotelTier::Standard => self.standard_hotel,
            HotelTier::Premium => self.premium_hotel,
        }
    }
}

impl Default for PricingRates {
    fn default() -> Self {
        Self {
            basic_hotel: Money::from_rupees(2000),
            standard_hotel: Money::from_rupees(5000),
            premium_hotel: Money::from_rupees(10000),
            food: Money::from_rupees(3000),
            youth_package: Money::from_rupees(5000),
        }
    }
}
