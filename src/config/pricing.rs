//! Pricing configuration
//!
//! Daily rates in whole rupees.

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::foundation::Money;
use crate::domain::pricing::PricingRates;

#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    #[serde(default = "default_basic_hotel")]
    pub basic_hotel_rate: u32,

    #[serde(default = "default_standard_hotel")]
    pub standard_hotel_rate: u32,

    #[serde(default = "default_premium_hotel")]
    pub premium_hotel_rate: u32,

    #[serde(default = "default_food")]
    pub food_rate: u32,

    /// Flat price of the Youth package
    #[serde(default = "default_youth_package")]
    pub youth_package: u32,
}

impl PricingConfig {
    pub fn rates(&self) -> PricingRates {
        PricingRates {
            basic_hotel: Money::from_rupees(self.basic_hotel_rate),
            standard_hotel: Money::from_rupees(self.standard_hotel_rate),
            premium_hotel: Money::from_rupees(self.premium_hotel_rate),
            food: Money::from_rupees(self.food_rate),
            youth_package: Money::from_rupees(self.youth_package),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let rates = [
            ("basic_hotel_rate", self.basic_hotel_rate),
            ("standard_hotel_rate", self.standard_hotel_rate),
            ("premium_hotel_rate", self.premium_hotel_rate),
            ("food_rate", self.food_rate),
            ("youth_package", self.youth_package),
        ];
        match rates.iter().find(|(_, rate)| *rate == 0) {
            Some((name, _)) => Err(ValidationError::NonPositiveRate(name)),
            None => Ok(()),
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            basic_hotel_rate: default_basic_hotel(),
            standard_hotel_rate: default_standard_hotel(),
            premium_hotel_rate: default_premium_hotel(),
            food_rate: default_food(),
            youth_package: default_youth_package(),
        }
    }
}

fn default_basic_hotel() -> u32 {
    2000
}

fn default_standard_hotel() -> u32 {
    5000
}

fn default_premium_hotel() -> u32 {
    10000
}

fn default_food() -> u32 {
    3000
}

fn default_youth_package() -> u32 {
    5000
}
