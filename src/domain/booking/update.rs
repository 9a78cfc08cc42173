//! Administrative edits to a booking row.
//!
//! Only fields on an explicit allow-list may change. Keys are normalized
//! (trimmed, lowercased, spaces to underscores) before matching.

use std::collections::BTreeMap;

use super::{BookingRecord, PaymentStatus};
use crate::domain::foundation::{Money, StateMachine, ValidationError};
use crate::domain::pricing::{HotelTier, TravelMode};

/// Keys accepted by [`BookingUpdate::from_fields`].
pub const EDITABLE_FIELDS: &[&str] = &[
    "name",
    "email",
    "phone",
    "alternative_phone",
    "gender",
    "city",
    "district",
    "state",
    "hotel_tier",
    "travel_mode",
    "payment_status",
    "amount",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub alternative_phone: Option<Option<String>>,
    pub gender: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
    pub hotel_tier: Option<HotelTier>,
    pub travel_mode: Option<TravelMode>,
    pub payment_status: Option<PaymentStatus>,
    pub amount: Option<Money>,
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace(' ', "_")
}

impl BookingUpdate {
    /// Parses a key/value form into an update.
    ///
    /// # Errors
    ///
    /// Unknown keys and unparseable values are rejected; nothing is partially applied.
    pub fn from_fields(fields: &BTreeMap<String, String>) -> Result<Self, ValidationError> {
        let mut update = BookingUpdate::default();
        for (raw_key, raw_value) in fields {
            let key = normalize_key(raw_key);
            let value = raw_value.trim().to_string();
            match key.as_str() {
                "name" => {
                    if value.is_empty() {
                        return Err(ValidationError::empty_field("name"));
                    }
                    update.name = Some(value);
                }
                "email" => update.email = Some(value),
                "phone" => update.phone = Some(value),
                "alternative_phone" => {
                    update.alternative_phone = Some(if value.is_empty() { None } else { Some(value) })
                }
                "gender" => update.gender = Some(value),
                "city" => update.city = Some(value),
                "district" => update.district = Some(value),
                "state" => update.state = Some(value),
                "hotel_tier" => update.hotel_tier = Some(value.parse()?),
                "travel_mode" => update.travel_mode = Some(value.parse()?),
                "payment_status" => update.payment_status = Some(value.parse()?),
                "amount" => update.amount = Some(Money::parse_rupees(&value)?),
                _ => return Err(ValidationError::unknown_field(key)),
            }
        }
        Ok(update)
    }

    pub fn is_empty(&self) -> bool {
        *self == BookingUpdate::default()
    }

    /// Applies the update to a copy of `record`, leaving the original untouched on error.
    ///
    /// # Errors
    ///
    /// - `amount` is set and the row is Paid
    /// - `payment_status` is not reachable from the current status
    pub fn apply(&self, record: &BookingRecord) -> Result<BookingRecord, ValidationError> {
        let mut updated = record.clone();

        if let Some(amount) = self.amount {
            if record.is_paid() && amount != record.amount {
                return Err(ValidationError::invalid_format(
                    "amount",
                    "amount cannot change once the booking is paid",
                ));
            }
            updated.amount = amount;
        }
        if let Some(status) = self.payment_status {
            if status != record.payment_status {
                updated.payment_status = record.payment_status.transition_to(status)?;
            }
        }

        let traveler = &mut updated.traveler;
        if let Some(v) = &self.name {
            traveler.name = v.clone();
        }
        if let Some(v) = &self.email {
            traveler.email = v.clone();
        }
        if let Some(v) = &self.phone {
            traveler.phone = v.clone();
        }
        if let Some(v) = &self.alternative_phone {
            traveler.alternative_phone = v.clone();
        }
        if let Some(v) = &self.gender {
            traveler.gender = v.clone();
        }
        if let Some(v) = &self.city {
            traveler.city = v.clone();
        }
        if let Some(v) = &self.district {
            traveler.district = v.clone();
        }
        if let Some(v) = &self.state {
            traveler.state = v.clone();
        }
        if let Some(v) = self.hotel_tier {
            updated.package.hotel_tier = v;
        }
        if let Some(v) = self.travel_mode {
            updated.package.travel_mode = v;
        }

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::record::fixtures::new_booking;
    use crate::domain::foundation::{OrderId, Timestamp};

    fn fields(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn pending() -> BookingRecord {
        BookingRecord::pending(OrderId::pending(false), new_booking("Asha", None, 100), Timestamp::now())
    }

    fn paid() -> BookingRecord {
        BookingRecord::paid(
            OrderId::new("order_1").unwrap(),
            new_booking("Asha", None, 100),
            "pay_1",
            Timestamp::now(),
        )
    }

    #[test]
    fn keys_are_normalized() {
        let update = BookingUpdate::from_fields(&fields(&[("Hotel Tier", "premium"), (" CITY ", "Nashik")])).unwrap();
        assert_eq!(update.hotel_tier, Some(HotelTier::Premium));
        assert_eq!(update.city.as_deref(), Some("Nashik"));
    }

    #[test]
    fn unknown_key_rejected() {
        let result = BookingUpdate::from_fields(&fields(&[("order_id", "x")]));
        assert_eq!(result, Err(ValidationError::unknown_field("order_id")));
    }

    #[test]
    fn bad_value_rejected() {
        assert!(BookingUpdate::from_fields(&fields(&[("amount", "lots")])).is_err());
        assert!(BookingUpdate::from_fields(&fields(&[("travel_mode", "boat")])).is_err());
    }

    #[test]
    fn apply_changes_allowed_fields() {
        let update = BookingUpdate::from_fields(&fields(&[
            ("name", "Asha K"),
            ("amount", "150"),
            ("alternative_phone", "9000000000"),
        ]))
        .unwrap();
        let updated = update.apply(&pending()).unwrap();

        assert_eq!(updated.traveler.name, "Asha K");
        assert_eq!(updated.amount, Money::from_rupees(150));
        assert_eq!(updated.traveler.alternative_phone.as_deref(), Some("9000000000"));
    }

    #[test]
    fn amount_frozen_once_paid() {
        let update = BookingUpdate::from_fields(&fields(&[("amount", "1")])).unwrap();
        assert!(update.apply(&paid()).is_err());
    }

    #[test]
    fn paid_cannot_revert_to_pending() {
        let update = BookingUpdate::from_fields(&fields(&[("payment_status", "pending")])).unwrap();
        assert!(update.apply(&paid()).is_err());
    }

    #[test]
    fn pending_can_be_marked_failed() {
        let update = BookingUpdate::from_fields(&fields(&[("payment_status", "failed")])).unwrap();
        let updated = update.apply(&pending()).unwrap();
        assert_eq!(updated.payment_status, PaymentStatus::Failed);
    }
}
