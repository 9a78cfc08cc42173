//! Traveling parties and guardian inheritance.
//!
//! Adults carry their own package selection. A minor (age 10 or younger)
//! travels under an adult guardian from the same party and takes the
//! guardian's dates, hotel, travel mode and membership code.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Traveler;
use crate::domain::foundation::ValidationError;
use crate::domain::membership::MembershipCode;
use crate::domain::pricing::{AgeBracket, HotelTier, PricingRequest, TravelMode};

/// Package chosen by (or inherited by) a traveler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSelection {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub hotel_tier: HotelTier,
    pub travel_mode: TravelMode,
    #[serde(default)]
    pub membership_code: Option<MembershipCode>,
}

impl PackageSelection {
    /// Builds the calculator input for a traveler of the given age.
    pub fn pricing_request(&self, age: i32) -> PricingRequest<'_> {
        PricingRequest {
            age,
            hotel_tier: self.hotel_tier,
            travel_mode: self.travel_mode,
            start_date: self.start_date,
            end_date: self.end_date,
            membership_code: self.membership_code.as_ref().map(MembershipCode::as_str),
        }
    }
}

/// One traveler as submitted, before inheritance is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyMember {
    pub traveler: Traveler,
    #[serde(default)]
    pub selection: Option<PackageSelection>,
}

/// A traveler with the package that applies to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTraveler {
    pub traveler: Traveler,
    pub selection: PackageSelection,
    /// Name of the guardian, set for minors.
    pub guardian_name: Option<String>,
}

impl ResolvedTraveler {
    /// Name shown on bookings and receipts: minors are listed with their guardian.
    pub fn display_name(&self) -> String {
        match &self.guardian_name {
            Some(guardian) => format!("{} ({})", self.traveler.name.trim(), guardian),
            None => self.traveler.name.trim().to_string(),
        }
    }
}

pub struct Party;

impl Party {
    /// Validates every traveler and applies guardian inheritance.
    ///
    /// # Errors
    ///
    /// - the party is empty
    /// - a traveler fails validation
    /// - an adult has no package selection
    /// - a minor's guardian index is missing, out of range, or not an adult
    pub fn resolve(members: &[PartyMember]) -> Result<Vec<ResolvedTraveler>, ValidationError> {
        if members.is_empty() {
            return Err(ValidationError::empty_field("travelers"));
        }
        for member in members {
            member.traveler.validate()?;
        }

        members
            .iter()
            .enumerate()
            .map(|(idx, member)| {
                let bracket = AgeBracket::for_age(member.traveler.age);
                if !bracket.is_minor() {
                    let selection = member.selection.clone().ok_or_else(|| {
                        ValidationError::empty_field(format!("travelers[{}].package", idx + 1))
                    })?;
                    return Ok(ResolvedTraveler {
                        traveler: member.traveler.clone(),
                        selection,
                        guardian_name: None,
                    });
                }

                let guardian = Self::guardian_of(members, idx)?;
                let selection = guardian.selection.clone().ok_or_else(|| {
                    ValidationError::empty_field(format!(
                        "travelers[{}].package",
                        member.traveler.guardian.unwrap_or_default()
                    ))
                })?;
                Ok(ResolvedTraveler {
                    traveler: member.traveler.clone(),
                    selection,
                    guardian_name: Some(guardian.traveler.name.trim().to_string()),
                })
            })
            .collect()
    }

    fn guardian_of(members: &[PartyMember], idx: usize) -> Result<&PartyMember, ValidationError> {
        let field = format!("travelers[{}].guardian", idx + 1);
        let position = members[idx]
            .traveler
            .guardian
            .ok_or_else(|| ValidationError::empty_field(field.clone()))?;

        if position == 0 || position > members.len() || position == idx + 1 {
            return Err(ValidationError::out_of_range(
                field,
                1,
                members.len() as i64,
                position as i64,
            ));
        }
        let guardian = &members[position - 1];
        if AgeBracket::for_age(guardian.traveler.age).is_minor() {
            return Err(ValidationError::invalid_format(
                field,
                "guardian must be older than 10",
            ));
        }
        Ok(guardian)
    }
}
