//! QuotePartyHandler - Prices every traveler of a party.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::booking::{BookingError, NewBooking, Party, PartyMember, ResolvedTraveler};
use crate::domain::foundation::Money;
use crate::domain::pricing::{PricingCalculator, Quote};
use crate::ports::MembershipRegistry;

use super::RegistrationGate;

#[derive(Debug, Clone)]
pub struct QuotePartyCommand {
    pub members: Vec<PartyMember>,
}

/// Price of one traveler, in party order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TravelerQuote {
    pub traveler: ResolvedTraveler,
    pub quote: Quote,
}

#[derive(Debug, Clone)]
pub struct QuotePartyResult {
    pub quotes: Vec<TravelerQuote>,
    pub total: Money,
}

impl QuotePartyResult {
    /// Rows ready to be stored, one per traveler.
    pub fn bookings(&self) -> Vec<NewBooking> {
        self.quotes
            .iter()
            .map(|q| NewBooking::from_quote(&q.traveler, &q.quote))
            .collect()
    }
}

/// Resolves guardian inheritance, checks membership codes, and prices the party.
///
/// Youth codes are priced on their marker alone. Any other code must be
/// Active in the registry.
pub struct QuotePartyHandler {
    calculator: PricingCalculator,
    registry: Arc<dyn MembershipRegistry>,
    gate: RegistrationGate,
}

impl QuotePartyHandler {
    pub fn new(
        calculator: PricingCalculator,
        registry: Arc<dyn MembershipRegistry>,
        gate: RegistrationGate,
    ) -> Self {
        Self {
            calculator,
            registry,
            gate,
        }
    }

    pub async fn handle(&self, cmd: QuotePartyCommand) -> Result<QuotePartyResult, BookingError> {
        self.gate.ensure_open()?;

        let resolved = Party::resolve(&cmd.members)?;

        let codes: BTreeSet<&str> = resolved
            .iter()
            .filter_map(|r| r.selection.membership_code.as_ref())
            .filter(|c| !c.is_youth())
            .map(|c| c.as_str())
            .collect();
        for code in codes {
            if !self.registry.lookup(code).await?.is_active() {
                return Err(BookingError::Validation(format!(
                    "Membership code {} is not valid",
                    code
                )));
            }
        }

        let quotes = resolved
            .into_iter()
            .map(|traveler| {
                let quote = self
                    .calculator
                    .compute_price(&traveler.selection.pricing_request(traveler.traveler.age))?;
                Ok(TravelerQuote { traveler, quote })
            })
            .collect::<Result<Vec<_>, BookingError>>()?;

        let total = quotes.iter().map(|q| q.quote.amount).sum();
        tracing::debug!(travelers = quotes.len(), total = %total, "Party quoted");

        Ok(QuotePartyResult { quotes, total })
    }
}
