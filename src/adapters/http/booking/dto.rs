//! HTTP DTOs (Data Transfer Objects) for booking endpoints.
//!
//! Amounts go out twice: `*_paise` for arithmetic, and a display string.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::application::handlers::admin::GenerateCodesResult;
use crate::application::handlers::booking::{QuotedDraft, TravelerQuote, VerifyMembershipResult};
use crate::domain::booking::{
    BookingRecord, PackageSelection, PartyMember, PaymentStatus, Receipt, ReceiptLine, Traveler,
};
use crate::domain::foundation::ValidationError;
use crate::domain::membership::{CodeState, MembershipCode, MembershipRecord};
use crate::ports::{BookingFilter, RecoveryEntry};
use crate::domain::pricing::{HotelTier, TravelMode};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Package choice as submitted. Minors may omit it.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub hotel_tier: HotelTier,
    pub travel_mode: TravelMode,
    #[serde(default)]
    pub membership_code: Option<String>,
}

impl PackageRequest {
    fn into_selection(self) -> Result<PackageSelection, ValidationError> {
        let membership_code = self
            .membership_code
            .filter(|c| !c.trim().is_empty())
            .map(MembershipCode::new)
            .transpose()?;
        Ok(PackageSelection {
            start_date: self.start_date,
            end_date: self.end_date,
            hotel_tier: self.hotel_tier,
            travel_mode: self.travel_mode,
            membership_code,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TravelerRequest {
    #[serde(flatten)]
    pub details: Traveler,
    #[serde(default)]
    pub package: Option<PackageRequest>,
}

/// Request to price a party and open a draft.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteRequest {
    pub travelers: Vec<TravelerRequest>,
}

impl QuoteRequest {
    pub fn into_members(self) -> Result<Vec<PartyMember>, ValidationError> {
        self.travelers
            .into_iter()
            .map(|t| {
                Ok(PartyMember {
                    traveler: t.details,
                    selection: t.package.map(PackageRequest::into_selection).transpose()?,
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyMembershipRequest {
    pub code: String,
}

/// Any request addressed to an existing draft.
#[derive(Debug, Clone, Deserialize)]
pub struct DraftRequest {
    pub draft_token: String,
}

/// Gateway checkout callback, forwarded by the browser.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyPaymentRequest {
    pub draft_token: String,
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateCodesRequest {
    pub quantity: usize,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub code_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CleanupRequest {
    #[serde(default)]
    pub max_age_minutes: Option<i64>,
}

/// Admin-entered registration. `base_amount` is a rupee string such as `"12000.50"`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRegistrationRequest {
    #[serde(flatten)]
    pub traveler: Traveler,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub hotel_tier: HotelTier,
    pub travel_mode: TravelMode,
    #[serde(default)]
    pub membership_code: Option<String>,
    pub base_amount: String,
    #[serde(default)]
    pub custom_discount: u8,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub payment_id: Option<String>,
}

/// Query string of the admin booking listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListBookingsParams {
    pub status: Option<PaymentStatus>,
    pub has_membership: Option<bool>,
}

impl From<ListBookingsParams> for BookingFilter {
    fn from(p: ListBookingsParams) -> Self {
        Self {
            status: p.status,
            has_membership: p.has_membership,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListCodesParams {
    pub state: Option<CodeState>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddCodeRequest {
    pub code: String,
    #[serde(default)]
    pub code_type: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct TravelerQuoteResponse {
    pub name: String,
    pub age: i32,
    pub hotel_tier: HotelTier,
    pub travel_mode: TravelMode,
    pub num_days: u32,
    pub amount_paise: i64,
    pub amount: String,
    pub note: Option<String>,
    pub is_youth: bool,
}

impl From<&TravelerQuote> for TravelerQuoteResponse {
    fn from(q: &TravelerQuote) -> Self {
        Self {
            name: q.traveler.display_name(),
            age: q.traveler.traveler.age,
            hotel_tier: q.quote.hotel_tier,
            travel_mode: q.quote.travel_mode,
            num_days: q.quote.num_days,
            amount_paise: q.quote.amount.paise(),
            amount: q.quote.amount.to_string(),
            note: q.quote.note.clone(),
            is_youth: q.quote.is_youth,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuoteResponse {
    pub draft_token: String,
    pub expires_at: String,
    pub travelers: Vec<TravelerQuoteResponse>,
    pub total_paise: i64,
    pub total: String,
}

impl From<&QuotedDraft> for QuoteResponse {
    fn from(q: &QuotedDraft) -> Self {
        Self {
            draft_token: q.draft.token.to_string(),
            expires_at: q.draft.expires_at.to_rfc3339(),
            travelers: q.quote.quotes.iter().map(TravelerQuoteResponse::from).collect(),
            total_paise: q.quote.total.paise(),
            total: q.quote.total.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyMembershipResponse {
    pub valid: bool,
    pub message: String,
    pub code: String,
    pub code_type: Option<String>,
    pub is_youth: bool,
}

impl From<VerifyMembershipResult> for VerifyMembershipResponse {
    fn from(r: VerifyMembershipResult) -> Self {
        let message = if r.valid {
            "Membership code verified"
        } else {
            "Invalid membership code. Please check and try again."
        };
        Self {
            valid: r.valid,
            message: message.to_string(),
            code: r.code,
            code_type: r.code_type,
            is_youth: r.is_youth,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfirmResponse {
    pub draft_token: String,
    pub pending_order_ids: Vec<String>,
    pub total_paise: i64,
}

/// Everything the browser needs to open the gateway checkout.
#[derive(Debug, Clone, Serialize)]
pub struct OrderResponse {
    pub order_id: String,
    pub amount_paise: i64,
    pub currency: String,
    pub key_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub already_paid: bool,
    pub order_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateCodesResponse {
    pub requested: usize,
    pub created: usize,
    pub codes: Vec<String>,
}

impl From<GenerateCodesResult> for GenerateCodesResponse {
    fn from(r: GenerateCodesResult) -> Self {
        Self {
            requested: r.requested,
            created: r.codes.len(),
            codes: r.codes.into_iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CleanupResponse {
    pub deleted: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingResponse {
    pub order_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub num_days: u32,
    pub hotel_tier: HotelTier,
    pub travel_mode: TravelMode,
    pub membership_code: Option<String>,
    pub amount_paise: i64,
    pub amount: String,
    pub payment_status: PaymentStatus,
    pub payment_id: Option<String>,
    pub created_at: String,
}

impl From<&BookingRecord> for BookingResponse {
    fn from(r: &BookingRecord) -> Self {
        Self {
            order_id: r.order_id.to_string(),
            name: r.traveler.name.clone(),
            email: r.traveler.email.clone(),
            phone: r.traveler.phone.clone(),
            age: r.traveler.age,
            start_date: r.package.start_date,
            end_date: r.package.end_date,
            num_days: r.package.num_days,
            hotel_tier: r.package.hotel_tier,
            travel_mode: r.package.travel_mode,
            membership_code: r.membership_code.as_ref().map(|c| c.to_string()),
            amount_paise: r.amount.paise(),
            amount: r.amount.to_string(),
            payment_status: r.payment_status,
            payment_id: r.payment_id.clone(),
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceiptLineResponse {
    pub order_id: String,
    pub name: String,
    pub age: i32,
    pub hotel_tier: HotelTier,
    pub travel_mode: TravelMode,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub num_days: u32,
    pub amount_paise: i64,
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl From<&ReceiptLine> for ReceiptLineResponse {
    fn from(l: &ReceiptLine) -> Self {
        Self {
            order_id: l.order_id.clone(),
            name: l.name.clone(),
            age: l.age,
            hotel_tier: l.hotel_tier,
            travel_mode: l.travel_mode,
            start_date: l.start_date,
            end_date: l.end_date,
            num_days: l.num_days,
            amount_paise: l.amount.paise(),
            amount: l.amount.to_string(),
            note: l.note.clone(),
        }
    }
}

/// Receipt with adults listed first.
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptResponse {
    pub payment_id: Option<String>,
    pub lines: Vec<ReceiptLineResponse>,
    pub total_paise: i64,
    pub total: String,
    pub issued_at: String,
    /// Order ids to pass to the download route.
    pub order_ids: String,
}

impl From<&Receipt> for ReceiptResponse {
    fn from(r: &Receipt) -> Self {
        Self {
            payment_id: r.payment_id.clone(),
            lines: r.lines.iter().map(ReceiptLineResponse::from).collect(),
            total_paise: r.total.paise(),
            total: r.total.to_string(),
            issued_at: r.issued_at.to_rfc3339(),
            order_ids: r
                .lines
                .iter()
                .map(|l| l.order_id.as_str())
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResendReceiptResponse {
    pub sent: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MembershipCodeResponse {
    pub code: String,
    pub code_type: String,
    pub state: CodeState,
    pub created_at: String,
    pub expired_at: Option<String>,
    pub consumed_by: Option<String>,
}

impl From<&MembershipRecord> for MembershipCodeResponse {
    fn from(r: &MembershipRecord) -> Self {
        Self {
            code: r.code.to_string(),
            code_type: r.code_type.clone(),
            state: r.state,
            created_at: r.created_at.to_rfc3339(),
            expired_at: r.expired_at.map(|t| t.to_rfc3339()),
            consumed_by: r.consumed_by.as_ref().map(|o| o.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecoveryEntryResponse {
    pub timestamp: String,
    pub payment_id: String,
    pub order_id: String,
    pub error: String,
    pub travelers: Vec<String>,
}

impl From<&RecoveryEntry> for RecoveryEntryResponse {
    fn from(e: &RecoveryEntry) -> Self {
        Self {
            timestamp: e.timestamp.to_rfc3339(),
            payment_id: e.payment_id.clone(),
            order_id: e.order_id.clone(),
            error: e.error.clone(),
            travelers: e.full_booking_payload.iter().map(|b| b.traveler.name.clone()).collect(),
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        error_code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}
