//! HTTP handlers for booking endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Json, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;

use crate::application::handlers::admin::{
    AddCodeCommand, AddCodeHandler, CreateRegistrationCommand, CreateRegistrationHandler,
    DeleteBookingHandler, GenerateCodesCommand, GenerateCodesHandler, ListBookingsHandler,
    ListCodesHandler, ListRecoveryEntriesHandler, UpdateBookingCommand, UpdateBookingHandler,
};
use crate::application::handlers::booking::{
    BookingReconciler, GetReceiptHandler, GetReceiptQuery, PaymentProof, RegistrationCheckout,
    VerifyMembershipHandler, VerifyMembershipQuery,
};
use crate::domain::booking::BookingError;
use crate::domain::foundation::{DomainError, DraftToken, Money, OrderId};

use super::dto::{
    AddCodeRequest, BookingResponse, CleanupRequest, CleanupResponse, ConfirmResponse,
    CreateRegistrationRequest, DraftRequest, ErrorResponse, GenerateCodesRequest,
    GenerateCodesResponse, ListBookingsParams, ListCodesParams, MembershipCodeResponse,
    OrderResponse, QuoteRequest, QuoteResponse, ReceiptResponse, RecoveryEntryResponse,
    ResendReceiptResponse, VerifyMembershipRequest, VerifyMembershipResponse, VerifyPaymentRequest,
    VerifyPaymentResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for booking routes. Cloned per request.
#[derive(Clone)]
pub struct BookingAppState {
    pub checkout: Arc<RegistrationCheckout>,
    pub reconciler: Arc<BookingReconciler>,
    pub verify_membership: Arc<VerifyMembershipHandler>,
    pub generate_codes: Arc<GenerateCodesHandler>,
    pub update_booking: Arc<UpdateBookingHandler>,
    pub create_registration: Arc<CreateRegistrationHandler>,
    pub delete_booking: Arc<DeleteBookingHandler>,
    pub receipts: Arc<GetReceiptHandler>,
    pub list_bookings: Arc<ListBookingsHandler>,
    pub list_codes: Arc<ListCodesHandler>,
    pub add_code: Arc<AddCodeHandler>,
    pub recovery_entries: Arc<ListRecoveryEntriesHandler>,
    /// Public gateway key handed to the browser checkout.
    pub gateway_key_id: String,
    pub pending_ttl_minutes: i64,
}

fn parse_token(raw: &str) -> Result<DraftToken, BookingError> {
    raw.trim()
        .parse()
        .map_err(|_| BookingError::Validation("Invalid draft token".to_string()))
}

// ════════════════════════════════════════════════════════════════════════════════
// Public Endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/bookings/quote - Price a party and open a draft
pub async fn quote(
    State(state): State<BookingAppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<impl IntoResponse, BookingApiError> {
    let members = request.into_members().map_err(BookingError::from)?;
    let quoted = state.checkout.quote(members).await?;
    Ok((StatusCode::CREATED, Json(QuoteResponse::from(&quoted))))
}

/// POST /api/memberships/verify - Check a membership code
pub async fn verify_membership(
    State(state): State<BookingAppState>,
    Json(request): Json<VerifyMembershipRequest>,
) -> Result<impl IntoResponse, BookingApiError> {
    let result = state
        .verify_membership
        .handle(VerifyMembershipQuery { code: request.code })
        .await?;
    Ok(Json(VerifyMembershipResponse::from(result)))
}

/// POST /api/bookings/confirm - Write Pending rows for a draft
pub async fn confirm(
    State(state): State<BookingAppState>,
    Json(request): Json<DraftRequest>,
) -> Result<impl IntoResponse, BookingApiError> {
    let token = parse_token(&request.draft_token)?;
    let draft = state.checkout.confirm(&token).await?;
    Ok(Json(ConfirmResponse {
        draft_token: draft.token.to_string(),
        pending_order_ids: draft.pending_order_ids.iter().map(|id| id.to_string()).collect(),
        total_paise: draft.total.paise(),
    }))
}

/// POST /api/bookings/order - Open the gateway order for a draft
pub async fn create_order(
    State(state): State<BookingAppState>,
    Json(request): Json<DraftRequest>,
) -> Result<impl IntoResponse, BookingApiError> {
    let token = parse_token(&request.draft_token)?;
    let order = state.checkout.create_order(&token).await?;
    Ok(Json(OrderResponse {
        order_id: order.id,
        amount_paise: order.amount,
        currency: order.currency,
        key_id: state.gateway_key_id.clone(),
    }))
}

/// POST /api/bookings/verify-payment - Gateway callback
pub async fn verify_payment(
    State(state): State<BookingAppState>,
    Json(request): Json<VerifyPaymentRequest>,
) -> Result<impl IntoResponse, BookingApiError> {
    let token = parse_token(&request.draft_token)?;
    let proof = PaymentProof {
        gateway_order_id: OrderId::new(request.razorpay_order_id).map_err(BookingError::from)?,
        payment_id: request.razorpay_payment_id,
        signature: request.razorpay_signature,
    };

    let outcome = state.checkout.verify_payment(&token, &proof).await?;
    Ok(Json(VerifyPaymentResponse {
        success: true,
        already_paid: outcome.is_already_paid(),
        order_ids: outcome.records().iter().map(|r| r.order_id.to_string()).collect(),
    }))
}

/// GET /api/bookings/receipt/:order_ids - Receipt for comma-separated order ids
pub async fn get_receipt(
    State(state): State<BookingAppState>,
    Path(order_ids): Path<String>,
) -> Result<impl IntoResponse, BookingApiError> {
    let query = GetReceiptQuery::parse(&order_ids)?;
    let receipt = state.receipts.handle(&query).await?;
    Ok(Json(ReceiptResponse::from(&receipt)))
}

/// GET /api/bookings/receipt/:order_ids/download - Receipt as a file
pub async fn download_receipt(
    State(state): State<BookingAppState>,
    Path(order_ids): Path<String>,
) -> Result<impl IntoResponse, BookingApiError> {
    let query = GetReceiptQuery::parse(&order_ids)?;
    let attachment = state.receipts.download(&query).await?;
    let disposition = format!("attachment; filename=\"{}\"", attachment.filename);
    Ok((
        [
            (header::CONTENT_TYPE, attachment.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        attachment.bytes,
    ))
}

// ════════════════════════════════════════════════════════════════════════════════
// Admin Endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/admin/bookings - Dashboard listing, newest first
pub async fn list_bookings(
    State(state): State<BookingAppState>,
    Query(params): Query<ListBookingsParams>,
) -> Result<impl IntoResponse, BookingApiError> {
    let records = state.list_bookings.handle(&params.into()).await?;
    let body: Vec<BookingResponse> = records.iter().map(BookingResponse::from).collect();
    Ok(Json(body))
}

/// GET /api/admin/bookings/:order_id/receipt - Regenerate a party receipt
pub async fn regenerate_receipt(
    State(state): State<BookingAppState>,
    Path(order_id): Path<String>,
) -> Result<impl IntoResponse, BookingApiError> {
    let order_id = OrderId::new(order_id).map_err(BookingError::from)?;
    let receipt = state.receipts.regenerate(&order_id).await?;
    Ok(Json(ReceiptResponse::from(&receipt)))
}

/// POST /api/admin/bookings/:order_id/receipt - Mail a party receipt again
pub async fn resend_receipt(
    State(state): State<BookingAppState>,
    Path(order_id): Path<String>,
) -> Result<impl IntoResponse, BookingApiError> {
    let order_id = OrderId::new(order_id).map_err(BookingError::from)?;
    let sent = state.receipts.resend(&order_id).await?;
    Ok(Json(ResendReceiptResponse { sent }))
}

/// GET /api/admin/memberships - Codes, optionally by state
pub async fn list_codes(
    State(state): State<BookingAppState>,
    Query(params): Query<ListCodesParams>,
) -> Result<impl IntoResponse, BookingApiError> {
    let records = state.list_codes.handle(params.state).await?;
    let body: Vec<MembershipCodeResponse> = records.iter().map(MembershipCodeResponse::from).collect();
    Ok(Json(body))
}

/// POST /api/admin/memberships - Add a single code
pub async fn add_code(
    State(state): State<BookingAppState>,
    Json(request): Json<AddCodeRequest>,
) -> Result<impl IntoResponse, BookingApiError> {
    let record = state
        .add_code
        .handle(AddCodeCommand {
            code: request.code,
            code_type: request.code_type,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(MembershipCodeResponse::from(&record))))
}

/// GET /api/admin/recovery - Payments awaiting manual replay
pub async fn list_recovery(State(state): State<BookingAppState>) -> Result<impl IntoResponse, BookingApiError> {
    let entries = state.recovery_entries.handle().await?;
    let body: Vec<RecoveryEntryResponse> = entries.iter().map(RecoveryEntryResponse::from).collect();
    Ok(Json(body))
}

/// POST /api/admin/memberships/generate - Bulk-generate membership codes
pub async fn generate_codes(
    State(state): State<BookingAppState>,
    Json(request): Json<GenerateCodesRequest>,
) -> Result<impl IntoResponse, BookingApiError> {
    let result = state
        .generate_codes
        .handle(GenerateCodesCommand {
            count: request.quantity,
            prefix: request.prefix,
            code_type: request.code_type,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(GenerateCodesResponse::from(result))))
}

/// POST /api/admin/bookings/cleanup - Remove stale Pending rows
pub async fn cleanup_pending(
    State(state): State<BookingAppState>,
    request: Option<Json<CleanupRequest>>,
) -> Result<impl IntoResponse, BookingApiError> {
    let max_age = request
        .and_then(|Json(r)| r.max_age_minutes)
        .unwrap_or(state.pending_ttl_minutes);
    if max_age < 1 {
        return Err(BookingError::Validation("max_age_minutes must be positive".to_string()).into());
    }
    let deleted = state.reconciler.cleanup_stale(max_age).await?;
    Ok(Json(CleanupResponse { deleted }))
}

/// PATCH /api/admin/bookings/:order_id - Edit allow-listed fields
pub async fn update_booking(
    State(state): State<BookingAppState>,
    Path(order_id): Path<String>,
    Json(fields): Json<BTreeMap<String, String>>,
) -> Result<impl IntoResponse, BookingApiError> {
    let order_id = OrderId::new(order_id).map_err(BookingError::from)?;
    let record = state
        .update_booking
        .handle(UpdateBookingCommand { order_id, fields })
        .await?;
    Ok(Json(BookingResponse::from(&record)))
}

/// DELETE /api/admin/bookings/:order_id - Remove a booking row
pub async fn delete_booking(
    State(state): State<BookingAppState>,
    Path(order_id): Path<String>,
) -> Result<impl IntoResponse, BookingApiError> {
    let order_id = OrderId::new(order_id).map_err(BookingError::from)?;
    state.delete_booking.handle(&order_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/admin/bookings - Admin-entered registration
pub async fn create_registration(
    State(state): State<BookingAppState>,
    Json(request): Json<CreateRegistrationRequest>,
) -> Result<impl IntoResponse, BookingApiError> {
    let base_amount = Money::parse_rupees(&request.base_amount).map_err(BookingError::from)?;
    let record = state
        .create_registration
        .handle(CreateRegistrationCommand {
            traveler: request.traveler,
            start_date: request.start_date,
            end_date: request.end_date,
            hotel_tier: request.hotel_tier,
            travel_mode: request.travel_mode,
            membership_code: request.membership_code,
            base_amount,
            discount_percent: request.custom_discount,
            payment_status: request.payment_status,
            order_id: request.order_id,
            payment_id: request.payment_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(BookingResponse::from(&record))))
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts booking errors to HTTP responses.
#[derive(Debug)]
pub struct BookingApiError(BookingError);

impl From<BookingError> for BookingApiError {
    fn from(err: BookingError) -> Self {
        Self(err)
    }
}

impl From<DomainError> for BookingApiError {
    fn from(err: DomainError) -> Self {
        Self(BookingError::from(err))
    }
}

impl BookingApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            BookingError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
            BookingError::VerificationFailed => (StatusCode::UNAUTHORIZED, "SIGNATURE_MISMATCH"),
            // The customer has paid; the client must show the support message, not an error page.
            BookingError::PersistenceFailed { .. } => (StatusCode::OK, "PAYMENT_RECEIVED_NOT_SAVED"),
            BookingError::ClaimConflict { .. } => (StatusCode::CONFLICT, "MEMBERSHIP_CODE_CLAIMED"),
            BookingError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            BookingError::GatewayUnavailable(_) => (StatusCode::BAD_GATEWAY, "GATEWAY_UNAVAILABLE"),
            BookingError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            BookingError::RegistrationClosed(_) => (StatusCode::FORBIDDEN, "REGISTRATION_CLOSED"),
            BookingError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for BookingApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code) = self.status_and_code();
        let body = match &self.0 {
            BookingError::PersistenceFailed { payment_id, reason } => ErrorResponse::with_details(
                error_code,
                reason.clone(),
                serde_json::json!({ "success": false, "payment_id": payment_id }),
            ),
            BookingError::RegistrationClosed(message) => ErrorResponse::new(error_code, message.clone()),
            BookingError::Internal(message) => {
                tracing::error!(error = %message, "Request failed");
                ErrorResponse::new(error_code, "An internal error occurred")
            }
            other => ErrorResponse::new(error_code, other.to_string()),
        };
        (status, Json(body)).into_response()
    }
}
