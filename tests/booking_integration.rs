//! Integration tests for the registration and payment flow.
//!
//! These tests drive the public API end to end:
//! 1. Membership codes are generated and claimed exactly once
//! 2. Party quotes follow the guardian's package
//! 3. Payment callbacks promote Pending rows idempotently
//! 4. Storage failures land in the recovery log
//!
//! Uses in-memory adapters so no database or gateway is required.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use secrecy::SecretString;

use yatra_booking::adapters::memory::InMemoryBookingStore;
use yatra_booking::adapters::recovery::JsonFileRecoveryLog;
use yatra_booking::application::handlers::booking::{
    BookingReconciler, PaymentProof, QuotePartyCommand, QuotePartyHandler, RegistrationGate,
};
use yatra_booking::domain::booking::{
    BookedPackage, BookingError, NewBooking, PackageSelection, PartyMember, PaymentSignatureVerifier,
    PaymentStatus, Traveler,
};
use yatra_booking::domain::foundation::{Money, OrderId, Timestamp};
use yatra_booking::domain::membership::{
    ClaimOutcome, CodeState, GenerateRequest, LookupResult, MembershipCode, MembershipRecord,
};
use yatra_booking::domain::pricing::{HotelTier, PricingCalculator, TravelMode};
use yatra_booking::ports::{BookingFilter, BookingRepository, MembershipRegistry, RecoveryLog};

// =============================================================================
// Test Infrastructure
// =============================================================================

const SECRET: &str = "integration-secret";

fn verifier() -> PaymentSignatureVerifier {
    PaymentSignatureVerifier::new(SecretString::new(SECRET.to_string()))
}

fn traveler(name: &str, age: i32) -> Traveler {
    Traveler {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        phone: "9876543210".to_string(),
        alternative_phone: None,
        age,
        gender: "female".to_string(),
        city: "Nashik".to_string(),
        district: "Nashik".to_string(),
        state: "Maharashtra".to_string(),
        guardian: None,
    }
}

fn march(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
}

fn booking(name: &str, code: Option<&str>) -> NewBooking {
    NewBooking {
        traveler: traveler(name, 35),
        package: BookedPackage {
            start_date: march(1),
            end_date: march(3),
            num_days: 3,
            hotel_tier: HotelTier::Standard,
            travel_mode: TravelMode::Train,
        },
        membership_code: code.map(|c| MembershipCode::new(c).unwrap()),
        amount: Money::from_rupees(24000),
        note: None,
    }
}

fn proof(order: &str, payment: &str) -> PaymentProof {
    PaymentProof {
        gateway_order_id: OrderId::new(order).unwrap(),
        payment_id: payment.to_string(),
        signature: verifier().sign(order, payment),
    }
}

struct Harness {
    store: InMemoryBookingStore,
    reconciler: BookingReconciler,
    recovery: Arc<JsonFileRecoveryLog>,
    _dir: tempfile::TempDir,
}

fn harness() -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let store = InMemoryBookingStore::new();
    let recovery = Arc::new(JsonFileRecoveryLog::new(dir.path().join("failed_bookings.json")));
    let reconciler = BookingReconciler::new(Arc::new(store.clone()), recovery.clone(), verifier());
    Harness {
        store,
        reconciler,
        recovery,
        _dir: dir,
    }
}

async fn paid_rows(store: &InMemoryBookingStore) -> Vec<yatra_booking::domain::booking::BookingRecord> {
    store
        .list(&BookingFilter {
            status: Some(PaymentStatus::Paid),
            has_membership: None,
        })
        .await
        .unwrap()
}

// =============================================================================
// Membership Codes
// =============================================================================

#[tokio::test]
async fn concurrent_claims_allow_exactly_one_winner() {
    let store = InMemoryBookingStore::new();
    store
        .seed_code(MembershipRecord::active(MembershipCode::new("GMPRACE1").unwrap(), "standard"))
        .await;

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                let consumer = OrderId::new(format!("order_{}", i)).unwrap();
                store.claim("GMPRACE1", &consumer).await.unwrap()
            })
        })
        .collect();

    let mut claimed = 0;
    for task in tasks {
        match task.await.unwrap() {
            ClaimOutcome::Claimed => claimed += 1,
            ClaimOutcome::AlreadyClaimed => {}
            ClaimOutcome::NotFound => panic!("seeded code vanished"),
        }
    }

    assert_eq!(claimed, 1);
    assert_eq!(store.lookup("GMPRACE1").await.unwrap(), LookupResult::NotFound);
}

#[tokio::test]
async fn generated_codes_are_distinct_prefixed_and_active() {
    let store = InMemoryBookingStore::new();
    let request = GenerateRequest::new(50, "GMP").unwrap();

    let codes = store.generate(&request).await.unwrap();

    let distinct: HashSet<_> = codes.iter().map(|c| c.as_str().to_string()).collect();
    assert_eq!(distinct.len(), codes.len());
    assert!(codes.len() >= 45, "too many collisions: {}", codes.len());
    for code in &codes {
        assert!(code.as_str().starts_with("GMP"));
        assert_eq!(code.as_str().len(), 8);
        assert!(store.lookup(code.as_str()).await.unwrap().is_active());
    }
    let active = store.list_codes(Some(CodeState::Active)).await.unwrap();
    assert_eq!(active.len(), codes.len());

    for (i, code) in codes.iter().enumerate() {
        let first = OrderId::new(format!("order_{}", i)).unwrap();
        let second = OrderId::new(format!("order_{}_again", i)).unwrap();
        assert_eq!(store.claim(code.as_str(), &first).await.unwrap(), ClaimOutcome::Claimed);
        assert_eq!(
            store.claim(code.as_str(), &second).await.unwrap(),
            ClaimOutcome::AlreadyClaimed
        );
    }
    assert!(store.list_codes(Some(CodeState::Active)).await.unwrap().is_empty());
}

// =============================================================================
// Pricing
// =============================================================================

#[tokio::test]
async fn child_follows_guardian_package_at_half_price() {
    let store = InMemoryBookingStore::new();
    let handler = QuotePartyHandler::new(
        PricingCalculator::default(),
        Arc::new(store),
        RegistrationGate::open(),
    );
    let mut child = traveler("Mira", 8);
    child.guardian = Some(1);

    let result = handler
        .handle(QuotePartyCommand {
            members: vec![
                PartyMember {
                    traveler: traveler("Ravi", 40),
                    selection: Some(PackageSelection {
                        start_date: march(1),
                        end_date: march(3),
                        hotel_tier: HotelTier::Standard,
                        travel_mode: TravelMode::Train,
                        membership_code: None,
                    }),
                },
                PartyMember {
                    traveler: child,
                    selection: None,
                },
            ],
        })
        .await
        .unwrap();

    let child_quote = &result.quotes[1].quote;
    assert_eq!(child_quote.amount, Money::from_rupees(12000));
    assert_eq!(child_quote.hotel_tier, HotelTier::Standard);
    assert_eq!(child_quote.num_days, 3);
    assert_eq!(result.total, Money::from_rupees(36000));
}

// =============================================================================
// Payment Reconciliation
// =============================================================================

#[tokio::test]
async fn double_finalize_writes_one_paid_row() {
    let h = harness();
    let pending = h.reconciler.create_pending(booking("Asha", None)).await.unwrap();

    let first = h
        .reconciler
        .finalize(Some(pending.clone()), &proof("order_A1", "pay_A1"), booking("Asha", None))
        .await
        .unwrap();
    let second = h
        .reconciler
        .finalize(Some(pending), &proof("order_A1", "pay_A1"), booking("Asha", None))
        .await
        .unwrap();

    assert!(!first.is_already_paid());
    assert!(second.is_already_paid());
    let paid = paid_rows(&h.store).await;
    assert_eq!(paid.len(), 1);
    assert_eq!(paid[0].order_id.as_str(), "order_A1");
    assert_eq!(h.store.booking_count().await, 1);
}

#[tokio::test]
async fn membership_payment_expires_the_code() {
    let h = harness();
    h.store
        .seed_code(MembershipRecord::active(MembershipCode::new("GMPK9X2A").unwrap(), "standard"))
        .await;
    let pending = h
        .reconciler
        .create_pending(booking("Asha", Some("GMPK9X2A")))
        .await
        .unwrap();
    assert!(pending.as_str().starts_with("INS_PENDING_"));

    h.reconciler
        .finalize(Some(pending), &proof("order_M1", "pay_M1"), booking("Asha", Some("GMPK9X2A")))
        .await
        .unwrap();

    assert_eq!(h.store.lookup("GMPK9X2A").await.unwrap(), LookupResult::NotFound);
    let expired = h.store.list_codes(Some(CodeState::Expired)).await.unwrap();
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].code_type, "standard");
    assert_eq!(expired[0].consumed_by.as_ref().map(|o| o.as_str()), Some("order_M1"));
}

#[tokio::test]
async fn mutated_signature_is_rejected_without_writes() {
    let h = harness();
    let pending = h.reconciler.create_pending(booking("Asha", None)).await.unwrap();
    let mut tampered = proof("order_S1", "pay_S1");
    let last = tampered.signature.pop().unwrap();
    tampered.signature.push(if last == '0' { '1' } else { '0' });

    let err = h
        .reconciler
        .finalize(Some(pending.clone()), &tampered, booking("Asha", None))
        .await
        .unwrap_err();

    assert!(matches!(err, BookingError::VerificationFailed));
    let row = h.store.find_by_order_id(&pending).await.unwrap().unwrap();
    assert_eq!(row.payment_status, PaymentStatus::Pending);
    assert!(paid_rows(&h.store).await.is_empty());
}

fn mutate_at(value: &str, index: usize) -> String {
    value
        .chars()
        .enumerate()
        .map(|(i, c)| match (i == index, c) {
            (false, c) => c,
            (true, 'x') => 'y',
            (true, _) => 'x',
        })
        .collect()
}

#[tokio::test]
async fn any_single_character_change_fails_verification() {
    let store = InMemoryBookingStore::new();
    let dir = tempfile::tempdir().unwrap();
    let recovery = Arc::new(JsonFileRecoveryLog::new(dir.path().join("failed_bookings.json")));
    let signer = PaymentSignatureVerifier::new(SecretString::new("s".to_string()));
    let signature = signer.sign("order_1", "pay_1");
    let reconciler = BookingReconciler::new(Arc::new(store.clone()), recovery, signer);

    let mut attempts = Vec::new();
    for i in 0.."order_1".len() {
        attempts.push((mutate_at("order_1", i), "pay_1".to_string()));
    }
    for i in 0.."pay_1".len() {
        attempts.push(("order_1".to_string(), mutate_at("pay_1", i)));
    }

    for (order, payment) in attempts {
        let tampered = PaymentProof {
            gateway_order_id: OrderId::new(order.clone()).unwrap(),
            payment_id: payment.clone(),
            signature: signature.clone(),
        };
        let result = reconciler.finalize(None, &tampered, booking("Asha", None)).await;
        assert!(
            matches!(result, Err(BookingError::VerificationFailed)),
            "{order}/{payment} was accepted"
        );
    }
    assert_eq!(store.booking_count().await, 0);

    let genuine = PaymentProof {
        gateway_order_id: OrderId::new("order_1").unwrap(),
        payment_id: "pay_1".to_string(),
        signature,
    };
    assert!(reconciler.finalize(None, &genuine, booking("Asha", None)).await.is_ok());
}

#[tokio::test]
async fn storage_failure_is_written_to_recovery_log() {
    let h = harness();
    h.store.set_write_failure(true).await;

    let err = h
        .reconciler
        .finalize(None, &proof("order_F1", "pay_F1"), booking("Asha", None))
        .await
        .unwrap_err();

    match err {
        BookingError::PersistenceFailed { payment_id, .. } => assert_eq!(payment_id, "pay_F1"),
        other => panic!("expected PersistenceFailed, got {other:?}"),
    }
    let entries = h.recovery.entries().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].order_id, "order_F1");
    assert_eq!(entries[0].full_booking_payload[0].traveler.name, "Asha");
    assert!(h.recovery.path().exists());
}

// =============================================================================
// Cleanup
// =============================================================================

#[tokio::test]
async fn cleanup_never_deletes_paid_rows() {
    let h = harness();
    let stale = h.reconciler.create_pending(booking("Old", None)).await.unwrap();
    let fresh = h.reconciler.create_pending(booking("New", None)).await.unwrap();
    let paid_pending = h.reconciler.create_pending(booking("Paid", None)).await.unwrap();
    h.reconciler
        .finalize(Some(paid_pending), &proof("order_P1", "pay_P1"), booking("Paid", None))
        .await
        .unwrap();

    let two_hours_ago = Timestamp::now().minus_minutes(120);
    assert!(h.store.set_created_at(&stale, two_hours_ago).await);
    assert!(h.store.set_created_at(&OrderId::new("order_P1").unwrap(), two_hours_ago).await);

    let deleted = h.reconciler.cleanup_stale(30).await.unwrap();

    assert_eq!(deleted, 1);
    assert!(h.store.find_by_order_id(&stale).await.unwrap().is_none());
    assert!(h.store.find_by_order_id(&fresh).await.unwrap().is_some());
    assert_eq!(paid_rows(&h.store).await.len(), 1);
}

#[tokio::test]
async fn finalize_after_cleanup_recreates_the_row() {
    let h = harness();
    let pending = h.reconciler.create_pending(booking("Late", None)).await.unwrap();
    h.store
        .set_created_at(&pending, Timestamp::now().minus_minutes(90))
        .await;
    h.reconciler.cleanup_stale(30).await.unwrap();

    let outcome = h
        .reconciler
        .finalize(Some(pending), &proof("order_L1", "pay_L1"), booking("Late", None))
        .await
        .unwrap();

    assert_eq!(outcome.records()[0].amount, Money::from_rupees(24000));
    assert_eq!(paid_rows(&h.store).await.len(), 1);
}
