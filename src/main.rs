use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use yatra_booking::adapters::email::{ResendConfig, ResendMailer, TextReceiptRenderer};
use yatra_booking::adapters::http::{booking_router, BookingAppState};
use yatra_booking::adapters::memory::InMemoryDraftStore;
use yatra_booking::adapters::postgres::{PostgresBookingRepository, PostgresMembershipRegistry};
use yatra_booking::adapters::razorpay::{RazorpayConfig, RazorpayGateway};
use yatra_booking::adapters::recovery::JsonFileRecoveryLog;
use yatra_booking::adapters::redis::RedisDraftStore;
use yatra_booking::application::handlers::admin::{
    AddCodeHandler, CreateRegistrationHandler, DeleteBookingHandler, GenerateCodesHandler,
    ListBookingsHandler, ListCodesHandler, ListRecoveryEntriesHandler, UpdateBookingHandler,
};
use yatra_booking::application::handlers::booking::{
    BookingReconciler, CreateGatewayOrderHandler, GetReceiptHandler, QuotePartyHandler,
    ReceiptDispatcher, RegistrationCheckout, VerifyMembershipHandler,
};
use yatra_booking::config::{AppConfig, RedisConfig, ServerConfig};
use yatra_booking::domain::booking::PaymentSignatureVerifier;
use yatra_booking::domain::pricing::PricingCalculator;
use yatra_booking::ports::DraftStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.server);
    config.validate().context("Invalid configuration")?;

    tracing::info!(
        environment = ?config.server.environment,
        port = config.server.port,
        test_mode = config.payment.is_test_mode(),
        "Starting yatra-booking"
    );

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await
        .context("Failed to connect to PostgreSQL")?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;
    }

    let bookings = Arc::new(PostgresBookingRepository::new(pool.clone()));
    let registry = Arc::new(PostgresMembershipRegistry::new(pool));
    let drafts = draft_store(&config.redis).await?;
    let gate = config.features.registration_gate();

    let mut gateway_config = RazorpayConfig::new(
        config.payment.razorpay_key_id.clone(),
        config.payment.razorpay_key_secret.clone(),
    )
    .with_max_attempts(config.payment.max_attempts)
    .with_initial_backoff(Duration::from_millis(config.payment.initial_backoff_ms));
    if let Some(url) = &config.payment.api_base_url {
        gateway_config = gateway_config.with_base_url(url.clone());
    }
    let gateway = Arc::new(RazorpayGateway::new(gateway_config));

    let verifier = PaymentSignatureVerifier::new(config.payment.razorpay_key_secret.clone());
    let recovery_log = Arc::new(JsonFileRecoveryLog::new(&config.booking.recovery_log_path));
    let mut reconciler = BookingReconciler::new(bookings.clone(), recovery_log.clone(), verifier);
    let renderer = Arc::new(TextReceiptRenderer::new(config.email.from_name.clone()));
    let mut receipts = GetReceiptHandler::new(bookings.clone(), renderer.clone());
    match &config.email.resend_api_key {
        Some(key) => {
            let mailer = ResendMailer::new(ResendConfig::new(
                key.clone(),
                config.email.from_header(),
            ));
            let dispatcher = ReceiptDispatcher::new(renderer, Arc::new(mailer));
            reconciler = reconciler.with_receipts(dispatcher.clone());
            receipts = receipts.with_dispatcher(dispatcher);
        }
        None => tracing::warn!("No Resend API key configured, receipts will not be emailed"),
    }
    let reconciler = Arc::new(reconciler);

    let quotes = QuotePartyHandler::new(
        PricingCalculator::new(config.pricing.rates()),
        registry.clone(),
        gate.clone(),
    );
    let orders = CreateGatewayOrderHandler::new(gateway, config.payment.currency.clone());
    let checkout = RegistrationCheckout::new(
        Arc::new(quotes),
        Arc::new(orders),
        reconciler.clone(),
        drafts,
        gate,
    )
    .with_draft_ttl_minutes(config.booking.draft_ttl_minutes);

    spawn_cleanup_sweep(
        reconciler.clone(),
        config.booking.pending_ttl_minutes,
        config.booking.cleanup_interval(),
    );

    let state = BookingAppState {
        checkout: Arc::new(checkout),
        reconciler,
        verify_membership: Arc::new(VerifyMembershipHandler::new(registry.clone())),
        generate_codes: Arc::new(GenerateCodesHandler::new(registry.clone())),
        update_booking: Arc::new(UpdateBookingHandler::new(bookings.clone())),
        create_registration: Arc::new(CreateRegistrationHandler::new(bookings.clone())),
        delete_booking: Arc::new(DeleteBookingHandler::new(bookings.clone())),
        receipts: Arc::new(receipts),
        list_bookings: Arc::new(ListBookingsHandler::new(bookings)),
        list_codes: Arc::new(ListCodesHandler::new(registry.clone())),
        add_code: Arc::new(AddCodeHandler::new(registry)),
        recovery_entries: Arc::new(ListRecoveryEntriesHandler::new(recovery_log)),
        gateway_key_id: config.payment.razorpay_key_id.clone(),
        pending_ttl_minutes: config.booking.pending_ttl_minutes,
    };

    let app = booking_router()
        .with_state(state)
        .layer(TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs)))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr().context("Invalid bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let registry = tracing_subscriber::registry().with(filter);
    if server.is_production() {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

async fn draft_store(config: &RedisConfig) -> anyhow::Result<Arc<dyn DraftStore>> {
    let Some(url) = config.url() else {
        tracing::info!("Redis not configured, holding registration drafts in memory");
        return Ok(Arc::new(InMemoryDraftStore::new()));
    };

    let client = redis::Client::open(url).context("Invalid Redis URL")?;
    let conn = tokio::time::timeout(config.timeout(), client.get_multiplexed_async_connection())
        .await
        .context("Timed out connecting to Redis")?
        .context("Failed to connect to Redis")?;
    Ok(Arc::new(RedisDraftStore::new(conn)))
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() && !server.is_production() {
        return CorsLayer::permissive();
    }
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

/// Sweeps stale Pending rows once at startup and then on every interval.
fn spawn_cleanup_sweep(reconciler: Arc<BookingReconciler>, max_age_minutes: i64, every: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            if let Err(err) = reconciler.cleanup_stale(max_age_minutes).await {
                tracing::error!(error = %err, "Pending cleanup sweep failed");
            }
        }
    });
}
