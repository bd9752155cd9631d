//! Market Academy API server.

use std::sync::Arc;

use secrecy::ExposeSecret;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use market_academy::adapters::http::{build_router, AppState, Repositories};
use market_academy::adapters::{
    InMemoryStore, JwtConfig, JwtSessionValidator, RazorpayClient, RazorpayConfig,
};
use market_academy::config::AppConfig;
use market_academy::domain::commerce::{PaymentSignatureVerifier, WebhookSignatureVerifier};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let repos = if config.database.is_configured() {
        let pool = config.database.pool_options().connect(&config.database.url).await?;
        if config.database.run_migrations {
            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("database migrations applied");
        }
        Repositories::postgres(pool)
    } else {
        warn!("no database configured, using the in-memory store");
        Repositories::in_memory(Arc::new(InMemoryStore::new()))
    };

    let payment = &config.payment;
    let gateway = RazorpayClient::new(
        RazorpayConfig::new(payment.razorpay_key_id.clone(), payment.razorpay_key_secret.clone())
            .with_base_url(payment.api_base_url.clone())
            .with_timeout(payment.request_timeout()),
    )?;
    let state = AppState::new(
        repos,
        Arc::new(gateway),
        PaymentSignatureVerifier::new(payment.razorpay_key_secret.expose_secret().as_str()),
        WebhookSignatureVerifier::new(payment.razorpay_webhook_secret.expose_secret().as_str()),
    )
    .with_default_currency(payment.default_currency.clone());

    let auth = &config.auth;
    let validator = JwtSessionValidator::new(
        JwtConfig::new(auth.jwt_secret.clone(), auth.jwt_issuer.clone(), auth.jwt_audience.clone())
            .with_leeway(auth.leeway_secs),
    );

    let app = build_router(state, Arc::new(validator), &config.server);
    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(
        %addr,
        environment = ?config.server.environment,
        test_mode = payment.is_test_mode(),
        "market academy listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => warn!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
