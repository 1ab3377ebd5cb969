// SPDX-FileCopyrightText: 2026 Tablebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tablebook serve` command implementation.
//!
//! Loads the reservation file into the in-memory store, connects the
//! Telegram gateway, starts the expiry sweeper, and runs the dialogue until
//! a shutdown signal arrives.

use std::sync::Arc;

use tablebook_config::TablebookConfig;
use tablebook_core::{
    Clock, HealthStatus, MessageGateway, OwnerId, PluginAdapter, SystemClock, TablebookError,
};
use tablebook_dialogue::shutdown;
use tablebook_dialogue::{Dialogue, DialogueSettings, ExpirySweeper, InMemoryConversations};
use tablebook_storage::{CsvReservationLog, ReservationStore};
use tablebook_telegram::TelegramGateway;
use tracing::{info, warn};

/// Runs the `tablebook serve` command.
pub async fn run_serve(config: TablebookConfig) -> Result<(), TablebookError> {
    init_tracing(&config.bot.log_level);

    info!("starting tablebook serve");

    let calendar = config.booking.calendar()?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    info!(
        timezone = %calendar.timezone(),
        ttl_mins = config.booking.reservation_ttl_mins,
        min_booking_hours = config.booking.min_booking_hours,
        "booking rules loaded"
    );

    // Initialize storage.
    let log = Arc::new(CsvReservationLog::new(&config.storage.reservations_path));
    let store = Arc::new(ReservationStore::load(
        log.clone(),
        calendar.clone(),
        clock.clone(),
    )?);
    log_health(log.as_ref()).await;

    // Initialize the Telegram gateway.
    let mut gateway = TelegramGateway::new(&config.telegram)?;
    log_health(&gateway).await;
    gateway.connect().await?;

    // Install signal handler.
    let cancel = shutdown::install_signal_handler();

    // Spawn the expiry sweeper.
    let sweeper = ExpirySweeper::new(
        store.clone(),
        calendar.clone(),
        clock.clone(),
        config.booking.sweep_interval(),
    )
    .spawn(cancel.clone());

    let settings = DialogueSettings {
        contact_phone: config.restaurant.contact_phone.clone(),
        admin: config.admin.chat_id.map(OwnerId),
    };
    if settings.admin.is_none() {
        info!("no admin chat configured, booking notices disabled");
    }

    let dialogue = Dialogue::new(
        Box::new(gateway),
        store,
        Arc::new(InMemoryConversations::new()),
        calendar,
        clock,
        settings,
    );

    let result = dialogue.run(cancel.clone()).await;

    // The gateway may have closed on its own; stop the sweeper either way.
    cancel.cancel();
    if let Err(e) = sweeper.await {
        warn!(error = %e, "expiry sweeper task ended abnormally");
    }

    result?;
    info!("tablebook serve shutdown complete");
    Ok(())
}

/// Logs an adapter's health at startup. Never fatal.
async fn log_health(adapter: &dyn PluginAdapter) {
    match adapter.health_check().await {
        Ok(HealthStatus::Healthy) => info!(adapter = adapter.name(), "adapter healthy"),
        Ok(HealthStatus::Degraded(reason)) => {
            warn!(adapter = adapter.name(), reason = reason.as_str(), "adapter degraded")
        }
        Ok(HealthStatus::Unhealthy(reason)) => {
            warn!(adapter = adapter.name(), reason = reason.as_str(), "adapter unhealthy")
        }
        Err(e) => warn!(adapter = adapter.name(), error = %e, "adapter health check failed"),
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tablebook={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
