// SPDX-FileCopyrightText: 2026 Tablebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks the rules serde cannot express: a present bot token, a known time
//! zone, positive durations, and a usable storage path.

use chrono_tz::Tz;

use crate::diagnostic::ConfigError;
use crate::model::TablebookConfig;

/// Validate a deserialized configuration.
///
/// Collects every violation instead of stopping at the first.
pub fn validate_config(config: &TablebookConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    match config.telegram.bot_token.as_deref().map(str::trim) {
        None => errors.push(ConfigError::MissingKey {
            key: "telegram.bot_token".to_string(),
        }),
        Some("") => errors.push(ConfigError::validation(
            "telegram.bot_token",
            "must not be empty",
        )),
        Some(_) => {}
    }

    let zone = config.booking.timezone.trim();
    if zone.parse::<Tz>().is_err() {
        errors.push(ConfigError::validation(
            "booking.timezone",
            format!("`{zone}` is not a known IANA time zone"),
        ));
    }

    if config.booking.reservation_ttl_mins == 0 {
        errors.push(ConfigError::validation(
            "booking.reservation_ttl_mins",
            "must be at least 1",
        ));
    }

    if config.booking.sweep_interval_secs == 0 {
        errors.push(ConfigError::validation(
            "booking.sweep_interval_secs",
            "must be at least 1",
        ));
    }

    if config.storage.reservations_path.trim().is_empty() {
        errors.push(ConfigError::validation(
            "storage.reservations_path",
            "must not be empty",
        ));
    }

    if config.admin.chat_id == Some(0) {
        errors.push(ConfigError::validation(
            "admin.chat_id",
            "0 is not a valid chat; omit the key to disable notifications",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
