// SPDX-FileCopyrightText: 2026 Tablebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Tablebook.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use tablebook_core::{BookingCalendar, TablebookError};

/// Top-level Tablebook configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// Every section defaults except `telegram.bot_token`, which validation requires.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TablebookConfig {
    /// Process-wide settings.
    #[serde(default)]
    pub bot: BotConfig,

    /// Telegram bot credentials.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Booking rules: time zone, lead time, TTL, sweep cadence.
    #[serde(default)]
    pub booking: BookingConfig,

    /// Restaurant details shown to guests.
    #[serde(default)]
    pub restaurant: RestaurantConfig,

    /// Admin notification target.
    #[serde(default)]
    pub admin: AdminConfig,

    /// Durable reservation storage.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl TablebookConfig {
    /// Copy of the config with secrets replaced, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.telegram.bot_token.is_some() {
            copy.telegram.bot_token = Some("<redacted>".to_string());
        }
        copy
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram bot integration configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. Also read from `TELEGRAM_BOT_TOKEN`.
    #[serde(default)]
    pub bot_token: Option<String>,
}

/// Booking rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BookingConfig {
    /// IANA time zone all dates and times are interpreted in.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Minimum lead time, in hours, for same-day bookings.
    #[serde(default = "default_min_booking_hours")]
    pub min_booking_hours: u32,

    /// Minutes a reservation stays active past its start time.
    #[serde(default = "default_reservation_ttl_mins")]
    pub reservation_ttl_mins: u32,

    /// Seconds between expiry sweeps.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            min_booking_hours: default_min_booking_hours(),
            reservation_ttl_mins: default_reservation_ttl_mins(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl BookingConfig {
    /// Builds the calendar these rules describe.
    pub fn calendar(&self) -> Result<BookingCalendar, TablebookError> {
        BookingCalendar::from_zone_name(
            &self.timezone,
            TimeDelta::minutes(i64::from(self.reservation_ttl_mins)),
            TimeDelta::hours(i64::from(self.min_booking_hours)),
        )
    }

    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.sweep_interval_secs)
    }
}

fn default_timezone() -> String {
    "Europe/Moscow".to_string()
}

fn default_min_booking_hours() -> u32 {
    2
}

fn default_reservation_ttl_mins() -> u32 {
    15
}

fn default_sweep_interval_secs() -> u64 {
    300
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RestaurantConfig {
    /// Phone number given out by "Contact us".
    #[serde(default)]
    pub contact_phone: String,
}

/// Admin notification configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AdminConfig {
    /// Chat that receives a copy of every create, edit and delete.
    /// `None` disables notifications.
    #[serde(default)]
    pub chat_id: Option<i64>,
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the reservations CSV file.
    #[serde(default = "default_reservations_path")]
    pub reservations_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            reservations_path: default_reservations_path(),
        }
    }
}

fn default_reservations_path() -> String {
    "reservations.csv".to_string()
}
