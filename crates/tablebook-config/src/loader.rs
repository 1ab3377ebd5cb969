// SPDX-FileCopyrightText: 2026 Tablebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./tablebook.toml` > `~/.config/tablebook/tablebook.toml`
//! > `/etc/tablebook/tablebook.toml`, with environment variable overrides via the
//! `TABLEBOOK_` prefix and the bare `TELEGRAM_BOT_TOKEN` variable.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::TablebookConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/tablebook/tablebook.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_PATH: &str = "tablebook.toml";

/// Sections that `TABLEBOOK_{SECTION}_{KEY}` variables map into.
const SECTIONS: &[&str] = &["bot", "telegram", "booking", "restaurant", "admin", "storage"];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/tablebook/tablebook.toml` (system-wide)
/// 3. `~/.config/tablebook/tablebook.toml` (user XDG config)
/// 4. `./tablebook.toml` (local directory)
/// 5. `TABLEBOOK_*` environment variables
/// 6. `TELEGRAM_BOT_TOKEN`
pub fn load_config() -> Result<TablebookConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<TablebookConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TablebookConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TablebookConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TablebookConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .merge(legacy_token_provider())
        .extract()
}

/// The full layered Figment, before extraction.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new()
        .merge(Serialized::defaults(TablebookConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH));
    if let Some(user) = user_config_path() {
        figment = figment.merge(Toml::file(user));
    }
    figment
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
        .merge(legacy_token_provider())
}

/// `~/.config/tablebook/tablebook.toml`, when a config dir is known.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tablebook").join("tablebook.toml"))
}

/// Maps `TABLEBOOK_{SECTION}_{KEY}` onto `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because keys themselves
/// contain underscores: `TABLEBOOK_BOOKING_MIN_BOOKING_HOURS` must become
/// `booking.min_booking_hours`.
fn env_provider() -> Env {
    Env::prefixed("TABLEBOOK_").map(|key| map_section_key(key.as_str()).into())
}

/// The token variable Telegram bots conventionally read.
fn legacy_token_provider() -> Env {
    Env::raw()
        .only(&["telegram_bot_token"])
        .map(|_| "telegram.bot_token".into())
}

fn map_section_key(key: &str) -> String {
    SECTIONS
        .iter()
        .find_map(|section| {
            key.strip_prefix(section)
                .and_then(|rest| rest.strip_prefix('_'))
                .map(|field| format!("{section}.{field}"))
        })
        .unwrap_or_else(|| key.to_string())
}
