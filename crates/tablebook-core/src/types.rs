// SPDX-FileCopyrightText: 2026 Tablebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain and messaging types shared across the Tablebook workspace.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Comment value stored when the guest skips the comment step.
pub const NO_COMMENT: &str = "-";

/// Identifier of the conversation (chat) that owns a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OwnerId(pub i64);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque reservation identifier.
///
/// Generated as `{owner}-{unix_nanos}` at creation time. Two submissions from
/// the same owner within one clock tick would collide; this is not guarded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReservationId(pub String);

impl ReservationId {
    /// Derives an ID from the owner and the creation instant.
    pub fn generate(owner: OwnerId, created_at: DateTime<Utc>) -> Self {
        let nanos = created_at
            .timestamp_nanos_opt()
            .unwrap_or_else(|| created_at.timestamp_micros().saturating_mul(1_000));
        Self(format!("{owner}-{nanos}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReservationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A confirmed table booking.
///
/// `date` and `time` are kept in their display formats (`DD.MM.YYYY`, `HH:MM`)
/// and resolved against the configured time zone by
/// [`BookingCalendar`](crate::calendar::BookingCalendar).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub owner: OwnerId,
    pub name: String,
    pub phone: String,
    pub guests: u32,
    pub date: String,
    pub time: String,
    pub comment: String,
    pub confirmed: bool,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    /// Returns `true` when the guest left a real comment.
    pub fn has_comment(&self) -> bool {
        !self.comment.is_empty() && self.comment != NO_COMMENT
    }
}

/// Unique identifier for a message delivered by a gateway.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a [`PluginAdapter`](crate::traits::PluginAdapter).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Gateway,
    Storage,
}

// --- Messaging types ---

/// An event received from the messaging gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub owner: OwnerId,
    pub kind: EventKind,
}

impl InboundEvent {
    pub fn text(owner: OwnerId, text: impl Into<String>) -> Self {
        Self {
            owner,
            kind: EventKind::Text(text.into()),
        }
    }

    pub fn contact(owner: OwnerId, phone: impl Into<String>) -> Self {
        Self {
            owner,
            kind: EventKind::Contact {
                phone: phone.into(),
            },
        }
    }

    pub fn button(owner: OwnerId, payload: impl Into<String>) -> Self {
        Self {
            owner,
            kind: EventKind::Button {
                payload: payload.into(),
            },
        }
    }
}

/// The three shapes of inbound input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Free text typed by the user (including reply-keyboard labels).
    Text(String),
    /// A shared contact card.
    Contact { phone: String },
    /// An inline button press. The transport acknowledges it on receipt.
    Button { payload: String },
}

/// An inline button carrying a callback payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub payload: String,
}

impl InlineButton {
    pub fn new(label: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            payload: payload.into(),
        }
    }
}

/// Keyboard attached to an outbound message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Markup {
    /// Leave whatever keyboard the user currently has.
    #[default]
    None,
    /// Hide the reply keyboard.
    RemoveKeyboard,
    /// Reply keyboard; each label sends itself back as text.
    Reply(Vec<Vec<String>>),
    /// Inline keyboard under the message.
    Inline(Vec<Vec<InlineButton>>),
    /// Single reply button that shares the user's contact card.
    RequestContact { label: String },
}

/// A message to be delivered through the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub owner: OwnerId,
    pub text: String,
    pub markup: Markup,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Reservation {
        Reservation {
            id: ReservationId::from("42-1"),
            owner: OwnerId(42),
            name: "Ivan".into(),
            phone: "79112223344".into(),
            guests: 2,
            date: "19.10.2026".into(),
            time: "20:30".into(),
            comment: NO_COMMENT.into(),
            confirmed: true,
            created_at: Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn generated_id_combines_owner_and_nanos() {
        let at = Utc.timestamp_opt(1_700_000_000, 123).unwrap();
        let id = ReservationId::generate(OwnerId(42), at);
        assert_eq!(id.as_str(), "42-1700000000000000123");
    }

    #[test]
    fn sentinel_comment_is_not_a_comment() {
        let mut r = sample();
        assert!(!r.has_comment());
        r.comment = String::new();
        assert!(!r.has_comment());
        r.comment = "window seat".into();
        assert!(r.has_comment());
    }

    #[test]
    fn adapter_type_round_trips_through_strings() {
        use std::str::FromStr;
        for variant in [AdapterType::Gateway, AdapterType::Storage] {
            let parsed = AdapterType::from_str(&variant.to_string()).unwrap();
            assert_eq!(parsed, variant);
        }
    }

    #[test]
    fn reservation_serializes_to_json() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["owner"], 42);
        assert_eq!(json["id"], "42-1");
    }
}
