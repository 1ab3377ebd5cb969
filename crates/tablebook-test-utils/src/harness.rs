// SPDX-FileCopyrightText: 2026 Tablebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end dialogue testing.
//!
//! `TestHarness` assembles a complete dialogue stack with a mock gateway,
//! an in-memory durable log, and a manual clock. Provides `text()`,
//! `press()`, and `share_contact()` to drive the dialogue in tests.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};

use tablebook_core::{
    BookingCalendar, InboundEvent, ManualClock, OutboundMessage, OwnerId, Reservation,
    TablebookError,
};
use tablebook_dialogue::{
    ConversationState, ConversationStateRepository, Dialogue, DialogueSettings,
    InMemoryConversations,
};
use tablebook_storage::ReservationStore;

use crate::memory_log::MemoryLog;
use crate::mock_gateway::MockGateway;

/// 18.10.2026 12:00 in Moscow.
pub fn default_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    now: DateTime<Utc>,
    timezone: String,
    ttl: TimeDelta,
    min_lead: TimeDelta,
    settings: DialogueSettings,
    rows: Vec<Reservation>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            now: default_now(),
            timezone: "Europe/Moscow".into(),
            ttl: TimeDelta::minutes(15),
            min_lead: TimeDelta::hours(2),
            settings: DialogueSettings {
                contact_phone: "+7 495 000-00-00".into(),
                admin: None,
            },
            rows: Vec::new(),
        }
    }

    /// Set the initial clock reading.
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Set the admin chat that receives booking notices.
    pub fn with_admin(mut self, admin: OwnerId) -> Self {
        self.settings.admin = Some(admin);
        self
    }

    /// Set the phone number given out by "Contact us".
    pub fn with_contact_phone(mut self, phone: impl Into<String>) -> Self {
        self.settings.contact_phone = phone.into();
        self
    }

    /// Pre-populate the durable log; the store loads it on build.
    pub fn with_reservations(mut self, rows: Vec<Reservation>) -> Self {
        self.rows = rows;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub fn build(self) -> Result<TestHarness, TablebookError> {
        let calendar = BookingCalendar::from_zone_name(&self.timezone, self.ttl, self.min_lead)?;
        let clock = Arc::new(ManualClock::new(self.now));
        let log = Arc::new(MemoryLog::with_rows(self.rows));
        let store = Arc::new(ReservationStore::load(
            log.clone(),
            calendar.clone(),
            clock.clone(),
        )?);
        let conversations = Arc::new(InMemoryConversations::new());
        let gateway = MockGateway::new();

        let dialogue = Dialogue::new(
            Box::new(gateway.clone()),
            store.clone(),
            conversations.clone(),
            calendar.clone(),
            clock.clone(),
            self.settings,
        );

        Ok(TestHarness {
            gateway,
            log,
            store,
            conversations,
            clock,
            calendar,
            dialogue,
        })
    }
}

/// A fully wired dialogue over mocks.
pub struct TestHarness {
    pub gateway: MockGateway,
    pub log: Arc<MemoryLog>,
    pub store: Arc<ReservationStore>,
    pub conversations: Arc<InMemoryConversations>,
    pub clock: Arc<ManualClock>,
    pub calendar: BookingCalendar,
    pub dialogue: Dialogue,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Feed one event straight into the dialogue.
    pub async fn handle(&self, event: InboundEvent) -> Result<(), TablebookError> {
        self.dialogue.handle(event).await
    }

    pub async fn text(&self, owner: OwnerId, text: &str) -> Result<(), TablebookError> {
        self.handle(InboundEvent::text(owner, text)).await
    }

    pub async fn press(&self, owner: OwnerId, payload: &str) -> Result<(), TablebookError> {
        self.handle(InboundEvent::button(owner, payload)).await
    }

    pub async fn share_contact(&self, owner: OwnerId, phone: &str) -> Result<(), TablebookError> {
        self.handle(InboundEvent::contact(owner, phone)).await
    }

    pub fn state(&self, owner: OwnerId) -> ConversationState {
        self.conversations.get(owner)
    }

    /// Text of the most recent message to `owner`, or an empty string.
    pub async fn last_text(&self, owner: OwnerId) -> String {
        self.gateway
            .last_sent_to(owner)
            .await
            .map(|m| m.text)
            .unwrap_or_default()
    }

    pub async fn sent_to(&self, owner: OwnerId) -> Vec<OutboundMessage> {
        self.gateway.sent_to(owner).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn start_greets_and_shows_menu() {
        let harness = TestHarness::builder().build().unwrap();
        harness.text(OwnerId(1), "/start").await.unwrap();

        let sent = harness.sent_to(OwnerId(1)).await;
        assert_eq!(sent.len(), 2);
        assert!(sent[0].text.starts_with("Welcome"));
        assert_eq!(harness.state(OwnerId(1)), ConversationState::MainMenu);
    }

    #[tokio::test]
    async fn preloaded_rows_reach_the_store() {
        use tablebook_core::ReservationRepository;
        use tablebook_core::types::NO_COMMENT;

        let row = Reservation {
            id: "5-1".into(),
            owner: OwnerId(5),
            name: "Olga".into(),
            phone: "79990001122".into(),
            guests: 4,
            date: "19.10.2026".into(),
            time: "19:00".into(),
            comment: NO_COMMENT.into(),
            confirmed: true,
            created_at: default_now(),
        };
        let harness = TestHarness::builder()
            .with_reservations(vec![row])
            .build()
            .unwrap();
        assert!(harness.store.has_active_for_owner(OwnerId(5)).await);
    }
}
