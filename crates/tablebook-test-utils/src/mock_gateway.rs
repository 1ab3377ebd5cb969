// SPDX-FileCopyrightText: 2026 Tablebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock messaging gateway for deterministic testing.
//!
//! `MockGateway` implements `MessageGateway` with injectable inbound events
//! and captured outbound messages for assertion in tests.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use tablebook_core::{
    AdapterType, HealthStatus, InboundEvent, MessageGateway, MessageId, OutboundMessage, OwnerId,
    PluginAdapter, TablebookError,
};

/// A mock messaging gateway for testing.
///
/// Clones share the same queues, so a test can keep one handle while the
/// dialogue owns another.
/// - **inbound**: events injected via `inject()` are returned by `receive()`
/// - **sent**: messages passed to `send()` are captured and retrievable via `sent()`
#[derive(Clone, Default)]
pub struct MockGateway {
    inbound: Arc<Mutex<VecDeque<InboundEvent>>>,
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    notify: Arc<Notify>,
    closed: Arc<AtomicBool>,
    next_id: Arc<AtomicU64>,
    unreachable: Arc<std::sync::Mutex<HashSet<OwnerId>>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an inbound event for the next `receive()`.
    pub async fn inject(&self, event: InboundEvent) {
        self.inbound.lock().await.push_back(event);
        self.notify.notify_one();
    }

    /// Makes `receive()` fail with a closed-gateway error once the queue is drained.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    /// Makes every send to `owner` fail.
    pub fn make_unreachable(&self, owner: OwnerId) {
        if let Ok(mut set) = self.unreachable.lock() {
            set.insert(owner);
        }
    }

    /// Every message successfully sent so far.
    pub async fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }

    /// Messages sent to one chat.
    pub async fn sent_to(&self, owner: OwnerId) -> Vec<OutboundMessage> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|m| m.owner == owner)
            .cloned()
            .collect()
    }

    /// The most recent message sent to `owner`.
    pub async fn last_sent_to(&self, owner: OwnerId) -> Option<OutboundMessage> {
        self.sent
            .lock()
            .await
            .iter()
            .rev()
            .find(|m| m.owner == owner)
            .cloned()
    }

    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }

    fn is_unreachable(&self, owner: OwnerId) -> bool {
        self.unreachable
            .lock()
            .map(|set| set.contains(&owner))
            .unwrap_or(false)
    }
}

#[async_trait]
impl PluginAdapter for MockGateway {
    fn name(&self) -> &str {
        "mock-gateway"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Gateway
    }

    async fn health_check(&self) -> Result<HealthStatus, TablebookError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TablebookError> {
        Ok(())
    }
}

#[async_trait]
impl MessageGateway for MockGateway {
    async fn connect(&mut self) -> Result<(), TablebookError> {
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, TablebookError> {
        if self.is_unreachable(msg.owner) {
            return Err(TablebookError::Gateway {
                message: format!("chat {} unreachable", msg.owner),
                source: None,
            });
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().await.push(msg);
        Ok(MessageId(format!("mock-msg-{id}")))
    }

    async fn receive(&self) -> Result<InboundEvent, TablebookError> {
        loop {
            {
                let mut queue = self.inbound.lock().await;
                if let Some(event) = queue.pop_front() {
                    return Ok(event);
                }
            }
            if self.closed.load(Ordering::SeqCst) {
                return Err(TablebookError::Gateway {
                    message: "mock gateway closed".into(),
                    source: None,
                });
            }
            self.notify.notified().await;
        }
    }
}
