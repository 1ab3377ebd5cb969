// SPDX-FileCopyrightText: 2026 Tablebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Messaging gateway trait (Telegram or any chat transport with buttons and
//! contact cards).

use async_trait::async_trait;

use crate::error::TablebookError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{InboundEvent, InlineButton, Markup, MessageId, OutboundMessage, OwnerId};

/// Bidirectional chat transport.
///
/// Implementations must acknowledge every button press as soon as it is
/// received, independently of whatever reply the dialogue sends.
#[async_trait]
pub trait MessageGateway: PluginAdapter {
    /// Starts receiving events from the transport.
    async fn connect(&mut self) -> Result<(), TablebookError>;

    /// Delivers one message.
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, TablebookError>;

    /// Waits for the next inbound event.
    async fn receive(&self) -> Result<InboundEvent, TablebookError>;

    /// Plain text with an optional keyboard change.
    async fn send_text(
        &self,
        owner: OwnerId,
        text: &str,
        markup: Markup,
    ) -> Result<MessageId, TablebookError> {
        self.send(OutboundMessage {
            owner,
            text: text.to_string(),
            markup,
        })
        .await
    }

    /// Text with inline choice buttons.
    async fn send_choice_prompt(
        &self,
        owner: OwnerId,
        text: &str,
        buttons: Vec<Vec<InlineButton>>,
    ) -> Result<MessageId, TablebookError> {
        self.send_text(owner, text, Markup::Inline(buttons)).await
    }

    /// Asks the user to share their contact card.
    async fn request_contact(
        &self,
        owner: OwnerId,
        prompt: &str,
        button_label: &str,
    ) -> Result<MessageId, TablebookError> {
        self.send_text(
            owner,
            prompt,
            Markup::RequestContact {
                label: button_label.to_string(),
            },
        )
        .await
    }
}
