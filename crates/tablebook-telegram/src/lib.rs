// SPDX-FileCopyrightText: 2026 Tablebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram gateway for the Tablebook reservation bot.
//!
//! Implements [`MessageGateway`] for the Telegram Bot API via teloxide,
//! providing long polling, button acknowledgement, and keyboard rendering.

pub mod handler;

use async_trait::async_trait;
use tablebook_config::model::TelegramConfig;
use tablebook_core::{
    AdapterType, HealthStatus, InboundEvent, MessageGateway, MessageId, OutboundMessage,
    PluginAdapter, TablebookError,
};
use teloxide::dispatching::ShutdownToken;
use teloxide::prelude::*;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Inbound events buffered between the dispatcher and the dialogue.
const INBOUND_BUFFER: usize = 100;

/// Telegram gateway implementing [`MessageGateway`].
///
/// Connects to Telegram via long polling, accepts private chats only, and
/// answers every callback query as soon as it arrives.
pub struct TelegramGateway {
    bot: Bot,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<InboundEvent>>,
    inbound_tx: mpsc::Sender<InboundEvent>,
    polling_handle: Option<tokio::task::JoinHandle<()>>,
    shutdown_token: Option<ShutdownToken>,
}

impl TelegramGateway {
    /// Creates a new Telegram gateway.
    ///
    /// Requires `config.bot_token` to be set.
    pub fn new(config: &TelegramConfig) -> Result<Self, TablebookError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            TablebookError::Config("telegram.bot_token is required for Telegram gateway".into())
        })?;

        if token.trim().is_empty() {
            return Err(TablebookError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let bot = Bot::new(token);
        let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_BUFFER);

        Ok(Self {
            bot,
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            inbound_tx,
            polling_handle: None,
            shutdown_token: None,
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

fn gateway_error(context: &str, e: teloxide::RequestError) -> TablebookError {
    TablebookError::Gateway {
        message: format!("{context}: {e}"),
        source: Some(Box::new(e)),
    }
}

#[async_trait]
impl PluginAdapter for TelegramGateway {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Gateway
    }

    async fn health_check(&self) -> Result<HealthStatus, TablebookError> {
        // Check if the bot token is valid by calling getMe.
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), TablebookError> {
        debug!("Telegram gateway shutting down");
        if let Some(token) = &self.shutdown_token {
            match token.shutdown() {
                Ok(done) => done.await,
                Err(_) => debug!("dispatcher was not running"),
            }
        }
        if let Some(handle) = &self.polling_handle {
            handle.abort();
        }
        Ok(())
    }
}

#[async_trait]
impl MessageGateway for TelegramGateway {
    async fn connect(&mut self) -> Result<(), TablebookError> {
        if self.polling_handle.is_some() {
            return Ok(()); // Already connected
        }

        let message_tx = self.inbound_tx.clone();
        let callback_tx = self.inbound_tx.clone();

        info!("starting Telegram long polling");

        let handler = dptree::entry()
            .branch(Update::filter_message().endpoint(move |msg: Message| {
                let tx = message_tx.clone();
                async move {
                    if !handler::is_dm(&msg) {
                        debug!(chat_id = msg.chat.id.0, "ignoring non-DM message");
                        return respond(());
                    }
                    match handler::message_to_event(&msg) {
                        Some(event) => {
                            if tx.send(event).await.is_err() {
                                warn!("inbound channel closed, dropping message");
                            }
                        }
                        None => {
                            debug!(msg_id = msg.id.0, "ignoring unsupported message type");
                        }
                    }
                    respond(())
                }
            }))
            .branch(Update::filter_callback_query().endpoint(
                move |bot: Bot, query: CallbackQuery| {
                    let tx = callback_tx.clone();
                    async move {
                        // Acknowledged before routing, whatever the outcome.
                        if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
                            warn!(error = %e, "failed to answer callback query");
                        }
                        match handler::callback_to_event(&query) {
                            Some(event) => {
                                if tx.send(event).await.is_err() {
                                    warn!("inbound channel closed, dropping button press");
                                }
                            }
                            None => debug!("ignoring callback query without data"),
                        }
                        respond(())
                    }
                },
            ));

        let mut dispatcher = Dispatcher::builder(self.bot.clone(), handler)
            .default_handler(|_| async {}) // Silently ignore other updates
            .build();
        self.shutdown_token = Some(dispatcher.shutdown_token());

        let handle = tokio::spawn(async move {
            dispatcher.dispatch().await;
        });

        self.polling_handle = Some(handle);
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, TablebookError> {
        let mut request = self.bot.send_message(ChatId(msg.owner.0), msg.text);
        if let Some(markup) = handler::reply_markup(&msg.markup) {
            request = request.reply_markup(markup);
        }
        let sent = request
            .await
            .map_err(|e| gateway_error("failed to send message", e))?;
        Ok(MessageId(sent.id.0.to_string()))
    }

    async fn receive(&self) -> Result<InboundEvent, TablebookError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv().await.ok_or_else(|| TablebookError::Gateway {
            message: "Telegram inbound channel closed".into(),
            source: None,
        })
    }
}
