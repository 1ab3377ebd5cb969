// SPDX-FileCopyrightText: 2026 Tablebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion between Telegram updates and gateway types.
//!
//! Inbound messages and button presses become [`InboundEvent`]s keyed by
//! chat ID; outbound [`Markup`] becomes teloxide reply markup.

use teloxide::prelude::*;
use teloxide::types::{
    ButtonRequest, ChatKind, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton,
    KeyboardMarkup, KeyboardRemove, ReplyMarkup,
};

use tablebook_core::{InboundEvent, Markup, OwnerId};

/// Checks whether the message is from a private (DM) chat.
///
/// Group, supergroup, and channel messages return `false`.
pub fn is_dm(msg: &Message) -> bool {
    matches!(msg.chat.kind, ChatKind::Private(_))
}

/// Converts a message into an event.
///
/// Text and shared contacts are supported; anything else (stickers,
/// photos, locations) returns `None`.
pub fn message_to_event(msg: &Message) -> Option<InboundEvent> {
    let owner = OwnerId(msg.chat.id.0);
    if let Some(text) = msg.text() {
        return Some(InboundEvent::text(owner, text));
    }
    msg.contact()
        .map(|contact| InboundEvent::contact(owner, contact.phone_number.as_str()))
}

/// Converts a button press into an event.
///
/// The owner is the chat the button was shown in, or the presser when the
/// message is no longer available.
pub fn callback_to_event(query: &CallbackQuery) -> Option<InboundEvent> {
    let payload = query.data.as_deref()?;
    let chat = match query.message.as_ref() {
        Some(message) => message.chat().id.0,
        None => i64::try_from(query.from.id.0).ok()?,
    };
    Some(InboundEvent::button(OwnerId(chat), payload))
}

/// Maps gateway markup to Telegram reply markup. `Markup::None` sends none.
pub fn reply_markup(markup: &Markup) -> Option<ReplyMarkup> {
    match markup {
        Markup::None => None,
        Markup::RemoveKeyboard => Some(ReplyMarkup::KeyboardRemove(KeyboardRemove::new())),
        Markup::Reply(rows) => Some(ReplyMarkup::Keyboard(
            KeyboardMarkup::new(rows.iter().map(|row| {
                row.iter()
                    .map(|label| KeyboardButton::new(label.as_str()))
                    .collect::<Vec<_>>()
            }))
            .resize_keyboard(),
        )),
        Markup::Inline(rows) => Some(ReplyMarkup::InlineKeyboard(InlineKeyboardMarkup::new(
            rows.iter().map(|row| {
                row.iter()
                    .map(|b| InlineKeyboardButton::callback(b.label.as_str(), b.payload.as_str()))
                    .collect::<Vec<_>>()
            }),
        ))),
        Markup::RequestContact { label } => Some(ReplyMarkup::Keyboard(
            KeyboardMarkup::new(vec![vec![
                KeyboardButton::new(label.as_str()).request(ButtonRequest::Contact),
            ]])
            .resize_keyboard()
            .one_time_keyboard(),
        )),
    }
}
