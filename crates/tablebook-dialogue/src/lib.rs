// SPDX-FileCopyrightText: 2026 Tablebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation handling for the Tablebook reservation bot.
//!
//! - [`machine`] is the pure per-user state machine.
//! - [`Dialogue`] drives it from gateway events and executes bookings, edits,
//!   and deletions against the reservation store.
//! - [`ExpirySweeper`] evicts reservations whose time has passed.

pub mod callback;
pub mod conversations;
pub mod machine;
pub mod orchestrator;
pub mod prompts;
pub mod shutdown;
pub mod state;
pub mod sweeper;
pub mod validation;

pub use callback::{Callback, EditField};
pub use conversations::{ConversationStateRepository, InMemoryConversations};
pub use machine::{Context, Input, Reply, Transition, transition};
pub use orchestrator::{Dialogue, DialogueSettings};
pub use prompts::{AdminEvent, Prompt};
pub use state::{ConversationState, Draft, EditStep};
pub use sweeper::{ExpirySweeper, sweep};
pub use validation::InputError;
