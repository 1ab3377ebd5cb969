// SPDX-FileCopyrightText: 2026 Tablebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user conversation state.

use dashmap::DashMap;

use tablebook_core::OwnerId;

use crate::state::ConversationState;

/// Where each user's conversation currently stands.
///
/// Users never seen before are in [`ConversationState::MainMenu`].
pub trait ConversationStateRepository: Send + Sync {
    fn get(&self, owner: OwnerId) -> ConversationState;

    fn set(&self, owner: OwnerId, state: ConversationState);

    /// Forgets the user's state.
    fn reset(&self, owner: OwnerId) {
        self.set(owner, ConversationState::MainMenu);
    }
}

/// Process-local conversation states. Lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryConversations {
    states: DashMap<OwnerId, ConversationState>,
}

impl InMemoryConversations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users away from the main menu.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl ConversationStateRepository for InMemoryConversations {
    fn get(&self, owner: OwnerId) -> ConversationState {
        self.states
            .get(&owner)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    fn set(&self, owner: OwnerId, state: ConversationState) {
        if state == ConversationState::MainMenu {
            self.states.remove(&owner);
        } else {
            self.states.insert(owner, state);
        }
    }
}
