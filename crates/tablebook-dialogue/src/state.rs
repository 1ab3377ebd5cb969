// SPDX-FileCopyrightText: 2026 Tablebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-owner conversation state.
//!
//! Each variant carries exactly the scratch data collected so far, so a step
//! can never observe a field it has not asked for yet.

use tablebook_core::Reservation;

use crate::callback::EditField;

/// Booking answers collected before the date is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub name: String,
    pub phone: String,
    pub guests: u32,
    pub comment: String,
}

/// Where a conversation currently is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConversationState {
    /// No question outstanding.
    #[default]
    MainMenu,
    WaitingForName,
    WaitingForPhone {
        name: String,
    },
    WaitingForManualPhone {
        name: String,
    },
    WaitingForGuests {
        name: String,
        phone: String,
    },
    WaitingForComment {
        name: String,
        phone: String,
        guests: u32,
    },
    WaitingForDate {
        draft: Draft,
    },
    WaitingForTime {
        draft: Draft,
        date: String,
    },
    /// Editing an existing reservation. Changes land on `working` and reach
    /// the store only on confirm.
    Editing {
        step: EditStep,
        working: Reservation,
    },
}

impl ConversationState {
    /// Short name for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::MainMenu => "main_menu",
            Self::WaitingForName => "waiting_for_name",
            Self::WaitingForPhone { .. } => "waiting_for_phone",
            Self::WaitingForManualPhone { .. } => "waiting_for_manual_phone",
            Self::WaitingForGuests { .. } => "waiting_for_guests",
            Self::WaitingForComment { .. } => "waiting_for_comment",
            Self::WaitingForDate { .. } => "waiting_for_date",
            Self::WaitingForTime { .. } => "waiting_for_time",
            Self::Editing { step, .. } => step.label(),
        }
    }
}

/// Sub-step of the edit dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditStep {
    /// Showing the edit options menu.
    Options,
    Field(EditField),
}

impl EditStep {
    fn label(self) -> &'static str {
        match self {
            Self::Options => "editing",
            Self::Field(EditField::Name) => "editing_name",
            Self::Field(EditField::Phone) => "editing_phone",
            Self::Field(EditField::Guests) => "editing_guests",
            Self::Field(EditField::Date) => "editing_date",
            Self::Field(EditField::Time) => "editing_time",
            Self::Field(EditField::Comment) => "editing_comment",
        }
    }
}
