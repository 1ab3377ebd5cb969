// SPDX-FileCopyrightText: 2026 Tablebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inline button payloads.
//!
//! Payloads are short prefixed strings so a button press carries everything
//! needed to route it without server-side lookup tables.

use std::fmt;

use tablebook_core::ReservationId;

pub const DATE_PREFIX: &str = "date_";
pub const TIME_PREFIX: &str = "time_";
pub const EDIT_SELECT_PREFIX: &str = "edit_select_";
pub const EDIT_DELETE_PREFIX: &str = "edit_delete_";
pub const EDIT_CHANGE_PREFIX: &str = "edit_change_";
pub const EDIT_CONFIRM: &str = "edit_confirm";
pub const PHONE_CONTACT: &str = "phone_contact";
pub const PHONE_MANUAL: &str = "phone_manual";
pub const CANCEL: &str = "cancel";

/// Field of a reservation the edit dialogue can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditField {
    Name,
    Phone,
    Guests,
    Date,
    Time,
    Comment,
}

impl EditField {
    pub const ALL: [EditField; 6] = [
        Self::Name,
        Self::Phone,
        Self::Guests,
        Self::Date,
        Self::Time,
        Self::Comment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Phone => "phone",
            Self::Guests => "guests",
            Self::Date => "date",
            Self::Time => "time",
            Self::Comment => "comment",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == s)
    }
}

/// A decoded button press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callback {
    Date(String),
    Time(String),
    EditSelect(ReservationId),
    EditDelete(ReservationId),
    EditChange(EditField),
    EditConfirm,
    PhoneContact,
    PhoneManual,
    Cancel,
    /// Anything this version does not recognize (stale buttons included).
    Unknown(String),
}

impl Callback {
    pub fn parse(payload: &str) -> Self {
        match payload {
            EDIT_CONFIRM => return Self::EditConfirm,
            PHONE_CONTACT => return Self::PhoneContact,
            PHONE_MANUAL => return Self::PhoneManual,
            CANCEL => return Self::Cancel,
            _ => {}
        }

        if let Some(date) = payload.strip_prefix(DATE_PREFIX) {
            Self::Date(date.to_string())
        } else if let Some(time) = payload.strip_prefix(TIME_PREFIX) {
            Self::Time(time.to_string())
        } else if let Some(id) = payload.strip_prefix(EDIT_SELECT_PREFIX) {
            Self::EditSelect(ReservationId::from(id))
        } else if let Some(id) = payload.strip_prefix(EDIT_DELETE_PREFIX) {
            Self::EditDelete(ReservationId::from(id))
        } else if let Some(field) = payload
            .strip_prefix(EDIT_CHANGE_PREFIX)
            .and_then(EditField::parse)
        {
            Self::EditChange(field)
        } else {
            Self::Unknown(payload.to_string())
        }
    }
}

impl fmt::Display for Callback {
    /// Formats the wire payload.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(date) => write!(f, "{DATE_PREFIX}{date}"),
            Self::Time(time) => write!(f, "{TIME_PREFIX}{time}"),
            Self::EditSelect(id) => write!(f, "{EDIT_SELECT_PREFIX}{id}"),
            Self::EditDelete(id) => write!(f, "{EDIT_DELETE_PREFIX}{id}"),
            Self::EditChange(field) => write!(f, "{EDIT_CHANGE_PREFIX}{}", field.as_str()),
            Self::EditConfirm => f.write_str(EDIT_CONFIRM),
            Self::PhoneContact => f.write_str(PHONE_CONTACT),
            Self::PhoneManual => f.write_str(PHONE_MANUAL),
            Self::Cancel => f.write_str(CANCEL),
            Self::Unknown(raw) => f.write_str(raw),
        }
    }
}
