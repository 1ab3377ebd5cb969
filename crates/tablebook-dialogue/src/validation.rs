// SPDX-FileCopyrightText: 2026 Tablebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-field input validation for the booking dialogue.

use thiserror::Error;

use tablebook_core::types::NO_COMMENT;

/// Digits a normalized phone number must have.
pub const PHONE_DIGITS: usize = 11;

/// Minimum visible characters of a trimmed name.
pub const MIN_NAME_CHARS: usize = 2;

/// Rejected user input. Always recoverable: the dialogue stays where it is
/// and asks again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("The name must contain at least 2 characters.")]
    NameTooShort,

    #[error("The phone number must contain 11 digits. Please check it and try again.")]
    InvalidPhone,

    #[error("Please enter a valid number of guests (a number greater than 0).")]
    InvalidGuests,

    #[error("Please choose one of the offered dates.")]
    DateNotOffered,

    #[error("That time is not available. Please choose one of the offered times.")]
    TimeNotOffered,

    #[error("There are no free times left on {0}. Please choose another date.")]
    NoSlotsLeft(String),
}

/// Strips every non-digit character.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Normalizes and accepts a phone with exactly [`PHONE_DIGITS`] digits.
pub fn parse_phone(raw: &str) -> Result<String, InputError> {
    let phone = normalize_phone(raw);
    if phone.len() == PHONE_DIGITS {
        Ok(phone)
    } else {
        Err(InputError::InvalidPhone)
    }
}

/// Trims and accepts a name of at least [`MIN_NAME_CHARS`] characters.
pub fn parse_name(raw: &str) -> Result<String, InputError> {
    let name = raw.trim();
    if name.chars().count() >= MIN_NAME_CHARS {
        Ok(name.to_string())
    } else {
        Err(InputError::NameTooShort)
    }
}

/// Accepts a positive integer guest count.
pub fn parse_guests(raw: &str) -> Result<u32, InputError> {
    match raw.trim().parse::<u32>() {
        Ok(guests) if guests > 0 => Ok(guests),
        _ => Err(InputError::InvalidGuests),
    }
}

/// Trimmed comment, or the `"-"` sentinel when nothing is left.
pub fn normalize_comment(raw: &str) -> String {
    let comment = raw.trim();
    if comment.is_empty() {
        NO_COMMENT.to_string()
    } else {
        comment.to_string()
    }
}
