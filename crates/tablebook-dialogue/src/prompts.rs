// SPDX-FileCopyrightText: 2026 Tablebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing texts and keyboards.
//!
//! Everything the bot says is built here, so the state machine and the
//! orchestrator only deal with [`Prompt`] values.

use tablebook_core::{InlineButton, Markup, Reservation};

use crate::callback::{Callback, EditField};
use crate::validation::InputError;

/// Reply-keyboard labels. Matched against inbound text exactly.
pub mod labels {
    pub const START: &str = "/start";
    pub const BOOK_TABLE: &str = "Book a table";
    pub const CONTACT_US: &str = "Contact us";
    pub const MY_RESERVATION: &str = "My reservation";
    pub const BACK: &str = "Back";
    pub const SKIP: &str = "Skip";
    pub const SEND_CONTACT: &str = "Send my contact";
}

/// Buttons per row in date and time pickers.
const PICKER_COLUMNS: usize = 4;

/// A question the dialogue asks next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    Name,
    PhoneChoice,
    ContactRequest,
    ManualPhone,
    Guests,
    Comment,
    Date { dates: Vec<String> },
    Time { date: String, slots: Vec<String> },
    EditOptions(Reservation),
    EditName { current: String },
    EditPhone { current: String },
    EditGuests { current: u32 },
    EditComment { current: String },
}

impl Prompt {
    pub fn render(&self) -> (String, Markup) {
        match self {
            Self::Name => ("Please enter your name:".into(), Markup::RemoveKeyboard),
            Self::PhoneChoice => (
                "How would you like to provide your phone number?".into(),
                Markup::Inline(vec![
                    vec![button("📲 Share contact", Callback::PhoneContact)],
                    vec![button("⌨ Type it manually", Callback::PhoneManual)],
                    vec![cancel_button()],
                ]),
            ),
            Self::ContactRequest => (
                "Tap the button below to share your contact:".into(),
                Markup::RequestContact {
                    label: labels::SEND_CONTACT.into(),
                },
            ),
            Self::ManualPhone => (
                "Please enter your phone number (11 digits):".into(),
                Markup::RemoveKeyboard,
            ),
            Self::Guests => (
                "Thank you! Now enter the number of guests:".into(),
                Markup::RemoveKeyboard,
            ),
            Self::Comment => (
                "Add any wishes or a comment for your reservation:".into(),
                Markup::Reply(vec![vec![labels::SKIP.into()]]),
            ),
            Self::Date { dates } => (
                "Choose a date:".into(),
                picker(dates.iter().map(|d| button(d, Callback::Date(d.clone())))),
            ),
            Self::Time { date, slots } => (
                format!("Choose a time on {date}:"),
                picker(slots.iter().map(|t| button(t, Callback::Time(t.clone())))),
            ),
            Self::EditOptions(working) => (
                format!(
                    "Editing reservation #{}:\n\n{}\nComment: {}\n\nWhat would you like to change?",
                    working.id,
                    details(working),
                    working.comment
                ),
                edit_options_keyboard(),
            ),
            Self::EditName { current } => (
                format!("Current name: {current}. Enter a new name:"),
                Markup::RemoveKeyboard,
            ),
            Self::EditPhone { current } => (
                format!("Current phone: {current}. Enter a new phone number (11 digits):"),
                Markup::RemoveKeyboard,
            ),
            Self::EditGuests { current } => (
                format!("Current number of guests: {current}. Enter a new number:"),
                Markup::RemoveKeyboard,
            ),
            Self::EditComment { current } => (
                format!("Current comment: {current}. Enter a new comment:"),
                Markup::RemoveKeyboard,
            ),
        }
    }

    /// The corrective message for `error` followed by this prompt.
    pub fn render_after(&self, error: &InputError) -> (String, Markup) {
        let (text, markup) = self.render();
        (format!("{error}\n\n{text}"), markup)
    }
}

fn button(label: &str, callback: Callback) -> InlineButton {
    InlineButton::new(label, callback.to_string())
}

fn cancel_button() -> InlineButton {
    button("❌ Cancel", Callback::Cancel)
}

/// Rows of [`PICKER_COLUMNS`] buttons followed by a cancel row.
fn picker(buttons: impl Iterator<Item = InlineButton>) -> Markup {
    let buttons = buttons.collect::<Vec<_>>();
    let mut rows = buttons
        .chunks(PICKER_COLUMNS)
        .map(<[InlineButton]>::to_vec)
        .collect::<Vec<_>>();
    rows.push(vec![cancel_button()]);
    Markup::Inline(rows)
}

fn edit_options_keyboard() -> Markup {
    let mut rows = EditField::ALL
        .into_iter()
        .map(|field| {
            let label = match field {
                EditField::Name => "Change name",
                EditField::Phone => "Change phone",
                EditField::Guests => "Change number of guests",
                EditField::Date => "Change date",
                EditField::Time => "Change time",
                EditField::Comment => "Change comment",
            };
            vec![button(label, Callback::EditChange(field))]
        })
        .collect::<Vec<_>>();
    rows.push(vec![button("✅ Confirm changes", Callback::EditConfirm)]);
    rows.push(vec![cancel_button()]);
    Markup::Inline(rows)
}

/// The field lines shared by every reservation summary.
fn details(r: &Reservation) -> String {
    format!(
        "Name: {}\nPhone: {}\nGuests: {}\nDate: {}\nTime: {}",
        r.name, r.phone, r.guests, r.date, r.time
    )
}

/// Details plus the comment line, only when a comment was left.
fn details_with_comment(r: &Reservation) -> String {
    if r.has_comment() {
        format!("{}\nComment: {}", details(r), r.comment)
    } else {
        details(r)
    }
}

/// The main menu. "My reservation" appears only for owners with an active
/// reservation.
pub fn main_menu(has_active: bool) -> (String, Markup) {
    let mut rows = vec![vec![
        labels::BOOK_TABLE.to_string(),
        labels::CONTACT_US.to_string(),
    ]];
    if has_active {
        rows.push(vec![labels::MY_RESERVATION.to_string()]);
    }
    ("Choose an action:".into(), Markup::Reply(rows))
}

pub fn welcome() -> String {
    "Welcome! I can book a table for you.".into()
}

pub fn contact(phone: &str) -> String {
    if phone.trim().is_empty() {
        "Please contact the restaurant directly.".into()
    } else {
        format!("Our phone number: {phone}")
    }
}

pub fn cancelled() -> String {
    "Cancelled.".into()
}

pub fn no_active_reservations() -> String {
    "You have no active reservations.".into()
}

/// One listed reservation with its edit and delete buttons.
pub fn reservation_card(r: &Reservation) -> (String, Markup) {
    (
        format!("Reservation #{}\n\n{}", r.id, details_with_comment(r)),
        Markup::Inline(vec![vec![
            button("Edit", Callback::EditSelect(r.id.clone())),
            button("Delete", Callback::EditDelete(r.id.clone())),
        ]]),
    )
}

/// Sent after the reservation cards.
pub fn reservation_list_footer() -> (String, Markup) {
    (
        "Use the buttons above to edit or delete a reservation.".into(),
        Markup::Reply(vec![
            vec![labels::BACK.into(), labels::BOOK_TABLE.into()],
            vec![labels::CONTACT_US.into()],
        ]),
    )
}

/// Confirmation after a successful booking.
pub fn booking_confirmed(r: &Reservation) -> (String, Markup) {
    (
        format!(
            "✅ Reservation #{} is confirmed!\n\nDetails:\n{}",
            r.id,
            details_with_comment(r)
        ),
        Markup::Reply(vec![
            vec![labels::MY_RESERVATION.into(), labels::BOOK_TABLE.into()],
            vec![labels::CONTACT_US.into()],
        ]),
    )
}

pub fn changes_saved() -> String {
    "✅ Changes saved!".into()
}

pub fn deleted(r: &Reservation) -> String {
    format!("Reservation #{} has been deleted.", r.id)
}

pub fn reservation_unavailable() -> String {
    "This reservation no longer exists. It may have expired.".into()
}

pub fn edit_state_lost() -> String {
    "Editing failed. Please start again.".into()
}

/// What happened to a reservation, for the admin chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminEvent {
    Created,
    Edited,
    Deleted,
}

pub fn admin_notice(event: AdminEvent, r: &Reservation) -> String {
    let headline = match event {
        AdminEvent::Created => format!("New reservation #{}!", r.id),
        AdminEvent::Edited => format!("✏️ Reservation #{} edited!", r.id),
        AdminEvent::Deleted => format!("❌ Reservation #{} deleted!", r.id),
    };
    format!("{headline}\n{}\nComment: {}", details(r), r.comment)
}
