// SPDX-FileCopyrightText: 2026 Tablebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The conversation state machine.
//!
//! [`transition`] is a pure function of the current state, one input, and the
//! current instant. It never touches the store or the gateway; terminal steps
//! come back as [`Reply::Create`] / [`Reply::ConfirmEdit`] for the
//! orchestrator to execute.

use chrono::{DateTime, Utc};

use tablebook_core::types::NO_COMMENT;
use tablebook_core::{BookingCalendar, OwnerId, Reservation, ReservationId};

use crate::callback::{Callback, EditField};
use crate::prompts::{Prompt, labels};
use crate::state::{ConversationState, Draft, EditStep};
use crate::validation::{
    InputError, normalize_comment, parse_guests, parse_name, parse_phone,
};

/// What the state machine sees of an inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Text(String),
    Contact(String),
    Button(Callback),
}

/// Facts a transition may depend on besides the state.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub owner: OwnerId,
    pub now: DateTime<Utc>,
    pub calendar: &'a BookingCalendar,
}

impl Context<'_> {
    fn dates(&self) -> Vec<String> {
        self.calendar.offered_dates(self.now)
    }

    fn slots(&self, date: &str) -> Vec<String> {
        self.calendar.offered_times(self.now, date)
    }
}

/// What the orchestrator should do after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Prompt(Prompt),
    /// Input rejected; explain and ask again.
    Invalid(InputError, Prompt),
    /// Booking finished; store it.
    Create(Reservation),
    /// Edit finished; write the working copy back.
    ConfirmEdit(Reservation),
    MainMenu,
    /// An edit button arrived with no edit in progress.
    EditStateLost,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: ConversationState,
    pub reply: Reply,
}

fn to(next: ConversationState, reply: Reply) -> Transition {
    Transition { next, reply }
}

fn ask(next: ConversationState, prompt: Prompt) -> Transition {
    to(next, Reply::Prompt(prompt))
}

fn reject(next: ConversationState, error: InputError, prompt: Prompt) -> Transition {
    to(next, Reply::Invalid(error, prompt))
}

/// Advances one conversation by one input.
pub fn transition(state: ConversationState, input: Input, ctx: &Context<'_>) -> Transition {
    use ConversationState as S;

    match (state, input) {
        (S::WaitingForPhone { name }, Input::Contact(raw)) => match parse_phone(&raw) {
            Ok(phone) => ask(S::WaitingForGuests { name, phone }, Prompt::Guests),
            Err(e) => reject(S::WaitingForPhone { name }, e, Prompt::PhoneChoice),
        },
        // A contact card means nothing anywhere else.
        (_, Input::Contact(_)) => to(S::MainMenu, Reply::MainMenu),

        (_, Input::Button(Callback::Cancel)) => to(S::MainMenu, Reply::MainMenu),

        (S::WaitingForName, Input::Text(text)) => match parse_name(&text) {
            Ok(name) => ask(S::WaitingForPhone { name }, Prompt::PhoneChoice),
            Err(e) => reject(S::WaitingForName, e, Prompt::Name),
        },

        (S::WaitingForPhone { name }, Input::Button(Callback::PhoneContact)) => {
            ask(S::WaitingForPhone { name }, Prompt::ContactRequest)
        }
        (S::WaitingForPhone { name }, Input::Button(Callback::PhoneManual)) => {
            ask(S::WaitingForManualPhone { name }, Prompt::ManualPhone)
        }

        (S::WaitingForManualPhone { name }, Input::Text(text)) => match parse_phone(&text) {
            Ok(phone) => ask(S::WaitingForGuests { name, phone }, Prompt::Guests),
            Err(e) => reject(S::WaitingForManualPhone { name }, e, Prompt::ManualPhone),
        },

        (S::WaitingForGuests { name, phone }, Input::Text(text)) => match parse_guests(&text) {
            Ok(guests) => ask(S::WaitingForComment { name, phone, guests }, Prompt::Comment),
            Err(e) => reject(S::WaitingForGuests { name, phone }, e, Prompt::Guests),
        },

        (S::WaitingForComment { name, phone, guests }, Input::Text(text)) => {
            let comment = if text.trim() == labels::SKIP {
                NO_COMMENT.to_string()
            } else {
                normalize_comment(&text)
            };
            let draft = Draft {
                name,
                phone,
                guests,
                comment,
            };
            ask(S::WaitingForDate { draft }, Prompt::Date { dates: ctx.dates() })
        }

        (
            S::WaitingForDate { draft } | S::WaitingForTime { draft, .. },
            Input::Button(Callback::Date(date)),
        )
        | (S::WaitingForDate { draft }, Input::Text(date)) => choose_date(draft, &date, ctx),

        (S::WaitingForTime { draft, date }, Input::Button(Callback::Time(time)) | Input::Text(time)) => {
            choose_time(draft, date, &time, ctx)
        }

        (S::Editing { working, .. }, Input::Button(Callback::EditChange(field))) => {
            begin_edit(field, working, ctx)
        }
        (S::Editing { working, .. }, Input::Button(Callback::EditConfirm)) => {
            to(S::MainMenu, Reply::ConfirmEdit(working))
        }
        (S::Editing { step: EditStep::Field(field), working }, input) => {
            edit_field(field, working, input, ctx)
        }

        (_, Input::Button(Callback::EditChange(_) | Callback::EditConfirm)) => {
            to(S::MainMenu, Reply::EditStateLost)
        }

        (S::MainMenu, _) => to(S::MainMenu, Reply::MainMenu),

        // Stray input for the current step: ask the same question again.
        (state, _) => repeat(state, ctx),
    }
}

fn choose_date(draft: Draft, date: &str, ctx: &Context<'_>) -> Transition {
    let date = date.trim();
    let dates = ctx.dates();
    if !dates.iter().any(|d| d == date) {
        return reject(
            ConversationState::WaitingForDate { draft },
            InputError::DateNotOffered,
            Prompt::Date { dates },
        );
    }
    let slots = ctx.slots(date);
    if slots.is_empty() {
        return reject(
            ConversationState::WaitingForDate { draft },
            InputError::NoSlotsLeft(date.to_string()),
            Prompt::Date { dates },
        );
    }
    ask(
        ConversationState::WaitingForTime {
            draft,
            date: date.to_string(),
        },
        Prompt::Time {
            date: date.to_string(),
            slots,
        },
    )
}

fn choose_time(draft: Draft, date: String, time: &str, ctx: &Context<'_>) -> Transition {
    let time = time.trim();
    let slots = ctx.slots(&date);
    if slots.is_empty() {
        return reject(
            ConversationState::WaitingForDate { draft },
            InputError::NoSlotsLeft(date),
            Prompt::Date { dates: ctx.dates() },
        );
    }
    if !slots.iter().any(|s| s == time) {
        return reject(
            ConversationState::WaitingForTime {
                draft,
                date: date.clone(),
            },
            InputError::TimeNotOffered,
            Prompt::Time { date, slots },
        );
    }

    let reservation = Reservation {
        id: ReservationId::generate(ctx.owner, ctx.now),
        owner: ctx.owner,
        name: draft.name,
        phone: draft.phone,
        guests: draft.guests,
        date,
        time: time.to_string(),
        comment: draft.comment,
        confirmed: true,
        created_at: ctx.now,
    };
    to(ConversationState::MainMenu, Reply::Create(reservation))
}

fn editing(step: EditStep, working: Reservation) -> ConversationState {
    ConversationState::Editing { step, working }
}

fn edit_prompt(field: EditField, working: &Reservation, ctx: &Context<'_>) -> Prompt {
    match field {
        EditField::Name => Prompt::EditName {
            current: working.name.clone(),
        },
        EditField::Phone => Prompt::EditPhone {
            current: working.phone.clone(),
        },
        EditField::Guests => Prompt::EditGuests {
            current: working.guests,
        },
        EditField::Comment => Prompt::EditComment {
            current: working.comment.clone(),
        },
        EditField::Date => Prompt::Date { dates: ctx.dates() },
        EditField::Time => Prompt::Time {
            date: working.date.clone(),
            slots: ctx.slots(&working.date),
        },
    }
}

fn begin_edit(field: EditField, working: Reservation, ctx: &Context<'_>) -> Transition {
    if field == EditField::Time && ctx.slots(&working.date).is_empty() {
        let date = working.date.clone();
        return reject(
            editing(EditStep::Field(EditField::Date), working),
            InputError::NoSlotsLeft(date),
            Prompt::Date { dates: ctx.dates() },
        );
    }
    let prompt = edit_prompt(field, &working, ctx);
    ask(editing(EditStep::Field(field), working), prompt)
}

fn back_to_options(working: Reservation) -> Transition {
    let prompt = Prompt::EditOptions(working.clone());
    ask(editing(EditStep::Options, working), prompt)
}

fn edit_field(
    field: EditField,
    mut working: Reservation,
    input: Input,
    ctx: &Context<'_>,
) -> Transition {
    let text = match (field, input) {
        (EditField::Date, Input::Button(Callback::Date(value)))
        | (EditField::Time, Input::Button(Callback::Time(value)))
        | (_, Input::Text(value)) => value,
        (field, _) => {
            let prompt = edit_prompt(field, &working, ctx);
            return ask(editing(EditStep::Field(field), working), prompt);
        }
    };

    let step = EditStep::Field(field);
    match field {
        EditField::Name => match parse_name(&text) {
            Ok(name) => {
                working.name = name;
                back_to_options(working)
            }
            Err(e) => {
                let prompt = edit_prompt(field, &working, ctx);
                reject(editing(step, working), e, prompt)
            }
        },
        EditField::Phone => match parse_phone(&text) {
            Ok(phone) => {
                working.phone = phone;
                back_to_options(working)
            }
            Err(e) => {
                let prompt = edit_prompt(field, &working, ctx);
                reject(editing(step, working), e, prompt)
            }
        },
        EditField::Guests => match parse_guests(&text) {
            Ok(guests) => {
                working.guests = guests;
                back_to_options(working)
            }
            Err(e) => {
                let prompt = edit_prompt(field, &working, ctx);
                reject(editing(step, working), e, prompt)
            }
        },
        EditField::Comment => {
            working.comment = normalize_comment(&text);
            back_to_options(working)
        }
        EditField::Date => {
            let date = text.trim();
            let dates = ctx.dates();
            if !dates.iter().any(|d| d == date) {
                return reject(
                    editing(step, working),
                    InputError::DateNotOffered,
                    Prompt::Date { dates },
                );
            }
            let slots = ctx.slots(date);
            if slots.is_empty() {
                return reject(
                    editing(step, working),
                    InputError::NoSlotsLeft(date.to_string()),
                    Prompt::Date { dates },
                );
            }
            // A new date always needs a new time.
            working.date = date.to_string();
            let prompt = Prompt::Time {
                date: working.date.clone(),
                slots,
            };
            ask(editing(EditStep::Field(EditField::Time), working), prompt)
        }
        EditField::Time => {
            let time = text.trim();
            let slots = ctx.slots(&working.date);
            if slots.is_empty() {
                let date = working.date.clone();
                return reject(
                    editing(EditStep::Field(EditField::Date), working),
                    InputError::NoSlotsLeft(date),
                    Prompt::Date { dates: ctx.dates() },
                );
            }
            if !slots.iter().any(|s| s == time) {
                let date = working.date.clone();
                return reject(
                    editing(step, working),
                    InputError::TimeNotOffered,
                    Prompt::Time { date, slots },
                );
            }
            working.time = time.to_string();
            back_to_options(working)
        }
    }
}

/// Re-asks whatever `state` is waiting for.
fn repeat(state: ConversationState, ctx: &Context<'_>) -> Transition {
    use ConversationState as S;

    let prompt = match &state {
        S::MainMenu => return to(S::MainMenu, Reply::MainMenu),
        S::WaitingForName => Prompt::Name,
        S::WaitingForPhone { .. } => Prompt::PhoneChoice,
        S::WaitingForManualPhone { .. } => Prompt::ManualPhone,
        S::WaitingForGuests { .. } => Prompt::Guests,
        S::WaitingForComment { .. } => Prompt::Comment,
        S::WaitingForDate { .. } => Prompt::Date { dates: ctx.dates() },
        S::WaitingForTime { draft, date } => {
            let slots = ctx.slots(date);
            if slots.is_empty() {
                return reject(
                    S::WaitingForDate {
                        draft: draft.clone(),
                    },
                    InputError::NoSlotsLeft(date.clone()),
                    Prompt::Date { dates: ctx.dates() },
                );
            }
            Prompt::Time {
                date: date.clone(),
                slots,
            }
        }
        S::Editing {
            step: EditStep::Options,
            working,
        } => Prompt::EditOptions(working.clone()),
        S::Editing {
            step: EditStep::Field(field),
            working,
        } => edit_prompt(*field, working, ctx),
    };
    ask(state, prompt)
}
