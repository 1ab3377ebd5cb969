// SPDX-FileCopyrightText: 2026 Tablebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The dialogue orchestrator.
//!
//! [`Dialogue`] pulls events from the gateway one at a time, resolves global
//! commands itself, feeds everything else to the state machine, and carries
//! out the resulting replies against the reservation store and the gateway.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use tablebook_core::{
    BookingCalendar, Clock, EventKind, InboundEvent, Markup, MessageGateway, OwnerId,
    Reservation, ReservationId, ReservationRepository, TablebookError,
};

use crate::callback::Callback;
use crate::conversations::ConversationStateRepository;
use crate::machine::{Context, Input, Reply, Transition, transition};
use crate::prompts::{self, AdminEvent, Prompt, labels};
use crate::state::{ConversationState, EditStep};

/// Deployment facts the dialogue needs besides its collaborators.
#[derive(Debug, Clone, Default)]
pub struct DialogueSettings {
    /// Phone number given out by "Contact us".
    pub contact_phone: String,
    /// Chat that receives a copy of every booking change.
    pub admin: Option<OwnerId>,
}

/// Coordinates one gateway with the reservation store and the conversation
/// states.
pub struct Dialogue {
    gateway: Box<dyn MessageGateway>,
    reservations: Arc<dyn ReservationRepository>,
    conversations: Arc<dyn ConversationStateRepository>,
    calendar: BookingCalendar,
    clock: Arc<dyn Clock>,
    settings: DialogueSettings,
}

impl Dialogue {
    pub fn new(
        gateway: Box<dyn MessageGateway>,
        reservations: Arc<dyn ReservationRepository>,
        conversations: Arc<dyn ConversationStateRepository>,
        calendar: BookingCalendar,
        clock: Arc<dyn Clock>,
        settings: DialogueSettings,
    ) -> Self {
        info!(
            gateway = gateway.name(),
            admin = settings.admin.is_some(),
            "dialogue initialized"
        );
        Self {
            gateway,
            reservations,
            conversations,
            calendar,
            clock,
            settings,
        }
    }

    /// Processes events in arrival order until `cancel` fires or the gateway
    /// closes.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), TablebookError> {
        info!("dialogue running");

        loop {
            tokio::select! {
                event = self.gateway.receive() => {
                    match event {
                        Ok(event) => {
                            let owner = event.owner;
                            if let Err(e) = self.handle(event).await {
                                error!(owner = %owner, error = %e, "failed to handle event");
                            }
                        }
                        Err(e) if e.is_closed() => {
                            info!("gateway closed, stopping dialogue");
                            break;
                        }
                        Err(e) => {
                            error!(error = %e, "gateway receive error");
                        }
                    }
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping dialogue");
                    break;
                }
            }
        }

        self.gateway.shutdown().await?;
        info!("dialogue stopped");
        Ok(())
    }

    /// Handles a single inbound event.
    pub async fn handle(&self, event: InboundEvent) -> Result<(), TablebookError> {
        let owner = event.owner;
        match event.kind {
            EventKind::Text(text) => self.handle_text(owner, text).await,
            EventKind::Contact { phone } => self.advance(owner, Input::Contact(phone)).await,
            EventKind::Button { payload } => {
                debug!(owner = %owner, payload = payload.as_str(), "button pressed");
                self.handle_button(owner, Callback::parse(&payload)).await
            }
        }
    }

    async fn handle_text(&self, owner: OwnerId, text: String) -> Result<(), TablebookError> {
        match text.trim() {
            labels::START => {
                self.conversations.reset(owner);
                self.say(owner, &prompts::welcome(), Markup::None).await?;
                self.send_main_menu(owner).await
            }
            labels::BOOK_TABLE => {
                self.conversations.set(owner, ConversationState::WaitingForName);
                self.ask(owner, &Prompt::Name).await
            }
            labels::CONTACT_US => {
                self.say(owner, &prompts::contact(&self.settings.contact_phone), Markup::None)
                    .await
            }
            labels::MY_RESERVATION => {
                self.conversations.reset(owner);
                self.list_reservations(owner).await
            }
            labels::BACK => {
                self.conversations.reset(owner);
                self.send_main_menu(owner).await
            }
            _ => self.advance(owner, Input::Text(text)).await,
        }
    }

    async fn handle_button(&self, owner: OwnerId, callback: Callback) -> Result<(), TablebookError> {
        match callback {
            Callback::Cancel => {
                self.conversations.reset(owner);
                self.say(owner, &prompts::cancelled(), Markup::None).await?;
                self.send_main_menu(owner).await
            }
            Callback::EditSelect(id) => self.begin_edit(owner, &id).await,
            Callback::EditDelete(id) => self.delete(owner, &id).await,
            Callback::Unknown(payload) => {
                warn!(owner = %owner, payload = payload.as_str(), "unknown button payload");
                self.advance(owner, Input::Button(Callback::Unknown(payload))).await
            }
            other => self.advance(owner, Input::Button(other)).await,
        }
    }

    /// Runs one state machine step and executes its reply.
    async fn advance(&self, owner: OwnerId, input: Input) -> Result<(), TablebookError> {
        let state = self.conversations.get(owner);
        let from = state.label();
        let ctx = Context {
            owner,
            now: self.clock.now(),
            calendar: &self.calendar,
        };
        let Transition { next, reply } = transition(state, input, &ctx);
        debug!(owner = %owner, from, to = next.label(), "conversation step");
        self.conversations.set(owner, next);

        match reply {
            Reply::Prompt(prompt) => self.ask(owner, &prompt).await,
            Reply::Invalid(reason, prompt) => {
                debug!(owner = %owner, reason = %reason, "input rejected");
                let (text, markup) = prompt.render_after(&reason);
                self.say(owner, &text, markup).await
            }
            Reply::Create(reservation) => self.create(reservation).await,
            Reply::ConfirmEdit(working) => self.confirm_edit(owner, working).await,
            Reply::MainMenu => self.send_main_menu(owner).await,
            Reply::EditStateLost => {
                warn!(owner = %owner, "edit button without an edit in progress");
                self.say(owner, &prompts::edit_state_lost(), Markup::None).await?;
                self.send_main_menu(owner).await
            }
        }
    }

    async fn create(&self, reservation: Reservation) -> Result<(), TablebookError> {
        self.reservations.create(reservation.clone()).await;
        info!(
            owner = %reservation.owner,
            reservation_id = %reservation.id,
            date = reservation.date.as_str(),
            time = reservation.time.as_str(),
            guests = reservation.guests,
            "reservation booked"
        );
        self.notify_admin(AdminEvent::Created, &reservation).await;
        let (text, markup) = prompts::booking_confirmed(&reservation);
        self.say(reservation.owner, &text, markup).await
    }

    async fn confirm_edit(&self, owner: OwnerId, working: Reservation) -> Result<(), TablebookError> {
        if !self.reservations.update(working.clone()).await {
            info!(owner = %owner, reservation_id = %working.id, "edited reservation no longer exists");
            self.say(owner, &prompts::reservation_unavailable(), Markup::None)
                .await?;
            return self.send_main_menu(owner).await;
        }
        info!(owner = %owner, reservation_id = %working.id, "reservation edited");
        self.notify_admin(AdminEvent::Edited, &working).await;
        self.say(owner, &prompts::changes_saved(), Markup::None).await?;
        self.send_main_menu(owner).await
    }

    /// Looks up a reservation `owner` may act on.
    async fn owned(&self, owner: OwnerId, id: &ReservationId) -> Option<Reservation> {
        self.reservations
            .get(id)
            .await
            .filter(|r| r.owner == owner)
    }

    async fn begin_edit(&self, owner: OwnerId, id: &ReservationId) -> Result<(), TablebookError> {
        let Some(reservation) = self.owned(owner, id).await else {
            return self.unavailable(owner, id).await;
        };
        debug!(owner = %owner, reservation_id = %id, "edit started");
        let prompt = Prompt::EditOptions(reservation.clone());
        self.conversations.set(
            owner,
            ConversationState::Editing {
                step: EditStep::Options,
                working: reservation,
            },
        );
        self.ask(owner, &prompt).await
    }

    async fn delete(&self, owner: OwnerId, id: &ReservationId) -> Result<(), TablebookError> {
        let permitted = match self.reservations.get(id).await {
            Some(r) => r.owner == owner || self.settings.admin == Some(owner),
            None => false,
        };
        if !permitted {
            return self.unavailable(owner, id).await;
        }
        let Some(removed) = self.reservations.delete(id).await else {
            return self.unavailable(owner, id).await;
        };
        info!(owner = %owner, reservation_id = %id, "reservation deleted");
        self.conversations.reset(owner);
        self.notify_admin(AdminEvent::Deleted, &removed).await;
        self.say(owner, &prompts::deleted(&removed), Markup::None).await?;
        self.send_main_menu(owner).await
    }

    async fn unavailable(&self, owner: OwnerId, id: &ReservationId) -> Result<(), TablebookError> {
        debug!(owner = %owner, reservation_id = %id, "reservation unavailable");
        self.conversations.reset(owner);
        self.say(owner, &prompts::reservation_unavailable(), Markup::None)
            .await?;
        self.send_main_menu(owner).await
    }

    async fn list_reservations(&self, owner: OwnerId) -> Result<(), TablebookError> {
        let active = self.reservations.active_for_owner(owner).await;
        if active.is_empty() {
            self.say(owner, &prompts::no_active_reservations(), Markup::None)
                .await?;
            return self.send_main_menu(owner).await;
        }
        for reservation in &active {
            let (text, markup) = prompts::reservation_card(reservation);
            self.say(owner, &text, markup).await?;
        }
        let (text, markup) = prompts::reservation_list_footer();
        self.say(owner, &text, markup).await
    }

    async fn send_main_menu(&self, owner: OwnerId) -> Result<(), TablebookError> {
        let has_active = self.reservations.has_active_for_owner(owner).await;
        let (text, markup) = prompts::main_menu(has_active);
        self.say(owner, &text, markup).await
    }

    async fn ask(&self, owner: OwnerId, prompt: &Prompt) -> Result<(), TablebookError> {
        let (text, markup) = prompt.render();
        self.say(owner, &text, markup).await
    }

    async fn say(
        &self,
        owner: OwnerId,
        text: &str,
        markup: Markup,
    ) -> Result<(), TablebookError> {
        match markup {
            Markup::Inline(buttons) => {
                self.gateway.send_choice_prompt(owner, text, buttons).await?
            }
            Markup::RequestContact { label } => {
                self.gateway.request_contact(owner, text, &label).await?
            }
            markup => self.gateway.send_text(owner, text, markup).await?,
        };
        Ok(())
    }

    /// Copies a booking change to the admin chat. Failures are logged only.
    async fn notify_admin(&self, event: AdminEvent, reservation: &Reservation) {
        let Some(admin) = self.settings.admin else {
            return;
        };
        let notice = prompts::admin_notice(event, reservation);
        if let Err(e) = self.gateway.send_text(admin, &notice, Markup::None).await {
            warn!(admin = %admin, reservation_id = %reservation.id, error = %e, "admin notification failed");
        }
    }
}
