// SPDX-FileCopyrightText: 2026 Tablebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end dialogue scenarios over the mock gateway.

use chrono::TimeDelta;

use tablebook_core::types::NO_COMMENT;
use tablebook_core::{
    Clock, InboundEvent, Markup, OwnerId, Reservation, ReservationId, ReservationRepository,
};
use tablebook_dialogue::prompts::labels;
use tablebook_dialogue::{ConversationState, EditStep, sweep};
use tablebook_test_utils::{TestHarness, default_now};

const GUEST: OwnerId = OwnerId(100);
const STRANGER: OwnerId = OwnerId(200);
const ADMIN: OwnerId = OwnerId(900);

fn stored(id: &str, owner: OwnerId, date: &str, time: &str, guests: u32) -> Reservation {
    Reservation {
        id: ReservationId::from(id),
        owner,
        name: "Ivan".into(),
        phone: "79112223344".into(),
        guests,
        date: date.into(),
        time: time.into(),
        comment: NO_COMMENT.into(),
        confirmed: true,
        created_at: default_now() - TimeDelta::days(1),
    }
}

fn reply_labels(markup: &Markup) -> Vec<String> {
    match markup {
        Markup::Reply(rows) => rows.concat(),
        _ => Vec::new(),
    }
}

fn inline_payloads(markup: &Markup) -> Vec<String> {
    match markup {
        Markup::Inline(rows) => rows.iter().flatten().map(|b| b.payload.clone()).collect(),
        _ => Vec::new(),
    }
}

/// Walks `owner` through a complete booking for 19.10.2026 20:30.
async fn book(harness: &TestHarness, owner: OwnerId, guests: &str) {
    harness.text(owner, labels::BOOK_TABLE).await.unwrap();
    harness.text(owner, "Ivan").await.unwrap();
    harness.press(owner, "phone_manual").await.unwrap();
    harness.text(owner, "+7 (911) 222-33-44").await.unwrap();
    harness.text(owner, guests).await.unwrap();
    harness.text(owner, labels::SKIP).await.unwrap();
    harness.press(owner, "date_19.10.2026").await.unwrap();
    harness.press(owner, "time_20:30").await.unwrap();
}

#[tokio::test]
async fn full_booking_happy_path() {
    let harness = TestHarness::builder().with_admin(ADMIN).build().unwrap();

    harness.text(GUEST, labels::BOOK_TABLE).await.unwrap();
    assert_eq!(harness.state(GUEST), ConversationState::WaitingForName);
    assert!(harness.last_text(GUEST).await.contains("enter your name"));

    harness.text(GUEST, "Ivan").await.unwrap();
    let phone_choice = harness.gateway.last_sent_to(GUEST).await.unwrap();
    assert_eq!(
        inline_payloads(&phone_choice.markup),
        vec!["phone_contact", "phone_manual", "cancel"]
    );

    harness.press(GUEST, "phone_contact").await.unwrap();
    let request = harness.gateway.last_sent_to(GUEST).await.unwrap();
    assert!(matches!(request.markup, Markup::RequestContact { .. }));

    harness.share_contact(GUEST, "+7 911 222-33-44").await.unwrap();
    harness.text(GUEST, "2").await.unwrap();
    harness.text(GUEST, labels::SKIP).await.unwrap();

    let dates = harness.gateway.last_sent_to(GUEST).await.unwrap();
    let date_payloads = inline_payloads(&dates.markup);
    assert_eq!(date_payloads.first().map(String::as_str), Some("date_18.10.2026"));
    assert_eq!(date_payloads.len(), 11, "ten dates and a cancel button");

    harness.press(GUEST, "date_19.10.2026").await.unwrap();
    harness.press(GUEST, "time_20:30").await.unwrap();

    assert_eq!(harness.state(GUEST), ConversationState::MainMenu);
    let active = harness.store.active_for_owner(GUEST).await;
    assert_eq!(active.len(), 1);
    let booked = &active[0];
    assert_eq!(booked.phone, "79112223344");
    assert_eq!(booked.guests, 2);
    assert_eq!(booked.comment, NO_COMMENT);
    assert_eq!((booked.date.as_str(), booked.time.as_str()), ("19.10.2026", "20:30"));
    assert_eq!(booked.created_at, default_now());

    assert_eq!(harness.log.rows(), active);

    let confirmation = harness.gateway.last_sent_to(GUEST).await.unwrap();
    assert!(confirmation.text.contains("is confirmed"));
    assert!(!confirmation.text.contains("Comment"));
    assert!(reply_labels(&confirmation.markup).contains(&labels::MY_RESERVATION.to_string()));

    let notice = harness.gateway.last_sent_to(ADMIN).await.unwrap();
    assert!(notice.text.starts_with(&format!("New reservation #{}", booked.id)));
}

#[tokio::test]
async fn two_character_name_is_accepted_and_one_is_not() {
    let harness = TestHarness::builder().build().unwrap();
    harness.text(GUEST, labels::BOOK_TABLE).await.unwrap();

    harness.text(GUEST, "A").await.unwrap();
    assert_eq!(harness.state(GUEST), ConversationState::WaitingForName);
    assert!(harness.last_text(GUEST).await.contains("at least 2 characters"));

    harness.text(GUEST, "Al").await.unwrap();
    assert_eq!(
        harness.state(GUEST),
        ConversationState::WaitingForPhone { name: "Al".into() }
    );
}

#[tokio::test]
async fn invalid_inputs_reprompt_without_limit() {
    let harness = TestHarness::builder().build().unwrap();
    harness.text(GUEST, labels::BOOK_TABLE).await.unwrap();
    harness.text(GUEST, "Ivan").await.unwrap();
    harness.press(GUEST, "phone_manual").await.unwrap();

    for _ in 0..3 {
        harness.text(GUEST, "12345").await.unwrap();
        assert!(harness.last_text(GUEST).await.contains("11 digits"));
    }
    harness.text(GUEST, "89112223344").await.unwrap();

    harness.text(GUEST, "zero").await.unwrap();
    harness.text(GUEST, "0").await.unwrap();
    assert!(matches!(
        harness.state(GUEST),
        ConversationState::WaitingForGuests { .. }
    ));
    harness.text(GUEST, "3").await.unwrap();
    assert!(matches!(
        harness.state(GUEST),
        ConversationState::WaitingForComment { guests: 3, .. }
    ));
}

#[tokio::test]
async fn main_menu_offers_my_reservation_only_with_active_booking() {
    let harness = TestHarness::builder().build().unwrap();

    harness.text(GUEST, labels::START).await.unwrap();
    let menu = harness.gateway.last_sent_to(GUEST).await.unwrap();
    assert!(!reply_labels(&menu.markup).contains(&labels::MY_RESERVATION.to_string()));

    book(&harness, GUEST, "2").await;
    harness.text(GUEST, labels::BACK).await.unwrap();
    let menu = harness.gateway.last_sent_to(GUEST).await.unwrap();
    assert!(reply_labels(&menu.markup).contains(&labels::MY_RESERVATION.to_string()));
}

#[tokio::test]
async fn edit_guests_from_two_to_five() {
    let harness = TestHarness::builder().with_admin(ADMIN).build().unwrap();
    book(&harness, GUEST, "2").await;
    let id = harness.store.active_for_owner(GUEST).await[0].id.clone();

    harness.text(GUEST, labels::MY_RESERVATION).await.unwrap();
    let sent = harness.sent_to(GUEST).await;
    let card = &sent[sent.len() - 2];
    assert_eq!(
        inline_payloads(&card.markup),
        vec![format!("edit_select_{id}"), format!("edit_delete_{id}")]
    );

    harness.press(GUEST, &format!("edit_select_{id}")).await.unwrap();
    assert!(matches!(
        harness.state(GUEST),
        ConversationState::Editing {
            step: EditStep::Options,
            ..
        }
    ));

    harness.press(GUEST, "edit_change_guests").await.unwrap();
    assert!(harness.last_text(GUEST).await.contains("Current number of guests: 2"));
    harness.text(GUEST, "5").await.unwrap();
    assert!(harness.last_text(GUEST).await.contains("Guests: 5"));

    // Nothing is stored before confirmation.
    assert_eq!(harness.store.get(&id).await.unwrap().guests, 2);

    harness.press(GUEST, "edit_confirm").await.unwrap();
    assert_eq!(harness.state(GUEST), ConversationState::MainMenu);
    assert_eq!(harness.store.get(&id).await.unwrap().guests, 5);
    assert_eq!(harness.log.rows()[0].guests, 5);
    assert!(
        harness
            .sent_to(GUEST)
            .await
            .iter()
            .any(|m| m.text.contains("Changes saved"))
    );
    assert!(harness.last_text(ADMIN).await.contains("edited"));
}

#[tokio::test]
async fn editing_date_moves_on_to_time() {
    let harness = TestHarness::builder().build().unwrap();
    book(&harness, GUEST, "2").await;
    let id = harness.store.active_for_owner(GUEST).await[0].id.clone();

    harness.press(GUEST, &format!("edit_select_{id}")).await.unwrap();
    harness.press(GUEST, "edit_change_date").await.unwrap();
    harness.press(GUEST, "date_22.10.2026").await.unwrap();
    assert!(harness.last_text(GUEST).await.contains("Choose a time on 22.10.2026"));

    harness.press(GUEST, "time_17:00").await.unwrap();
    harness.press(GUEST, "edit_confirm").await.unwrap();

    let edited = harness.store.get(&id).await.unwrap();
    assert_eq!((edited.date.as_str(), edited.time.as_str()), ("22.10.2026", "17:00"));
}

#[tokio::test]
async fn cancel_during_edit_keeps_original() {
    let harness = TestHarness::builder().build().unwrap();
    book(&harness, GUEST, "2").await;
    let id = harness.store.active_for_owner(GUEST).await[0].id.clone();

    harness.press(GUEST, &format!("edit_select_{id}")).await.unwrap();
    harness.press(GUEST, "edit_change_name").await.unwrap();
    harness.text(GUEST, "Pyotr").await.unwrap();
    harness.press(GUEST, "cancel").await.unwrap();

    assert_eq!(harness.state(GUEST), ConversationState::MainMenu);
    assert_eq!(harness.store.get(&id).await.unwrap().name, "Ivan");
}

#[tokio::test]
async fn edit_confirm_after_expiry_reports_unavailable() {
    let harness = TestHarness::builder().build().unwrap();
    book(&harness, GUEST, "2").await;
    let id = harness.store.active_for_owner(GUEST).await[0].id.clone();

    harness.press(GUEST, &format!("edit_select_{id}")).await.unwrap();
    harness.store.delete(&id).await;
    harness.press(GUEST, "edit_confirm").await.unwrap();

    assert!(
        harness
            .sent_to(GUEST)
            .await
            .iter()
            .any(|m| m.text.contains("no longer exists"))
    );
    assert_eq!(harness.state(GUEST), ConversationState::MainMenu);
    assert!(harness.store.get(&id).await.is_none());
}

#[tokio::test]
async fn edit_button_without_edit_state_starts_over() {
    let harness = TestHarness::builder().build().unwrap();
    harness.text(GUEST, labels::BOOK_TABLE).await.unwrap();
    harness.press(GUEST, "edit_change_phone").await.unwrap();

    assert_eq!(harness.state(GUEST), ConversationState::MainMenu);
    assert!(
        harness
            .sent_to(GUEST)
            .await
            .iter()
            .any(|m| m.text.contains("Please start again"))
    );
}

#[tokio::test]
async fn only_the_owner_can_edit_or_delete() {
    let harness = TestHarness::builder()
        .with_reservations(vec![stored("100-1", GUEST, "19.10.2026", "20:30", 2)])
        .build()
        .unwrap();
    let id = ReservationId::from("100-1");

    harness.press(STRANGER, "edit_select_100-1").await.unwrap();
    assert_eq!(harness.state(STRANGER), ConversationState::MainMenu);
    harness.press(STRANGER, "edit_delete_100-1").await.unwrap();
    assert!(harness.store.get(&id).await.is_some());
    assert!(
        harness
            .sent_to(STRANGER)
            .await
            .iter()
            .any(|m| m.text.contains("no longer exists"))
    );

    harness.press(GUEST, "edit_delete_100-1").await.unwrap();
    assert!(harness.store.get(&id).await.is_none());
    assert!(harness.log.rows().is_empty());
}

#[tokio::test]
async fn admin_may_delete_any_reservation() {
    let harness = TestHarness::builder()
        .with_admin(ADMIN)
        .with_reservations(vec![stored("100-1", GUEST, "19.10.2026", "20:30", 2)])
        .build()
        .unwrap();

    harness.press(ADMIN, "edit_delete_100-1").await.unwrap();
    assert!(harness.store.get(&ReservationId::from("100-1")).await.is_none());
    assert!(
        harness
            .sent_to(ADMIN)
            .await
            .iter()
            .any(|m| m.text.contains("Reservation #100-1 deleted"))
    );
}

#[tokio::test]
async fn deleting_twice_is_harmless() {
    let harness = TestHarness::builder()
        .with_reservations(vec![stored("100-1", GUEST, "19.10.2026", "20:30", 2)])
        .build()
        .unwrap();

    harness.press(GUEST, "edit_delete_100-1").await.unwrap();
    harness.press(GUEST, "edit_delete_100-1").await.unwrap();
    assert!(harness.store.is_empty().await);
    assert!(harness.last_text(GUEST).await.contains("Choose an action"));
}

#[tokio::test]
async fn expired_reservation_is_swept_and_no_longer_listed() {
    let harness = TestHarness::builder()
        .with_reservations(vec![stored("100-1", GUEST, "18.10.2026", "12:30", 2)])
        .build()
        .unwrap();
    assert!(harness.store.has_active_for_owner(GUEST).await);

    harness.clock.advance(TimeDelta::minutes(44));
    assert!(sweep(harness.store.as_ref(), &harness.calendar, harness.clock.now())
        .await
        .is_empty());

    harness.clock.advance(TimeDelta::minutes(1));
    let evicted = sweep(harness.store.as_ref(), &harness.calendar, harness.clock.now()).await;
    assert_eq!(evicted, vec![ReservationId::from("100-1")]);
    assert!(harness.log.rows().is_empty());

    harness.text(GUEST, labels::MY_RESERVATION).await.unwrap();
    assert!(
        harness
            .sent_to(GUEST)
            .await
            .iter()
            .any(|m| m.text.contains("no active reservations"))
    );
}

#[tokio::test]
async fn back_and_cancel_discard_the_draft() {
    let harness = TestHarness::builder().build().unwrap();
    harness.text(GUEST, labels::BOOK_TABLE).await.unwrap();
    harness.text(GUEST, "Ivan").await.unwrap();
    harness.text(GUEST, labels::BACK).await.unwrap();
    assert_eq!(harness.state(GUEST), ConversationState::MainMenu);
    assert!(harness.last_text(GUEST).await.contains("Choose an action"));

    harness.text(GUEST, labels::BOOK_TABLE).await.unwrap();
    harness.text(GUEST, "Ivan").await.unwrap();
    harness.press(GUEST, "cancel").await.unwrap();
    assert_eq!(harness.state(GUEST), ConversationState::MainMenu);
    assert!(harness.store.is_empty().await);
}

#[tokio::test]
async fn contact_us_and_stray_contact() {
    let harness = TestHarness::builder()
        .with_contact_phone("+7 495 123-45-67")
        .build()
        .unwrap();

    harness.text(GUEST, labels::CONTACT_US).await.unwrap();
    assert!(harness.last_text(GUEST).await.contains("+7 495 123-45-67"));

    harness.share_contact(GUEST, "79112223344").await.unwrap();
    assert!(harness.last_text(GUEST).await.contains("Choose an action"));
}

#[tokio::test]
async fn skip_outside_comment_step_is_plain_text() {
    let harness = TestHarness::builder().build().unwrap();
    harness.text(GUEST, labels::BOOK_TABLE).await.unwrap();
    harness.text(GUEST, labels::SKIP).await.unwrap();
    assert_eq!(
        harness.state(GUEST),
        ConversationState::WaitingForPhone {
            name: labels::SKIP.into()
        }
    );
}

#[tokio::test]
async fn storage_failure_does_not_reach_the_user() {
    let harness = TestHarness::builder().build().unwrap();
    harness.log.set_failing(true);

    book(&harness, GUEST, "4").await;

    assert!(harness.last_text(GUEST).await.contains("is confirmed"));
    assert_eq!(harness.store.active_for_owner(GUEST).await.len(), 1);
    assert!(harness.log.rows().is_empty());
}

#[tokio::test]
async fn unreachable_admin_does_not_block_booking() {
    let harness = TestHarness::builder().with_admin(ADMIN).build().unwrap();
    harness.gateway.make_unreachable(ADMIN);

    book(&harness, GUEST, "2").await;
    assert!(harness.last_text(GUEST).await.contains("is confirmed"));
}

#[tokio::test]
async fn admin_hears_of_booking_when_guest_is_unreachable() {
    let harness = TestHarness::builder().with_admin(ADMIN).build().unwrap();
    harness.text(GUEST, labels::BOOK_TABLE).await.unwrap();
    harness.text(GUEST, "Ivan").await.unwrap();
    harness.press(GUEST, "phone_manual").await.unwrap();
    harness.text(GUEST, "89112223344").await.unwrap();
    harness.text(GUEST, "2").await.unwrap();
    harness.text(GUEST, labels::SKIP).await.unwrap();
    harness.press(GUEST, "date_19.10.2026").await.unwrap();

    harness.gateway.make_unreachable(GUEST);
    assert!(harness.press(GUEST, "time_20:30").await.is_err());

    let booked = harness.store.active_for_owner(GUEST).await;
    assert_eq!(booked.len(), 1);
    let notices = harness.sent_to(ADMIN).await;
    assert_eq!(notices.len(), 1);
    assert!(notices[0].text.starts_with(&format!("New reservation #{}", booked[0].id)));
}

#[tokio::test]
async fn admin_hears_of_edit_when_guest_is_unreachable() {
    let harness = TestHarness::builder()
        .with_admin(ADMIN)
        .with_reservations(vec![stored("100-1", GUEST, "19.10.2026", "20:30", 2)])
        .build()
        .unwrap();
    harness.press(GUEST, "edit_select_100-1").await.unwrap();
    harness.press(GUEST, "edit_change_guests").await.unwrap();
    harness.text(GUEST, "5").await.unwrap();

    harness.gateway.make_unreachable(GUEST);
    assert!(harness.press(GUEST, "edit_confirm").await.is_err());

    let id = ReservationId::from("100-1");
    assert_eq!(harness.store.get(&id).await.unwrap().guests, 5);
    assert!(harness.last_text(ADMIN).await.contains("Reservation #100-1 edited"));
}

#[tokio::test]
async fn admin_hears_of_delete_when_guest_is_unreachable() {
    let harness = TestHarness::builder()
        .with_admin(ADMIN)
        .with_reservations(vec![stored("100-1", GUEST, "19.10.2026", "20:30", 2)])
        .build()
        .unwrap();

    harness.gateway.make_unreachable(GUEST);
    assert!(harness.press(GUEST, "edit_delete_100-1").await.is_err());

    assert!(harness.store.is_empty().await);
    assert!(harness.last_text(ADMIN).await.contains("Reservation #100-1 deleted"));
}

#[tokio::test]
async fn global_labels_end_a_half_finished_booking() {
    let harness = TestHarness::builder().build().unwrap();

    for label in [labels::MY_RESERVATION, labels::START, labels::BACK] {
        harness.text(GUEST, labels::BOOK_TABLE).await.unwrap();
        harness.text(GUEST, "Ivan").await.unwrap();
        harness.press(GUEST, "phone_manual").await.unwrap();
        harness.text(GUEST, "89112223344").await.unwrap();
        assert!(matches!(
            harness.state(GUEST),
            ConversationState::WaitingForGuests { .. }
        ));

        harness.text(GUEST, label).await.unwrap();
        assert_eq!(harness.state(GUEST), ConversationState::MainMenu, "{label}");

        // A number typed afterwards is no longer a guest count.
        harness.text(GUEST, "3").await.unwrap();
        assert_eq!(harness.state(GUEST), ConversationState::MainMenu, "{label}");
        assert!(harness.last_text(GUEST).await.contains("Choose an action"));
    }
    assert!(harness.store.is_empty().await);
}

#[tokio::test]
async fn run_processes_queue_until_gateway_closes() {
    let harness = TestHarness::builder().build().unwrap();
    harness
        .gateway
        .inject(InboundEvent::text(GUEST, labels::BOOK_TABLE))
        .await;
    harness.gateway.inject(InboundEvent::text(GUEST, "Ivan")).await;
    harness.gateway.close();

    harness
        .dialogue
        .run(tokio_util::sync::CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        harness.state(GUEST),
        ConversationState::WaitingForPhone {
            name: "Ivan".into()
        }
    );
}

#[tokio::test]
async fn run_stops_on_cancel() {
    let harness = TestHarness::builder().build().unwrap();
    let cancel = tokio_util::sync::CancellationToken::new();
    cancel.cancel();
    harness.dialogue.run(cancel).await.unwrap();
    assert!(harness.gateway.sent().await.is_empty());
}
