// SPDX-FileCopyrightText: 2026 Tablebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Periodic eviction of reservations whose time has passed.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use tablebook_core::{BookingCalendar, Clock, ReservationId, ReservationRepository};

/// Deletes every reservation that is expired at `now`.
///
/// Reservations whose date or time cannot be resolved are left alone.
/// Returns the IDs that were evicted.
pub async fn sweep(
    store: &dyn ReservationRepository,
    calendar: &BookingCalendar,
    now: DateTime<Utc>,
) -> Vec<ReservationId> {
    let mut evicted = Vec::new();
    for reservation in store.all().await {
        if !calendar.is_expired(&reservation, now) {
            continue;
        }
        if store.delete(&reservation.id).await.is_some() {
            info!(
                reservation_id = %reservation.id,
                owner = %reservation.owner,
                date = reservation.date.as_str(),
                time = reservation.time.as_str(),
                "expired reservation evicted"
            );
            evicted.push(reservation.id);
        }
    }
    evicted
}

/// Runs [`sweep`] on a fixed interval until cancelled.
pub struct ExpirySweeper {
    store: Arc<dyn ReservationRepository>,
    calendar: BookingCalendar,
    clock: Arc<dyn Clock>,
    interval: Duration,
}

impl ExpirySweeper {
    pub fn new(
        store: Arc<dyn ReservationRepository>,
        calendar: BookingCalendar,
        clock: Arc<dyn Clock>,
        interval: Duration,
    ) -> Self {
        Self {
            store,
            calendar,
            clock,
            interval,
        }
    }

    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }

    /// The first tick fires immediately, so rows that expired while the bot
    /// was down are evicted at startup.
    pub async fn run(self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.interval);

        info!(interval_secs = self.interval.as_secs(), "expiry sweeper started");
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let evicted = sweep(self.store.as_ref(), &self.calendar, self.clock.now()).await;
                    debug!(evicted = evicted.len(), "sweep finished");
                }
                _ = cancel.cancelled() => {
                    info!("expiry sweeper shutting down");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};
    use tablebook_core::types::NO_COMMENT;
    use tablebook_core::{
        ManualClock, OwnerId, Reservation, ReservationLog, TablebookError,
    };
    use tablebook_storage::ReservationStore;
    use tracing_test::traced_test;

    struct NullLog;

    impl ReservationLog for NullLog {
        fn load(&self) -> Result<Vec<Reservation>, TablebookError> {
            Ok(Vec::new())
        }
        fn append(&self, _: &Reservation) -> Result<(), TablebookError> {
            Ok(())
        }
        fn replace(&self, _: &Reservation) -> Result<(), TablebookError> {
            Ok(())
        }
        fn remove(&self, _: &ReservationId) -> Result<(), TablebookError> {
            Ok(())
        }
    }

    fn calendar() -> BookingCalendar {
        BookingCalendar::from_zone_name("Europe/Moscow", TimeDelta::minutes(15), TimeDelta::hours(2))
            .unwrap()
    }

    /// 18.10.2026 20:00 in Moscow.
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 17, 0, 0).unwrap()
    }

    fn at(id: &str, start: DateTime<Utc>) -> Reservation {
        let local = start.with_timezone(&calendar().timezone());
        Reservation {
            id: ReservationId::from(id),
            owner: OwnerId(1),
            name: "Ivan".into(),
            phone: "79112223344".into(),
            guests: 2,
            date: local.format("%d.%m.%Y").to_string(),
            time: local.format("%H:%M").to_string(),
            comment: NO_COMMENT.into(),
            confirmed: true,
            created_at: start - TimeDelta::days(1),
        }
    }

    fn store(clock: Arc<ManualClock>) -> Arc<ReservationStore> {
        Arc::new(ReservationStore::new(Arc::new(NullLog), calendar(), clock))
    }

    #[tokio::test]
    async fn evicts_only_past_ttl() {
        let clock = Arc::new(ManualClock::new(now()));
        let store = store(clock.clone());
        let ttl = TimeDelta::minutes(15);
        // Slots are whole minutes, so step by a minute around the TTL edge.
        store.create(at("old", now() - ttl - TimeDelta::minutes(1))).await;
        store.create(at("edge", now() - ttl)).await;
        store.create(at("fresh", now() - ttl + TimeDelta::minutes(1))).await;
        store.create(at("future", now() + TimeDelta::hours(3))).await;

        let mut evicted = sweep(store.as_ref(), &calendar(), now()).await;
        evicted.sort();
        assert_eq!(evicted, vec![ReservationId::from("edge"), ReservationId::from("old")]);
        assert!(store.get(&ReservationId::from("fresh")).await.is_some());
        assert!(store.get(&ReservationId::from("future")).await.is_some());
    }

    #[tokio::test]
    #[traced_test]
    async fn one_second_either_side_of_expiry() {
        let clock = Arc::new(ManualClock::new(now()));
        let store = store(clock.clone());
        let r = at("1-1", now());
        let expiry = calendar().expires_at(&r).unwrap();
        store.create(r).await;

        let kept = sweep(store.as_ref(), &calendar(), expiry - TimeDelta::seconds(1)).await;
        assert!(kept.is_empty());
        let evicted = sweep(store.as_ref(), &calendar(), expiry + TimeDelta::seconds(1)).await;
        assert_eq!(evicted, vec![ReservationId::from("1-1")]);
        assert!(logs_contain("expired reservation evicted"));
    }

    #[tokio::test]
    async fn unparsable_reservation_is_skipped() {
        let clock = Arc::new(ManualClock::new(now()));
        let store = store(clock.clone());
        let mut r = at("bad", now() - TimeDelta::days(3));
        r.date = "someday".into();
        store.create(r).await;

        assert!(sweep(store.as_ref(), &calendar(), now()).await.is_empty());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn scheduler_sweeps_at_startup_then_on_interval() {
        let clock = Arc::new(ManualClock::new(now()));
        let store = store(clock.clone());
        store.create(at("1-1", now() - TimeDelta::hours(1))).await;
        store.create(at("1-2", now())).await;

        let cancel = CancellationToken::new();
        let handle = ExpirySweeper::new(
            store.clone(),
            calendar(),
            clock.clone(),
            Duration::from_secs(300),
        )
        .spawn(cancel.clone());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(store.get(&ReservationId::from("1-1")).await.is_none());
        assert_eq!(store.len().await, 1);

        clock.advance(TimeDelta::minutes(20));
        tokio::time::sleep(Duration::from_secs(300)).await;
        assert!(store.is_empty().await);

        cancel.cancel();
        handle.await.unwrap();
    }
}
