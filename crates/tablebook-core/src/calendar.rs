// SPDX-FileCopyrightText: 2026 Tablebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Booking calendar: time zone resolution, reservation activity, and the
//! date and time choices offered to guests.
//!
//! All wall-clock reasoning happens in the configured zone; instants handed in
//! and out are UTC.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::error::TablebookError;
use crate::types::Reservation;

/// Display and storage format of reservation dates.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Display and storage format of reservation times.
pub const TIME_FORMAT: &str = "%H:%M";

/// Number of consecutive days offered, starting today.
pub const OFFERED_DAYS: u64 = 10;

/// First bookable slot hour (inclusive).
pub const FIRST_SLOT_HOUR: u32 = 16;

/// Last bookable slot hour (inclusive, its half-hour slot is offered too).
pub const LAST_SLOT_HOUR: u32 = 23;

/// Spacing between slots in minutes.
pub const SLOT_STEP_MINUTES: u32 = 30;

/// Resolves reservation dates and times in one fixed time zone.
#[derive(Debug, Clone)]
pub struct BookingCalendar {
    tz: Tz,
    ttl: TimeDelta,
    min_lead: TimeDelta,
}

impl BookingCalendar {
    pub fn new(tz: Tz, ttl: TimeDelta, min_lead: TimeDelta) -> Self {
        Self { tz, ttl, min_lead }
    }

    /// Builds a calendar from an IANA zone name such as `Europe/Moscow`.
    pub fn from_zone_name(
        zone: &str,
        ttl: TimeDelta,
        min_lead: TimeDelta,
    ) -> Result<Self, TablebookError> {
        let tz = zone
            .parse::<Tz>()
            .map_err(|e| TablebookError::Config(format!("unknown time zone `{zone}`: {e}")))?;
        Ok(Self::new(tz, ttl, min_lead))
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// How long a reservation stays active past its start.
    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Minimum lead time for same-day bookings.
    pub fn min_lead(&self) -> TimeDelta {
        self.min_lead
    }

    /// Today's date in the configured zone.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.tz).date_naive()
    }

    /// Resolves a `DD.MM.YYYY` / `HH:MM` pair to an instant.
    ///
    /// Returns `None` when either part is malformed or the local time does
    /// not exist in the zone.
    pub fn instant_of(&self, date: &str, time: &str) -> Option<DateTime<Utc>> {
        let naive = NaiveDateTime::parse_from_str(
            &format!("{} {}", date.trim(), time.trim()),
            &format!("{DATE_FORMAT} {TIME_FORMAT}"),
        )
        .ok()?;
        self.tz
            .from_local_datetime(&naive)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
    }

    /// Instant after which the reservation is expired.
    pub fn expires_at(&self, reservation: &Reservation) -> Option<DateTime<Utc>> {
        self.instant_of(&reservation.date, &reservation.time)
            .map(|start| start + self.ttl)
    }

    /// Confirmed and not yet past `start + TTL`.
    pub fn is_active(&self, reservation: &Reservation, now: DateTime<Utc>) -> bool {
        reservation.confirmed
            && self
                .expires_at(reservation)
                .is_some_and(|expiry| now < expiry)
    }

    /// Past `start + TTL`. Unparsable reservations are never expired.
    pub fn is_expired(&self, reservation: &Reservation, now: DateTime<Utc>) -> bool {
        self.expires_at(reservation)
            .is_some_and(|expiry| now >= expiry)
    }

    /// The next [`OFFERED_DAYS`] calendar days starting today.
    pub fn offered_dates(&self, now: DateTime<Utc>) -> Vec<String> {
        let today = self.today(now);
        (0..OFFERED_DAYS)
            .filter_map(|offset| today.checked_add_days(Days::new(offset)))
            .map(|day| day.format(DATE_FORMAT).to_string())
            .collect()
    }

    /// Half-hour slots for `date`.
    ///
    /// When `date` is today, slots earlier than `now + min_lead` (to the
    /// minute) are dropped. A lead time that crosses midnight leaves no slot
    /// for today.
    pub fn offered_times(&self, now: DateTime<Utc>, date: &str) -> Vec<String> {
        let today = self.today(now);
        let is_today = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
            .is_ok_and(|selected| selected == today);

        let earliest = if is_today {
            let min = (now + self.min_lead).with_timezone(&self.tz).naive_local();
            min.date().and_hms_opt(min.hour(), min.minute(), 0)
        } else {
            None
        };

        let mut slots = Vec::new();
        for hour in FIRST_SLOT_HOUR..=LAST_SLOT_HOUR {
            for minute in (0..60).step_by(SLOT_STEP_MINUTES as usize) {
                if let Some(earliest) = earliest {
                    let slot = today.and_hms_opt(hour, minute, 0);
                    if slot.is_none_or(|slot| slot < earliest) {
                        continue;
                    }
                }
                slots.push(format!("{hour:02}:{minute:02}"));
            }
        }
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NO_COMMENT, OwnerId, ReservationId};

    fn calendar() -> BookingCalendar {
        BookingCalendar::from_zone_name(
            "Europe/Moscow",
            TimeDelta::minutes(15),
            TimeDelta::hours(2),
        )
        .unwrap()
    }

    /// Moscow is UTC+3 all year.
    fn moscow(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap() - TimeDelta::hours(3)
    }

    fn reservation(date: &str, time: &str) -> Reservation {
        Reservation {
            id: ReservationId::from("1-1"),
            owner: OwnerId(1),
            name: "Al".into(),
            phone: "79112223344".into(),
            guests: 2,
            date: date.into(),
            time: time.into(),
            comment: NO_COMMENT.into(),
            confirmed: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn unknown_zone_is_a_config_error() {
        let err = BookingCalendar::from_zone_name(
            "Mars/Olympus",
            TimeDelta::minutes(15),
            TimeDelta::hours(2),
        )
        .unwrap_err();
        assert!(matches!(err, TablebookError::Config(_)));
    }

    #[test]
    fn instant_is_resolved_in_configured_zone() {
        let cal = calendar();
        let instant = cal.instant_of("19.10.2026", "20:30").unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2026, 10, 19, 17, 30, 0).unwrap());
    }

    #[test]
    fn malformed_date_or_time_has_no_instant() {
        let cal = calendar();
        assert!(cal.instant_of("2026-10-19", "20:30").is_none());
        assert!(cal.instant_of("19.10.2026", "25:00").is_none());
        assert!(cal.instant_of("", "").is_none());
    }

    #[test]
    fn ten_dates_offered_starting_today() {
        let cal = calendar();
        // 23:30 UTC on the 18th is already the 19th in Moscow.
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 23, 30, 0).unwrap();
        let dates = cal.offered_dates(now);
        assert_eq!(dates.len(), 10);
        assert_eq!(dates[0], "19.10.2026");
        assert_eq!(dates[9], "28.10.2026");
    }

    #[test]
    fn dates_cross_month_boundary() {
        let cal = calendar();
        let dates = cal.offered_dates(moscow(2026, 10, 28, 12, 0));
        assert_eq!(dates[3], "31.10.2026");
        assert_eq!(dates[4], "01.11.2026");
    }

    #[test]
    fn future_date_offers_every_slot() {
        let cal = calendar();
        let slots = cal.offered_times(moscow(2026, 10, 18, 18, 10), "19.10.2026");
        assert_eq!(slots.len(), 16);
        assert_eq!(slots.first().map(String::as_str), Some("16:00"));
        assert_eq!(slots.last().map(String::as_str), Some("23:30"));
    }

    #[test]
    fn same_day_slots_respect_lead_time() {
        let cal = calendar();
        let slots = cal.offered_times(moscow(2026, 10, 18, 18, 10), "18.10.2026");
        // Earliest bookable time is 20:10, so 20:00 is gone and 20:30 is first.
        assert_eq!(slots.first().map(String::as_str), Some("20:30"));
        assert!(!slots.contains(&"20:00".to_string()));
        assert!(!slots.contains(&"19:30".to_string()));
        assert!(!slots.contains(&"16:00".to_string()));
        assert_eq!(slots.len(), 7);
    }

    #[test]
    fn slot_on_exact_lead_boundary_is_offered() {
        let cal = calendar();
        let slots = cal.offered_times(moscow(2026, 10, 18, 18, 30), "18.10.2026");
        assert_eq!(slots.first().map(String::as_str), Some("20:30"));
    }

    #[test]
    fn lead_past_midnight_leaves_no_slots_today() {
        let cal = calendar();
        let slots = cal.offered_times(moscow(2026, 10, 18, 22, 30), "18.10.2026");
        assert!(slots.is_empty());
    }

    #[test]
    fn active_until_ttl_elapses() {
        let cal = calendar();
        let r = reservation("19.10.2026", "20:30");
        let start = cal.instant_of(&r.date, &r.time).unwrap();
        let ttl = TimeDelta::minutes(15);

        assert!(cal.is_active(&r, start + ttl - TimeDelta::seconds(1)));
        assert!(!cal.is_expired(&r, start + ttl - TimeDelta::seconds(1)));
        assert!(!cal.is_active(&r, start + ttl));
        assert!(cal.is_expired(&r, start + ttl));
    }

    #[test]
    fn unconfirmed_is_never_active() {
        let cal = calendar();
        let mut r = reservation("19.10.2026", "20:30");
        r.confirmed = false;
        assert!(!cal.is_active(&r, moscow(2026, 10, 18, 12, 0)));
    }

    #[test]
    fn unparsable_reservation_is_neither_active_nor_expired() {
        let cal = calendar();
        let r = reservation("someday", "soon");
        let now = moscow(2030, 1, 1, 0, 0);
        assert!(!cal.is_active(&r, now));
        assert!(!cal.is_expired(&r, now));
    }
}
