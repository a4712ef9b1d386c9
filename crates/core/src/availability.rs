//! # Availability Calculator
//!
//! Computes the bookable start times of one professional on one date.
//!
//! Work blocks are wall-clock intervals in the platform timezone. Candidate
//! starts are generated every [`SLOT_STEP_MINUTES`] from each block start; a
//! candidate `[s, s + duration)` is kept when it
//!
//! 1. ends no later than its block,
//! 2. exists in the platform timezone and starts strictly after `now`,
//! 3. overlaps no busy interval `[start, start + own duration)` of a
//!    non-cancelled appointment (closed-open: touching is allowed).
//!
//! An override on the date blocks the whole day. The step is fixed and does
//! not follow the service duration or the end of other bookings.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::{TimeError, TimeResult};
use crate::models::{
    appointment::ScheduledAppointment,
    schedule::{ScheduleOverride, WorkScheduleBlock},
};

/// Granularity of candidate slot starts.
pub const SLOT_STEP_MINUTES: i64 = 30;

/// Availability of a professional on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "slots", rename_all = "snake_case")]
pub enum DayAvailability {
    /// An override marks the date as unavailable.
    DayOff,
    /// No work block falls on this weekday.
    NoWorkingHours,
    /// Work blocks exist; the list may still be empty when nothing fits.
    Open(Vec<NaiveTime>),
}

impl DayAvailability {
    pub fn slots(&self) -> &[NaiveTime] {
        match self {
            DayAvailability::Open(slots) => slots,
            DayAvailability::DayOff | DayAvailability::NoWorkingHours => &[],
        }
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        self.slots().contains(&time)
    }
}

/// Inputs of a single availability computation.
#[derive(Debug, Clone)]
pub struct SlotQuery<'a> {
    pub professional_id: Uuid,
    pub service_duration_minutes: i32,
    pub target_date: NaiveDate,
    pub schedule_blocks: &'a [WorkScheduleBlock],
    pub overrides: &'a [ScheduleOverride],
    pub existing_appointments: &'a [ScheduledAppointment],
    pub now: DateTime<Utc>,
    pub timezone: Tz,
}

pub fn compute_available_slots(query: &SlotQuery<'_>) -> TimeResult<DayAvailability> {
    if query.service_duration_minutes <= 0 {
        return Err(TimeError::Validation(format!(
            "Service duration must be positive, got {} minutes",
            query.service_duration_minutes
        )));
    }

    let day_off = query.overrides.iter().any(|o| {
        o.professional_id == query.professional_id && o.override_date == query.target_date
    });
    if day_off {
        return Ok(DayAvailability::DayOff);
    }

    let mut blocks: Vec<&WorkScheduleBlock> = query
        .schedule_blocks
        .iter()
        .filter(|b| b.professional_id == query.professional_id && b.applies_to(query.target_date))
        .collect();
    if blocks.is_empty() {
        return Ok(DayAvailability::NoWorkingHours);
    }
    blocks.sort_by_key(|b| b.start_time);

    let busy = busy_intervals(query);
    let duration = Duration::minutes(i64::from(query.service_duration_minutes));
    let step = Duration::minutes(SLOT_STEP_MINUTES);

    let mut slots = Vec::new();
    for block in blocks {
        let block_end = query.target_date.and_time(block.end_time);
        let mut start = query.target_date.and_time(block.start_time);
        while start + duration <= block_end {
            let end = start + duration;
            let is_free = !busy.iter().any(|(b_start, b_end)| start < *b_end && end > *b_start);
            // Starts inside a spring-forward gap have no instant and cannot be booked.
            let is_future = to_instant(start, query.timezone).is_ok_and(|instant| instant > query.now);
            if is_future && is_free {
                slots.push(start.time());
            }
            start += step;
        }
    }
    slots.sort();
    slots.dedup();

    Ok(DayAvailability::Open(slots))
}

/// Wall-clock intervals of live appointments touching the target date.
fn busy_intervals(query: &SlotQuery<'_>) -> Vec<(NaiveDateTime, NaiveDateTime)> {
    let day_start = query.target_date.and_time(NaiveTime::MIN);
    let day_end = day_start + Duration::days(1);

    query
        .existing_appointments
        .iter()
        .filter(|a| {
            a.appointment.professional_id == query.professional_id
                && a.appointment.status.holds_slot()
        })
        .map(|a| {
            let start = a.start().with_timezone(&query.timezone).naive_local();
            let end = a.end().with_timezone(&query.timezone).naive_local();
            (start, end)
        })
        .filter(|(start, end)| *start < day_end && *end > day_start)
        .collect()
}

/// Converts a wall-clock date-time in `tz` to an instant. In the repeated
/// hour of a DST fall-back the earlier instant wins; times inside a
/// spring-forward gap do not exist and are rejected.
pub fn to_instant(local: NaiveDateTime, tz: Tz) -> TimeResult<DateTime<Utc>> {
    tz.from_local_datetime(&local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            TimeError::Validation(format!("{} does not exist in timezone {}", local, tz))
        })
}

/// Instant range to load appointments for `date`: from the start of the
/// previous day (bookings spilling past midnight) to the start of the next.
pub fn appointment_window(date: NaiveDate, tz: Tz) -> TimeResult<(DateTime<Utc>, DateTime<Utc>)> {
    let day_start = date.and_time(NaiveTime::MIN);
    let from = to_instant(day_start - Duration::days(1), tz)
        .or_else(|_| to_instant(day_start - Duration::days(1) + Duration::hours(1), tz))?;
    let to = to_instant(day_start + Duration::days(1), tz)
        .or_else(|_| to_instant(day_start + Duration::days(1) + Duration::hours(1), tz))?;
    Ok((from, to))
}
