use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recurring weekly interval during which a professional accepts bookings.
///
/// `day_of_week` counts from Sunday (0) to Saturday (6). Blocks of the same
/// professional and day never overlap; the schedule editor enforces that on
/// write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkScheduleBlock {
    pub id: Uuid,
    pub professional_id: Uuid,
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl WorkScheduleBlock {
    pub fn applies_to(&self, date: NaiveDate) -> bool {
        u32::try_from(self.day_of_week).is_ok_and(|day| day == weekday_index(date))
    }
}

/// A date on which the professional takes no bookings at all.
///
/// `start_time` and `end_time` are carried for rows written by older
/// clients. They are not interpreted: any override blocks the whole day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleOverride {
    pub id: Uuid,
    pub professional_id: Uuid,
    pub override_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

/// Sunday-based weekday index used by `WorkScheduleBlock::day_of_week`.
pub fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}
