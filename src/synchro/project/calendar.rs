//! Working-time calendars.

use chrono::{Datelike, Duration as ChronoDuration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use uuid::Uuid;

use crate::synchro::types::models::Duration;

/// How far ahead the finish-date search looks for working time before giving up.
const MAX_SEARCH_DAYS: i64 = 366 * 20;

const MINUTES_PER_DAY: u32 = 1440;

/// A working period within one day.
///
/// An end of midnight denotes the end of the day, so `00:00-00:00` is a full day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeRange {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    fn start_minutes(&self) -> u32 {
        minutes_of(self.start)
    }

    fn end_minutes(&self) -> u32 {
        match minutes_of(self.end) {
            0 => MINUTES_PER_DAY,
            minutes => minutes,
        }
    }

    /// Length of the range in minutes.
    pub fn minutes(&self) -> u32 {
        self.end_minutes().saturating_sub(self.start_minutes())
    }
}

/// Working hours that replace the weekday pattern on one date.
/// No ranges means the date is a holiday.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarException {
    pub date: NaiveDate,
    pub ranges: Vec<TimeRange>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectCalendar {
    pub name: Option<String>,
    pub guid: Option<Uuid>,
    /// Working hours for each weekday, Sunday first.
    hours: [Vec<TimeRange>; 7],
    working: [bool; 7],
    exceptions: Vec<CalendarException>,
}

impl ProjectCalendar {
    pub fn new(name: Option<String>, guid: Option<Uuid>) -> Self {
        Self {
            name,
            guid,
            ..Self::default()
        }
    }

    /// The conventional Monday to Friday, 08:00-12:00 and 13:00-17:00 calendar.
    pub fn standard() -> Self {
        let mut calendar = Self::new(Some("Standard".to_string()), None);
        let ranges = vec![
            TimeRange::new(hm(8, 0), hm(12, 0)),
            TimeRange::new(hm(13, 0), hm(17, 0)),
        ];
        for day in [Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri] {
            calendar.set_hours(day, ranges.clone());
        }
        calendar
    }

    pub fn hours(&self, day: Weekday) -> &[TimeRange] {
        &self.hours[day.num_days_from_sunday() as usize]
    }

    /// Replaces a weekday's hours. The day becomes working iff `ranges` is non-empty.
    pub fn set_hours(&mut self, day: Weekday, ranges: Vec<TimeRange>) {
        let index = day.num_days_from_sunday() as usize;
        self.working[index] = !ranges.is_empty();
        self.hours[index] = ranges;
    }

    pub fn is_working_day(&self, day: Weekday) -> bool {
        self.working[day.num_days_from_sunday() as usize]
    }

    pub fn add_exception(&mut self, date: NaiveDate, ranges: Vec<TimeRange>) {
        self.exceptions.push(CalendarException { date, ranges });
    }

    pub fn exceptions(&self) -> &[CalendarException] {
        &self.exceptions
    }

    /// Working ranges in force on `date`: an exception if one exists, otherwise
    /// the weekday pattern.
    pub fn ranges_for(&self, date: NaiveDate) -> &[TimeRange] {
        self.exceptions
            .iter()
            .rev()
            .find(|exception| exception.date == date)
            .map(|exception| exception.ranges.as_slice())
            .unwrap_or_else(|| self.hours(date.weekday()))
    }

    /// The date reached after working for `duration` from `start`.
    ///
    /// Returns `start` for a zero or negative duration, and `None` if the
    /// calendar has no working time within the search horizon.
    pub fn finish_date(&self, start: NaiveDateTime, duration: Duration) -> Option<NaiveDateTime> {
        let mut remaining = duration.minutes();
        if remaining <= 0 {
            return Some(start);
        }

        let first_day = start.date();
        let start_minutes = minutes_of(start.time());
        for offset in 0..MAX_SEARCH_DAYS {
            let day = first_day + ChronoDuration::days(offset);
            let mut ranges: Vec<&TimeRange> = self.ranges_for(day).iter().collect();
            ranges.sort_by_key(|range| range.start_minutes());

            for range in ranges {
                let from = if offset == 0 {
                    range.start_minutes().max(start_minutes)
                } else {
                    range.start_minutes()
                };
                let to = range.end_minutes();
                if from >= to {
                    continue;
                }

                let available = i64::from(to - from);
                if remaining <= available {
                    let minute = i64::from(from) + remaining;
                    return Some(day.and_time(NaiveTime::MIN) + ChronoDuration::minutes(minute));
                }
                remaining -= available;
            }
        }
        None
    }
}

fn minutes_of(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}
