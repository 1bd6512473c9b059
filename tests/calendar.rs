mod common;

use chrono::{NaiveTime, Weekday};
use pretty_assertions::assert_eq;

use common::dt;
use synchro_reader::{Duration, ProjectCalendar, TimeRange};

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn hours(value: f64) -> Duration {
    Duration::from_hours(value)
}

#[test]
fn standard_calendar_hours() {
    let calendar = ProjectCalendar::standard();
    assert_eq!(calendar.name.as_deref(), Some("Standard"));
    assert_eq!(
        calendar.hours(Weekday::Wed),
        &[TimeRange::new(hm(8, 0), hm(12, 0)), TimeRange::new(hm(13, 0), hm(17, 0))]
    );
    assert!(calendar.is_working_day(Weekday::Fri));
    assert!(!calendar.is_working_day(Weekday::Sat));
    assert!(!calendar.is_working_day(Weekday::Sun));
}

#[test]
fn one_working_day() {
    let calendar = ProjectCalendar::standard();
    // 2024-03-04 is a Monday
    assert_eq!(
        calendar.finish_date(dt(2024, 3, 4, 8, 0), hours(8.0)),
        Some(dt(2024, 3, 4, 17, 0))
    );
}

#[test]
fn lunch_break_is_skipped() {
    let calendar = ProjectCalendar::standard();
    assert_eq!(
        calendar.finish_date(dt(2024, 3, 4, 10, 0), hours(4.0)),
        Some(dt(2024, 3, 4, 15, 0))
    );
}

#[test]
fn weekend_is_skipped() {
    let calendar = ProjectCalendar::standard();
    assert_eq!(
        calendar.finish_date(dt(2024, 3, 8, 8, 0), hours(16.0)),
        Some(dt(2024, 3, 11, 17, 0))
    );
    assert_eq!(
        calendar.finish_date(dt(2024, 3, 9, 9, 0), hours(1.0)),
        Some(dt(2024, 3, 11, 9, 0))
    );
}

#[test]
fn start_after_working_hours_moves_to_next_day() {
    let calendar = ProjectCalendar::standard();
    assert_eq!(
        calendar.finish_date(dt(2024, 3, 4, 18, 0), hours(2.0)),
        Some(dt(2024, 3, 5, 10, 0))
    );
}

#[test]
fn zero_duration_finishes_at_start() {
    let calendar = ProjectCalendar::standard();
    let start = dt(2024, 3, 9, 9, 0);
    assert_eq!(calendar.finish_date(start, Duration::ZERO), Some(start));
}

#[test]
fn holiday_exception() {
    let mut calendar = ProjectCalendar::standard();
    calendar.add_exception(dt(2024, 3, 5, 0, 0).date(), Vec::new());
    assert!(calendar.ranges_for(dt(2024, 3, 5, 0, 0).date()).is_empty());
    assert_eq!(
        calendar.finish_date(dt(2024, 3, 4, 8, 0), hours(16.0)),
        Some(dt(2024, 3, 6, 17, 0))
    );
}

#[test]
fn working_exception_on_weekend() {
    let mut calendar = ProjectCalendar::standard();
    calendar.add_exception(
        dt(2024, 3, 9, 0, 0).date(),
        vec![TimeRange::new(hm(9, 0), hm(11, 0))],
    );
    assert_eq!(
        calendar.finish_date(dt(2024, 3, 8, 16, 0), hours(3.0)),
        Some(dt(2024, 3, 9, 11, 0))
    );
}

#[test]
fn midnight_end_means_whole_day() {
    let mut calendar = ProjectCalendar::new(Some("24 Hours".to_string()), None);
    for day in [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ] {
        calendar.set_hours(day, vec![TimeRange::new(hm(0, 0), hm(0, 0))]);
    }
    assert_eq!(TimeRange::new(hm(0, 0), hm(0, 0)).minutes(), 1440);
    assert_eq!(
        calendar.finish_date(dt(2024, 3, 4, 0, 0), hours(30.0)),
        Some(dt(2024, 3, 5, 6, 0))
    );
}

#[test]
fn no_working_time_gives_no_finish() {
    let calendar = ProjectCalendar::new(None, None);
    assert_eq!(calendar.finish_date(dt(2024, 3, 4, 8, 0), hours(1.0)), None);
}
