use anyhow::{Context, Result};
use chrono::{Days, NaiveDateTime, NaiveTime};

/// Fires once a day at a fixed local time of day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySchedule {
    at: NaiveTime,
    next_run: NaiveDateTime,
}

impl DailySchedule {
    /// First run is today at `at` if that is still ahead of `now`, else tomorrow.
    pub fn new(at: NaiveTime, now: NaiveDateTime) -> Self {
        DailySchedule { at, next_run: next_after(at, now) }
    }

    pub fn next_run(&self) -> NaiveDateTime {
        self.next_run
    }

    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        now >= self.next_run
    }

    /// Moves the next run past `now`.
    pub fn mark_ran(&mut self, now: NaiveDateTime) {
        self.next_run = next_after(self.at, now);
    }
}

fn next_after(at: NaiveTime, now: NaiveDateTime) -> NaiveDateTime {
    let today = now.date().and_time(at);
    if today > now {
        today
    } else {
        (now.date() + Days::new(1)).and_time(at)
    }
}

/// Parses `HH:MM` or `HH:MM:SS`.
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .with_context(|| format!("invalid time of day {s:?}, expected HH:MM"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap().and_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn first_run_is_today_when_time_is_ahead() {
        let schedule = DailySchedule::new(parse_time("18:00").unwrap(), at(10, 9, 0, 0));
        assert_eq!(schedule.next_run(), at(10, 18, 0, 0));
        assert!(!schedule.is_due(at(10, 17, 59, 59)));
        assert!(schedule.is_due(at(10, 18, 0, 0)));
    }

    #[test]
    fn first_run_is_tomorrow_when_time_has_passed() {
        let schedule = DailySchedule::new(parse_time("18:00").unwrap(), at(10, 18, 0, 0));
        assert_eq!(schedule.next_run(), at(11, 18, 0, 0));
    }

    #[test]
    fn runs_once_per_day() {
        let mut schedule = DailySchedule::new(parse_time("18:00").unwrap(), at(10, 9, 0, 0));
        schedule.mark_ran(at(10, 18, 0, 1));
        assert!(!schedule.is_due(at(10, 18, 0, 2)));
        assert!(!schedule.is_due(at(11, 17, 59, 59)));
        assert!(schedule.is_due(at(11, 18, 0, 0)));
    }

    #[test]
    fn late_run_still_lands_on_next_day() {
        let mut schedule = DailySchedule::new(parse_time("18:00").unwrap(), at(10, 9, 0, 0));
        schedule.mark_ran(at(10, 23, 30, 0));
        assert_eq!(schedule.next_run(), at(11, 18, 0, 0));
    }

    #[test]
    fn parses_times() {
        assert_eq!(parse_time("18:00").unwrap(), NaiveTime::from_hms_opt(18, 0, 0).unwrap());
        assert_eq!(parse_time("06:30:15").unwrap(), NaiveTime::from_hms_opt(6, 30, 15).unwrap());
        assert!(parse_time("25:00").is_err());
        assert!(parse_time("evening").is_err());
    }
}
