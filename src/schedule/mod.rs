//! Calendar helpers shared by the conflict engine and the projector.
//!
//! One weekday convention is used everywhere: ISO, 1 = Monday .. 7 = Sunday.
//! Calendar dates are converted here and nowhere else.

use chrono::{Datelike, Days, NaiveDate, NaiveTime};

/// ISO weekday number (1 = Monday .. 7 = Sunday) for a calendar date.
pub fn iso_weekday(date: NaiveDate) -> u32 {
    date.weekday().number_from_monday()
}

/// Inclusive-boundary interval overlap: touching endpoints count as a
/// conflict (compatible with the store's BETWEEN-based queries this
/// engine replaced).
pub fn overlaps(a_start: NaiveTime, a_end: NaiveTime, b_start: NaiveTime, b_end: NaiveTime) -> bool {
    a_start <= b_end && b_start <= a_end
}

/// Upcoming end of week: the next Sunday strictly after `today`
/// (a cancellation issued on Sunday runs to the following Sunday).
pub fn end_of_week(today: NaiveDate) -> NaiveDate {
    let days_left = 7 - today.weekday().num_days_from_sunday() as u64;
    today + Days::new(days_left)
}

/// Accepts both "HH:MM" (what the weekly-grid UI submits) and "HH:MM:SS".
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    #[test]
    fn overlap_matrix() {
        // disjoint
        assert!(!overlaps(t("10:00"), t("11:00"), t("12:00"), t("13:00")));
        assert!(!overlaps(t("12:00"), t("13:00"), t("10:00"), t("11:00")));
        // touching endpoints conflict under inclusive boundaries
        assert!(overlaps(t("10:00"), t("11:00"), t("11:00"), t("12:00")));
        assert!(overlaps(t("11:00"), t("12:00"), t("10:00"), t("11:00")));
        // partial overlap, both directions
        assert!(overlaps(t("10:00"), t("11:00"), t("10:30"), t("11:30")));
        assert!(overlaps(t("10:30"), t("11:30"), t("10:00"), t("11:00")));
        // nested
        assert!(overlaps(t("09:00"), t("12:00"), t("10:00"), t("11:00")));
        assert!(overlaps(t("10:00"), t("11:00"), t("09:00"), t("12:00")));
        // identical
        assert!(overlaps(t("10:00"), t("11:00"), t("10:00"), t("11:00")));
    }

    #[test]
    fn iso_weekday_convention() {
        // 2025-09-01 is a Monday
        let monday = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        assert_eq!(iso_weekday(monday), 1);
        assert_eq!(iso_weekday(monday + Days::new(1)), 2);
        assert_eq!(iso_weekday(monday + Days::new(5)), 6);
        // Sunday maps to 7, never to 0 or 1
        assert_eq!(iso_weekday(monday + Days::new(6)), 7);
    }

    #[test]
    fn end_of_week_lands_on_sunday() {
        let monday = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        for offset in 0..7 {
            let day = monday + Days::new(offset);
            let eow = end_of_week(day);
            assert_eq!(eow.weekday(), Weekday::Sun);
            assert!(eow > day);
        }
        // Sunday rolls a full week forward
        let sunday = NaiveDate::from_ymd_opt(2025, 9, 7).unwrap();
        assert_eq!(end_of_week(sunday), NaiveDate::from_ymd_opt(2025, 9, 14).unwrap());
        // Saturday is the tight case
        let saturday = NaiveDate::from_ymd_opt(2025, 9, 6).unwrap();
        assert_eq!(end_of_week(saturday), sunday);
    }

    #[test]
    fn time_parsing_accepts_both_forms() {
        assert_eq!(parse_time("14:00"), parse_time("14:00:00"));
        assert!(parse_time("14:00").is_some());
        assert!(parse_time("25:00").is_none());
        assert!(parse_time("").is_none());
        assert!(parse_date("2025-09-03").is_some());
        assert!(parse_date("03/09/2025").is_none());
    }
}
