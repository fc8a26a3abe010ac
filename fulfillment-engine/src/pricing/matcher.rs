//! Promotion window matching
//!
//! A promotion applies on a date when it is active, the date falls inside
//! its start/end range, and the weekday is in its valid-days list
//! (0=Sunday .. 6=Saturday).

use chrono::{Datelike, NaiveDate, Weekday};
use shared::models::Promotion;

/// Weekday to the 0=Sunday .. 6=Saturday convention
pub fn weekday_index(weekday: Weekday) -> u8 {
    match weekday {
        Weekday::Sun => 0,
        Weekday::Mon => 1,
        Weekday::Tue => 2,
        Weekday::Wed => 3,
        Weekday::Thu => 4,
        Weekday::Fri => 5,
        Weekday::Sat => 6,
    }
}

/// Whether the promotion is active on the given business date
pub fn is_valid_on(promotion: &Promotion, date: NaiveDate) -> bool {
    if !promotion.active {
        return false;
    }
    if date < promotion.start_date || date > promotion.end_date {
        return false;
    }
    promotion
        .valid_days
        .contains(&weekday_index(date.weekday()))
}
