use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

/// The property's books run on a fixed local offset; due-date checks and the
/// penalty sweep compare against this calendar day, not the UTC day.
pub fn billing_today(offset_hours: i32) -> NaiveDate {
    billing_date_at(Utc::now(), offset_hours)
}

/// Billing-local calendar date of a UTC instant
pub fn billing_date_at(instant: DateTime<Utc>, offset_hours: i32) -> NaiveDate {
    let offset = FixedOffset::east_opt(offset_hours * 3600)
        .unwrap_or_else(|| FixedOffset::east_opt(0).expect("UTC offset"));
    instant.with_timezone(&offset).date_naive()
}
