use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use chrono_tz::Tz;

/// Returns the current time in the configured timezone.
pub fn now_in_timezone(tz: &Tz) -> DateTime<Tz> {
    Utc::now().with_timezone(tz)
}

/// Returns today's date in the configured timezone.
pub fn today_local(tz: &Tz) -> NaiveDate {
    now_in_timezone(tz).date_naive()
}

/// First and last day of the month containing `date`.
pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX);
    (first, last)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn now_in_timezone_returns_datetime_in_tz() {
        let tz = chrono_tz::Asia::Kolkata;
        let result = now_in_timezone(&tz);
        assert_eq!(result.timezone(), tz);
    }

    #[test]
    fn today_local_matches_the_timezone_clock() {
        let tz = chrono_tz::UTC;
        let before = Utc::now().date_naive();
        let today = today_local(&tz);
        let after = Utc::now().date_naive();
        assert!(today == before || today == after);
    }

    #[test]
    fn month_bounds_cover_the_whole_month() {
        assert_eq!(
            month_bounds(date(2026, 10, 15)),
            (date(2026, 10, 1), date(2026, 10, 31))
        );
        assert_eq!(
            month_bounds(date(2028, 2, 29)),
            (date(2028, 2, 1), date(2028, 2, 29))
        );
        assert_eq!(
            month_bounds(date(2026, 12, 31)),
            (date(2026, 12, 1), date(2026, 12, 31))
        );
    }
}
