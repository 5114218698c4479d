//! Holiday write validation.
//!
//! Name uniqueness is scoped to financial years: a name may repeat across
//! years but not within one. Dates are also checked against the weekly
//! off-day pattern and against today.

use chrono::{Datelike, NaiveDate};

use crate::error::CalendarError;
use crate::models::settings::FinancialYearWindow;
use crate::repositories::repository::{HolidayStore, SettingsStore};
use crate::services::working_day::load_off_weekdays;
use crate::types::HolidayId;

/// The configured financial year. Fails when settings are missing or the
/// window runs backwards.
pub async fn current_financial_year<S>(store: &mut S) -> Result<FinancialYearWindow, CalendarError>
where
    S: SettingsStore + ?Sized,
{
    let settings = store
        .company_settings()
        .await?
        .ok_or_else(CalendarError::company_settings_missing)?;
    well_formed(settings.financial_year_window())
}

/// Rejects a window whose end precedes its start.
pub fn well_formed(window: FinancialYearWindow) -> Result<FinancialYearWindow, CalendarError> {
    if !window.is_well_formed() {
        return Err(CalendarError::DateWindow {
            start: window.start_date,
            end: window.end_date,
        });
    }
    Ok(window)
}

/// Rejects `name` when another holiday with that name already sits in the
/// financial year `date` belongs to.
///
/// Only the current and the following financial year are checked. The
/// following year excludes its first day (`next.start < date <= next.end`);
/// dates outside both are accepted without a lookup.
pub async fn check_name_uniqueness<S>(
    store: &mut S,
    name: &str,
    date: NaiveDate,
    exclude: Option<HolidayId>,
) -> Result<(), CalendarError>
where
    S: SettingsStore + HolidayStore + ?Sized,
{
    let current = current_financial_year(store).await?;

    let scope = if current.contains(date) {
        Some(current)
    } else {
        let next = current.next_year().ok_or_else(|| CalendarError::DateWindow {
            start: current.start_date,
            end: current.end_date,
        })?;
        (next.start_date < date && date <= next.end_date).then_some(next)
    };

    let Some(window) = scope else {
        return Ok(());
    };

    if store
        .holiday_name_exists(name, window.start_date, window.end_date, exclude)
        .await?
    {
        return Err(CalendarError::DuplicateName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Rejects dates falling on a configured off weekday.
pub async fn check_weekday<S>(store: &mut S, date: NaiveDate) -> Result<(), CalendarError>
where
    S: SettingsStore + ?Sized,
{
    let off = load_off_weekdays(store).await?;
    let weekday = date.weekday();
    if off.contains(&weekday) {
        return Err(CalendarError::Weekend { date, weekday });
    }
    Ok(())
}

/// Rejects today and anything before it.
pub fn check_not_past(date: NaiveDate, today: NaiveDate) -> Result<(), CalendarError> {
    if date <= today {
        return Err(CalendarError::PastDate(date));
    }
    Ok(())
}

/// Weekday and name checks for a holiday write.
pub async fn validate_holiday_write<S>(
    store: &mut S,
    name: &str,
    date: NaiveDate,
    exclude: Option<HolidayId>,
) -> Result<(), CalendarError>
where
    S: SettingsStore + HolidayStore + ?Sized,
{
    check_weekday(store, date).await?;
    check_name_uniqueness(store, name, date, exclude).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::holiday::Holiday;
    use crate::models::settings::{CompanySettings, WeeklyOffPattern};
    use crate::repositories::memory::InMemoryCalendarStore;
    use crate::repositories::repository::MockSettingsStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn store_with(holidays: &[(&str, NaiveDate)]) -> InMemoryCalendarStore {
        let mut store = InMemoryCalendarStore::new()
            .with_company_settings(CompanySettings::new(date(2026, 4, 1), date(2027, 3, 31)))
            .with_weekly_off_pattern(WeeklyOffPattern::monday_to_friday());
        for (name, day) in holidays {
            store = store.with_holiday(Holiday::new(name.to_string(), *day, None));
        }
        store
    }

    #[test]
    fn reversed_window_is_rejected() {
        let reversed = FinancialYearWindow {
            start_date: date(2027, 3, 31),
            end_date: date(2026, 4, 1),
        };
        assert!(matches!(
            well_formed(reversed),
            Err(CalendarError::DateWindow { start, .. }) if start == date(2027, 3, 31)
        ));
        let single_day = FinancialYearWindow {
            start_date: date(2026, 4, 1),
            end_date: date(2026, 4, 1),
        };
        assert_eq!(well_formed(single_day).unwrap(), single_day);
    }

    #[tokio::test]
    async fn duplicate_name_in_current_year_is_rejected() {
        let mut store = store_with(&[("Diwali", date(2026, 11, 9))]);
        let err = check_name_uniqueness(&mut store, "Diwali", date(2027, 1, 14), None)
            .await
            .unwrap_err();
        assert!(matches!(err, CalendarError::DuplicateName { .. }));
    }

    #[tokio::test]
    async fn same_holiday_can_be_excluded() {
        let existing = Holiday::new("Diwali".into(), date(2026, 11, 9), None);
        let mut store = store_with(&[]).with_holiday(existing.clone());
        check_name_uniqueness(&mut store, "Diwali", date(2026, 11, 10), Some(existing.id))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn duplicate_name_in_next_year_is_rejected() {
        let mut store = store_with(&[("Diwali", date(2027, 10, 29))]);
        let err = check_name_uniqueness(&mut store, "Diwali", date(2027, 11, 1), None)
            .await
            .unwrap_err();
        assert!(matches!(err, CalendarError::DuplicateName { .. }));
    }

    #[tokio::test]
    async fn first_day_of_next_year_skips_the_lookup() {
        let mut store = store_with(&[("New Year", date(2027, 4, 2))]);
        check_name_uniqueness(&mut store, "New Year", date(2027, 4, 1), None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn dates_beyond_both_windows_are_accepted() {
        let mut store = store_with(&[("Diwali", date(2028, 10, 17))]);
        check_name_uniqueness(&mut store, "Diwali", date(2028, 10, 18), None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn missing_settings_is_a_config_error() {
        let mut store = MockSettingsStore::new();
        store.expect_company_settings().returning(|| Ok(None));
        let err = current_financial_year(&mut store).await.unwrap_err();
        assert!(matches!(err, CalendarError::Config(_)));
    }

    #[tokio::test]
    async fn backwards_window_is_a_date_window_error() {
        let mut store = MockSettingsStore::new();
        store
            .expect_company_settings()
            .returning(|| Ok(Some(CompanySettings::new(date(2027, 3, 31), date(2026, 4, 1)))));
        let err = current_financial_year(&mut store).await.unwrap_err();
        assert!(matches!(err, CalendarError::DateWindow { .. }));
    }

    #[tokio::test]
    async fn weekend_dates_are_rejected() {
        let mut store = store_with(&[]);
        // 2026-11-07 is a Saturday.
        let err = check_weekday(&mut store, date(2026, 11, 7)).await.unwrap_err();
        assert!(matches!(err, CalendarError::Weekend { .. }));
        check_weekday(&mut store, date(2026, 11, 6)).await.unwrap();
    }

    #[test]
    fn today_counts_as_past() {
        let today = date(2026, 10, 15);
        assert!(check_not_past(today, today).is_err());
        assert!(check_not_past(date(2026, 10, 16), today).is_ok());
    }
}
