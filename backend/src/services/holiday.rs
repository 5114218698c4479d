//! Holiday CRUD.
//!
//! [`HolidayWorkflow`] runs the validations and propagation over any
//! [`CalendarStore`]. [`HolidayService`] binds it to PostgreSQL: each mutation
//! gets its own [`PgUnitOfWork`], committed only when the whole workflow
//! succeeds.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use sqlx::PgPool;

use crate::config::Config;
use crate::error::CalendarError;
use crate::models::holiday::{
    CountedHoliday, CreateHolidayPayload, Holiday, HolidayListQuery, PublicHoliday,
    UpdateHolidayPayload,
};
use crate::models::settings::FinancialYearWindow;
use crate::repositories::company_settings::CompanySettingsRepository;
use crate::repositories::holiday::HolidayRepository;
use crate::repositories::repository::CalendarStore;
use crate::repositories::transaction::PgUnitOfWork;
use crate::services::propagation::{HolidayPropagator, PropagationReport};
use crate::services::validator::{check_name_uniqueness, check_not_past, check_weekday, well_formed};
use crate::types::HolidayId;
use crate::utils::time::{month_bounds, today_local};
use crate::validation::rules::{normalize_name, validate_holiday_name, validate_image_key};

/// A holiday write together with what it propagated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayMutation {
    pub holiday: Holiday,
    pub reports: Vec<PropagationReport>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HolidayWorkflow {
    propagator: HolidayPropagator,
}

impl HolidayWorkflow {
    pub fn new(propagator: HolidayPropagator) -> Self {
        Self { propagator }
    }

    pub async fn create<S>(
        &self,
        store: &mut S,
        payload: CreateHolidayPayload,
    ) -> Result<HolidayMutation, CalendarError>
    where
        S: CalendarStore + ?Sized,
    {
        let name = prepare_name(&payload.name)?;
        let image_key = prepare_image_key(payload.image_key)?;
        let date = payload.holiday_date;

        store.lock_holiday_date(date).await?;
        check_weekday(store, date).await?;
        check_name_uniqueness(store, &name, date, None).await?;
        if store.find_holiday_by_date(date).await?.is_some() {
            return Err(CalendarError::DuplicateDate(date));
        }

        let holiday = store
            .insert_holiday(&Holiday::new(name, date, image_key))
            .await?;
        let report = self.propagator.on_holiday_created(store, date).await?;

        Ok(HolidayMutation {
            holiday,
            reports: vec![report],
        })
    }

    /// Applies `payload` to holiday `id`.
    ///
    /// Date checks run only when the date moves. Propagation follows the
    /// active flag: a holiday that stays active moves its adjustments along
    /// with its date, one switched off is treated as deleted and one switched
    /// on as created.
    pub async fn update<S>(
        &self,
        store: &mut S,
        id: HolidayId,
        payload: UpdateHolidayPayload,
        today: NaiveDate,
    ) -> Result<HolidayMutation, CalendarError>
    where
        S: CalendarStore + ?Sized,
    {
        let existing = store
            .find_holiday(id)
            .await?
            .ok_or_else(|| CalendarError::NotFound("Holiday not found".into()))?;

        let name = prepare_name(&payload.name)?;
        let image_key = prepare_image_key(payload.image_key)?;
        let old_date = existing.holiday_date;
        let new_date = payload.holiday_date;
        let date_changed = old_date != new_date;

        if date_changed {
            store.lock_holiday_date(new_date).await?;
            check_not_past(new_date, today)?;
            check_weekday(store, new_date).await?;
            if let Some(other) = store.find_holiday_by_date(new_date).await? {
                if other.id != id {
                    return Err(CalendarError::DuplicateDate(new_date));
                }
            }
        }
        if date_changed || name != existing.name {
            check_name_uniqueness(store, &name, new_date, Some(id)).await?;
        }

        let was_active = existing.is_active;
        let is_active = payload.is_active.unwrap_or(was_active);
        let updated = Holiday {
            name,
            holiday_date: new_date,
            image_key,
            is_active,
            updated_at: Utc::now(),
            ..existing
        };
        let holiday = store.update_holiday(&updated).await?;

        let reports = match (was_active, is_active) {
            (true, true) => {
                self.propagator
                    .on_holiday_date_changed(store, old_date, new_date)
                    .await?
            }
            (true, false) => vec![self.propagator.on_holiday_deleted(store, old_date).await?],
            (false, true) => vec![self.propagator.on_holiday_created(store, new_date).await?],
            (false, false) => Vec::new(),
        };

        Ok(HolidayMutation { holiday, reports })
    }

    /// Removes holiday `id`. Only future holidays can be removed.
    pub async fn delete<S>(
        &self,
        store: &mut S,
        id: HolidayId,
        today: NaiveDate,
    ) -> Result<HolidayMutation, CalendarError>
    where
        S: CalendarStore + ?Sized,
    {
        let holiday = store
            .find_holiday(id)
            .await?
            .ok_or_else(|| CalendarError::NotFound("Holiday not found".into()))?;
        check_not_past(holiday.holiday_date, today)?;

        let reports = if holiday.is_active {
            vec![
                self.propagator
                    .on_holiday_deleted(store, holiday.holiday_date)
                    .await?,
            ]
        } else {
            Vec::new()
        };
        store.delete_holiday(id).await?;

        Ok(HolidayMutation { holiday, reports })
    }
}

fn prepare_name(raw: &str) -> Result<String, CalendarError> {
    validate_holiday_name(raw).map_err(|e| {
        CalendarError::InvalidInput(format!("Invalid holiday name: {}", e.code))
    })?;
    Ok(normalize_name(raw))
}

fn prepare_image_key(raw: Option<String>) -> Result<Option<String>, CalendarError> {
    let Some(key) = raw.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()) else {
        return Ok(None);
    };
    validate_image_key(&key).map_err(|_| {
        CalendarError::InvalidInput("Holiday image must be a .jpg, .jpeg or .png file".into())
    })?;
    Ok(Some(key))
}

/// Date range listed for `start_year`/`end_year`: the configured financial
/// year unless both years are given, in which case the window's month/day
/// anchors are moved into those years.
pub fn listing_window(
    current: FinancialYearWindow,
    start_year: Option<i32>,
    end_year: Option<i32>,
) -> Result<FinancialYearWindow, CalendarError> {
    let (Some(start_year), Some(end_year)) = (start_year, end_year) else {
        return Ok(current);
    };
    let window = current.spanning_years(start_year, end_year).ok_or_else(|| {
        CalendarError::InvalidInput(format!(
            "Year range {}-{} is out of bounds",
            start_year, end_year
        ))
    })?;
    well_formed(window)
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HolidayServiceTrait: Send + Sync {
    async fn create_holiday(&self, payload: CreateHolidayPayload) -> Result<Holiday, CalendarError>;

    async fn update_holiday(
        &self,
        id: HolidayId,
        payload: UpdateHolidayPayload,
    ) -> Result<Holiday, CalendarError>;

    async fn delete_holiday(&self, id: HolidayId) -> Result<(), CalendarError>;

    async fn get_holiday(&self, id: HolidayId) -> Result<Holiday, CalendarError>;

    /// Holidays in the requested window, each with its month's totals.
    async fn list_holidays(
        &self,
        query: HolidayListQuery,
    ) -> Result<Vec<CountedHoliday>, CalendarError>;

    /// Active holidays in the requested window, id and date only.
    async fn list_public_holidays(
        &self,
        query: HolidayListQuery,
    ) -> Result<Vec<PublicHoliday>, CalendarError>;

    async fn list_current_month(&self) -> Result<Vec<Holiday>, CalendarError>;
}

#[derive(Clone)]
pub struct HolidayService {
    pool: Arc<PgPool>,
    workflow: HolidayWorkflow,
    time_zone: Tz,
    holidays: HolidayRepository,
    settings: CompanySettingsRepository,
}

impl HolidayService {
    pub fn new(pool: Arc<PgPool>, config: &Config) -> Self {
        Self {
            pool,
            workflow: HolidayWorkflow::new(HolidayPropagator::new(
                config.working_day_lookahead_days,
            )),
            time_zone: config.time_zone,
            holidays: HolidayRepository::new(),
            settings: CompanySettingsRepository::new(),
        }
    }

    fn today(&self) -> NaiveDate {
        today_local(&self.time_zone)
    }

    async fn financial_year(&self) -> Result<FinancialYearWindow, CalendarError> {
        let settings = self
            .settings
            .find(&self.pool)
            .await?
            .ok_or_else(CalendarError::company_settings_missing)?;
        well_formed(settings.financial_year_window())
    }

    async fn window_for(&self, query: &HolidayListQuery) -> Result<FinancialYearWindow, CalendarError> {
        let current = self.financial_year().await?;
        listing_window(current, query.start_year, query.end_year)
    }
}

/// Commits on success; rolls back and returns the original error otherwise.
async fn finish<T>(
    unit_of_work: PgUnitOfWork,
    result: Result<T, CalendarError>,
) -> Result<T, CalendarError> {
    match result {
        Ok(value) => {
            unit_of_work.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = unit_of_work.rollback().await {
                tracing::error!(error = %rollback_err, "Failed to roll back holiday mutation");
            }
            Err(err)
        }
    }
}

fn log_mutation(action: &str, mutation: &HolidayMutation) {
    let rows: usize = mutation.reports.iter().map(PropagationReport::rows_touched).sum();
    tracing::info!(
        holiday_id = %mutation.holiday.id,
        holiday_date = %mutation.holiday.holiday_date,
        propagations = mutation.reports.len(),
        rows_touched = rows,
        "Holiday {}",
        action
    );
}

#[async_trait]
impl HolidayServiceTrait for HolidayService {
    #[tracing::instrument(skip(self, payload), fields(holiday_date = %payload.holiday_date))]
    async fn create_holiday(&self, payload: CreateHolidayPayload) -> Result<Holiday, CalendarError> {
        let mut unit_of_work = PgUnitOfWork::begin(&self.pool).await?;
        let result = self.workflow.create(&mut unit_of_work, payload).await;
        let mutation = finish(unit_of_work, result).await?;
        log_mutation("created", &mutation);
        Ok(mutation.holiday)
    }

    #[tracing::instrument(skip(self, payload), fields(holiday_date = %payload.holiday_date))]
    async fn update_holiday(
        &self,
        id: HolidayId,
        payload: UpdateHolidayPayload,
    ) -> Result<Holiday, CalendarError> {
        let today = self.today();
        let mut unit_of_work = PgUnitOfWork::begin(&self.pool).await?;
        let result = self
            .workflow
            .update(&mut unit_of_work, id, payload, today)
            .await;
        let mutation = finish(unit_of_work, result).await?;
        log_mutation("updated", &mutation);
        Ok(mutation.holiday)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_holiday(&self, id: HolidayId) -> Result<(), CalendarError> {
        let today = self.today();
        let mut unit_of_work = PgUnitOfWork::begin(&self.pool).await?;
        let result = self.workflow.delete(&mut unit_of_work, id, today).await;
        let mutation = finish(unit_of_work, result).await?;
        log_mutation("deleted", &mutation);
        Ok(())
    }

    async fn get_holiday(&self, id: HolidayId) -> Result<Holiday, CalendarError> {
        self.holidays.find_by_id(&self.pool, id).await
    }

    #[tracing::instrument(skip(self))]
    async fn list_holidays(
        &self,
        query: HolidayListQuery,
    ) -> Result<Vec<CountedHoliday>, CalendarError> {
        let window = self.window_for(&query).await?;
        let holidays = self
            .holidays
            .list_between(
                &self.pool,
                window.start_date,
                window.end_date,
                query.search.as_deref(),
            )
            .await?;

        // Totals cover whole months, even where the window cuts one.
        let (first, _) = month_bounds(window.start_date);
        let (_, last) = month_bounds(window.end_date);
        let counts = self.holidays.month_counts(&self.pool, first, last).await?;
        Ok(CountedHoliday::attach(holidays, &counts))
    }

    #[tracing::instrument(skip(self))]
    async fn list_public_holidays(
        &self,
        query: HolidayListQuery,
    ) -> Result<Vec<PublicHoliday>, CalendarError> {
        let window = self.window_for(&query).await?;
        self.holidays
            .list_public_between(
                &self.pool,
                window.start_date,
                window.end_date,
                query.search.as_deref(),
            )
            .await
    }

    async fn list_current_month(&self) -> Result<Vec<Holiday>, CalendarError> {
        let (first, last) = month_bounds(self.today());
        tracing::debug!(year = first.year(), month = first.month(), "Listing holidays for month");
        self.holidays
            .list_between(&self.pool, first, last, None)
            .await
    }
}
