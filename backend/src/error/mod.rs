use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{NaiveDate, Weekday};
use serde::Serialize;
use serde_json::Value;

/// Failures of the holiday engine and its validations.
#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    /// Company settings or the weekly off pattern are missing or unusable.
    #[error("{0}")]
    Config(String),

    #[error("Holiday named '{name}' already exists in this financial year")]
    DuplicateName { name: String },

    #[error("A holiday already exists on {0}")]
    DuplicateDate(NaiveDate),

    #[error("{date} falls on {weekday}, which is a weekly off day")]
    Weekend { date: NaiveDate, weekday: Weekday },

    #[error("Date {0} must be after today")]
    PastDate(NaiveDate),

    #[error("Financial year window {start} to {end} is invalid")]
    DateWindow { start: NaiveDate, end: NaiveDate },

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl CalendarError {
    pub fn company_settings_missing() -> Self {
        CalendarError::Config("Company settings are not configured".into())
    }

    pub fn weekly_pattern_missing() -> Self {
        CalendarError::Config("Weekly off-day pattern is not configured".into())
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Conflict(String),
    BadRequest(String),
    InternalServerError(anyhow::Error),
    Validation(Vec<String>),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, code, details) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "NOT_FOUND".to_string(), None),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg, "CONFLICT".to_string(), None),
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                msg,
                "BAD_REQUEST".to_string(),
                None,
            ),
            AppError::InternalServerError(err) => {
                tracing::error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    "INTERNAL_SERVER_ERROR".to_string(),
                    None,
                )
            }
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                "VALIDATION_ERROR".to_string(),
                Some(serde_json::json!({ "errors": errors })),
            ),
        };

        let body = Json(ErrorResponse {
            error: error_message,
            code,
            details,
        });

        (status, body).into_response()
    }
}

impl From<CalendarError> for AppError {
    fn from(err: CalendarError) -> Self {
        match err {
            CalendarError::Config(_)
            | CalendarError::Weekend { .. }
            | CalendarError::PastDate(_)
            | CalendarError::DateWindow { .. }
            | CalendarError::InvalidInput(_) => AppError::BadRequest(err.to_string()),
            CalendarError::DuplicateName { .. } | CalendarError::DuplicateDate(_) => {
                AppError::Conflict(err.to_string())
            }
            CalendarError::NotFound(msg) => AppError::NotFound(msg),
            CalendarError::Database(sqlx::Error::RowNotFound) => {
                AppError::NotFound("Resource not found".to_string())
            }
            CalendarError::Database(e) => AppError::InternalServerError(e.into()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let code = e.code.as_ref();
                    format!("{}: {}", field, code)
                })
            })
            .collect();
        AppError::Validation(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn response_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json")
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn calendar_errors_map_to_http_statuses() {
        let cases = [
            (
                CalendarError::company_settings_missing(),
                StatusCode::BAD_REQUEST,
            ),
            (
                CalendarError::Weekend {
                    date: date(2026, 10, 17),
                    weekday: Weekday::Sat,
                },
                StatusCode::BAD_REQUEST,
            ),
            (CalendarError::PastDate(date(2026, 1, 1)), StatusCode::BAD_REQUEST),
            (
                CalendarError::DuplicateName {
                    name: "Diwali".into(),
                },
                StatusCode::CONFLICT,
            ),
            (CalendarError::DuplicateDate(date(2026, 11, 8)), StatusCode::CONFLICT),
            (
                CalendarError::NotFound("Holiday not found".into()),
                StatusCode::NOT_FOUND,
            ),
            (
                CalendarError::Database(sqlx::Error::PoolTimedOut),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[tokio::test]
    async fn user_correctable_errors_are_surfaced_verbatim() {
        let err = CalendarError::DuplicateName {
            name: "Diwali".into(),
        };
        let message = err.to_string();
        let json = response_json(AppError::from(err).into_response()).await;
        assert_eq!(json["error"], message);
        assert_eq!(json["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn app_error_validation_includes_details() {
        let response = AppError::Validation(vec!["name: length".to_string()]).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"], "Validation failed");
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["details"]["errors"][0], "name: length");
    }

    #[tokio::test]
    async fn app_error_internal_maps_to_generic_message() {
        let response = AppError::InternalServerError(anyhow::anyhow!("boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = response_json(response).await;
        assert_eq!(json["error"], "Internal server error");
        assert!(json["details"].is_null());
    }
}
