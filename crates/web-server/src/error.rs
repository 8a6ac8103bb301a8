use analytics::AnalyticsError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Analytics(AnalyticsError::NoData | AnalyticsError::EmptySeries) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Analytics(AnalyticsError::InvalidRequest(_)) => StatusCode::BAD_REQUEST,
            AppError::Analytics(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Converts our custom `AppError` into the `{success, data, message}` envelope.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let AppError::Analytics(err) = self;
        match &err {
            AnalyticsError::DataSource(source_err) => {
                tracing::error!(error = ?source_err, "Data source error.");
            }
            other => {
                tracing::error!(error = ?other, "Analytics error.");
            }
        }

        let body = Json(json!({
            "success": false,
            "data": null,
            "message": err.to_string(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_data_is_service_unavailable() {
        let err = AppError::from(AnalyticsError::NoData);
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn invalid_series_is_server_error() {
        let err = AppError::from(AnalyticsError::InvalidSeries("empty".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
