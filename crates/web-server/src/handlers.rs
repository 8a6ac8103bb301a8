use crate::{error::AppError, AppState};
use analytics::{AnalysisResult, HistoryPoint, MarketOverview};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The JSON envelope every successful read is wrapped in.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T> {
    fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    /// Number of trailing rows; falls back to `analysis.history_days`.
    pub days: Option<usize>,
}

/// # GET /api/vix/current
pub async fn get_current(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<AnalysisResult>>, AppError> {
    state.service.ensure_data().await?;
    let current = state.service.current_snapshot().await?;
    Ok(Json(ApiResponse::ok(
        current,
        "Current VIX analysis retrieved successfully",
    )))
}

/// # GET /api/vix/history?days=N
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<ApiResponse<Vec<HistoryPoint>>>, AppError> {
    let days = params.days.unwrap_or(state.history_days);
    state.service.ensure_data().await?;
    let history = state.service.history_slice(days).await?;
    let message = format!("Retrieved {} days of VIX history", history.len());
    Ok(Json(ApiResponse::ok(history, message)))
}

/// # GET /api/vix/analysis?days=N
/// Snapshot and history in one payload.
pub async fn get_analysis(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<ApiResponse<MarketOverview>>, AppError> {
    let days = params.days.unwrap_or(state.history_days);
    state.service.ensure_data().await?;
    let overview = state.service.overview(days).await?;
    Ok(Json(ApiResponse::ok(
        overview,
        "Complete VIX analysis retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::{MetricsConfig, VolatilityService};
    use api_client::{ApiError, DataSource};
    use async_trait::async_trait;
    use axum::response::IntoResponse;
    use chrono::{Days, NaiveDate};
    use core_types::ObservedPoint;

    struct FixedSource(Result<Vec<f64>, String>);

    #[async_trait]
    impl DataSource for FixedSource {
        async fn fetch_daily_closes(
            &self,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<Vec<ObservedPoint>, ApiError> {
            let values = self.0.clone().map_err(ApiError::Provider)?;
            let first = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
            Ok(values
                .into_iter()
                .enumerate()
                .map(|(i, value)| ObservedPoint {
                    date: first.checked_add_days(Days::new(i as u64)).unwrap(),
                    value,
                })
                .collect())
        }
    }

    fn state(source: FixedSource) -> Arc<AppState> {
        let service = VolatilityService::new(Arc::new(source), MetricsConfig::default(), 90);
        Arc::new(AppState {
            service: Arc::new(service),
            history_days: 30,
        })
    }

    fn values(n: usize) -> Vec<f64> {
        (0..n).map(|i| 15.0 + (i % 5) as f64).collect()
    }

    #[tokio::test]
    async fn current_ingests_lazily() {
        let state = state(FixedSource(Ok(values(40))));

        let Json(body) = get_current(State(state.clone())).await.unwrap();

        assert!(body.success);
        assert_eq!(body.data.date, NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());
        assert!(body.data.rolling.is_some());
        assert!(!state.service.store().is_empty().await);
    }

    #[tokio::test]
    async fn history_defaults_to_configured_days() {
        let state = state(FixedSource(Ok(values(40))));

        let Json(body) = get_history(State(state.clone()), Query(HistoryParams { days: None }))
            .await
            .unwrap();
        assert_eq!(body.data.len(), 30);
        assert_eq!(body.message, "Retrieved 30 days of VIX history");

        let Json(body) = get_history(State(state), Query(HistoryParams { days: Some(500) }))
            .await
            .unwrap();
        assert_eq!(body.data.len(), 40);
    }

    #[tokio::test]
    async fn analysis_combines_snapshot_and_history() {
        let state = state(FixedSource(Ok(values(3))));

        let Json(body) = get_analysis(State(state), Query(HistoryParams { days: Some(2) }))
            .await
            .unwrap();

        assert_eq!(body.data.history.len(), 2);
        assert_eq!(body.data.current.date, body.data.history[1].date);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], true);
        assert!(json["data"]["current"]["current_value"].is_number());
    }

    #[tokio::test]
    async fn source_failure_is_a_server_error() {
        let state = state(FixedSource(Err("rate limited".to_string())));

        let err = get_current(State(state)).await.unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
