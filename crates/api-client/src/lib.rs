use crate::responses::ChartResponse;
use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, NaiveTime};
use configuration::DataSourceConfig;
use core_types::ObservedPoint;
use std::time::Duration;

pub mod error;
pub mod responses;

// --- Public API ---
pub use error::ApiError;

/// The abstract interface for a provider of daily closing values.
/// The analytics service only sees this trait, so the live client can be
/// swapped for a fixture in tests.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetches the daily closes between `start` and `end`, both inclusive.
    async fn fetch_daily_closes(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ObservedPoint>, ApiError>;
}

/// A concrete `DataSource` backed by the Yahoo Finance chart API.
#[derive(Clone)]
pub struct YahooChartClient {
    client: reqwest::Client,
    base_url: String,
    symbol: String,
}

impl YahooChartClient {
    pub fn new(config: &DataSourceConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            symbol: config.symbol.clone(),
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    fn chart_url(&self) -> String {
        format!(
            "{}/v8/finance/chart/{}",
            self.base_url,
            self.symbol.replace('^', "%5E")
        )
    }
}

#[async_trait]
impl DataSource for YahooChartClient {
    async fn fetch_daily_closes(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ObservedPoint>, ApiError> {
        // period2 is exclusive, so ask for midnight after `end`.
        let period1 = start.and_time(NaiveTime::default()).and_utc().timestamp();
        let period2 = end
            .checked_add_days(Days::new(1))
            .unwrap_or(end)
            .and_time(NaiveTime::default())
            .and_utc()
            .timestamp();

        tracing::debug!(symbol = %self.symbol, %start, %end, "Fetching daily closes.");

        let response = self
            .client
            .get(self.chart_url())
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
            ])
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            // The provider usually wraps failures in the chart envelope too.
            return match parse_chart(&text) {
                Err(ApiError::Provider(msg)) => Err(ApiError::Provider(msg)),
                _ => Err(ApiError::Provider(format!("HTTP {}", status))),
            };
        }

        let points = parse_chart(&text)?;
        tracing::info!(symbol = %self.symbol, count = points.len(), "Fetched daily closes.");
        Ok(points)
    }
}

/// Converts a chart payload into observed points, dropping bars with no close.
pub fn parse_chart(body: &str) -> Result<Vec<ObservedPoint>, ApiError> {
    let response: ChartResponse =
        serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))?;

    if let Some(err) = response.chart.error {
        return Err(ApiError::Provider(format!("{}: {}", err.code, err.description)));
    }

    let result = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| ApiError::InvalidData("chart response contained no result".to_string()))?;

    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    if closes.len() != result.timestamp.len() {
        return Err(ApiError::InvalidData(format!(
            "{} timestamps but {} closes",
            result.timestamp.len(),
            closes.len()
        )));
    }

    let offset = result.meta.gmt_offset;
    result
        .timestamp
        .iter()
        .zip(closes)
        .filter_map(|(ts, close)| close.map(|c| (*ts, c)))
        .map(|(ts, close)| {
            let date = ts
                .checked_add(offset)
                .and_then(|local| DateTime::from_timestamp(local, 0))
                .ok_or_else(|| ApiError::InvalidData(format!("Invalid timestamp: {}", ts)))?
                .date_naive();
            ObservedPoint::new(date, close).map_err(|e| ApiError::InvalidData(e.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHART_OK: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"symbol": "^VIX", "gmtoffset": -14400, "exchangeTimezoneName": "America/New_York"},
                "timestamp": [1717421400, 1717507800, 1717594200],
                "indicators": {"quote": [{"close": [13.11, null, 12.63]}]}
            }],
            "error": null
        }
    }"#;

    #[test]
    fn parses_closes_and_skips_nulls() {
        let points = parse_chart(CHART_OK).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        assert_eq!(points[0].value, 13.11);
        assert_eq!(points[1].date, NaiveDate::from_ymd_opt(2024, 6, 5).unwrap());
        assert_eq!(points[1].value, 12.63);
    }

    #[test]
    fn surfaces_provider_error() {
        let body = r#"{"chart": {"result": null, "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}}}"#;
        match parse_chart(body) {
            Err(ApiError::Provider(msg)) => assert!(msg.contains("Not Found")),
            other => panic!("expected provider error, got {:?}", other),
        }
    }

    #[test]
    fn empty_range_yields_no_points() {
        let body = r#"{"chart": {"result": [{"meta": {"gmtoffset": 0}, "indicators": {"quote": [{}]}}], "error": null}}"#;
        assert!(parse_chart(body).unwrap().is_empty());
    }

    #[test]
    fn rejects_misaligned_series() {
        let body = r#"{"chart": {"result": [{"meta": {}, "timestamp": [1717421400], "indicators": {"quote": [{"close": [1.0, 2.0]}]}}], "error": null}}"#;
        assert!(matches!(parse_chart(body), Err(ApiError::InvalidData(_))));
    }

    #[test]
    fn rejects_timestamp_overflowing_with_offset() {
        let body = r#"{"chart": {"result": [{"meta": {"gmtoffset": 1}, "timestamp": [9223372036854775807], "indicators": {"quote": [{"close": [13.0]}]}}], "error": null}}"#;
        assert!(matches!(parse_chart(body), Err(ApiError::InvalidData(_))));
    }

    #[test]
    fn rejects_malformed_payload() {
        assert!(matches!(parse_chart("<html>"), Err(ApiError::Deserialization(_))));
    }

    #[test]
    fn chart_url_encodes_caret() {
        let client = YahooChartClient::new(&DataSourceConfig::default()).unwrap();
        assert_eq!(
            client.chart_url(),
            "https://query1.finance.yahoo.com/v8/finance/chart/%5EVIX"
        );
    }
}
