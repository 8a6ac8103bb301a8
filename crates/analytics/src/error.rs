use api_client::ApiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Data source error: {0}")]
    DataSource(#[from] ApiError),

    #[error("Invalid series: {0}")]
    InvalidSeries(String),

    #[error("The series is empty")]
    EmptySeries,

    #[error("No data available. Trigger an ingest before reading")]
    NoData,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Error in calculation: {0}")]
    Calculation(String),
}
