use serde::Deserialize;

/// The top-level envelope of a `GET /v8/finance/chart/{symbol}` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartErrorResponse>,
}

/// One symbol's bars. `timestamp` is absent when the range holds no trading days.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartMeta {
    /// Exchange offset from UTC in seconds, used to map bar timestamps to trading dates.
    #[serde(default, rename = "gmtoffset")]
    pub gmt_offset: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
}

/// Per-bar series; entries are `null` for bars the provider could not fill.
#[derive(Debug, Clone, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

/// Represents an error reported inside the chart envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartErrorResponse {
    pub code: String,
    pub description: String,
}
