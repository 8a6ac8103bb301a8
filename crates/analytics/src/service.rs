use crate::assembler::AnalysisAssembler;
use crate::engine::{MetricsConfig, MetricsEngine};
use crate::error::AnalyticsError;
use crate::report::{AnalysisResult, HistoryPoint, MarketOverview};
use crate::store::{SeriesFrame, SeriesStore};
use api_client::DataSource;
use chrono::{Days, NaiveDate, Utc};
use configuration::Settings;
use std::sync::Arc;
use tokio::sync::Mutex;

/// The analytics facade handed to the API layer and the CLI.
///
/// Reads never fetch. Callers that want lazy loading call `ensure_data` first
/// and then read, which keeps network I/O out of the query paths.
pub struct VolatilityService {
    source: Arc<dyn DataSource>,
    store: SeriesStore,
    assembler: AnalysisAssembler,
    // Serializes ingests. Held across the fetch, never touched by readers.
    ingest_gate: Mutex<()>,
    default_lookback_days: u32,
}

impl VolatilityService {
    pub fn new(source: Arc<dyn DataSource>, metrics: MetricsConfig, default_lookback_days: u32) -> Self {
        Self {
            source,
            store: SeriesStore::new(MetricsEngine::new(metrics)),
            assembler: AnalysisAssembler::new(metrics.stats_window),
            ingest_gate: Mutex::new(()),
            default_lookback_days,
        }
    }

    pub fn from_settings(source: Arc<dyn DataSource>, settings: &Settings) -> Self {
        Self::new(
            source,
            MetricsConfig::from(&settings.analysis),
            settings.data_source.lookback_days,
        )
    }

    pub fn store(&self) -> &SeriesStore {
        &self.store
    }

    /// Fetches the last `lookback_days` calendar days from the source and publishes them.
    pub async fn ingest_from_source(&self, lookback_days: u32) -> Result<Arc<SeriesFrame>, AnalyticsError> {
        if lookback_days == 0 {
            return Err(AnalyticsError::InvalidRequest(
                "lookback_days must be at least 1".to_string(),
            ));
        }
        let _guard = self.ingest_gate.lock().await;
        self.fetch_and_ingest(lookback_days).await
    }

    /// Ingests with the default lookback, but only when nothing is published yet.
    pub async fn ensure_data(&self) -> Result<(), AnalyticsError> {
        if !self.store.is_empty().await {
            return Ok(());
        }
        let _guard = self.ingest_gate.lock().await;
        // Another caller may have finished the first ingest while we waited.
        if !self.store.is_empty().await {
            return Ok(());
        }
        tracing::info!("No cached series, ingesting from source.");
        self.fetch_and_ingest(self.default_lookback_days).await?;
        Ok(())
    }

    pub async fn current_snapshot(&self) -> Result<AnalysisResult, AnalyticsError> {
        let frame = self.published().await?;
        self.assembler.snapshot(&frame)
    }

    pub async fn history_slice(&self, n: usize) -> Result<Vec<HistoryPoint>, AnalyticsError> {
        let frame = self.published().await?;
        Ok(self.assembler.history(&frame, n))
    }

    /// Snapshot plus history, read from one frame so both halves agree.
    pub async fn overview(&self, n: usize) -> Result<MarketOverview, AnalyticsError> {
        let frame = self.published().await?;
        self.assembler.overview(&frame, n)
    }

    async fn published(&self) -> Result<Arc<SeriesFrame>, AnalyticsError> {
        self.store.snapshot().await.ok_or(AnalyticsError::NoData)
    }

    async fn fetch_and_ingest(&self, lookback_days: u32) -> Result<Arc<SeriesFrame>, AnalyticsError> {
        let (start, end) = fetch_range(Utc::now().date_naive(), lookback_days);
        let points = match self.source.fetch_daily_closes(start, end).await {
            Ok(points) => points,
            Err(e) => {
                tracing::error!(error = %e, %start, %end, "Data source fetch failed.");
                return Err(e.into());
            }
        };
        self.store.ingest(points).await
    }
}

/// `[today - lookback_days, today]`, clamped at the earliest representable date.
fn fetch_range(today: NaiveDate, lookback_days: u32) -> (NaiveDate, NaiveDate) {
    let start = today
        .checked_sub_days(Days::new(u64::from(lookback_days)))
        .unwrap_or(NaiveDate::MIN);
    (start, today)
}
