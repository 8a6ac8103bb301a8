use crate::engine::MetricsEngine;
use crate::error::AnalyticsError;
use core_types::{DerivedRow, ObservedPoint};
use std::sync::Arc;
use tokio::sync::RwLock;

/// An immutable, fully computed series: canonical points plus their derived rows.
///
/// Frames are built off to the side and published whole, so a reader holding
/// an `Arc<SeriesFrame>` never observes a half-replaced series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesFrame {
    points: Vec<ObservedPoint>,
    rows: Vec<DerivedRow>,
}

impl SeriesFrame {
    /// Canonicalizes `points` (sorted ascending, one point per date) and computes its rows.
    pub fn build(mut points: Vec<ObservedPoint>, engine: &MetricsEngine) -> Result<Self, AnalyticsError> {
        if points.is_empty() {
            return Err(AnalyticsError::InvalidSeries(
                "cannot ingest an empty series".to_string(),
            ));
        }
        for point in &points {
            point
                .validate()
                .map_err(|e| AnalyticsError::InvalidSeries(e.to_string()))?;
        }

        // Ordering by value as well keeps duplicate resolution independent of input order.
        points.sort_by(|a, b| a.date.cmp(&b.date).then(a.value.total_cmp(&b.value)));
        points.dedup_by_key(|p| p.date);

        let rows = engine.compute(&points)?;
        Ok(Self { points, rows })
    }

    pub fn points(&self) -> &[ObservedPoint] {
        &self.points
    }

    pub fn rows(&self) -> &[DerivedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<ObservedPoint> {
        self.points.last().copied()
    }

    /// The last `n` rows in ascending date order; the whole series if `n` exceeds it.
    pub fn tail(&self, n: usize) -> Vec<(ObservedPoint, DerivedRow)> {
        let start = self.points.len().saturating_sub(n);
        self.points[start..]
            .iter()
            .copied()
            .zip(self.rows[start..].iter().copied())
            .collect()
    }
}

/// The process-wide holder of the published series.
#[derive(Debug, Default)]
pub struct SeriesStore {
    engine: MetricsEngine,
    current: RwLock<Option<Arc<SeriesFrame>>>,
}

impl SeriesStore {
    pub fn new(engine: MetricsEngine) -> Self {
        Self {
            engine,
            current: RwLock::new(None),
        }
    }

    /// Replaces the published series with a canonical copy of `points`.
    ///
    /// The new frame is computed before the write lock is taken; the lock only
    /// covers the pointer swap.
    pub async fn ingest(&self, points: Vec<ObservedPoint>) -> Result<Arc<SeriesFrame>, AnalyticsError> {
        let received = points.len();
        let frame = Arc::new(SeriesFrame::build(points, &self.engine)?);

        *self.current.write().await = Some(Arc::clone(&frame));

        tracing::info!(
            received,
            stored = frame.len(),
            first = ?frame.points().first().map(|p| p.date),
            last = ?frame.latest().map(|p| p.date),
            "Series ingested."
        );
        Ok(frame)
    }

    /// The currently published frame, if any ingest has succeeded.
    pub async fn snapshot(&self) -> Option<Arc<SeriesFrame>> {
        self.current.read().await.clone()
    }

    pub async fn is_empty(&self) -> bool {
        self.current.read().await.is_none()
    }

    pub async fn latest(&self) -> Result<ObservedPoint, AnalyticsError> {
        self.snapshot()
            .await
            .and_then(|frame| frame.latest())
            .ok_or(AnalyticsError::EmptySeries)
    }

    /// The last `n` rows; empty when nothing has been ingested yet.
    pub async fn tail(&self, n: usize) -> Vec<(ObservedPoint, DerivedRow)> {
        match self.snapshot().await {
            Some(frame) => frame.tail(n),
            None => Vec::new(),
        }
    }
}
