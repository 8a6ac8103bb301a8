//! # Volscope Analytics Engine
//!
//! This crate turns a raw series of daily volatility-index closes into derived
//! metrics and human-readable interpretations.
//!
//! ## Architectural Principles
//!
//! - **Pure calculation:** `MetricsEngine`, the `interpret` functions and the
//!   `AnalysisAssembler` have no knowledge of external systems and no state.
//! - **Publish, don't mutate:** `SeriesStore` swaps whole immutable frames, so
//!   readers never observe a partially replaced series.
//! - **Explicit I/O:** only `VolatilityService::ingest_from_source` and
//!   `VolatilityService::ensure_data` talk to the `DataSource`.
//!
//! ## Public API
//!
//! - `VolatilityService`: the facade used by the web server and the CLI.
//! - `MetricsEngine` / `SeriesStore` / `AnalysisAssembler`: the building blocks.
//! - `AnalysisResult` / `HistoryPoint` / `MarketOverview`: serializable outputs.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod assembler;
pub mod engine;
pub mod error;
pub mod interpret;
pub mod report;
pub mod service;
pub mod store;

// Re-export the key components to create a clean, public-facing API.
pub use assembler::AnalysisAssembler;
pub use engine::{MetricsConfig, MetricsEngine};
pub use error::AnalyticsError;
pub use report::{AnalysisResult, HistoryPoint, MarketOverview, RollingStats};
pub use service::VolatilityService;
pub use store::{SeriesFrame, SeriesStore};
