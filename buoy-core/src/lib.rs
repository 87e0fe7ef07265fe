//! Core library for the `buoy` CLI.
//!
//! This crate defines:
//! - A client for NOAA's National Data Buoy Center (station directory and
//!   realtime observation files) and the NDFD point forecast service
//! - Typed observation models and the parsers that build them
//! - Configuration handling
//!
//! It is used by `buoy-cli`, but can also be reused by other binaries or services.
//!
//! ```no_run
//! # async fn demo() -> buoy_core::Result<()> {
//! use buoy_core::{Dataset, NdbcClient};
//!
//! let client = NdbcClient::new()?;
//! if let Some(obs) = client.get_meteorological("41013").await {
//!     if let Some(latest) = obs.first() {
//!         println!("wind {}", latest.wind_speed);
//!     }
//! }
//! let _waves = client.get("41013", Dataset::WaveSummary).await;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod dataset;
pub mod error;
pub mod forecast;
pub mod model;
pub mod observation;
pub mod parser;
pub mod source;
pub mod station;

pub use client::NdbcClient;
pub use config::{Config, Endpoints};
pub use dataset::Dataset;
pub use error::{NdbcError, Result};
pub use forecast::{ForecastRequest, MeteorologicalPrediction, MeteorologicalPredictions};
pub use model::{DatumRef, ObservationDatum, ObservationFloatDatum, ObservationStringDatum};
pub use observation::{
    MeteorologicalObservation, Observation, Observations, RealtimeObservations,
    WaveSummaryObservation,
};
pub use source::{HttpSource, TextSource};
pub use station::Station;
