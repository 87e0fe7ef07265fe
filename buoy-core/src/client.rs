use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::config::{Config, Endpoints};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::forecast::{ForecastRequest, MeteorologicalPredictions, parse_forecast};
use crate::observation::{
    MeteorologicalObservation, Observation, Observations, RealtimeObservations,
    WaveSummaryObservation,
};
use crate::parser::parse_realtime;
use crate::source::{HttpSource, TextSource};
use crate::station::{Station, parse_active_stations};

/// Entry point for station listings, realtime observations and forecasts.
///
/// Every call is one request; the client holds no per-request state and can
/// be shared freely.
#[derive(Debug, Clone)]
pub struct NdbcClient {
    source: Arc<dyn TextSource>,
    endpoints: Endpoints,
}

impl NdbcClient {
    /// Client against the public NOAA endpoints.
    pub fn new() -> Result<Self> {
        Self::from_config(&Config::default())
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let source = HttpSource::new(&config.user_agent())?;
        Ok(Self::with_source(Arc::new(source), config.endpoints.clone()))
    }

    pub fn with_source(source: Arc<dyn TextSource>, endpoints: Endpoints) -> Self {
        Self { source, endpoints }
    }

    /// Realtime observations for `station_id`, or `None` when the station
    /// has no data available (transport failure, HTTP error status, or a body
    /// that is not the requested dataset's realtime file).
    pub async fn get(&self, station_id: &str, dataset: Dataset) -> Option<RealtimeObservations> {
        match dataset {
            Dataset::Meteorological => self.get_meteorological(station_id).await.map(Into::into),
            Dataset::WaveSummary => self.get_wave_summary(station_id).await.map(Into::into),
        }
    }

    pub async fn get_meteorological(
        &self,
        station_id: &str,
    ) -> Option<Observations<MeteorologicalObservation>> {
        self.fetch_realtime(station_id).await
    }

    pub async fn get_wave_summary(
        &self,
        station_id: &str,
    ) -> Option<Observations<WaveSummaryObservation>> {
        self.fetch_realtime(station_id).await
    }

    #[instrument(skip(self), fields(dataset = %T::DATASET))]
    async fn fetch_realtime<T: Observation>(&self, station_id: &str) -> Option<Observations<T>> {
        let url = self.endpoints.realtime_url(station_id, T::DATASET);

        let body = match self.source.get_text(&url, &[]).await {
            Ok(body) => body,
            Err(err) => {
                warn!(%err, "Realtime data unavailable");
                return None;
            }
        };

        let observations = match parse_realtime::<T>(&station_id.trim().to_uppercase(), &body) {
            Ok(observations) => observations,
            Err(err) => {
                warn!(%err, "Realtime data malformed");
                return None;
            }
        };
        info!(count = observations.len(), "Fetched realtime observations");
        Some(observations)
    }

    /// Every station currently listed as active.
    #[instrument(skip(self))]
    pub async fn list_stations(&self) -> Result<Vec<Station>> {
        let body = self.source.get_text(&self.endpoints.active_stations_url, &[]).await?;
        let stations = parse_active_stations(&body)?;
        info!(count = stations.len(), "Fetched active stations");
        Ok(stations)
    }

    /// NDFD point forecast of wind and waves.
    #[instrument(skip(self))]
    pub async fn forecast(&self, request: &ForecastRequest) -> Result<MeteorologicalPredictions> {
        let body = self.source.get_text(&self.endpoints.forecast_url, &request.query()).await?;
        let predictions = parse_forecast(&body)?;
        info!(count = predictions.len(), "Fetched forecast");
        Ok(predictions)
    }
}
