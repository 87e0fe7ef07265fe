//! Point marine forecasts from the NWS National Digital Forecast Database.
//!
//! The NDFD REST service answers with a DWML document. Each weather
//! parameter lists its values against a named `time-layout`, and different
//! parameters usually use different layouts (gusts are forecast at a coarser
//! step than sustained wind, for example). [`parse_forecast`] lines every
//! parameter up on the union of all valid times.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::error::{NdbcError, Result};
use crate::model::{ObservationFloatDatum, parse_float};
use crate::observation::Observations;

pub type MeteorologicalPredictions = Observations<MeteorologicalPrediction>;

/// Forecast values valid at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeteorologicalPrediction {
    pub valid_at: DateTime<Utc>,
    pub wind_speed: ObservationFloatDatum,
    pub wind_gust: ObservationFloatDatum,
    pub wind_direction: ObservationFloatDatum,
    pub wave_height: ObservationFloatDatum,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub begin: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    /// Metric units instead of knots/feet.
    pub metric: bool,
}

impl ForecastRequest {
    pub fn new(latitude: f64, longitude: f64, begin: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            begin,
            end: None,
            metric: false,
        }
    }

    pub fn until(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    pub fn metric(mut self, metric: bool) -> Self {
        self.metric = metric;
        self
    }

    /// Query string for `ndfdXMLclient.php`.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("whichClient", "NDFDgen".to_string()),
            ("lat", self.latitude.to_string()),
            ("lon", self.longitude.to_string()),
            ("product", "time-series".to_string()),
            ("begin", self.begin.to_rfc3339_opts(SecondsFormat::Secs, true)),
        ];
        if let Some(end) = self.end {
            params.push(("end", end.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }
        params.push(("Unit", if self.metric { "m" } else { "e" }.to_string()));
        for element in ["wspd", "wdir", "waveh", "wgust"] {
            params.push((element, element.to_string()));
        }
        params
    }
}

#[derive(Debug, Deserialize)]
struct Dwml {
    data: DwmlData,
}

#[derive(Debug, Deserialize)]
struct DwmlData {
    #[serde(rename = "time-layout", default)]
    time_layouts: Vec<TimeLayout>,
    #[serde(default)]
    parameters: Option<Parameters>,
}

#[derive(Debug, Deserialize)]
struct TimeLayout {
    #[serde(rename = "layout-key")]
    layout_key: String,
    #[serde(rename = "start-valid-time", default)]
    start_valid_times: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Parameters {
    #[serde(rename = "wind-speed", default)]
    wind_speeds: Vec<Series>,
    #[serde(rename = "direction", default)]
    directions: Vec<Series>,
    #[serde(rename = "water-state", default)]
    water_states: Vec<WaterState>,
}

#[derive(Debug, Deserialize)]
struct Series {
    #[serde(rename = "@type", default)]
    kind: String,
    #[serde(rename = "@units", default)]
    units: String,
    #[serde(rename = "@time-layout", default)]
    time_layout: String,
    #[serde(rename = "value", default)]
    values: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct WaterState {
    #[serde(rename = "@time-layout", default)]
    time_layout: String,
    #[serde(rename = "waves", default)]
    waves: Vec<Series>,
}

/// `<value>12</value>` or `<value xsi:nil="true"/>`.
#[derive(Debug, Deserialize)]
struct Value {
    #[serde(rename = "$text", default)]
    text: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    WindSpeed = 0,
    WindGust = 1,
    WindDirection = 2,
    WaveHeight = 3,
}

const LABELS: [&str; 4] = ["Wind Speed", "Wind Gust", "Wind Direction", "Wave Height"];

struct Merger<'a> {
    layouts: HashMap<&'a str, Vec<Option<DateTime<Utc>>>>,
    rows: BTreeMap<DateTime<Utc>, [Option<f64>; 4]>,
    units: [String; 4],
}

impl<'a> Merger<'a> {
    fn new(layouts: &'a [TimeLayout]) -> Self {
        let layouts = layouts
            .iter()
            .map(|layout| {
                let times = layout.start_valid_times.iter().map(|t| parse_time(t)).collect();
                (layout.layout_key.trim(), times)
            })
            .collect();

        Self {
            layouts,
            rows: BTreeMap::new(),
            units: Default::default(),
        }
    }

    fn add(&mut self, slot: Slot, layout_key: &str, units: &str, values: &[Value]) {
        let Some(times) = self.layouts.get(layout_key.trim()) else {
            debug!(layout_key, "Forecast parameter references unknown time layout");
            return;
        };

        let i = slot as usize;
        if self.units[i].is_empty() {
            self.units[i] = units.to_string();
        }

        for (time, value) in times.iter().zip(values) {
            let Some(time) = time else { continue };
            let row = self.rows.entry(*time).or_default();
            let parsed = value.text.as_deref().and_then(parse_float);
            if parsed.is_some() {
                row[i] = parsed;
            }
        }
    }

    fn finish(self) -> MeteorologicalPredictions {
        let Merger { rows, units, .. } = self;
        let datum = |slot: Slot, row: &[Option<f64>; 4]| {
            let i = slot as usize;
            ObservationFloatDatum::new(LABELS[i], units[i].clone(), row[i])
        };

        rows.into_iter()
            .map(|(valid_at, row)| MeteorologicalPrediction {
                valid_at,
                wind_speed: datum(Slot::WindSpeed, &row),
                wind_gust: datum(Slot::WindGust, &row),
                wind_direction: datum(Slot::WindDirection, &row),
                wave_height: datum(Slot::WaveHeight, &row),
            })
            .collect()
    }
}

fn parse_time(raw: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(t) => Some(t.with_timezone(&Utc)),
        Err(err) => {
            debug!(raw, %err, "Ignoring unparseable forecast time");
            None
        }
    }
}

/// Parse a DWML time-series document into predictions ordered by valid time.
pub fn parse_forecast(xml: &str) -> Result<MeteorologicalPredictions> {
    if !xml.contains("<dwml") {
        return Err(NdbcError::UnexpectedDocument("dwml"));
    }
    let doc: Dwml = quick_xml::de::from_str(xml)?;
    let params = doc.data.parameters.unwrap_or_default();
    let mut merger = Merger::new(&doc.data.time_layouts);

    for series in &params.wind_speeds {
        let slot = match series.kind.as_str() {
            "sustained" => Slot::WindSpeed,
            "gust" => Slot::WindGust,
            _ => continue,
        };
        merger.add(slot, &series.time_layout, &series.units, &series.values);
    }

    for series in params.directions.iter().filter(|s| s.kind == "wind") {
        merger.add(Slot::WindDirection, &series.time_layout, &series.units, &series.values);
    }

    for state in &params.water_states {
        for waves in &state.waves {
            merger.add(Slot::WaveHeight, &state.time_layout, &waves.units, &waves.values);
        }
    }

    Ok(merger.finish())
}
