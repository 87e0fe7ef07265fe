//! Typed realtime observations.
//!
//! Each realtime file has a fixed column layout: five timestamp columns
//! (`YY MM DD hh mm`, UTC) followed by the dataset's measurement columns.
//! [`METEOROLOGICAL`] and [`WAVE_SUMMARY`] describe those measurement
//! columns in file order; the observation structs below expose one named
//! datum per column.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::Index;

use crate::dataset::Dataset;
use crate::model::{
    DatumRef, FieldSpec, MISSING, ObservationFloatDatum, ObservationStringDatum,
};

/// Columns of `realtime2/{station}.txt` after the timestamp.
pub const METEOROLOGICAL: [FieldSpec; 14] = [
    FieldSpec::new("WDIR", "Wind Direction", "degT"),
    FieldSpec::new("WSPD", "Wind Speed", "m/s"),
    FieldSpec::new("GST", "Wind Gust", "m/s"),
    FieldSpec::new("WVHT", "Wave Height", "m"),
    FieldSpec::new("DPD", "Dominant Wave Period", "sec"),
    FieldSpec::new("APD", "Average Wave Period", "sec"),
    FieldSpec::new("MWD", "Wave Direction", "degT"),
    FieldSpec::new("PRES", "Sea Level Pressure", "hPa"),
    FieldSpec::new("ATMP", "Air Temperature", "degC"),
    FieldSpec::new("WTMP", "Water Temperature", "degC"),
    FieldSpec::new("DEWP", "Dewpoint Temperature", "degC"),
    FieldSpec::new("VIS", "Visibility", "nmi"),
    FieldSpec::new("PTDY", "Pressure Tendency", "hPa"),
    FieldSpec::new("TIDE", "Tide", "ft"),
];

/// Columns of `realtime2/{station}.spec` after the timestamp.
pub const WAVE_SUMMARY: [FieldSpec; 10] = [
    FieldSpec::new("WVHT", "Significant Wave Height", "m"),
    FieldSpec::new("SwH", "Swell Height", "m"),
    FieldSpec::new("SwP", "Swell Period", "sec"),
    FieldSpec::new("WWH", "Wind Wave Height", "m"),
    FieldSpec::new("WWP", "Wind Wave Period", "sec"),
    FieldSpec::new("SwD", "Swell Direction", ""),
    FieldSpec::new("WWD", "Wind Wave Direction", ""),
    FieldSpec::new("STEEPNESS", "Steepness", ""),
    FieldSpec::new("APD", "Average Wave Period", "sec"),
    FieldSpec::new("MWD", "Dominant Wave Direction", "degT"),
];

/// A record parsed from one data line of a realtime file.
pub trait Observation: Sized {
    const DATASET: Dataset;
    const SCHEMA: &'static [FieldSpec];

    /// Build a record from the measurement columns of one line. Columns
    /// beyond `fields.len()` are treated as missing.
    fn from_fields(station_id: &str, recorded_at: DateTime<Utc>, fields: &[&str]) -> Self;

    fn recorded_at(&self) -> DateTime<Utc>;

    /// Every datum in schema order.
    fn data(&self) -> Vec<DatumRef<'_>>;
}

fn float_at(fields: &[&str], schema: &[FieldSpec], i: usize) -> ObservationFloatDatum {
    ObservationFloatDatum::from_field(fields.get(i).copied().unwrap_or(MISSING), &schema[i])
}

fn string_at(fields: &[&str], schema: &[FieldSpec], i: usize) -> ObservationStringDatum {
    ObservationStringDatum::from_field(fields.get(i).copied().unwrap_or(MISSING), &schema[i])
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeteorologicalObservation {
    pub station_id: String,
    pub recorded_at: DateTime<Utc>,
    pub wind_direction: ObservationFloatDatum,
    pub wind_speed: ObservationFloatDatum,
    pub wind_gust: ObservationFloatDatum,
    pub wave_height: ObservationFloatDatum,
    pub dominant_wave_period: ObservationFloatDatum,
    pub average_wave_period: ObservationFloatDatum,
    pub wave_direction: ObservationFloatDatum,
    pub sea_level_pressure: ObservationFloatDatum,
    pub air_temperature: ObservationFloatDatum,
    pub water_temperature: ObservationFloatDatum,
    pub dewpoint_temperature: ObservationFloatDatum,
    pub visibility: ObservationFloatDatum,
    pub pressure_tendency: ObservationFloatDatum,
    pub tide: ObservationFloatDatum,
}

impl Observation for MeteorologicalObservation {
    const DATASET: Dataset = Dataset::Meteorological;
    const SCHEMA: &'static [FieldSpec] = &METEOROLOGICAL;

    fn from_fields(station_id: &str, recorded_at: DateTime<Utc>, fields: &[&str]) -> Self {
        let f = |i| float_at(fields, Self::SCHEMA, i);
        Self {
            station_id: station_id.to_string(),
            recorded_at,
            wind_direction: f(0),
            wind_speed: f(1),
            wind_gust: f(2),
            wave_height: f(3),
            dominant_wave_period: f(4),
            average_wave_period: f(5),
            wave_direction: f(6),
            sea_level_pressure: f(7),
            air_temperature: f(8),
            water_temperature: f(9),
            dewpoint_temperature: f(10),
            visibility: f(11),
            pressure_tendency: f(12),
            tide: f(13),
        }
    }

    fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    fn data(&self) -> Vec<DatumRef<'_>> {
        vec![
            DatumRef::Float(&self.wind_direction),
            DatumRef::Float(&self.wind_speed),
            DatumRef::Float(&self.wind_gust),
            DatumRef::Float(&self.wave_height),
            DatumRef::Float(&self.dominant_wave_period),
            DatumRef::Float(&self.average_wave_period),
            DatumRef::Float(&self.wave_direction),
            DatumRef::Float(&self.sea_level_pressure),
            DatumRef::Float(&self.air_temperature),
            DatumRef::Float(&self.water_temperature),
            DatumRef::Float(&self.dewpoint_temperature),
            DatumRef::Float(&self.visibility),
            DatumRef::Float(&self.pressure_tendency),
            DatumRef::Float(&self.tide),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveSummaryObservation {
    pub station_id: String,
    pub recorded_at: DateTime<Utc>,
    pub significant_wave_height: ObservationFloatDatum,
    pub swell_height: ObservationFloatDatum,
    pub swell_period: ObservationFloatDatum,
    pub wind_wave_height: ObservationFloatDatum,
    pub wind_wave_period: ObservationFloatDatum,
    pub swell_direction: ObservationStringDatum,
    pub wind_wave_direction: ObservationStringDatum,
    pub steepness: ObservationStringDatum,
    pub average_wave_period: ObservationFloatDatum,
    pub dominant_wave_direction: ObservationFloatDatum,
}

impl WaveSummaryObservation {
    /// Wave height of this dataset, i.e. the significant wave height.
    pub fn wave_height(&self) -> &ObservationFloatDatum {
        &self.significant_wave_height
    }
}

impl Observation for WaveSummaryObservation {
    const DATASET: Dataset = Dataset::WaveSummary;
    const SCHEMA: &'static [FieldSpec] = &WAVE_SUMMARY;

    fn from_fields(station_id: &str, recorded_at: DateTime<Utc>, fields: &[&str]) -> Self {
        let f = |i| float_at(fields, Self::SCHEMA, i);
        let s = |i| string_at(fields, Self::SCHEMA, i);
        Self {
            station_id: station_id.to_string(),
            recorded_at,
            significant_wave_height: f(0),
            swell_height: f(1),
            swell_period: f(2),
            wind_wave_height: f(3),
            wind_wave_period: f(4),
            swell_direction: s(5),
            wind_wave_direction: s(6),
            steepness: s(7),
            average_wave_period: f(8),
            dominant_wave_direction: f(9),
        }
    }

    fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    fn data(&self) -> Vec<DatumRef<'_>> {
        vec![
            DatumRef::Float(&self.significant_wave_height),
            DatumRef::Float(&self.swell_height),
            DatumRef::Float(&self.swell_period),
            DatumRef::Float(&self.wind_wave_height),
            DatumRef::Float(&self.wind_wave_period),
            DatumRef::Text(&self.swell_direction),
            DatumRef::Text(&self.wind_wave_direction),
            DatumRef::Text(&self.steepness),
            DatumRef::Float(&self.average_wave_period),
            DatumRef::Float(&self.dominant_wave_direction),
        ]
    }
}

/// Ordered collection of records of a single kind, in the order they were
/// pushed (NDBC files list the newest record first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Observations<T> {
    items: Vec<T>,
}

impl<T> Observations<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T> Default for Observations<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for Observations<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> FromIterator<T> for Observations<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> Extend<T> for Observations<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<T> IntoIterator for Observations<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Observations<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> Index<usize> for Observations<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

/// Realtime result when the dataset is only known at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dataset", content = "observations", rename_all = "snake_case")]
pub enum RealtimeObservations {
    Meteorological(Observations<MeteorologicalObservation>),
    WaveSummary(Observations<WaveSummaryObservation>),
}

impl RealtimeObservations {
    pub fn dataset(&self) -> Dataset {
        match self {
            RealtimeObservations::Meteorological(_) => Dataset::Meteorological,
            RealtimeObservations::WaveSummary(_) => Dataset::WaveSummary,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RealtimeObservations::Meteorological(obs) => obs.len(),
            RealtimeObservations::WaveSummary(obs) => obs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_meteorological(&self) -> Option<&Observations<MeteorologicalObservation>> {
        match self {
            RealtimeObservations::Meteorological(obs) => Some(obs),
            RealtimeObservations::WaveSummary(_) => None,
        }
    }

    pub fn as_wave_summary(&self) -> Option<&Observations<WaveSummaryObservation>> {
        match self {
            RealtimeObservations::WaveSummary(obs) => Some(obs),
            RealtimeObservations::Meteorological(_) => None,
        }
    }
}

impl From<Observations<MeteorologicalObservation>> for RealtimeObservations {
    fn from(obs: Observations<MeteorologicalObservation>) -> Self {
        RealtimeObservations::Meteorological(obs)
    }
}

impl From<Observations<WaveSummaryObservation>> for RealtimeObservations {
    fn from(obs: Observations<WaveSummaryObservation>) -> Self {
        RealtimeObservations::WaveSummary(obs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn meteorological_fields_map_positionally() {
        let fields = [
            "230", "5.0", "7.0", "1.2", "9", "6.1", "250", "1015.2", "12.3", "14.1", "8.2", "MM",
            "-1.2", "MM",
        ];
        let obs = MeteorologicalObservation::from_fields("41013", at(), &fields);

        assert_eq!(obs.station_id, "41013");
        assert_eq!(obs.wind_direction.value, Some(230.0));
        assert_eq!(obs.wind_speed.value, Some(5.0));
        assert_eq!(obs.wind_speed.unit, "m/s");
        assert_eq!(obs.wind_speed.label, "Wind Speed");
        assert_eq!(obs.sea_level_pressure.value, Some(1015.2));
        assert_eq!(obs.visibility.value, None);
        assert_eq!(obs.pressure_tendency.value, Some(-1.2));
        assert_eq!(obs.tide.value, None);
        assert_eq!(obs.data().len(), METEOROLOGICAL.len());
    }

    #[test]
    fn wave_summary_uses_string_datums_for_compass_columns() {
        let fields = ["1.2", "1.0", "10.0", "0.5", "4.0", "WSW", "SW", "AVERAGE", "6.1", "250"];
        let obs = WaveSummaryObservation::from_fields("41013", at(), &fields);

        assert_eq!(obs.significant_wave_height.value, Some(1.2));
        assert_eq!(obs.wave_height(), &obs.significant_wave_height);
        assert_eq!(obs.swell_direction.value.as_deref(), Some("WSW"));
        assert_eq!(obs.wind_wave_direction.value.as_deref(), Some("SW"));
        assert_eq!(obs.steepness.value.as_deref(), Some("AVERAGE"));
        assert_eq!(obs.dominant_wave_direction.value, Some(250.0));
        assert!(matches!(obs.data()[5], DatumRef::Text(_)));
    }

    #[test]
    fn short_field_list_fills_missing() {
        let obs = WaveSummaryObservation::from_fields("41013", at(), &["1.2"]);
        assert_eq!(obs.significant_wave_height.value, Some(1.2));
        assert!(obs.data().iter().skip(1).all(|d| d.is_missing()));
    }

    #[test]
    fn observations_accumulate_in_order() {
        let mut obs = Observations::new();
        obs.push(1);
        obs.extend([2, 3]);

        assert_eq!(obs.len(), 3);
        assert_eq!(obs[0], 1);
        assert_eq!(obs.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(obs.into_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn realtime_observations_report_dataset() {
        let met: RealtimeObservations = Observations::<MeteorologicalObservation>::new().into();
        assert_eq!(met.dataset(), Dataset::Meteorological);
        assert!(met.is_empty());
        assert!(met.as_wave_summary().is_none());
    }
}
