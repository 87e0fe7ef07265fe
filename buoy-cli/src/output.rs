//! Table rendering for the `observations`, `forecast` and `stations` commands.

use buoy_core::{DatumRef, MeteorologicalPredictions, Observation, Observations, Station};
use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

fn value_text(datum: DatumRef<'_>) -> String {
    match datum {
        DatumRef::Float(d) => d.value.map(|v| v.to_string()),
        DatumRef::Text(d) => d.value.clone(),
    }
    .unwrap_or_else(|| "-".to_string())
}

fn finish(mut table: Table) -> String {
    table
        .with(Style::psql())
        .modify(Columns::new(1..), Alignment::right());
    table.to_string()
}

/// Header row of column names, a units row, then one row per record.
///
/// Columns follow the dataset schema, so the table is assembled row by row
/// rather than derived.
pub fn observations_table<T: Observation>(observations: &Observations<T>, limit: usize) -> String {
    let mut builder = Builder::default();
    builder.push_record(
        std::iter::once("UTC".to_string()).chain(T::SCHEMA.iter().map(|f| f.column.to_string())),
    );
    builder.push_record(
        std::iter::once(String::new()).chain(T::SCHEMA.iter().map(|f| f.unit.to_string())),
    );
    for obs in observations.iter().take(limit) {
        builder.push_record(
            std::iter::once(obs.recorded_at().format(TIME_FORMAT).to_string())
                .chain(obs.data().into_iter().map(value_text)),
        );
    }

    finish(builder.build())
}

#[derive(Tabled)]
struct PredictionRow {
    #[tabled(rename = "UTC")]
    valid_at: String,
    #[tabled(rename = "WIND")]
    wind_speed: String,
    #[tabled(rename = "GUST")]
    wind_gust: String,
    #[tabled(rename = "DIR")]
    wind_direction: String,
    #[tabled(rename = "WAVES")]
    wave_height: String,
}

pub fn predictions_table(predictions: &MeteorologicalPredictions) -> String {
    let rows = predictions.iter().map(|p| PredictionRow {
        valid_at: p.valid_at.format(TIME_FORMAT).to_string(),
        wind_speed: p.wind_speed.to_string(),
        wind_gust: p.wind_gust.to_string(),
        wind_direction: p.wind_direction.to_string(),
        wave_height: p.wave_height.to_string(),
    });

    finish(Table::new(rows))
}

#[derive(Tabled)]
struct StationRow<'a> {
    #[tabled(rename = "ID")]
    id: &'a str,
    #[tabled(rename = "LAT")]
    latitude: String,
    #[tabled(rename = "LON")]
    longitude: String,
    #[tabled(rename = "TYPE")]
    station_type: &'a str,
    #[tabled(rename = "NAME")]
    name: &'a str,
}

pub fn stations_table(stations: &[&Station]) -> String {
    let rows = stations.iter().map(|s| StationRow {
        id: &s.station_id,
        latitude: format!("{:.3}", s.latitude),
        longitude: format!("{:.3}", s.longitude),
        station_type: &s.station_type,
        name: &s.name,
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    table.to_string()
}
