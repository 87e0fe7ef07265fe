use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{NdbcError, Result};
use crate::model::parse_float;

/// An active station from the NDBC directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub station_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Meters above sea level, when published.
    pub elevation: Option<f64>,
    pub owner: String,
    pub program: String,
    /// Platform kind, e.g. `buoy`, `fixed`, `dart`, `other`.
    pub station_type: String,
    pub has_meteorological: bool,
    pub has_currents: bool,
    pub has_water_quality: bool,
    pub is_dart: bool,
}

impl Station {
    /// Case-insensitive match against id and name.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.station_id.to_lowercase().contains(&needle)
            || self.name.to_lowercase().contains(&needle)
    }
}

#[derive(Debug, Deserialize)]
struct StationsDocument {
    #[serde(rename = "station", default)]
    stations: Vec<RawStation>,
}

#[derive(Debug, Deserialize)]
struct RawStation {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@lat", default)]
    lat: String,
    #[serde(rename = "@lon", default)]
    lon: String,
    #[serde(rename = "@elev", default)]
    elev: Option<String>,
    #[serde(rename = "@name", default)]
    name: String,
    #[serde(rename = "@owner", default)]
    owner: String,
    #[serde(rename = "@pgm", default)]
    pgm: String,
    #[serde(rename = "@type", default)]
    kind: String,
    #[serde(rename = "@met", default)]
    met: Option<String>,
    #[serde(rename = "@currents", default)]
    currents: Option<String>,
    #[serde(rename = "@waterquality", default)]
    waterquality: Option<String>,
    #[serde(rename = "@dart", default)]
    dart: Option<String>,
}

fn flag(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("y"))
}

impl RawStation {
    fn into_station(self) -> Option<Station> {
        let (Some(latitude), Some(longitude)) = (parse_float(&self.lat), parse_float(&self.lon))
        else {
            debug!(station_id = %self.id, "Skipping station without usable coordinates");
            return None;
        };

        Some(Station {
            station_id: self.id.trim().to_string(),
            name: self.name.trim().to_string(),
            latitude,
            longitude,
            elevation: self.elev.as_deref().and_then(parse_float),
            has_meteorological: flag(self.met.as_deref()),
            has_currents: flag(self.currents.as_deref()),
            has_water_quality: flag(self.waterquality.as_deref()),
            is_dart: flag(self.dart.as_deref()),
            owner: self.owner,
            program: self.pgm,
            station_type: self.kind,
        })
    }
}

/// Parse `activestations.xml`.
///
/// Records without a numeric latitude/longitude are skipped; a body that is
/// not a `<stations>` document is an error.
pub fn parse_active_stations(xml: &str) -> Result<Vec<Station>> {
    if !xml.contains("<stations") {
        return Err(NdbcError::UnexpectedDocument("stations"));
    }
    let doc: StationsDocument = quick_xml::de::from_str(xml)?;
    Ok(doc.stations.into_iter().filter_map(RawStation::into_station).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATIONS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<stations created="2024-01-15T12:40:01UTC" count="3">
  <station id="41013" lat="33.441" lon="-77.764" elev="0" name="Frying Pan Shoals, NC" owner="NDBC" pgm="NDBC Meteorological/Ocean" type="buoy" met="y" currents="n" waterquality="n" dart="n"/>
  <station id="0y2w3" lat="44.794" lon="-87.313" elev="179" name="Sturgeon Bay CG Station, WI" owner="U.S.C.G. Marine Reporting Stations" pgm="IOOS Partners" type="fixed" met="y" currents="n" waterquality="n"/>
  <station id="21413" lat="30.486" lon="152.124" name="SOUTHEAST TOKYO - 700NM ESE of Tokyo, JP" owner="NDBC" pgm="Tsunami" type="dart" met="n" currents="n" waterquality="n" dart="y"/>
  <station id="bad01" lat="" lon="-70.0" name="Broken &amp; Unplaced" owner="X" pgm="Y" type="other"/>
</stations>
"#;

    #[test]
    fn parses_station_records() {
        let stations = parse_active_stations(STATIONS_XML).unwrap();
        assert_eq!(stations.len(), 3);

        let first = &stations[0];
        assert_eq!(first.station_id, "41013");
        assert_eq!(first.name, "Frying Pan Shoals, NC");
        assert_eq!(first.latitude, 33.441);
        assert_eq!(first.longitude, -77.764);
        assert_eq!(first.elevation, Some(0.0));
        assert_eq!(first.station_type, "buoy");
        assert!(first.has_meteorological);
        assert!(!first.is_dart);
    }

    #[test]
    fn missing_optional_attributes_default() {
        let stations = parse_active_stations(STATIONS_XML).unwrap();

        assert!(!stations[1].is_dart);
        assert_eq!(stations[2].elevation, None);
        assert!(stations[2].is_dart);
        assert_eq!(stations[2].program, "Tsunami");
    }

    #[test]
    fn empty_directory_is_ok() {
        let stations =
            parse_active_stations(r#"<stations created="x" count="0"></stations>"#).unwrap();
        assert!(stations.is_empty());
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(parse_active_stations("<html><body>oops").is_err());
    }

    #[test]
    fn station_search_is_case_insensitive() {
        let stations = parse_active_stations(STATIONS_XML).unwrap();
        assert!(stations[0].matches("frying"));
        assert!(stations[0].matches("4101"));
        assert!(!stations[0].matches("tokyo"));
    }
}
