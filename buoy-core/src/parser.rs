//! Parsing of NDBC `realtime2` text files.
//!
//! ```text
//! #YY  MM DD hh mm WDIR WSPD GST  WVHT   DPD   APD MWD   PRES  ATMP  WTMP  DEWP  VIS PTDY  TIDE
//! #yr  mo dy hr mn degT m/s  m/s     m   sec   sec degT   hPa  degC  degC  degC  nmi  hPa    ft
//! 2024 01 15 12 00 230  5.0  7.0   1.2     9   6.1 250 1015.2  12.3  14.1   8.2   MM -1.2    MM
//! ```
//!
//! The first line must be the `#` column header: the five timestamp columns
//! followed by exactly the dataset's columns. A body without it (an HTML
//! error page, another dataset's file) is rejected as a whole.
//!
//! Other lines starting with `#` are headers. Any data line that does not
//! have exactly five timestamp columns plus one column per schema field, or
//! whose timestamp is not a real UTC date, is skipped and parsing carries on
//! with the next line.

use chrono::{DateTime, TimeZone, Utc};
use tracing::debug;

use crate::error::{NdbcError, Result};
use crate::observation::{Observation, Observations};

const TIMESTAMP_COLUMNS: usize = 5;

/// Parse a realtime file body into observations of type `T`.
///
/// A header-only body yields an empty collection.
pub fn parse_realtime<T: Observation>(station_id: &str, body: &str) -> Result<Observations<T>> {
    check_header::<T>(body)?;

    let mut observations = Observations::new();
    let expected = TIMESTAMP_COLUMNS + T::SCHEMA.len();
    let mut skipped = 0usize;

    for (line_no, line) in body.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != expected {
            debug!(
                line = line_no + 1,
                found = fields.len(),
                expected,
                "Skipping {} line with unexpected column count",
                T::DATASET
            );
            skipped += 1;
            continue;
        }

        let (stamp, values) = fields.split_at(TIMESTAMP_COLUMNS);
        let Some(recorded_at) = parse_timestamp(stamp) else {
            debug!(line = line_no + 1, "Skipping {} line with invalid timestamp", T::DATASET);
            skipped += 1;
            continue;
        };

        observations.push(T::from_fields(station_id, recorded_at, values));
    }

    if skipped > 0 {
        debug!(
            station_id,
            skipped,
            parsed = observations.len(),
            "Finished parsing with skipped lines"
        );
    }

    Ok(observations)
}

fn check_header<T: Observation>(body: &str) -> Result<()> {
    let malformed = |reason| NdbcError::MalformedRealtime {
        dataset: T::DATASET,
        reason,
    };

    let first = body
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .ok_or_else(|| malformed("empty body"))?;
    let header = first
        .strip_prefix('#')
        .ok_or_else(|| malformed("missing column header"))?;

    let columns: Vec<&str> = header.split_whitespace().collect();
    let Some(fields) = columns.get(TIMESTAMP_COLUMNS..) else {
        return Err(malformed("column header too short"));
    };

    let matches = fields.len() == T::SCHEMA.len()
        && fields
            .iter()
            .zip(T::SCHEMA)
            .all(|(column, spec)| column.eq_ignore_ascii_case(spec.column));
    if !matches {
        return Err(malformed("columns do not match the dataset"));
    }
    Ok(())
}

/// `YY MM DD hh mm` in UTC. NDBC writes a four digit year despite the label.
pub(crate) fn parse_timestamp(stamp: &[&str]) -> Option<DateTime<Utc>> {
    let [year, month, day, hour, minute] = stamp else {
        return None;
    };
    let year: i32 = year.parse().ok()?;
    let year = if year < 100 { year + 2000 } else { year };

    Utc.with_ymd_and_hms(
        year,
        month.parse().ok()?,
        day.parse().ok()?,
        hour.parse().ok()?,
        minute.parse().ok()?,
        0,
    )
    .single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::observation::{MeteorologicalObservation, WaveSummaryObservation};

    const MET_BODY: &str = "\
#YY  MM DD hh mm WDIR WSPD GST  WVHT   DPD   APD MWD   PRES  ATMP  WTMP  DEWP  VIS PTDY  TIDE
#yr  mo dy hr mn degT m/s  m/s     m   sec   sec degT   hPa  degC  degC  degC  nmi  hPa    ft
2024 01 15 12 00 230  5.0  7.0   1.2     9   6.1 250 1015.2  12.3  14.1   8.2   MM -1.2    MM
2024 01 15 11 50 220  4.0  6.0    MM    MM    MM  MM 1015.5  12.4  14.1   8.1   MM   MM    MM
2024 01 15 11 40 210  3.5  5.5    MM    MM    MM  MM 1015.6  12.4  14.1   8.0   MM   MM    MM
";

    const SPEC_BODY: &str = "\
#YY  MM DD hh mm WVHT  SwH  SwP  WWH  WWP SwD WWD  STEEPNESS  APD MWD
#yr  mo dy hr mn    m    m  sec    m  sec  -  degT     -      sec degT
2024 01 15 12 00  1.2  1.0 10.0  0.5  4.0 WSW  SW    AVERAGE  6.1 250
2024 01 15 11 00  1.3  1.1 10.0  0.6  4.2  MM  SW      SWELL  6.3  MM
";

    #[test]
    fn parses_every_data_line() {
        let obs = parse_realtime::<MeteorologicalObservation>("41013", MET_BODY).unwrap();

        assert_eq!(obs.len(), 3);
        let first = &obs[0];
        assert_eq!(first.recorded_at, Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap());
        assert_eq!(first.wind_speed.value, Some(5.0));
        assert_eq!(first.wind_speed.unit, "m/s");
        assert_eq!(first.wave_height.value, Some(1.2));
        assert_eq!(obs[1].wave_height.value, None);
        assert_eq!(obs[2].dewpoint_temperature.value, Some(8.0));
    }

    #[test]
    fn parses_wave_summary() {
        let obs = parse_realtime::<WaveSummaryObservation>("41013", SPEC_BODY).unwrap();

        assert_eq!(obs.len(), 2);
        assert_eq!(obs[0].significant_wave_height.value, Some(1.2));
        assert_eq!(obs[0].swell_direction.value.as_deref(), Some("WSW"));
        assert_eq!(obs[1].swell_direction.value, None);
        assert_eq!(obs[1].steepness.value.as_deref(), Some("SWELL"));
        assert_eq!(obs[1].dominant_wave_direction.value, None);
    }

    #[test]
    fn skips_malformed_lines_and_continues() {
        let body = format!(
            "{MET_BODY}2024 01 15 11 30 200 3.0\n\
             2024 13 15 11 20 200 3.0 5.0 MM MM MM MM 1015.6 12.4 14.1 8.0 MM MM MM\n\
             2024 01 15 11 10 190 2.0 4.0 MM MM MM MM 1015.7 12.4 14.1 8.0 MM MM MM\n"
        );
        let obs = parse_realtime::<MeteorologicalObservation>("41013", &body).unwrap();

        assert_eq!(obs.len(), 4);
        assert_eq!(obs[3].wind_direction.value, Some(190.0));
    }

    #[test]
    fn other_dataset_layout_is_rejected() {
        let err = parse_realtime::<MeteorologicalObservation>("41013", SPEC_BODY).unwrap_err();
        assert!(matches!(
            err,
            NdbcError::MalformedRealtime {
                dataset: Dataset::Meteorological,
                ..
            }
        ));
        assert!(parse_realtime::<WaveSummaryObservation>("41013", MET_BODY).is_err());
    }

    #[test]
    fn body_without_column_header_is_rejected() {
        let html = "<!DOCTYPE html><html><body>Station not reporting</body></html>";
        assert!(parse_realtime::<MeteorologicalObservation>("41013", html).is_err());
        assert!(parse_realtime::<MeteorologicalObservation>("41013", "").is_err());
        assert!(parse_realtime::<MeteorologicalObservation>("41013", "#YY MM DD").is_err());

        let headless = MET_BODY.lines().skip(2).collect::<Vec<_>>().join("\n");
        assert!(parse_realtime::<MeteorologicalObservation>("41013", &headless).is_err());
    }

    #[test]
    fn header_only_body_is_empty() {
        let body = MET_BODY.lines().take(2).collect::<Vec<_>>().join("\n");
        let obs = parse_realtime::<MeteorologicalObservation>("41013", &body).unwrap();
        assert!(obs.is_empty());
    }

    #[test]
    fn parsing_is_deterministic() {
        let a = parse_realtime::<MeteorologicalObservation>("41013", MET_BODY).unwrap();
        let b = parse_realtime::<MeteorologicalObservation>("41013", MET_BODY).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn timestamp_accepts_two_digit_year() {
        let ts = parse_timestamp(&["24", "01", "15", "12", "00"]).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap());
        assert!(parse_timestamp(&["2024", "02", "30", "00", "00"]).is_none());
        assert!(parse_timestamp(&["2024", "02"]).is_none());
    }
}
