//! Catalog seeding from CSV files.
//!
//! One record per line, after a header line, `'` as quote character:
//!
//! ```text
//! origin, destination, mode, departure, duration, cost, co2, comfort[, repeat, interval]
//! ```
//!
//! A record with `repeat > 0` stands for `repeat + 1` journeys, each leaving
//! `interval` minutes after the previous one on a 24-hour clock.
//!
//! Malformed records never abort a load: they are skipped and reported in
//! [`SeedReport::errors`].

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use super::Catalog;
use crate::domain::{Journey, Location, Metrics, Minute};

/// Fields every record must carry.
const REQUIRED_FIELDS: usize = 8;

/// Fields a record may carry when it declares a repetition.
const MAX_FIELDS: usize = 10;

/// Largest accepted repeat count: one departure per minute for a whole day.
pub const MAX_REPETITIONS: u32 = 1440;

/// Failure to read the seed source as a whole.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// The file could not be opened
    #[error("cannot open catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The CSV stream itself is unreadable (I/O failure mid-file)
    #[error("cannot read catalog data: {0}")]
    Csv(#[from] csv::Error),
}

/// A record that was skipped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {reason}")]
pub struct RecordError {
    /// Line number in the source (1-based, header included)
    pub line: u64,
    /// Why the record was rejected
    pub reason: String,
}

/// Outcome of a seed load: the catalog plus every skipped record.
#[derive(Debug, Clone, Default)]
pub struct SeedReport {
    pub catalog: Catalog,
    pub errors: Vec<RecordError>,
}

impl SeedReport {
    /// Returns true if every record was accepted.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Load a catalog from a CSV file.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<SeedReport, SeedError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| SeedError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let report = parse_catalog(file)?;
    info!(
        path = %path.display(),
        journeys = report.catalog.len(),
        skipped = report.errors.len(),
        "Loaded catalog"
    );
    Ok(report)
}

/// Parse a catalog from CSV data.
pub fn parse_catalog<R: Read>(reader: R) -> Result<SeedReport, SeedError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .quote(b'\'')
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut report = SeedReport::default();
    let mut record = csv::StringRecord::new();

    loop {
        match reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) if e.is_io_error() => return Err(SeedError::Csv(e)),
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                debug!(line, error = %e, "Skipping unreadable record");
                report.errors.push(RecordError {
                    line,
                    reason: e.to_string(),
                });
                continue;
            }
        }

        let line = record.position().map(|p| p.line()).unwrap_or(0);

        match parse_record(&record) {
            Ok(journeys) => report.catalog.extend(journeys),
            Err(reason) => {
                debug!(line, %reason, "Skipping malformed record");
                report.errors.push(RecordError { line, reason });
            }
        }
    }

    Ok(report)
}

/// Parse one record into its journeys (the first one plus any repetitions).
fn parse_record(record: &csv::StringRecord) -> Result<Vec<Journey>, String> {
    if record.len() < REQUIRED_FIELDS || record.len() > MAX_FIELDS {
        return Err(format!(
            "expected {REQUIRED_FIELDS} to {MAX_FIELDS} fields, but got {}",
            record.len()
        ));
    }

    let origin = parse_location(&record[0], "origin")?;
    let destination = parse_location(&record[1], "destination")?;
    let mode = &record[2];
    let departure = Minute::new(parse_field::<u32>(&record[3], "departure")?);
    let duration = parse_field::<u32>(&record[4], "duration")?;
    let cost = parse_field::<f64>(&record[5], "cost")?;
    let co2 = parse_field::<f64>(&record[6], "co2")?;
    let comfort = parse_field::<u32>(&record[7], "comfort")?;

    let repeat = match record.get(8) {
        Some(s) if !s.is_empty() => parse_field::<u32>(s, "repeat count")?,
        _ => 0,
    };
    if repeat > MAX_REPETITIONS {
        return Err(format!(
            "repeat count {repeat} exceeds the maximum of {MAX_REPETITIONS}"
        ));
    }
    let interval = if repeat > 0 {
        match record.get(9) {
            Some(s) if !s.is_empty() => parse_field::<u32>(s, "interval")?,
            _ => return Err("repeat count given without an interval".to_string()),
        }
    } else {
        0
    };

    let first = Journey::new(
        origin,
        destination,
        mode,
        departure,
        duration,
        Metrics::new(cost, co2, comfort),
    )
    .map_err(|e| e.to_string())?;

    Ok(expand_repetitions(first, repeat, interval))
}

/// Expand a recurring journey into `repeat + 1` departures.
///
/// Departures advance by `interval` minutes on a 24-hour clock, so a
/// service every two hours from 23:00 continues at 01:00.
pub fn expand_repetitions(first: Journey, repeat: u32, interval: u32) -> Vec<Journey> {
    let departures = std::iter::successors(Some(first.departure()), |dep| {
        Some(dep.add_wrapping_day(interval))
    });
    let repeats: Vec<Journey> = departures
        .skip(1)
        .take(repeat as usize)
        .map(|dep| first.with_departure(dep))
        .collect();
    std::iter::once(first).chain(repeats).collect()
}

fn parse_location(s: &str, field: &str) -> Result<Location, String> {
    Location::parse(s).map_err(|e| format!("{field} {s:?}: {e}"))
}

fn parse_field<T>(s: &str, field: &str) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    s.parse::<T>()
        .map_err(|e| format!("cannot parse {field} {s:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "origin,destination,means,departure,duration,cost,co2,confort,repetitions,frequency\n";

    fn parse(body: &str) -> SeedReport {
        let data = format!("{HEADER}{body}");
        parse_catalog(data.as_bytes()).unwrap()
    }

    fn loc(s: &str) -> Location {
        Location::parse(s).unwrap()
    }

    #[test]
    fn parses_simple_records() {
        let report = parse("paris, lyon, train, 480, 120, 50, 10, 3\nLyon,Nice,train,650,180,40,8,4\n");

        assert!(report.is_clean());
        assert_eq!(report.catalog.len(), 2);

        let first = &report.catalog.journeys()[0];
        assert_eq!(first.origin(), &loc("PARIS"));
        assert_eq!(first.destination(), &loc("LYON"));
        assert_eq!(first.mode(), "train");
        assert_eq!(first.departure(), Minute::new(480));
        assert_eq!(first.arrival(), Minute::new(600));
        assert_eq!(first.cost(), 50.0);
        assert_eq!(first.comfort(), 3);
    }

    #[test]
    fn quoted_fields_use_single_quote() {
        let report = parse("'Paris, Gare de Lyon',Lyon,train,480,120,50,10,3\n");
        assert!(report.is_clean());
        assert_eq!(
            report.catalog.journeys()[0].origin(),
            &loc("PARIS, GARE DE LYON")
        );
    }

    #[test]
    fn repetitions_expand() {
        let report = parse("PARIS,LYON,train,480,120,50,10,3,2,60\n");

        assert!(report.is_clean());
        let deps: Vec<u32> = report
            .catalog
            .journeys()
            .iter()
            .map(|j| j.departure().value())
            .collect();
        assert_eq!(deps, vec![480, 540, 600]);
    }

    #[test]
    fn repetitions_wrap_over_midnight() {
        let report = parse("PARIS,LYON,bus,1380,60,20,5,1,2,60\n");

        let deps: Vec<u32> = report
            .catalog
            .journeys()
            .iter()
            .map(|j| j.departure().value())
            .collect();
        assert_eq!(deps, vec![1380, 0, 60]);
    }

    #[test]
    fn zero_repeat_and_blank_optional_fields() {
        let report = parse("PARIS,LYON,train,480,120,50,10,3,0\nPARIS,LYON,train,500,120,50,10,3,,\n");
        assert!(report.is_clean());
        assert_eq!(report.catalog.len(), 2);
    }

    #[test]
    fn malformed_records_are_skipped() {
        let report = parse(
            "PARIS,LYON,train,480,120,50,10,3\n\
             PARIS,LYON,train,eight,120,50,10,3\n\
             PARIS,LYON,train\n\
             LYON,NICE,train,650,180,40,8,4\n",
        );

        assert_eq!(report.catalog.len(), 2);
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.errors[0].line, 3);
        assert!(report.errors[0].reason.contains("departure"));
        assert_eq!(report.errors[1].line, 4);
        assert!(report.errors[1].reason.contains("fields"));
    }

    #[test]
    fn repeat_without_interval_is_rejected() {
        let report = parse("PARIS,LYON,train,480,120,50,10,3,2\n");
        assert!(report.catalog.is_empty());
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].reason.contains("interval"));
    }

    #[test]
    fn oversized_repeat_is_skipped() {
        let report = parse(
            "A,B,train,0,1,1,1,1,4294967295,1\n\
             C,D,train,0,1,1,1,1\n",
        );

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].line, 2);
        assert!(report.errors[0].reason.contains("repeat count"));
        assert_eq!(report.catalog.len(), 1);
        assert_eq!(report.catalog.journeys()[0].origin(), &loc("C"));
    }

    #[test]
    fn largest_repeat_is_accepted() {
        let report = parse(&format!("A,B,train,0,1,1,1,1,{MAX_REPETITIONS},1\n"));
        assert!(report.is_clean());
        assert_eq!(report.catalog.len(), MAX_REPETITIONS as usize + 1);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let report = parse("PARIS,LYON,train,480,120,-3,10,3\n ,LYON,train,480,120,3,10,3\n");
        assert!(report.catalog.is_empty());
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn empty_input_yields_empty_catalog() {
        let report = parse_catalog("".as_bytes()).unwrap();
        assert!(report.catalog.is_empty());
        assert!(report.is_clean());
    }

    #[test]
    fn expand_zero_repetitions() {
        let j = Journey::new(
            loc("A"),
            loc("B"),
            "train",
            Minute::new(100),
            10,
            Metrics::new(1.0, 1.0, 1),
        )
        .unwrap();
        let expanded = expand_repetitions(j.clone(), 0, 30);
        assert_eq!(expanded, vec![j]);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agency.csv");
        let mut file = File::create(&path).unwrap();
        write!(file, "{HEADER}PARIS,LYON,train,480,120,50,10,3\n").unwrap();

        let report = load_catalog(&path).unwrap();
        assert_eq!(report.catalog.len(), 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_catalog(dir.path().join("nope.csv"));
        assert!(matches!(result, Err(SeedError::Io { .. })));
    }
}
