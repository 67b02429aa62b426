pub mod records;

use lanemark_protocol::Breakpoint;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::{Lane, LaneKey, disambiguate_years};
use crate::scale::{ScaleError, YearScale};
pub use records::{RawRecord, Record, RecordIssue, RecordProblem, TrackDecl, validate_records};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("top level must be a record array or an object with \"records\"")]
    Shape,
    #[error("catalog object has no \"records\" array")]
    MissingRecords,
    #[error("invalid \"{field}\": {source}")]
    Section {
        field: &'static str,
        source: serde_json::Error,
    },
    #[error("invalid breakpoints: {0}")]
    Scale(#[from] ScaleError),
    #[error("{} problem(s) found, first: {}", .0.len(), .0[0])]
    Invalid(Vec<RecordIssue>),
}

/// A validated timeline: its year axis, records, and the lanes they fall into.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub scale: YearScale,
    pub records: Vec<Record>,
    /// In display order, each with same-year entries already spread apart.
    pub lanes: Vec<Lane>,
}

impl Catalog {
    pub fn lane(&self, key: &LaneKey) -> Option<&Lane> {
        self.lanes.iter().find(|lane| &lane.key == key)
    }

    pub fn lane_keys(&self) -> impl Iterator<Item = &LaneKey> {
        self.lanes.iter().map(|lane| &lane.key)
    }

    /// Full record behind a placed entry.
    pub fn record(&self, work_id: &str) -> Option<&Record> {
        self.records.iter().find(|r| &*r.work_id == work_id)
    }
}

/// Parse and validate a catalog file.
///
/// The file is either a bare array of records or an object with `records`
/// and optional `breakpoints` and `tracks`.
///
/// Without explicit breakpoints the year axis spans the records' years
/// uniformly. Lanes follow the declared track order, then first appearance;
/// declared lanes without records are dropped.
pub fn parse_catalog(data: &[u8]) -> Result<Catalog, CatalogError> {
    let (breakpoints, tracks, raw) = match serde_json::from_slice::<Value>(data)? {
        Value::Array(records) => (Vec::new(), Vec::new(), records),
        Value::Object(mut doc) => {
            if !doc.contains_key("records") {
                return Err(CatalogError::MissingRecords);
            }
            let breakpoints: Vec<Breakpoint> = section(&mut doc, "breakpoints")?;
            let tracks: Vec<TrackDecl> = section(&mut doc, "tracks")?;
            let records: Vec<Value> = section(&mut doc, "records")?;
            (breakpoints, tracks, records)
        }
        _ => return Err(CatalogError::Shape),
    };

    let records = validate_records(raw, &tracks).map_err(CatalogError::Invalid)?;

    let scale = if breakpoints.is_empty() {
        let first = records.iter().map(|r| r.year).fold(f64::INFINITY, f64::min);
        let last = records
            .iter()
            .map(|r| r.year)
            .fold(f64::NEG_INFINITY, f64::max);
        if first.is_finite() && last.is_finite() {
            YearScale::uniform(first, last)?
        } else {
            YearScale::uniform(0.0, 0.0)?
        }
    } else {
        YearScale::new(breakpoints)?
    };

    let lanes = group_into_lanes(&records, &tracks);
    tracing::debug!(
        records = records.len(),
        lanes = lanes.len(),
        "catalog loaded"
    );

    Ok(Catalog {
        scale,
        records,
        lanes,
    })
}

/// Decode one top-level field of a catalog document; absent means empty.
fn section<T: DeserializeOwned + Default>(
    doc: &mut Map<String, Value>,
    field: &'static str,
) -> Result<T, CatalogError> {
    match doc.remove(field) {
        None => Ok(T::default()),
        Some(value) => {
            serde_json::from_value(value).map_err(|source| CatalogError::Section { field, source })
        }
    }
}

fn group_into_lanes(records: &[Record], tracks: &[TrackDecl]) -> Vec<Lane> {
    let mut lanes: Vec<Lane> = tracks
        .iter()
        .flat_map(|t| {
            t.sub_tracks
                .iter()
                .map(|sub| Lane::new(LaneKey::new(t.name.clone(), sub.clone())))
        })
        .collect();

    for record in records {
        let key = record.lane_key();
        let slot = match lanes.iter().position(|lane| lane.key == key) {
            Some(i) => i,
            None => {
                // Undeclared sub-track: keep it next to its track's other lanes.
                let at = lanes
                    .iter()
                    .rposition(|lane| lane.key.track == key.track)
                    .map_or(lanes.len(), |i| i + 1);
                lanes.insert(at, Lane::new(key));
                at
            }
        };
        lanes[slot].entries.push(record.entry());
    }

    lanes.retain(|lane| !lane.entries.is_empty());
    for lane in &mut lanes {
        disambiguate_years(&mut lane.entries);
    }
    lanes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::YearPosition;

    #[test]
    fn bare_array_gets_uniform_scale() {
        let data = br#"[
            {"work_id": "a", "year": 2000, "broad_track": "T", "sub_track": "S",
             "authors": "X, Y", "short_title": "A", "full_title": "A"},
            {"work_id": "b", "year": 2020, "broad_track": "T", "sub_track": "S",
             "authors": "X, Y", "short_title": "B", "full_title": "B"}
        ]"#;
        let catalog = parse_catalog(data).unwrap();
        assert_eq!(catalog.lanes.len(), 1);
        assert_eq!(catalog.scale.percent_for_year(2010.0), 50.0);
    }

    #[test]
    fn empty_catalog_is_valid() {
        let catalog = parse_catalog(b"[]").unwrap();
        assert!(catalog.lanes.is_empty());
        assert!(catalog.records.is_empty());
    }

    #[test]
    fn lanes_follow_declared_order_then_appearance() {
        let data = br#"{
            "tracks": [
                {"name": "Philosophy", "sub_tracks": ["Aesthetics", "Phenomenology"]},
                {"name": "Architecture"}
            ],
            "records": [
                {"work_id": "1", "year": 2001, "broad_track": "Architecture", "sub_track": "Theory",
                 "authors": "A, B", "short_title": "1", "full_title": "1"},
                {"work_id": "2", "year": 2002, "broad_track": "Philosophy", "sub_track": "Phenomenology",
                 "authors": "A, B", "short_title": "2", "full_title": "2"},
                {"work_id": "3", "year": 2003, "broad_track": "Architecture", "sub_track": "Practice",
                 "authors": "A, B", "short_title": "3", "full_title": "3"},
                {"work_id": "4", "year": 2003, "broad_track": "Architecture", "sub_track": "Practice",
                 "authors": "A, B", "short_title": "4", "full_title": "4"}
            ]
        }"#;
        let catalog = parse_catalog(data).unwrap();
        let keys: Vec<String> = catalog.lane_keys().map(ToString::to_string).collect();
        assert_eq!(
            keys,
            vec![
                "Philosophy::Phenomenology",
                "Architecture::Theory",
                "Architecture::Practice"
            ]
        );

        let practice = catalog
            .lane(&LaneKey::new("Architecture", "Practice"))
            .unwrap();
        assert_eq!(practice.entries[0].year, 2003.0);
        assert!((practice.entries[1].year - 2003.3).abs() < 1e-9);
    }

    #[test]
    fn reports_all_invalid_records() {
        let data = br#"[
            {"work_id": "a", "year": 2000, "broad_track": "T", "sub_track": "S",
             "authors": "X, Y", "short_title": "A"},
            {"work_id": "a", "year": "soon", "broad_track": "T", "sub_track": "S",
             "authors": "X, Y", "short_title": "A", "full_title": "A"}
        ]"#;
        let Err(CatalogError::Invalid(issues)) = parse_catalog(data) else {
            panic!("expected validation issues");
        };
        assert_eq!(issues.len(), 3);
        assert_eq!(issues[0].problem, RecordProblem::Missing("full_title"));
    }

    #[test]
    fn bad_breakpoints_are_rejected() {
        let data = br#"{"breakpoints": [{"year": 2010, "pos": 50}, {"year": 2000, "pos": 60}],
                        "records": []}"#;
        assert!(matches!(parse_catalog(data), Err(CatalogError::Scale(_))));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(parse_catalog(b"{"), Err(CatalogError::Json(_))));
    }

    #[test]
    fn wrong_shapes_name_the_problem() {
        assert!(matches!(parse_catalog(b"42"), Err(CatalogError::Shape)));
        assert!(matches!(
            parse_catalog(br#"{"breakpoints": []}"#),
            Err(CatalogError::MissingRecords)
        ));

        let err = parse_catalog(br#"{"breakpoints": [{"year": "2010", "pos": 5}], "records": []}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Section {
                field: "breakpoints",
                ..
            }
        ));
        let message = err.to_string();
        assert!(message.starts_with("invalid \"breakpoints\": invalid type"), "{message}");

        assert!(matches!(
            parse_catalog(br#"{"tracks": {"name": "T"}, "records": []}"#),
            Err(CatalogError::Section { field: "tracks", .. })
        ));
    }

    #[test]
    fn mistyped_record_does_not_hide_the_others() {
        let data = br#"{"records": [
            {"work_id": 7, "year": 2000, "broad_track": "T", "sub_track": "S",
             "authors": "X, Y", "short_title": "A", "full_title": "A"},
            {"work_id": "b", "year": 2001, "broad_track": "T", "sub_track": "S",
             "authors": "X, Y", "short_title": "B"}
        ]}"#;
        let Err(CatalogError::Invalid(issues)) = parse_catalog(data) else {
            panic!("expected validation issues");
        };
        assert_eq!(issues.len(), 2);
        assert!(matches!(issues[0].problem, RecordProblem::Malformed(_)));
        assert_eq!(issues[1].problem, RecordProblem::Missing("full_title"));
    }

    #[test]
    fn records_are_looked_up_by_id() {
        let data = r#"[
            {"work_id": "atm", "year": 1993, "broad_track": "Philosophy", "sub_track": "Aesthetics",
             "authors": "Böhme, Gernot", "short_title": "Atmosphere",
             "full_title": "Atmosphere as the Fundamental Concept of a New Aesthetics",
             "venue": "Thesis Eleven"}
        ]"#
        .as_bytes();
        let catalog = parse_catalog(data).unwrap();
        let record = catalog.record("atm").unwrap();
        assert_eq!(record.venue.as_deref(), Some("Thesis Eleven"));
        assert!(catalog.record("missing").is_none());
    }
}
