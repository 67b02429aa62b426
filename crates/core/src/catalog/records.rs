use std::collections::HashMap;

use lanemark_protocol::{Entry, SharedStr};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::model::LaneKey;

/// One record as it appears in the dataset file. Every field is optional
/// here so that validation can report all problems at once instead of
/// failing on the first missing key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    pub work_id: Option<String>,
    pub year: Option<Value>,
    pub broad_track: Option<String>,
    pub sub_track: Option<String>,
    pub authors: Option<String>,
    pub short_title: Option<String>,
    pub full_title: Option<String>,
    pub venue: Option<String>,
    #[serde(alias = "doi_or_url")]
    pub url: Option<String>,
}

/// A validated dataset record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub work_id: SharedStr,
    pub year: f64,
    pub broad_track: SharedStr,
    pub sub_track: SharedStr,
    pub authors: SharedStr,
    pub short_title: SharedStr,
    pub full_title: SharedStr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<SharedStr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<SharedStr>,
}

impl Record {
    pub fn lane_key(&self) -> LaneKey {
        LaneKey::new(self.broad_track.clone(), self.sub_track.clone())
    }

    /// The label drawn for this record: short title over the citation.
    pub fn entry(&self) -> Entry {
        Entry {
            id: self.work_id.clone(),
            year: self.year,
            title: self.short_title.clone(),
            authors: self.authors.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordProblem {
    #[error("malformed record: {0}")]
    Malformed(String),
    #[error("missing field '{0}'")]
    Missing(&'static str),
    #[error("'{0}' is empty")]
    Blank(&'static str),
    #[error("'year' must be a number, got {0}")]
    BadYear(String),
    #[error("duplicate work_id (first seen at entry {first})")]
    Duplicate { first: usize },
    #[error("unknown broad_track '{0}'")]
    UnknownTrack(String),
    #[error("unknown sub_track '{sub_track}' for '{track}'")]
    UnknownSubTrack { track: String, sub_track: String },
}

/// A problem with one record; `position` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordIssue {
    pub position: usize,
    pub work_id: Option<String>,
    pub problem: RecordProblem,
}

impl std::fmt::Display for RecordIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let id = self.work_id.as_deref().unwrap_or("?");
        write!(f, "entry {} ({id}): {}", self.position, self.problem)
    }
}

/// Declared tracks a catalog may restrict records to. An empty sub-track
/// list accepts any sub-track.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrackDecl {
    pub name: SharedStr,
    #[serde(default)]
    pub sub_tracks: Vec<SharedStr>,
}

/// Check every record and convert the valid set.
///
/// Records are decoded one at a time, so a record of the wrong shape is
/// reported alongside the others instead of aborting the whole file.
/// Returns all issues found, in record order, if any record is invalid.
pub fn validate_records(
    values: Vec<Value>,
    tracks: &[TrackDecl],
) -> Result<Vec<Record>, Vec<RecordIssue>> {
    let mut issues = Vec::new();
    let mut records = Vec::with_capacity(values.len());
    let mut seen: HashMap<SharedStr, usize> = HashMap::new();

    for (index, value) in values.into_iter().enumerate() {
        let position = index + 1;
        let raw = match RawRecord::deserialize(&value) {
            Ok(raw) => raw,
            Err(e) => {
                issues.push(RecordIssue {
                    position,
                    work_id: value
                        .get("work_id")
                        .map(|id| id.as_str().map_or_else(|| id.to_string(), str::to_owned)),
                    problem: RecordProblem::Malformed(e.to_string()),
                });
                continue;
            }
        };
        let label = raw.work_id.clone();
        let mut problems = Vec::new();

        let work_id = required(raw.work_id, "work_id", &mut problems);
        let year = parse_year(raw.year.as_ref(), &mut problems);
        let broad_track = required(raw.broad_track, "broad_track", &mut problems);
        let sub_track = required(raw.sub_track, "sub_track", &mut problems);
        let authors = required(raw.authors, "authors", &mut problems);
        let short_title = required(raw.short_title, "short_title", &mut problems);
        let full_title = required(raw.full_title, "full_title", &mut problems);

        if !work_id.is_empty() {
            match seen.get(&work_id) {
                Some(&first) => problems.push(RecordProblem::Duplicate { first }),
                None => {
                    seen.insert(work_id.clone(), position);
                }
            }
        }

        if !tracks.is_empty() && !broad_track.is_empty() {
            match tracks.iter().find(|t| t.name == broad_track) {
                None => problems.push(RecordProblem::UnknownTrack(broad_track.to_string())),
                Some(decl)
                    if !sub_track.is_empty()
                        && !decl.sub_tracks.is_empty()
                        && !decl.sub_tracks.contains(&sub_track) =>
                {
                    problems.push(RecordProblem::UnknownSubTrack {
                        track: broad_track.to_string(),
                        sub_track: sub_track.to_string(),
                    });
                }
                Some(_) => {}
            }
        }

        if problems.is_empty() {
            records.push(Record {
                work_id,
                year,
                broad_track,
                sub_track,
                authors,
                short_title,
                full_title,
                venue: raw.venue.map(SharedStr::from),
                url: raw.url.map(SharedStr::from),
            });
        } else {
            issues.extend(problems.into_iter().map(|problem| RecordIssue {
                position,
                work_id: label.clone(),
                problem,
            }));
        }
    }

    if issues.is_empty() {
        Ok(records)
    } else {
        Err(issues)
    }
}

fn required(
    value: Option<String>,
    field: &'static str,
    problems: &mut Vec<RecordProblem>,
) -> SharedStr {
    match value {
        None => {
            problems.push(RecordProblem::Missing(field));
            SharedStr::default()
        }
        Some(s) if s.trim().is_empty() => {
            problems.push(RecordProblem::Blank(field));
            SharedStr::default()
        }
        Some(s) => SharedStr::from(s),
    }
}

fn parse_year(value: Option<&Value>, problems: &mut Vec<RecordProblem>) -> f64 {
    match value {
        None => {
            problems.push(RecordProblem::Missing("year"));
            0.0
        }
        Some(v) => match v.as_f64() {
            Some(year) if year.is_finite() => year,
            _ => {
                problems.push(RecordProblem::BadYear(v.to_string()));
                0.0
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(id: &str, year: f64) -> Value {
        json!({
            "work_id": id,
            "year": year,
            "broad_track": "Philosophy",
            "sub_track": "Aesthetics",
            "authors": "Böhme, Gernot",
            "short_title": id,
            "full_title": format!("{id} (full)"),
        })
    }

    #[test]
    fn valid_records_convert() {
        let mut aes = raw("aes", 2013.0);
        aes["venue"] = json!("Thesis Eleven");
        aes["doi_or_url"] = json!("https://doi.org/10.1177/0725513693036001007");
        let records = validate_records(vec![raw("atm", 1993.0), aes], &[]).unwrap();
        assert_eq!(records.len(), 2);
        let entry = records[0].entry();
        assert_eq!(entry.id, "atm");
        assert_eq!(entry.title, "atm");
        assert_eq!(entry.year, 1993.0);
        assert_eq!(records[1].lane_key(), LaneKey::new("Philosophy", "Aesthetics"));

        let detail = serde_json::to_value(&records[1]).unwrap();
        assert_eq!(detail["full_title"], "aes (full)");
        assert_eq!(detail["venue"], "Thesis Eleven");
        assert!(detail["url"].as_str().unwrap().starts_with("https://doi.org/"));
        assert!(serde_json::to_value(&records[0]).unwrap().get("venue").is_none());
    }

    #[test]
    fn collects_every_problem() {
        let mut missing = raw("b", 2000.0);
        missing.as_object_mut().unwrap().remove("authors");
        missing["short_title"] = json!("  ");
        let mut bad_year = raw("c", 2000.0);
        bad_year["year"] = json!("2001");

        let issues =
            validate_records(vec![raw("a", 2000.0), missing, bad_year, raw("a", 2001.0)], &[])
                .unwrap_err();
        let problems: Vec<(usize, RecordProblem)> =
            issues.iter().map(|i| (i.position, i.problem.clone())).collect();
        assert_eq!(
            problems,
            vec![
                (2, RecordProblem::Missing("authors")),
                (2, RecordProblem::Blank("short_title")),
                (3, RecordProblem::BadYear("\"2001\"".to_string())),
                (4, RecordProblem::Duplicate { first: 1 }),
            ]
        );
        assert_eq!(
            issues[0].to_string(),
            "entry 2 (b): missing field 'authors'"
        );
    }

    #[test]
    fn wrongly_typed_record_is_one_issue_among_many() {
        let mut numeric_id = raw("n", 2001.0);
        numeric_id["work_id"] = json!(17);
        let mut blank = raw("b", 2002.0);
        blank["full_title"] = json!("");

        let issues = validate_records(
            vec![raw("a", 2000.0), numeric_id, json!("not a record"), blank],
            &[],
        )
        .unwrap_err();
        assert_eq!(issues.len(), 3);

        assert_eq!(issues[0].position, 2);
        assert_eq!(issues[0].work_id.as_deref(), Some("17"));
        let RecordProblem::Malformed(message) = &issues[0].problem else {
            panic!("expected a malformed record, got {:?}", issues[0].problem);
        };
        assert!(message.contains("expected a string"), "{message}");

        assert_eq!(issues[1].position, 3);
        assert_eq!(issues[1].work_id, None);
        assert!(matches!(issues[1].problem, RecordProblem::Malformed(_)));

        assert_eq!(issues[2].position, 4);
        assert_eq!(issues[2].problem, RecordProblem::Blank("full_title"));
    }

    #[test]
    fn declared_tracks_restrict_records() {
        let tracks = vec![
            TrackDecl {
                name: "Philosophy".into(),
                sub_tracks: vec!["Phenomenology".into()],
            },
            TrackDecl {
                name: "Urban Studies".into(),
                sub_tracks: vec![],
            },
        ];
        let mut urban = raw("u", 2010.0);
        urban["broad_track"] = json!("Urban Studies");
        urban["sub_track"] = json!("Anything");
        let mut unknown = raw("x", 2010.0);
        unknown["broad_track"] = json!("Computation");

        let issues = validate_records(vec![raw("p", 2010.0), urban, unknown], &tracks).unwrap_err();
        assert_eq!(issues.len(), 2);
        assert!(matches!(
            issues[0].problem,
            RecordProblem::UnknownSubTrack { .. }
        ));
        assert_eq!(
            issues[1].problem,
            RecordProblem::UnknownTrack("Computation".to_string())
        );
    }
}
