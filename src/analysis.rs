//! From an extraction reply to a scored report.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::extract::{extract_structured, Mapping};
use crate::scoring::{compute_score, ScoreResult, VitalStats};
use crate::standards::{Gender, StandardsStore};

const DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%Y-%m-%d"];

/// Keys that mark an object as a report envelope rather than bare measurements.
const REPORT_KEYS: &[&str] = &["vital_stats", "user_uid", "report_date"];

/// The structured payload returned by the extraction service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedReport {
    pub user_uid: Option<String>,
    pub report_date: Option<NaiveDate>,
    pub vital_stats: VitalStats,
}

impl ExtractedReport {
    /// Build a report from a recovered object. Hands the object back when it
    /// has no `vital_stats` object.
    pub fn from_mapping(mut mapping: Mapping) -> Result<Self, Mapping> {
        let vital_stats = match mapping.remove("vital_stats") {
            Some(Value::Object(stats)) => stats,
            other => {
                if let Some(value) = other {
                    mapping.insert("vital_stats".to_string(), value);
                }
                return Err(mapping);
            }
        };

        let user_uid = mapping
            .get("user_uid")
            .and_then(Value::as_str)
            .map(str::to_string);
        let report_date = mapping
            .get("report_date")
            .and_then(Value::as_str)
            .and_then(parse_report_date);

        Ok(Self {
            user_uid,
            report_date,
            vital_stats,
        })
    }

    /// Accept either a report envelope or a bare measurements object.
    ///
    /// Returns `None` for an envelope without a usable `vital_stats` object,
    /// such as `{"user_uid": "x", "vital_stats": null}`.
    pub fn from_envelope_or_bare(mapping: Mapping) -> Option<Self> {
        match Self::from_mapping(mapping) {
            Ok(report) => Some(report),
            Err(mapping) if REPORT_KEYS.iter().any(|key| mapping.contains_key(*key)) => None,
            Err(mapping) => Some(Self::bare(mapping)),
        }
    }

    /// A report consisting only of measurements.
    pub fn bare(vital_stats: VitalStats) -> Self {
        Self {
            user_uid: None,
            report_date: None,
            vital_stats,
        }
    }
}

fn parse_report_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// A scored report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub report: ExtractedReport,
    pub result: ScoreResult,
}

impl Analysis {
    pub fn new(report: ExtractedReport, store: &StandardsStore, gender: Gender) -> Self {
        let result = compute_score(store, &report.vital_stats, gender);
        Self { report, result }
    }
}

/// Recover the report from an extraction reply and score it.
///
/// Returns `None` when no object can be recovered or it lacks `vital_stats`;
/// the caller decides whether to retry or show a degraded result.
pub fn analyze_response(text: &str, store: &StandardsStore, gender: Gender) -> Option<Analysis> {
    let Some(mapping) = extract_structured(text) else {
        tracing::warn!("No structured data in extraction reply");
        return None;
    };

    match ExtractedReport::from_mapping(mapping) {
        Ok(report) => Some(Analysis::new(report, store, gender)),
        Err(_) => {
            tracing::warn!("Extraction reply has no vital_stats object");
            None
        }
    }
}
