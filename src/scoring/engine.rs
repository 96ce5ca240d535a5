use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

use super::grade::Grade;
use super::legacy::legacy_grade;
use super::reference::ReferenceRange;
use super::risk::{assess_blood_pressure, assess_compound_risk, DIASTOLIC_KEY, SYSTOLIC_KEY};
use super::value::{display_raw, normalize, MeasurementValue};
use super::VitalStats;
use crate::standards::{Gender, StandardEntry, StandardsStore};

pub const MAX_SCORE: u32 = 100;
pub const MIN_SCORE: u32 = 1;

const GLUCOSE_KEY: &str = "glucose";
const LDL_KEY: &str = "ldl_cholesterol";

/// One deduction event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deduction {
    pub source: String, // canonical metric key, "blood_pressure" or "compound_risk"
    pub grade: Grade,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub score: u32,
    pub warnings: Vec<String>,
    pub deductions: Vec<Deduction>,
}

impl ScoreResult {
    pub fn total_deduction(&self) -> u32 {
        self.deductions.iter().map(|d| d.points).sum()
    }
}

/// Outcome of grading a single metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assessment {
    Normal,
    /// Qualitative metric expected negative but reported otherwise
    NotNegative,
    Graded(Grade),
}

/// Grade a single (non blood pressure) metric.
///
/// Order of precedence: expected-negative check, then the first matching
/// gender band, then the generic reference (out of range is grade A), then
/// the legacy thresholds when the metric has no bands for this gender.
pub fn grade_metric(entry: &StandardEntry, value: &MeasurementValue, gender: Gender) -> Assessment {
    let reference = entry.reference_for(gender);

    if reference.is_some_and(ReferenceRange::is_expected_negative) {
        return if value.is_negative() {
            Assessment::Normal
        } else {
            Assessment::NotNegative
        };
    }

    let Some(numeric) = value.numeric() else {
        return Assessment::Normal;
    };

    let generic = match reference {
        Some(range) if !range.contains(numeric) => Grade::A,
        _ => Grade::None,
    };

    let bands = entry.bands_for(gender);
    let grade = if !bands.is_empty() {
        bands
            .iter()
            .find(|band| band.contains(numeric))
            .map(|band| band.grade)
            .unwrap_or(generic)
    } else if generic.is_none() {
        legacy_grade(entry.key(), numeric)
    } else {
        generic
    };

    if grade.is_none() {
        Assessment::Normal
    } else {
        Assessment::Graded(grade)
    }
}

/// A usable measurement resolved to its canonical key.
struct Reading<'a> {
    key: String,
    entry: Option<&'a StandardEntry>,
    raw: &'a Value,
    value: MeasurementValue,
}

/// Resolve keys, drop missing values and keep the first reading per metric.
fn collect_readings<'a>(
    store: &'a StandardsStore,
    vital_stats: &'a VitalStats,
) -> Vec<Reading<'a>> {
    let mut seen = HashSet::new();
    let mut readings = Vec::with_capacity(vital_stats.len());

    for (key, raw) in vital_stats {
        let value = normalize(raw);
        if value.is_missing() {
            continue;
        }

        let entry = store.resolve(key);
        let canonical = entry
            .map(|e| e.key().to_string())
            .unwrap_or_else(|| key.trim().to_string());

        if !seen.insert(canonical.clone()) {
            tracing::debug!(key = %key, canonical = %canonical, "Skipping repeated metric");
            continue;
        }

        readings.push(Reading {
            key: canonical,
            entry,
            raw,
            value,
        });
    }

    readings
}

#[derive(Default)]
struct Tally {
    deductions: Vec<Deduction>,
    warnings: Vec<String>,
}

impl Tally {
    fn deduct(&mut self, source: &str, grade: Grade, warning: String) {
        if grade.is_none() {
            return;
        }
        tracing::debug!(source, %grade, points = grade.deduction(), "Deduction");
        self.deductions.push(Deduction {
            source: source.to_string(),
            grade,
            points: grade.deduction(),
        });
        self.warnings.push(warning);
    }

    fn finish(self) -> ScoreResult {
        let total: u32 = self.deductions.iter().map(|d| d.points).sum();
        ScoreResult {
            score: MAX_SCORE.saturating_sub(total).max(MIN_SCORE),
            warnings: self.warnings,
            deductions: self.deductions,
        }
    }
}

/// Compute the wellness score for one set of measurements.
///
/// Deductions are applied in report order, then blood pressure, then the
/// compound risk bonus. The result is clamped to [`MIN_SCORE`].
pub fn compute_score(
    store: &StandardsStore,
    vital_stats: &VitalStats,
    gender: Gender,
) -> ScoreResult {
    let readings = collect_readings(store, vital_stats);
    let mut tally = Tally::default();

    for reading in &readings {
        // Unknown metrics are ignored; blood pressure is graded as a pair below
        let Some(entry) = reading.entry else {
            continue;
        };
        if reading.key == SYSTOLIC_KEY || reading.key == DIASTOLIC_KEY {
            continue;
        }

        let raw = display_raw(reading.raw);
        match grade_metric(entry, &reading.value, gender) {
            Assessment::Normal => {}
            Assessment::NotNegative => tally.deduct(
                &reading.key,
                Grade::A,
                format!("{} is outside the normal range ({})", entry.name(), raw),
            ),
            Assessment::Graded(grade) => tally.deduct(
                &reading.key,
                grade,
                format!("{} is grade {} ({})", entry.name(), grade, raw),
            ),
        }
    }

    let numeric = |key: &str| {
        readings
            .iter()
            .find(|r| r.key == key)
            .and_then(|r| r.value.numeric())
    };
    let systolic = numeric(SYSTOLIC_KEY);
    let diastolic = numeric(DIASTOLIC_KEY);

    if let Some(finding) = assess_blood_pressure(systolic, diastolic) {
        tally.deduct(finding.source, finding.grade, finding.warning);
    }

    if let Some(finding) =
        assess_compound_risk(numeric(GLUCOSE_KEY), numeric(LDL_KEY), systolic, diastolic)
    {
        tally.deduct(finding.source, finding.grade, finding.warning);
    }

    tally.finish()
}
