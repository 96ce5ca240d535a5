//! Blood pressure grading and the compound "multiple elevated risk factors" check.
//!
//! Blood pressure has two correlated inputs, so it is graded here rather than
//! in the per-metric loop. The compound check counts glucose, LDL and blood
//! pressure independently of whatever grade each of them received.

use super::grade::Grade;
use super::value::format_number;

pub const SYSTOLIC_KEY: &str = "blood_pressure_systolic";
pub const DIASTOLIC_KEY: &str = "blood_pressure_diastolic";

/// (grade, systolic threshold, diastolic threshold), most severe first
const BLOOD_PRESSURE_TIERS: &[(Grade, f64, f64)] = &[
    (Grade::C, 160.0, 100.0),
    (Grade::B, 140.0, 90.0),
    (Grade::A, 130.0, 80.0),
];

const GLUCOSE_RISK: f64 = 100.0;
const LDL_RISK: f64 = 130.0;
const SYSTOLIC_RISK: f64 = 130.0;
const DIASTOLIC_RISK: f64 = 80.0;

/// A deduction raised outside the per-metric loop.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub source: &'static str,
    pub grade: Grade,
    pub warning: String,
}

fn at_least(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v >= threshold)
}

/// Grade blood pressure; only the single most severe matching tier applies.
/// A missing reading never matches a tier.
pub fn blood_pressure_grade(systolic: Option<f64>, diastolic: Option<f64>) -> Grade {
    BLOOD_PRESSURE_TIERS
        .iter()
        .find(|(_, sys, dia)| at_least(systolic, *sys) || at_least(diastolic, *dia))
        .map(|(grade, _, _)| *grade)
        .unwrap_or(Grade::None)
}

/// Assess blood pressure from whichever readings are present.
pub fn assess_blood_pressure(systolic: Option<f64>, diastolic: Option<f64>) -> Option<Finding> {
    let grade = blood_pressure_grade(systolic, diastolic);
    if grade.is_none() {
        return None;
    }

    let warning = match (systolic, diastolic) {
        (Some(sys), Some(dia)) => format!(
            "Blood pressure is grade {} ({}/{} mmHg)",
            grade,
            format_number(sys),
            format_number(dia)
        ),
        (Some(sys), None) => format!(
            "Systolic blood pressure is grade {} ({} mmHg)",
            grade,
            format_number(sys)
        ),
        (None, Some(dia)) => format!(
            "Diastolic blood pressure is grade {} ({} mmHg)",
            grade,
            format_number(dia)
        ),
        (None, None) => return None,
    };

    Some(Finding {
        source: "blood_pressure",
        grade,
        warning,
    })
}

/// Count elevated risk factors: glucose, LDL cholesterol, blood pressure.
pub fn compound_risk_count(
    glucose: Option<f64>,
    ldl: Option<f64>,
    systolic: Option<f64>,
    diastolic: Option<f64>,
) -> u8 {
    let factors = [
        at_least(glucose, GLUCOSE_RISK),
        at_least(ldl, LDL_RISK),
        at_least(systolic, SYSTOLIC_RISK) || at_least(diastolic, DIASTOLIC_RISK),
    ];
    factors.iter().filter(|elevated| **elevated).count() as u8
}

/// Extra deduction for several elevated risk factors at once.
pub fn assess_compound_risk(
    glucose: Option<f64>,
    ldl: Option<f64>,
    systolic: Option<f64>,
    diastolic: Option<f64>,
) -> Option<Finding> {
    let count = compound_risk_count(glucose, ldl, systolic, diastolic);
    let (grade, tier) = match count {
        1 => (Grade::A, "single"),
        2 => (Grade::B, "double"),
        3 => (Grade::C, "triple"),
        _ => return None,
    };

    Some(Finding {
        source: "compound_risk",
        grade,
        warning: format!(
            "Meets the {} risk condition ({} of glucose, LDL cholesterol, blood pressure elevated), extra {} points deducted",
            tier,
            count,
            grade.deduction()
        ),
    })
}
