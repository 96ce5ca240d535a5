//! Hard-coded three-tier thresholds used only when a metric has neither
//! gender bands nor a reference expression that flagged it.

use super::grade::Grade;

#[derive(Debug, Clone, Copy)]
enum Bound {
    Inclusive(f64),
    Exclusive(f64),
}

impl Bound {
    fn admits(self, value: f64) -> bool {
        match self {
            Bound::Inclusive(limit) => value <= limit,
            Bound::Exclusive(limit) => value < limit,
        }
    }
}

/// Values at or above `onset` are graded: A up to `a_max`, B up to `b_max`, else C.
struct Thresholds {
    key: &'static str,
    onset: f64,
    a_max: Bound,
    b_max: Bound,
}

const THRESHOLDS: &[Thresholds] = &[
    Thresholds {
        key: "glucose",
        onset: 100.0,
        a_max: Bound::Inclusive(126.0),
        b_max: Bound::Inclusive(180.0),
    },
    Thresholds {
        key: "ldl_cholesterol",
        onset: 130.0,
        a_max: Bound::Inclusive(160.0),
        b_max: Bound::Inclusive(200.0),
    },
    Thresholds {
        key: "bmi",
        onset: 24.0,
        a_max: Bound::Exclusive(27.0),
        b_max: Bound::Exclusive(30.0),
    },
    Thresholds {
        key: "alt",
        onset: 41.0,
        a_max: Bound::Inclusive(80.0),
        b_max: Bound::Inclusive(200.0),
    },
    Thresholds {
        key: "ast",
        onset: 31.0,
        a_max: Bound::Inclusive(80.0),
        b_max: Bound::Inclusive(200.0),
    },
    Thresholds {
        key: "creatinine",
        onset: 1.3,
        a_max: Bound::Inclusive(2.0),
        b_max: Bound::Inclusive(3.0),
    },
    Thresholds {
        key: "uric_acid",
        onset: 7.0,
        a_max: Bound::Inclusive(8.0),
        b_max: Bound::Inclusive(10.0),
    },
];

const URINE_PROTEIN_KEY: &str = "urine_protein";

/// Fallback grade for a canonical metric key. Unknown metrics grade as none.
pub fn legacy_grade(key: &str, value: f64) -> Grade {
    if key == URINE_PROTEIN_KEY {
        // Qualitative ranks: + / ++ / ++++
        return match value {
            v if v == 1.0 => Grade::A,
            v if v == 2.0 => Grade::B,
            v if v == 3.0 => Grade::C,
            _ => Grade::None,
        };
    }

    let Some(t) = THRESHOLDS.iter().find(|t| t.key == key) else {
        return Grade::None;
    };

    if value < t.onset {
        Grade::None
    } else if t.a_max.admits(value) {
        Grade::A
    } else if t.b_max.admits(value) {
        Grade::B
    } else {
        Grade::C
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glucose_tiers() {
        assert_eq!(legacy_grade("glucose", 99.0), Grade::None);
        assert_eq!(legacy_grade("glucose", 100.0), Grade::A);
        assert_eq!(legacy_grade("glucose", 126.0), Grade::A);
        assert_eq!(legacy_grade("glucose", 126.5), Grade::B);
        assert_eq!(legacy_grade("glucose", 180.0), Grade::B);
        assert_eq!(legacy_grade("glucose", 181.0), Grade::C);
    }

    #[test]
    fn test_bmi_upper_bounds_are_exclusive() {
        assert_eq!(legacy_grade("bmi", 23.9), Grade::None);
        assert_eq!(legacy_grade("bmi", 24.0), Grade::A);
        assert_eq!(legacy_grade("bmi", 27.0), Grade::B);
        assert_eq!(legacy_grade("bmi", 30.0), Grade::C);
    }

    #[test]
    fn test_liver_and_kidney_markers() {
        assert_eq!(legacy_grade("alt", 40.0), Grade::None);
        assert_eq!(legacy_grade("alt", 90.0), Grade::B);
        assert_eq!(legacy_grade("ast", 31.0), Grade::A);
        assert_eq!(legacy_grade("ast", 201.0), Grade::C);
        assert_eq!(legacy_grade("creatinine", 1.2), Grade::None);
        assert_eq!(legacy_grade("creatinine", 2.5), Grade::B);
        assert_eq!(legacy_grade("uric_acid", 7.5), Grade::A);
        assert_eq!(legacy_grade("uric_acid", 12.0), Grade::C);
        assert_eq!(legacy_grade("ldl_cholesterol", 210.0), Grade::C);
    }

    #[test]
    fn test_urine_protein_ranks() {
        assert_eq!(legacy_grade("urine_protein", 0.0), Grade::None);
        assert_eq!(legacy_grade("urine_protein", 1.0), Grade::A);
        assert_eq!(legacy_grade("urine_protein", 2.0), Grade::B);
        assert_eq!(legacy_grade("urine_protein", 3.0), Grade::C);
        assert_eq!(legacy_grade("urine_protein", 30.0), Grade::None);
    }

    #[test]
    fn test_unknown_metric() {
        assert_eq!(legacy_grade("wbc", 50.0), Grade::None);
    }
}
