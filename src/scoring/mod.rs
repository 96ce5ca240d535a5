pub mod engine;
pub mod grade;
pub mod legacy;
pub mod reference;
pub mod risk;
pub mod value;

pub use engine::{compute_score, grade_metric, Assessment, Deduction, ScoreResult};
pub use grade::Grade;
pub use reference::ReferenceRange;
pub use value::{normalize, MeasurementValue, QualitativeToken};

/// Raw measurements keyed by metric key or alias, in report order.
pub type VitalStats = serde_json::Map<String, serde_json::Value>;
