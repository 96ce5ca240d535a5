//! Grade health checkup measurements into a bounded wellness score.
//!
//! ```no_run
//! use vitalgrade::standards::{Gender, StandardsStore};
//! use vitalgrade::analysis::analyze_response;
//! use std::path::Path;
//!
//! let store = StandardsStore::load(Path::new("health_standards.yaml"))?;
//! let reply = r#"Extracted: {"vital_stats": {"glucose": 105, "HBsAg": "(-)"}}"#;
//! if let Some(analysis) = analyze_response(reply, &store, Gender::Female) {
//!     println!("{} {:?}", analysis.result.score, analysis.result.warnings);
//! }
//! # Ok::<(), vitalgrade::standards::ConfigurationError>(())
//! ```

pub mod analysis;
pub mod extract;
pub mod output;
pub mod scoring;
pub mod standards;

pub use analysis::{analyze_response, Analysis, ExtractedReport};
pub use extract::extract_structured;
pub use scoring::{compute_score, ScoreResult, VitalStats};
pub use standards::{ConfigurationError, Gender, StandardsStore};
