//! Recover a JSON object from the extraction service's free-form reply.
//!
//! The reply is supposed to be bare JSON but often arrives wrapped in a
//! markdown fence or surrounded by prose. Each [`ExtractionStrategy`] tries
//! one way of finding the object; the [`Extractor`] runs them in order and
//! stops at the first success.

mod strategies;

pub use strategies::{BraceSpan, FencedBlock, WholeDocument};

use serde_json::{Map, Value};

/// A structured object recovered from text
pub type Mapping = Map<String, Value>;

/// One independent way of recovering a JSON object from text.
pub trait ExtractionStrategy: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Returns the recovered object, or `None` to let the next strategy try.
    fn extract(&self, text: &str) -> Option<Mapping>;
}

/// Ordered pipeline of extraction strategies.
pub struct Extractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl Default for Extractor {
    /// Whole document, then a ```json fence, then brace spans.
    fn default() -> Self {
        Self::with_strategies(vec![
            Box::new(WholeDocument),
            Box::new(FencedBlock),
            Box::new(BraceSpan),
        ])
    }
}

impl Extractor {
    pub fn with_strategies(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Run each strategy in order; `None` when none of them recovers an object.
    pub fn extract(&self, text: &str) -> Option<Mapping> {
        for strategy in &self.strategies {
            match strategy.extract(text) {
                Some(mapping) => {
                    tracing::debug!(strategy = strategy.name(), "Recovered structured data");
                    return Some(mapping);
                }
                None => tracing::trace!(strategy = strategy.name(), "Strategy found nothing"),
            }
        }
        tracing::debug!(len = text.len(), "No structured data recoverable");
        None
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }
}

/// Recover a JSON object from raw text using the default pipeline.
pub fn extract_structured(text: &str) -> Option<Mapping> {
    Extractor::default().extract(text)
}

/// Parse `text` as JSON, accepting only objects.
pub(crate) fn parse_object(text: &str) -> Option<Mapping> {
    match serde_json::from_str::<Value>(text.trim()) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}
