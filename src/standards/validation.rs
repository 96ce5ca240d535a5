use std::collections::HashSet;

use super::schema::{OrderedMap, StandardsDocument};
use super::StandardEntry;

/// Validate a standards document before it is turned into a store.
/// Returns all validation errors at once (not just the first).
pub fn validate_document(doc: &StandardsDocument) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if doc.health_standards.is_empty() {
        errors.push("health_standards: must define at least one metric".to_string());
    }

    for (key, def) in doc.health_standards.iter() {
        if key.trim().is_empty() {
            errors.push("health_standards: metric key must not be empty".to_string());
            continue;
        }

        if let Some(ref name) = def.name {
            if name.trim().is_empty() {
                errors.push(format!("health_standards.{}.name: must not be empty", key));
            }
        }

        for (i, alias) in def.aliases.iter().enumerate() {
            if alias.trim().is_empty() {
                errors.push(format!(
                    "health_standards.{}.aliases[{}]: must not be empty",
                    key, i
                ));
            }
        }

        if let Err(entry_errors) = StandardEntry::from_def(key, def) {
            errors.extend(entry_errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Find defects that do not stop loading but must be surfaced:
/// duplicate metric keys and overlapping grade bands.
/// Alias conflicts are detected while the alias index is built.
pub fn find_defects(doc: &StandardsDocument) -> Vec<String> {
    let mut defects = Vec::new();
    let mut seen = HashSet::new();

    for (key, def) in doc.health_standards.iter() {
        if !seen.insert(key) {
            defects.push(format!(
                "health_standards.{}: defined more than once; the last definition wins",
                key
            ));
        }

        if let Some(ref grades) = def.grades {
            for (gender, bands) in [("male", &grades.male), ("female", &grades.female)] {
                if let Some(bands) = bands {
                    defects.extend(overlapping_bands(key, gender, bands));
                }
            }
        }
    }

    defects
}

fn overlapping_bands(key: &str, gender: &str, bands: &OrderedMap<[f64; 2]>) -> Vec<String> {
    let mut defects = Vec::new();
    for (i, (label_a, [low_a, high_a])) in bands.iter().enumerate() {
        for (label_b, [low_b, high_b]) in bands.iter().skip(i + 1) {
            if low_a <= high_b && low_b <= high_a {
                defects.push(format!(
                    "health_standards.{}.grades.{}: bands '{}' and '{}' overlap; '{}' wins for shared values",
                    key, gender, label_a, label_b, label_a
                ));
            }
        }
    }
    defects
}
