mod error;
mod schema;
mod validation;

pub use error::ConfigurationError;
pub use schema::{Gender, GradesDef, OrderedMap, StandardDef, StandardsDocument};
pub use validation::{find_defects, validate_document};

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::scoring::{Grade, ReferenceRange};

/// Environment variable that overrides the default standards path
pub const STANDARDS_PATH_ENV: &str = "VITALGRADE_STANDARDS";

/// Get the config directory path (~/.config/vitalgrade/)
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("vitalgrade"))
}

/// Resolve the standards file path: explicit path, then `$VITALGRADE_STANDARDS`,
/// then ~/.config/vitalgrade/health_standards.yaml
pub fn resolve_standards_path(path: Option<PathBuf>) -> PathBuf {
    path.or_else(|| std::env::var_os(STANDARDS_PATH_ENV).map(PathBuf::from))
        .or_else(|| get_config_dir().map(|dir| dir.join("health_standards.yaml")))
        .unwrap_or_else(|| PathBuf::from("health_standards.yaml"))
}

/// One inclusive grade band, e.g. grade B for [126.01, 180].
#[derive(Debug, Clone, PartialEq)]
pub struct GradeBand {
    pub grade: Grade,
    pub lower: f64,
    pub upper: f64,
}

impl GradeBand {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// A fully parsed metric definition.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardEntry {
    key: String,
    name: String,
    aliases: Vec<String>,
    reference: Option<ReferenceRange>,
    reference_male: Option<ReferenceRange>,
    reference_female: Option<ReferenceRange>,
    bands_male: Vec<GradeBand>,
    bands_female: Vec<GradeBand>,
}

impl StandardEntry {
    /// Build an entry from its definition, reporting every problem found.
    pub fn from_def(key: &str, def: &StandardDef) -> Result<Self, Vec<String>> {
        let mut errors = Vec::new();

        let mut reference_for = |field: &str, expr: &Option<String>| match expr {
            Some(expr) => match ReferenceRange::parse(expr) {
                Ok(range) => range,
                Err(e) => {
                    errors.push(format!(
                        "health_standards.{}.{}: invalid '{}' - {}",
                        key, field, expr, e
                    ));
                    None
                }
            },
            None => None,
        };
        let reference = reference_for("reference_value", &def.reference_value);
        let reference_male = reference_for("reference_value_male", &def.reference_value_male);
        let reference_female =
            reference_for("reference_value_female", &def.reference_value_female);

        let grades = def.grades.clone().unwrap_or_default();
        let bands_male = parse_bands(key, "male", grades.male.as_ref(), &mut errors);
        let bands_female = parse_bands(key, "female", grades.female.as_ref(), &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        let name = def
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(key)
            .to_string();

        Ok(Self {
            key: key.to_string(),
            name,
            aliases: def.aliases.iter().map(|a| a.trim().to_string()).collect(),
            reference,
            reference_male,
            reference_female,
            bands_male,
            bands_female,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Display name used in warnings
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Reference expression for `gender`, falling back to the generic one.
    pub fn reference_for(&self, gender: Gender) -> Option<&ReferenceRange> {
        let gendered = match gender {
            Gender::Male => self.reference_male.as_ref(),
            Gender::Female => self.reference_female.as_ref(),
        };
        gendered.or(self.reference.as_ref())
    }

    /// Grade bands for `gender`, in declaration order. Empty when none are defined.
    pub fn bands_for(&self, gender: Gender) -> &[GradeBand] {
        match gender {
            Gender::Male => &self.bands_male,
            Gender::Female => &self.bands_female,
        }
    }
}

fn parse_bands(
    key: &str,
    gender: &str,
    bands: Option<&OrderedMap<[f64; 2]>>,
    errors: &mut Vec<String>,
) -> Vec<GradeBand> {
    let Some(bands) = bands else {
        return Vec::new();
    };

    let mut parsed = Vec::with_capacity(bands.len());
    for (label, &[lower, upper]) in bands.iter() {
        let path = format!("health_standards.{}.grades.{}.{}", key, gender, label);
        let Some(grade) = Grade::from_label(label) else {
            errors.push(format!("{}: unknown grade label (expected A, B or C)", path));
            continue;
        };
        if !lower.is_finite() || !upper.is_finite() {
            errors.push(format!("{}: bounds must be finite", path));
            continue;
        }
        if lower > upper {
            errors.push(format!(
                "{}: lower bound {} exceeds upper bound {}",
                path, lower, upper
            ));
            continue;
        }
        parsed.push(GradeBand {
            grade,
            lower,
            upper,
        });
    }
    parsed
}

/// Normalize a metric key or alias for case-insensitive lookup.
fn normalize_alias(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Immutable grading configuration, loaded once and shared read-only.
#[derive(Debug, Clone)]
pub struct StandardsStore {
    entries: HashMap<String, StandardEntry>,
    aliases: HashMap<String, String>,
    defects: Vec<String>,
}

impl StandardsStore {
    /// Load standards from a YAML or JSON file (chosen by extension).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist
    /// - The file cannot be read
    /// - The document cannot be parsed
    /// - The document fails validation
    pub fn load(path: &Path) -> Result<Self, ConfigurationError> {
        if !path.exists() {
            return Err(ConfigurationError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigurationError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let origin = path.display().to_string();
        let doc = if is_json {
            parse_json(&content, &origin)?
        } else {
            parse_yaml(&content, &origin)?
        };

        let store = Self::from_document(doc)?;
        tracing::info!(
            path = %path.display(),
            metrics = store.entries.len(),
            aliases = store.aliases.len(),
            "Loaded health standards"
        );
        Ok(store)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigurationError> {
        Self::from_document(parse_yaml(content, "<inline yaml>")?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigurationError> {
        Self::from_document(parse_json(content, "<inline json>")?)
    }

    /// Build a store from a parsed document.
    ///
    /// Later definitions win when a metric key or alias is claimed twice;
    /// each such clash is recorded in [`StandardsStore::defects`].
    pub fn from_document(doc: StandardsDocument) -> Result<Self, ConfigurationError> {
        validate_document(&doc).map_err(ConfigurationError::Invalid)?;

        let mut defects = find_defects(&doc);
        let mut entries = HashMap::new();
        for (key, def) in doc.health_standards.iter() {
            let entry = StandardEntry::from_def(key, def).map_err(ConfigurationError::Invalid)?;
            entries.insert(key.to_string(), entry);
        }

        // Canonical keys resolve to themselves case-insensitively
        let mut aliases: HashMap<String, String> = HashMap::new();
        for (key, _) in doc.health_standards.iter() {
            claim_alias(&mut aliases, &mut defects, key, key);
        }
        for (key, def) in doc.health_standards.iter() {
            for alias in &def.aliases {
                claim_alias(&mut aliases, &mut defects, alias, key);
            }
        }

        for defect in &defects {
            tracing::warn!(defect = %defect, "Health standards configuration defect");
        }

        Ok(Self {
            entries,
            aliases,
            defects,
        })
    }

    /// Look up an entry by canonical key or alias (case-insensitive, trimmed).
    pub fn resolve(&self, key: &str) -> Option<&StandardEntry> {
        self.entries.get(key).or_else(|| {
            self.aliases
                .get(&normalize_alias(key))
                .and_then(|canonical| self.entries.get(canonical))
        })
    }

    /// Canonical key for a metric key or alias.
    pub fn canonical_key(&self, key: &str) -> Option<&str> {
        self.resolve(key).map(StandardEntry::key)
    }

    pub fn get(&self, canonical_key: &str) -> Option<&StandardEntry> {
        self.entries.get(canonical_key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    /// Configuration defects found while loading (alias clashes,
    /// duplicate keys, overlapping bands).
    pub fn defects(&self) -> &[String] {
        &self.defects
    }
}

fn claim_alias(
    aliases: &mut HashMap<String, String>,
    defects: &mut Vec<String>,
    alias: &str,
    key: &str,
) {
    let normalized = normalize_alias(alias);
    if let Some(previous) = aliases.insert(normalized.clone(), key.to_string()) {
        if previous != key {
            defects.push(format!(
                "alias '{}' is claimed by both '{}' and '{}'; using '{}'",
                normalized, previous, key, key
            ));
        }
    }
}

fn parse_yaml(content: &str, origin: &str) -> Result<StandardsDocument, ConfigurationError> {
    serde_saphyr::from_str(content).map_err(|e| ConfigurationError::Parse {
        origin: origin.to_string(),
        message: e.to_string(),
    })
}

fn parse_json(content: &str, origin: &str) -> Result<StandardsDocument, ConfigurationError> {
    serde_json::from_str(content).map_err(|e| ConfigurationError::Parse {
        origin: origin.to_string(),
        message: e.to_string(),
    })
}
