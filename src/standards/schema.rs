use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Top-level standards document.
///
/// Example YAML:
/// ```yaml
/// health_standards:
///   glucose:
///     name: Fasting glucose
///     aliases: ["AC Sugar", "GLU-AC"]
///     reference_value: "70-99"
///     grades:
///       female:
///         A: [100, 126]
///         B: [126.01, 180]
///         C: [180.01, 1000]
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StandardsDocument {
    /// Metric definitions keyed by canonical key, in declaration order
    pub health_standards: OrderedMap<StandardDef>,
}

/// A single metric definition as written in the standards file.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StandardDef {
    /// Display name used in warnings (defaults to the canonical key)
    #[serde(default)]
    pub name: Option<String>,

    /// Alternative spellings found on checkup reports (e.g. "SGPT" for alt)
    #[serde(default)]
    pub aliases: Vec<String>,

    /// Generic reference expression: "lower-upper", "<x", ">x" or "(-)"
    #[serde(default)]
    pub reference_value: Option<String>,

    #[serde(default)]
    pub reference_value_male: Option<String>,

    #[serde(default)]
    pub reference_value_female: Option<String>,

    /// Per-gender grade bands. Bands are scanned in declaration order.
    #[serde(default)]
    pub grades: Option<GradesDef>,

    /// Measurement unit, informational only
    #[serde(default)]
    pub unit: Option<String>,
}

/// Per-gender grade bands.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GradesDef {
    #[serde(default)]
    pub male: Option<OrderedMap<[f64; 2]>>,

    #[serde(default)]
    pub female: Option<OrderedMap<[f64; 2]>>,
}

/// A mapping that keeps its entries in document order.
///
/// Grade bands are matched first-wins, so the order the author wrote them in
/// is part of the configuration contract. Duplicate keys are kept as
/// separate entries so they can be reported instead of silently merged.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V>(pub Vec<(String, V)>);

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<V> OrderedMap<V> {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    entries.push((key, value));
                }
                Ok(OrderedMap(entries))
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Gender used to pick reference expressions and grade bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    #[default]
    Female,
}

impl Gender {
    /// Parse a caller-supplied gender. Anything other than "male"/"female"
    /// (case-insensitive) falls back to female.
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("male") => Gender::Male,
            _ => Gender::Female,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
