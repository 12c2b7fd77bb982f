use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// User-facing dimension label. Names are kept verbatim; uniqueness within a
/// collection is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct DimensionName(String);

impl DimensionName {
    pub fn parse(raw: &str) -> Result<Self, String> {
        if raw.is_empty() {
            return Err("dimension name must be non-empty".to_string());
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DimensionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::borrow::Borrow<str> for DimensionName {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl<'de> Deserialize<'de> for DimensionName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(|err| D::Error::custom(format!("invalid dimension name: {err}")))
    }
}

/// Integration target a dimension maps onto. Fixed set defined by the
/// accounting integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MappingTarget {
    #[serde(rename = "TAG")]
    Tag,
    #[serde(rename = "REPORT_FIELD")]
    ReportField,
}

pub const ALL_MAPPING_TARGETS: [MappingTarget; 2] =
    [MappingTarget::Tag, MappingTarget::ReportField];

impl MappingTarget {
    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw {
            "TAG" => Ok(MappingTarget::Tag),
            "REPORT_FIELD" => Ok(MappingTarget::ReportField),
            other => Err(format!(
                "unknown mapping target `{other}`; expected TAG or REPORT_FIELD"
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MappingTarget::Tag => "TAG",
            MappingTarget::ReportField => "REPORT_FIELD",
        }
    }
}

impl std::fmt::Display for MappingTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    pub name: DimensionName,
    pub target: MappingTarget,
}

/// Candidate edit as the form holds it, before validation. The name is a raw
/// string so an empty field can be represented.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingDraft {
    pub name: String,
    pub target: Option<MappingTarget>,
}

impl MappingDraft {
    pub fn from_mapping(mapping: &Mapping) -> Self {
        Self {
            name: mapping.name.as_str().to_string(),
            target: Some(mapping.target),
        }
    }
}

/// Ordered collection of dimension mappings for one scope. Order is
/// insertion/display order; no two entries share a name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserDimensions(Vec<Mapping>);

impl UserDimensions {
    pub fn from_mappings(mappings: Vec<Mapping>) -> Result<Self, String> {
        let mut dimensions = Self::default();
        for mapping in mappings {
            dimensions.add(mapping)?;
        }
        Ok(dimensions)
    }

    pub fn get(&self, name: &str) -> Option<&Mapping> {
        self.0.iter().find(|mapping| mapping.name.as_str() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mapping> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn add(&mut self, mapping: Mapping) -> Result<(), String> {
        if self.contains(mapping.name.as_str()) {
            return Err(format!(
                "dimension `{}` already exists",
                mapping.name.as_str()
            ));
        }
        self.0.push(mapping);
        Ok(())
    }

    /// Replaces the entry named `original` in place; its position in the
    /// collection is preserved. Renaming onto another existing entry is
    /// rejected.
    pub fn replace(&mut self, original: &DimensionName, mapping: Mapping) -> Result<(), String> {
        if mapping.name != *original && self.contains(mapping.name.as_str()) {
            return Err(format!(
                "dimension `{}` already exists",
                mapping.name.as_str()
            ));
        }
        let slot = self
            .0
            .iter_mut()
            .find(|entry| entry.name == *original)
            .ok_or_else(|| format!("dimension `{}` does not exist", original.as_str()))?;
        *slot = mapping;
        Ok(())
    }

    pub fn remove(&mut self, name: &DimensionName) -> Result<(), String> {
        if !self.contains(name.as_str()) {
            return Err(format!("dimension `{}` does not exist", name.as_str()));
        }
        self.0.retain(|mapping| mapping.name != *name);
        Ok(())
    }
}
