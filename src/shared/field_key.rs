use crate::config::DimensionName;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

const DIMENSION_PREFIX: &str = "dimension_";

/// Key correlating a configuration field with the store's pending/error
/// annotations. Dimension keys are always built through [`FieldKey::dimension`]
/// so the `dimension_<name>` format lives in exactly one place.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct FieldKey(String);

impl FieldKey {
    pub fn dimension(name: &DimensionName) -> Self {
        Self(format!("{DIMENSION_PREFIX}{}", name.as_str()))
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        if raw.is_empty() {
            return Err("field key must be non-empty".to_string());
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::borrow::Borrow<str> for FieldKey {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl<'de> Deserialize<'de> for FieldKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(|err| D::Error::custom(format!("invalid field key: {err}")))
    }
}
