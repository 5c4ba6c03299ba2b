use serde::{Deserialize, Serialize};

use crate::SubcommandSpec;

/// Serializable spec bundle used for distribution.
///
/// A package groups several root specs with version metadata so a whole
/// corpus can ship as a single JSON file.
///
/// # Examples
///
/// ```
/// use spec_complete_core::*;
///
/// let mut package = SpecPackage::new("1.0.0", "2024-01-15T10:30:00Z");
/// package.name = Some("core-tools".into());
/// package.specs.push(SubcommandSpec::new("git"));
/// package.specs.push(SubcommandSpec::new("ls"));
///
/// assert_eq!(package.spec_count(), 2);
/// assert!(package.find_spec("ls").is_some());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecPackage {
    /// Contract version (populated from
    /// [`SPEC_CONTRACT_VERSION`](crate::SPEC_CONTRACT_VERSION)).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_version: Option<String>,
    /// Package format version (semver string).
    pub version: String,
    pub name: Option<String>,
    pub description: Option<String>,
    /// RFC 3339 timestamp for package creation.
    pub generated_at: String,
    /// Hash of the serialized specs.
    pub bundle_hash: Option<String>,
    /// Root specs included in this package.
    #[serde(default)]
    pub specs: Vec<SubcommandSpec>,
}

impl SpecPackage {
    /// Creates a package with required fields.
    pub fn new(version: impl Into<String>, generated_at: impl Into<String>) -> Self {
        Self {
            spec_version: Some(crate::SPEC_CONTRACT_VERSION.to_string()),
            version: version.into(),
            name: None,
            description: None,
            generated_at: generated_at.into(),
            bundle_hash: None,
            specs: Vec::new(),
        }
    }

    pub fn spec_count(&self) -> usize {
        self.specs.len()
    }

    /// Finds a root spec by any of its names.
    pub fn find_spec(&self, name: &str) -> Option<&SubcommandSpec> {
        self.specs.iter().find(|s| s.matches(name))
    }
}
