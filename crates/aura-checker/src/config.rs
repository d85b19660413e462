//! Checker configuration.

use serde::{Deserialize, Serialize};

/// Options that shape a checking session.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```text
/// { "source_root": "lib", "max_errors": 50 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Directory non-stdlib packages are resolved under.
    pub source_root: String,
    /// Diagnostics stored per batch before further ones are only counted.
    pub max_errors: usize,
    /// Namespace holding the builtin globals.
    pub prelude_namespace: String,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            source_root: "src".to_string(),
            max_errors: aura_types::MAX_ERRORS,
            prelude_namespace: "prelude".to_string(),
        }
    }
}

impl CheckerConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Where the resolver looks for `package`.
    pub fn package_path(&self, package: &str) -> String {
        format!("{}/{}", self.source_root.trim_end_matches('/'), package)
    }
}
