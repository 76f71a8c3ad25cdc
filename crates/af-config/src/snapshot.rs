//! Configuration snapshots for reproducible forecast output.
//!
//! A snapshot records which parameter file (if any) produced the values a
//! forecast ran with, so a published forecast can be traced back to its
//! inputs.

use af_common::ModelParameters;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::preset::RegimePreset;
use crate::resolve::{ConfigSource, ParamsLocation};

/// A frozen snapshot of configuration state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// When this snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Schema version of the configuration.
    pub schema_version: String,

    /// Path the parameter file was loaded from.
    #[serde(default)]
    pub params_path: Option<String>,

    /// Source of the parameter file.
    pub params_source: String,

    /// SHA-256 of the raw parameter file content.
    #[serde(default)]
    pub params_hash: Option<String>,

    /// Base preset.
    pub preset: RegimePreset,

    /// Effective parameters after all overrides.
    pub parameters: ModelParameters,

    /// Hash over the effective parameters (for quick comparison).
    pub combined_hash: String,
}

impl ConfigSnapshot {
    /// Create a snapshot from a loaded parameter file.
    ///
    /// `params_hash` is the [`hash_content`] of the raw file, if one was read.
    pub fn new(
        location: &ParamsLocation,
        params_hash: Option<String>,
        preset: RegimePreset,
        parameters: ModelParameters,
    ) -> Self {
        ConfigSnapshot {
            timestamp: Utc::now(),
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            params_path: location.path.as_ref().map(|p| p.display().to_string()),
            params_source: location.source.to_string(),
            params_hash,
            preset,
            parameters,
            combined_hash: parameters_hash(preset, &parameters),
        }
    }

    /// Create a snapshot with only defaults (no parameter file loaded).
    pub fn defaults_only() -> Self {
        let preset = RegimePreset::default();
        Self::new(
            &ParamsLocation {
                path: None,
                source: ConfigSource::BuiltinDefault,
            },
            None,
            preset,
            preset.params(),
        )
    }

    /// Serialize snapshot to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check if this snapshot matches another (same effective parameters).
    pub fn matches(&self, other: &ConfigSnapshot) -> bool {
        self.combined_hash == other.combined_hash
    }

    /// Get a short identifier for this snapshot (first 12 chars of hash).
    pub fn short_id(&self) -> &str {
        &self.combined_hash[..12.min(self.combined_hash.len())]
    }
}

fn parameters_hash(preset: RegimePreset, params: &ModelParameters) -> String {
    // Bit patterns keep the hash exact; formatting could round.
    let canonical = format!(
        "{}:{:016x}:{:016x}:{:016x}:{:016x}",
        preset.as_str(),
        params.a.to_bits(),
        params.b.to_bits(),
        params.c.to_bits(),
        params.p.to_bits()
    );
    hash_content(&canonical)
}

/// Hash content with SHA-256 and return hex string.
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_defaults_snapshot() {
        let snapshot = ConfigSnapshot::defaults_only();
        assert_eq!(snapshot.schema_version, crate::CONFIG_SCHEMA_VERSION);
        assert!(snapshot.params_hash.is_none());
        assert!(snapshot.params_path.is_none());
        assert_eq!(snapshot.params_source, "builtin default");
        assert_eq!(snapshot.parameters, RegimePreset::Generic.params());
    }

    #[test]
    fn test_snapshot_short_id() {
        let snapshot = ConfigSnapshot::defaults_only();
        assert_eq!(snapshot.short_id().len(), 12);
    }

    #[test]
    fn test_snapshot_matches() {
        let s1 = ConfigSnapshot::defaults_only();
        let s2 = ConfigSnapshot::defaults_only();
        assert!(s1.matches(&s2));
    }

    #[test]
    fn test_different_parameters_do_not_match() {
        let location = ParamsLocation {
            path: Some(PathBuf::from("/tmp/params.json")),
            source: ConfigSource::CliArgument,
        };
        let mut params = RegimePreset::Generic.params();
        params.p = 1.2;
        let custom = ConfigSnapshot::new(
            &location,
            Some(hash_content("{}")),
            RegimePreset::Generic,
            params,
        );
        assert!(!custom.matches(&ConfigSnapshot::defaults_only()));
        assert_eq!(custom.params_path.as_deref(), Some("/tmp/params.json"));
        assert_eq!(custom.params_hash.as_deref().map(str::len), Some(64));
    }

    #[test]
    fn test_hash_content() {
        let hash1 = hash_content("test");
        let hash2 = hash_content("test");
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64); // SHA-256 produces 64 hex chars
    }

    #[test]
    fn test_snapshot_json_roundtrip() {
        let snapshot = ConfigSnapshot::defaults_only();
        let json = snapshot.to_json().unwrap();
        let restored = ConfigSnapshot::from_json(&json).unwrap();
        assert!(snapshot.matches(&restored));
        assert_eq!(restored.preset, RegimePreset::Generic);
    }
}
