//! Package version normalization
//!
//! Version tags have been written in three shapes over time:
//! - pre-1.10: digits only, one digit per component (`"116"` is 1.1.6)
//! - 1.10 up to 2.0: an opaque build number, resolved through a
//!   [`BuildResolver`]
//! - 2.0 onwards: dotted (`"2.0.5"`)

use crate::error::{ImportError, Result};
use semver::Version;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Resolves a 1.10 to 2.0 build number to a dotted version
pub trait BuildResolver {
    fn resolve(&self, build: &str) -> Option<String>;
}

/// Build-number table supplied by the deployment's configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildTable(BTreeMap<String, String>);

impl BuildTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for BuildTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl BuildResolver for BuildTable {
    fn resolve(&self, build: &str) -> Option<String> {
        self.0.get(build).cloned()
    }
}

/// A version tag in canonical dotted form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedVersion {
    /// Dotted form of the tag (`"1.1.6"`)
    pub dotted: String,
    /// Parsed form used for ordering
    pub version: Version,
    /// Older than 2.0.0; pods need the legacy remapping pipeline
    pub is_legacy: bool,
}

/// First version of the current schema generation
const CURRENT_GENERATION: Version = Version::new(2, 0, 0);

/// Canonicalize a raw version tag and classify it as legacy or current
pub fn normalize(raw: &str, resolver: &dyn BuildResolver) -> Result<NormalizedVersion> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ImportError::InvalidVersion(String::new()));
    }

    let dotted = if raw.contains('.') {
        raw.to_string()
    } else if raw.bytes().all(|b| b.is_ascii_digit()) && raw.parse::<u32>().is_ok_and(|n| n < 1000) {
        split_digits(raw)
    } else {
        resolver
            .resolve(raw)
            .ok_or_else(|| ImportError::InvalidVersion(raw.to_string()))?
    };

    let version =
        parse_dotted(&dotted).ok_or_else(|| ImportError::InvalidVersion(raw.to_string()))?;
    let is_legacy = version < CURRENT_GENERATION;
    debug!(raw, dotted = %dotted, is_legacy, "Normalized package version");

    Ok(NormalizedVersion {
        dotted,
        version,
        is_legacy,
    })
}

/// `"116"` -> `"1.1.6"`
fn split_digits(raw: &str) -> String {
    raw.chars()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

/// Parse a dotted version, padding `major` or `major.minor` with zeros
fn parse_dotted(dotted: &str) -> Option<Version> {
    if let Ok(version) = Version::parse(dotted) {
        return Some(version);
    }
    let parts: Vec<&str> = dotted.split('.').collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }
    let mut numbers = [0u64; 3];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        *slot = part.parse().ok()?;
    }
    Some(Version::new(numbers[0], numbers[1], numbers[2]))
}
