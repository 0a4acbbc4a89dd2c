//! Package envelope and wire format
//!
//! A package is a JSON object with a `meta` block and up to four entity
//! collections: `pods`, `templates`, `pages` (1.x alias `pod_pages`) and
//! `helpers`. This module decodes the envelope; the
//! records inside the collections are left as JSON values so a bad record
//! only fails its own import.

mod export;
mod import;

use crate::error::{ImportError, Result};
use crate::model::EntityKind;
use crate::model::serde_impl::{coerce_int, coerce_string, collection_values};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::warn;

pub use export::{Exporter, PackageEnvelope};
pub use import::{ImportSummary, Importer, SkippedEntity};

/// Package metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Schema version tag of the exporting site
    #[serde(default, deserialize_with = "crate::model::serde_impl::string")]
    pub version: String,
    /// Export timestamp (seconds); advisory only
    #[serde(default, deserialize_with = "crate::model::serde_impl::int")]
    pub build: i64,
}

/// Raw package input: JSON text or an already decoded value
#[derive(Debug, Clone, PartialEq)]
pub enum PackageSource {
    Text(String),
    Json(Value),
}

impl From<&str> for PackageSource {
    fn from(text: &str) -> Self {
        PackageSource::Text(text.to_string())
    }
}

impl From<String> for PackageSource {
    fn from(text: String) -> Self {
        PackageSource::Text(text)
    }
}

impl From<Value> for PackageSource {
    fn from(value: Value) -> Self {
        PackageSource::Json(value)
    }
}

impl From<&Value> for PackageSource {
    fn from(value: &Value) -> Self {
        PackageSource::Json(value.clone())
    }
}

/// A decoded package envelope
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Package {
    pub meta: Meta,
    /// Records per collection, in package order
    pub collections: BTreeMap<EntityKind, Vec<Value>>,
}

impl Package {
    /// Records of one collection (empty when absent)
    pub fn records(&self, kind: EntityKind) -> &[Value] {
        self.collections
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// True when no collection carries any record
    pub fn is_empty(&self) -> bool {
        self.collections.values().all(Vec::is_empty)
    }
}

/// Remove backslash escapes (`\"` -> `"`, `\\` -> `\`)
///
/// Some transports add a layer of slashes to the JSON text; decoding is
/// retried once on the unescaped text.
pub fn strip_slashes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn decode_text(text: &str) -> Result<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) if value.is_object() => Ok(value),
        first => serde_json::from_str::<Value>(&strip_slashes(text)).map_err(|e| {
            let reason = match first {
                Err(first) => first.to_string(),
                Ok(_) => e.to_string(),
            };
            ImportError::MalformedPackage(reason)
        }),
    }
}

/// Decode and validate a package envelope
///
/// # Errors
/// * `MalformedPackage` - not JSON, or not a non-empty object
/// * `MissingVersion` - `meta.version` absent or empty
pub fn parse_package(source: impl Into<PackageSource>) -> Result<Package> {
    let value = match source.into() {
        PackageSource::Json(value) => value,
        PackageSource::Text(text) => decode_text(&text)?,
    };

    let Value::Object(mut map) = value else {
        return Err(ImportError::MalformedPackage(
            "package is not a JSON object".to_string(),
        ));
    };
    if map.is_empty() {
        return Err(ImportError::MalformedPackage("package is empty".to_string()));
    }

    let meta = map.remove("meta").unwrap_or(Value::Null);
    let version = meta.get("version").map(coerce_string).unwrap_or_default();
    if version.trim().is_empty() {
        return Err(ImportError::MissingVersion);
    }
    let build = meta.get("build").map(coerce_int).unwrap_or_default();

    // 1.x packages name the pages collection `pod_pages`
    if let Some(pages) = map.remove("pod_pages") {
        map.insert("pages".to_string(), pages);
    }

    let mut collections = BTreeMap::new();
    for kind in EntityKind::ALL {
        let Some(value) = map.remove(kind.collection()) else {
            continue;
        };
        match collection_values(value) {
            Some(records) => {
                collections.insert(kind, records);
            }
            None => warn!(collection = kind.collection(), "Ignoring non-list collection"),
        }
    }

    Ok(Package {
        meta: Meta {
            version: version.trim().to_string(),
            build,
        },
        collections,
    })
}

/// Which entities of one kind to export
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    All,
    Ids(Vec<u64>),
}

impl Selector {
    /// Id filter for the store (`None` means everything)
    pub fn ids(&self) -> Option<&[u64]> {
        match self {
            Selector::All => None,
            Selector::Ids(ids) => Some(ids),
        }
    }

    /// Read a loosely typed selector; `false`, `null` and empty lists
    /// select nothing
    pub fn from_value(value: &Value) -> Option<Selector> {
        let ids: Vec<u64> = match value {
            Value::Bool(true) => return Some(Selector::All),
            Value::String(s) if s.trim().eq_ignore_ascii_case("all") => {
                return Some(Selector::All);
            }
            Value::String(s) => s
                .split(',')
                .map(|id| coerce_int(&Value::String(id.to_string())))
                .filter_map(|id| u64::try_from(id).ok())
                .filter(|id| *id > 0)
                .collect(),
            Value::Array(items) => items
                .iter()
                .map(coerce_int)
                .filter_map(|id| u64::try_from(id).ok())
                .filter(|id| *id > 0)
                .collect(),
            Value::Number(_) => u64::try_from(coerce_int(value))
                .ok()
                .filter(|id| *id > 0)
                .into_iter()
                .collect(),
            _ => Vec::new(),
        };
        if ids.is_empty() {
            None
        } else {
            Some(Selector::Ids(ids))
        }
    }
}

impl FromStr for Selector {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Selector::All);
        }
        let ids = s
            .split(',')
            .map(|id| {
                id.trim()
                    .parse::<u64>()
                    .map_err(|_| format!("Invalid id '{}'. Use 'all' or a comma-separated id list", id.trim()))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Selector::Ids(ids))
    }
}

fn opt_selector<'de, D>(deserializer: D) -> std::result::Result<Option<Selector>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Selector::from_value(&value))
}

/// Export selection: one optional selector per collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Selection {
    #[serde(default, deserialize_with = "opt_selector")]
    pub pods: Option<Selector>,
    #[serde(default, deserialize_with = "opt_selector")]
    pub templates: Option<Selector>,
    #[serde(default, deserialize_with = "opt_selector")]
    pub pages: Option<Selector>,
    #[serde(default, deserialize_with = "opt_selector")]
    pub helpers: Option<Selector>,
}

impl Selection {
    /// Select every entity of every kind
    pub fn all() -> Self {
        Self {
            pods: Some(Selector::All),
            templates: Some(Selector::All),
            pages: Some(Selector::All),
            helpers: Some(Selector::All),
        }
    }

    pub fn get(&self, kind: EntityKind) -> Option<&Selector> {
        match kind {
            EntityKind::Pod => self.pods.as_ref(),
            EntityKind::Template => self.templates.as_ref(),
            EntityKind::Page => self.pages.as_ref(),
            EntityKind::Helper => self.helpers.as_ref(),
        }
    }

    /// Builder-style setter
    pub fn with(mut self, kind: EntityKind, selector: Selector) -> Self {
        let slot = match kind {
            EntityKind::Pod => &mut self.pods,
            EntityKind::Template => &mut self.templates,
            EntityKind::Page => &mut self.pages,
            EntityKind::Helper => &mut self.helpers,
        };
        *slot = Some(selector);
        self
    }

    pub fn is_empty(&self) -> bool {
        EntityKind::ALL.iter().all(|kind| self.get(*kind).is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_text_package() {
        let package = parse_package(r#"{"meta":{"version":"2.0.5","build":1700000000},"pods":[{"name":"books"}]}"#)
            .unwrap();
        assert_eq!(package.meta.version, "2.0.5");
        assert_eq!(package.meta.build, 1700000000);
        assert_eq!(package.records(EntityKind::Pod).len(), 1);
        assert!(package.records(EntityKind::Helper).is_empty());
    }

    #[test]
    fn test_parse_slashed_package() {
        let text = r#"{\"meta\":{\"version\":\"116\"},\"templates\":[{\"name\":\"list\"}]}"#;
        let package = parse_package(text).unwrap();
        assert_eq!(package.meta.version, "116");
        assert_eq!(package.records(EntityKind::Template).len(), 1);
    }

    #[test]
    fn test_numeric_version_is_accepted() {
        let package = parse_package(json!({"meta": {"version": 116}})).unwrap();
        assert_eq!(package.meta.version, "116");
        assert!(package.is_empty());
    }

    #[test]
    fn test_malformed_inputs() {
        assert!(matches!(
            parse_package("not json"),
            Err(ImportError::MalformedPackage(_))
        ));
        assert!(matches!(
            parse_package("[1, 2]"),
            Err(ImportError::MalformedPackage(_))
        ));
        assert!(matches!(
            parse_package(json!({})),
            Err(ImportError::MalformedPackage(_))
        ));
    }

    #[test]
    fn test_missing_version() {
        assert!(matches!(
            parse_package(json!({"pods": []})),
            Err(ImportError::MissingVersion)
        ));
        assert!(matches!(
            parse_package(json!({"meta": {"version": ""}})),
            Err(ImportError::MissingVersion)
        ));
    }

    #[test]
    fn test_pod_pages_alias_and_keyed_collections() {
        let package = parse_package(json!({
            "meta": {"version": "1.9.8"},
            "pod_pages": {"3": {"uri": "books"}},
            "helpers": "nope"
        }))
        .unwrap();
        assert_eq!(package.records(EntityKind::Page), &[json!({"uri": "books"})]);
        assert!(!package.collections.contains_key(&EntityKind::Helper));
    }

    #[test]
    fn test_strip_slashes() {
        assert_eq!(strip_slashes(r#"{\"a\":\"b\\\\c\"}"#), r#"{"a":"b\\c"}"#);
        assert_eq!(strip_slashes("trailing\\"), "trailing");
    }

    #[test]
    fn test_selector_from_value() {
        assert_eq!(Selector::from_value(&json!(true)), Some(Selector::All));
        assert_eq!(Selector::from_value(&json!(false)), None);
        assert_eq!(Selector::from_value(&json!([])), None);
        assert_eq!(
            Selector::from_value(&json!([1, "2", 0])),
            Some(Selector::Ids(vec![1, 2]))
        );
        assert_eq!(
            Selector::from_value(&json!("4, 5")),
            Some(Selector::Ids(vec![4, 5]))
        );
        assert_eq!(Selector::from_value(&json!(7)), Some(Selector::Ids(vec![7])));
    }

    #[test]
    fn test_selection_deserialize() {
        let selection: Selection =
            serde_json::from_value(json!({"pods": true, "pages": [3], "helpers": false})).unwrap();
        assert_eq!(selection.pods, Some(Selector::All));
        assert_eq!(selection.templates, None);
        assert_eq!(selection.pages, Some(Selector::Ids(vec![3])));
        assert_eq!(selection.helpers, None);
        assert!(!selection.is_empty());
        assert!(Selection::default().is_empty());
    }

    #[test]
    fn test_selector_from_str() {
        assert_eq!("all".parse::<Selector>(), Ok(Selector::All));
        assert_eq!("1, 2".parse::<Selector>(), Ok(Selector::Ids(vec![1, 2])));
        assert!("1,x".parse::<Selector>().is_err());
    }
}
