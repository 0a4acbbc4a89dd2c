//! Legacy (1.x) package types for migration support
//!
//! This module contains the pod and field shapes written by the 1.x
//! exporter. They are only read during import and converted to the
//! current model by the legacy pipeline; nothing is ever written back in
//! this format.

use crate::model::serde_impl;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Column type token used by 1.x fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LegacyFieldType {
    #[default]
    Txt,
    Desc,
    Code,
    Bool,
    Num,
    Date,
    Pick,
    File,
    /// Tokens without a remapping pass through unchanged
    Other(String),
}

impl LegacyFieldType {
    pub fn as_str(&self) -> &str {
        match self {
            LegacyFieldType::Txt => "txt",
            LegacyFieldType::Desc => "desc",
            LegacyFieldType::Code => "code",
            LegacyFieldType::Bool => "bool",
            LegacyFieldType::Num => "num",
            LegacyFieldType::Date => "date",
            LegacyFieldType::Pick => "pick",
            LegacyFieldType::File => "file",
            LegacyFieldType::Other(token) => token,
        }
    }
}

impl From<&str> for LegacyFieldType {
    fn from(token: &str) -> Self {
        match token {
            "txt" => LegacyFieldType::Txt,
            "desc" => LegacyFieldType::Desc,
            "code" => LegacyFieldType::Code,
            "bool" => LegacyFieldType::Bool,
            "num" => LegacyFieldType::Num,
            "date" => LegacyFieldType::Date,
            "pick" => LegacyFieldType::Pick,
            "file" => LegacyFieldType::File,
            other => LegacyFieldType::Other(other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for LegacyFieldType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = serde_impl::string(deserializer)?;
        Ok(LegacyFieldType::from(token.trim()))
    }
}

/// A 1.x field (column) definition
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyField {
    #[serde(default, deserialize_with = "serde_impl::opt_id")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "serde_impl::string")]
    pub name: String,
    #[serde(default, deserialize_with = "serde_impl::string")]
    pub label: String,
    /// Help text; becomes `description`
    #[serde(default, deserialize_with = "serde_impl::string")]
    pub comment: String,
    #[serde(default)]
    pub coltype: LegacyFieldType,
    #[serde(default, deserialize_with = "serde_impl::int")]
    pub weight: i64,
    #[serde(default, deserialize_with = "serde_impl::int")]
    pub required: i64,
    #[serde(default, deserialize_with = "serde_impl::int")]
    pub unique: i64,
    #[serde(default, deserialize_with = "serde_impl::int")]
    pub multiple: i64,
    #[serde(default, deserialize_with = "serde_impl::string")]
    pub input_helper: String,
    /// Relationship target (`wp_user`, `wp_post`, or a pod name)
    #[serde(default, deserialize_with = "serde_impl::string")]
    pub pickval: String,
    #[serde(default, deserialize_with = "serde_impl::string")]
    pub pick_filter: String,
    #[serde(default, deserialize_with = "serde_impl::string")]
    pub pick_orderby: String,
}

/// A 1.x pod definition
///
/// ## Legacy Key Support
///
/// 1.x packages use older names for several pod settings; the 2.0 names
/// are accepted as well and lose to the legacy key when both are present:
/// - `is_toplevel` -> `show_in_menu`
/// - `detail_page` -> `detail_url`
/// - `before_helpers` / `after_helpers` -> `pre_save_helpers` / `post_save_helpers`
/// - `pre_drop_helpers` / `post_drop_helpers` -> `pre_delete_helpers` / `post_delete_helpers`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyPod {
    #[serde(default, deserialize_with = "serde_impl::opt_id")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "serde_impl::string")]
    pub name: String,
    #[serde(default, deserialize_with = "serde_impl::string")]
    pub label: String,
    #[serde(default)]
    pub is_toplevel: Option<Value>,
    #[serde(default, deserialize_with = "serde_impl::opt_string")]
    pub detail_page: Option<String>,
    #[serde(default, deserialize_with = "serde_impl::opt_string")]
    pub before_helpers: Option<String>,
    #[serde(default, deserialize_with = "serde_impl::opt_string")]
    pub after_helpers: Option<String>,
    #[serde(default, deserialize_with = "serde_impl::opt_string")]
    pub pre_drop_helpers: Option<String>,
    #[serde(default, deserialize_with = "serde_impl::opt_string")]
    pub post_drop_helpers: Option<String>,
    #[serde(default)]
    pub show_in_menu: Option<Value>,
    #[serde(default, deserialize_with = "serde_impl::opt_string")]
    pub detail_url: Option<String>,
    #[serde(default, deserialize_with = "serde_impl::opt_string")]
    pub pre_save_helpers: Option<String>,
    #[serde(default, deserialize_with = "serde_impl::opt_string")]
    pub post_save_helpers: Option<String>,
    #[serde(default, deserialize_with = "serde_impl::opt_string")]
    pub pre_delete_helpers: Option<String>,
    #[serde(default, deserialize_with = "serde_impl::opt_string")]
    pub post_delete_helpers: Option<String>,
    #[serde(default, deserialize_with = "serde_impl::list_or_map")]
    pub fields: Vec<LegacyField>,
}
