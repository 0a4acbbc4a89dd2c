//! Templates, pages and helpers
//!
//! These are simple named entities; unknown attributes are kept in `extra`
//! so a package round-trips without loss.

use super::merge::{deep_merge, override_with};
use super::serde_impl;
use super::{Entity, EntityKind, Options};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Display template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(
        default,
        deserialize_with = "serde_impl::opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "serde_impl::string")]
    pub name: String,
    /// Render body
    #[serde(default, deserialize_with = "serde_impl::string")]
    pub code: String,
    #[serde(flatten)]
    pub extra: Options,
}

/// Routed page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(
        default,
        deserialize_with = "serde_impl::opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<u64>,
    /// URL path, without leading or trailing `/`
    #[serde(default, deserialize_with = "serde_impl::string")]
    pub name: String,
    #[serde(default, deserialize_with = "serde_impl::string")]
    pub code: String,
    #[serde(flatten)]
    pub extra: Options,
}

/// Lifecycle phase a helper runs in
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HelperPhase {
    PreSave,
    PostSave,
    PreDelete,
    PostDelete,
    /// Non-lifecycle helpers (`display`, `input`, ...) and unknown tokens
    Other(String),
}

impl HelperPhase {
    pub fn as_str(&self) -> &str {
        match self {
            HelperPhase::PreSave => "pre_save",
            HelperPhase::PostSave => "post_save",
            HelperPhase::PreDelete => "pre_delete",
            HelperPhase::PostDelete => "post_delete",
            HelperPhase::Other(token) => token,
        }
    }
}

impl From<&str> for HelperPhase {
    fn from(token: &str) -> Self {
        match token {
            "pre_save" => HelperPhase::PreSave,
            "post_save" => HelperPhase::PostSave,
            "pre_delete" => HelperPhase::PreDelete,
            "post_delete" => HelperPhase::PostDelete,
            other => HelperPhase::Other(other.to_string()),
        }
    }
}

impl fmt::Display for HelperPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for HelperPhase {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for HelperPhase {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = serde_impl::string(deserializer)?;
        Ok(HelperPhase::from(token.as_str()))
    }
}

/// Lifecycle callback
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Helper {
    #[serde(
        default,
        deserialize_with = "serde_impl::opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "serde_impl::string")]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub helper_type: Option<HelperPhase>,
    /// Callback body
    #[serde(default, deserialize_with = "serde_impl::string")]
    pub code: String,
    #[serde(flatten)]
    pub extra: Options,
}

macro_rules! impl_entity {
    ($ty:ty, $kind:expr) => {
        impl Entity for $ty {
            const KIND: EntityKind = $kind;

            fn id(&self) -> Option<u64> {
                self.id
            }

            fn set_id(&mut self, id: Option<u64>) {
                self.id = id;
            }

            fn name(&self) -> &str {
                &self.name
            }
        }
    };
}

impl_entity!(Template, EntityKind::Template);
impl_entity!(Page, EntityKind::Page);
impl_entity!(Helper, EntityKind::Helper);

/// Incoming template attributes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateRecord {
    #[serde(default, deserialize_with = "serde_impl::opt_id")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "serde_impl::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "serde_impl::opt_string")]
    pub code: Option<String>,
    #[serde(flatten)]
    pub extra: Options,
}

impl TemplateRecord {
    pub fn merge_onto(self, base: Template) -> Template {
        let mut template = base;
        override_with(&mut template.name, self.name);
        override_with(&mut template.code, self.code);
        deep_merge(&mut template.extra, self.extra);
        template
    }
}

/// Incoming page attributes
///
/// 1.x packages name pages by `uri` and carry the body as `phpcode`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageRecord {
    #[serde(default, deserialize_with = "serde_impl::opt_id")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "serde_impl::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "serde_impl::opt_string")]
    pub uri: Option<String>,
    #[serde(default, deserialize_with = "serde_impl::opt_string")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "serde_impl::opt_string")]
    pub phpcode: Option<String>,
    #[serde(flatten)]
    pub extra: Options,
}

impl PageRecord {
    /// Merge onto `base`; legacy keys must already be relocated
    pub fn merge_onto(self, base: Page) -> Page {
        let mut page = base;
        override_with(&mut page.name, self.name);
        override_with(&mut page.code, self.code);
        deep_merge(&mut page.extra, self.extra);
        page
    }
}

/// Incoming helper attributes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HelperRecord {
    #[serde(default, deserialize_with = "serde_impl::opt_id")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "serde_impl::opt_string")]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub helper_type: Option<HelperPhase>,
    #[serde(default, deserialize_with = "serde_impl::opt_string")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "serde_impl::opt_string")]
    pub phpcode: Option<String>,
    #[serde(flatten)]
    pub extra: Options,
}

impl HelperRecord {
    /// Merge onto `base`; legacy keys must already be relocated
    pub fn merge_onto(self, base: Helper) -> Helper {
        let mut helper = base;
        override_with(&mut helper.name, self.name);
        if self.helper_type.is_some() {
            helper.helper_type = self.helper_type;
        }
        override_with(&mut helper.code, self.code);
        deep_merge(&mut helper.extra, self.extra);
        helper
    }
}
