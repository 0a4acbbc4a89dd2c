use super::merge::{deep_merge, override_with};
use super::serde_impl;
use super::{Entity, EntityKind, Options};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

fn default_pod_type() -> String {
    "pod".to_string()
}

fn default_storage() -> String {
    "table".to_string()
}

/// Current-generation field type vocabulary
///
/// The vocabulary is open-ended on the wire: tokens this crate does not know
/// are kept verbatim in `Other`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum FieldType {
    #[default]
    Text,
    Wysiwyg,
    Paragraph,
    Boolean,
    Number,
    Datetime,
    Pick,
    File,
    Other(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Wysiwyg => "wysiwyg",
            FieldType::Paragraph => "paragraph",
            FieldType::Boolean => "boolean",
            FieldType::Number => "number",
            FieldType::Datetime => "datetime",
            FieldType::Pick => "pick",
            FieldType::File => "file",
            FieldType::Other(token) => token,
        }
    }
}

impl From<&str> for FieldType {
    fn from(token: &str) -> Self {
        match token {
            "text" => FieldType::Text,
            "wysiwyg" => FieldType::Wysiwyg,
            "paragraph" => FieldType::Paragraph,
            "boolean" => FieldType::Boolean,
            "number" => FieldType::Number,
            "datetime" => FieldType::Datetime,
            "pick" => FieldType::Pick,
            "file" => FieldType::File,
            other => FieldType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = serde_impl::string(deserializer)?;
        Ok(FieldType::from(token.as_str()))
    }
}

/// One typed attribute of a Pod
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Field {
    #[serde(
        default,
        deserialize_with = "serde_impl::opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<u64>,
    /// Unique within the owning pod
    #[serde(default, deserialize_with = "serde_impl::string")]
    pub name: String,
    #[serde(default, deserialize_with = "serde_impl::string")]
    pub label: String,
    #[serde(default, deserialize_with = "serde_impl::string")]
    pub description: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    /// Sort order within the pod
    #[serde(default, deserialize_with = "serde_impl::int")]
    pub weight: i64,
    /// Relationship target for `pick` fields (e.g. `user`, `pod-books`)
    #[serde(
        default,
        deserialize_with = "serde_impl::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub pick_object: Option<String>,
    /// Type-specific options
    #[serde(default, deserialize_with = "serde_impl::options")]
    pub options: Options,
    /// Attributes this crate does not model, kept for round trips
    #[serde(flatten)]
    pub extra: Options,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            ..Default::default()
        }
    }

    /// Merge this field onto an existing one of the same name
    ///
    /// Scalar attributes of `self` override, `options` and unknown
    /// attributes deep-merge so options configured on the existing field
    /// survive unless explicitly overridden.
    pub fn merge_onto(self, base: Field) -> Field {
        let mut merged = base;
        merged.id = self.id.or(merged.id);
        merged.name = self.name;
        merged.label = self.label;
        merged.description = self.description;
        merged.field_type = self.field_type;
        merged.weight = self.weight;
        if self.pick_object.is_some() {
            merged.pick_object = self.pick_object;
        }
        deep_merge(&mut merged.options, self.options);
        deep_merge(&mut merged.extra, self.extra);
        merged
    }
}

/// A persisted record-type definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pod {
    #[serde(
        default,
        deserialize_with = "serde_impl::opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "serde_impl::string")]
    pub name: String,
    #[serde(default, deserialize_with = "serde_impl::string")]
    pub label: String,
    #[serde(
        rename = "type",
        default = "default_pod_type",
        deserialize_with = "serde_impl::string"
    )]
    pub pod_type: String,
    #[serde(default = "default_storage", deserialize_with = "serde_impl::string")]
    pub storage: String,
    #[serde(default, deserialize_with = "serde_impl::list_or_map")]
    pub fields: Vec<Field>,
    #[serde(default, deserialize_with = "serde_impl::options")]
    pub options: Options,
    #[serde(flatten)]
    pub extra: Options,
}

impl Pod {
    /// Create an empty table-backed pod
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            label: String::new(),
            pod_type: default_pod_type(),
            storage: default_storage(),
            fields: Vec::new(),
            options: Options::new(),
            extra: Options::new(),
        }
    }

    /// Find a field by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Drop persisted identity from every field
    pub fn strip_field_ids(&mut self) {
        for field in &mut self.fields {
            field.id = None;
        }
    }
}

impl Entity for Pod {
    const KIND: EntityKind = EntityKind::Pod;

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn set_id(&mut self, id: Option<u64>) {
        self.id = id;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn label(&self) -> &str {
        if self.label.is_empty() {
            &self.name
        } else {
            &self.label
        }
    }
}

/// Incoming pod attributes, as read from a package or produced by the
/// legacy pipeline
///
/// Every attribute is optional: absent attributes leave the base pod
/// untouched when the record is merged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PodRecord {
    #[serde(default, deserialize_with = "serde_impl::opt_id")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "serde_impl::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "serde_impl::opt_string")]
    pub label: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "serde_impl::opt_string")]
    pub pod_type: Option<String>,
    #[serde(default, deserialize_with = "serde_impl::opt_string")]
    pub storage: Option<String>,
    #[serde(default, deserialize_with = "serde_impl::opt_list_or_map")]
    pub fields: Option<Vec<Field>>,
    #[serde(default, deserialize_with = "serde_impl::opt_options")]
    pub options: Option<Options>,
    #[serde(flatten)]
    pub extra: Options,
}

impl PodRecord {
    /// Override-merge this record onto `base`
    ///
    /// Top-level attributes override and `options` deep-merge. Incoming
    /// fields are deep-merged onto the base field of the same name; base
    /// fields the record does not mention are kept.
    pub fn merge_onto(self, base: Pod) -> Pod {
        let mut pod = base;
        override_with(&mut pod.name, self.name);
        override_with(&mut pod.label, self.label);
        override_with(&mut pod.pod_type, self.pod_type);
        override_with(&mut pod.storage, self.storage);
        if let Some(options) = self.options {
            deep_merge(&mut pod.options, options);
        }
        deep_merge(&mut pod.extra, self.extra);
        if let Some(fields) = self.fields {
            pod.fields = merge_fields(std::mem::take(&mut pod.fields), fields);
        }
        pod
    }
}

/// Merge an incoming field list onto the fields of an existing pod
///
/// Incoming fields come first, in package order, each merged onto the base
/// field of the same name; base fields the package does not mention follow
/// unchanged. Names stay unique: a repeated incoming name folds into the
/// earlier entry.
fn merge_fields(base: Vec<Field>, incoming: Vec<Field>) -> Vec<Field> {
    let mut remaining = base;
    let mut merged: Vec<Field> = Vec::with_capacity(incoming.len() + remaining.len());

    for field in incoming {
        if let Some(pos) = merged.iter().position(|f| f.name == field.name) {
            let earlier = std::mem::take(&mut merged[pos]);
            merged[pos] = field.merge_onto(earlier);
        } else if let Some(pos) = remaining.iter().position(|f| f.name == field.name) {
            let existing = remaining.remove(pos);
            merged.push(field.merge_onto(existing));
        } else {
            merged.push(field);
        }
    }

    merged.append(&mut remaining);
    merged
}
