//! Conversion of legacy (1.x) fields to current fields
//!
//! These conversion functions are used only while importing 1.x packages.
//! They are pure: merging with a field that already exists on the target
//! pod happens later, when the pod record is merged.

use super::legacy_types::{LegacyField, LegacyFieldType};
use crate::model::{Field, FieldType, Options};
use serde_json::{Value, json};

/// Map a legacy column type token to the current field type
///
/// Tokens without a mapping pass through unchanged.
pub fn remap_field_type(legacy: &LegacyFieldType) -> FieldType {
    match legacy {
        LegacyFieldType::Txt => FieldType::Text,
        LegacyFieldType::Desc => FieldType::Wysiwyg,
        LegacyFieldType::Code => FieldType::Paragraph,
        LegacyFieldType::Bool => FieldType::Boolean,
        LegacyFieldType::Num => FieldType::Number,
        LegacyFieldType::Date => FieldType::Datetime,
        LegacyFieldType::Pick => FieldType::Pick,
        LegacyFieldType::File => FieldType::File,
        LegacyFieldType::Other(token) => FieldType::from(token.as_str()),
    }
}

/// Map a legacy relationship target to a current `pick_object`
pub fn remap_pick_object(pickval: &str) -> String {
    match pickval {
        "wp_user" => "user".to_string(),
        "wp_post" => "post_type-post".to_string(),
        "wp_page" => "post_type-page".to_string(),
        "wp_taxonomy" => "taxonomy-category".to_string(),
        other => format!("pod-{}", other),
    }
}

fn clamp_flag(value: i64) -> i64 {
    value.clamp(0, 1)
}

fn set(options: &mut Options, key: &str, value: Value) {
    options.insert(key.to_string(), value);
}

/// Convert a legacy field to a current field with its default options
///
/// The field name is trimmed but not yet checked against reserved names.
pub fn remap_field(legacy: &LegacyField) -> Field {
    let field_type = remap_field_type(&legacy.coltype);
    let multiple = clamp_flag(legacy.multiple);

    let mut options = Options::new();
    set(&mut options, "required", json!(clamp_flag(legacy.required)));
    set(&mut options, "unique", json!(clamp_flag(legacy.unique)));
    set(&mut options, "input_helper", json!(legacy.input_helper));

    let mut field = Field {
        id: None,
        name: legacy.name.trim().to_string(),
        label: legacy.label.trim().to_string(),
        description: legacy.comment.trim().to_string(),
        field_type,
        weight: legacy.weight,
        pick_object: None,
        options,
        extra: Options::new(),
    };

    // Defaults depend on the resulting type; wysiwyg only comes from `desc`
    match field.field_type {
        FieldType::Pick => {
            field.pick_object = Some(remap_pick_object(&legacy.pickval));
            let options = &mut field.options;
            set(options, "pick_filter", json!(legacy.pick_filter));
            set(options, "pick_orderby", json!(legacy.pick_orderby));
            set(options, "pick_display", json!("{@name}"));
            set(options, "pick_size", json!("medium"));
            if multiple == 1 {
                set(options, "pick_format_type", json!("multi"));
                set(options, "pick_format_multi", json!("checkbox"));
                set(options, "pick_limit", json!(0));
            } else {
                set(options, "pick_format_type", json!("single"));
                set(options, "pick_format_single", json!("dropdown"));
                set(options, "pick_limit", json!(1));
            }
        }
        FieldType::File => {
            set(&mut field.options, "file_format_type", json!("multi"));
            set(&mut field.options, "file_type", json!("any"));
        }
        FieldType::Number => {
            set(&mut field.options, "number_decimals", json!(2));
        }
        FieldType::Wysiwyg if legacy.coltype == LegacyFieldType::Desc => {
            set(&mut field.options, "wysiwyg_editor", json!("tinymce"));
        }
        FieldType::Text => {
            set(&mut field.options, "text_max_length", json!(128));
        }
        _ => {}
    }

    field
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy(name: &str, coltype: &str) -> LegacyField {
        LegacyField {
            name: name.to_string(),
            label: format!(" {} ", name),
            coltype: LegacyFieldType::from(coltype),
            ..Default::default()
        }
    }

    #[test]
    fn test_type_table() {
        let cases = [
            ("txt", FieldType::Text),
            ("desc", FieldType::Wysiwyg),
            ("code", FieldType::Paragraph),
            ("bool", FieldType::Boolean),
            ("num", FieldType::Number),
            ("date", FieldType::Datetime),
            ("pick", FieldType::Pick),
            ("file", FieldType::File),
            ("slug", FieldType::Other("slug".to_string())),
        ];
        for (token, expected) in cases {
            assert_eq!(remap_field(&legacy("f", token)).field_type, expected, "{}", token);
        }
    }

    #[test]
    fn test_common_attributes() {
        let mut source = legacy(" title ", "txt");
        source.comment = " Book title ".to_string();
        source.required = 5;
        source.unique = -2;
        source.weight = 4;
        source.input_helper = "slugify".to_string();

        let field = remap_field(&source);
        assert_eq!(field.name, "title");
        assert_eq!(field.label, "title");
        assert_eq!(field.description, "Book title");
        assert_eq!(field.weight, 4);
        assert_eq!(field.options["required"], json!(1));
        assert_eq!(field.options["unique"], json!(0));
        assert_eq!(field.options["input_helper"], json!("slugify"));
        assert_eq!(field.options["text_max_length"], json!(128));
    }

    #[test]
    fn test_pick_defaults_single() {
        let mut source = legacy("owner", "pick");
        source.pickval = "wp_user".to_string();
        source.pick_filter = "status = 1".to_string();

        let field = remap_field(&source);
        assert_eq!(field.pick_object.as_deref(), Some("user"));
        assert_eq!(field.options["pick_filter"], json!("status = 1"));
        assert_eq!(field.options["pick_display"], json!("{@name}"));
        assert_eq!(field.options["pick_size"], json!("medium"));
        assert_eq!(field.options["pick_format_type"], json!("single"));
        assert_eq!(field.options["pick_format_single"], json!("dropdown"));
        assert_eq!(field.options["pick_limit"], json!(1));
    }

    #[test]
    fn test_pick_defaults_multi() {
        let mut source = legacy("authors", "pick");
        source.pickval = "writers".to_string();
        source.multiple = 3;

        let field = remap_field(&source);
        assert_eq!(field.pick_object.as_deref(), Some("pod-writers"));
        assert_eq!(field.options["pick_format_type"], json!("multi"));
        assert_eq!(field.options["pick_format_multi"], json!("checkbox"));
        assert_eq!(field.options["pick_limit"], json!(0));
    }

    #[test]
    fn test_pick_object_table() {
        assert_eq!(remap_pick_object("wp_post"), "post_type-post");
        assert_eq!(remap_pick_object("wp_page"), "post_type-page");
        assert_eq!(remap_pick_object("wp_taxonomy"), "taxonomy-category");
        assert_eq!(remap_pick_object("books"), "pod-books");
    }

    #[test]
    fn test_type_specific_defaults() {
        let file = remap_field(&legacy("cover", "file"));
        assert_eq!(file.options["file_format_type"], json!("multi"));
        assert_eq!(file.options["file_type"], json!("any"));

        let number = remap_field(&legacy("price", "num"));
        assert_eq!(number.options["number_decimals"], json!(2));

        let wysiwyg = remap_field(&legacy("body", "desc"));
        assert_eq!(wysiwyg.options["wysiwyg_editor"], json!("tinymce"));

        let paragraph = remap_field(&legacy("snippet", "code"));
        assert!(!paragraph.options.contains_key("text_max_length"));

        let other = remap_field(&legacy("slug", "slug"));
        assert_eq!(other.options.len(), 3);
    }

    #[test]
    fn test_remap_is_deterministic() {
        let source = legacy("price", "num");
        assert_eq!(remap_field(&source), remap_field(&source));
    }
}
