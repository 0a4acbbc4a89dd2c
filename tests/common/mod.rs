//! Common test utilities for integration tests

use pods_migrate::migration::BuildTable;
use pods_migrate::{Catalog, Collection, Field, FieldType, Helper, Page, Pod, Template};
use serde_json::{Value, json};
use tempfile::TempDir;

/// Build-number table covering the tags used by the fixtures
pub fn test_builds() -> BuildTable {
    [("1100", "1.10.0"), ("1142", "1.14.2"), ("2000", "2.0.0")]
        .into_iter()
        .collect()
}

/// A 1.x package with one pod of every legacy column type plus auxiliaries
pub fn legacy_package() -> Value {
    json!({
        "meta": {"version": "116", "build": "1262304000"},
        "pods": [{
            "id": "4",
            "name": "Book_Reviews",
            "label": "",
            "is_toplevel": "1",
            "detail_page": "reviews/{@name}",
            "before_helpers": "check_review",
            "after_helpers": "",
            "fields": [
                {"id": "11", "name": "author", "label": "Reviewer", "coltype": "txt", "weight": "1", "required": "1"},
                {"id": "12", "name": "rating", "coltype": "num", "weight": "2", "unique": "3"},
                {"id": "13", "name": "cover", "coltype": "file", "weight": "3"},
                {"id": "14", "name": "genres", "coltype": "pick", "pickval": "genre", "multiple": "1", "weight": "4"},
                {"id": "15", "name": "body", "coltype": "desc", "comment": " Review text ", "weight": "5"},
                {"id": "16", "name": "snippet", "coltype": "code", "weight": "6"},
                {"id": "17", "name": "featured", "coltype": "bool", "weight": "7"},
                {"id": "18", "name": "read_on", "coltype": "date", "weight": "8"},
                {"id": "19", "name": "owner", "coltype": "pick", "pickval": "wp_user", "weight": "9"},
                {"id": "20", "name": "color", "coltype": "color_picker", "weight": "10"}
            ]
        }],
        "templates": [{"id": "2", "name": "review_list", "code": "<li>{@name}</li>"}],
        "pod_pages": [{"id": "3", "uri": "/reviews/*/", "phpcode": "<?php echo 1; ?>"}],
        "helpers": [{"id": "5", "name": "check_review", "type": "before", "phpcode": "return true;"}]
    })
}

/// A 2.0 package carrying one pod
pub fn current_package(pod: Value) -> Value {
    json!({
        "meta": {"version": "2.0.5", "build": 1700000000},
        "pods": [pod]
    })
}

/// Current-generation pod with two fields
pub fn books_pod() -> Pod {
    let mut pod = Pod::new("books");
    pod.label = "Books".to_string();
    pod.options.insert("show_in_menu".to_string(), json!(1));

    let mut title = Field::new("title", FieldType::Text);
    title.label = "Title".to_string();
    title.weight = 1;
    title.options.insert("text_max_length".to_string(), json!(64));
    title.options.insert("text_placeholder".to_string(), json!("Title"));

    let mut pages = Field::new("pages", FieldType::Number);
    pages.label = "Pages".to_string();
    pages.weight = 2;
    pages.options.insert("number_decimals".to_string(), json!(0));

    pod.fields = vec![title, pages];
    pod
}

/// Catalog holding two pods and one entity of every other kind
pub fn populated_catalog() -> Catalog {
    let mut catalog = Catalog::new();

    catalog.save(books_pod()).unwrap();
    let mut authors = Pod::new("authors");
    authors.label = "Authors".to_string();
    authors.fields = vec![Field::new("bio", FieldType::Paragraph)];
    catalog.save(authors).unwrap();

    catalog
        .save(Template {
            name: "book_list".to_string(),
            code: "<li>{@title}</li>".to_string(),
            ..Default::default()
        })
        .unwrap();
    catalog
        .save(Page {
            name: "books/*".to_string(),
            code: "{@template}".to_string(),
            ..Default::default()
        })
        .unwrap();
    catalog
        .save(Helper {
            name: "format_isbn".to_string(),
            code: "return $value;".to_string(),
            ..Default::default()
        })
        .unwrap();

    catalog
}

/// Temporary directory for on-disk catalog and config files
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}
