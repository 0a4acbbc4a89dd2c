//! Name validation and normalization helpers
//!
//! This module contains the identifier rules shared by the importers:
//! reserved field names, identifier cleaning, default labels and page
//! path trimming.

use std::collections::HashSet;

/// Field names reserved for the auto-injected core fields
pub const RESERVED_FIELD_NAMES: [&str; 3] = ["created", "modified", "author"];

/// Rename a field whose name collides with a reserved name
///
/// # Arguments
/// * `candidate` - The field name from the package
/// * `reserved` - Names that imported fields may not use
///
/// # Returns
/// `candidate` with `"2"` appended when reserved, otherwise unchanged
///
/// # Examples
/// ```
/// # use pods_migrate::validation::{resolve_field_name, RESERVED_FIELD_NAMES};
/// assert_eq!(resolve_field_name("author", &RESERVED_FIELD_NAMES), "author2");
/// assert_eq!(resolve_field_name("title", &RESERVED_FIELD_NAMES), "title");
/// ```
pub fn resolve_field_name(candidate: &str, reserved: &[&str]) -> String {
    if reserved.contains(&candidate) {
        format!("{}2", candidate)
    } else {
        candidate.to_string()
    }
}

/// Rename a field so it is neither reserved nor already taken
///
/// Reserved names get `"2"` appended first. A name that is still taken has
/// its numeric suffix bumped until it is free (`author2` -> `author3`).
pub fn unique_field_name(candidate: &str, reserved: &[&str], taken: &HashSet<String>) -> String {
    let name = resolve_field_name(candidate, reserved);
    if !taken.contains(&name) {
        return name;
    }

    let base = name.trim_end_matches(|c: char| c.is_ascii_digit());
    let mut counter = name[base.len()..].parse::<u64>().map_or(2, |n| n + 1);
    loop {
        let next = format!("{}{}", base, counter);
        if !taken.contains(&next) && !reserved.contains(&next.as_str()) {
            return next;
        }
        counter += 1;
    }
}

/// Clean a name into an identifier
///
/// Trims, drops characters other than ASCII letters, digits, `-`, `_` and
/// whitespace, turns whitespace runs into `_`, collapses repeated `_` and
/// lowercases the result.
pub fn clean_name(name: &str) -> String {
    let mut cleaned = String::with_capacity(name.len());
    let mut pending_space = false;

    for c in name.trim().chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if !(c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            continue;
        }
        if pending_space {
            cleaned.push('_');
            pending_space = false;
        }
        if c == '_' && cleaned.ends_with('_') {
            continue;
        }
        cleaned.push(c.to_ascii_lowercase());
    }

    cleaned
}

/// Default label for a name: underscores to spaces, each word capitalized
pub fn label_from_name(name: &str) -> String {
    name.replace('_', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trim leading and trailing `/` from a page path
pub fn trim_page_path(path: &str) -> String {
    path.trim_matches('/').to_string()
}
