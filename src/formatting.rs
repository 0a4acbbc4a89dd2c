//! Formatting helper functions for command output
//!
//! This module renders import summaries for humans.

use crate::model::EntityKind;
use crate::package::ImportSummary;

/// Title-case a collection key (`"pods"` -> `"Pods"`)
fn heading(kind: EntityKind) -> String {
    let key = kind.collection();
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Format an import summary into a display string
///
/// # Arguments
/// * `summary` - Result of a successful import
///
/// # Returns
/// One section per collection with a list item per imported entity,
/// followed by the skipped records, if any
pub fn format_summary(summary: &ImportSummary) -> String {
    let mut result = format!("Import complete! {} item(s) imported.\n", summary.total());

    for (kind, entities) in &summary.imported {
        if entities.is_empty() {
            continue;
        }
        result.push_str(&format!("\n{}\n", heading(*kind)));
        for label in entities.values() {
            result.push_str(&format!("- {}\n", label));
        }
    }

    if !summary.skipped.is_empty() {
        result.push_str(&format!("\nSkipped {} record(s)\n", summary.skipped.len()));
        for skipped in &summary.skipped {
            result.push_str(&format!("- [{}] {}\n", skipped.kind, skipped.reason));
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::SkippedEntity;
    use indexmap::IndexMap;

    #[test]
    fn test_heading() {
        assert_eq!(heading(EntityKind::Pod), "Pods");
        assert_eq!(heading(EntityKind::Helper), "Helpers");
    }

    #[test]
    fn test_format_summary() {
        let mut summary = ImportSummary::default();
        summary.imported.insert(
            EntityKind::Pod,
            IndexMap::from([("books".to_string(), "Books".to_string())]),
        );
        summary.imported.insert(
            EntityKind::Template,
            IndexMap::from([("list".to_string(), "list".to_string())]),
        );
        summary.skipped.push(SkippedEntity {
            kind: EntityKind::Page,
            reason: "missing name".to_string(),
        });

        let text = format_summary(&summary);
        assert!(text.starts_with("Import complete! 2 item(s) imported."));
        assert!(text.contains("\nPods\n- Books\n"));
        assert!(text.contains("\nTemplates\n- list\n"));
        assert!(text.contains("Skipped 1 record(s)\n- [page] missing name\n"));
    }
}
