use unicode_normalization::UnicodeNormalization;

use crate::host::SearchTextExtractor;
use crate::types::{FileMetadata, Fragment};

/// Default search text: the fragment's visible text, then the tags, then the
/// linked file's frontmatter keys and values, lowercased with accents removed.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl SearchTextExtractor for PlainTextExtractor {
    fn extract(&self, fragment: &Fragment, tags: &[String], file_metadata: Option<&FileMetadata>) -> String {
        let mut parts = vec![fragment.text()];

        if !tags.is_empty() {
            parts.push(tags.join(" "));
        }

        if let Some(metadata) = file_metadata.filter(|m| !m.is_empty()) {
            parts.push(metadata.keys().cloned().collect::<Vec<_>>().join(" "));
            parts.push(
                metadata
                    .values()
                    .map(|v| v.to_search_text())
                    .filter(|v| !v.is_empty())
                    .collect::<Vec<_>>()
                    .join(" "),
            );
        }

        let joined = parts
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        normalize_for_search(&joined)
    }
}

/// Lowercase, NFD-decompose and drop combining marks so "Résumé" matches "resume".
pub fn normalize_for_search(value: &str) -> String {
    value
        .to_lowercase()
        .nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .collect()
}
