use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::SectionType;

/// Built-in heading synonyms per section type, in checking order.
pub const DEFAULT_KEYWORDS: [(SectionType, &[&str]); 4] = [
    (
        SectionType::Intro,
        &["introduction", "background", "overview"],
    ),
    (
        SectionType::Conc,
        &["conclusion", "discussion and results", "discussion"],
    ),
    (SectionType::Refer, &["references"]),
    (SectionType::Acknow, &["acknowledgements"]),
];

/// Section type → ordered list of keyword strings treated as synonyms for
/// that section's heading.
///
/// Keywords are stored lower-cased, since lines are lower-cased before
/// comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordMap(BTreeMap<SectionType, Vec<String>>);

/// [`DEFAULT_KEYWORDS`] as a map, built once per process.
pub static DEFAULT_KEYWORD_MAP: Lazy<KeywordMap> = Lazy::new(|| {
    KeywordMap(
        DEFAULT_KEYWORDS
            .iter()
            .map(|(section, kws)| (*section, kws.iter().map(|k| k.to_string()).collect()))
            .collect(),
    )
});

impl Default for KeywordMap {
    fn default() -> Self {
        DEFAULT_KEYWORD_MAP.clone()
    }
}

impl KeywordMap {
    /// Keywords for `section`, empty if none are configured.
    pub fn get(&self, section: SectionType) -> &[String] {
        self.0.get(&section).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replace the keyword list for `section`.
    pub fn set(&mut self, section: SectionType, keywords: Vec<String>) {
        self.0.insert(section, normalize_keywords(keywords));
    }

    pub fn iter(&self) -> impl Iterator<Item = (SectionType, &[String])> {
        self.0.iter().map(|(s, kws)| (*s, kws.as_slice()))
    }
}

fn normalize_keywords(keywords: Vec<String>) -> Vec<String> {
    keywords
        .into_iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keywords() {
        let map = KeywordMap::default();
        assert_eq!(map.get(SectionType::Refer), ["references"]);
        assert_eq!(
            map.get(SectionType::Conc),
            ["conclusion", "discussion and results", "discussion"]
        );
        assert_eq!(map.iter().count(), 4);
    }

    #[test]
    fn test_set_normalizes() {
        let mut map = KeywordMap::default();
        map.set(
            SectionType::Refer,
            vec!["References".into(), " Bibliography ".into(), "  ".into()],
        );
        assert_eq!(map.get(SectionType::Refer), ["references", "bibliography"]);
    }
}
