use std::collections::BTreeMap;

use papersect_core::config_file::ConfigFile;
use papersect_core::{Candidate, Detection, SectionType};

use crate::config::{DetectionConfig, DetectionConfigBuilder};
use crate::{ParsingError, first_reference, section, text_processing};

/// Where the reference list of a paper starts, and how that was decided.
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceBoundary {
    /// A references heading was resolved.
    Heading(Candidate),
    /// No heading resembled a references keyword; the fallback detector
    /// found exactly one first-reference line.
    FirstReference(Candidate),
    /// Neither path produced a single line. `heading` is the ambiguous or
    /// not-found heading outcome and `first_references` whatever the fallback
    /// returned (not run when the heading was ambiguous).
    Unresolved {
        heading: Detection,
        first_references: Vec<Candidate>,
    },
}

impl ReferenceBoundary {
    /// Line index at which the references begin, if one was settled on.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Heading(c) | Self::FirstReference(c) => Some(c.index),
            Self::Unresolved { .. } => None,
        }
    }

    pub fn kind_str(&self) -> &'static str {
        match self {
            Self::Heading(_) => "heading",
            Self::FirstReference(_) => "first_reference",
            Self::Unresolved { .. } => "unresolved",
        }
    }
}

/// Paper body with the reference list cut off.
#[derive(Debug, Clone, PartialEq)]
pub struct StrippedPaper {
    /// Token-filtered lines, truncated before the reference boundary when one
    /// was found, otherwise all of them.
    pub lines: Vec<String>,
    pub boundary: ReferenceBoundary,
}

/// A configurable section detection pipeline.
///
/// Holds a [`DetectionConfig`] and exposes each step as a method. Use
/// [`SectionDetector::with_config`] to supply custom thresholds and keywords.
pub struct SectionDetector {
    config: DetectionConfig,
}

impl Default for SectionDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionDetector {
    /// Create a detector with default configuration.
    pub fn new() -> Self {
        Self {
            config: DetectionConfig::default(),
        }
    }

    /// Create a detector with a custom configuration.
    pub fn with_config(config: DetectionConfig) -> Self {
        Self { config }
    }

    /// Build and validate a configuration from an on-disk config file.
    pub fn from_config_file(file: &ConfigFile) -> Result<Self, ParsingError> {
        let config = DetectionConfigBuilder::from_config_file(file).build()?;
        Ok(Self::with_config(config))
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Token-count filter. With a section, that section's keywords are kept
    /// regardless of length.
    pub fn filter<S: AsRef<str>>(&self, lines: &[S], keep: Option<SectionType>) -> Vec<String> {
        let keep_keywords = keep.map(|s| self.config.keywords.get(s)).unwrap_or(&[]);
        text_processing::filter_by_token_count(lines, self.config.token_threshold, keep_keywords)
    }

    /// Locate one section's heading.
    pub fn detect<S: AsRef<str>>(&self, lines: &[S], section: SectionType) -> Detection {
        section::detect_section_with_config(lines, section, &self.config)
    }

    /// Run [`detect`](Self::detect) for each of `sections`.
    pub fn detect_many<S: AsRef<str>>(
        &self,
        lines: &[S],
        sections: &[SectionType],
    ) -> BTreeMap<SectionType, Detection> {
        sections
            .iter()
            .map(|&s| (s, self.detect(lines, s)))
            .collect()
    }

    /// Fallback first-reference detection bounded by the configured
    /// lower bound ratio.
    pub fn detect_first_reference<S: AsRef<str>>(&self, lines: &[S]) -> Vec<Candidate> {
        first_reference::detect_first_reference(lines, self.config.lower_bound_ratio)
    }

    /// Find where the references start in already-filtered lines.
    ///
    /// The heading search runs first. The first-reference fallback only runs
    /// when no heading candidate exists at all, and is accepted only when it
    /// returns exactly one line.
    pub fn locate_references<S: AsRef<str>>(&self, lines: &[S]) -> ReferenceBoundary {
        match self.detect(lines, SectionType::Refer) {
            Detection::Resolved { candidate } => ReferenceBoundary::Heading(candidate),
            Detection::NotFound => {
                let mut found = self.detect_first_reference(lines);
                if found.len() == 1 {
                    ReferenceBoundary::FirstReference(found.remove(0))
                } else {
                    ReferenceBoundary::Unresolved {
                        heading: Detection::NotFound,
                        first_references: found,
                    }
                }
            }
            ambiguous @ Detection::Ambiguous { .. } => ReferenceBoundary::Unresolved {
                heading: ambiguous,
                first_references: Vec::new(),
            },
        }
    }

    /// Filter a raw paper with the `refer` keywords protected, then cut it
    /// before its reference list.
    pub fn strip_references<S: AsRef<str>>(&self, lines: &[S]) -> StrippedPaper {
        let mut filtered = self.filter(lines, Some(SectionType::Refer));
        let boundary = self.locate_references(&filtered);
        if let Some(index) = boundary.index() {
            filtered.truncate(index);
        }
        StrippedPaper {
            lines: filtered,
            boundary,
        }
    }
}
