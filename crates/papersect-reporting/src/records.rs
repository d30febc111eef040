//! One-line-per-paper analysis records.

use std::collections::BTreeMap;

use papersect_core::{Candidate, Detection, SectionType};
use serde::{Deserialize, Serialize};

/// Heading detection outcome for every searched section of one paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordDetectionRecord {
    pub id: String,
    pub section_keyword_detection: BTreeMap<SectionType, Detection>,
}

impl KeywordDetectionRecord {
    pub fn new(id: impl Into<String>, detections: BTreeMap<SectionType, Detection>) -> Self {
        Self {
            id: id.into(),
            section_keyword_detection: detections,
        }
    }

    /// Whether any of the ending sections (conclusion, references,
    /// acknowledgements) was found, resolved or not.
    pub fn has_ending(&self) -> bool {
        self.section_keyword_detection
            .iter()
            .any(|(section, d)| section.is_ending() && d.is_found())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirstRefInfo {
    pub count: usize,
    pub ref_tuples: Vec<Candidate>,
}

/// First-reference fallback result for one paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirstReferenceRecord {
    pub id: String,
    pub first_ref_det_info: FirstRefInfo,
}

impl FirstReferenceRecord {
    pub fn new(id: impl Into<String>, candidates: Vec<Candidate>) -> Self {
        Self {
            id: id.into(),
            first_ref_det_info: FirstRefInfo {
                count: candidates.len(),
                ref_tuples: candidates,
            },
        }
    }

    pub fn is_single(&self) -> bool {
        self.first_ref_det_info.count == 1
    }
}
