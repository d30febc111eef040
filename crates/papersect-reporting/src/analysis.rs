//! Corpus-level summaries over per-paper detection records.

use std::collections::BTreeMap;

use papersect_core::{Candidate, SectionType};
use serde::{Deserialize, Serialize};

use crate::records::{FirstReferenceRecord, KeywordDetectionRecord};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionPresence {
    /// Papers in which the section was found.
    pub count: usize,
    /// Papers in which it was not, in record order.
    pub paper_ids_missing: Vec<String>,
}

/// How many papers have a detectable introduction and a detectable ending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordBreakdown {
    pub intro: SectionPresence,
    pub ending: SectionPresence,
    pub dataset_size: usize,
}

/// Summarise keyword detection records.
///
/// A section counts as present when it was resolved or ambiguous. The ending
/// counts a paper once if any of conclusion, references or acknowledgements
/// was present. A paper whose record has no `intro` entry is neither counted
/// nor listed as missing for the introduction.
pub fn keyword_breakdown<I>(records: I) -> KeywordBreakdown
where
    I: IntoIterator<Item = KeywordDetectionRecord>,
{
    let mut breakdown = KeywordBreakdown::default();

    for record in records {
        breakdown.dataset_size += 1;

        if let Some(intro) = record.section_keyword_detection.get(&SectionType::Intro) {
            if intro.is_found() {
                breakdown.intro.count += 1;
            } else {
                breakdown.intro.paper_ids_missing.push(record.id.clone());
            }
        }

        if record.has_ending() {
            breakdown.ending.count += 1;
        } else {
            breakdown.ending.paper_ids_missing.push(record.id);
        }
    }

    breakdown
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FirstReferenceBreakdown {
    pub total_count: usize,
    /// Papers in the dataset that fall outside this group.
    pub dataset_size_diff: usize,
    pub samples_info: BTreeMap<String, Vec<Candidate>>,
}

/// Split first-reference records into papers with exactly one candidate and
/// the rest.
///
/// Returns `(single, non_single)`.
pub fn first_reference_breakdown<I>(
    records: I,
) -> (FirstReferenceBreakdown, FirstReferenceBreakdown)
where
    I: IntoIterator<Item = FirstReferenceRecord>,
{
    let mut single = FirstReferenceBreakdown::default();
    let mut non_single = FirstReferenceBreakdown::default();
    let mut dataset_size = 0;

    for record in records {
        dataset_size += 1;
        let group = if record.is_single() {
            &mut single
        } else {
            &mut non_single
        };
        group.total_count += 1;
        group
            .samples_info
            .insert(record.id, record.first_ref_det_info.ref_tuples);
    }

    single.dataset_size_diff = dataset_size - single.total_count;
    non_single.dataset_size_diff = dataset_size - non_single.total_count;
    (single, non_single)
}

#[cfg(test)]
mod tests {
    use super::*;
    use papersect_core::Detection;

    fn found(index: usize) -> Detection {
        Detection::Resolved {
            candidate: Candidate::new("Heading\n", Some("heading".into()), index),
        }
    }

    fn record(id: &str, entries: &[(SectionType, Detection)]) -> KeywordDetectionRecord {
        KeywordDetectionRecord::new(id, entries.iter().cloned().collect())
    }

    #[test]
    fn test_keyword_breakdown() {
        let records = vec![
            record(
                "a_1",
                &[
                    (SectionType::Intro, found(1)),
                    (SectionType::Conc, found(30)),
                    (SectionType::Refer, found(40)),
                ],
            ),
            record(
                "a_2",
                &[
                    (SectionType::Intro, Detection::NotFound),
                    (SectionType::Refer, found(40)),
                ],
            ),
            record(
                "b_1",
                &[
                    (SectionType::Intro, found(2)),
                    (SectionType::Conc, Detection::NotFound),
                    (SectionType::Refer, Detection::NotFound),
                    (SectionType::Acknow, Detection::NotFound),
                ],
            ),
        ];

        let breakdown = keyword_breakdown(records);
        assert_eq!(breakdown.dataset_size, 3);
        assert_eq!(breakdown.intro.count, 2);
        assert_eq!(breakdown.intro.paper_ids_missing, vec!["a_2"]);
        // a_1 has two ending sections but is counted once
        assert_eq!(breakdown.ending.count, 2);
        assert_eq!(breakdown.ending.paper_ids_missing, vec!["b_1"]);
    }

    #[test]
    fn test_keyword_breakdown_json_keys() {
        let json = serde_json::to_value(keyword_breakdown(Vec::new())).unwrap();
        assert_eq!(json["dataset_size"], 0);
        assert_eq!(json["intro"]["count"], 0);
        assert!(json["ending"]["paper_ids_missing"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_first_reference_breakdown() {
        let records = vec![
            FirstReferenceRecord::new("a_1", vec![Candidate::new("[1] X\n", None, 50)]),
            FirstReferenceRecord::new("a_2", Vec::new()),
            FirstReferenceRecord::new(
                "b_1",
                vec![
                    Candidate::new("1. X (2001)\n", None, 50),
                    Candidate::new("1. Y (2002)\n", None, 60),
                ],
            ),
        ];

        let (single, non_single) = first_reference_breakdown(records);
        assert_eq!(single.total_count, 1);
        assert_eq!(single.dataset_size_diff, 2);
        assert_eq!(single.samples_info["a_1"][0].index, 50);

        assert_eq!(non_single.total_count, 2);
        assert_eq!(non_single.dataset_size_diff, 1);
        assert!(non_single.samples_info["a_2"].is_empty());
        assert_eq!(non_single.samples_info["b_1"].len(), 2);
    }
}
