use std::path::PathBuf;

use thiserror::Error;

pub mod analysis;
pub mod jsonl;
pub mod records;

pub use analysis::{
    FirstReferenceBreakdown, KeywordBreakdown, SectionPresence, first_reference_breakdown,
    keyword_breakdown,
};
pub use jsonl::{JsonlWriter, read_jsonl, write_json_pretty};
pub use records::{FirstRefInfo, FirstReferenceRecord, KeywordDetectionRecord};

/// Summary written by the section keyword analysis.
pub const KEYWORDS_ANALYSIS_FILE: &str = "keywords_analysis.json";
/// Papers whose first-reference search returned exactly one line.
pub const FIRST_REF_SINGLE_FILE: &str = "first_ref_single_counts_analysis.json";
/// Papers whose first-reference search returned zero or several lines.
pub const FIRST_REF_NON_SINGLE_FILE: &str = "first_ref_non_single_counts_analysis.json";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}:{line}: invalid record: {source}", path.display())]
    Record {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
