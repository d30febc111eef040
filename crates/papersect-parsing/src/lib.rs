use thiserror::Error;

pub mod config;
pub mod detector;
pub mod first_reference;
pub mod section;
pub mod similarity;
pub mod text_processing;

pub use config::{
    ConfigError, DetectionConfig, DetectionConfigBuilder, DetectionParams, KeywordOverride,
    ResolutionBounds,
};
pub use detector::{ReferenceBoundary, SectionDetector, StrippedPaper};
pub use first_reference::detect_first_reference;
pub use section::{
    detect_section, detect_section_with_config, resolve_candidates, scan_section_candidates,
};
pub use text_processing::filter_by_token_count;
// Re-export domain types from core (canonical definitions live there)
pub use papersect_core::{Candidate, Detection, KeywordMap, SectionType};

#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("invalid detection config: {0}")]
    Config(#[from] ConfigError),
}
