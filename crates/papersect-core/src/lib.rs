use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod config_file;
pub mod keywords;

// Re-export for convenience
pub use keywords::{DEFAULT_KEYWORD_MAP, DEFAULT_KEYWORDS, KeywordMap};

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("unknown section type: {0} (expected one of intro, conc, refer, acknow)")]
    UnknownSection(String),
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Semantic region of a research paper that the detector searches for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    Intro,
    Conc,
    Refer,
    Acknow,
}

impl SectionType {
    pub const ALL: [SectionType; 4] = [
        SectionType::Intro,
        SectionType::Conc,
        SectionType::Refer,
        SectionType::Acknow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::Conc => "conc",
            Self::Refer => "refer",
            Self::Acknow => "acknow",
        }
    }

    /// Whether this section marks the end of a paper body (conclusion,
    /// references, acknowledgements).
    pub fn is_ending(&self) -> bool {
        !matches!(self, Self::Intro)
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "intro" => Ok(Self::Intro),
            "conc" => Ok(Self::Conc),
            "refer" => Ok(Self::Refer),
            "acknow" => Ok(Self::Acknow),
            other => Err(CoreError::UnknownSection(other.to_string())),
        }
    }
}

/// A provisional section boundary: the matched line, the keyword it matched
/// (`None` for first-reference fallback matches) and its 0-based line index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub line: String,
    pub keyword: Option<String>,
    pub index: usize,
}

impl Candidate {
    pub fn new(line: impl Into<String>, keyword: Option<String>, index: usize) -> Self {
        Self {
            line: line.into(),
            keyword,
            index,
        }
    }

    /// Position ratio of this candidate within a document of `total_lines`.
    pub fn position_ratio(&self, total_lines: usize) -> f64 {
        position_ratio(self.index, total_lines)
    }
}

/// `index / total_lines`, the coarse "how far into the document" measure.
///
/// Returns 0.0 for an empty document.
pub fn position_ratio(index: usize, total_lines: usize) -> f64 {
    if total_lines == 0 {
        return 0.0;
    }
    index as f64 / total_lines as f64
}

/// Outcome of searching one document for one section type.
///
/// The three variants are mutually exclusive. `Ambiguous` always holds at
/// least two candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Detection {
    Resolved { candidate: Candidate },
    Ambiguous { candidates: Vec<Candidate> },
    NotFound,
}

impl Detection {
    pub fn is_found(&self) -> bool {
        !matches!(self, Self::NotFound)
    }

    pub fn resolved(&self) -> Option<&Candidate> {
        match self {
            Self::Resolved { candidate } => Some(candidate),
            _ => None,
        }
    }

    /// All candidates carried by this outcome (empty for `NotFound`).
    pub fn candidates(&self) -> &[Candidate] {
        match self {
            Self::Resolved { candidate } => std::slice::from_ref(candidate),
            Self::Ambiguous { candidates } => candidates,
            Self::NotFound => &[],
        }
    }

    pub fn status_str(&self) -> &'static str {
        match self {
            Self::Resolved { .. } => "resolved",
            Self::Ambiguous { .. } => "ambiguous",
            Self::NotFound => "not_found",
        }
    }
}
