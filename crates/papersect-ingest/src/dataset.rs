//! Sentence-level dataset over cleaned papers, split by category folder.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::IngestError;
use crate::labels::{label_of, labels_from_folders, paper_folders};

pub const DEFAULT_PROCESSED_FILE_NAME: &str = "processed_paper.txt";

static SENTENCE_END_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]").unwrap());

/// Sentences of one cleaned paper with a class index per sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledPaper {
    pub id: String,
    pub sentences: Vec<String>,
    /// Same length as `sentences`; every entry is the paper's class index
    /// into [`LabeledDataset::labels`].
    pub labels: Vec<usize>,
}

/// Reads `<root>/<split>/<paper_id>/processed_paper.txt` files.
#[derive(Debug)]
pub struct LabeledDataset {
    split_path: PathBuf,
    file_name: String,
    labels: Vec<String>,
    paper_ids: Vec<String>,
}

impl LabeledDataset {
    /// Open one split (e.g. `train`) of a dataset.
    ///
    /// With a seed, paper order is shuffled deterministically; without one it
    /// is sorted by folder name.
    pub fn open(
        root: impl AsRef<Path>,
        split: &str,
        seed: Option<u64>,
    ) -> Result<Self, IngestError> {
        let root = root.as_ref();
        let split_path = root.join(split);
        if !split_path.is_dir() {
            return Err(IngestError::MissingSplit {
                split: split.to_string(),
                root: root.to_path_buf(),
            });
        }

        let mut paper_ids = paper_folders(&split_path)?;
        let labels = labels_from_folders(&paper_ids);
        if let Some(seed) = seed {
            fastrand::Rng::with_seed(seed).shuffle(&mut paper_ids);
        }

        Ok(Self {
            split_path,
            file_name: DEFAULT_PROCESSED_FILE_NAME.to_string(),
            labels,
            paper_ids,
        })
    }

    /// Read a different file name inside each paper folder.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Paper ids in iteration order.
    pub fn paper_ids(&self) -> &[String] {
        &self.paper_ids
    }

    /// Iterate papers in [`paper_ids`](Self::paper_ids) order.
    ///
    /// Papers whose folder prefix is not a known label are skipped with a
    /// warning.
    pub fn papers(&self) -> impl Iterator<Item = Result<LabeledPaper, IngestError>> + '_ {
        self.paper_ids.iter().filter_map(move |id| {
            let Some(class) = self.class_index(label_of(id)) else {
                tracing::warn!(paper = %id, "paper label is not part of the label set, skipping");
                return None;
            };
            Some(self.read_paper(id, class))
        })
    }

    fn class_index(&self, label: &str) -> Option<usize> {
        self.labels.binary_search_by(|l| l.as_str().cmp(label)).ok()
    }

    fn read_paper(&self, id: &str, class: usize) -> Result<LabeledPaper, IngestError> {
        let path = self.split_path.join(id).join(&self.file_name);
        let text = std::fs::read_to_string(&path).map_err(IngestError::read(&path))?;
        let sentences = split_sentences(&text);
        Ok(LabeledPaper {
            id: id.to_string(),
            labels: vec![class; sentences.len()],
            sentences,
        })
    }
}

/// Split text on `.`, `!` and `?`, dropping pieces that are empty once spaces
/// are removed. Newlines inside a sentence are kept.
pub fn split_sentences(text: &str) -> Vec<String> {
    SENTENCE_END_RE
        .split(text)
        .filter(|s| s.chars().any(|c| c != ' '))
        .map(str::to_string)
        .collect()
}
