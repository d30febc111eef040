use std::path::PathBuf;

use thiserror::Error;

pub mod corpus;
pub mod dataset;
pub mod labels;

pub use corpus::{CorpusOptions, CorpusReader, Paper, PaperPreprocessor};
pub use dataset::{LabeledDataset, LabeledPaper};
pub use labels::label_of;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("data path is neither a file nor a directory: {}", .0.display())]
    InvalidDataPath(PathBuf),
    #[error("dataset split {split:?} does not exist under {}", root.display())]
    MissingSplit { split: String, root: PathBuf },
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IngestError {
    pub(crate) fn read(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Read { path, source }
    }
}
