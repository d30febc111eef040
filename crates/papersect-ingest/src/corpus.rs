use std::path::{Path, PathBuf};

use papersect_core::config_file::ConfigFile;

use crate::IngestError;
use crate::labels::{label_of, labels_from_folders, paper_folders};

const DEFAULT_PAPER_FILE_NAME: &str = "paper.txt";

/// Options controlling how papers are read from a corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusOptions {
    /// File read inside each paper folder.
    pub paper_file_name: String,
    /// Drop whitespace-only lines after reading.
    pub remove_blank_lines: bool,
}

impl Default for CorpusOptions {
    fn default() -> Self {
        Self {
            paper_file_name: DEFAULT_PAPER_FILE_NAME.to_string(),
            remove_blank_lines: true,
        }
    }
}

impl CorpusOptions {
    pub fn from_config_file(file: &ConfigFile) -> Self {
        let mut options = Self::default();
        if let Some(c) = &file.corpus {
            if let Some(name) = &c.paper_file_name {
                options.paper_file_name = name.clone();
            }
            if let Some(remove) = c.remove_blank_lines {
                options.remove_blank_lines = remove;
            }
        }
        options
    }
}

/// Line-level cleanup applied to every paper as it is read.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaperPreprocessor;

impl PaperPreprocessor {
    /// Remove lines that hold nothing but whitespace.
    pub fn process(&self, lines: Vec<String>) -> Vec<String> {
        lines.into_iter().filter(|l| !l.trim().is_empty()).collect()
    }
}

/// One paper's raw lines and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Paper {
    /// Name of the paper's folder.
    pub id: String,
    pub label: String,
    /// Lines in file order, each keeping its trailing `\n`.
    pub lines: Vec<String>,
}

#[derive(Debug)]
enum Source {
    File(PathBuf),
    Directory { root: PathBuf, folders: Vec<String> },
}

/// Reads papers from a corpus directory of `<label>_<n>/paper.txt` folders,
/// or a single paper file.
#[derive(Debug)]
pub struct CorpusReader {
    source: Source,
    paper_file_name: String,
    preprocessor: Option<PaperPreprocessor>,
    labels: Vec<String>,
}

impl CorpusReader {
    /// Open a corpus at `data_path`.
    ///
    /// Folder listing and labels are computed up front; papers themselves are
    /// read lazily by [`papers`](Self::papers).
    pub fn open(data_path: impl AsRef<Path>, options: CorpusOptions) -> Result<Self, IngestError> {
        let data_path = data_path.as_ref();
        let preprocessor = options.remove_blank_lines.then_some(PaperPreprocessor);

        let (source, labels) = if data_path.is_file() {
            let id = single_paper_id(data_path);
            let labels = vec![label_of(&id).to_string()];
            (Source::File(data_path.to_path_buf()), labels)
        } else if data_path.is_dir() {
            let folders = paper_folders(data_path)?;
            let labels = labels_from_folders(&folders);
            (
                Source::Directory {
                    root: data_path.to_path_buf(),
                    folders,
                },
                labels,
            )
        } else {
            return Err(IngestError::InvalidDataPath(data_path.to_path_buf()));
        };

        let reader = Self {
            source,
            paper_file_name: options.paper_file_name,
            preprocessor,
            labels,
        };
        tracing::debug!(
            path = %data_path.display(),
            papers = reader.len(),
            labels = reader.labels.len(),
            "corpus opened"
        );
        Ok(reader)
    }

    /// Sorted, de-duplicated category labels of the corpus.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of papers the reader will yield.
    pub fn len(&self) -> usize {
        match &self.source {
            Source::File(_) => 1,
            Source::Directory { folders, .. } => folders.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the papers in sorted folder order.
    ///
    /// A paper that cannot be read yields an `Err` and iteration continues
    /// with the next one.
    pub fn papers(&self) -> Box<dyn Iterator<Item = Result<Paper, IngestError>> + '_> {
        match &self.source {
            Source::File(path) => {
                let id = single_paper_id(path);
                Box::new(std::iter::once(self.read_paper(path, id)))
            }
            Source::Directory { root, folders } => Box::new(folders.iter().map(move |folder| {
                let path = root.join(folder).join(&self.paper_file_name);
                self.read_paper(&path, folder.clone())
            })),
        }
    }

    fn read_paper(&self, path: &Path, id: String) -> Result<Paper, IngestError> {
        let mut lines = read_lines(path)?;
        if let Some(pre) = &self.preprocessor {
            lines = pre.process(lines);
        }
        Ok(Paper {
            label: label_of(&id).to_string(),
            id,
            lines,
        })
    }
}

/// Read a text file as lines that keep their `\n` terminators.
pub fn read_lines(path: &Path) -> Result<Vec<String>, IngestError> {
    let content = std::fs::read_to_string(path).map_err(IngestError::read(path))?;
    Ok(content.split_inclusive('\n').map(str::to_string).collect())
}

/// Paper id for a file given directly: its parent folder's name, falling back
/// to the file stem.
fn single_paper_id(path: &Path) -> String {
    path.parent()
        .and_then(|p| p.file_name())
        .or_else(|| path.file_stem())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
