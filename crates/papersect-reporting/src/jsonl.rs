use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::ReportError;

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> ReportError + '_ {
    move |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Appends one JSON object per line to a file, creating it if needed.
pub struct JsonlWriter {
    path: PathBuf,
    out: BufWriter<File>,
}

impl JsonlWriter {
    pub fn append_to(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err(parent))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(io_err(path))?;
        Ok(Self {
            path: path.to_path_buf(),
            out: BufWriter::new(file),
        })
    }

    pub fn write<T: Serialize>(&mut self, record: &T) -> Result<(), ReportError> {
        serde_json::to_writer(&mut self.out, record)?;
        self.out.write_all(b"\n").map_err(io_err(&self.path))
    }

    pub fn flush(&mut self) -> Result<(), ReportError> {
        self.out.flush().map_err(io_err(&self.path))
    }
}

/// Read every record of a JSONL file. Blank lines are ignored; a malformed
/// line is an error naming its 1-based line number.
pub fn read_jsonl<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<T>, ReportError> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path).map_err(io_err(path))?);

    let mut records = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(io_err(path))?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| ReportError::Record {
            path: path.to_path_buf(),
            line: i + 1,
            source,
        })?;
        records.push(record);
    }
    tracing::debug!(path = %path.display(), records = records.len(), "read JSONL");
    Ok(records)
}

/// Write `value` as pretty-printed JSON, replacing any existing file.
pub fn write_json_pretty<T: Serialize>(
    path: impl AsRef<Path>,
    value: &T,
) -> Result<(), ReportError> {
    let path = path.as_ref();
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content).map_err(io_err(path))?;
    tracing::info!(path = %path.display(), "summary written");
    Ok(())
}
