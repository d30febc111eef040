use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use papersect_core::SectionType;
use papersect_ingest::{CorpusReader, LabeledDataset, Paper};
use papersect_parsing::{ReferenceBoundary, SectionDetector};
use papersect_reporting::{
    FIRST_REF_NON_SINGLE_FILE, FIRST_REF_SINGLE_FILE, FirstReferenceBreakdown,
    FirstReferenceRecord, JsonlWriter, KEYWORDS_ANALYSIS_FILE, KeywordBreakdown,
    KeywordDetectionRecord, first_reference_breakdown, keyword_breakdown, read_jsonl,
    write_json_pretty,
};

/// Totals for a per-paper detection run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunCounts {
    pub papers: usize,
    pub unreadable: usize,
    /// Papers with an outcome worth inspecting by hand.
    pub flagged: usize,
}

/// What happened to one paper in the clean run.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanOutcome {
    pub paper_id: String,
    pub boundary: ReferenceBoundary,
    pub lines_written: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanSummary {
    pub heading: usize,
    pub first_reference: usize,
    pub unmodified: usize,
    pub unreadable: usize,
}

impl CleanSummary {
    fn record(&mut self, outcome: &CleanOutcome) {
        match outcome.boundary {
            ReferenceBoundary::Heading(_) => self.heading += 1,
            ReferenceBoundary::FirstReference(_) => self.first_reference += 1,
            ReferenceBoundary::Unresolved { .. } => self.unmodified += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.heading + self.first_reference + self.unmodified + self.unreadable
    }
}

/// Papers and sentences per label in a dataset split.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelRow {
    pub label: String,
    pub papers: usize,
    pub sentences: usize,
}

fn progress_bar(len: usize, msg: &'static str) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} {msg} [{bar:40.cyan/dim}] {pos}/{len} ({eta})",
        )?
        .progress_chars("=> "),
    );
    pb.set_message(msg);
    Ok(pb)
}

/// Drive `handle` over every readable paper. Unreadable papers are logged
/// and counted; they never stop the run.
fn for_each_paper<F>(
    reader: &CorpusReader,
    msg: &'static str,
    mut handle: F,
) -> anyhow::Result<usize>
where
    F: FnMut(Paper, &ProgressBar) -> anyhow::Result<()>,
{
    let pb = progress_bar(reader.len(), msg)?;
    let mut unreadable = 0;
    for result in reader.papers() {
        pb.inc(1);
        match result {
            Ok(paper) => handle(paper, &pb)?,
            Err(err) => {
                unreadable += 1;
                pb.suspend(|| tracing::warn!(error = %err, "skipping unreadable paper"));
            }
        }
    }
    pb.finish_and_clear();
    Ok(unreadable)
}

pub fn detect_keywords(
    reader: &CorpusReader,
    detector: &SectionDetector,
    sections: &[SectionType],
    output: &Path,
) -> anyhow::Result<RunCounts> {
    tracing::info!(sections = sections.len(), "starting section keyword search");
    let mut writer = JsonlWriter::append_to(output)?;
    let mut counts = RunCounts::default();

    let unreadable = for_each_paper(reader, "detecting sections", |paper, pb| {
        let detections = detector.detect_many(&paper.lines, sections);
        let mut flagged = false;
        for (section, detection) in &detections {
            if detection.resolved().is_none() {
                flagged = true;
                pb.suspend(|| {
                    tracing::info!(
                        paper = %paper.id,
                        section = %section,
                        status = detection.status_str(),
                        candidates = detection.candidates().len(),
                        "section heading not resolved"
                    )
                });
            }
        }
        writer.write(&KeywordDetectionRecord::new(paper.id, detections))?;
        counts.papers += 1;
        counts.flagged += usize::from(flagged);
        Ok(())
    })?;
    counts.unreadable = unreadable;

    writer.flush()?;
    tracing::info!(papers = counts.papers, "finished section keyword search");
    Ok(counts)
}

pub fn detect_first_reference(
    reader: &CorpusReader,
    detector: &SectionDetector,
    output: &Path,
) -> anyhow::Result<RunCounts> {
    tracing::info!("searching corpus for first references");
    let mut writer = JsonlWriter::append_to(output)?;
    let mut counts = RunCounts::default();

    let unreadable = for_each_paper(reader, "finding first references", |paper, pb| {
        let filtered = detector.filter(&paper.lines, None);
        let found = detector.detect_first_reference(&filtered);
        if found.len() != 1 {
            counts.flagged += 1;
            pb.suspend(|| {
                tracing::info!(
                    paper = %paper.id,
                    matches = found.len(),
                    "first reference search did not return a single line"
                )
            });
        }
        writer.write(&FirstReferenceRecord::new(paper.id, found))?;
        counts.papers += 1;
        Ok(())
    })?;
    counts.unreadable = unreadable;

    writer.flush()?;
    tracing::info!(papers = counts.papers, "finished first reference search");
    Ok(counts)
}

pub fn section_keywords_analysis(input: &Path, out_dir: &Path) -> anyhow::Result<KeywordBreakdown> {
    let records: Vec<KeywordDetectionRecord> = read_jsonl(input)?;
    let breakdown = keyword_breakdown(records);
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    write_json_pretty(out_dir.join(KEYWORDS_ANALYSIS_FILE), &breakdown)?;
    Ok(breakdown)
}

pub fn first_reference_analysis(
    input: &Path,
    out_dir: &Path,
) -> anyhow::Result<(FirstReferenceBreakdown, FirstReferenceBreakdown)> {
    let records: Vec<FirstReferenceRecord> = read_jsonl(input)?;
    let (single, non_single) = first_reference_breakdown(records);
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    write_json_pretty(out_dir.join(FIRST_REF_SINGLE_FILE), &single)?;
    write_json_pretty(out_dir.join(FIRST_REF_NON_SINGLE_FILE), &non_single)?;
    Ok((single, non_single))
}

/// Strip the reference list from one paper and write the body to
/// `<out_dir>/<paper_id>/<file_name>`.
///
/// Without a settled boundary the raw paper is written unchanged.
pub fn clean_paper(
    detector: &SectionDetector,
    paper: &Paper,
    out_dir: &Path,
    file_name: &str,
) -> anyhow::Result<CleanOutcome> {
    let stripped = detector.strip_references(&paper.lines);
    let written: &[String] = match stripped.boundary.index() {
        Some(_) => &stripped.lines,
        None => &paper.lines,
    };

    let dir = out_dir.join(&paper.id);
    std::fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(file_name);
    std::fs::write(&path, written.concat())
        .with_context(|| format!("failed to write {}", path.display()))?;

    let lines_written = written.len();
    Ok(CleanOutcome {
        paper_id: paper.id.clone(),
        boundary: stripped.boundary,
        lines_written,
    })
}

pub fn clean(
    reader: &CorpusReader,
    detector: &SectionDetector,
    out_dir: &Path,
    file_name: &str,
) -> anyhow::Result<CleanSummary> {
    tracing::info!(out_dir = %out_dir.display(), "stripping reference lists");
    let mut summary = CleanSummary::default();

    let unreadable = for_each_paper(reader, "cleaning papers", |paper, pb| {
        let outcome = clean_paper(detector, &paper, out_dir, file_name)?;
        tracing::debug!(
            paper = %outcome.paper_id,
            boundary = outcome.boundary.kind_str(),
            lines = outcome.lines_written,
            "paper cleaned"
        );
        if let ReferenceBoundary::Unresolved {
            heading,
            first_references,
        } = &outcome.boundary
        {
            pb.suspend(|| {
                tracing::info!(
                    paper = %outcome.paper_id,
                    heading = heading.status_str(),
                    first_references = first_references.len(),
                    "reference list not located, paper kept unmodified"
                )
            });
        }
        summary.record(&outcome);
        Ok(())
    })?;
    summary.unreadable = unreadable;

    tracing::info!(papers = summary.total(), "finished stripping reference lists");
    Ok(summary)
}

pub fn dataset_overview(
    root: &Path,
    split: &str,
    seed: Option<u64>,
    file_name: &str,
) -> anyhow::Result<Vec<LabelRow>> {
    let dataset = LabeledDataset::open(root, split, seed)?.with_file_name(file_name);
    let mut rows: BTreeMap<String, LabelRow> = dataset
        .labels()
        .iter()
        .map(|l| {
            let row = LabelRow {
                label: l.clone(),
                ..Default::default()
            };
            (l.clone(), row)
        })
        .collect();

    for result in dataset.papers() {
        let paper = match result {
            Ok(paper) => paper,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable paper");
                continue;
            }
        };
        let Some(&class) = paper.labels.first() else {
            tracing::warn!(paper = %paper.id, "paper has no sentences");
            continue;
        };
        if let Some(row) = dataset.labels().get(class).and_then(|l| rows.get_mut(l)) {
            row.papers += 1;
            row.sentences += paper.sentences.len();
        }
    }

    Ok(rows.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use papersect_ingest::CorpusOptions;

    fn write_paper(root: &Path, folder: &str, file: &str, contents: &str) {
        let dir = root.join(folder);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(file), contents).unwrap();
    }

    fn body(n: usize) -> String {
        (0..n)
            .map(|i| format!("Sentence number {} of the paper body text.\n", i))
            .collect()
    }

    fn corpus() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let with_heading = format!("{}References\n[1] Smith, J. (2001). A title here.\n", body(8));
        let fallback = format!("{}[1] Smith, J. (2001). A title here.\n", body(9));
        write_paper(dir.path(), "cs_1", "paper.txt", &with_heading);
        write_paper(dir.path(), "cs_2", "paper.txt", &fallback);
        write_paper(dir.path(), "bio_1", "paper.txt", &body(10));
        dir
    }

    #[test]
    fn test_clean_writes_bodies() {
        let data = corpus();
        let out = tempfile::tempdir().unwrap();
        let reader = CorpusReader::open(data.path(), CorpusOptions::default()).unwrap();
        let summary = clean(
            &reader,
            &SectionDetector::new(),
            out.path(),
            "processed_paper.txt",
        )
        .unwrap();

        assert_eq!(
            summary,
            CleanSummary {
                heading: 1,
                first_reference: 1,
                unmodified: 1,
                unreadable: 0,
            }
        );
        let cleaned = std::fs::read_to_string(out.path().join("cs_1/processed_paper.txt")).unwrap();
        assert_eq!(cleaned, body(8));
        let cleaned = std::fs::read_to_string(out.path().join("cs_2/processed_paper.txt")).unwrap();
        assert_eq!(cleaned, body(9));
        let kept = std::fs::read_to_string(out.path().join("bio_1/processed_paper.txt")).unwrap();
        assert_eq!(kept, body(10));
    }

    #[test]
    fn test_cleaned_output_feeds_dataset() {
        let data = corpus();
        let out = tempfile::tempdir().unwrap();
        let train = out.path().join("train");
        let reader = CorpusReader::open(data.path(), CorpusOptions::default()).unwrap();
        clean(&reader, &SectionDetector::new(), &train, "processed_paper.txt").unwrap();

        let rows = dataset_overview(out.path(), "train", None, "processed_paper.txt").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "bio");
        assert_eq!(rows[0].papers, 1);
        // the trailing "\n" after the last full stop counts as a sentence
        assert_eq!(rows[0].sentences, 11);
        assert_eq!(rows[1].label, "cs");
        assert_eq!(rows[1].papers, 2);
        assert_eq!(rows[1].sentences, 9 + 10);
    }

    #[test]
    fn test_detect_then_analyse() {
        let data = corpus();
        let out = tempfile::tempdir().unwrap();
        let jsonl = out.path().join("keywords.jsonl");
        let reader = CorpusReader::open(data.path(), CorpusOptions::default()).unwrap();

        let counts =
            detect_keywords(&reader, &SectionDetector::new(), &SectionType::ALL, &jsonl).unwrap();
        assert_eq!(counts.papers, 3);
        // no paper has an introduction heading
        assert_eq!(counts.flagged, 3);

        let breakdown = section_keywords_analysis(&jsonl, out.path()).unwrap();
        assert_eq!(breakdown.dataset_size, 3);
        assert_eq!(breakdown.intro.count, 0);
        assert_eq!(breakdown.ending.count, 1);
        assert!(out.path().join(KEYWORDS_ANALYSIS_FILE).exists());
    }

    #[test]
    fn test_first_reference_mode() {
        let data = corpus();
        let out = tempfile::tempdir().unwrap();
        let jsonl = out.path().join("first_refs.jsonl");
        let reader = CorpusReader::open(data.path(), CorpusOptions::default()).unwrap();

        let counts = detect_first_reference(&reader, &SectionDetector::new(), &jsonl).unwrap();
        assert_eq!(counts.papers, 3);
        assert_eq!(counts.flagged, 1);

        let (single, non_single) = first_reference_analysis(&jsonl, out.path()).unwrap();
        assert_eq!(single.total_count, 2);
        assert_eq!(non_single.total_count, 1);
        assert!(non_single.samples_info.contains_key("bio_1"));
        assert!(out.path().join(FIRST_REF_SINGLE_FILE).exists());
        assert!(out.path().join(FIRST_REF_NON_SINGLE_FILE).exists());
    }
}
