use std::io::Write;
use std::path::Path;

use owo_colors::OwoColorize;
use papersect_reporting::{FirstReferenceBreakdown, KeywordBreakdown};

use crate::modes::{CleanSummary, LabelRow, RunCounts};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

fn header(w: &mut dyn Write, title: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", title.bold())
    } else {
        writeln!(w, "{}", title)
    }
}

/// `label: n`, with `n` yellow when it is non-zero and marks a problem.
fn count_line(
    w: &mut dyn Write,
    label: &str,
    n: usize,
    warn_if_nonzero: bool,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() && warn_if_nonzero && n > 0 {
        writeln!(w, "  {:<20} {}", label, n.yellow())
    } else if color.enabled() && !warn_if_nonzero {
        writeln!(w, "  {:<20} {}", label, n.green())
    } else {
        writeln!(w, "  {:<20} {}", label, n)
    }
}

fn dimmed_line(w: &mut dyn Write, text: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", text.dimmed())
    } else {
        writeln!(w, "{}", text)
    }
}

/// Totals after a detect-keywords or detect-first-reference run.
pub fn print_run_summary(
    w: &mut dyn Write,
    title: &str,
    counts: &RunCounts,
    output: &Path,
    color: ColorMode,
) -> std::io::Result<()> {
    header(w, title, color)?;
    count_line(w, "papers", counts.papers, false, color)?;
    count_line(w, "needs inspection", counts.flagged, true, color)?;
    count_line(w, "unreadable", counts.unreadable, true, color)?;
    dimmed_line(w, &format!("Records appended to {}", output.display()), color)
}

pub fn print_keyword_breakdown(
    w: &mut dyn Write,
    breakdown: &KeywordBreakdown,
    color: ColorMode,
) -> std::io::Result<()> {
    header(w, "Section keyword analysis", color)?;
    count_line(w, "papers", breakdown.dataset_size, false, color)?;
    count_line(w, "with introduction", breakdown.intro.count, false, color)?;
    count_line(w, "without introduction", breakdown.intro.paper_ids_missing.len(), true, color)?;
    count_line(w, "with ending", breakdown.ending.count, false, color)?;
    count_line(w, "without ending", breakdown.ending.paper_ids_missing.len(), true, color)?;
    Ok(())
}

pub fn print_first_reference_breakdown(
    w: &mut dyn Write,
    single: &FirstReferenceBreakdown,
    non_single: &FirstReferenceBreakdown,
    color: ColorMode,
) -> std::io::Result<()> {
    header(w, "First reference analysis", color)?;
    count_line(w, "single match", single.total_count, false, color)?;
    count_line(w, "zero or several", non_single.total_count, true, color)?;
    Ok(())
}

pub fn print_clean_summary(
    w: &mut dyn Write,
    summary: &CleanSummary,
    out_dir: &Path,
    color: ColorMode,
) -> std::io::Result<()> {
    header(w, "Reference stripping", color)?;
    count_line(w, "cut at heading", summary.heading, false, color)?;
    count_line(w, "cut at first ref", summary.first_reference, false, color)?;
    count_line(w, "kept unmodified", summary.unmodified, true, color)?;
    count_line(w, "unreadable", summary.unreadable, true, color)?;
    dimmed_line(w, &format!("Cleaned papers written to {}", out_dir.display()), color)
}

pub fn print_dataset_overview(
    w: &mut dyn Write,
    split: &str,
    rows: &[LabelRow],
    color: ColorMode,
) -> std::io::Result<()> {
    header(w, &format!("Dataset split {:?}", split), color)?;
    writeln!(w, "  {:<20} {:>8} {:>10}", "label", "papers", "sentences")?;
    for row in rows {
        if color.enabled() {
            writeln!(
                w,
                "  {:<20} {:>8} {:>10}",
                row.label.cyan(),
                row.papers,
                row.sentences
            )?;
        } else {
            writeln!(w, "  {:<20} {:>8} {:>10}", row.label, row.papers, row.sentences)?;
        }
    }
    let papers: usize = rows.iter().map(|r| r.papers).sum();
    let sentences: usize = rows.iter().map(|r| r.sentences).sum();
    dimmed_line(w, &format!("  {:<20} {:>8} {:>10}", "total", papers, sentences), color)
}
