use papersect_core::{Candidate, Detection, SectionType, position_ratio};

use crate::config::{DetectionConfig, DetectionParams, ResolutionBounds};
use crate::similarity::matches_keyword;
use crate::text_processing::normalize_line;

/// Collect every `(line, keyword, index)` whose digit-stripped, normalized
/// line is at least `similarity_threshold` similar to one of `keywords` and
/// whose position ratio is strictly below `max_bound_ratio`.
///
/// Lines are scanned in document order. A line resembling several keywords
/// yields one candidate per keyword; keyword order carries no priority.
pub fn scan_section_candidates<S: AsRef<str>>(
    lines: &[S],
    keywords: &[String],
    similarity_threshold: f64,
    max_bound_ratio: f64,
) -> Vec<Candidate> {
    let total = lines.len();
    let mut candidates = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        // Headings deep in the document are usually reference titles such as
        // "An Introduction to ...".
        if position_ratio(index, total) >= max_bound_ratio {
            break;
        }
        let line = line.as_ref();
        let normalized = normalize_line(line, true);
        for keyword in keywords {
            if matches_keyword(&normalized, keyword, similarity_threshold) {
                candidates.push(Candidate::new(line, Some(keyword.clone()), index));
            }
        }
    }

    candidates
}

/// Narrow scanner candidates down to one.
///
/// Pass 1 keeps candidates at or beyond `bounds.lower` and picks the
/// earliest; pass 2 repeats with `bounds.secondary`. A pass succeeds only if
/// exactly one candidate sits on the earliest surviving line. When neither
/// pass succeeds the original candidates come back untouched as
/// [`Detection::Ambiguous`], even a lone candidate lying below both bounds.
pub fn resolve_candidates(
    mut candidates: Vec<Candidate>,
    total_lines: usize,
    bounds: ResolutionBounds,
) -> Detection {
    if candidates.is_empty() {
        return Detection::NotFound;
    }

    for (pass, lower) in [(1, bounds.lower), (2, bounds.secondary)] {
        if let Some(i) = earliest_above(&candidates, total_lines, lower) {
            tracing::trace!(pass, lower, index = candidates[i].index, "resolver pass succeeded");
            return Detection::Resolved {
                candidate: candidates.swap_remove(i),
            };
        }
        tracing::trace!(pass, lower, "resolver pass inconclusive");
    }

    Detection::Ambiguous { candidates }
}

/// Position of the single candidate with the minimum index among those whose
/// ratio is at least `lower`. `None` if nothing survives or the earliest line
/// produced more than one candidate.
fn earliest_above(candidates: &[Candidate], total_lines: usize, lower: f64) -> Option<usize> {
    let survivors: Vec<usize> = candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| c.position_ratio(total_lines) >= lower)
        .map(|(i, _)| i)
        .collect();

    let min_index = survivors.iter().map(|&i| candidates[i].index).min()?;
    let mut earliest = survivors
        .into_iter()
        .filter(|&i| candidates[i].index == min_index);

    match (earliest.next(), earliest.next()) {
        (Some(i), None) => Some(i),
        _ => None,
    }
}

/// Locate the heading line of a section given its keyword list.
///
/// Returns [`Detection::NotFound`] if no line matches within the allowed
/// range. With `params.resolution` set every candidate list goes through
/// [`resolve_candidates`]; without it a single candidate is
/// [`Detection::Resolved`] and several are [`Detection::Ambiguous`].
pub fn detect_section<S: AsRef<str>>(
    lines: &[S],
    keywords: &[String],
    params: &DetectionParams,
) -> Detection {
    let mut candidates = scan_section_candidates(
        lines,
        keywords,
        params.similarity_threshold,
        params.max_bound_ratio,
    );

    match (candidates.len(), params.resolution) {
        (0, _) => Detection::NotFound,
        (_, Some(bounds)) => resolve_candidates(candidates, lines.len(), bounds),
        (1, None) => Detection::Resolved {
            candidate: candidates.remove(0),
        },
        (_, None) => Detection::Ambiguous { candidates },
    }
}

/// Config-aware version of [`detect_section`]: looks up the keywords for
/// `section` and uses the configured thresholds.
///
/// Only ending sections are resolved. An introduction heading sits early in
/// the paper, below any lower bound meant for the references.
pub fn detect_section_with_config<S: AsRef<str>>(
    lines: &[S],
    section: SectionType,
    config: &DetectionConfig,
) -> Detection {
    let mut params = config.params();
    if !section.is_ending() {
        params.resolution = None;
    }
    let detection = detect_section(lines, config.keywords.get(section), &params);
    tracing::debug!(
        section = %section,
        status = detection.status_str(),
        candidates = detection.candidates().len(),
        "section detection finished"
    );
    detection
}
