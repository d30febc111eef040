//! Fallback locator for the first entry of a reference list, used when no
//! line resembles a references heading.

use once_cell::sync::Lazy;
use papersect_core::{Candidate, position_ratio};
use regex::Regex;

/// A parenthesised four-digit year such as `(2009)`.
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([1-9][0-9]{3}\)").unwrap());

/// A line opening with the single ordinal `1`: "1. Smith", "1 Smith", not
/// "10." or "1995".
static FIRST_ORDINAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^1\D").unwrap());

const BRACKET_MARKER: &str = "[1]";

/// Find the line that most plausibly starts a numbered reference list.
///
/// Only lines whose position ratio is at least `lower_bound_ratio` are
/// considered, and leading whitespace is ignored. In order:
///
/// 1. the first line starting with `[1]` is returned on its own;
/// 2. lines starting with `1` are collected, and a single one is returned;
/// 3. of several, those with a parenthesised year and a single-digit
///    ordinal are kept;
/// 4. if none carry a year, the ordinal test alone is applied.
///
/// The result may be empty or hold several candidates; the caller decides
/// what to do with either. Candidates carry no keyword.
pub fn detect_first_reference<S: AsRef<str>>(
    lines: &[S],
    lower_bound_ratio: f64,
) -> Vec<Candidate> {
    let total = lines.len();
    let eligible = || {
        lines
            .iter()
            .enumerate()
            .filter(move |(index, _)| position_ratio(*index, total) >= lower_bound_ratio)
            .map(|(index, line)| (index, line.as_ref()))
    };

    if let Some((index, line)) =
        eligible().find(|(_, line)| line.trim_start().starts_with(BRACKET_MARKER))
    {
        tracing::trace!(index, "bracketed first reference found");
        return vec![Candidate::new(line, None, index)];
    }

    let starts_with_one: Vec<(usize, &str)> = eligible()
        .filter(|(_, line)| line.trim_start().starts_with('1'))
        .collect();
    if starts_with_one.len() <= 1 {
        return to_candidates(starts_with_one);
    }

    let with_year: Vec<(usize, &str)> = starts_with_one
        .iter()
        .copied()
        .filter(|(_, line)| YEAR_RE.is_match(line) && FIRST_ORDINAL_RE.is_match(line.trim_start()))
        .collect();
    if !with_year.is_empty() {
        tracing::trace!(
            before = starts_with_one.len(),
            after = with_year.len(),
            "year heuristic applied"
        );
        return to_candidates(with_year);
    }

    let ordinal_only: Vec<(usize, &str)> = starts_with_one
        .into_iter()
        .filter(|(_, line)| FIRST_ORDINAL_RE.is_match(line.trim_start()))
        .collect();
    tracing::trace!(after = ordinal_only.len(), "ordinal heuristic applied");
    to_candidates(ordinal_only)
}

fn to_candidates(matches: Vec<(usize, &str)>) -> Vec<Candidate> {
    matches
        .into_iter()
        .map(|(index, line)| Candidate::new(line, None, index))
        .collect()
}
