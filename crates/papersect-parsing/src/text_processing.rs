/// Prepare a raw line for keyword comparison.
///
/// Trims and lower-cases the line. With `strip_digits`, ASCII digits are
/// removed as well and the result trimmed again, so `"3. Conclusion\n"`
/// becomes `". conclusion"` and stays close to the bare keyword.
pub fn normalize_line(line: &str, strip_digits: bool) -> String {
    let lowered = line.trim().to_lowercase();
    if !strip_digits {
        return lowered;
    }
    lowered
        .chars()
        .filter(|c| !c.is_ascii_digit())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Number of whitespace-delimited tokens in a line.
pub fn token_count(line: &str) -> usize {
    line.split_whitespace().count()
}

/// Drop lines with `token_threshold` or fewer tokens (running titles, page
/// numbers, stray headers).
///
/// A line that contains any of `keep_keywords` (case-insensitive) is kept
/// regardless of length, so short headings such as "References" survive.
/// Pass the same keywords the section scanner will search for.
pub fn filter_by_token_count<S: AsRef<str>>(
    lines: &[S],
    token_threshold: usize,
    keep_keywords: &[String],
) -> Vec<String> {
    let keep: Vec<String> = keep_keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();

    let kept: Vec<String> = lines
        .iter()
        .map(|line| line.as_ref())
        .filter(|line| {
            if token_count(line) > token_threshold {
                return true;
            }
            if keep.is_empty() {
                return false;
            }
            let lowered = line.to_lowercase();
            keep.iter().any(|k| lowered.contains(k.as_str()))
        })
        .map(str::to_string)
        .collect();

    tracing::trace!(
        before = lines.len(),
        after = kept.len(),
        token_threshold,
        "token-count filter applied"
    );
    kept
}
