//! End-to-end detection behaviour on small synthetic papers.

use papersect_parsing::{
    Detection, DetectionConfigBuilder, DetectionParams, ResolutionBounds, SectionDetector,
    SectionType, detect_first_reference, detect_section, filter_by_token_count,
};

const BOUNDS: ResolutionBounds = ResolutionBounds {
    lower: 0.6,
    secondary: 0.4,
};

fn params() -> DetectionParams {
    DetectionParams {
        similarity_threshold: 0.8,
        max_bound_ratio: 0.95,
        resolution: Some(BOUNDS),
    }
}

fn refer_keywords() -> Vec<String> {
    vec!["references".to_string()]
}

/// Twenty-line paper: title, numbered introduction and conclusion headings,
/// body text, a references heading and one bracketed reference.
fn sample_paper() -> Vec<String> {
    let mut lines: Vec<String> = (0..20)
        .map(|i| format!("We describe step {} of the experimental method here.\n", i))
        .collect();
    lines[0] = "Title\n".to_string();
    lines[1] = "1. Introduction\n".to_string();
    lines[12] = "5. Conclusion\n".to_string();
    lines[18] = "References\n".to_string();
    lines[19] = "[1] Smith, J. (2001).\n".to_string();
    lines
}

#[test]
fn references_heading_is_resolved() {
    let lines = sample_paper();
    let detection = detect_section(&lines, &refer_keywords(), &params());
    let candidate = detection.resolved().expect("references heading resolved");
    assert_eq!(candidate.line, "References\n");
    assert_eq!(candidate.keyword.as_deref(), Some("references"));
    assert_eq!(candidate.index, 18);
}

#[test]
fn missing_heading_falls_back_to_bracketed_reference() {
    let mut lines = sample_paper();
    lines.remove(18);

    assert_eq!(
        detect_section(&lines, &refer_keywords(), &params()),
        Detection::NotFound
    );

    let found = detect_first_reference(&lines, BOUNDS.lower);
    assert_eq!(found.len(), 1);
    assert!(found[0].line.starts_with("[1]"));
    assert_eq!(found[0].index, 18);
    assert_eq!(found[0].keyword, None);
}

#[test]
fn late_discussion_wins_over_early_one() {
    let mut lines: Vec<String> = (0..10)
        .map(|i| format!("Paragraph {} continues the argument at length.\n", i))
        .collect();
    lines[4] = "Discussion\n".to_string();
    lines[9] = "Discussion\n".to_string();

    let detection = detect_section(&lines, &["discussion".to_string()], &params());
    assert!(matches!(detection, Detection::Resolved { .. }));
    assert_eq!(detection.resolved().map(|c| c.index), Some(9));
}

#[test]
fn year_leading_prose_is_not_a_first_reference() {
    let mut lines: Vec<String> = (0..10)
        .map(|i| format!("Paragraph {} continues the argument at length.\n", i))
        .collect();
    lines[7] = "1995 was a good year for research.\n".to_string();
    lines[9] = "1998 was a better one.\n".to_string();

    assert!(detect_first_reference(&lines, BOUNDS.lower).is_empty());
}

#[test]
fn detection_is_idempotent() {
    let lines = sample_paper();
    let detector = SectionDetector::new();
    for section in SectionType::ALL {
        assert_eq!(detector.detect(&lines, section), detector.detect(&lines, section));
    }
    assert_eq!(
        detector.detect_first_reference(&lines),
        detector.detect_first_reference(&lines)
    );
}

#[test]
fn candidates_respect_position_bounds() {
    let mut lines: Vec<String> = (0..40)
        .map(|i| format!("Line {} of a long enough paper body text.\n", i))
        .collect();
    for i in [3, 10, 20, 30, 39] {
        lines[i] = "References\n".to_string();
    }

    for max_bound in [0.5, 0.8, 0.95, 1.0] {
        let p = DetectionParams {
            max_bound_ratio: max_bound,
            ..params()
        };
        let detection = detect_section(&lines, &refer_keywords(), &p);
        for c in detection.candidates() {
            assert!(c.position_ratio(lines.len()) < max_bound);
        }
        if let Some(c) = detection.resolved() {
            assert!(c.position_ratio(lines.len()) >= BOUNDS.secondary);
        }
    }
}

#[test]
fn lone_early_heading_respects_lower_bounds() {
    let mut lines: Vec<String> = (0..20)
        .map(|i| format!("Line {} of a long enough paper body text.\n", i))
        .collect();
    lines[1] = "References\n".to_string();

    let detection = detect_section(&lines, &refer_keywords(), &params());
    assert!(detection.resolved().is_none());
    assert_eq!(detection.candidates().len(), 1);
}

#[test]
fn stray_early_mention_does_not_truncate_the_body() {
    let detector = SectionDetector::new();
    let mut lines: Vec<String> = (0..20)
        .map(|i| format!("We describe step {} of the experimental method here.\n", i))
        .collect();
    lines[1] = "References\n".to_string();
    lines[15] = "Bibliography\n".to_string();

    // "Bibliography" is not a default keyword, so the token filter drops it
    // and the early mention is the only candidate left
    let stripped = detector.strip_references(&lines);
    assert_eq!(stripped.boundary.index(), None);
    assert_eq!(stripped.lines.len(), 19);
    assert_eq!(stripped.lines[1], "References\n");
}

#[test]
fn exact_keyword_line_is_always_a_candidate() {
    let mut lines: Vec<String> = (0..10)
        .map(|i| format!("Line {} of a long enough paper body text.\n", i))
        .collect();
    lines[2] = "ACKNOWLEDGEMENTS\n".to_string();
    lines[7] = "acknowledgements\n".to_string();

    let keywords = vec!["acknowledgements".to_string()];
    let unresolved = DetectionParams {
        resolution: None,
        ..params()
    };
    let detection = detect_section(&lines, &keywords, &unresolved);
    let indices: Vec<usize> = detection.candidates().iter().map(|c| c.index).collect();
    assert_eq!(indices, vec![2, 7]);
}

#[test]
fn token_filter_never_drops_keep_keywords() {
    let keep = vec!["references".to_string(), "acknowledgements".to_string()];
    let lines = [
        "REFERENCES\n",
        "7\n",
        "Acknowledgements\n",
        "6 References and notes\n",
        "running title\n",
    ];
    for threshold in 0..6 {
        let kept = filter_by_token_count(&lines, threshold, &keep);
        for line in ["REFERENCES\n", "Acknowledgements\n", "6 References and notes\n"] {
            assert!(kept.iter().any(|k| k == line), "{line:?} dropped at {threshold}");
        }
    }
}

#[test]
fn configured_detector_strips_reference_list() {
    let config = DetectionConfigBuilder::new()
        .extend_keywords(SectionType::Refer, vec!["bibliography".to_string()])
        .build()
        .unwrap();
    let detector = SectionDetector::with_config(config);

    let mut lines = sample_paper();
    lines[18] = "Bibliography\n".to_string();
    let stripped = detector.strip_references(&lines);

    // the title, two short headings and the short reference line are filtered out first
    assert_eq!(stripped.boundary.index(), Some(15));
    assert!(stripped.lines.iter().all(|l| !l.contains("Bibliography")));
}
