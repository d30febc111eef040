use papersect_core::config_file::ConfigFile;
use papersect_core::{KeywordMap, SectionType};
use thiserror::Error;

/// A keyword list from configuration, either standing in for a section's
/// defaults or appended to them.
#[derive(Debug, Clone, PartialEq)]
pub enum KeywordOverride {
    Replace(Vec<String>),
    Extend(Vec<String>),
}

impl KeywordOverride {
    /// Apply this override on top of the keywords a section already has.
    pub fn apply(self, current: &[String]) -> Vec<String> {
        match self {
            Self::Replace(keywords) => keywords,
            Self::Extend(keywords) => current.iter().cloned().chain(keywords).collect(),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be within [0, 1], got {value}")]
    OutOfRange { name: &'static str, value: f64 },
    #[error(
        "secondary_lower_bound_ratio ({secondary}) must not exceed lower_bound_ratio ({primary})"
    )]
    SecondaryAbovePrimary { primary: f64, secondary: f64 },
    #[error("no keywords configured for section type {0}")]
    NoKeywords(SectionType),
}

pub(crate) const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;
pub(crate) const DEFAULT_MAX_BOUND_RATIO: f64 = 0.95;
pub(crate) const DEFAULT_LOWER_BOUND_RATIO: f64 = 0.6;
pub(crate) const DEFAULT_SECONDARY_LOWER_BOUND_RATIO: f64 = 0.4;
pub(crate) const DEFAULT_TOKEN_THRESHOLD: usize = 3;

/// Two-pass lower bounds used by the candidate resolver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolutionBounds {
    /// Pass 1: candidates below this position ratio are discarded.
    pub lower: f64,
    /// Pass 2, tried only when pass 1 does not narrow to one candidate.
    pub secondary: f64,
}

/// Per-call detection parameters.
///
/// `resolution: None` turns the resolver off, so more than one scanner
/// candidate is reported as ambiguous as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionParams {
    pub similarity_threshold: f64,
    pub max_bound_ratio: f64,
    pub resolution: Option<ResolutionBounds>,
}

/// Configuration for section detection and line filtering.
///
/// Use [`DetectionConfigBuilder`] to construct a validated instance.
#[derive(Debug, Clone)]
pub struct DetectionConfig {
    pub(crate) similarity_threshold: f64,
    pub(crate) max_bound_ratio: f64,
    pub(crate) lower_bound_ratio: f64,
    pub(crate) secondary_lower_bound_ratio: f64,
    pub(crate) attempt_resolution: bool,
    pub(crate) token_threshold: usize,
    pub(crate) keywords: KeywordMap,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            max_bound_ratio: DEFAULT_MAX_BOUND_RATIO,
            lower_bound_ratio: DEFAULT_LOWER_BOUND_RATIO,
            secondary_lower_bound_ratio: DEFAULT_SECONDARY_LOWER_BOUND_RATIO,
            attempt_resolution: true,
            token_threshold: DEFAULT_TOKEN_THRESHOLD,
            keywords: KeywordMap::default(),
        }
    }
}

impl DetectionConfig {
    pub fn similarity_threshold(&self) -> f64 {
        self.similarity_threshold
    }

    pub fn max_bound_ratio(&self) -> f64 {
        self.max_bound_ratio
    }

    pub fn lower_bound_ratio(&self) -> f64 {
        self.lower_bound_ratio
    }

    pub fn secondary_lower_bound_ratio(&self) -> f64 {
        self.secondary_lower_bound_ratio
    }

    pub fn token_threshold(&self) -> usize {
        self.token_threshold
    }

    pub fn keywords(&self) -> &KeywordMap {
        &self.keywords
    }

    /// Detection parameters for a call with this configuration.
    pub fn params(&self) -> DetectionParams {
        DetectionParams {
            similarity_threshold: self.similarity_threshold,
            max_bound_ratio: self.max_bound_ratio,
            resolution: self.attempt_resolution.then_some(ResolutionBounds {
                lower: self.lower_bound_ratio,
                secondary: self.secondary_lower_bound_ratio,
            }),
        }
    }
}

/// Builder for [`DetectionConfig`].
///
/// Unset values fall back to the built-in defaults. [`build()`](Self::build)
/// validates every ratio, so a bad configuration fails before any document
/// is processed.
#[derive(Debug, Clone, Default)]
pub struct DetectionConfigBuilder {
    similarity_threshold: Option<f64>,
    max_bound_ratio: Option<f64>,
    lower_bound_ratio: Option<f64>,
    secondary_lower_bound_ratio: Option<f64>,
    attempt_resolution: Option<bool>,
    token_threshold: Option<usize>,
    keywords: Vec<(SectionType, KeywordOverride)>,
}

impl DetectionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a builder from an on-disk config file.
    pub fn from_config_file(file: &ConfigFile) -> Self {
        let mut builder = Self::new();

        if let Some(d) = &file.detection {
            builder.similarity_threshold = d.similarity_threshold;
            builder.max_bound_ratio = d.max_bound_ratio;
            builder.lower_bound_ratio = d.lower_bound_ratio;
            builder.secondary_lower_bound_ratio = d.secondary_lower_bound_ratio;
            builder.attempt_resolution = d.attempt_resolution;
        }
        if let Some(t) = &file.tokens {
            builder.token_threshold = t.token_threshold;
        }
        if let Some(k) = &file.keywords {
            let extend = k.extend.unwrap_or(false);
            let lists = [
                (SectionType::Intro, &k.intro),
                (SectionType::Conc, &k.conc),
                (SectionType::Refer, &k.refer),
                (SectionType::Acknow, &k.acknow),
            ];
            for (section, list) in lists {
                if let Some(list) = list {
                    builder = if extend {
                        builder.extend_keywords(section, list.clone())
                    } else {
                        builder.set_keywords(section, list.clone())
                    };
                }
            }
        }

        builder
    }

    // ── Thresholds ──

    pub fn similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = Some(threshold);
        self
    }

    pub fn max_bound_ratio(mut self, ratio: f64) -> Self {
        self.max_bound_ratio = Some(ratio);
        self
    }

    pub fn lower_bound_ratio(mut self, ratio: f64) -> Self {
        self.lower_bound_ratio = Some(ratio);
        self
    }

    pub fn secondary_lower_bound_ratio(mut self, ratio: f64) -> Self {
        self.secondary_lower_bound_ratio = Some(ratio);
        self
    }

    pub fn attempt_resolution(mut self, enabled: bool) -> Self {
        self.attempt_resolution = Some(enabled);
        self
    }

    pub fn token_threshold(mut self, n: usize) -> Self {
        self.token_threshold = Some(n);
        self
    }

    // ── Keywords ──

    pub fn set_keywords(mut self, section: SectionType, keywords: Vec<String>) -> Self {
        self.keywords.push((section, KeywordOverride::Replace(keywords)));
        self
    }

    pub fn extend_keywords(mut self, section: SectionType, keywords: Vec<String>) -> Self {
        self.keywords.push((section, KeywordOverride::Extend(keywords)));
        self
    }

    /// Validate all values and produce a [`DetectionConfig`].
    pub fn build(self) -> Result<DetectionConfig, ConfigError> {
        let ratio = |name: &'static str, value: Option<f64>, default: f64| {
            let value = value.unwrap_or(default);
            if (0.0..=1.0).contains(&value) {
                Ok(value)
            } else {
                Err(ConfigError::OutOfRange { name, value })
            }
        };

        let similarity_threshold = ratio(
            "similarity_threshold",
            self.similarity_threshold,
            DEFAULT_SIMILARITY_THRESHOLD,
        )?;
        let max_bound_ratio = ratio(
            "max_bound_ratio",
            self.max_bound_ratio,
            DEFAULT_MAX_BOUND_RATIO,
        )?;
        let lower_bound_ratio = ratio(
            "lower_bound_ratio",
            self.lower_bound_ratio,
            DEFAULT_LOWER_BOUND_RATIO,
        )?;
        let secondary_lower_bound_ratio = ratio(
            "secondary_lower_bound_ratio",
            self.secondary_lower_bound_ratio,
            DEFAULT_SECONDARY_LOWER_BOUND_RATIO,
        )?;
        if secondary_lower_bound_ratio > lower_bound_ratio {
            return Err(ConfigError::SecondaryAbovePrimary {
                primary: lower_bound_ratio,
                secondary: secondary_lower_bound_ratio,
            });
        }

        let mut keywords = KeywordMap::default();
        for (section, list) in self.keywords {
            let resolved = list.apply(keywords.get(section));
            keywords.set(section, resolved);
        }
        for section in SectionType::ALL {
            if keywords.get(section).is_empty() {
                return Err(ConfigError::NoKeywords(section));
            }
        }

        Ok(DetectionConfig {
            similarity_threshold,
            max_bound_ratio,
            lower_bound_ratio,
            secondary_lower_bound_ratio,
            attempt_resolution: self.attempt_resolution.unwrap_or(true),
            token_threshold: self.token_threshold.unwrap_or(DEFAULT_TOKEN_THRESHOLD),
            keywords,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use papersect_core::config_file::{DetectionSection, KeywordsSection};

    #[test]
    fn test_default_config() {
        let config = DetectionConfig::default();
        assert!((config.similarity_threshold - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.token_threshold, 3);
        let params = config.params();
        let bounds = params.resolution.unwrap();
        assert!((bounds.lower - 0.6).abs() < f64::EPSILON);
        assert!((bounds.secondary - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_builder_basic() {
        let config = DetectionConfigBuilder::new()
            .similarity_threshold(0.9)
            .max_bound_ratio(0.8)
            .token_threshold(5)
            .attempt_resolution(false)
            .build()
            .unwrap();
        assert!((config.similarity_threshold - 0.9).abs() < f64::EPSILON);
        assert!((config.max_bound_ratio - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.token_threshold, 5);
        assert!(config.params().resolution.is_none());
    }

    #[test]
    fn test_builder_rejects_out_of_range() {
        let err = DetectionConfigBuilder::new()
            .similarity_threshold(1.2)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::OutOfRange {
                name: "similarity_threshold",
                value: 1.2
            }
        );
        assert!(
            DetectionConfigBuilder::new()
                .max_bound_ratio(-0.1)
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_builder_rejects_secondary_above_primary() {
        let result = DetectionConfigBuilder::new()
            .lower_bound_ratio(0.5)
            .secondary_lower_bound_ratio(0.7)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::SecondaryAbovePrimary { .. })
        ));
    }

    #[test]
    fn test_builder_rejects_empty_keywords() {
        let result = DetectionConfigBuilder::new()
            .set_keywords(SectionType::Refer, vec![" ".to_string()])
            .build();
        assert_eq!(result.unwrap_err(), ConfigError::NoKeywords(SectionType::Refer));
    }

    #[test]
    fn test_builder_keyword_overrides() {
        let config = DetectionConfigBuilder::new()
            .extend_keywords(SectionType::Refer, vec!["Bibliography".to_string()])
            .set_keywords(SectionType::Acknow, vec!["acknowledgments".to_string()])
            .build()
            .unwrap();
        assert_eq!(
            config.keywords.get(SectionType::Refer),
            ["references", "bibliography"]
        );
        assert_eq!(config.keywords.get(SectionType::Acknow), ["acknowledgments"]);
    }

    #[test]
    fn test_from_config_file() {
        let file = ConfigFile {
            detection: Some(DetectionSection {
                similarity_threshold: Some(0.75),
                attempt_resolution: Some(false),
                ..Default::default()
            }),
            keywords: Some(KeywordsSection {
                extend: Some(true),
                refer: Some(vec!["works cited".to_string()]),
                ..Default::default()
            }),
            ..Default::default()
        };
        let config = DetectionConfigBuilder::from_config_file(&file)
            .build()
            .unwrap();
        assert!((config.similarity_threshold - 0.75).abs() < f64::EPSILON);
        assert!(!config.attempt_resolution);
        assert_eq!(
            config.keywords.get(SectionType::Refer),
            ["references", "works cited"]
        );
    }

    #[test]
    fn test_keyword_override_apply() {
        let current = vec!["references".to_string()];

        let replace = KeywordOverride::Replace(vec!["works cited".to_string()]);
        assert_eq!(replace.apply(&current), ["works cited"]);

        let extend = KeywordOverride::Extend(vec!["bibliography".to_string()]);
        assert_eq!(extend.apply(&current), ["references", "bibliography"]);
    }

    #[test]
    fn test_later_keyword_overrides_stack() {
        let config = DetectionConfigBuilder::new()
            .set_keywords(SectionType::Conc, vec!["summary".to_string()])
            .extend_keywords(SectionType::Conc, vec!["outlook".to_string()])
            .build()
            .unwrap();
        assert_eq!(config.keywords.get(SectionType::Conc), ["summary", "outlook"]);
    }
}
