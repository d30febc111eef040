use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub detection: Option<DetectionSection>,
    pub tokens: Option<TokensSection>,
    pub keywords: Option<KeywordsSection>,
    pub corpus: Option<CorpusSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionSection {
    pub similarity_threshold: Option<f64>,
    pub max_bound_ratio: Option<f64>,
    pub lower_bound_ratio: Option<f64>,
    pub secondary_lower_bound_ratio: Option<f64>,
    pub attempt_resolution: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokensSection {
    pub token_threshold: Option<usize>,
}

/// Per-section keyword lists. With `extend = true` the lists are appended to
/// the built-in keywords, otherwise they replace them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordsSection {
    pub extend: Option<bool>,
    pub intro: Option<Vec<String>>,
    pub conc: Option<Vec<String>>,
    pub refer: Option<Vec<String>>,
    pub acknow: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorpusSection {
    pub paper_file_name: Option<String>,
    pub processed_file_name: Option<String>,
    pub remove_blank_lines: Option<bool>,
}

/// Platform config directory path: `<config_dir>/papersect/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("papersect").join("config.toml"))
}

/// Load config by cascading CWD `.papersect.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".papersect.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Load a config the user pointed at explicitly. Unlike [`load_from_path`],
/// a missing or malformed file is an error.
pub fn load_required(path: &Path) -> Result<ConfigFile, CoreError> {
    let content = std::fs::read_to_string(path).map_err(|source| CoreError::ConfigIo {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| CoreError::ConfigParse {
        path: path.display().to_string(),
        source,
    })
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let bd = base.detection.unwrap_or_default();
    let od = overlay.detection.unwrap_or_default();
    let bt = base.tokens.unwrap_or_default();
    let ot = overlay.tokens.unwrap_or_default();
    let bkw = base.keywords.unwrap_or_default();
    let okw = overlay.keywords.unwrap_or_default();
    let bc = base.corpus.unwrap_or_default();
    let oc = overlay.corpus.unwrap_or_default();

    ConfigFile {
        detection: Some(DetectionSection {
            similarity_threshold: od.similarity_threshold.or(bd.similarity_threshold),
            max_bound_ratio: od.max_bound_ratio.or(bd.max_bound_ratio),
            lower_bound_ratio: od.lower_bound_ratio.or(bd.lower_bound_ratio),
            secondary_lower_bound_ratio: od
                .secondary_lower_bound_ratio
                .or(bd.secondary_lower_bound_ratio),
            attempt_resolution: od.attempt_resolution.or(bd.attempt_resolution),
        }),
        tokens: Some(TokensSection {
            token_threshold: ot.token_threshold.or(bt.token_threshold),
        }),
        keywords: Some(KeywordsSection {
            extend: okw.extend.or(bkw.extend),
            intro: okw.intro.or(bkw.intro),
            conc: okw.conc.or(bkw.conc),
            refer: okw.refer.or(bkw.refer),
            acknow: okw.acknow.or(bkw.acknow),
        }),
        corpus: Some(CorpusSection {
            paper_file_name: oc.paper_file_name.or(bc.paper_file_name),
            processed_file_name: oc.processed_file_name.or(bc.processed_file_name),
            remove_blank_lines: oc.remove_blank_lines.or(bc.remove_blank_lines),
        }),
    }
}
