use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use papersect_core::SectionType;
use papersect_core::config_file::{self, ConfigFile, DetectionSection, TokensSection};
use papersect_ingest::{CorpusOptions, CorpusReader};
use papersect_parsing::SectionDetector;
use tracing_subscriber::EnvFilter;

mod modes;
mod output;

use output::ColorMode;

/// Research paper section detector - locate headings and strip reference lists
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// TOML config file (replaces the .papersect.toml / platform config cascade)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Minimum normalized similarity between a line and a keyword
    #[arg(long, global = true)]
    similarity_threshold: Option<f64>,

    /// Lines with this many tokens or fewer are filtered out
    #[arg(long, global = true)]
    token_threshold: Option<usize>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search every paper for section headings and append one JSONL record per paper
    DetectKeywords {
        /// Corpus directory or a single paper file
        data_path: PathBuf,

        /// JSONL file to append records to
        #[arg(short, long)]
        output: PathBuf,

        /// Comma-separated section types to search (default: all)
        #[arg(long, value_delimiter = ',')]
        sections: Vec<SectionType>,
    },

    /// Run the first-reference fallback on every paper and append JSONL records
    DetectFirstReference {
        /// Corpus directory or a single paper file
        data_path: PathBuf,

        /// JSONL file to append records to
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Summarise a detect-keywords JSONL file
    SectionKeywordsAnalysis {
        /// JSONL produced by detect-keywords
        input: PathBuf,

        /// Directory for the summary JSON
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Summarise a detect-first-reference JSONL file
    FirstReferenceAnalysis {
        /// JSONL produced by detect-first-reference
        input: PathBuf,

        /// Directory for the two summary JSON files
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Strip reference lists and write <out-dir>/<paper_id>/processed_paper.txt
    Clean {
        /// Corpus directory or a single paper file
        data_path: PathBuf,

        /// Output directory for cleaned papers
        #[arg(short, long)]
        out_dir: PathBuf,
    },

    /// Show per-label paper and sentence counts of a cleaned dataset split
    Dataset {
        /// Dataset root containing split folders
        root: PathBuf,

        /// Split folder to read
        #[arg(long, default_value = "train")]
        split: String,

        /// Shuffle papers deterministically with this seed
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let color = ColorMode(!cli.no_color);

    // Resolve configuration: CLI flags > config file > defaults
    let file = load_config_file(cli.config.as_deref())?;
    let detector = build_detector(&cli, &file)?;
    let options = CorpusOptions::from_config_file(&file);
    let processed_file_name = file
        .corpus
        .as_ref()
        .and_then(|c| c.processed_file_name.clone())
        .unwrap_or_else(|| papersect_ingest::dataset::DEFAULT_PROCESSED_FILE_NAME.to_string());

    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Command::DetectKeywords {
            data_path,
            output: jsonl,
            sections,
        } => {
            let reader = open_corpus(&data_path, options)?;
            let sections = if sections.is_empty() {
                SectionType::ALL.to_vec()
            } else {
                sections
            };
            let counts = modes::detect_keywords(&reader, &detector, &sections, &jsonl)?;
            output::print_run_summary(
                &mut stdout,
                "Section keyword detection",
                &counts,
                &jsonl,
                color,
            )?;
        }
        Command::DetectFirstReference {
            data_path,
            output: jsonl,
        } => {
            let reader = open_corpus(&data_path, options)?;
            let counts = modes::detect_first_reference(&reader, &detector, &jsonl)?;
            output::print_run_summary(
                &mut stdout,
                "First reference detection",
                &counts,
                &jsonl,
                color,
            )?;
        }
        Command::SectionKeywordsAnalysis { input, out_dir } => {
            let breakdown = modes::section_keywords_analysis(&input, &out_dir)?;
            output::print_keyword_breakdown(&mut stdout, &breakdown, color)?;
        }
        Command::FirstReferenceAnalysis { input, out_dir } => {
            let (single, non_single) = modes::first_reference_analysis(&input, &out_dir)?;
            output::print_first_reference_breakdown(&mut stdout, &single, &non_single, color)?;
        }
        Command::Clean { data_path, out_dir } => {
            let reader = open_corpus(&data_path, options)?;
            let summary = modes::clean(&reader, &detector, &out_dir, &processed_file_name)?;
            output::print_clean_summary(&mut stdout, &summary, &out_dir, color)?;
        }
        Command::Dataset { root, split, seed } => {
            let rows = modes::dataset_overview(&root, &split, seed, &processed_file_name)?;
            output::print_dataset_overview(&mut stdout, &split, &rows, color)?;
        }
    }

    Ok(())
}

/// An explicit `--config` must exist and parse; otherwise the cascade is
/// used and missing files are fine.
fn load_config_file(path: Option<&Path>) -> anyhow::Result<ConfigFile> {
    match path {
        Some(path) => Ok(config_file::load_required(path)?),
        None => Ok(config_file::load_config()),
    }
}

/// CLI flags are layered over the config file before validation.
fn build_detector(cli: &Cli, file: &ConfigFile) -> anyhow::Result<SectionDetector> {
    let flags = ConfigFile {
        detection: Some(DetectionSection {
            similarity_threshold: cli.similarity_threshold,
            ..Default::default()
        }),
        tokens: Some(TokensSection {
            token_threshold: cli.token_threshold,
        }),
        ..Default::default()
    };
    let merged = config_file::merge(file.clone(), flags);
    let detector =
        SectionDetector::from_config_file(&merged).context("invalid detection configuration")?;

    let config = detector.config();
    tracing::debug!(
        similarity_threshold = config.similarity_threshold(),
        token_threshold = config.token_threshold(),
        "detection config resolved"
    );
    for (section, keywords) in config.keywords().iter() {
        tracing::debug!(section = %section, ?keywords, "section keywords");
    }
    Ok(detector)
}

fn open_corpus(data_path: &Path, options: CorpusOptions) -> anyhow::Result<CorpusReader> {
    let reader = CorpusReader::open(data_path, options)
        .with_context(|| format!("failed to open corpus at {}", data_path.display()))?;
    tracing::info!(
        path = %data_path.display(),
        papers = reader.len(),
        labels = reader.labels().len(),
        "corpus opened"
    );
    Ok(reader)
}
