use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use termgram_grammar::PatternSet;
use termgram_matcher::{Extraction, MatchOptions, PhraseExtractor, StopWords, WordComplex};
use termgram_protocol::{DocumentId, PartOfSpeech, Sentence, SentenceId};
use termgram_registry::{decode_patterns, encode_patterns, Registry};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Terminological phrase extraction over analyzed sentences")]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). RUST_LOG wins when set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a JSON pattern set and write it as an rkyv archive
    Compile {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Extract simple and complex phrases from JSON sentences
    Extract(ExtractArgs),
    /// Print registry statistics
    Inspect {
        #[arg(short, long, value_name = "FILE")]
        patterns: PathBuf,
    },
}

#[derive(Args)]
struct ExtractArgs {
    /// Pattern set, JSON (.json) or compiled archive
    #[arg(short, long, value_name = "FILE")]
    patterns: PathBuf,

    #[arg(short, long, value_name = "FILE")]
    sentences: PathBuf,

    /// Newline-separated stop words
    #[arg(long, value_name = "FILE")]
    stop_words: Option<PathBuf>,

    /// JSON match options
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long)]
    clean_stop_words: bool,

    /// Skip the boundary reduction of complex phrases
    #[arg(long)]
    no_boundaries: bool,

    /// Write the report here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize, PartialEq)]
struct PhraseRecord {
    start: usize,
    end: usize,
    text: String,
    pattern: String,
    key: String,
}

impl From<&WordComplex<'_>> for PhraseRecord {
    fn from(wc: &WordComplex<'_>) -> Self {
        Self {
            start: wc.span.start,
            end: wc.span.end,
            text: wc.text.clone(),
            pattern: wc.pattern.to_string(),
            key: wc.key(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SentenceReport {
    document: DocumentId,
    sentence: SentenceId,
    simple: Vec<PhraseRecord>,
    complex: Vec<PhraseRecord>,
}

impl SentenceReport {
    fn new(sentence: &Sentence, extraction: &Extraction<'_>) -> Self {
        Self {
            document: sentence.document,
            sentence: sentence.id,
            simple: extraction.simple.iter().map(PhraseRecord::from).collect(),
            complex: extraction.complex.iter().map(PhraseRecord::from).collect(),
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn is_json(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("json"))
}

fn read_pattern_json(path: &Path) -> anyhow::Result<PatternSet> {
    let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("parsing pattern set {}", path.display()))
}

fn load_patterns(path: &Path) -> anyhow::Result<PatternSet> {
    if is_json(path) {
        return read_pattern_json(path);
    }
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    decode_patterns(&bytes).with_context(|| format!("decoding archive {}", path.display()))
}

fn load_registry(path: &Path) -> anyhow::Result<Registry> {
    let set = load_patterns(path)?;
    info!(version = set.version, patterns = set.patterns.len(), "patterns loaded");
    Registry::from_set(set).with_context(|| format!("invalid pattern set {}", path.display()))
}

fn load_options(args: &ExtractArgs) -> anyhow::Result<MatchOptions> {
    let mut options = match &args.config {
        Some(path) => {
            let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&data).with_context(|| format!("parsing options {}", path.display()))?
        }
        None => MatchOptions::default(),
    };
    if args.clean_stop_words {
        options = options.with_clean_stop_words(true);
    }
    if args.no_boundaries {
        options = options.with_validate_boundaries(false);
    }
    options.validate()?;
    Ok(options)
}

fn compile(input: &Path, output: &Path) -> anyhow::Result<()> {
    info!(input = %input.display(), "reading pattern set");
    let set = read_pattern_json(input)?;

    // Building the registry is the validation step.
    let registry = Registry::from_set(set.clone()).context("pattern set failed validation")?;
    info!(
        version = set.version,
        leaves = registry.leaf_count(),
        composites = registry.composite_count(),
        "compiling"
    );

    let bytes = encode_patterns(&set)?;
    fs::write(output, &bytes).with_context(|| format!("writing {}", output.display()))?;

    info!(output = %output.display(), bytes = bytes.len(), "archive written");
    Ok(())
}

fn run_extraction(registry: &Registry, options: MatchOptions, stop_words: StopWords, sentences: &[Sentence]) -> anyhow::Result<Vec<SentenceReport>> {
    let extractor = PhraseExtractor::new(registry, options)?.with_stop_words(stop_words);

    let mut reports = Vec::with_capacity(sentences.len());
    let mut aborted = 0usize;
    for sentence in sentences {
        match extractor.extract(sentence) {
            Ok(extraction) => reports.push(SentenceReport::new(sentence, &extraction)),
            // Already logged by the extractor; move on to the next sentence.
            Err(_) => aborted += 1,
        }
    }

    if aborted > 0 {
        warn!(aborted, "some sentences were skipped");
    }
    Ok(reports)
}

fn extract(args: &ExtractArgs) -> anyhow::Result<()> {
    let registry = load_registry(&args.patterns)?;
    let options = load_options(args)?;

    let stop_words = match &args.stop_words {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            StopWords::from_text(&text)
        }
        None => StopWords::new(),
    };
    if options.clean_stop_words && stop_words.is_empty() {
        warn!("stop word cleaning is on but the stop word list is empty");
    }

    let data = fs::read_to_string(&args.sentences).with_context(|| format!("reading {}", args.sentences.display()))?;
    let sentences: Vec<Sentence> =
        serde_json::from_str(&data).with_context(|| format!("parsing sentences {}", args.sentences.display()))?;
    info!(sentences = sentences.len(), "extracting");

    let reports = run_extraction(&registry, options, stop_words, &sentences)?;
    let complex: usize = reports.iter().map(|r| r.complex.len()).sum();
    info!(reports = reports.len(), complex, "extraction finished");

    let json = serde_json::to_string_pretty(&reports)?;
    match &args.output {
        Some(path) => fs::write(path, json).with_context(|| format!("writing {}", path.display()))?,
        None => println!("{}", json),
    }
    Ok(())
}

fn pos_list(set: BTreeSet<PartOfSpeech>) -> String {
    set.into_iter().map(PartOfSpeech::as_str).collect::<Vec<_>>().join(", ")
}

fn inspect(path: &Path) -> anyhow::Result<()> {
    let registry = load_registry(path)?;
    if registry.is_empty() {
        bail!("pattern set {} is empty", path.display());
    }

    println!("patterns:   {}", registry.len());
    println!("leaf:       {}", registry.leaf_count());
    println!("composite:  {}", registry.composite_count());
    println!("head POS:   {}", pos_list(registry.head_pos()));
    println!("used POS:   {}", pos_list(registry.used_pos()));
    for (id, pattern) in registry.iter() {
        let depth = registry.nesting_depth(id).unwrap_or(0);
        println!("  [{}] {} ({}, {} slots, depth {})", id, pattern.name, pattern.kind(), pattern.len(), depth);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Command::Compile { input, output } => compile(input, output),
        Command::Extract(args) => extract(args),
        Command::Inspect { patterns } => inspect(patterns),
    }
}
