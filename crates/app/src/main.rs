use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use catalog::QuestionCatalog;
use interview_core::model::{Category, Difficulty};
use services::{
    Clock, InterviewController, PracticeState, ReplayRecognizer, SpeechRecognizer,
    UnsupportedRecognizer,
};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

mod console;
mod render;

use console::ConsoleOptions;

const DEFAULT_QUESTION_COUNT: usize = 5;
const DEFAULT_LOG_FILTER: &str = "app=info,services=info,catalog=info";

#[derive(Debug, PartialEq, Eq)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidCount { raw: String },
    InvalidCategory { raw: String },
    InvalidDifficulty { raw: String },
    InvalidSeed { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidCount { raw } => write!(f, "invalid --count value: {raw}"),
            ArgsError::InvalidCategory { raw } => write!(f, "invalid --category value: {raw}"),
            ArgsError::InvalidDifficulty { raw } => {
                write!(f, "invalid --difficulty value: {raw}")
            }
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    question_count: usize,
    categories: Vec<Category>,
    difficulty: Option<Difficulty>,
    catalog: Option<PathBuf>,
    seed: Option<u64>,
    transcript: Option<PathBuf>,
    json: bool,
    list: bool,
    help: bool,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --count <n>            questions per interview (default 5)");
    eprintln!("  --category <c>[,<c>]   only these categories, in catalog order (repeatable)");
    eprintln!("  --difficulty <d>       beginner | intermediate | advanced");
    eprintln!("  --catalog <path>       load questions from a JSON file");
    eprintln!("  --seed <n>             reproducible question sampling");
    eprintln!("  --transcript <path>    replay speech input, one utterance per line");
    eprintln!("  --json                 print results as JSON on stdout");
    eprintln!("  --list                 list the catalog and exit");
    eprintln!();
    eprintln!("Categories:");
    eprintln!(
        "  {}",
        Category::ALL.map(Category::as_str).join(", ")
    );
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  INTERVIEW_QUESTION_COUNT, INTERVIEW_CATEGORIES, INTERVIEW_DIFFICULTY,");
    eprintln!("  INTERVIEW_CATALOG, INTERVIEW_SEED, INTERVIEW_TRANSCRIPT, RUST_LOG");
}

/// Negative counts mean "no questions".
fn parse_count(raw: &str) -> Option<usize> {
    let value: i64 = raw.trim().parse().ok()?;
    Some(usize::try_from(value).unwrap_or(0))
}

fn parse_categories(raw: &str) -> Result<Vec<Category>, ArgsError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<Category>()
                .map_err(|_| ArgsError::InvalidCategory {
                    raw: part.to_owned(),
                })
        })
        .collect()
}

fn non_empty_path(raw: String) -> Option<PathBuf> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
}

impl Args {
    /// Environment first, then flags on top.
    fn parse(
        env: impl Fn(&str) -> Option<String>,
        args: &mut impl Iterator<Item = String>,
    ) -> Result<Self, ArgsError> {
        let mut question_count = env("INTERVIEW_QUESTION_COUNT")
            .and_then(|value| parse_count(&value))
            .unwrap_or(DEFAULT_QUESTION_COUNT);
        let env_categories = match env("INTERVIEW_CATEGORIES") {
            Some(value) => parse_categories(&value)?,
            None => Vec::new(),
        };
        let mut difficulty = match env("INTERVIEW_DIFFICULTY") {
            Some(value) if !value.trim().is_empty() => Some(
                value
                    .parse::<Difficulty>()
                    .map_err(|_| ArgsError::InvalidDifficulty { raw: value.clone() })?,
            ),
            _ => None,
        };
        let mut catalog = env("INTERVIEW_CATALOG").and_then(non_empty_path);
        let mut seed = env("INTERVIEW_SEED").and_then(|value| value.trim().parse::<u64>().ok());
        let mut transcript = env("INTERVIEW_TRANSCRIPT").and_then(non_empty_path);

        let mut flag_categories: Option<Vec<Category>> = None;
        let mut json = false;
        let mut list = false;
        let mut help = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--count" => {
                    let value = require_value(args, "--count")?;
                    question_count = parse_count(&value)
                        .ok_or_else(|| ArgsError::InvalidCount { raw: value.clone() })?;
                }
                "--category" => {
                    let value = require_value(args, "--category")?;
                    flag_categories
                        .get_or_insert_with(Vec::new)
                        .extend(parse_categories(&value)?);
                }
                "--difficulty" => {
                    let value = require_value(args, "--difficulty")?;
                    difficulty = Some(
                        value
                            .parse()
                            .map_err(|_| ArgsError::InvalidDifficulty { raw: value.clone() })?,
                    );
                }
                "--catalog" => {
                    catalog = non_empty_path(require_value(args, "--catalog")?);
                }
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    seed = Some(
                        value
                            .trim()
                            .parse()
                            .map_err(|_| ArgsError::InvalidSeed { raw: value.clone() })?,
                    );
                }
                "--transcript" => {
                    transcript = non_empty_path(require_value(args, "--transcript")?);
                }
                "--json" => json = true,
                "--list" => list = true,
                "--help" | "-h" => help = true,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let mut categories = flag_categories.unwrap_or(env_categories);
        let mut seen = Vec::with_capacity(categories.len());
        categories.retain(|c| {
            let fresh = !seen.contains(c);
            seen.push(*c);
            fresh
        });

        Ok(Self {
            question_count,
            categories,
            difficulty,
            catalog,
            seed,
            transcript,
            json,
            list,
            help,
        })
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    // stdout belongs to the interview.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_catalog(path: Option<&PathBuf>) -> Result<QuestionCatalog, catalog::CatalogError> {
    match path {
        Some(path) => QuestionCatalog::load_json(path),
        None => QuestionCatalog::builtin(),
    }
}

fn build_recognizer(
    transcript: Option<&PathBuf>,
) -> Result<Box<dyn SpeechRecognizer + Send>, Box<dyn std::error::Error>> {
    let Some(path) = transcript else {
        return Ok(Box::new(UnsupportedRecognizer));
    };
    let text = std::fs::read_to_string(path)
        .map_err(|err| format!("failed to read transcript {}: {err}", path.display()))?;
    tracing::info!(path = %path.display(), "speech input replays transcript");
    Ok(Box::new(ReplayRecognizer::from_transcript(&text)))
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(|key| std::env::var(key).ok(), &mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    if parsed.help {
        print_usage();
        return Ok(());
    }

    let catalog = load_catalog(parsed.catalog.as_ref())?;
    if parsed.list {
        println!("{}", render::catalog_listing(&catalog));
        return Ok(());
    }

    let mut controller = InterviewController::new(Clock::system(), Arc::new(catalog))
        .with_difficulty(parsed.difficulty);
    if let Some(seed) = parsed.seed {
        controller = controller.with_seed(seed);
    }

    let recognizer = build_recognizer(parsed.transcript.as_ref())?;
    let (speech_tx, speech_rx) = mpsc::unbounded_channel();
    let practice = PracticeState::new(controller, recognizer, speech_tx);

    let options = ConsoleOptions {
        question_count: parsed.question_count,
        categories: parsed.categories,
        json: parsed.json,
    };
    console::run(practice, speech_rx, &options).await
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
