use clap::{Args, Parser, Subcommand, ValueEnum};
use g2pcheck::{
    HarnessConfig, LanguageRegistry, PlaceholderEngine, ReferenceAdapter, ReferenceStore,
    Validator, emit,
    availability::{INSTALL_GUIDANCE, ensure_reference_tool},
    compare::{Verdict, attach_subject, diff_report},
    config::{DEFAULT_ESPEAK_BINARY, DEFAULT_OUTPUT_DIR},
};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::time::FormatTime;

/// Logging destination options
#[derive(Debug, Clone, Default, ValueEnum)]
enum LogDestination {
    /// Log to stderr only
    #[default]
    Cli,
    /// Log to file only
    File,
    /// Log to both stderr and file
    All,
    /// Disable all logging
    None,
}

/// Unix timestamp formatter for tracing logs
struct UnixTimestampFormatter;

impl FormatTime for UnixTimestampFormatter {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default();
        write!(w, "{}.{:06}", now.as_secs(), now.subsec_micros())
    }
}

/// Which languages a command applies to
#[derive(Args, Debug)]
struct Target {
    /// Language code (de, pt, ko, vi, es, id, tr, it, en, zh)
    #[arg(short = 'l', long = "lang", value_name = "LANGUAGE")]
    lang: Option<String>,

    /// Every registered language, in registry order
    #[arg(long = "all", conflicts_with = "lang")]
    all: bool,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Run word lists through espeak-ng and print the reference IPA
    #[command(alias = "v")]
    Validate {
        #[command(flatten)]
        target: Target,

        /// Write each language's results to <OUTPUT_DIR>/espeak_ref_<lang>.json
        #[arg(long = "save")]
        save: bool,

        /// Directory for reference snapshots
        #[arg(
            short = 'o',
            long = "output-dir",
            value_name = "OUTPUT_DIR",
            default_value = DEFAULT_OUTPUT_DIR
        )]
        output_dir: PathBuf,

        /// Only run the first N words of each list
        #[arg(long = "sample", value_name = "N")]
        sample: Option<usize>,

        /// Words to run instead of the registered list (comma separated)
        #[arg(
            short = 'w',
            long = "words",
            value_delimiter = ',',
            num_args = 1..,
            requires = "lang"
        )]
        words: Option<Vec<String>>,
    },

    /// Diff saved reference snapshots against the G2P engine
    #[command(alias = "c")]
    Compare {
        #[command(flatten)]
        target: Target,

        /// Directory holding reference snapshots
        #[arg(
            short = 'o',
            long = "output-dir",
            value_name = "OUTPUT_DIR",
            default_value = DEFAULT_OUTPUT_DIR
        )]
        output_dir: PathBuf,
    },

    /// List registered languages
    Langs,
}

#[derive(Parser, Debug)]
#[command(name = "g2pc")]
#[command(version = "0.1")]
#[command(about = "Validate G2P output against espeak-ng")]
struct Cli {
    /// espeak-ng executable
    #[arg(
        long = "espeak-bin",
        value_name = "PATH",
        default_value = DEFAULT_ESPEAK_BINARY,
        global = true
    )]
    espeak_bin: PathBuf,

    /// Seconds to wait for a single espeak-ng call before giving up on the word
    #[arg(long = "timeout-secs", value_name = "SECONDS", default_value_t = 10, global = true)]
    timeout_secs: u64,

    /// JSON file with custom languages ([{"code", "dialect", "corpus"}])
    #[arg(long = "corpus", value_name = "CORPUS_JSON", global = true)]
    corpus: Option<PathBuf>,

    /// Configure logging output destination
    #[arg(long = "log", value_enum, default_value_t = LogDestination::Cli, global = true)]
    log_destination: LogDestination,

    /// Custom log file path (defaults to logs/g2pc.log with daily rotation)
    #[arg(long = "log-file", value_name = "LOG_FILE", global = true)]
    log_file: Option<String>,

    #[command(subcommand)]
    mode: Mode,
}

fn env_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
}

fn file_appender(log_file: Option<&str>) -> std::io::Result<(RollingFileAppender, String)> {
    match log_file {
        Some(custom_path) => {
            let path = Path::new(custom_path);
            let log_dir = path.parent().unwrap_or(Path::new("."));
            let filename = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "g2pc.log".to_string());
            std::fs::create_dir_all(log_dir)?;
            Ok((
                tracing_appender::rolling::daily(log_dir, filename),
                custom_path.to_string(),
            ))
        }
        None => {
            std::fs::create_dir_all("logs")?;
            Ok((
                tracing_appender::rolling::daily("logs", "g2pc.log"),
                "logs/g2pc.log".to_string(),
            ))
        }
    }
}

fn init_logging(destination: &LogDestination, log_file: Option<&str>) -> std::io::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    match destination {
        LogDestination::None => {
            tracing_subscriber::registry()
                .with(tracing_subscriber::EnvFilter::new("off"))
                .init();
        }
        LogDestination::Cli => {
            // stdout carries the report; logs go to stderr
            tracing_subscriber::fmt()
                .with_timer(UnixTimestampFormatter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_env_filter(env_filter())
                .init();
        }
        LogDestination::File => {
            let (appender, log_path) = file_appender(log_file)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            std::mem::forget(guard); // Keep guard alive for the duration of the program

            tracing_subscriber::fmt()
                .with_timer(UnixTimestampFormatter)
                .with_writer(non_blocking)
                .with_target(false)
                .with_ansi(false)
                .with_env_filter(env_filter())
                .init();

            eprintln!("File logging enabled: {}", log_path);
        }
        LogDestination::All => {
            let (appender, log_path) = file_appender(log_file)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            std::mem::forget(guard);

            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_timer(UnixTimestampFormatter)
                        .with_writer(std::io::stderr)
                        .with_target(false),
                )
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_timer(UnixTimestampFormatter)
                        .with_writer(non_blocking)
                        .with_target(false)
                        .with_ansi(false),
                )
                .with(env_filter())
                .init();

            eprintln!("Console and file logging enabled: {}", log_path);
        }
    }
    Ok(())
}

fn print_usage() {
    emit(
        &mut std::io::stdout(),
        format_args!(
            "Usage: g2pc validate --lang de\n       g2pc validate --all\n       g2pc validate --all --save\n"
        ),
    );
}

/// Languages selected by `target`, or `None` when neither flag was given.
fn selected_langs(target: &Target, registry: &LanguageRegistry) -> Option<Vec<String>> {
    if target.all {
        Some(registry.codes().map(str::to_string).collect())
    } else {
        target.lang.clone().map(|lang| vec![lang])
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();
    init_logging(&args.log_destination, args.log_file.as_deref())?;

    let Cli {
        espeak_bin,
        timeout_secs,
        corpus,
        log_destination: _,
        log_file: _,
        mode,
    } = args;

    let config = HarnessConfig {
        espeak_binary: espeak_bin,
        timeout: Duration::from_secs(timeout_secs),
        corpus_file: corpus,
        ..HarnessConfig::default()
    };

    let registry = match &config.corpus_file {
        Some(path) => LanguageRegistry::from_json_file(path)?,
        None => LanguageRegistry::builtin(),
    };

    match mode {
        Mode::Validate {
            target,
            save,
            output_dir,
            sample,
            words,
        } => {
            if let Err(e) = ensure_reference_tool(&config.espeak_binary, config.timeout) {
                tracing::error!("{}", e);
                emit(
                    &mut std::io::stdout(),
                    format_args!("ERROR: espeak-ng not found!\n\n{}\n", INSTALL_GUIDANCE),
                );
                std::process::exit(1);
            }

            let Some(langs) = selected_langs(&target, &registry) else {
                print_usage();
                return Ok(());
            };

            let config = HarnessConfig {
                output_dir,
                ..config
            };
            let adapter = ReferenceAdapter::from_config(&config)?;
            tracing::info!("Reference strategies: {}", adapter.strategy_names().join(", "));

            let mut validator = Validator::new(&registry, adapter);
            if let Some(n) = sample {
                validator = validator.with_sample(n);
            }
            let store = ReferenceStore::new(&config.output_dir);
            if save {
                tracing::info!("Reference snapshots go to {}", store.dir().display());
            }

            let mut stdout = std::io::stdout().lock();
            for lang in &langs {
                let report = validator.validate(lang, words.as_deref(), &mut stdout);
                if save && !report.is_empty() {
                    match store.save(&report) {
                        Ok(path) => emit(
                            &mut stdout,
                            format_args!("\nSaved reference data to {}\n", path.display()),
                        ),
                        Err(e) => tracing::error!("Could not save {}: {}", lang, e),
                    }
                }
            }
        }

        Mode::Compare { target, output_dir } => {
            let Some(langs) = selected_langs(&target, &registry) else {
                print_usage();
                return Ok(());
            };

            let store = ReferenceStore::new(output_dir);
            let engine = PlaceholderEngine;
            let mut stdout = std::io::stdout().lock();
            for lang in &langs {
                let mut report = match store.load(lang) {
                    Ok(report) => report,
                    Err(e) => {
                        tracing::warn!(
                            "No reference data for {} in {}: {}",
                            lang,
                            store.dir().display(),
                            e
                        );
                        continue;
                    }
                };
                attach_subject(&mut report, &engine);
                let comparison = diff_report(&report);

                emit(&mut stdout, format_args!("\nLanguage: {}\n", lang));
                for diff in &comparison.diffs {
                    emit(
                        &mut stdout,
                        format_args!(
                            "  {:20} {:16} espeak: {}  g2p: {}\n",
                            diff.word,
                            diff.verdict.to_string(),
                            diff.reference,
                            diff.subject.as_deref().unwrap_or("-")
                        ),
                    );
                }
                let rate = comparison
                    .match_rate()
                    .map(|r| format!("{:.1}%", r * 100.0))
                    .unwrap_or_else(|| "n/a".to_string());
                emit(
                    &mut stdout,
                    format_args!(
                        "  matched {} / mismatched {} / reference failures {} / no subject {} ({})\n",
                        comparison.count(Verdict::Match),
                        comparison.count(Verdict::Mismatch),
                        comparison.count(Verdict::ReferenceFailed),
                        comparison.count(Verdict::NoSubject),
                        rate
                    ),
                );
            }
        }

        Mode::Langs => {
            let mut stdout = std::io::stdout().lock();
            for entry in registry.entries() {
                emit(
                    &mut stdout,
                    format_args!(
                        "{:6} espeak: {:8} {} words\n",
                        entry.code,
                        entry.dialect_code,
                        entry.corpus.len()
                    ),
                );
            }
        }
    }

    Ok(())
}
