use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use vitalgrade::analysis::{Analysis, ExtractedReport};
use vitalgrade::standards::{resolve_standards_path, Gender, StandardsStore};

const EXIT_SUCCESS: i32 = 0;
const EXIT_NO_DATA: i32 = 1;
const EXIT_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load and validate the health standards file
    Check,
    /// Score a measurements file (JSON vital stats, a full report, or raw extraction text)
    Score {
        /// File to score
        file: PathBuf,

        /// Gender used for reference ranges and grade bands (male/female, default female)
        #[arg(short, long)]
        gender: Option<String>,

        /// Print the result as JSON
        #[arg(long, conflicts_with = "tsv")]
        json: bool,

        /// Print deductions as tab-separated values
        #[arg(long)]
        tsv: bool,
    },
    /// Recover the JSON object from a saved extraction reply
    Extract {
        /// File holding the raw reply
        file: PathBuf,
    },
}

#[derive(Parser, Debug)]
#[command(name = "vitalgrade")]
#[command(about = "Health checkup scoring CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the standards file (defaults to $VITALGRADE_STANDARDS or
    /// ~/.config/vitalgrade/health_standards.yaml)
    #[arg(short, long, global = true)]
    standards: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_standards(path: Option<PathBuf>) -> StandardsStore {
    let path = resolve_standards_path(path);
    match StandardsStore::load(&path) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    }
}

fn read_input(file: &Path) -> String {
    match std::fs::read_to_string(file) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Failed to read {}: {}", file.display(), e);
            std::process::exit(EXIT_INPUT);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Check => {
            let store = load_standards(cli.standards);
            if !store.defects().is_empty() {
                eprintln!("Standards configuration defects:");
                for defect in store.defects() {
                    eprintln!("  - {}", defect);
                }
                std::process::exit(EXIT_CONFIG);
            }
            println!(
                "OK: {} metrics, {} lookup keys",
                store.len(),
                store.alias_count()
            );
        }
        Commands::Score {
            file,
            gender,
            json,
            tsv,
        } => {
            let store = load_standards(cli.standards);
            let text = read_input(&file);

            let Some(mapping) = vitalgrade::extract_structured(&text) else {
                eprintln!("No structured data found in {}", file.display());
                std::process::exit(EXIT_NO_DATA);
            };

            let Some(report) = ExtractedReport::from_envelope_or_bare(mapping) else {
                eprintln!("No vital_stats object in {}", file.display());
                std::process::exit(EXIT_NO_DATA);
            };
            let gender = Gender::from_label(gender.as_deref());
            if cli.verbose {
                eprintln!(
                    "Scoring {} measurements as {}",
                    report.vital_stats.len(),
                    gender
                );
            }

            let analysis = Analysis::new(report, &store, gender);

            if json {
                match vitalgrade::output::format_result_json(&analysis.result) {
                    Ok(out) => println!("{}", out),
                    Err(e) => {
                        eprintln!("Failed to render JSON: {}", e);
                        std::process::exit(EXIT_INPUT);
                    }
                }
            } else if tsv {
                println!("{}", vitalgrade::output::format_tsv(&analysis.result));
            } else {
                let use_colors = vitalgrade::output::should_use_colors();
                if let Some(header) =
                    vitalgrade::output::format_report_header(&analysis.report, use_colors)
                {
                    println!("{}", header);
                }
                println!(
                    "{}",
                    vitalgrade::output::format_result(&analysis.result, use_colors)
                );
            }
        }
        Commands::Extract { file } => {
            let text = read_input(&file);
            match vitalgrade::extract_structured(&text) {
                Some(mapping) => match serde_json::to_string_pretty(&mapping) {
                    Ok(out) => println!("{}", out),
                    Err(e) => {
                        eprintln!("Failed to render JSON: {}", e);
                        std::process::exit(EXIT_INPUT);
                    }
                },
                None => {
                    eprintln!("No structured data found in {}", file.display());
                    std::process::exit(EXIT_NO_DATA);
                }
            }
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
