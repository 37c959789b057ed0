use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use voicelens::analyzer::perception::{perception_explanation, perception_label, LabelMode};
use voicelens::analyzer::summary::ClipAnalysis;
use voicelens::analyzer::{AnalyzerConfig, ClipReport};
use voicelens::display::{format_summary, truncate_name};

#[derive(Parser)]
#[command(
    name = "voicelens",
    version,
    about = "Voice clip analyzer — pitch, resonance, and perceived voice character"
)]
struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LabelArg {
    Neutral,
    Gendered,
    Off,
}

impl From<LabelArg> for LabelMode {
    fn from(arg: LabelArg) -> Self {
        match arg {
            LabelArg::Neutral => LabelMode::Neutral,
            LabelArg::Gendered => LabelMode::Gendered,
            LabelArg::Off => LabelMode::Off,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze WAV files or directories and print one summary per clip
    Analyze {
        /// Files or directories to analyze
        paths: Vec<PathBuf>,

        /// Analysis window length in milliseconds
        #[arg(long)]
        window_ms: Option<u32>,

        /// Number of parallel workers (0 = auto-detect from config)
        #[arg(short = 'j', long, default_value = "0")]
        jobs: usize,

        /// Label vocabulary (overrides config)
        #[arg(long, value_enum)]
        labels: Option<LabelArg>,

        /// Emit full analyses as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the window-by-window trace for one clip
    Trace {
        /// WAV file to trace
        path: PathBuf,

        /// Analysis window length in milliseconds
        #[arg(long)]
        window_ms: Option<u32>,

        /// Label vocabulary (overrides config)
        #[arg(long, value_enum)]
        labels: Option<LabelArg>,

        /// Emit the analysis as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load config file (optional, defaults if missing)
    let config = voicelens::config::AppConfig::load();

    match cli.command {
        Commands::Analyze {
            paths,
            window_ms,
            jobs,
            labels,
            json,
        } => {
            if paths.is_empty() {
                anyhow::bail!("No inputs. Pass WAV files or directories to analyze.");
            }

            // Resolve settings: CLI > config > defaults
            let analyzer = AnalyzerConfig {
                window_ms: window_ms.unwrap_or(config.window_ms),
            };
            let mode = labels.map(LabelMode::from).unwrap_or(config.label_mode);
            let workers = if jobs > 0 { jobs } else { config.resolve_workers() };

            let files = voicelens::input::find_wav_files(&paths);
            if files.is_empty() {
                anyhow::bail!("No WAV files found under the given paths.");
            }

            let result = voicelens::analyzer::analyze_files(&files, &analyzer, workers)
                .context("Analysis failed")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result.reports)?);
            } else if result.reports.is_empty() {
                println!("Nothing analyzed.");
            } else {
                println!();
                print_summary_table(&result.reports, mode);
            }

            if result.failed > 0 && !json {
                println!();
                println!("{} file(s) failed to analyze (see warnings above)", result.failed);
            }
        }

        Commands::Trace {
            path,
            window_ms,
            labels,
            json,
        } => {
            let analyzer = AnalyzerConfig {
                window_ms: window_ms.unwrap_or(config.window_ms),
            };
            let mode = labels.map(LabelMode::from).unwrap_or(config.label_mode);

            let clip = voicelens::input::read_wav(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let analysis =
                voicelens::analyzer::analyze_clip(&clip, &analyzer).context("Analysis failed")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                print_trace_table(&analysis, mode);
            }
        }
    }

    Ok(())
}

/// Print one summary row per analyzed clip.
fn print_summary_table(reports: &[ClipReport], mode: LabelMode) {
    println!(
        "{:<28} {:>7} {:>8} {:>12} {:>6} {:>6} {:>7}  {}",
        "File", "Dur", "Pitch", "Range", "Score", "Stab", "Voiced", "Label"
    );
    println!("{}", "-".repeat(92));

    for report in reports {
        let formatted = format_summary(&report.analysis, mode);
        let name = report
            .path
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_else(|| report.path.display().to_string());
        // Truncate long filenames
        let name_display = truncate_name(&name, 28);

        println!(
            "{:<28} {:>7} {:>8} {:>12} {:>5}% {:>5}% {:>6}%  {}",
            name_display,
            formatted.duration,
            formatted.avg_pitch,
            formatted.pitch_range,
            formatted.score,
            formatted.stability,
            formatted.voiced_percent,
            formatted.label,
        );
    }

    println!();
    println!("Score = perceived brightness 0-100 (higher reads brighter/higher)");
    println!("Stab = score stability  Voiced = share of voiced windows");
}

/// Print the full trace with a summary block underneath.
fn print_trace_table(analysis: &ClipAnalysis, mode: LabelMode) {
    println!(
        "{:>7} {:>7} {:>6} {:>6} {:>6} {:>6} {:>5}  {}",
        "Time", "Pitch", "F1", "F2", "H1-H2", "Score", "Conf", "Label"
    );
    println!("{}", "-".repeat(72));

    for point in &analysis.trace {
        match point.pitch {
            Some(pitch) => {
                println!(
                    "{:>6.2}s {:>7.0} {:>6.0} {:>6.0} {:>6.1} {:>6.2} {:>5.2}  {}",
                    point.time,
                    pitch,
                    point.f1.unwrap_or(0.0),
                    point.f2.unwrap_or(0.0),
                    point.h1h2.unwrap_or(0.0),
                    point.perception.score,
                    point.perception.confidence,
                    perception_label(point.perception.score, mode),
                );
            }
            None => {
                println!(
                    "{:>6.2}s {:>7} {:>6} {:>6} {:>6} {:>6} {:>5}  (unvoiced)",
                    point.time, "-", "-", "-", "-", "-", "-"
                );
            }
        }
    }

    let formatted = format_summary(analysis, mode);
    println!();
    println!(
        "Duration: {}   Voiced: {}%",
        formatted.duration, formatted.voiced_percent
    );
    println!(
        "Pitch: {} avg, {} range",
        formatted.avg_pitch, formatted.pitch_range
    );
    if formatted.label.is_empty() {
        println!(
            "Score: {}   Stability: {}%",
            formatted.score, formatted.stability
        );
    } else {
        println!(
            "Score: {} ({})   Stability: {}%",
            formatted.score, formatted.label, formatted.stability
        );
    }

    // Explain the window the model was most sure about.
    if mode != LabelMode::Off {
        if let Some(best) = analysis
            .trace
            .iter()
            .filter(|p| p.is_voiced())
            .max_by(|a, b| a.perception.confidence.total_cmp(&b.perception.confidence))
        {
            println!();
            println!("{}", perception_explanation(&best.perception, mode));
        }
    }
}
