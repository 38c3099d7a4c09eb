//! CLI command definitions, routing, and tracing setup.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use storyplan_core::pipeline::{PlanReport, ProgressReporter, convert_plan};
use storyplan_core::{stats, words};
use storyplan_shared::{AppConfig, PlanConfig, SheetSelector, init_config, load_config, parse_tags};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// StoryPlan: scene plans in, chapter notes out.
#[derive(Parser)]
#[command(
    name = "storyplan",
    version,
    about = "Turn a scene-plan spreadsheet into per-chapter markdown notes.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write logs to this file instead of stderr.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Convert a scene plan (xlsx, xls, ods or csv) into chapter notes.
    Plan {
        /// Workbook or CSV file holding the scene plan.
        input: PathBuf,

        /// Directory for the chapter notes (defaults to the configured output_dir).
        output_dir: Option<PathBuf>,

        /// Worksheet name or zero-based index.
        #[arg(short, long)]
        sheet: Option<String>,

        /// Prepend a metadata block to each note.
        #[arg(long)]
        add_metadata: bool,

        /// Comma-separated tags for the metadata block.
        #[arg(short, long)]
        tags: Option<String>,

        /// Count scenes per day.
        #[arg(short, long)]
        generate_metrics: bool,

        /// Save the day chart under <OUTPUT_DIR>/images/.
        #[arg(short = 'S', long)]
        save: bool,
    },

    /// Rank words across exported `word,count` CSV files.
    Words {
        /// Directory containing the CSV files.
        dir: PathBuf,

        /// Number of words to show (defaults to the configured top_n).
        #[arg(short = 'n', long)]
        top: Option<usize>,

        /// Save a bar chart of the top words to this SVG file.
        #[arg(long)]
        chart: Option<PathBuf>,
    },

    /// Report word-count statistics for a manuscript TOML file.
    Stats {
        /// Manuscript file with per-scene word counts.
        manuscript: PathBuf,

        /// Save the four-panel dashboard to this SVG file.
        #[arg(long)]
        chart: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "storyplan=info",
        1 => "storyplan=debug",
        _ => "storyplan=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match (&cli.log_file, &cli.log_format) {
        (None, LogFormat::Text) => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        (None, LogFormat::Json) => {
            fmt().json().with_env_filter(env_filter).init();
        }
        (Some(path), format) => {
            let file = File::create(path)
                .wrap_err_with(|| format!("cannot open log file {}", path.display()))?;
            let writer = Mutex::new(file);
            match format {
                LogFormat::Text => fmt()
                    .with_env_filter(env_filter)
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(writer)
                    .init(),
                LogFormat::Json => fmt()
                    .json()
                    .with_env_filter(env_filter)
                    .with_writer(writer)
                    .init(),
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Plan {
            input,
            output_dir,
            sheet,
            add_metadata,
            tags,
            generate_metrics,
            save,
        } => {
            let mut config = PlanConfig::from_app(input, &load_config()?);
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            if let Some(sheet) = sheet {
                config.sheet = sheet.parse().unwrap_or_default();
            }
            if let Some(tags) = tags {
                config.tags = parse_tags(&tags);
            }
            config.add_metadata |= add_metadata;
            config.generate_metrics |= generate_metrics;
            config.save_metrics |= save;
            cmd_plan(&config)
        }
        Command::Words { dir, top, chart } => {
            let top_n = top.unwrap_or(load_config()?.words.top_n);
            cmd_words(&dir, top_n, chart.as_deref())
        }
        Command::Stats { manuscript, chart } => cmd_stats(&manuscript, chart.as_deref()),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_plan(config: &PlanConfig) -> Result<()> {
    if config.save_metrics && !config.generate_metrics {
        info!("--save has no effect without --generate-metrics");
    }
    if let (SheetSelector::Name(name), true) = (&config.sheet, is_csv(&config.input)) {
        info!(sheet = %name, "sheet selector ignored for CSV input");
    }

    info!(
        input = %config.input.display(),
        output_dir = %config.output_dir.display(),
        "converting scene plan"
    );

    let reporter = CliProgress::new();
    let report = convert_plan(config, &reporter)
        .wrap_err_with(|| format!("failed to convert {}", config.input.display()))?;

    println!();
    println!("  Chapter notes written!");
    println!("  Scenes:   {}", report.scene_count);
    println!("  Chapters: {}", report.written.len());
    println!("  Path:     {}", report.output_dir.display());
    println!("  Time:     {:.1}s", report.elapsed.as_secs_f64());

    if !report.failed.is_empty() {
        println!();
        println!("  {} chapter(s) could not be written:", report.failed.len());
        for failure in &report.failed {
            println!("    Chapter {}: {}", failure.key, failure.error);
        }
    }

    if let Some(days) = &report.day_counts {
        println!();
        println!("  Scenes per day:");
        for (day, count) in days {
            println!("    {day:<12}{count}");
        }
    }
    if let Some(chart) = &report.metrics_chart {
        println!("  Chart:    {}", chart.display());
    }
    println!();

    Ok(())
}

fn cmd_words(dir: &Path, top_n: usize, chart: Option<&Path>) -> Result<()> {
    info!(dir = %dir.display(), top_n, "ranking words");

    let tally = words::read_word_counts(dir)?;
    let ranked = words::rank_words(&tally);
    print!("{}", words::format_ranking(&ranked, top_n));

    if let Some(path) = chart {
        words::top_words_chart(path, &ranked, top_n)?;
        println!();
        println!("Chart saved to: {}", path.display());
    }
    Ok(())
}

fn cmd_stats(manuscript_path: &Path, chart: Option<&Path>) -> Result<()> {
    let manuscript = stats::load_manuscript(manuscript_path)?;
    let computed = stats::compute(&manuscript)?;
    print!("{}", stats::format_report(&computed));

    if let Some(path) = chart {
        storyplan_charts::word_count_dashboard(path, &stats::dashboard_data(&manuscript, &computed))?;
        println!();
        println!("Dashboard saved to: {}", path.display());
    }
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn chapter_written(&self, key: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Writing [{current}/{total}] Chapter {key}"));
    }

    fn done(&self, _report: &PlanReport) {
        self.spinner.finish_and_clear();
    }
}
