//! CLI entry point for the season totals pipeline.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use courtside::{Pipeline, PipelineConfig, PipelineOutcome, init_logging};
use courtside_learning::{ComparisonConfig, Dataset, ModelComparator, split};
use courtside_processing::{
    CollectorConfig, ReportOutcome, SeasonCollector, build_report, load_dataset, plot_leaders, prepare,
};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Basketball season totals: scrape, compare regression models, chart and report",
    long_about = "Scrapes per-season player totals, predicts season points with several \
                  regression models, draws ranked leader charts and bundles them into a PDF.\n\n\
                  EXAMPLES:\n  \
                  # Collect 2020-2025 into ./data\n  \
                  courtside scrape\n\n  \
                  # Full pipeline on the combined file\n  \
                  courtside run\n\n  \
                  # Only model comparison charts in a separate PDF\n  \
                  courtside report --images data --output data/models.pdf --filter predicted_vs_actual"
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Defaults to `run` with default paths
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prepare, compare models, chart and report
    Run(RunArgs),

    /// Collect season totals pages into per-season and combined CSV files
    Scrape {
        /// First season (end year, e.g. 2020 for 2019-20)
        #[arg(long, default_value_t = 2020)]
        start: u16,

        /// Last season, inclusive
        #[arg(long, default_value_t = 2025)]
        end: u16,

        /// Output directory for CSV files
        #[arg(short, long, default_value = "data")]
        output: PathBuf,
    },

    /// Compare regression models on a combined totals file
    Train {
        #[arg(short, long, default_value = "data/nba_combined_totals_cleaned.csv")]
        data: PathBuf,

        /// Directory for model files, scatter plots and the summary CSV
        #[arg(short, long, default_value = "data")]
        output: PathBuf,
    },

    /// Draw the season leader charts for one season file
    Plot {
        #[arg(short, long, default_value = "data/nba_2025_totals_cleaned.csv")]
        data: PathBuf,

        #[arg(short, long, default_value = "data")]
        output: PathBuf,
    },

    /// Concatenate PNG images into a PDF, one per page
    Report {
        #[arg(short, long, default_value = "data/plots")]
        images: PathBuf,

        #[arg(short, long, default_value = "data/nba_pipeline_report.pdf")]
        output: PathBuf,

        /// Only include images whose file name contains this text
        #[arg(short, long)]
        filter: Option<String>,
    },
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    /// JSON pipeline configuration; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Combined totals CSV
    #[arg(long)]
    data: Option<PathBuf>,

    /// Directory for ranked charts
    #[arg(long)]
    plots: Option<PathBuf>,

    /// Output PDF
    #[arg(long)]
    report: Option<PathBuf>,

    /// Directory for model artifacts and summaries
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Run(RunArgs::default())) {
        Command::Run(args) => run(&cli.log_level, args),
        Command::Scrape { start, end, output } => {
            let _guard = init_logging(&cli.log_level, None)?;
            scrape(start, end, output)
        }
        Command::Train { data, output } => {
            let _guard = init_logging(&cli.log_level, None)?;
            train(data, output)
        }
        Command::Plot { data, output } => {
            let _guard = init_logging(&cli.log_level, None)?;
            let df = load_dataset(&data).with_context(|| format!("Loading {}", data.display()))?;
            let charts = plot_leaders(&df, &output)?;
            info!("{} charts saved to {}", charts.len(), output.display());
            Ok(())
        }
        Command::Report {
            images,
            output,
            filter,
        } => {
            let _guard = init_logging(&cli.log_level, None)?;
            match build_report(&images, &output, filter.as_deref())? {
                ReportOutcome::Written { path, pages } => {
                    info!("Report with {} pages written to {}", pages.len(), path.display())
                }
                ReportOutcome::Skipped { image_dir } => {
                    warn!("No report written; no images in {}", image_dir.display())
                }
            }
            Ok(())
        }
    }
}

fn run(log_level: &str, args: RunArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(data) = args.data {
        config.data_file = data;
    }
    if let Some(plots) = args.plots {
        config.plots_dir = plots;
    }
    if let Some(report) = args.report {
        config.report_path = report;
    }
    if let Some(output) = args.output {
        config.output_dir = output;
    }

    let _guard = init_logging(log_level, config.log_file.as_deref())
        .context("Failed to open the log file")?;

    let pipeline = Pipeline::builder()
        .config(config)
        .on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        })
        .build()?;

    match pipeline.run()? {
        PipelineOutcome::Completed(summary) => {
            if let Some(best) = &summary.best_model {
                info!("Best model by RMSE: {}", best);
            }
            info!("Report: {} pages", summary.report.page_count());
        }
        PipelineOutcome::Aborted { .. } => {}
    }
    Ok(())
}

fn scrape(start: u16, end: u16, output: PathBuf) -> Result<()> {
    let config = CollectorConfig::builder().output_dir(output).build()?;
    let summary = SeasonCollector::http(config)?.collect_range(start, end)?;

    info!("Collected seasons: {:?}", summary.seasons());
    for skipped in &summary.skipped {
        warn!("Season {} skipped: {}", skipped.season, skipped.reason);
    }
    match &summary.combined_path {
        Some(path) => info!("{} rows combined into {}", summary.combined_rows, path.display()),
        None => warn!("No season collected; combined file not written"),
    }
    Ok(())
}

fn train(data_file: PathBuf, output: PathBuf) -> Result<()> {
    let df = load_dataset(&data_file).with_context(|| format!("Loading {}", data_file.display()))?;
    let prepared = prepare(&df)?;

    let config = ComparisonConfig::builder().output_dir(output).build()?;
    let dataset = Dataset::from_frame(&prepared.features, &prepared.target)?;
    let data = split(&dataset, config.test_size, config.random_seed)?;

    let table = ModelComparator::builder().config(config).build()?.compare(&data)?;
    info!("Model comparison:\n{}", table);
    Ok(())
}
