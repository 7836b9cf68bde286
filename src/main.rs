use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use trend_stats::analysis::{self, categories, overlap, ratios, restrictions};
use trend_stats::cache;
use trend_stats::config::{DEFAULT_CATEGORY_CACHE, DEFAULT_PLACEHOLDER_CATEGORY, DEFAULT_VIDEO_CACHE};
use trend_stats::export;
use trend_stats::{AnalysisConfig, CategoryMissPolicy, VideoTable};

#[derive(Parser)]
#[command(name = "trend-stats")]
#[command(about = "Analyze cached YouTube trending videos across countries", long_about = None)]
struct Cli {
    /// Video cache JSON (one bundle per country)
    #[arg(long, global = true, default_value = DEFAULT_VIDEO_CACHE)]
    videos: PathBuf,

    /// Category lookup JSON
    #[arg(long, global = true, default_value = DEFAULT_CATEGORY_CACHE)]
    categories: PathBuf,

    /// Load a previously exported video_df.csv instead of the caches
    #[arg(long, global = true)]
    table: Option<PathBuf>,

    /// Directory for the exported table and the charts
    #[arg(short, long, global = true, default_value = ".")]
    output_dir: PathBuf,

    /// Do not write video_df.csv
    #[arg(long, global = true)]
    no_export: bool,

    /// What to do with a video whose category id is unknown
    #[arg(long, global = true, value_enum, default_value_t = MissPolicyArg::Abort)]
    on_missing_category: MissPolicyArg,

    /// Category label used with `--on-missing-category placeholder`
    #[arg(long, global = true, default_value = DEFAULT_PLACEHOLDER_CATEGORY)]
    placeholder_category: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum MissPolicyArg {
    Abort,
    Skip,
    Placeholder,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize the caches and export the flat table only
    Export,

    /// Print row counts per country and region
    Info,

    /// Rate of shared videos between every pair of countries
    Overlap,

    /// Category distributions and the chi-squared test between regions
    Categories,

    /// Regional restriction counts per video and per country
    Restrictions,

    /// Ratio densities, summary statistics and mean ratios
    Ratios,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = build_config(&cli);

    let (table, from_caches) = match &cli.table {
        Some(path) => {
            let table = export::read_table_csv(path)
                .with_context(|| format!("Failed to read table {}", path.display()))?;
            (table, false)
        }
        None => (load_table(&config)?, true),
    };

    if from_caches && config.export_csv {
        let path = config.table_export_path();
        export::write_table_csv(&table, &path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Wrote {} rows to {}", table.len(), path.display());
    }

    match cli.command {
        Commands::Export => {
            if !from_caches || !config.export_csv {
                println!("Nothing exported");
            }
        }
        Commands::Info => {
            println!("{}", analysis::format_overview(&table));
        }
        Commands::Overlap => {
            overlap::run(&table, &config).context("Failed to compute same-video rates")?;
        }
        Commands::Categories => {
            categories::run(&table, &config).context("Failed to analyze categories")?;
        }
        Commands::Restrictions => {
            restrictions::run(&table, &config).context("Failed to analyze restrictions")?;
        }
        Commands::Ratios => {
            ratios::run(&table, &config).context("Failed to analyze ratios")?;
        }
    }

    Ok(())
}

fn build_config(cli: &Cli) -> AnalysisConfig {
    let policy = match cli.on_missing_category {
        MissPolicyArg::Abort => CategoryMissPolicy::Abort,
        MissPolicyArg::Skip => CategoryMissPolicy::Skip,
        MissPolicyArg::Placeholder => CategoryMissPolicy::Placeholder(cli.placeholder_category.clone()),
    };
    AnalysisConfig {
        video_cache_path: cli.videos.clone(),
        category_path: cli.categories.clone(),
        export_csv: !cli.no_export,
        ..AnalysisConfig::default()
    }
    .with_output_dir(&cli.output_dir)
    .with_miss_policy(policy)
}

fn load_table(config: &AnalysisConfig) -> Result<VideoTable> {
    let videos = cache::load_video_cache(&config.video_cache_path);
    let lookup = cache::load_category_lookup(&config.category_path);

    let (table, summary) = trend_stats::normalize(&videos, &lookup, config).context("Failed to normalize video cache")?;
    log::info!(
        "Normalized {} bundles into {} rows ({} skipped, {} without dislike/like, {} without like/view)",
        summary.bundles,
        summary.rows,
        summary.skipped,
        summary.missing_dislike_like,
        summary.missing_like_view
    );
    Ok(table)
}
