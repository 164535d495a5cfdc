use clap::Parser;
use histmatch::io::load_pixels;
use histmatch::{
    build_histogram, AxisBins, DirectoryCatalog, DistanceMetric, RankedMatch, RescalePolicy,
    RetrievalConfig, RetrievalMode, Retriever,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "histmatch CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output (skipped entries, scan statistics).
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ModeConfig {
    Intersection,
    Incremental,
}

impl From<ModeConfig> for RetrievalMode {
    fn from(value: ModeConfig) -> Self {
        match value {
            ModeConfig::Intersection => RetrievalMode::Intersection,
            ModeConfig::Incremental => RetrievalMode::Incremental,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum MetricConfig {
    Euclidean,
    Jaccard,
}

impl From<MetricConfig> for DistanceMetric {
    fn from(value: MetricConfig) -> Self {
        match value {
            MetricConfig::Euclidean => DistanceMetric::Euclidean,
            MetricConfig::Jaccard => DistanceMetric::Jaccard,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum RescaleConfig {
    Legacy,
    Proportional,
}

impl From<RescaleConfig> for RescalePolicy {
    fn from(value: RescaleConfig) -> Self {
        match value {
            RescaleConfig::Legacy => RescalePolicy::Legacy,
            RescaleConfig::Proportional => RescalePolicy::Proportional,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct AxisBinsJson {
    rg: usize,
    by: usize,
    wb: usize,
}

impl Default for AxisBinsJson {
    fn default() -> Self {
        let bins = AxisBins::default();
        Self {
            rg: bins.rg,
            by: bins.by,
            wb: bins.wb,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RetrievalConfigJson {
    depth: usize,
    mode: ModeConfig,
    metric: MetricConfig,
    grey: bool,
    rescale: RescaleConfig,
    parallel: bool,
    deadline_ms: Option<u64>,
    axis_bins: AxisBinsJson,
}

impl Default for RetrievalConfigJson {
    fn default() -> Self {
        let cfg = RetrievalConfig::default();
        Self {
            depth: cfg.depth,
            mode: ModeConfig::Intersection,
            metric: MetricConfig::Euclidean,
            grey: cfg.grey,
            rescale: RescaleConfig::Legacy,
            parallel: cfg.parallel,
            deadline_ms: None,
            axis_bins: AxisBinsJson::default(),
        }
    }
}

impl From<RetrievalConfigJson> for RetrievalConfig {
    fn from(value: RetrievalConfigJson) -> Self {
        Self {
            depth: value.depth,
            mode: value.mode.into(),
            metric: value.metric.into(),
            grey: value.grey,
            axis_bins: AxisBins {
                rg: value.axis_bins.rg,
                by: value.axis_bins.by,
                wb: value.axis_bins.wb,
            },
            rescale: value.rescale.into(),
            parallel: value.parallel,
            deadline: value.deadline_ms.map(Duration::from_millis),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    image_path: String,
    database_path: String,
    explore_depth: usize,
    bins: usize,
    output_path: Option<String>,
    save_dir: Option<String>,
    add_query: bool,
    retrieval: RetrievalConfigJson,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_path: String::new(),
            database_path: String::new(),
            explore_depth: 5,
            bins: 255,
            output_path: None,
            save_dir: None,
            add_query: true,
            retrieval: RetrievalConfigJson::default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct MatchRecord {
    score: f64,
    path: String,
}

impl From<RankedMatch> for MatchRecord {
    fn from(value: RankedMatch) -> Self {
        Self {
            score: value.score,
            path: value.id,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    best: Option<MatchRecord>,
    matches: Vec<MatchRecord>,
    scanned: usize,
    skipped: usize,
    timed_out: bool,
}

fn save_matches(dir: &Path, matches: &[MatchRecord]) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(dir)?;
    for record in matches {
        let src = Path::new(&record.path);
        let Some(name) = src.file_name() else {
            continue;
        };
        fs::copy(src, dir.join(name))?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("histmatch=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.image_path.is_empty() || config.database_path.is_empty() {
        return Err("image_path and database_path must be set in the config".into());
    }
    if config.retrieval.depth == 0 {
        return Err("retrieval.depth must be at least 1".into());
    }

    let retrieval: RetrievalConfig = config.retrieval.into();
    let pixels = load_pixels(&config.image_path)?;
    let query = build_histogram(pixels, config.bins, retrieval.grey)?;

    let mut catalog = DirectoryCatalog::open(&config.database_path, config.explore_depth, config.bins)?
        .with_axis_bins(retrieval.axis_bins);
    tracing::info!(references = catalog.paths().len(), "catalog opened");

    let retriever = Retriever::new().with_config(retrieval);
    let result = retriever.search(&catalog, &query)?;

    let matches: Vec<MatchRecord> = result.matches.into_iter().map(MatchRecord::from).collect();
    if let Some(dir) = &config.save_dir {
        save_matches(Path::new(dir), &matches)?;
    }
    if config.add_query {
        let added = catalog.add(&config.image_path)?;
        tracing::info!(path = %added.display(), "query added to catalog");
    }

    let best = matches.first().map(|m| MatchRecord {
        score: m.score,
        path: m.path.clone(),
    });
    let output = Output {
        best,
        matches,
        scanned: result.scanned,
        skipped: result.skipped,
        timed_out: result.timed_out,
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
