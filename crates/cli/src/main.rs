use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde::de::DeserializeOwned;

use stockwise_analytics::{
    AnalyticsEngine, AnalyticsJob, EngineConfig, ForecastInput, ForecastJob, OpportunityInput,
    OpportunityJob, PricingJob, PricingRequest, SimulationGrid,
};
use stockwise_core::{ProductSnapshot, SalesRecord};
use stockwise_observability::LogFormat;

/// Batch runner for the inventory analytics engine.
///
/// Reads JSON documents, prints JSON results on stdout. Logs go to stderr.
#[derive(Debug, Parser)]
#[command(name = "stockwise", version)]
struct Cli {
    /// Log output format: json or pretty. Defaults to json.
    #[arg(long, global = true, env = "STOCKWISE_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Engine configuration (JSON); omitted fields keep their defaults.
    #[arg(long, global = true, env = "STOCKWISE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct ForecastArgs {
    /// JSON array of sales records.
    #[arg(long)]
    sales: PathBuf,

    /// JSON array of product snapshots.
    #[arg(long)]
    products: PathBuf,

    /// Forecast window in days.
    #[arg(long, default_value_t = 30)]
    days: u32,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Demand forecasts, stockout risk and insights for the catalog.
    Forecast(ForecastArgs),

    /// Elasticity, optimal price and simulation curve for one product.
    Pricing {
        /// JSON pricing request.
        #[arg(long)]
        request: PathBuf,
    },

    /// Demand/revenue/margin curve for explicit figures.
    Simulate {
        #[arg(long)]
        price: f64,
        #[arg(long)]
        demand: u64,
        #[arg(long)]
        cost: f64,
        #[arg(long, allow_hyphen_values = true)]
        elasticity: f64,
        /// Use the -15%..+15% grid instead of the configured one.
        #[arg(long)]
        wide: bool,
    },

    /// Forecast plus pricing, ranked by opportunity score.
    Opportunities {
        #[command(flatten)]
        forecast: ForecastArgs,

        /// JSON array of pricing requests.
        #[arg(long)]
        requests: PathBuf,
    },
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let config = match path {
        Some(p) => read_json(p)?,
        None => EngineConfig::default(),
    };
    config.validate().context("invalid engine configuration")?;
    Ok(config)
}

fn forecast_input(args: &ForecastArgs) -> Result<ForecastInput> {
    let sales: Vec<SalesRecord> = read_json(&args.sales)?;
    let products: Vec<ProductSnapshot> = read_json(&args.products)?;
    Ok(ForecastInput { sales, products })
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Forecast(args) => {
            let input = forecast_input(&args)?;
            let report = ForecastJob::new(input)
                .with_forecast_days(args.days)
                .with_config(config)
                .run()?;
            print_json(&report)
        }
        Command::Pricing { request } => {
            let request: PricingRequest = read_json(&request)?;
            let analysis = PricingJob::new(request).with_config(config).run()?;
            print_json(&analysis)
        }
        Command::Simulate {
            price,
            demand,
            cost,
            elasticity,
            wide,
        } => {
            let mut config = config;
            if wide {
                config.pricing.grid = SimulationGrid::wide();
            }
            let engine = AnalyticsEngine::new(config)?;
            print_json(&engine.generate_price_simulations(price, demand, cost, elasticity))
        }
        Command::Opportunities { forecast, requests } => {
            let input = OpportunityInput {
                forecast: forecast_input(&forecast)?,
                requests: read_json(&requests)?,
            };
            let ranked = OpportunityJob::new(input)
                .with_forecast_days(forecast.days)
                .with_config(config)
                .run()?;
            print_json(&ranked)
        }
    }
}

fn init_logging(format: Option<LogFormat>) {
    match format {
        Some(format) => stockwise_observability::tracing::init(format, "info"),
        None => stockwise_observability::init(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    if let Err(err) = run(cli) {
        tracing::error!(error = %err, "stockwise command failed");
        return Err(err);
    }
    Ok(())
}
