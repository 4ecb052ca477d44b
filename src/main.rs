use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use takeoff::auth::{self, AuthStorage};
use takeoff::banner::{BannerInfo, print_banner, print_session_summary};
use takeoff::config::Config;
use takeoff::consts::{DEFAULT_MODEL, MAX_PRICED_ITEMS, default_db_path};
use takeoff::estimate::{CostEstimate, EstimateConfig, Estimator};
use takeoff::extract::{self, DrawingAnalysis, DrawingImage};
use takeoff::provider::Provider;
use takeoff::provider::anthropic::AnthropicProvider;
use takeoff::report;
use takeoff::spinner::Spinner;

#[derive(Parser)]
#[command(
    name = "takeoff",
    version,
    about = "Material takeoff and cost estimates from interior drawings."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Model override for this run
    #[arg(long, global = true)]
    model: Option<String>,

    /// Database path (use :memory: for ephemeral)
    #[arg(long, global = true)]
    db: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Extract materials from a drawing image
    Analyze {
        /// Drawing image (png, jpg, webp, or gif)
        image: PathBuf,
        /// Write the analysis JSON here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Analyze a drawing, then price the extracted items
    Estimate {
        /// Drawing image (png, jpg, webp, or gif)
        image: PathBuf,
        /// Write the estimate JSON here
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Price at most this many items; the rest are dropped
        #[arg(long, default_value_t = MAX_PRICED_ITEMS)]
        max_items: usize,
    },
    /// Price the items of a previously saved analysis JSON
    Price {
        /// Analysis file written by `takeoff analyze -o`
        analysis: PathBuf,
        /// Write the estimate JSON here
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Price at most this many items; the rest are dropped
        #[arg(long, default_value_t = MAX_PRICED_ITEMS)]
        max_items: usize,
    },
    /// Validate an API key against the API and store it
    Login {
        /// The key; prompted for when omitted
        key: Option<String>,
    },
    /// Remove the stored API key
    Logout,
    /// Show or persist the default model
    Model {
        /// New default model; prints the current one when omitted
        model: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let db = cli
        .db
        .clone()
        .unwrap_or_else(|| default_db_path().to_string_lossy().into_owned());
    if db != ":memory:"
        && let Some(parent) = Path::new(&db).parent()
    {
        std::fs::create_dir_all(parent)?;
    }

    match cli.command {
        Command::Login { ref key } => handle_login(&db, key.clone()).await,
        Command::Logout => {
            auth::logout(&db)?;
            println!("✓ API key removed.");
            Ok(())
        }
        Command::Model { ref model } => handle_model(&db, model.as_deref()),
        Command::Analyze {
            ref image,
            ref output,
        } => {
            let provider = build_provider(&cli, &db)?;
            run_analysis(provider.as_ref(), image, output.as_deref()).await?;
            print_session_summary(provider.session_usage());
            Ok(())
        }
        Command::Estimate {
            ref image,
            ref output,
            max_items,
        } => {
            let provider = build_provider(&cli, &db)?;
            let analysis = run_analysis(provider.as_ref(), image, None).await?;
            run_pricing(
                Arc::clone(&provider),
                &analysis,
                max_items,
                output.as_deref(),
            )
            .await?;
            print_session_summary(provider.session_usage());
            Ok(())
        }
        Command::Price {
            ref analysis,
            ref output,
            max_items,
        } => {
            let provider = build_provider(&cli, &db)?;
            let json = std::fs::read_to_string(analysis)
                .with_context(|| format!("failed to read {}", analysis.display()))?;
            let analysis: DrawingAnalysis =
                serde_json::from_str(&json).context("not a takeoff analysis file")?;
            run_pricing(provider.clone(), &analysis, max_items, output.as_deref()).await?;
            print_session_summary(provider.session_usage());
            Ok(())
        }
    }
}

/// Resolve the model and credential, print the banner, build the provider.
fn build_provider(cli: &Cli, db: &str) -> anyhow::Result<Arc<dyn Provider>> {
    let config = Config::open(db)?;
    let model = match &cli.model {
        Some(model) => model.clone(),
        None => config.model()?.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
    };

    let storage = AuthStorage::open(db)?;
    let (api_key, auth_status) = match storage.get_api_key(auth::PROVIDER, auth::ENV_VAR)? {
        Some(key) => {
            let status = if storage.get(auth::PROVIDER)?.is_some() {
                "API key ✓"
            } else {
                "API key (env) ✓"
            };
            (key, status)
        }
        None => anyhow::bail!(
            "no API key found. Run `takeoff login` or set {}.",
            auth::ENV_VAR
        ),
    };

    print_banner(&BannerInfo {
        model: &model,
        auth_status,
        db,
    });

    Ok(Arc::new(AnthropicProvider::new(Some(model), api_key)))
}

async fn run_analysis(
    provider: &dyn Provider,
    image: &Path,
    output: Option<&Path>,
) -> anyhow::Result<DrawingAnalysis> {
    let image = DrawingImage::from_path(image)?;

    let spinner = Spinner::start("analyzing drawing");
    let result = extract::analyze(provider, &image).await;
    spinner.stop().await;
    let analysis = result?;

    report::print_analysis(&analysis);
    if let Some(path) = output {
        write_json(path, &analysis)?;
        println!("\nanalysis written to {}", path.display());
    }
    Ok(analysis)
}

async fn run_pricing(
    provider: Arc<dyn Provider>,
    analysis: &DrawingAnalysis,
    max_items: usize,
    output: Option<&Path>,
) -> anyhow::Result<CostEstimate> {
    println!("\nPricing items...");
    let estimator = Estimator::new(
        provider,
        EstimateConfig {
            max_items,
            ..EstimateConfig::default()
        },
    );
    let estimate = estimator.run(&analysis.items).await?;

    report::print_estimate(&estimate);
    if let Some(path) = output {
        write_json(path, &estimate)?;
        println!("\nestimate written to {}", path.display());
    }
    Ok(estimate)
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

async fn handle_login(db: &str, key: Option<String>) -> anyhow::Result<()> {
    let key = match key {
        Some(key) => key,
        None => {
            print!("Paste your Anthropic API key (sk-ant-...): ");
            io::stdout().flush()?;
            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            input.trim().to_string()
        }
    };

    // Reject malformed keys before any network traffic
    auth::validate_format(&key)?;

    let spinner = Spinner::start("validating API key");
    let result = auth::login(db, &key).await;
    spinner.stop().await;
    result?;

    println!("✓ API key validated and saved.");
    Ok(())
}

fn handle_model(db: &str, model: Option<&str>) -> anyhow::Result<()> {
    let config = Config::open(db)?;
    match model {
        Some(model) => {
            config.set_model(model)?;
            println!("✓ default model set to {model}");
        }
        None => {
            let current = config.model()?.unwrap_or_else(|| DEFAULT_MODEL.to_string());
            println!("{current}");
        }
    }
    Ok(())
}
