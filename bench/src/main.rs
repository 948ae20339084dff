//! Latency benchmark for the four vision endpoints.
//!
//! ```bash
//! vision-bench --images garment_list.txt
//! vision-bench --images garment_list.txt --modality classify --labels jacket,coat,shirt
//! ```

mod images;
mod stats;
mod transport;

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use images::{ImageFile, ensure_files_exist, read_image_list};
use shared::{
    CreditsRefresher, DemoController, DemoError, IntoEnumIterator, LabelSet, Modality,
    VisionConfig, submit,
};
use stats::Timings;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use transport::ReqwestTransport;

const PROGRESS_EVERY: usize = 50;

#[derive(Parser, Debug)]
#[command(name = "vision-bench")]
#[command(author, version, about = "Measure the latency of the vision APIs", long_about = None)]
struct Cli {
    /// File listing one image path per line
    #[arg(long)]
    images: PathBuf,

    /// Endpoint(s) to benchmark
    #[arg(long, value_enum, default_value_t = Target::All)]
    modality: Target,

    /// Base URL of the vision API
    #[arg(long, env = "VISION_API_URL")]
    api_url: Option<String>,

    /// Bearer token sent with every call
    #[arg(long, env = "VISION_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// YAML configuration file (same format as the frontend's vision.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Text query for search
    #[arg(long, default_value = "jacket")]
    text: String,

    /// Comma separated labels for classification
    #[arg(long, default_value = "jacket,coat,shirt")]
    labels: String,

    /// Text weighting for search, 0 (image only) to 100 (text only)
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u8).range(0..=100))]
    alpha: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Target {
    All,
    Search,
    Segment,
    Classify,
    Detect,
}

impl Target {
    fn modalities(self) -> Vec<Modality> {
        match self {
            Target::All => Modality::iter().collect(),
            Target::Search => vec![Modality::Search],
            Target::Segment => vec![Modality::Segment],
            Target::Classify => vec![Modality::Classify],
            Target::Detect => vec![Modality::Detect],
        }
    }
}

/// The bench has no session, so there is nothing to refresh.
struct NoCredits;

impl CreditsRefresher for NoCredits {
    fn refresh(&self, _user_id: &str) {}
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let paths = read_image_list(&cli.images)?;
    if paths.is_empty() {
        bail!("{} lists no image", cli.images.display());
    }
    ensure_files_exist(&paths)?;
    println!("Benchmark over {} image(s) against {}\n", paths.len(), config.api_base_url);

    let transport = ReqwestTransport::default();
    for modality in cli.modality.modalities() {
        let timings = bench_modality(modality, &cli, &config, &transport, &paths).await?;
        println!("\n{}: {}", modality.title(), timings);
    }
    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<VisionConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            VisionConfig::from_yaml_str(&source)?
        }
        None => VisionConfig::default(),
    };
    if let Some(url) = &cli.api_url {
        config.api_base_url = url.clone();
    }
    config.validate()?;
    Ok(config)
}

/// Runs every image through one endpoint, reading each file right before
/// its call. Stops at the first failed call; an exhausted quota aborts the
/// whole run.
async fn bench_modality(
    modality: Modality,
    cli: &Cli,
    config: &VisionConfig,
    transport: &ReqwestTransport,
    paths: &[PathBuf],
) -> anyhow::Result<Timings> {
    let mut controller = DemoController::new(modality);
    match modality {
        Modality::Search => {
            controller.set_text(cli.text.as_str());
            controller.set_weighting(cli.alpha);
        }
        Modality::Classify => {
            controller.replace_labels(cli.labels.split(',').collect::<LabelSet>());
        }
        Modality::Segment | Modality::Detect => {}
    }

    let mut timings = Timings::default();
    for (i, path) in paths.iter().enumerate() {
        let image = match ImageFile::load(path) {
            Ok(image) => image,
            Err(e) => {
                println!("\nError on {}: {:#}", path.display(), e);
                break;
            }
        };
        let name = image.name.clone();
        controller.select_image(image);

        let start = Instant::now();
        let outcome = submit(
            &mut controller,
            config,
            &cli.token,
            transport,
            None,
            &NoCredits,
        )
        .await;
        let elapsed = start.elapsed();

        match outcome {
            Ok(_) => timings.record(elapsed),
            Err(DemoError::QuotaExceeded) => bail!(DemoError::QuotaExceeded.user_message()),
            Err(e) => {
                println!("\nError on {}: {}", name, e);
                log::error!("{} benchmark stopped after {} call(s)", modality, timings.len());
                break;
            }
        }

        if (i + 1) % PROGRESS_EVERY == 0 {
            print!(".");
            std::io::stdout().flush().ok();
        }
    }
    Ok(timings)
}
