use crate::{
    client::TikaClient,
    config::Config,
    fixtures,
    harness::Harness,
    util::ensure_dir,
};
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Options shared by both programs. Every flag is optional.
#[derive(clap::Args, Debug, Clone)]
pub struct Common {
    /// Path to config TOML. If omitted, uses ./tika-samples.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Parser, Debug)]
#[command(name = "tika-samples")]
#[command(about = "Generate deterministic sample documents for Tika testing")]
pub struct GenerateArgs {
    #[command(flatten)]
    pub common: Common,

    /// Directory to write the samples into (default: paths.samples_dir).
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(name = "tika-extract")]
#[command(about = "Send sample documents to a Tika server and save the results")]
pub struct ExtractArgs {
    #[command(flatten)]
    pub common: Common,

    /// Tika base URL; takes precedence over $TIKA_URL and the config file.
    #[arg(long)]
    pub url: Option<String>,

    /// Directory of samples to upload (default: paths.samples_dir).
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Directory for results (default: paths.out_dir).
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

pub fn generate(args: GenerateArgs) -> Result<()> {
    let cfg = Config::resolve(args.common.config.as_deref())?;
    // The samples dir is uploaded verbatim, so the log never goes there.
    let _guard = init_logging(&args.common, &cfg, None)?;

    let out_dir = args
        .out_dir
        .unwrap_or_else(|| PathBuf::from(&cfg.paths.samples_dir));
    let records = fixtures::generate_all(&cfg, &out_dir)?;

    info!("generated {} files in {}", records.len(), out_dir.display());
    println!("Done. Files in: {}", out_dir.display());
    Ok(())
}

pub fn extract(args: ExtractArgs) -> Result<()> {
    let mut cfg = Config::resolve(args.common.config.as_deref())?;
    cfg.apply_env();
    cfg.apply_url_override(args.url.as_deref());

    let input = args
        .input
        .unwrap_or_else(|| PathBuf::from(&cfg.paths.samples_dir));
    let out_dir = args
        .out_dir
        .unwrap_or_else(|| PathBuf::from(&cfg.paths.out_dir));
    let _guard = init_logging(&args.common, &cfg, Some(&out_dir))?;

    info!("tika={} input={} out={}", cfg.base_url(), input.display(), out_dir.display());

    let client = TikaClient::new(&cfg)?;
    let harness = Harness::new(&cfg, client);
    let report = harness.run(&input, &out_dir)?;

    if cfg.output.print_summary {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    let resolved = out_dir.canonicalize().unwrap_or(out_dir);
    println!("Done -> {}", resolved.display());
    Ok(())
}

fn init_logging(
    common: &Common,
    cfg: &Config,
    out_dir: Option<&Path>,
) -> Result<Option<WorkerGuard>> {
    let level = common
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let file_path = resolve_log_path(cfg, out_dir);
    let (file_layer, guard) = if let Some(path) = file_path.as_deref() {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

/// `logging.file_path` when set, otherwise `tika-samples.log` in `out_dir`
/// (falling back to `paths.out_dir`).
pub fn resolve_log_path(cfg: &Config, out_dir: Option<&Path>) -> Option<PathBuf> {
    if !cfg.logging.write_to_file {
        return None;
    }

    if !cfg.logging.file_path.is_empty() {
        return Some(PathBuf::from(&cfg.logging.file_path));
    }

    let base = out_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&cfg.paths.out_dir));
    Some(base.join("tika-samples.log"))
}
