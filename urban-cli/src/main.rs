use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use sha2::Digest as _;

#[derive(Parser, Debug)]
#[command(name = "urban", version)]
struct Cli {
    /// Log pipeline diagnostics to stderr.
    #[arg(long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Overlay a caption on one photo and write a JPEG.
    Render(RenderArgs),
    /// Render every job of a JSON manifest in parallel.
    Batch(BatchArgs),
    /// Print the font catalog as JSON.
    Fonts(FontsArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input photo (JPEG, PNG or WebP).
    #[arg(long)]
    image: PathBuf,

    /// Caption text; `\n` sequences start a new paragraph.
    #[arg(long)]
    text: String,

    /// Font catalog key.
    #[arg(long)]
    font: Option<String>,

    /// Main text size in pixels (skips the size policy).
    #[arg(long)]
    font_size: Option<u32>,

    /// Peak alpha (0-255) of the darkening gradient.
    #[arg(long)]
    overlay_opacity: Option<u8>,

    /// Engine configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output JPEG path.
    #[arg(long)]
    out: PathBuf,

    /// Print the render report as JSON on stdout.
    #[arg(long, default_value_t = false)]
    report: bool,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// JSON list of jobs; relative paths resolve against the manifest's directory.
    #[arg(long)]
    manifest: PathBuf,

    /// Engine configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct FontsArgs {
    /// Engine configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(serde::Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct BatchJob {
    image: PathBuf,
    text: String,
    #[serde(default)]
    font: Option<String>,
    #[serde(default)]
    font_size: Option<u32>,
    #[serde(default)]
    overlay_opacity: Option<u8>,
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Batch(args) => cmd_batch(args),
        Command::Fonts(args) => cmd_fonts(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<urban::EngineConfig> {
    Ok(match path {
        Some(p) => urban::EngineConfig::from_path(p)?,
        None => urban::EngineConfig::default().with_env_overrides(),
    })
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let engine = urban::OverlayEngine::new(load_config(args.config.as_deref())?)?;
    let image = std::fs::read(&args.image)
        .with_context(|| format!("read image '{}'", args.image.display()))?;

    let request = urban::RenderRequest {
        image,
        text: args.text.replace("\\n", "\n"),
        font: args.font,
        font_size: args.font_size,
        overlay_opacity: args.overlay_opacity,
    };
    let output = engine.render_with_report(&request)?;
    write_output(&args.out, &output.bytes)?;

    if args.report {
        println!("{}", serde_json::to_string_pretty(&output.report)?);
    }
    Ok(())
}

fn cmd_batch(args: BatchArgs) -> anyhow::Result<()> {
    let engine = urban::OverlayEngine::new(load_config(args.config.as_deref())?)?;
    let manifest = std::fs::read(&args.manifest)
        .with_context(|| format!("read manifest '{}'", args.manifest.display()))?;
    let jobs: Vec<BatchJob> = serde_json::from_slice(&manifest)
        .with_context(|| format!("parse manifest '{}'", args.manifest.display()))?;
    let root = args
        .manifest
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    let pool = build_thread_pool(args.threads)?;
    let results: Vec<anyhow::Result<()>> = pool.install(|| {
        jobs.par_iter()
            .map(|job| run_job(&engine, &root, job))
            .collect()
    });

    let mut failed = 0usize;
    for (job, result) in jobs.iter().zip(results) {
        if let Err(e) = result {
            failed += 1;
            eprintln!("failed {}: {e:#}", job.out.display());
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} of {} jobs failed", jobs.len());
    }
    Ok(())
}

fn run_job(engine: &urban::OverlayEngine, root: &Path, job: &BatchJob) -> anyhow::Result<()> {
    let image_path = root.join(&job.image);
    let image = std::fs::read(&image_path)
        .with_context(|| format!("read image '{}'", image_path.display()))?;
    let request = urban::RenderRequest {
        image,
        text: job.text.clone(),
        font: job.font.clone(),
        font_size: job.font_size,
        overlay_opacity: job.overlay_opacity,
    };
    let bytes = engine.render(&request)?;
    write_output(&root.join(&job.out), &bytes)
}

fn cmd_fonts(args: FontsArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    println!(
        "{}",
        serde_json::to_string_pretty(&config.fonts.describe_all())?
    );
    Ok(())
}

fn write_output(out: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(out, bytes).with_context(|| format!("write jpeg '{}'", out.display()))?;
    eprintln!("wrote {} sha256={}", out.display(), sha256_hex(bytes));
    Ok(())
}

fn build_thread_pool(threads: Option<usize>) -> anyhow::Result<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        anyhow::bail!("--threads must be >= 1 when set");
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder.build().context("build rayon thread pool")
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
