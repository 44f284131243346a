use std::path::PathBuf;

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand};
use clipmask::{ClipMaskApplicator as _, MaskOpts};

#[derive(Parser, Debug)]
#[command(name = "clipmask", version)]
struct Cli {
    /// Log pipeline debug events to stderr.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply a luminance clip mask PNG to an image PNG.
    Apply(ApplyArgs),
    /// Print the compiled mask backend.
    Info,
}

#[derive(Parser, Debug)]
struct ApplyArgs {
    /// Input image.
    #[arg(long)]
    image: PathBuf,

    /// Mask image (same dimensions as the input).
    #[arg(long)]
    mask: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// JSON options file; flags below override its values.
    #[arg(long)]
    opts: Option<PathBuf>,

    /// Process row bands in parallel.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Rows per parallel band.
    #[arg(long)]
    rows_per_band: Option<usize>,

    /// Force the scalar backend.
    #[arg(long, default_value_t = false)]
    scalar: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Apply(args) => cmd_apply(args),
        Command::Info => cmd_info(),
    }
}

fn init_tracing(verbose: u8) {
    let level = if verbose == 0 {
        tracing::Level::WARN
    } else {
        tracing::Level::DEBUG
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_apply(args: ApplyArgs) -> anyhow::Result<()> {
    let mut opts = match &args.opts {
        Some(path) => MaskOpts::from_path(path)?,
        None => MaskOpts::default(),
    };
    opts.parallel |= args.parallel;
    opts.force_scalar |= args.scalar;
    if args.threads.is_some() {
        opts.threads = args.threads;
    }
    if let Some(rows) = args.rows_per_band {
        opts.rows_per_band = rows;
    }

    let mut image = image::open(&args.image)
        .with_context(|| format!("read image '{}'", args.image.display()))?
        .to_rgba8();
    let mask = image::open(&args.mask)
        .with_context(|| format!("read mask '{}'", args.mask.display()))?
        .to_rgba8();

    let stats = clipmask::apply_clip_mask(&mut image, &mask, &opts)?;
    tracing::info!(
        backend = stats.backend,
        lanes = stats.lanes,
        pixels = stats.pixels,
        vector_pixels = stats.vector_pixels,
        scalar_pixels = stats.scalar_pixels,
        bands = stats.bands,
        "mask applied"
    );

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_info() -> anyhow::Result<()> {
    let app = clipmask::default_applicator();
    println!("backend: {}", app.name());
    println!("lanes: {}", app.lanes());
    Ok(())
}
