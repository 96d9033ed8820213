use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use chess4d_render::{
    FileSink, GameSnapshot, ImageSink, LayoutPlanner, RenderOpts, Renderer, SpriteAtlas,
    SpriteTable, export_png,
};

/// Env var consulted when `--sprites` is not given.
const SPRITE_DIR_ENV: &str = "CHESS4D_SPRITE_DIR";

#[derive(Parser, Debug)]
#[command(name = "chess4d-render", version)]
struct Cli {
    /// Log at DEBUG instead of INFO.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one snapshot as a PNG.
    Render(RenderArgs),
    /// Render several snapshots in parallel.
    Batch(BatchArgs),
    /// Print the planned layout as JSON.
    Layout(LayoutArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Sprite root directory (defaults to $CHESS4D_SPRITE_DIR).
    #[arg(long)]
    sprites: Option<PathBuf>,

    /// Sprite table JSON; the built-in table is used when absent.
    #[arg(long)]
    sprite_table: Option<PathBuf>,

    /// Render options JSON (geometry, palette, absent board policy).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input snapshot JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path, or a directory to write "4D Chess Image.png" into.
    #[arg(long)]
    out: PathBuf,

    /// Fail instead of replacing an existing output file.
    #[arg(long, default_value_t = false)]
    no_overwrite: bool,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Input snapshot JSON files.
    #[arg(long = "in", num_args = 1.., required = true)]
    in_paths: Vec<PathBuf>,

    /// Directory receiving one `<input stem>.png` per input; repeated stems get `-1`, `-2`, ...
    #[arg(long)]
    out_dir: PathBuf,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Input snapshot JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Render options JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Batch(args) => cmd_batch(args),
        Command::Layout(args) => cmd_layout(args),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let renderer = build_renderer(&args.common)?;
    let snapshot = GameSnapshot::from_path(&args.in_path)?;
    let image = renderer.render_png(&snapshot)?;

    let sink = if args.out.is_dir() || names_dir(&args.out) {
        FileSink::into_dir(&args.out)
    } else {
        FileSink::to_file(&args.out)
    };
    let mut sink = sink.overwrite(!args.no_overwrite);
    let written = sink.write_image(&image)?;

    if let Some(path) = written {
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

fn cmd_batch(args: BatchArgs) -> anyhow::Result<()> {
    let renderer = build_renderer(&args.common)?;
    let snapshots = args
        .in_paths
        .iter()
        .map(|p| {
            GameSnapshot::from_path(p).with_context(|| format!("load snapshot '{}'", p.display()))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let results = renderer.render_batch(&snapshots, args.threads)?;

    let names = output_names(&args.in_paths);
    let mut failed = 0usize;
    for ((in_path, name), result) in args.in_paths.iter().zip(&names).zip(results) {
        let out = args.out_dir.join(name);
        let outcome = result
            .and_then(|frame| export_png(&frame))
            .and_then(|image| FileSink::to_file(&out).write_image(&image));
        match outcome {
            Ok(_) => eprintln!("wrote {}", out.display()),
            Err(e) => {
                tracing::error!(input = %in_path.display(), error = %e, "render failed");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} snapshots failed", args.in_paths.len());
    }
    Ok(())
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let opts = load_opts(args.config.as_deref())?;
    let snapshot = GameSnapshot::from_path(&args.in_path)?;
    let layout = LayoutPlanner::new(opts.geometry).plan(&snapshot)?;
    let json = serde_json::to_string_pretty(&layout).context("serialize layout")?;
    println!("{json}");
    Ok(())
}

fn build_renderer(common: &CommonArgs) -> anyhow::Result<Renderer> {
    let opts = load_opts(common.config.as_deref())?;
    let table = match &common.sprite_table {
        Some(path) => SpriteTable::from_path(path)?,
        None => SpriteTable::default(),
    };

    let root = common
        .sprites
        .clone()
        .or_else(|| std::env::var_os(SPRITE_DIR_ENV).map(PathBuf::from));
    let atlas = match root {
        Some(root) => SpriteAtlas::prepare(&table, &root, opts.geometry.cell_px)?,
        None => {
            tracing::warn!(
                "no sprite root given (--sprites or ${SPRITE_DIR_ENV}); pieces will not be drawn"
            );
            SpriteAtlas::empty()
        }
    };

    Ok(Renderer::new(opts, Arc::new(atlas))?)
}

fn load_opts(path: Option<&Path>) -> anyhow::Result<RenderOpts> {
    match path {
        Some(path) => Ok(RenderOpts::from_path(path)?),
        None => Ok(RenderOpts::default()),
    }
}

/// `<stem>.png` per input; repeated stems get `-1`, `-2`, ... so no output is written twice.
fn output_names(in_paths: &[PathBuf]) -> Vec<String> {
    let mut taken = HashSet::new();
    in_paths
        .iter()
        .map(|p| {
            let stem = p
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "snapshot".to_owned());
            let mut name = format!("{stem}.png");
            let mut n = 1;
            while !taken.insert(name.clone()) {
                name = format!("{stem}-{n}.png");
                n += 1;
            }
            name
        })
        .collect()
}

/// `--out` values ending in a separator name a directory, existing or not.
fn names_dir(path: &Path) -> bool {
    path.as_os_str()
        .to_string_lossy()
        .ends_with(['/', std::path::MAIN_SEPARATOR])
}
