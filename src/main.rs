use bildfix::imaging::{
    CropRect, Dimensions, ExportFormat, ImageBackend, Quality, RustBackend, estimate_size,
    plan_export, render_preview,
};
use bildfix::session::{Selection, Session, SourceImage};
use bildfix::{batch, catalog, config, output};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Shared flags for commands that place a crop.
#[derive(clap::Args, Clone)]
struct CropSelection {
    /// Aspect preset key (see `bildfix presets`)
    #[arg(long, conflicts_with_all = ["width", "height"])]
    aspect: Option<String>,

    /// Custom output width in pixels
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Custom output height in pixels
    #[arg(long, requires = "width")]
    height: Option<u32>,

    /// Crop rectangle in displayed-space pixels, as X,Y,WxH
    #[arg(long, requires = "displayed", value_parser = parse_rect)]
    rect: Option<CropRect>,

    /// Displayed size the rectangle was dragged against, as WxH
    #[arg(long, requires = "rect", value_parser = parse_size)]
    displayed: Option<Dimensions>,
}

#[derive(Parser)]
#[command(name = "bildfix")]
#[command(about = "Crop and resize images for fixed output sizes")]
#[command(long_about = "\
Crop and resize images for fixed output sizes

Pick an aspect preset (or custom dimensions), position the crop, export as
JPEG, PNG, or WebP. With no crop rectangle given, the crop is centered and
as large as the source allows.

Examples:

  bildfix presets
  bildfix info photo.jpg --aspect 1:1
  bildfix crop photo.jpg --aspect 16:9 --format webp --quality 85
  bildfix crop shots/ --width 970 --height 400 --out banners
  bildfix crop photo.jpg --rect 100,50,200x150 --displayed 800x600
  bildfix preview photo.jpg --aspect 9:16 --out preview.png

Run 'bildfix gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the aspect preset catalog
    Presets,
    /// Show an image's natural size and the crop a selection would place
    Info {
        image: PathBuf,
        #[command(flatten)]
        selection: CropSelection,
    },
    /// Crop and export images
    Crop(CropArgs),
    /// Render a bounded PNG preview of the crop
    Preview {
        image: PathBuf,
        #[command(flatten)]
        selection: CropSelection,
        /// Longest preview edge in pixels (default from config)
        #[arg(long)]
        max_edge: Option<u32>,
        /// Output file
        #[arg(long, default_value = "preview.png")]
        out: PathBuf,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct CropArgs {
    /// Image files or directories to process
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    #[command(flatten)]
    selection: CropSelection,

    /// Output format: jpeg, png, or webp (default from config)
    #[arg(long)]
    format: Option<ExportFormat>,

    /// Lossy quality 10-100, ignored for png (default from config)
    #[arg(long)]
    quality: Option<u32>,

    /// Output directory
    #[arg(long, default_value = "out")]
    out: PathBuf,

    /// Use each source file's name as the export filename prefix
    #[arg(long)]
    original_name: bool,

    /// Print estimated encoded sizes instead of exporting
    #[arg(long)]
    estimate: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = config::ToolConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Command::Presets => output::print_presets(),
        Command::Info { image, selection } => {
            let backend = RustBackend::new();
            let (session, label) = build_session(&backend, &image, &selection, &config)?;
            let crop = session.crop().ok_or("no crop computed")?;
            output::print_info(
                &image,
                session.image().ok_or("no image loaded")?.dimensions(),
                &label,
                crop,
                session.export_dimensions()?,
            );
        }
        Command::Crop(args) => run_crop(args, &config)?,
        Command::Preview {
            image,
            selection,
            max_edge,
            out,
        } => {
            let backend = RustBackend::new();
            let (session, _) = build_session(&backend, &image, &selection, &config)?;
            let crop = session.crop().ok_or("no crop computed")?;
            let dims = render_preview(
                &backend,
                &image,
                &out,
                crop,
                max_edge.unwrap_or(config.preview.max_edge),
            )?;
            println!("Preview \u{2192} {} ({})", out.display(), dims);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn run_crop(args: CropArgs, config: &config::ToolConfig) -> Result<(), Box<dyn std::error::Error>> {
    let selection = resolve_selection(&args.selection, config)?;
    let format = args.format.unwrap_or(config.export.format);
    let quality = Quality::new(args.quality.unwrap_or(config.export.quality));
    let inputs = batch::collect_inputs(&args.inputs)?;
    let backend = RustBackend::new();

    if args.estimate {
        // Advisory path: plan each export and report encoder output sizes
        // without writing anything.
        for source in &inputs {
            let mut session = session_for(&backend, source, &selection)?;
            apply_drag(&mut session, &args.selection)?;
            let crop = session.crop().ok_or("no crop computed")?;
            let target = session.export_dimensions()?;
            let params = plan_export(source, source, crop, Some(target), format, quality);
            match estimate_size(&backend, &params) {
                Ok(bytes) => {
                    println!("{}: {}", source.display(), output::format_estimate(bytes))
                }
                Err(e) => println!("{}: estimate failed: {}", source.display(), e),
            }
        }
        return Ok(());
    }

    init_thread_pool(&config.processing);

    let options = batch::BatchOptions {
        selection,
        format,
        quality,
        out_dir: args.out,
        prefix: config.naming.prefix.clone(),
        use_original_name: args.original_name || config.naming.use_original_name,
        drag: drag_from(&args.selection),
    };

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            println!("{}", output::format_batch_event(&event));
        }
    });
    let summary = batch::run(&backend, &inputs, &options, Some(tx))?;
    printer.join().unwrap();
    println!("{}", output::format_batch_summary(&summary));

    if summary.failed > 0 {
        return Err(format!("{} file(s) failed", summary.failed).into());
    }
    Ok(())
}

/// Resolve the aspect selection from CLI flags, falling back to the
/// configured default preset.
fn resolve_selection(
    args: &CropSelection,
    config: &config::ToolConfig,
) -> Result<Selection, Box<dyn std::error::Error>> {
    if let (Some(width), Some(height)) = (args.width, args.height) {
        return Ok(Selection::Custom { width, height });
    }
    let key = args.aspect.as_deref().unwrap_or(&config.default_preset);
    let preset = catalog::find_preset(key)
        .ok_or_else(|| format!("unknown aspect preset '{key}' (see `bildfix presets`)"))?;
    Ok(Selection::Preset(*preset))
}

fn drag_from(args: &CropSelection) -> Option<(CropRect, Dimensions)> {
    Some((args.rect?, args.displayed?))
}

/// Build a session for one image: identify its natural size, apply the
/// selection, compute the crop. Returns the session and a display label
/// for the selection.
fn build_session(
    backend: &impl ImageBackend,
    image: &std::path::Path,
    args: &CropSelection,
    config: &config::ToolConfig,
) -> Result<(Session, String), Box<dyn std::error::Error>> {
    let selection = resolve_selection(args, config)?;
    let label = match &selection {
        Selection::Preset(p) => p.key.to_string(),
        Selection::Custom { width, height } => format!("{}x{}", width, height),
    };
    let mut session = session_for(backend, image, &selection)?;
    apply_drag(&mut session, args)?;
    Ok((session, label))
}

fn session_for(
    backend: &impl ImageBackend,
    source: &std::path::Path,
    selection: &Selection,
) -> Result<Session, Box<dyn std::error::Error>> {
    let natural = backend.identify(source)?;
    let mut session = Session::default();
    match selection {
        Selection::Preset(p) => session.select_preset(*p),
        Selection::Custom { width, height } => session.select_custom(*width, *height)?,
    }
    session.load_image(SourceImage::new(source, natural));
    Ok(session)
}

fn apply_drag(
    session: &mut Session,
    args: &CropSelection,
) -> Result<(), Box<dyn std::error::Error>> {
    if let (Some(rect), Some(displayed)) = (args.rect, args.displayed) {
        session.complete_drag(rect, displayed)?;
    }
    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores — user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

/// Parse a `WxH` size argument.
fn parse_size(s: &str) -> Result<Dimensions, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{s}'"))?;
    let width = w.trim().parse().map_err(|_| format!("bad width '{w}'"))?;
    let height = h.trim().parse().map_err(|_| format!("bad height '{h}'"))?;
    Ok(Dimensions::new(width, height))
}

/// Parse an `X,Y,WxH` rectangle argument.
fn parse_rect(s: &str) -> Result<CropRect, String> {
    let parts: Vec<&str> = s.splitn(3, ',').collect();
    if parts.len() != 3 {
        return Err(format!("expected X,Y,WxH, got '{s}'"));
    }
    let x = parts[0]
        .trim()
        .parse()
        .map_err(|_| format!("bad x '{}'", parts[0]))?;
    let y = parts[1]
        .trim()
        .parse()
        .map_err(|_| format!("bad y '{}'", parts[1]))?;
    let size = parse_size(parts[2])?;
    Ok(CropRect::new(x, y, size.width, size.height))
}
