use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use scrollscrub::{ScrollVideoController, ScrubConfig, SimulatedPage, Viewport};

const BACKGROUND_RGBA: [u8; 4] = [18, 20, 28, 255];

#[derive(Parser, Debug)]
#[command(name = "scrollscrub", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the frame shown at a scroll position as a PNG.
    Frame(FrameArgs),
    /// Scroll through the whole section and write one PNG per painted frame.
    Sweep(SweepArgs),
}

#[derive(Args, Debug)]
struct PageArgs {
    /// Section config JSON. Built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Viewport width in logical pixels.
    #[arg(long, default_value_t = 640.0)]
    width: f64,

    /// Viewport height in logical pixels.
    #[arg(long, default_value_t = 360.0)]
    height: f64,

    /// Device pixel ratio reported by the simulated page.
    #[arg(long, default_value_t = 1.0)]
    pixel_ratio: f64,

    /// Content height above the section.
    #[arg(long, default_value_t = 0.0)]
    header: f64,

    /// Milliseconds to wait for frame images before falling back to procedural frames.
    #[arg(long, default_value_t = 10_000)]
    wait_ms: u64,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    page: PageArgs,

    /// Scroll progress through the section, `0..=1`.
    #[arg(long, default_value_t = 0.0)]
    progress: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct SweepArgs {
    #[command(flatten)]
    page: PageArgs,

    /// Number of evenly spaced scroll positions.
    #[arg(long, default_value_t = 10)]
    steps: u32,

    /// Directory receiving `frame_NNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    initialise_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Sweep(args) => cmd_sweep(args),
    }
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn mount(args: &PageArgs) -> anyhow::Result<(ScrollVideoController, Arc<SimulatedPage>)> {
    let config = match &args.config {
        Some(path) => ScrubConfig::from_json_path(path)?,
        None => ScrubConfig::default(),
    };

    let page = Arc::new(SimulatedPage::with_surroundings(
        Viewport::new(args.width, args.height, args.pixel_ratio),
        args.header,
        args.height,
    ));
    let mut controller = ScrollVideoController::new(config)?;
    controller.mount(page.clone())?;

    if controller.is_loading() && !controller.wait_for_assets(Duration::from_millis(args.wait_ms))
    {
        tracing::warn!(wait_ms = args.wait_ms, "frame images not ready; using procedural frames");
    }
    Ok((controller, page))
}

/// Scroll, deliver the queued events and run one refresh tick.
fn scrub_to(controller: &mut ScrollVideoController, page: &SimulatedPage, progress: f64) -> bool {
    page.scroll_to_progress(progress);
    for event in page.take_events() {
        controller.handle_event(event);
    }
    controller.on_animation_frame().is_some()
}

fn write_png(controller: &ScrollVideoController, out: &Path) -> anyhow::Result<()> {
    let frame = controller
        .snapshot()
        .context("surface is detached (zero-sized viewport?)")?;
    let rgba = frame.flatten_over(BACKGROUND_RGBA);

    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        out,
        &rgba,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out.display()))?;
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    if !(0.0..=1.0).contains(&args.progress) {
        anyhow::bail!("--progress must be within 0..=1");
    }
    let (mut controller, page) = mount(&args.page)?;
    scrub_to(&mut controller, &page, args.progress);
    write_png(&controller, &args.out)?;

    let frame = controller.current_frame().map_or(0, |f| f.0);
    eprintln!(
        "wrote {} (frame {} / {})",
        args.out.display(),
        frame + 1,
        controller.effective_total()
    );
    Ok(())
}

fn cmd_sweep(args: SweepArgs) -> anyhow::Result<()> {
    if args.steps == 0 {
        anyhow::bail!("--steps must be >= 1");
    }
    let (mut controller, page) = mount(&args.page)?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let last = f64::from(args.steps.saturating_sub(1).max(1));
    let mut written = 0usize;
    for step in 0..args.steps {
        if !scrub_to(&mut controller, &page, f64::from(step) / last) {
            continue;
        }
        let frame = controller.current_frame().map_or(0, |f| f.0);
        write_png(
            &controller,
            &args.out_dir.join(format!("frame_{frame:04}.png")),
        )?;
        written += 1;
    }

    let stats = controller.stats();
    eprintln!(
        "wrote {written} frames to {} ({} paints, {} failed)",
        args.out_dir.display(),
        stats.paints,
        stats.paint_errors
    );
    Ok(())
}
