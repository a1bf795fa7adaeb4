use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use cardscene::logging::{LoggingConfig, init_logging};

#[derive(Parser, Debug)]
#[command(name = "cardscene", version)]
struct Cli {
    /// Default log filter (overridden by `RUST_LOG`).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a JSON scene description to an image.
    Render(RenderArgs),
    /// Render one card centered on a plain background, with an optional caption.
    Card(CardArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Input scene JSON. Asset paths resolve relative to its directory.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output image path; format follows the extension.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct CardArgs {
    /// Card art.
    #[arg(long)]
    image: PathBuf,

    /// Output image path; format follows the extension.
    #[arg(long)]
    out: PathBuf,

    #[arg(long, default_value_t = 1920)]
    width: u32,

    #[arg(long, default_value_t = 1080)]
    height: u32,

    /// Fraction of the canvas height the card occupies, in (0, 1].
    #[arg(long, default_value_t = cardscene::DEFAULT_CARD_SCALE, value_parser = parse_scale)]
    scale: f64,

    /// Background color as `#RRGGBB` or `#RRGGBBAA`.
    #[arg(long, default_value = "#ccf1ff")]
    background: cardscene::Rgba8,

    /// Caption drawn under the card.
    #[arg(long, requires = "font")]
    caption: Option<String>,

    /// Font file for the caption.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Maximum caption height in pixels.
    #[arg(long, default_value_t = 36)]
    caption_height: u32,
}

fn parse_scale(s: &str) -> Result<f64, String> {
    let scale: f64 = s
        .parse()
        .map_err(|e| format!("'{s}' is not a number: {e}"))?;
    cardscene::validate_card_scale(scale).map_err(|e| e.to_string())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&LoggingConfig {
        level: cli.log_level.clone(),
        json: cli.log_json,
    });

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Card(args) => cmd_card(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let spec = cardscene::SceneSpec::from_json_path(&args.in_path)?;
    let root = args.in_path.parent().unwrap_or_else(|| Path::new("."));
    let scene = cardscene::build_scene(&spec, root)
        .with_context(|| format!("build scene '{}'", args.in_path.display()))?;
    finish(scene, &args.out)
}

fn cmd_card(args: CardArgs) -> anyhow::Result<()> {
    let art = cardscene::open_image(&args.image)?;
    let mut scene = cardscene::Scene::with_background(args.width, args.height, args.background)?;
    let card = scene.add_layer(cardscene::ImageLayer::with_scale(art, args.scale)?);

    if let (Some(caption), Some(font)) = (args.caption, args.font.as_deref()) {
        let font = cardscene::ParleyFont::open(font)?;
        scene.add_layer(cardscene::TextLayer::new(
            card,
            caption,
            args.caption_height,
            font,
        ));
    }

    finish(scene, &args.out)
}

fn finish(mut scene: cardscene::Scene, out: &Path) -> anyhow::Result<()> {
    // Fail on an unknown extension before doing any rendering work.
    cardscene::format_from_path(out)?;

    let report = scene.render_all()?;
    for diag in &report.diagnostics {
        eprintln!("warning: {diag}");
    }

    scene.save(out)?;
    eprintln!("wrote {}", out.display());
    Ok(())
}
