use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use reelsmith::captions::{Transcriber, WhisperCli, WhisperCliOpts, resolve_segments};
use reelsmith::{ComposeConfig, ComposeRequest, Composer};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "reelsmith", version)]
struct Cli {
    /// JSON config (`{"compose": {...}, "transcription": {...}}`); defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Time captions for a narration and print them as JSON.
    Captions(CaptionsArgs),
    /// Render a vertical MP4 (requires `ffmpeg`/`ffprobe` on PATH).
    Render(RenderArgs),
    /// Apply the vertical fit transform to one image and write a PNG.
    Fit(FitArgs),
}

#[derive(Parser, Debug)]
struct CaptionsArgs {
    /// Narration audio.
    #[arg(long)]
    audio: PathBuf,

    /// Narration script (plain text) for proportional timing.
    #[arg(long)]
    script: PathBuf,

    /// Skip transcription and use proportional timing directly.
    #[arg(long)]
    no_transcribe: bool,

    /// Write JSON here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Narration audio.
    #[arg(long)]
    audio: PathBuf,

    /// Visual assets; videos (by extension) take precedence over images.
    #[arg(long = "asset", num_args = 1..)]
    assets: Vec<PathBuf>,

    /// Caption segments JSON (`[{"text", "start", "end"}]`).
    #[arg(long, conflicts_with = "script")]
    captions: Option<PathBuf>,

    /// Narration script; captions are timed like the `captions` command.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Skip transcription when timing from `--script`.
    #[arg(long)]
    no_transcribe: bool,

    /// Watermark text.
    #[arg(long, default_value = "")]
    watermark: String,

    /// Background music bed.
    #[arg(long)]
    bgm: Option<PathBuf>,

    /// Output MP4 path, or a directory when `--title` is given.
    #[arg(long)]
    out: PathBuf,

    /// Derive the file name from this title (joined onto `--out`).
    #[arg(long, requires = "id")]
    title: Option<String>,

    /// Source id appended to the derived file name.
    #[arg(long)]
    id: Option<String>,
}

#[derive(Parser, Debug)]
struct FitArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
struct AppConfig {
    compose: ComposeConfig,
    transcription: WhisperCliOpts,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let app = load_app_config(cli.config.as_deref())?;
    match cli.cmd {
        Command::Captions(args) => cmd_captions(&app, args),
        Command::Render(args) => cmd_render(app, args),
        Command::Fit(args) => cmd_fit(&app, args),
    }
}

fn load_app_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let Some(path) = path else {
        return Ok(AppConfig::default());
    };
    let bytes = std::fs::read(path).with_context(|| format!("read config '{}'", path.display()))?;
    let app: AppConfig = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse config '{}'", path.display()))?;
    app.compose.validate()?;
    Ok(app)
}

fn time_captions(
    app: &AppConfig,
    audio: &Path,
    script: &Path,
    no_transcribe: bool,
) -> anyhow::Result<reelsmith::captions::ResolvedCaptions> {
    let text = std::fs::read_to_string(script)
        .with_context(|| format!("read script '{}'", script.display()))?;
    let whisper = WhisperCli::new(app.transcription.clone());
    let transcriber: Option<&dyn Transcriber> = if no_transcribe { None } else { Some(&whisper) };
    let resolved = resolve_segments(
        transcriber,
        audio,
        &text,
        app.compose.caption_min_duration_sec,
        || reelsmith::assets::media::audio_duration_sec(audio),
    )?;
    Ok(resolved)
}

fn cmd_captions(app: &AppConfig, args: CaptionsArgs) -> anyhow::Result<()> {
    let resolved = time_captions(app, &args.audio, &args.script, args.no_transcribe)?;
    let json = serde_json::to_string_pretty(&resolved.segments)?;
    match args.out {
        Some(out) => {
            reelsmith::encode::ensure_parent_dir(&out)?;
            std::fs::write(&out, json).with_context(|| format!("write '{}'", out.display()))?;
        }
        None => println!("{json}"),
    }
    eprintln!(
        "{} segments ({:?})",
        resolved.segments.len(),
        resolved.strategy
    );
    Ok(())
}

fn cmd_render(app: AppConfig, args: RenderArgs) -> anyhow::Result<()> {
    let captions = match (&args.captions, &args.script) {
        (Some(path), _) => reelsmith::captions::load_segments(path)?,
        (None, Some(script)) => {
            time_captions(&app, &args.audio, script, args.no_transcribe)?.segments
        }
        (None, None) => Vec::new(),
    };

    let output_path = match (&args.title, &args.id) {
        (Some(title), Some(id)) => args.out.join(reelsmith::output_file_name(title, id)),
        _ => args.out.clone(),
    };

    let (image_paths, video_paths) = reelsmith::partition_assets(args.assets);
    let composer = Composer::new(app.compose)?;
    let out = composer.compose(&ComposeRequest {
        narration_path: args.audio,
        image_paths,
        video_paths,
        captions,
        watermark_text: args.watermark,
        bgm_path: args.bgm,
        output_path,
    })?;

    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_fit(app: &AppConfig, args: FitArgs) -> anyhow::Result<()> {
    let img = reelsmith::assets::decode::decode_image_file(&args.in_path)?;
    let fitted = reelsmith::transform::fit::fit_image(&img, app.compose.canvas)?;
    reelsmith::encode::ensure_parent_dir(&args.out)?;
    fitted
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write '{}'", args.out.display()))?;
    eprintln!(
        "wrote {} ({}x{})",
        args.out.display(),
        fitted.width(),
        fitted.height()
    );
    Ok(())
}
