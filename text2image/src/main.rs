use anyhow::{bail, Context, Result};
use clap::Parser;
use regex::Regex;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::OnceLock;
use text2image_rs::{
    parse_color, parse_measure, parse_offset, parse_ratio, parse_size, BaselinePolicy, FontConfig,
    RenderRequest, Rgba, Shadow, TextRenderer,
};

/// A color argument: None when the value parsed to the transparent sentinel.
#[derive(Debug, Clone)]
struct ColorArg(Option<Rgba>);

fn color_arg(s: &str) -> Result<ColorArg, text2image_rs::Text2ImageError> {
    parse_color(s).map(ColorArg)
}

/// text2image: a text to image generator. Renders each TEXT argument into
/// its own PNG file.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// The text to generate an image of; one output file per argument
    #[clap(required = true)]
    text: Vec<String>,

    /// Output directory for the generated images
    #[clap(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Font file to use instead of the system fonts
    #[clap(long)]
    font_file: Option<PathBuf>,

    /// Font family to use (default: the sans-serif family)
    #[clap(long)]
    font_family: Option<String>,

    /// Font size: <PIXELS | Npx | Npt>
    #[clap(long, default_value = "32pt", value_parser = parse_measure)]
    font_size: u32,

    /// Color to fill the text with: <transparent | NAME | R,G,B | 0xRGB | 0xRRGGBB | #RRGGBBAA>
    #[clap(long, default_value = "0xE6E2E1", value_parser = color_arg)]
    fill: ColorArg,

    /// Color of the stroke used to draw the text
    #[clap(long, value_parser = color_arg)]
    stroke: Option<ColorArg>,

    /// Width of the stroke used to draw the text: <PIXELS | Npx | Npt>
    #[clap(long, default_value = "0px", value_parser = parse_measure)]
    stroke_width: u32,

    /// Color used as the background of the image
    #[clap(long, value_parser = color_arg)]
    background: Option<ColorArg>,

    /// Color used for the text shadow; no shadow is drawn when absent
    #[clap(long, value_parser = color_arg)]
    shadow: Option<ColorArg>,

    /// Offset of the text shadow: <X,Y>
    #[clap(long, default_value = "0,0", value_parser = parse_offset)]
    shadow_offset: (i32, i32),

    /// Blur radius applied to the text shadow
    #[clap(long, default_value_t = 0.0)]
    shadow_blur: f32,

    /// Padding between the text and the image border: <X,Y>
    #[clap(long, default_value = "0,0", value_parser = parse_size)]
    padding: (u32, u32),

    /// Minimum size of the image; expanded when the text does not fit: <W,H>
    #[clap(long, value_parser = parse_size)]
    min_size: Option<(u32, u32)>,

    /// Baseline alignment across separately rendered images: none, broad or perfect
    #[clap(long, default_value = "none", value_parser = BaselinePolicy::from_str)]
    baseline: BaselinePolicy,

    /// Desired aspect ratio of the output image: <N | N/D>
    #[clap(long, value_parser = parse_ratio)]
    aspect_ratio: Option<f32>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    // Request invariants are validated before any font loading or rendering.
    let shadow = args.shadow.as_ref().and_then(|c| c.0).map(|color| Shadow {
        color,
        offset: args.shadow_offset,
        blur: args.shadow_blur,
    });
    let (min_width, min_height) = args.min_size.unwrap_or((0, 0));
    let request = RenderRequest::builder(args.text.clone())
        .font_family(args.font_family.clone())
        .font_size(args.font_size as f32)
        .min_size(min_width, min_height)
        .padding(args.padding.0, args.padding.1)
        .fill_color(args.fill.0)
        .stroke(
            args.stroke.as_ref().and_then(|c| c.0),
            args.stroke_width as f32,
        )
        .background_color(args.background.as_ref().and_then(|c| c.0))
        .shadow(shadow)
        .baseline(args.baseline)
        .aspect_ratio(args.aspect_ratio)
        .build()?;

    std::fs::create_dir_all(&args.out_dir).with_context(|| {
        format!(
            "could not create output directory '{}'",
            args.out_dir.display()
        )
    })?;

    let config = FontConfig {
        font_files: args.font_file.iter().cloned().collect(),
        family: args.font_family.clone(),
        load_system_fonts: args.font_file.is_none(),
    };
    let mut renderer = TextRenderer::with_config(&config)?;

    // A fatal error (bad font) aborts the batch; a failing item is reported
    // and the remaining items still render.
    let images = renderer.render(&request)?;
    let mut failures = 0usize;
    for (text, image) in request.texts.iter().zip(images) {
        let path = args.out_dir.join(output_filename(text));
        match image.and_then(|image| image.to_png()) {
            Ok(png_data) => {
                std::fs::write(&path, png_data)
                    .with_context(|| format!("could not write '{}'", path.display()))?;
                log::info!("generated '{}'", path.display());
            }
            Err(err) => {
                log::error!("skipping \"{text}\": {err}");
                failures += 1;
            }
        }
    }
    if failures > 0 {
        bail!("{failures} of {} images failed", request.texts.len());
    }
    Ok(())
}

/// Build a filesystem-safe output file name from the rendered text: path
/// unsafe characters are dropped, whitespace collapses to plain spaces, and
/// non-ASCII characters become `U-<codepoint>-`.
fn output_filename(text: &str) -> String {
    static UNSAFE_CHARS: OnceLock<Regex> = OnceLock::new();
    let re = UNSAFE_CHARS.get_or_init(|| Regex::new(r"[^a-zA-Z0-9. \-]").expect("valid pattern"));

    let name = re.replace_all(text, |captures: &regex::Captures| {
        let ch = captures.get(0).unwrap().as_str().chars().next().unwrap();
        if ch.is_whitespace() {
            " ".to_string()
        } else if (ch as u32) >= 128 {
            format!("U-{}-", ch as u32)
        } else {
            String::new()
        }
    });

    let mut filename = name.trim_matches('.').to_string();
    if !filename.ends_with(".png") {
        filename.push_str(".png");
    }
    filename
}
