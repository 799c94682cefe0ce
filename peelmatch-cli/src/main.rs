use clap::Parser;
use peelmatch::io::{load_bitmap, load_glyph_sheet};
use peelmatch::{
    AngleSign, Candidate, DecodeConfig, DecodeResult, Decoder, FontGlyphs, GlyphLibrary,
    GlyphSource, LibraryConfig, QuietReporter, Reporter, SheetLayout, TextReporter, ZoneLayout,
    ZonePruning,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

/// Sheet looked up next to the executable when no other path is given.
const DEFAULT_SHEET: &str = "delargo_dt_black.png";
/// Pixel size for fonts given with `--font` unless the config sets one.
const DEFAULT_FONT_SIZE: u32 = 64;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Decode a four-character rotated-glyph captcha",
    override_usage = "peelmatch [OPTIONS] IMAGE"
)]
struct Cli {
    /// Captcha image to decode.
    #[arg(value_name = "IMAGE", required_unless_present = "print_example")]
    image: Option<PathBuf>,
    /// Be quiet: print only the decoded string.
    #[arg(short, long)]
    quiet: bool,
    /// Reference glyph sheet (defaults to the config, then the executable directory).
    #[arg(short, long, value_name = "FILE")]
    glyphs: Option<PathBuf>,
    /// Render reference glyphs from a TrueType/OpenType font instead of a sheet.
    #[arg(short, long, value_name = "FILE", conflicts_with = "glyphs")]
    font: Option<PathBuf>,
    /// JSON configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print the decode result as JSON.
    #[arg(long)]
    json: bool,
    /// Enable tracing output for the decode pipeline.
    #[arg(long)]
    trace: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum PruningConfig {
    AfterFirstMatch,
    Always,
}

impl From<PruningConfig> for ZonePruning {
    fn from(value: PruningConfig) -> Self {
        match value {
            PruningConfig::AfterFirstMatch => ZonePruning::AfterFirstMatch,
            PruningConfig::Always => ZonePruning::Always,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum SignConfig {
    Negative,
    Positive,
}

impl From<SignConfig> for AngleSign {
    fn from(value: SignConfig) -> Self {
        match value {
            SignConfig::Negative => AngleSign::Negative,
            SignConfig::Positive => AngleSign::Positive,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct LayoutConfigJson {
    slots: usize,
    first_x_band: (usize, usize),
    half_width: f64,
    angle_band: (i32, i32),
    first_sign: SignConfig,
}

impl Default for LayoutConfigJson {
    fn default() -> Self {
        let layout = ZoneLayout::default();
        Self {
            slots: layout.slots,
            first_x_band: layout.first_x_band,
            half_width: layout.half_width,
            angle_band: layout.angle_band,
            first_sign: SignConfig::Negative,
        }
    }
}

impl From<LayoutConfigJson> for ZoneLayout {
    fn from(value: LayoutConfigJson) -> Self {
        Self {
            slots: value.slots,
            first_x_band: value.first_x_band,
            half_width: value.half_width,
            angle_band: value.angle_band,
            first_sign: value.first_sign.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DecodeConfigJson {
    captcha_len: usize,
    angle_step_deg: usize,
    x_step: usize,
    pruning: PruningConfig,
    parallel: bool,
    layout: LayoutConfigJson,
}

impl Default for DecodeConfigJson {
    fn default() -> Self {
        let cfg = DecodeConfig::default();
        Self {
            captcha_len: cfg.captcha_len,
            angle_step_deg: cfg.angle_step_deg,
            x_step: cfg.x_step,
            pruning: PruningConfig::AfterFirstMatch,
            parallel: cfg.parallel,
            layout: LayoutConfigJson::default(),
        }
    }
}

impl From<DecodeConfigJson> for DecodeConfig {
    fn from(value: DecodeConfigJson) -> Self {
        Self {
            captcha_len: value.captcha_len,
            angle_step_deg: value.angle_step_deg,
            x_step: value.x_step,
            pruning: value.pruning.into(),
            parallel: value.parallel,
            layout: value.layout.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SheetConfigJson {
    columns: usize,
    cell_width: f64,
    cell_height: f64,
    glyph_offset: (usize, usize),
    glyph_size: (usize, usize),
    digit_start: usize,
    letter_start: usize,
}

impl Default for SheetConfigJson {
    fn default() -> Self {
        let layout = SheetLayout::default();
        Self {
            columns: layout.columns,
            cell_width: layout.cell_width,
            cell_height: layout.cell_height,
            glyph_offset: layout.glyph_offset,
            glyph_size: layout.glyph_size,
            digit_start: layout.digit_start,
            letter_start: layout.letter_start,
        }
    }
}

impl From<SheetConfigJson> for SheetLayout {
    fn from(value: SheetConfigJson) -> Self {
        Self {
            columns: value.columns,
            cell_width: value.cell_width,
            cell_height: value.cell_height,
            glyph_offset: value.glyph_offset,
            glyph_size: value.glyph_size,
            digit_start: value.digit_start,
            letter_start: value.letter_start,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ReportConfigJson {
    image_step: usize,
    show_working: bool,
}

impl Default for ReportConfigJson {
    fn default() -> Self {
        Self {
            image_step: 2,
            show_working: false,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    glyphs_path: Option<PathBuf>,
    font_path: Option<PathBuf>,
    font_size: u32,
    excluded: Option<String>,
    sheet: SheetConfigJson,
    decode: DecodeConfigJson,
    report: ReportConfigJson,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            glyphs_path: None,
            font_path: None,
            font_size: DEFAULT_FONT_SIZE,
            excluded: None,
            sheet: SheetConfigJson::default(),
            decode: DecodeConfigJson::default(),
            report: ReportConfigJson::default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct MatchRecord {
    symbol: char,
    x: usize,
    y: usize,
    angle_deg: i32,
    error: f64,
}

impl From<&Candidate> for MatchRecord {
    fn from(value: &Candidate) -> Self {
        Self {
            symbol: value.symbol,
            x: value.x,
            y: value.y,
            angle_deg: value.angle_deg,
            error: value.error,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    text: String,
    mean_error: f64,
    matches: Vec<MatchRecord>,
}

impl From<&DecodeResult> for Output {
    fn from(value: &DecodeResult) -> Self {
        Self {
            text: value.text.clone(),
            mean_error: value.mean_error,
            matches: value.matches.iter().map(MatchRecord::from).collect(),
        }
    }
}

fn default_sheet_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_SHEET)))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SHEET))
}

fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            Ok(serde_json::from_str(&text)?)
        }
        None => Ok(Config::default()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("peelmatch=info".parse()?))
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }
    let Some(image_path) = cli.image.as_deref() else {
        return Err("an IMAGE path is required".into());
    };

    let config = load_config(cli.config.as_deref())?;
    let font_path = match &cli.glyphs {
        Some(_) => None,
        None => cli.font.clone().or(config.font_path),
    };
    let (source, source_path): (Box<dyn GlyphSource>, PathBuf) = match font_path {
        Some(path) => {
            let font = FontGlyphs::from_file(&path, config.font_size)?;
            (Box::new(font) as Box<dyn GlyphSource>, path)
        }
        None => {
            let path = cli
                .glyphs
                .clone()
                .or(config.glyphs_path)
                .unwrap_or_else(default_sheet_path);
            let sheet = load_glyph_sheet(&path, config.sheet.into())?;
            (Box::new(sheet) as Box<dyn GlyphSource>, path)
        }
    };

    let library_cfg = LibraryConfig {
        excluded: config
            .excluded
            .unwrap_or_else(|| LibraryConfig::default().excluded),
    };
    let library = GlyphLibrary::build(source.as_ref(), &library_cfg)?;
    tracing::info!(
        source = %source_path.display(),
        glyphs = library.len(),
        "glyph library ready"
    );

    let image = load_bitmap(image_path)?;
    let decoder = Decoder::new(library).with_config(config.decode.into());

    let mut text_reporter;
    let mut quiet_reporter = QuietReporter;
    let reporter: &mut dyn Reporter = if cli.quiet {
        &mut quiet_reporter
    } else {
        text_reporter = TextReporter::new(std::io::stderr())
            .with_image_step(config.report.image_step)
            .with_working_images(config.report.show_working);
        &mut text_reporter
    };

    let result = decoder.decode_with(&image, reporter)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&Output::from(&result))?);
    } else {
        println!("{}", result.text);
    }
    Ok(())
}
