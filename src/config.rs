use crate::colors;
use crate::constants::{
    APP_NAME, DEFAULT_BACKGROUND, DEFAULT_FILL, DEFAULT_INPUT, DEFAULT_OUTPUT, DEFAULT_THRESHOLD,
    ENV_PREFIX, VERSION,
};
use crate::types::{AppConfig, Tones};
use crate::utils::rgb_to_hex;

use clap::{Arg, ArgMatches, Command};
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use image::Rgb;
use serde_derive::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Threshold must be a number, got {0}")]
    ThresholdNotANumber(String),

    #[error("Threshold must be between 0.0 and 1.0, got {0}")]
    ThresholdOutOfRange(f64),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("{0}")]
    Usage(#[from] clap::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::ThresholdNotANumber(_) => 1,
            AppError::ThresholdOutOfRange(_) => 2,
            AppError::Config(_) | AppError::Usage(_) => 3,
            AppError::Image(_) | AppError::Io(_) => 4,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SerializedAppConfig {
    color: SerializedColors,
    image: SerializedPaths,
    debug: bool,
}

#[derive(Debug, Deserialize)]
struct SerializedColors {
    fill: String,
    background: String,
    threshold: String,
}

#[derive(Debug, Deserialize)]
struct SerializedPaths {
    input: String,
    output: String,
}

/// Values given on the command line; these beat every other source.
#[derive(Debug)]
struct CliOverrides {
    config_path: Option<String>,
    fill: Option<String>,
    background: Option<String>,
    threshold: Option<String>,
    input: Option<String>,
    output: Option<String>,
    debug: bool,
}

impl CliOverrides {
    fn from_matches(matches: &ArgMatches) -> Self {
        let value = |name: &str| matches.value_of(name).map(str::to_string);

        CliOverrides {
            config_path: value("config"),
            fill: value("Fill Color"),
            background: value("Background Color"),
            threshold: value("Threshold"),
            input: value("Image Path"),
            output: value("Output Path"),
            debug: matches.is_present("debug"),
        }
    }
}

fn load_config(
    overrides: &CliOverrides,
    home_config: Option<PathBuf>,
) -> Result<SerializedAppConfig, config::ConfigError> {
    let mut builder = ConfigBuilder::<DefaultState>::default();

    builder = builder
        .set_default("color.fill", DEFAULT_FILL)?
        .set_default("color.background", DEFAULT_BACKGROUND)?
        .set_default("color.threshold", DEFAULT_THRESHOLD)?
        .set_default("image.input", DEFAULT_INPUT)?
        .set_default("image.output", DEFAULT_OUTPUT)?
        .set_default("debug", false)?;

    if let Some(path) = home_config.filter(|path| path.exists()) {
        builder = builder.add_source(File::from(path).required(false));
    }

    if let Some(path) = &overrides.config_path {
        builder = builder.add_source(File::with_name(path).required(true));
    }

    builder = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .set_override_option("color.fill", overrides.fill.clone())?
        .set_override_option("color.background", overrides.background.clone())?
        .set_override_option("color.threshold", overrides.threshold.clone())?
        .set_override_option("image.input", overrides.input.clone())?
        .set_override_option("image.output", overrides.output.clone())?;

    if overrides.debug {
        builder = builder.set_override("debug", true)?;
    }

    let config = builder.build()?;

    config.try_deserialize()
}

fn command() -> Command<'static> {
    Command::new("Generate Avatar")
        .version(VERSION)
        .about("Turns a picture into a two-tone avatar")
        .after_help("Settings are read, from lowest to highest precedence, from built-in defaults, ~/.config/generate-avatar/config.toml, the file given with --config, AVATAR_* environment variables (e.g. AVATAR_COLOR__THRESHOLD=0.5) and finally the flags below.\n\nColors may be a classic name (white, lightGray, gray, darkGray, black, red, pink, orange, yellow, green, magenta, cyan, blue), any CSS color name, or a hex value such as #48a9a6. Unknown colors fall back to the default with a warning.")
        .arg(
            Arg::new("Fill Color")
                .short('f')
                .long("fill")
                .value_name("COLOR")
                .help("Color for pixels at or below the threshold [default: #48a9a6]")
                .takes_value(true),
        )
        .arg(
            Arg::new("Background Color")
                .short('b')
                .long("background")
                .value_name("COLOR")
                .help("Color for pixels above the threshold [default: white]")
                .takes_value(true),
        )
        .arg(
            Arg::new("Threshold")
                .short('t')
                .long("threshold")
                .value_name("THRESHOLD")
                .help("[0.0-1.0] Brightness cutoff between fill and background [default: 0.7]")
                .takes_value(true)
                .allow_hyphen_values(true),
        )
        .arg(
            Arg::new("Output Path")
                .short('o')
                .long("output")
                .value_name("/path/to/avatar.png")
                .help("Where to write the avatar [default: avatar.png]")
                .takes_value(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("/path/to/config.toml")
                .help("Sets a custom config file")
                .takes_value(true),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Prints the resolved settings and enables debug logging"),
        )
        .arg(
            Arg::new("Image Path")
                .help("Path to the image to turn into an avatar [default: man-tipping-hand.png]")
                .index(1),
        )
}

pub fn parse_threshold(raw: &str) -> Result<f64, AppError> {
    let threshold: f64 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::ThresholdNotANumber(raw.to_string()))?;

    if !(0.0..=1.0).contains(&threshold) {
        return Err(AppError::ThresholdOutOfRange(threshold));
    }

    Ok(threshold)
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join(APP_NAME).join("config.toml"))
}

pub fn init() -> Result<AppConfig, AppError> {
    init_from(std::env::args_os(), default_config_path())
}

// Reads no image; a bad threshold fails here, before any file I/O.
pub fn init_from<I, T>(args: I, home_config: Option<PathBuf>) -> Result<AppConfig, AppError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command().try_get_matches_from(args)?;
    let overrides = CliOverrides::from_matches(&matches);
    let config = load_config(&overrides, home_config)?;

    let threshold = parse_threshold(&config.color.threshold)?;

    let default_fill = colors::lookup(DEFAULT_FILL).unwrap_or(Rgb([0x48, 0xa9, 0xa6]));
    let default_background = colors::lookup(DEFAULT_BACKGROUND).unwrap_or(Rgb([255, 255, 255]));
    let fill = colors::resolve("color.fill", &config.color.fill, default_fill);
    let background = colors::resolve("color.background", &config.color.background, default_background);

    Ok(AppConfig {
        input_path: config.image.input,
        output_path: config.image.output,
        tones: Tones {
            fill,
            background,
            threshold,
        },
        debug: config.debug,
    })
}

#[derive(Debug, Serialize)]
struct ResolvedSettings<'a> {
    debug: bool,
    color: ResolvedColors,
    image: ResolvedPaths<'a>,
}

#[derive(Debug, Serialize)]
struct ResolvedColors {
    fill: String,
    background: String,
    threshold: f64,
}

#[derive(Debug, Serialize)]
struct ResolvedPaths<'a> {
    input: &'a str,
    output: &'a str,
}

/// Renders the effective settings in the same shape as the config file.
pub fn to_toml(config: &AppConfig) -> Result<String, toml::ser::Error> {
    let settings = ResolvedSettings {
        debug: config.debug,
        color: ResolvedColors {
            fill: rgb_to_hex(config.tones.fill),
            background: rgb_to_hex(config.tones.background),
            threshold: config.tones.threshold,
        },
        image: ResolvedPaths {
            input: &config.input_path,
            output: &config.output_path,
        },
    };

    toml::to_string(&settings)
}
