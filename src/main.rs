mod avatar;
mod colors;
mod config;
mod constants;
mod types;
mod utils;

use crate::avatar::generate;
use crate::config::{init, to_toml, AppError};
use crate::types::AppConfig;

use std::path::Path;
use std::process;

use image::{ImageFormat, RgbImage};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "generate_avatar=warn";
const DEBUG_FILTER: &str = "generate_avatar=debug";

fn main() {
    let (filter, filter_handle) = reload::Layer::new(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()),
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    let config = match init() {
        Ok(config) => config,
        Err(AppError::Usage(e)) if !e.use_stderr() => e.exit(),
        Err(e) => exit_with(e),
    };

    if config.debug {
        if std::env::var_os("RUST_LOG").is_none() {
            if let Err(e) = filter_handle.reload(EnvFilter::new(DEBUG_FILTER)) {
                warn!("Could not raise log level: {}", e);
            }
        }
        print_settings(&config);
    }

    if let Err(e) = run(&config) {
        exit_with(e);
    }
}

fn exit_with(e: AppError) -> ! {
    eprintln!("{}", e);
    process::exit(e.exit_code());
}

fn print_settings(config: &AppConfig) {
    match to_toml(config) {
        Ok(settings) => info!("Resolved settings:\n{}", settings.trim_end()),
        Err(e) => warn!("Could not render settings: {}", e),
    }
}

fn run(config: &AppConfig) -> Result<(), AppError> {
    let pb = ProgressBar::new(3);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb.set_message(format!("Processing: {}", config.input_path));

    let result = process_image(&config.input_path, &config.output_path, config, &pb);

    match &result {
        Ok(()) => pb.finish_with_message(format!(
            "Finished: {} (Saved to: {})",
            config.input_path, config.output_path
        )),
        Err(_) => pb.abandon_with_message(format!("Failed: {}", config.input_path)),
    }

    result
}

fn process_image(
    input_path: &str,
    output_path: &str,
    config: &AppConfig,
    pb: &ProgressBar,
) -> Result<(), AppError> {
    let img = image::open(input_path)?;
    let final_output = generate(&img, &config.tones, pb);
    save(&final_output, output_path)?;
    Ok(())
}

/// Saves using the format implied by the extension, or PNG when there is none.
fn save(img: &RgbImage, output_path: &str) -> Result<(), AppError> {
    let path = Path::new(output_path);

    if path.extension().is_none() {
        img.save_with_format(path, ImageFormat::Png)?;
    } else {
        img.save(path)?;
    }

    info!("Saved {}x{} avatar to {}", img.width(), img.height(), output_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Tones;
    use image::{Rgb, Rgba, RgbaImage};

    fn test_config(input: &Path, output: &Path) -> AppConfig {
        AppConfig {
            input_path: input.to_str().unwrap().to_string(),
            output_path: output.to_str().unwrap().to_string(),
            tones: Tones {
                fill: Rgb([0x48, 0xa9, 0xa6]),
                background: Rgb([255, 255, 255]),
                threshold: 0.7,
            },
            debug: false,
        }
    }

    #[test]
    fn process_image_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.png");
        let output = dir.path().join("avatar.png");

        let mut source = RgbaImage::from_pixel(4, 3, Rgba([0, 0, 0, 255]));
        source.put_pixel(3, 2, Rgba([0, 0, 0, 0]));
        source.save(&input).unwrap();

        let config = test_config(&input, &output);
        process_image(&config.input_path, &config.output_path, &config, &ProgressBar::hidden())
            .unwrap();

        let avatar = image::open(&output).unwrap().to_rgb8();
        assert_eq!(avatar.dimensions(), (4, 3));
        assert_eq!(*avatar.get_pixel(0, 0), Rgb([0x48, 0xa9, 0xa6]));
        assert_eq!(*avatar.get_pixel(3, 2), Rgb([255, 255, 255]));
    }

    #[test]
    fn missing_input_is_an_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir.path().join("missing.png"), &dir.path().join("out.png"));

        let err = process_image(&config.input_path, &config.output_path, &config, &ProgressBar::hidden())
            .unwrap_err();

        assert_eq!(err.exit_code(), 4);
        assert!(!dir.path().join("out.png").exists());
    }

    #[test]
    fn output_without_extension_is_png() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("avatar");

        save(&RgbImage::from_pixel(2, 2, Rgb([1, 2, 3])), output.to_str().unwrap()).unwrap();

        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
    }
}
