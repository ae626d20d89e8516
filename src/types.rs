use image::Rgb;

/// The two output colors and the brightness cutoff between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tones {
    pub fill: Rgb<u8>,
    pub background: Rgb<u8>,
    /// Always within `[0.0, 1.0]`; checked when the config is built.
    pub threshold: f64,
}

#[derive(Debug)]
pub struct AppConfig {
    pub input_path: String,
    pub output_path: String,
    pub tones: Tones,
    pub debug: bool,
}
