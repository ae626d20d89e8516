pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "generate-avatar";

/// Prefix for environment variable overrides, e.g. `AVATAR_COLOR__THRESHOLD`.
pub const ENV_PREFIX: &str = "AVATAR";

pub const DEFAULT_FILL: &str = "#48a9a6";
pub const DEFAULT_BACKGROUND: &str = "white";
pub const DEFAULT_THRESHOLD: &str = "0.7";
pub const DEFAULT_INPUT: &str = "man-tipping-hand.png";
pub const DEFAULT_OUTPUT: &str = "avatar.png";
