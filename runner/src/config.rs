//! Configuration management for the runner.

use namedraw_engine::{DrawConfig, DrawFilter, Geometry, Remark, Sex, Strategy};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_SPIN_SPEED: f64 = 15.0;
const DEFAULT_RUN_SPIN_MS: u64 = 3000;

/// Runner configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON roster read at start and written back after a draw
    pub roster_path: PathBuf,
    /// Which drawer presents the draw
    pub strategy: Strategy,
    /// Engine settings
    pub draw: DrawConfig,
    /// Virtual viewport the drawers lay out against
    pub viewport: Geometry,
    /// Request a stop this long after the draw starts; `None` waits for Ctrl-C
    pub run_spin: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let roster_path = lookup("ROSTER_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .ok_or(ConfigError::MissingRosterPath)?;

        let strategy = match lookup("DRAW_STRATEGY") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                var: "DRAW_STRATEGY",
                value,
            })?,
            None => Strategy::default(),
        };

        let defaults = DrawConfig::default();
        let filter = DrawFilter {
            sex: parse_sex(lookup("DRAW_SEX"))?,
            remark: parse_remark(lookup("DRAW_REMARK"))?,
        };

        let draw = DrawConfig {
            base_interval_ms: parse_var(&lookup, "BASE_INTERVAL_MS", defaults.base_interval_ms)?,
            max_interval_ms: parse_var(&lookup, "MAX_INTERVAL_MS", defaults.max_interval_ms)?,
            max_font_size: parse_var(&lookup, "MAX_FONT_SIZE", defaults.max_font_size)?,
            relative_interval: defaults.relative_interval,
            spin_speed: parse_var(&lookup, "SPIN_SPEED", DEFAULT_SPIN_SPEED)?,
            filter,
            adapt_touch: parse_flag(lookup("ADAPT_TOUCH"))?,
            seed: match lookup("DRAW_SEED") {
                Some(value) => Some(value.trim().parse().map_err(|_| ConfigError::Invalid {
                    var: "DRAW_SEED",
                    value,
                })?),
                None => None,
            },
        };
        draw.validate().map_err(ConfigError::Draw)?;

        let viewport = Geometry::new(
            parse_var(&lookup, "VIEWPORT_WIDTH", 1000.0)?,
            parse_var(&lookup, "VIEWPORT_HEIGHT", 300.0)?,
        );
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return Err(ConfigError::Invalid {
                var: "VIEWPORT_WIDTH",
                value: format!("{}x{}", viewport.width, viewport.height),
            });
        }

        let run_spin_ms: u64 = parse_var(&lookup, "RUN_SPIN_MS", DEFAULT_RUN_SPIN_MS)?;
        let run_spin = (run_spin_ms > 0).then(|| Duration::from_millis(run_spin_ms));

        Ok(Self {
            roster_path,
            strategy,
            draw,
            viewport,
            run_spin,
        })
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        None => Ok(default),
    }
}

/// `male`, `female`, or `any` / `none` for no constraint.
fn parse_sex(value: Option<String>) -> Result<Option<Sex>, ConfigError> {
    let Some(value) = value else {
        return Ok(None);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "any" | "none" => Ok(None),
        "male" => Ok(Some(Sex::Male)),
        "female" => Ok(Some(Sex::Female)),
        _ => Err(ConfigError::Invalid {
            var: "DRAW_SEX",
            value,
        }),
    }
}

/// `en`, `jp`, `none` (records without a remark), or `any` for no constraint.
fn parse_remark(value: Option<String>) -> Result<Option<Remark>, ConfigError> {
    let Some(value) = value else {
        return Ok(None);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "any" => Ok(None),
        "en" | "english" => Ok(Some(Remark::English)),
        "jp" | "japanese" => Ok(Some(Remark::Japanese)),
        "none" | "no_remarks" => Ok(Some(Remark::None)),
        _ => Err(ConfigError::Invalid {
            var: "DRAW_REMARK",
            value,
        }),
    }
}

fn parse_flag(value: Option<String>) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(false);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var: "ADAPT_TOUCH",
            value,
        }),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("ROSTER_PATH environment variable is required")]
    MissingRosterPath,

    #[error("Invalid {var} value: {value:?}")]
    Invalid { var: &'static str, value: String },

    #[error("Invalid draw settings: {0}")]
    Draw(namedraw_engine::Error),
}
