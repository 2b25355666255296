use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::classify::classifier::DEFAULT_MAX_INPUT_CHARS;
use crate::classify::keyword_scorer::Thresholds;

pub const DEFAULT_STATIC_BASE_URL: &str = "https://assess-poc.onrender.com";

/// Application configuration loaded from environment variables.
/// Every variable has a default; startup fails only on values that do not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub static_base_url: String,
    /// JSON routing table; the embedded table is used when unset.
    pub routing_table_path: Option<PathBuf>,
    pub thresholds: Thresholds,
    pub max_input_chars: usize,
    /// Answer unconfident keyword results with the debug body instead of a redirect.
    pub debug_on_low_confidence: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            static_base_url: DEFAULT_STATIC_BASE_URL.to_string(),
            routing_table_path: None,
            thresholds: Thresholds::default(),
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            debug_on_low_confidence: false,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let thresholds = Thresholds {
            min_score: parse_or(var("MIN_SCORE"), "MIN_SCORE", defaults.thresholds.min_score)?,
            margin: parse_or(var("MARGIN"), "MARGIN", defaults.thresholds.margin)?,
        };
        for (key, value) in [("MIN_SCORE", thresholds.min_score), ("MARGIN", thresholds.margin)] {
            if !value.is_finite() || value < 0.0 {
                bail!("{key} must be a finite, non-negative number (got {value})");
            }
        }

        let max_input_chars = parse_or(
            var("MAX_INPUT_CHARS"),
            "MAX_INPUT_CHARS",
            defaults.max_input_chars,
        )?;
        if max_input_chars == 0 {
            bail!("MAX_INPUT_CHARS must be greater than zero");
        }

        let debug_on_low_confidence = match var("DEBUG_ON_LOW_CONFIDENCE") {
            Some(raw) => parse_flag(&raw).with_context(|| {
                format!("DEBUG_ON_LOW_CONFIDENCE must be a boolean (got '{raw}')")
            })?,
            None => defaults.debug_on_low_confidence,
        };

        Ok(Config {
            static_base_url: var("STATIC_BASE_URL")
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .unwrap_or(defaults.static_base_url),
            routing_table_path: var("ROUTING_TABLE_PATH").map(PathBuf::from),
            thresholds,
            max_input_chars,
            debug_on_low_confidence,
            port: parse_or(var("PORT"), "PORT", defaults.port)?,
            rust_log: var("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

/// Accepts the usual spellings of a boolean switch.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
