use std::str::FromStr;

use anyhow::{Context, Result};

use crate::matching::similarity::SimilarityParams;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub similarity: SimilarityParams,
    pub default_team_size: usize,
    /// Fixed seed for justification phrasing; entropy when unset.
    pub justification_seed: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = SimilarityParams::default();
        let similarity = SimilarityParams {
            entanglement_threshold: parse_or(
                &lookup,
                "ENTANGLEMENT_THRESHOLD",
                defaults.entanglement_threshold,
            )?,
            superposition_boost: parse_or(
                &lookup,
                "SUPERPOSITION_BOOST",
                defaults.superposition_boost,
            )?,
            context_amplifier: parse_or(&lookup, "CONTEXT_AMPLIFIER", defaults.context_amplifier)?,
        };
        if !(0.0..=1.0).contains(&similarity.entanglement_threshold) {
            anyhow::bail!(
                "ENTANGLEMENT_THRESHOLD must be within [0, 1], got {}",
                similarity.entanglement_threshold
            );
        }

        for (key, value) in [
            ("SUPERPOSITION_BOOST", similarity.superposition_boost),
            ("CONTEXT_AMPLIFIER", similarity.context_amplifier),
        ] {
            if value.is_nan() || value < 1.0 {
                anyhow::bail!("{key} must be at least 1.0, got {value}");
            }
        }

        let default_team_size = parse_or(&lookup, "DEFAULT_TEAM_SIZE", 3usize)?;
        if default_team_size == 0 {
            anyhow::bail!("DEFAULT_TEAM_SIZE must be at least 1");
        }

        let justification_seed = lookup("JUSTIFICATION_SEED")
            .map(|raw| {
                raw.parse::<u64>()
                    .context("JUSTIFICATION_SEED must be an unsigned integer")
            })
            .transpose()?;

        Ok(Config {
            port: parse_or(&lookup, "PORT", 8080u16)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            similarity,
            default_team_size,
            justification_seed,
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            port: 0,
            rust_log: "debug".to_string(),
            similarity: SimilarityParams::default(),
            default_team_size: 3,
            justification_seed: Some(42),
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}
