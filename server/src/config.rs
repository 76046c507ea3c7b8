use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Server configuration persisted as TOML.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Listen address, e.g. "127.0.0.1:8080".
    pub listen: String,
    pub small_blind: u32,
    pub big_blind: u32,
    /// Stack granted on taking a seat.
    pub buy_in: u32,
    /// Number of tables in the lobby, named table-1..table-N.
    pub tables: usize,
    /// Per-client outbound queue depth before the hub drops the client.
    pub channel_buffer: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listen: "127.0.0.1:8080".to_string(),
            small_blind: 10,
            big_blind: 20,
            buy_in: 1000,
            tables: 4,
            channel_buffer: 256,
        }
    }
}

impl Config {
    /// Load configuration from `path`, creating the file with defaults if it
    /// does not exist yet.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let s = fs::read_to_string(path)
                .with_context(|| format!("reading config file '{}'", path.display()))?;
            let cfg: Config = toml::from_str(&s)
                .with_context(|| format!("parsing TOML config '{}'", path.display()))?;
            Ok(cfg)
        } else {
            let cfg = Config::default();
            cfg.save(path)?;
            Ok(cfg)
        }
    }

    /// Write the config back to disk (overwrites).
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating config directory '{}'", parent.display()))?;
            }
        }
        let toml_text =
            toml::to_string_pretty(self).with_context(|| "serializing config to TOML")?;
        fs::write(path, toml_text)
            .with_context(|| format!("writing config to '{}'", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = Config::default();
        assert_eq!(cfg.tables, 4);
        assert_eq!(cfg.big_blind, cfg.small_blind * 2);
        assert_eq!(cfg.buy_in, 1000);
    }

    #[test]
    fn round_trips_through_toml() {
        let cfg = Config::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.listen, cfg.listen);
        assert_eq!(back.channel_buffer, cfg.channel_buffer);
    }
}
