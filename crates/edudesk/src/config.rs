use std::path::{Path, PathBuf};
use std::time::Duration;

use edudesk_api::DEFAULT_API_URL;
use edudesk_transfer::TransferOptions;
use edudesk_transfer::core::{DEFAULT_RETRY_DELAYS, align_chunk_size};
use edudesk_transfer::data::DEFAULT_CHUNK_SIZE;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::env::EdudeskEnv;

/// Effective settings: defaults, then `edudesk.toml`, then `EDUDESK_*` variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub session_db: PathBuf,
    /// Rounded down to a 256 KiB multiple when used.
    pub chunk_size: usize,
    pub retry_delays_ms: Vec<u64>,
    /// `sessions --prune` drops sessions older than this.
    pub stale_after_days: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            session_db: PathBuf::from("sessions"),
            chunk_size: DEFAULT_CHUNK_SIZE,
            retry_delays_ms: DEFAULT_RETRY_DELAYS
                .iter()
                .map(|d| d.as_millis() as u64)
                .collect(),
            stale_after_days: 7,
        }
    }
}

impl Config {
    pub fn load(env: &EdudeskEnv, file: Option<&Path>) -> Result<Self, figment::Error> {
        let defaults = Config {
            session_db: env.session_db(),
            ..Config::default()
        };
        let file = file.map_or_else(|| env.config_file(), Path::to_path_buf);
        Self::figment(defaults, &file).extract()
    }

    fn figment(defaults: Config, file: &Path) -> Figment {
        Figment::from(Serialized::defaults(defaults))
            .merge(Toml::file(file))
            .merge(Env::prefixed("EDUDESK_").ignore(&["root"]))
    }

    pub fn chunk_size(&self) -> usize {
        align_chunk_size(self.chunk_size)
    }

    pub fn retry_delays(&self) -> Vec<Duration> {
        self.retry_delays_ms
            .iter()
            .copied()
            .map(Duration::from_millis)
            .collect()
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after_days.saturating_mul(24 * 60 * 60))
    }

    /// Transfer options without callbacks.
    pub fn transfer_options(&self) -> TransferOptions {
        TransferOptions::default()
            .chunk_size(self.chunk_size())
            .retry_delays(self.retry_delays())
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn defaults_without_file() {
        Jail::expect_with(|jail| {
            let env = EdudeskEnv::from_root(jail.directory());
            let config = Config::load(&env, None)?;
            assert_eq!(config.api_url, DEFAULT_API_URL);
            assert_eq!(config.session_db, env.session_db());
            assert_eq!(config.retry_delays_ms, vec![0, 3000, 5000, 10000, 20000]);
            assert_eq!(config.token, None);
            Ok(())
        });
    }

    #[test]
    fn file_then_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "edudesk.toml",
                r#"
                api_url = "https://api.example.com/api/v1"
                chunk_size = 1000000
                retry_delays_ms = [0, 100]
                "#,
            )?;
            jail.set_env("EDUDESK_TOKEN", "from-env");
            jail.set_env("EDUDESK_API_URL", "https://staging.example.com/api/v1");

            let env = EdudeskEnv::from_root(jail.directory());
            let config = Config::load(&env, None)?;
            assert_eq!(config.api_url, "https://staging.example.com/api/v1");
            assert_eq!(config.token.as_deref(), Some("from-env"));
            assert_eq!(config.retry_delays(), vec![Duration::ZERO, Duration::from_millis(100)]);
            // Rounded down to 3 * 256 KiB.
            assert_eq!(config.chunk_size(), 786_432);
            Ok(())
        });
    }

    #[test]
    fn tiny_chunk_size_is_raised_to_one_unit() {
        let config = Config {
            chunk_size: 1,
            ..Config::default()
        };
        assert_eq!(config.transfer_options().chunk_size, 256 * 1024);
    }
}
