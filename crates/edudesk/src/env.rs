use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use home::home_dir;

/// Where edudesk keeps its files.
///
/// `EDUDESK_ROOT` when set, `~/.edudesk` otherwise.
#[derive(Debug, Clone)]
pub struct EdudeskEnv {
    root: PathBuf,
}

impl EdudeskEnv {
    const CONFIG_FILE: &str = "edudesk.toml";
    const SESSION_DB: &str = "sessions";

    pub fn new() -> Result<Self> {
        let root = match env::var_os("EDUDESK_ROOT") {
            Some(root) => PathBuf::from(root),
            None => home_dir()
                .context("Failed to get home directory")?
                .join(".edudesk"),
        };
        Ok(Self::from_root(root))
    }

    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(Self::CONFIG_FILE)
    }

    pub fn session_db(&self) -> PathBuf {
        self.root.join(Self::SESSION_DB)
    }
}
