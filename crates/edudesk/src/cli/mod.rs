mod can;
mod discard;
mod sessions;
mod settings;
mod status;
mod upload;
mod whoami;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand};
use edudesk_api::ApiClient;
use edudesk_session::{SessionManager, SledStore};

use crate::config::Config;
use crate::env::EdudeskEnv;

#[derive(Debug, Parser)]
#[command(name = "edudesk", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct App {
    #[command(flatten)]
    pub global: GlobalArgs,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Log debug output to stderr.
    #[arg(long, short, global = true)]
    pub verbose: bool,
    /// Config file to read instead of `<root>/edudesk.toml`.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[arg(long, global = true)]
    pub api_url: Option<String>,
    #[arg(long, global = true)]
    pub token: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Upload a chapter video, resuming an interrupted upload of the same file.
    #[command(alias = "up", name = "upload")]
    Upload(upload::UploadArg),
    /// Show the chapter's video status and any pending local upload.
    #[command(alias = "st", name = "status")]
    Status(status::StatusArg),
    /// List pending upload sessions.
    #[command(alias = "ls", name = "sessions")]
    Sessions(sessions::SessionsArg),
    /// Forget the pending upload session of a chapter.
    #[command(alias = "rm", name = "discard")]
    Discard(discard::DiscardArg),
    /// Show the signed-in account and what it may do.
    #[command(name = "whoami")]
    Whoami(whoami::WhoamiArg),
    /// Check a capability for the signed-in account or a role.
    #[command(name = "can")]
    Can(can::CanArg),
    /// Print the effective configuration.
    #[command(alias = "cfg", name = "config")]
    Config(settings::ConfigArg),
}

impl App {
    pub async fn run(self) -> Result<ExitCode> {
        let ctx = Context::new(&self.global)?;
        match self.cmd {
            Commands::Upload(arg) => arg.run(&ctx).await,
            Commands::Status(arg) => arg.run(&ctx).await,
            Commands::Sessions(arg) => arg.run(&ctx),
            Commands::Discard(arg) => arg.run(&ctx),
            Commands::Whoami(arg) => arg.run(&ctx).await,
            Commands::Can(arg) => arg.run(&ctx).await,
            Commands::Config(arg) => arg.run(&ctx),
        }
    }
}

/// Resolved configuration and the clients built from it.
pub struct Context {
    pub config: Config,
    pub api: ApiClient,
}

impl Context {
    fn new(global: &GlobalArgs) -> Result<Self> {
        let env = EdudeskEnv::new()?;
        let mut config =
            Config::load(&env, global.config.as_deref()).context("Failed to load configuration")?;
        if let Some(api_url) = &global.api_url {
            config.api_url = api_url.clone();
        }
        if let Some(token) = &global.token {
            config.token = Some(token.clone());
        }
        tracing::debug!(root = %env.root().display(), api_url = %config.api_url, "configuration loaded");

        let http = reqwest::Client::builder()
            .user_agent(concat!("edudesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        let mut api = ApiClient::with_client(http, config.api_url.clone());
        if let Some(token) = &config.token {
            api = api.with_token(token.clone());
        }
        Ok(Self { config, api })
    }

    pub fn sessions(&self) -> Result<SessionManager<SledStore, ApiClient>> {
        let store = SledStore::open(&self.config.session_db).with_context(|| {
            format!(
                "Failed to open session store at {}",
                self.config.session_db.display()
            )
        })?;
        Ok(SessionManager::new(store, self.api.clone()))
    }

    pub fn require_token(&self) -> Result<()> {
        if self.api.is_authenticated() {
            return Ok(());
        }
        anyhow::bail!("No API token configured; pass --token or set EDUDESK_TOKEN")
    }
}
