mod cli;
mod config;
mod env;
mod logging;
mod ui;

use std::process::ExitCode;

use clap::Parser;

use crate::cli::App;

#[tokio::main]
async fn main() -> ExitCode {
    let app = App::parse();
    logging::init(app.global.verbose);

    match app.run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
