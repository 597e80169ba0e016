//! `subrev` -- submission review automation over the hosted office suite.
//!
//! Subcommands: `sync`, `tracker`, `notify` (see `subrev --help`). Platform
//! credentials come from `GOOGLE_ACCESS_TOKEN` or
//! `GOOGLE_APPLICATION_CREDENTIALS`, SMTP settings from `SMTP_*`.
//!
//! # Environment variables
//!
//! | Variable     | Required | Default        | Description                         |
//! |--------------|----------|----------------|-------------------------------------|
//! | `RUST_LOG`   | no       | `subrev=info`  | Log filter                          |
//! | `LOG_FORMAT` | no       | --             | `json` for JSON log lines on stderr |

use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use subrev_cli::args::Cli;
use subrev_cli::commands;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "subrev=info".into()),
        )
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .init();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli).await {
        tracing::error!(error = ?e, "Command failed");
        std::process::exit(1);
    }
}
