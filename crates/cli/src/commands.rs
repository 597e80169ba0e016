//! Subcommand dispatch: build the platform clients from the environment,
//! run one workflow, print its report as JSON on stdout.

use anyhow::{bail, Context};
use async_trait::async_trait;
use serde::Serialize;

use subrev_core::notice::Notice;
use subrev_pipeline::{build_review_tracker, run_reviewer_workflow, sync_submissions};
use subrev_platform::{
    Credentials, GoogleWorkspace, MailConfig, MailError, Mailer, PlatformError, SmtpMailer,
};

use crate::args::{Cli, Command, NotifyArgs};

/// Stands in for SMTP on dry runs, which never send.
struct Unconfigured;

#[async_trait]
impl Mailer for Unconfigured {
    async fn send(&self, notice: &Notice) -> Result<(), PlatformError> {
        Err(MailError::Build(format!("SMTP_HOST is not set; cannot mail {}", notice.to)).into())
    }
}

fn workspace() -> anyhow::Result<GoogleWorkspace> {
    let credentials = Credentials::from_env().context("loading platform credentials")?;
    GoogleWorkspace::new(credentials).context("building platform client")
}

fn mailer(args: &NotifyArgs) -> anyhow::Result<Box<dyn Mailer>> {
    match MailConfig::from_env() {
        Some(config) => {
            tracing::info!(
                host = %config.smtp_host,
                port = config.smtp_port,
                "SMTP mailer configured",
            );
            Ok(Box::new(SmtpMailer::new(config).context("configuring SMTP transport")?))
        }
        None if args.dry_run => {
            tracing::warn!("SMTP_HOST not set; dry run only");
            Ok(Box::new(Unconfigured))
        }
        None => bail!("SMTP_HOST must be set unless --dry-run is given"),
    }
}

fn print_report<T: Serialize>(report: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Sync(args) => {
            let ws = workspace()?;
            let report = sync_submissions(&ws, &ws, &ws, &args.options())
                .await
                .context("syncing master sheet")?;
            print_report(&report)
        }
        Command::Tracker(args) => {
            let ws = workspace()?;
            let report = build_review_tracker(&ws, &ws, &args.options())
                .await
                .context("building review tracker")?;
            print_report(&report)
        }
        Command::Notify(args) => {
            let mailer = mailer(&args)?;
            let ws = workspace()?;
            let report = run_reviewer_workflow(&ws, &ws, mailer.as_ref(), &args.options())
                .await
                .context("running reviewer workflow")?;
            print_report(&report)
        }
    }
}
