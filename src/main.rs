//! outreach - Entry point for the campaign CLI

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;

use outreach::config::Settings;
use outreach::providers::email::{SmtpCredentials, SmtpProvider};
use outreach::services::{AddressGuesser, MessageComposer, ThreadRandomness};
use outreach::storage::{CheckpointStore, SmtpSecret};
use outreach::CampaignService;

#[derive(Parser)]
#[command(name = "outreach")]
#[command(version)]
#[command(about = "Resumable, paced cold-outreach mailer for recruiter contact lists")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the settings file (defaults to the platform config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the campaign from the checkpoint to the end of the contact table
    Run {
        /// SMTP secret; read from the keychain when not given
        #[arg(long, env = "OUTREACH_SMTP_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Show the checkpoint's resume position
    Status,

    /// Print the candidate addresses for a name
    Guess {
        /// Full name, e.g. "Jane Doe"
        name: String,
    },

    /// Render one message body to stdout
    Preview {
        /// Recipient's full name
        name: String,
    },

    /// Store the SMTP secret in the OS keychain
    StorePassword {
        #[arg(long, env = "OUTREACH_SMTP_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_target(false)
        .init();
}

fn load_settings(path: Option<PathBuf>) -> Result<Settings> {
    let path = match path {
        Some(path) => path,
        None => Settings::default_path()?,
    };
    Settings::load(&path).with_context(|| format!("loading settings from {}", path.display()))
}

async fn smtp_password(settings: &Settings, password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    SmtpSecret::for_sender(&settings.sender)
        .load()
        .await
        .context("no SMTP password given and none found in the keychain")
}

async fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(cli.config)?;

    match cli.command {
        Commands::Run { password } => {
            let password = smtp_password(&settings, password).await?;
            let transport = SmtpProvider::new(
                settings.relay.clone(),
                SmtpCredentials::new(settings.sender.address.clone(), password),
            );

            let mut campaign = CampaignService::new(&settings, Arc::new(transport));
            let summary = campaign.run().await.context("campaign aborted")?;

            println!(
                "Sent {} email(s) in {} attempt(s); resume index {}; {} total in {}",
                summary.sent_this_run,
                summary.attempts,
                summary.next_index,
                summary.sent_total,
                settings.campaign.results_path.display()
            );
        }
        Commands::Status => {
            let store = CheckpointStore::new(settings.campaign.checkpoint_path.clone());
            let checkpoint = store.load().context("reading checkpoint")?;
            println!(
                "Checkpoint: {}\nNext row: {}\nEmails sent: {}",
                store.path().display(),
                checkpoint.last_processed_index,
                checkpoint.sent_emails.len()
            );
        }
        Commands::Guess { name } => {
            let candidates = AddressGuesser::new(settings.campaign.domain.clone()).guess(&name);
            if candidates.is_empty() {
                bail!("name {:?} produces no candidate addresses", name);
            }
            for candidate in candidates {
                println!("{}", candidate);
            }
        }
        Commands::Preview { name } => {
            let composer = MessageComposer::new(settings.profile.clone());
            let request = composer.request_for(&name, Some(&settings.campaign.company));
            println!("{}", composer.compose(&request, &mut ThreadRandomness));
        }
        Commands::StorePassword { password } => {
            let secret = SmtpSecret::for_sender(&settings.sender);
            secret
                .save(&password)
                .await
                .context("storing SMTP password")?;
            println!(
                "Stored SMTP password under {}/{}",
                SmtpSecret::SERVICE,
                secret.key()
            );
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}
