use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use secrecy::SecretString;
use serde::Serialize;
use tallybook::app::{self, DeleteTarget};
use tallybook::config::{default_config_path, ResolvedConfig};
use tallybook::credentials::SecurityInfo;
use tallybook::models::{Id, NewTransaction};
use tallybook::{Session, Tracker};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tallybook")]
#[command(about = "Personal income and expense tracker")]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct AuthArgs {
    /// Username
    #[arg(short, long)]
    user: String,

    /// Password (prompted for when omitted)
    #[arg(long, env = "TALLYBOOK_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Show current configuration
    Config,

    /// Create a new user with a security question for password resets
    Register {
        #[command(flatten)]
        auth: AuthArgs,

        /// Security question
        #[arg(long)]
        question: String,

        /// Answer to the security question (prompted for when omitted)
        #[arg(long)]
        answer: Option<String>,
    },

    /// Check a user's password
    Login {
        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Record an income or expense
    Add {
        #[command(flatten)]
        auth: AuthArgs,

        /// Description
        #[arg(short, long)]
        desc: String,

        /// Non-negative amount
        #[arg(short, long)]
        amount: String,

        /// income or expense
        #[arg(short = 't', long = "type")]
        kind: String,

        /// Date as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Optional remarks
        #[arg(short, long)]
        remarks: Option<String>,
    },

    /// List transactions in ledger order
    List {
        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Delete a transaction by position or id
    Delete {
        #[command(flatten)]
        auth: AuthArgs,

        /// Position shown by `list`
        #[arg(required_unless_present = "id", conflicts_with = "id")]
        index: Option<usize>,

        /// Transaction id shown by `list`
        #[arg(long)]
        id: Option<String>,
    },

    /// Show totals, per-period breakdown, and chart series
    Summary {
        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Export transactions to {user}_Finance_Report.csv
    Export {
        #[command(flatten)]
        auth: AuthArgs,

        /// Directory to write the report into
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Show a user's security question
    Question {
        /// Username
        #[arg(short, long)]
        user: String,
    },

    /// Replace a forgotten password by answering the security question
    ResetPassword {
        /// Username
        #[arg(short, long)]
        user: String,

        /// Security answer (prompted for when omitted)
        #[arg(long)]
        answer: Option<String>,

        /// New password (prompted for when omitted)
        #[arg(long)]
        new_password: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logger();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.unwrap_or_else(default_config_path);
    let config = ResolvedConfig::load_or_default(&config_path)?;
    tracing::debug!(data_dir = %config.data_dir.display(), "Loaded config");
    let tracker = app::open_tracker(&config);

    match cli.command {
        Command::Config => print_json(&app::config_output(&config_path, &config)),

        Command::Register {
            auth,
            question,
            answer,
        } => {
            let password = secret_or_prompt(auth.password, "Password", true)?;
            let answer = secret_or_prompt(answer, &question, false)?;
            let security = SecurityInfo {
                question,
                answer,
            };
            let (_, output) = app::login(&tracker, &auth.user, &password, Some(&security)).await?;
            if !output.new_user {
                tracing::warn!(user = %output.username, "User already exists; password verified");
            }
            print_json(&output)
        }

        Command::Login { auth } => {
            let (_, output) = authenticate(&tracker, auth).await?;
            print_json(&output)
        }

        Command::Add {
            auth,
            desc,
            amount,
            kind,
            date,
            remarks,
        } => {
            let (mut session, _) = authenticate(&tracker, auth).await?;
            let input = NewTransaction {
                description: desc,
                amount,
                kind,
                date,
                remarks,
            };
            print_json(&app::add_transaction(&mut session, &config, input).await?)
        }

        Command::List { auth } => {
            let (session, _) = authenticate(&tracker, auth).await?;
            print_json(&app::list_transactions(&session, &config))
        }

        Command::Delete { auth, index, id } => {
            let (mut session, _) = authenticate(&tracker, auth).await?;
            let target = match (index, id) {
                (_, Some(id)) => DeleteTarget::Id(Id::from_string(id)),
                (Some(index), None) => DeleteTarget::Index(index),
                (None, None) => anyhow::bail!("Provide an index or --id"),
            };
            print_json(&app::delete_transaction(&mut session, target).await?)
        }

        Command::Summary { auth } => {
            let (session, _) = authenticate(&tracker, auth).await?;
            print_json(&app::summary(&session, &config))
        }

        Command::Export { auth, out_dir } => {
            let (session, _) = authenticate(&tracker, auth).await?;
            print_json(&app::export_transactions(&session, &out_dir)?)
        }

        Command::Question { user } => print_json(&app::security_question(&tracker, &user).await?),

        Command::ResetPassword {
            user,
            answer,
            new_password,
        } => {
            let answer = secret_or_prompt(answer, "Security answer", false)?;
            let new_password = secret_or_prompt(new_password, "New password", true)?;
            print_json(&app::reset_password(&tracker, &user, &answer, &new_password).await?)
        }
    }
}

/// Verify an existing user. Registration goes through `register`.
async fn authenticate(tracker: &Tracker, auth: AuthArgs) -> Result<(Session, app::LoginOutput)> {
    let password = secret_or_prompt(auth.password, "Password", false)?;
    app::login(tracker, &auth.user, &password, None)
        .await
        .with_context(|| format!("Login failed for {}", auth.user.trim()))
}

fn secret_or_prompt(value: Option<String>, prompt: &str, confirm: bool) -> Result<SecretString> {
    if let Some(value) = value {
        return Ok(SecretString::from(value));
    }

    let mut input = dialoguer::Password::new().with_prompt(prompt);
    if confirm {
        input = input.with_confirmation("Confirm", "Entries do not match");
    }
    let value = input.interact().context("Failed to read input")?;
    Ok(SecretString::from(value))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Logs go to stderr so stdout stays valid JSON.
fn init_logger() {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!("{}=info", env!("CARGO_CRATE_NAME"))),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
