//! Repodash CLI - a terminal dashboard for your GitHub repositories.

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::Term;
use tracing_subscriber::EnvFilter;

use crate::commands::repos::ReposArgs;
use crate::commands::shared::OutputFormat;

#[derive(Parser)]
#[command(name = "repodash")]
#[command(version)]
#[command(about = "A dashboard for the GitHub repositories you own and contribute to")]
#[command(
    long_about = "Repodash lists every repository your token can see, deduplicated and \
tagged with whether you own it. You can filter and sort the list, inspect a single \
repository, and delete repositories you own."
)]
#[command(after_long_help = r#"EXAMPLES
    Log in with a personal access token:
        $ repodash login --username octocat

    List your Rust repositories, most starred first:
        $ repodash repos --owned --language Rust --sort stars

    Show a repository you contribute to:
        $ repodash show rust-lang/rust

    Delete one of your repositories without prompting:
        $ repodash delete old-experiment --yes

CONFIGURATION
    Repodash reads configuration from:
      1. ~/.config/repodash/config.toml (or $XDG_CONFIG_HOME/repodash/config.toml)
      2. ./repodash.toml
      3. Environment variables (REPODASH_* prefix)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    REPODASH_GITHUB_TOKEN       GitHub personal access token
    REPODASH_GITHUB_USERNAME    GitHub username the token belongs to
    RUST_LOG                    Log filter (e.g. repodash=debug)
"#)]
struct Cli {
    /// GitHub API root (GitHub Enterprise: https://HOST/api/v3)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a personal access token and store it
    Login {
        /// GitHub username the token belongs to
        #[arg(short, long)]
        username: Option<String>,

        /// Personal access token (prompted for when omitted)
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Remove stored credentials
    Logout,
    /// Show your profile and repository counts
    Profile {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
    /// List every repository you own or contribute to
    Repos(ReposArgs),
    /// Show details of a single repository
    Show {
        /// Repository as owner/name, or just name for your own
        repo: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
    /// Permanently delete a repository you own
    Delete {
        /// Repository as owner/name, or just name for your own
        repo: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
    /// Generate man page(s)
    Man {
        /// Output directory for man pages (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Structured logging when piped, or when asked for explicitly
    if !Term::stdout().is_term() || std::env::var_os("RUST_LOG").is_some() {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new("repodash=info,repodash_cli=info"),
        };

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    let mut config = config::Config::load();

    let cli = Cli::parse();
    if let Some(api_url) = cli.api_url {
        config.github.api_url = Some(api_url);
    }

    match cli.command {
        Commands::Login { username, token } => {
            commands::login::handle_login(username, token, &config).await?;
        }
        Commands::Logout => commands::logout::handle_logout()?,
        Commands::Profile { output } => {
            commands::profile::handle_profile(output, &config).await?;
        }
        Commands::Repos(args) => commands::repos::handle_repos(args, &config).await?,
        Commands::Show { repo, output } => {
            commands::show::handle_show(&repo, output, &config).await?;
        }
        Commands::Delete { repo, yes } => {
            commands::delete::handle_delete(&repo, yes, &config).await?;
        }
        Commands::Completions { shell } => commands::meta::handle_completions(shell)?,
        Commands::Man { output } => commands::meta::handle_man(output.as_deref())?,
    }

    Ok(())
}
