use std::io::{self, Write};

use console::{Term, style};
use repodash::session::{Identity, Session};

use crate::commands::shared::github_client;
use crate::config::Config;

/// Validate a token against its claimed username and store both.
pub(crate) async fn handle_login(
    username: Option<String>,
    token: Option<String>,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let is_tty = Term::stdout().is_term();

    let username = match username.or_else(|| config.github.username.clone()) {
        Some(username) => username,
        None if is_tty => prompt_line("GitHub username: ")?,
        None => {
            return Err(
                "No username provided. Pass --username or set REPODASH_GITHUB_USERNAME.".into(),
            );
        }
    };

    let token = match token.or_else(|| config.github.token.clone()) {
        Some(token) => token,
        None if is_tty => {
            println!(
                "Create a personal access token with the {} scope (and {} to delete) at:\n  {}\n",
                style("repo").cyan(),
                style("delete_repo").cyan(),
                "https://github.com/settings/tokens"
            );
            rpassword::prompt_password("Personal access token: ")?
        }
        None => {
            return Err("No token provided. Pass --token or set REPODASH_GITHUB_TOKEN.".into());
        }
    };

    let identity = Identity::new(token, username)?;
    let client = github_client(config, &identity)?;
    let session = Session::new(identity, client);

    let profile = session.validate().await?;
    let config_path = Config::save_credentials(&profile.login, session.identity().token())?;

    if is_tty {
        println!(
            "{} Logged in as {} ({} public repositories)",
            style("✓").green().bold(),
            style(&profile.login).cyan(),
            profile.public_repos
        );
        println!("Credentials saved to: {}", config_path.display());
    } else {
        tracing::info!(
            login = %profile.login,
            config_path = %config_path.display(),
            "Logged in"
        );
    }

    session.logout();
    Ok(())
}

fn prompt_line(prompt: &str) -> io::Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
